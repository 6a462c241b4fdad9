pub mod banking;
pub mod chat;
pub mod mortgage;
pub mod properties;
pub mod rates;

//! Mortgage advisor chat with bounded per-user history.

pub mod domain;
pub mod openai;
pub mod prompt;
pub mod provider;
pub mod router;
pub mod service;
pub mod store;

pub use domain::{
    ChatMessage, ChatRequest, ChatResponse, ChatRole, FinancialInfo, MortgageContext, PropertyInfo,
};
pub use openai::{CompletionSettings, OpenAiChatClient};
pub use provider::{
    ChatProvider, ChatProviderError, CompletionRequest, ConfiguredChatProvider, ScriptedAdvisor,
};
pub use router::chat_router;
pub use service::{AdvisorChatService, ChatServiceError, HISTORY_WINDOW};
pub use store::{ConversationPolicy, ConversationStore};

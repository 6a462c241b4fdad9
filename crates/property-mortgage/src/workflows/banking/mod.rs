//! Bank account linking through Plaid, used to pre-fill the borrower's finances.

mod plaid;
pub mod router;
pub mod service;

pub use plaid::PlaidClient;
pub use router::banking_router;
pub use service::{BankLinkService, BankLinkServiceError, ExchangeOutcome, FinancialProfile};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Plaid deployment the credentials belong to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaidEnvironment {
    #[default]
    Sandbox,
    Development,
    Production,
}

impl PlaidEnvironment {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Some(PlaidEnvironment::Sandbox),
            "development" => Some(PlaidEnvironment::Development),
            "production" => Some(PlaidEnvironment::Production),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaidEnvironment::Sandbox => "sandbox",
            PlaidEnvironment::Development => "development",
            PlaidEnvironment::Production => "production",
        }
    }

    pub fn base_url(&self) -> String {
        format!("https://{}.plaid.com", self.as_str())
    }
}

/// Token used by the browser to open Plaid Link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkToken {
    pub link_token: String,
    pub expiration: String,
    pub request_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenExchange {
    pub access_token: String,
    #[serde(default)]
    pub item_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum BankLinkError {
    #[error("bank link request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("bank link provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("bank link provider returned malformed data: {0}")]
    Malformed(String),
}

/// Account aggregation backend.
#[async_trait]
pub trait BankLinkProvider: Send + Sync {
    fn environment(&self) -> PlaidEnvironment;
    async fn create_link_token(&self) -> Result<LinkToken, BankLinkError>;
    async fn exchange_public_token(&self, public_token: &str)
        -> Result<TokenExchange, BankLinkError>;
    async fn account_balances(&self, access_token: &str)
        -> Result<serde_json::Value, BankLinkError>;
}

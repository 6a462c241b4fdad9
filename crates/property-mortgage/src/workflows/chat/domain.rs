use serde::{Deserialize, Serialize};

/// Inbound advisor message with the borrower context captured by the mortgage form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub content: String,
    #[serde(default)]
    pub mortgage_data: Option<MortgageContext>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MortgageContext {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(rename = "propertyInfo", default)]
    pub property_info: PropertyInfo,
    #[serde(rename = "financialInfo", default)]
    pub financial_info: FinancialInfo,
}

impl MortgageContext {
    /// Conversation key; anonymous borrowers share the `default` conversation.
    pub fn conversation_key(&self) -> &str {
        self.user_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or("default")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyInfo {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialInfo {
    #[serde(default)]
    pub annual_income: Option<f64>,
    #[serde(default)]
    pub credit_score: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

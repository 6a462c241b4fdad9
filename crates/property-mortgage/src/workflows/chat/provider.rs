use async_trait::async_trait;

use super::domain::{ChatMessage, ChatRole, MortgageContext};
use super::openai::OpenAiChatClient;
use super::prompt::{format_currency, format_currency_cents, ADVISOR_SIGNATURE};

/// Everything a provider needs to draft the next advisor reply.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System prompt followed by the recent history, oldest first.
    pub messages: Vec<ChatMessage>,
    pub context: MortgageContext,
}

impl CompletionRequest {
    pub fn latest_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|message| message.role == ChatRole::User)
            .map(|message| message.content.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatProviderError {
    #[error("chat provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("chat provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("chat provider returned malformed data: {0}")]
    Malformed(String),
}

/// Source of advisor replies.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ChatProviderError>;
}

/// Offline advisor answering from the mortgage context with canned guidance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedAdvisor;

/// Rough all-in monthly cost as a share of the purchase price.
const ESTIMATED_MONTHLY_COST_SHARE: f64 = 0.004;

#[async_trait]
impl ChatProvider for ScriptedAdvisor {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ChatProviderError> {
        let message = request.latest_user_message().unwrap_or_default();
        let lowered = message.to_lowercase();
        let property = &request.context.property_info;
        let financial = &request.context.financial_info;
        let price = property.price.unwrap_or(0.0);

        let body = if lowered.contains("payment") {
            format!(
                "Based on your property price of {}, your estimated monthly payment would be {}.\n\
                 This includes principal, interest, taxes, and insurance.\n\
                 \n\
                 Would you like to know more about the breakdown of these costs?",
                format_currency(price),
                format_currency_cents(price * ESTIMATED_MONTHLY_COST_SHARE)
            )
        } else if lowered.contains("credit") {
            let score = financial
                .credit_score
                .map(|score| score.to_string())
                .unwrap_or_else(|| "not on file".to_string());
            format!(
                "Your credit score of {score} is in good range.\n\
                 This should help you qualify for competitive interest rates.\n\
                 \n\
                 Would you like to explore the loan options available to you?"
            )
        } else {
            format!(
                "Thank you for your question about \"{message}\".\n\
                 \n\
                 Based on your application:\n\
                 - Property: {}\n\
                 - Price: {}\n\
                 - Annual Income: {}\n\
                 \n\
                 What specific aspect would you like to know more about?",
                property.address.as_deref().unwrap_or("Not provided"),
                format_currency(price),
                format_currency(financial.annual_income.unwrap_or(0.0))
            )
        };

        Ok(format!("{body}\n\n{ADVISOR_SIGNATURE}"))
    }
}

/// Provider chosen at startup from the available credentials.
#[derive(Debug, Clone)]
pub enum ConfiguredChatProvider {
    OpenAi(OpenAiChatClient),
    Scripted(ScriptedAdvisor),
}

#[async_trait]
impl ChatProvider for ConfiguredChatProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ChatProviderError> {
        match self {
            ConfiguredChatProvider::OpenAi(client) => client.complete(request).await,
            ConfiguredChatProvider::Scripted(advisor) => advisor.complete(request).await,
        }
    }
}

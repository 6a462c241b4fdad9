use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::domain::{ChatMessage, ChatRequest, ChatResponse};
use super::prompt::system_prompt;
use super::provider::{ChatProvider, ChatProviderError, CompletionRequest};
use super::store::ConversationStore;

/// Messages of prior history forwarded to the provider with each turn.
pub const HISTORY_WINDOW: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum ChatServiceError {
    #[error("Missing mortgage context")]
    MissingContext,
    #[error("Empty message")]
    EmptyMessage,
    #[error(transparent)]
    Provider(#[from] ChatProviderError),
}

/// Mortgage advisor conversation: keeps per-user history and asks the provider for replies.
pub struct AdvisorChatService<P> {
    store: ConversationStore,
    provider: Arc<P>,
}

impl<P> AdvisorChatService<P>
where
    P: ChatProvider + 'static,
{
    pub fn new(store: ConversationStore, provider: Arc<P>) -> Self {
        Self { store, provider }
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Records the user turn, requests a reply, and records the reply on success.
    ///
    /// A failed provider call leaves the user turn in the history.
    pub async fn reply(
        &self,
        request: ChatRequest,
        now: DateTime<Utc>,
    ) -> Result<ChatResponse, ChatServiceError> {
        let context = request.mortgage_data.ok_or(ChatServiceError::MissingContext)?;
        let content = request.content.trim();
        if content.is_empty() {
            return Err(ChatServiceError::EmptyMessage);
        }

        let key = context.conversation_key().to_string();
        self.store.append(&key, ChatMessage::user(content), now);

        let mut messages = vec![ChatMessage::system(system_prompt(&context))];
        messages.extend(self.store.recent(&key, HISTORY_WINDOW, now));
        let completion = CompletionRequest { messages, context };

        let reply = match self.provider.complete(&completion).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(conversation = %key, error = %err, "advisor reply failed");
                return Err(err.into());
            }
        };

        self.store
            .append(&key, ChatMessage::assistant(reply.clone()), now);
        info!(conversation = %key, "advisor replied");
        Ok(ChatResponse { content: reply })
    }
}

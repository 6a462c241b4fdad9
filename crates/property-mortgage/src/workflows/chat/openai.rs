use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::domain::ChatMessage;
use super::provider::{ChatProvider, ChatProviderError, CompletionRequest};

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const EMPTY_REPLY: &str = "No response available.";

/// Sampling settings sent with every completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
}

impl CompletionSettings {
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: 0.7,
            max_tokens: 300,
            presence_penalty: 0.6,
            frequency_penalty: 0.3,
        }
    }
}

/// Chat completions client for the OpenAI API.
#[derive(Clone)]
pub struct OpenAiChatClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    settings: CompletionSettings,
}

impl std::fmt::Debug for OpenAiChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiChatClient")
            .field("endpoint", &self.endpoint)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl OpenAiChatClient {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>, settings: CompletionSettings) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            settings,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    presence_penalty: f32,
    frequency_penalty: f32,
}

#[derive(Deserialize)]
struct CompletionPayload {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Extracts the first choice's text from a completion payload.
pub(crate) fn parse_completion(body: &str) -> Result<String, ChatProviderError> {
    let payload: CompletionPayload =
        serde_json::from_str(body).map_err(|err| ChatProviderError::Malformed(err.to_string()))?;

    let reply = payload
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .unwrap_or_else(|| EMPTY_REPLY.to_string());
    Ok(reply)
}

#[async_trait]
impl ChatProvider for OpenAiChatClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ChatProviderError> {
        let body = CompletionBody {
            model: &self.settings.model,
            messages: &request.messages,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            presence_penalty: self.settings.presence_penalty,
            frequency_penalty: self.settings.frequency_penalty,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ChatProviderError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_completion(&text)
    }
}

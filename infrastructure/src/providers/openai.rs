//! OpenAI Chat Completions adapter

use super::http::{build_client, non_empty, read_json, send_error};
use super::{ProviderAdapter, ProviderDefaults, ProviderSettings};
use async_trait::async_trait;
use dxo_application::BackendErrorKind;
use dxo_domain::BackendId;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod endpoints {
    pub const BASE_URL: &str = "https://api.openai.com/v1";
    pub const CHAT_COMPLETIONS: &str = "/chat/completions";
}

pub const DEFAULTS: ProviderDefaults = ProviderDefaults {
    api_key_env: "OPENAI_API_KEY",
    base_url: endpoints::BASE_URL,
    model: "gpt-3.5-turbo",
};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Result<String, BackendErrorKind> {
        let text = self
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        non_empty(text, "choice content")
    }
}

pub struct OpenAiAdapter {
    client: Client,
    settings: ProviderSettings,
}

impl OpenAiAdapter {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            client: build_client(settings.timeout),
            settings,
        }
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn backend(&self) -> BackendId {
        BackendId::OpenAi
    }

    fn is_configured(&self) -> bool {
        self.settings.api_key.is_some()
    }

    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, BackendErrorKind> {
        let api_key = self.settings.require_key()?;
        let url = format!("{}{}", self.settings.base_url, endpoints::CHAT_COMPLETIONS);
        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.settings.token_limit(max_tokens),
        };

        debug!(model = %self.settings.model, "openai request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| send_error(e, self.settings.timeout))?;

        read_json::<ChatResponse>(response, self.settings.timeout)
            .await?
            .into_text()
    }
}

//! Anthropic Messages API adapter
//!
//! | Endpoint | URL |
//! |----------|-----|
//! | Base URL | `https://api.anthropic.com/v1` |
//! | Messages | `/messages` |
//!
//! Authentication: `x-api-key` plus `anthropic-version` headers.

use super::http::{build_client, non_empty, read_json, send_error};
use super::{ProviderAdapter, ProviderDefaults, ProviderSettings};
use async_trait::async_trait;
use dxo_application::BackendErrorKind;
use dxo_domain::BackendId;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod endpoints {
    pub const BASE_URL: &str = "https://api.anthropic.com/v1";
    pub const MESSAGES: &str = "/messages";
    pub const API_VERSION: &str = "2023-06-01";
}

pub const DEFAULTS: ProviderDefaults = ProviderDefaults {
    api_key_env: "ANTHROPIC_API_KEY",
    base_url: endpoints::BASE_URL,
    model: "claude-3-haiku-20240307",
};

// ==================== Wire Types ====================

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

impl MessagesResponse {
    fn into_text(self) -> Result<String, BackendErrorKind> {
        let text = self
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("");
        non_empty(text, "text content")
    }
}

// ==================== Adapter ====================

pub struct AnthropicAdapter {
    client: Client,
    settings: ProviderSettings,
}

impl AnthropicAdapter {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            client: build_client(settings.timeout),
            settings,
        }
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn backend(&self) -> BackendId {
        BackendId::Anthropic
    }

    fn is_configured(&self) -> bool {
        self.settings.api_key.is_some()
    }

    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, BackendErrorKind> {
        let api_key = self.settings.require_key()?;
        let url = format!("{}{}", self.settings.base_url, endpoints::MESSAGES);
        let request = MessagesRequest {
            model: &self.settings.model,
            max_tokens: self.settings.token_limit(max_tokens),
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        debug!(model = %self.settings.model, "anthropic request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", api_key.expose())
            .header("anthropic-version", endpoints::API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| send_error(e, self.settings.timeout))?;

        read_json::<MessagesResponse>(response, self.settings.timeout)
            .await?
            .into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileBackendConfig;
    use std::time::Duration;

    fn settings(api_key: Option<&str>, base_url: &str) -> ProviderSettings {
        ProviderSettings {
            api_key: api_key.map(crate::config::Secret::new),
            base_url: base_url.to_string(),
            model: DEFAULTS.model.to_string(),
            max_tokens: None,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_request_shape() {
        let request = MessagesRequest {
            model: "claude-3-haiku-20240307",
            max_tokens: 500,
            messages: vec![Message {
                role: "user",
                content: "hello",
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["max_tokens"], 500);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
    }

    #[test]
    fn test_response_text_blocks_are_joined() {
        let body = r#"{"content":[{"type":"text","text":"Diagnosis: "},{"type":"tool_use","id":"x","name":"n","input":{}},{"type":"text","text":"flu"}]}"#;
        let response: MessagesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.into_text().unwrap(), "Diagnosis: flu");
    }

    #[test]
    fn test_response_without_text_is_malformed() {
        let response: MessagesResponse = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert!(matches!(
            response.into_text(),
            Err(BackendErrorKind::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_default_endpoint() {
        let settings = ProviderSettings::resolve(
            &FileBackendConfig::default(),
            DEFAULTS,
            Duration::from_secs(5),
        );
        assert_eq!(settings.base_url, "https://api.anthropic.com/v1");
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let adapter = AnthropicAdapter::new(settings(None, "http://127.0.0.1:9"));
        assert!(!adapter.is_configured());
        let err = adapter.generate("hi", 10).await.unwrap_err();
        assert_eq!(err, BackendErrorKind::MissingCredential);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connection_error() {
        let adapter = AnthropicAdapter::new(settings(Some("k"), "http://127.0.0.1:9"));
        let err = adapter.generate("hi", 10).await.unwrap_err();
        assert!(matches!(
            err,
            BackendErrorKind::Connection(_) | BackendErrorKind::Timeout(_)
        ));
    }
}

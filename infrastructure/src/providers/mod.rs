//! Reasoning backend adapters
//!
//! One [`ProviderAdapter`] per HTTP API, composed behind the
//! [`BackendGateway`](dxo_application::BackendGateway) port by
//! [`RoutingGateway`].

pub mod anthropic;
pub mod gemini;
mod http;
pub mod openai;
pub mod routing;

pub use anthropic::AnthropicAdapter;
pub use gemini::GeminiAdapter;
pub use openai::OpenAiAdapter;
pub use routing::RoutingGateway;

use crate::config::{FileBackendConfig, Secret};
use async_trait::async_trait;
use dxo_application::BackendErrorKind;
use dxo_domain::BackendId;
use std::time::Duration;

/// Built-in defaults of one provider
#[derive(Debug, Clone, Copy)]
pub struct ProviderDefaults {
    pub api_key_env: &'static str,
    pub base_url: &'static str,
    pub model: &'static str,
}

/// Settings an adapter is built from, resolved once at startup
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub api_key: Option<Secret>,
    pub base_url: String,
    pub model: String,
    /// Overrides the per-call token ceiling when set
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
}

impl ProviderSettings {
    pub fn resolve(
        file: &FileBackendConfig,
        defaults: ProviderDefaults,
        timeout: Duration,
    ) -> Self {
        Self {
            api_key: file.resolve_api_key(defaults.api_key_env),
            base_url: file
                .base_url
                .as_deref()
                .unwrap_or(defaults.base_url)
                .trim_end_matches('/')
                .to_string(),
            model: file
                .model
                .clone()
                .unwrap_or_else(|| defaults.model.to_string()),
            max_tokens: file.max_tokens,
            timeout,
        }
    }

    /// The credential, or `MissingCredential` before any request is made
    fn require_key(&self) -> Result<&Secret, BackendErrorKind> {
        self.api_key.as_ref().ok_or(BackendErrorKind::MissingCredential)
    }

    fn token_limit(&self, requested: u32) -> u32 {
        self.max_tokens.unwrap_or(requested)
    }
}

#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn backend(&self) -> BackendId;

    /// Whether a credential was found for this provider
    fn is_configured(&self) -> bool;

    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, BackendErrorKind>;
}

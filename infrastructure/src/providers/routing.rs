use super::{
    AnthropicAdapter, GeminiAdapter, OpenAiAdapter, ProviderAdapter, ProviderSettings, anthropic,
    gemini, openai,
};
use crate::config::FileBackendsConfig;
use async_trait::async_trait;
use dxo_application::{BackendError, BackendErrorKind, BackendGateway};
use dxo_domain::BackendId;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Gateway that dispatches each call to the adapter owning the backend id.
///
/// Adapter order is fallback priority order.
pub struct RoutingGateway {
    providers: Vec<Arc<dyn ProviderAdapter>>,
}

impl RoutingGateway {
    pub fn new(providers: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        Self { providers }
    }

    /// Build the three HTTP adapters from config, resolving credentials once
    pub fn from_config(config: &FileBackendsConfig, timeout: Duration) -> Self {
        let providers: Vec<Arc<dyn ProviderAdapter>> = vec![
            Arc::new(AnthropicAdapter::new(ProviderSettings::resolve(
                &config.anthropic,
                anthropic::DEFAULTS,
                timeout,
            ))),
            Arc::new(OpenAiAdapter::new(ProviderSettings::resolve(
                &config.openai,
                openai::DEFAULTS,
                timeout,
            ))),
            Arc::new(GeminiAdapter::new(ProviderSettings::resolve(
                &config.gemini,
                gemini::DEFAULTS,
                timeout,
            ))),
        ];

        let gateway = Self::new(providers);
        info!(
            configured = ?gateway.backends().iter().map(BackendId::as_str).collect::<Vec<_>>(),
            "backends resolved"
        );
        gateway
    }

    fn resolve_provider(
        &self,
        backend: &BackendId,
    ) -> Result<&dyn ProviderAdapter, BackendErrorKind> {
        self.providers
            .iter()
            .find(|p| p.backend() == *backend)
            .map(|p| p.as_ref())
            .ok_or(BackendErrorKind::NotConfigured)
    }
}

#[async_trait]
impl BackendGateway for RoutingGateway {
    async fn invoke(
        &self,
        backend: &BackendId,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, BackendError> {
        let provider = self
            .resolve_provider(backend)
            .map_err(|kind| BackendError::new(backend.clone(), kind))?;

        debug!(backend = %backend, prompt_len = prompt.len(), "invoking backend");
        provider
            .generate(prompt, max_tokens)
            .await
            .map_err(|kind| BackendError::new(backend.clone(), kind))
    }

    fn backends(&self) -> Vec<BackendId> {
        self.providers
            .iter()
            .filter(|p| p.is_configured())
            .map(|p| p.backend())
            .collect()
    }
}

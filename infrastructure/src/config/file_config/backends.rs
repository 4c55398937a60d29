//! Backend credentials and endpoints from TOML (`[backends]` section)

use crate::config::Secret;
use serde::{Deserialize, Serialize};

/// Settings for one provider.
///
/// Every field is optional; missing values take the provider's own defaults
/// when the adapters are built, so a partial `[backends.openai]` table never
/// inherits another provider's endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendConfig {
    /// Environment variable holding the API key.
    pub api_key_env: Option<String>,
    /// Direct API key (prefer the environment variable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<Secret>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    /// Per-provider token ceiling, overriding `consultation.max_tokens`.
    pub max_tokens: Option<u32>,
}

impl FileBackendConfig {
    /// Resolve the credential: the inline key wins, then the named
    /// environment variable, then `default_env`.
    pub fn resolve_api_key(&self, default_env: &str) -> Option<Secret> {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.is_empty()) {
            return Some(key.clone());
        }
        let var = self.api_key_env.as_deref().unwrap_or(default_env);
        std::env::var(var)
            .ok()
            .map(Secret::new)
            .filter(|k| !k.is_empty())
    }
}

/// All provider tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBackendsConfig {
    pub anthropic: FileBackendConfig,
    pub openai: FileBackendConfig,
    pub gemini: FileBackendConfig,
}

//! Google Gemini generateContent adapter
//!
//! The key travels in the `x-goog-api-key` header rather than the query
//! string, so request URLs are safe to log.

use super::http::{build_client, non_empty, read_json, send_error};
use super::{ProviderAdapter, ProviderDefaults, ProviderSettings};
use async_trait::async_trait;
use dxo_application::BackendErrorKind;
use dxo_domain::BackendId;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod endpoints {
    pub const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

    pub fn generate_content(base_url: &str, model: &str) -> String {
        format!("{base_url}/models/{model}:generateContent")
    }
}

pub const DEFAULTS: ProviderDefaults = ProviderDefaults {
    api_key_env: "GEMINI_API_KEY",
    base_url: endpoints::BASE_URL,
    model: "gemini-pro",
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Result<String, BackendErrorKind> {
        let text = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();
        non_empty(text, "candidate text")
    }
}

pub struct GeminiAdapter {
    client: Client,
    settings: ProviderSettings,
}

impl GeminiAdapter {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            client: build_client(settings.timeout),
            settings,
        }
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn backend(&self) -> BackendId {
        BackendId::Gemini
    }

    fn is_configured(&self) -> bool {
        self.settings.api_key.is_some()
    }

    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, BackendErrorKind> {
        let api_key = self.settings.require_key()?;
        let url = endpoints::generate_content(&self.settings.base_url, &self.settings.model);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.settings.token_limit(max_tokens),
            },
        };

        debug!(url = %url, "gemini request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| send_error(e, self.settings.timeout))?;

        read_json::<GenerateResponse>(response, self.settings.timeout)
            .await?
            .into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_embeds_model() {
        assert_eq!(
            endpoints::generate_content(endpoints::BASE_URL, "gemini-pro"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn test_request_uses_camel_case() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: "q" }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: 500,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 500);
        assert_eq!(json["contents"][0]["parts"][0]["text"], "q");
    }

    #[test]
    fn test_candidate_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Score: 4"}],"role":"model"}}]}"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.into_text().unwrap(), "Score: 4");
    }

    #[test]
    fn test_blocked_prompt_has_no_candidates() {
        let body = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        assert!(matches!(
            response.into_text(),
            Err(BackendErrorKind::MalformedResponse(_))
        ));
    }
}

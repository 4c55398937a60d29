//! Single-backend fallback for runs that heard from no backend at all.

use super::RunConsultationUseCase;
use super::types::RunConsultationInput;
use crate::ports::backend_gateway::BackendGateway;
use crate::ports::transcript_logger::TranscriptEvent;
use dxo_domain::PromptTemplate;
use dxo_domain::prompt::{FALLBACK_DISCLAIMER, STATIC_FALLBACK};
use serde_json::json;
use tracing::{info, warn};

impl<G: BackendGateway + 'static> RunConsultationUseCase<G> {
    /// General guidance from the first backend that answers.
    ///
    /// Backends are tried in the gateway's priority order. When all of them
    /// fail the static apology is returned, so this never fails.
    pub(super) async fn fallback_text(&self, input: &RunConsultationInput) -> String {
        let prompt = PromptTemplate::general_guidance(&input.query, &input.options);

        for backend in self.gateway.backends() {
            match Self::invoke_with_timeout(
                &self.gateway,
                &backend,
                &prompt,
                self.params.max_tokens,
                self.params.call_timeout,
            )
            .await
            {
                Ok(text) if !text.trim().is_empty() => {
                    info!(backend = %backend, "Fallback answered");
                    self.transcript.log(TranscriptEvent::new(
                        "fallback_used",
                        json!({ "backend": backend.as_str() }),
                    ));
                    return with_disclaimer(text);
                }
                Ok(_) => warn!(backend = %backend, "Fallback returned empty text"),
                Err(e) => warn!("Fallback backend failed: {}", e),
            }
        }

        self.transcript.log(TranscriptEvent::new(
            "fallback_used",
            json!({ "backend": null }),
        ));
        STATIC_FALLBACK.to_string()
    }
}

fn with_disclaimer(text: String) -> String {
    if text.contains(FALLBACK_DISCLAIMER) {
        text
    } else {
        format!("{}\n\n{}", text.trim_end(), FALLBACK_DISCLAIMER)
    }
}

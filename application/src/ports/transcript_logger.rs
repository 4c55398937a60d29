//! Port for the consultation transcript.
//!
//! Defines the [`TranscriptLogger`] trait for recording every agent exchange
//! of a run to a structured log.
//!
//! This is separate from `tracing`-based operation logs and from the
//! trimmed history agents see in their prompts: the transcript keeps the
//! full audit trail in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured transcript event.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields. Implementations add the timestamp.
pub struct TranscriptEvent {
    /// Event type identifier (e.g., "run_started", "agent_response").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl TranscriptEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging transcript events.
///
/// `log` is synchronous and non-fallible: a broken transcript must never
/// disturb a running consultation.
pub trait TranscriptLogger: Send + Sync {
    fn log(&self, event: TranscriptEvent);
}

/// No-op implementation for tests and when the transcript is disabled.
pub struct NoTranscriptLogger;

impl TranscriptLogger for NoTranscriptLogger {
    fn log(&self, _event: TranscriptEvent) {}
}

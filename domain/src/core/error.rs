//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These are raised by pre-flight validation only. Nothing that happens once a
/// consultation is under way surfaces as a `DomainError`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid mode: {0} (expected instant, question_only, budgeted, no_budget or ensemble)")]
    InvalidMode(String),

    #[error("Invalid run options: {0}")]
    InvalidOptions(String),

    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("Unknown backend: {0} (expected anthropic, openai or gemini)")]
    UnknownBackend(String),
}

impl DomainError {
    /// Check if this error is an unrecognized mode selector
    pub fn is_invalid_mode(&self) -> bool {
        matches!(self, DomainError::InvalidMode(_))
    }
}

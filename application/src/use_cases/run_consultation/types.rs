//! Types for the RunConsultation use case.

use dxo_domain::{CaseQuery, DiagnosisResult, DomainError, RunOptions};
use thiserror::Error;

/// Errors that cross the consultation entry point
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsultationError {
    /// Rejected before any backend call
    #[error("Invalid options: {0}")]
    InvalidOptions(#[from] DomainError),

    #[error("Operation cancelled")]
    Cancelled,
}

/// Why a run could not produce an answer of its own.
///
/// Never leaves the use case: the text entry point turns it into the
/// single-backend fallback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum RunFailure {
    #[error("all {unavailable} backend calls failed")]
    AllBackendsFailed { unavailable: usize },
}

/// Input for the RunConsultation use case
#[derive(Debug, Clone)]
pub struct RunConsultationInput {
    pub query: CaseQuery,
    pub options: RunOptions,
}

impl RunConsultationInput {
    pub fn new(query: CaseQuery, options: RunOptions) -> Self {
        Self { query, options }
    }

    /// Validate a raw query. A blank query fails with `InvalidOptions`.
    pub fn parse(query: &str, options: RunOptions) -> Result<Self, ConsultationError> {
        Ok(Self::new(CaseQuery::try_new(query)?, options))
    }
}

/// What a mode strategy hands back to the entry point
#[derive(Debug, Clone)]
pub(crate) struct StrategyOutcome {
    pub result: DiagnosisResult,
    /// Backend calls that returned text
    pub answered: usize,
    /// Backend calls replaced by a stand-in note
    pub unavailable: usize,
}

impl StrategyOutcome {
    /// Fail when the panel never heard from a single backend
    pub fn ensure_answered(self) -> Result<DiagnosisResult, RunFailure> {
        if self.answered == 0 {
            return Err(RunFailure::AllBackendsFailed {
                unavailable: self.unavailable,
            });
        }
        Ok(self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxo_domain::{DeliberationState, TestCatalog, synthesize};

    fn outcome(answered: usize, unavailable: usize) -> StrategyOutcome {
        StrategyOutcome {
            result: synthesize("", &DeliberationState::new(), &TestCatalog::default()),
            answered,
            unavailable,
        }
    }

    #[test]
    fn test_ensure_answered() {
        assert!(outcome(1, 5).ensure_answered().is_ok());
        assert_eq!(
            outcome(0, 3).ensure_answered().unwrap_err(),
            RunFailure::AllBackendsFailed { unavailable: 3 }
        );
    }

    #[test]
    fn test_blank_query_is_invalid() {
        let err = RunConsultationInput::parse("   ", RunOptions::default()).unwrap_err();
        assert_eq!(err, ConsultationError::InvalidOptions(DomainError::EmptyQuery));
    }

    #[test]
    fn test_parse_keeps_options() {
        let input = RunConsultationInput::parse("fever", RunOptions::default().with_budget(7))
            .unwrap();
        assert_eq!(input.query.content(), "fever");
        assert_eq!(input.options.budget, 7);
    }
}

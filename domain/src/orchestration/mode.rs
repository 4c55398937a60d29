//! Operating mode definitions.
//!
//! [`DiagnosticMode`] selects the strategy a consultation runs under. The five
//! variants are a closed set; anything else is rejected with
//! [`DomainError::InvalidMode`] before a single backend call is made.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating mode of a consultation
///
/// | Mode | Rounds | Tests |
/// |------|--------|-------|
/// | `Instant` | 1, single agent | none |
/// | `QuestionOnly` | up to the question cap | none |
/// | `Budgeted` | up to `max_iterations` | within budget |
/// | `NoBudget` | up to `max_iterations` | never budget-rejected |
/// | `Ensemble` | N independent budgeted runs | per run |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticMode {
    Instant,
    QuestionOnly,
    #[default]
    Budgeted,
    NoBudget,
    Ensemble,
}

impl DiagnosticMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticMode::Instant => "instant",
            DiagnosticMode::QuestionOnly => "question_only",
            DiagnosticMode::Budgeted => "budgeted",
            DiagnosticMode::NoBudget => "no_budget",
            DiagnosticMode::Ensemble => "ensemble",
        }
    }

    /// Get a human-readable description of this mode
    pub fn description(&self) -> &'static str {
        match self {
            DiagnosticMode::Instant => "Instant: one diagnostician, one pass",
            DiagnosticMode::QuestionOnly => "Question-only: history taking, no tests",
            DiagnosticMode::Budgeted => "Budgeted: full panel, tests within budget",
            DiagnosticMode::NoBudget => "No budget: full panel, unrestricted tests",
            DiagnosticMode::Ensemble => "Ensemble: independent panels, majority vote",
        }
    }

    /// Whether this mode may order tests at all
    pub fn orders_tests(&self) -> bool {
        matches!(
            self,
            DiagnosticMode::Budgeted | DiagnosticMode::NoBudget | DiagnosticMode::Ensemble
        )
    }
}

impl fmt::Display for DiagnosticMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DiagnosticMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "instant" => Ok(DiagnosticMode::Instant),
            "question_only" | "questions" => Ok(DiagnosticMode::QuestionOnly),
            "budgeted" => Ok(DiagnosticMode::Budgeted),
            "no_budget" | "unbounded" => Ok(DiagnosticMode::NoBudget),
            "ensemble" => Ok(DiagnosticMode::Ensemble),
            _ => Err(DomainError::InvalidMode(s.to_string())),
        }
    }
}

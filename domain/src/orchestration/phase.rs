//! Strategy phases

use serde::{Deserialize, Serialize};

/// Phase of a consultation run
///
/// Every strategy starts in `Gathering` and ends in `Done`. Only modes that
/// order tests ever enter `Ordering`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Panel deliberation and history taking
    Gathering,
    /// Ordering tests and collecting their results
    Ordering,
    /// Producing the final structured result
    Synthesizing,
    Done,
}

impl Phase {
    pub fn as_str(&self) -> &str {
        match self {
            Phase::Gathering => "gathering",
            Phase::Ordering => "ordering",
            Phase::Synthesizing => "synthesizing",
            Phase::Done => "done",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Phase::Gathering => "Panel Deliberation",
            Phase::Ordering => "Test Ordering",
            Phase::Synthesizing => "Synthesis",
            Phase::Done => "Done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Done)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

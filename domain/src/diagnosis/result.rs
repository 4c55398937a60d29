//! Diagnosis result value object

use crate::deliberation::Hypothesis;
use serde::{Deserialize, Serialize};

/// A test the panel ordered, with its catalog cost
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedTest {
    pub test: String,
    pub cost: u32,
    pub rationale: String,
}

/// The sole output of a consultation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub final_diagnosis: String,
    /// Percent, 0-100
    pub confidence: u8,
    /// Ranked, at most three entries
    pub differential: Vec<Hypothesis>,
    pub recommended_tests: Vec<RecommendedTest>,
    pub total_cost: u32,
    pub iterations: u32,
    /// Raw text the result was parsed from
    pub reasoning: String,
    pub management_plan: String,
    /// Judge score (1-5), when an evaluator took part
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy_score: Option<u8>,
}

impl DiagnosisResult {
    pub fn with_accuracy_score(mut self, score: Option<u8>) -> Self {
        self.accuracy_score = score;
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = reasoning.into();
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }
}

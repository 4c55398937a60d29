//! Agent role tags

use serde::{Deserialize, Serialize};
use std::fmt;

/// Specialist role of a panel agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// Maintains the ranked differential with probabilities
    DifferentialDiagnostician,
    /// Picks the most discriminating tests
    TestStrategist,
    /// Challenges the leading hypotheses
    DevilsAdvocate,
    /// Argues for cheaper equivalent workups
    CostSteward,
    /// Checks names, logic and missed steps
    QualityChecker,
    /// Decides the next action and writes the final synthesis
    Coordinator,
    /// Simulates patient answers and test results
    InformationProvider,
    /// Scores the final diagnosis
    Evaluator,
}

impl AgentRole {
    pub const ALL: [AgentRole; 8] = [
        AgentRole::DifferentialDiagnostician,
        AgentRole::TestStrategist,
        AgentRole::DevilsAdvocate,
        AgentRole::CostSteward,
        AgentRole::QualityChecker,
        AgentRole::Coordinator,
        AgentRole::InformationProvider,
        AgentRole::Evaluator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::DifferentialDiagnostician => "differential_diagnostician",
            AgentRole::TestStrategist => "test_strategist",
            AgentRole::DevilsAdvocate => "devils_advocate",
            AgentRole::CostSteward => "cost_steward",
            AgentRole::QualityChecker => "quality_checker",
            AgentRole::Coordinator => "coordinator",
            AgentRole::InformationProvider => "information_provider",
            AgentRole::Evaluator => "evaluator",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

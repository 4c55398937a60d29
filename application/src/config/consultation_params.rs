//! Consultation parameters - use case loop control.
//!
//! [`ConsultationParams`] groups the static parameters that control the
//! mode strategies in
//! [`RunConsultationUseCase`](crate::use_cases::run_consultation::RunConsultationUseCase).
//! These are application-layer concerns, not domain policy.

use dxo_domain::{AgentRole, BackendId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which backend each agent role is dispatched to.
///
/// Spreading the roles of one round across providers means a single
/// provider outage costs one opinion, not the whole round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendAssignment {
    entries: Vec<(AgentRole, BackendId)>,
    default: BackendId,
}

impl Default for BackendAssignment {
    fn default() -> Self {
        Self {
            entries: vec![
                (AgentRole::DifferentialDiagnostician, BackendId::Anthropic),
                (AgentRole::TestStrategist, BackendId::OpenAi),
                (AgentRole::DevilsAdvocate, BackendId::OpenAi),
                (AgentRole::CostSteward, BackendId::Gemini),
                (AgentRole::QualityChecker, BackendId::OpenAi),
                (AgentRole::Coordinator, BackendId::Anthropic),
                (AgentRole::InformationProvider, BackendId::Gemini),
                (AgentRole::Evaluator, BackendId::Anthropic),
            ],
            default: BackendId::Anthropic,
        }
    }
}

impl BackendAssignment {
    /// Route every role to one backend
    pub fn single(backend: BackendId) -> Self {
        Self {
            entries: Vec::new(),
            default: backend,
        }
    }

    pub fn with_role(mut self, role: AgentRole, backend: BackendId) -> Self {
        match self.entries.iter_mut().find(|(r, _)| *r == role) {
            Some(entry) => entry.1 = backend,
            None => self.entries.push((role, backend)),
        }
        self
    }

    pub fn backend_for(&self, role: AgentRole) -> &BackendId {
        self.entries
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, b)| b)
            .unwrap_or(&self.default)
    }
}

/// Mode strategy control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultationParams {
    /// Upper bound on a single backend call.
    pub call_timeout: Duration,
    /// Token ceiling passed with every call.
    pub max_tokens: u32,
    /// History entries included in each agent prompt.
    pub history_window: usize,
    /// Independent panels in ensemble mode.
    pub ensemble_runs: usize,
    /// Flat cost reported by instant mode.
    pub instant_fee: u32,
    /// Hard cap on question-only rounds, on top of `max_iterations`.
    pub question_round_cap: u32,
    /// Tests taken from one coordinator decision.
    pub max_tests_per_round: usize,
    /// Budget used by the no-budget mode.
    pub unbounded_budget: u32,
    pub assignment: BackendAssignment,
}

impl Default for ConsultationParams {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(60),
            max_tokens: 500,
            history_window: 10,
            ensemble_runs: 3,
            instant_fee: 300,
            question_round_cap: 5,
            max_tests_per_round: 3,
            unbounded_budget: 999_999,
            assignment: BackendAssignment::default(),
        }
    }
}

impl ConsultationParams {
    // ==================== Builder Methods ====================

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn with_ensemble_runs(mut self, runs: usize) -> Self {
        self.ensemble_runs = runs;
        self
    }

    pub fn with_instant_fee(mut self, fee: u32) -> Self {
        self.instant_fee = fee;
        self
    }

    pub fn with_question_round_cap(mut self, cap: u32) -> Self {
        self.question_round_cap = cap;
        self
    }

    pub fn with_max_tests_per_round(mut self, max: usize) -> Self {
        self.max_tests_per_round = max;
        self
    }

    pub fn with_unbounded_budget(mut self, budget: u32) -> Self {
        self.unbounded_budget = budget;
        self
    }

    pub fn with_assignment(mut self, assignment: BackendAssignment) -> Self {
        self.assignment = assignment;
        self
    }
}

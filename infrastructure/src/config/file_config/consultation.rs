//! Consultation loop settings from TOML (`[consultation]` and `[assignment]`)

use super::ConfigError;
use dxo_application::{BackendAssignment, ConsultationParams};
use dxo_domain::{AgentRole, BackendId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConsultationConfig {
    /// Upper bound on one backend call, in seconds
    pub timeout_seconds: u64,
    pub max_tokens: u32,
    /// Recent discussion entries shown to each agent
    pub history_window: usize,
    pub ensemble_runs: usize,
    pub instant_fee: u32,
    pub question_round_cap: u32,
    pub max_tests_per_round: usize,
    /// Budget handed to the no-budget mode
    pub unbounded_budget: u32,
}

impl Default for FileConsultationConfig {
    fn default() -> Self {
        let params = ConsultationParams::default();
        Self {
            timeout_seconds: params.call_timeout.as_secs(),
            max_tokens: params.max_tokens,
            history_window: params.history_window,
            ensemble_runs: params.ensemble_runs,
            instant_fee: params.instant_fee,
            question_round_cap: params.question_round_cap,
            max_tests_per_round: params.max_tests_per_round,
            unbounded_budget: params.unbounded_budget,
        }
    }
}

/// Role → backend routing
///
/// ```toml
/// [assignment]
/// default = "openai"
///
/// [assignment.roles]
/// coordinator = "anthropic"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAssignmentConfig {
    pub default: Option<String>,
    pub roles: BTreeMap<String, String>,
}

impl FileAssignmentConfig {
    pub fn to_assignment(&self) -> Result<BackendAssignment, ConfigError> {
        let mut assignment = match &self.default {
            Some(backend) => BackendAssignment::single(parse_backend(backend)?),
            None => BackendAssignment::default(),
        };
        for (role, backend) in &self.roles {
            let role = AgentRole::ALL
                .into_iter()
                .find(|r| r.as_str() == role.trim().to_lowercase())
                .ok_or_else(|| ConfigError::UnknownRole(role.clone()))?;
            assignment = assignment.with_role(role, parse_backend(backend)?);
        }
        Ok(assignment)
    }
}

fn parse_backend(name: &str) -> Result<BackendId, ConfigError> {
    name.parse::<BackendId>().map_err(|_| ConfigError::UnknownBackend(name.to_string()))
}

impl FileConsultationConfig {
    pub fn to_params(
        &self,
        assignment: &FileAssignmentConfig,
    ) -> Result<ConsultationParams, ConfigError> {
        if self.timeout_seconds == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(ConsultationParams::default()
            .with_call_timeout(Duration::from_secs(self.timeout_seconds))
            .with_max_tokens(self.max_tokens)
            .with_history_window(self.history_window)
            .with_ensemble_runs(self.ensemble_runs)
            .with_instant_fee(self.instant_fee)
            .with_question_round_cap(self.question_round_cap)
            .with_max_tests_per_round(self.max_tests_per_round)
            .with_unbounded_budget(self.unbounded_budget)
            .with_assignment(assignment.to_assignment()?))
    }
}

//! Mode policy from TOML (`[policy.paid]` / `[policy.free]`)

use super::ConfigError;
use dxo_application::ModePolicy;
use dxo_domain::RunOptions;
use serde::{Deserialize, Serialize};

/// One caller tier.
///
/// Numbers are signed so that a negative value in the file is reported as a
/// validation error instead of a TOML type error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilePolicyTier {
    pub mode: String,
    pub max_iterations: i64,
    pub budget: i64,
}

impl FilePolicyTier {
    fn from_options(options: &RunOptions) -> Self {
        Self {
            mode: options.mode.as_str().to_string(),
            max_iterations: options.max_iterations.into(),
            budget: options.budget.into(),
        }
    }

    fn to_options(&self, tier: &'static str) -> Result<RunOptions, ConfigError> {
        RunOptions::parse(&self.mode, self.max_iterations, self.budget)
            .map_err(|source| ConfigError::InvalidPolicy { tier, source })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePolicyConfig {
    pub paid: FilePolicyTier,
    pub free: FilePolicyTier,
}

impl Default for FilePolicyConfig {
    fn default() -> Self {
        let policy = ModePolicy::default();
        Self {
            paid: FilePolicyTier::from_options(&policy.paid),
            free: FilePolicyTier::from_options(&policy.free),
        }
    }
}

impl FilePolicyConfig {
    pub fn to_policy(&self) -> Result<ModePolicy, ConfigError> {
        Ok(ModePolicy {
            paid: self.paid.to_options("paid")?,
            free: self.free.to_options("free")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxo_domain::DiagnosticMode;

    #[test]
    fn test_default_round_trips_to_policy() {
        let policy = FilePolicyConfig::default().to_policy().unwrap();
        assert_eq!(policy, ModePolicy::default());
    }

    #[test]
    fn test_unknown_mode_is_invalid_policy() {
        let mut config = FilePolicyConfig::default();
        config.free.mode = "turbo".to_string();
        let err = config.to_policy().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidPolicy { tier: "free", ref source } if source.is_invalid_mode()
        ));
    }

    #[test]
    fn test_negative_budget_rejected() {
        let mut config = FilePolicyConfig::default();
        config.paid.budget = -1;
        assert!(config.to_policy().is_err());
    }

    #[test]
    fn test_paid_tier_override() {
        let mut config = FilePolicyConfig::default();
        config.paid.mode = "ensemble".to_string();
        let policy = config.to_policy().unwrap();
        assert_eq!(policy.paid.mode, DiagnosticMode::Ensemble);
    }
}

//! Caller-supplied run configuration

use super::mode::DiagnosticMode;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Configuration for a single consultation run
///
/// Budget is in whole currency units; `0` means no test may be ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    pub mode: DiagnosticMode,
    pub max_iterations: u32,
    pub budget: u32,
    pub language: String,
    pub age: String,
    pub patient_context: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            mode: DiagnosticMode::default(),
            max_iterations: 10,
            budget: 5000,
            language: "en".to_string(),
            age: "Unknown".to_string(),
            patient_context: "Text query".to_string(),
        }
    }
}

impl RunOptions {
    pub fn new(mode: DiagnosticMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Build options from untyped input (config files, CLI flags).
    ///
    /// Fails with [`DomainError::InvalidMode`] for an unknown mode and
    /// [`DomainError::InvalidOptions`] for negative or oversized numbers.
    pub fn parse(mode: &str, max_iterations: i64, budget: i64) -> Result<Self, DomainError> {
        let mode: DiagnosticMode = mode.parse()?;
        Ok(Self::new(mode)
            .with_max_iterations(non_negative("max_iterations", max_iterations)?)
            .with_budget(non_negative("budget", budget)?))
    }

    // ==================== Builder Methods ====================

    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_budget(mut self, budget: u32) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_age(mut self, age: impl Into<String>) -> Self {
        self.age = age.into();
        self
    }

    pub fn with_patient_context(mut self, context: impl Into<String>) -> Self {
        self.patient_context = context.into();
        self
    }
}

fn non_negative(field: &str, value: i64) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| {
        DomainError::InvalidOptions(format!(
            "{} must be between 0 and {}, got {}",
            field,
            u32::MAX,
            value
        ))
    })
}

//! Mode selection policy.
//!
//! Maps who is asking to how the panel runs. The mapping is supplied by the
//! caller (usually from config); the engine itself has no opinion.

use dxo_domain::{DiagnosticMode, RunOptions};
use serde::{Deserialize, Serialize};

pub const IMAGE_CONTEXT: &str = "Image/scan provided";
pub const TEXT_CONTEXT: &str = "Text query";

/// Caller facts that influence mode selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerContext {
    /// Opaque paid signal from the billing side
    pub is_paid: bool,
    pub is_image: bool,
    pub language: String,
    pub age: String,
}

impl Default for CallerContext {
    fn default() -> Self {
        Self {
            is_paid: false,
            is_image: false,
            language: "en".to_string(),
            age: "Unknown".to_string(),
        }
    }
}

impl CallerContext {
    pub fn paid() -> Self {
        Self {
            is_paid: true,
            ..Default::default()
        }
    }

    pub fn with_image(mut self, is_image: bool) -> Self {
        self.is_image = is_image;
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
}

/// Run options per caller tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModePolicy {
    pub paid: RunOptions,
    pub free: RunOptions,
}

impl Default for ModePolicy {
    fn default() -> Self {
        Self {
            paid: RunOptions::new(DiagnosticMode::Budgeted)
                .with_max_iterations(10)
                .with_budget(5000),
            free: RunOptions::new(DiagnosticMode::QuestionOnly)
                .with_max_iterations(5)
                .with_budget(0),
        }
    }
}

impl ModePolicy {
    /// Resolve the run options for a caller
    pub fn options_for(&self, caller: &CallerContext) -> RunOptions {
        let base = if caller.is_paid { &self.paid } else { &self.free };
        base.clone()
            .with_language(caller.language.clone())
            .with_age(caller.age.clone())
            .with_patient_context(if caller.is_image {
                IMAGE_CONTEXT
            } else {
                TEXT_CONTEXT
            })
    }
}

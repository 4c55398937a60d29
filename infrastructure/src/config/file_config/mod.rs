//! Raw TOML configuration data types
//!
//! These structs mirror the config file exactly. Conversion into
//! application types happens through the `to_*` methods, which is also where
//! validation lives.

mod backends;
mod catalog;
mod consultation;
mod policy;

pub use backends::{FileBackendConfig, FileBackendsConfig};
pub use catalog::FileCatalogConfig;
pub use consultation::{FileAssignmentConfig, FileConsultationConfig};
pub use policy::{FilePolicyConfig, FilePolicyTier};

use dxo_application::{ConsultationParams, ModePolicy};
use dxo_domain::{DomainError, TestCatalog};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("consultation.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("policy.{tier}: {source}")]
    InvalidPolicy {
        tier: &'static str,
        #[source]
        source: DomainError,
    },

    #[error("unknown agent role '{0}' in [assignment.roles]")]
    UnknownRole(String),

    #[error("unknown backend '{0}' in [assignment] (expected anthropic, openai or gemini)")]
    UnknownBackend(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Provider credentials and endpoints
    pub backends: FileBackendsConfig,
    /// Loop control for the mode strategies
    pub consultation: FileConsultationConfig,
    /// Which backend each agent role uses
    pub assignment: FileAssignmentConfig,
    /// Paid / free caller tiers
    pub policy: FilePolicyConfig,
    /// Test price overrides
    pub catalog: FileCatalogConfig,
}

impl FileConfig {
    pub fn to_consultation_params(&self) -> Result<ConsultationParams, ConfigError> {
        self.consultation.to_params(&self.assignment)
    }

    pub fn to_mode_policy(&self) -> Result<ModePolicy, ConfigError> {
        self.policy.to_policy()
    }

    pub fn to_catalog(&self) -> TestCatalog {
        self.catalog.to_catalog()
    }

    /// Check every section, reporting the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.to_consultation_params()?;
        self.to_mode_policy()?;
        Ok(())
    }
}

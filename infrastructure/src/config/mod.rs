//! Configuration file loading for dxo
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DXO_` environment variables, nested with `__`
//! 2. `--config <path>` specified file
//! 3. Project root: `./dxo.toml` or `./.dxo.toml`
//! 4. Global: `$XDG_CONFIG_HOME/dxo/config.toml`
//! 5. Default values

mod file_config;
mod loader;
mod secret;

pub use file_config::{
    ConfigError, FileAssignmentConfig, FileBackendConfig, FileBackendsConfig, FileCatalogConfig,
    FileConfig, FileConsultationConfig, FilePolicyConfig, FilePolicyTier,
};
pub use loader::ConfigLoader;
pub use secret::Secret;

//! Infrastructure layer for dxo
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: HTTP reasoning backends, configuration file
//! loading and the JSONL transcript.

pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, FileConfig, Secret};
pub use logging::JsonlTranscriptLogger;
pub use providers::{
    AnthropicAdapter, GeminiAdapter, OpenAiAdapter, ProviderAdapter, ProviderSettings,
    RoutingGateway,
};

//! Application layer for dxo
//!
//! This crate contains the consultation use case, its mode strategies,
//! port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{BackendAssignment, CallerContext, ConsultationParams, ModePolicy};
pub use ports::{
    backend_gateway::{BackendError, BackendErrorKind, BackendGateway},
    progress::{NoProgress, ProgressNotifier},
    transcript_logger::{NoTranscriptLogger, TranscriptEvent, TranscriptLogger},
};
pub use use_cases::run_consultation::{
    ConsultationError, RunConsultationInput, RunConsultationUseCase,
};

//! Application-level configuration.
//!
//! - [`ConsultationParams`] - strategy loop control (timeouts, caps, fees, routing)
//! - [`ModePolicy`] - caller tier to run options

pub mod consultation_params;
pub mod mode_policy;

pub use consultation_params::{BackendAssignment, ConsultationParams};
pub use mode_policy::{CallerContext, ModePolicy};

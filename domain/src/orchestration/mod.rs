//! Orchestration domain
//!
//! Mode selection, run options, strategy phases and the coordinator's
//! decision vocabulary.

pub mod decision;
pub mod mode;
pub mod options;
pub mod phase;

pub use decision::CoordinatorDecision;
pub use mode::DiagnosticMode;
pub use options::RunOptions;
pub use phase::Phase;

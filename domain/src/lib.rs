//! Domain layer for dxo
//!
//! This crate contains the core logic of the diagnostic panel: agent
//! definitions, per-run deliberation state, the test catalog, run options,
//! coordinator decisions, result synthesis and ensemble voting.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Panel
//!
//! A fixed set of agents (role + instruction) is dispatched against
//! interchangeable reasoning backends. Each run owns one
//! [`DeliberationState`] that accumulates history, hypotheses and ordered
//! tests.
//!
//! ## Modes
//!
//! - **Instant**: one hypothesis pass, fixed fee
//! - **Question-only**: clarifying-question rounds, no tests
//! - **Budgeted** (default): question/test rounds under a cost ceiling
//! - **No budget**: budgeted with an effectively unlimited ceiling
//! - **Ensemble**: independent budgeted panels merged by majority vote

pub mod agent;
pub mod core;
pub mod deliberation;
pub mod diagnosis;
pub mod ensemble;
pub mod orchestration;
pub mod prompt;

// Re-export commonly used types
pub use agent::{AgentDefinition, AgentRegistry, AgentRole};
pub use core::{backend::BackendId, error::DomainError, query::CaseQuery};
pub use deliberation::{
    DeliberationState, HistoryEntry, Hypothesis, OrderedTest, ResponseOutcome, TestCatalog,
};
pub use diagnosis::{DiagnosisResult, RecommendedTest, render_report, synthesize};
pub use ensemble::{EnsembleTally, PanelVote};
pub use orchestration::{CoordinatorDecision, DiagnosticMode, Phase, RunOptions};
pub use prompt::PromptTemplate;

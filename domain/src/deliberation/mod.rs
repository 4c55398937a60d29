//! Deliberation domain
//!
//! The mutable accumulator of one consultation run ([`DeliberationState`])
//! and the static price list tests are ordered from ([`TestCatalog`]).
//!
//! A state is created when a run starts and dropped when it ends. It is never
//! shared between runs: ensemble sub-runs each own a fresh instance.

pub mod catalog;
pub mod state;

pub use catalog::TestCatalog;
pub use state::{DeliberationState, HistoryEntry, Hypothesis, OrderedTest, ResponseOutcome};

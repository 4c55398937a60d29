//! Ensemble aggregation
//!
//! N independent panels diagnose the same case; their results are folded
//! into one by majority vote on the diagnosis label and integer means of
//! confidence and cost.

pub mod vote;

pub use vote::{EnsembleTally, PanelVote, aggregate};

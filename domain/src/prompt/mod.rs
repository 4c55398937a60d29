//! Prompt domain
//!
//! Templates for every dispatch a mode strategy makes, plus the
//! single-backend fallback prompt.

mod template;

pub use template::{FALLBACK_DISCLAIMER, PromptTemplate, STATIC_FALLBACK};

//! Core domain concepts shared across all subdomains.
//!
//! - [`backend::BackendId`] - identity of a reasoning backend
//! - [`query::CaseQuery`] - a validated case description
//! - [`error::DomainError`] - domain-level errors

pub mod backend;
pub mod error;
pub mod query;

//! Agent registry
//!
//! A fixed catalog of specialist roles. Each [`AgentDefinition`] is a
//! (role, instruction) pair and carries no backend binding: strategies decide
//! which backend answers for which agent on every dispatch.

pub mod registry;
pub mod role;

pub use registry::{AgentDefinition, AgentRegistry};
pub use role::AgentRole;

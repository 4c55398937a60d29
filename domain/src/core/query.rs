//! Case query value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// The user's case description to be put before the panel (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseQuery {
    content: String,
}

impl CaseQuery {
    /// Create a new query, rejecting empty or whitespace-only input
    pub fn try_new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            Err(DomainError::EmptyQuery)
        } else {
            Ok(Self { content })
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for CaseQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

//! Backend identity value object

use super::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identity of a reasoning backend (Value Object)
///
/// Agents are not bound to a backend; a strategy picks one per dispatch.
/// The three built-in providers have independent credentials, latency and
/// availability, which is what lets a round degrade instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BackendId {
    Anthropic,
    OpenAi,
    Gemini,
}

impl BackendId {
    /// Get the string identifier for this backend
    pub fn as_str(&self) -> &str {
        match self {
            BackendId::Anthropic => "anthropic",
            BackendId::OpenAi => "openai",
            BackendId::Gemini => "gemini",
        }
    }

    /// Human-facing provider label
    pub fn display_name(&self) -> &str {
        match self {
            BackendId::Anthropic => "Claude",
            BackendId::OpenAi => "OpenAI",
            BackendId::Gemini => "Gemini",
        }
    }

    /// The built-in providers, in fallback priority order
    pub fn builtin() -> Vec<BackendId> {
        vec![BackendId::Anthropic, BackendId::OpenAi, BackendId::Gemini]
    }
}

impl std::fmt::Display for BackendId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BackendId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(BackendId::Anthropic),
            "openai" | "gpt" => Ok(BackendId::OpenAi),
            "gemini" | "google" => Ok(BackendId::Gemini),
            _ => Err(DomainError::UnknownBackend(s.to_string())),
        }
    }
}

impl Serialize for BackendId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BackendId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

//! Coordinator decision tags
//!
//! The coordinator is asked to open its reply with a single tag line
//! (`DECISION: ASK | TESTS | DIAGNOSE`). Replies that ignore the format are
//! classified by the looser keyword checks older prompts relied on.

use serde::{Deserialize, Serialize};

/// Next action chosen by the coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatorDecision {
    AskQuestions,
    OrderTests,
    Diagnose,
}

impl CoordinatorDecision {
    /// Classify a coordinator reply.
    ///
    /// # Example
    ///
    /// ```
    /// use dxo_domain::orchestration::CoordinatorDecision;
    ///
    /// assert_eq!(
    ///     CoordinatorDecision::parse("DECISION: TESTS\ncbc"),
    ///     CoordinatorDecision::OrderTests
    /// );
    /// assert_eq!(
    ///     CoordinatorDecision::parse("We can diagnose now."),
    ///     CoordinatorDecision::Diagnose
    /// );
    /// ```
    pub fn parse(text: &str) -> Self {
        Self::parse_tag(text).unwrap_or_else(|| Self::parse_legacy(text))
    }

    /// Read the leading tag line, if the reply has one.
    ///
    /// Only `DECISION: <tag>` or a line holding nothing but the tag counts.
    /// Prose that merely starts with a similar word is left to the keyword
    /// checks.
    pub fn parse_tag(text: &str) -> Option<Self> {
        let first = text.lines().find(|l| !l.trim().is_empty())?;
        let upper = first
            .trim()
            .trim_matches(|c: char| matches!(c, '*' | '#' | '_' | '`'))
            .trim()
            .to_uppercase();

        match upper.strip_prefix("DECISION") {
            Some(rest) => {
                let rest = rest.trim_start_matches([':', ' ', '-']);
                let word = rest
                    .split(|c: char| !c.is_ascii_alphabetic())
                    .next()
                    .unwrap_or_default();
                Self::from_tag(word)
            }
            None => Self::from_tag(upper.trim_end_matches(['.', '!'])),
        }
    }

    fn from_tag(word: &str) -> Option<Self> {
        match word {
            "ASK" => Some(CoordinatorDecision::AskQuestions),
            "TESTS" => Some(CoordinatorDecision::OrderTests),
            "DIAGNOSE" => Some(CoordinatorDecision::Diagnose),
            _ => None,
        }
    }

    fn parse_legacy(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("diagnose") || lower.contains("sufficient") {
            CoordinatorDecision::Diagnose
        } else if lower.contains("test") {
            CoordinatorDecision::OrderTests
        } else {
            CoordinatorDecision::AskQuestions
        }
    }

    /// Whether the coordinator considers the information sufficient
    pub fn is_ready(&self) -> bool {
        matches!(self, CoordinatorDecision::Diagnose)
    }
}

//! Deliberation state for a single consultation run

use serde::{Deserialize, Serialize};

/// Whether a history entry carries a real backend answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOutcome {
    Answered,
    /// The backend call failed; the text is a stand-in note
    Unavailable,
}

/// One agent contribution, in completion order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub agent: String,
    pub response: String,
    /// Milliseconds since epoch
    pub timestamp: u64,
    pub outcome: ResponseOutcome,
}

/// A ranked differential entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hypothesis {
    pub label: String,
    /// Probability in percent (0-100)
    pub probability: u8,
}

/// A test that was ordered during the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedTest {
    pub id: String,
    pub cost: u32,
}

/// Mutable record of an in-progress consultation
///
/// Invariants:
/// - `total_cost` always equals the sum of the costs in `ordered_tests`
/// - each test id appears at most once in `ordered_tests`
/// - a hypothesis label appears at most once; the last write wins
///
/// # Example
///
/// ```
/// use dxo_domain::deliberation::DeliberationState;
///
/// let mut state = DeliberationState::new();
/// state.order_test("cbc", 200);
/// state.order_test("cbc", 200);
/// assert_eq!(state.total_cost(), 200);
///
/// state.set_hypothesis("Influenza", 30);
/// state.set_hypothesis("Influenza", 55);
/// assert_eq!(state.top_hypotheses(1)[0].probability, 55);
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeliberationState {
    history: Vec<HistoryEntry>,
    hypotheses: Vec<Hypothesis>,
    ordered_tests: Vec<OrderedTest>,
    total_cost: u32,
    iteration_count: u32,
}

impl DeliberationState {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== History ====================

    /// Append an answered response
    pub fn record_response(&mut self, agent: impl Into<String>, text: impl Into<String>) {
        self.push_history(agent.into(), text.into(), ResponseOutcome::Answered);
    }

    /// Append the stand-in note for an agent whose backend call failed
    pub fn record_unavailable(&mut self, agent: impl Into<String>) -> String {
        let agent = agent.into();
        let note = unavailable_note(&agent);
        self.push_history(agent, note.clone(), ResponseOutcome::Unavailable);
        note
    }

    fn push_history(&mut self, agent: String, response: String, outcome: ResponseOutcome) {
        self.history.push(HistoryEntry {
            agent,
            response,
            timestamp: current_timestamp(),
            outcome,
        });
    }

    /// The full, untrimmed history
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// The most recent `window` entries, used to bound prompt size.
    ///
    /// Does not drop anything from the full history.
    pub fn recent_history(&self, window: usize) -> &[HistoryEntry] {
        let start = self.history.len().saturating_sub(window);
        &self.history[start..]
    }

    pub fn answered_count(&self) -> usize {
        self.history
            .iter()
            .filter(|h| h.outcome == ResponseOutcome::Answered)
            .count()
    }

    pub fn unavailable_count(&self) -> usize {
        self.history.len() - self.answered_count()
    }

    // ==================== Hypotheses ====================

    /// Set the probability of a diagnosis label (case-sensitive).
    ///
    /// Overwrites any earlier value for the same label in place, so the
    /// label keeps its original insertion position for tie-breaking.
    pub fn set_hypothesis(&mut self, label: impl Into<String>, probability: u8) {
        let label = label.into();
        let probability = probability.min(100);
        match self.hypotheses.iter_mut().find(|h| h.label == label) {
            Some(existing) => existing.probability = probability,
            None => self.hypotheses.push(Hypothesis { label, probability }),
        }
    }

    /// The `n` most probable hypotheses, descending; ties keep insertion order
    pub fn top_hypotheses(&self, n: usize) -> Vec<Hypothesis> {
        let mut ranked = self.hypotheses.clone();
        ranked.sort_by(|a, b| b.probability.cmp(&a.probability));
        ranked.truncate(n);
        ranked
    }

    pub fn hypotheses(&self) -> &[Hypothesis] {
        &self.hypotheses
    }

    // ==================== Tests & cost ====================

    /// Order a test. Returns `false` (and changes nothing) if it was already ordered.
    pub fn order_test(&mut self, test_id: impl Into<String>, cost: u32) -> bool {
        let id = test_id.into();
        if self.has_test(&id) {
            return false;
        }
        self.total_cost = self.total_cost.saturating_add(cost);
        self.ordered_tests.push(OrderedTest { id, cost });
        true
    }

    pub fn has_test(&self, test_id: &str) -> bool {
        self.ordered_tests.iter().any(|t| t.id == test_id)
    }

    pub fn ordered_tests(&self) -> &[OrderedTest] {
        &self.ordered_tests
    }

    pub fn total_cost(&self) -> u32 {
        self.total_cost
    }

    // ==================== Iterations ====================

    pub fn increment_iteration(&mut self) {
        self.iteration_count += 1;
    }

    pub fn iteration_count(&self) -> u32 {
        self.iteration_count
    }
}

/// Stand-in text recorded when an agent's backend is down
pub fn unavailable_note(agent: &str) -> String {
    format!("{} is temporarily unavailable.", agent)
}

fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

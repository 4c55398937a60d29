//! Vote types for ensemble aggregation

use crate::diagnosis::DiagnosisResult;
use serde::{Deserialize, Serialize};

/// One panel's contribution to an ensemble vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelVote {
    /// Zero-based index of the sub-run
    pub panel: usize,
    pub diagnosis: String,
    pub confidence: u8,
    pub total_cost: u32,
}

impl PanelVote {
    pub fn from_result(panel: usize, result: &DiagnosisResult) -> Self {
        Self {
            panel,
            diagnosis: result.final_diagnosis.clone(),
            confidence: result.confidence,
            total_cost: result.total_cost,
        }
    }
}

/// Tally of panel votes
///
/// Labels are compared exactly. Ties go to the label that was seen first.
///
/// # Example
///
/// ```
/// use dxo_domain::ensemble::{EnsembleTally, PanelVote};
///
/// let votes = vec![
///     PanelVote { panel: 0, diagnosis: "flu".into(), confidence: 60, total_cost: 200 },
///     PanelVote { panel: 1, diagnosis: "flu".into(), confidence: 70, total_cost: 300 },
///     PanelVote { panel: 2, diagnosis: "cold".into(), confidence: 80, total_cost: 0 },
/// ];
/// let tally = EnsembleTally::from_votes(votes);
///
/// assert_eq!(tally.winner(), Some("flu"));
/// assert_eq!(tally.mean_confidence(), 70);
/// assert_eq!(tally.vote_summary(), "[flu 2, cold 1]");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleTally {
    /// (label, count) in first-seen order
    counts: Vec<(String, usize)>,
    votes: Vec<PanelVote>,
}

impl EnsembleTally {
    pub fn from_votes(votes: Vec<PanelVote>) -> Self {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for vote in &votes {
            match counts.iter_mut().find(|(label, _)| *label == vote.diagnosis) {
                Some(entry) => entry.1 += 1,
                None => counts.push((vote.diagnosis.clone(), 1)),
            }
        }
        Self { counts, votes }
    }

    /// Majority label; the earliest label wins a tie
    pub fn winner(&self) -> Option<&str> {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.counts {
            // Strictly greater keeps the first-seen label on ties
            if best.is_none_or(|b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(label, _)| label.as_str())
    }

    pub fn winner_count(&self) -> usize {
        self.counts.iter().map(|(_, c)| *c).max().unwrap_or(0)
    }

    pub fn total_votes(&self) -> usize {
        self.votes.len()
    }

    pub fn is_unanimous(&self) -> bool {
        self.counts.len() == 1
    }

    /// Mean confidence, rounded half up
    pub fn mean_confidence(&self) -> u8 {
        let sum: u64 = self.votes.iter().map(|v| u64::from(v.confidence)).sum();
        rounded_mean(sum, self.votes.len()).min(100) as u8
    }

    /// Mean total cost, rounded half up
    pub fn mean_cost(&self) -> u32 {
        let sum: u64 = self.votes.iter().map(|v| u64::from(v.total_cost)).sum();
        rounded_mean(sum, self.votes.len()).min(u64::from(u32::MAX)) as u32
    }

    pub fn votes(&self) -> &[PanelVote] {
        &self.votes
    }

    /// Compact summary, e.g. "[flu 2, cold 1]"
    pub fn vote_summary(&self) -> String {
        let parts: Vec<String> = self
            .counts
            .iter()
            .map(|(label, count)| format!("{} {}", label, count))
            .collect();
        format!("[{}]", parts.join(", "))
    }
}

fn rounded_mean(sum: u64, n: usize) -> u64 {
    if n == 0 {
        return 0;
    }
    let n = n as u64;
    (sum + n / 2) / n
}

/// Fold sub-run results into a single ensemble result.
///
/// Differential, tests and management plan come from the first run as-is.
/// Iterations report the longest sub-run. Returns `None` for no runs.
pub fn aggregate(results: &[DiagnosisResult]) -> Option<DiagnosisResult> {
    let first = results.first()?;
    let tally = EnsembleTally::from_votes(
        results
            .iter()
            .enumerate()
            .map(|(i, r)| PanelVote::from_result(i, r))
            .collect(),
    );

    Some(DiagnosisResult {
        final_diagnosis: tally.winner().unwrap_or(&first.final_diagnosis).to_string(),
        confidence: tally.mean_confidence(),
        differential: first.differential.clone(),
        recommended_tests: first.recommended_tests.clone(),
        total_cost: tally.mean_cost(),
        iterations: results.iter().map(|r| r.iterations).max().unwrap_or(0),
        reasoning: format!(
            "Ensemble consensus from {} independent panels {}",
            tally.total_votes(),
            tally.vote_summary()
        ),
        management_plan: first.management_plan.clone(),
        accuracy_score: first.accuracy_score,
    })
}

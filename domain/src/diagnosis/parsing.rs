//! Free-text extraction for the result synthesizer.
//!
//! Pure functions over agent output. No function here fails: a miss is
//! `None` (or the documented default in [`synthesize`]).

use super::result::{DiagnosisResult, RecommendedTest};
use crate::deliberation::{DeliberationState, Hypothesis, TestCatalog};
use regex::Regex;
use std::sync::LazyLock;

pub const DEFAULT_DIAGNOSIS: &str = "Requires clinical evaluation";
pub const DEFAULT_CONFIDENCE: u8 = 70;
pub const DEFAULT_MANAGEMENT: &str = "Consult physician for detailed evaluation.";
pub const TEST_RATIONALE: &str = "Recommended by diagnostic panel";
pub const DIFFERENTIAL_SIZE: usize = 3;

static RE_DIAGNOSIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:diagnosis|diagnose):[ \t]*([^\n.]+)").expect("valid regex")
});
static RE_CONFIDENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:confidence|certainty):[ \t]*(\d+)[ \t]*%").expect("valid regex")
});
static RE_MANAGEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:management|treatment|plan):[ \t]*([^\n]*(?:\n[^\n]*\S[^\n]*)*)")
        .expect("valid regex")
});
static RE_RANKED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\.\s*([^(\n]+?)\s*\((\d{1,3})\s*%\)").expect("valid regex")
});
static RE_SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)score\s*[:=]?\s*([1-5])\b").expect("valid regex"));
static RE_OUT_OF_FIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([1-5])\s*/\s*5\b").expect("valid regex"));

/// First `Diagnosis:` / `Diagnose:` label, up to the next sentence or line end
pub fn extract_diagnosis(text: &str) -> Option<String> {
    RE_DIAGNOSIS
        .captures(text)
        .map(|c| c[1].trim().trim_matches('*').trim().to_string())
        .filter(|s| !s.is_empty())
}

/// First `Confidence:` / `Certainty:` percentage, clamped to 100
pub fn extract_confidence(text: &str) -> Option<u8> {
    RE_CONFIDENCE
        .captures(text)
        .map(|c| c[1].parse::<u64>().map_or(100, |n| n.min(100)) as u8)
}

/// First `Management:` / `Treatment:` / `Plan:` block.
///
/// The block runs from the label to the first blank line.
pub fn extract_management(text: &str) -> Option<String> {
    RE_MANAGEMENT
        .captures(text)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Ranked entries of the form `1. Label (70%)`, in text order.
///
/// # Example
///
/// ```
/// use dxo_domain::diagnosis::parse_ranked_hypotheses;
///
/// let ranked = parse_ranked_hypotheses("1. Acute coronary syndrome (70%) 2. GERD (20%)");
/// assert_eq!(ranked[0].label, "Acute coronary syndrome");
/// assert_eq!(ranked[1].probability, 20);
/// ```
pub fn parse_ranked_hypotheses(text: &str) -> Vec<Hypothesis> {
    RE_RANKED
        .captures_iter(text)
        .filter_map(|c| {
            let label = c[2].trim().trim_matches(['*', '[', ']']).trim().to_string();
            let probability = c[3].parse::<u16>().ok()?.min(100) as u8;
            (!label.is_empty()).then_some(Hypothesis { label, probability })
        })
        .collect()
}

/// Judge score on the 1-5 scale, if the text states one
pub fn parse_accuracy_score(text: &str) -> Option<u8> {
    RE_SCORE
        .captures(text)
        .or_else(|| RE_OUT_OF_FIVE.captures(text))
        .and_then(|c| c[1].parse().ok())
}

/// Build the structured result of a run from its final text and state.
///
/// The differential comes from the state, not the text: hypotheses only show
/// up here if they were recorded with `set_hypothesis` during the run.
pub fn synthesize(text: &str, state: &DeliberationState, catalog: &TestCatalog) -> DiagnosisResult {
    DiagnosisResult {
        final_diagnosis: extract_diagnosis(text).unwrap_or_else(|| DEFAULT_DIAGNOSIS.to_string()),
        confidence: extract_confidence(text).unwrap_or(DEFAULT_CONFIDENCE),
        differential: state.top_hypotheses(DIFFERENTIAL_SIZE),
        recommended_tests: state
            .ordered_tests()
            .iter()
            .map(|t| RecommendedTest {
                test: t.id.clone(),
                cost: catalog.cost_of(&t.id),
                rationale: TEST_RATIONALE.to_string(),
            })
            .collect(),
        total_cost: state.total_cost(),
        iterations: state.iteration_count(),
        reasoning: text.to_string(),
        management_plan: extract_management(text)
            .unwrap_or_else(|| DEFAULT_MANAGEMENT.to_string()),
        accuracy_score: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Field extraction ====================

    #[test]
    fn test_extract_diagnosis() {
        assert_eq!(
            extract_diagnosis("Final diagnosis: Community-acquired pneumonia. Start antibiotics."),
            Some("Community-acquired pneumonia".to_string())
        );
        assert_eq!(
            extract_diagnosis("DIAGNOSE: Migraine\nmore text"),
            Some("Migraine".to_string())
        );
        assert_eq!(extract_diagnosis("No label here"), None);
    }

    #[test]
    fn test_extract_confidence() {
        assert_eq!(extract_confidence("Confidence: 85%"), Some(85));
        assert_eq!(extract_confidence("certainty: 60 %"), Some(60));
        assert_eq!(extract_confidence("Confidence: 400%"), Some(100));
        assert_eq!(extract_confidence("Confidence: 1000%"), Some(100));
        assert_eq!(extract_confidence("Confidence: 123456789012345678901234%"), Some(100));
        assert_eq!(extract_confidence("Confidence: high"), None);
    }

    #[test]
    fn test_extract_management_multiline() {
        let text = "Diagnosis: Flu\nManagement: Rest and fluids\nParacetamol for fever\n\nUnrelated trailer";
        assert_eq!(
            extract_management(text),
            Some("Rest and fluids\nParacetamol for fever".to_string())
        );
    }

    #[test]
    fn test_extract_management_label_on_own_line() {
        let text = "Treatment:\n- oral rehydration\n- zinc";
        assert_eq!(
            extract_management(text),
            Some("- oral rehydration\n- zinc".to_string())
        );
    }

    #[test]
    fn test_parse_ranked_hypotheses() {
        let ranked = parse_ranked_hypotheses(
            "1. Acute coronary syndrome (70%)\n2. Pulmonary embolism (20%)\n3. [GERD] (10%)",
        );
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].label, "Acute coronary syndrome");
        assert_eq!(ranked[0].probability, 70);
        assert_eq!(ranked[2].label, "GERD");
    }

    #[test]
    fn test_parse_accuracy_score() {
        assert_eq!(parse_accuracy_score("Score: 4\nGood reasoning"), Some(4));
        assert_eq!(parse_accuracy_score("I would give this 3/5."), Some(3));
        assert_eq!(parse_accuracy_score("Score: 9"), None);
        assert_eq!(parse_accuracy_score("no verdict"), None);
    }

    // ==================== synthesize ====================

    #[test]
    fn test_synthesize_falls_back_to_defaults() {
        let state = DeliberationState::new();
        let result = synthesize("The panel could not agree.", &state, &TestCatalog::default());

        assert_eq!(result.final_diagnosis, DEFAULT_DIAGNOSIS);
        assert_eq!(result.confidence, DEFAULT_CONFIDENCE);
        assert_eq!(result.management_plan, DEFAULT_MANAGEMENT);
        assert!(result.differential.is_empty());
        assert!(result.recommended_tests.is_empty());
    }

    #[test]
    fn test_synthesize_uses_state_for_differential_and_tests() {
        let mut state = DeliberationState::new();
        state.set_hypothesis("Influenza", 60);
        state.set_hypothesis("Dengue", 25);
        state.set_hypothesis("Malaria", 10);
        state.set_hypothesis("COVID-19", 5);
        state.order_test("cbc", 200);
        state.order_test("genome_panel", 500);
        state.increment_iteration();

        let text = "Diagnosis: Influenza\nConfidence: 80%\nPlan: fluids";
        let result = synthesize(text, &state, &TestCatalog::default());

        assert_eq!(result.final_diagnosis, "Influenza");
        assert_eq!(result.confidence, 80);
        assert_eq!(result.differential.len(), DIFFERENTIAL_SIZE);
        assert_eq!(result.differential[0].label, "Influenza");
        assert_eq!(result.recommended_tests[0].cost, 200);
        assert_eq!(result.recommended_tests[1].cost, 500);
        assert_eq!(result.recommended_tests[0].rationale, TEST_RATIONALE);
        assert_eq!(result.total_cost, 700);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.management_plan, "fluids");
    }
}

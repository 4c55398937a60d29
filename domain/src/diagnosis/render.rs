//! Chat-format rendering of a diagnosis result

use super::result::DiagnosisResult;
use std::fmt::Write;

pub const DISCLAIMER: &str =
    "⚠️ *AI guidance only. Consult qualified physician for diagnosis and treatment.*";

const HEADER: &str = "🏥 **MAI-DxO DIAGNOSTIC PANEL REPORT**";

/// Render the user-facing summary of a result.
///
/// Pure template substitution. The differential section only appears when
/// there is more than one entry; the tests section only when tests were
/// ordered. The disclaimer is always last.
pub fn render_report(result: &DiagnosisResult) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "{}\n", HEADER);
    let _ = writeln!(
        out,
        "**Primary Diagnosis:** {} ({}% confidence)\n",
        result.final_diagnosis, result.confidence
    );

    if result.differential.len() > 1 {
        out.push_str("**Differential Diagnoses:**\n");
        for (i, h) in result.differential.iter().enumerate() {
            let _ = writeln!(out, "{}. {} ({}%)", i + 1, h.label, h.probability);
        }
        out.push('\n');
    }

    if !result.recommended_tests.is_empty() {
        out.push_str("**Recommended Tests:**\n");
        for test in &result.recommended_tests {
            let _ = writeln!(out, "• {} - ₹{}", test.test, test.cost);
        }
        let _ = writeln!(out, "**Total Cost:** ₹{}\n", result.total_cost);
    }

    let _ = writeln!(out, "**Management Plan:**\n{}\n", result.management_plan);
    out.push_str(DISCLAIMER);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deliberation::Hypothesis;
    use crate::diagnosis::RecommendedTest;

    fn sample() -> DiagnosisResult {
        DiagnosisResult {
            final_diagnosis: "Influenza".to_string(),
            confidence: 80,
            differential: vec![Hypothesis {
                label: "Influenza".to_string(),
                probability: 80,
            }],
            recommended_tests: vec![],
            total_cost: 0,
            iterations: 1,
            reasoning: String::new(),
            management_plan: "Rest and fluids".to_string(),
            accuracy_score: None,
        }
    }

    #[test]
    fn test_render_minimal_report() {
        let text = render_report(&sample());

        assert!(text.starts_with(HEADER));
        assert!(text.contains("**Primary Diagnosis:** Influenza (80% confidence)"));
        assert!(!text.contains("Differential Diagnoses"));
        assert!(!text.contains("Recommended Tests"));
        assert!(text.contains("**Management Plan:**\nRest and fluids"));
        assert!(text.ends_with(DISCLAIMER));
    }

    #[test]
    fn test_render_full_report() {
        let mut result = sample();
        result.differential.push(Hypothesis {
            label: "Dengue".to_string(),
            probability: 15,
        });
        result.recommended_tests = vec![RecommendedTest {
            test: "cbc".to_string(),
            cost: 200,
            rationale: "Recommended by diagnostic panel".to_string(),
        }];
        result.total_cost = 200;

        let text = render_report(&result);
        assert!(text.contains("1. Influenza (80%)\n2. Dengue (15%)"));
        assert!(text.contains("• cbc - ₹200"));
        assert!(text.contains("**Total Cost:** ₹200"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let result = sample();
        assert_eq!(render_report(&result), render_report(&result));
    }
}

//! Console output formatter for consultation results

use colored::Colorize;
use dxo_domain::diagnosis::DISCLAIMER;
use dxo_domain::{DiagnosisResult, render_report};

/// Formats consultation results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Colored breakdown of every field of the result
    pub fn format(result: &DiagnosisResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Diagnostic Panel Report"));
        output.push('\n');

        output.push_str(&format!(
            "\n{} {} {}\n",
            "Primary Diagnosis:".cyan().bold(),
            result.final_diagnosis.bold(),
            Self::confidence(result.confidence)
        ));

        if let Some(score) = result.accuracy_score {
            output.push_str(&format!("{} {}/5\n", "Judge Score:".cyan().bold(), score));
        }

        if !result.differential.is_empty() {
            output.push_str(&Self::section_header("Differential"));
            for (i, hypothesis) in result.differential.iter().enumerate() {
                output.push_str(&format!(
                    "  {}. {} ({}%)\n",
                    i + 1,
                    hypothesis.label,
                    hypothesis.probability
                ));
            }
        }

        output.push_str(&Self::section_header("Recommended Tests"));
        if result.recommended_tests.is_empty() {
            output.push_str(&format!("  {}\n", "none ordered".dimmed()));
        } else {
            for test in &result.recommended_tests {
                output.push_str(&format!(
                    "  * {} {}\n",
                    test.test.yellow(),
                    format!("₹{}", test.cost).dimmed()
                ));
            }
        }
        output.push_str(&format!(
            "  {} ₹{}\n",
            "Total Cost:".bold(),
            result.total_cost
        ));

        output.push_str(&Self::section_header("Management Plan"));
        output.push_str(&result.management_plan);
        output.push('\n');

        output.push_str(&format!(
            "\n{} {}\n",
            "Rounds:".dimmed(),
            result.iterations.to_string().dimmed()
        ));

        output.push_str(&Self::footer());
        output
    }

    /// The chat-format report, as sent to end users
    pub fn format_report(result: &DiagnosisResult) -> String {
        render_report(result)
    }

    /// Format as JSON
    pub fn format_json(result: &DiagnosisResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    fn confidence(confidence: u8) -> String {
        let text = format!("({}% confidence)", confidence);
        match confidence {
            70..=100 => text.green().to_string(),
            40..=69 => text.yellow().to_string(),
            _ => text.red().to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n{}\n", "=".repeat(60).cyan(), DISCLAIMER.dimmed())
    }
}

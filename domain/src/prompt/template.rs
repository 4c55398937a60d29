//! Prompt templates for the diagnostic panel

use crate::agent::AgentDefinition;
use crate::core::query::CaseQuery;
use crate::deliberation::DeliberationState;
use crate::orchestration::RunOptions;

/// Closing line every general-guidance answer must carry
pub const FALLBACK_DISCLAIMER: &str =
    "⚠️ This is general guidance only. Please consult a qualified doctor for proper diagnosis and treatment.";

/// Returned when no backend can answer at all
pub const STATIC_FALLBACK: &str = "I apologize, but I'm experiencing technical difficulties. Please try again in a moment. ⚠️ This is general guidance only. Please consult a qualified doctor for proper diagnosis and treatment.";

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Initial case context shared by every agent of a run
    pub fn case_context(query: &CaseQuery, options: &RunOptions) -> String {
        format!(
            "Patient: {} years old\nQuery: {}\nContext: {}\nBudget: ₹{}\nMode: {}\nLanguage: {}",
            options.age,
            query.content(),
            options.patient_context,
            options.budget,
            options.mode,
            options.language
        )
    }

    /// Full prompt for one agent dispatch.
    ///
    /// Only the last `history_window` history entries are included; the
    /// state itself keeps the full trail.
    pub fn agent_prompt(
        agent: &AgentDefinition,
        context: &str,
        state: &DeliberationState,
        history_window: usize,
    ) -> String {
        let discussion = state
            .recent_history(history_window)
            .iter()
            .map(|h| format!("{}: {}", h.agent, h.response))
            .collect::<Vec<_>>()
            .join("\n");
        let hypotheses = state
            .hypotheses()
            .iter()
            .map(|h| format!("{} ({}%)", h.label, h.probability))
            .collect::<Vec<_>>()
            .join(", ");
        let tests = state
            .ordered_tests()
            .iter()
            .map(|t| t.id.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"{}

Current case context:
{}

Recent discussion:
{}

Current hypotheses: {}
Tests ordered: {}
Total cost so far: ₹{}

Provide your assessment:"#,
            agent.instruction,
            context,
            discussion,
            hypotheses,
            tests,
            state.total_cost()
        )
    }

    // ==================== Question rounds ====================

    pub fn ask_questions(context: &str) -> String {
        format!(
            "{}\nDecide what additional history questions to ask (max 3).\nIf the history is already sufficient, reply DECISION: DIAGNOSE.",
            context
        )
    }

    pub fn answer_questions(context: &str, questions: &str) -> String {
        format!(
            "{}\nQuestions asked: {}\nProvide realistic patient responses.",
            context, questions
        )
    }

    /// Context line appended after a question round
    pub fn question_exchange(questions: &str, answers: &str) -> String {
        format!("\n\nQ: {}\nA: {}", questions, answers)
    }

    // ==================== Test rounds ====================

    pub fn choose_tests(context: &str, remaining_budget: u32) -> String {
        format!("{}\nBudget remaining: ₹{}", context, remaining_budget)
    }

    pub fn review_costs(context: &str, suggested: &str, remaining_budget: u32) -> String {
        format!(
            "{}\nTests suggested: {}\nBudget: ₹{}",
            context, suggested, remaining_budget
        )
    }

    pub fn decide(
        hypothesis: &str,
        tests: &str,
        stewardship: &str,
        remaining_budget: u32,
    ) -> String {
        format!(
            "Hypothesis: {}\nTests: {}\nStewardship: {}\nBudget: ₹{}\n\nDecide: ask questions, order specific tests, or diagnose?",
            hypothesis, tests, stewardship, remaining_budget
        )
    }

    pub fn test_result(context: &str, test_id: &str) -> String {
        format!(
            "{}\nProvide realistic result for {} given the case",
            context, test_id
        )
    }

    /// Context line appended for a fetched test result
    pub fn test_result_line(test_id: &str, result: &str) -> String {
        format!("\n{} result: {}", test_id, result)
    }

    // ==================== Synthesis ====================

    /// Closing request for the final hypothesis and challenger opinions
    pub fn final_opinion(context: &str) -> String {
        format!(
            "{}\n\nGive your final opinion. Include the lines \"Diagnosis: <label>\", \"Confidence: <N>%\" and \"Management: <plan>\".",
            context
        )
    }

    pub fn merge_opinions(hypothesis: &str, challenger: &str) -> String {
        format!(
            "{}\n\nChallenger view: {}\n\nProvide final diagnosis and management plan.\nUse the lines \"Diagnosis:\", \"Confidence: N%\" and \"Management:\".",
            hypothesis, challenger
        )
    }

    pub fn evaluate(context: &str, diagnosis: &str, challenge: &str) -> String {
        format!(
            "Case: {}\nDiagnosis: {}\nChallenge: {}\n\nEvaluate the diagnosis.",
            context, diagnosis, challenge
        )
    }

    // ==================== Fallback ====================

    /// Single-backend general-guidance prompt
    pub fn general_guidance(query: &CaseQuery, options: &RunOptions) -> String {
        format!(
            r#"You are a helpful healthcare assistant. Provide medical guidance but always include disclaimers to consult healthcare professionals. Keep responses concise but informative.

User context: age {}, language {}, {}

Structure your response as:
1. Brief assessment
2. Recommendations
3. Important disclaimer

Always end with: "{}"

Question: {}"#,
            options.age,
            options.language,
            options.patient_context,
            FALLBACK_DISCLAIMER,
            query.content()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentRegistry, AgentRole};

    fn query() -> CaseQuery {
        CaseQuery::try_new("sudden chest pain").unwrap()
    }

    #[test]
    fn test_case_context_format() {
        let options = RunOptions::default().with_age("54");
        let context = PromptTemplate::case_context(&query(), &options);

        assert!(context.starts_with("Patient: 54 years old"));
        assert!(context.contains("Query: sudden chest pain"));
        assert!(context.contains("Budget: ₹5000"));
        assert!(context.contains("Mode: budgeted"));
    }

    #[test]
    fn test_agent_prompt_includes_state() {
        let mut state = DeliberationState::new();
        state.record_response("Dr. Hypothesis", "1. ACS (70%)");
        state.set_hypothesis("ACS", 70);
        state.order_test("ecg", 150);

        let agent = AgentRegistry::get(AgentRole::TestStrategist);
        let prompt = PromptTemplate::agent_prompt(agent, "ctx", &state, 10);

        assert!(prompt.starts_with(agent.instruction));
        assert!(prompt.contains("Dr. Hypothesis: 1. ACS (70%)"));
        assert!(prompt.contains("Current hypotheses: ACS (70%)"));
        assert!(prompt.contains("Tests ordered: ecg"));
        assert!(prompt.contains("Total cost so far: ₹150"));
    }

    #[test]
    fn test_agent_prompt_respects_history_window() {
        let mut state = DeliberationState::new();
        for i in 0..12 {
            state.record_response("Agent", format!("reply-{}", i));
        }
        let agent = AgentRegistry::get(AgentRole::Coordinator);
        let prompt = PromptTemplate::agent_prompt(agent, "ctx", &state, 10);

        assert!(!prompt.contains("reply-1\n"));
        assert!(prompt.contains("reply-2"));
        assert!(prompt.contains("reply-11"));
        assert_eq!(state.history().len(), 12);
    }

    #[test]
    fn test_general_guidance_carries_disclaimer() {
        let prompt = PromptTemplate::general_guidance(&query(), &RunOptions::default());
        assert!(prompt.contains(FALLBACK_DISCLAIMER));
        assert!(prompt.ends_with("Question: sudden chest pain"));
        assert!(STATIC_FALLBACK.ends_with(FALLBACK_DISCLAIMER));
    }
}

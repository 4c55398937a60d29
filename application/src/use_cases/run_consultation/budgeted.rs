//! Budgeted mode: panel rounds with test ordering under a cost ceiling.
//!
//! Also drives the no-budget mode (same loop, sentinel budget) and every
//! ensemble sub-run.

use super::RunConsultationUseCase;
use super::types::ConsultationError;
use crate::ports::backend_gateway::BackendGateway;
use crate::ports::progress::ProgressNotifier;
use crate::ports::transcript_logger::TranscriptEvent;
use crate::use_cases::shared::check_cancelled;
use dxo_domain::diagnosis::parse_accuracy_score;
use dxo_domain::{
    AgentRole, CoordinatorDecision, DeliberationState, DiagnosisResult, Phase, PromptTemplate,
    synthesize,
};
use serde_json::json;
use tracing::{debug, info};

impl<G: BackendGateway + 'static> RunConsultationUseCase<G> {
    pub(super) async fn run_budgeted(
        &self,
        context: &str,
        state: &mut DeliberationState,
        max_iterations: u32,
        budget: u32,
        progress: &dyn ProgressNotifier,
    ) -> Result<DiagnosisResult, ConsultationError> {
        let mut context = context.to_string();
        let mut remaining = budget;

        for round in 1..=max_iterations {
            check_cancelled(&self.cancellation_token)?;
            if remaining == 0 {
                info!(round, "Budget exhausted");
                break;
            }
            state.increment_iteration();
            progress.on_round_start(round, max_iterations);
            info!(round, remaining, "Panel round");

            // The steward reviews the strategist's picks, so it runs after the pair
            let (hypothesis, tests) = self
                .consult_pair(
                    state,
                    Phase::Gathering,
                    (AgentRole::DifferentialDiagnostician, context.clone()),
                    (
                        AgentRole::TestStrategist,
                        PromptTemplate::choose_tests(&context, remaining),
                    ),
                    progress,
                )
                .await?;

            let stewardship = self
                .consult(
                    state,
                    Phase::Gathering,
                    AgentRole::CostSteward,
                    PromptTemplate::review_costs(&context, &tests, remaining),
                    progress,
                )
                .await?;

            let decision_text = self
                .consult(
                    state,
                    Phase::Gathering,
                    AgentRole::Coordinator,
                    PromptTemplate::decide(&hypothesis, &tests, &stewardship, remaining),
                    progress,
                )
                .await?;

            match CoordinatorDecision::parse(&decision_text) {
                CoordinatorDecision::Diagnose => {
                    debug!(round, "Coordinator is ready to diagnose");
                    break;
                }
                CoordinatorDecision::OrderTests => {
                    remaining = self
                        .order_tests(state, &decision_text, remaining, &mut context, progress)
                        .await?;
                }
                CoordinatorDecision::AskQuestions => {}
            }
        }

        self.synthesize_final(&context, state, progress).await
    }

    /// Order the tests named in a coordinator decision and fetch their results.
    ///
    /// Returns the remaining budget.
    async fn order_tests(
        &self,
        state: &mut DeliberationState,
        decision_text: &str,
        mut remaining: u32,
        context: &mut String,
        progress: &dyn ProgressNotifier,
    ) -> Result<u32, ConsultationError> {
        let mut ordered = Vec::new();

        for test in self
            .catalog
            .extract_tests(decision_text, self.params.max_tests_per_round)
        {
            if state.has_test(&test) {
                debug!(test = %test, "Test already ordered");
                continue;
            }
            let cost = self.catalog.cost_of(&test);
            if cost > remaining {
                info!(test = %test, cost, remaining, "Test exceeds remaining budget");
                self.transcript.log(TranscriptEvent::new(
                    "test_skipped",
                    json!({ "test": test, "cost": cost, "remaining": remaining }),
                ));
                continue;
            }

            state.order_test(test.clone(), cost);
            remaining -= cost;
            info!(test = %test, cost, remaining, "Test ordered");
            self.transcript.log(TranscriptEvent::new(
                "test_ordered",
                json!({ "test": test, "cost": cost, "remaining": remaining }),
            ));
            ordered.push(test);
        }

        if ordered.is_empty() {
            return Ok(remaining);
        }

        let requests = ordered
            .iter()
            .map(|test| {
                (
                    AgentRole::InformationProvider,
                    PromptTemplate::test_result(context.as_str(), test),
                )
            })
            .collect();
        let results = self
            .consult_all(state, Phase::Ordering, requests, progress)
            .await?;

        for (test, result) in ordered.iter().zip(results) {
            context.push_str(&PromptTemplate::test_result_line(test, &result));
        }

        Ok(remaining)
    }

    /// Final opinions, judge evaluation and result parsing
    async fn synthesize_final(
        &self,
        context: &str,
        state: &mut DeliberationState,
        progress: &dyn ProgressNotifier,
    ) -> Result<DiagnosisResult, ConsultationError> {
        check_cancelled(&self.cancellation_token)?;
        let final_context = PromptTemplate::final_opinion(context);
        let (hypothesis, challenge) = self
            .consult_pair(
                state,
                Phase::Synthesizing,
                (AgentRole::DifferentialDiagnostician, final_context.clone()),
                (AgentRole::DevilsAdvocate, final_context),
                progress,
            )
            .await?;

        let judgement = self
            .consult(
                state,
                Phase::Synthesizing,
                AgentRole::Evaluator,
                PromptTemplate::evaluate(context, &hypothesis, &challenge),
                progress,
            )
            .await?;

        let text = format!("{}\n{}", hypothesis, judgement);
        Ok(synthesize(&text, state, &self.catalog)
            .with_accuracy_score(parse_accuracy_score(&judgement)))
    }
}

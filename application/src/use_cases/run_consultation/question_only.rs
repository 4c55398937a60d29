//! Question-only mode: history-taking rounds, then one synthesis.

use super::RunConsultationUseCase;
use super::types::ConsultationError;
use crate::ports::backend_gateway::BackendGateway;
use crate::ports::progress::ProgressNotifier;
use crate::use_cases::shared::check_cancelled;
use dxo_domain::{
    AgentRole, CoordinatorDecision, DeliberationState, DiagnosisResult, Phase, PromptTemplate,
    synthesize,
};
use tracing::{debug, info};

impl<G: BackendGateway + 'static> RunConsultationUseCase<G> {
    pub(super) async fn run_question_only(
        &self,
        context: &str,
        state: &mut DeliberationState,
        max_iterations: u32,
        progress: &dyn ProgressNotifier,
    ) -> Result<DiagnosisResult, ConsultationError> {
        let rounds = max_iterations.min(self.params.question_round_cap);
        let mut context = context.to_string();

        for round in 1..=rounds {
            check_cancelled(&self.cancellation_token)?;
            state.increment_iteration();
            progress.on_round_start(round, rounds);
            info!(round, rounds, "Question round");

            let questions = self
                .consult(
                    state,
                    Phase::Gathering,
                    AgentRole::Coordinator,
                    PromptTemplate::ask_questions(&context),
                    progress,
                )
                .await?;

            if CoordinatorDecision::parse(&questions).is_ready() {
                debug!(round, "Coordinator has enough history");
                break;
            }

            let answers = self
                .consult(
                    state,
                    Phase::Gathering,
                    AgentRole::InformationProvider,
                    PromptTemplate::answer_questions(&context, &questions),
                    progress,
                )
                .await?;
            context.push_str(&PromptTemplate::question_exchange(&questions, &answers));
        }

        check_cancelled(&self.cancellation_token)?;
        let final_context = PromptTemplate::final_opinion(&context);
        let (hypothesis, challenge) = self
            .consult_pair(
                state,
                Phase::Synthesizing,
                (AgentRole::DifferentialDiagnostician, final_context.clone()),
                (AgentRole::DevilsAdvocate, final_context),
                progress,
            )
            .await?;

        let synthesis = self
            .consult(
                state,
                Phase::Synthesizing,
                AgentRole::Coordinator,
                PromptTemplate::merge_opinions(&hypothesis, &challenge),
                progress,
            )
            .await?;

        Ok(synthesize(&synthesis, state, &self.catalog))
    }
}

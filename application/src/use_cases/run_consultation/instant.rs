//! Instant mode: one diagnostician pass.

use super::RunConsultationUseCase;
use super::types::ConsultationError;
use crate::ports::backend_gateway::BackendGateway;
use crate::ports::progress::ProgressNotifier;
use dxo_domain::diagnosis::{DIFFERENTIAL_SIZE, parse_ranked_hypotheses};
use dxo_domain::{AgentRole, DeliberationState, DiagnosisResult, Phase};

pub const INSTANT_FALLBACK_DIAGNOSIS: &str = "Requires further evaluation";
pub const INSTANT_FALLBACK_CONFIDENCE: u8 = 50;
pub const INSTANT_MANAGEMENT: &str = "Immediate medical consultation recommended.";

impl<G: BackendGateway + 'static> RunConsultationUseCase<G> {
    /// The top-ranked entry of the diagnostician's list is the result.
    /// Cost is the flat instant fee.
    pub(super) async fn run_instant(
        &self,
        context: &str,
        state: &mut DeliberationState,
        progress: &dyn ProgressNotifier,
    ) -> Result<DiagnosisResult, ConsultationError> {
        state.increment_iteration();
        let text = self
            .consult(
                state,
                Phase::Gathering,
                AgentRole::DifferentialDiagnostician,
                context.to_string(),
                progress,
            )
            .await?;

        let (final_diagnosis, confidence) = match parse_ranked_hypotheses(&text).into_iter().next()
        {
            Some(top) => (top.label, top.probability),
            None => (
                INSTANT_FALLBACK_DIAGNOSIS.to_string(),
                INSTANT_FALLBACK_CONFIDENCE,
            ),
        };

        Ok(DiagnosisResult {
            final_diagnosis,
            confidence,
            differential: state.top_hypotheses(DIFFERENTIAL_SIZE),
            recommended_tests: Vec::new(),
            total_cost: self.params.instant_fee,
            iterations: state.iteration_count(),
            reasoning: text,
            management_plan: INSTANT_MANAGEMENT.to_string(),
            accuracy_score: None,
        })
    }
}

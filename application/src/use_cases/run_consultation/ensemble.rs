//! Ensemble mode: independent budgeted panels merged by vote.

use super::RunConsultationUseCase;
use super::types::{ConsultationError, StrategyOutcome};
use crate::ports::backend_gateway::BackendGateway;
use crate::ports::progress::ProgressNotifier;
use crate::use_cases::shared::check_cancelled;
use dxo_domain::ensemble::aggregate;
use dxo_domain::{DeliberationState, RunOptions, synthesize};
use tracing::info;

impl<G: BackendGateway + 'static> RunConsultationUseCase<G> {
    /// Sub-runs execute one after another, each with its own state.
    pub(super) async fn run_ensemble(
        &self,
        context: &str,
        options: &RunOptions,
        progress: &dyn ProgressNotifier,
    ) -> Result<StrategyOutcome, ConsultationError> {
        let runs = self.params.ensemble_runs.max(1);
        let mut results = Vec::with_capacity(runs);
        let mut answered = 0;
        let mut unavailable = 0;

        for panel in 1..=runs {
            check_cancelled(&self.cancellation_token)?;
            progress.on_panel_start(panel, runs);
            info!(panel, runs, "Ensemble panel");

            let mut state = DeliberationState::new();
            let result = self
                .run_budgeted(
                    context,
                    &mut state,
                    options.max_iterations,
                    options.budget,
                    progress,
                )
                .await?;

            answered += state.answered_count();
            unavailable += state.unavailable_count();
            results.push(result);
        }

        let result = match aggregate(&results) {
            Some(result) => result,
            None => synthesize("", &DeliberationState::new(), &self.catalog),
        };
        info!(
            diagnosis = %result.final_diagnosis,
            confidence = result.confidence,
            "Ensemble consensus"
        );

        Ok(StrategyOutcome {
            result,
            answered,
            unavailable,
        })
    }
}

//! Agent dispatch for the RunConsultation use case.
//!
//! Every backend call of a run goes through [`consult_all`]: prompts are
//! built from one state snapshot, calls run concurrently in a `JoinSet`,
//! and every outcome is written back to the state in completion order.
//!
//! [`consult_all`]: RunConsultationUseCase::consult_all

use super::RunConsultationUseCase;
use super::types::ConsultationError;
use crate::ports::backend_gateway::{BackendError, BackendErrorKind, BackendGateway};
use crate::ports::progress::ProgressNotifier;
use crate::ports::transcript_logger::TranscriptEvent;
use crate::use_cases::shared::check_cancelled;
use dxo_domain::diagnosis::parse_ranked_hypotheses;
use dxo_domain::{AgentRegistry, AgentRole, BackendId, DeliberationState, Phase, PromptTemplate};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, warn};

impl<G: BackendGateway + 'static> RunConsultationUseCase<G> {
    /// Dispatch a single agent
    pub(super) async fn consult(
        &self,
        state: &mut DeliberationState,
        phase: Phase,
        role: AgentRole,
        task: String,
        progress: &dyn ProgressNotifier,
    ) -> Result<String, ConsultationError> {
        let texts = self
            .consult_all(state, phase, vec![(role, task)], progress)
            .await?;
        Ok(texts.into_iter().next().unwrap_or_default())
    }

    /// Dispatch two independent agents concurrently
    pub(super) async fn consult_pair(
        &self,
        state: &mut DeliberationState,
        phase: Phase,
        first: (AgentRole, String),
        second: (AgentRole, String),
        progress: &dyn ProgressNotifier,
    ) -> Result<(String, String), ConsultationError> {
        let mut texts = self
            .consult_all(state, phase, vec![first, second], progress)
            .await?
            .into_iter();
        Ok((
            texts.next().unwrap_or_default(),
            texts.next().unwrap_or_default(),
        ))
    }

    /// Dispatch agents concurrently and wait for all of them.
    ///
    /// Returns one text per request, in request order. A failed call yields
    /// its stand-in note; no failure cancels the other calls.
    pub(super) async fn consult_all(
        &self,
        state: &mut DeliberationState,
        phase: Phase,
        requests: Vec<(AgentRole, String)>,
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<String>, ConsultationError> {
        check_cancelled(&self.cancellation_token)?;
        progress.on_phase_start(&phase, requests.len());

        let mut join_set = JoinSet::new();

        for (index, (role, task)) in requests.iter().enumerate() {
            let agent = AgentRegistry::get(*role);
            let prompt =
                PromptTemplate::agent_prompt(agent, task, state, self.params.history_window);
            let backend = self.params.assignment.backend_for(*role).clone();
            let gateway = Arc::clone(&self.gateway);
            let max_tokens = self.params.max_tokens;
            let limit = self.params.call_timeout;
            let role = *role;

            debug!(agent = agent.name, backend = %backend, "Dispatching agent");
            join_set.spawn(async move {
                let result =
                    Self::invoke_with_timeout(&gateway, &backend, &prompt, max_tokens, limit).await;
                (index, role, backend, result)
            });
        }

        let mut texts: Vec<Option<String>> = vec![None; requests.len()];

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, role, backend, Ok(text))) => {
                    self.record_answer(state, role, &backend, &text);
                    progress.on_task_complete(&phase, role, true);
                    texts[index] = Some(text);
                }
                Ok((index, role, _, Err(e))) => {
                    let note = self.record_failure(state, role, &e);
                    progress.on_task_complete(&phase, role, false);
                    texts[index] = Some(note);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        // A task that panicked never reported back; it still gets a stand-in
        let mut out = Vec::with_capacity(texts.len());
        for (text, (role, _)) in texts.into_iter().zip(&requests) {
            match text {
                Some(text) => out.push(text),
                None => {
                    let backend = self.params.assignment.backend_for(*role).clone();
                    let error = BackendError::new(
                        backend,
                        BackendErrorKind::Connection("task aborted".to_string()),
                    );
                    progress.on_task_complete(&phase, *role, false);
                    out.push(self.record_failure(state, *role, &error));
                }
            }
        }

        progress.on_phase_complete(&phase);
        Ok(out)
    }

    /// Invoke a backend under a hard deadline
    pub(super) async fn invoke_with_timeout(
        gateway: &G,
        backend: &BackendId,
        prompt: &str,
        max_tokens: u32,
        limit: Duration,
    ) -> Result<String, BackendError> {
        match tokio::time::timeout(limit, gateway.invoke(backend, prompt, max_tokens)).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::new(
                backend.clone(),
                BackendErrorKind::Timeout(limit),
            )),
        }
    }

    fn record_answer(
        &self,
        state: &mut DeliberationState,
        role: AgentRole,
        backend: &BackendId,
        text: &str,
    ) {
        let agent = AgentRegistry::get(role);
        debug!(agent = agent.name, backend = %backend, "Agent responded");
        state.record_response(agent.name, text);

        if role == AgentRole::DifferentialDiagnostician {
            for hypothesis in parse_ranked_hypotheses(text) {
                state.set_hypothesis(hypothesis.label, hypothesis.probability);
            }
        }

        self.transcript.log(TranscriptEvent::new(
            "agent_response",
            json!({
                "agent": agent.name,
                "role": role.as_str(),
                "backend": backend.as_str(),
                "text": text,
            }),
        ));
    }

    fn record_failure(
        &self,
        state: &mut DeliberationState,
        role: AgentRole,
        error: &BackendError,
    ) -> String {
        let agent = AgentRegistry::get(role);
        warn!(agent = agent.name, backend = %error.backend, "Agent unavailable: {}", error.kind);

        self.transcript.log(TranscriptEvent::new(
            "agent_unavailable",
            json!({
                "agent": agent.name,
                "role": role.as_str(),
                "backend": error.backend.as_str(),
                "error": error.kind.to_string(),
            }),
        ));

        state.record_unavailable(agent.name)
    }
}

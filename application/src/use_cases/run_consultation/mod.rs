//! Run Consultation use case
//!
//! Drives one diagnostic consultation from query to result. The mode picks
//! the strategy:
//!
//! | Mode          | Rounds                          | Tests            | Synthesis            |
//! |---------------|---------------------------------|------------------|----------------------|
//! | Instant       | 1 (diagnostician only)          | none             | top-ranked entry     |
//! | Question-only | min(max_iterations, cap)        | none             | coordinator merge    |
//! | Budgeted      | max_iterations                  | within budget    | judge evaluation     |
//! | No budget     | max_iterations                  | sentinel budget  | judge evaluation     |
//! | Ensemble      | N budgeted panels               | per panel        | majority vote        |
//!
//! Backend failures never abort a run; the failed agent contributes a
//! stand-in note. Only a run that heard from no backend at all falls back to
//! the single-backend answer, and only on the text entry point.

mod budgeted;
mod dispatch;
mod ensemble;
mod fallback;
mod instant;
mod question_only;
mod types;

pub use instant::{INSTANT_FALLBACK_CONFIDENCE, INSTANT_FALLBACK_DIAGNOSIS, INSTANT_MANAGEMENT};
pub use types::{ConsultationError, RunConsultationInput};

use types::StrategyOutcome;

use crate::config::ConsultationParams;
use crate::ports::backend_gateway::BackendGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::transcript_logger::{NoTranscriptLogger, TranscriptEvent, TranscriptLogger};
use crate::use_cases::shared::check_cancelled;
use dxo_domain::{
    DeliberationState, DiagnosisResult, DiagnosticMode, PromptTemplate, TestCatalog,
    render_report,
};
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Use case for running a diagnostic consultation
pub struct RunConsultationUseCase<G: BackendGateway + 'static> {
    pub(super) gateway: Arc<G>,
    pub(super) params: ConsultationParams,
    pub(super) catalog: TestCatalog,
    pub(super) cancellation_token: Option<CancellationToken>,
    pub(super) transcript: Arc<dyn TranscriptLogger>,
}

impl<G: BackendGateway + 'static> Clone for RunConsultationUseCase<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            params: self.params.clone(),
            catalog: self.catalog.clone(),
            cancellation_token: self.cancellation_token.clone(),
            transcript: self.transcript.clone(),
        }
    }
}

impl<G: BackendGateway + 'static> RunConsultationUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            params: ConsultationParams::default(),
            catalog: TestCatalog::default(),
            cancellation_token: None,
            transcript: Arc::new(NoTranscriptLogger),
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_params(mut self, params: ConsultationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_catalog(mut self, catalog: TestCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Set a cancellation token, checked between rounds and dispatch steps
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn with_transcript(mut self, transcript: Arc<dyn TranscriptLogger>) -> Self {
        self.transcript = transcript;
        self
    }

    pub fn params(&self) -> &ConsultationParams {
        &self.params
    }

    pub fn catalog(&self) -> &TestCatalog {
        &self.catalog
    }

    // ==================== Entry Points ====================

    /// Run a consultation and return the structured result
    pub async fn execute(
        &self,
        input: RunConsultationInput,
    ) -> Result<DiagnosisResult, ConsultationError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Run a consultation with progress callbacks.
    ///
    /// A run in which every backend call failed still returns the
    /// synthesizer's default result.
    pub async fn execute_with_progress(
        &self,
        input: RunConsultationInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<DiagnosisResult, ConsultationError> {
        let outcome = self.run(&input, progress).await?;
        if outcome.answered == 0 {
            warn!(
                unavailable = outcome.unavailable,
                "No backend answered; returning default result"
            );
        }
        Ok(outcome.result)
    }

    /// Run a consultation and return the rendered report
    pub async fn execute_text(
        &self,
        input: RunConsultationInput,
    ) -> Result<String, ConsultationError> {
        self.execute_text_with_progress(input, &NoProgress).await
    }

    /// Run a consultation and return presentable text.
    ///
    /// Falls back to the single-backend answer when no panel call succeeded.
    /// Only cancellation is reported as an error.
    pub async fn execute_text_with_progress(
        &self,
        input: RunConsultationInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<String, ConsultationError> {
        let outcome = self.run(&input, progress).await?;
        match outcome.ensure_answered() {
            Ok(result) => Ok(render_report(&result)),
            Err(failure) => {
                warn!("Consultation failed ({}); using fallback", failure);
                Ok(self.fallback_text(&input).await)
            }
        }
    }

    async fn run(
        &self,
        input: &RunConsultationInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<StrategyOutcome, ConsultationError> {
        check_cancelled(&self.cancellation_token)?;

        let options = &input.options;
        let context = PromptTemplate::case_context(&input.query, options);
        info!(
            mode = %options.mode,
            max_iterations = options.max_iterations,
            budget = options.budget,
            "Starting consultation"
        );
        self.transcript.log(TranscriptEvent::new(
            "run_started",
            json!({
                "mode": options.mode.as_str(),
                "query": input.query.content(),
                "max_iterations": options.max_iterations,
                "budget": options.budget,
            }),
        ));

        let outcome = if options.mode == DiagnosticMode::Ensemble {
            self.run_ensemble(&context, options, progress).await?
        } else {
            let mut state = DeliberationState::new();
            let result = match options.mode {
                DiagnosticMode::Instant => self.run_instant(&context, &mut state, progress).await?,
                DiagnosticMode::QuestionOnly => {
                    self.run_question_only(&context, &mut state, options.max_iterations, progress)
                        .await?
                }
                DiagnosticMode::NoBudget => {
                    self.run_budgeted(
                        &context,
                        &mut state,
                        options.max_iterations,
                        self.params.unbounded_budget,
                        progress,
                    )
                    .await?
                }
                DiagnosticMode::Budgeted | DiagnosticMode::Ensemble => {
                    self.run_budgeted(
                        &context,
                        &mut state,
                        options.max_iterations,
                        options.budget,
                        progress,
                    )
                    .await?
                }
            };
            StrategyOutcome {
                result,
                answered: state.answered_count(),
                unavailable: state.unavailable_count(),
            }
        };

        info!(
            diagnosis = %outcome.result.final_diagnosis,
            confidence = outcome.result.confidence,
            total_cost = outcome.result.total_cost,
            iterations = outcome.result.iterations,
            "Consultation complete"
        );
        self.transcript.log(TranscriptEvent::new(
            "run_completed",
            json!({
                "diagnosis": outcome.result.final_diagnosis,
                "confidence": outcome.result.confidence,
                "total_cost": outcome.result.total_cost,
                "iterations": outcome.result.iterations,
                "answered": outcome.answered,
                "unavailable": outcome.unavailable,
            }),
        ));

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendAssignment;
    use crate::ports::backend_gateway::{BackendError, BackendErrorKind};
    use async_trait::async_trait;
    use dxo_domain::diagnosis::{DEFAULT_CONFIDENCE, DEFAULT_DIAGNOSIS};
    use dxo_domain::prompt::{FALLBACK_DISCLAIMER, STATIC_FALLBACK};
    use dxo_domain::deliberation::ResponseOutcome;
    use dxo_domain::deliberation::state::unavailable_note;
    use dxo_domain::{AgentRegistry, AgentRole, BackendId, CaseQuery, Phase, RunOptions};
    use std::collections::{HashMap, HashSet, VecDeque};
    use std::sync::Mutex;
    use std::time::Duration;

    // ==================== Test Mocks ====================

    const DEFAULT_REPLY: &str = "No further comments.";

    /// Gateway that answers by agent role, recognised from the prompt.
    ///
    /// The last scripted reply of a role repeats once its queue is down to one.
    #[derive(Default)]
    struct ScriptedGateway {
        scripts: Mutex<HashMap<AgentRole, VecDeque<String>>>,
        failing: HashSet<BackendId>,
        fail_agents: bool,
        fallback_reply: Option<String>,
        delay: Option<Duration>,
        calls: Mutex<Vec<(BackendId, Option<AgentRole>)>>,
    }

    impl ScriptedGateway {
        fn new() -> Self {
            Self::default()
        }

        fn script(self, role: AgentRole, replies: &[&str]) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .insert(role, replies.iter().map(|r| r.to_string()).collect());
            self
        }

        fn failing(mut self, backends: &[BackendId]) -> Self {
            self.failing = backends.iter().cloned().collect();
            self
        }

        fn calls_for(&self, role: AgentRole) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|(_, r)| *r == Some(role))
                .count()
        }

        fn role_of(prompt: &str) -> Option<AgentRole> {
            AgentRegistry::all()
                .iter()
                .find(|a| prompt.starts_with(a.instruction))
                .map(|a| a.role)
        }
    }

    #[async_trait]
    impl BackendGateway for ScriptedGateway {
        async fn invoke(
            &self,
            backend: &BackendId,
            prompt: &str,
            _max_tokens: u32,
        ) -> Result<String, BackendError> {
            let role = Self::role_of(prompt);
            self.calls.lock().unwrap().push((backend.clone(), role));

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.failing.contains(backend) || (self.fail_agents && role.is_some()) {
                return Err(BackendError::new(
                    backend.clone(),
                    BackendErrorKind::Connection("connection refused".to_string()),
                ));
            }

            let Some(role) = role else {
                return self.fallback_reply.clone().ok_or_else(|| {
                    BackendError::new(backend.clone(), BackendErrorKind::NotConfigured)
                });
            };

            let mut scripts = self.scripts.lock().unwrap();
            let reply = match scripts.get_mut(&role) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            };
            Ok(reply.unwrap_or_else(|| DEFAULT_REPLY.to_string()))
        }

        fn backends(&self) -> Vec<BackendId> {
            BackendId::builtin()
        }
    }

    #[derive(Default)]
    struct RecordingTranscript {
        events: Mutex<Vec<(&'static str, serde_json::Value)>>,
    }

    impl RecordingTranscript {
        fn count(&self, event_type: &str) -> usize {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|(t, _)| *t == event_type)
                .count()
        }

        fn payloads(&self, event_type: &str) -> Vec<serde_json::Value> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|(t, _)| *t == event_type)
                .map(|(_, p)| p.clone())
                .collect()
        }
    }

    impl TranscriptLogger for RecordingTranscript {
        fn log(&self, event: TranscriptEvent) {
            self.events
                .lock()
                .unwrap()
                .push((event.event_type, event.payload));
        }
    }

    fn input(mode: DiagnosticMode, max_iterations: u32, budget: u32) -> RunConsultationInput {
        RunConsultationInput::new(
            CaseQuery::try_new("sudden chest pain").unwrap(),
            RunOptions::new(mode)
                .with_max_iterations(max_iterations)
                .with_budget(budget),
        )
    }

    fn use_case(
        gateway: ScriptedGateway,
    ) -> (RunConsultationUseCase<ScriptedGateway>, Arc<ScriptedGateway>) {
        let gateway = Arc::new(gateway);
        (RunConsultationUseCase::new(Arc::clone(&gateway)), gateway)
    }

    fn test_ids(result: &DiagnosisResult) -> Vec<&str> {
        result
            .recommended_tests
            .iter()
            .map(|t| t.test.as_str())
            .collect()
    }

    // ==================== Instant ====================

    #[tokio::test]
    async fn test_instant_takes_top_ranked_entry() {
        let (uc, gateway) = use_case(ScriptedGateway::new().script(
            AgentRole::DifferentialDiagnostician,
            &["1. Acute coronary syndrome (70%) 2. Pulmonary embolism (20%) 3. GERD (10%)"],
        ));

        let result = uc.execute(input(DiagnosticMode::Instant, 10, 5000)).await.unwrap();

        assert_eq!(result.final_diagnosis, "Acute coronary syndrome");
        assert_eq!(result.confidence, 70);
        assert_eq!(result.total_cost, 300);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.differential.len(), 3);
        assert!(result.recommended_tests.is_empty());
        assert_eq!(gateway.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_instant_without_ranked_list() {
        let (uc, _) = use_case(
            ScriptedGateway::new().script(AgentRole::DifferentialDiagnostician, &["Hard to say."]),
        );

        let result = uc.execute(input(DiagnosticMode::Instant, 10, 5000)).await.unwrap();

        assert_eq!(result.final_diagnosis, INSTANT_FALLBACK_DIAGNOSIS);
        assert_eq!(result.confidence, INSTANT_FALLBACK_CONFIDENCE);
        assert_eq!(result.management_plan, INSTANT_MANAGEMENT);
    }

    // ==================== Budgeted ====================

    #[tokio::test]
    async fn test_budgeted_orders_tests_then_diagnoses() {
        let (uc, gateway) = use_case(
            ScriptedGateway::new()
                .script(
                    AgentRole::DifferentialDiagnostician,
                    &[
                        "1. Pneumonia (60%)\nDiagnosis: Pneumonia\nConfidence: 85%\nManagement: antibiotics",
                    ],
                )
                .script(AgentRole::TestStrategist, &["cbc (200) | chest_xray (300)"])
                .script(
                    AgentRole::Coordinator,
                    &["DECISION: TESTS\nOrder cbc and chest xray.", "DECISION: DIAGNOSE"],
                ),
        );

        let result = uc.execute(input(DiagnosticMode::Budgeted, 10, 1000)).await.unwrap();

        assert_eq!(result.total_cost, 500);
        assert_eq!(test_ids(&result), vec!["cbc", "chest_xray"]);
        assert_eq!(result.iterations, 2);
        assert_eq!(result.final_diagnosis, "Pneumonia");
        assert_eq!(result.confidence, 85);
        assert_eq!(gateway.calls_for(AgentRole::InformationProvider), 2);
    }

    #[tokio::test]
    async fn test_budgeted_skips_test_over_budget() {
        let (uc, gateway) = use_case(
            ScriptedGateway::new()
                .script(AgentRole::TestStrategist, &["chest_xray (300)"])
                .script(
                    AgentRole::Coordinator,
                    &["DECISION: TESTS\nOrder a chest xray.", "DECISION: DIAGNOSE"],
                ),
        );

        let result = uc.execute(input(DiagnosticMode::Budgeted, 10, 100)).await.unwrap();

        assert!(result.recommended_tests.is_empty());
        assert_eq!(result.total_cost, 0);
        assert_eq!(result.iterations, 2);
        assert_eq!(gateway.calls_for(AgentRole::InformationProvider), 0);
    }

    #[tokio::test]
    async fn test_budgeted_never_exceeds_budget() {
        let (uc, _) = use_case(ScriptedGateway::new().script(
            AgentRole::Coordinator,
            &["DECISION: TESTS\nOrder crp, chest xray and cbc."],
        ));

        let result = uc.execute(input(DiagnosticMode::Budgeted, 10, 600)).await.unwrap();

        // cbc (200) and crp (400) fit; chest_xray (300) no longer does
        assert_eq!(test_ids(&result), vec!["cbc", "crp"]);
        assert_eq!(result.total_cost, 600);
        // The exhausted budget ends the loop after one round
        assert_eq!(result.iterations, 1);
    }

    #[tokio::test]
    async fn test_budgeted_respects_iteration_ceiling() {
        let (uc, gateway) = use_case(
            ScriptedGateway::new()
                .script(AgentRole::Coordinator, &["DECISION: ASK\nMore history please."]),
        );

        let result = uc.execute(input(DiagnosticMode::Budgeted, 3, 5000)).await.unwrap();

        assert_eq!(result.iterations, 3);
        assert_eq!(gateway.calls_for(AgentRole::Coordinator), 3);
    }

    #[tokio::test]
    async fn test_budgeted_zero_budget_skips_rounds() {
        let (uc, gateway) = use_case(ScriptedGateway::new());

        let result = uc.execute(input(DiagnosticMode::Budgeted, 10, 0)).await.unwrap();

        assert_eq!(result.iterations, 0);
        assert_eq!(gateway.calls_for(AgentRole::Coordinator), 0);
        assert_eq!(gateway.calls_for(AgentRole::Evaluator), 1);
    }

    #[tokio::test]
    async fn test_budgeted_records_ranked_hypotheses_and_judge_score() {
        let (uc, _) = use_case(
            ScriptedGateway::new()
                .script(
                    AgentRole::DifferentialDiagnostician,
                    &[
                        "1. Pneumonia (60%) 2. Bronchitis (25%) 3. Asthma (10%) 4. Flu (5%)\nDiagnosis: Pneumonia",
                    ],
                )
                .script(AgentRole::Coordinator, &["DECISION: DIAGNOSE"])
                .script(AgentRole::Evaluator, &["Score: 4\nSolid reasoning."]),
        );

        let result = uc.execute(input(DiagnosticMode::Budgeted, 10, 5000)).await.unwrap();

        let labels: Vec<_> = result.differential.iter().map(|h| h.label.as_str()).collect();
        assert_eq!(labels, vec!["Pneumonia", "Bronchitis", "Asthma"]);
        assert_eq!(result.accuracy_score, Some(4));
        assert_eq!(result.confidence, DEFAULT_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_repeated_test_is_not_charged_twice() {
        let (uc, gateway) = use_case(ScriptedGateway::new().script(
            AgentRole::Coordinator,
            &["DECISION: TESTS\ncbc", "DECISION: TESTS\ncbc", "DECISION: DIAGNOSE"],
        ));

        let result = uc.execute(input(DiagnosticMode::Budgeted, 10, 5000)).await.unwrap();

        assert_eq!(test_ids(&result), vec!["cbc"]);
        assert_eq!(result.total_cost, 200);
        assert_eq!(gateway.calls_for(AgentRole::InformationProvider), 1);
    }

    #[tokio::test]
    async fn test_no_budget_ignores_caller_budget() {
        let (uc, _) = use_case(ScriptedGateway::new().script(
            AgentRole::Coordinator,
            &["DECISION: TESTS\nOrder an MRI brain.", "DECISION: DIAGNOSE"],
        ));

        let result = uc.execute(input(DiagnosticMode::NoBudget, 10, 0)).await.unwrap();

        assert_eq!(test_ids(&result), vec!["mri_brain"]);
        assert_eq!(result.total_cost, 5000);
    }

    // ==================== Question-only ====================

    #[tokio::test]
    async fn test_question_only_stops_when_coordinator_is_ready() {
        let (uc, gateway) = use_case(ScriptedGateway::new().script(
            AgentRole::Coordinator,
            &[
                "DECISION: DIAGNOSE",
                "Diagnosis: Migraine\nConfidence: 75%\nManagement: rest in a dark room",
            ],
        ));

        let result = uc.execute(input(DiagnosticMode::QuestionOnly, 5, 0)).await.unwrap();

        assert_eq!(result.iterations, 1);
        assert_eq!(result.final_diagnosis, "Migraine");
        assert_eq!(result.confidence, 75);
        assert_eq!(result.management_plan, "rest in a dark room");
        assert_eq!(result.total_cost, 0);
        assert_eq!(gateway.calls_for(AgentRole::InformationProvider), 0);
    }

    #[tokio::test]
    async fn test_question_only_is_capped() {
        let (uc, gateway) = use_case(ScriptedGateway::new().script(
            AgentRole::Coordinator,
            &["How long has the pain lasted?"],
        ));

        let result = uc.execute(input(DiagnosticMode::QuestionOnly, 10, 0)).await.unwrap();

        assert_eq!(result.iterations, 5);
        assert_eq!(gateway.calls_for(AgentRole::InformationProvider), 5);
        assert!(result.recommended_tests.is_empty());
    }

    #[tokio::test]
    async fn test_question_only_keeps_asking_after_prose_opening() {
        let (uc, gateway) = use_case(ScriptedGateway::new().script(
            AgentRole::Coordinator,
            &[
                "Diagnosis is not clear yet.\n1. When did the pain start?",
                "DECISION: DIAGNOSE",
            ],
        ));

        let result = uc.execute(input(DiagnosticMode::QuestionOnly, 5, 0)).await.unwrap();

        assert_eq!(result.iterations, 2);
        assert_eq!(gateway.calls_for(AgentRole::InformationProvider), 1);
    }

    // ==================== Ensemble ====================

    #[tokio::test]
    async fn test_ensemble_majority_vote() {
        let (uc, _) = use_case(
            ScriptedGateway::new()
                .script(
                    AgentRole::DifferentialDiagnostician,
                    &[
                        "1. flu (50%)",
                        "Diagnosis: flu\nConfidence: 60%",
                        "1. flu (50%)",
                        "Diagnosis: flu\nConfidence: 70%",
                        "1. cold (50%)",
                        "Diagnosis: cold\nConfidence: 80%",
                    ],
                )
                .script(AgentRole::Coordinator, &["DECISION: DIAGNOSE"]),
        );

        let result = uc.execute(input(DiagnosticMode::Ensemble, 1, 5000)).await.unwrap();

        assert_eq!(result.final_diagnosis, "flu");
        assert_eq!(result.confidence, 70);
        assert!(result.reasoning.contains("3 independent panels"));
    }

    #[tokio::test]
    async fn test_ensemble_panels_do_not_share_state() {
        let (uc, _) = use_case(ScriptedGateway::new().script(
            AgentRole::Coordinator,
            &["DECISION: TESTS\ncbc", "DECISION: DIAGNOSE"],
        ));

        let result = uc.execute(input(DiagnosticMode::Ensemble, 10, 5000)).await.unwrap();

        // Only the first panel orders cbc; the mean cost is 200 / 3
        assert_eq!(test_ids(&result), vec!["cbc"]);
        assert_eq!(result.total_cost, 67);
    }

    // ==================== Failure handling ====================

    #[tokio::test]
    async fn test_round_survives_two_failed_backends() {
        let transcript = Arc::new(RecordingTranscript::default());
        let (uc, _) = use_case(
            ScriptedGateway::new()
                .script(
                    AgentRole::DifferentialDiagnostician,
                    &["1. Pneumonia (60%)\nDiagnosis: Pneumonia\nConfidence: 80%"],
                )
                .failing(&[BackendId::OpenAi, BackendId::Gemini]),
        );
        let uc = uc.with_transcript(transcript.clone());

        let result = uc.execute(input(DiagnosticMode::Budgeted, 1, 5000)).await.unwrap();

        assert_eq!(result.final_diagnosis, "Pneumonia");
        // strategist, steward and challenger were unavailable
        assert_eq!(transcript.count("agent_unavailable"), 3);
        assert!(transcript.count("agent_response") >= 3);
    }

    fn fan_out() -> Vec<(AgentRole, String)> {
        vec![
            (AgentRole::DifferentialDiagnostician, "Rank the differential.".to_string()),
            (AgentRole::TestStrategist, "Suggest tests.".to_string()),
            (AgentRole::CostSteward, "Review costs.".to_string()),
        ]
    }

    #[tokio::test]
    async fn test_fan_out_keeps_surviving_answer() {
        // strategist routes to OpenAI, steward to Gemini
        let (uc, _) = use_case(
            ScriptedGateway::new()
                .script(AgentRole::DifferentialDiagnostician, &["1. Pneumonia (60%)"])
                .failing(&[BackendId::OpenAi, BackendId::Gemini]),
        );
        let mut state = DeliberationState::new();

        let texts = uc
            .consult_all(&mut state, Phase::Gathering, fan_out(), &NoProgress)
            .await
            .unwrap();

        assert_eq!(texts.len(), 3);
        assert_eq!(texts[0], "1. Pneumonia (60%)");
        let outcomes: Vec<_> = state.history().iter().map(|e| e.outcome).collect();
        assert_eq!(outcomes.len(), 3);
        assert_eq!(
            outcomes.iter().filter(|o| **o == ResponseOutcome::Unavailable).count(),
            2
        );
        assert_eq!(
            outcomes.iter().filter(|o| **o == ResponseOutcome::Answered).count(),
            1
        );
        assert_eq!(state.top_hypotheses(1)[0].label, "Pneumonia");
    }

    #[tokio::test]
    async fn test_fan_out_with_every_backend_down() {
        let (uc, _) = use_case(ScriptedGateway::new().failing(&BackendId::builtin()));
        let mut state = DeliberationState::new();

        let texts = uc
            .consult_all(&mut state, Phase::Gathering, fan_out(), &NoProgress)
            .await
            .unwrap();

        assert_eq!(state.history().len(), 3);
        assert!(
            state
                .history()
                .iter()
                .all(|e| e.outcome == ResponseOutcome::Unavailable)
        );
        for (text, (role, _)) in texts.iter().zip(fan_out()) {
            let name = AgentRegistry::get(role).name;
            assert_eq!(text, &unavailable_note(name));
            assert!(text.contains("temporarily unavailable"));
        }
    }

    #[tokio::test]
    async fn test_all_backends_failing_still_yields_result() {
        let transcript = Arc::new(RecordingTranscript::default());
        let (uc, _) = use_case(ScriptedGateway::new().failing(&BackendId::builtin()));
        let uc = uc.with_transcript(transcript.clone());

        let result = uc.execute(input(DiagnosticMode::Budgeted, 1, 5000)).await.unwrap();

        assert_eq!(result.final_diagnosis, DEFAULT_DIAGNOSIS);
        assert_eq!(result.confidence, DEFAULT_CONFIDENCE);
        assert!(transcript.count("agent_unavailable") >= 3);
        assert_eq!(transcript.count("agent_response"), 0);
    }

    #[tokio::test]
    async fn test_text_entry_point_uses_static_fallback() {
        let (uc, _) = use_case(ScriptedGateway::new().failing(&BackendId::builtin()));

        let text = uc.execute_text(input(DiagnosticMode::Budgeted, 2, 5000)).await.unwrap();

        assert_eq!(text, STATIC_FALLBACK);
    }

    #[tokio::test]
    async fn test_text_entry_point_uses_single_backend_fallback() {
        let gateway = ScriptedGateway {
            fail_agents: true,
            fallback_reply: Some("Rest, fluids and paracetamol.".to_string()),
            ..Default::default()
        };
        let (uc, gateway) = use_case(gateway);

        let text = uc.execute_text(input(DiagnosticMode::Instant, 1, 0)).await.unwrap();

        assert!(text.starts_with("Rest, fluids and paracetamol."));
        assert!(text.ends_with(FALLBACK_DISCLAIMER));
        // One failed instant call, then the first fallback backend answers
        assert_eq!(gateway.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_text_entry_point_renders_report() {
        let (uc, _) = use_case(ScriptedGateway::new().script(
            AgentRole::DifferentialDiagnostician,
            &["1. Tension headache (65%)"],
        ));

        let text = uc.execute_text(input(DiagnosticMode::Instant, 1, 0)).await.unwrap();

        assert!(text.contains("**Primary Diagnosis:** Tension headache (65% confidence)"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_backend_times_out() {
        let transcript = Arc::new(RecordingTranscript::default());
        let gateway = ScriptedGateway {
            delay: Some(Duration::from_secs(30)),
            ..Default::default()
        };
        let (uc, _) = use_case(gateway);
        let uc = uc
            .with_params(
                ConsultationParams::default()
                    .with_call_timeout(Duration::from_secs(1))
                    .with_assignment(BackendAssignment::single(BackendId::Gemini)),
            )
            .with_transcript(transcript.clone());

        let result = uc.execute(input(DiagnosticMode::Instant, 1, 0)).await.unwrap();

        assert_eq!(result.final_diagnosis, INSTANT_FALLBACK_DIAGNOSIS);
        let errors = transcript.payloads("agent_unavailable");
        assert_eq!(errors.len(), 1);
        assert!(errors[0]["error"].as_str().unwrap().contains("timed out"));
        assert_eq!(errors[0]["backend"], "gemini");
    }

    #[tokio::test]
    async fn test_cancelled_run() {
        let token = CancellationToken::new();
        token.cancel();
        let (uc, gateway) = use_case(ScriptedGateway::new());
        let uc = uc.with_cancellation(token);

        let err = uc.execute(input(DiagnosticMode::Budgeted, 5, 5000)).await.unwrap_err();

        assert_eq!(err, ConsultationError::Cancelled);
        assert!(gateway.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transcript_brackets_the_run() {
        let transcript = Arc::new(RecordingTranscript::default());
        let (uc, _) = use_case(ScriptedGateway::new());
        let uc = uc.with_transcript(transcript.clone());

        uc.execute(input(DiagnosticMode::Instant, 1, 0)).await.unwrap();

        let events = transcript.events.lock().unwrap();
        assert_eq!(events.first().map(|(t, _)| *t), Some("run_started"));
        assert_eq!(events.last().map(|(t, _)| *t), Some("run_completed"));
    }
}

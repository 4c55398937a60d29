//! Progress notification port
//!
//! Defines the interface for reporting progress during a consultation.

use dxo_domain::{AgentRole, Phase};

/// Callback for progress updates during a consultation
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, chat typing indicator, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a dispatch step starts within a phase
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize);

    /// Called when one agent call completes (or fails) within a phase
    fn on_task_complete(&self, phase: &Phase, role: AgentRole, success: bool);

    /// Called when a dispatch step completes
    fn on_phase_complete(&self, phase: &Phase);

    /// Called at the start of each deliberation round (1-based)
    fn on_round_start(&self, _round: u32, _max_rounds: u32) {}

    /// Called when an ensemble sub-run starts (1-based)
    fn on_panel_start(&self, _panel: usize, _total: usize) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &Phase, _total_tasks: usize) {}
    fn on_task_complete(&self, _phase: &Phase, _role: AgentRole, _success: bool) {}
    fn on_phase_complete(&self, _phase: &Phase) {}
}

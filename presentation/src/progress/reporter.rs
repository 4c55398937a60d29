//! Progress reporting for consultation runs

use colored::Colorize;
use dxo_application::ProgressNotifier;
use dxo_domain::{AgentRegistry, AgentRole, Phase};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress with indicatif bars, one per dispatch step
pub struct ProgressReporter {
    multi: MultiProgress,
    step_bar: Mutex<Option<ProgressBar>>,
    round: Mutex<Option<String>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            step_bar: Mutex::new(None),
            round: Mutex::new(None),
        }
    }

    fn step_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn prefix(&self, phase: &Phase) -> String {
        match self.round.lock().ok().and_then(|r| r.clone()) {
            Some(round) if *phase != Phase::Synthesizing => {
                format!("{} · {}", round, phase.display_name())
            }
            _ => phase.display_name().to_string(),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::step_style());
        pb.set_prefix(self.prefix(phase));
        pb.set_message("consulting...");

        if let Ok(mut bar) = self.step_bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_task_complete(&self, _phase: &Phase, role: AgentRole, success: bool) {
        let Ok(bar) = self.step_bar.lock() else {
            return;
        };
        if let Some(pb) = bar.as_ref() {
            let name = AgentRegistry::get(role).name;
            let status = if success {
                format!("{} {}", "v".green(), name)
            } else {
                format!("{} {}", "x".red(), name)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_phase_complete(&self, _phase: &Phase) {
        if let Some(pb) = self.step_bar.lock().ok().and_then(|mut bar| bar.take()) {
            pb.finish_and_clear();
        }
    }

    fn on_round_start(&self, round: u32, max_rounds: u32) {
        if let Ok(mut current) = self.round.lock() {
            *current = Some(format!("Round {}/{}", round, max_rounds));
        }
    }

    fn on_panel_start(&self, panel: usize, total: usize) {
        let _ = self.multi.println(format!(
            "{} {}",
            "->".cyan(),
            format!("Panel {} of {}", panel, total).bold()
        ));
        if let Ok(mut current) = self.round.lock() {
            *current = None;
        }
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        eprintln!(
            "{} {} ({} agents)",
            "->".cyan(),
            phase.display_name().bold(),
            total_tasks
        );
    }

    fn on_task_complete(&self, _phase: &Phase, role: AgentRole, success: bool) {
        let name = AgentRegistry::get(role).name;
        if success {
            eprintln!("  {} {}", "v".green(), name);
        } else {
            eprintln!("  {} {} (unavailable)", "x".red(), name);
        }
    }

    fn on_phase_complete(&self, _phase: &Phase) {}

    fn on_round_start(&self, round: u32, max_rounds: u32) {
        eprintln!("{}", format!("Round {}/{}", round, max_rounds).bold());
    }

    fn on_panel_start(&self, panel: usize, total: usize) {
        eprintln!("{}", format!("Panel {} of {}", panel, total).bold());
    }
}

//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for consultation results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored breakdown of the structured result
    Full,
    /// Chat-style report, with the single-backend fallback when the panel fails
    Report,
    /// JSON `DiagnosisResult`
    Json,
}

/// CLI arguments for dxo
#[derive(Parser, Debug)]
#[command(name = "dxo")]
#[command(author, version, about = "Diagnostic panel - several AI clinicians deliberate on one case")]
#[command(long_about = r#"
dxo puts a case description before a panel of eight role-specialised agents
(hypothesis, test strategist, challenger, cost steward, checklist,
coordinator, gatekeeper, judge) spread across Anthropic, OpenAI and Gemini.

Modes:
  instant        one hypothesis call, flat fee
  question_only  history taking only, no tests
  budgeted       rounds of deliberation, tests ordered within a budget
  no_budget      budgeted with an effectively unlimited budget
  ensemble       several independent budgeted panels, majority vote

Without --mode the paid/free policy from the config picks the mode.

Configuration files are loaded from (in priority order):
1. DXO_* environment variables
2. --config <path>              Explicit config file
3. ./dxo.toml                   Project-level config
4. ~/.config/dxo/config.toml    Global config

Example:
  dxo "34 year old, fever and joint pain for 3 days"
  dxo --paid --mode budgeted --budget 2000 "persistent dry cough, night sweats"
  dxo --output json --mode instant "sudden severe headache"

AI guidance only. Consult a qualified physician.
"#)]
pub struct Cli {
    /// The case description
    pub query: String,

    /// Diagnostic mode (overrides the paid/free policy)
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Maximum deliberation rounds (with --mode)
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub max_iterations: Option<i64>,

    /// Test budget in whole currency units (with --mode)
    #[arg(short, long, value_name = "AMOUNT", allow_negative_numbers = true)]
    pub budget: Option<i64>,

    /// Use the paid policy tier
    #[arg(long)]
    pub paid: bool,

    /// The case includes an image or scan
    #[arg(long)]
    pub image: bool,

    /// Patient age
    #[arg(long, default_value = "Unknown")]
    pub age: String,

    /// Response language code
    #[arg(short, long, default_value = "en")]
    pub language: String,

    /// Free-text patient context, replacing the policy's default
    #[arg(long, value_name = "TEXT")]
    pub context: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "report")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show the merged configuration and its sources, then exit
    #[arg(long)]
    pub show_config: bool,

    /// Append a JSONL transcript of every agent exchange to this file
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Also write tracing logs to a daily file in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

//! CLI entrypoint for dxo
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use dxo_application::{
    BackendGateway, CallerContext, ModePolicy, NoProgress, ProgressNotifier, RunConsultationInput,
    RunConsultationUseCase,
};
use dxo_domain::{DomainError, RunOptions};
use dxo_infrastructure::{ConfigLoader, JsonlTranscriptLogger, RoutingGateway};
use dxo_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Kept alive until exit so the file writer flushes
    let _log_guard = init_tracing(cli.verbose, cli.log_dir.as_deref());

    info!("Starting dxo");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()?
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        println!();
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    // Mode validation happens before any backend is touched
    let options = resolve_options(&cli, &config.to_mode_policy()?)?;
    let input = RunConsultationInput::parse(&cli.query, options)?;
    let params = config.to_consultation_params()?;

    // === Dependency Injection ===
    let gateway = Arc::new(RoutingGateway::from_config(
        &config.backends,
        params.call_timeout,
    ));
    if gateway.backends().is_empty() {
        warn!("No backend credentials found; set ANTHROPIC_API_KEY, OPENAI_API_KEY or GEMINI_API_KEY");
    }

    let cancellation = CancellationToken::new();
    {
        let token = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted; cancelling consultation");
                token.cancel();
            }
        });
    }

    let mut use_case = RunConsultationUseCase::new(gateway)
        .with_params(params)
        .with_catalog(config.to_catalog())
        .with_cancellation(cancellation);

    if let Some(path) = &cli.transcript {
        let logger = JsonlTranscriptLogger::open(path)
            .with_context(|| format!("cannot open transcript {}", path.display()))?;
        use_case = use_case.with_transcript(Arc::new(logger));
    }

    let progress: Box<dyn ProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    let output = match cli.output {
        OutputFormat::Report => {
            use_case
                .execute_text_with_progress(input, progress.as_ref())
                .await?
        }
        OutputFormat::Full => ConsoleFormatter::format(
            &use_case
                .execute_with_progress(input, progress.as_ref())
                .await?,
        ),
        OutputFormat::Json => ConsoleFormatter::format_json(
            &use_case
                .execute_with_progress(input, progress.as_ref())
                .await?,
        ),
    };

    println!("{}", output);

    Ok(())
}

/// Initialize logging based on verbosity level, optionally teeing to a
/// daily log file.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "dxo.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

/// Run options for this invocation.
///
/// The policy tier supplies every default; `--mode`, `--max-iterations`,
/// `--budget` and `--context` override it. All numbers go through
/// [`RunOptions::parse`], so a bad mode or a negative budget fails here.
fn resolve_options(cli: &Cli, policy: &ModePolicy) -> Result<RunOptions, DomainError> {
    let caller = if cli.paid {
        CallerContext::paid()
    } else {
        CallerContext::default()
    }
    .with_image(cli.image)
    .with_language(cli.language.clone())
    .with_age(cli.age.clone());

    let base = policy.options_for(&caller);
    let mode = cli.mode.as_deref().unwrap_or(base.mode.as_str());
    let options = RunOptions::parse(
        mode,
        cli.max_iterations.unwrap_or(base.max_iterations.into()),
        cli.budget.unwrap_or(base.budget.into()),
    )?
    .with_language(base.language.clone())
    .with_age(base.age.clone())
    .with_patient_context(cli.context.clone().unwrap_or(base.patient_context.clone()));

    Ok(options)
}

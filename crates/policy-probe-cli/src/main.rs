// crates/policy-probe-cli/src/main.rs
// ============================================================================
// Module: Policy Probe CLI Entry Point
// Description: Command dispatcher for probe runs and reporting.
// Purpose: Load configuration, execute the selected mode, render the report.
// Dependencies: clap, policy-probe-config, policy-probe-runner, tokio,
//               tracing-subscriber
// ============================================================================

//! ## Overview
//! The CLI wires the collaborators together: it loads and validates one
//! immutable configuration, hands it to the orchestrator for the requested
//! mode, renders the finished summary with the selected reporter, and maps
//! the summary's success flag to the process exit code. The engine itself
//! never touches files, environment variables, or exit codes.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod report;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Parser;
use clap::ValueEnum;
use policy_probe_client::ClientError;
use policy_probe_client::ClientOptions;
use policy_probe_client::ProbeClient;
use policy_probe_config::ReportFormat;
use policy_probe_config::RunConfig;
use policy_probe_core::RunSummary;
use policy_probe_runner::ProbeRunner;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

use crate::report::ConsoleReporter;
use crate::report::Reporter;
use crate::report::reporter_for;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "policy-probe",
    version,
    about = "Verify a policy-decision service over its HTTP API"
)]
struct Cli {
    /// Check execution mode.
    #[arg(long, value_enum, default_value = "full")]
    mode: ModeArg,
    /// Category name (required when mode is category).
    #[arg(long, value_name = "NAME")]
    category: Option<String>,
    /// Path to the YAML configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Report format (overrides the configured one).
    #[arg(long, value_enum, value_name = "FORMAT")]
    report_format: Option<ReportFormatArg>,
    /// Output file for the report (stdout when omitted).
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Logging verbosity.
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevelArg,
    /// Validate configuration and probe connectivity without running checks.
    #[arg(long, action = ArgAction::SetTrue)]
    dry_run: bool,
}

/// Supported execution modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Fail-fast smoke subset.
    Smoke,
    /// Every registered category.
    Full,
    /// Exactly one named category.
    Category,
}

/// Report format flag values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormatArg {
    /// Human-readable console report.
    Console,
    /// Machine-readable JSON report.
    Json,
    /// JUnit XML report.
    Junit,
}

impl ReportFormatArg {
    /// Maps the flag value onto the configuration enum.
    const fn into_format(self) -> ReportFormat {
        match self {
            Self::Console => ReportFormat::Console,
            Self::Json => ReportFormat::Json,
            Self::Junit => ReportFormat::Junit,
        }
    }
}

/// Logging verbosity flag values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevelArg {
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Informational logging.
    Info,
    /// Debug logging including per-request traces.
    Debug,
}

impl LogLevelArg {
    /// Maps the flag value onto a tracing level filter.
    const fn level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::ERROR,
            Self::Warn => LevelFilter::WARN,
            Self::Info => LevelFilter::INFO,
            Self::Debug => LevelFilter::DEBUG,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI flow: config, run, report, exit code.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    let mut config = RunConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(format!("configuration error: {err}")))?;
    if let Some(format) = cli.report_format {
        config.report_format = format.into_format();
    }

    if cli.dry_run {
        return run_dry_run(&config).await;
    }

    let runner = ProbeRunner::new(config.clone());
    let summary = match cli.mode {
        ModeArg::Smoke => {
            info!("running smoke checks");
            runner.run_smoke().await
        }
        ModeArg::Full => {
            info!("running full check suite");
            runner.run_full().await
        }
        ModeArg::Category => {
            let Some(name) = cli.category.as_deref() else {
                return Err(CliError::new(
                    "--category is required when mode is category".to_string(),
                ));
            };
            info!(category = name, "running single category");
            runner.run_category(name).await
        }
    }
    .map_err(|err| CliError::new(err.to_string()))?;

    emit_report(&summary, config.report_format, cli.output.as_deref())?;
    info!(
        passed = summary.passed,
        failed = summary.failed,
        errors = summary.errors,
        skipped = summary.skipped,
        "checks complete"
    );

    Ok(if summary.success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

// ============================================================================
// SECTION: Dry Run
// ============================================================================

/// Validates connectivity without executing any checks.
///
/// Prints what would be probed, issues a single health request, and maps the
/// outcome onto the exit code.
async fn run_dry_run(config: &RunConfig) -> CliResult<ExitCode> {
    out_line("Dry-run mode: validating configuration and connectivity only.")?;
    out_line(&format!("  Service URL  : {}", config.service_url))?;
    out_line(&format!("  Timeout      : {}s", config.timeout_seconds))?;
    out_line(&format!(
        "  Auth token   : {}",
        if config.auth_token.is_some() { "set" } else { "not set" }
    ))?;
    out_line(&format!("  Report format: {}", config.report_format.as_str()))?;
    out_line(&format!("  Policy cases : {} configured", config.policy_cases.len()))?;
    out_line("\nProbing service health endpoint...")?;

    let client = ProbeClient::new(ClientOptions {
        base_url: config.service_url.clone(),
        timeout: config.timeout(),
        auth_token: config.auth_token.clone(),
        max_retries: config.max_retries,
        base_backoff: config.base_backoff(),
    })
    .map_err(|err| CliError::new(err.to_string()))?;

    match client.health().await {
        Ok((health, _)) => {
            out_line(&format!("  Service reachable; status: {}", health.status))?;
            out_line("\nDry-run passed. Configuration is valid and the service is reachable.")?;
            Ok(ExitCode::SUCCESS)
        }
        Err(
            error @ ClientError::Connection {
                ..
            },
        ) => {
            err_line(&format!("  Connection failed: {error}"))?;
            err_line(
                "\nDry-run failed: could not connect to the service. Check service_url and \
                 network connectivity.",
            )?;
            Ok(ExitCode::FAILURE)
        }
        Err(
            error @ ClientError::Timeout {
                ..
            },
        ) => {
            err_line(&format!("  Request timed out: {error}"))?;
            err_line(
                "\nDry-run failed: the service did not respond within the configured timeout.",
            )?;
            Ok(ExitCode::FAILURE)
        }
        Err(error) => {
            err_line(&format!("  Service error: {error}"))?;
            err_line("\nDry-run failed: the service responded with an error.")?;
            Ok(ExitCode::FAILURE)
        }
    }
}

// ============================================================================
// SECTION: Report Output
// ============================================================================

/// Renders the summary and writes it to the selected destination.
fn emit_report(
    summary: &RunSummary,
    format: ReportFormat,
    output: Option<&Path>,
) -> CliResult<()> {
    let report = reporter_for(format).render(summary);
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|err| {
                        CliError::new(format!("failed to create report directory: {err}"))
                    })?;
                }
            }
            fs::write(path, &report)
                .map_err(|err| CliError::new(format!("failed to write report: {err}")))?;
            out_line(&format!("Report written to: {}", path.display()))?;
            // Keep a human-readable summary on the console for file outputs.
            if format != ReportFormat::Console {
                out_line(&ConsoleReporter.render(summary))?;
            }
        }
        None => out_line(&report)?,
    }
    Ok(())
}

// ============================================================================
// SECTION: Logging and Output Helpers
// ============================================================================

/// Initializes the tracing subscriber for the selected verbosity.
fn init_tracing(level: LogLevelArg) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level.level_filter())
        .with_target(false)
        .try_init();
}

/// Writes one line to stdout.
fn out_line(message: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
        .map_err(|err| CliError::new(format!("failed to write to stdout: {err}")))
}

/// Writes one line to stderr.
fn err_line(message: &str) -> CliResult<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
        .map_err(|err| CliError::new(format!("failed to write to stderr: {err}")))
}

/// Reports a fatal error and returns the failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = err_line(message);
    ExitCode::FAILURE
}

// crates/mirror-acceptance-cli/src/main.rs
// ============================================================================
// Module: Mirror Acceptance CLI Entry Point
// Description: Command dispatcher for running acceptance suites.
// Purpose: Load config, run the selected suites, and report via exit code.
// Dependencies: clap, mirror-acceptance-config, mirror-acceptance-core, tokio
// ============================================================================

//! ## Overview
//! The `mirror-acceptance` binary runs the account and balance acceptance
//! suites against a mirror REST API and prints the report. Exit codes:
//! `0` when every check passed, `1` when any check failed or output could not
//! be written, `2` on configuration or usage errors.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use mirror_acceptance_cli::render::render_json;
use mirror_acceptance_cli::render::render_text;
use mirror_acceptance_config::AcceptanceConfig;
use mirror_acceptance_core::AcceptanceReport;
use mirror_acceptance_core::MirrorClient;
use mirror_acceptance_core::SuiteKind;
use mirror_acceptance_core::run_selected;
use mirror_acceptance_core::sink_from_config;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Exit code for configuration and usage errors.
const EXIT_USAGE: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Mirror REST acceptance harness.
#[derive(Parser, Debug)]
#[command(
    name = "mirror-acceptance",
    about = "Run acceptance checks against a mirror REST API",
    version,
    disable_help_subcommand = true
)]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run acceptance suites and print the report.
    Run(RunCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `run`.
#[derive(Args, Debug)]
struct RunCommand {
    /// Config file path (defaults to env or `mirror-acceptance.toml`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Suites to run.
    #[arg(long, value_enum, default_value_t = SuiteArg::All)]
    suite: SuiteArg,
    /// Report format printed on stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Optional path receiving the JSON report.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate configuration and print the effective values.
    Validate {
        /// Config file path (defaults to env or `mirror-acceptance.toml`).
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

/// Suite selection.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum SuiteArg {
    /// Account suite only.
    Accounts,
    /// Balance suite only.
    Balances,
    /// Both suites.
    All,
}

impl SuiteArg {
    /// Returns the suite kinds selected by this argument.
    const fn kinds(self) -> &'static [SuiteKind] {
        match self {
            Self::Accounts => &[SuiteKind::Accounts],
            Self::Balances => &[SuiteKind::Balances],
            Self::All => &SuiteKind::ALL,
        }
    }
}

/// Output formats for the report.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Pretty-printed JSON output.
    Json,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying the process exit code.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// User-facing message.
    message: String,
    /// Exit code reported for this error.
    exit_code: u8,
}

impl CliError {
    /// Creates a runtime error (exit code 1).
    const fn new(message: String) -> Self {
        Self {
            message,
            exit_code: 1,
        }
    }

    /// Creates a configuration or usage error (exit code 2).
    const fn usage(message: String) -> Self {
        Self {
            message,
            exit_code: EXIT_USAGE,
        }
    }
}

/// Result alias for CLI operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err),
    }
}

/// Parses arguments and dispatches the selected command.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(command) => command_run(command).await,
        Commands::Config {
            command,
        } => command_config(command),
    }
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Executes the `run` command.
async fn command_run(command: RunCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let client = MirrorClient::from_config(&config)
        .map_err(|err| CliError::usage(format!("failed to build http client: {err}")))?;
    let sink = sink_from_config(&config.log)
        .map_err(|err| CliError::usage(format!("failed to open event log: {err}")))?;

    let report = run_selected(&client, &config.api, sink.as_ref(), command.suite.kinds()).await;

    if let Some(path) = &command.output {
        write_report_file(path, &report)?;
    }
    let rendered = match command.format {
        OutputFormat::Text => render_text(&report),
        OutputFormat::Json => json_report(&report)?,
    };
    write_stdout_line(&rendered)
        .map_err(|err| CliError::new(format!("failed to write stdout: {err}")))?;
    Ok(report_exit_code(&report))
}

/// Maps a report to the process exit code.
fn report_exit_code(report: &AcceptanceReport) -> ExitCode {
    if report.success() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// Serializes the report as JSON.
fn json_report(report: &AcceptanceReport) -> CliResult<String> {
    render_json(report).map_err(|err| CliError::new(format!("failed to serialize report: {err}")))
}

/// Writes the JSON report to `path`.
fn write_report_file(path: &Path, report: &AcceptanceReport) -> CliResult<()> {
    let mut json = json_report(report)?;
    json.push('\n');
    fs::write(path, json)
        .map_err(|err| CliError::new(format!("failed to write {}: {err}", path.display())))
}

// ============================================================================
// SECTION: Config Command
// ============================================================================

/// Executes `config` subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate {
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let effective = serde_json::to_string_pretty(&config)
                .map_err(|err| CliError::new(format!("failed to serialize config: {err}")))?;
            write_stdout_line("config ok")
                .and_then(|()| write_stdout_line(&effective))
                .map_err(|err| CliError::new(format!("failed to write stdout: {err}")))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Loads and validates configuration, mapping failures to usage errors.
fn load_config(path: Option<&Path>) -> CliResult<AcceptanceConfig> {
    AcceptanceConfig::load(path).map_err(|err| CliError::usage(err.to_string()))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message to stderr and returns its exit code.
fn emit_error(error: &CliError) -> ExitCode {
    let _ = write_stderr_line(&format!("error: {error}"));
    ExitCode::from(error.exit_code)
}

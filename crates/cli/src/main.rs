// rollcall CLI - reconcile a class roster against a grading export

mod exit_codes;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rollcall_recon::ReconError;
use tracing_subscriber::EnvFilter;

use exit_codes::{
    EXIT_ERROR, EXIT_INVALID_CONFIG, EXIT_INVALID_EXPORT, EXIT_INVALID_ROSTER, EXIT_SUCCESS,
    EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "Match a class roster against a grading export and report grades per student")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// More log output on stderr (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a reconciliation described by a .rollcall.toml file
    #[command(after_help = "\
Examples:
  rollcall run quiz.rollcall.toml
  rollcall run quiz.rollcall.toml --json
  rollcall run quiz.rollcall.toml --output report.txt --strict")]
    Run {
        /// Path to the .rollcall.toml config file
        config: PathBuf,

        /// Write the report as JSON (overrides output.format)
        #[arg(long)]
        json: bool,

        /// Write the report to a file (overrides output.path)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Exit with code 6 when any student is missing, unexpected, or ambiguous
        #[arg(long)]
        strict: bool,
    },

    /// Reconcile a roster and an export given directly on the command line
    #[command(after_help = "\
Examples:
  rollcall match --roster classes/10.8.txt --export grades/quiz.csv --grade-column 'Grade/10.00'
  rollcall match --roster 10.8.txt --export quiz.csv --first-name-column 'First name' --surname-column Surname
  rollcall match --roster 10.8.txt --export quiz.csv --ignore 'Overall average' --sort name --json
  rollcall match --roster 10.8.txt --export quiz-1.csv --export quiz-2.csv")]
    Match(recon::MatchArgs),

    /// Validate a .rollcall.toml config without loading any data
    #[command(after_help = "\
Examples:
  rollcall validate quiz.rollcall.toml")]
    Validate {
        /// Path to the .rollcall.toml config file
        config: PathBuf,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("ROLLCALL_GIT_HASH"), ")",
        "\nengine:  rollcall-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("ROLLCALL_TARGET"),
    )
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run { config, json, output, strict } => recon::cmd_run(config, json, output, strict),
        Commands::Match(args) => recon::cmd_match(args),
        Commands::Validate { config } => recon::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INVALID_CONFIG, message: msg.into(), hint: None }
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let code = match &err {
            ReconError::InvalidRoster { .. } => EXIT_INVALID_ROSTER,
            ReconError::InvalidExport { .. } => EXIT_INVALID_EXPORT,
            ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
            ReconError::Io(_) => EXIT_ERROR,
        };
        let hint = match &err {
            ReconError::InvalidExport { reason, .. } if reason.starts_with("missing column") => {
                Some("check the export's header row against name_column / grade_column".to_string())
            }
            ReconError::InvalidRoster { reason, .. } if reason == "no usable names" => {
                Some("the roster needs one student name per line".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}

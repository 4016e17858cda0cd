//! `rollcall run` / `match` / `validate`: file glue around `rollcall-recon`.

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use rollcall_recon::config::{ExportFormat, ReportFormat, RunConfig, SortOrder};
use rollcall_recon::report::{render, write_report, Report, ReportMeta};
use rollcall_recon::{load_export, load_roster, reconcile};

use crate::exit_codes::EXIT_DISCREPANCIES;
use crate::CliError;

#[derive(Args)]
pub struct MatchArgs {
    /// Roster file, one student name per line
    #[arg(long)]
    roster: PathBuf,

    /// Grading export (CSV with a header row); repeat to check several
    #[arg(long = "export", value_name = "PATH", required = true)]
    exports: Vec<PathBuf>,

    /// Header of the column holding the full name
    #[arg(long, default_value = "Full name")]
    name_column: String,

    /// Header of the first-name column (use with --surname-column)
    #[arg(long, requires = "surname_column")]
    first_name_column: Option<String>,

    /// Header of the surname column (use with --first-name-column)
    #[arg(long, requires = "first_name_column")]
    surname_column: Option<String>,

    /// Header of the grade column to report
    #[arg(long)]
    grade_column: Option<String>,

    /// Field delimiter
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Export names that are not students (repeatable), e.g. 'Overall average'
    #[arg(long = "ignore", value_name = "NAME")]
    ignore_names: Vec<String>,

    /// Report order
    #[arg(long, value_enum, default_value = "input")]
    sort: SortArg,

    /// Title for the report (defaults to the roster file name)
    #[arg(long)]
    name: Option<String>,

    /// Write the report as JSON
    #[arg(long)]
    json: bool,

    /// Write the report to a file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Exit with code 6 when any student is missing, unexpected, or ambiguous
    #[arg(long)]
    strict: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    /// Roster order, then export-only names
    Input,
    /// Alphabetical by name
    Name,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Input => SortOrder::Input,
            SortArg::Name => SortOrder::Name,
        }
    }
}

/// Everything needed for one run, resolved from config or flags. Each export
/// is reconciled against the roster on its own.
struct Job {
    name: String,
    roster: PathBuf,
    exports: Vec<PathBuf>,
    format: ExportFormat,
    report_format: ReportFormat,
    sort: SortOrder,
    output: Option<PathBuf>,
    strict: bool,
}

fn read_config(config_path: &Path) -> Result<RunConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| {
        CliError::config(format!("cannot read config {}: {e}", config_path.display()))
    })?;
    let config = RunConfig::from_toml(&config_str)?;
    tracing::debug!(config = %config_path.display(), name = %config.name, "run config loaded");
    Ok(config)
}

pub fn cmd_run(
    config_path: PathBuf,
    json: bool,
    output: Option<PathBuf>,
    strict: bool,
) -> Result<(), CliError> {
    let config = read_config(&config_path)?;

    // Resolve file paths relative to config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let exports: Vec<PathBuf> = config.export_paths().into_iter().map(|p| base_dir.join(p)).collect();

    let job = Job {
        roster: base_dir.join(&config.roster),
        exports,
        report_format: if json { ReportFormat::Json } else { config.output.format },
        sort: config.output.sort,
        output: output.or_else(|| config.output.path.as_ref().map(|p| base_dir.join(p))),
        name: config.name,
        format: config.format,
        strict,
    };
    execute(job)
}

pub fn cmd_match(args: MatchArgs) -> Result<(), CliError> {
    let format = ExportFormat {
        name_column: args.name_column,
        delimiter: args.delimiter,
        first_name_column: args.first_name_column,
        surname_column: args.surname_column,
        grade_column: args.grade_column,
        ignore_names: args.ignore_names,
    };
    format.validate().map_err(|e| CliError::args(e.to_string()))?;

    let name = args.name.unwrap_or_else(|| {
        args.roster
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "rollcall".to_string())
    });

    let job = Job {
        name,
        roster: args.roster,
        exports: args.exports,
        format,
        report_format: if args.json { ReportFormat::Json } else { ReportFormat::Text },
        sort: args.sort.into(),
        output: args.output,
        strict: args.strict,
    };
    execute(job)
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    let name_source = match (&config.format.first_name_column, &config.format.surname_column) {
        (Some(first), Some(last)) => format!("'{first}' + '{last}'"),
        _ => format!("'{}'", config.format.name_column),
    };
    eprintln!(
        "valid: '{}' roster {}, export {} (name from {})",
        config.name,
        config.roster,
        config.export_paths().join(", "),
        name_source,
    );
    Ok(())
}

fn execute(job: Job) -> Result<(), CliError> {
    let roster = load_roster(&job.roster)?;

    // Load everything before printing anything: a bad export aborts the run.
    let mut reports = Vec::with_capacity(job.exports.len());
    for path in &job.exports {
        let export = load_export(path, &job.format)?;
        let result = reconcile(&roster, &export.rows);
        let meta = ReportMeta::new(
            &job.name,
            job.roster.display().to_string(),
            path.display().to_string(),
            job.format.grade_column.clone(),
        );
        reports.push(Report::new(meta, result, export.warnings, job.sort));
    }

    match job.output {
        Some(ref path) => {
            write_report(&reports, job.report_format, path)?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            let body = render(&reports, job.report_format)?;
            match job.report_format {
                ReportFormat::Json => println!("{body}"),
                ReportFormat::Text => print!("{body}"),
            }
        }
    }

    // Human summary to stderr, one line per export
    for report in &reports {
        let s = &report.summary;
        eprintln!(
            "{}: {} students, {} matched, {} missing, {} unexpected, {} ambiguous, {} export row(s) dropped ({})",
            report.meta.name, s.total, s.matched, s.missing, s.unexpected, s.ambiguous, report.dropped_rows,
            report.meta.export,
        );
    }

    let discrepancies: usize = reports.iter().map(|r| r.summary.discrepancies()).sum();
    if job.strict && discrepancies > 0 {
        return Err(CliError {
            code: EXIT_DISCREPANCIES,
            message: format!("{discrepancies} student(s) need manual review"),
            hint: Some("see the missing/unexpected/ambiguous lines in the report".into()),
        });
    }

    Ok(())
}

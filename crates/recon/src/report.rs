//! Report rendering: the human-facing artifact of a run.
//!
//! The text layout puts the grade first, one student per line, so it can be
//! pasted into a gradebook column. Ambiguous records list every colliding
//! row underneath so whoever keeps the gradebook can pick the right one.

use std::fmt::Write as _;
use std::path::Path;

use feruca::Collator;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::config::{ReportFormat, SortOrder};
use crate::error::ReconError;
use crate::model::{
    ExportRow, LoadWarning, MatchRecord, MatchStatus, ReconResult, ReconSummary, RosterEntry,
};

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub name: String,
    pub engine_version: String,
    pub run_at: String,
    pub roster: String,
    pub export: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_column: Option<String>,
}

impl ReportMeta {
    pub fn new(
        name: impl Into<String>,
        roster: impl Into<String>,
        export: impl Into<String>,
        grade_column: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            roster: roster.into(),
            export: export.into(),
            grade_column,
        }
    }
}

/// One line of the report: a record with its display name and grade resolved.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRecord {
    pub name: String,
    pub status: MatchStatus,
    pub grade: Option<String>,
    pub roster_entries: Vec<RosterEntry>,
    pub export_rows: Vec<ExportRow>,
}

impl ReportRecord {
    fn from_match(record: MatchRecord, grade_column: Option<&str>) -> Self {
        let grade = grade_column
            .and_then(|col| record.grade(col))
            .map(str::to_string);
        Self {
            name: record.display_name().to_string(),
            status: record.status,
            grade,
            roster_entries: record.roster_entries,
            export_rows: record.export_rows,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub summary: ReconSummary,
    pub dropped_rows: usize,
    pub records: Vec<ReportRecord>,
    pub warnings: Vec<LoadWarning>,
}

impl Report {
    pub fn new(
        meta: ReportMeta,
        result: ReconResult,
        warnings: Vec<LoadWarning>,
        sort: SortOrder,
    ) -> Self {
        let grade_column = meta.grade_column.clone();
        let mut records: Vec<ReportRecord> = result
            .records
            .into_iter()
            .map(|r| ReportRecord::from_match(r, grade_column.as_deref()))
            .collect();

        if sort == SortOrder::Name {
            let mut collator = Collator::default();
            records.sort_by(|a, b| collator.collate(a.name.as_str(), b.name.as_str()));
        }

        Self {
            meta,
            summary: result.summary,
            dropped_rows: warnings.len(),
            records,
            warnings,
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render one section per export. Text sections are separated by a blank
/// line. JSON is a single report object for one export and an array of them
/// for several.
pub fn render(reports: &[Report], format: ReportFormat) -> Result<String, ReconError> {
    match (format, reports) {
        (ReportFormat::Text, _) => Ok(reports
            .iter()
            .map(render_text)
            .collect::<Vec<_>>()
            .join("\n")),
        (ReportFormat::Json, [report]) => render_json(report),
        (ReportFormat::Json, _) => to_json(reports),
    }
}

pub fn render_json(report: &Report) -> Result<String, ReconError> {
    to_json(report)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ReconError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ReconError::Io(format!("JSON serialization error: {e}")))
}

pub fn render_text(report: &Report) -> String {
    let grade_width = report
        .records
        .iter()
        .map(|r| grade_cell(r).width())
        .chain(std::iter::once("GRADE".len()))
        .max()
        .unwrap_or(0);
    let name_width = report
        .records
        .iter()
        .map(|r| r.name.width())
        .chain(std::iter::once("NAME".len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "# {} (roster: {}, export: {})",
        report.meta.name, report.meta.roster, report.meta.export
    );
    let _ = writeln!(
        out,
        "{}  {}  STATUS",
        pad_right("GRADE", grade_width),
        pad_right("NAME", name_width)
    );

    for r in &report.records {
        let _ = writeln!(
            out,
            "{}  {}  {}",
            pad_right(grade_cell(r), grade_width),
            pad_right(&r.name, name_width),
            r.status
        );

        if r.status == MatchStatus::AmbiguousMatch {
            for e in &r.roster_entries {
                let _ = writeln!(out, "    roster line {}: {}", e.line, e.raw_name);
            }
            for row in &r.export_rows {
                let grade = report
                    .meta
                    .grade_column
                    .as_deref()
                    .and_then(|col| row.grade(col))
                    .unwrap_or("-");
                let _ = writeln!(out, "    export line {}: {} ({grade})", row.line, row.raw_name);
            }
        }
    }

    for w in &report.warnings {
        let _ = writeln!(out, "warning: {w}");
    }

    let s = &report.summary;
    let _ = writeln!(
        out,
        "{} students: {} matched, {} missing from export, {} unexpected in export, {} ambiguous, {} export row(s) dropped",
        s.total, s.matched, s.missing, s.unexpected, s.ambiguous, report.dropped_rows,
    );
    out
}

/// Render and write to `path`.
pub fn write_report(reports: &[Report], format: ReportFormat, path: &Path) -> Result<(), ReconError> {
    let body = render(reports, format)?;
    std::fs::write(path, body)
        .map_err(|e| ReconError::Io(format!("cannot write {}: {e}", path.display())))
}

fn grade_cell(r: &ReportRecord) -> &str {
    match (r.status, r.grade.as_deref()) {
        (MatchStatus::AmbiguousMatch, _) => "?",
        (_, Some(g)) => g,
        (_, None) => "-",
    }
}

/// Right-pad to `width` display columns (CJK and combining marks aware).
fn pad_right(s: &str, width: usize) -> String {
    let sw = s.width();
    if sw >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - sw))
    }
}

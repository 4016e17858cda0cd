//! Grading export parsing (Moodle-style delimited text, header row first).

use std::collections::HashSet;
use std::path::Path;

use crate::config::ExportFormat;
use crate::error::ReconError;
use crate::model::{CanonicalKey, ExportRow, ExportTable, Fields, LoadWarning, WarningKind};
use crate::normalize::normalize;

/// Where the student's name comes from in each row.
enum NameSource {
    Single(usize),
    Split { first: usize, surname: usize },
}

/// Read and parse an export file. Missing or unreadable files are
/// `InvalidExport`.
pub fn load_export(path: &Path, format: &ExportFormat) -> Result<ExportTable, ReconError> {
    let resource = path.display().to_string();
    let text = std::fs::read_to_string(path)
        .map_err(|e| ReconError::export(&resource, format!("cannot read: {e}")))?;
    parse_export(&resource, &text, format)
}

/// Parse export text into rows keyed by header.
///
/// Rows without a name, rows shorter than the header, and rows whose name is
/// in `ignore_names` are dropped and reported in `ExportTable::warnings`.
/// Structural problems (missing column, nothing left after dropping) are
/// `InvalidExport`.
pub fn parse_export(
    resource: &str,
    text: &str,
    format: &ExportFormat,
) -> Result<ExportTable, ReconError> {
    format.validate()?;

    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(format.delimiter_byte())
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::export(resource, format!("cannot read header: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, ReconError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReconError::export(resource, format!("missing column '{name}'")))
    };

    let name_source = match format.split_name_columns() {
        Some((first, surname)) => NameSource::Split {
            first: idx(first)?,
            surname: idx(surname)?,
        },
        None => NameSource::Single(idx(&format.name_column)?),
    };

    if let Some(ref grade_column) = format.grade_column {
        idx(grade_column)?;
    }

    let ignored: HashSet<CanonicalKey> = format
        .ignore_names
        .iter()
        .map(|n| normalize(n))
        .filter(|k| !k.is_empty())
        .collect();

    let mut rows = Vec::new();
    let mut warnings = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|e| ReconError::export(resource, e.to_string()))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() < headers.len() {
            warnings.push(LoadWarning {
                line,
                kind: WarningKind::ShortRow {
                    expected: headers.len(),
                    found: record.len(),
                },
            });
            continue;
        }

        let raw_name = match name_source {
            NameSource::Single(i) => record.get(i).unwrap_or("").trim().to_string(),
            NameSource::Split { first, surname } => {
                let parts = [record.get(first), record.get(surname)];
                parts
                    .iter()
                    .flatten()
                    .map(|p| p.trim())
                    .filter(|p| !p.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            }
        };

        let key = normalize(&raw_name);
        if key.is_empty() {
            warnings.push(LoadWarning { line, kind: WarningKind::EmptyName });
            continue;
        }
        if ignored.contains(&key) {
            warnings.push(LoadWarning {
                line,
                kind: WarningKind::Ignored { name: raw_name },
            });
            continue;
        }

        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();

        rows.push(ExportRow {
            raw_name,
            line,
            fields: Fields::new(fields),
        });
    }

    for warning in &warnings {
        tracing::warn!(resource, %warning, "export row dropped");
    }

    if rows.is_empty() {
        let reason = if warnings.is_empty() {
            "no data rows".to_string()
        } else {
            format!("no usable data rows ({} dropped)", warnings.len())
        };
        return Err(ReconError::export(resource, reason));
    }

    tracing::debug!(resource, rows = rows.len(), dropped = warnings.len(), "export parsed");
    Ok(ExportTable { headers, rows, warnings })
}

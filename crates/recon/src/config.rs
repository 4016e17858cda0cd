use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// A `.rollcall.toml` run: which roster against which exports, and where the
/// report goes. Paths are relative to the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub name: String,
    pub roster: String,
    /// A single export. Use `exports` to check the class against several.
    #[serde(default)]
    pub export: Option<String>,
    #[serde(default)]
    pub exports: Vec<String>,
    #[serde(default)]
    pub format: ExportFormat,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Export layout
// ---------------------------------------------------------------------------

/// Column layout of the grading export.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportFormat {
    pub name_column: String,
    pub delimiter: char,
    /// Moodle exports carry "First name" and "Surname" separately. When both
    /// are set the name is built from them and `name_column` is unused.
    pub first_name_column: Option<String>,
    pub surname_column: Option<String>,
    pub grade_column: Option<String>,
    /// Rows that are not students (e.g. "Overall average").
    pub ignore_names: Vec<String>,
}

impl Default for ExportFormat {
    fn default() -> Self {
        Self {
            name_column: "Full name".into(),
            delimiter: ',',
            first_name_column: None,
            surname_column: None,
            grade_column: None,
            ignore_names: Vec::new(),
        }
    }
}

impl ExportFormat {
    pub fn validate(&self) -> Result<(), ReconError> {
        if !self.delimiter.is_ascii() {
            return Err(ReconError::ConfigValidation(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )));
        }
        if matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(ReconError::ConfigValidation(format!(
                "delimiter {:?} is not allowed",
                self.delimiter
            )));
        }

        match (&self.first_name_column, &self.surname_column) {
            (Some(_), None) | (None, Some(_)) => {
                return Err(ReconError::ConfigValidation(
                    "first_name_column and surname_column must be set together".into(),
                ));
            }
            (Some(first), Some(last)) if first.trim().is_empty() || last.trim().is_empty() => {
                return Err(ReconError::ConfigValidation(
                    "first_name_column and surname_column must not be empty".into(),
                ));
            }
            (None, None) if self.name_column.trim().is_empty() => {
                return Err(ReconError::ConfigValidation("name_column must not be empty".into()));
            }
            _ => {}
        }

        if matches!(&self.grade_column, Some(g) if g.trim().is_empty()) {
            return Err(ReconError::ConfigValidation("grade_column must not be empty".into()));
        }

        Ok(())
    }

    /// Delimiter as the byte the CSV reader wants. Only valid after `validate`.
    pub(crate) fn delimiter_byte(&self) -> u8 {
        let mut buf = [0u8; 4];
        self.delimiter.encode_utf8(&mut buf);
        buf[0]
    }

    /// Name columns as (first, surname) when the split layout is configured.
    pub(crate) fn split_name_columns(&self) -> Option<(&str, &str)> {
        match (&self.first_name_column, &self.surname_column) {
            (Some(first), Some(last)) => Some((first.as_str(), last.as_str())),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub format: ReportFormat,
    pub sort: SortOrder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Roster order, then export-only names in export order.
    #[default]
    Input,
    /// Alphabetical by display name, Unicode collation order.
    Name,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl RunConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: RunConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.name.trim().is_empty() {
            return Err(ReconError::ConfigValidation("name must not be empty".into()));
        }
        if self.roster.trim().is_empty() {
            return Err(ReconError::ConfigValidation("roster path must not be empty".into()));
        }
        if self.export.is_some() && !self.exports.is_empty() {
            return Err(ReconError::ConfigValidation(
                "set either export or exports, not both".into(),
            ));
        }
        let exports = self.export_paths();
        if exports.is_empty() {
            return Err(ReconError::ConfigValidation("at least one export is required".into()));
        }
        if exports.iter().any(|p| p.trim().is_empty()) {
            return Err(ReconError::ConfigValidation("export path must not be empty".into()));
        }
        if matches!(&self.output.path, Some(p) if p.trim().is_empty()) {
            return Err(ReconError::ConfigValidation("output.path must not be empty".into()));
        }
        self.format.validate()
    }

    /// Export paths in config order.
    pub fn export_paths(&self) -> Vec<&str> {
        self.export
            .iter()
            .chain(&self.exports)
            .map(String::as_str)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

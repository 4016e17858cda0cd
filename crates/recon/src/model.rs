use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One enrolled student, as written in the roster file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub raw_name: String,
    /// 1-based line in the roster file.
    pub line: u64,
}

/// One data row of the grading export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub raw_name: String,
    /// 1-based line in the export file (the header is line 1).
    pub line: u64,
    pub fields: Fields,
}

impl ExportRow {
    /// Grade value in `column`. Empty cells and Moodle's `-` placeholder
    /// count as no grade.
    pub fn grade(&self, column: &str) -> Option<&str> {
        let value = self.fields.get(column)?.trim();
        if value.is_empty() || value == "-" {
            None
        } else {
            Some(value)
        }
    }
}

/// Header -> value pairs of an export row, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(Vec<(String, String)>);

impl Fields {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (header, value) in &self.0 {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

/// Parsed export: headers, usable rows, and the rows dropped along the way.
#[derive(Debug, Clone)]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<ExportRow>,
    pub warnings: Vec<LoadWarning>,
}

// ---------------------------------------------------------------------------
// Row-level warnings
// ---------------------------------------------------------------------------

/// A non-fatal problem with one export row. The row is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadWarning {
    pub line: u64,
    #[serde(flatten)]
    pub kind: WarningKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum WarningKind {
    /// Name cell empty (or nothing but punctuation).
    EmptyName,
    /// Fewer fields than the header.
    ShortRow { expected: usize, found: usize },
    /// Name listed in `ignore_names`.
    Ignored { name: String },
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            WarningKind::EmptyName => write!(f, "line {}: empty name, row dropped", self.line),
            WarningKind::ShortRow { expected, found } => write!(
                f,
                "line {}: {found} field(s), header has {expected}, row dropped",
                self.line
            ),
            WarningKind::Ignored { name } => {
                write!(f, "line {}: ignored name '{name}'", self.line)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Normalized student identity. Only ever compared, never shown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub(crate) fn new(key: String) -> Self {
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    MissingFromExport,
    UnexpectedInExport,
    AmbiguousMatch,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Matched => write!(f, "matched"),
            Self::MissingFromExport => write!(f, "missing_from_export"),
            Self::UnexpectedInExport => write!(f, "unexpected_in_export"),
            Self::AmbiguousMatch => write!(f, "ambiguous_match"),
        }
    }
}

/// Everything both inputs say about one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    #[serde(skip)]
    pub key: CanonicalKey,
    pub status: MatchStatus,
    pub roster_entries: Vec<RosterEntry>,
    pub export_rows: Vec<ExportRow>,
}

impl MatchRecord {
    /// Name to show a human: the roster spelling when there is one.
    pub fn display_name(&self) -> &str {
        self.roster_entries
            .first()
            .map(|e| e.raw_name.as_str())
            .or_else(|| self.export_rows.first().map(|r| r.raw_name.as_str()))
            .unwrap_or("")
    }

    /// Grade of a matched student. Ambiguous records have no single grade.
    pub fn grade(&self, column: &str) -> Option<&str> {
        match (self.status, self.export_rows.as_slice()) {
            (MatchStatus::Matched, [row]) => row.grade(column),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub total: usize,
    pub matched: usize,
    pub missing: usize,
    pub unexpected: usize,
    pub ambiguous: usize,
}

impl ReconSummary {
    /// Anything a human has to look at.
    pub fn discrepancies(&self) -> usize {
        self.missing + self.unexpected + self.ambiguous
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconResult {
    pub summary: ReconSummary,
    pub records: Vec<MatchRecord>,
}

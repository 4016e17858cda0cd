//! Roster loading: one student name per line.

use std::path::Path;

use crate::error::ReconError;
use crate::model::RosterEntry;
use crate::normalize::normalize;

/// Read a roster file. Missing or unreadable files are `InvalidRoster`.
pub fn load_roster(path: &Path) -> Result<Vec<RosterEntry>, ReconError> {
    let resource = path.display().to_string();
    let text = std::fs::read_to_string(path)
        .map_err(|e| ReconError::roster(&resource, format!("cannot read: {e}")))?;
    parse_roster(&resource, &text)
}

/// Parse roster text. Blank lines and `#` comments are skipped, names are
/// trimmed, duplicates are kept in file order.
pub fn parse_roster(resource: &str, text: &str) -> Result<Vec<RosterEntry>, ReconError> {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);

    let mut entries = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let name = line.trim();
        if name.is_empty() || name.starts_with('#') {
            continue;
        }
        if normalize(name).is_empty() {
            tracing::warn!(resource, line = idx + 1, name, "roster line has no letters, skipped");
            continue;
        }
        entries.push(RosterEntry {
            raw_name: name.to_string(),
            line: idx as u64 + 1,
        });
    }

    if entries.is_empty() {
        return Err(ReconError::roster(resource, "no usable names"));
    }

    tracing::debug!(resource, names = entries.len(), "roster loaded");
    Ok(entries)
}

use std::collections::HashMap;

use crate::model::{
    CanonicalKey, ExportRow, MatchRecord, MatchStatus, ReconResult, RosterEntry,
};
use crate::normalize::normalize;
use crate::summary::compute_summary;

/// Entries and rows sharing one key, accumulated in input order.
#[derive(Default)]
struct Group<'a> {
    roster: Vec<&'a RosterEntry>,
    export: Vec<&'a ExportRow>,
}

/// Join roster and export by normalized name and classify every identity.
///
/// Pure: no IO, no state kept between calls. Records come out in roster
/// order, followed by names that only appear in the export, in export order.
pub fn reconcile(roster: &[RosterEntry], export: &[ExportRow]) -> ReconResult {
    let mut order: Vec<CanonicalKey> = Vec::new();
    let mut groups: HashMap<CanonicalKey, Group<'_>> = HashMap::new();

    for entry in roster {
        let key = normalize(&entry.raw_name);
        groups
            .entry(key)
            .or_insert_with_key(|k| {
                order.push(k.clone());
                Group::default()
            })
            .roster
            .push(entry);
    }
    for row in export {
        let key = normalize(&row.raw_name);
        groups
            .entry(key)
            .or_insert_with_key(|k| {
                order.push(k.clone());
                Group::default()
            })
            .export
            .push(row);
    }

    let records: Vec<MatchRecord> = order
        .into_iter()
        .filter_map(|key| {
            let group = groups.remove(&key)?;
            Some(MatchRecord {
                status: classify(group.roster.len(), group.export.len()),
                key,
                roster_entries: group.roster.into_iter().cloned().collect(),
                export_rows: group.export.into_iter().cloned().collect(),
            })
        })
        .collect();

    let summary = compute_summary(&records);
    tracing::debug!(
        total = summary.total,
        matched = summary.matched,
        missing = summary.missing,
        unexpected = summary.unexpected,
        ambiguous = summary.ambiguous,
        "reconciled"
    );

    ReconResult { summary, records }
}

/// Status from how many roster entries and export rows share a key.
///
/// Any repeat on either side is ambiguous, even when the other side is
/// empty: a student enrolled twice needs a human to look at it.
fn classify(roster: usize, export: usize) -> MatchStatus {
    match (roster, export) {
        (r, e) if r > 1 || e > 1 => MatchStatus::AmbiguousMatch,
        (1, 1) => MatchStatus::Matched,
        (_, 0) => MatchStatus::MissingFromExport,
        _ => MatchStatus::UnexpectedInExport,
    }
}

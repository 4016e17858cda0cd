// Property-based tests for name normalization and reconciliation.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::HashMap;

use proptest::prelude::*;
use rollcall_recon::model::{ExportRow, Fields, MatchStatus, RosterEntry};
use rollcall_recon::{normalize, reconcile, CanonicalKey};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Small name pool so collisions between and within sides are common.
fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Alice Smith".to_string()),
        Just("Smith Alice".to_string()),
        Just("Bob Brown".to_string()),
        Just("bob  BROWN".to_string()),
        Just("Charlie Green".to_string()),
        Just("Jānis Bērziņš".to_string()),
        Just("Janis Berzins".to_string()),
        Just("O'Neil, Sean".to_string()),
        r"[A-Z][a-z]{1,5} [A-Z][a-z]{1,5}",
    ]
}

fn to_roster(names: &[String]) -> Vec<RosterEntry> {
    names
        .iter()
        .enumerate()
        .map(|(i, n)| RosterEntry { raw_name: n.clone(), line: i as u64 + 1 })
        .collect()
}

fn to_export(names: &[String]) -> Vec<ExportRow> {
    names
        .iter()
        .enumerate()
        .map(|(i, n)| ExportRow {
            raw_name: n.clone(),
            line: i as u64 + 2,
            fields: Fields::new(vec![("Full name".into(), n.clone()), ("Grade".into(), i.to_string())]),
        })
        .collect()
}

fn counts(names: &[String]) -> HashMap<CanonicalKey, usize> {
    let mut map = HashMap::new();
    for n in names {
        *map.entry(normalize(n)).or_insert(0) += 1;
    }
    map
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn normalize_ignores_token_order(tokens in prop::collection::vec(r"[A-Za-zāēīūčšž]{1,8}", 1..5)) {
        let forward = tokens.join(" ");
        let mut reversed = tokens.clone();
        reversed.reverse();
        prop_assert_eq!(normalize(&forward), normalize(&reversed.join(" ")));
    }

    #[test]
    fn normalize_ignores_spacing_and_case(tokens in prop::collection::vec(r"[a-z]{1,8}", 1..5)) {
        let plain = tokens.join(" ");
        let noisy = format!("  {}\t", tokens.join("   ").to_uppercase());
        prop_assert_eq!(normalize(&plain), normalize(&noisy));
    }

    #[test]
    fn normalize_is_idempotent(raw in r"[ -~āēīūčšžĀĒĪŪ]{0,30}") {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(once.as_str()), once);
    }
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn every_entry_and_row_in_exactly_one_record(
        roster_names in prop::collection::vec(arb_name(), 0..12),
        export_names in prop::collection::vec(arb_name(), 0..12),
    ) {
        let roster = to_roster(&roster_names);
        let export = to_export(&export_names);
        let result = reconcile(&roster, &export);

        let mut roster_lines: Vec<u64> = result.records.iter()
            .flat_map(|r| r.roster_entries.iter().map(|e| e.line)).collect();
        roster_lines.sort_unstable();
        prop_assert_eq!(roster_lines, (1..=roster.len() as u64).collect::<Vec<_>>());

        let mut export_lines: Vec<u64> = result.records.iter()
            .flat_map(|r| r.export_rows.iter().map(|e| e.line)).collect();
        export_lines.sort_unstable();
        prop_assert_eq!(export_lines, (2..export.len() as u64 + 2).collect::<Vec<_>>());

        let mut keys: Vec<&CanonicalKey> = result.records.iter().map(|r| &r.key).collect();
        let before = keys.len();
        keys.sort();
        keys.dedup();
        prop_assert_eq!(keys.len(), before, "one record per key");
    }

    #[test]
    fn status_follows_multiplicity(
        roster_names in prop::collection::vec(arb_name(), 0..12),
        export_names in prop::collection::vec(arb_name(), 0..12),
    ) {
        let roster_counts = counts(&roster_names);
        let export_counts = counts(&export_names);
        let result = reconcile(&to_roster(&roster_names), &to_export(&export_names));

        for record in &result.records {
            let r = roster_counts.get(&record.key).copied().unwrap_or(0);
            let e = export_counts.get(&record.key).copied().unwrap_or(0);
            prop_assert_eq!(record.roster_entries.len(), r);
            prop_assert_eq!(record.export_rows.len(), e);
            let expected = if r > 1 || e > 1 {
                MatchStatus::AmbiguousMatch
            } else if r == 1 && e == 1 {
                MatchStatus::Matched
            } else if e == 0 {
                MatchStatus::MissingFromExport
            } else {
                MatchStatus::UnexpectedInExport
            };
            prop_assert_eq!(record.status, expected);
        }

        let s = &result.summary;
        prop_assert_eq!(s.total, result.records.len());
        prop_assert_eq!(s.matched + s.missing + s.unexpected + s.ambiguous, s.total);
    }

    #[test]
    fn reconcile_is_deterministic(
        roster_names in prop::collection::vec(arb_name(), 0..12),
        export_names in prop::collection::vec(arb_name(), 0..12),
    ) {
        let roster = to_roster(&roster_names);
        let export = to_export(&export_names);
        prop_assert_eq!(reconcile(&roster, &export), reconcile(&roster.clone(), &export.clone()));
    }

    #[test]
    fn roster_keys_come_first(
        roster_names in prop::collection::vec(arb_name(), 1..12),
        export_names in prop::collection::vec(arb_name(), 0..12),
    ) {
        let result = reconcile(&to_roster(&roster_names), &to_export(&export_names));
        let first_export_only = result.records.iter()
            .position(|r| r.roster_entries.is_empty())
            .unwrap_or(result.records.len());
        prop_assert!(result.records[first_export_only..].iter().all(|r| r.roster_entries.is_empty()));

        // Roster-side records appear in first-occurrence order of the roster.
        let firsts: Vec<u64> = result.records[..first_export_only].iter()
            .map(|r| r.roster_entries[0].line).collect();
        prop_assert!(firsts.windows(2).all(|w| w[0] < w[1]));
    }
}

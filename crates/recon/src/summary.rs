use crate::model::{MatchRecord, MatchStatus, ReconSummary};

/// Compute summary counts from classified records.
pub fn compute_summary(records: &[MatchRecord]) -> ReconSummary {
    let mut summary = ReconSummary {
        total: records.len(),
        ..ReconSummary::default()
    };

    for r in records {
        match r.status {
            MatchStatus::Matched => summary.matched += 1,
            MatchStatus::MissingFromExport => summary.missing += 1,
            MatchStatus::UnexpectedInExport => summary.unexpected += 1,
            MatchStatus::AmbiguousMatch => summary.ambiguous += 1,
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    fn record(status: MatchStatus) -> MatchRecord {
        MatchRecord {
            key: normalize("k"),
            status,
            roster_entries: vec![],
            export_rows: vec![],
        }
    }

    #[test]
    fn summary_counts() {
        let records = vec![
            record(MatchStatus::Matched),
            record(MatchStatus::Matched),
            record(MatchStatus::MissingFromExport),
            record(MatchStatus::UnexpectedInExport),
            record(MatchStatus::AmbiguousMatch),
        ];
        let summary = compute_summary(&records);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.matched, 2);
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.unexpected, 1);
        assert_eq!(summary.ambiguous, 1);
        assert_eq!(summary.discrepancies(), 3);
    }
}

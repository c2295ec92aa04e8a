//! Stable ordering and ranking of the working set

use crate::types::{AdvisorRecord, BandTier, SortField, SortOrder, SortState};
use std::cmp::Ordering;

fn compare_field(a: &AdvisorRecord, b: &AdvisorRecord, field: SortField) -> Ordering {
    match field {
        SortField::AnnualizedPremium => a.annualized_premium.total_cmp(&b.annualized_premium),
        SortField::NoOfPolicies => a.no_of_policies.cmp(&b.no_of_policies),
    }
}

/// Stable sort by one numeric field.
///
/// Equal keys keep their input order in both directions. With no field the
/// input order is returned unchanged.
pub fn sort_records(records: &[AdvisorRecord], state: SortState) -> Vec<AdvisorRecord> {
    let mut sorted = records.to_vec();
    if let Some(field) = state.field {
        match state.order {
            SortOrder::Asc => sorted.sort_by(|a, b| compare_field(a, b, field)),
            SortOrder::Desc => sorted.sort_by(|a, b| compare_field(b, a, field)),
        }
    }
    sorted
}

/// A record paired with its 1-based rank and banding tier
#[derive(Debug, Clone, Copy)]
pub struct RankedRow<'a> {
    pub rank: usize,
    pub tier: BandTier,
    pub record: &'a AdvisorRecord,
}

/// Rank an already sorted sequence
pub fn rank_rows(sorted: &[AdvisorRecord]) -> Vec<RankedRow<'_>> {
    sorted
        .iter()
        .enumerate()
        .map(|(idx, record)| RankedRow {
            rank: idx + 1,
            tier: BandTier::for_rank(idx + 1),
            record,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str, policies: u64, premium: f64) -> AdvisorRecord {
        AdvisorRecord::new(code, format!("Advisor {}", code), "Active", policies, premium)
    }

    fn codes(records: &[AdvisorRecord]) -> Vec<&str> {
        records.iter().map(|r| r.advisor_code.as_str()).collect()
    }

    #[test]
    fn test_unsorted_is_identity() {
        let records = vec![record("C", 3, 1.0), record("A", 1, 3.0), record("B", 2, 2.0)];
        let sorted = sort_records(&records, SortState::default());
        assert_eq!(sorted, records);
    }

    #[test]
    fn test_sort_by_premium_both_directions() {
        let records = vec![record("A", 0, 250.5), record("B", 0, 10.0), record("C", 0, 1000.0)];

        let asc = sort_records(
            &records,
            SortState::new(SortField::AnnualizedPremium, SortOrder::Asc),
        );
        assert_eq!(codes(&asc), vec!["B", "A", "C"]);

        let desc = sort_records(
            &records,
            SortState::new(SortField::AnnualizedPremium, SortOrder::Desc),
        );
        assert_eq!(codes(&desc), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let records = vec![
            record("first", 5, 0.0),
            record("low", 1, 0.0),
            record("second", 5, 0.0),
            record("third", 5, 0.0),
        ];

        let asc = sort_records(&records, SortState::new(SortField::NoOfPolicies, SortOrder::Asc));
        assert_eq!(codes(&asc), vec!["low", "first", "second", "third"]);

        let desc = sort_records(&records, SortState::new(SortField::NoOfPolicies, SortOrder::Desc));
        assert_eq!(codes(&desc), vec!["first", "second", "third", "low"]);
    }

    #[test]
    fn test_rank_rows_assigns_tiers() {
        let records: Vec<AdvisorRecord> = (0..15).map(|i| record(&i.to_string(), i, 0.0)).collect();
        let ranked = rank_rows(&records);

        assert_eq!(ranked.len(), 15);
        assert_eq!(ranked[0].rank, 1);
        assert!(ranked[..3].iter().all(|r| r.tier == BandTier::Top));
        assert!(ranked[3..10].iter().all(|r| r.tier == BandTier::Upper));
        assert!(ranked[10..].iter().all(|r| r.tier == BandTier::Rest));
        assert_eq!(ranked[14].rank, 15);
    }
}

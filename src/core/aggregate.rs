use crate::core::error::{AnalysisError, Result};
use crate::core::model::{Cycle, RecalDatum, WILDCARD, WILDCARD_DINUC};
use crate::core::phred;

/// Stable grouping of records sharing a key, groups ordered ascending by key.
/// Within a group the original relative order is preserved.
pub fn group_by<K, F>(records: &[RecalDatum], key: F) -> Vec<(K, Vec<RecalDatum>)>
where
    K: Ord + Clone,
    F: Fn(&RecalDatum) -> K,
{
    let mut keyed: Vec<(K, RecalDatum)> = records
        .iter()
        .map(|datum| (key(datum), datum.clone()))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let mut groups: Vec<(K, Vec<RecalDatum>)> = Vec::new();
    for (k, datum) in keyed {
        match groups.last_mut() {
            Some((current, members)) if *current == k => members.push(datum),
            _ => groups.push((k, vec![datum])),
        }
    }
    groups
}

/// Merge one or more records into a single aggregate. Order-insensitive.
///
/// The aggregate's reported quality is the Phred transform of the summed
/// expected mismatch mass, a base-count-weighted quality rather than an
/// arithmetic mean of the input qualities. Identity fields come back as
/// wildcards; the caller fills in the dimension it grouped on.
pub fn combine(records: &[RecalDatum]) -> Result<RecalDatum> {
    if records.is_empty() {
        return Err(AnalysisError::EmptyAggregation);
    }
    Ok(merge(records))
}

/// Variant for filters that may legitimately match nothing: an empty set
/// yields a zero-base aggregate with quality 0 instead of an error.
pub fn combine_or_empty(records: &[RecalDatum]) -> RecalDatum {
    if records.is_empty() {
        RecalDatum::empty_aggregate()
    } else {
        merge(records)
    }
}

fn merge(records: &[RecalDatum]) -> RecalDatum {
    let mut total_bases = 0u64;
    let mut total_mismatches = 0u64;
    let mut expected_errors = 0.0f64;
    for datum in records {
        total_bases += datum.n_bases;
        total_mismatches += datum.n_mismatches;
        expected_errors += datum.expected_mismatches();
    }
    RecalDatum {
        read_group: WILDCARD.to_string(),
        dinuc: WILDCARD_DINUC.to_string(),
        q_reported: phred::quality_from_counts(expected_errors, total_bases as f64),
        cycle: Cycle::Any,
        n_bases: total_bases,
        n_mismatches: total_mismatches,
        q_empirical: phred::quality_from_counts(total_mismatches as f64, total_bases as f64),
    }
}

/// `group_by` then `combine` per group, ordered ascending by key.
pub fn group_and_combine<K, F>(records: &[RecalDatum], key: F) -> Vec<(K, RecalDatum)>
where
    K: Ord + Clone,
    F: Fn(&RecalDatum) -> K,
{
    group_by(records, key)
        .into_iter()
        .map(|(k, members)| (k, merge(&members)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datum(rg: &str, dinuc: &str, q: f64, cycle: i64, bases: u64, mismatches: u64) -> RecalDatum {
        RecalDatum::from_counts(
            rg.to_string(),
            dinuc.to_string(),
            q,
            Cycle::At(cycle),
            bases,
            mismatches,
        )
    }

    #[test]
    fn combine_of_single_record_is_identity() {
        let r = datum("A", "AC", 30.0, 5, 1000, 1);
        let merged = combine(std::slice::from_ref(&r)).unwrap();
        assert_eq!(merged.n_bases, r.n_bases);
        assert_eq!(merged.n_mismatches, r.n_mismatches);
        assert!((merged.q_reported - r.q_reported).abs() < 1e-9);
        assert!((merged.q_empirical - r.q_empirical).abs() < 1e-9);
    }

    #[test]
    fn combine_of_empty_set_fails() {
        assert!(matches!(combine(&[]), Err(AnalysisError::EmptyAggregation)));
    }

    #[test]
    fn combine_or_empty_yields_zero_base_aggregate() {
        let merged = combine_or_empty(&[]);
        assert_eq!(merged.n_bases, 0);
        assert_eq!(merged.q_reported, 0.0);
        assert_eq!(merged.q_empirical, 0.0);
    }

    #[test]
    fn combined_reported_quality_is_base_weighted() {
        // 100 bases at Q10 expect 10 errors, 300 bases at Q20 expect 3
        let merged = combine(&[
            datum("A", "AC", 10.0, 1, 100, 8),
            datum("A", "AC", 20.0, 2, 300, 4),
        ])
        .unwrap();
        assert_eq!(merged.n_bases, 400);
        assert_eq!(merged.n_mismatches, 12);
        let expected_q = phred::quality_from_counts(13.0, 400.0);
        assert!((merged.q_reported - expected_q).abs() < 1e-9);
        let empirical_q = phred::quality_from_counts(12.0, 400.0);
        assert!((merged.q_empirical - empirical_q).abs() < 1e-9);
        assert_eq!(merged.read_group, WILDCARD);
        assert_eq!(merged.dinuc, WILDCARD_DINUC);
        assert_eq!(merged.cycle, Cycle::Any);
    }

    #[test]
    fn groups_are_ordered_ascending_with_stable_members() {
        let records = vec![
            datum("A", "TT", 30.0, 3, 10, 0),
            datum("A", "AC", 30.0, 1, 20, 1),
            datum("A", "TT", 30.0, 2, 30, 2),
        ];
        let groups = group_by(&records, |d| d.dinuc.clone());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "AC");
        assert_eq!(groups[1].0, "TT");
        // original relative order within the TT group
        assert_eq!(groups[1].1[0].cycle, Cycle::At(3));
        assert_eq!(groups[1].1[1].cycle, Cycle::At(2));
    }

    #[test]
    fn group_and_combine_is_permutation_insensitive() {
        let records = vec![
            datum("A", "AC", 25.0, 1, 100, 2),
            datum("A", "TT", 30.0, 2, 200, 1),
            datum("A", "AC", 20.0, 3, 300, 9),
            datum("A", "TT", 35.0, 4, 400, 0),
        ];
        let mut reversed = records.clone();
        reversed.reverse();

        let forward = group_and_combine(&records, |d| d.dinuc.clone());
        let backward = group_and_combine(&reversed, |d| d.dinuc.clone());
        assert_eq!(forward.len(), backward.len());
        for ((ka, a), (kb, b)) in forward.iter().zip(backward.iter()) {
            assert_eq!(ka, kb);
            assert_eq!(a.n_bases, b.n_bases);
            assert_eq!(a.n_mismatches, b.n_mismatches);
            assert!((a.q_reported - b.q_reported).abs() < 1e-9);
            assert!((a.q_empirical - b.q_empirical).abs() < 1e-9);
        }
    }

    #[test]
    fn grouping_by_cycle_orders_positions_before_wildcard() {
        let mut records = vec![
            datum("A", "AC", 30.0, 9, 10, 0),
            datum("A", "AC", 30.0, 2, 10, 0),
        ];
        records.push(RecalDatum::from_counts(
            "A".to_string(),
            "AC".to_string(),
            30.0,
            Cycle::Any,
            10,
            0,
        ));
        let groups = group_and_combine(&records, |d| d.cycle);
        let keys: Vec<Cycle> = groups.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![Cycle::At(2), Cycle::At(9), Cycle::Any]);
    }
}

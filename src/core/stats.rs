use crate::core::aggregate;
use crate::core::error::{AnalysisError, Result};
use crate::core::model::RecalDatum;

/// Weighted median of a quality distribution: the reported quality of the
/// first entry, in ascending key order, whose cumulative base-count fraction
/// exceeds one half.
pub fn median(distribution: &[RecalDatum]) -> Result<f64> {
    let total: u64 = distribution.iter().map(|d| d.n_bases).sum();
    if distribution.is_empty() || total == 0 {
        return Err(AnalysisError::EmptyDistribution);
    }
    let mut cumulative = 0u64;
    for datum in distribution {
        cumulative += datum.n_bases;
        if cumulative as f64 / total as f64 > 0.5 {
            return Ok(datum.q_reported);
        }
    }
    // the final entry's cumulative fraction is 1.0, so the loop has returned
    Ok(distribution[distribution.len() - 1].q_reported)
}

/// Reported quality of the heaviest entry; ties go to the first occurrence.
pub fn mode(distribution: &[RecalDatum]) -> Result<f64> {
    distribution
        .iter()
        .reduce(|best, datum| {
            if datum.n_bases > best.n_bases {
                datum
            } else {
                best
            }
        })
        .map(|datum| datum.q_reported)
        .ok_or(AnalysisError::EmptyDistribution)
}

/// The base-count-weighted mean reported quality is already present on the
/// whole-population aggregate.
pub fn mean(all_bases: &RecalDatum) -> f64 {
    all_bases.q_reported
}

pub fn weighted_sample_stdev(values: &[f64], weights: &[u64], mean: f64) -> Result<f64> {
    let total: u64 = weights.iter().sum();
    if total <= 1 {
        return Err(AnalysisError::DegenerateSample {
            total_weight: total,
        });
    }
    let mut sum = 0.0;
    for (value, weight) in values.iter().zip(weights.iter()) {
        let diff = value - mean;
        sum += *weight as f64 * diff * diff;
    }
    Ok((sum / (total - 1) as f64).sqrt())
}

pub fn stdev_q_reported(distribution: &[RecalDatum], all_bases: &RecalDatum) -> Result<f64> {
    let values: Vec<f64> = distribution.iter().map(|d| d.q_reported).collect();
    let weights: Vec<u64> = distribution.iter().map(|d| d.n_bases).collect();
    weighted_sample_stdev(&values, &weights, mean(all_bases))
}

pub fn coefficient_of_variation(
    distribution: &[RecalDatum],
    all_bases: &RecalDatum,
) -> Result<f64> {
    let mean = mean(all_bases);
    if mean == 0.0 {
        return Err(AnalysisError::DivisionByZero);
    }
    Ok(stdev_q_reported(distribution, all_bases)? / mean)
}

/// Weighted root error between paired sequences. Not normalized by the total
/// weight; downstream consumers expect this exact quantity.
pub fn rmse(reported: &[f64], empirical: &[f64], weights: &[u64]) -> f64 {
    let mut sum = 0.0;
    for ((rep, emp), weight) in reported.iter().zip(empirical.iter()).zip(weights.iter()) {
        let diff = rep - emp;
        sum += *weight as f64 * diff * diff;
    }
    sum.sqrt()
}

pub fn rmse_reported_vs_empirical(distribution: &[RecalDatum]) -> f64 {
    let reported: Vec<f64> = distribution.iter().map(|d| d.q_reported).collect();
    let empirical: Vec<f64> = distribution.iter().map(|d| d.q_empirical).collect();
    let weights: Vec<u64> = distribution.iter().map(|d| d.n_bases).collect();
    rmse(&reported, &empirical, &weights)
}

/// Aggregates of the distribution entries reported above `threshold`, and of
/// those both reported and empirically confirmed above it. Empty filtered
/// sets yield zero-base aggregates rather than failing.
pub fn count_above_threshold(
    threshold: f64,
    distribution: &[RecalDatum],
) -> (RecalDatum, RecalDatum) {
    let qualified: Vec<RecalDatum> = distribution
        .iter()
        .filter(|d| d.q_reported > threshold)
        .cloned()
        .collect();
    let confirmed: Vec<RecalDatum> = distribution
        .iter()
        .filter(|d| d.q_reported > threshold && d.q_empirical > threshold)
        .cloned()
        .collect();
    (
        aggregate::combine_or_empty(&qualified),
        aggregate::combine_or_empty(&confirmed),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Cycle;

    // value:weight sample {0:1, 1:1, 2:2, 3:1, 4:3, 5:3, 6:2}
    const VALUES: [f64; 7] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    const WEIGHTS: [u64; 7] = [1, 1, 2, 1, 3, 3, 2];
    const MEAN: f64 = 3.615385;

    fn bin(q: f64, bases: u64, mismatches: u64) -> RecalDatum {
        RecalDatum::from_counts(
            "A".to_string(),
            "**".to_string(),
            q,
            Cycle::Any,
            bases,
            mismatches,
        )
    }

    fn fixture_distribution() -> Vec<RecalDatum> {
        VALUES
            .iter()
            .zip(WEIGHTS.iter())
            .map(|(&q, &w)| bin(q, w, 0))
            .collect()
    }

    #[test]
    fn weighted_stdev_matches_reference_sample() {
        let total: u64 = WEIGHTS.iter().sum();
        assert_eq!(total, 13);
        let stdev = weighted_sample_stdev(&VALUES, &WEIGHTS, MEAN).unwrap();
        assert!((stdev - 1.894662).abs() < 1e-4);
    }

    #[test]
    fn stdev_requires_more_than_unit_weight() {
        assert!(matches!(
            weighted_sample_stdev(&[5.0], &[1], 5.0),
            Err(AnalysisError::DegenerateSample { total_weight: 1 })
        ));
        assert!(matches!(
            weighted_sample_stdev(&[], &[], 0.0),
            Err(AnalysisError::DegenerateSample { total_weight: 0 })
        ));
    }

    #[test]
    fn median_of_reference_sample_is_four() {
        assert_eq!(median(&fixture_distribution()).unwrap(), 4.0);
    }

    #[test]
    fn median_fails_on_empty_or_weightless_distribution() {
        assert!(matches!(median(&[]), Err(AnalysisError::EmptyDistribution)));
        let weightless = vec![bin(10.0, 0, 0), bin(20.0, 0, 0)];
        assert!(matches!(
            median(&weightless),
            Err(AnalysisError::EmptyDistribution)
        ));
    }

    #[test]
    fn mode_of_reference_sample_is_first_heaviest() {
        // weights 3 at values 4 and 5; the first by key order wins
        assert_eq!(mode(&fixture_distribution()).unwrap(), 4.0);
        assert!(matches!(mode(&[]), Err(AnalysisError::EmptyDistribution)));
    }

    #[test]
    fn rmse_of_identical_sequences_is_zero() {
        let x = [3.0, 17.5, 40.0];
        let w = [2, 5, 11];
        assert_eq!(rmse(&x, &x, &w), 0.0);
    }

    #[test]
    fn rmse_is_unnormalized() {
        // 2*(3-1)^2 + 1*(5-8)^2 = 17
        let value = rmse(&[3.0, 5.0], &[1.0, 8.0], &[2, 1]);
        assert!((value - 17f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn coefficient_of_variation_fails_on_zero_mean() {
        let distribution = fixture_distribution();
        let all_bases = bin(0.0, 100, 50);
        assert!(matches!(
            coefficient_of_variation(&distribution, &all_bases),
            Err(AnalysisError::DivisionByZero)
        ));
    }

    #[test]
    fn threshold_counts_shrink_as_threshold_rises() {
        let distribution = vec![
            bin(15.0, 100, 10),
            bin(22.0, 200, 2),
            bin(27.0, 300, 1),
            bin(33.0, 400, 0),
        ];
        let mut previous_qualified = u64::MAX;
        let mut previous_confirmed = u64::MAX;
        for threshold in [20.0, 25.0, 30.0] {
            let (qualified, confirmed) = count_above_threshold(threshold, &distribution);
            assert!(qualified.n_bases <= previous_qualified);
            assert!(confirmed.n_bases <= previous_confirmed);
            assert!(confirmed.n_bases <= qualified.n_bases);
            previous_qualified = qualified.n_bases;
            previous_confirmed = confirmed.n_bases;
        }
    }

    #[test]
    fn threshold_counts_tolerate_an_empty_filter() {
        let distribution = vec![bin(10.0, 100, 10)];
        let (qualified, confirmed) = count_above_threshold(30.0, &distribution);
        assert_eq!(qualified.n_bases, 0);
        assert_eq!(qualified.q_reported, 0.0);
        assert_eq!(confirmed.n_bases, 0);
    }
}

/// Empirical quality assigned to a bin with zero observed mismatches.
pub const MAX_QUALITY: f64 = 40.0;

pub fn error_probability(q: f64) -> f64 {
    10f64.powf(-q / 10.0)
}

/// Phred transform of a mismatch rate. `n_mismatches` may be a fractional
/// expected count, not just an observed integer count.
pub fn quality_from_counts(n_mismatches: f64, n_bases: f64) -> f64 {
    // The zero-mismatch cap takes precedence over the zero-base case.
    if n_mismatches == 0.0 {
        MAX_QUALITY
    } else if n_bases == 0.0 {
        0.0
    } else {
        -10.0 * (n_mismatches / n_bases).log10()
    }
}

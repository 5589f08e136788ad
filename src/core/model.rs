use crate::core::phred;
use std::fmt;

/// Sentinel for a dimension aggregated across all its values.
pub const WILDCARD: &str = "*";
pub const WILDCARD_DINUC: &str = "**";

/// Sequencing-cycle index, or the wildcard position of an aggregate that
/// crosses cycles. `At` positions sort ascending; `Any` sorts last.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Cycle {
    At(i64),
    Any,
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cycle::At(pos) => write!(f, "{}", pos),
            Cycle::Any => write!(f, "{}", WILDCARD),
        }
    }
}

/// One quality-recalibration bin (raw) or one merged aggregate (derived).
///
/// `q_reported` is integral in raw records and fractional in aggregates,
/// where it is the Phred transform of the expected mismatch mass.
/// `q_empirical` is always derived from the counts, never taken on trust.
#[derive(Clone, Debug)]
pub struct RecalDatum {
    pub read_group: String,
    pub dinuc: String,
    pub q_reported: f64,
    pub cycle: Cycle,
    pub n_bases: u64,
    pub n_mismatches: u64,
    pub q_empirical: f64,
}

impl RecalDatum {
    pub fn from_counts(
        read_group: String,
        dinuc: String,
        q_reported: f64,
        cycle: Cycle,
        n_bases: u64,
        n_mismatches: u64,
    ) -> Self {
        Self {
            read_group,
            dinuc,
            q_reported,
            cycle,
            n_bases,
            n_mismatches,
            q_empirical: phred::quality_from_counts(n_mismatches as f64, n_bases as f64),
        }
    }

    /// Zero-base aggregate used where an empty filtered set is a valid
    /// result rather than an error.
    pub fn empty_aggregate() -> Self {
        Self {
            read_group: WILDCARD.to_string(),
            dinuc: WILDCARD_DINUC.to_string(),
            q_reported: 0.0,
            cycle: Cycle::Any,
            n_bases: 0,
            n_mismatches: 0,
            q_empirical: 0.0,
        }
    }

    /// Expected number of mismatched bases implied by the reported quality.
    pub fn expected_mismatches(&self) -> f64 {
        self.n_bases as f64 * phred::error_probability(self.q_reported)
    }

    /// Reported-quality bin key. Raw records carry integral reported
    /// qualities, so the rounding is exact for grouping purposes.
    pub fn reported_bin(&self) -> i64 {
        self.q_reported.round() as i64
    }
}

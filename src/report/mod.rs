pub mod basic_stats;
pub mod plot;
pub mod quality_by_cycle;
pub mod quality_by_dinuc;
pub mod reported_vs_empirical;

pub const BASIC_INFO_SUFFIX: &str = ".basic_info.dat";
pub const EMPIRICAL_VS_REPORTED_SUFFIX: &str = ".empirical_v_reported_quality.dat";
pub const QUALITY_BY_CYCLE_SUFFIX: &str = ".quality_difference_v_cycle.dat";
pub const QUALITY_BY_DINUC_SUFFIX: &str = ".quality_difference_v_dinucleotide.dat";

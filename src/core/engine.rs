use crate::core::aggregate;
use crate::core::error::Result;
use crate::core::model::RecalDatum;
use crate::core::parser::RecordReader;
use crate::core::stats;
use crossbeam_channel as channel;
use std::path::{Path, PathBuf};
use std::thread;

pub const QUALITY_THRESHOLDS: [i64; 3] = [20, 25, 30];

/// Built once from the command line, read-only afterwards.
pub struct RunConfig {
    pub output_dir: Option<PathBuf>,
    pub to_stdout: bool,
    pub dry_run: bool,
    pub selected_read_groups: Vec<String>,
    pub threads: usize,
}

pub struct ThresholdCounts {
    pub threshold: i64,
    pub qualified: RecalDatum,
    pub confirmed: RecalDatum,
}

pub struct BreakdownRow {
    pub datum: RecalDatum,
    pub q_diff: f64,
}

pub struct ReadGroupAnalysis {
    pub read_group: String,
    pub all_bases: RecalDatum,
    pub quality_distribution: Vec<RecalDatum>,
    pub median_q_reported: f64,
    pub mode_q_reported: f64,
    pub mean_q_reported: f64,
    pub stdev_q_reported: f64,
    pub coeff_of_variation: f64,
    pub rmse: f64,
    pub thresholds: Vec<ThresholdCounts>,
    pub by_cycle: Vec<BreakdownRow>,
    pub by_dinuc: Vec<BreakdownRow>,
}

pub struct ReadGroupResult {
    pub read_group: String,
    pub outcome: Result<ReadGroupAnalysis>,
}

/// Parse one covariate table and analyze each selected read group. Read
/// groups are mutually independent, so they fan out over a worker pool;
/// a failing group yields an error result without aborting the others.
pub fn analyze_file(path: &Path, cfg: &RunConfig) -> Result<Vec<ReadGroupResult>> {
    let records = RecordReader::open(path)?.read_all()?;
    let mut groups = aggregate::group_by(&records, |d| d.read_group.clone());
    if !cfg.selected_read_groups.is_empty() {
        groups.retain(|(rg, _)| cfg.selected_read_groups.iter().any(|s| s == rg));
    }
    Ok(analyze_groups(groups, cfg.threads))
}

fn analyze_groups(groups: Vec<(String, Vec<RecalDatum>)>, threads: usize) -> Vec<ReadGroupResult> {
    let total = groups.len();
    if total == 0 {
        return Vec::new();
    }
    let threads = threads.clamp(1, total);

    let (work_tx, work_rx) = channel::bounded::<(usize, String, Vec<RecalDatum>)>(total);
    let (result_tx, result_rx) = channel::unbounded::<(usize, ReadGroupResult)>();

    let mut workers = Vec::with_capacity(threads);
    for _ in 0..threads {
        let rx = work_rx.clone();
        let tx = result_tx.clone();
        workers.push(thread::spawn(move || {
            for (index, read_group, data) in rx.iter() {
                let outcome = analyze_read_group(&read_group, &data);
                let result = ReadGroupResult {
                    read_group,
                    outcome,
                };
                if tx.send((index, result)).is_err() {
                    break;
                }
            }
        }));
    }
    drop(result_tx);

    for (index, (read_group, data)) in groups.into_iter().enumerate() {
        if work_tx.send((index, read_group, data)).is_err() {
            break;
        }
    }
    drop(work_tx);

    let mut slots: Vec<Option<ReadGroupResult>> = (0..total).map(|_| None).collect();
    for (index, result) in result_rx.iter() {
        slots[index] = Some(result);
    }
    for worker in workers {
        let _ = worker.join();
    }
    slots.into_iter().flatten().collect()
}

pub fn analyze_read_group(read_group: &str, data: &[RecalDatum]) -> Result<ReadGroupAnalysis> {
    let mut all_bases = aggregate::combine(data)?;
    all_bases.read_group = read_group.to_string();

    let quality_distribution = quality_distribution(read_group, data);
    let mean_q_reported = stats::mean(&all_bases);
    let median_q_reported = stats::median(&quality_distribution)?;
    let mode_q_reported = stats::mode(&quality_distribution)?;
    let stdev_q_reported = stats::stdev_q_reported(&quality_distribution, &all_bases)?;
    let coeff_of_variation = stats::coefficient_of_variation(&quality_distribution, &all_bases)?;
    let rmse = stats::rmse_reported_vs_empirical(&quality_distribution);
    let thresholds = QUALITY_THRESHOLDS
        .iter()
        .map(|&threshold| {
            let (qualified, confirmed) =
                stats::count_above_threshold(threshold as f64, &quality_distribution);
            ThresholdCounts {
                threshold,
                qualified,
                confirmed,
            }
        })
        .collect();
    let by_cycle = breakdown_by_cycle(read_group, data);
    let by_dinuc = breakdown_by_dinuc(read_group, data);

    Ok(ReadGroupAnalysis {
        read_group: read_group.to_string(),
        all_bases,
        quality_distribution,
        median_q_reported,
        mode_q_reported,
        mean_q_reported,
        stdev_q_reported,
        coeff_of_variation,
        rmse,
        thresholds,
        by_cycle,
        by_dinuc,
    })
}

/// One entry per distinct reported quality, ascending. The integral bin key
/// is written back over the combined (fractional) reported quality so the
/// distribution is keyed by the value the base caller actually assigned.
pub fn quality_distribution(read_group: &str, data: &[RecalDatum]) -> Vec<RecalDatum> {
    aggregate::group_and_combine(data, |d| d.reported_bin())
        .into_iter()
        .map(|(bin, mut datum)| {
            datum.read_group = read_group.to_string();
            datum.q_reported = bin as f64;
            datum
        })
        .collect()
}

pub fn breakdown_by_cycle(read_group: &str, data: &[RecalDatum]) -> Vec<BreakdownRow> {
    aggregate::group_and_combine(data, |d| d.cycle)
        .into_iter()
        .map(|(cycle, mut datum)| {
            datum.read_group = read_group.to_string();
            datum.cycle = cycle;
            let q_diff = datum.q_empirical - datum.q_reported;
            BreakdownRow { datum, q_diff }
        })
        .collect()
}

pub fn breakdown_by_dinuc(read_group: &str, data: &[RecalDatum]) -> Vec<BreakdownRow> {
    aggregate::group_and_combine(data, |d| d.dinuc.clone())
        .into_iter()
        .map(|(dinuc, mut datum)| {
            datum.read_group = read_group.to_string();
            datum.dinuc = dinuc;
            let q_diff = datum.q_empirical - datum.q_reported;
            BreakdownRow { datum, q_diff }
        })
        .collect()
}

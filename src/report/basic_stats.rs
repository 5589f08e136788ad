use crate::core::engine::ReadGroupAnalysis;
use anyhow::Result;
use std::io::Write;

const LABEL_WIDTH: usize = 45;

pub fn write(w: &mut dyn Write, analysis: &ReadGroupAnalysis) -> Result<()> {
    let all = &analysis.all_bases;
    writeln!(w, "{:<LABEL_WIDTH$}{}", "read_group", analysis.read_group)?;
    writeln!(w, "{:<LABEL_WIDTH$}{}", "number_of_bases", all.n_bases)?;
    writeln!(
        w,
        "{:<LABEL_WIDTH$}{}",
        "number_of_mismatching_bases", all.n_mismatches
    )?;
    writeln!(
        w,
        "{:<LABEL_WIDTH$}{:.2}",
        "lane_wide_Qreported", all.q_reported
    )?;
    writeln!(
        w,
        "{:<LABEL_WIDTH$}{:.2}",
        "lane_wide_Qempirical", all.q_empirical
    )?;
    writeln!(
        w,
        "{:<LABEL_WIDTH$}{:.2}",
        "lane_wide_Qempirical_minus_Qreported",
        all.q_empirical - all.q_reported
    )?;
    writeln!(
        w,
        "{:<LABEL_WIDTH$}{:.2}",
        "median_Qreported", analysis.median_q_reported
    )?;
    writeln!(
        w,
        "{:<LABEL_WIDTH$}{:.2}",
        "mode_Qreported", analysis.mode_q_reported
    )?;
    writeln!(
        w,
        "{:<LABEL_WIDTH$}{:.2}",
        "average_Qreported", analysis.mean_q_reported
    )?;
    writeln!(
        w,
        "{:<LABEL_WIDTH$}{:.2}",
        "stdev_Qreported", analysis.stdev_q_reported
    )?;
    writeln!(
        w,
        "{:<LABEL_WIDTH$}{:.2}",
        "coeff_of_variation_Qreported", analysis.coeff_of_variation
    )?;
    writeln!(
        w,
        "{:<LABEL_WIDTH$}{:.2}",
        "RMSE(qReported,qEmpirical)", analysis.rmse
    )?;
    for counts in &analysis.thresholds {
        let t = counts.threshold;
        writeln!(
            w,
            "{:<LABEL_WIDTH$}{}",
            format!("number_of_q{}_bases", t),
            counts.qualified.n_bases
        )?;
        writeln!(
            w,
            "{:<LABEL_WIDTH$}{:.2}",
            format!("percent_of_q{}_bases", t),
            percent(counts.qualified.n_bases, all.n_bases)
        )?;
        writeln!(
            w,
            "{:<LABEL_WIDTH$}{}",
            format!("number_of_q{}_bases_with_qemp_above_q{}", t, t),
            counts.confirmed.n_bases
        )?;
        writeln!(
            w,
            "{:<LABEL_WIDTH$}{:.2}",
            format!("percent_of_q{}_bases_with_qemp_above_q{}", t, t),
            percent(counts.confirmed.n_bases, all.n_bases)
        )?;
    }
    Ok(())
}

fn percent(part: u64, total: u64) -> f64 {
    100.0 * part as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::analyze_read_group;
    use crate::core::model::{Cycle, RecalDatum};

    fn fixture() -> ReadGroupAnalysis {
        let data = vec![
            RecalDatum::from_counts("A".into(), "AC".into(), 30.0, Cycle::At(1), 1000, 1),
            RecalDatum::from_counts("A".into(), "AC".into(), 30.0, Cycle::At(2), 1000, 3),
            RecalDatum::from_counts("A".into(), "GG".into(), 25.0, Cycle::At(1), 500, 5),
        ];
        analyze_read_group("A", &data).unwrap()
    }

    #[test]
    fn labels_are_padded_to_a_fixed_column() {
        let mut out = Vec::new();
        write(&mut out, &fixture()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], format!("{:<45}A", "read_group"));
        assert_eq!(lines[1], format!("{:<45}2500", "number_of_bases"));
        assert_eq!(lines[2], format!("{:<45}9", "number_of_mismatching_bases"));
        for line in &lines {
            assert!(line.len() > 45, "short line: {:?}", line);
        }
    }

    #[test]
    fn threshold_block_is_emitted_per_threshold() {
        let mut out = Vec::new();
        write(&mut out, &fixture()).unwrap();
        let text = String::from_utf8(out).unwrap();
        for t in [20, 25, 30] {
            assert!(text.contains(&format!("number_of_q{}_bases", t)));
            assert!(text.contains(&format!("percent_of_q{}_bases", t)));
            assert!(text.contains(&format!("number_of_q{}_bases_with_qemp_above_q{}", t, t)));
        }
        // 2000 of 2500 bases clear the 25 threshold
        assert!(text.contains(&format!("{:<45}{:.2}", "percent_of_q25_bases", 80.0)));
    }
}

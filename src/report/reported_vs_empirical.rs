use crate::core::engine::ReadGroupAnalysis;
use anyhow::Result;
use std::io::Write;

pub fn write(w: &mut dyn Write, analysis: &ReadGroupAnalysis) -> Result<()> {
    writeln!(w, "Qreported    Qempirical   nMismatches     nBases")?;
    for datum in &analysis.quality_distribution {
        writeln!(
            w,
            "{:.2}  {:.2}   {:>12}    {:>12}",
            datum.q_reported, datum.q_empirical, datum.n_mismatches, datum.n_bases
        )?;
    }
    Ok(())
}

use crate::core::engine::ReadGroupAnalysis;
use anyhow::Result;
use std::io::Write;

pub fn write(w: &mut dyn Write, analysis: &ReadGroupAnalysis) -> Result<()> {
    writeln!(
        w,
        "# Note Qreported is a float here due to combining Qreported across quality bins -- Qreported is the expected Q across all Q bins, weighted by nBases"
    )?;
    writeln!(
        w,
        "Cycle    Qreported   Qempirical     Qempirical_Qreported     nMismatches     nBases"
    )?;
    for row in &analysis.by_cycle {
        writeln!(
            w,
            "{}   {:.2}  {:.2}   {:.2}     {:>12}    {:>12}",
            row.datum.cycle,
            row.datum.q_reported,
            row.datum.q_empirical,
            row.q_diff,
            row.datum.n_mismatches,
            row.datum.n_bases
        )?;
    }
    Ok(())
}

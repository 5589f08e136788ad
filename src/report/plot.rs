use crate::report::{
    EMPIRICAL_VS_REPORTED_SUFFIX, QUALITY_BY_CYCLE_SUFFIX, QUALITY_BY_DINUC_SUFFIX,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Plotting configuration, read from a TOML file:
///
/// ```toml
/// [r]
/// rscript = "/usr/bin/Rscript"
/// plot_q_emp_stated = "plots/plot_q_emp_stated.R"
/// plot_q_diff_by_cycle = "plots/plot_q_diff_by_cycle.R"
/// plot_q_diff_by_dinuc = "plots/plot_q_diff_by_dinuc.R"
/// ```
#[derive(Debug, Deserialize)]
pub struct PlotConfig {
    pub r: RScripts,
}

#[derive(Debug, Deserialize)]
pub struct RScripts {
    pub rscript: PathBuf,
    pub plot_q_emp_stated: PathBuf,
    pub plot_q_diff_by_cycle: PathBuf,
    pub plot_q_diff_by_dinuc: PathBuf,
}

impl PlotConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::from(path))
            .build()
            .with_context(|| format!("failed to read plot config {}", path.display()))?;
        cfg.try_deserialize()
            .with_context(|| format!("invalid plot config {}", path.display()))
    }

    fn plotter_for(&self, file: &Path) -> Option<&Path> {
        let name = file.file_name()?.to_str()?;
        if name.ends_with(EMPIRICAL_VS_REPORTED_SUFFIX) {
            Some(&self.r.plot_q_emp_stated)
        } else if name.ends_with(QUALITY_BY_CYCLE_SUFFIX) {
            Some(&self.r.plot_q_diff_by_cycle)
        } else if name.ends_with(QUALITY_BY_DINUC_SUFFIX) {
            Some(&self.r.plot_q_diff_by_dinuc)
        } else {
            None
        }
    }

    /// Run the matching plotter over each written table; files without a
    /// plotter (the basic-stats table) are skipped. In dry-run mode the
    /// commands are printed instead of executed.
    pub fn dispatch(&self, files: &[PathBuf], dry_run: bool) -> Result<()> {
        for file in files {
            let Some(plotter) = self.plotter_for(file) else {
                continue;
            };
            if dry_run {
                println!(
                    "{} {} {}",
                    self.r.rscript.display(),
                    plotter.display(),
                    file.display()
                );
                continue;
            }
            let status = Command::new(&self.r.rscript)
                .arg(plotter)
                .arg(file)
                .status()
                .with_context(|| format!("failed to launch {}", self.r.rscript.display()))?;
            if !status.success() {
                // one failed plot should not stop the remaining ones
                eprintln!("recal-qc: plot command failed for {}", file.display());
            }
        }
        Ok(())
    }
}

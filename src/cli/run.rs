use crate::cli::args::{AnalyzeArgs, Cli, Commands};
use crate::core::engine::{self, ReadGroupAnalysis, RunConfig};
use crate::report;
use crate::report::plot::PlotConfig;
use anyhow::{Context, Result, bail};
use clap::Parser;
use std::env;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub fn entry() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze(args) => run(args),
    }
}

fn run(args: AnalyzeArgs) -> Result<()> {
    let stats = stats_enabled();
    let t0 = Instant::now();

    for file in &args.files {
        if !file.is_file() {
            bail!("input file not found: {}", file.display());
        }
    }
    if args.threads == 0 {
        bail!("--threads must be >= 1");
    }
    if let Some(dir) = &args.dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output dir {}", dir.display()))?;
    }

    let plot_config = match &args.config {
        Some(path) => Some(PlotConfig::load(path)?),
        None => None,
    };

    let cfg = RunConfig {
        output_dir: args.dir.clone(),
        to_stdout: args.stdout,
        dry_run: args.dry,
        selected_read_groups: args.read_groups.clone(),
        threads: args.threads,
    };

    let mut failures = 0usize;
    let mut written = Vec::new();
    for file in &args.files {
        let t_file = Instant::now();
        let results = engine::analyze_file(file, &cfg)
            .with_context(|| format!("failed to analyze {}", file.display()))?;
        stage_done(stats, "analyze", t_file);

        for result in results {
            match result.outcome {
                Ok(analysis) => {
                    let t_write = Instant::now();
                    written.extend(write_reports(file, &analysis, &cfg)?);
                    stage_done(stats, "reports", t_write);
                }
                Err(err) => {
                    failures += 1;
                    eprintln!(
                        "recal-qc: read group {} in {}: {}",
                        result.read_group,
                        file.display(),
                        err
                    );
                }
            }
        }
    }

    if let Some(plot_config) = &plot_config {
        let t_plot = Instant::now();
        plot_config.dispatch(&written, cfg.dry_run)?;
        stage_done(stats, "plots", t_plot);
    }

    if stats {
        eprintln!(
            "RECALQC_STATS files={} tables={} total={}",
            args.files.len(),
            written.len(),
            fmt_dur(t0.elapsed())
        );
    }
    if failures > 0 {
        bail!("{} read group(s) failed", failures);
    }
    Ok(())
}

fn write_reports(
    source: &Path,
    analysis: &ReadGroupAnalysis,
    cfg: &RunConfig,
) -> Result<Vec<PathBuf>> {
    if cfg.to_stdout {
        let stdout = std::io::stdout();
        let mut w = stdout.lock();
        report::basic_stats::write(&mut w, analysis)?;
        report::reported_vs_empirical::write(&mut w, analysis)?;
        report::quality_by_cycle::write(&mut w, analysis)?;
        report::quality_by_dinuc::write(&mut w, analysis)?;
        return Ok(Vec::new());
    }

    let source_name = source
        .file_name()
        .and_then(|s| s.to_str())
        .with_context(|| format!("failed to determine source name for {}", source.display()))?;
    let dir = match &cfg.output_dir {
        Some(dir) => dir.clone(),
        None => source.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let root = format!("{}.{}.analysis", source_name, analysis.read_group);

    let tables: [(&str, fn(&mut dyn Write, &ReadGroupAnalysis) -> Result<()>); 4] = [
        (report::BASIC_INFO_SUFFIX, report::basic_stats::write),
        (
            report::EMPIRICAL_VS_REPORTED_SUFFIX,
            report::reported_vs_empirical::write,
        ),
        (
            report::QUALITY_BY_CYCLE_SUFFIX,
            report::quality_by_cycle::write,
        ),
        (
            report::QUALITY_BY_DINUC_SUFFIX,
            report::quality_by_dinuc::write,
        ),
    ];

    let mut files = Vec::with_capacity(tables.len());
    for (suffix, table) in tables {
        let path = dir.join(format!("{}{}", root, suffix));
        let mut w = BufWriter::new(
            File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?,
        );
        table(&mut w, analysis)?;
        w.flush()?;
        files.push(path);
    }
    Ok(files)
}

fn stats_enabled() -> bool {
    matches!(env::var("RECALQC_STATS").as_deref(), Ok("1"))
}

fn stage_done(stats: bool, name: &str, t: Instant) {
    if stats {
        eprintln!("RECALQC_STATS stage={} time={}", name, fmt_dur(t.elapsed()));
    }
}

fn fmt_dur(d: Duration) -> String {
    if d.as_secs_f64() < 1.0 {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.3}s", d.as_secs_f64())
    }
}

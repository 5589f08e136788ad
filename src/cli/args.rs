use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recal-qc", version, about = "Quality-score recalibration reports for covariate tables")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Analyze(AnalyzeArgs),
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    #[arg(short = 'd', long)]
    pub dir: Option<PathBuf>,

    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    #[arg(short = 's', long, default_value_t = false)]
    pub stdout: bool,

    #[arg(long, default_value_t = false)]
    pub dry: bool,

    #[arg(short = 'g', long = "read-group")]
    pub read_groups: Vec<String>,

    #[arg(long, default_value_t = num_cpus::get())]
    pub threads: usize,
}

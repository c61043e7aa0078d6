//! # Command line interface for `gcnv`
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{config::RunMode, interval::IntervalRequest};

#[derive(Parser, Debug)]
#[command(
    name = "gcnv",
    author,
    version,
    about = "Prepares and dispatches read-count data for germline CNV calling",
    long_about = None
)]
pub struct Cli {
    /// Input read-count files containing integer read counts in genomic intervals,
    /// one file per sample. All intervals specified via -L must be contained in
    /// every file.
    #[arg(short, long = "input", required = true)]
    pub input: Vec<PathBuf>,

    /// Tool run-mode
    #[arg(long = "run-mode", value_enum)]
    pub run_mode: RunMode,

    /// Input contig-ploidy calls directory (passed through to the engine)
    #[arg(long = "contig-ploidy-calls")]
    pub contig_ploidy_calls: PathBuf,

    /// Input denoising-model directory. Optional in COHORT mode, where it is
    /// used only for initialization; required in CASE mode.
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Input annotated-interval file with per-interval GC content. Must not be
    /// provided together with a denoising-model directory.
    #[arg(long = "annotated-intervals")]
    pub annotated_intervals: Option<PathBuf>,

    /// Genomic intervals to model, as `contig` or `contig:start-end` (1-based,
    /// closed). May be repeated.
    #[arg(short = 'L', long = "intervals", value_parser = parse_interval_request)]
    pub intervals: Vec<IntervalRequest>,

    /// Output directory
    #[arg(long)]
    pub output: PathBuf,

    /// Prefix for output filenames
    #[arg(long = "output-prefix")]
    pub output_prefix: String,

    /// Python interpreter used to launch the engine scripts
    #[arg(long, default_value = "python3")]
    pub python: PathBuf,

    /// Directory containing the engine entry-point scripts. If omitted, script
    /// names are passed to the interpreter as-is.
    #[arg(long = "engine-scripts")]
    pub engine_scripts: Option<PathBuf>,
}

fn parse_interval_request(s: &str) -> Result<IntervalRequest> {
    s.parse()
}

//! # Run-mode resolution
//!
//! The COHORT/CASE decision tree lives here, as a single exhaustive
//! resolver producing an immutable [`RunConfig`]. Mode-specific inputs are
//! carried by the [`ModeConfig`] variants so that illegal combinations
//! (e.g. CASE with explicit intervals) cannot be represented after
//! resolution.
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use log::info;

use crate::{cli::Cli, interval::IntervalRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Jointly fit a coverage-bias model and call CNVs from a multi-sample cohort
    Cohort,
    /// Apply a previously fit coverage-bias model to new samples
    Case,
}

/// Mode-specific inputs. Only COHORT runs may carry explicit interval or
/// annotation requests; CASE runs always carry a model directory.
#[derive(Debug)]
pub enum ModeConfig {
    Cohort {
        model_dir: Option<PathBuf>,
        interval_requests: Vec<IntervalRequest>,
        annotated_intervals: Option<PathBuf>,
    },
    Case {
        model_dir: PathBuf,
    },
}

/// The fully resolved configuration of one run, immutable after
/// [`RunConfig::resolve`].
#[derive(Debug)]
pub struct RunConfig {
    pub mode: ModeConfig,
    pub read_count_paths: Vec<PathBuf>,
    pub ploidy_calls_dir: PathBuf,
    pub output_dir: PathBuf,
    pub output_prefix: String,
}

impl RunConfig {
    /// Validate the raw command line and resolve it into a `RunConfig`.
    /// Every check here is a configuration error: all fail before any file
    /// contents are read, beyond existence checks.
    pub fn resolve(cli: Cli) -> Result<RunConfig> {
        let Cli {
            input,
            run_mode,
            contig_ploidy_calls,
            model,
            annotated_intervals,
            intervals,
            output,
            output_prefix,
            ..
        } = cli;

        for path in &input {
            let metadata = fs::metadata(path)
                .with_context(|| format!("Could not read count file {}", path.display()))?;
            if !metadata.is_file() {
                bail!("Count file {} is not a regular file", path.display());
            }
        }
        let distinct: HashSet<&PathBuf> = input.iter().collect();
        if distinct.len() != input.len() {
            bail!("List of input read-count files cannot contain duplicates");
        }

        if let Some(dir) = &model {
            if !dir.is_dir() {
                bail!("Input denoising-model directory {} does not exist", dir.display());
            }
        }

        let mode = match run_mode {
            RunMode::Cohort => {
                info!("Running in COHORT mode...");
                if input.len() < 2 {
                    bail!("At least two samples must be provided in COHORT mode");
                }
                ModeConfig::Cohort {
                    model_dir: model,
                    interval_requests: intervals,
                    annotated_intervals,
                }
            }
            RunMode::Case => {
                info!("Running in CASE mode...");
                let Some(model_dir) = model else {
                    bail!("An input denoising-model directory must be provided in CASE mode");
                };
                if !intervals.is_empty() {
                    bail!("Invalid combination of inputs: running in CASE mode, but intervals were provided");
                }
                if annotated_intervals.is_some() {
                    bail!("Invalid combination of inputs: running in CASE mode, but annotated intervals were provided");
                }
                ModeConfig::Case { model_dir }
            }
        };

        if output_prefix.is_empty() {
            bail!("Output prefix cannot be empty");
        }
        if !contig_ploidy_calls.is_dir() {
            bail!(
                "Input contig-ploidy calls directory {} does not exist",
                contig_ploidy_calls.display()
            );
        }
        if !output.is_dir() {
            bail!("Output directory {} does not exist", output.display());
        }

        Ok(RunConfig {
            mode,
            read_count_paths: input,
            ploidy_calls_dir: contig_ploidy_calls,
            output_dir: output,
            output_prefix,
        })
    }

    /// The model directory, whichever mode carries it.
    pub fn model_dir(&self) -> Option<&Path> {
        match &self.mode {
            ModeConfig::Cohort { model_dir, .. } => model_dir.as_deref(),
            ModeConfig::Case { model_dir } => Some(model_dir),
        }
    }

    /// Whether the engine should model GC bias explicitly. `Some(true)` only
    /// for COHORT runs with an annotation file and no prior model; `None` in
    /// CASE mode, where the flag is inherited from the model.
    pub fn explicit_gc_bias_enabled(&self) -> Option<bool> {
        match &self.mode {
            ModeConfig::Cohort {
                model_dir,
                annotated_intervals,
                ..
            } => Some(model_dir.is_none() && annotated_intervals.is_some()),
            ModeConfig::Case { .. } => None,
        }
    }
}

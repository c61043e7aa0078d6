//! # gcnv
//!
//! Orchestration layer for germline copy-number variant calling from
//! per-interval read-depth counts. `gcnv` validates the inputs of a run,
//! reconciles one authoritative interval set across all samples, reduces
//! every sample to exactly that set, and dispatches the prepared files to
//! the external denoising/calling engine in either COHORT mode (jointly fit
//! a coverage-bias model and call CNVs) or CASE mode (apply a previously
//! fit model to new samples). The statistical inference itself is opaque to
//! this crate.
pub mod cli;
pub mod config;
pub mod engine;
pub mod interval;
pub mod io;
pub mod reconcile;
pub mod subset;

use anyhow::{bail, Context, Result};
use log::info;

use crate::{
    cli::Cli,
    config::RunConfig,
    engine::{Engine, EngineInvocation},
};

/// The main work of `gcnv` happens in this `run` function: resolve the
/// run configuration, fix the authoritative interval set, validate and
/// subset every sample against it, then invoke the engine exactly once and
/// surface its outcome. Execution is strictly sequential; the engine call
/// blocks until the external process finishes.
pub fn run(cli: Cli, engine: &dyn Engine) -> Result<()> {
    let config = RunConfig::resolve(cli)?;

    // Scratch directory scoped to this run; unique, so concurrent runs
    // cannot collide on temp file names. Not cleaned up on abort.
    let scratch = tempfile::tempdir().context("Could not create scratch directory")?;

    let reconcile::ResolvedIntervals {
        intervals,
        file: intervals_file,
        first_sample,
    } = reconcile::resolve_intervals(&config, scratch.path())?;

    let subset_files = subset::subset_read_counts(
        &intervals,
        &config.read_count_paths,
        first_sample,
        scratch.path(),
    )?;

    let invocation = EngineInvocation::new(&config, &intervals_file, subset_files);
    let success = engine
        .execute(&invocation)
        .context("Engine invocation failed")?;
    if !success {
        bail!("Engine script {} exited with non-zero status", invocation.script);
    }

    info!("Germline denoising and CNV calling complete.");
    Ok(())
}

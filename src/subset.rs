//! # Per-sample validation and subsetting
//!
//! Every input sample is checked against the authoritative interval set
//! (exact sequence-dictionary match, interval superset) and reduced to a
//! fresh table holding exactly the authoritative intervals in authoritative
//! order. The reduced tables are the only sample data the engine receives.
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::info;

use crate::{interval::IntervalList, io::counts::CountTable};

/// Validate and subset each read-count file, in input order, writing one
/// `sample-<index>.tsv` per sample into `scratch_dir`. If the reconciler
/// already parsed the first sample, its table is reused instead of reading
/// the file again.
pub fn subset_read_counts(
    authoritative: &IntervalList,
    read_count_paths: &[PathBuf],
    mut first_sample: Option<CountTable>,
    scratch_dir: &Path,
) -> Result<Vec<PathBuf>> {
    info!("Validating and aggregating data from input read-count files...");
    let n_samples = read_count_paths.len();
    let mut subset_files = Vec::with_capacity(n_samples);

    for (sample_index, path) in read_count_paths.iter().enumerate() {
        info!(
            "Aggregating read-count file {} ({} / {})",
            path.display(),
            sample_index + 1,
            n_samples
        );
        let table = match (sample_index, first_sample.take()) {
            (0, Some(table)) => table,
            _ => CountTable::read(path)?,
        };

        if table.dictionary() != authoritative.dictionary() {
            bail!(
                "Sequence dictionary for read-count file {} does not match those in other read-count files",
                path.display()
            );
        }
        let subset = table.subset(authoritative).with_context(|| {
            format!(
                "Intervals for read-count file {} do not contain all specified intervals",
                path.display()
            )
        })?;

        let subset_file = scratch_dir.join(format!("sample-{sample_index}.tsv"));
        subset.write(&subset_file)?;
        subset_files.push(subset_file);
    }

    Ok(subset_files)
}

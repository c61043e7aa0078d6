//! # Authoritative interval resolution
//!
//! Exactly one interval set governs a run. It comes from the first of:
//! the interval list recorded in a denoising-model directory, explicit
//! `-L` requests resolved against the first sample's sequence dictionary,
//! or the first sample's own full interval list. Whatever the source, the
//! resolved set is written into the run's scratch directory so the engine
//! always reads it from one place.
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::info;

use crate::{
    config::{ModeConfig, RunConfig},
    interval::{GenomicInterval, IntervalList, SequenceDictionary},
    io::{
        counts::CountTable,
        intervals::{self, AnnotatedIntervalList},
    },
};

/// Name of the interval file recorded by the engine inside a model directory.
pub const MODEL_INTERVAL_FILE: &str = "interval_list.tsv";

/// Name of the resolved interval file inside the run scratch directory.
const RESOLVED_INTERVAL_FILE: &str = "intervals.tsv";

/// Outcome of interval reconciliation. When the first sample had to be read
/// to determine the coordinate system, its parsed table is carried along so
/// the subsetter does not read it a second time.
#[derive(Debug)]
pub struct ResolvedIntervals {
    pub intervals: IntervalList,
    pub file: PathBuf,
    pub first_sample: Option<CountTable>,
}

pub fn resolve_intervals(config: &RunConfig, scratch_dir: &Path) -> Result<ResolvedIntervals> {
    let file = scratch_dir.join(RESOLVED_INTERVAL_FILE);

    match &config.mode {
        ModeConfig::Case { model_dir } => from_model(model_dir, file),
        ModeConfig::Cohort {
            model_dir: Some(model_dir),
            interval_requests,
            annotated_intervals,
        } => {
            if !interval_requests.is_empty() || annotated_intervals.is_some() {
                info!(
                    "A denoising-model directory is provided in COHORT mode; \
                     using the model for initialization and ignoring specified and/or annotated intervals"
                );
            }
            from_model(model_dir, file)
        }
        ModeConfig::Cohort {
            model_dir: None,
            interval_requests,
            annotated_intervals,
        } => {
            let first_path = &config.read_count_paths[0];
            let first = CountTable::read(first_path)?;

            let intervals = if interval_requests.is_empty() {
                info!(
                    "Retrieving intervals from first read-count file ({})",
                    first_path.display()
                );
                first.interval_list()?
            } else {
                info!("Intervals specified...");
                let resolved: Vec<GenomicInterval> = interval_requests
                    .iter()
                    .map(|request| request.resolve(first.dictionary()))
                    .collect::<Result<_>>()
                    .with_context(|| {
                        format!(
                            "Could not resolve specified intervals against the sequence dictionary of {}",
                            first_path.display()
                        )
                    })?;
                let resolved = sort_requested_intervals(first.dictionary(), resolved)?;
                IntervalList::new(first.dictionary().clone(), resolved)?
            };

            match annotated_intervals {
                Some(annotated_path) => {
                    let annotated = AnnotatedIntervalList::read(annotated_path)?;
                    let subset = annotated.subset(&intervals).with_context(|| {
                        format!(
                            "Annotated intervals {} are not compatible with the modeled intervals",
                            annotated_path.display()
                        )
                    })?;
                    subset.write(&file)?;
                }
                None => intervals::write_interval_list(&intervals, &file)?,
            }

            Ok(ResolvedIntervals {
                intervals,
                file,
                first_sample: Some(first),
            })
        }
    }
}

/// Order resolved requests by reference position. The engine expects
/// interval lists in reference order, and overlapping requests cannot map
/// onto distinct count bins, so overlaps are rejected.
fn sort_requested_intervals(
    dictionary: &SequenceDictionary,
    mut intervals: Vec<GenomicInterval>,
) -> Result<Vec<GenomicInterval>> {
    intervals.sort_by_key(|interval| {
        (
            dictionary.contig_index(&interval.contig),
            interval.start,
            interval.end,
        )
    });
    for pair in intervals.windows(2) {
        if pair[0].contig == pair[1].contig && pair[1].start <= pair[0].end {
            bail!("Specified intervals {} and {} overlap", pair[0], pair[1]);
        }
    }
    Ok(intervals)
}

fn from_model(model_dir: &Path, file: PathBuf) -> Result<ResolvedIntervals> {
    let recorded = model_dir.join(MODEL_INTERVAL_FILE);
    let intervals = intervals::read_interval_list(&recorded).with_context(|| {
        format!(
            "Could not read interval list {} recorded in the model directory",
            recorded.display()
        )
    })?;
    info!(
        "Retrieved {} intervals from model directory {}",
        intervals.len(),
        model_dir.display()
    );
    intervals::write_interval_list(&intervals, &file)?;
    Ok(ResolvedIntervals {
        intervals,
        file,
        first_sample: None,
    })
}

//! # Interval-list files
//!
//! The authoritative interval set is persisted as a tab-separated
//! `CONTIG`/`START`/`END` table under the usual `@` header; the
//! GC-annotated variant carries one extra `GC_CONTENT` column. The plain
//! reader also consumes the `interval_list.tsv` recorded inside a
//! denoising-model directory.
use std::{
    collections::{HashMap, HashSet},
    fs::File,
    path::Path,
};

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::{
    interval::{GenomicInterval, IntervalList, SequenceDictionary},
    io,
};

#[derive(Debug, Deserialize)]
struct IntervalRow {
    #[serde(rename = "CONTIG")]
    contig: String,
    #[serde(rename = "START")]
    start: u64,
    #[serde(rename = "END")]
    end: u64,
}

#[derive(Debug, Serialize)]
struct IntervalRowOut<'a> {
    #[serde(rename = "CONTIG")]
    contig: &'a str,
    #[serde(rename = "START")]
    start: u64,
    #[serde(rename = "END")]
    end: u64,
}

#[derive(Debug, Deserialize)]
struct AnnotatedRow {
    #[serde(rename = "CONTIG")]
    contig: String,
    #[serde(rename = "START")]
    start: u64,
    #[serde(rename = "END")]
    end: u64,
    #[serde(rename = "GC_CONTENT")]
    gc_content: f64,
}

#[derive(Debug, Serialize)]
struct AnnotatedRowOut<'a> {
    #[serde(rename = "CONTIG")]
    contig: &'a str,
    #[serde(rename = "START")]
    start: u64,
    #[serde(rename = "END")]
    end: u64,
    #[serde(rename = "GC_CONTENT")]
    gc_content: f64,
}

pub fn read_interval_list(path: &Path) -> Result<IntervalList> {
    let (dictionary, body) = io::read_header_and_body(path)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(body.as_bytes());

    let mut intervals = Vec::new();
    for row in reader.deserialize() {
        let row: IntervalRow = row
            .with_context(|| format!("Failed to deserialize interval record in {}", path.display()))?;
        intervals.push(GenomicInterval {
            contig: row.contig,
            start: row.start,
            end: row.end,
        });
    }

    IntervalList::new(dictionary, intervals)
        .with_context(|| format!("Invalid interval list {}", path.display()))
}

pub fn write_interval_list(intervals: &IntervalList, path: &Path) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Could not create interval file {}", path.display()))?;
    io::write_header(&mut file, intervals.dictionary())?;

    let mut writer = WriterBuilder::new().delimiter(b'\t').from_writer(file);
    for interval in intervals.intervals() {
        writer.serialize(IntervalRowOut {
            contig: &interval.contig,
            start: interval.start,
            end: interval.end,
        })?;
    }
    writer
        .flush()
        .with_context(|| format!("Could not write interval file {}", path.display()))?;
    Ok(())
}

/// An interval paired with its GC fraction, as produced by an upstream
/// interval-annotation step.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedInterval {
    pub interval: GenomicInterval,
    pub gc_content: f64,
}

/// GC-annotated intervals sharing one sequence dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedIntervalList {
    dictionary: SequenceDictionary,
    records: Vec<AnnotatedInterval>,
}

impl AnnotatedIntervalList {
    pub fn read(path: &Path) -> Result<AnnotatedIntervalList> {
        let (dictionary, body) = io::read_header_and_body(path)?;
        if dictionary.is_empty() {
            bail!("Annotated interval file {} has no sequence dictionary", path.display());
        }
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .from_reader(body.as_bytes());

        let mut records = Vec::new();
        let mut seen: HashSet<GenomicInterval> = HashSet::new();
        for row in reader.deserialize() {
            let row: AnnotatedRow = row.with_context(|| {
                format!("Failed to deserialize annotated record in {}", path.display())
            })?;
            let interval = GenomicInterval {
                contig: row.contig,
                start: row.start,
                end: row.end,
            };
            if !dictionary.contains(&interval) {
                bail!(
                    "Interval {interval} in {} is not compatible with the sequence dictionary",
                    path.display()
                );
            }
            if !(0.0..=1.0).contains(&row.gc_content) {
                bail!(
                    "GC content {} for interval {interval} in {} is outside [0, 1]",
                    row.gc_content,
                    path.display()
                );
            }
            if !seen.insert(interval.clone()) {
                bail!("Duplicate interval {interval} in {}", path.display());
            }
            records.push(AnnotatedInterval {
                interval,
                gc_content: row.gc_content,
            });
        }
        if records.is_empty() {
            bail!("Annotated interval file {} contains no records", path.display());
        }

        Ok(AnnotatedIntervalList { dictionary, records })
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let mut file = File::create(path)
            .with_context(|| format!("Could not create interval file {}", path.display()))?;
        io::write_header(&mut file, &self.dictionary)?;

        let mut writer = WriterBuilder::new().delimiter(b'\t').from_writer(file);
        for record in &self.records {
            writer.serialize(AnnotatedRowOut {
                contig: &record.interval.contig,
                start: record.interval.start,
                end: record.interval.end,
                gc_content: record.gc_content,
            })?;
        }
        writer
            .flush()
            .with_context(|| format!("Could not write interval file {}", path.display()))?;
        Ok(())
    }

    /// Retain the annotation rows for exactly the intervals of
    /// `authoritative`, in authoritative order. Every authoritative interval
    /// must be annotated.
    pub fn subset(&self, authoritative: &IntervalList) -> Result<AnnotatedIntervalList> {
        if self.dictionary != *authoritative.dictionary() {
            bail!("Sequence dictionary of the annotated intervals does not match the read-count files");
        }
        let by_interval: HashMap<&GenomicInterval, f64> = self
            .records
            .iter()
            .map(|record| (&record.interval, record.gc_content))
            .collect();

        let mut records = Vec::with_capacity(authoritative.len());
        for interval in authoritative.intervals() {
            let Some(&gc_content) = by_interval.get(interval) else {
                bail!("Annotated intervals do not cover interval {interval}");
            };
            records.push(AnnotatedInterval {
                interval: interval.clone(),
                gc_content,
            });
        }
        Ok(AnnotatedIntervalList {
            dictionary: self.dictionary.clone(),
            records,
        })
    }

    pub fn dictionary(&self) -> &SequenceDictionary {
        &self.dictionary
    }

    pub fn records(&self) -> &[AnnotatedInterval] {
        &self.records
    }
}

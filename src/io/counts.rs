//! # Read-count tables
//!
//! A count table holds one non-negative integer count per genomic interval
//! for a single sample, together with the sequence dictionary the intervals
//! are expressed against. Tables are read from tab-separated files with
//! `CONTIG`/`START`/`END`/`COUNT` columns, never mutated in place, and
//! derived (subsetted) tables are written to fresh files.
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
struct CountRow {
    #[serde(rename = "CONTIG")]
    contig: String,
    #[serde(rename = "START")]
    start: u64,
    #[serde(rename = "END")]
    end: u64,
    #[serde(rename = "COUNT")]
    count: u64,
}

#[derive(Debug, Serialize)]
struct CountRowOut<'a> {
    #[serde(rename = "CONTIG")]
    contig: &'a str,
    #[serde(rename = "START")]
    start: u64,
    #[serde(rename = "END")]
    end: u64,
    #[serde(rename = "COUNT")]
    count: u64,
}

/// One interval's read count in a sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountRecord {
    pub interval: GenomicInterval,
    pub count: u64,
}

/// Per-sample read counts over an ordered set of intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct CountTable {
    dictionary: SequenceDictionary,
    records: Vec<CountRecord>,
}

impl CountTable {
    /// Construct a table, enforcing the invariants every table carries:
    /// a non-empty dictionary, at least one record, no duplicate intervals,
    /// and every interval within the dictionary's bounds.
    pub fn new(dictionary: SequenceDictionary, records: Vec<CountRecord>) -> Result<CountTable> {
        if dictionary.is_empty() {
            bail!("Count table has an empty sequence dictionary");
        }
        if records.is_empty() {
            bail!("Count table contains no records");
        }
        let mut seen: HashSet<&GenomicInterval> = HashSet::with_capacity(records.len());
        for record in &records {
            if !dictionary.contains(&record.interval) {
                bail!(
                    "Interval {} is not compatible with the sequence dictionary",
                    record.interval
                );
            }
            if !seen.insert(&record.interval) {
                bail!("Duplicate interval {} in count table", record.interval);
            }
        }
        Ok(CountTable { dictionary, records })
    }

    pub fn read(path: &Path) -> Result<CountTable> {
        let (dictionary, body) = io::read_header_and_body(path)?;
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .from_reader(body.as_bytes());

        let mut records = Vec::new();
        for row in reader.deserialize() {
            let row: CountRow =
                row.with_context(|| format!("Failed to deserialize count record in {}", path.display()))?;
            records.push(CountRecord {
                interval: GenomicInterval {
                    contig: row.contig,
                    start: row.start,
                    end: row.end,
                },
                count: row.count,
            });
        }

        CountTable::new(dictionary, records)
            .with_context(|| format!("Invalid count table {}", path.display()))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let mut file = File::create(path)
            .with_context(|| format!("Could not create count file {}", path.display()))?;
        io::write_header(&mut file, &self.dictionary)?;

        let mut writer = WriterBuilder::new().delimiter(b'\t').from_writer(file);
        for record in &self.records {
            writer.serialize(CountRowOut {
                contig: &record.interval.contig,
                start: record.interval.start,
                end: record.interval.end,
                count: record.count,
            })?;
        }
        writer
            .flush()
            .with_context(|| format!("Could not write count file {}", path.display()))?;
        Ok(())
    }

    /// Derive a new table containing exactly the intervals of `authoritative`,
    /// in the authoritative set's order. Fails on the first interval this
    /// sample does not cover.
    pub fn subset(&self, authoritative: &IntervalList) -> Result<CountTable> {
        let by_interval: HashMap<&GenomicInterval, u64> = self
            .records
            .iter()
            .map(|record| (&record.interval, record.count))
            .collect();

        let mut records = Vec::with_capacity(authoritative.len());
        for interval in authoritative.intervals() {
            let Some(&count) = by_interval.get(interval) else {
                bail!("Interval {interval} is not covered by the count table");
            };
            records.push(CountRecord {
                interval: interval.clone(),
                count,
            });
        }
        Ok(CountTable {
            dictionary: self.dictionary.clone(),
            records,
        })
    }

    /// The table's own full interval list, used as the authoritative set
    /// when neither a model nor explicit intervals are given.
    pub fn interval_list(&self) -> Result<IntervalList> {
        let intervals = self
            .records
            .iter()
            .map(|record| record.interval.clone())
            .collect();
        IntervalList::new(self.dictionary.clone(), intervals)
    }

    pub fn dictionary(&self) -> &SequenceDictionary {
        &self.dictionary
    }

    pub fn records(&self) -> &[CountRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::SequenceRecord;
    use std::fs;

    fn interval(contig: &str, start: u64, end: u64) -> GenomicInterval {
        GenomicInterval {
            contig: String::from(contig),
            start,
            end,
        }
    }

    fn table() -> CountTable {
        let dictionary = SequenceDictionary::new(vec![SequenceRecord {
            name: String::from("chr1"),
            length: 10_000,
        }])
        .unwrap();
        let records = vec![
            CountRecord {
                interval: interval("chr1", 1, 1_000),
                count: 12,
            },
            CountRecord {
                interval: interval("chr1", 1_001, 2_000),
                count: 0,
            },
            CountRecord {
                interval: interval("chr1", 2_001, 3_000),
                count: 37,
            },
        ];
        CountTable::new(dictionary, records).unwrap()
    }

    #[test]
    fn write_read_round_trip() {
        let original = table();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.tsv");

        original.write(&path).unwrap();
        let reread = CountTable::read(&path).unwrap();

        assert_eq!(original, reread);
    }

    #[test]
    fn read_rejects_missing_dictionary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.tsv");
        fs::write(&path, "CONTIG\tSTART\tEND\tCOUNT\nchr1\t1\t1000\t12\n").unwrap();
        assert!(CountTable::read(&path).is_err());
    }

    #[test]
    fn read_rejects_duplicate_intervals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.tsv");
        fs::write(
            &path,
            "@SQ\tSN:chr1\tLN:10000\nCONTIG\tSTART\tEND\tCOUNT\nchr1\t1\t1000\t12\nchr1\t1\t1000\t5\n",
        )
        .unwrap();
        assert!(CountTable::read(&path).is_err());
    }

    #[test]
    fn read_rejects_negative_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.tsv");
        fs::write(
            &path,
            "@SQ\tSN:chr1\tLN:10000\nCONTIG\tSTART\tEND\tCOUNT\nchr1\t1\t1000\t-3\n",
        )
        .unwrap();
        assert!(CountTable::read(&path).is_err());
    }

    #[test]
    fn subset_follows_authoritative_order() {
        let full = table();
        let authoritative = IntervalList::new(
            full.dictionary().clone(),
            vec![interval("chr1", 2_001, 3_000), interval("chr1", 1, 1_000)],
        )
        .unwrap();

        let subset = full.subset(&authoritative).unwrap();
        let intervals: Vec<&GenomicInterval> =
            subset.records().iter().map(|record| &record.interval).collect();
        assert_eq!(
            intervals,
            vec![&interval("chr1", 2_001, 3_000), &interval("chr1", 1, 1_000)]
        );
        assert_eq!(subset.records()[0].count, 37);
        assert_eq!(subset.records()[1].count, 12);
    }

    #[test]
    fn subset_fails_on_missing_interval() {
        let full = table();
        let authoritative = IntervalList::new(
            full.dictionary().clone(),
            vec![interval("chr1", 5_001, 6_000)],
        )
        .unwrap();
        assert!(full.subset(&authoritative).is_err());
    }
}

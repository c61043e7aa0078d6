//! # Genomic intervals and sequence dictionaries
//!
//! Module containing the coordinate types used throughout `gcnv`.
//! [`SequenceDictionary`] is the coordinate-system identity of a run: two
//! tables are only comparable when their dictionaries are exactly equal
//! (same contigs, same lengths, same order). [`IntervalList`] is the
//! authoritative interval set governing a run, resolved once per invocation.
use std::{collections::HashSet, fmt, str::FromStr};

use anyhow::{bail, Context, Result};

/// A genomic interval in 1-based, closed coordinates: `[start, end]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenomicInterval {
    pub contig: String,
    pub start: u64,
    pub end: u64,
}

impl fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.contig, self.start, self.end)
    }
}

/// A single contig entry of a [`SequenceDictionary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub name: String,
    pub length: u64,
}

/// Ordered contig names and lengths defining the reference a set of
/// intervals is expressed against. Equality is exact and order-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SequenceDictionary {
    records: Vec<SequenceRecord>,
}

impl SequenceDictionary {
    pub fn new(records: Vec<SequenceRecord>) -> Result<SequenceDictionary> {
        let mut names: HashSet<&str> = HashSet::with_capacity(records.len());
        for record in &records {
            if record.length == 0 {
                bail!("Contig '{}' has zero length", record.name);
            }
            if !names.insert(record.name.as_str()) {
                bail!("Duplicate contig '{}' in sequence dictionary", record.name);
            }
        }
        Ok(SequenceDictionary { records })
    }

    pub fn records(&self) -> &[SequenceRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contig_length(&self, name: &str) -> Option<u64> {
        self.records
            .iter()
            .find(|record| record.name == name)
            .map(|record| record.length)
    }

    /// Position of a contig in reference order.
    pub fn contig_index(&self, name: &str) -> Option<usize> {
        self.records.iter().position(|record| record.name == name)
    }

    /// Whether `interval` is well-formed and lies within a contig of this dictionary.
    pub fn contains(&self, interval: &GenomicInterval) -> bool {
        match self.contig_length(&interval.contig) {
            Some(length) => {
                interval.start >= 1 && interval.start <= interval.end && interval.end <= length
            }
            None => false,
        }
    }
}

/// The authoritative interval set of a run: a non-empty, duplicate-free,
/// ordered sequence of intervals, all compatible with one [`SequenceDictionary`].
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalList {
    dictionary: SequenceDictionary,
    intervals: Vec<GenomicInterval>,
}

impl IntervalList {
    pub fn new(dictionary: SequenceDictionary, intervals: Vec<GenomicInterval>) -> Result<IntervalList> {
        if intervals.is_empty() {
            bail!("Interval list cannot be empty");
        }
        let mut seen: HashSet<&GenomicInterval> = HashSet::with_capacity(intervals.len());
        for interval in &intervals {
            if !dictionary.contains(interval) {
                bail!("Interval {interval} is not compatible with the sequence dictionary");
            }
            if !seen.insert(interval) {
                bail!("Duplicate interval {interval} in interval list");
            }
        }
        Ok(IntervalList { dictionary, intervals })
    }

    pub fn dictionary(&self) -> &SequenceDictionary {
        &self.dictionary
    }

    pub fn intervals(&self) -> &[GenomicInterval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

/// An explicit interval request from the command line, either a bare contig
/// name (`chr1`) or a 1-based closed range (`chr1:1001-2000`). Requests are
/// resolved against the sequence dictionary of the first read-count file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalRequest {
    pub contig: String,
    pub range: Option<(u64, u64)>,
}

impl IntervalRequest {
    pub fn resolve(&self, dictionary: &SequenceDictionary) -> Result<GenomicInterval> {
        let length = dictionary.contig_length(&self.contig).with_context(|| {
            format!("Contig '{}' is not present in the sequence dictionary", self.contig)
        })?;
        let (start, end) = self.range.unwrap_or((1, length));
        if end > length {
            bail!(
                "Interval {}:{start}-{end} extends beyond the end of the contig ({length} bp)",
                self.contig
            );
        }
        Ok(GenomicInterval {
            contig: self.contig.clone(),
            start,
            end,
        })
    }
}

impl FromStr for IntervalRequest {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<IntervalRequest> {
        let Some((contig, range)) = s.split_once(':') else {
            if s.is_empty() {
                bail!("Interval specification cannot be empty");
            }
            return Ok(IntervalRequest {
                contig: s.to_string(),
                range: None,
            });
        };
        let context = || format!("Expected 'contig' or 'contig:start-end', got '{s}'");
        if contig.is_empty() {
            bail!(context());
        }
        let (start, end) = range.split_once('-').with_context(context)?;
        let start: u64 = start.parse().with_context(context)?;
        let end: u64 = end.parse().with_context(context)?;
        if start == 0 || start > end {
            bail!("Invalid range in '{s}': expected 1 <= start <= end");
        }
        Ok(IntervalRequest {
            contig: contig.to_string(),
            range: Some((start, end)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary() -> SequenceDictionary {
        SequenceDictionary::new(vec![
            SequenceRecord {
                name: String::from("chr1"),
                length: 10_000,
            },
            SequenceRecord {
                name: String::from("chr2"),
                length: 5_000,
            },
        ])
        .unwrap()
    }

    fn interval(contig: &str, start: u64, end: u64) -> GenomicInterval {
        GenomicInterval {
            contig: String::from(contig),
            start,
            end,
        }
    }

    #[test]
    fn request_parsing() {
        let request: IntervalRequest = "chr1".parse().unwrap();
        assert_eq!(request.contig, "chr1");
        assert_eq!(request.range, None);

        let request: IntervalRequest = "chr2:100-200".parse().unwrap();
        assert_eq!(request.contig, "chr2");
        assert_eq!(request.range, Some((100, 200)));

        assert!("".parse::<IntervalRequest>().is_err());
        assert!(":100-200".parse::<IntervalRequest>().is_err());
        assert!("chr1:200-100".parse::<IntervalRequest>().is_err());
        assert!("chr1:0-100".parse::<IntervalRequest>().is_err());
        assert!("chr1:abc-100".parse::<IntervalRequest>().is_err());
    }

    #[test]
    fn request_resolution() {
        let dict = dictionary();

        let full: IntervalRequest = "chr2".parse().unwrap();
        assert_eq!(full.resolve(&dict).unwrap(), interval("chr2", 1, 5_000));

        let range: IntervalRequest = "chr1:100-200".parse().unwrap();
        assert_eq!(range.resolve(&dict).unwrap(), interval("chr1", 100, 200));

        let unknown: IntervalRequest = "chrX".parse().unwrap();
        assert!(unknown.resolve(&dict).is_err());

        let beyond: IntervalRequest = "chr2:1-6000".parse().unwrap();
        assert!(beyond.resolve(&dict).is_err());
    }

    #[test]
    fn dictionary_equality_is_order_sensitive() {
        let forward = dictionary();
        let reversed = SequenceDictionary::new(vec![
            SequenceRecord {
                name: String::from("chr2"),
                length: 5_000,
            },
            SequenceRecord {
                name: String::from("chr1"),
                length: 10_000,
            },
        ])
        .unwrap();
        assert_ne!(forward, reversed);
        assert_eq!(forward, dictionary());
        assert_eq!(forward.contig_index("chr2"), Some(1));
        assert_eq!(reversed.contig_index("chr2"), Some(0));
        assert_eq!(forward.contig_index("chrX"), None);
    }

    #[test]
    fn dictionary_rejects_duplicates() {
        let result = SequenceDictionary::new(vec![
            SequenceRecord {
                name: String::from("chr1"),
                length: 100,
            },
            SequenceRecord {
                name: String::from("chr1"),
                length: 200,
            },
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn interval_list_invariants() {
        let dict = dictionary();

        assert!(IntervalList::new(dict.clone(), Vec::new()).is_err());

        let duplicated = vec![interval("chr1", 1, 100), interval("chr1", 1, 100)];
        assert!(IntervalList::new(dict.clone(), duplicated).is_err());

        let out_of_bounds = vec![interval("chr2", 1, 5_001)];
        assert!(IntervalList::new(dict.clone(), out_of_bounds).is_err());

        let valid = vec![interval("chr1", 1, 100), interval("chr2", 1, 100)];
        let list = IntervalList::new(dict, valid).unwrap();
        assert_eq!(list.len(), 2);
    }
}

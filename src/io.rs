//! # Tabular file formats
//!
//! Read-count and interval-list files share a common shape: SAM-style `@`
//! header lines carrying the sequence dictionary, followed by a
//! tab-separated table. This module holds the shared header handling, the
//! sub-modules the per-format record types.
use std::{fs, io::Write, path::Path};

use anyhow::{bail, Context, Result};

use crate::interval::{SequenceDictionary, SequenceRecord};

pub mod counts;
pub mod intervals;

/// Read a table file, parsing leading `@` lines into a sequence dictionary
/// and returning the remaining tabular body verbatim. Header lines other
/// than `@SQ` carry no information this layer needs and are skipped.
pub(crate) fn read_header_and_body(path: &Path) -> Result<(SequenceDictionary, String)> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
    let mut records = Vec::new();
    let mut body = String::new();
    for line in text.lines() {
        if let Some(header) = line.strip_prefix('@') {
            if !body.is_empty() {
                bail!("Header line after table records in {}", path.display());
            }
            if let Some(fields) = header.strip_prefix("SQ") {
                let record = parse_sq_fields(fields)
                    .with_context(|| format!("Malformed @SQ line in {}", path.display()))?;
                records.push(record);
            }
        } else {
            body.push_str(line);
            body.push('\n');
        }
    }
    let dictionary = SequenceDictionary::new(records)
        .with_context(|| format!("Invalid sequence dictionary in {}", path.display()))?;
    Ok((dictionary, body))
}

fn parse_sq_fields(fields: &str) -> Result<SequenceRecord> {
    let mut name = None;
    let mut length = None;
    for field in fields.split('\t').filter(|field| !field.is_empty()) {
        if let Some(value) = field.strip_prefix("SN:") {
            name = Some(value.to_string());
        } else if let Some(value) = field.strip_prefix("LN:") {
            length = Some(value.parse::<u64>().context("Could not parse LN field")?);
        }
    }
    match (name, length) {
        (Some(name), Some(length)) => Ok(SequenceRecord { name, length }),
        _ => bail!("@SQ line is missing an SN or LN field"),
    }
}

/// Write the `@HD`/`@SQ` header block. Byte-stable so identical inputs
/// produce identical files.
pub(crate) fn write_header<W: Write>(writer: &mut W, dictionary: &SequenceDictionary) -> Result<()> {
    writeln!(writer, "@HD\tVN:1.6")?;
    for record in dictionary.records() {
        writeln!(writer, "@SQ\tSN:{}\tLN:{}", record.name, record.length)?;
    }
    Ok(())
}

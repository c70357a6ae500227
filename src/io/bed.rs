//! BED region parsing for the read counter
//!
//! Only the first three columns are consumed. Column 0 is used both as the
//! contig to fetch from and as the transcript (row) identifier, which matches
//! transcriptome alignments where every transcript is its own contig.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A half-open `[start, end)` interval taken from one BED line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedRegion {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

impl BedRegion {
    pub fn new(chrom: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
        }
    }

    /// Row key in the count matrix. Same column as the contig.
    pub fn transcript_id(&self) -> &str {
        &self.chrom
    }
}

/// Parse one BED line into a region.
///
/// Every line is a region: blank, short, or header-like lines are errors, as is
/// a start coordinate past the end.
pub fn parse_bed_line(line: &str) -> Result<BedRegion> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 3 {
        bail!("expected at least 3 fields, found {}", fields.len());
    }

    let start: u64 = fields[1]
        .parse()
        .with_context(|| format!("invalid start coordinate '{}'", fields[1]))?;
    let end: u64 = fields[2]
        .parse()
        .with_context(|| format!("invalid end coordinate '{}'", fields[2]))?;
    if start > end {
        bail!("start {} is greater than end {}", start, end);
    }

    Ok(BedRegion::new(fields[0], start, end))
}

/// Read every region of a BED file, in file order
pub fn read_bed_regions<P: AsRef<Path>>(path: P) -> Result<Vec<BedRegion>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open BED file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut regions = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        let region = parse_bed_line(&line)
            .with_context(|| format!("Malformed BED line {} in {}", idx + 1, path.display()))?;
        regions.push(region);
    }

    Ok(regions)
}

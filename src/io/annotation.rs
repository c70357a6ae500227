use anyhow::{bail, Context, Result};
use std::fmt;
use std::io::{BufRead, Write};

/// Minimum number of whitespace-separated fields on an annotation data line
pub const MIN_ANNOTATION_FIELDS: usize = 10;

const TRANSCRIPT_FIELD: usize = 1;
const STRAND_FIELD: usize = 2;
const GENE_ID_FIELD: usize = 3;
const NAME_FIELD: usize = 4;
const END_FIELD: usize = 9;

/// One 7-column BED line produced from a transcript annotation row.
///
/// The start column is always written as 0 and the seventh column is empty,
/// so every line ends in a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedRecord {
    pub chrom: String,
    pub end: String,
    pub name: String,
    pub gene_id: String,
    pub strand: String,
}

impl BedRecord {
    /// Remap the positional fields of an annotation row.
    ///
    /// Returns `None` when the row has fewer than [`MIN_ANNOTATION_FIELDS`] fields.
    /// The end coordinate is copied verbatim, it is not parsed.
    pub fn from_annotation_fields(fields: &[&str]) -> Option<Self> {
        if fields.len() < MIN_ANNOTATION_FIELDS {
            return None;
        }

        Some(BedRecord {
            chrom: fields[TRANSCRIPT_FIELD].to_string(),
            end: fields[END_FIELD].to_string(),
            name: fields[NAME_FIELD].to_string(),
            gene_id: fields[GENE_ID_FIELD].to_string(),
            strand: fields[STRAND_FIELD].to_string(),
        })
    }
}

impl fmt::Display for BedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t0\t{}\t{}\t{}\t{}\t",
            self.chrom, self.end, self.name, self.gene_id, self.strand
        )
    }
}

/// Convert a header-bearing annotation table into BED lines.
///
/// The first line is skipped as a header and must exist. Output order follows
/// input order. Returns the number of records written.
pub fn convert_annotation<R: BufRead, W: Write>(reader: R, writer: &mut W) -> Result<usize> {
    let mut lines = reader.lines();

    match lines.next() {
        Some(header) => {
            header.context("Failed to read annotation header")?;
        }
        None => bail!("Annotation input is empty, expected a header line"),
    }

    let mut written = 0;
    for (idx, line) in lines.enumerate() {
        // header is line 1
        let line_no = idx + 2;
        let line = line.with_context(|| format!("Failed to read annotation line {}", line_no))?;
        let fields: Vec<&str> = line.split_whitespace().collect();

        let record = match BedRecord::from_annotation_fields(&fields) {
            Some(record) => record,
            None => bail!(
                "Annotation line {} has {} fields, expected at least {}",
                line_no,
                fields.len(),
                MIN_ANNOTATION_FIELDS
            ),
        };

        writeln!(writer, "{}", record)?;
        written += 1;
    }

    writer.flush()?;
    Ok(written)
}

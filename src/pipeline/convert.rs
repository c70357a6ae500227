use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

use crate::io::annotation::convert_annotation;

pub const DEFAULT_ANNOTATION_INPUT: &str = "longest.transcripts.info.txt";
pub const DEFAULT_BED_OUTPUT: &str = "longest.transcripts.bed";

/// Convert a longest-transcript annotation table into a BED file.
///
/// The input is opened before the output is created, so a missing input leaves
/// no output behind. An existing output file is overwritten; a failure midway
/// leaves it truncated.
///
/// # Arguments
/// * `input` - Whitespace-delimited annotation table with one header line
/// * `output` - Path of the BED file to write
///
/// # Returns
/// * Number of BED records written
pub fn convert_to_bed(input: &Path, output: &Path) -> Result<usize> {
    let infile = File::open(input)
        .with_context(|| format!("Failed to open annotation file: {}", input.display()))?;
    let outfile = File::create(output)
        .with_context(|| format!("Failed to create BED file: {}", output.display()))?;

    let mut writer = BufWriter::new(outfile);
    let written = convert_annotation(BufReader::new(infile), &mut writer)
        .with_context(|| format!("Converting {}", input.display()))?;

    info!("BED file created: {} ({} records)", output.display(), written);
    Ok(written)
}

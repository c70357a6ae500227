//! Per-transcript read counting across a directory of alignment files

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::io::bam::{discover_alignment_files, sample_label, IndexedBam, DEFAULT_BAM_SUFFIX};
use crate::io::bed::read_bed_regions;
use crate::quant::align_counts::{tally_region, AlignmentSource, RegionTally, DEFAULT_MAPQ_THRESHOLD};
use crate::quant::matrix::CountMatrix;

pub const DEFAULT_BED: &str = "longest.transcripts_with_5UTR_CDS.bed";
pub const DEFAULT_BAM_DIR: &str = "./";
pub const DEFAULT_MATRIX_OUTPUT: &str = "5UTR_CDS_count_matrix.csv";

/// Inputs of a counting run
#[derive(Debug, Clone)]
pub struct CountConfig {
    pub bed: PathBuf,
    pub bam_dir: PathBuf,
    pub suffix: String,
    pub mapq_threshold: u8,
}

impl Default for CountConfig {
    fn default() -> Self {
        CountConfig {
            bed: PathBuf::from(DEFAULT_BED),
            bam_dir: PathBuf::from(DEFAULT_BAM_DIR),
            suffix: DEFAULT_BAM_SUFFIX.to_string(),
            mapq_threshold: DEFAULT_MAPQ_THRESHOLD,
        }
    }
}

/// Count reads for every BED region in every alignment file.
///
/// Rows come from column 0 of the BED file, columns from `alignment_files` in
/// the given order. `open` is called once per file and the source is dropped
/// before the next file is opened. The BED file is re-read for every file.
///
/// # Arguments
/// * `bed` - BED file of transcript regions, parsed in full before any file is opened
/// * `alignment_files` - Alignment files, one column each, already in column order
/// * `mapq_threshold` - Minimum mapping quality for a read to be counted
/// * `open` - Opens one alignment file as an [`AlignmentSource`]
///
/// # Returns
/// * Normalized count matrix with one count per row and file
pub fn count_with_sources<S, F>(
    bed: &Path,
    alignment_files: &[PathBuf],
    mapq_threshold: u8,
    mut open: F,
) -> Result<CountMatrix>
where
    S: AlignmentSource,
    F: FnMut(&Path) -> Result<S>,
{
    let regions = read_bed_regions(bed)?;
    let mut matrix = CountMatrix::with_rows(regions.iter().map(|r| r.transcript_id().to_string()));
    debug!("{} BED regions over {} transcripts", regions.len(), matrix.n_rows());

    for path in alignment_files {
        info!("{}", path.display());
        let mut source = open(path.as_path())?;
        matrix.push_column(sample_label(path));

        let mut file_tally = RegionTally::default();
        for region in read_bed_regions(bed)? {
            let tally = tally_region(&mut source, &region.chrom, region.start, region.end, mapq_threshold)
                .with_context(|| format!("Counting {} in {}", region.transcript_id(), path.display()))?;
            matrix.add_count(region.transcript_id(), tally.passing)?;
            file_tally.merge(&tally);
        }

        debug!(
            "{}: fetched={} passing={} unmapped={} low_mapq={}",
            path.display(),
            file_tally.fetched,
            file_tally.passing,
            file_tally.unmapped,
            file_tally.low_mapq
        );
    }

    matrix.normalize();
    Ok(matrix)
}

/// Build the count matrix from the alignment files found under `config.bam_dir`
pub fn build_count_matrix(config: &CountConfig) -> Result<CountMatrix> {
    let files = discover_alignment_files(&config.bam_dir, &config.suffix)?;
    let labels: Vec<String> = files.iter().map(sample_label).collect();
    info!("Samples: {:?}", labels);

    count_with_sources(&config.bed, &files, config.mapq_threshold, |path: &Path| {
        IndexedBam::open(path)
    })
}

/// Build the count matrix and write it as CSV to `output`
pub fn run_count(config: &CountConfig, output: &Path) -> Result<CountMatrix> {
    let matrix = build_count_matrix(config)?;
    matrix.write_csv_file(output)?;
    info!("Count matrix created and saved to {}", output.display());
    Ok(matrix)
}

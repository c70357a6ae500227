//! Indexed BAM access and alignment-file discovery

use anyhow::{anyhow, Context, Result};
use rust_htslib::bam::{self, Read};
use std::fs;
use std::path::{Path, PathBuf};

use crate::quant::align_counts::{AlignmentSource, ReadSummary};

/// File-name suffix of the per-sample transcriptome alignments
pub const DEFAULT_BAM_SUFFIX: &str = ".No.rDNA.transcript.bam";

/// List regular files in `dir` whose names end with `suffix`, sorted by file name.
///
/// Sorting makes column order independent of the directory listing order.
pub fn discover_alignment_files<P: AsRef<Path>>(dir: P, suffix: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to list alignment directory: {}", dir.display()))?;

    let mut files: Vec<(String, PathBuf)> = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let name = match entry.file_name().to_str() {
            Some(name) => name.to_string(),
            None => continue,
        };
        if !name.ends_with(suffix) {
            continue;
        }
        // follows symlinks
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        files.push((name, path));
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

/// Column label for an alignment file: its name up to the first '.'
pub fn sample_label<P: AsRef<Path>>(path: P) -> String {
    let name = path
        .as_ref()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.split_once('.') {
        Some((label, _)) => label.to_string(),
        None => name,
    }
}

/// BAM file opened together with its index for region fetches.
///
/// The underlying htslib handles are released on drop.
pub struct IndexedBam {
    path: PathBuf,
    reader: bam::IndexedReader,
    record: bam::Record,
}

impl IndexedBam {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let reader = bam::IndexedReader::from_path(&path)
            .with_context(|| format!("Failed to open indexed BAM file: {}", path.display()))?;
        Ok(IndexedBam {
            path,
            reader,
            record: bam::Record::new(),
        })
    }
}

impl AlignmentSource for IndexedBam {
    fn fetch_region(
        &mut self,
        chrom: &str,
        start: u64,
        end: u64,
        visit: &mut dyn FnMut(ReadSummary),
    ) -> Result<()> {
        let tid = self.reader.header().tid(chrom.as_bytes()).ok_or_else(|| {
            anyhow!("Contig {} not found in {}", chrom, self.path.display())
        })?;

        self.reader.fetch((tid, start, end)).with_context(|| {
            format!("Failed to fetch {}:{}-{} from {}", chrom, start, end, self.path.display())
        })?;

        while let Some(result) = self.reader.read(&mut self.record) {
            result.with_context(|| format!("Failed to read record from {}", self.path.display()))?;
            visit(ReadSummary {
                is_unmapped: self.record.is_unmapped(),
                mapq: self.record.mapq(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_sample_label() {
        assert_eq!(sample_label("sample1.No.rDNA.transcript.bam"), "sample1");
        assert_eq!(sample_label("/data/run/s_02.No.rDNA.transcript.bam"), "s_02");
        assert_eq!(sample_label("noext"), "noext");
        assert_eq!(sample_label(".hidden.bam"), "");
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempdir().unwrap();
        for name in [
            "b.No.rDNA.transcript.bam",
            "a.No.rDNA.transcript.bam",
            "a.No.rDNA.transcript.bam.bai",
            "c.transcript.bam",
            "B.No.rDNA.transcript.bam",
        ] {
            File::create(dir.path().join(name)).unwrap();
        }
        fs::create_dir(dir.path().join("d.No.rDNA.transcript.bam")).unwrap();

        let files = discover_alignment_files(dir.path(), DEFAULT_BAM_SUFFIX).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "B.No.rDNA.transcript.bam",
                "a.No.rDNA.transcript.bam",
                "b.No.rDNA.transcript.bam",
            ]
        );
    }

    #[test]
    fn test_discover_empty_and_missing_dir() {
        let dir = tempdir().unwrap();
        assert!(discover_alignment_files(dir.path(), DEFAULT_BAM_SUFFIX).unwrap().is_empty());
        assert!(discover_alignment_files(dir.path().join("missing"), DEFAULT_BAM_SUFFIX).is_err());
    }

    #[test]
    fn test_open_without_index_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.No.rDNA.transcript.bam");
        File::create(&path).unwrap();
        assert!(IndexedBam::open(&path).is_err());
    }
}

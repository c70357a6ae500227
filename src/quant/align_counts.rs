use anyhow::Result;

/// Default minimum mapping quality for a read to be counted
pub const DEFAULT_MAPQ_THRESHOLD: u8 = 30;

/// The parts of an aligned read the counter looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadSummary {
    pub is_unmapped: bool,
    pub mapq: u8,
}

impl ReadSummary {
    /// Mapped and at or above the MAPQ threshold
    pub fn passes(&self, mapq_threshold: u8) -> bool {
        !self.is_unmapped && self.mapq >= mapq_threshold
    }
}

/// Source of reads supporting indexed region lookup.
///
/// Implementations decide overlap the way htslib does: a read is visited when
/// its reference span `[pos, end_pos)` intersects the query `[start, end)`.
pub trait AlignmentSource {
    /// Call `visit` once for every read overlapping `chrom:[start, end)`.
    ///
    /// An unknown contig is an error.
    fn fetch_region(
        &mut self,
        chrom: &str,
        start: u64,
        end: u64,
        visit: &mut dyn FnMut(ReadSummary),
    ) -> Result<()>;
}

/// Breakdown of the reads fetched for one or more regions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionTally {
    pub fetched: u64,
    pub passing: u64,
    pub unmapped: u64,
    pub low_mapq: u64,
}

impl RegionTally {
    pub fn record(&mut self, read: ReadSummary, mapq_threshold: u8) {
        self.fetched += 1;
        if read.is_unmapped {
            self.unmapped += 1;
        } else if read.mapq < mapq_threshold {
            self.low_mapq += 1;
        } else {
            self.passing += 1;
        }
    }

    pub fn merge(&mut self, other: &RegionTally) {
        self.fetched += other.fetched;
        self.passing += other.passing;
        self.unmapped += other.unmapped;
        self.low_mapq += other.low_mapq;
    }
}

/// Tally every read overlapping a region against the MAPQ threshold
pub fn tally_region<S: AlignmentSource + ?Sized>(
    source: &mut S,
    chrom: &str,
    start: u64,
    end: u64,
    mapq_threshold: u8,
) -> Result<RegionTally> {
    let mut tally = RegionTally::default();
    source.fetch_region(chrom, start, end, &mut |read: ReadSummary| tally.record(read, mapq_threshold))?;
    Ok(tally)
}

/// Count mapped reads with MAPQ >= `mapq_threshold` overlapping `chrom:[start, end)`.
///
/// "Unique" means passing the quality filter. Reads are not deduplicated and
/// mates are counted independently. This is `tally_region(..).passing`; the
/// counting pipeline calls [`tally_region`] directly so it can also log the
/// unmapped and low-MAPQ reads it rejected.
///
/// # Arguments
/// * `source` - Indexed alignment source to fetch from
/// * `chrom` - Contig name, which must exist in the source
/// * `start` - Zero-based inclusive start of the region
/// * `end` - Exclusive end of the region
/// * `mapq_threshold` - Minimum mapping quality, [`DEFAULT_MAPQ_THRESHOLD`] by default
///
/// # Returns
/// * Number of overlapping reads passing the filter
pub fn region_unique_count<S: AlignmentSource + ?Sized>(
    source: &mut S,
    chrom: &str,
    start: u64,
    end: u64,
    mapq_threshold: u8,
) -> Result<u64> {
    Ok(tally_region(source, chrom, start, end, mapq_threshold)?.passing)
}

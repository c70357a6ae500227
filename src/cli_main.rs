use clap::{Parser, Subcommand};

use txcount::io::bam::DEFAULT_BAM_SUFFIX;
use txcount::pipeline::convert::{DEFAULT_ANNOTATION_INPUT, DEFAULT_BED_OUTPUT};
use txcount::pipeline::count::{DEFAULT_BAM_DIR, DEFAULT_BED, DEFAULT_MATRIX_OUTPUT};
use txcount::quant::align_counts::DEFAULT_MAPQ_THRESHOLD;

#[derive(Parser, Debug)]
#[command(name = "txcount", version, about = "Transcript BED conversion and MAPQ-filtered read counting", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a longest-transcript annotation table to BED
    ToBed {
        /// Whitespace-delimited annotation table with one header line
        #[arg(short, long, default_value = DEFAULT_ANNOTATION_INPUT)]
        input: String,

        /// Output BED file (overwritten)
        #[arg(short, long, default_value = DEFAULT_BED_OUTPUT)]
        output: String,
    },

    /// Count high-MAPQ reads per transcript across indexed BAM files
    Count {
        /// BED file of transcript regions (column 0 is the transcript id)
        #[arg(short, long, default_value = DEFAULT_BED)]
        bed: String,

        /// Directory holding the indexed BAM files
        #[arg(long, default_value = DEFAULT_BAM_DIR)]
        bam_dir: String,

        /// File-name suffix selecting the BAM files
        #[arg(long, default_value = DEFAULT_BAM_SUFFIX)]
        suffix: String,

        /// Minimum mapping quality for a read to be counted
        #[arg(long, default_value_t = DEFAULT_MAPQ_THRESHOLD)]
        mapq: u8,

        /// Output CSV count matrix (overwritten)
        #[arg(short, long, default_value = DEFAULT_MATRIX_OUTPUT)]
        output: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_defaults() {
        let cli = Cli::parse_from(["txcount", "count"]);
        match cli.command {
            Commands::Count { bed, bam_dir, suffix, mapq, output } => {
                assert_eq!(bed, "longest.transcripts_with_5UTR_CDS.bed");
                assert_eq!(bam_dir, "./");
                assert_eq!(suffix, ".No.rDNA.transcript.bam");
                assert_eq!(mapq, 30);
                assert_eq!(output, "5UTR_CDS_count_matrix.csv");
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_to_bed_overrides() {
        let cli = Cli::parse_from(["txcount", "to-bed", "-i", "in.txt", "--output", "out.bed", "-v"]);
        match cli.command {
            Commands::ToBed { input, output } => {
                assert_eq!(input, "in.txt");
                assert_eq!(output, "out.bed");
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(cli.verbose);
    }

    #[test]
    fn test_mapq_out_of_range_rejected() {
        assert!(Cli::try_parse_from(["txcount", "count", "--mapq", "300"]).is_err());
    }
}

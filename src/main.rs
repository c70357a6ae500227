mod cli_main;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use cli_main::{Cli, Commands};
use txcount::pipeline::{convert, count};

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Setting tracing default failed");

    let start = std::time::Instant::now();

    let result = match cli.command {
        Commands::ToBed { input, output } => {
            info!("Converting {} to BED", input);
            convert::convert_to_bed(Path::new(&input), Path::new(&output)).map(|_| ())
        }

        Commands::Count { bed, bam_dir, suffix, mapq, output } => {
            info!("Counting reads with MAPQ >= {} for regions in {}", mapq, bed);
            let config = count::CountConfig {
                bed: PathBuf::from(bed),
                bam_dir: PathBuf::from(bam_dir),
                suffix,
                mapq_threshold: mapq,
            };
            count::run_count(&config, Path::new(&output)).map(|_| ())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    info!("Completed in {:.2}s", start.elapsed().as_secs_f32());
}

// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "depthcam")]
#[command(about = "Depth-sensor frame recorder and measurement queries")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a depth session to a binary log (Ctrl-C to stop)
    Record {
        /// Stop automatically after this many seconds
        #[arg(short, long)]
        duration_secs: Option<u64>,
    },

    /// Capture a single still (color + depth when available)
    Still,

    /// Measure the depth delta between two pixels of a still depth file
    MeasureStill {
        /// Path to a raw still depth file
        depth_path: PathBuf,
        x1: u32,
        y1: u32,
        x2: u32,
        y2: u32,
    },

    /// Measure the depth delta in the recorded frame nearest a timestamp
    MeasureRecorded {
        /// Path to a depth log file
        log_path: PathBuf,
        /// Target timestamp in milliseconds
        timestamp: i64,
        x1: u32,
        y1: u32,
        x2: u32,
        y2: u32,
    },

    /// List the records of a depth log
    Inspect {
        /// Path to a depth log file
        log_path: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=depthcam=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Record { duration_secs } => cli::record(duration_secs),
        Commands::Still => cli::still(),
        Commands::MeasureStill {
            depth_path,
            x1,
            y1,
            x2,
            y2,
        } => cli::measure_still(depth_path, x1, y1, x2, y2),
        Commands::MeasureRecorded {
            log_path,
            timestamp,
            x1,
            y1,
            x2,
            y2,
        } => cli::measure_recorded(log_path, timestamp, x1, y1, x2, y2),
        Commands::Inspect { log_path } => cli::inspect(log_path),
    }
}

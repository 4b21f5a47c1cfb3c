pub mod report;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for mask-diff
#[derive(Parser, Debug)]
#[command(name = "mask-diff")]
#[command(about = "Count subject-mask voxels lying outside a reference mask and store the result")]
#[command(version)]
pub struct MaskDiffCli {
    /// Path of the subject mask (filename must contain sub-<id> and ses-<id>)
    #[arg(long, alias = "mask_subject", value_name = "FILE")]
    pub mask_subject: PathBuf,

    /// Path of the reference mask
    #[arg(long, alias = "mask_ref", value_name = "FILE")]
    pub mask_ref: PathBuf,

    /// Path to the SQLite results database (created if missing)
    #[arg(long, value_name = "FILE")]
    pub database: PathBuf,

    /// Export the full results table to this CSV file
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Command-line arguments for qc-slice
#[derive(Parser, Debug)]
#[command(name = "qc-slice")]
#[command(about = "Take N regularly-sampled slices along each axis of a volume")]
#[command(version)]
pub struct SliceCli {
    /// Path of the image to slice
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Path where to save the QC image (.png is appended if missing)
    #[arg(value_name = "SAVE_PATH")]
    pub save_path: PathBuf,

    /// Mask to overlay in red
    #[arg(long, alias = "mask_path", value_name = "FILE")]
    pub mask_path: Option<PathBuf>,

    /// Number of slices to take in each direction
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub nslices: u16,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

/// Initializes env_logger at `Info`, or `Debug` when verbose
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

//! Tip extraction step.
//!
//! Flattens the tabular tip export into the JSON artifact the export
//! pipeline consumes: an array of {text, "venue.id"} objects.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use placemark::tips;

#[derive(Parser, Debug)]
#[command(name = "extract-tips")]
#[command(about = "Extract tips from a tabular export into a JSON artifact")]
struct Args {
    /// Tip export file (CSV, optionally gzipped)
    #[arg(short, long, default_value = "input/tips.csv")]
    input: PathBuf,

    /// Output artifact path
    #[arg(short, long, default_value = "output/tips_extracted.json")]
    output: PathBuf,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Extracting tips from {}", args.input.display());

    let tips = tips::extract_tips_from_file(&args.input)?;
    info!("Found {} tips", tips.len());

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    tips::write_extracted(&args.output, &tips)?;

    info!("Saved to {}", args.output.display());

    Ok(())
}

//! Batch export pipeline.
//!
//! Loads tips, lists, and check-in history, resolves coordinates for every
//! venue referenced by a list against the bulk places snapshot, and writes
//! one GeoJSON FeatureCollection file per list.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use placemark::checkins;
use placemark::config::Config;
use placemark::geojson::{list_to_feature_collection, write_collection};
use placemark::lists;
use placemark::places::{ParquetSnapshot, PlacesSource};
use placemark::resolver::VenueCoordTable;
use placemark::tips::{self, TipIndex};

#[derive(Parser, Debug)]
#[command(name = "export")]
#[command(about = "Export curated venue lists as GeoJSON")]
struct Args {
    /// Pipeline configuration file
    #[arg(short, long, default_value = "pipeline.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = Config::load_from_file(&args.config)?;

    info!("Placemark Export Pipeline");

    // Tips
    info!("Loading tips data...");
    let tip_records = tips::load_extracted(&config.inputs.tips_path)?;
    let tip_index = TipIndex::build(&tip_records);

    // Lists and the venue ids they reference
    let all_lists = lists::load_lists(&config.inputs.lists_path)?;
    let venue_ids = lists::collect_venue_ids(&all_lists);
    info!("Found {} unique venue ids in lists", venue_ids.len());

    // Bulk places lookup: one query for the whole run, fatal on failure
    let snapshot = ParquetSnapshot::new(&config.places.snapshot_dir);
    let places = snapshot
        .lookup(&venue_ids)
        .context("Bulk places lookup failed")?;

    // Check-in fallback for whatever the places lookup missed
    let missing: HashSet<String> = venue_ids
        .iter()
        .filter(|id| !places.contains_key(*id))
        .cloned()
        .collect();
    if !missing.is_empty() {
        info!("Looking up {} missing venues in check-in data", missing.len());
    }
    let checkin_files = checkins::matching_files(&config.inputs.checkins_glob)?;
    let fallback = checkins::build_fallback_index(&checkin_files, &missing)?;

    // Merge into the coordinate table
    let table = VenueCoordTable::build(places, fallback, &tip_index);

    // One FeatureCollection per list
    let mut written = 0usize;
    for list in &all_lists {
        if list.list_items.items.is_empty() {
            warn!("List {} ({}) has no venues", list.id, list.name);
            continue;
        }

        let (collection, stats) = list_to_feature_collection(list, &table);
        let path = write_collection(&config.output.dir, &list.name, &list.id, &collection)?;
        written += 1;

        info!(
            "Wrote {} with {} features. {} venues without coordinates.",
            path.display(),
            stats.with_coords,
            stats.without_coords
        );
    }

    info!(
        "Export complete: {} GeoJSON files in {}",
        written,
        config.output.dir.display()
    );

    Ok(())
}

//! Places lookup backed by a local Parquet snapshot partition.
//!
//! The snapshot is a directory of Parquet shard files carrying the bulk
//! dataset columns (`fsq_place_id`, `latitude`, `longitude`, `address`,
//! `website`, `fsq_category_labels`). The whole run issues one logical
//! query: every shard is scanned once, keeping only rows whose identifier
//! is in the required set, so nothing outside that set is materialized.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use parquet::file::reader::{FileReader, SerializedFileReader};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

use super::{decode_place_row, PlacesSource};
use crate::models::PlaceRow;

pub struct ParquetSnapshot {
    dir: PathBuf,
}

impl ParquetSnapshot {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Discover shard files, sorted lexicographically so duplicate
    /// resolution is deterministic across runs.
    fn discover_shards(&self) -> Result<Vec<PathBuf>> {
        let mut shards = Vec::new();

        for entry in WalkDir::new(&self.dir).follow_links(true) {
            let entry = entry.with_context(|| {
                format!("Failed to walk snapshot dir: {}", self.dir.display())
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().map_or(false, |e| e == "parquet") {
                shards.push(path.to_path_buf());
            }
        }

        shards.sort();
        Ok(shards)
    }
}

impl PlacesSource for ParquetSnapshot {
    fn lookup(&self, ids: &HashSet<String>) -> Result<HashMap<String, PlaceRow>> {
        let shards = self.discover_shards()?;
        if shards.is_empty() {
            anyhow::bail!("No Parquet shards found in {}", self.dir.display());
        }

        info!(
            "Scanning {} snapshot shards for {} venue ids",
            shards.len(),
            ids.len()
        );

        let wanted: hashbrown::HashSet<String> = ids.iter().cloned().collect();

        let pb = ProgressBar::new(shards.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} shards",
                )?
                .progress_chars("#>-"),
        );

        // Shards scan in parallel; collect() preserves shard order so the
        // first-wins reduce below stays deterministic.
        let per_shard: Vec<Result<Vec<PlaceRow>>> = shards
            .par_iter()
            .map(|path| {
                let rows = scan_shard(path, &wanted);
                pb.inc(1);
                rows
            })
            .collect();

        pb.finish_and_clear();

        let mut by_id: HashMap<String, PlaceRow> = HashMap::new();
        for shard_rows in per_shard {
            for row in shard_rows? {
                by_id.entry(row.id.clone()).or_insert(row);
            }
        }

        info!(
            "Resolved {} of {} venues from the places snapshot",
            by_id.len(),
            ids.len()
        );

        Ok(by_id)
    }
}

/// Scan one shard, returning matching rows in file order. Any decode
/// failure aborts the run; partial bulk results are unusable.
fn scan_shard(path: &Path, wanted: &hashbrown::HashSet<String>) -> Result<Vec<PlaceRow>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open snapshot shard: {}", path.display()))?;
    let reader = SerializedFileReader::new(file)
        .with_context(|| format!("Failed to read snapshot shard: {}", path.display()))?;
    let iter = reader
        .get_row_iter(None)
        .with_context(|| format!("Failed to iterate snapshot shard: {}", path.display()))?;

    let mut rows = Vec::new();
    for row in iter {
        let row = row
            .with_context(|| format!("Corrupt row in snapshot shard: {}", path.display()))?;
        if let Some(place) = decode_place_row(&row.to_json_value(), wanted) {
            rows.push(place);
        }
    }

    Ok(rows)
}

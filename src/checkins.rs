//! Check-in fallback index.
//!
//! Check-in exports are scanned only for venue identifiers the bulk places
//! lookup could not resolve. Files are processed in lexicographic order and
//! the first valid coordinate pair per identifier wins.

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::models::{coords_in_range, CheckinHit};

/// One check-in export: either a bare array of records or `{"items": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CheckinDocument {
    Wrapped { items: Vec<CheckinRecord> },
    Flat(Vec<CheckinRecord>),
}

impl CheckinDocument {
    fn into_records(self) -> Vec<CheckinRecord> {
        match self {
            CheckinDocument::Wrapped { items } => items,
            CheckinDocument::Flat(records) => records,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CheckinRecord {
    #[serde(default)]
    venue: Option<CheckinVenue>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lng: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CheckinVenue {
    #[serde(default)]
    id: String,
}

/// Resolve a single-`*` glob pattern like `input/checkins*.json` to the
/// matching files in that directory, sorted lexicographically.
pub fn matching_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern_path = Path::new(pattern);
    let dir = pattern_path.parent().filter(|p| !p.as_os_str().is_empty());
    let dir = dir.unwrap_or_else(|| Path::new("."));
    let file_pattern = pattern_path
        .file_name()
        .and_then(|n| n.to_str())
        .context("Check-in glob pattern has no file component")?;

    let file_regex = Regex::new(&format!("^{}$", regex::escape(file_pattern).replace(r"\*", ".*")))
        .context("Failed to compile check-in glob pattern")?;

    let mut files = Vec::new();
    if dir.exists() {
        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read check-in dir: {}", dir.display()))?
        {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if file_regex.is_match(name) {
                    files.push(path);
                }
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Build the fallback coordinate index for the still-missing identifiers.
///
/// Records for identifiers outside the missing set are ignored; invalid
/// coordinates are logged and skipped, never fatal.
pub fn build_fallback_index(
    files: &[PathBuf],
    missing: &HashSet<String>,
) -> Result<HashMap<String, CheckinHit>> {
    let mut index: HashMap<String, CheckinHit> = HashMap::new();

    if missing.is_empty() {
        return Ok(index);
    }

    for path in files {
        info!("Processing check-in file: {}", path.display());
        let file = File::open(path)
            .with_context(|| format!("Failed to open check-in file: {}", path.display()))?;
        let doc: CheckinDocument = serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse check-in file: {}", path.display()))?;

        for record in doc.into_records() {
            let venue_id = match &record.venue {
                Some(venue) if !venue.id.is_empty() => venue.id.as_str(),
                _ => continue,
            };
            if !missing.contains(venue_id) || index.contains_key(venue_id) {
                continue;
            }

            let (lat, lng) = match (record.lat, record.lng) {
                (Some(lat), Some(lng)) => (lat, lng),
                _ => continue,
            };

            if !coords_in_range(lat, lng) {
                warn!(
                    "Invalid coordinates for venue {}: lat={}, lng={}",
                    venue_id, lat, lng
                );
                continue;
            }

            index.insert(venue_id.to_string(), CheckinHit { lat, lng });
        }
    }

    info!(
        "Recovered {} of {} missing venues from check-in history",
        index.len(),
        missing.len()
    );

    Ok(index)
}

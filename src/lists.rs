//! Loading the curated lists export.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use tracing::info;

use crate::models::{ListRecord, ListsDocument};

/// Load all lists from the lists export file.
pub fn load_lists(path: &Path) -> Result<Vec<ListRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open lists file: {}", path.display()))?;
    let doc: ListsDocument =
        serde_json::from_reader(file).context("Failed to parse lists file")?;

    info!("Loaded {} lists from {}", doc.items.len(), path.display());
    Ok(doc.items)
}

/// Collect the deduplicated set of venue identifiers referenced by any list.
pub fn collect_venue_ids(lists: &[ListRecord]) -> HashSet<String> {
    let mut ids = HashSet::new();
    for list in lists {
        for entry in &list.list_items.items {
            if let Some(venue) = &entry.venue {
                if !venue.id.is_empty() {
                    ids.insert(venue.id.clone());
                }
            }
        }
    }
    ids
}

//! Tip extraction and indexing.
//!
//! The tip source is a tabular export with columns `id`, `createdAt`,
//! `text`, `venue.id`. Some exports contain a duplicated header row in the
//! data section; those rows are dropped during extraction.

use anyhow::Context;
use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::info;

const COL_ID: &str = "id";
const COL_CREATED_AT: &str = "createdAt";
const COL_TEXT: &str = "text";
const COL_VENUE_ID: &str = "venue.id";

/// A free-text note attached to a venue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tip {
    pub text: String,
    #[serde(rename = "venue.id")]
    pub venue_id: String,
}

#[derive(Debug, Error)]
pub enum TipExtractError {
    #[error("column '{0}' not found in tip export header")]
    MissingColumn(&'static str),
    #[error("row {row}: required field '{field}' is missing")]
    MissingField { row: usize, field: &'static str },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Extract tips from a tabular export, preserving row order.
///
/// Rows where `id == "id"` and `createdAt == "createdAt"` are duplicated
/// header artifacts and are skipped.
pub fn extract_tips<R: Read>(reader: R) -> Result<Vec<Tip>, TipExtractError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();

    let col = |name: &'static str| -> Result<usize, TipExtractError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(TipExtractError::MissingColumn(name))
    };

    let id_idx = col(COL_ID)?;
    let created_idx = col(COL_CREATED_AT)?;
    let text_idx = col(COL_TEXT)?;
    let venue_idx = col(COL_VENUE_ID)?;

    let mut tips = Vec::new();

    for (row, result) in csv_reader.records().enumerate() {
        let record = result?;

        let id = field(&record, id_idx, row, COL_ID)?;
        let created_at = field(&record, created_idx, row, COL_CREATED_AT)?;
        if id == COL_ID && created_at == COL_CREATED_AT {
            continue;
        }

        tips.push(Tip {
            text: field(&record, text_idx, row, COL_TEXT)?.to_string(),
            venue_id: field(&record, venue_idx, row, COL_VENUE_ID)?.to_string(),
        });
    }

    Ok(tips)
}

fn field<'a>(
    record: &'a csv::StringRecord,
    idx: usize,
    row: usize,
    name: &'static str,
) -> Result<&'a str, TipExtractError> {
    record
        .get(idx)
        .ok_or(TipExtractError::MissingField { row, field: name })
}

/// Extract tips from a file, decompressing transparently when gzipped.
pub fn extract_tips_from_file(path: &Path) -> Result<Vec<Tip>, TipExtractError> {
    let file = File::open(path)?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    extract_tips(reader)
}

/// Write the extracted tips artifact (JSON array of {text, "venue.id"}).
pub fn write_extracted(path: &Path, tips: &[Tip]) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create tips artifact: {}", path.display()))?;
    serde_json::to_writer_pretty(file, tips).context("Failed to serialize tips artifact")?;
    Ok(())
}

/// Load a previously extracted tips artifact.
pub fn load_extracted(path: &Path) -> anyhow::Result<Vec<Tip>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open tips artifact: {}", path.display()))?;
    let tips: Vec<Tip> =
        serde_json::from_reader(file).context("Failed to parse tips artifact")?;
    Ok(tips)
}

/// Tips grouped by venue identifier, first-seen order preserved.
///
/// Venues with zero tips have no entry.
#[derive(Debug, Default)]
pub struct TipIndex {
    by_venue: HashMap<String, Vec<String>>,
}

impl TipIndex {
    pub fn build(tips: &[Tip]) -> Self {
        let mut by_venue: HashMap<String, Vec<String>> = HashMap::new();
        for tip in tips {
            by_venue
                .entry(tip.venue_id.clone())
                .or_default()
                .push(tip.text.clone());
        }

        info!("Indexed tips for {} venues", by_venue.len());
        Self { by_venue }
    }

    /// Tip texts for a venue; empty slice when none exist.
    pub fn get(&self, venue_id: &str) -> &[String] {
        self.by_venue.get(venue_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of venues with at least one tip
    pub fn len(&self) -> usize {
        self.by_venue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_venue.is_empty()
    }
}

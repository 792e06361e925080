//! Per-list GeoJSON file output.

use anyhow::{Context, Result};
use regex::Regex;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use super::FeatureCollection;

const MAX_NAME_LEN: usize = 100;

/// Make a list name safe for use as a filename.
///
/// Filesystem-unsafe characters become underscores, leading/trailing dots
/// and spaces are trimmed, whitespace/underscore runs collapse to a single
/// underscore, and the result is truncated.
pub fn sanitize_filename(name: &str) -> String {
    // Compiled inline; sanitization runs once per list
    let invalid = Regex::new(r#"[<>:"/\\|?*]"#).unwrap();
    let runs = Regex::new(r"[\s_]+").unwrap();

    let sanitized = invalid.replace_all(name, "_");
    let sanitized = sanitized.trim_matches(|c| c == '.' || c == ' ');
    let sanitized = runs.replace_all(sanitized, "_");
    sanitized.chars().take(MAX_NAME_LEN).collect()
}

/// Write one FeatureCollection to `<dir>/<sanitized name>_<list id>.geojson`.
///
/// The unique list id in the filename keeps sanitized name collisions from
/// silently overwriting each other.
pub fn write_collection(
    dir: &Path,
    list_name: &str,
    list_id: &str,
    collection: &FeatureCollection,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output dir: {}", dir.display()))?;

    let filename = format!("{}_{}.geojson", sanitize_filename(list_name), list_id);
    let path = dir.join(filename);

    let file = File::create(&path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    serde_json::to_writer_pretty(file, collection)
        .with_context(|| format!("Failed to serialize GeoJSON: {}", path.display()))?;

    Ok(path)
}

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub inputs: InputsConfig,
    pub places: PlacesConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputsConfig {
    /// Extracted tips artifact (JSON array of {text, "venue.id"})
    pub tips_path: PathBuf,
    /// Curated lists export
    pub lists_path: PathBuf,
    /// Glob pattern for check-in export files, e.g. "input/checkins*.json"
    pub checkins_glob: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlacesConfig {
    /// Local snapshot partition of the bulk places dataset (Parquet shards)
    pub snapshot_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    /// Directory receiving one .geojson file per list
    pub dir: PathBuf,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

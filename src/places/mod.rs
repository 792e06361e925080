//! Bulk places lookup.
//!
//! The external places dataset is treated as a read-only lookup service:
//! given the set of venue identifiers the lists need, return one row per
//! identifier that exists in the dataset with usable coordinates.

mod snapshot;

pub use snapshot::ParquetSnapshot;

use anyhow::Result;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

use crate::models::{coords_in_range, PlaceRow};

/// A source of bulk place data, queried once per run with the full set of
/// required identifiers.
pub trait PlacesSource {
    /// Return one row per identifier found in the dataset with non-null,
    /// in-range coordinates. Identifiers that are absent or unusable are
    /// simply missing from the result. Query failure is fatal for the run.
    fn lookup(&self, ids: &HashSet<String>) -> Result<HashMap<String, PlaceRow>>;
}

/// Decode one dataset row, keeping it only when its identifier is wanted
/// and its coordinates are present and in range.
pub(crate) fn decode_place_row(
    value: &Value,
    wanted: &hashbrown::HashSet<String>,
) -> Option<PlaceRow> {
    let id = value.get("fsq_place_id")?.as_str()?;
    if !wanted.contains(id) {
        return None;
    }

    let lat = value.get("latitude")?.as_f64()?;
    let lng = value.get("longitude")?.as_f64()?;
    if !coords_in_range(lat, lng) {
        return None;
    }

    let text = |key: &str| -> String {
        value
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string()
    };

    let categories = value
        .get("fsq_category_labels")
        .and_then(Value::as_array)
        .map(|labels| {
            labels
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(PlaceRow {
        id: id.to_string(),
        lat,
        lng,
        address: text("address"),
        website: text("website"),
        categories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wanted(ids: &[&str]) -> hashbrown::HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_decode_full_row() {
        let value = json!({
            "fsq_place_id": "v1",
            "latitude": 47.37,
            "longitude": 8.54,
            "address": "Bahnhofstrasse 1",
            "website": "https://example.com",
            "fsq_category_labels": ["Food > Restaurant > Italian"]
        });

        let row = decode_place_row(&value, &wanted(&["v1"])).unwrap();
        assert_eq!(row.id, "v1");
        assert_eq!(row.lat, 47.37);
        assert_eq!(row.categories, vec!["Food > Restaurant > Italian"]);
    }

    #[test]
    fn test_decode_skips_unwanted_id() {
        let value = json!({
            "fsq_place_id": "other",
            "latitude": 1.0,
            "longitude": 2.0
        });
        assert!(decode_place_row(&value, &wanted(&["v1"])).is_none());
    }

    #[test]
    fn test_decode_skips_null_and_out_of_range_coords() {
        let null_lat = json!({
            "fsq_place_id": "v1",
            "latitude": null,
            "longitude": 2.0
        });
        assert!(decode_place_row(&null_lat, &wanted(&["v1"])).is_none());

        let out_of_range = json!({
            "fsq_place_id": "v1",
            "latitude": 91.0,
            "longitude": 2.0
        });
        assert!(decode_place_row(&out_of_range, &wanted(&["v1"])).is_none());
    }

    #[test]
    fn test_decode_defaults_missing_metadata() {
        let value = json!({
            "fsq_place_id": "v1",
            "latitude": 1.0,
            "longitude": 2.0,
            "address": null,
            "fsq_category_labels": null
        });

        let row = decode_place_row(&value, &wanted(&["v1"])).unwrap();
        assert_eq!(row.address, "");
        assert_eq!(row.website, "");
        assert!(row.categories.is_empty());
    }
}

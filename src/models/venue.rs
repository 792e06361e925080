//! Resolved venue coordinate records and their provenance.

use serde::{Deserialize, Serialize};

/// Which data source supplied a venue's coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordSource {
    /// Bulk places dataset
    FusedPlaces,
    /// Historical check-in records
    Checkins,
    /// Location embedded in the list's own venue reference
    VenueLocation,
}

impl std::fmt::Display for CoordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordSource::FusedPlaces => write!(f, "fused_places"),
            CoordSource::Checkins => write!(f, "checkins"),
            CoordSource::VenueLocation => write!(f, "venue_location"),
        }
    }
}

/// True if both values are structurally valid WGS84 coordinates.
pub fn coords_in_range(lat: f64, lng: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

/// One row returned by the bulk places lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceRow {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub website: String,
    pub categories: Vec<String>,
}

/// Coordinates recovered from a check-in record for a venue the bulk
/// dataset could not resolve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckinHit {
    pub lat: f64,
    pub lng: f64,
}

/// Fully resolved venue entry: best-available coordinates plus metadata
/// and tips. Never mutated after the resolver builds it.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueCoordRecord {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub website: String,
    pub categories: Vec<String>,
    pub tips: Vec<String>,
    pub source: CoordSource,
}

impl VenueCoordRecord {
    pub fn from_place(row: PlaceRow, tips: Vec<String>) -> Self {
        Self {
            lat: row.lat,
            lng: row.lng,
            address: row.address,
            website: row.website,
            categories: row.categories,
            tips,
            source: CoordSource::FusedPlaces,
        }
    }

    pub fn from_checkin(hit: CheckinHit, tips: Vec<String>) -> Self {
        Self {
            lat: hit.lat,
            lng: hit.lng,
            address: String::new(),
            website: String::new(),
            categories: Vec::new(),
            tips,
            source: CoordSource::Checkins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coords_in_range_bounds() {
        assert!(coords_in_range(90.0, 180.0));
        assert!(coords_in_range(-90.0, -180.0));
        assert!(coords_in_range(0.0, 0.0));
        assert!(!coords_in_range(90.1, 0.0));
        assert!(!coords_in_range(0.0, -180.5));
    }

    #[test]
    fn test_coord_source_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&CoordSource::FusedPlaces).unwrap(),
            "\"fused_places\""
        );
        assert_eq!(
            serde_json::to_string(&CoordSource::VenueLocation).unwrap(),
            "\"venue_location\""
        );
        assert_eq!(CoordSource::Checkins.to_string(), "checkins");
    }
}

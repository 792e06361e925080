//! Venue coordinate resolver.
//!
//! Merges the bulk places result and the check-in fallback index into one
//! coordinate table, then enriches every record with its tips. Bulk places
//! entries take absolute priority: the fallback is built to target only
//! identifiers the places lookup missed, but the table enforces the
//! priority itself rather than trusting that upstream filter.

use std::collections::HashMap;
use tracing::{info, warn};

use crate::models::{CheckinHit, CoordSource, PlaceRow, VenueCoordRecord};
use crate::tips::TipIndex;

/// Immutable-after-construction mapping from venue identifier to its
/// resolved record. At most one entry per identifier.
#[derive(Debug, Default)]
pub struct VenueCoordTable {
    records: HashMap<String, VenueCoordRecord>,
}

impl VenueCoordTable {
    /// Build the table from both coordinate sources plus the tip index.
    ///
    /// Tips attach to every record regardless of which source supplied the
    /// coordinates; tip coverage is independent of coordinate provenance.
    pub fn build(
        places: HashMap<String, PlaceRow>,
        fallback: HashMap<String, CheckinHit>,
        tips: &TipIndex,
    ) -> Self {
        let mut records = HashMap::with_capacity(places.len() + fallback.len());

        for (id, row) in places {
            let venue_tips = tips.get(&id).to_vec();
            records.insert(id, VenueCoordRecord::from_place(row, venue_tips));
        }

        for (id, hit) in fallback {
            if records.contains_key(&id) {
                warn!(
                    "Venue {} resolved by both places and check-ins; keeping places entry",
                    id
                );
                continue;
            }
            let venue_tips = tips.get(&id).to_vec();
            records.insert(id, VenueCoordRecord::from_checkin(hit, venue_tips));
        }

        let table = Self { records };
        info!(
            "Coordinate table holds {} venues ({} from places, {} from check-ins)",
            table.len(),
            table.count_by_source(CoordSource::FusedPlaces),
            table.count_by_source(CoordSource::Checkins)
        );
        table
    }

    pub fn get(&self, venue_id: &str) -> Option<&VenueCoordRecord> {
        self.records.get(venue_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn count_by_source(&self, source: CoordSource) -> usize {
        self.records.values().filter(|r| r.source == source).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tips::Tip;

    fn place_row(id: &str, lat: f64, lng: f64) -> PlaceRow {
        PlaceRow {
            id: id.to_string(),
            lat,
            lng,
            address: "1 Main St".to_string(),
            website: "https://example.com".to_string(),
            categories: vec!["Food > Cafe".to_string()],
        }
    }

    fn tip(venue_id: &str, text: &str) -> Tip {
        Tip {
            text: text.to_string(),
            venue_id: venue_id.to_string(),
        }
    }

    #[test]
    fn test_places_entry_wins_over_fallback() {
        let places = HashMap::from([("v1".to_string(), place_row("v1", 3.0, 4.0))]);
        let fallback = HashMap::from([("v1".to_string(), CheckinHit { lat: 9.0, lng: 9.0 })]);

        let table = VenueCoordTable::build(places, fallback, &TipIndex::default());
        let record = table.get("v1").unwrap();
        assert_eq!(record.source, CoordSource::FusedPlaces);
        assert_eq!((record.lat, record.lng), (3.0, 4.0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_fallback_fills_gaps_only() {
        let places = HashMap::from([("v1".to_string(), place_row("v1", 3.0, 4.0))]);
        let fallback = HashMap::from([("v2".to_string(), CheckinHit { lat: 5.0, lng: 6.0 })]);

        let table = VenueCoordTable::build(places, fallback, &TipIndex::default());
        assert_eq!(table.get("v1").unwrap().source, CoordSource::FusedPlaces);
        let from_checkins = table.get("v2").unwrap();
        assert_eq!(from_checkins.source, CoordSource::Checkins);
        assert!(from_checkins.address.is_empty());
        assert!(from_checkins.categories.is_empty());
    }

    #[test]
    fn test_tips_attach_regardless_of_coordinate_source() {
        let places = HashMap::from([("v1".to_string(), place_row("v1", 3.0, 4.0))]);
        let fallback = HashMap::from([("v2".to_string(), CheckinHit { lat: 5.0, lng: 6.0 })]);
        let tips = TipIndex::build(&[
            tip("v1", "from places"),
            tip("v2", "from checkins"),
            tip("v2", "second"),
        ]);

        let table = VenueCoordTable::build(places, fallback, &tips);
        assert_eq!(table.get("v1").unwrap().tips, vec!["from places"]);
        assert_eq!(table.get("v2").unwrap().tips, vec!["from checkins", "second"]);
    }

    #[test]
    fn test_venue_without_tips_gets_empty_list() {
        let places = HashMap::from([("v1".to_string(), place_row("v1", 3.0, 4.0))]);
        let table = VenueCoordTable::build(places, HashMap::new(), &TipIndex::default());
        assert!(table.get("v1").unwrap().tips.is_empty());
    }
}

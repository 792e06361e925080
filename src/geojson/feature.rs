//! List-to-Feature conversion.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{coords_in_range, CoordSource, ListRecord};
use crate::resolver::VenueCoordTable;

/// GeoJSON FeatureCollection document, one per list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub collection_type: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            collection_type: "FeatureCollection".to_string(),
            features,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub feature_type: String,
    pub properties: FeatureProperties,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub geometry_type: String,
    /// GeoJSON position order: [lng, lat]
    pub coordinates: [f64; 2],
}

impl Geometry {
    pub fn point(lat: f64, lng: f64) -> Self {
        Self {
            geometry_type: "Point".to_string(),
            coordinates: [lng, lat],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub name: String,
    pub id: String,
    pub list_id: String,
    pub list_name: String,
    pub url: String,
    pub address: String,
    pub website: String,
    pub categories: Vec<String>,
    pub tips: Vec<String>,
    pub coord_source: CoordSource,
    pub bucket: String,
    pub topic: String,
}

/// Per-list resolution counts for observability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub with_coords: usize,
    pub without_coords: usize,
}

/// Derive coarse/fine category labels from the first category string.
///
/// `"Food > Restaurant > Italian"` yields bucket `"Food"` and topic
/// `"Italian"`; middle segments of deeper hierarchies are dropped. Without
/// a `>` separator both labels are the whole string.
pub fn split_category(category: &str) -> (String, String) {
    match (category.find('>'), category.rfind('>')) {
        (Some(first), Some(last)) => (
            category[..first].trim().to_string(),
            category[last + 1..].trim().to_string(),
        ),
        _ => (category.to_string(), category.to_string()),
    }
}

/// Convert one list into a FeatureCollection, resolving each venue's
/// coordinates in priority order: the venue's own inline location, then
/// the coordinate table, else unresolved.
///
/// Resolved coordinates are range-checked once more before a feature is
/// emitted; an invalid pair is logged and counted as unresolved.
pub fn list_to_feature_collection(
    list: &ListRecord,
    table: &VenueCoordTable,
) -> (FeatureCollection, ConversionStats) {
    let mut features = Vec::new();
    let mut stats = ConversionStats::default();

    for entry in &list.list_items.items {
        let Some(venue) = &entry.venue else {
            continue;
        };

        let resolved = venue
            .inline_coords()
            .map(|(lat, lng)| (lat, lng, CoordSource::VenueLocation))
            .or_else(|| table.get(&venue.id).map(|r| (r.lat, r.lng, r.source)));

        let Some((lat, lng, coord_source)) = resolved else {
            stats.without_coords += 1;
            continue;
        };

        if !coords_in_range(lat, lng) {
            warn!(
                "Invalid coordinates for venue {} in list {}: lat={}, lng={}",
                venue.id, list.id, lat, lng
            );
            stats.without_coords += 1;
            continue;
        }

        // Metadata always comes from the table when present, independent
        // of which source supplied the coordinates.
        let record = table.get(&venue.id);
        let categories = record.map(|r| r.categories.clone()).unwrap_or_default();
        let tips = record.map(|r| r.tips.clone()).unwrap_or_default();
        let (bucket, topic) = categories
            .first()
            .map(|c| split_category(c))
            .unwrap_or_default();

        features.push(Feature {
            feature_type: "Feature".to_string(),
            properties: FeatureProperties {
                name: venue.name.clone(),
                id: venue.id.clone(),
                list_id: list.id.clone(),
                list_name: list.name.clone(),
                url: venue.url.clone(),
                address: record.map(|r| r.address.clone()).unwrap_or_default(),
                website: record.map(|r| r.website.clone()).unwrap_or_default(),
                categories,
                tips,
                coord_source,
                bucket,
                topic,
            },
            geometry: Geometry::point(lat, lng),
        });
        stats.with_coords += 1;
    }

    (FeatureCollection::new(features), stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CheckinHit, InlineLocation, ListEntry, PlaceRow, VenueRef};
    use crate::models::list::ListItems;
    use crate::tips::{Tip, TipIndex};
    use std::collections::HashMap;

    #[test]
    fn test_split_category_hierarchy() {
        assert_eq!(
            split_category("Food > Restaurant > Italian"),
            ("Food".to_string(), "Italian".to_string())
        );
        assert_eq!(
            split_category("Shop > Bakery"),
            ("Shop".to_string(), "Bakery".to_string())
        );
        assert_eq!(split_category("Food"), ("Food".to_string(), "Food".to_string()));
    }

    fn venue(id: &str, location: Option<InlineLocation>) -> ListEntry {
        ListEntry {
            venue: Some(VenueRef {
                id: id.to_string(),
                name: format!("Venue {}", id),
                url: format!("https://example.com/{}", id),
                location,
            }),
        }
    }

    fn inline(lat: f64, lng: f64) -> Option<InlineLocation> {
        Some(InlineLocation {
            lat: Some(lat),
            lng: Some(lng),
        })
    }

    fn scenario_table() -> VenueCoordTable {
        let places = HashMap::from([(
            "v_places".to_string(),
            PlaceRow {
                id: "v_places".to_string(),
                lat: 3.0,
                lng: 4.0,
                address: "1 Bakery Lane".to_string(),
                website: String::new(),
                categories: vec!["Shop > Bakery".to_string()],
            },
        )]);
        let fallback =
            HashMap::from([("v_checkin".to_string(), CheckinHit { lat: 5.0, lng: 6.0 })]);
        let tips = TipIndex::build(&[Tip {
            text: "Order the rye".to_string(),
            venue_id: "v_places".to_string(),
        }]);
        VenueCoordTable::build(places, fallback, &tips)
    }

    fn scenario_list() -> ListRecord {
        ListRecord {
            id: "l1".to_string(),
            name: "Weekend".to_string(),
            list_items: ListItems {
                items: vec![
                    venue("v_inline", inline(1.0, 2.0)),
                    venue("v_places", None),
                    venue("v_checkin", None),
                    venue("v_nowhere", None),
                ],
            },
        }
    }

    #[test]
    fn test_end_to_end_resolution_order() {
        let table = scenario_table();
        let (collection, stats) = list_to_feature_collection(&scenario_list(), &table);

        assert_eq!(collection.features.len(), 3);
        assert_eq!(stats, ConversionStats { with_coords: 3, without_coords: 1 });

        let sources: Vec<CoordSource> = collection
            .features
            .iter()
            .map(|f| f.properties.coord_source)
            .collect();
        assert_eq!(
            sources,
            vec![
                CoordSource::VenueLocation,
                CoordSource::FusedPlaces,
                CoordSource::Checkins
            ]
        );

        let bakery = &collection.features[1].properties;
        assert_eq!(bakery.bucket, "Shop");
        assert_eq!(bakery.topic, "Bakery");
        assert_eq!(bakery.address, "1 Bakery Lane");
        assert_eq!(bakery.tips, vec!["Order the rye"]);
        assert_eq!(collection.features[1].geometry.coordinates, [4.0, 3.0]);

        // Fallback-resolved venues carry empty metadata but real coordinates
        let from_checkin = &collection.features[2];
        assert_eq!(from_checkin.geometry.coordinates, [6.0, 5.0]);
        assert_eq!(from_checkin.properties.bucket, "");
        assert_eq!(from_checkin.properties.topic, "");
    }

    #[test]
    fn test_inline_location_beats_table() {
        let table = scenario_table();
        let list = ListRecord {
            id: "l1".to_string(),
            name: "Weekend".to_string(),
            list_items: ListItems {
                items: vec![venue("v_places", inline(10.0, 20.0))],
            },
        };

        let (collection, _) = list_to_feature_collection(&list, &table);
        let feature = &collection.features[0];
        assert_eq!(feature.properties.coord_source, CoordSource::VenueLocation);
        assert_eq!(feature.geometry.coordinates, [20.0, 10.0]);
        // Table metadata still enriches the feature
        assert_eq!(feature.properties.bucket, "Shop");
    }

    #[test]
    fn test_invalid_inline_coords_counted_unresolved() {
        let table = VenueCoordTable::default();
        let list = ListRecord {
            id: "l1".to_string(),
            name: "Weekend".to_string(),
            list_items: ListItems {
                items: vec![venue("v_bad", inline(95.0, 2.0))],
            },
        };

        let (collection, stats) = list_to_feature_collection(&list, &table);
        assert!(collection.features.is_empty());
        assert_eq!(stats.without_coords, 1);
    }

    #[test]
    fn test_all_emitted_coords_in_range() {
        let table = scenario_table();
        let (collection, _) = list_to_feature_collection(&scenario_list(), &table);
        for feature in &collection.features {
            let [lng, lat] = feature.geometry.coordinates;
            assert!(coords_in_range(lat, lng));
        }
    }

    #[test]
    fn test_entry_without_venue_skipped_silently() {
        let mut list = scenario_list();
        list.list_items.items.push(ListEntry { venue: None });

        let table = scenario_table();
        let (_, stats) = list_to_feature_collection(&list, &table);
        // The venue-less entry counts toward neither bucket
        assert_eq!(stats, ConversionStats { with_coords: 3, without_coords: 1 });
    }
}

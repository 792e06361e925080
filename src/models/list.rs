//! Curated list source document model.
//!
//! Mirrors the lists export shape:
//! `{ "items": [ { id, name, listItems: { items: [ { venue: {...} } ] } } ] }`

use serde::{Deserialize, Serialize};

/// Top-level lists document
#[derive(Debug, Clone, Deserialize)]
pub struct ListsDocument {
    pub items: Vec<ListRecord>,
}

/// One curated, named, ordered collection of venue references
#[derive(Debug, Clone, Deserialize)]
pub struct ListRecord {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "listItems")]
    pub list_items: ListItems,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListItems {
    #[serde(default)]
    pub items: Vec<ListEntry>,
}

/// A single list entry; the venue payload may be absent in malformed exports
#[derive(Debug, Clone, Deserialize)]
pub struct ListEntry {
    #[serde(default)]
    pub venue: Option<VenueRef>,
}

/// A venue reference embedded in a list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VenueRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub location: Option<InlineLocation>,
}

/// Inline location on a venue reference; either field may be missing
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct InlineLocation {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl VenueRef {
    /// Inline coordinates, only when both lat and lng are present.
    pub fn inline_coords(&self) -> Option<(f64, f64)> {
        let loc = self.location.as_ref()?;
        match (loc.lat, loc.lng) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

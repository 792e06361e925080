//! Placemark - venue list to GeoJSON export pipeline
//!
//! This library provides shared types and modules for the extract-tips,
//! export, and serve binaries.

pub mod checkins;
pub mod config;
pub mod geojson;
pub mod lists;
pub mod models;
pub mod places;
pub mod resolver;
pub mod tips;

pub use models::{CoordSource, ListRecord, VenueCoordRecord, VenueRef};
pub use resolver::VenueCoordTable;

//! GeoJSON output: per-list feature conversion and file writing.

pub mod feature;
pub mod writer;

pub use feature::{
    list_to_feature_collection, split_category, ConversionStats, Feature, FeatureCollection,
    FeatureProperties, Geometry,
};
pub use writer::{sanitize_filename, write_collection};

//! IO module for reading region collections and writing border collections.
//!
//! - `geojson` - GeoJSON FeatureCollection input (regions) and output (borders)
//! - `write` - write-then-rename helper so outputs appear atomically

pub(crate) mod geojson;
mod write;

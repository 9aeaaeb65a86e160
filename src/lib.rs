#![doc = "Shared borders between neighbouring regions of a GeoJSON polygon dataset"]
mod border;
mod extract;
mod geom;
mod io;
mod region;

#[doc(inline)]
pub use region::Region;

#[doc(inline)]
pub use border::{compute_borders, shared_border, Border, BorderFinder};

#[doc(inline)]
pub use extract::{extract_borders, BorderOptions, Summary, DEFAULT_KEY};

#[doc(inline)]
pub use io::geojson::{borders_to_geojson, read_regions, read_regions_from_bytes, write_borders, RegionSet};

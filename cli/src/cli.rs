use std::path::PathBuf;

/// Shared-border extraction CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "shared-borders", version, about)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Input GeoJSON FeatureCollection of region polygons
    #[arg(default_value = "../vanilla/geojson/US_states.geojson", value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output GeoJSON FeatureCollection of shared borders
    #[arg(short, long, default_value = "../vanilla/geojson/US_state_borders.geojson", value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Feature property holding the region identifier, e.g. postal
    #[arg(short, long, default_value = shared_borders::DEFAULT_KEY)]
    pub key: String,

    /// Test every pair of regions instead of pruning with a spatial index
    #[arg(long)]
    pub no_index: bool,
}

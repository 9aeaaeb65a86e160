use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::border::BorderFinder;
use crate::io::geojson::{read_regions, write_borders};

/// Property holding the region identifier in the US states dataset.
pub const DEFAULT_KEY: &str = "postal";

/// Options for a border extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderOptions {
    /// Feature property holding the region identifier.
    pub key: String,
    /// Prune non-adjacent pairs with an R-tree before the exact test.
    pub use_index: bool,
}

impl Default for BorderOptions {
    fn default() -> Self {
        Self { key: DEFAULT_KEY.to_string(), use_index: true }
    }
}

/// Counts from one extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub features: usize,
    pub regions: usize,
    pub skipped: usize,
    pub pairs: usize,
    pub pairs_tested: usize,
    pub borders: usize,
}

/// Load regions from `input`, compute every shared border, and write them to `output`.
pub fn extract_borders(input: &Path, output: &Path, options: &BorderOptions) -> Result<Summary> {
    let set = read_regions(input, &options.key)?;

    let finder = BorderFinder::new(&set.regions, options.use_index);
    let pairs = finder.candidate_pairs();
    info!("Testing {} of {} region pairs", pairs.len(), finder.num_pairs());

    let borders = finder.find_pairs(&pairs);
    info!("Found {} borders", borders.len());

    write_borders(output, &borders)?;

    Ok(Summary {
        features: set.num_features,
        regions: set.regions.len(),
        skipped: set.skipped(),
        pairs: finder.num_pairs(),
        pairs_tested: pairs.len(),
        borders: borders.len(),
    })
}

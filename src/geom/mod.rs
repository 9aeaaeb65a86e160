mod bbox;
mod merge;
mod overlap;

pub(crate) use bbox::{envelope, BoundingBox};
pub(crate) use merge::merge_lines;
pub(crate) use overlap::shared_segments;

use geo::{Coord, Line};

/// Exact hashable identity of a coordinate.
/// Shared borders reuse the input vertices bit for bit, so no tolerance is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct VertexKey(u64, u64);

impl VertexKey {
    pub(crate) fn new(c: Coord<f64>) -> Self {
        // Adding 0.0 folds -0.0 into 0.0.
        Self((c.x + 0.0).to_bits(), (c.y + 0.0).to_bits())
    }

    /// Canonical (undirected) key for a segment.
    pub(crate) fn edge(line: &Line<f64>) -> (Self, Self) {
        let (a, b) = (Self::new(line.start), Self::new(line.end));
        if a <= b { (a, b) } else { (b, a) }
    }
}

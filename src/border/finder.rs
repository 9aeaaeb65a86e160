use geo::{Euclidean, Length, Line, MultiLineString};
use rstar::RTree;
use tracing::trace;

use crate::border::Border;
use crate::geom::{envelope, merge_lines, shared_segments, BoundingBox};
use crate::region::Region;

/// Pairwise shared-border search over an ordered set of regions.
///
/// Boundary segments are extracted once per region. When `use_index` is set,
/// an R-tree over region bounding boxes prunes pairs whose boxes do not meet;
/// such pairs can never share a boundary, so the result is the same as an
/// exhaustive scan.
pub struct BorderFinder<'a> {
    regions: &'a [Region],
    segments: Vec<Vec<Line<f64>>>,
    rtree: Option<RTree<BoundingBox>>,
}

impl<'a> BorderFinder<'a> {
    pub fn new(regions: &'a [Region], use_index: bool) -> Self {
        let rtree = use_index.then(|| RTree::bulk_load(
            regions.iter().enumerate()
                .filter_map(|(i, region)| region.bounds().map(|rect| BoundingBox::new(i, rect)))
                .collect()
        ));

        Self {
            segments: regions.iter().map(Region::boundary_segments).collect(),
            regions,
            rtree,
        }
    }

    /// Check if there are no regions.
    #[inline] pub fn is_empty(&self) -> bool { self.regions.is_empty() }

    /// Total number of unordered pairs, `n(n-1)/2`.
    #[inline]
    pub fn num_pairs(&self) -> usize {
        let n = self.regions.len();
        n * n.saturating_sub(1) / 2
    }

    /// Pairs `(i, j)` with `i < j` that need an exact test, in lexicographic order.
    pub fn candidate_pairs(&self) -> Vec<(usize, usize)> {
        let n = self.regions.len();
        let Some(rtree) = &self.rtree else {
            return (0..n).flat_map(|i| (i + 1..n).map(move |j| (i, j))).collect();
        };

        let mut pairs = Vec::new();
        let mut neighbors = Vec::new();
        for (i, region) in self.regions.iter().enumerate() {
            let Some(rect) = region.bounds() else { continue };

            neighbors.clear();
            neighbors.extend(
                rtree.locate_in_envelope_intersecting(&envelope(&rect))
                    .map(|bb| bb.idx())
                    .filter(|&j| j > i) // check each unordered pair once
            );
            neighbors.sort_unstable();
            pairs.extend(neighbors.iter().map(|&j| (i, j)));
        }
        pairs
    }

    /// The shared border between regions `i` and `j`, if it has positive length.
    /// Pairs must come from `candidate_pairs` order, `i < j`.
    pub(crate) fn find(&self, i: usize, j: usize) -> Option<Border> {
        assert!(i < j && j < self.regions.len(), "invalid region pair ({i}, {j})");
        border_from_segments(&self.regions[i], &self.regions[j], &self.segments[i], &self.segments[j])
    }

    /// All borders of positive length, in pair order.
    pub fn find_all(&self) -> Vec<Border> {
        self.find_pairs(&self.candidate_pairs())
    }

    /// Borders of positive length among the given pairs, in the order given.
    /// Panics if a pair is not of the form `(i, j)` with `i < j < n`.
    pub fn find_pairs(&self, pairs: &[(usize, usize)]) -> Vec<Border> {
        pairs.iter()
            .filter_map(|&(i, j)| {
                let border = self.find(i, j);
                trace!(
                    "{} / {}: {}",
                    self.regions[i].id(),
                    self.regions[j].id(),
                    border.as_ref().map_or("no border".to_string(), |b| format!("border of length {}", b.length())),
                );
                border
            })
            .collect()
    }
}

/// Compute the shared border of every pair of regions that has one.
pub fn compute_borders(regions: &[Region], use_index: bool) -> Vec<Border> {
    BorderFinder::new(regions, use_index).find_all()
}

/// Compute the shared border of two regions, if their boundaries overlap
/// along a stretch of positive length.
pub fn shared_border(a: &Region, b: &Region) -> Option<Border> {
    border_from_segments(a, b, &a.boundary_segments(), &b.boundary_segments())
}

/// Intersect two boundary curves given as segments; empty first, then zero length.
fn border_from_segments(a: &Region, b: &Region, segs_a: &[Line<f64>], segs_b: &[Line<f64>]) -> Option<Border> {
    let shared = shared_segments(segs_a, segs_b);
    if shared.is_empty() { return None }

    let lines = MultiLineString(merge_lines(&shared));
    if Euclidean.length(&lines) <= 0.0 { return None }

    Some(Border::new(a.id(), b.id(), lines))
}

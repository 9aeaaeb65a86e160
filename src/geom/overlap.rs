use ahash::AHashSet;
use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{BoundingRect, Euclidean, Length, Line};
use rstar::RTree;

use super::{envelope, BoundingBox, VertexKey};

/// Collinear overlaps of positive length between the segments of `a` and the
/// segments of `b`, i.e. the one-dimensional part of `a ∩ b`.
///
/// Point intersections (crossings, touching endpoints) are ignored. Each
/// overlap is reported once, in the order of `a`.
pub(crate) fn shared_segments(a: &[Line<f64>], b: &[Line<f64>]) -> Vec<Line<f64>> {
    if a.is_empty() || b.is_empty() { return Vec::new() }

    let rtree = RTree::bulk_load(
        b.iter().enumerate()
            .map(|(i, line)| BoundingBox::new(i, line.bounding_rect()))
            .collect()
    );

    let mut seen = AHashSet::new();
    let mut shared = Vec::new();
    let mut candidates = Vec::new();

    for seg in a {
        candidates.clear();
        candidates.extend(
            rtree.locate_in_envelope_intersecting(&envelope(&seg.bounding_rect()))
                .map(|bb| bb.idx())
        );
        candidates.sort_unstable();

        for &j in &candidates {
            let Some(LineIntersection::Collinear { intersection }) = line_intersection(*seg, b[j]) else { continue };
            if Euclidean.length(&intersection) <= 0.0 { continue }
            if seen.insert(VertexKey::edge(&intersection)) {
                shared.push(intersection);
            }
        }
    }

    shared
}

#[cfg(test)]
mod tests {
    use geo::{coord, Line};

    use super::*;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Line<f64> {
        Line::new(coord! { x: x0, y: y0 }, coord! { x: x1, y: y1 })
    }

    #[test]
    fn identical_segments_overlap_fully() {
        let shared = shared_segments(&[line(1.0, 0.0, 1.0, 1.0)], &[line(1.0, 1.0, 1.0, 0.0)]);
        assert_eq!(shared.len(), 1);
        assert_eq!(Euclidean.length(&shared[0]), 1.0);
    }

    #[test]
    fn partial_overlap_is_clipped() {
        let shared = shared_segments(&[line(1.0, 0.0, 1.0, 1.0)], &[line(1.0, 0.5, 1.0, 3.0)]);
        assert_eq!(shared.len(), 1);
        assert_eq!(Euclidean.length(&shared[0]), 0.5);
    }

    #[test]
    fn crossing_segments_share_nothing() {
        let shared = shared_segments(&[line(0.0, 0.0, 2.0, 2.0)], &[line(0.0, 2.0, 2.0, 0.0)]);
        assert!(shared.is_empty());
    }

    #[test]
    fn end_to_end_touch_shares_nothing() {
        let shared = shared_segments(&[line(0.0, 0.0, 1.0, 0.0)], &[line(1.0, 0.0, 2.0, 0.0)]);
        assert!(shared.is_empty());
    }

    #[test]
    fn duplicate_overlaps_are_reported_once() {
        let a = [line(0.0, 0.0, 1.0, 0.0), line(1.0, 0.0, 0.0, 0.0)];
        let b = [line(0.0, 0.0, 1.0, 0.0)];
        assert_eq!(shared_segments(&a, &b).len(), 1);
    }
}

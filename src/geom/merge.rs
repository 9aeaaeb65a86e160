use ahash::AHashMap;
use geo::{Coord, Line, LineString};

use super::VertexKey;

/// Merge undirected segments into maximal polylines.
///
/// A polyline is extended through every vertex of degree two and stops at
/// endpoints (degree one) and junctions (degree three or more). A closed loop
/// comes back as a ring whose first and last coordinates are equal. Output
/// order follows the first appearance of each polyline in `pieces`.
pub(crate) fn merge_lines(pieces: &[Line<f64>]) -> Vec<LineString<f64>> {
    // Build incidence: vertex -> list of segment indices touching it
    let mut incident: AHashMap<VertexKey, Vec<usize>> = AHashMap::new();
    for (e, line) in pieces.iter().enumerate() {
        incident.entry(VertexKey::new(line.start)).or_default().push(e);
        incident.entry(VertexKey::new(line.end)).or_default().push(e);
    }

    /// Walk away from `at` through degree-2 vertices, marking segments used.
    /// Returns the coordinates visited after `at`.
    fn walk(
        mut at: Coord<f64>,
        pieces: &[Line<f64>],
        incident: &AHashMap<VertexKey, Vec<usize>>,
        used: &mut [bool],
    ) -> Vec<Coord<f64>> {
        let mut path = Vec::new();
        loop {
            let key = VertexKey::new(at);
            let Some(edges) = incident.get(&key) else { break };
            if edges.len() != 2 { break }
            let Some(&next) = edges.iter().find(|&&e| !used[e]) else { break };
            used[next] = true;

            let line = pieces[next];
            at = if VertexKey::new(line.start) == key { line.end } else { line.start };
            path.push(at);
        }
        path
    }

    let mut used = vec![false; pieces.len()];
    let mut lines = Vec::new();

    for (e, line) in pieces.iter().enumerate() {
        if used[e] { continue }
        used[e] = true;

        let forward = walk(line.end, pieces, &incident, &mut used);
        let mut coords = walk(line.start, pieces, &incident, &mut used);
        coords.reverse();
        coords.push(line.start);
        coords.push(line.end);
        coords.extend(forward);

        lines.push(LineString::new(coords));
    }

    lines
}

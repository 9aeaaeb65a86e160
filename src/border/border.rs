use geo::{Euclidean, Geometry, Length, MultiLineString};

/// The shared boundary between two regions.
///
/// `state1` is the region that comes first in the input, `state2` the one
/// that comes later.
#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    state1: String,
    state2: String,
    lines: MultiLineString<f64>,
}

impl Border {
    pub(crate) fn new(state1: impl Into<String>, state2: impl Into<String>, lines: MultiLineString<f64>) -> Self {
        Self { state1: state1.into(), state2: state2.into(), lines }
    }

    #[inline] pub fn state1(&self) -> &str { &self.state1 }

    #[inline] pub fn state2(&self) -> &str { &self.state2 }

    /// The connected pieces of the border.
    #[inline] pub fn lines(&self) -> &MultiLineString<f64> { &self.lines }

    /// Total planar length of the border, in coordinate units (degrees for lon/lat input).
    pub fn length(&self) -> f64 { Euclidean.length(&self.lines) }

    /// Returns true if the border involves the region with the given identifier.
    pub fn involves(&self, id: &str) -> bool {
        self.state1 == id || self.state2 == id
    }

    /// The border as a single geometry: a `LineString` when it is one
    /// connected piece, a `MultiLineString` otherwise.
    pub fn geometry(&self) -> Geometry<f64> {
        match self.lines.0.as_slice() {
            [single] => Geometry::LineString(single.clone()),
            _ => Geometry::MultiLineString(self.lines.clone()),
        }
    }
}

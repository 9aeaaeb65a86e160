use ahash::AHashSet;
use geo::{BoundingRect, Line, LineString, MultiLineString, MultiPolygon, Rect};

/// A named polygon (a state, territory, or any other administrative area).
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    id: String,
    shape: MultiPolygon<f64>,
}

impl Region {
    /// Construct a Region from its identifier and (multi)polygon shape.
    pub fn new(id: impl Into<String>, shape: MultiPolygon<f64>) -> Self {
        Self { id: id.into(), shape }
    }

    /// Get the identifying code (e.g. a postal abbreviation).
    #[inline] pub fn id(&self) -> &str { &self.id }

    /// Get a reference to the region's shape.
    #[inline] pub fn shape(&self) -> &MultiPolygon<f64> { &self.shape }

    /// Bounding rectangle of the shape, or `None` for an empty shape.
    #[inline] pub fn bounds(&self) -> Option<Rect<f64>> { self.shape.bounding_rect() }

    /// Iterate over every ring of the shape, exteriors and holes alike.
    pub fn rings(&self) -> impl Iterator<Item = &LineString<f64>> + '_ {
        self.shape.0.iter()
            .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
    }

    /// The boundary curve of the region: all rings as one `MultiLineString`.
    pub fn boundary(&self) -> MultiLineString<f64> {
        MultiLineString(self.rings().cloned().collect())
    }

    /// All non-degenerate segments of the boundary curve.
    pub fn boundary_segments(&self) -> Vec<Line<f64>> {
        self.rings()
            .flat_map(|ring| ring.lines())
            .filter(|line| line.start != line.end)
            .collect()
    }
}

/// Identifiers that occur more than once, in order of their second occurrence.
pub(crate) fn duplicate_ids(regions: &[Region]) -> Vec<&str> {
    let mut seen = AHashSet::with_capacity(regions.len());
    regions.iter()
        .map(Region::id)
        .filter(|id| !seen.insert(*id))
        .collect()
}

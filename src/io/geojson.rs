use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::border::Border;
use crate::io::write::PendingWrite;
use crate::region::{duplicate_ids, Region};

/// Regions loaded from a feature collection, with the number of features read.
#[derive(Debug, Clone, Default)]
pub struct RegionSet {
    pub regions: Vec<Region>,
    pub num_features: usize,
}

impl RegionSet {
    /// Number of features skipped for lacking an identifier.
    #[inline] pub fn skipped(&self) -> usize { self.num_features - self.regions.len() }
}

#[derive(Deserialize)]
struct RawCollection {
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: Value,
    #[serde(default)]
    geometry: Value,
}

/// Read regions from a GeoJSON FeatureCollection file.
///
/// Features whose `properties` lack a string value for `key` are skipped. This
/// includes a key that is present but `null` or not a string; the Python
/// extraction script only skipped features where the key was absent.
/// Duplicate identifiers are kept and reported with a warning.
pub fn read_regions(path: &Path, key: &str) -> Result<RegionSet> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    read_regions_from_bytes(&bytes, key)
        .with_context(|| format!("failed to load regions from {}", path.display()))
}

/// Read regions from GeoJSON FeatureCollection bytes.
pub fn read_regions_from_bytes(bytes: &[u8], key: &str) -> Result<RegionSet> {
    let collection: RawCollection = serde_json::from_slice(bytes)
        .context("failed to parse GeoJSON FeatureCollection")?;

    let num_features = collection.features.len();
    info!("Number of features: {num_features}");

    let mut regions = Vec::new();
    for (i, feature) in collection.features.into_iter().enumerate() {
        debug!("Processing feature {i}: {}", feature.properties);
        let Some(id) = feature.properties.get(key).and_then(Value::as_str) else {
            debug!("Skipping feature {i}: no '{key}' property");
            continue;
        };
        let shape = parse_geometry(&feature.geometry)
            .with_context(|| format!("feature {i} ({id}): malformed geometry"))?;
        regions.push(Region::new(id, shape));
    }

    for id in duplicate_ids(&regions) {
        warn!("Duplicate region identifier: {id}");
    }
    info!("Processing {} regions", regions.len());

    Ok(RegionSet { regions, num_features })
}

/// Parse a GeoJSON Polygon or MultiPolygon geometry object into a geo::MultiPolygon.
fn parse_geometry(geometry: &Value) -> Result<MultiPolygon<f64>> {
    if geometry.is_null() { bail!("missing geometry") }

    let coords = geometry["coordinates"].as_array()
        .ok_or_else(|| anyhow!("missing coordinates array"))?;

    match geometry["type"].as_str() {
        Some("Polygon") => Ok(MultiPolygon(vec![parse_polygon_coords(coords)?])),
        Some("MultiPolygon") => Ok(MultiPolygon(
            coords.iter()
                .map(|polygon| {
                    let rings = polygon.as_array()
                        .ok_or_else(|| anyhow!("Invalid MultiPolygon: polygon must be an array of rings"))?;
                    parse_polygon_coords(rings)
                })
                .collect::<Result<Vec<_>>>()?
        )),
        Some(other) => bail!("unsupported geometry type {other:?}, expected Polygon or MultiPolygon"),
        None => bail!("missing geometry type"),
    }
}

/// Parse GeoJSON Polygon coordinates: `[exterior, hole, hole, ...]`.
fn parse_polygon_coords(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| {
        let ring = ring.as_array()
            .ok_or_else(|| anyhow!("Invalid Polygon: ring must be an array of positions"))?;
        parse_ring_coords(ring)
    });

    let exterior = rings.next()
        .ok_or_else(|| anyhow!("Invalid Polygon: missing exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;

    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring (exterior or interior) from GeoJSON coordinates.
/// Format: [[x, y], [x, y], ...]; extra ordinates (altitude) are ignored.
fn parse_ring_coords(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = Vec::with_capacity(coords.len() + 1);

    for position in coords {
        let position = position.as_array()
            .filter(|p| p.len() >= 2)
            .ok_or_else(|| anyhow!("Invalid position: expected [x, y]"))?;
        let x = position[0].as_f64()
            .ok_or_else(|| anyhow!("Invalid coordinate: x must be a number"))?;
        let y = position[1].as_f64()
            .ok_or_else(|| anyhow!("Invalid coordinate: y must be a number"))?;
        if !x.is_finite() || !y.is_finite() {
            bail!("Invalid coordinate: ({x}, {y}) is not finite");
        }
        points.push(Coord { x, y });
    }

    // Ensure ring is closed (first point == last point)
    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if first != last { points.push(first) }
    }
    if points.len() < 4 {
        bail!("Invalid ring: {} positions, at least 4 required", points.len());
    }

    Ok(LineString(points))
}

#[derive(Serialize)]
struct FeatureCollection<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    features: Vec<Feature<'a>>,
}

#[derive(Serialize)]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    properties: BorderProperties<'a>,
    geometry: Value,
}

#[derive(Serialize)]
struct BorderProperties<'a> {
    state1: &'a str,
    state2: &'a str,
}

impl<'a> FeatureCollection<'a> {
    fn from_borders(borders: &'a [Border]) -> Self {
        Self {
            kind: "FeatureCollection",
            features: borders.iter()
                .map(|border| Feature {
                    kind: "Feature",
                    properties: BorderProperties { state1: border.state1(), state2: border.state2() },
                    geometry: border_geometry_to_geojson(border),
                })
                .collect(),
        }
    }
}

/// Convert a border's lines to a GeoJSON geometry object:
/// a LineString for a single piece, a MultiLineString otherwise.
fn border_geometry_to_geojson(border: &Border) -> Value {
    fn line_coords(ls: &LineString<f64>) -> Vec<[f64; 2]> {
        ls.coords().map(|c| [c.x, c.y]).collect()
    }

    match border.lines().0.as_slice() {
        [single] => json!({
            "type": "LineString",
            "coordinates": line_coords(single),
        }),
        pieces => json!({
            "type": "MultiLineString",
            "coordinates": pieces.iter().map(line_coords).collect::<Vec<_>>(),
        }),
    }
}

/// Export borders as a GeoJSON FeatureCollection value.
/// Each feature carries `state1` and `state2` properties and the border geometry.
pub fn borders_to_geojson(borders: &[Border]) -> Result<Value> {
    serde_json::to_value(FeatureCollection::from_borders(borders))
        .context("Failed to serialize borders to GeoJSON")
}

/// Write borders to a GeoJSON file, atomically replacing any existing file.
pub fn write_borders(path: &Path, borders: &[Border]) -> Result<()> {
    let mut writer = BufWriter::new(PendingWrite::open(path)?);
    serde_json::to_writer(&mut writer, &FeatureCollection::from_borders(borders))
        .with_context(|| format!("failed to write {}", path.display()))?;
    let pending = writer.into_inner()
        .map_err(|e| anyhow!("failed to write {}: {}", path.display(), e.error()))?;
    pending.finish()
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!("Saved borders to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use geo::{line_string, MultiLineString};

    use super::*;

    fn square(x0: f64, y0: f64) -> Value {
        json!([[[x0, y0], [x0 + 1.0, y0], [x0 + 1.0, y0 + 1.0], [x0, y0 + 1.0], [x0, y0]]])
    }

    #[test]
    fn features_without_key_are_skipped() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "postal": "AA" }, "geometry": { "type": "Polygon", "coordinates": square(0.0, 0.0) } },
                { "type": "Feature", "properties": { "name": "Territory" }, "geometry": { "type": "Polygon", "coordinates": square(1.0, 0.0) } },
                { "type": "Feature", "properties": { "postal": null }, "geometry": { "type": "Polygon", "coordinates": square(2.0, 0.0) } },
                { "type": "Feature", "properties": null, "geometry": null },
            ]
        });
        let set = read_regions_from_bytes(doc.to_string().as_bytes(), "postal").unwrap();
        assert_eq!(set.num_features, 4);
        assert_eq!(set.regions.len(), 1);
        assert_eq!(set.skipped(), 3);
        assert_eq!(set.regions[0].id(), "AA");
    }

    #[test]
    fn custom_key_is_respected() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "postal": "AA", "iso": "X-1" }, "geometry": { "type": "Polygon", "coordinates": square(0.0, 0.0) } },
            ]
        });
        let set = read_regions_from_bytes(doc.to_string().as_bytes(), "iso").unwrap();
        assert_eq!(set.regions[0].id(), "X-1");
    }

    #[test]
    fn multipolygon_with_holes_and_open_rings_is_parsed() {
        let geometry = json!({
            "type": "MultiPolygon",
            "coordinates": [
                [
                    [[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]],
                    [[1.0, 1.0, 12.5], [2.0, 1.0, 12.5], [2.0, 2.0, 12.5], [1.0, 1.0, 12.5]],
                ],
                [[[10.0, 10.0], [11.0, 10.0], [11.0, 11.0], [10.0, 10.0]]],
            ]
        });
        let mp = parse_geometry(&geometry).unwrap();
        assert_eq!(mp.0.len(), 2);
        assert_eq!(mp.0[0].interiors().len(), 1);
        assert!(mp.0[0].exterior().is_closed());
        assert_eq!(mp.0[0].exterior().0.len(), 5);
    }

    #[test]
    fn unsupported_geometry_is_an_error() {
        let geometry = json!({ "type": "Point", "coordinates": [0.0, 0.0] });
        let err = parse_geometry(&geometry).unwrap_err();
        assert!(err.to_string().contains("Point"));
    }

    #[test]
    fn malformed_coordinates_are_errors() {
        let short_ring = json!({ "type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]] });
        assert!(parse_geometry(&short_ring).is_err());

        let bad_number = json!({ "type": "Polygon", "coordinates": [[[0.0, "a"], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]] });
        assert!(parse_geometry(&bad_number).is_err());

        let no_rings = json!({ "type": "Polygon", "coordinates": [] });
        assert!(parse_geometry(&no_rings).is_err());
    }

    #[test]
    fn missing_geometry_names_the_feature() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [{ "type": "Feature", "properties": { "postal": "AA" } }]
        });
        let err = read_regions_from_bytes(doc.to_string().as_bytes(), "postal").unwrap_err();
        assert!(format!("{err:#}").contains("feature 0 (AA)"));
    }

    #[test]
    fn not_a_feature_collection_is_a_parse_error() {
        assert!(read_regions_from_bytes(br#"{"type": "Polygon"}"#, "postal").is_err());
        assert!(read_regions_from_bytes(b"not json", "postal").is_err());
    }

    #[test]
    fn duplicate_identifiers_are_kept() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "postal": "AA" }, "geometry": { "type": "Polygon", "coordinates": square(0.0, 0.0) } },
                { "type": "Feature", "properties": { "postal": "AA" }, "geometry": { "type": "Polygon", "coordinates": square(1.0, 0.0) } },
            ]
        });
        let set = read_regions_from_bytes(doc.to_string().as_bytes(), "postal").unwrap();
        assert_eq!(set.regions.len(), 2);
        assert!(set.regions.iter().all(|r| r.id() == "AA"));
    }

    #[test]
    fn borders_serialize_with_two_properties() {
        let border = Border::new("AA", "BB", MultiLineString(vec![
            line_string![(x: 1.0, y: 0.0), (x: 1.0, y: 1.0)],
        ]));
        let value = borders_to_geojson(&[border]).unwrap();
        assert_eq!(value["type"], "FeatureCollection");

        let feature = &value["features"][0];
        assert_eq!(feature["type"], "Feature");
        assert_eq!(feature["properties"], json!({ "state1": "AA", "state2": "BB" }));
        assert_eq!(feature["geometry"], json!({ "type": "LineString", "coordinates": [[1.0, 0.0], [1.0, 1.0]] }));
    }

    #[test]
    fn disconnected_border_serializes_as_multi_line_string() {
        let border = Border::new("AA", "BB", MultiLineString(vec![
            line_string![(x: 0.0, y: 1.0), (x: 1.0, y: 1.0)],
            line_string![(x: 2.0, y: 1.0), (x: 3.0, y: 1.0)],
        ]));
        let value = borders_to_geojson(&[border]).unwrap();
        assert_eq!(value["features"][0]["geometry"], json!({
            "type": "MultiLineString",
            "coordinates": [[[0.0, 1.0], [1.0, 1.0]], [[2.0, 1.0], [3.0, 1.0]]],
        }));
    }

    #[test]
    fn null_identifier_is_skipped() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "postal": null }, "geometry": { "type": "Polygon", "coordinates": square(0.0, 0.0) } },
                { "type": "Feature", "properties": { "postal": 7 }, "geometry": { "type": "Polygon", "coordinates": square(1.0, 0.0) } },
            ]
        });
        let set = read_regions_from_bytes(doc.to_string().as_bytes(), "postal").unwrap();
        assert!(set.regions.is_empty());
        assert_eq!(set.skipped(), 2);
    }
}

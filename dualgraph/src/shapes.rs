//! Shape records: polygons keyed by a join attribute, and the centroid resolver.

use std::collections::HashMap;

use geo::{Centroid, Coord, Geometry, LineString, MultiPolygon, Point, Polygon};
use serde::Deserialize;

use crate::error::{DualGraphError, Result};
use crate::geometry::limits::{self, IngestCaps};
use crate::model::{Attrs, Crs, Value};

#[derive(Clone, Debug)]
pub struct ShapeRecord {
    pub geometry: Geometry<f64>,
    pub attrs: Attrs,
}

impl ShapeRecord {
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    /// Polygons making up this record; empty for non-areal geometries.
    pub fn polygons(&self) -> Vec<&Polygon<f64>> {
        match &self.geometry {
            Geometry::Polygon(p) => vec![p],
            Geometry::MultiPolygon(mp) => mp.0.iter().collect(),
            _ => Vec::new(),
        }
    }
}

/// Shape records sharing one coordinate reference system.
#[derive(Clone, Debug)]
pub struct ShapeTable {
    crs: Crs,
    records: Vec<ShapeRecord>,
}

impl ShapeTable {
    pub fn new(crs: Crs) -> Self {
        ShapeTable {
            crs,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, geometry: impl Into<Geometry<f64>>, attrs: Attrs) -> usize {
        self.records.push(ShapeRecord {
            geometry: geometry.into(),
            attrs,
        });
        self.records.len() - 1
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }
    pub fn len(&self) -> usize {
        self.records.len()
    }
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    pub fn records(&self) -> &[ShapeRecord] {
        &self.records
    }

    /// Builds a key index over `join`. Records without the attribute are not indexed.
    pub fn index<'a>(&'a self, join: &str) -> ShapeIndex<'a> {
        ShapeIndex::build(self, join)
    }

    /// Reads a GeoJSON FeatureCollection of Polygon/MultiPolygon features.
    ///
    /// The CRS comes from the legacy `crs.properties.name` member, else `default_crs`,
    /// else RFC 7946's `EPSG:4326`. Features without geometry are rejected.
    pub fn from_geojson_value(v: serde_json::Value, default_crs: Option<Crs>) -> Result<Self> {
        from_geojson_impl(v, default_crs)
    }
}

/// Centroid of the one record whose `join` attribute equals `key`.
///
/// Zero or several matches fail with a lookup error: join keys must be unique.
pub fn resolve_centroid(key: &Value, shapes: &ShapeTable, join: &str) -> Result<Point<f64>> {
    let mut found: Option<&ShapeRecord> = None;
    let mut matches = 0usize;
    for rec in shapes.records.iter() {
        if rec.attr(join) == Some(key) {
            matches += 1;
            found.get_or_insert(rec);
        }
    }
    match found {
        Some(rec) if matches == 1 => centroid_of(rec, join, key),
        _ => Err(DualGraphError::lookup(join, key, matches)),
    }
}

fn centroid_of(rec: &ShapeRecord, join: &str, key: &Value) -> Result<Point<f64>> {
    rec.geometry
        .centroid()
        .ok_or_else(|| DualGraphError::EmptyGeometry {
            attr: join.to_string(),
            value: key.clone(),
        })
}

#[derive(Clone, Copy, Debug)]
enum Slot {
    One(usize),
    Many(usize),
}

/// Join-key index over a shape table; resolves like [`resolve_centroid`] without rescanning.
pub struct ShapeIndex<'a> {
    shapes: &'a ShapeTable,
    join: String,
    slots: HashMap<&'a Value, Slot>,
}

impl<'a> ShapeIndex<'a> {
    fn build(shapes: &'a ShapeTable, join: &str) -> Self {
        let mut slots: HashMap<&'a Value, Slot> = HashMap::with_capacity(shapes.len());
        for (i, rec) in shapes.records.iter().enumerate() {
            if let Some(k) = rec.attrs.get(join) {
                slots
                    .entry(k)
                    .and_modify(|s| {
                        *s = match *s {
                            Slot::One(_) => Slot::Many(2),
                            Slot::Many(n) => Slot::Many(n + 1),
                        }
                    })
                    .or_insert(Slot::One(i));
            }
        }
        ShapeIndex {
            shapes,
            join: join.to_string(),
            slots,
        }
    }

    pub fn join(&self) -> &str {
        &self.join
    }

    pub fn record(&self, key: &Value) -> Result<&'a ShapeRecord> {
        match self.slots.get(key) {
            Some(Slot::One(i)) => Ok(&self.shapes.records[*i]),
            Some(Slot::Many(n)) => Err(DualGraphError::lookup(&self.join, key, *n)),
            None => Err(DualGraphError::lookup(&self.join, key, 0)),
        }
    }

    pub fn centroid(&self, key: &Value) -> Result<Point<f64>> {
        let rec = self.record(key)?;
        centroid_of(rec, &self.join, key)
    }
}

#[derive(Deserialize)]
struct CrsPropsDe {
    name: String,
}

#[derive(Deserialize)]
struct CrsDe {
    properties: CrsPropsDe,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum GeometryDe {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
}

#[derive(Deserialize)]
struct FeatureDe {
    geometry: Option<GeometryDe>,
    #[serde(default)]
    properties: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Deserialize)]
struct CollectionDe {
    #[serde(rename = "type")]
    kind: String,
    features: Vec<FeatureDe>,
    crs: Option<CrsDe>,
}

// `budget` counts down from the collection-wide point cap `limit`.
fn ring_from(coords: Vec<Vec<f64>>, budget: &mut usize, limit: usize) -> Result<LineString<f64>> {
    if coords.len() > *budget {
        return Err(DualGraphError::LimitExceeded {
            what: "ring points",
            limit,
        });
    }
    *budget -= coords.len();
    let mut pts = Vec::with_capacity(coords.len());
    for c in coords {
        if c.len() < 2 {
            return Err(DualGraphError::InvalidGeoJson(
                "position needs at least two numbers".into(),
            ));
        }
        if !limits::in_coord_bounds(c[0]) || !limits::in_coord_bounds(c[1]) {
            return Err(DualGraphError::InvalidGeoJson(format!(
                "coordinate ({}, {}) out of bounds",
                c[0], c[1]
            )));
        }
        pts.push(Coord { x: c[0], y: c[1] });
    }
    Ok(LineString::new(pts))
}

fn polygon_from(rings: Vec<Vec<Vec<f64>>>, budget: &mut usize, limit: usize) -> Result<Polygon<f64>> {
    let mut it = rings.into_iter();
    let exterior = match it.next() {
        Some(r) => ring_from(r, budget, limit)?,
        None => return Err(DualGraphError::InvalidGeoJson("polygon without rings".into())),
    };
    let interiors = it.map(|r| ring_from(r, budget, limit)).collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn from_geojson_impl(v: serde_json::Value, default_crs: Option<Crs>) -> Result<ShapeTable> {
    read_collection(v, default_crs, &IngestCaps::DEFAULT)
}

fn read_collection(v: serde_json::Value, default_crs: Option<Crs>, caps: &IngestCaps) -> Result<ShapeTable> {
    let doc: CollectionDe = serde_json::from_value(v)?;
    if doc.kind != "FeatureCollection" {
        return Err(DualGraphError::InvalidGeoJson(format!(
            "expected a FeatureCollection, got {}",
            doc.kind
        )));
    }
    if doc.features.len() > caps.features {
        return Err(DualGraphError::LimitExceeded {
            what: "features",
            limit: caps.features,
        });
    }
    let crs = doc
        .crs
        .map(|c| Crs(c.properties.name))
        .or(default_crs)
        .unwrap_or_else(|| Crs::new("EPSG:4326"));
    let mut table = ShapeTable::new(crs);
    let mut budget = caps.ring_points;
    for (i, f) in doc.features.into_iter().enumerate() {
        let geometry: Geometry<f64> = match f.geometry {
            Some(GeometryDe::Polygon { coordinates }) => polygon_from(coordinates, &mut budget, caps.ring_points)?.into(),
            Some(GeometryDe::MultiPolygon { coordinates }) => {
                let polys = coordinates
                    .into_iter()
                    .map(|p| polygon_from(p, &mut budget, caps.ring_points))
                    .collect::<Result<Vec<_>>>()?;
                MultiPolygon::new(polys).into()
            }
            None => {
                return Err(DualGraphError::InvalidGeoJson(format!(
                    "feature {} has no geometry",
                    i
                )))
            }
        };
        let mut attrs = Attrs::new();
        for (k, pv) in f.properties.unwrap_or_default() {
            match Value::from_json(&pv) {
                Some(val) => {
                    attrs.insert(k, val);
                }
                None => log::debug!("feature {}: skipping non-scalar property {:?}", i, k),
            }
        }
        table.push(geometry, attrs);
    }
    log::debug!("read {} shape records in {}", table.len(), table.crs());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn unit_square(x0: f64, key: &str) -> (Polygon<f64>, Attrs) {
        let p = polygon![
            (x: x0, y: 0.0), (x: x0 + 1.0, y: 0.0), (x: x0 + 1.0, y: 1.0), (x: x0, y: 1.0), (x: x0, y: 0.0)
        ];
        let mut attrs = Attrs::new();
        attrs.insert("GEOID10".into(), key.into());
        (p, attrs)
    }

    #[test]
    fn index_agrees_with_linear_resolver() {
        let mut t = ShapeTable::new(Crs::new("EPSG:3857"));
        for (i, k) in ["a", "b", "c"].iter().enumerate() {
            let (p, a) = unit_square(i as f64 * 2.0, k);
            t.push(p, a);
        }
        let idx = t.index("GEOID10");
        for k in ["a", "b", "c"] {
            let key = Value::from(k);
            let lin = resolve_centroid(&key, &t, "GEOID10").unwrap();
            assert_eq!(idx.centroid(&key).unwrap(), lin);
        }
    }

    #[test]
    fn duplicate_keys_are_ambiguous_in_both_paths() {
        let mut t = ShapeTable::new(Crs::new("EPSG:3857"));
        let (p, a) = unit_square(0.0, "dup");
        t.push(p.clone(), a.clone());
        t.push(p, a);
        let key = Value::from("dup");
        match resolve_centroid(&key, &t, "GEOID10") {
            Err(DualGraphError::Lookup { matches, .. }) => assert_eq!(matches, 2),
            other => panic!("expected lookup error, got {:?}", other),
        }
        assert!(t.index("GEOID10").centroid(&key).unwrap_err().is_lookup());
    }

    fn collection(n: usize) -> serde_json::Value {
        let features: Vec<serde_json::Value> = (0..n)
            .map(|i| {
                let x = i as f64 * 2.0;
                serde_json::json!({
                    "type": "Feature",
                    "geometry": {"type": "Polygon", "coordinates": [[[x, 0.0], [x + 1.0, 0.0], [x + 1.0, 1.0], [x, 1.0], [x, 0.0]]]},
                    "properties": {"GEOID10": format!("k{}", i)}
                })
            })
            .collect();
        serde_json::json!({"type": "FeatureCollection", "features": features})
    }

    fn caps(features: usize, ring_points: usize) -> IngestCaps {
        IngestCaps { features, ring_points, ..IngestCaps::DEFAULT }
    }

    #[test]
    fn feature_cap() {
        assert_eq!(read_collection(collection(3), None, &caps(3, 100)).unwrap().len(), 3);
        assert!(matches!(
            read_collection(collection(4), None, &caps(3, 100)),
            Err(DualGraphError::LimitExceeded { what: "features", limit: 3 })
        ));
    }

    #[test]
    fn ring_point_budget_spans_the_collection() {
        // three closed squares use 15 points
        assert_eq!(read_collection(collection(3), None, &caps(10, 15)).unwrap().len(), 3);
        let err = read_collection(collection(3), None, &caps(10, 14)).unwrap_err();
        assert!(matches!(err, DualGraphError::LimitExceeded { what: "ring points", limit: 14 }));
        assert_eq!(err.code(), "limit_exceeded");
    }
}

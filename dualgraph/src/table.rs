//! Edge table: one row per graph edge, a line geometry, and named value columns.

use geo::{Coord, LineString};
use serde_json::json;

use crate::algorithms::components::Components;
use crate::error::{DualGraphError, GenericError, Result};
use crate::model::{Crs, KeyPair, NodeId, Value};
use crate::Graph;

pub const ENDPOINT_U: &str = "endpoint_u";
pub const ENDPOINT_V: &str = "endpoint_v";
pub const COMPONENT: &str = "component";
pub const IN_LARGEST: &str = "in_largest";

/// Coordinate transform between two reference systems, supplied by the caller.
pub trait Reproject {
    fn reproject(&self, from: &Crs, to: &Crs, c: Coord<f64>) -> std::result::Result<Coord<f64>, GenericError>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

#[derive(Clone, Debug)]
pub struct EdgeTable {
    pub(crate) crs: Crs,
    pub(crate) edges: Vec<(NodeId, NodeId)>,
    pub(crate) geometry: Vec<LineString<f64>>,
    pub(crate) columns: Vec<Column>, // insertion order
}

impl EdgeTable {
    pub(crate) fn with_capacity(crs: Crs, n: usize) -> Self {
        EdgeTable {
            crs,
            edges: Vec::with_capacity(n),
            geometry: Vec::with_capacity(n),
            columns: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.geometry.len()
    }
    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }
    pub fn crs(&self) -> &Crs {
        &self.crs
    }
    pub fn geometries(&self) -> &[LineString<f64>] {
        &self.geometry
    }
    /// Graph endpoints of row `row`, in the graph's storage orientation.
    pub fn edge(&self, row: usize) -> Option<(NodeId, NodeId)> {
        self.edges.get(row).copied()
    }
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|c| c.name.as_str())
    }
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }
    pub(crate) fn column_mut(&mut self, name: &str) -> Option<&mut Vec<Value>> {
        self.columns
            .iter_mut()
            .find(|c| c.name == name)
            .map(|c| &mut c.values)
    }
    pub fn value(&self, row: usize, name: &str) -> Option<&Value> {
        self.column(name).and_then(|c| c.get(row))
    }

    /// Creates `name` filled with `default`. Returns false, leaving the
    /// column untouched, when it already exists.
    pub fn add_column_with_default(&mut self, name: &str, default: Value) -> bool {
        if self.has_column(name) {
            return false;
        }
        self.columns.push(Column {
            name: name.to_string(),
            values: vec![default; self.len()],
        });
        true
    }

    // Replaces or appends a whole column; callers build `values` from the rows.
    pub(crate) fn set_column(&mut self, name: &str, values: Vec<Value>) {
        debug_assert_eq!(values.len(), self.len());
        match self.column_mut(name) {
            Some(col) => *col = values,
            None => self.columns.push(Column {
                name: name.to_string(),
                values,
            }),
        }
    }

    pub fn has_endpoints(&self) -> bool {
        self.has_column(ENDPOINT_U) && self.has_column(ENDPOINT_V)
    }

    /// Unordered endpoint key of every row. Fails if the endpoint columns are absent.
    pub fn endpoint_pairs(&self) -> Result<Vec<KeyPair>> {
        let us = self
            .column(ENDPOINT_U)
            .ok_or_else(|| DualGraphError::MissingColumn(ENDPOINT_U.into()))?;
        let vs = self
            .column(ENDPOINT_V)
            .ok_or_else(|| DualGraphError::MissingColumn(ENDPOINT_V.into()))?;
        Ok(us
            .iter()
            .zip(vs.iter())
            .map(|(u, v)| KeyPair::new(u, v))
            .collect())
    }

    /// Adds `component` and `in_largest` columns from a partition of `graph`.
    pub fn label_components(&mut self, comps: &Components) {
        let mut labels = Vec::with_capacity(self.len());
        let mut largest = Vec::with_capacity(self.len());
        for &(u, _) in &self.edges {
            match comps.component_of(u) {
                Some(c) => {
                    labels.push(Value::from(c));
                    largest.push(Value::Bool(comps.largest() == Some(c)));
                }
                None => {
                    labels.push(Value::Null);
                    largest.push(Value::Bool(false));
                }
            }
        }
        self.set_column(COMPONENT, labels);
        self.set_column(IN_LARGEST, largest);
    }

    /// Copy of this table with every coordinate moved into `target`.
    pub fn to_crs(&self, target: &Crs, reproject: &dyn Reproject) -> Result<EdgeTable> {
        let mut out = self.clone();
        if &self.crs == target {
            return Ok(out);
        }
        for line in out.geometry.iter_mut() {
            for c in line.0.iter_mut() {
                *c = reproject
                    .reproject(&self.crs, target, *c)
                    .map_err(|source| DualGraphError::Reproject {
                        from: self.crs.clone(),
                        to: target.clone(),
                        source,
                    })?;
            }
        }
        out.crs = target.clone();
        Ok(out)
    }

    /// GeoJSON FeatureCollection, one LineString feature per row with the columns as properties.
    pub fn to_geojson_value(&self) -> serde_json::Value {
        let features: Vec<serde_json::Value> = (0..self.len())
            .map(|row| {
                let coords: Vec<[f64; 2]> = self.geometry[row].0.iter().map(|c| [c.x, c.y]).collect();
                let mut props = serde_json::Map::new();
                for col in &self.columns {
                    props.insert(col.name.clone(), col.values[row].to_json());
                }
                json!({
                    "type": "Feature",
                    "geometry": { "type": "LineString", "coordinates": coords },
                    "properties": props,
                })
            })
            .collect();
        json!({
            "type": "FeatureCollection",
            "crs": { "type": "name", "properties": { "name": self.crs.as_str() } },
            "features": features,
        })
    }
}

impl Graph {
    /// Keys of nodes `u` and `v` under `attr`, for building annotation pairs from ids.
    pub fn key_pair(&self, u: NodeId, v: NodeId, attr: &str) -> Option<KeyPair> {
        Some(KeyPair::new(self.node_attr(u, attr)?, self.node_attr(v, attr)?))
    }
}

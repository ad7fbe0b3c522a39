//! Error type shared by every operation in the crate.

use crate::model::{Crs, NodeId, Value};
use std::path::PathBuf;
use thiserror::Error;

/// Boxed error raised by an external collaborator (reprojector, sink).
pub type GenericError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, DualGraphError>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DualGraphError {
    /// A key or attribute value matched zero or several records where exactly one was required.
    #[error("lookup of {attr} == {value} matched {matches} records, expected exactly one")]
    Lookup {
        attr: String,
        value: Value,
        matches: usize,
    },

    /// The matching shape has no centroid.
    #[error("shape with {attr} == {value} has an empty geometry")]
    EmptyGeometry { attr: String, value: Value },

    #[error("node {node} has no attribute {attr:?}")]
    MissingAttribute { node: NodeId, attr: String },

    /// Table lacks a column the operation depends on.
    #[error("edge table has no column {0:?}")]
    MissingColumn(String),

    /// Column the table itself maintains and callers may not write.
    #[error("column {0:?} is reserved")]
    ReservedColumn(String),

    #[error("refusing to add a self-loop on node {0}")]
    SelfLoop(NodeId),

    #[error("geometries are in {from} but {to} was requested and no reprojector was given")]
    CrsMismatch { from: Crs, to: Crs },

    #[error("reprojection from {from} to {to} failed: {source}")]
    Reproject {
        from: Crs,
        to: Crs,
        #[source]
        source: GenericError,
    },

    #[error("invalid graph document: {0}")]
    InvalidGraph(String),

    #[error("invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    #[error("{what} exceeds the limit of {limit}")]
    LimitExceeded { what: &'static str, limit: usize },

    #[error("output path {0:?} must end in .shp")]
    InvalidPath(PathBuf),

    #[error("edge sink failed: {0}")]
    Sink(#[source] GenericError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl DualGraphError {
    pub(crate) fn lookup(attr: &str, value: &Value, matches: usize) -> Self {
        DualGraphError::Lookup {
            attr: attr.to_string(),
            value: value.clone(),
            matches,
        }
    }

    /// True for the lookup-failure class: unresolved keys and unusable matches.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            DualGraphError::Lookup { .. }
                | DualGraphError::EmptyGeometry { .. }
                | DualGraphError::MissingAttribute { .. }
        )
    }

    /// Stable machine-readable code, used by the bindings' error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            DualGraphError::Lookup { .. } => "lookup",
            DualGraphError::EmptyGeometry { .. } => "empty_geometry",
            DualGraphError::MissingAttribute { .. } => "missing_attribute",
            DualGraphError::MissingColumn(_) => "missing_column",
            DualGraphError::ReservedColumn(_) => "reserved_column",
            DualGraphError::SelfLoop(_) => "self_loop",
            DualGraphError::CrsMismatch { .. } => "crs_mismatch",
            DualGraphError::Reproject { .. } => "reproject",
            DualGraphError::InvalidGraph(_) => "invalid_graph",
            DualGraphError::InvalidGeoJson(_) => "invalid_geojson",
            DualGraphError::LimitExceeded { .. } => "limit_exceeded",
            DualGraphError::InvalidPath(_) => "invalid_path",
            DualGraphError::Sink(_) => "sink",
            DualGraphError::Json(_) => "json",
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Crs;

/// Join key of dual graphs built from 2010 census geographies.
pub const DEFAULT_KEY: &str = "GEOID10";

/// Options for projecting a graph onto its shapes.
///
/// ```json
/// { "key": "GEOID10", "endpoints": "GEOID10", "target_crs": "EPSG:3857" }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionOptions {
    /// Attribute shared by graph nodes and shape records.
    pub key: String,
    /// Node attribute stored per row in `endpoint_u`/`endpoint_v`.
    pub endpoints: Option<String>,
    /// Output CRS; the shapes' CRS when unset.
    pub target_crs: Option<Crs>,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        ProjectionOptions {
            key: DEFAULT_KEY.to_string(),
            endpoints: None,
            target_crs: None,
        }
    }
}

impl ProjectionOptions {
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }
    pub fn with_endpoints(mut self, attr: impl Into<String>) -> Self {
        self.endpoints = Some(attr.into());
        self
    }
    pub fn with_target_crs(mut self, crs: Crs) -> Self {
        self.target_crs = Some(crs);
        self
    }
    pub fn from_json_value(v: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(v)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let o = ProjectionOptions::from_json_value(serde_json::json!({ "endpoints": "VTD" })).unwrap();
        assert_eq!(o.key, DEFAULT_KEY);
        assert_eq!(o.endpoints.as_deref(), Some("VTD"));
        assert!(o.target_crs.is_none());
    }
}

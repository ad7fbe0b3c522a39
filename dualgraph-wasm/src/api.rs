use crate::DualGraph;
use dualgraph::model::{Crs, KeyPair, Value};
use dualgraph::{EdgeTable, ProjectionOptions, ShapeTable};
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;
use crate::error;
use crate::interop::{arr_f64, arr_u32, arr_u8, json_to_js, new_obj, set_kv};

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Forward crate logs to the console at `level` (off, error, warn, info, debug, trace).
#[wasm_bindgen]
pub fn init_logging(level: &str) -> bool {
    crate::logging::init(level)
}

fn from_js(param: &str, v: JsValue) -> Result<serde_json::Value, JsValue> {
    if v.is_undefined() || v.is_null() {
        return Ok(serde_json::Value::Null);
    }
    serde_wasm_bindgen::from_value::<serde_json::Value>(v).map_err(|e| error::bad_input(param, e))
}

fn scalar(param: &str, v: &serde_json::Value) -> Result<Value, JsValue> {
    Value::from_json(v).ok_or_else(|| error::bad_input(param, "expected a string, number, boolean or null"))
}

/// `[[u, v], ...]` into key pairs.
fn pairs(param: &str, v: JsValue) -> Result<Vec<KeyPair>, JsValue> {
    let rows: Vec<(serde_json::Value, serde_json::Value)> =
        serde_wasm_bindgen::from_value(v).map_err(|e| error::bad_input(param, e))?;
    rows.iter()
        .map(|(u, v)| Ok(KeyPair::new(scalar(param, u)?, scalar(param, v)?)))
        .collect()
}

/// `[[u, v, value], ...]` into keyed values.
fn keyed_values(param: &str, v: JsValue) -> Result<Vec<(KeyPair, Value)>, JsValue> {
    let rows: Vec<(serde_json::Value, serde_json::Value, serde_json::Value)> =
        serde_wasm_bindgen::from_value(v).map_err(|e| error::bad_input(param, e))?;
    rows.iter()
        .map(|(u, v, val)| Ok((KeyPair::new(scalar(param, u)?, scalar(param, v)?), scalar(param, val)?)))
        .collect()
}

#[wasm_bindgen]
impl DualGraph {
    #[wasm_bindgen(constructor)]
    pub fn new() -> DualGraph {
        crate::DualGraph::rs_new()
    }

    // Loading
    pub fn load_graph_res(&mut self, doc: JsValue) -> JsValue {
        let v = match from_js("doc", doc) {
            Ok(v) => v,
            Err(e) => return e,
        };
        match dualgraph::Graph::from_json_value(v) {
            Ok(g) => {
                self.inner = g;
                self.table = None;
                error::ok(JsValue::from_f64(self.inner.node_count() as f64))
            }
            Err(e) => error::from_error(&e),
        }
    }
    pub fn load_shapes_res(&mut self, geojson: JsValue, default_crs: Option<String>) -> JsValue {
        let v = match from_js("geojson", geojson) {
            Ok(v) => v,
            Err(e) => return e,
        };
        match ShapeTable::from_geojson_value(v, default_crs.map(Crs::new)) {
            Ok(s) => {
                let n = s.len();
                self.shapes = Some(s);
                self.table = None;
                error::ok(JsValue::from_f64(n as f64))
            }
            Err(e) => error::from_error(&e),
        }
    }
    pub fn node_count(&self) -> u32 {
        self.inner.node_count()
    }
    pub fn edge_count(&self) -> u32 {
        self.inner.edge_count()
    }
    pub fn to_json(&self) -> JsValue {
        json_to_js(&self.inner.to_json_value())
    }

    // Projection
    /// Builds the edge table; `opts` follows `ProjectionOptions` (key, endpoints, target_crs).
    pub fn build_edges_res(&mut self, opts: JsValue) -> JsValue {
        let opts = match from_js("opts", opts) {
            Ok(serde_json::Value::Null) => ProjectionOptions::default(),
            Ok(v) => match ProjectionOptions::from_json_value(v) {
                Ok(o) => o,
                Err(e) => return error::from_error(&e),
            },
            Err(e) => return e,
        };
        let Some(shapes) = self.shapes.as_ref() else {
            return error::not_loaded("shapes");
        };
        match self.inner.to_edge_table(shapes, &opts) {
            Ok(t) => {
                let n = t.len();
                self.table = Some(t);
                error::ok(JsValue::from_f64(n as f64))
            }
            Err(e) => error::from_error(&e),
        }
    }
    /// Typed arrays for the edge table: node ids, flattened coordinates and per-row offsets.
    pub fn get_edge_data(&self) -> JsValue {
        let Some(t) = self.table.as_ref() else {
            return JsValue::NULL;
        };
        edge_data(t).into()
    }
    pub fn get_edge_data_res(&self) -> JsValue {
        match self.table.as_ref() {
            Some(t) => error::ok(edge_data(t).into()),
            None => error::not_loaded("edge table"),
        }
    }
    pub fn column_res(&self, name: &str) -> JsValue {
        let Some(t) = self.table.as_ref() else {
            return error::not_loaded("edge table");
        };
        match t.column(name) {
            Some(col) => {
                let vals: Vec<serde_json::Value> = col.iter().map(Value::to_json).collect();
                error::ok(json_to_js(&serde_json::Value::Array(vals)))
            }
            None => error::from_error(&dualgraph::DualGraphError::MissingColumn(name.to_string())),
        }
    }
    pub fn edges_geojson_res(&self) -> JsValue {
        match self.table.as_ref() {
            Some(t) => error::ok(json_to_js(&t.to_geojson_value())),
            None => error::not_loaded("edge table"),
        }
    }
    pub fn svg_paths(&self) -> JsValue {
        let paths = self.table.as_ref().map(EdgeTable::to_svg_paths).unwrap_or_default();
        serde_wasm_bindgen::to_value(&paths).unwrap_or(JsValue::NULL)
    }

    // Components
    /// `{ sizes, largest, labels, problem_mask? }`; `labels` is indexed by node id.
    pub fn components(&self, key: Option<String>) -> JsValue {
        let comps = self.inner.components();
        let obj = new_obj();
        let sizes: Vec<u32> = comps.sizes().into_iter().map(|s| s as u32).collect();
        set_kv(&obj, "sizes", &arr_u32(&sizes).into());
        let largest = comps.largest().map_or(JsValue::NULL, |l| JsValue::from_f64(l as f64));
        set_kv(&obj, "largest", &largest);
        let labels: Vec<u32> = self
            .inner
            .node_ids()
            .map(|n| comps.component_of(n).map_or(u32::MAX, |c| c as u32))
            .collect();
        set_kv(&obj, "labels", &arr_u32(&labels).into());
        if let Some(shapes) = self.shapes.as_ref() {
            let key = key.as_deref().unwrap_or(dualgraph::config::DEFAULT_KEY);
            let mask: Vec<u8> = comps.problem_mask(&self.inner, shapes, key).into_iter().map(u8::from).collect();
            set_kv(&obj, "problem_mask", &arr_u8(&mask).into());
        }
        obj.into()
    }
    pub fn problem_keys_res(&self, key: &str) -> JsValue {
        match self.inner.components().problem_keys(&self.inner, key) {
            Ok(keys) => {
                let vals: Vec<serde_json::Value> = keys.iter().map(Value::to_json).collect();
                error::ok(json_to_js(&serde_json::Value::Array(vals)))
            }
            Err(e) => error::from_error(&e),
        }
    }
    pub fn label_components_res(&mut self) -> JsValue {
        let comps = self.inner.components();
        match self.table.as_mut() {
            Some(t) => {
                t.label_components(&comps);
                error::ok(JsValue::from_f64(comps.len() as f64))
            }
            None => error::not_loaded("edge table"),
        }
    }

    // Annotation
    /// Sets `col` to `value` on every row whose endpoints match one of `pairs`.
    pub fn mark_edges_res(&mut self, pairs: JsValue, col: &str, value: JsValue) -> JsValue {
        let marks = match crate::api::pairs("pairs", pairs) {
            Ok(p) => p,
            Err(e) => return e,
        };
        let val = match from_js("value", value).and_then(|v| scalar("value", &v)) {
            Ok(v) => v,
            Err(e) => return e,
        };
        let Some(t) = self.table.as_mut() else {
            return error::not_loaded("edge table");
        };
        match t.mark_edges(marks, col, val) {
            Ok(n) => error::ok(JsValue::from_f64(n as f64)),
            Err(e) => error::from_error(&e),
        }
    }
    /// Per-pair values: `entries` is `[[u, v, value], ...]`.
    pub fn mark_edges_with_res(&mut self, entries: JsValue, col: &str) -> JsValue {
        let marks = match keyed_values("entries", entries) {
            Ok(m) => m,
            Err(e) => return e,
        };
        let Some(t) = self.table.as_mut() else {
            return error::not_loaded("edge table");
        };
        match t.mark_edges_with(marks, col) {
            Ok(n) => error::ok(JsValue::from_f64(n as f64)),
            Err(e) => error::from_error(&e),
        }
    }

    // Graph edits
    pub fn add_edge_by_attr_res(&mut self, u: JsValue, v: JsValue, attr: &str) -> JsValue {
        let (u, v) = match endpoints(u, v) {
            Ok(p) => p,
            Err(e) => return e,
        };
        match self.inner.add_edge_by_attr(u, v, attr) {
            Ok(added) => error::ok(JsValue::from_bool(added)),
            Err(e) => error::from_error(&e),
        }
    }
    pub fn remove_edge_by_attr_res(&mut self, u: JsValue, v: JsValue, attr: &str) -> JsValue {
        let (u, v) = match endpoints(u, v) {
            Ok(p) => p,
            Err(e) => return e,
        };
        match self.inner.remove_edge_by_attr(u, v, attr) {
            Ok(removed) => error::ok(JsValue::from_bool(removed)),
            Err(e) => error::from_error(&e),
        }
    }
    pub fn find_node_by_attr(&self, attr: &str, value: JsValue) -> JsValue {
        match from_js("value", value).and_then(|v| scalar("value", &v)) {
            Ok(v) => self
                .inner
                .find_node_by_attr(attr, &v)
                .map_or(JsValue::NULL, |id| JsValue::from_f64(id as f64)),
            Err(_) => JsValue::NULL,
        }
    }
}

impl Default for DualGraph {
    fn default() -> Self {
        DualGraph::new()
    }
}

fn endpoints(u: JsValue, v: JsValue) -> Result<(Value, Value), JsValue> {
    let u = from_js("u", u).and_then(|j| scalar("u", &j))?;
    let v = from_js("v", v).and_then(|j| scalar("v", &j))?;
    Ok((u, v))
}

fn edge_data(t: &EdgeTable) -> js_sys::Object {
    let mut nodes = Vec::with_capacity(t.len() * 2);
    let mut coords = Vec::new();
    let mut offsets = Vec::with_capacity(t.len() + 1);
    offsets.push(0u32);
    for row in 0..t.len() {
        if let Some((u, v)) = t.edge(row) {
            nodes.push(u);
            nodes.push(v);
        }
        for c in t.geometries()[row].coords() {
            coords.push(c.x);
            coords.push(c.y);
        }
        offsets.push((coords.len() / 2) as u32);
    }
    let obj = new_obj();
    set_kv(&obj, "endpoints", &arr_u32(&nodes).into());
    set_kv(&obj, "coords", &arr_f64(&coords).into());
    set_kv(&obj, "offsets", &arr_u32(&offsets).into());
    set_kv(&obj, "crs", &JsValue::from_str(t.crs().as_str()));
    obj
}

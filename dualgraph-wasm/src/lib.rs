use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;
mod logging;

/// A dual graph plus the shapes and edge table built from it.
#[wasm_bindgen]
pub struct DualGraph {
    pub(crate) inner: dualgraph::Graph,
    pub(crate) shapes: Option<dualgraph::ShapeTable>,
    pub(crate) table: Option<dualgraph::EdgeTable>,
}

impl DualGraph {
    pub fn rs_new() -> DualGraph {
        DualGraph { inner: dualgraph::Graph::new(), shapes: None, table: None }
    }
}

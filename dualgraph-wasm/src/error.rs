use dualgraph::DualGraphError;
use wasm_bindgen::prelude::*;

use crate::interop::{new_obj, set_kv};

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

/// Envelope for a core error; lookup failures carry the attribute and value tried.
pub fn from_error(e: &DualGraphError) -> JsValue {
    let data = match e {
        DualGraphError::Lookup { attr, value, matches } => {
            let d = new_obj();
            set_kv(&d, "attr", &JsValue::from_str(attr));
            set_kv(&d, "value", &JsValue::from_str(&value.to_string()));
            set_kv(&d, "matches", &JsValue::from_f64(*matches as f64));
            Some(d.into())
        }
        DualGraphError::MissingColumn(col) | DualGraphError::ReservedColumn(col) => {
            let d = new_obj();
            set_kv(&d, "column", &JsValue::from_str(col));
            Some(d.into())
        }
        _ => None,
    };
    err(e.code(), e.to_string(), data)
}

#[inline]
pub fn not_loaded(what: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "what", &JsValue::from_str(what));
    err("not_loaded", format!("{} not loaded", what), Some(d.into()))
}

#[inline]
pub fn bad_input(param: &str, msg: impl std::fmt::Display) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("bad_input", format!("parameter '{}': {}", param, msg), Some(d.into()))
}

//! Generic tree walk into JSON with cycle detection.

use std::collections::HashSet;

use serde_json::{Map, Value as Json};

use super::stringify::{number_text, primitive_text, scalar_text, stringify_with};
use super::{CIRCULAR, MAX_COLLECTION_ENTRIES, MAX_DEPTH, TOO_DEEP, TYPED_ARRAY_PREVIEW};
use crate::value::{Object, ObjectId, ObjectRef, Value};

/// Visited-object table and nesting depth for one top-level serialization
/// call.
#[derive(Debug, Default)]
pub struct CycleDetector {
    visited: HashSet<ObjectId>,
    depth: usize,
}

impl CycleDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visit. Returns `false` if the object was already seen.
    pub fn enter(&mut self, obj: &ObjectRef) -> bool {
        self.visited.insert(obj.id())
    }

    pub fn visited(&self) -> usize {
        self.visited.len()
    }

    /// Objects currently open on the walk path.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Walk a value into a JSON tree with a fresh cycle detector.
///
/// `undefined` at the top level becomes `null`.
pub fn to_serializable(value: &Value) -> Json {
    let mut seen = CycleDetector::new();
    walk(value, &mut seen).unwrap_or(Json::Null)
}

/// Walk one value. `None` stands for `undefined`, which objects omit.
pub(crate) fn walk(value: &Value, seen: &mut CycleDetector) -> Option<Json> {
    match value {
        Value::Undefined => None,
        Value::Null => Some(Json::Null),
        Value::Bool(b) => Some(Json::Bool(*b)),
        Value::Number(n) => Some(number_json(*n)),
        Value::String(s) => Some(Json::String(s.clone())),
        Value::BigInt(_) | Value::Symbol(_) | Value::Function(_) => {
            Some(Json::String(primitive_text(value)))
        }
        Value::Object(obj) => {
            if seen.depth >= MAX_DEPTH {
                return Some(Json::String(TOO_DEEP.to_string()));
            }
            if !seen.enter(obj) {
                return Some(Json::String(CIRCULAR.to_string()));
            }
            seen.depth += 1;
            let json = walk_object(obj, seen);
            seen.depth -= 1;
            Some(json)
        }
    }
}

fn walk_object(obj: &ObjectRef, seen: &mut CycleDetector) -> Json {
    match obj.object() {
        Object::Plain(_) => {
            let mut out = Map::new();
            for (key, value) in obj.entries() {
                if let Some(json) = walk(&value, seen) {
                    out.insert(key, json);
                }
            }
            Json::Object(out)
        }
        Object::Array(_) => Json::Array(
            obj.items()
                .iter()
                .map(|item| walk(item, seen).unwrap_or(Json::Null))
                .collect(),
        ),
        Object::Error(err) => {
            let mut out = Map::new();
            out.insert("name".into(), Json::String(err.name.clone()));
            out.insert("message".into(), Json::String(err.message.clone()));
            if let Some(stack) = &err.stack {
                out.insert("stack".into(), Json::String(stack.clone()));
            }
            if let Some(cause) = err.cause.as_ref().and_then(|c| walk(c, seen)) {
                out.insert("cause".into(), cause);
            }
            Json::Object(out)
        }
        Object::TypedArray { kind, elements } => {
            let preview = elements
                .iter()
                .take(TYPED_ARRAY_PREVIEW)
                .map(|e| walk(e, seen).unwrap_or(Json::Null))
                .collect();
            let mut out = Map::new();
            out.insert("type".into(), Json::String(kind.type_name().to_string()));
            out.insert("length".into(), Json::from(elements.len()));
            out.insert("preview".into(), Json::Array(preview));
            Json::Object(out)
        }
        Object::FormData(pairs) => {
            let mut fields = Map::new();
            for (key, value) in pairs {
                let text = Json::String(stringify_with(value, seen));
                match fields.get_mut(key) {
                    Some(Json::Array(values)) => values.push(text),
                    _ => {
                        fields.insert(key.clone(), Json::Array(vec![text]));
                    }
                }
            }
            let mut out = Map::new();
            out.insert("formData".into(), Json::Object(fields));
            Json::Object(out)
        }
        Object::Map(entries) => {
            let rendered = entries
                .iter()
                .take(MAX_COLLECTION_ENTRIES)
                .map(|(k, v)| {
                    let key = Json::String(stringify_with(k, seen));
                    let value = walk(v, seen).unwrap_or(Json::Null);
                    Json::Array(vec![key, value])
                })
                .collect();
            let mut out = Map::new();
            out.insert("type".into(), Json::String("Map".into()));
            out.insert("size".into(), Json::from(entries.len()));
            out.insert("entries".into(), Json::Array(rendered));
            Json::Object(out)
        }
        Object::Set(values) => {
            let rendered = values
                .iter()
                .take(MAX_COLLECTION_ENTRIES)
                .map(|v| walk(v, seen).unwrap_or(Json::Null))
                .collect();
            let mut out = Map::new();
            out.insert("type".into(), Json::String("Set".into()));
            out.insert("size".into(), Json::from(values.len()));
            out.insert("values".into(), Json::Array(rendered));
            Json::Object(out)
        }
        Object::Request(req) => {
            let mut out = Map::new();
            out.insert("type".into(), Json::String("Request".into()));
            out.insert("method".into(), Json::String(req.method.clone()));
            out.insert("url".into(), Json::String(req.url.clone()));
            out.insert("headers".into(), header_pairs(&req.headers));
            Json::Object(out)
        }
        Object::Response(res) => {
            let mut out = Map::new();
            out.insert("type".into(), Json::String("Response".into()));
            out.insert("status".into(), Json::from(res.status));
            out.insert("ok".into(), Json::Bool(res.ok));
            out.insert("url".into(), Json::String(res.url.clone()));
            out.insert("headers".into(), header_pairs(&res.headers));
            Json::Object(out)
        }
        Object::Date(_)
        | Object::RegExp { .. }
        | Object::Url(_)
        | Object::ArrayBuffer { .. }
        | Object::Blob(_)
        | Object::Node { .. } => Json::String(scalar_text(obj)),
    }
}

fn header_pairs(headers: &[(String, String)]) -> Json {
    Json::Array(
        headers
            .iter()
            .map(|(k, v)| Json::Array(vec![Json::String(k.clone()), Json::String(v.clone())]))
            .collect(),
    )
}

/// Integral values stay integers; non-finite values have no JSON form.
pub(crate) fn number_json(n: f64) -> Json {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE {
        return Json::from(n as i64);
    }
    match serde_json::Number::from_f64(n) {
        Some(num) => Json::Number(num),
        None if n.is_finite() => Json::String(number_text(n)),
        None => Json::Null,
    }
}

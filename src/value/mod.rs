//! Runtime value model for captured logging arguments.
//!
//! # Data Flow
//! ```text
//! logging call arguments
//!     → Value (primitives inline, objects behind shared ObjectRef handles)
//!     → classify.rs (closed Shape classification)
//!     → serializer dispatch
//! ```
//!
//! # Design Decisions
//! - Objects are shared by `Arc`; the pointer address is the object identity
//! - Plain objects and arrays are interior-mutable so cyclic graphs can be built
//! - Host-specific shapes (DOM nodes, fetch requests, blobs) are plain data,
//!   so hosts lacking them simply never construct them

pub mod classify;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use url::Url;

pub use classify::{classify, Shape};

/// A captured runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Undefined,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    String(String),
    /// Symbol with its optional description.
    Symbol(Option<String>),
    /// Function with its optional name.
    Function(Option<String>),
    Object(ObjectRef),
}

/// Shared handle to an object. Clones alias the same object.
#[derive(Debug, Clone)]
pub struct ObjectRef(Arc<Object>);

/// Identity of an object, stable for as long as any handle is alive.
pub type ObjectId = usize;

/// Every concrete object kind the capture side knows about.
#[derive(Debug)]
pub enum Object {
    Plain(RwLock<Vec<(String, Value)>>),
    Array(RwLock<Vec<Value>>),
    Error(ErrorObject),
    /// Milliseconds since the Unix epoch; NaN marks an invalid date.
    Date(f64),
    RegExp { source: String, flags: String },
    Url(Url),
    ArrayBuffer { byte_length: usize },
    TypedArray { kind: TypedArrayKind, elements: Vec<Value> },
    Blob(BlobInfo),
    FormData(Vec<(String, Value)>),
    Map(Vec<(Value, Value)>),
    Set(Vec<Value>),
    Request(RequestInfo),
    Response(ResponseInfo),
    /// Markup node. `markup` is `None` when the host cannot serialize it.
    Node { node_name: String, markup: Option<String> },
}

#[derive(Debug, Clone)]
pub struct ErrorObject {
    pub name: String,
    pub message: String,
    pub stack: Option<String>,
    pub cause: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypedArrayKind {
    Int8,
    Uint8,
    Uint8Clamped,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
    BigInt64,
    BigUint64,
}

impl TypedArrayKind {
    /// Concrete element-kind name, as reported in serialized previews.
    pub fn type_name(&self) -> &'static str {
        match self {
            TypedArrayKind::Int8 => "Int8Array",
            TypedArrayKind::Uint8 => "Uint8Array",
            TypedArrayKind::Uint8Clamped => "Uint8ClampedArray",
            TypedArrayKind::Int16 => "Int16Array",
            TypedArrayKind::Uint16 => "Uint16Array",
            TypedArrayKind::Int32 => "Int32Array",
            TypedArrayKind::Uint32 => "Uint32Array",
            TypedArrayKind::Float32 => "Float32Array",
            TypedArrayKind::Float64 => "Float64Array",
            TypedArrayKind::BigInt64 => "BigInt64Array",
            TypedArrayKind::BigUint64 => "BigUint64Array",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BlobInfo {
    /// Present for files, absent for anonymous blobs.
    pub name: Option<String>,
    pub size: u64,
    /// Empty when the host did not report a content type.
    pub mime: String,
}

#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct ResponseInfo {
    pub status: u16,
    pub ok: bool,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

impl ObjectRef {
    pub fn new(object: Object) -> Self {
        Self(Arc::new(object))
    }

    pub fn id(&self) -> ObjectId {
        Arc::as_ptr(&self.0) as ObjectId
    }

    pub fn object(&self) -> &Object {
        &self.0
    }

    /// Insert or replace a key on a plain object. No-op on other kinds.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        if let Object::Plain(entries) = self.object() {
            let key = key.into();
            let mut entries = entries.write().unwrap_or_else(PoisonError::into_inner);
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => entries.push((key, value)),
            }
        }
    }

    /// Append to an array. No-op on other kinds.
    pub fn push(&self, value: Value) {
        if let Object::Array(items) = self.object() {
            items
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .push(value);
        }
    }

    /// Snapshot of a plain object's entries, in insertion order.
    pub fn entries(&self) -> Vec<(String, Value)> {
        match self.object() {
            Object::Plain(entries) => read(entries).clone(),
            _ => Vec::new(),
        }
    }

    /// Snapshot of an array's items.
    pub fn items(&self) -> Vec<Value> {
        match self.object() {
            Object::Array(items) => read(items).clone(),
            _ => Vec::new(),
        }
    }

    pub fn is_plain(&self) -> bool {
        matches!(self.object(), Object::Plain(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.object(), Object::Array(_))
    }
}

impl Value {
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        let entries = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Value::Object(ObjectRef::new(Object::Plain(RwLock::new(entries))))
    }

    pub fn empty_object() -> Self {
        Value::Object(ObjectRef::new(Object::Plain(RwLock::new(Vec::new()))))
    }

    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Object(ObjectRef::new(Object::Array(RwLock::new(
            items.into_iter().collect(),
        ))))
    }

    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::error_with(ErrorObject {
            name: name.into(),
            message: message.into(),
            stack: None,
            cause: None,
        })
    }

    pub fn error_with(error: ErrorObject) -> Self {
        Value::Object(ObjectRef::new(Object::Error(error)))
    }

    /// Convert a Rust error, turning its `source()` chain into nested causes.
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let cause = error.source().map(Value::from_error);
        Self::error_with(ErrorObject {
            name: "Error".to_string(),
            message: error.to_string(),
            stack: None,
            cause,
        })
    }

    pub fn date(millis: f64) -> Self {
        Value::Object(ObjectRef::new(Object::Date(millis)))
    }

    pub fn regexp(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Value::Object(ObjectRef::new(Object::RegExp {
            source: source.into(),
            flags: flags.into(),
        }))
    }

    pub fn url(url: Url) -> Self {
        Value::Object(ObjectRef::new(Object::Url(url)))
    }

    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::Object(ObjectRef::new(Object::Map(entries.into_iter().collect())))
    }

    pub fn set(values: impl IntoIterator<Item = Value>) -> Self {
        Value::Object(ObjectRef::new(Object::Set(values.into_iter().collect())))
    }

    pub fn from_object(object: Object) -> Self {
        Value::Object(ObjectRef::new(object))
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// True for error objects, the values the error builder extracts.
    pub fn is_error(&self) -> bool {
        matches!(self.as_object().map(ObjectRef::object), Some(Object::Error(_)))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => Value::Number(f),
                None => Value::String(n.to_string()),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::array(items.into_iter().map(Value::from)),
            serde_json::Value::Object(map) => {
                Value::object(map.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

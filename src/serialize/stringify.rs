//! Human-readable string form of any captured value.

use chrono::{DateTime, Datelike, Timelike};
use serde_json::Value as Json;

use super::walk::{walk, CycleDetector};
use super::UNSERIALIZABLE;
use crate::value::{classify, Object, ObjectRef, Shape, Value};

/// Largest magnitude a valid date may have, in milliseconds from the epoch.
const MAX_DATE_MILLIS: f64 = 8.64e15;

/// Length of one 400-year Gregorian cycle, after which the calendar repeats.
const CYCLE_MILLIS: i64 = 146_097 * 86_400_000;

/// Render any value as a string. Never panics.
pub fn stringify_any(value: &Value) -> String {
    let mut seen = CycleDetector::new();
    stringify_with(value, &mut seen)
}

/// Same as [`stringify_any`], sharing an existing cycle detector.
pub(crate) fn stringify_with(value: &Value, seen: &mut CycleDetector) -> String {
    match classify(value) {
        Shape::Primitive => primitive_text(value),
        Shape::Node
        | Shape::DateLike
        | Shape::PatternLike
        | Shape::UrlLike
        | Shape::Binary
        | Shape::BlobLike => match value {
            Value::Object(obj) => scalar_text(obj),
            _ => primitive_text(value),
        },
        Shape::ErrorLike
        | Shape::TypedArray
        | Shape::FormLike
        | Shape::MapLike
        | Shape::SetLike
        | Shape::RequestLike
        | Shape::ResponseLike
        | Shape::PlainObject => encode_pretty(walk(value, seen).unwrap_or(Json::Null)),
    }
}

fn encode_pretty(tree: Json) -> String {
    serde_json::to_string_pretty(&tree).unwrap_or_else(|_| UNSERIALIZABLE.to_string())
}

pub(crate) fn primitive_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Undefined => "undefined".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(*n),
        Value::BigInt(n) => format!("{n}n"),
        Value::String(s) => s.clone(),
        Value::Symbol(desc) => format!("Symbol({})", desc.as_deref().unwrap_or("")),
        Value::Function(name) => format!(
            "[Function {}]",
            name.as_deref().filter(|n| !n.is_empty()).unwrap_or("anonymous")
        ),
        Value::Object(_) => UNSERIALIZABLE.to_string(),
    }
}

/// Decimal rendering matching the host's textual number form.
pub(crate) fn number_text(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let magnitude = n.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{n:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => formatted,
        };
    }
    n.to_string()
}

/// ISO-8601 form of a date, or `"Invalid Date"`.
///
/// Years outside `0..=9999` use the expanded six-digit form (`+010000`,
/// `-000001`). Dates are shifted by whole 400-year cycles into chrono's range
/// so the full `±8.64e15` ms span formats.
pub(crate) fn date_text(millis: f64) -> String {
    if !millis.is_finite() || millis.abs() > MAX_DATE_MILLIS {
        return "Invalid Date".to_string();
    }
    let millis = millis.trunc() as i64;
    let cycles = millis.div_euclid(CYCLE_MILLIS);
    let Some(dt) = DateTime::from_timestamp_millis(millis.rem_euclid(CYCLE_MILLIS)) else {
        return "Invalid Date".to_string();
    };

    let year = i64::from(dt.year()) + cycles * 400;
    let year = if (0..=9999).contains(&year) {
        format!("{year:04}")
    } else if year < 0 {
        format!("-{:06}", -year)
    } else {
        format!("+{year:06}")
    };
    format!(
        "{year}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        dt.month(),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
        dt.timestamp_subsec_millis()
    )
}

/// Text form of the object kinds that never render as a JSON tree.
pub(crate) fn scalar_text(obj: &ObjectRef) -> String {
    match obj.object() {
        Object::Node { node_name, markup } => match markup {
            Some(markup) => markup.clone(),
            None => format!("[DOM {node_name}]"),
        },
        Object::Date(millis) => date_text(*millis),
        Object::RegExp { source, flags } => format!("/{source}/{flags}"),
        Object::Url(url) => url.to_string(),
        Object::ArrayBuffer { byte_length } => format!("[ArrayBuffer {byte_length} bytes]"),
        Object::Blob(blob) => {
            let mime = if blob.mime.is_empty() {
                "application/octet-stream"
            } else {
                blob.mime.as_str()
            };
            match &blob.name {
                Some(name) => format!("[File \"{name}\" {} bytes {mime}]", blob.size),
                None => format!("[Blob {} bytes {mime}]", blob.size),
            }
        }
        _ => UNSERIALIZABLE.to_string(),
    }
}

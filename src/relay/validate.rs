//! Structural validation of incoming event bodies.

use serde_json::Value as Json;
use thiserror::Error;

use crate::event::{CommonEvent, ConsoleMethod, ErrorEvent, LogEvent, TableEvent};

/// Why a body was not accepted as an event.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload is not an object")]
    NotAnObject,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("unknown event type {0:?}")]
    UnknownType(String),

    #[error("level {level:?} does not match type {kind}")]
    LevelMismatch { kind: ConsoleMethod, level: String },

    #[error("malformed {kind} event: {source}")]
    Shape {
        kind: ConsoleMethod,
        source: serde_json::Error,
    },
}

const REQUIRED: [&str; 3] = ["type", "level", "ts"];

/// Parse a body into an event: JSON object with non-empty `type`, `level`
/// and `ts`, a known type, and a level equal to the type.
pub fn parse_event(bytes: &[u8]) -> Result<LogEvent, PayloadError> {
    let json: Json = serde_json::from_slice(bytes)?;
    let obj = json.as_object().ok_or(PayloadError::NotAnObject)?;

    for field in REQUIRED {
        match obj.get(field) {
            Some(Json::String(s)) if !s.is_empty() => {}
            _ => return Err(PayloadError::MissingField(field)),
        }
    }

    let kind_text = obj["type"].as_str().unwrap_or_default();
    let kind: ConsoleMethod = kind_text
        .parse()
        .map_err(|_| PayloadError::UnknownType(kind_text.to_string()))?;

    let level = obj["level"].as_str().unwrap_or_default();
    if level != kind.as_str() {
        return Err(PayloadError::LevelMismatch {
            kind,
            level: level.to_string(),
        });
    }

    let shape = |source| PayloadError::Shape { kind, source };
    let event = match kind {
        ConsoleMethod::Error => {
            LogEvent::Error(serde_json::from_value::<ErrorEvent>(json).map_err(shape)?)
        }
        ConsoleMethod::Table => {
            LogEvent::Table(serde_json::from_value::<TableEvent>(json).map_err(shape)?)
        }
        ConsoleMethod::Log | ConsoleMethod::Info | ConsoleMethod::Warn | ConsoleMethod::Debug => {
            LogEvent::Common(serde_json::from_value::<CommonEvent>(json).map_err(shape)?)
        }
    };
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_minimal_common_event() {
        let event = parse_event(br#"{"type":"info","level":"info","ts":"t"}"#).unwrap();
        let LogEvent::Common(common) = event else {
            panic!("expected common event");
        };
        assert!(common.args_serialized.is_empty());
        assert_eq!(common.envelope.kind, ConsoleMethod::Info);
    }

    #[test]
    fn test_dispatches_error_and_table() {
        let err = parse_event(
            br#"{"type":"error","level":"error","ts":"t","errors":[{"name":"Error","message":"x"}]}"#,
        )
        .unwrap();
        assert!(matches!(err, LogEvent::Error(ref e) if e.errors.len() == 1));

        let table = parse_event(
            br#"{"type":"table","level":"table","ts":"t","table":{"columns":["a"],"rows":[{"a":1}]},"summary":"1 row(s), 1 column(s)"}"#,
        )
        .unwrap();
        assert!(matches!(table, LogEvent::Table(ref t) if t.table.rows.len() == 1));
    }

    #[test]
    fn test_rejects_non_objects_and_bad_json() {
        assert!(matches!(parse_event(b"[1,2]"), Err(PayloadError::NotAnObject)));
        assert!(matches!(parse_event(b"{oops"), Err(PayloadError::Json(_))));
    }

    #[test]
    fn test_rejects_missing_or_empty_fields() {
        assert!(matches!(
            parse_event(br#"{"type":"log","level":"log"}"#),
            Err(PayloadError::MissingField("ts"))
        ));
        assert!(matches!(
            parse_event(br#"{"type":"","level":"log","ts":"t"}"#),
            Err(PayloadError::MissingField("type"))
        ));
    }

    #[test]
    fn test_rejects_unknown_type_and_mismatched_level() {
        assert!(matches!(
            parse_event(br#"{"type":"trace","level":"trace","ts":"t"}"#),
            Err(PayloadError::UnknownType(t)) if t == "trace"
        ));
        assert!(matches!(
            parse_event(br#"{"type":"log","level":"warn","ts":"t"}"#),
            Err(PayloadError::LevelMismatch { .. })
        ));
    }

    #[test]
    fn test_rejects_wrongly_shaped_fields() {
        assert!(matches!(
            parse_event(br#"{"type":"log","level":"log","ts":"t","argsSerialized":"nope"}"#),
            Err(PayloadError::Shape { .. })
        ));
    }
}

//! Payload builders, one per kind of logging call.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value as Json};
use uuid::Uuid;

use super::types::{
    CommonEvent, ConsoleMethod, Envelope, ErrorEvent, ErrorRecord, LogEvent, TableData, TableEvent,
};
use crate::serialize::{stringify_any, to_serializable, walk::walk, CycleDetector};
use crate::value::{Object, ObjectRef, Value};

/// Capture-time context shared by every builder.
#[derive(Debug, Clone)]
pub struct CaptureContext {
    pub captured_at: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub page_url: Option<String>,
    pub seq: Option<u64>,
    pub session: Option<Uuid>,
}

impl CaptureContext {
    /// Context stamped with the current time and no environment details.
    pub fn now() -> Self {
        Self {
            captured_at: Utc::now(),
            user_agent: None,
            page_url: None,
            seq: None,
            session: None,
        }
    }

    fn envelope(&self, kind: ConsoleMethod) -> Envelope {
        Envelope {
            kind,
            level: kind,
            ts: self.captured_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            ua: self.user_agent.clone(),
            url: self.page_url.clone(),
            seq: self.seq,
            session: self.session,
        }
    }
}

/// Build the event for any method.
pub fn build_event(method: ConsoleMethod, args: &[Value], ctx: &CaptureContext) -> LogEvent {
    match method {
        ConsoleMethod::Error => LogEvent::Error(build_error_event(args, ctx)),
        ConsoleMethod::Table => LogEvent::Table(build_table_event(args, ctx)),
        ConsoleMethod::Log | ConsoleMethod::Info | ConsoleMethod::Warn | ConsoleMethod::Debug => {
            LogEvent::Common(build_common_event(method, args, ctx))
        }
    }
}

/// log / info / warn / debug differ only by their tag.
pub fn build_common_event(
    method: ConsoleMethod,
    args: &[Value],
    ctx: &CaptureContext,
) -> CommonEvent {
    CommonEvent {
        envelope: ctx.envelope(method),
        args: args.iter().map(to_serializable).collect(),
        args_serialized: args.iter().map(stringify_any).collect(),
    }
}

pub fn build_error_event(args: &[Value], ctx: &CaptureContext) -> ErrorEvent {
    let errors = args
        .iter()
        .filter_map(|arg| match arg.as_object().map(ObjectRef::object) {
            Some(Object::Error(err)) => Some(ErrorRecord {
                name: err.name.clone(),
                message: err.message.clone(),
                stack: err.stack.clone(),
                cause: err.cause.as_ref().map(to_serializable),
            }),
            _ => None,
        })
        .collect();

    ErrorEvent {
        envelope: ctx.envelope(ConsoleMethod::Error),
        args: args.iter().map(to_serializable).collect(),
        args_serialized: args.iter().map(stringify_any).collect(),
        errors,
    }
}

/// Only the first argument is tabulated.
pub fn build_table_event(args: &[Value], ctx: &CaptureContext) -> TableEvent {
    let table = to_table(args.first().unwrap_or(&Value::Undefined));
    let summary = format!(
        "{} row(s), {} column(s)",
        table.rows.len(),
        table.columns.len()
    );
    TableEvent {
        envelope: ctx.envelope(ConsoleMethod::Table),
        table,
        summary,
    }
}

fn to_table(value: &Value) -> TableData {
    let mut seen = CycleDetector::new();
    let mut rows = Vec::new();

    match value.as_object() {
        Some(obj) if obj.is_array() => {
            seen.enter(obj);
            for item in obj.items() {
                rows.push(match spreadable(&item) {
                    Some(inner) if seen.enter(inner) => spread(inner, &mut seen),
                    _ => value_row(&item, &mut seen),
                });
            }
        }
        Some(obj) if obj.is_plain() => {
            seen.enter(obj);
            for (key, field) in obj.entries() {
                let mut row = Map::new();
                row.insert("key".into(), Json::String(key));
                match field.as_object() {
                    Some(inner) if inner.is_plain() && seen.enter(inner) => {
                        row.extend(spread(inner, &mut seen));
                    }
                    _ => {
                        row.insert("value".into(), walk(&field, &mut seen).unwrap_or(Json::Null));
                    }
                }
                rows.push(row);
            }
        }
        _ => rows.push(value_row(value, &mut seen)),
    }

    let mut columns: Vec<String> = Vec::new();
    for row in &rows {
        for key in row.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    TableData { columns, rows }
}

/// Plain objects and arrays expose their own keys as columns.
fn spreadable(value: &Value) -> Option<&ObjectRef> {
    value
        .as_object()
        .filter(|obj| obj.is_plain() || obj.is_array())
}

fn spread(obj: &ObjectRef, seen: &mut CycleDetector) -> Map<String, Json> {
    let mut row = Map::new();
    if obj.is_array() {
        for (i, item) in obj.items().iter().enumerate() {
            row.insert(i.to_string(), walk(item, seen).unwrap_or(Json::Null));
        }
    } else {
        for (key, field) in obj.entries() {
            if let Some(json) = walk(&field, seen) {
                row.insert(key, json);
            }
        }
    }
    row
}

fn value_row(value: &Value, seen: &mut CycleDetector) -> Map<String, Json> {
    let mut row = Map::new();
    row.insert("value".into(), walk(value, seen).unwrap_or(Json::Null));
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ErrorObject;
    use serde_json::json;

    fn num(n: i64) -> Value {
        Value::from(n)
    }

    #[test]
    fn test_table_from_array_of_objects() {
        let args = vec![Value::array(vec![
            Value::object([("a", num(1)), ("b", num(2))]),
            Value::object([("a", num(3))]),
        ])];

        let event = build_table_event(&args, &CaptureContext::now());
        assert_eq!(event.table.columns, vec!["a", "b"]);
        assert_eq!(
            serde_json::to_value(&event.table.rows).unwrap(),
            json!([{"a": 1, "b": 2}, {"a": 3}])
        );
        assert_eq!(event.summary, "2 row(s), 2 column(s)");
        assert_eq!(event.envelope.kind, ConsoleMethod::Table);
    }

    #[test]
    fn test_table_from_array_mixes_scalars() {
        let args = vec![Value::array(vec![Value::object([("x", num(1))]), num(7)])];
        let event = build_table_event(&args, &CaptureContext::now());
        assert_eq!(event.table.columns, vec!["x", "value"]);
        assert_eq!(event.table.rows[1]["value"], json!(7));
    }

    #[test]
    fn test_table_from_plain_object() {
        let args = vec![Value::object([
            ("alice", Value::object([("age", num(30))])),
            ("bob", num(5)),
            ("carol", Value::array(vec![num(1)])),
        ])];

        let event = build_table_event(&args, &CaptureContext::now());
        assert_eq!(event.table.columns, vec!["key", "age", "value"]);
        assert_eq!(
            serde_json::to_value(&event.table.rows).unwrap(),
            json!([
                {"key": "alice", "age": 30},
                {"key": "bob", "value": 5},
                {"key": "carol", "value": [1]},
            ])
        );
    }

    #[test]
    fn test_table_from_scalar_and_missing_argument() {
        let event = build_table_event(&[Value::from("solo")], &CaptureContext::now());
        assert_eq!(event.table.columns, vec!["value"]);
        assert_eq!(event.summary, "1 row(s), 1 column(s)");

        let event = build_table_event(&[], &CaptureContext::now());
        assert_eq!(event.table.rows.len(), 1);
        assert_eq!(event.table.rows[0]["value"], Json::Null);
    }

    #[test]
    fn test_table_row_referencing_its_container_is_circular() {
        let list = Value::array(Vec::new());
        list.as_object()
            .unwrap()
            .push(Value::object([("back", list.clone())]));

        let event = build_table_event(&[list], &CaptureContext::now());
        assert_eq!(event.table.rows[0]["back"], json!("[Circular]"));
    }

    #[test]
    fn test_error_event_extracts_error_like_args() {
        let args = vec![Value::error("Error", "x")];
        let event = build_error_event(&args, &CaptureContext::now());

        assert_eq!(event.errors.len(), 1);
        assert_eq!(event.errors[0].name, "Error");
        assert_eq!(event.errors[0].message, "x");
        assert_eq!(event.args_serialized.len(), 1);
    }

    #[test]
    fn test_error_event_keeps_order_and_structured_cause() {
        let args = vec![
            Value::from("context"),
            Value::error("RangeError", "first"),
            num(3),
            Value::error_with(ErrorObject {
                name: "Error".into(),
                message: "second".into(),
                stack: Some("at f".into()),
                cause: Some(Value::object([("code", num(7))])),
            }),
        ];
        let event = build_error_event(&args, &CaptureContext::now());

        let messages: Vec<_> = event.errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert_eq!(event.errors[1].cause, Some(json!({"code": 7})));
        assert_eq!(event.errors[1].stack.as_deref(), Some("at f"));
    }

    #[test]
    fn test_common_event_has_one_serialized_entry_per_arg() {
        let cyclic = Value::empty_object();
        cyclic.as_object().unwrap().set("self", cyclic.clone());
        let args = vec![Value::from("a"), Value::Undefined, cyclic];

        let event = build_common_event(ConsoleMethod::Info, &args, &CaptureContext::now());
        assert_eq!(event.args.len(), args.len());
        assert_eq!(event.args_serialized.len(), args.len());
        assert_eq!(event.args[2], json!({"self": "[Circular]"}));
        assert_eq!(event.envelope.level, ConsoleMethod::Info);
    }

    #[test]
    fn test_build_event_dispatches_by_method() {
        let ctx = CaptureContext::now();
        assert!(matches!(build_event(ConsoleMethod::Log, &[], &ctx), LogEvent::Common(_)));
        assert!(matches!(build_event(ConsoleMethod::Error, &[], &ctx), LogEvent::Error(_)));
        assert!(matches!(build_event(ConsoleMethod::Table, &[], &ctx), LogEvent::Table(_)));
    }

    #[test]
    fn test_envelope_carries_context() {
        let ctx = CaptureContext {
            user_agent: Some("agent/1".into()),
            page_url: Some("http://localhost/".into()),
            seq: Some(9),
            ..CaptureContext::now()
        };
        let event = build_event(ConsoleMethod::Debug, &[], &ctx);
        let envelope = event.envelope();
        assert_eq!(envelope.ua.as_deref(), Some("agent/1"));
        assert_eq!(envelope.seq, Some(9));
        assert!(envelope.ts.ends_with('Z'));
    }
}

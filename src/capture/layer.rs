//! Bridge from `tracing` events into a capture session.

use std::fmt;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use super::session::CaptureSession;
use crate::event::ConsoleMethod;
use crate::value::Value;

/// Crates whose events would feed back into the pipeline.
const IGNORED_CRATES: [&str; 7] = [
    "console_relay",
    "hyper",
    "hyper_util",
    "reqwest",
    "h2",
    "tower",
    "tower_http",
];

/// Forwards every `tracing` event to a [`CaptureSession`].
///
/// The message becomes the first argument; remaining fields, if any, are
/// passed as one object.
pub struct CaptureLayer {
    session: CaptureSession,
}

impl CaptureLayer {
    pub fn new(session: CaptureSession) -> Self {
        Self { session }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_ignored(metadata.target()) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.session
            .submit(method_for(*metadata.level()), &visitor.into_args());
    }
}

pub(crate) fn method_for(level: Level) -> ConsoleMethod {
    match level {
        Level::ERROR => ConsoleMethod::Error,
        Level::WARN => ConsoleMethod::Warn,
        Level::INFO => ConsoleMethod::Info,
        Level::DEBUG => ConsoleMethod::Debug,
        _ => ConsoleMethod::Log,
    }
}

pub(crate) fn is_ignored(target: &str) -> bool {
    let krate = target.split("::").next().unwrap_or(target);
    IGNORED_CRATES.contains(&krate)
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<(String, Value)>,
}

impl FieldVisitor {
    fn put(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            self.message = Some(match value {
                Value::String(s) => s,
                other => crate::serialize::stringify_any(&other),
            });
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }

    fn into_args(self) -> Vec<Value> {
        let mut args = Vec::with_capacity(2);
        if let Some(message) = self.message {
            args.push(Value::from(message));
        }
        if !self.fields.is_empty() {
            args.push(Value::object(self.fields));
        }
        args
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, Value::from(format!("{value:?}")));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, Value::Number(value as f64));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.put(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.put(field, Value::from_error(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_map_to_methods() {
        assert_eq!(method_for(Level::ERROR), ConsoleMethod::Error);
        assert_eq!(method_for(Level::WARN), ConsoleMethod::Warn);
        assert_eq!(method_for(Level::INFO), ConsoleMethod::Info);
        assert_eq!(method_for(Level::DEBUG), ConsoleMethod::Debug);
        assert_eq!(method_for(Level::TRACE), ConsoleMethod::Log);
    }

    #[test]
    fn test_pipeline_crates_are_ignored() {
        assert!(is_ignored("console_relay::transport"));
        assert!(is_ignored("hyper::proto::h1"));
        assert!(is_ignored("reqwest"));
        assert!(!is_ignored("my_app::handlers"));
        assert!(!is_ignored("hyperion"));
    }

    #[test]
    fn test_visitor_args_shape() {
        let visitor = FieldVisitor {
            message: Some("signed in".into()),
            fields: vec![("user".into(), Value::from(7i64))],
        };
        let args = visitor.into_args();
        assert_eq!(args.len(), 2);
        assert!(matches!(&args[0], Value::String(s) if s == "signed in"));
        assert_eq!(
            crate::serialize::to_serializable(&args[1]),
            serde_json::json!({"user": 7})
        );

        assert!(FieldVisitor::default().into_args().is_empty());
    }
}

//! Wire types for captured log events.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use thiserror::Error;
use uuid::Uuid;

/// The six logging entry points, also used as the event `type`/`level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleMethod {
    Log,
    Info,
    Warn,
    Error,
    Debug,
    Table,
}

impl ConsoleMethod {
    pub const ALL: [ConsoleMethod; 6] = [
        ConsoleMethod::Log,
        ConsoleMethod::Info,
        ConsoleMethod::Warn,
        ConsoleMethod::Error,
        ConsoleMethod::Debug,
        ConsoleMethod::Table,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsoleMethod::Log => "log",
            ConsoleMethod::Info => "info",
            ConsoleMethod::Warn => "warn",
            ConsoleMethod::Error => "error",
            ConsoleMethod::Debug => "debug",
            ConsoleMethod::Table => "table",
        }
    }

    /// Position in [`ConsoleMethod::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for ConsoleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown console method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for ConsoleMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConsoleMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

/// Fields shared by every event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: ConsoleMethod,
    /// Always equal to `kind`.
    pub level: ConsoleMethod,
    /// ISO-8601 capture time.
    pub ts: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ua: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Per-session sequence number, when sent by a capture session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Uuid>,
}

/// log / info / warn / debug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonEvent {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(default)]
    pub args: Vec<Json>,
    #[serde(rename = "argsSerialized", default)]
    pub args_serialized: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<Json>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEvent {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(default)]
    pub args: Vec<Json>,
    #[serde(rename = "argsSerialized", default)]
    pub args_serialized: Vec<String>,
    #[serde(default)]
    pub errors: Vec<ErrorRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Map<String, Json>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEvent {
    #[serde(flatten)]
    pub envelope: Envelope,
    #[serde(default)]
    pub table: TableData,
    #[serde(default)]
    pub summary: String,
}

/// One structured record describing a single logging call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LogEvent {
    Common(CommonEvent),
    Error(ErrorEvent),
    Table(TableEvent),
}

impl LogEvent {
    pub fn envelope(&self) -> &Envelope {
        match self {
            LogEvent::Common(e) => &e.envelope,
            LogEvent::Error(e) => &e.envelope,
            LogEvent::Table(e) => &e.envelope,
        }
    }

    pub fn kind(&self) -> ConsoleMethod {
        self.envelope().kind
    }
}

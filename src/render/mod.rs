//! Terminal rendering of relayed events.
//!
//! # Data Flow
//! ```text
//! validated LogEvent
//!     → dispatch on type: common | error | table
//!     → hydrate.rs (smart_parse each serialized argument)
//!     → style.rs (colored tag, dimmed timestamp)
//!     → table.rs (tabular events)
//!     → one write to the output sink
//! ```
//!
//! # Design Decisions
//! - The whole event is formatted before the output lock is taken, so
//!   lines of one event are never interleaved with another's
//! - Re-hydration is cosmetic; the serialized strings stay authoritative

pub mod hydrate;
pub mod style;
pub mod table;

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use colored::Color;
use serde_json::{Map, Value as Json};

use crate::config::RenderConfig;
use crate::event::{CommonEvent, Envelope, ErrorEvent, LogEvent, TableEvent};

pub use hydrate::{display, smart_parse};
pub use style::Style;
pub use table::render_table;

/// Shown when a common event carried no arguments.
const NO_ARGS: &str = "(no args)";

pub struct Renderer {
    style: Style,
    show_url: bool,
    out: Mutex<Box<dyn Write + Send>>,
}

impl Renderer {
    pub fn new(config: &RenderConfig, out: Box<dyn Write + Send>) -> Self {
        Self {
            style: Style::new(config.color),
            show_url: config.show_url,
            out: Mutex::new(out),
        }
    }

    pub fn stdout(config: &RenderConfig) -> Self {
        Self::new(config, Box::new(io::stdout()))
    }

    /// Format and write one event.
    pub fn render(&self, event: &LogEvent) -> io::Result<()> {
        let text = self.format(event);
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.write_all(text.as_bytes())?;
        out.flush()
    }

    pub fn format(&self, event: &LogEvent) -> String {
        match event {
            LogEvent::Common(e) => self.format_common(e),
            LogEvent::Error(e) => self.format_error(e),
            LogEvent::Table(e) => self.format_table(e),
        }
    }

    fn prefix(&self, envelope: &Envelope) -> String {
        let meta = match (&envelope.url, self.show_url) {
            (Some(url), true) => format!(" {} {} ", envelope.ts, url),
            _ => format!(" {} ", envelope.ts),
        };
        format!("{}{}", self.style.tag(envelope.kind), self.style.dim(&meta))
    }

    fn format_common(&self, event: &CommonEvent) -> String {
        let args = if event.args_serialized.is_empty() {
            NO_ARGS.to_string()
        } else {
            hydrate_all(&event.args_serialized)
        };
        format!("{}{}\n", self.prefix(&event.envelope), args)
    }

    fn format_error(&self, event: &ErrorEvent) -> String {
        let mut out = self.prefix(&event.envelope);
        out.push_str(&hydrate_all(&event.args_serialized));
        out.push('\n');

        for err in &event.errors {
            let header = format!("  {}: {}", err.name, err.message);
            out.push_str(&self.style.paint(&header, Color::Red));
            out.push('\n');
            if let Some(stack) = &err.stack {
                out.push_str(&self.style.dim(stack));
                out.push('\n');
            }
            if let Some(cause) = &err.cause {
                let cause = display(&smart_parse(&stringify_safe(cause)));
                out.push_str(&format!("{} {}\n", self.style.dim("  cause:"), cause));
            }
        }
        out
    }

    fn format_table(&self, event: &TableEvent) -> String {
        let summary = self.style.dim(&format!(" {}", event.summary));
        let columns = if event.table.columns.is_empty() {
            columns_of(&event.table.rows)
        } else {
            event.table.columns.clone()
        };
        format!(
            "{}{}\n{}",
            self.prefix(&event.envelope),
            summary,
            render_table(&columns, &event.table.rows)
        )
    }
}

fn hydrate_all(serialized: &[String]) -> String {
    serialized
        .iter()
        .map(|s| display(&smart_parse(s)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn stringify_safe(value: &Json) -> String {
    match value {
        Json::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

fn columns_of(rows: &[Map<String, Json>]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for key in rows.iter().flat_map(Map::keys) {
        if !columns.contains(key) {
            columns.push(key.clone());
        }
    }
    columns
}

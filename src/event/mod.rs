//! Log event model and payload construction.
//!
//! # Data Flow
//! ```text
//! (method, args, CaptureContext)
//!     → builder.rs (common / error / table builders)
//!     → LogEvent (wire types in types.rs)
//!     → transport (JSON body) → relay (parse + validate) → render
//! ```
//!
//! # Design Decisions
//! - Events are built fresh per call and never mutated afterwards
//! - `args` always goes through the cycle-safe walk, so encoding cannot fail
//! - `level` always mirrors `type`

pub mod builder;
pub mod types;

pub use builder::{
    build_common_event, build_error_event, build_event, build_table_event, CaptureContext,
};
pub use types::{
    CommonEvent, ConsoleMethod, Envelope, ErrorEvent, ErrorRecord, LogEvent, TableData, TableEvent,
};

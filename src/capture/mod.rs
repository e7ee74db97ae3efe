//! Capture side: intercepts logging calls and ships them to a relay.
//!
//! # Data Flow
//! ```text
//! host.log(args) / tracing event
//!     → wrapper: original entry point runs first, synchronously
//!     → CaptureSession::submit (timestamp, seq, build LogEvent)
//!     → queue.rs (bounded, drop-oldest)
//!     → one worker task per session → transport (POST)
//! ```
//!
//! # Design Decisions
//! - The original entry point always runs and its output is never delayed
//! - Submission never blocks and never fails visibly
//! - One worker per session keeps delivery in call order
//! - Wrappers hold only a weak reference to their session

pub mod console;
pub mod layer;
pub mod queue;
pub mod session;

pub use console::{ConsoleHost, LogFn};
pub use layer::CaptureLayer;
pub use queue::EventQueue;
pub use session::{CaptureError, CaptureSession};

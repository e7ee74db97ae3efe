//! Remote console capture and relay.
//!
//! A capture session wraps a host's logging entry points, serializes every
//! call into a cycle-safe, type-aware event and posts it to a relay, which
//! validates the body and renders it to the terminal.
//!
//! ```text
//!   capture side                                    relay side
//!  ┌───────────────────────────────┐              ┌───────────────────────────────┐
//!  │ ConsoleHost ─▶ CaptureSession │   HTTP POST  │ Listener ─▶ Relay ─▶ Renderer │
//!  │   (value, serialize, event)   │ ───────────▶ │  (body cap, validate)         │
//!  │        queue ─▶ transport     │   /__log     │                     ─▶ stdout │
//!  └───────────────────────────────┘              └───────────────────────────────┘
//! ```

// Data model
pub mod event;
pub mod serialize;
pub mod value;

// Capture side
pub mod capture;
pub mod transport;

// Relay side
pub mod net;
pub mod relay;
pub mod render;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use capture::{CaptureError, CaptureLayer, CaptureSession, ConsoleHost};
pub use config::RelayConfig;
pub use event::{ConsoleMethod, LogEvent};
pub use lifecycle::Shutdown;
pub use relay::{Relay, RelayServer};
pub use render::Renderer;
pub use serialize::stringify_any;
pub use value::Value;

//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Ctrl+C or explicit trigger → relay stops accepting → in-flight
//!     connections finish → process exits
//! ```
//!
//! # Design Decisions
//! - One broadcast channel; every long-running task subscribes
//! - Capture sessions tear down through their own handle, not this channel

pub mod shutdown;

pub use shutdown::{wait_for_ctrl_c, Shutdown};

//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, connection limits)
//!     → connection.rs (id + lifetime tracking)
//!     → hand off to the relay's HTTP/1.1 service
//! ```
//!
//! # Design Decisions
//! - Bounded accept prevents resource exhaustion from a flooding client
//! - Each connection tracked so shutdown can drain in-flight events

pub mod connection;
pub mod listener;

pub use connection::{ConnectionGuard, ConnectionTracker};
pub use listener::{ConnectionPermit, Listener, ListenerError};

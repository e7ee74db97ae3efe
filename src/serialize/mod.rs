//! Cycle-safe, type-aware serialization of captured values.
//!
//! # Data Flow
//! ```text
//! Value
//!     → classify (Shape)
//!     → stringify.rs: primitives and scalar shapes render as text
//!     → walk.rs: structural shapes walk into a JSON tree through one
//!       CycleDetector owned by the outermost call
//!     → pretty JSON (2-space indent), or the unserializable sentinel
//! ```
//!
//! # Design Decisions
//! - `stringify_any` never panics and always returns a string
//! - Any object reached a second time renders as `"[Circular]"`
//! - Map/Set contents are capped; typed arrays only carry a short preview
//! - Objects nested deeper than `MAX_DEPTH` render as `"[Too Deep]"`, so
//!   stack use stays bounded for any argument graph

pub mod stringify;
pub mod walk;

pub use stringify::stringify_any;
pub use walk::{to_serializable, CycleDetector};

/// Marker substituted at the point an object is reached again.
pub const CIRCULAR: &str = "[Circular]";

/// Sentinel returned when a tree cannot be encoded.
pub const UNSERIALIZABLE: &str = "[Unserializable]";

/// Marker substituted for an object nested deeper than [`MAX_DEPTH`].
pub const TOO_DEEP: &str = "[Too Deep]";

/// Deepest object nesting a walk descends into. The wire envelope adds two
/// levels, which stays under serde_json's parse recursion limit of 128.
pub const MAX_DEPTH: usize = 100;

/// Maximum entries rendered for Map- and Set-like containers.
pub const MAX_COLLECTION_ENTRIES: usize = 100;

/// Maximum elements in a typed array preview.
pub const TYPED_ARRAY_PREVIEW: usize = 32;

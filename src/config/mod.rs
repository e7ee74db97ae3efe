//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → sections handed to relay, renderer and capture session
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    CaptureConfig, IngestConfig, ListenerConfig, ObservabilityConfig, RelayConfig, RenderConfig,
    DEFAULT_ENDPOINT, DEFAULT_MAX_BODY_BYTES,
};
pub use validation::ValidationError;

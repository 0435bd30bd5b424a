//! clipfit-core: shared types, errors, and configuration.
//!
//! This crate is the foundational dependency for the other clipfit crates,
//! providing the unified error type, the host-facing configuration structs,
//! and the media-domain enums (tool kinds, encoder presets, resolution caps).

pub mod config;
pub mod error;
pub mod types;

// Re-export the most commonly used items at the crate root.
pub use config::{CompressionConfig, Config, ToolPathsConfig};
pub use error::{Error, Result};
pub use types::*;

//! Shared configuration for the ripple grid viewer.
//!
//! # Invariants
//! - Every config field has a default; an empty document is a valid config.
//! - A config that passed `validate` never produces a degenerate projection.

pub mod config;

pub use config::{
    CameraConfig, ConfigError, GridConfig, ShaderConfig, ViewerConfig, WindowConfig,
};

pub fn crate_info() -> &'static str {
    "ripple-common v0.1.0"
}

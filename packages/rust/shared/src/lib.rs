//! Shared types, error model, and configuration for holocron.
//!
//! This crate is the foundation depended on by all other holocron crates.
//! It provides:
//! - [`HolocronError`]: the unified error type
//! - [`EntityKind`]: the six catalog entity kinds and their collection names
//! - Configuration ([`AppConfig`], [`PipelineConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, KindOverrides, PipelineConfig, StorageConfig, SwapiConfig, WikiConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, validate_config,
};
pub use error::{HolocronError, Result};
pub use types::EntityKind;

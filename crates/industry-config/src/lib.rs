// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Industry Configuration System
//!
//! Two kinds of configuration live here:
//!
//! - **Runtime settings** ([`IndustrySettings`]): where the publish/subscribe
//!   endpoint lives, how long receivers poll, where topology files are kept.
//!   Loaded from an optional `industry.toml`, then environment variables, then
//!   CLI arguments.
//! - **Topology document** ([`ConfigDocument`]): the per-instance JSON file at
//!   `<home>/.industry/config/<app>/<instance>.json` recording which topics an
//!   instance publishes and which topic each of its receivers listens to.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use industry_config::{load_settings, load_or_create_document, document_path};
//!
//! let settings = load_settings(None, None).expect("Failed to load settings");
//! let root = settings.storage.resolve_config_root().expect("No config root");
//! let path = document_path(&root, "readme", "default");
//! let document = load_or_create_document(&path).expect("Failed to load topology");
//! println!("{} senders registered", document.senders.len());
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod document;
pub mod loader;
pub mod types;
pub mod validation;

pub use document::{
    document_path, load_document, load_or_create_document, write_document, ConfigDocument,
    CREATED_KEY, RECEIVERS_KEY, SENDERS_KEY,
};
pub use loader::{apply_cli_overrides, apply_environment_overrides, find_settings_file, load_settings};
pub use types::*;
pub use validation::{validate_settings, ConfigValidationError};

use std::path::PathBuf;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Home directory not found; set INDUSTRY_CONFIG_ROOT")]
    HomeDirNotFound,
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

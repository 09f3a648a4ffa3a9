// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # industry-observability
//!
//! Logging setup shared by every Industry binary, with per-crate debug flag
//! support (`--debug-industry-io`, `--debug-all`, `INDUSTRY_DEBUG=...`).

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

// Re-export commonly used items
pub use cli::*;
pub use init::*;

/// Known Industry crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "industry",
    "industry-config",
    "industry-io",
    "industry-transports",
    "industry-observability",
    "industry-readme",
];

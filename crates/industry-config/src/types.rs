// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Settings type definitions
//!
//! These structs map to sections in `industry.toml`. Every field has a default,
//! so an absent file or a partial file is always valid input.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{ConfigError, ConfigResult};

/// Default publish/subscribe port
pub const DEFAULT_PORT: u16 = 7721;

/// Default publish/subscribe host (loopback)
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Root settings structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct IndustrySettings {
    pub transport: TransportSettings,
    pub storage: StorageSettings,
}

/// Publish/subscribe endpoint and socket tuning
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportSettings {
    pub host: String,
    pub port: u16,
    /// How long a pending receive blocks before re-checking for shutdown
    pub receive_poll_ms: u64,
    pub send_hwm: usize,
    pub recv_hwm: usize,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            receive_poll_ms: 100,
            send_hwm: 1000,
            recv_hwm: 1000,
        }
    }
}

impl TransportSettings {
    /// `tcp://host:port` endpoint shared by publishers and subscribers
    pub fn endpoint(&self) -> String {
        format!("tcp://{}:{}", self.host, self.port)
    }
}

/// Where topology documents are stored
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Overrides `<home>/.industry/config`
    pub config_root: Option<PathBuf>,
}

impl StorageSettings {
    /// Directory holding `<app>/<instance>.json` files
    pub fn resolve_config_root(&self) -> ConfigResult<PathBuf> {
        if let Some(root) = &self.config_root {
            return Ok(root.clone());
        }
        let home = home::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
        Ok(home.join(".industry").join("config"))
    }
}

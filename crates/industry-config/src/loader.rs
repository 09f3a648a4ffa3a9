// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Settings loading with override support
//!
//! This module implements the 3-tier settings loading system:
//! 1. TOML file (optional base values; built-in defaults otherwise)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{validate_settings, ConfigError, ConfigResult, IndustrySettings};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const SETTINGS_FILE_NAME: &str = "industry.toml";

/// Find the Industry settings file
///
/// Search order:
/// 1. `INDUSTRY_SETTINGS_PATH` environment variable (must exist when set)
/// 2. Current working directory: `./industry.toml`
///
/// Returns `Ok(None)` when no file is present; settings then fall back to defaults.
pub fn find_settings_file() -> ConfigResult<Option<PathBuf>> {
    if let Ok(env_path) = env::var("INDUSTRY_SETTINGS_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(Some(path));
        }
        return Err(ConfigError::Io {
            path,
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "settings file named by INDUSTRY_SETTINGS_PATH not found",
            ),
        });
    }

    if let Ok(cwd) = env::current_dir() {
        let candidate = cwd.join(SETTINGS_FILE_NAME);
        if candidate.exists() {
            return Ok(Some(candidate));
        }
    }

    Ok(None)
}

/// Load settings
///
/// # Arguments
///
/// * `settings_path` - Optional explicit TOML file. If `None`, the file is searched for.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if an explicit or discovered file cannot be read, contains
/// invalid TOML, or the final settings fail validation
pub fn load_settings(
    settings_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<IndustrySettings> {
    let settings_file = match settings_path {
        Some(path) => Some(path.to_path_buf()),
        None => find_settings_file()?,
    };

    let mut settings = match settings_file {
        Some(path) => {
            debug!("Loading settings from {}", path.display());
            let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            toml::from_str(&content)?
        }
        None => IndustrySettings::default(),
    };

    apply_environment_overrides(&mut settings);

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut settings, cli);
    }

    validate_settings(&settings)?;
    Ok(settings)
}

/// Apply environment variable overrides to settings
///
/// Supported environment variables:
/// - `INDUSTRY_ZMQ_HOST` -> `transport.host`
/// - `INDUSTRY_ZMQ_PORT` -> `transport.port`
/// - `INDUSTRY_RECEIVE_POLL_MS` -> `transport.receive_poll_ms`
/// - `INDUSTRY_CONFIG_ROOT` -> `storage.config_root`
pub fn apply_environment_overrides(settings: &mut IndustrySettings) {
    if let Ok(value) = env::var("INDUSTRY_ZMQ_HOST") {
        settings.transport.host = value;
    }
    if let Ok(value) = env::var("INDUSTRY_ZMQ_PORT") {
        if let Ok(port) = value.parse::<u16>() {
            settings.transport.port = port;
        }
    }
    if let Ok(value) = env::var("INDUSTRY_RECEIVE_POLL_MS") {
        if let Ok(ms) = value.parse::<u64>() {
            settings.transport.receive_poll_ms = ms;
        }
    }
    if let Ok(value) = env::var("INDUSTRY_CONFIG_ROOT") {
        settings.storage.config_root = Some(PathBuf::from(value));
    }
}

/// Apply CLI argument overrides to settings
///
/// # Arguments
///
/// * `settings` - Settings to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"zmq_host": "127.0.0.1", "zmq_port": "9000"}`)
pub fn apply_cli_overrides(settings: &mut IndustrySettings, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("zmq_host") {
        settings.transport.host = value.clone();
    }
    if let Some(value) = cli_args.get("zmq_port") {
        if let Ok(port) = value.parse::<u16>() {
            settings.transport.port = port;
        }
    }
    if let Some(value) = cli_args.get("receive_poll_ms") {
        if let Ok(ms) = value.parse::<u64>() {
            settings.transport.receive_poll_ms = ms;
        }
    }
    if let Some(value) = cli_args.get("config_root") {
        settings.storage.config_root = Some(PathBuf::from(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_find_settings_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let settings_path = dir.path().join("custom.toml");
        File::create(&settings_path).unwrap();

        env::set_var("INDUSTRY_SETTINGS_PATH", settings_path.to_str().unwrap());
        let result = find_settings_file();
        env::remove_var("INDUSTRY_SETTINGS_PATH");

        assert_eq!(result.unwrap(), Some(settings_path));
    }

    #[test]
    fn test_missing_env_settings_file_is_error() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        env::set_var("INDUSTRY_SETTINGS_PATH", "/nonexistent/industry.toml");
        let result = find_settings_file();
        env::remove_var("INDUSTRY_SETTINGS_PATH");

        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_minimal_settings() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let saved_port = env::var("INDUSTRY_ZMQ_PORT").ok();
        env::remove_var("INDUSTRY_ZMQ_PORT");
        let dir = tempdir().unwrap();
        let settings_path = dir.path().join("industry.toml");

        let mut file = File::create(&settings_path).unwrap();
        writeln!(file, "[transport]").unwrap();
        writeln!(file, "port = 9100").unwrap();
        writeln!(file, "[storage]").unwrap();
        writeln!(file, "config_root = \"/tmp/industry\"").unwrap();

        let settings = load_settings(Some(&settings_path), None).unwrap();

        assert_eq!(settings.transport.port, 9100);
        assert_eq!(
            settings.storage.config_root,
            Some(PathBuf::from("/tmp/industry"))
        );

        if let Some(value) = saved_port {
            env::set_var("INDUSTRY_ZMQ_PORT", value);
        }
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let dir = tempdir().unwrap();
        let settings_path = dir.path().join("industry.toml");
        fs::write(&settings_path, "[transport\nport = ").unwrap();

        let result = load_settings(Some(&settings_path), None);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut settings = IndustrySettings::default();

        env::set_var("INDUSTRY_ZMQ_HOST", "192.168.1.100");
        env::set_var("INDUSTRY_ZMQ_PORT", "9999");

        apply_environment_overrides(&mut settings);

        env::remove_var("INDUSTRY_ZMQ_HOST");
        env::remove_var("INDUSTRY_ZMQ_PORT");

        assert_eq!(settings.transport.host, "192.168.1.100");
        assert_eq!(settings.transport.port, 9999);
    }

    #[test]
    fn test_cli_overrides() {
        let mut settings = IndustrySettings::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("zmq_host".to_string(), "10.0.0.1".to_string());
        cli_args.insert("zmq_port".to_string(), "7777".to_string());
        cli_args.insert("zmq_port_typo".to_string(), "1".to_string());

        apply_cli_overrides(&mut settings, &cli_args);

        assert_eq!(settings.transport.host, "10.0.0.1");
        assert_eq!(settings.transport.port, 7777);
    }

    #[test]
    fn test_cli_override_failing_validation() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let settings_path = dir.path().join("industry.toml");
        fs::write(&settings_path, "").unwrap();

        let mut cli_args = HashMap::new();
        cli_args.insert("zmq_port".to_string(), "80".to_string());

        let result = load_settings(Some(&settings_path), Some(&cli_args));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}

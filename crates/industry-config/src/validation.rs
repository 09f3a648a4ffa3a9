//! Settings validation
//!
//! Ensures settings values are within valid ranges before any socket is
//! created from them.

use crate::{ConfigError, ConfigResult, IndustrySettings};

/// Validation errors that can occur during settings validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    InvalidPortRange { port_name: String, port: u16 },
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPortRange { port_name, port } => {
                write!(
                    f,
                    "Port {} = {} is outside valid range (1024-65535)",
                    port_name, port
                )
            }
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete settings
///
/// Checks for:
/// - Port range (1024-65535 for non-root ports)
/// - Required fields
/// - Valid value ranges
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` with details if validation fails
pub fn validate_settings(settings: &IndustrySettings) -> ConfigResult<()> {
    let mut errors = Vec::new();

    if settings.transport.port < 1024 {
        errors.push(ConfigValidationError::InvalidPortRange {
            port_name: "transport.port".to_string(),
            port: settings.transport.port,
        });
    }

    if settings.transport.host.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "transport.host".to_string(),
        });
    }

    if settings.transport.receive_poll_ms == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "transport.receive_poll_ms".to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }

    if let Some(root) = &settings.storage.config_root {
        if root.as_os_str().is_empty() {
            errors.push(ConfigValidationError::InvalidValue {
                field: "storage.config_root".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
    }

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Settings validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(validate_settings(&IndustrySettings::default()).is_ok());
    }

    #[test]
    fn test_privileged_port_rejected() {
        let mut settings = IndustrySettings::default();
        settings.transport.port = 80;
        let err = validate_settings(&settings).unwrap_err();
        assert!(err.to_string().contains("transport.port = 80"));
    }

    #[test]
    fn test_errors_are_collected() {
        let mut settings = IndustrySettings::default();
        settings.transport.host.clear();
        settings.transport.receive_poll_ms = 0;
        let message = validate_settings(&settings).unwrap_err().to_string();
        assert!(message.contains("transport.host"));
        assert!(message.contains("transport.receive_poll_ms"));
    }
}

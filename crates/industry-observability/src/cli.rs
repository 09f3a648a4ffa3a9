//! CLI argument parsing for per-crate debug flags
//!
//! Supports flags like `--debug-industry-io`, `--debug-industry-transports`, etc.
//! to raise the log level of individual crates.

use std::collections::BTreeMap;
use std::env;

use crate::KNOWN_CRATES;

/// Parse debug flags from command-line arguments
///
/// # Example
/// ```rust
/// use industry_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(vec!["--debug-industry-io".to_string()]);
/// assert!(flags.is_enabled("industry-io"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrateDebugFlags {
    pub enabled_crates: BTreeMap<String, bool>,
}

impl CrateDebugFlags {
    /// Parse debug flags from command-line arguments
    ///
    /// Looks for arguments matching `--debug-{crate-name}` pattern.
    /// Also supports `--debug-all` to enable all crates.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut enabled_crates = BTreeMap::new();
        let mut debug_all = false;

        for arg in args {
            if arg == "--debug-all" {
                debug_all = true;
                continue;
            }

            if let Some(crate_name) = arg.strip_prefix("--debug-") {
                enabled_crates.insert(crate_name.to_string(), true);
            }
        }

        if debug_all {
            for crate_name in KNOWN_CRATES {
                enabled_crates.insert(crate_name.to_string(), true);
            }
        }

        CrateDebugFlags { enabled_crates }
    }

    /// Check if debug is enabled for a specific crate
    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains_key(crate_name)
    }

    /// Check if debug is enabled for any crate
    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Create a tracing filter from debug flags
    ///
    /// Tracing targets use the Rust module path, so `industry-io` becomes
    /// `industry_io`. Format: "industry_io=debug,info" or "info" if none enabled.
    pub fn to_filter_string(&self) -> String {
        if self.enabled_crates.is_empty() {
            return "info".to_string();
        }

        let mut filters = Vec::new();
        for crate_name in self.enabled_crates.keys() {
            filters.push(format!("{}=debug", crate_name.replace('-', "_")));
        }
        // Set default level for other crates
        filters.push("info".to_string());
        filters.join(",")
    }
}

/// Parse debug flags from the process arguments and `INDUSTRY_DEBUG`
///
/// Environment variable format: comma-separated crate names, e.g.,
/// "industry-io,industry-transports", or "all".
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());
    if let Ok(env_var) = env::var("INDUSTRY_DEBUG") {
        merge_env_flags(&mut flags, &env_var);
    }
    flags
}

fn merge_env_flags(flags: &mut CrateDebugFlags, env_var: &str) {
    if env_var == "all" {
        for crate_name in KNOWN_CRATES {
            flags.enabled_crates.insert(crate_name.to_string(), true);
        }
        return;
    }

    for crate_name in env_var.split(',') {
        let crate_name = crate_name.trim();
        if !crate_name.is_empty() {
            flags.enabled_crates.insert(crate_name.to_string(), true);
        }
    }
}

/// Generate help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug-{{crate-name}}          Enable debug logging for specific crate

Available crates:
  {}

Environment Variable:
  INDUSTRY_DEBUG={{crate-name}}[,{{crate-name}}]  Enable debug for crates (comma-separated)
  INDUSTRY_DEBUG=all                               Enable debug for all crates
"#,
        KNOWN_CRATES.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_crate_flag() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-industry-io".to_string()]);
        assert!(flags.is_enabled("industry-io"));
        assert!(!flags.is_enabled("industry-transports"));
    }

    #[test]
    fn test_unrelated_args_ignored() {
        let flags = CrateDebugFlags::from_args(vec![
            "--name".to_string(),
            "default".to_string(),
        ]);
        assert!(!flags.any_enabled());
        assert_eq!(flags.to_filter_string(), "info");
    }

    #[test]
    fn test_debug_all() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-all".to_string()]);
        for crate_name in KNOWN_CRATES {
            assert!(flags.is_enabled(crate_name), "{} should be enabled", crate_name);
        }
    }

    #[test]
    fn test_filter_string_uses_module_paths() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-industry-io".to_string()]);
        assert_eq!(flags.to_filter_string(), "industry_io=debug,info");
    }

    #[test]
    fn test_env_flags_merge() {
        let mut flags = CrateDebugFlags::default();
        merge_env_flags(&mut flags, "industry-io, industry-config,");
        assert!(flags.is_enabled("industry-io"));
        assert!(flags.is_enabled("industry-config"));
        assert_eq!(flags.enabled_crates.len(), 2);
    }
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-instance topology document
//!
//! One JSON file per (application, instance) pair:
//!
//! ```json
//! {
//!   "_created": "2025-01-01T12:00:00+00:00",
//!   "_receivers": { "bool.readme/default.feed": "bool.readme/default.NASDAQ" },
//!   "_senders": [ "bool.readme/default.NASDAQ" ]
//! }
//! ```
//!
//! Entries are only ever added. Unknown top-level keys survive a rewrite.

use crate::{ConfigError, ConfigResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CREATED_KEY: &str = "_created";
pub const SENDERS_KEY: &str = "_senders";
pub const RECEIVERS_KEY: &str = "_receivers";

/// In-memory form of the topology file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    /// Creation timestamp, written once when the file is first created
    #[serde(rename = "_created", default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    /// Fully-qualified topics published by this instance, in registration order
    #[serde(rename = "_senders", default, skip_serializing_if = "Vec::is_empty")]
    pub senders: Vec<String>,

    /// Receiver address -> subscribed topic (`""` when not wired yet)
    #[serde(rename = "_receivers", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub receivers: BTreeMap<String, String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ConfigDocument {
    /// Fresh document carrying only a creation timestamp
    pub fn with_created_now() -> Self {
        Self {
            created: Some(Utc::now().to_rfc3339()),
            ..Default::default()
        }
    }

    /// Append a sender topic. Duplicates are kept.
    pub fn add_sender(&mut self, topic: impl Into<String>) {
        self.senders.push(topic.into());
    }

    /// Make sure `address` has an entry, returning its subscription if one is recorded
    pub fn register_receiver(&mut self, address: &str) -> Option<String> {
        let topic = self.receivers.entry(address.to_string()).or_default();
        if topic.is_empty() {
            None
        } else {
            Some(topic.clone())
        }
    }

    /// Record which topic `address` listens to
    pub fn set_subscription(&mut self, address: &str, topic: impl Into<String>) {
        self.receivers.insert(address.to_string(), topic.into());
    }

    /// Recorded subscription for `address`, if non-empty
    pub fn subscription(&self, address: &str) -> Option<&str> {
        self.receivers
            .get(address)
            .map(String::as_str)
            .filter(|topic| !topic.is_empty())
    }

    /// Serialize the whole document
    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
    }
}

/// `<root>/<app>/<instance>.json`
pub fn document_path(root: &Path, app_name: &str, instance_name: &str) -> PathBuf {
    root.join(app_name).join(format!("{}.json", instance_name))
}

/// Read and parse a topology file
pub fn load_document(path: &Path) -> ConfigResult<ConfigDocument> {
    let content = fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a topology file, creating it (and its parent directories) with a
/// `_created` timestamp first if it does not exist
pub fn load_or_create_document(path: &Path) -> ConfigResult<ConfigDocument> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        write_document(path, &ConfigDocument::with_created_now())?;
        info!("Created topology file {}", path.display());
    }
    load_document(path)
}

// Sibling file a rewrite goes through before replacing `path`
fn staging_path(path: &Path) -> PathBuf {
    path.with_extension("json.tmp")
}

/// Rewrite the whole topology file
///
/// The bytes land in a sibling `.json.tmp` file first and are renamed over
/// `path`, so an interrupted write never leaves a half-written document.
pub fn write_document(path: &Path, document: &ConfigDocument) -> ConfigResult<()> {
    let bytes = document.to_json_bytes().map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let staging = staging_path(path);
    fs::write(&staging, &bytes).map_err(|source| ConfigError::Io {
        path: staging.clone(),
        source,
    })?;
    if let Err(source) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        });
    }
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_document_path_layout() {
        let path = document_path(Path::new("/home/u/.industry/config"), "svc", "default");
        assert_eq!(
            path,
            PathBuf::from("/home/u/.industry/config/svc/default.json")
        );
    }

    #[test]
    fn test_create_writes_only_timestamp() {
        let dir = tempdir().unwrap();
        let path = document_path(dir.path(), "svc", "default");

        let document = load_or_create_document(&path).unwrap();
        assert!(document.created.is_some());
        assert!(document.senders.is_empty());
        assert!(document.receivers.is_empty());

        let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        let object = raw.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert!(object.contains_key(CREATED_KEY));
    }

    #[test]
    fn test_existing_file_is_not_recreated() {
        let dir = tempdir().unwrap();
        let path = document_path(dir.path(), "svc", "default");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"_created":"then","_senders":["int.svc/default.price"]}"#).unwrap();

        let document = load_or_create_document(&path).unwrap();
        assert_eq!(document.created.as_deref(), Some("then"));
        assert_eq!(document.senders, vec!["int.svc/default.price".to_string()]);
    }

    #[test]
    fn test_malformed_json_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let result = load_or_create_document(&path);
        assert!(matches!(result, Err(ConfigError::Json { .. })));
    }

    #[test]
    fn test_register_receiver_inserts_placeholder() {
        let mut document = ConfigDocument::default();
        assert_eq!(document.register_receiver("bool.svc/default.feed"), None);
        assert_eq!(
            document.receivers.get("bool.svc/default.feed").map(String::as_str),
            Some("")
        );

        document.set_subscription("bool.svc/default.feed", "int.svc/default.price");
        assert_eq!(
            document.register_receiver("bool.svc/default.feed"),
            Some("int.svc/default.price".to_string())
        );
        assert_eq!(document.receivers.len(), 1);
    }

    #[test]
    fn test_senders_keep_duplicates() {
        let mut document = ConfigDocument::default();
        document.add_sender("int.svc/default.price");
        document.add_sender("int.svc/default.price");
        assert_eq!(document.senders.len(), 2);
    }

    #[test]
    fn test_unknown_keys_survive_rewrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, r#"{"_created":"then","owner":"ops"}"#).unwrap();

        let mut document = load_document(&path).unwrap();
        document.add_sender("bool.svc/default.feed");
        write_document(&path, &document).unwrap();

        let reloaded = load_document(&path).unwrap();
        assert_eq!(reloaded.extra.get("owner"), Some(&serde_json::json!("ops")));
        assert_eq!(reloaded.senders, vec!["bool.svc/default.feed".to_string()]);
    }

    #[test]
    fn test_rewrite_is_stable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let mut document = ConfigDocument::with_created_now();
        document.add_sender("int.svc/default.price");
        document.register_receiver("bool.svc/default.feed");

        write_document(&path, &document).unwrap();
        let first = fs::read(&path).unwrap();
        write_document(&path, &document).unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_interrupted_write_keeps_previous_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let mut document = ConfigDocument::with_created_now();
        document.add_sender("int.svc/default.price");
        write_document(&path, &document).unwrap();
        assert!(!staging_path(&path).exists());

        // A write killed halfway only ever touches the staging file
        fs::write(staging_path(&path), r#"{"_senders":["int.sv"#).unwrap();
        assert_eq!(load_document(&path).unwrap(), document);

        document.add_sender("int.svc/default.volume");
        write_document(&path, &document).unwrap();
        assert_eq!(load_document(&path).unwrap().senders.len(), 2);
        assert!(!staging_path(&path).exists());
    }
}

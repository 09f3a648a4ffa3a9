// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-process application context
//!
//! Owns the identity (`app`, `instance`), the topology document loaded from
//! `<config_root>/<app>/<instance>.json`, the shared ZMQ context and the
//! single shared publisher. Senders and receivers hold an
//! `Arc<ApplicationContext>`; there is no process global.
//!
//! ## Persisting the topology
//!
//! [`ApplicationContext::update_config_file`] snapshots the document and hands
//! the write to the blocking pool. A newer request aborts an older one that has
//! not started yet; one that already started is skipped by a generation check,
//! so the newest snapshot is always the one left on disk.
//! [`ApplicationContext::flush`] waits for the latest write.

use crate::error::ContextError;
use crate::topic::Identity;
use industry_config::{document_path, load_or_create_document, write_document, ConfigDocument, ConfigResult, IndustrySettings};
use industry_transports::zmq::client::ZmqSub;
use industry_transports::zmq::server::ZmqPub;
use industry_transports::{ClientConfig, Publisher, ServerConfig, Subscriber, Transport};
use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

pub struct ApplicationContext {
    identity: Identity,
    settings: IndustrySettings,
    config_path: PathBuf,
    document: Arc<RwLock<ConfigDocument>>,
    runtime: Handle,
    zmq_context: Arc<zmq::Context>,
    publisher: Mutex<Option<Arc<dyn Publisher>>>,
    pending_write: Mutex<Option<JoinHandle<ConfigResult<()>>>>,
    write_generation: Arc<AtomicU64>,
    write_lock: Arc<Mutex<()>>,
    writes: Arc<AtomicU64>,
    running: AtomicBool,
}

impl ApplicationContext {
    /// Load (or create) the topology file and capture the current tokio runtime
    ///
    /// Must be called from within a tokio runtime.
    pub fn initialize(
        app_name: impl Into<String>,
        instance_name: impl Into<String>,
        settings: IndustrySettings,
    ) -> Result<Arc<Self>, ContextError> {
        let identity = Identity::new(app_name, instance_name)?;
        let runtime = Handle::try_current().map_err(|_| ContextError::NoRuntime)?;

        let root = settings.storage.resolve_config_root()?;
        let config_path = document_path(&root, identity.app_name(), identity.instance_name());
        let document = load_or_create_document(&config_path)?;

        info!(
            "Initialized {}/{} ({} senders, {} receivers) from {}",
            identity.app_name(),
            identity.instance_name(),
            document.senders.len(),
            document.receivers.len(),
            config_path.display()
        );

        Ok(Arc::new(Self {
            identity,
            settings,
            config_path,
            document: Arc::new(RwLock::new(document)),
            runtime,
            zmq_context: Arc::new(zmq::Context::new()),
            publisher: Mutex::new(None),
            pending_write: Mutex::new(None),
            write_generation: Arc::new(AtomicU64::new(0)),
            write_lock: Arc::new(Mutex::new(())),
            writes: Arc::new(AtomicU64::new(0)),
            running: AtomicBool::new(true),
        }))
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn app_name(&self) -> &str {
        self.identity.app_name()
    }

    pub fn instance_name(&self) -> &str {
        self.identity.instance_name()
    }

    pub fn settings(&self) -> &IndustrySettings {
        &self.settings
    }

    /// `<config_root>/<app>/<instance>.json`
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Shared, mutable topology document
    ///
    /// Changes only reach disk on the next [`Self::update_config_file`].
    pub fn config(&self) -> Arc<RwLock<ConfigDocument>> {
        Arc::clone(&self.document)
    }

    pub fn runtime(&self) -> &Handle {
        &self.runtime
    }

    /// Record a sender topic and persist. Duplicates are kept.
    pub fn register_sender(&self, topic: &str) {
        self.document.write().add_sender(topic);
        self.update_config_file();
    }

    /// Make sure a receiver entry exists and persist
    ///
    /// Returns the recorded subscription, or `None` for a new or unwired receiver.
    pub fn register_receiver(&self, address: &str) -> Option<String> {
        let recorded = self.document.write().register_receiver(address);
        self.update_config_file();
        recorded
    }

    /// Wire `address` to `topic` so future runs subscribe immediately
    pub fn assign_subscription(&self, address: &str, topic: &str) {
        self.document.write().set_subscription(address, topic);
        self.update_config_file();
    }

    /// Schedule a write of the current document
    pub fn update_config_file(&self) {
        let mut pending = self.pending_write.lock();

        if let Some(previous) = pending.take() {
            if !previous.is_finished() {
                previous.abort();
                debug!("Superseded pending write of {}", self.config_path.display());
            }
        }

        // Snapshot under the pending lock so generations follow document order
        let snapshot = self.document.read().clone();
        let generation = self.write_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let latest = Arc::clone(&self.write_generation);
        let write_lock = Arc::clone(&self.write_lock);
        let writes = Arc::clone(&self.writes);
        let path = self.config_path.clone();

        *pending = Some(self.runtime.spawn_blocking(move || {
            let _guard = write_lock.lock();
            if latest.load(Ordering::SeqCst) != generation {
                debug!("Skipped superseded write {} of {}", generation, path.display());
                return Ok(());
            }
            match write_document(&path, &snapshot) {
                Ok(()) => {
                    writes.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
                Err(e) => {
                    error!("Failed to persist topology: {}", e);
                    Err(e)
                }
            }
        }));
    }

    /// Wait for the most recent scheduled write
    pub async fn flush(&self) -> Result<(), ContextError> {
        let handle = self.pending_write.lock().take();
        match handle {
            None => Ok(()),
            Some(handle) => match handle.await {
                Ok(result) => result.map_err(ContextError::from),
                Err(e) if e.is_cancelled() => Ok(()),
                Err(e) => Err(ContextError::WriteTask(e)),
            },
        }
    }

    /// Snapshots written to disk since initialization
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// The process-wide publisher, bound on first use
    pub fn publisher(&self) -> Result<Arc<dyn Publisher>, ContextError> {
        let mut slot = self.publisher.lock();
        if let Some(publisher) = slot.as_ref() {
            return Ok(Arc::clone(publisher));
        }

        let transport = &self.settings.transport;
        let mut config = ServerConfig::new(transport.endpoint());
        config.base = config.base.with_send_hwm(transport.send_hwm);

        let mut socket = ZmqPub::new(Arc::clone(&self.zmq_context), config)?;
        socket.start()?;

        let publisher: Arc<dyn Publisher> = Arc::new(socket);
        *slot = Some(Arc::clone(&publisher));
        Ok(publisher)
    }

    /// A fresh connected subscriber with no subscriptions
    pub fn subscriber(&self) -> Result<Arc<dyn Subscriber>, ContextError> {
        let transport = &self.settings.transport;
        let mut config = ClientConfig::new(transport.endpoint());
        config.base = config.base.with_recv_hwm(transport.recv_hwm);

        let mut socket = ZmqSub::new(Arc::clone(&self.zmq_context), config)?;
        socket.start()?;
        Ok(Arc::new(socket))
    }

    /// Pending and future receives end with [`crate::IoError::Cancelled`]
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            info!("Stopping {}/{}", self.app_name(), self.instance_name());
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use industry_config::{load_document, ConfigError};
    use tempfile::TempDir;

    fn settings_in(dir: &TempDir) -> IndustrySettings {
        let mut settings = IndustrySettings::default();
        settings.storage.config_root = Some(dir.path().to_path_buf());
        settings
    }

    #[tokio::test]
    async fn test_initialize_creates_document() {
        let dir = TempDir::new().unwrap();
        let ctx = ApplicationContext::initialize("svc", "default", settings_in(&dir)).unwrap();

        let path = dir.path().join("svc").join("default.json");
        assert_eq!(ctx.config_path(), path.as_path());
        assert!(path.exists());

        let document = load_document(&path).unwrap();
        assert!(document.created.is_some());
        assert!(document.senders.is_empty());
        assert!(document.receivers.is_empty());
    }

    #[tokio::test]
    async fn test_initialize_keeps_existing_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("svc").join("default.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"_receivers":{"bool.svc/default.feed":"bool.svc/other.NASDAQ"},"custom":7}"#).unwrap();

        let ctx = ApplicationContext::initialize("svc", "default", settings_in(&dir)).unwrap();
        let config = ctx.config();
        let document = config.read();
        assert_eq!(document.subscription("bool.svc/default.feed"), Some("bool.svc/other.NASDAQ"));
        assert_eq!(document.extra.get("custom"), Some(&serde_json::json!(7)));
        assert!(document.created.is_none());
    }

    #[tokio::test]
    async fn test_malformed_document_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("svc").join("default.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        let result = ApplicationContext::initialize("svc", "default", settings_in(&dir));
        assert!(matches!(
            result,
            Err(ContextError::Config(ConfigError::Json { .. }))
        ));
    }

    #[test]
    fn test_initialize_requires_runtime() {
        let dir = TempDir::new().unwrap();
        let result = ApplicationContext::initialize("svc", "default", settings_in(&dir));
        assert!(matches!(result, Err(ContextError::NoRuntime)));
    }

    #[tokio::test]
    async fn test_register_sender_persists_duplicates() {
        let dir = TempDir::new().unwrap();
        let ctx = ApplicationContext::initialize("svc", "default", settings_in(&dir)).unwrap();

        ctx.register_sender("int.svc/default.price");
        ctx.register_sender("int.svc/default.price");
        ctx.flush().await.unwrap();

        let document = load_document(ctx.config_path()).unwrap();
        assert_eq!(
            document.senders,
            vec!["int.svc/default.price", "int.svc/default.price"]
        );
    }

    #[tokio::test]
    async fn test_register_receiver_placeholder() {
        let dir = TempDir::new().unwrap();
        let ctx = ApplicationContext::initialize("svc", "default", settings_in(&dir)).unwrap();

        assert_eq!(ctx.register_receiver("bool.svc/default.feed"), None);
        ctx.flush().await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(ctx.config_path()).unwrap()).unwrap();
        assert_eq!(raw["_receivers"]["bool.svc/default.feed"], serde_json::json!(""));

        ctx.assign_subscription("bool.svc/default.feed", "bool.svc/default.NASDAQ");
        assert_eq!(
            ctx.register_receiver("bool.svc/default.feed").as_deref(),
            Some("bool.svc/default.NASDAQ")
        );
    }

    #[tokio::test]
    async fn test_latest_update_wins() {
        let dir = TempDir::new().unwrap();
        let ctx = ApplicationContext::initialize("svc", "default", settings_in(&dir)).unwrap();

        ctx.config().write().add_sender("first");
        ctx.update_config_file();
        ctx.config().write().add_sender("second");
        ctx.update_config_file();
        ctx.flush().await.unwrap();

        let document = load_document(ctx.config_path()).unwrap();
        assert_eq!(document.senders, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_superseded_write_is_skipped() {
        let dir = TempDir::new().unwrap();
        let ctx = ApplicationContext::initialize("svc", "default", settings_in(&dir)).unwrap();

        // Hold the file so the first write is already on the blocking pool,
        // past the point where a newer request could abort it
        let held = ctx.write_lock.lock();
        ctx.config().write().add_sender("first");
        ctx.update_config_file();
        std::thread::sleep(std::time::Duration::from_millis(50));

        ctx.config().write().add_sender("second");
        ctx.update_config_file();
        drop(held);
        ctx.flush().await.unwrap();

        // Give the older task time to take the lock and see the newer generation
        std::thread::sleep(std::time::Duration::from_millis(50));
        assert_eq!(ctx.write_count(), 1);

        let document = load_document(ctx.config_path()).unwrap();
        assert_eq!(document.senders, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_many_updates_settle_on_final_state() {
        let dir = TempDir::new().unwrap();
        let ctx = ApplicationContext::initialize("svc", "default", settings_in(&dir)).unwrap();

        for i in 0..50 {
            ctx.register_sender(&format!("int.svc/default.s{}", i));
        }
        ctx.flush().await.unwrap();

        let document = load_document(ctx.config_path()).unwrap();
        assert_eq!(document.senders.len(), 50);
        assert_eq!(document.senders[49], "int.svc/default.s49");
    }

    #[tokio::test]
    async fn test_unchanged_rewrite_is_stable() {
        let dir = TempDir::new().unwrap();
        let ctx = ApplicationContext::initialize("svc", "default", settings_in(&dir)).unwrap();
        ctx.register_sender("bool.svc/default.NASDAQ");
        ctx.flush().await.unwrap();
        let before = std::fs::read(ctx.config_path()).unwrap();

        ctx.update_config_file();
        ctx.flush().await.unwrap();
        assert_eq!(std::fs::read(ctx.config_path()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_flush_without_pending_write() {
        let dir = TempDir::new().unwrap();
        let ctx = ApplicationContext::initialize("svc", "default", settings_in(&dir)).unwrap();
        ctx.flush().await.unwrap();
    }

    #[tokio::test]
    async fn test_write_failure_surfaces_on_flush() {
        let dir = TempDir::new().unwrap();
        let ctx = ApplicationContext::initialize("svc", "default", settings_in(&dir)).unwrap();

        // Replace the file with a directory so the write fails
        std::fs::remove_file(ctx.config_path()).unwrap();
        std::fs::create_dir(ctx.config_path()).unwrap();

        ctx.register_sender("int.svc/default.price");
        assert!(matches!(
            ctx.flush().await,
            Err(ContextError::Config(ConfigError::Io { .. }))
        ));
    }

    #[tokio::test]
    async fn test_stop() {
        let dir = TempDir::new().unwrap();
        let ctx = ApplicationContext::initialize("svc", "default", settings_in(&dir)).unwrap();
        assert!(ctx.is_running());
        ctx.stop();
        ctx.stop();
        assert!(!ctx.is_running());
    }
}

//! Testing utilities for the shadow migration workspace
//!
//! Shared fakes for the orchestrator's collaborators: a logger that records
//! entries, flag factories that succeed or fail on demand, and producers that
//! count their invocations.

#![allow(missing_docs)]

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use serde_json::Value;
use shadow_core::{LogLevel, Logger, RequestContext, ShadowConfig};
use shadow_flags::{FlagError, FlagEvaluator, FlagEvaluatorFactory, FlagKeys, FlagSet, InMemoryFlags};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const MIGRATION_NAME: &str = "catalog-products";

pub fn test_keys() -> FlagKeys {
    FlagKeys::new(
        "catalog-products-migration-complete",
        "catalog-products-shadow",
        "catalog-products-return-new",
    )
}

pub fn test_config() -> ShadowConfig {
    ShadowConfig::new(MIGRATION_NAME, test_keys())
}

/// In-memory flags preset to `set` under [`test_keys`]
pub fn flags_with(set: FlagSet) -> InMemoryFlags {
    let keys = test_keys();
    let flags = InMemoryFlags::new();
    flags.set(keys.migration_complete, set.migration_complete);
    flags.set(keys.shadow, set.shadow);
    flags.set(keys.return_new, set.return_new);
    flags
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub fields: Value,
}

#[derive(Debug, Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl RecordingLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Wait until at least `count` entries arrived or `timeout` elapsed
    pub async fn wait_for_entries(&self, count: usize, timeout: Duration) -> Vec<LogEntry> {
        let deadline = tokio::time::Instant::now() + timeout;
        while self.len() < count && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.entries()
    }

    /// Give detached tasks a chance to run, then return what was logged
    pub async fn settle(&self) -> Vec<LogEntry> {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.entries()
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: LogLevel, message: &str, fields: Value) {
        self.entries.lock().push(LogEntry {
            level,
            message: message.to_string(),
            fields,
        });
    }
}

pub fn context_with(logger: &Arc<RecordingLogger>) -> RequestContext {
    RequestContext::new("tenant-a", Arc::clone(logger) as Arc<dyn Logger>)
}

/// Factory whose evaluator construction always fails
#[derive(Debug, Default)]
pub struct FailingFactory;

#[async_trait]
impl FlagEvaluatorFactory for FailingFactory {
    async fn create(&self, tenant_id: &str) -> Result<Arc<dyn FlagEvaluator>, FlagError> {
        Err(FlagError::construction(tenant_id, "flag backend unreachable"))
    }
}

/// Factory whose evaluators fail every read
#[derive(Debug, Default)]
pub struct FailingReadsFactory;

#[derive(Debug)]
struct FailingReads;

#[async_trait]
impl FlagEvaluator for FailingReads {
    async fn get_boolean(&self, key: &str, _default: bool) -> Result<bool, FlagError> {
        Err(FlagError::evaluation(key, "read timed out"))
    }
}

#[async_trait]
impl FlagEvaluatorFactory for FailingReadsFactory {
    async fn create(&self, _tenant_id: &str) -> Result<Arc<dyn FlagEvaluator>, FlagError> {
        Ok(Arc::new(FailingReads))
    }
}

/// Factory recording which tenants evaluators were requested for
#[derive(Debug, Default)]
pub struct TenantRecordingFactory {
    pub flags: InMemoryFlags,
    tenants: Mutex<Vec<String>>,
}

impl TenantRecordingFactory {
    pub fn tenants(&self) -> Vec<String> {
        self.tenants.lock().clone()
    }
}

#[async_trait]
impl FlagEvaluatorFactory for TenantRecordingFactory {
    async fn create(&self, tenant_id: &str) -> Result<Arc<dyn FlagEvaluator>, FlagError> {
        self.tenants.lock().push(tenant_id.to_string());
        self.flags.create(tenant_id).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("producer failed: {0}")]
pub struct ProducerError(pub String);

pub type Producer<T> = BoxFuture<'static, Result<T, ProducerError>>;

/// Counts how often producers built from it were invoked
#[derive(Debug, Clone, Default)]
pub struct CallCounter {
    calls: Arc<AtomicUsize>,
}

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn returning<T: Send + 'static>(&self, value: T) -> impl FnOnce() -> Producer<T> {
        let calls = Arc::clone(&self.calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            futures::future::ready(Ok(value)).boxed()
        }
    }

    pub fn returning_after<T: Send + 'static>(
        &self,
        value: T,
        delay: Duration,
    ) -> impl FnOnce() -> Producer<T> {
        let calls = Arc::clone(&self.calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                tokio::time::sleep(delay).await;
                Ok(value)
            }
            .boxed()
        }
    }

    pub fn failing<T: Send + 'static>(&self, message: &str) -> impl FnOnce() -> Producer<T> {
        let calls = Arc::clone(&self.calls);
        let error = ProducerError(message.to_string());
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            futures::future::ready(Err(error)).boxed()
        }
    }
}

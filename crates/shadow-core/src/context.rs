//! Request-scoped context and the logging seam
//!
//! The orchestrator never logs through a global: every entry goes to the
//! [`Logger`] carried by the [`RequestContext`] of the call that produced it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

/// Severity of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Informational
    Info,
    /// Unexpected but handled
    Warn,
    /// Failure
    Error,
}

/// Structured, fire-and-forget log sink
///
/// `fields` is normally a JSON object of named values. Implementations must
/// not block; delivery is best-effort.
pub trait Logger: Send + Sync + Debug {
    /// Emit one entry
    fn log(&self, level: LogLevel, message: &str, fields: Value);

    /// Emit at info level
    fn info(&self, message: &str, fields: Value) {
        self.log(LogLevel::Info, message, fields);
    }

    /// Emit at warn level
    fn warn(&self, message: &str, fields: Value) {
        self.log(LogLevel::Warn, message, fields);
    }

    /// Emit at error level
    fn error(&self, message: &str, fields: Value) {
        self.log(LogLevel::Error, message, fields);
    }
}

/// Logger forwarding to `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str, fields: Value) {
        match level {
            LogLevel::Info => tracing::info!(fields = %fields, "{message}"),
            LogLevel::Warn => tracing::warn!(fields = %fields, "{message}"),
            LogLevel::Error => tracing::error!(fields = %fields, "{message}"),
        }
    }
}

/// Per-call context supplied by the surrounding service
#[derive(Debug, Clone)]
pub struct RequestContext {
    tenant_id: Option<String>,
    logger: Arc<dyn Logger>,
}

impl RequestContext {
    /// Create context for a tenant
    #[inline]
    #[must_use]
    pub fn new(tenant_id: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self {
            tenant_id: Some(tenant_id.into()),
            logger,
        }
    }

    /// Create context without tenant identity
    #[inline]
    #[must_use]
    pub fn anonymous(logger: Arc<dyn Logger>) -> Self {
        Self {
            tenant_id: None,
            logger,
        }
    }

    /// Create context for a tenant logging through `tracing`
    #[inline]
    #[must_use]
    pub fn with_tracing(tenant_id: impl Into<String>) -> Self {
        Self::new(tenant_id, Arc::new(TracingLogger))
    }

    /// Tenant identity, empty when absent
    #[inline]
    #[must_use]
    pub fn tenant_id(&self) -> &str {
        self.tenant_id.as_deref().unwrap_or_default()
    }

    /// Request logger
    #[inline]
    #[must_use]
    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }
}

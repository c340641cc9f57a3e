//! Evaluator and factory traits

use crate::error::FlagError;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

/// Boolean flag reads scoped to one tenant
///
/// Implementations may either answer `default` when their backend is
/// unreachable or return an error; both are tolerated by callers.
#[async_trait]
pub trait FlagEvaluator: Send + Sync + Debug {
    /// Read a boolean flag
    async fn get_boolean(&self, key: &str, default: bool) -> Result<bool, FlagError>;
}

/// Builds tenant-scoped evaluators
///
/// Shared across concurrent requests, so implementations must be safe for
/// concurrent use.
#[async_trait]
pub trait FlagEvaluatorFactory: Send + Sync + Debug {
    /// Build an evaluator for `tenant_id` (may be empty)
    async fn create(&self, tenant_id: &str) -> Result<Arc<dyn FlagEvaluator>, FlagError>;
}

#[async_trait]
impl<F: FlagEvaluatorFactory + ?Sized> FlagEvaluatorFactory for Arc<F> {
    async fn create(&self, tenant_id: &str) -> Result<Arc<dyn FlagEvaluator>, FlagError> {
        (**self).create(tenant_id).await
    }
}

/// Evaluator that answers every read with its default
///
/// Stands in for a backend that is unreachable or was never initialized.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultingEvaluator;

#[async_trait]
impl FlagEvaluator for DefaultingEvaluator {
    async fn get_boolean(&self, _key: &str, default: bool) -> Result<bool, FlagError> {
        Ok(default)
    }
}

//! Per-tenant evaluator cache using moka
//!
//! Evaluator construction often means a network round-trip (fetching the
//! tenant's flag payload). [`CachedFactory`] keeps built evaluators for a
//! bounded time; construction failures are not cached.

use crate::error::FlagError;
use crate::evaluator::{FlagEvaluator, FlagEvaluatorFactory};
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Default time an evaluator stays cached
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// Caching wrapper around another factory
#[derive(Debug)]
pub struct CachedFactory<F> {
    inner: F,
    evaluators: Cache<String, Arc<dyn FlagEvaluator>>,
}

impl<F: FlagEvaluatorFactory> CachedFactory<F> {
    /// Cache up to `max_tenants` evaluators for [`DEFAULT_TTL`]
    #[inline]
    #[must_use]
    pub fn new(inner: F, max_tenants: u64) -> Self {
        Self::with_ttl(inner, max_tenants, DEFAULT_TTL)
    }

    /// Cache with explicit time-to-live
    #[inline]
    #[must_use]
    pub fn with_ttl(inner: F, max_tenants: u64, ttl: Duration) -> Self {
        Self {
            inner,
            evaluators: Cache::builder()
                .max_capacity(max_tenants)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Drop the cached evaluator for one tenant
    #[inline]
    pub async fn invalidate(&self, tenant_id: &str) {
        self.evaluators.invalidate(tenant_id).await;
    }

    /// Drop every cached evaluator
    #[inline]
    pub fn invalidate_all(&self) {
        self.evaluators.invalidate_all();
    }

    /// Approximate number of cached evaluators
    #[inline]
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.evaluators.entry_count()
    }
}

#[async_trait]
impl<F: FlagEvaluatorFactory> FlagEvaluatorFactory for CachedFactory<F> {
    async fn create(&self, tenant_id: &str) -> Result<Arc<dyn FlagEvaluator>, FlagError> {
        self.evaluators
            .try_get_with(tenant_id.to_string(), self.inner.create(tenant_id))
            .await
            .map_err(|error| (*error).clone())
    }
}

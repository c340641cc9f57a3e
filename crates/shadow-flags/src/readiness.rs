//! Startup readiness gate
//!
//! Flag backends usually need one-time initialization (SDK bootstrap,
//! credential fetch). The outcome of that step is captured as a
//! [`FlagReadiness`] value and handed to [`ReadinessGatedFactory`] instead of
//! being read from global state.

use crate::error::FlagError;
use crate::evaluator::{DefaultingEvaluator, FlagEvaluator, FlagEvaluatorFactory};
use async_trait::async_trait;
use std::sync::Arc;

/// Outcome of flag backend initialization
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FlagReadiness {
    /// Backend initialized
    Ready,
    /// Initialization failed or never ran
    #[default]
    NotReady,
    /// Initialization failed with a reason
    Failed(String),
}

impl FlagReadiness {
    /// Build readiness from an initialization result
    pub fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::Ready,
            Err(error) => Self::Failed(error.to_string()),
        }
    }

    /// Check if the backend may be used
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Factory that only consults its backend once it is ready
///
/// When not ready every evaluator answers defaults, which keeps callers on
/// the legacy-only path.
#[derive(Debug)]
pub struct ReadinessGatedFactory<F> {
    inner: F,
    readiness: FlagReadiness,
}

impl<F: FlagEvaluatorFactory> ReadinessGatedFactory<F> {
    /// Wrap a backend factory
    #[inline]
    #[must_use]
    pub fn new(inner: F, readiness: FlagReadiness) -> Self {
        if let FlagReadiness::Failed(reason) = &readiness {
            tracing::warn!(reason = %reason, "flag backend not ready, serving default flags");
        }
        Self { inner, readiness }
    }

    /// Current readiness
    #[inline]
    #[must_use]
    pub fn readiness(&self) -> &FlagReadiness {
        &self.readiness
    }
}

#[async_trait]
impl<F: FlagEvaluatorFactory> FlagEvaluatorFactory for ReadinessGatedFactory<F> {
    async fn create(&self, tenant_id: &str) -> Result<Arc<dyn FlagEvaluator>, FlagError> {
        if self.readiness.is_ready() {
            self.inner.create(tenant_id).await
        } else {
            Ok(Arc::new(DefaultingEvaluator))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryFlags;

    #[tokio::test]
    async fn ready_factory_delegates() {
        let flags = InMemoryFlags::new();
        flags.set("shadow", true);

        let gated = ReadinessGatedFactory::new(flags, FlagReadiness::Ready);
        let evaluator = gated.create("t1").await.unwrap();
        assert!(evaluator.get_boolean("shadow", false).await.unwrap());
    }

    #[tokio::test]
    async fn failed_factory_serves_defaults() {
        let flags = InMemoryFlags::new();
        flags.set("shadow", true);

        let readiness = FlagReadiness::from_result(Err::<(), _>("sdk key missing"));
        assert_eq!(readiness, FlagReadiness::Failed("sdk key missing".into()));

        let gated = ReadinessGatedFactory::new(flags, readiness);
        assert!(!gated.readiness().is_ready());

        let evaluator = gated.create("t1").await.unwrap();
        assert!(!evaluator.get_boolean("shadow", false).await.unwrap());
    }

    #[test]
    fn readiness_defaults_to_not_ready() {
        assert_eq!(FlagReadiness::default(), FlagReadiness::NotReady);
        assert!(FlagReadiness::from_result(Ok::<(), String>(())).is_ready());
    }
}

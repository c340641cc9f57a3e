//! Per-call flag resolution

use crate::error::FlagError;
use crate::evaluator::FlagEvaluatorFactory;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::AssertUnwindSafe;

/// Names of the three flags driving one migration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlagKeys {
    /// Candidate is authoritative; legacy is skipped
    pub migration_complete: String,
    /// Run both implementations and compare
    pub shadow: String,
    /// While shadowing, return the candidate's result
    pub return_new: String,
}

impl FlagKeys {
    /// Create flag keys
    #[inline]
    #[must_use]
    pub fn new(
        migration_complete: impl Into<String>,
        shadow: impl Into<String>,
        return_new: impl Into<String>,
    ) -> Self {
        Self {
            migration_complete: migration_complete.into(),
            shadow: shadow.into(),
            return_new: return_new.into(),
        }
    }

    /// Iterate over the three keys
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [
            self.migration_complete.as_str(),
            self.shadow.as_str(),
            self.return_new.as_str(),
        ]
        .into_iter()
    }
}

/// Flags resolved once for a single orchestrated call
///
/// The default value (all false) is the safe fallback: legacy only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSet {
    /// Candidate is authoritative
    pub migration_complete: bool,
    /// Run both and compare
    pub shadow: bool,
    /// Return candidate result while shadowing
    pub return_new: bool,
}

impl FlagSet {
    /// Create flag set
    #[inline]
    #[must_use]
    pub fn new(migration_complete: bool, shadow: bool, return_new: bool) -> Self {
        Self {
            migration_complete,
            shadow,
            return_new,
        }
    }

    /// Resolve all three flags for a tenant, never failing
    ///
    /// Any construction error, read error, or panic inside the evaluator
    /// degrades the whole set to all-false.
    pub async fn resolve<F>(factory: &F, tenant_id: &str, keys: &FlagKeys) -> Self
    where
        F: FlagEvaluatorFactory + ?Sized,
    {
        let attempt = AssertUnwindSafe(Self::try_resolve(factory, tenant_id, keys))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(FlagError::Panicked(panic_message(payload.as_ref()))));

        match attempt {
            Ok(flags) => flags,
            Err(error) => {
                tracing::debug!(
                    tenant_id,
                    error = %error,
                    "flag resolution failed, falling back to legacy-only flags"
                );
                Self::default()
            }
        }
    }

    /// Resolve all three flags, reading them concurrently
    ///
    /// # Errors
    /// Returns the first construction or read error.
    pub async fn try_resolve<F>(
        factory: &F,
        tenant_id: &str,
        keys: &FlagKeys,
    ) -> Result<Self, FlagError>
    where
        F: FlagEvaluatorFactory + ?Sized,
    {
        let evaluator = factory.create(tenant_id).await?;

        let (migration_complete, shadow, return_new) = futures::try_join!(
            evaluator.get_boolean(&keys.migration_complete, false),
            evaluator.get_boolean(&keys.shadow, false),
            evaluator.get_boolean(&keys.return_new, false),
        )?;

        Ok(Self::new(migration_complete, shadow, return_new))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{DefaultingEvaluator, FlagEvaluator};
    use crate::memory::InMemoryFlags;
    use async_trait::async_trait;
    use std::sync::Arc;

    fn keys() -> FlagKeys {
        FlagKeys::new("done", "shadow", "return-new")
    }

    #[derive(Debug)]
    struct BrokenFactory;

    #[async_trait]
    impl FlagEvaluatorFactory for BrokenFactory {
        async fn create(&self, tenant_id: &str) -> Result<Arc<dyn FlagEvaluator>, FlagError> {
            Err(FlagError::construction(tenant_id, "backend down"))
        }
    }

    #[derive(Debug)]
    struct OneBadKey;

    #[async_trait]
    impl FlagEvaluator for OneBadKey {
        async fn get_boolean(&self, key: &str, _default: bool) -> Result<bool, FlagError> {
            if key == "return-new" {
                Err(FlagError::evaluation(key, "malformed"))
            } else {
                Ok(true)
            }
        }
    }

    #[derive(Debug)]
    struct OneBadKeyFactory;

    #[async_trait]
    impl FlagEvaluatorFactory for OneBadKeyFactory {
        async fn create(&self, _tenant_id: &str) -> Result<Arc<dyn FlagEvaluator>, FlagError> {
            Ok(Arc::new(OneBadKey))
        }
    }

    #[derive(Debug)]
    struct PanickingFactory;

    #[async_trait]
    impl FlagEvaluatorFactory for PanickingFactory {
        async fn create(&self, _tenant_id: &str) -> Result<Arc<dyn FlagEvaluator>, FlagError> {
            panic!("evaluator bug")
        }
    }

    #[derive(Debug)]
    struct DefaultsFactory;

    #[async_trait]
    impl FlagEvaluatorFactory for DefaultsFactory {
        async fn create(&self, _tenant_id: &str) -> Result<Arc<dyn FlagEvaluator>, FlagError> {
            Ok(Arc::new(DefaultingEvaluator))
        }
    }

    #[tokio::test]
    async fn resolves_all_three() {
        let flags = InMemoryFlags::new();
        flags.set("shadow", true);
        flags.set("return-new", true);

        let set = FlagSet::resolve(&flags, "t1", &keys()).await;
        assert_eq!(set, FlagSet::new(false, true, true));
    }

    #[tokio::test]
    async fn construction_failure_degrades_to_all_false() {
        let set = FlagSet::resolve(&BrokenFactory, "t1", &keys()).await;
        assert_eq!(set, FlagSet::default());

        let err = FlagSet::try_resolve(&BrokenFactory, "t1", &keys()).await.unwrap_err();
        assert!(matches!(err, FlagError::Construction { .. }));
    }

    #[tokio::test]
    async fn single_read_failure_discards_other_flags() {
        let set = FlagSet::resolve(&OneBadKeyFactory, "t1", &keys()).await;
        assert_eq!(set, FlagSet::default());
    }

    #[tokio::test]
    async fn panic_degrades_to_all_false() {
        let set = FlagSet::resolve(&PanickingFactory, "t1", &keys()).await;
        assert_eq!(set, FlagSet::default());
    }

    #[tokio::test]
    async fn unreachable_backend_answering_defaults() {
        let set = FlagSet::resolve(&DefaultsFactory, "", &keys()).await;
        assert_eq!(set, FlagSet::default());
    }

    #[test]
    fn keys_iterate_in_declaration_order() {
        let names: Vec<_> = keys().iter().map(str::to_string).collect();
        assert_eq!(names, vec!["done", "shadow", "return-new"]);
    }
}

//! In-process flag table
//!
//! Values are read live on every evaluation, so flips made through
//! [`InMemoryFlags::set`] take effect on the very next call.

use crate::error::FlagError;
use crate::evaluator::{FlagEvaluator, FlagEvaluatorFactory};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct FlagTable {
    /// Values for every tenant
    global: DashMap<String, bool>,
    /// Per-tenant overrides keyed by (tenant, flag)
    tenants: DashMap<(String, String), bool>,
}

/// Mutable flag table shared by every evaluator it creates
///
/// Cloning is cheap and clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFlags {
    table: Arc<FlagTable>,
}

impl InMemoryFlags {
    /// Create empty table (every flag reads as its default)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a flag for all tenants
    pub fn set(&self, key: impl Into<String>, value: bool) {
        self.table.global.insert(key.into(), value);
    }

    /// Override a flag for one tenant
    pub fn set_for_tenant(&self, tenant_id: impl Into<String>, key: impl Into<String>, value: bool) {
        self.table
            .tenants
            .insert((tenant_id.into(), key.into()), value);
    }

    /// Remove a global value and every tenant override for `key`
    pub fn unset(&self, key: &str) {
        self.table.global.remove(key);
        self.table.tenants.retain(|(_, flag), _| flag != key);
    }

    /// Remove everything
    pub fn clear(&self) {
        self.table.global.clear();
        self.table.tenants.clear();
    }

    fn lookup(&self, tenant_id: &str, key: &str) -> Option<bool> {
        self.table
            .tenants
            .get(&(tenant_id.to_string(), key.to_string()))
            .map(|entry| *entry.value())
            .or_else(|| self.table.global.get(key).map(|entry| *entry.value()))
    }
}

#[async_trait]
impl FlagEvaluatorFactory for InMemoryFlags {
    async fn create(&self, tenant_id: &str) -> Result<Arc<dyn FlagEvaluator>, FlagError> {
        Ok(Arc::new(InMemoryEvaluator {
            flags: self.clone(),
            tenant_id: tenant_id.to_string(),
        }))
    }
}

/// Evaluator bound to one tenant of an [`InMemoryFlags`] table
#[derive(Debug)]
struct InMemoryEvaluator {
    flags: InMemoryFlags,
    tenant_id: String,
}

#[async_trait]
impl FlagEvaluator for InMemoryEvaluator {
    async fn get_boolean(&self, key: &str, default: bool) -> Result<bool, FlagError> {
        Ok(self.flags.lookup(&self.tenant_id, key).unwrap_or(default))
    }
}

//! Shadow Migration orchestrator
//!
//! Decides per call which implementation(s) run and whose result the caller
//! gets:
//!
//! | migration_complete | shadow | return_new | runs             | returns   |
//! |--------------------|--------|------------|------------------|-----------|
//! | true               | any    | any        | candidate        | candidate |
//! | false              | false  | any        | legacy           | legacy    |
//! | false              | true   | false      | both, concurrent | legacy    |
//! | false              | true   | true       | both, concurrent | candidate |
//!
//! When both run, a comparison task is spawned onto the tokio runtime and
//! never joined. It normalizes both outcomes, diffs them, and reports drift
//! to the request logger. Nothing it does can delay or fail the call, and a
//! task still pending at shutdown is simply lost.

use crate::config::ShadowConfig;
use crate::context::{Logger, RequestContext};
use crate::error::CompareError;
use crate::normalize::Normalizer;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shadow_diff::{structural_compare_with, Comparison, DiffSummary, StructuralDifference};
use shadow_flags::{FlagEvaluatorFactory, FlagSet};
use std::any::Any;
use std::fmt::{self, Display};
use std::future::Future;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Which producer's output was returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Legacy implementation
    Legacy,
    /// Candidate (new) implementation
    New,
}

impl Source {
    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::New => "new",
        }
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult<T> {
    /// Producer output
    pub result: T,
    /// Producer that supplied `result`
    pub source: Source,
}

impl<T> ExecutionResult<T> {
    /// Create execution result
    #[inline]
    #[must_use]
    pub fn new(result: T, source: Source) -> Self {
        Self { result, source }
    }

    /// Unwrap the producer output
    #[inline]
    pub fn into_inner(self) -> T {
        self.result
    }
}

/// Flag-gated orchestrator for one migrated read path
///
/// Cheap to share: hold it in an `Arc` or clone it; clones share the
/// configuration, normalizer and flag factory.
pub struct ShadowMigration<T, N> {
    config: Arc<ShadowConfig>,
    normalizer: Arc<N>,
    flags: Arc<dyn FlagEvaluatorFactory>,
    _output: PhantomData<fn(&T)>,
}

impl<T, N> Clone for ShadowMigration<T, N> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            normalizer: Arc::clone(&self.normalizer),
            flags: Arc::clone(&self.flags),
            _output: PhantomData,
        }
    }
}

impl<T, N> fmt::Debug for ShadowMigration<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShadowMigration")
            .field("config", &self.config)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

impl<T, N> ShadowMigration<T, N>
where
    T: Send + 'static,
    N: Normalizer<T>,
{
    /// Create orchestrator
    #[inline]
    #[must_use]
    pub fn new(config: ShadowConfig, normalizer: N, flags: Arc<dyn FlagEvaluatorFactory>) -> Self {
        Self {
            config: Arc::new(config),
            normalizer: Arc::new(normalizer),
            flags,
            _output: PhantomData,
        }
    }

    /// Migration name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ShadowConfig {
        &self.config
    }

    /// Run the call according to the current flags
    ///
    /// # Workflow
    /// 1. Resolve the three flags for the context's tenant (all-false on any failure)
    /// 2. `migration_complete`: candidate only
    /// 3. not `shadow`: legacy only
    /// 4. otherwise both concurrently, comparison spawned, legacy's result
    ///    returned unless `return_new`
    ///
    /// # Errors
    /// Propagates the error of whichever producer ran. When both ran, either
    /// failing fails the call; legacy's error wins if both fail. No error of
    /// this crate's own is ever returned.
    pub async fn execute<L, C, FL, FC, E>(
        &self,
        legacy: L,
        candidate: C,
        ctx: &RequestContext,
    ) -> Result<ExecutionResult<T>, E>
    where
        T: Clone,
        L: FnOnce() -> FL,
        C: FnOnce() -> FC,
        FL: Future<Output = Result<T, E>>,
        FC: Future<Output = Result<T, E>>,
    {
        let flags = self.resolve_flags(ctx).await;
        tracing::debug!(
            migration = %self.config.name,
            tenant_id = ctx.tenant_id(),
            ?flags,
            "resolved shadow migration flags"
        );

        if flags.migration_complete {
            let result = candidate().await?;
            return Ok(ExecutionResult::new(result, Source::New));
        }

        if !flags.shadow {
            let result = legacy().await?;
            return Ok(ExecutionResult::new(result, Source::Legacy));
        }

        let (legacy_outcome, candidate_outcome) = tokio::join!(legacy(), candidate());
        let legacy_result = legacy_outcome?;
        let candidate_result = candidate_outcome?;

        let returned = if flags.return_new {
            ExecutionResult::new(candidate_result.clone(), Source::New)
        } else {
            ExecutionResult::new(legacy_result.clone(), Source::Legacy)
        };

        self.spawn_comparison(legacy_result, candidate_result, ctx);
        Ok(returned)
    }

    /// One-of-two execution with fallback to legacy
    ///
    /// Runs the candidate first when it is authoritative (`migration_complete`,
    /// or `shadow` with `return_new`). If it fails, logs a warning and returns
    /// legacy's result instead. Otherwise runs legacy only. Never compares.
    ///
    /// # Errors
    /// Propagates legacy's error when legacy runs and fails.
    pub async fn execute_with_fallback<L, C, FL, FC, E>(
        &self,
        legacy: L,
        candidate: C,
        ctx: &RequestContext,
    ) -> Result<ExecutionResult<T>, E>
    where
        L: FnOnce() -> FL,
        C: FnOnce() -> FC,
        FL: Future<Output = Result<T, E>>,
        FC: Future<Output = Result<T, E>>,
        E: Display,
    {
        let flags = self.resolve_flags(ctx).await;
        let prefer_candidate = flags.migration_complete || (flags.shadow && flags.return_new);

        if prefer_candidate {
            match candidate().await {
                Ok(result) => return Ok(ExecutionResult::new(result, Source::New)),
                Err(error) => {
                    let name = &self.config.name;
                    ctx.logger().warn(
                        &format!("ShadowMigration {name} candidate failed, falling back to legacy"),
                        json!({ "name": name, "error": error.to_string() }),
                    );
                }
            }
        }

        let result = legacy().await?;
        Ok(ExecutionResult::new(result, Source::Legacy))
    }

    async fn resolve_flags(&self, ctx: &RequestContext) -> FlagSet {
        FlagSet::resolve(self.flags.as_ref(), ctx.tenant_id(), &self.config.flags).await
    }

    fn spawn_comparison(&self, legacy: T, candidate: T, ctx: &RequestContext) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(
                migration = %self.config.name,
                "no tokio runtime available, skipping shadow comparison"
            );
            return;
        };

        let task = ComparisonTask {
            config: Arc::clone(&self.config),
            normalizer: Arc::clone(&self.normalizer),
            logger: Arc::clone(ctx.logger()),
            legacy,
            candidate,
        };

        // Detached: the handle is dropped and the task is never joined.
        drop(runtime.spawn(async move { task.run() }));
    }
}

/// Everything the detached comparison needs, moved out of the call
struct ComparisonTask<T, N> {
    config: Arc<ShadowConfig>,
    normalizer: Arc<N>,
    logger: Arc<dyn Logger>,
    legacy: T,
    candidate: T,
}

impl<T, N: Normalizer<T>> ComparisonTask<T, N> {
    /// Compare and report; every failure ends as one "compare failed" entry
    fn run(self) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.compare_and_report()))
            .unwrap_or_else(|payload| Err(CompareError::Panicked(panic_message(payload.as_ref()))));

        if let Err(error) = outcome {
            let name = &self.config.name;
            self.logger.warn(
                &format!("ShadowMigration {name} compare failed"),
                json!({ "name": name, "error": error.to_string() }),
            );
        }
    }

    fn compare_and_report(&self) -> Result<(), CompareError> {
        let legacy = self.normalizer.normalize(&self.legacy)?;
        let candidate = self.normalizer.normalize(&self.candidate)?;
        let comparison = structural_compare_with(&legacy, &candidate, self.config.limits);

        if comparison.is_empty() {
            return Ok(());
        }

        let report = DriftReport::new(&self.config, &comparison);
        let fields = serde_json::to_value(&report)?;
        self.logger.warn(
            &format!("ShadowMigration {} structural differences", self.config.name),
            fields,
        );
        Ok(())
    }
}

/// Log payload for a comparison that found differences
#[derive(Debug, Serialize)]
struct DriftReport<'a> {
    name: &'a str,
    diff_count: usize,
    summary: &'a DiffSummary,
    diffs: &'a [StructuralDifference],
}

impl<'a> DriftReport<'a> {
    fn new(config: &'a ShadowConfig, comparison: &'a Comparison) -> Self {
        let logged = comparison.diffs.len().min(config.max_logged_differences);
        Self {
            name: &config.name,
            diff_count: comparison.diffs.len(),
            summary: &comparison.summary,
            diffs: &comparison.diffs[..logged],
        }
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

//! Background hook tasks and the drain that gates readiness

use super::hook::{HookError, HookFuture};
use super::readiness::Readiness;
use super::{LifecycleError, Result};
use std::time::Duration;
use strum_macros::{Display, EnumString};
use tokio::runtime::Handle;
use tokio::task::JoinSet;

/// What to do when the drain outlives its timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TimeoutPolicy {
    /// Abort the stragglers, count them as failed and become ready anyway.
    #[default]
    Warn,
    /// Fail the drain; readiness is never signalled.
    Fatal,
}

/// Tally of settled background tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub succeeded: usize,
    pub failed: usize,
}

impl DrainReport {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

struct TaskOutcome {
    label: String,
    result: std::result::Result<(), HookError>,
}

/// The in-flight asynchronous hook invocations of a bootstrap run.
///
/// Tasks start running as soon as they are spawned. Dropping the set aborts
/// whatever has not finished yet.
pub struct BackgroundTasks {
    set: JoinSet<TaskOutcome>,
    handle: Handle,
}

impl BackgroundTasks {
    /// Empty set spawning onto the current Tokio runtime.
    pub fn new() -> Result<Self> {
        let handle = Handle::try_current().map_err(|_| LifecycleError::NoRuntime)?;
        Ok(Self {
            set: JoinSet::new(),
            handle,
        })
    }

    pub fn spawn(&mut self, label: impl Into<String>, future: HookFuture) {
        let label = label.into();
        self.set.spawn_on(
            async move {
                TaskOutcome {
                    label,
                    result: future.await,
                }
            },
            &self.handle,
        );
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Wait until every task has settled, then flip `readiness`.
    ///
    /// Failures and panics are logged and counted, never propagated.
    pub async fn drain(mut self, readiness: &Readiness) -> DrainReport {
        tracing::info!("Waiting for {} background bootstrapping tasks...", self.len());
        let mut report = DrainReport::default();
        Self::settle(&mut self.set, &mut report).await;
        Self::finish(readiness, report)
    }

    /// [`drain`](Self::drain) bounded by `timeout`.
    pub async fn drain_with_timeout(
        mut self,
        readiness: &Readiness,
        timeout: Duration,
        policy: TimeoutPolicy,
    ) -> Result<DrainReport> {
        tracing::info!(
            "Waiting for {} background bootstrapping tasks (timeout {:?}, policy {})...",
            self.len(),
            timeout,
            policy
        );
        let mut report = DrainReport::default();
        let settled = tokio::time::timeout(timeout, Self::settle(&mut self.set, &mut report))
            .await
            .is_ok();
        if settled {
            return Ok(Self::finish(readiness, report));
        }

        let pending = self.set.len();
        match policy {
            TimeoutPolicy::Fatal => {
                tracing::error!(
                    "{} background bootstrapping tasks still running after {:?}",
                    pending,
                    timeout
                );
                Err(LifecycleError::timeout(
                    "background drain",
                    format!("{} tasks still running after {:?}", pending, timeout),
                ))
            }
            TimeoutPolicy::Warn => {
                tracing::warn!(
                    "Aborting {} background bootstrapping tasks still running after {:?}",
                    pending,
                    timeout
                );
                self.set.shutdown().await;
                report.failed += pending;
                Ok(Self::finish(readiness, report))
            }
        }
    }

    /// Drain using the timeout settings of `options`.
    pub async fn drain_with(
        self,
        readiness: &Readiness,
        options: &crate::config::BootstrapOptions,
    ) -> Result<DrainReport> {
        match options.drain_timeout {
            Some(timeout) => {
                self.drain_with_timeout(readiness, timeout, options.timeout_policy)
                    .await
            }
            None => Ok(self.drain(readiness).await),
        }
    }

    async fn settle(set: &mut JoinSet<TaskOutcome>, report: &mut DrainReport) {
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(TaskOutcome { label, result: Ok(()) }) => {
                    tracing::info!("Background bootstrapping task {} completed", label);
                    report.succeeded += 1;
                }
                Ok(TaskOutcome {
                    label,
                    result: Err(e),
                }) => {
                    tracing::error!("Error executing bootstrapper task {}: {:#}", label, e);
                    report.failed += 1;
                }
                Err(e) => {
                    tracing::error!("Bootstrapper task did not complete: {}", e);
                    report.failed += 1;
                }
            }
        }
    }

    fn finish(readiness: &Readiness, report: DrainReport) -> DrainReport {
        if readiness.mark_ready() {
            tracing::info!(
                "Background bootstrapping completed ({} succeeded, {} failed)",
                report.succeeded,
                report.failed
            );
        } else {
            tracing::warn!("Background bootstrapping completed but readiness was already signalled");
        }
        report
    }
}

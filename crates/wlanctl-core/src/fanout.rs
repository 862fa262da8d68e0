// ── Bounded fan-out ──
//
// Runs one async operation per target with at most `width` in flight.
// Each target is wrapped in its own timeout so a hung request turns into a
// `Timeout` failure for that target only. The join completes once, after
// every target has either finished, timed out or been skipped.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::config::DEFAULT_FANOUT_WIDTH;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy)]
pub struct FanOut {
    width: usize,
    timeout: Duration,
}

impl Default for FanOut {
    fn default() -> Self {
        Self::new(DEFAULT_FANOUT_WIDTH, Duration::from_secs(60))
    }
}

/// Per-target results of a fan-out.
#[derive(Debug)]
pub struct FanOutReport<T = ()> {
    pub succeeded: Vec<(String, T)>,
    pub failed: Vec<(String, CoreError)>,
    /// Targets never started because a terminal error was seen first.
    pub skipped: Vec<String>,
}

impl<T> Default for FanOutReport<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

enum Outcome<T> {
    Done(String, Result<T, CoreError>),
    Skipped(String),
}

impl FanOut {
    pub fn new(width: usize, timeout: Duration) -> Self {
        Self {
            width: width.max(1),
            timeout,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Run `op` for every target.
    ///
    /// Non-terminal failures are logged and counted; the remaining targets
    /// still run. After a terminal failure (rate limit, unreachable
    /// gateway) targets that have not started yet are skipped.
    pub async fn run<T, F, Fut>(&self, targets: Vec<String>, op: F) -> FanOutReport<T>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let halted = AtomicBool::new(false);
        let total = targets.len();
        debug!(total, width = self.width, "fan-out started");

        let outcomes: Vec<Outcome<T>> = stream::iter(targets)
            .map(|target| {
                let op = &op;
                let halted = &halted;
                async move {
                    if halted.load(Ordering::SeqCst) {
                        return Outcome::Skipped(target);
                    }
                    let result = match tokio::time::timeout(self.timeout, op(target.clone())).await {
                        Ok(result) => result,
                        Err(_) => Err(CoreError::Timeout {
                            timeout_secs: self.timeout.as_secs(),
                        }),
                    };
                    if let Err(ref e) = result {
                        warn!(target = %target, error = %e, "fan-out target failed");
                        if e.is_terminal() {
                            halted.store(true, Ordering::SeqCst);
                        }
                    }
                    Outcome::Done(target, result)
                }
            })
            .buffer_unordered(self.width)
            .collect()
            .await;

        let mut report = FanOutReport::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Done(target, Ok(value)) => report.succeeded.push((target, value)),
                Outcome::Done(target, Err(e)) => report.failed.push((target, e)),
                Outcome::Skipped(target) => report.skipped.push(target),
            }
        }
        debug!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            skipped = report.skipped.len(),
            "fan-out finished"
        );
        report
    }
}

impl<T> FanOutReport<T> {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len() + self.skipped.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed.len() + self.skipped.len()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }

    pub fn terminal_error(&self) -> Option<&CoreError> {
        self.failed
            .iter()
            .map(|(_, e)| e)
            .find(|e| e.is_terminal())
    }

    /// Drop the per-target values, keeping target names.
    pub fn discard_values(self) -> FanOutReport {
        FanOutReport {
            succeeded: self
                .succeeded
                .into_iter()
                .map(|(target, _)| (target, ()))
                .collect(),
            failed: self.failed,
            skipped: self.skipped,
        }
    }

    /// Collapse into one result for `action`.
    ///
    /// A terminal error is returned as-is; other failures become
    /// [`CoreError::PartialFailure`].
    pub fn into_result(mut self, action: &str) -> Result<Vec<(String, T)>, CoreError> {
        if self.is_success() {
            return Ok(self.succeeded);
        }
        let total = self.total();
        let failed = self.failure_count();
        if let Some(pos) = self.failed.iter().position(|(_, e)| e.is_terminal()) {
            return Err(self.failed.swap_remove(pos).1);
        }
        if total == 1 {
            if let Some((_, e)) = self.failed.pop() {
                return Err(e);
            }
        }
        Err(CoreError::PartialFailure {
            action: action.to_owned(),
            failed,
            total,
        })
    }
}

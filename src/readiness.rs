//! Readiness gate for services that must not touch a dependency before it is healthy.
//!
//! The model mirrors a container health check: a probe runs every `interval`,
//! each attempt is bounded by `timeout`, failures during `start_period` are not
//! counted, and `retries` consecutive counted failures mark the target unhealthy.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{error, warn};

use crate::errors::DbError;

/// Timing parameters of a readiness probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSettings {
    pub interval: Duration,
    pub timeout: Duration,
    pub retries: u32,
    pub start_period: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(5),
            retries: 5,
            start_period: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Starting,
    Healthy,
    Unhealthy,
}

/// Tracks probe outcomes and derives the health status
#[derive(Debug)]
pub struct ProbeTracker {
    settings: ProbeSettings,
    status: HealthStatus,
    consecutive_failures: u32,
}

impl ProbeTracker {
    pub fn new(settings: ProbeSettings) -> Self {
        Self {
            settings,
            status: HealthStatus::Starting,
            consecutive_failures: 0,
        }
    }

    pub fn status(&self) -> HealthStatus {
        self.status
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Attempts left before the status flips to unhealthy
    pub fn remaining_attempts(&self) -> u32 {
        self.threshold().saturating_sub(self.consecutive_failures)
    }

    /// Record one probe outcome observed `since_start` after the first probe
    pub fn record(&mut self, success: bool, since_start: Duration) -> HealthStatus {
        if success {
            self.status = HealthStatus::Healthy;
            self.consecutive_failures = 0;
        } else if since_start >= self.settings.start_period {
            self.consecutive_failures += 1;
            if self.consecutive_failures >= self.threshold() {
                self.status = HealthStatus::Unhealthy;
            }
        }
        self.status
    }

    // zero retries still needs one failure to decide
    fn threshold(&self) -> u32 {
        self.settings.retries.max(1)
    }
}

/// Poll `probe` until it succeeds or the tracker reports unhealthy.
///
/// Returns the number of attempts it took. Never returns `Ok` without a
/// successful probe.
pub async fn wait_until_ready<F, Fut, E>(
    target: &str,
    settings: &ProbeSettings,
    mut probe: F,
) -> Result<u32, DbError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let started = Instant::now();
    let mut tracker = ProbeTracker::new(*settings);
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let outcome = match time::timeout(settings.timeout, probe()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(err.to_string()),
            Err(_) => Err(format!("probe timed out after {:?}", settings.timeout)),
        };

        match outcome {
            Ok(()) => {
                tracker.record(true, started.elapsed());
                return Ok(attempts);
            }
            Err(reason) => {
                if tracker.record(false, started.elapsed()) == HealthStatus::Unhealthy {
                    error!("Failed to connect to {} after {} attempts", target, attempts);
                    return Err(DbError::NotReady { attempts });
                }
                warn!(
                    "Could not connect to {}, retrying... ({} attempts left): {}",
                    target,
                    tracker.remaining_attempts(),
                    reason
                );
                time::sleep(settings.interval).await;
            }
        }
    }
}

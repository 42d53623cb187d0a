//! Convergence of one placement group parameter toward its target.

use crate::{
    ClusterOps, HealthSnapshot, LOG_TARGET, PgParameter, RaiseConfig, RaiseError, RaiseResult,
};
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The cluster was not safe to modify; nothing was read or written.
    Unhealthy,
    /// The parameter was raised and the settle pause has elapsed.
    Raised { from: i64, to: i64 },
    /// The parameter already is at or above the target.
    Done { value: i64 },
}

/// Computes the value to write next, or `None` once `current` has reached
/// `target`. Never overshoots the target.
pub fn next_step(current: i64, target: i64, step: i64) -> Option<i64> {
    if current >= target {
        return None;
    }
    Some(current.saturating_add(step).min(target))
}

/// Drives one parameter of one pool to its target in bounded steps.
///
/// The current value is read from the cluster on every tick and never
/// cached, so the driver holds no state between ticks.
pub struct ConvergenceDriver<'a, C: ClusterOps + ?Sized> {
    cluster: &'a C,
    config: &'a RaiseConfig,
    parameter: PgParameter,
}

impl<'a, C: ClusterOps + ?Sized> ConvergenceDriver<'a, C> {
    pub fn new(cluster: &'a C, config: &'a RaiseConfig, parameter: PgParameter) -> Self {
        Self {
            cluster,
            config,
            parameter,
        }
    }

    pub fn parameter(&self) -> PgParameter {
        self.parameter
    }

    /// Performs one pass: health gate, read, and at most one write followed by
    /// the settle pause.
    ///
    /// # Errors
    ///
    /// Any failure to read health, decode it, read the current value, or write
    /// the new value is returned unchanged. None of them are retried.
    pub async fn tick(&self) -> RaiseResult<TickOutcome> {
        let raw = self.cluster.read_health().await?;
        let health = HealthSnapshot::parse(&raw)?;
        debug!(target: LOG_TARGET, "health: {:?}", health);

        if !health.is_safe_to_raise() {
            debug!(
                target: LOG_TARGET,
                blocking = ?health.blocking_checks(),
                "Cluster is not healthy. Retrying."
            );
            return Ok(TickOutcome::Unhealthy);
        }

        let pool = self.config.pool();
        let target = self.config.target().get();
        let current = self.cluster.read_value(pool, self.parameter).await?;

        let Some(next) = next_step(current, target, self.config.step().get()) else {
            return Ok(TickOutcome::Done { value: current });
        };

        self.cluster
            .write_value(pool, self.parameter, next)
            .await?;

        let settle = self.config.pacing().settle;
        info!(
            target: LOG_TARGET,
            "Raising {} of {:?} from {} to {} (target={})",
            self.parameter,
            pool.as_str(),
            current,
            next,
            target
        );
        info!(
            target: LOG_TARGET,
            "Waiting {:?} for Ceph to recognize the change before continuing.",
            settle
        );
        time::sleep(settle).await;

        Ok(TickOutcome::Raised {
            from: current,
            to: next,
        })
    }

    /// Ticks at the configured interval until the parameter reaches its target.
    ///
    /// Returns the final observed value.
    ///
    /// # Errors
    ///
    /// Returns the first fatal tick error, or `RaiseError::Interrupted` as soon
    /// as `cancel` fires, including in the middle of a tick.
    pub async fn run_phase(&self, cancel: &CancellationToken) -> RaiseResult<i64> {
        let period = self.config.pacing().tick;
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(RaiseError::Interrupted),
                _ = ticker.tick() => {}
            }

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(RaiseError::Interrupted),
                outcome = self.tick() => outcome?,
            };

            if let TickOutcome::Done { value } = outcome {
                info!(
                    target: LOG_TARGET,
                    "DONE: {} of {:?} is now {}.",
                    self.parameter,
                    self.config.pool().as_str(),
                    value
                );
                return Ok(value);
            }
        }
    }
}

/// Sleeps for `duration` unless `cancel` fires first.
pub(crate) async fn pause(duration: Duration, cancel: &CancellationToken) -> RaiseResult<()> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(RaiseError::Interrupted),
        _ = time::sleep(duration) => Ok(()),
    }
}

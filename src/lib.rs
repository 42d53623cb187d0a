mod core;
mod raise;


pub use crate::core::domain::error::{RaiseError, RaiseResult, ValidationError};
pub use crate::core::domain::model::health_snapshot::{
    HealthCheck, HealthChecks, HealthSnapshot, HealthStatus, Severity,
};
pub use crate::core::domain::model::pg_parameter::PgParameter;
pub use crate::core::domain::model::pool_reading::parse_pool_parameter;
pub use crate::core::domain::value_object::{PgTarget, PoolName, StepSize, is_power_of_two};
pub use crate::core::infrastructure::ceph_client::{CephClient, ClusterOps};
pub use crate::core::infrastructure::command_runner::{CommandRunner, ProcessRunner};
pub use crate::raise::application::service::convergence_service::{
    ConvergenceDriver, TickOutcome, next_step,
};
pub use crate::raise::application::service::raise_service::RaiseService;
pub use tokio_util::sync::CancellationToken;

use std::time::Duration;

/// Target of every log event, shown as the line prefix.
pub const LOG_TARGET: &str = "cpr";

/// Fixed pauses of the control loop.
///
/// The production values give ceph time to settle between changes; tests
/// shrink them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Interval between ticks. The first tick fires one interval after start.
    pub tick: Duration,
    /// Pause after every successful write.
    pub settle: Duration,
    /// Pause between the `pg_num` and the `pgp_num` phase.
    pub phase_gap: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(10),
            settle: Duration::from_secs(40),
            phase_gap: Duration::from_secs(30),
        }
    }
}

/// Immutable configuration of one raise run.
///
/// Built once from operator input and passed by reference to everything that
/// needs it.
///
/// # Examples
///
/// ```
/// use pg_raiser::{RaiseConfig, RaiseResult};
///
/// fn main() -> RaiseResult<()> {
///     let config = RaiseConfig::builder()
///         .pool("cephfs_data")
///         .target(1024)
///         .step(5)
///         .build()?;
///
///     assert_eq!(config.target().get(), 1024);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RaiseConfig {
    pool: PoolName,
    target: PgTarget,
    step: StepSize,
    verbose: bool,
    ceph_program: String,
    pacing: Pacing,
}

impl RaiseConfig {
    /// Creates a new builder for RaiseConfig
    pub fn builder() -> RaiseConfigBuilder {
        RaiseConfigBuilder::default()
    }

    pub fn pool(&self) -> &PoolName {
        &self.pool
    }

    pub fn target(&self) -> PgTarget {
        self.target
    }

    pub fn step(&self) -> StepSize {
        self.step
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// The `ceph` executable to invoke.
    pub fn ceph_program(&self) -> &str {
        &self.ceph_program
    }

    pub fn pacing(&self) -> &Pacing {
        &self.pacing
    }
}

/// Builder for RaiseConfig
#[derive(Debug, Default)]
pub struct RaiseConfigBuilder {
    pool: Option<String>,
    target: Option<i64>,
    step: Option<i64>,
    verbose: bool,
    ceph_program: Option<String>,
    pacing: Option<Pacing>,
}

impl RaiseConfigBuilder {
    pub fn pool(mut self, pool: impl Into<String>) -> Self {
        self.pool = Some(pool.into());
        self
    }

    pub fn target(mut self, target: i64) -> Self {
        self.target = Some(target);
        self
    }

    pub fn step(mut self, step: i64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn ceph_program(mut self, program: impl Into<String>) -> Self {
        self.ceph_program = Some(program.into());
        self
    }

    pub fn pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = Some(pacing);
        self
    }

    /// Validates the collected input and produces the configuration.
    ///
    /// # Errors
    ///
    /// Returns `RaiseError::Validation` if the pool name is missing or empty,
    /// the target is not a positive power of two, the step is not positive,
    /// or the tick interval is zero.
    pub fn build(self) -> RaiseResult<RaiseConfig> {
        let pool = PoolName::new(self.pool.unwrap_or_default())?;

        let target = PgTarget::new(self.target.unwrap_or(0))?;

        let step = match self.step {
            Some(step) => StepSize::new(step)?,
            None => StepSize::default(),
        };

        let pacing = self.pacing.unwrap_or_default();
        if pacing.tick.is_zero() {
            return Err(ValidationError::Field {
                field: "tick".to_string(),
                message: "Tick interval must be greater then 0".to_string(),
            }
            .into());
        }

        let ceph_program = self
            .ceph_program
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| CephClient::<ProcessRunner>::DEFAULT_PROGRAM.to_string());

        Ok(RaiseConfig {
            pool,
            target,
            step,
            verbose: self.verbose,
            ceph_program,
            pacing,
        })
    }
}

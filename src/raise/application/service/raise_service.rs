//! Two-phase orchestration: `pg_num` first, then `pgp_num`.

use crate::{
    ClusterOps, ConvergenceDriver, LOG_TARGET, PgParameter, RaiseConfig, RaiseResult,
    raise::application::service::convergence_service::pause,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Raises both placement group parameters of a pool to the configured target.
pub struct RaiseService<'a, C: ClusterOps + ?Sized> {
    cluster: &'a C,
    config: &'a RaiseConfig,
}

impl<'a, C: ClusterOps + ?Sized> RaiseService<'a, C> {
    pub fn new(cluster: &'a C, config: &'a RaiseConfig) -> Self {
        Self { cluster, config }
    }

    /// Runs every phase in `PgParameter::PHASES` to completion, waiting the
    /// phase gap before each phase after the first.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error of any phase, or
    /// `RaiseError::Interrupted` once `cancel` fires.
    pub async fn run(&self, cancel: &CancellationToken) -> RaiseResult<()> {
        let pool = self.config.pool().as_str();
        let target = self.config.target();
        let pacing = self.config.pacing();

        for (index, parameter) in PgParameter::PHASES.into_iter().enumerate() {
            if index == 0 {
                info!(
                    target: LOG_TARGET,
                    "Starting in {:?} to raise '{}' of {:?} to {}.",
                    pacing.tick,
                    parameter,
                    pool,
                    target
                );
            } else {
                info!(
                    target: LOG_TARGET,
                    "Waiting {:?} then continuing raising '{}' of {:?} to {}.",
                    pacing.phase_gap,
                    parameter,
                    pool,
                    target
                );
                pause(pacing.phase_gap, cancel).await?;
            }

            ConvergenceDriver::new(self.cluster, self.config, parameter)
                .run_phase(cancel)
                .await?;
        }

        Ok(())
    }
}

//! Client for the three cluster operations the control loop needs.
//!
//! `ClusterOps` is what the convergence driver depends on. `CephClient`
//! implements it by invoking the `ceph` command line through a
//! `CommandRunner`.

use crate::core::{
    domain::{
        error::{RaiseError, RaiseResult},
        model::{pg_parameter::PgParameter, pool_reading::parse_pool_parameter},
        value_object::PoolName,
    },
    infrastructure::command_runner::{CommandRunner, ProcessRunner},
};
use async_trait::async_trait;

/// Operations a cluster must provide for placement group raising.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClusterOps: Send + Sync {
    /// Returns the serialized health snapshot.
    async fn read_health(&self) -> RaiseResult<Vec<u8>>;

    /// Returns the current value of `parameter` for `pool`.
    async fn read_value(&self, pool: &PoolName, parameter: PgParameter) -> RaiseResult<i64>;

    /// Sets `parameter` of `pool` to `value`.
    async fn write_value(
        &self,
        pool: &PoolName,
        parameter: PgParameter,
        value: i64,
    ) -> RaiseResult<()>;
}

/// `ClusterOps` backed by the `ceph` command line tool.
#[derive(Debug, Clone)]
pub struct CephClient<R = ProcessRunner> {
    runner: R,
    program: String,
}

impl CephClient<ProcessRunner> {
    /// The program name used when none is configured.
    pub const DEFAULT_PROGRAM: &'static str = "ceph";

    /// Creates a client that spawns `program` as a child process.
    pub fn new(program: impl Into<String>) -> Self {
        Self::with_runner(ProcessRunner, program)
    }
}

impl Default for CephClient<ProcessRunner> {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROGRAM)
    }
}

impl<R: CommandRunner> CephClient<R> {
    /// Creates a client that executes `program` through `runner`.
    pub fn with_runner(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    /// Returns the program this client invokes.
    pub fn program(&self) -> &str {
        &self.program
    }

    async fn exec(&self, operation: &'static str, args: &[&str]) -> RaiseResult<Vec<u8>> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.runner
            .run(&self.program, &args)
            .await
            .map_err(|message| RaiseError::command(operation, message))
    }
}

#[async_trait]
impl<R: CommandRunner> ClusterOps for CephClient<R> {
    async fn read_health(&self) -> RaiseResult<Vec<u8>> {
        self.exec("health", &["health", "-f", "json"])
            .await
            .map_err(|e| match e {
                RaiseError::Command { message, .. } => RaiseError::command(
                    "health",
                    format!("Error reading health status: {message}"),
                ),
                other => other,
            })
    }

    async fn read_value(&self, pool: &PoolName, parameter: PgParameter) -> RaiseResult<i64> {
        let out = self
            .exec(
                "get",
                &[
                    "osd",
                    "pool",
                    "get",
                    pool.as_str(),
                    parameter.as_str(),
                    "-f",
                    "json",
                ],
            )
            .await?;
        parse_pool_parameter(&out, pool, parameter)
    }

    async fn write_value(
        &self,
        pool: &PoolName,
        parameter: PgParameter,
        value: i64,
    ) -> RaiseResult<()> {
        let value = value.to_string();
        self.exec(
            "set",
            &["osd", "pool", "set", pool.as_str(), parameter.as_str(), &value],
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::infrastructure::command_runner::MockCommandRunner;
    use mockall::predicate::eq;

    fn argv(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn pool() -> PoolName {
        PoolName::new_unchecked("data")
    }

    #[tokio::test]
    async fn test_read_health_invokes_ceph_health() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .with(eq("ceph"), eq(argv(&["health", "-f", "json"])))
            .times(1)
            .returning(|_, _| Ok(br#"{"status":"HEALTH_OK"}"#.to_vec()));

        let client = CephClient::with_runner(runner, "ceph");
        let out = client.read_health().await.unwrap();
        assert_eq!(out, br#"{"status":"HEALTH_OK"}"#);
    }

    #[tokio::test]
    async fn test_read_health_failure_names_operation() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .returning(|_, _| Err("ceph exit status: 1: timed out".to_string()));

        let client = CephClient::with_runner(runner, "ceph");
        let err = client.read_health().await.unwrap_err();
        assert_eq!(err.operation(), "health");
        assert!(err.to_string().contains("Error reading health status"));
    }

    #[tokio::test]
    async fn test_read_value_decodes_parameter() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .with(
                eq("/usr/bin/ceph"),
                eq(argv(&["osd", "pool", "get", "data", "pgp_num", "-f", "json"])),
            )
            .times(1)
            .returning(|_, _| Ok(br#"{"pool":"data","pool_id":3,"pgp_num":128}"#.to_vec()));

        let client = CephClient::with_runner(runner, "/usr/bin/ceph");
        let value = client.read_value(&pool(), PgParameter::PgpNum).await.unwrap();
        assert_eq!(value, 128);
    }

    #[tokio::test]
    async fn test_write_value_passes_new_count() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .with(
                eq("ceph"),
                eq(argv(&["osd", "pool", "set", "data", "pg_num", "1010"])),
            )
            .times(1)
            .returning(|_, _| Ok(b"set pool 3 pg_num to 1010".to_vec()));

        let client = CephClient::with_runner(runner, "ceph");
        client
            .write_value(&pool(), PgParameter::PgNum, 1010)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_write_failure_is_command_error() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .returning(|_, _| Err("Error EPERM".to_string()));

        let client = CephClient::with_runner(runner, "ceph");
        let err = client
            .write_value(&pool(), PgParameter::PgNum, 1010)
            .await
            .unwrap_err();
        assert!(matches!(err, RaiseError::Command { operation: "set", .. }));
    }

    #[test]
    fn test_default_program() {
        assert_eq!(CephClient::<ProcessRunner>::default().program(), "ceph");
    }
}

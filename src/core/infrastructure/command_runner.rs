//! Process plumbing for running external commands.
//!
//! `CommandRunner` is the seam the ceph client executes through.
//! `ProcessRunner` is the production implementation backed by
//! `tokio::process`.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use crate::LOG_TARGET;
use tracing::{debug, warn};

/// Trait for executing a program with arguments and capturing its output.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args`, returning its standard output.
    ///
    /// # Errors
    ///
    /// Returns a description of the failure if the program cannot be started
    /// or exits with a non-zero status.
    async fn run(&self, program: &str, args: &[String]) -> Result<Vec<u8>, String>;
}

/// Production runner that spawns the program directly, without a shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<Vec<u8>, String> {
        debug!(target: LOG_TARGET, "runCmd: {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| format!("Failed to execute {}: {}", program, e))?;

        if output.status.success() {
            return Ok(output.stdout);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!(
            target: LOG_TARGET,
            stdout = %stdout.trim_end(),
            stderr = %stderr.trim_end(),
            "runCmd: {} {}",
            program,
            output.status
        );
        Err(format!("{} {}: {}", program, output.status, stderr.trim()))
    }
}

//! cpr - ceph placement group raiser
//!
//! ```text
//! cpr --pool my_fancy_pool --target 512
//! cpr --pool my_fancy_pool --target 1024 --delta 5
//! cpr --pool my_fancy_pool --target 256 --verbose
//! ```
//!
//! Raises `pg_num` of the pool to the target step by step, waits, then does
//! the same for `pgp_num`. Every step is gated on cluster health.

use clap::{CommandFactory, Parser, error::ErrorKind};
use pg_raiser::{
    CancellationToken, CephClient, LOG_TARGET, ProcessRunner, RaiseConfig, RaiseError,
    RaiseService, StepSize,
};
use std::process::ExitCode;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Raises ceph placement groups of a pool step by step
#[derive(Parser, Debug)]
#[command(name = "cpr", version, about, long_about = None)]
struct Cli {
    /// Ceph pool name
    #[arg(long)]
    pool: String,

    /// Target PG number, greater than 0 and a power of 2
    #[arg(long, allow_negative_numbers = true)]
    target: i64,

    /// Maximum raise per step
    #[arg(long, default_value_t = StepSize::DEFAULT, allow_negative_numbers = true)]
    delta: i64,

    /// Verbose output
    #[arg(long)]
    verbose: bool,

    /// The ceph executable
    #[arg(long, env = "CPR_CEPH_BIN", default_value = CephClient::<ProcessRunner>::DEFAULT_PROGRAM)]
    ceph_bin: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match RaiseConfig::builder()
        .pool(cli.pool)
        .target(cli.target)
        .step(cli.delta)
        .verbose(cli.verbose)
        .ceph_program(cli.ceph_bin)
        .build()
    {
        Ok(config) => config,
        Err(RaiseError::Validation(e)) => Cli::command()
            .error(ErrorKind::ValueValidation, e.message())
            .exit(),
        Err(e) => Cli::command()
            .error(ErrorKind::ValueValidation, e.to_string())
            .exit(),
    };

    init_tracing(config.verbose());

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            cancel.cancel();
        }
    });

    let client = CephClient::new(config.ceph_program());
    match RaiseService::new(&client, &config).run(&cancel).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(RaiseError::Interrupted) => ExitCode::FAILURE,
        Err(err) => {
            error!(target: LOG_TARGET, "{}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{LOG_TARGET}={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time()
        .init();
}

/// Waits for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(target: LOG_TARGET, "failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                error!(target: LOG_TARGET, "failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(target: LOG_TARGET, "received SIGINT, stopping"),
        _ = terminate => info!(target: LOG_TARGET, "received SIGTERM, stopping"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["cpr", "--pool", "data", "--target", "1024"]).unwrap();
        assert_eq!(cli.pool, "data");
        assert_eq!(cli.target, 1024);
        assert_eq!(cli.delta, 10);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_requires_pool_and_target() {
        let err = Cli::try_parse_from(["cpr", "--target", "1024"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);

        let err = Cli::try_parse_from(["cpr", "--pool", "data"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_accepts_negative_target_for_validation() {
        let cli = Cli::try_parse_from(["cpr", "--pool", "data", "--target", "-32"]).unwrap();
        assert_eq!(cli.target, -32);
        assert!(
            RaiseConfig::builder()
                .pool(cli.pool)
                .target(cli.target)
                .build()
                .is_err()
        );
    }
}

//! Command implementations for the SupplySync CLI
//!
//! Each command lives in its own module:
//! - `run`: Startup reconciliation followed by live ingestion
//! - `scan`: Startup reconciliation only
//! - `init_config`: Default configuration file

pub mod init_config;
pub mod run;
pub mod scan;
pub mod shared;

use crate::cli::args::{Args, Commands};
use tokio_util::sync::CancellationToken;

/// Dispatch to the selected subcommand
///
/// `token` is cancelled on Ctrl+C; long-running commands stop accepting work
/// and finish what is in flight.
pub async fn run(args: Args, token: CancellationToken) -> anyhow::Result<()> {
    match args.command.clone() {
        Some(Commands::Run) => run::run_service(&args, token).await,
        Some(Commands::Scan) => scan::run_scan(&args).await,
        Some(Commands::InitConfig(init_args)) => init_config::run_init_config(&args, &init_args),
        None => Ok(()),
    }
}

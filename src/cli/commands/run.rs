//! Run command: reconciliation followed by live ingestion

use super::shared::{load_configuration, print_banner, print_summary, report_configuration, setup_logging};
use crate::app::adapters::directory_watch::DirectoryWatchAdapter;
use crate::app::services::ingestion::BatchIngestionPipeline;
use crate::cli::args::Args;
use anyhow::Context;
use colored::*;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Run the interface service until `token` is cancelled
///
/// The watcher starts before reconciliation so files arriving meanwhile are
/// queued rather than missed; they are handled once reconciliation is done.
pub async fn run_service(args: &Args, token: CancellationToken) -> anyhow::Result<()> {
    let loaded = load_configuration(args)?;
    let config = &loaded.config;

    let _guard = setup_logging(args.get_log_level(), Some(config.paths.log_dir.as_path()))?;
    report_configuration(&loaded);

    config
        .ensure_directories()
        .context("Failed to prepare directories")?;
    print_banner(config, &loaded.path);

    let pipeline = Arc::new(BatchIngestionPipeline::from_config(config));
    let adapter = DirectoryWatchAdapter::start(&config.paths.download_dir)
        .context("Failed to start directory watcher")?;

    let reconciled = pipeline
        .reconcile_startup()
        .await
        .context("Startup reconciliation failed")?;
    print_summary("Startup reconciliation", &reconciled);

    println!(
        "\n{} {} {}",
        "Watching".bright_yellow(),
        config.paths.download_dir.display(),
        "(Ctrl+C to stop)".dimmed()
    );
    info!("SupplySync running");

    let live = adapter.run(pipeline, token).await;
    print_summary("Live ingestion", &live);
    info!("SupplySync stopped");

    Ok(())
}

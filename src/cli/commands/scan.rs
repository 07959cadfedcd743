//! Scan command: one reconciliation pass

use super::shared::{load_configuration, print_banner, print_summary, report_configuration, setup_logging};
use crate::app::services::ingestion::BatchIngestionPipeline;
use crate::cli::args::Args;
use anyhow::Context;

/// Rebuild the transmission file from the batch files currently waiting
pub async fn run_scan(args: &Args) -> anyhow::Result<()> {
    let loaded = load_configuration(args)?;
    let config = &loaded.config;

    let _guard = setup_logging(args.get_log_level(), Some(config.paths.log_dir.as_path()))?;
    report_configuration(&loaded);

    config
        .ensure_directories()
        .context("Failed to prepare directories")?;
    print_banner(config, &loaded.path);

    let stats = BatchIngestionPipeline::from_config(config)
        .reconcile_startup()
        .await
        .context("Reconciliation failed")?;
    print_summary("Reconciliation complete", &stats);

    Ok(())
}

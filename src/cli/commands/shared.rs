//! Shared components for CLI commands
//!
//! Logging setup, configuration loading and the colored console output used
//! by the `run` and `scan` commands.

use crate::app::services::ingestion::IngestionStats;
use crate::cli::args::Args;
use crate::config::Config;
use crate::constants::LOG_FILE_NAME;
use anyhow::Context;
use colored::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;

/// Configuration together with where it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
    /// The file did not exist and was written with defaults
    pub created: bool,
}

/// Load the configuration file, creating it with defaults on first run
///
/// Runs before logging is initialized because the log directory comes from
/// the configuration; call [`report_configuration`] once logging is up.
pub fn load_configuration(args: &Args) -> anyhow::Result<LoadedConfig> {
    let path = args.config_path();
    let created = !path.exists();

    let config = Config::load_or_create(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

    Ok(LoadedConfig {
        config,
        path,
        created,
    })
}

/// Log where the configuration was read from
pub fn report_configuration(loaded: &LoadedConfig) {
    if loaded.created {
        info!(
            "Created default configuration: {}",
            loaded.path.display()
        );
    } else {
        info!("Using config file: {}", loaded.path.display());
    }
    debug!("Loaded configuration: {:?}", loaded.config);
}

/// Set up structured logging to stderr and, when `log_dir` is given, a log file
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the command.
pub fn setup_logging(level: &str, log_dir: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("supply_sync={}", level)));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    debug!("Logging initialized at level: {}", level);
    Ok(guard)
}

/// Print the startup banner with the active locations
pub fn print_banner(config: &Config, config_path: &Path) {
    println!("{}", "SupplySync".bright_green().bold());
    println!("  {} {}", "Config:".bright_cyan(), config_path.display());
    println!(
        "  {} {}",
        "Downloads:".bright_cyan(),
        config.paths.download_dir.display()
    );
    println!(
        "  {} {}",
        "Processed:".bright_cyan(),
        config.paths.processed_dir.display()
    );
    println!(
        "  {} {}",
        "Transmission:".bright_cyan(),
        config.paths.hht_file.display()
    );
    println!(
        "  {} {} / {}",
        "Interface:".bright_cyan(),
        config.interface.user_code,
        config.interface.department_code
    );
}

/// Print a colored summary of ingestion statistics
pub fn print_summary(title: &str, stats: &IngestionStats) {
    println!("\n{}", title.bright_green().bold());
    println!(
        "   • Batch files: {} discovered, {} ingested",
        stats.files_discovered.to_string().bright_white().bold(),
        stats.files_ingested.to_string().bright_white().bold()
    );
    println!(
        "   • Written: {} groups, {} stock lines",
        stats.groups_written, stats.stock_lines_written
    );
    if stats.files_skipped > 0 {
        println!("   • Already handled: {}", stats.files_skipped);
    }

    if !stats.is_clean() {
        println!(
            "{} {}",
            "⚠️  Files not ingested:".bright_yellow(),
            stats.files_failed()
        );
        for failure in &stats.failures {
            println!(
                "   • {} [{}] {}",
                failure.path.display(),
                failure.stage.to_string().bright_red(),
                failure.message
            );
        }
    }
}

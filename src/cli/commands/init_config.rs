//! Init-config command: write the default configuration file

use super::shared::setup_logging;
use crate::cli::args::{Args, InitConfigArgs};
use crate::config::Config;
use anyhow::Context;
use colored::*;

pub fn run_init_config(args: &Args, init_args: &InitConfigArgs) -> anyhow::Result<()> {
    let _guard = setup_logging(args.get_log_level(), None)?;

    let path = args.config_path();
    if path.exists() && !init_args.force {
        anyhow::bail!(
            "Configuration file {} already exists (use --force to overwrite)",
            path.display()
        );
    }

    Config::default()
        .save(&path)
        .with_context(|| format!("Failed to write configuration to {}", path.display()))?;

    println!(
        "{} {}",
        "Wrote default configuration:".bright_green(),
        path.display()
    );
    Ok(())
}

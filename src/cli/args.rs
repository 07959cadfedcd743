//! Command-line argument definitions for SupplySync
//!
//! This module defines the CLI interface using the clap derive API.

use crate::config::Config;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the SupplySync interface service
///
/// Converts ARRAY supply usage batch files into the MEDITECH Materials
/// Management HHT transmission format.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "supply-sync",
    version,
    about = "Convert ARRAY batch downloads into MEDITECH HHT transmission files",
    long_about = "Watches the ARRAY download directory for batch files, waits for each file to be \
                  completely written, archives it and writes its supply usage records into the \
                  fixed-width MEDITECH Materials Management HHT transmission file."
)]
pub struct Args {
    /// Configuration file (created with defaults if it does not exist)
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        global = true,
        help = "Configuration file path"
    )]
    pub config_file: Option<PathBuf>,

    /// Verbose output (-v debug, -vv trace)
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
    pub verbose: u8,

    /// Only log errors
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Only log errors"
    )]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Reconcile waiting batch files, then ingest new ones until Ctrl+C
    Run,
    /// Reconcile waiting batch files once and exit
    Scan,
    /// Write the default configuration file
    InitConfig(InitConfigArgs),
}

/// Arguments for the init-config command
#[derive(Debug, Clone, Parser)]
pub struct InitConfigArgs {
    /// Overwrite an existing configuration file
    #[arg(long = "force", help = "Overwrite an existing configuration file")]
    pub force: bool,
}

impl Args {
    /// Log level for the `supply_sync` target
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Configuration file to use
    pub fn config_path(&self) -> PathBuf {
        self.config_file
            .clone()
            .unwrap_or_else(Config::default_config_path)
    }
}

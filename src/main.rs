use clap::Parser;
use std::process;
use supply_sync::cli::{args::Args, commands};
use tokio_util::sync::CancellationToken;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Cancelled on Ctrl+C; commands drain in-flight work before returning
        let cancellation_token = CancellationToken::new();

        let shutdown_token = cancellation_token.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                    shutdown_token.cancel();
                }
                Err(e) => eprintln!("Failed to install CTRL+C signal handler: {}", e),
            }
        });

        commands::run(args, cancellation_token).await
    });

    match result {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("SupplySync - ARRAY to MEDITECH HHT Interface");
    println!("============================================");
    println!();
    println!("Convert ARRAY supply usage batch downloads into the fixed-width");
    println!("MEDITECH Materials Management HHT transmission format.");
    println!();
    println!("USAGE:");
    println!("    supply-sync [OPTIONS] <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("    run            Reconcile waiting batch files, then watch for new ones");
    println!("    scan           Reconcile waiting batch files once and exit");
    println!("    init-config    Write the default configuration file");
    println!("    help           Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <FILE>    Configuration file path");
    println!("    -v, --verbose          Increase logging verbosity");
    println!("    -q, --quiet            Only log errors");
    println!("    -h, --help             Show help information");
    println!("    -V, --version          Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Run the interface service with the default configuration:");
    println!("    supply-sync run");
    println!();
    println!("    # Rebuild the transmission file from waiting batches:");
    println!("    supply-sync --config /srv/supply-sync/supply-sync.toml scan");
    println!();
    println!("For detailed help on any command, use:");
    println!("    supply-sync <COMMAND> --help");
}

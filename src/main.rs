//! ZoneKeys - layout and quick-key manager for a zone-based window tiler
//!
//! # Usage
//!
//! ```bash
//! # List layouts in the default layouts file
//! zonekeys layouts list
//!
//! # Create a grid layout bound to quick key 3
//! zonekeys layouts create --name Grid --type grid --zones 4 --quick-key 3
//!
//! # Push the layouts to the running tiler
//! zonekeys sync --send
//! ```

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zonekeys::cli::{CliResult, KeysArgs, LayoutsArgs, SyncArgs};
use zonekeys::config::Config;

/// ZoneKeys - manage tiler layouts and quick keys
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage layouts
    Layouts(LayoutsArgs),
    /// Manage quick keys
    Keys(KeysArgs),
    /// Propagate layouts to the tiler
    Sync(SyncArgs),
}

impl Command {
    fn execute(&self) -> CliResult<()> {
        match self {
            Self::Layouts(args) => args.execute(),
            Self::Keys(args) => args.execute(),
            Self::Sync(args) => args.execute(),
        }
    }
}

fn init_tracing(verbose: bool) {
    // stdout carries command output, logs go to stderr
    let filter = if verbose {
        "debug".to_string()
    } else {
        Config::load().map_or_else(|_| "warn".to_string(), |c| c.logging.level.to_lowercase())
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = cli.command.execute() {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

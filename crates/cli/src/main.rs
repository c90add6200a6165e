//! drivemirror CLI - drivemirror command

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

mod cmd;
mod logging;
mod system_config;

use cmd::RootArgs;

/// drivemirror - Keep a folder mirrored into a locally mounted drive
#[derive(Parser)]
#[command(name = "drivemirror")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: <config dir>/drivemirror/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the mirror, then keep it in sync until Ctrl-C
    Run {
        #[command(flatten)]
        roots: RootArgs,

        /// Full rescan every N seconds (0 = off)
        #[arg(long)]
        rescan_interval: Option<u64>,
    },
    /// Reconcile the mirror once and exit
    Sync {
        #[command(flatten)]
        roots: RootArgs,
    },
    /// Show the effective configuration
    Config {
        #[command(flatten)]
        roots: RootArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Held until exit so buffered log lines are flushed
    let _log_guard = logging::init(cli.verbose, cli.log_file.as_deref())?;

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Run {
            roots,
            rescan_interval,
        } => cmd::run::run(config_path, &roots, rescan_interval).await,
        Commands::Sync { roots } => cmd::sync::run(config_path, &roots).await,
        Commands::Config { roots } => cmd::config::run(config_path, &roots),
    }
}

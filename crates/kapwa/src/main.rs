//! Kapwa CLI - keeps the package manifest in sync with the component tree.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "kapwa")]
#[command(about = "Generate package exports and the component index for Kapwa")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run (defaults to `generate`)
    #[command(subcommand)]
    command: Option<Commands>,

    /// Package root containing package.json
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite package.json exports and regenerate the component index
    Generate,

    /// Exit with an error if generated files are out of date
    Check,

    /// Print the library build entry points as JSON
    Entries,

    /// Regenerate whenever components are added, removed or renamed
    Watch {
        /// Debounce window in milliseconds (defaults to config)
        #[arg(short, long)]
        debounce: Option<u64>,
    },

    /// Write a default kapwa.toml
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Generate) {
        Commands::Generate => {
            commands::generate::run(&cli.root)?;
        }
        Commands::Check => {
            commands::check::run(&cli.root)?;
        }
        Commands::Entries => {
            commands::entries::run(&cli.root)?;
        }
        Commands::Watch { debounce } => {
            commands::watch::run(&cli.root, debounce).await?;
        }
        Commands::Init { yes } => {
            commands::init::run(&cli.root, yes)?;
        }
    }

    Ok(())
}

//! holosoma-plugins
//!
//! Operator CLI for the Holosoma plugin registry. Lists the bridge and
//! SDK-interface backends installed on this machine and checks whether a
//! configured name would be accepted.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use holosoma_plugin_api::{PluginHost, Symbols};
use holosoma_plugins::config::Config;
use holosoma_plugins::listing;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "holosoma-plugins", version, about)]
struct Cli {
    /// Path to config file (default: $XDG_CONFIG_HOME/holosoma/plugins.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List discovered entry points
    List {
        /// Only show entry points in this group
        #[arg(long)]
        group: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Check that a name is registered in a group, without loading it
    Check {
        /// Capability group, e.g. holosoma.sdk
        group: String,

        /// Entry point name, e.g. unitree
        name: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path),
        None => Config::load_default(),
    };

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            // Logging is not set up yet.
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.log.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &Config) -> Result<()> {
    let source = config.search_paths();
    tracing::debug!("Searching {:?}", source.dirs());

    match command {
        Command::List { group, json } => {
            let rows = listing::collect(&source, group.as_deref())?;
            if json {
                println!("{}", listing::render_json(&rows)?);
            } else {
                print!("{}", listing::render_table(&rows));
            }
        }
        Command::Check { group, name } => {
            let host = PluginHost::discover(&source, Symbols::new())?;
            host.check(&group, &name)?;
            println!("{group}: {name} is available");
        }
    }

    Ok(())
}

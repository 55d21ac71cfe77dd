//! ASK - Airport Swiss Knife
//!
//! Keeps a local replica of the OurAirports dataset and serves airport
//! search, distance and local time queries over HTTP.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod config;

use config::{Config, LoggingConfig};

/// Airport Swiss Knife - OurAirports replica and query server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "ASK_CONFIG", default_value = "ask.toml", global = true)]
    config: PathBuf,

    /// Repository directory holding the mirror and the database
    #[arg(short, long, global = true)]
    repository: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sync the upstream mirror and rebuild the database
    Init,

    /// Serve the HTTP API over an initialized database
    Serve {
        /// Bind address
        #[arg(long)]
        bind: Option<String>,

        /// Port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show the provenance of each imported table
    Status,

    /// Print the version
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    if let Command::Version = args.command {
        println!("Airport Swiss Knife v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut config = Config::load(&args.config)?;
    if let Some(repository) = args.repository {
        config.repository = repository;
    }

    init_logging(&config.logging);
    info!("Airport Swiss Knife v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Init => commands::init(&config).await,
        Command::Serve { bind, port } => {
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let metrics = if config.metrics.enabled {
                let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
                    .install_recorder()
                    .context("Failed to install metrics recorder")?;
                Some(Arc::new(handle))
            } else {
                None
            };

            commands::serve(&config, metrics).await
        }
        Command::Status => commands::status(&config).await,
        Command::Version => Ok(()),
    }
}

/// Initialize logging
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

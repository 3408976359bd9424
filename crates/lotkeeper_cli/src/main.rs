//! Lotkeeper CLI
//!
//! Runs the parking-lot occupancy server.
//!
//! # Commands
//!
//! - `serve` - Start the HTTP API server
//! - `version` - Show version information

mod commands;

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Lotkeeper parking-lot server.
#[derive(Parser)]
#[command(name = "lotkeeper")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = "127.0.0.1:5001")]
        bind: SocketAddr,

        /// Number of parking spots
        #[arg(short, long, default_value_t = lotkeeper_core::DEFAULT_CAPACITY)]
        capacity: u32,

        /// Entries returned by the history endpoint
        #[arg(long, default_value_t = 20)]
        history_limit: usize,

        /// Keep at most this many history entries (default: all)
        #[arg(long)]
        history_retention: Option<usize>,

        /// Directory of frontend files to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Do not send CORS headers
        #[arg(long)]
        no_cors: bool,

        /// Maximum concurrent connections
        #[arg(long, default_value_t = 1000)]
        max_connections: usize,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve {
            bind,
            capacity,
            history_limit,
            history_retention,
            static_dir,
            no_cors,
            max_connections,
        } => {
            let options = commands::serve::ServeOptions {
                bind,
                capacity,
                history_limit,
                history_retention,
                static_dir,
                cors: !no_cors,
                max_connections,
            };
            commands::serve::run(&options)?;
        }
        Commands::Version => {
            println!("Lotkeeper CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Lotkeeper Core v{}", lotkeeper_core::VERSION);
        }
    }

    Ok(())
}

//! HTTP server binary for the reel feed
//!
//! # Usage
//!
//! ```bash
//! reel-feed --port 5000 --host 0.0.0.0 --config ./reel-feed.toml
//! ```
//!
//! # API Endpoints
//!
//! - `GET /api/reels`: List reels with the visitor's quota
//! - `POST /api/track-view`: Count a watched reel
//! - `POST /api/auth/register`, `/api/auth/login`, `/api/auth/logout`
//! - `GET /api/auth/status`: Current session summary
//! - `GET /api/health`: Health check

use clap::Parser;
use reel_feed::cli::{ServerArgs, run_server_mode};
use std::path::PathBuf;

/// Short video reel feed server
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to listen on (overrides config and REELS_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides config and REELS_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    run_server_mode(ServerArgs {
        port: cli.port,
        host: cli.host,
        config: cli.config,
        verbose: cli.verbose,
    })
    .await
}

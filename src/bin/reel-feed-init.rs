//! Database bootstrap binary
//!
//! Creates the schema used by the reel feed and optionally seeds the legacy
//! catalog with sample reels.
//!
//! # Usage
//!
//! ```bash
//! reel-feed-init --check
//! reel-feed-init --database-url sqlite://reels.db --seed
//! ```

use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reel_feed::{
    config::ConfigLoader,
    db::{self, AccountRepository, CatalogRepository},
};

#[derive(Parser)]
#[command(author, version, about = "Initialize the reel feed database", long_about = None)]
#[command(name = "reel-feed-init")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Database URL (overrides config and DATABASE_URL)
    #[arg(long, value_name = "URL")]
    database_url: Option<String>,

    /// Insert sample reels when the catalog is empty
    #[arg(long)]
    seed: bool,

    /// Only verify that the database is reachable
    #[arg(long, conflicts_with = "seed")]
    check: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut settings = ConfigLoader::new().load_or_discover(cli.config.as_deref())?;
    if let Some(url) = cli.database_url {
        settings.database.url = url;
    }
    let url = settings.database.url;
    debug!("Using database {}", url);

    let pool = db::connect(&url).await?;

    if cli.check {
        let version = db::sqlite_version(&pool).await?;
        println!("Database connection OK (SQLite {version})");
        return Ok(());
    }

    db::init_schema(&pool).await?;
    println!("Schema ready at {url}");

    let catalog = CatalogRepository::new(pool.clone());
    if cli.seed {
        let inserted = catalog.seed_samples().await?;
        if inserted == 0 {
            println!("Catalog already has reels, skipping sample data");
        } else {
            println!("Inserted {inserted} sample reels");
        }
    }

    let users = AccountRepository::new(pool).count().await?;
    let reels = catalog.count().await?;
    info!(users, reels, "database initialized");
    println!("Users: {users}, catalog reels: {reels}");

    Ok(())
}

//! Server mode CLI logic
//!
//! Contains the core logic for running the HTTP server mode.

use crate::{
    config::{ConfigLoader, settings::LoggingSettings},
    server::app::{AppState, create_app},
    utils::version,
};
use anyhow::Result;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use tracing_subscriber::{
    EnvFilter, Registry, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

/// Arguments for server mode
///
/// Unset values keep whatever the config file and environment provide.
#[derive(Debug, Default)]
pub struct ServerArgs {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub config: Option<PathBuf>,
    pub verbose: bool,
}

/// Run server mode with the given arguments
pub async fn run_server_mode(args: ServerArgs) -> Result<()> {
    dotenvy::dotenv().ok();

    // Installed before the config load so loader messages are not dropped.
    let logging = init_logging(args.verbose)?;
    tracing::info!("Starting reel feed v{}", version::get_version());

    let mut settings = ConfigLoader::new().load_or_discover(args.config.as_deref())?;
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    settings.logging.verbose |= args.verbose;
    settings.validate()?;
    logging.apply(&settings.logging)?;

    let addr = resolve_bind_address(&settings.server.host, settings.server.port)?;
    let state = AppState::build(settings).await?;
    tracing::info!(mode = ?state.videos.mode(), "video source ready");

    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        "Reel feed v{} listening on {}",
        version::get_version(),
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Handle to the installed log filter
pub struct LogFilter {
    handle: reload::Handle<EnvFilter, Registry>,
}

impl LogFilter {
    /// Switch to the level from the loaded configuration
    pub fn apply(&self, logging: &LoggingSettings) -> Result<()> {
        let rust_log = env_value("RUST_LOG");
        let directive = filter_directive(logging.verbose, rust_log.as_deref(), &logging.level);
        self.handle.reload(EnvFilter::new(&directive))?;
        tracing::debug!(filter = %directive, "log filter applied");
        Ok(())
    }
}

/// Install the global tracing subscriber.
///
/// Only the command line and environment are known at this point; the
/// configured level is applied later through [`LogFilter::apply`].
pub fn init_logging(verbose: bool) -> Result<LogFilter> {
    let rust_log = env_value("RUST_LOG");
    let level = env_value("LOG_LEVEL").unwrap_or_else(|| "info".to_string());
    let directive = filter_directive(verbose, rust_log.as_deref(), &level);

    let (filter, handle) = reload::Layer::new(EnvFilter::new(directive));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;
    Ok(LogFilter { handle })
}

/// `--verbose` forces debug output; otherwise `RUST_LOG` takes precedence over
/// the level.
pub fn filter_directive(verbose: bool, rust_log: Option<&str>, level: &str) -> String {
    if verbose {
        return "debug".to_string();
    }
    rust_log
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(level)
        .to_string()
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Turn the configured host into a socket address.
///
/// Accepts literal IPv4/IPv6 addresses and `localhost`.
pub fn resolve_bind_address(host: &str, port: u16) -> Result<SocketAddr> {
    let host = host.trim();
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, port));
    }
    // Bracketed IPv6, as written in URLs
    if let Some(ip) = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .and_then(|h| h.parse::<IpAddr>().ok())
    {
        return Ok(SocketAddr::new(ip, port));
    }
    if host.eq_ignore_ascii_case("localhost") {
        return Ok(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port));
    }

    anyhow::bail!(
        "Invalid host address: {}. Use an IP address such as 0.0.0.0 or ::",
        host
    );
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

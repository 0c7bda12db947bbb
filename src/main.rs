//! Greeter: a key-value greeting service.
//!
//! This is the application entry point. It initializes tracing, loads
//! configuration, connects the greeting store once, sets up the Axum router
//! and starts the HTTP server.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use greeter::config::{AppConfig, LoggingConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use greeter::{create_router, http, storage, AppState};

/// Greeter: a key-value greeting service backed by DynamoDB
#[derive(Parser, Debug)]
#[command(name = "greeter", version, about)]
struct Args {
    /// Path to configuration file (defaults to config/default.toml when present)
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "greeter=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

fn init_tracing(filter: &str, logging: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(filter));
    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Logging format lives in the config file, so load it before tracing is up
    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::load_or_env(DEFAULT_CONFIG_PATH)?,
    };

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, &config.logging);

    tracing::info!(
        backend = ?config.storage.backend,
        table = %config.storage.table_name,
        "Loaded configuration"
    );

    let store = storage::connect(&config.storage).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize greeting store");
        e
    })?;

    let http_config = config.http.clone();
    let state = AppState::new(config, store);
    let app = create_router(state);

    http::start_server(app, &http_config).await?;

    Ok(())
}

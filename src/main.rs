use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use emoji_kitchen_proxy::{
    config::{CacheBackend, Config},
    web::{AppState, WebServer},
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Parser)]
#[command(name = "emoji-kitchen-proxy")]
#[command(version)]
#[command(about = "Serves Emoji Kitchen mashups from a cached combination dataset")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = if cli.log_level == "trace" {
        format!("emoji_kitchen_proxy={},tower_http=trace", cli.log_level)
    } else {
        format!("emoji_kitchen_proxy={}", cli.log_level)
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| log_filter.into());

    match cli.log_format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }

    info!(
        "Starting Emoji Kitchen proxy v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration from specified file
    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }

    match config.cache.backend {
        CacheBackend::Memory => info!(
            "Dataset cache: in-memory store, key '{}'",
            config.cache.key
        ),
        CacheBackend::File => info!(
            "Dataset cache: file store at {:?}, key '{}'",
            config.cache.path, config.cache.key
        ),
    }
    info!("Dataset source: {}", config.upstream.dataset_url);
    info!("Image source: {}", config.upstream.image_base_url);

    let state = AppState::from_config(&config)?;
    let web_server = WebServer::new(&config, state)?;

    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );

    let (server_ready_tx, server_ready_rx) = tokio::sync::oneshot::channel();

    let server_handle = tokio::spawn(async move {
        if let Err(e) = web_server.serve_with_signal(server_ready_tx).await {
            tracing::error!("Web server failed: {}", e);
        }
    });

    // Wait for the server bind result (success or failure)
    match server_ready_rx.await {
        Ok(Ok(())) => {
            info!("Web server is now listening");
        }
        Ok(Err(bind_error)) => {
            tracing::error!("Failed to bind web server: {}", bind_error);
            return Err(bind_error);
        }
        Err(_) => {
            tracing::error!("Web server task completed without signaling");
            return Err(anyhow::anyhow!("Web server failed to start"));
        }
    }

    // Wait for the server to complete (this will block until shutdown)
    server_handle.await?;

    Ok(())
}

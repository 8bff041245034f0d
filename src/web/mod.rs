//! Web layer module
//!
//! Exposes the two lookup routes plus a health check. Handlers stay thin:
//! the dataset cache supplies data, the resolver does the lookup, and the
//! handler turns the outcome into a response.

use anyhow::Result;
use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::{
    config::Config,
    emoji::CombinationResolver,
    errors::AppResult,
    services::DatasetCache,
    storage::{self, KeyValueStore},
    utils::StandardHttpClient,
};

pub mod handlers;
pub mod middleware;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub dataset_cache: Arc<DatasetCache>,
    pub resolver: CombinationResolver,
    pub http_client: StandardHttpClient,
}

impl AppState {
    /// Wire state from configuration, using the store named by `cache.backend`
    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::with_store(config, storage::build_store(&config.cache))
    }

    /// Wire state around an already constructed store
    pub fn with_store(config: &Config, store: Arc<dyn KeyValueStore>) -> AppResult<Self> {
        let http_client = StandardHttpClient::new(
            config.upstream.connect_timeout()?,
            config.web.request_timeout()?,
        )?;

        let dataset_cache = DatasetCache::new(
            store,
            http_client.clone(),
            config.upstream.dataset_url.clone(),
            config.cache.key.clone(),
        )
        .with_single_flight(config.cache.single_flight);

        Ok(Self {
            dataset_cache: Arc::new(dataset_cache),
            resolver: CombinationResolver::new(config.upstream.image_base_url.clone()),
            http_client,
        })
    }
}

/// Build the application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/{left}/{right}",
            get(handlers::combinations::combination_image),
        )
        .route("/{left}", get(handlers::combinations::combination_index))
        .fallback(handlers::not_found)
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(
            middleware::request_logging_middleware,
        ))
        .with_state(state)
}

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: &Config, state: AppState) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;
        Ok(Self {
            app: create_app(state),
            addr,
        })
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Serve with a notification when the server is actually listening or fails to bind
    pub async fn serve_with_signal(
        self,
        ready_signal: tokio::sync::oneshot::Sender<Result<()>>,
    ) -> Result<()> {
        match tokio::net::TcpListener::bind(&self.addr).await {
            Ok(listener) => {
                let _ = ready_signal.send(Ok(()));

                axum::serve(listener, self.app)
                    .with_graceful_shutdown(shutdown_signal())
                    .await?;
                Ok(())
            }
            Err(bind_error) => {
                let bind_err_msg = format!("Failed to bind to {}: {}", self.addr, bind_error);
                let _ = ready_signal.send(Err(anyhow::anyhow!("{}", bind_err_msg)));
                Err(anyhow::anyhow!("{}", bind_err_msg))
            }
        }
    }
}

/// Resolves on SIGINT or SIGTERM (Ctrl+C elsewhere)
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {
                        tracing::info!("Received SIGTERM, shutting down gracefully");
                    }
                    _ = sigint.recv() => {
                        tracing::info!("Received SIGINT (Ctrl+C), shutting down gracefully");
                    }
                }
                return;
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("Failed to install signal handlers ({}), using Ctrl+C only", e);
            }
        }
    }

    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C, shutting down gracefully"),
        Err(e) => {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

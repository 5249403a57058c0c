//! HTTP server: configuration, shared state, routes and the serve loop.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use stockline_core::{MarketDataSource, DEFAULT_TIMEOUT_MS};

use crate::error::ServerError;
use crate::handlers;

const DEFAULT_PORT: u16 = 5000;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: SocketAddr,
    /// Enable permissive CORS.
    pub cors: bool,
    /// Timeout for each upstream provider call.
    pub upstream_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            cors: false,
            upstream_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    addr: Option<SocketAddr>,
    cors: Option<bool>,
    upstream_timeout_ms: Option<u64>,
}

impl ServerConfigBuilder {
    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    pub fn cors(mut self, enabled: bool) -> Self {
        self.cors = Some(enabled);
        self
    }

    pub fn upstream_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.upstream_timeout_ms = Some(timeout_ms);
        self
    }

    pub fn build(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            addr: self.addr.unwrap_or(defaults.addr),
            cors: self.cors.unwrap_or(defaults.cors),
            upstream_timeout_ms: self
                .upstream_timeout_ms
                .unwrap_or(defaults.upstream_timeout_ms),
        }
    }
}

/// State shared by every handler. Read-only after startup.
pub struct AppState {
    pub source: Arc<dyn MarketDataSource>,
}

/// The HTTP server.
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    pub fn new(config: ServerConfig, source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            config,
            state: Arc::new(AppState { source }),
        }
    }

    /// Route table.
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .route("/health", get(handlers::health))
            .route("/api/stock/:ticker", get(handlers::stock_history))
            .route("/api/search/:query", get(handlers::search_symbol))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if self.config.cors {
            router = router.layer(CorsLayer::permissive());
        }

        router
    }

    /// Bind and serve until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the address is unavailable and
    /// [`ServerError::Serve`] if the accept loop fails.
    pub async fn run(self) -> Result<(), ServerError> {
        let router = self.router();
        let addr = self.config.addr;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        tracing::info!(
            addr = %addr,
            cors = self.config.cors,
            upstream_timeout_ms = self.config.upstream_timeout_ms,
            "stockline listening"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(ServerError::Serve)?;

        tracing::info!("server shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}

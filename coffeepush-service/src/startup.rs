//! Application startup and lifecycle management.
//!
//! Builds the HTTP router (relay, root page, health and metrics) and owns the
//! listener until shutdown.

use crate::config::CoffeepushConfig;
use crate::handlers;
use crate::services::{PushProvider, PushoverProvider};
use axum::middleware::from_fn;
use axum::{
    routing::{any, get},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub push_provider: Arc<dyn PushProvider>,
}

impl AppState {
    pub fn new(push_provider: Arc<dyn PushProvider>) -> Self {
        Self { push_provider }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/push/", any(handlers::relay_purchase_without_recipient))
        .route("/push/*recipient", any(handlers::relay_purchase))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .fallback(handlers::not_found)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(make_request_span::<axum::body::Body>)
                // Handlers log their own failures
                .on_failure(()),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the Pushover provider from `config`.
    pub async fn build(config: CoffeepushConfig) -> Result<Self, AppError> {
        let provider = PushoverProvider::new(config.pushover.clone());

        if let Err(e) = provider.health_check().await {
            tracing::warn!(error = %e, "Pushover configuration looks wrong; deliveries will fail");
        }

        Self::build_with_provider(config, Arc::new(provider)).await
    }

    /// Build the application around an explicit provider.
    pub async fn build_with_provider(
        config: CoffeepushConfig,
        push_provider: Arc<dyn PushProvider>,
    ) -> Result<Self, AppError> {
        let router = build_router(AppState::new(push_provider));

        // Port 0 binds a random port, used by tests
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}

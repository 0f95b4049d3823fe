//! Application startup and lifecycle management.

use crate::config::DermagenConfig;
use crate::handlers::{
    app::{health_check, metrics, not_found},
    generate::generate_images,
    images::list_images,
};
use crate::services::{ImageGenerator, ImageStore, ImageSynthesizer, InferenceClient};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{request_id_middleware, request_id_of},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: DermagenConfig,
    pub store: ImageStore,
    pub generator: ImageGenerator,
}

impl AppState {
    /// Wire a fresh, empty store and a generator around `synthesizer`.
    pub fn new(config: DermagenConfig, synthesizer: Arc<dyn ImageSynthesizer>) -> Self {
        let store = ImageStore::new();
        let generator = ImageGenerator::new(
            synthesizer,
            store.clone(),
            config.class_index_map.clone(),
            config.limits.max_generate_count,
        );

        Self {
            config,
            store,
            generator,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/api/generate", post(generate_images))
        .route("/api/images", get(list_images))
        .fallback(not_found)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    request_id = %request_id_of(request),
                    method = %request.method(),
                    uri = %request.uri().path(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: DermagenConfig) -> Result<Self, AppError> {
        let inference_client =
            InferenceClient::new(&config.ai_service.url, config.ai_service.timeout())?;

        tracing::info!(
            ai_service_url = %inference_client.base_url(),
            timeout_secs = config.ai_service.timeout_seconds,
            "Initialized inference client"
        );

        let address = format!("{}:{}", config.common.host, config.common.port);
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let state = AppState::new(config, Arc::new(inference_client));

        tracing::info!("DermaGen service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Port the server is listening on (useful with port 0).
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn store(&self) -> &ImageStore {
        &self.state.store
    }

    /// Serve requests until Ctrl+C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
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

//! Application startup and lifecycle management.

use crate::config::InvoiceConfig;
use crate::models::{RenderedInvoice, Surface};
use crate::services::{get_metrics, init_metrics, Database, InvoiceEngine, InvoiceRenderer, RecordSource};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use service_core::error::AppError;
use service_core::middleware::request_id_middleware;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use uuid::Uuid;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: InvoiceConfig,
    /// `None` when no record source is configured.
    pub renderer: Option<Arc<InvoiceRenderer>>,
}

impl AppState {
    pub fn new(config: InvoiceConfig, source: Option<Arc<dyn RecordSource>>) -> Self {
        let renderer = source.map(|source| {
            let engine = InvoiceEngine::new(config.tax.clone(), config.presentation.clone());
            Arc::new(InvoiceRenderer::new(source, engine))
        });
        Self { config, renderer }
    }

    fn renderer(&self) -> Result<&InvoiceRenderer, AppError> {
        self.renderer.as_deref().ok_or(AppError::ServiceUnavailable)
    }
}

/// Health check endpoint for Docker/K8s liveness probes.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    tracing::debug!("Health check passed");
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": state.config.service_name,
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Readiness check endpoint for K8s readiness probes.
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let Some(renderer) = state.renderer.as_ref() else {
        tracing::warn!("Readiness check failed - no record source configured");
        return StatusCode::SERVICE_UNAVAILABLE;
    };
    match renderer.source().health_check().await {
        Ok(_) => {
            tracing::debug!("Readiness check passed");
            StatusCode::OK
        }
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Metrics endpoint for Prometheus scraping.
async fn metrics_handler() -> impl IntoResponse {
    let metrics = get_metrics();
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        metrics,
    )
}

/// On-screen preview of an invoice.
async fn preview_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<RenderedInvoice>, AppError> {
    let rendered = state.renderer()?.render(invoice_id, Surface::Preview).await?;
    Ok(Json(rendered))
}

/// Printable rendering of an invoice: same document, plus page rules.
async fn print_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<RenderedInvoice>, AppError> {
    let rendered = state.renderer()?.render(invoice_id, Surface::Print).await?;
    Ok(Json(rendered))
}

/// HTTP routes with request-id and trace layers applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
        .route("/invoices/:invoice_id/preview", get(preview_invoice))
        .route("/invoices/:invoice_id/print", get(print_invoice))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application, connecting to the database when one is configured.
    pub async fn build(config: InvoiceConfig) -> Result<Self, AppError> {
        let source: Option<Arc<dyn RecordSource>> = match &config.database {
            Some(db) => {
                let database =
                    Database::new(&db.url, db.max_connections, db.min_connections).await?;
                Some(Arc::new(database))
            }
            None => {
                tracing::warn!("DATABASE_URL not set; invoice rendering is unavailable");
                None
            }
        };
        Self::build_with_source(config, source).await
    }

    /// Build the application around an existing record source.
    pub async fn build_with_source(
        config: InvoiceConfig,
        source: Option<Arc<dyn RecordSource>>,
    ) -> Result<Self, AppError> {
        init_metrics();

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, "HTTP listener bound");

        Ok(Self {
            port,
            listener,
            state: AppState::new(config, source),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until the listener fails.
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        tracing::info!(port = self.port, "Starting HTTP server");
        axum::serve(self.listener, router(self.state)).await
    }
}

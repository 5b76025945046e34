//! HTTP JSON API
//!
//! - `GET /api/health`: liveness and readiness check
//! - `GET /api/v1/releases`: lists deployed releases, computes drift and
//!   returns the `ComparisonResult` array; a listing failure is a 500 with
//!   `{"error": ...}`

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, Method, Request, StatusCode};
use axum::middleware::{Next, from_fn};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use kubescout_engine::{DriftOrchestrator, UpstreamTransport};
use kubescout_kube::ReleaseSource;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::Instrument;

/// State shared by all handlers
pub struct AppState<S, T> {
    pub source: S,
    pub orchestrator: DriftOrchestrator<T>,
}

pub fn build_router<S, T>(state: Arc<AppState<S, T>>) -> Router
where
    S: ReleaseSource + 'static,
    T: UpstreamTransport + 'static,
{
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/v1/releases", get(releases_handler::<S, T>))
        .fallback(not_found_handler)
        .layer(from_fn(cors_middleware))
        .layer(from_fn(request_tracing_middleware))
        .with_state(state)
}

/// Serve the API on `listener` until SIGINT / SIGTERM
pub async fn serve<S, T>(listener: TcpListener, state: AppState<S, T>) -> std::io::Result<()>
where
    S: ReleaseSource + 'static,
    T: UpstreamTransport + 'static,
{
    axum::serve(listener, build_router(Arc::new(state)))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn releases_handler<S, T>(State(state): State<Arc<AppState<S, T>>>) -> Response
where
    S: ReleaseSource + 'static,
    T: UpstreamTransport + 'static,
{
    let releases = match state.source.list_releases().await {
        Ok(releases) => releases,
        Err(e) => {
            tracing::error!(error = %e, "failed to list releases");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    let results = state.orchestrator.compute_drift(&releases).await;
    Json(results).into_response()
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "not found".to_string())
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Dashboards are often served from another origin during development
async fn cors_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert("access-control-allow-origin", HeaderValue::from_static("*"));
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static("GET,OPTIONS"),
    );
    response
}

/// One span per request; health checks are logged at debug only
async fn request_tracing_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let route = request.uri().path().to_string();
    let span = tracing::info_span!("http.request", method = %method, route = %route);

    let started = Instant::now();
    let response = next.run(request).instrument(span.clone()).await;
    let status = response.status().as_u16();
    let latency_ms = started.elapsed().as_millis() as u64;

    span.in_scope(|| {
        if status >= 400 {
            tracing::warn!(status, latency_ms, "request failed");
        } else if route.starts_with("/api/health") {
            tracing::debug!(status, latency_ms, "request");
        } else {
            tracing::info!(status, latency_ms, "request");
        }
    });
    response
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot watch SIGTERM, waiting for Ctrl-C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("shutting down");
}

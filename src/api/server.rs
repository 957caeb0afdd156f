//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::{
    handlers,
    models::{ApiResponse, BatchExtractRequest, ExtractRequest},
};
use crate::config::Config;
use crate::engine::StageIdentityEngine;
use crate::error::StageError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<StageIdentityEngine>,
    pub config: Arc<Config>,
}

/// Build the router with every route and middleware layer
pub fn router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/health", get(health_handler))
        .route("/api/extract", get(extract_query_handler).post(extract_handler))
        .route("/api/extract/batch", post(extract_batch_handler))
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Configure and start the HTTP server
pub async fn start_http_server(config: Arc<Config>, port: u16) -> Result<()> {
    info!("🚀 Starting HTTP server on port {}", port);

    let engine = Arc::new(StageIdentityEngine::new(&config));
    let app = router(AppState { engine, config });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("🌐 API server listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn error_status(error: &StageError) -> StatusCode {
    match error {
        StageError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    match handlers::health_check().await {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(e) => {
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            (status, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

async fn extract_response(state: &AppState, url: &str) -> axum::response::Response {
    match handlers::extract(state, url).await {
        Ok(record) => (StatusCode::OK, Json(ApiResponse::success(record))).into_response(),
        Err(e) => (error_status(&e), Json(ApiResponse::<()>::error(e.to_string()))).into_response(),
    }
}

/// `GET /api/extract?url=...`
async fn extract_query_handler(
    State(state): State<AppState>,
    Query(request): Query<ExtractRequest>,
) -> impl IntoResponse {
    extract_response(&state, &request.url).await
}

/// `POST /api/extract` with a JSON body
async fn extract_handler(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> impl IntoResponse {
    extract_response(&state, &request.url).await
}

/// `POST /api/extract/batch` with a JSON body
async fn extract_batch_handler(
    State(state): State<AppState>,
    Json(request): Json<BatchExtractRequest>,
) -> impl IntoResponse {
    match handlers::extract_batch(&state, &request.urls).await {
        Ok(records) => (StatusCode::OK, Json(ApiResponse::success(records))).into_response(),
        Err(e) => (error_status(&e), Json(ApiResponse::<()>::error(e.to_string()))).into_response(),
    }
}

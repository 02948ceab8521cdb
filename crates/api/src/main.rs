mod config;
mod error;
mod metrics;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
};
use extract::{
    CharacterCandidate, Document, ExtractionResult, Extractor, LocationCandidate,
    RelationshipEdge,
};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::metrics::{Metrics, MetricsSnapshot, TimedOperation};

struct AppState {
    extractor: Arc<Extractor>,
    metrics: Arc<Metrics>,
    config: AppConfig,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Deserialize)]
struct ParseRequest {
    documents: Vec<Document>,
}

#[derive(Deserialize)]
struct ParsePathRequest {
    path: String,
}

#[derive(Deserialize)]
struct TextRequest {
    text: String,
}

#[derive(Deserialize)]
struct RelationshipRequest {
    text: String,
    names: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let bind_addr = config.server.bind_addr.clone();

    let state = Arc::new(AppState {
        extractor: Arc::new(Extractor::with_config(config.extractor)),
        metrics: Metrics::new(),
        config,
    });

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .context(format!("Failed to bind {}", bind_addr))?;

    info!(addr = %bind_addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

fn build_router(state: Arc<AppState>) -> Router {
    let max_body = state.config.server.max_body_bytes;

    Router::new()
        .route("/health", get(health_check))
        .route("/stats", get(get_stats))
        .route("/parse", post(parse_documents))
        .route("/parse/path", post(parse_path))
        .route("/characters", post(extract_characters))
        .route("/locations", post(extract_locations))
        .route("/relationships", post(analyze_relationships))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(max_body)),
        )
        .with_state(state)
}

/// Run an extraction off the async runtime, bounded by the request timeout.
///
/// On timeout the blocking task is left to finish in the background; its
/// result is discarded.
async fn run_blocking<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Extractor) -> T + Send + 'static,
    T: Send + 'static,
{
    let extractor = Arc::clone(&state.extractor);
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);
    let task = tokio::task::spawn_blocking(move || f(&extractor));

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(ApiError::Internal(format!("extraction task failed: {}", e))),
        Err(_) => Err(ApiError::Timeout(timeout)),
    }
}

/// Count the request and log failures
fn finish<T>(state: &AppState, route: &str, result: Result<T, ApiError>) -> Result<Json<T>, ApiError> {
    state.metrics.record_request(result.is_ok());
    match result {
        Ok(value) => Ok(Json(value)),
        Err(e) => {
            warn!(route = route, status = %e.status(), error = %e, "Request failed");
            Err(e)
        }
    }
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

async fn parse_documents(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ParseRequest>,
) -> Result<Json<ExtractionResult>, ApiError> {
    let result = parse_corpus(&state, req.documents).await;
    finish(&state, "/parse", result)
}

async fn parse_path(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ParsePathRequest>,
) -> Result<Json<ExtractionResult>, ApiError> {
    let result = load_and_parse(&state, &req.path).await;
    finish(&state, "/parse/path", result)
}

async fn load_and_parse(state: &AppState, requested: &str) -> Result<ExtractionResult, ApiError> {
    let root = state.config.server.corpus_root.as_deref();
    let path = resolve_path(root, requested)?;

    let exists = tokio::fs::try_exists(&path)
        .await
        .map_err(|e| ApiError::Internal(format!("failed to stat {}: {}", requested, e)))?;
    if !exists {
        return Err(ApiError::NotFound(format!("no such path: {}", requested)));
    }
    if let Some(root) = root {
        ensure_inside_root(root, &path).await?;
    }

    let documents = ingest::load_corpus_with(&path, &state.config.reader)
        .await
        .map_err(|e| ApiError::Internal(format!("{:#}", e)))?;

    parse_corpus(state, documents).await
}

async fn parse_corpus(state: &AppState, documents: Vec<Document>) -> Result<ExtractionResult, ApiError> {
    let timer = TimedOperation::start();
    let document_count = documents.len();

    let result = run_blocking(state, move |extractor| extractor.parse_files(&documents)).await??;

    let summary = result.summary();
    state.metrics.record_parse(timer.elapsed(), document_count, summary);
    info!(
        documents = document_count,
        characters = summary.characters,
        locations = summary.locations,
        relationships = summary.relationships,
        elapsed_ms = timer.elapsed().as_millis() as u64,
        "Parsed corpus"
    );

    Ok(result)
}

async fn extract_characters(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextRequest>,
) -> Result<Json<Vec<CharacterCandidate>>, ApiError> {
    let timer = TimedOperation::start();
    let result = run_blocking(&state, move |extractor| extractor.extract_characters(&req.text)).await;
    state.metrics.record_extract(timer.elapsed());
    finish(&state, "/characters", result)
}

async fn extract_locations(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextRequest>,
) -> Result<Json<Vec<LocationCandidate>>, ApiError> {
    let timer = TimedOperation::start();
    let result = run_blocking(&state, move |extractor| extractor.extract_locations(&req.text)).await;
    state.metrics.record_extract(timer.elapsed());
    finish(&state, "/locations", result)
}

async fn analyze_relationships(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RelationshipRequest>,
) -> Result<Json<Vec<RelationshipEdge>>, ApiError> {
    let timer = TimedOperation::start();
    let result = run_blocking(&state, move |extractor| {
        extractor.analyze_relationships(&req.text, &req.names)
    })
    .await;
    state.metrics.record_extract(timer.elapsed());
    finish(&state, "/relationships", result)
}

/// Resolve a requested path, keeping it inside `root` when one is configured
fn resolve_path(root: Option<&Path>, requested: &str) -> Result<PathBuf, ApiError> {
    let requested = PathBuf::from(requested);

    match root {
        None => Ok(requested),
        Some(root) => {
            let escapes = requested.is_absolute()
                || requested
                    .components()
                    .any(|c| matches!(c, Component::ParentDir));
            if escapes {
                return Err(ApiError::BadRequest(
                    "path must be relative to the corpus root".to_string(),
                ));
            }
            Ok(root.join(requested))
        }
    }
}

/// Symlinks below the root must not lead out of it
async fn ensure_inside_root(root: &Path, path: &Path) -> Result<(), ApiError> {
    let real_root = tokio::fs::canonicalize(root)
        .await
        .map_err(|e| ApiError::Internal(format!("corpus root unavailable: {}", e)))?;
    let real_path = tokio::fs::canonicalize(path)
        .await
        .map_err(|e| ApiError::Internal(format!("failed to resolve {:?}: {}", path, e)))?;

    if real_path.starts_with(&real_root) {
        Ok(())
    } else {
        Err(ApiError::BadRequest("path must stay inside the corpus root".to_string()))
    }
}

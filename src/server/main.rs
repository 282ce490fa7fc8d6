//! HTTP server for the administrative-unit geocoding pipeline.
//!
//! Exposes batch geocoding per level, the status rollup, and the
//! on-demand coordinate audit.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gramgeo::config::PipelineSettings;
use gramgeo::geocode::HttpGeocoder;
use gramgeo::pipeline::{AuditReport, BatchOutcome, GeocodePipeline, StatusReport};
use gramgeo::store::EsUnitStore;
use gramgeo::Level;

const DEFAULT_BATCH_SIZE: usize = 25;
const MAX_BATCH_SIZE: usize = 500;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Administrative-unit geocoding server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// Pipeline configuration file
    #[arg(short, long, default_value = "gramgeo.toml")]
    config: String,
}

/// Application state shared across handlers
struct AppState {
    pipeline: GeocodePipeline,
    store: EsUnitStore,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!("Gramgeo Geocoding Server");

    // Misconfiguration is fatal here, before any batch work starts.
    let settings = PipelineSettings::load_from_file(&args.config)?;

    info!(
        "District {} ({}), store at {}",
        settings.district.name, settings.district.state, settings.store.es_url
    );

    let store = EsUnitStore::new(&settings.store.es_url, &settings.store.index).await?;
    if !store.health_check().await? {
        anyhow::bail!("Entity store cluster is not healthy");
    }

    let provider = HttpGeocoder::new(&settings.provider)?;
    let pipeline =
        GeocodePipeline::from_settings(Arc::new(store.clone()), Arc::new(provider), &settings)?;

    let state = Arc::new(AppState { pipeline, store });

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/geocode-towns", post(geocode_towns_handler))
        .route("/geocode-wards", post(geocode_wards_handler))
        .route("/villages/geocode", post(geocode_villages_handler))
        .route("/geocoding-status", get(status_handler))
        .route("/geocode-audit", post(audit_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let healthy = state.store.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        store: healthy,
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    store: bool,
}

#[derive(Deserialize, Default)]
struct BatchRequest {
    #[serde(rename = "batchSize")]
    batch_size: Option<usize>,
}

impl BatchRequest {
    fn effective_size(&self) -> usize {
        self.batch_size
            .unwrap_or(DEFAULT_BATCH_SIZE)
            .min(MAX_BATCH_SIZE)
    }
}

async fn geocode_towns_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<BatchRequest>>,
) -> Result<Json<BatchOutcome>, (StatusCode, String)> {
    run_batch(&state, Level::Town, body).await
}

async fn geocode_wards_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<BatchRequest>>,
) -> Result<Json<BatchOutcome>, (StatusCode, String)> {
    run_batch(&state, Level::Ward, body).await
}

async fn geocode_villages_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<BatchRequest>>,
) -> Result<Json<BatchOutcome>, (StatusCode, String)> {
    run_batch(&state, Level::Village, body).await
}

/// A batch call always answers with a tally; only a store-level failure
/// of the candidate query itself surfaces as an error response.
async fn run_batch(
    state: &AppState,
    level: Level,
    body: Option<Json<BatchRequest>>,
) -> Result<Json<BatchOutcome>, (StatusCode, String)> {
    let request = body.map(|Json(b)| b).unwrap_or_default();

    let outcome = state
        .pipeline
        .run_batch(level, request.effective_size())
        .await
        .map_err(|e| {
            tracing::error!("Batch run for {} failed: {:#}", level, e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    Ok(Json(outcome))
}

async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusReport>, (StatusCode, String)> {
    let report = state.pipeline.status().await.map_err(|e| {
        tracing::error!("Status aggregation failed: {:#}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(Json(report))
}

async fn audit_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AuditReport>, (StatusCode, String)> {
    let report = state.pipeline.audit().await.map_err(|e| {
        tracing::error!("Coordinate audit failed: {:#}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(Json(report))
}

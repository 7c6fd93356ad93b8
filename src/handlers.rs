use crate::analysis_client::{normalize_target_url, AnalysisServiceClient};
use crate::config::Config;
use crate::errors::AppError;
use crate::export::{export_filename, to_archive_json, to_csv};
use crate::models::{AnalysisResult, AnalyzeRequest, RunSummary};
use crate::report::{ReportEngine, ReportModel};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Client for the upstream analysis service.
    pub client: AnalysisServiceClient,
    /// Stateless evaluator; cheap to copy per request.
    pub engine: ReportEngine,
}

impl AppState {
    pub fn new(config: Config, client: AnalysisServiceClient) -> Self {
        let engine = ReportEngine::new(Default::default(), config.panel_toggles());
        Self {
            config,
            client,
            engine,
        }
    }
}

/// Health check endpoint.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "aeo-report-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /api/v1/report
///
/// Requests a fresh analysis of the given URL and evaluates it.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `request` - Body with the target `url`; a missing scheme defaults to https.
pub async fn create_report(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<ReportModel>, AppError> {
    let url = normalize_target_url(&request.url)?;
    tracing::info!("POST /report - url: {}", url);

    let raw = state.client.analyze(&url).await?;
    Ok(Json(evaluate_raw(&state.engine, &raw)))
}

/// POST /api/v1/report/evaluate
///
/// Evaluates a payload supplied by the caller without contacting upstream.
pub async fn evaluate_report(
    State(state): State<Arc<AppState>>,
    Json(raw): Json<Value>,
) -> Json<ReportModel> {
    tracing::info!("POST /report/evaluate");
    Json(evaluate_raw(&state.engine, &raw))
}

/// GET /api/v1/runs
pub async fn list_runs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RunSummary>>, AppError> {
    tracing::info!("GET /runs");
    let runs = state.client.list_runs().await?;
    Ok(Json(runs))
}

/// GET /api/v1/runs/:id/report
pub async fn run_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ReportModel>, AppError> {
    tracing::info!("GET /runs/{}/report", id);
    let raw = state.client.get_run(&id).await?;
    Ok(Json(evaluate_raw(&state.engine, &raw)))
}

/// GET /api/v1/runs/:id/export.json
pub async fn export_run_json(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    tracing::info!("GET /runs/{}/export.json", id);
    let raw = state.client.get_run(&id).await?;
    json_download(&state.engine, &raw)
}

/// GET /api/v1/runs/:id/export.csv
pub async fn export_run_csv(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    tracing::info!("GET /runs/{}/export.csv", id);
    let raw = state.client.get_run(&id).await?;
    Ok(csv_download(&state.engine, &raw))
}

/// POST /api/v1/export/json
pub async fn export_json(
    State(state): State<Arc<AppState>>,
    Json(raw): Json<Value>,
) -> Result<Response, AppError> {
    tracing::info!("POST /export/json");
    json_download(&state.engine, &raw)
}

/// POST /api/v1/export/csv
pub async fn export_csv(
    State(state): State<Arc<AppState>>,
    Json(raw): Json<Value>,
) -> Response {
    tracing::info!("POST /export/csv");
    csv_download(&state.engine, &raw)
}

fn evaluate_raw(engine: &ReportEngine, raw: &Value) -> ReportModel {
    engine.evaluate(Some(&AnalysisResult::from_value(raw)))
}

fn json_download(engine: &ReportEngine, raw: &Value) -> Result<Response, AppError> {
    let report = evaluate_raw(engine, raw);
    let body = to_archive_json(raw, &report, Utc::now())?;
    Ok(attachment(
        "application/json",
        &export_filename(&report, "json"),
        body,
    ))
}

fn csv_download(engine: &ReportEngine, raw: &Value) -> Response {
    let report = evaluate_raw(engine, raw);
    let body = to_csv(&report, Utc::now());
    attachment(
        "text/csv; charset=utf-8",
        &export_filename(&report, "csv"),
        body,
    )
}

fn attachment(content_type: &str, filename: &str, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

/// Report and export routes. Rate limiting is layered on by the caller.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/report", post(create_report))
        .route("/api/v1/report/evaluate", post(evaluate_report))
        .route("/api/v1/runs", get(list_runs))
        .route("/api/v1/runs/:id/report", get(run_report))
        .route("/api/v1/runs/:id/export.json", get(export_run_json))
        .route("/api/v1/runs/:id/export.csv", get(export_run_csv))
        .route("/api/v1/export/json", post(export_json))
        .route("/api/v1/export/csv", post(export_csv))
}

/// Full router without transport middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(api_routes())
        .with_state(state)
}

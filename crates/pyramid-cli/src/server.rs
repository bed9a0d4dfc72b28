use crate::config::AppConfig;
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use pyramid_core::aggregate::aggregate_world;
use pyramid_core::cleaner::clean_state;
use pyramid_core::compare::{
    side_by_side_summary, significant_differences, BandDifference, SideBySide,
    SIGNIFICANT_THRESHOLD_PCT,
};
use pyramid_core::fertility::FertilityMetrics;
use pyramid_core::metrics::{sex_ratio_by_age, BandSexRatio, DemographicMetrics};
use pyramid_core::pyramid::difference_pyramid;
use pyramid_core::stage::{self, DemographicStage};
use pyramid_core::{
    CountryInfo, CountryPopulation, PopDb, PopSearch, PyramidBuilder, PyramidChart, PyramidError,
    Scale, StateInfo, StatePopulation, YearData, Years,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub struct AppState {
    pub db: PopDb,
}

/// JSON error body `{"error": "..."}` with a matching status code.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unprocessable(String),
    Internal,
}

impl From<PyramidError> for ApiError {
    fn from(e: PyramidError) -> Self {
        match e {
            PyramidError::NotFound(_) | PyramidError::YearMissing { .. } => {
                ApiError::NotFound(e.to_string())
            }
            PyramidError::MismatchedAgeGroups(_) => ApiError::Unprocessable(e.to_string()),
            other => {
                error!(error = %other, "request failed");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

#[derive(Debug, Default, Deserialize)]
pub struct PyramidParams {
    scale: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareResponse {
    pub year: u16,
    pub pyramid: PyramidChart,
    pub significant_differences: Vec<BandDifference>,
    pub summary: SideBySide,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    pub name: String,
    pub metrics: DemographicMetrics,
    pub stage: DemographicStage,
    pub stage_explanation: String,
    pub sex_ratio_by_age: Vec<BandSexRatio>,
    pub fertility: Option<FertilityMetrics>,
}

/// Builds the API router over an already loaded database.
pub fn router(db: PopDb) -> Router {
    let state = Arc::new(AppState { db });

    Router::new()
        .route("/api/health", get(health))
        .route("/api/countries", get(countries))
        .route("/api/country/:slug", get(country))
        .route("/api/states-data", get(states_index))
        .route("/api/states-data/:slug", get(state_cleaned))
        .route("/api/states/:state", get(state_years))
        .route("/api/pyramid/:slug/:year", get(pyramid))
        .route("/api/compare/:a/:b/:year", get(compare))
        .route("/api/metrics/:slug/:year", get(metrics))
        .route("/api/world/:year", get(world))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(config: &AppConfig, db: PopDb) -> Result<()> {
    let addr = config.socket_addr();
    let app = router(db);

    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for ctrl-c");
    }
    info!("shutting down");
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let stats = state.db.stats();
    Json(json!({
        "status": "ok",
        "countries": stats.countries,
        "states": stats.states,
    }))
}

async fn countries(State(state): State<Arc<AppState>>) -> Json<Vec<CountryInfo>> {
    Json(state.db.countries().to_vec())
}

async fn country(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<CountryPopulation> {
    Ok(Json(state.db.country_data(&slug)?.clone()))
}

async fn states_index(State(state): State<Arc<AppState>>) -> Json<Vec<StateInfo>> {
    Json(state.db.states().to_vec())
}

async fn state_cleaned(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<StatePopulation> {
    Ok(Json(clean_state(state.db.state_data(&slug)?)))
}

async fn state_years(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> ApiResult<Years> {
    let data = state
        .db
        .state_data(&code)
        .map_err(|_| ApiError::NotFound("State not found".to_string()))?;
    Ok(Json(data.years.clone()))
}

/// Years arrive as strings so a bad segment still gets a JSON error body.
fn parse_year(raw: &str) -> std::result::Result<u16, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid year '{raw}'")))
}

fn year_of<'a>(
    db: &'a PopDb,
    slug: &str,
    year: u16,
) -> pyramid_core::Result<(&'a str, &'a YearData)> {
    let source = db.source(slug)?.as_dyn();
    Ok((source.name(), source.year(year)?))
}

async fn pyramid(
    State(state): State<Arc<AppState>>,
    Path((slug, year)): Path<(String, String)>,
    Query(params): Query<PyramidParams>,
) -> ApiResult<PyramidChart> {
    let year = parse_year(&year)?;
    let scale = match params.scale.as_deref() {
        Some(s) => s
            .parse::<Scale>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None => Scale::Absolute,
    };
    let (name, data) = year_of(&state.db, &slug, year)?;
    let chart = PyramidBuilder::from_year(data)
        .title(format!("{name} Population Pyramid {year}"))
        .scale(scale)
        .build();
    Ok(Json(chart))
}

async fn compare(
    State(state): State<Arc<AppState>>,
    Path((a, b, year)): Path<(String, String, String)>,
) -> ApiResult<CompareResponse> {
    let year = parse_year(&year)?;
    let (name_a, first) = year_of(&state.db, &a, year)?;
    let (name_b, second) = year_of(&state.db, &b, year)?;

    let pyramid = difference_pyramid(&first.age_groups, &second.age_groups, name_a, name_b)?;
    let significant_differences = significant_differences(
        &first.age_groups,
        &second.age_groups,
        name_a,
        name_b,
        SIGNIFICANT_THRESHOLD_PCT,
    )?;

    Ok(Json(CompareResponse {
        year,
        pyramid,
        significant_differences,
        summary: side_by_side_summary(first, second),
    }))
}

async fn metrics(
    State(state): State<Arc<AppState>>,
    Path((slug, year)): Path<(String, String)>,
) -> ApiResult<MetricsResponse> {
    let year = parse_year(&year)?;
    let source = state.db.source(&slug)?.as_dyn();
    let data = source.year(year)?;
    let stage = stage::classify(data);
    let fertility = state
        .db
        .fertility(source.slug())
        .map(|f| FertilityMetrics::from_series(&f.fertility_data));

    Ok(Json(MetricsResponse {
        name: source.name().to_string(),
        metrics: DemographicMetrics::from_year(data),
        stage_explanation: stage.explain(source.name()),
        stage,
        sex_ratio_by_age: sex_ratio_by_age(data),
        fertility,
    }))
}

async fn world(
    State(state): State<Arc<AppState>>,
    Path(year): Path<String>,
) -> ApiResult<YearData> {
    let year = parse_year(&year)?;
    aggregate_world(state.db.country_data.values(), year)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no country has data for {year}")))
}

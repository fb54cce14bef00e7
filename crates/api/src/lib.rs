use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use radar_core::domain::query::{FieldError, RadarQuery, ValidatedQuery, ValidationError};
use radar_core::domain::radar::{Nation, RadarData, RadarFilters, RankedModel};
use radar_core::ranking::view::{rising_models, RadarStats, RISING_TOP_N};
use radar_core::service::RadarService;
use radar_core::time::month::{available_months, Month, DEFAULT_AVAILABLE_MONTHS};

/// Upper bound for `limit` on the rising endpoint.
pub const MAX_RISING_LIMIT: usize = 100;

#[derive(Clone)]
pub struct AppState {
    pub service: RadarService,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/months", get(get_months))
        .route("/api/radar", get(get_radar))
        .route("/api/radar/rising", get(get_rising))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug)]
pub enum ApiError {
    Invalid(ValidationError),
    Internal(anyhow::Error),
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Invalid(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Invalid(e) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Invalid parameters",
                    "details": e.details,
                })),
            )
                .into_response(),
            ApiError::Internal(e) => {
                sentry_anyhow::capture_anyhow(&e);
                tracing::error!(error = %format!("{e:#}"), "error fetching radar data");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to fetch radar data" })),
                )
                    .into_response()
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct MonthsResponse {
    months: Vec<Month>,
}

async fn get_months() -> Json<MonthsResponse> {
    Json(MonthsResponse {
        months: available_months(Utc::now().date_naive(), DEFAULT_AVAILABLE_MONTHS),
    })
}

async fn get_radar(
    State(state): State<AppState>,
    Query(query): Query<RadarQuery>,
) -> Result<Json<Arc<RadarData>>, ApiError> {
    let ValidatedQuery { month, nation } = query.validate()?;
    let data = state
        .service
        .get_radar_data(month, nation)
        .await
        .map_err(ApiError::Internal)?;
    Ok(Json(data))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RisingParams {
    pub month: Option<String>,
    pub nation: Option<String>,
    pub min_sales: Option<String>,
    pub exclude_new_entries: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RisingRequest {
    pub query: ValidatedQuery,
    pub filters: RadarFilters,
    pub limit: usize,
}

impl RisingParams {
    pub fn validate(&self) -> Result<RisingRequest, ValidationError> {
        let base = RadarQuery {
            month: self.month.clone(),
            nation: self.nation.clone(),
        }
        .validate();
        let mut details = match &base {
            Ok(_) => Vec::new(),
            Err(e) => e.details.clone(),
        };

        let mut filters = RadarFilters::default();
        if let Some(s) = self.min_sales.as_deref() {
            match s.parse::<u64>() {
                Ok(v) => filters.min_sales = v,
                Err(_) => details.push(FieldError::new(
                    "minSales",
                    "Expected a non-negative integer",
                )),
            }
        }
        if let Some(s) = self.exclude_new_entries.as_deref() {
            match s {
                "true" | "1" => filters.exclude_new_entries = true,
                "false" | "0" => filters.exclude_new_entries = false,
                _ => details.push(FieldError::new(
                    "excludeNewEntries",
                    "Expected true or false",
                )),
            }
        }

        let mut limit = RISING_TOP_N;
        if let Some(s) = self.limit.as_deref() {
            match s.parse::<usize>() {
                Ok(v) if v >= 1 => limit = v.min(MAX_RISING_LIMIT),
                _ => details.push(FieldError::new("limit", "Expected a positive integer")),
            }
        }

        match base {
            Ok(query) if details.is_empty() => Ok(RisingRequest {
                query,
                filters,
                limit,
            }),
            _ => Err(ValidationError { details }),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RisingResponse {
    month: Month,
    nation: Nation,
    fetched_at: DateTime<Utc>,
    filters: RadarFilters,
    stats: RadarStats,
    models: Vec<RankedModel>,
}

async fn get_rising(
    State(state): State<AppState>,
    Query(params): Query<RisingParams>,
) -> Result<Json<RisingResponse>, ApiError> {
    let req = params.validate()?;
    let data = state
        .service
        .get_radar_data(req.query.month, req.query.nation)
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(RisingResponse {
        month: data.month,
        nation: data.nation,
        fetched_at: data.fetched_at,
        filters: req.filters,
        stats: RadarStats::from_models(&data.models),
        models: rising_models(&data.models, &req.filters, req.limit),
    }))
}

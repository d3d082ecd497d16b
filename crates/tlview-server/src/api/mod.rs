mod days;
mod places;
mod reload;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tlview_core::TimeFormat;
use tlview_history::{HistoryClient, HistorySource, HistoryStore, PlaceDetailsCache};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<HistoryStore>,
    pub client: Arc<HistoryClient>,
    pub source: Arc<HistorySource>,
    /// `None` when no Maps API key is configured.
    pub places: Option<Arc<PlaceDetailsCache>>,
    pub timezone: Tz,
    pub time_format: TimeFormat,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    records: usize,
    generation: u64,
    loaded_at: Option<DateTime<Utc>>,
    places_enabled: bool,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "bad_gateway" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// `tz` query value, falling back to the configured zone.
pub(super) fn resolve_timezone(
    request_id: &str,
    raw: Option<&str>,
    default: Tz,
) -> Result<Tz, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(name) => name.parse::<Tz>().map_err(|_| {
            ApiError::new(
                request_id,
                "validation_error",
                format!("unknown time zone: {name}"),
            )
        }),
    }
}

pub(super) fn resolve_day(request_id: &str, raw: &str) -> Result<NaiveDate, ApiError> {
    tlview_history::parse_day(raw).ok_or_else(|| {
        ApiError::new(
            request_id,
            "bad_request",
            format!("invalid date {raw:?}; expected YYYY-MM-DD"),
        )
    })
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/days", get(days::list_days))
        .route("/api/v1/days/{date}", get(days::get_day))
        .route("/api/v1/days/{date}/playback", get(days::get_playback))
        .route("/api/v1/places/{place_id}", get(places::get_place))
        .route("/api/v1/reload", post(reload::reload_history))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            records: state.store.records().len(),
            generation: state.store.generation(),
            loaded_at: state.store.loaded_at(),
            places_enabled: state.places.is_some(),
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tlview_core::{LatLng, TimeFormat};
use tlview_history::{
    available_days, build_timeline_rows, day_bounds, map_features, records_for_day, shift_day,
    Bounds, DaySummary, MapFeature, Playback, PlaybackFrame, TimelineRow, PLAYBACK_STEP,
};

use crate::middleware::RequestId;

use super::{resolve_day, resolve_timezone, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct DayQuery {
    pub tz: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct DayView {
    pub date: NaiveDate,
    pub timezone: &'static str,
    pub time_format: String,
    pub previous: Option<NaiveDate>,
    pub next: Option<NaiveDate>,
    pub rows: Vec<TimelineRow>,
    pub features: Vec<MapFeature>,
    pub bounds: Option<Bounds>,
    /// Initial map centre; the middle of `bounds`.
    pub center: Option<LatLng>,
}

#[derive(Debug, Serialize)]
pub(super) struct PlaybackView {
    pub date: NaiveDate,
    pub timezone: &'static str,
    /// Delay between frames when animating.
    pub step_ms: u128,
    pub frames: Vec<PlaybackFrame>,
}

pub(super) async fn list_days(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<DayQuery>,
) -> Result<Json<ApiResponse<Vec<DaySummary>>>, ApiError> {
    let tz = resolve_timezone(&req_id.0, query.tz.as_deref(), state.timezone)?;
    let records = state.store.records();

    Ok(Json(ApiResponse {
        data: available_days(&records, tz),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_day(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(date): Path<String>,
    Query(query): Query<DayQuery>,
) -> Result<Json<ApiResponse<DayView>>, ApiError> {
    let date = resolve_day(&req_id.0, &date)?;
    let tz = resolve_timezone(&req_id.0, query.tz.as_deref(), state.timezone)?;
    let time_format = match query.format.as_deref() {
        None => state.time_format,
        Some(raw) => TimeFormat::parse(raw).ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "validation_error",
                format!("unknown time format {raw:?}; expected 24h or 12h"),
            )
        })?,
    };

    let records = state.store.records();
    let day = records_for_day(&records, date, tz);
    tracing::debug!(%date, tz = tz.name(), count = day.len(), "day view");

    let bounds = day_bounds(&day);
    let data = DayView {
        date,
        timezone: tz.name(),
        time_format: time_format.to_string(),
        previous: shift_day(date, -1),
        next: shift_day(date, 1),
        rows: build_timeline_rows(&day, tz, time_format),
        features: map_features(&day),
        bounds,
        center: bounds.map(|b| b.center()),
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_playback(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(date): Path<String>,
    Query(query): Query<DayQuery>,
) -> Result<Json<ApiResponse<PlaybackView>>, ApiError> {
    let date = resolve_day(&req_id.0, &date)?;
    let tz = resolve_timezone(&req_id.0, query.tz.as_deref(), state.timezone)?;

    let records = state.store.records();
    let frames = Playback::new(records_for_day(&records, date, tz)).collect();

    Ok(Json(ApiResponse {
        data: PlaybackView {
            date,
            timezone: tz.name(),
            step_ms: PLAYBACK_STEP.as_millis(),
            frames,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

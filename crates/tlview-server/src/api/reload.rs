use axum::{extract::State, Extension, Json};
use serde::Serialize;
use tlview_history::ReloadOutcome;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct ReloadItem {
    pub status: &'static str,
    pub generation: u64,
    /// Present only when the load was applied.
    pub records: Option<usize>,
}

pub(super) async fn reload_history(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<ReloadItem>>, ApiError> {
    let outcome = state
        .store
        .reload(&state.client, &state.source)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, source = %state.source, "reload failed");
            ApiError::new(
                req_id.0.clone(),
                "bad_gateway",
                format!("failed to load history: {e}"),
            )
        })?;

    let data = match outcome {
        ReloadOutcome::Applied { generation, count } => ReloadItem {
            status: "applied",
            generation,
            records: Some(count),
        },
        ReloadOutcome::Superseded { generation } => ReloadItem {
            status: "superseded",
            generation,
            records: None,
        },
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

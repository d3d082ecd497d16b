use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use tlview_history::PlaceDetails;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct PlaceItem {
    #[serde(flatten)]
    pub details: PlaceDetails,
    pub type_labels: Vec<String>,
}

pub(super) async fn get_place(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(place_id): Path<String>,
) -> Result<Json<ApiResponse<PlaceItem>>, ApiError> {
    let Some(cache) = state.places.as_ref() else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            "place lookups are not configured",
        ));
    };

    let Some(details) = cache.get(&place_id).await else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("no details for place {place_id}"),
        ));
    };

    Ok(Json(ApiResponse {
        data: PlaceItem {
            type_labels: details.type_labels(),
            details,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

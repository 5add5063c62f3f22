use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::heatmap::{estimate, Estimate};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct EstimateResponse {
    pub bssid: String,
    pub estimate: Estimate,
    /// Number of observations the estimate is based on.
    pub samples: usize,
}

#[utoipa::path(
    get,
    path = "/api/heatmap/{bssid}",
    tag = "heatmap",
    params(
        ("bssid" = String, Path, description = "Transmitter hardware address, optionally ending in .png")
    ),
    responses(
        (status = 200, description = "Heatmap, or a placeholder when fewer than two observations exist", body = Vec<u8>, content_type = "image/png"),
        (status = 404, description = "Transmitter never observed", body = ErrorResponse),
        (status = 500, description = "Rendering failed", body = ErrorResponse)
    )
)]
pub async fn heatmap_png(
    State(state): State<AppState>,
    Path(mut bssid): Path<String>,
) -> ApiResult<impl IntoResponse> {
    if bssid.ends_with(".png") {
        bssid.truncate(bssid.len() - ".png".len());
    }

    let png = tokio::task::spawn_blocking(move || -> ApiResult<Vec<u8>> {
        let heatmap = state.pipeline.generate_heatmap(state.store.as_ref(), &bssid)?;
        Ok(heatmap.encode_png()?)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "image/png")], png))
}

#[utoipa::path(
    get,
    path = "/api/estimate/{bssid}",
    tag = "heatmap",
    params(
        ("bssid" = String, Path, description = "Transmitter hardware address")
    ),
    responses(
        (status = 200, description = "Estimated transmitter location", body = EstimateResponse),
        (status = 404, description = "Transmitter never observed", body = ErrorResponse),
        (status = 422, description = "Fewer than two observations", body = ErrorResponse)
    )
)]
pub async fn estimate_location(
    State(state): State<AppState>,
    Path(bssid): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let samples = state.store.fetch_samples(&bssid)?;
    let estimate = estimate(&samples)?;

    Ok((
        StatusCode::OK,
        Json(EstimateResponse {
            bssid,
            estimate,
            samples: samples.len(),
        }),
    ))
}

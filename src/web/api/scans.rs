use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::store::{BssidSummary, Datapoint, OverviewFilter};
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[utoipa::path(
    get,
    path = "/api/ssidoverview/{filtertype}/{filterstr}",
    tag = "scans",
    params(
        ("filtertype" = u8, Path, description = "0 = ssid contains, 1 = bssid contains, 2 = everything"),
        ("filterstr" = String, Path, description = "Text to look for (ignored for type 2)")
    ),
    responses(
        (status = 200, description = "Bssids per network with scan counts", body = std::collections::BTreeMap<String, Vec<BssidSummary>>),
        (status = 400, description = "Unknown filter type", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn ssid_overview(
    State(state): State<AppState>,
    Path((filter_type, filter_str)): Path<(u8, String)>,
) -> ApiResult<impl IntoResponse> {
    let filter = OverviewFilter::from_parts(filter_type, &filter_str)?;
    let overview = state.store.ssid_overview(&filter)?;
    Ok((StatusCode::OK, Json(overview)))
}

#[utoipa::path(
    get,
    path = "/api/bssiddatapoints/{bssid}",
    tag = "scans",
    params(
        ("bssid" = String, Path, description = "Transmitter hardware address")
    ),
    responses(
        (status = 200, description = "Every observation of the transmitter", body = Vec<Datapoint>),
        (status = 404, description = "Transmitter never observed", body = ErrorResponse)
    )
)]
pub async fn bssid_datapoints(
    State(state): State<AppState>,
    Path(bssid): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let datapoints = state.store.datapoints(&bssid)?;
    Ok((StatusCode::OK, Json(datapoints)))
}

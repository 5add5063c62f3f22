use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::heatmap::EstimateResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::scans::ssid_overview,
        super::api::scans::bssid_datapoints,
        super::api::heatmap::heatmap_png,
        super::api::heatmap::estimate_location,
    ),
    components(
        schemas(
            EstimateResponse,
            ErrorResponse,
            crate::heatmap::Coordinate,
            crate::heatmap::Estimate,
            crate::store::Datapoint,
            crate::store::BssidSummary,
        )
    ),
    info(
        title = "AP Locator API",
        description = "Access point location estimates and signal heatmaps from Wi-Fi scans",
        version = "0.1.0"
    ),
    tags(
        (name = "scans", description = "Recorded scan data"),
        (name = "heatmap", description = "Location estimates and heatmaps")
    )
)]
pub struct ApiDoc;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::heatmap::EstimationPipeline;
use crate::store::ScanStore;

use super::api::heatmap as heatmap_handlers;
use super::api::scans as scan_handlers;
use super::api_doc::ApiDoc;
use super::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Scan data
        .route(
            "/api/ssidoverview/{filtertype}/{filterstr}",
            get(scan_handlers::ssid_overview),
        )
        .route(
            "/api/bssiddatapoints/{bssid}",
            get(scan_handlers::bssid_datapoints),
        )
        // Estimates
        .route("/api/heatmap/{bssid}", get(heatmap_handlers::heatmap_png))
        .route(
            "/api/estimate/{bssid}",
            get(heatmap_handlers::estimate_location),
        )
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config, pipeline: EstimationPipeline) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();
    let store = ScanStore::new(config.store.base_folder.clone());
    log::info!("Serving scans from {}", store.base().display());

    let state = AppState {
        store: Arc::new(store),
        pipeline: Arc::new(pipeline),
    };
    let app = router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}

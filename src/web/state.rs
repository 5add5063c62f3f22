use std::sync::Arc;

use crate::heatmap::EstimationPipeline;
use crate::store::ScanStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ScanStore>,
    pub pipeline: Arc<EstimationPipeline>,
}

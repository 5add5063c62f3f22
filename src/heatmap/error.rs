use std::fmt;

use thiserror::Error;

use crate::heatmap::types::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => f.write_str("latitude"),
            Axis::Longitude => f.write_str("longitude"),
        }
    }
}

#[derive(Debug, Error)]
pub enum HeatmapError {
    #[error("not enough samples to estimate a location: got {got}, need at least {needed}")]
    InsufficientData { got: usize, needed: usize },
    #[error("degenerate geometry: every point shares the same {0}")]
    DegenerateGeometry(Axis),
    #[error("no points to project")]
    NoPoints,
    #[error("non-finite coordinate {0}")]
    NonFiniteCoordinate(Coordinate),
    #[error("a {canvas_size}px canvas cannot hold a {border}px border")]
    CanvasTooSmall { canvas_size: u32, border: u32 },
    #[error("invalid color gradient: {0}")]
    InvalidGradient(String),
    #[error("failed to load font {path}: {message}")]
    Font { path: String, message: String },
    #[error("image encoding error: {0}")]
    Encode(#[from] image::ImageError),
}

/// Failure of [`generate_heatmap`](crate::heatmap::EstimationPipeline::generate_heatmap):
/// either the sample source or the pipeline itself.
#[derive(Debug, Error)]
pub enum GenerateError<E> {
    #[error("fetching samples failed: {0}")]
    Source(E),
    #[error(transparent)]
    Heatmap(#[from] HeatmapError),
}

mod error;
mod estimator;
mod gradient;
mod pipeline;
mod projector;
mod renderer;
mod types;

pub use error::{GenerateError, HeatmapError};
pub use estimator::estimate;
pub use gradient::{BelowRange, ColorGradient, ColorStop, DEFAULT_STOPS};
pub use pipeline::{EstimationPipeline, SampleSource};
pub use projector::{DegenerateAxis, GridProjector};
pub use renderer::{bundled_font, load_font, HeatmapRenderer, RenderStyle};
pub use types::{Coordinate, Estimate, ScanSample};

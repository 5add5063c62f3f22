use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::heatmap::{
    bundled_font, load_font, BelowRange, ColorGradient, ColorStop, DegenerateAxis,
    EstimationPipeline, GridProjector, HeatmapError, HeatmapRenderer, RenderStyle, DEFAULT_STOPS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub heatmap: HeatmapConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        WebConfig {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8090".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub base_folder: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    pub canvas_size: u32,
    pub border: u32,
    pub font_path: Option<PathBuf>,
    pub font_size: f32,
    pub below_range: BelowRange,
    pub degenerate_axis: DegenerateAxis,
    pub gradient: Option<Vec<ColorStop>>,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        HeatmapConfig {
            canvas_size: 2000,
            border: 20,
            font_path: None,
            font_size: 20.0,
            below_range: BelowRange::default(),
            degenerate_axis: DegenerateAxis::default(),
            gradient: None,
        }
    }
}

impl HeatmapConfig {
    /// Build the immutable pipeline shared by every request.
    pub fn build_pipeline(&self) -> Result<EstimationPipeline, HeatmapError> {
        let stops = self
            .gradient
            .clone()
            .unwrap_or_else(|| DEFAULT_STOPS.to_vec());
        let gradient = ColorGradient::new(stops, self.below_range)?;
        let projector = GridProjector::new(self.canvas_size, self.border, self.degenerate_axis)?;

        let font = match &self.font_path {
            Some(path) => load_font(path)?,
            None => {
                log::debug!("No font_path configured, using the bundled font");
                bundled_font()?
            }
        };
        let style = RenderStyle {
            font_size: self.font_size,
            ..RenderStyle::default()
        };

        Ok(EstimationPipeline::new(
            projector,
            HeatmapRenderer::new(gradient, style, font),
        ))
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }
}

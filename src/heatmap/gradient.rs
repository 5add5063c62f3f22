use image::Rgb;
use serde::Deserialize;

use crate::heatmap::error::HeatmapError;

/// One control point of a [`ColorGradient`]; `threshold` is a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ColorStop {
    pub threshold: i32,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl ColorStop {
    pub const fn new(threshold: i32, red: u8, green: u8, blue: u8) -> Self {
        Self {
            threshold,
            red,
            green,
            blue,
        }
    }

    fn color(&self) -> Rgb<u8> {
        Rgb([self.red, self.green, self.blue])
    }
}

/// Green at 0%, yellow at 50%, red at 100%.
pub const DEFAULT_STOPS: [ColorStop; 3] = [
    ColorStop::new(0, 0, 255, 0),
    ColorStop::new(50, 255, 255, 0),
    ColorStop::new(100, 255, 0, 0),
];

/// What `color_for` does with a percentage below the first stop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BelowRange {
    /// Use the first stop's color.
    #[default]
    Clamp,
    /// Interpolate from the last stop towards the first, as the legacy lookup did.
    /// Channels saturate at 0 and 255.
    Wrap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorGradient {
    stops: Vec<ColorStop>,
    below_range: BelowRange,
}

impl Default for ColorGradient {
    fn default() -> Self {
        Self {
            stops: DEFAULT_STOPS.to_vec(),
            below_range: BelowRange::Clamp,
        }
    }
}

impl ColorGradient {
    /// Stops must be strictly ascending and the top stop must cover 100%.
    pub fn new(stops: Vec<ColorStop>, below_range: BelowRange) -> Result<Self, HeatmapError> {
        if stops.len() < 2 {
            return Err(HeatmapError::InvalidGradient(format!(
                "need at least 2 stops, got {}",
                stops.len()
            )));
        }
        if let Some(pair) = stops.windows(2).find(|w| w[0].threshold >= w[1].threshold) {
            return Err(HeatmapError::InvalidGradient(format!(
                "thresholds must be strictly increasing ({} then {})",
                pair[0].threshold, pair[1].threshold
            )));
        }
        let top = stops[stops.len() - 1].threshold;
        if top < 100 {
            return Err(HeatmapError::InvalidGradient(format!(
                "top stop must cover 100%, got {}",
                top
            )));
        }
        Ok(Self { stops, below_range })
    }

    /// Piecewise linear color lookup. Above the last threshold the last stop's color
    /// is returned unchanged.
    pub fn color_for(&self, percent: f64) -> Rgb<u8> {
        let last = self.stops[self.stops.len() - 1];
        match self
            .stops
            .iter()
            .position(|s| percent < s.threshold as f64)
        {
            None => last.color(),
            Some(0) => match self.below_range {
                BelowRange::Clamp => self.stops[0].color(),
                BelowRange::Wrap => interpolate(&last, &self.stops[0], percent),
            },
            Some(i) => interpolate(&self.stops[i - 1], &self.stops[i], percent),
        }
    }
}

fn interpolate(lower: &ColorStop, upper: &ColorStop, percent: f64) -> Rgb<u8> {
    let t = (percent - lower.threshold as f64) / (upper.threshold - lower.threshold) as f64;
    // float-to-int `as` saturates, so out-of-range blends land on 0 or 255
    let channel = |l: u8, u: u8| (l as f64 * (1.0 - t) + u as f64 * t) as u8;
    Rgb([
        channel(lower.red, upper.red),
        channel(lower.green, upper.green),
        channel(lower.blue, upper.blue),
    ])
}

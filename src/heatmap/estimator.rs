use crate::heatmap::error::HeatmapError;
use crate::heatmap::types::{Estimate, ScanSample};

/// Fewest samples the estimator accepts.
pub const MIN_SAMPLES: usize = 2;

/// Offset turning a negative dBm reading into a positive strength score.
const STRENGTH_OFFSET_DBM: f64 = 100.0;

/// Weighted centroid of the sample locations.
///
/// Each sample is weighted by `100 + rssi`, normalized over all samples, so stronger
/// readings pull the estimate towards their location. Readings below -100 dBm give a
/// negative weight and are used as-is. When every score is zero the plain centroid is
/// returned.
pub fn estimate(samples: &[ScanSample]) -> Result<Estimate, HeatmapError> {
    if samples.len() < MIN_SAMPLES {
        return Err(HeatmapError::InsufficientData {
            got: samples.len(),
            needed: MIN_SAMPLES,
        });
    }

    let strengths: Vec<f64> = samples
        .iter()
        .map(|s| STRENGTH_OFFSET_DBM + s.signal_strength as f64)
        .collect();
    let total: f64 = strengths.iter().sum();

    let weights: Vec<f64> = if total == 0.0 {
        vec![1.0 / samples.len() as f64; samples.len()]
    } else {
        strengths.iter().map(|s| s / total).collect()
    };

    let (latitude, longitude) = samples
        .iter()
        .zip(&weights)
        .fold((0.0, 0.0), |(lat, lon), (sample, w)| {
            (
                lat + sample.location.latitude * w,
                lon + sample.location.longitude * w,
            )
        });

    Ok(Estimate {
        latitude: round6(latitude),
        longitude: round6(longitude),
    })
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

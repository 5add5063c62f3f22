use std::fmt;

use chrono::DateTime;
use serde::Serialize;
use utoipa::ToSchema;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// One sighting of a transmitter from one location.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSample {
    /// RSSI in dBm, negative.
    pub signal_strength: i32,
    pub location: Coordinate,
    pub sequence_number: i64,
    /// Epoch seconds.
    pub observed_at: i64,
}

impl ScanSample {
    /// Two-line caption drawn next to the sample's marker.
    pub fn label(&self) -> String {
        let time = DateTime::from_timestamp(self.observed_at, 0)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| self.observed_at.to_string());
        format!("{}\n({}) ({})", self.location, self.sequence_number, time)
    }
}

/// Estimated transmitter position, rounded to 6 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Estimate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Estimate {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.coordinate().fmt(f)
    }
}

/// Pixel position, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean pixel distance, truncated.
    pub fn distance_to(&self, other: &GridPoint) -> u32 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt() as u32
    }
}

/// The estimated transmitter as drawn on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorPoint {
    pub pixel: GridPoint,
    pub label: String,
}

/// One observation as drawn on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanPoint {
    pub pixel: GridPoint,
    pub rssi: i32,
    pub label: String,
}

use serde::Deserialize;

use crate::heatmap::error::{Axis, HeatmapError};
use crate::heatmap::types::{Coordinate, GridPoint};

/// What to do with an axis along which every coordinate is identical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateAxis {
    /// Give the axis zero pixel extent and center it on the canvas.
    #[default]
    Center,
    /// Fail with [`HeatmapError::DegenerateGeometry`].
    Reject,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub anchor: GridPoint,
    pub points: Vec<GridPoint>,
}

/// Maps coordinates onto a square canvas, north up, keeping the real-world aspect
/// ratio and centering the shorter extent.
#[derive(Debug, Clone, Copy)]
pub struct GridProjector {
    canvas_size: u32,
    border: u32,
    degenerate: DegenerateAxis,
}

/// One axis of the bounding box. `from` maps to pixel 0 and `to` to the full extent,
/// so latitude runs from its maximum to its minimum.
#[derive(Debug, Clone, Copy)]
struct Span {
    from: f64,
    to: f64,
}

impl Span {
    fn delta(&self) -> f64 {
        self.to - self.from
    }

    fn ratio(&self, value: f64) -> f64 {
        let delta = self.delta();
        if delta == 0.0 {
            0.0
        } else {
            ((value - self.from) / delta).abs()
        }
    }
}

impl GridProjector {
    pub fn new(
        canvas_size: u32,
        border: u32,
        degenerate: DegenerateAxis,
    ) -> Result<Self, HeatmapError> {
        if canvas_size <= border.saturating_mul(2) {
            return Err(HeatmapError::CanvasTooSmall {
                canvas_size,
                border,
            });
        }
        Ok(Self {
            canvas_size,
            border,
            degenerate,
        })
    }

    pub fn canvas_size(&self) -> u32 {
        self.canvas_size
    }

    pub fn project(
        &self,
        anchor: Coordinate,
        points: &[Coordinate],
    ) -> Result<Projection, HeatmapError> {
        if points.is_empty() {
            return Err(HeatmapError::NoPoints);
        }
        if let Some(bad) = std::iter::once(&anchor)
            .chain(points)
            .find(|c| !c.is_finite())
        {
            return Err(HeatmapError::NonFiniteCoordinate(*bad));
        }

        let size = (self.canvas_size - 2 * self.border) as f64;
        let all = || std::iter::once(&anchor).chain(points);

        let longitude = Span {
            from: all().map(|c| c.longitude).fold(f64::INFINITY, f64::min),
            to: all().map(|c| c.longitude).fold(f64::NEG_INFINITY, f64::max),
        };
        // inverted so that pixel rows grow southwards
        let latitude = Span {
            from: all().map(|c| c.latitude).fold(f64::NEG_INFINITY, f64::max),
            to: all().map(|c| c.latitude).fold(f64::INFINITY, f64::min),
        };

        for (axis, span) in [(Axis::Longitude, longitude), (Axis::Latitude, latitude)] {
            if span.delta() == 0.0 {
                match self.degenerate {
                    DegenerateAxis::Reject => return Err(HeatmapError::DegenerateGeometry(axis)),
                    DegenerateAxis::Center => {
                        log::debug!("all points share the same {}, centering that axis", axis)
                    }
                }
            }
        }

        let (x_axis, y_axis) = axis_extents(size, longitude.delta(), latitude.delta());
        // the longer axis spans `size`, so this centers the shorter one
        let x_padding = ((size - x_axis) / 2.0).max(0.0);
        let y_padding = ((size - y_axis) / 2.0).max(0.0);
        let border = self.border as f64;

        let to_pixel = |c: &Coordinate| {
            GridPoint::new(
                (border + x_padding + longitude.ratio(c.longitude) * x_axis) as i32,
                (border + y_padding + latitude.ratio(c.latitude) * y_axis) as i32,
            )
        };

        Ok(Projection {
            anchor: to_pixel(&anchor),
            points: points.iter().map(to_pixel).collect(),
        })
    }
}

/// Pixel extents of the longitude and latitude axes. The wider geographic extent
/// spans the full drawing size; a zero-spread axis gets zero extent.
fn axis_extents(size: f64, delta_longitude: f64, delta_latitude: f64) -> (f64, f64) {
    match (delta_longitude == 0.0, delta_latitude == 0.0) {
        (true, true) => (0.0, 0.0),
        (false, true) => (size, 0.0),
        (true, false) => (0.0, size),
        (false, false) => {
            let aspect_ratio = (delta_longitude / delta_latitude).abs();
            if aspect_ratio > 1.0 {
                (size, size / aspect_ratio)
            } else {
                (size * aspect_ratio, size)
            }
        }
    }
}

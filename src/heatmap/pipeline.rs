use std::io::Cursor;

use image::{ImageFormat, RgbImage};

use crate::heatmap::error::{GenerateError, HeatmapError};
use crate::heatmap::estimator::{estimate, MIN_SAMPLES};
use crate::heatmap::projector::GridProjector;
use crate::heatmap::renderer::HeatmapRenderer;
use crate::heatmap::types::{AnchorPoint, Coordinate, Estimate, ScanPoint, ScanSample};

/// Where the pipeline gets its observations from.
pub trait SampleSource {
    type Error;

    fn fetch_samples(&self, transmitter_id: &str) -> Result<Vec<ScanSample>, Self::Error>;
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub enum Heatmap {
    Rendered { estimate: Estimate, image: RgbImage },
    /// Fewer than two samples; the image only carries a message.
    Placeholder { image: RgbImage },
}

impl Heatmap {
    pub fn image(&self) -> &RgbImage {
        match self {
            Heatmap::Rendered { image, .. } | Heatmap::Placeholder { image } => image,
        }
    }

    pub fn estimate(&self) -> Option<Estimate> {
        match self {
            Heatmap::Rendered { estimate, .. } => Some(*estimate),
            Heatmap::Placeholder { .. } => None,
        }
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, HeatmapError> {
        let mut bytes = Vec::new();
        self.image()
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

/// Samples in, image out: estimate, project, render.
pub struct EstimationPipeline {
    projector: GridProjector,
    renderer: HeatmapRenderer,
}

impl EstimationPipeline {
    pub fn new(projector: GridProjector, renderer: HeatmapRenderer) -> Self {
        Self {
            projector,
            renderer,
        }
    }

    pub fn run(&self, samples: &[ScanSample]) -> Result<Heatmap, HeatmapError> {
        if samples.len() < MIN_SAMPLES {
            log::info!(
                "{} sample(s) is not enough for a heatmap, rendering placeholder",
                samples.len()
            );
            return Ok(Heatmap::Placeholder {
                image: self.renderer.render_placeholder(),
            });
        }

        let estimate = estimate(samples)?;
        let locations: Vec<Coordinate> = samples.iter().map(|s| s.location).collect();
        let projection = self.projector.project(estimate.coordinate(), &locations)?;

        let anchor = AnchorPoint {
            pixel: projection.anchor,
            label: format!("Access Point\n{}", estimate),
        };
        let scans: Vec<ScanPoint> = samples
            .iter()
            .zip(projection.points)
            .map(|(sample, pixel)| ScanPoint {
                pixel,
                rssi: sample.signal_strength,
                label: sample.label(),
            })
            .collect();

        let image = self
            .renderer
            .render(&anchor, &scans, self.projector.canvas_size());
        Ok(Heatmap::Rendered { estimate, image })
    }

    /// Fetch the samples of one transmitter and run the pipeline over them.
    pub fn generate_heatmap<S: SampleSource>(
        &self,
        source: &S,
        transmitter_id: &str,
    ) -> Result<Heatmap, GenerateError<S::Error>> {
        let samples = source
            .fetch_samples(transmitter_id)
            .map_err(GenerateError::Source)?;
        log::debug!(
            "generating heatmap for {} from {} samples",
            transmitter_id,
            samples.len()
        );
        Ok(self.run(&samples)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heatmap::gradient::ColorGradient;
    use crate::heatmap::projector::DegenerateAxis;
    use crate::heatmap::renderer::{bundled_font, RenderStyle};
    use std::cell::Cell;

    fn pipeline(degenerate: DegenerateAxis) -> EstimationPipeline {
        EstimationPipeline::new(
            GridProjector::new(400, 20, degenerate).unwrap(),
            HeatmapRenderer::new(
                ColorGradient::default(),
                RenderStyle::default(),
                bundled_font().unwrap(),
            ),
        )
    }

    fn sample(rssi: i32, lat: f64, lon: f64) -> ScanSample {
        ScanSample {
            signal_strength: rssi,
            location: Coordinate::new(lat, lon),
            sequence_number: 1,
            observed_at: 1_700_000_000,
        }
    }

    struct CountingSource {
        samples: Vec<ScanSample>,
        calls: Cell<usize>,
    }

    impl SampleSource for CountingSource {
        type Error = String;

        fn fetch_samples(&self, transmitter_id: &str) -> Result<Vec<ScanSample>, String> {
            self.calls.set(self.calls.get() + 1);
            if transmitter_id == "known" {
                Ok(self.samples.clone())
            } else {
                Err(format!("unknown transmitter {}", transmitter_id))
            }
        }
    }

    #[test]
    fn two_samples_render_with_expected_estimate() {
        let samples = [sample(-40, 10.0, 20.0), sample(-80, 10.001, 20.001)];
        let heatmap = pipeline(DegenerateAxis::Center).run(&samples).unwrap();
        let estimate = heatmap.estimate().expect("rendered");
        assert!((estimate.latitude - 10.00025).abs() < 1e-9);
        assert!((estimate.longitude - 20.00025).abs() < 1e-9);
        assert_eq!(heatmap.image().dimensions(), (400, 500));
    }

    #[test]
    fn too_few_samples_give_placeholder() {
        let p = pipeline(DegenerateAxis::Center);
        for samples in [vec![], vec![sample(-40, 10.0, 20.0)]] {
            let heatmap = p.run(&samples).unwrap();
            assert!(matches!(heatmap, Heatmap::Placeholder { .. }));
            assert_eq!(heatmap.image().dimensions(), (500, 600));
        }
    }

    #[test]
    fn placeholder_path_skips_estimation_and_projection() {
        // a non-finite location would fail projection if it were attempted
        let samples = [sample(-40, f64::NAN, f64::INFINITY)];
        let heatmap = pipeline(DegenerateAxis::Reject).run(&samples).unwrap();
        assert!(matches!(heatmap, Heatmap::Placeholder { .. }));
    }

    #[test]
    fn identical_locations_still_render() {
        let samples = [sample(-40, 48.5, 9.25), sample(-70, 48.5, 9.25)];
        let heatmap = pipeline(DegenerateAxis::Center).run(&samples).unwrap();
        match heatmap {
            Heatmap::Rendered { estimate, image } => {
                assert_eq!(estimate.coordinate(), Coordinate::new(48.5, 9.25));
                assert_eq!(image.dimensions(), (400, 500));
            }
            Heatmap::Placeholder { .. } => panic!("expected a rendered heatmap"),
        }
    }

    #[test]
    fn identical_locations_fail_under_reject_policy() {
        let samples = [sample(-40, 48.5, 9.25), sample(-70, 48.5, 9.25)];
        let err = pipeline(DegenerateAxis::Reject).run(&samples).unwrap_err();
        assert!(matches!(err, HeatmapError::DegenerateGeometry(_)));
    }

    #[test]
    fn generate_heatmap_fetches_once_and_encodes_png() {
        let source = CountingSource {
            samples: vec![sample(-40, 10.0, 20.0), sample(-80, 10.001, 20.001)],
            calls: Cell::new(0),
        };
        let heatmap = pipeline(DegenerateAxis::Center)
            .generate_heatmap(&source, "known")
            .unwrap();
        assert_eq!(source.calls.get(), 1);

        let png = heatmap.encode_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (400, 500));
    }

    #[test]
    fn generate_heatmap_reports_source_errors() {
        let source = CountingSource {
            samples: Vec::new(),
            calls: Cell::new(0),
        };
        let err = pipeline(DegenerateAxis::Center)
            .generate_heatmap(&source, "missing")
            .unwrap_err();
        assert!(matches!(err, GenerateError::Source(ref msg) if msg.contains("missing")));
    }
}

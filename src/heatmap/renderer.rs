use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut, text_size,
};
use imageproc::rect::Rect;

use crate::heatmap::error::HeatmapError;
use crate::heatmap::gradient::ColorGradient;
use crate::heatmap::types::{AnchorPoint, GridPoint, ScanPoint};

pub const PLACEHOLDER_MESSAGE: &str = "Not Enough Data to Generate Heatmap";

/// Fixed colors and sizes of the heatmap layers.
#[derive(Debug, Clone)]
pub struct RenderStyle {
    pub background: Rgb<u8>,
    pub scan_marker: Rgb<u8>,
    pub anchor_marker: Rgb<u8>,
    pub scale_text: Rgb<u8>,
    pub placeholder_text: Rgb<u8>,
    pub marker_radius: i32,
    pub label_offset: i32,
    pub font_size: f32,
    /// Extra rows below the square canvas holding the scale guide.
    pub scale_band: u32,
    pub placeholder_size: u32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: Rgb([255, 255, 255]),
            scan_marker: Rgb([102, 51, 153]),
            anchor_marker: Rgb([50, 50, 50]),
            scale_text: Rgb([50, 50, 50]),
            placeholder_text: Rgb([0, 0, 0]),
            marker_radius: 5,
            label_offset: 10,
            font_size: 20.0,
            scale_band: 100,
            placeholder_size: 500,
        }
    }
}

static BUNDLED_FONT: &[u8] = include_bytes!("../../assets/DejaVuSansMono.ttf");

/// DejaVu Sans Mono, compiled into the binary.
pub fn bundled_font() -> Result<FontArc, HeatmapError> {
    FontArc::try_from_slice(BUNDLED_FONT).map_err(|e| HeatmapError::Font {
        path: String::from("<bundled>"),
        message: e.to_string(),
    })
}

/// Load a TrueType/OpenType font for labels.
pub fn load_font(path: &Path) -> Result<FontArc, HeatmapError> {
    let font_error = |message: String| HeatmapError::Font {
        path: path.display().to_string(),
        message,
    };
    let bytes = std::fs::read(path).map_err(|e| font_error(e.to_string()))?;
    FontArc::try_from_vec(bytes).map_err(|e| font_error(e.to_string()))
}

/// A filled disk around the anchor reaching out to one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatCircle {
    pub radius: u32,
    /// `-rssi`: larger means a weaker reading.
    pub weakness: i32,
}

impl HeatCircle {
    pub fn new(anchor: &GridPoint, scan: &ScanPoint) -> Self {
        Self {
            radius: anchor.distance_to(&scan.pixel),
            weakness: -scan.rssi,
        }
    }
}

/// Painter's order for heat circles: weakest reading first so that stronger readings
/// end up on top. Equal readings paint the larger circle first.
pub fn sort_by_descending_weakness(circles: &mut [HeatCircle]) {
    circles.sort_by(|a, b| {
        b.weakness
            .cmp(&a.weakness)
            .then_with(|| b.radius.cmp(&a.radius))
    });
}

pub struct HeatmapRenderer {
    gradient: ColorGradient,
    style: RenderStyle,
    font: FontArc,
}

impl HeatmapRenderer {
    pub fn new(gradient: ColorGradient, style: RenderStyle, font: FontArc) -> Self {
        Self {
            gradient,
            style,
            font,
        }
    }

    /// Draw the full heatmap: heat circles, scan markers, the anchor and the scale guide.
    /// The returned image is `canvas_size` wide and `canvas_size + scale_band` tall.
    pub fn render(&self, anchor: &AnchorPoint, scans: &[ScanPoint], canvas_size: u32) -> RgbImage {
        let mut canvas = RgbImage::from_pixel(
            canvas_size,
            canvas_size + self.style.scale_band,
            self.style.background,
        );

        self.draw_heat_circles(&mut canvas, anchor, scans);
        for scan in scans {
            self.draw_marker(&mut canvas, &scan.pixel, &scan.label, self.style.scan_marker);
        }
        self.draw_marker(
            &mut canvas,
            &anchor.pixel,
            &anchor.label,
            self.style.anchor_marker,
        );
        self.draw_scale_guide(&mut canvas);

        canvas
    }

    /// Fixed-size canvas carrying only the "not enough data" message.
    pub fn render_placeholder(&self) -> RgbImage {
        let size = self.style.placeholder_size;
        let mut canvas =
            RgbImage::from_pixel(size, size + self.style.scale_band, self.style.background);
        let center = (size / 2) as i32;
        self.draw_centered_text(
            &mut canvas,
            PLACEHOLDER_MESSAGE,
            center,
            center,
            self.style.placeholder_text,
            true,
        );
        canvas
    }

    fn draw_heat_circles(&self, canvas: &mut RgbImage, anchor: &AnchorPoint, scans: &[ScanPoint]) {
        let mut circles: Vec<HeatCircle> = scans
            .iter()
            .map(|scan| HeatCircle::new(&anchor.pixel, scan))
            .collect();
        sort_by_descending_weakness(&mut circles);

        let center = (anchor.pixel.x, anchor.pixel.y);
        for circle in circles {
            let color = self.gradient.color_for(circle.weakness as f64);
            draw_filled_circle_mut(canvas, center, circle.radius as i32, color);
        }
    }

    fn draw_marker(&self, canvas: &mut RgbImage, at: &GridPoint, label: &str, color: Rgb<u8>) {
        draw_filled_circle_mut(canvas, (at.x, at.y), self.style.marker_radius, color);
        self.draw_label(canvas, at.x + self.style.label_offset, at.y, label, color);
    }

    /// Multi-line text, left edge at `x`, first baseline at `baseline`.
    fn draw_label(&self, canvas: &mut RgbImage, x: i32, baseline: i32, text: &str, color: Rgb<u8>) {
        let font = &self.font;
        let scale = PxScale::from(self.style.font_size);
        let scaled = font.as_scaled(scale);
        let ascent = scaled.ascent().ceil() as i32;
        let line_height = (scaled.height() + scaled.line_gap()).ceil() as i32;

        for (i, line) in text.lines().enumerate() {
            let top = baseline - ascent + i as i32 * line_height;
            draw_text_mut(canvas, color, x, top, scale, font, line);
        }
    }

    /// Single-line text horizontally centered on `x`. With `middle` the text is also
    /// vertically centered on `y`, otherwise its top sits at `y`.
    fn draw_centered_text(
        &self,
        canvas: &mut RgbImage,
        text: &str,
        x: i32,
        y: i32,
        color: Rgb<u8>,
        middle: bool,
    ) {
        let font = &self.font;
        let scale = PxScale::from(self.style.font_size);
        let (width, height) = text_size(scale, font, text);
        let left = x - width as i32 / 2;
        let top = if middle { y - height as i32 / 2 } else { y };
        draw_text_mut(canvas, color, left, top, scale, font, text);
    }

    /// Gradient bar across the reserved bottom band with 0, -50 and -100 dBm ticks.
    fn draw_scale_guide(&self, canvas: &mut RgbImage) {
        let (width, height) = canvas.dimensions();
        let band = self.style.scale_band;
        let band_top = height.saturating_sub(band);

        draw_filled_rect_mut(
            canvas,
            Rect::at(0, band_top as i32).of_size(width, band),
            self.style.background,
        );

        let bar_width = width.saturating_sub(40);
        let bar_top = height as f32 - 80.0;
        let bar_bottom = height as f32 - 30.0;
        for i in 0..bar_width {
            let percent = ((i as f64 / bar_width as f64) * 100.0).trunc();
            let x = (i + 20) as f32;
            draw_line_segment_mut(
                canvas,
                (x, bar_top),
                (x, bar_bottom),
                self.gradient.color_for(percent),
            );
        }

        let text_top = height as i32 - 25;
        let ticks = [
            ("0 dBm", 40),
            ("-50 dBm", width as i32 / 2),
            ("-100 dBm", width as i32 - 40),
        ];
        for (text, x) in ticks {
            self.draw_centered_text(canvas, text, x, text_top, self.style.scale_text, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ops::Range;

    fn renderer() -> HeatmapRenderer {
        HeatmapRenderer::new(
            ColorGradient::default(),
            RenderStyle::default(),
            bundled_font().unwrap(),
        )
    }

    fn scan(x: i32, y: i32, rssi: i32) -> ScanPoint {
        ScanPoint {
            pixel: GridPoint::new(x, y),
            rssi,
            label: String::from("scan"),
        }
    }

    fn inked(image: &RgbImage, xs: Range<u32>, ys: Range<u32>) -> usize {
        let background = RenderStyle::default().background;
        ys.flat_map(|y| xs.clone().map(move |x| (x, y)))
            .filter(|&(x, y)| *image.get_pixel(x, y) != background)
            .count()
    }

    #[test]
    fn weakest_circle_is_painted_first() {
        let mut circles = vec![
            HeatCircle {
                radius: 10,
                weakness: 40,
            },
            HeatCircle {
                radius: 300,
                weakness: 90,
            },
            HeatCircle {
                radius: 50,
                weakness: 60,
            },
            HeatCircle {
                radius: 80,
                weakness: 60,
            },
        ];
        sort_by_descending_weakness(&mut circles);
        let order: Vec<(i32, u32)> = circles.iter().map(|c| (c.weakness, c.radius)).collect();
        assert_eq!(order, vec![(90, 300), (60, 80), (60, 50), (40, 10)]);
    }

    #[test]
    fn heat_circle_uses_distance_and_negated_rssi() {
        let circle = HeatCircle::new(&GridPoint::new(100, 100), &scan(103, 104, -72));
        assert_eq!(circle.radius, 5);
        assert_eq!(circle.weakness, 72);
    }

    #[test]
    fn rendered_canvas_reserves_scale_band() {
        let anchor = AnchorPoint {
            pixel: GridPoint::new(200, 200),
            label: String::from("Access Point"),
        };
        let image = renderer().render(&anchor, &[scan(100, 200, -40)], 400);
        assert_eq!(image.dimensions(), (400, 500));
    }

    #[test]
    fn strong_circle_stays_visible_over_weak_one() {
        let anchor = AnchorPoint {
            pixel: GridPoint::new(200, 200),
            label: String::new(),
        };
        // the weak reading is nearer, so without ordering its disk would cover the strong one
        let scans = [scan(300, 200, -20), scan(250, 200, -90)];
        let image = renderer().render(&anchor, &scans, 400);

        let strong = ColorGradient::default().color_for(20.0);
        // between the weak radius (50) and the strong radius (100)
        assert_eq!(*image.get_pixel(280, 200), strong);
        // inside the weak radius the strong disk was painted last
        assert_eq!(*image.get_pixel(230, 200), strong);
    }

    #[test]
    fn markers_are_drawn_over_circles() {
        let anchor = AnchorPoint {
            pixel: GridPoint::new(200, 200),
            label: String::new(),
        };
        let style = RenderStyle::default();
        let image = renderer().render(&anchor, &[scan(300, 200, -50)], 400);
        assert_eq!(*image.get_pixel(300, 200), style.scan_marker);
        assert_eq!(*image.get_pixel(200, 200), style.anchor_marker);
    }

    #[test]
    fn scale_guide_runs_from_strong_to_weak() {
        let anchor = AnchorPoint {
            pixel: GridPoint::new(200, 200),
            label: String::new(),
        };
        let gradient = ColorGradient::default();
        let background = RenderStyle::default().background;
        let image = renderer().render(&anchor, &[scan(210, 200, -50)], 400);
        let row = 500 - 50;
        assert_eq!(*image.get_pixel(20, row), gradient.color_for(0.0));
        assert_eq!(*image.get_pixel(20 + 180, row), gradient.color_for(50.0));
        assert_eq!(*image.get_pixel(20 + 359, row), gradient.color_for(99.0));
        // outside the bar the band is background
        assert_eq!(*image.get_pixel(5, row), background);
        assert_eq!(*image.get_pixel(200, 500 - 90), background);
    }

    #[test]
    fn label_sits_right_of_marker_with_baseline_on_its_row() {
        let style = RenderStyle::default();
        let mut canvas = RgbImage::from_pixel(400, 300, style.background);
        renderer().draw_marker(
            &mut canvas,
            &GridPoint::new(100, 100),
            "Access Point\n(10, 20)",
            style.scan_marker,
        );

        // first line ends on the marker row, second line one line below
        assert!(inked(&canvas, 110..300, 80..105) > 50);
        assert!(inked(&canvas, 110..300, 105..127) > 50);
        // left of the dot and above the first line stay blank
        assert_eq!(inked(&canvas, 0..94, 0..300), 0);
        assert_eq!(inked(&canvas, 0..400, 0..78), 0);
        // below the dot, before the label's left edge
        assert_eq!(inked(&canvas, 94..107, 106..300), 0);
    }

    #[test]
    fn scale_ticks_are_centered_below_the_bar() {
        let anchor = AnchorPoint {
            pixel: GridPoint::new(200, 200),
            label: String::new(),
        };
        let image = renderer().render(&anchor, &[scan(210, 200, -50)], 400);

        for center in [40u32, 200, 360] {
            assert!(
                inked(&image, center - 20..center + 20, 475..500) > 20,
                "no tick text around x={}",
                center
            );
        }
        // between the bar's bottom row and the text top
        assert_eq!(inked(&image, 0..400, 471..475), 0);
        // gaps between the three ticks
        assert_eq!(inked(&image, 80..150, 471..500), 0);
        assert_eq!(inked(&image, 250..305, 471..500), 0);
    }

    #[test]
    fn placeholder_shows_centered_message() {
        let image = renderer().render_placeholder();
        assert_eq!(image.dimensions(), (500, 600));

        assert!(inked(&image, 50..250, 230..270) > 50);
        assert!(inked(&image, 250..450, 230..270) > 50);
        assert_eq!(inked(&image, 0..500, 0..220), 0);
        assert_eq!(inked(&image, 0..500, 280..600), 0);
        assert_eq!(inked(&image, 0..40, 0..600), 0);
        assert_eq!(inked(&image, 460..500, 0..600), 0);
    }
}

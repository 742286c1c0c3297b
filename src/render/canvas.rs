//! Frame rasterization using tiny-skia
//!
//! One [`Canvas`] is allocated for the whole run and repainted per frame.

use anyhow::{Context, Result};
use geo_types::Coord;
use image::RgbaImage;
use tiny_skia::{Color, FillRule, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::geometry::{FrameGeometry, FrameTransform};

/// Colors and stroke used to paint a frame, RGBA with straight alpha
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStyle {
    pub background: [u8; 4],
    pub ocean: [u8; 4],
    pub outline: [u8; 4],
    pub land: [u8; 4],
    pub border: [u8; 4],
    /// Stroke width in canvas pixels
    pub stroke_width: f32,
}

/// Reusable true-color drawing surface
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    pub fn new(size: u32) -> Result<Self> {
        let pixmap = Pixmap::new(size, size)
            .with_context(|| format!("Failed to allocate a {}x{} canvas", size, size))?;
        Ok(Self { pixmap })
    }

    pub fn size(&self) -> u32 {
        self.pixmap.width()
    }

    /// Paint one frame: background, ocean disk, then every land sub-path
    pub fn paint(&mut self, geometry: &FrameGeometry, frame: &FrameTransform, style: &FrameStyle) {
        let [r, g, b, a] = style.background;
        self.pixmap.fill(Color::from_rgba8(r, g, b, a));

        let transform = frame.to_skia();
        // Stroke widths are given in pixels but applied in plane units
        let stroke = Stroke {
            width: (style.stroke_width as f64 / frame.scale()) as f32,
            line_join: LineJoin::Round,
            ..Default::default()
        };

        self.fill_and_stroke(
            &geometry.outline,
            style.ocean,
            style.outline,
            &stroke,
            transform,
        );

        for sub_path in geometry.features.iter().flatten() {
            self.fill_and_stroke(sub_path, style.land, style.border, &stroke, transform);
        }
    }

    fn fill_and_stroke(
        &mut self,
        points: &[Coord<f64>],
        fill: [u8; 4],
        stroke_color: [u8; 4],
        stroke: &Stroke,
        transform: Transform,
    ) {
        let Some(path) = build_closed_path(points) else {
            return;
        };

        let mut paint = Paint::default();
        paint.anti_alias = true;

        let [r, g, b, a] = fill;
        paint.set_color_rgba8(r, g, b, a);
        self.pixmap
            .fill_path(&path, &paint, FillRule::EvenOdd, transform, None);

        let [r, g, b, a] = stroke_color;
        paint.set_color_rgba8(r, g, b, a);
        self.pixmap.stroke_path(&path, &paint, stroke, transform, None);
    }

    /// Copy the current frame out with straight alpha
    pub fn to_rgba_image(&self) -> Result<RgbaImage> {
        let data: Vec<u8> = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let c = pixel.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        RgbaImage::from_raw(self.pixmap.width(), self.pixmap.height(), data)
            .context("Canvas buffer does not match its dimensions")
    }
}

/// Closed path through `points`; `None` when there is nothing to draw
fn build_closed_path(points: &[Coord<f64>]) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;

    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for point in rest {
        pb.line_to(point.x as f32, point.y as f32);
    }
    pb.close();
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::WGS84_SEMI_MAJOR;

    const STYLE: FrameStyle = FrameStyle {
        background: [255, 255, 255, 0],
        ocean: [0x00, 0x66, 0xff, 0xff],
        outline: [0, 0, 0, 0xff],
        land: [0x00, 0x88, 0x22, 0xff],
        border: [0x22, 0x22, 0x22, 0xff],
        stroke_width: 1.0,
    };

    fn square(center: (f64, f64), half: f64) -> Vec<Coord<f64>> {
        vec![
            Coord {
                x: center.0 - half,
                y: center.1 - half,
            },
            Coord {
                x: center.0 + half,
                y: center.1 - half,
            },
            Coord {
                x: center.0 + half,
                y: center.1 + half,
            },
            Coord {
                x: center.0 - half,
                y: center.1 + half,
            },
        ]
    }

    fn disk() -> Vec<Coord<f64>> {
        (0..72)
            .map(|i| {
                let t = (i as f64 * 5.0).to_radians();
                Coord {
                    x: WGS84_SEMI_MAJOR * t.cos(),
                    y: WGS84_SEMI_MAJOR * t.sin(),
                }
            })
            .collect()
    }

    #[test]
    fn test_paint_order_and_colors() {
        let mut canvas = Canvas::new(64).unwrap();
        let frame = FrameTransform::new(64, WGS84_SEMI_MAJOR);
        // Land square in the upper-right quadrant of the plane
        let land = square((3_000_000.0, 3_000_000.0), 1_000_000.0);
        let geometry = FrameGeometry {
            outline: disk(),
            features: vec![vec![land]],
        };
        canvas.paint(&geometry, &frame, &STYLE);
        let img = canvas.to_rgba_image().unwrap();

        // Corner stays background
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
        // Center of the disk is ocean
        assert_eq!(img.get_pixel(32, 32).0, [0x00, 0x66, 0xff, 0xff]);
        // Land is drawn above the ocean; plane up-right is canvas top-right
        let (x, y) = frame.to_canvas(&Coord {
            x: 3_000_000.0,
            y: 3_000_000.0,
        });
        assert_eq!(img.get_pixel(x as u32, y as u32).0, [0x00, 0x88, 0x22, 0xff]);
    }

    #[test]
    fn test_outline_path_is_closed_for_every_rotation() {
        use crate::domain::Sweep;
        use crate::projection::{Projector, SearchPath};
        use crate::render::geometry::{build_frame, outline};
        use tiny_skia::PathVerb;

        let projector = Projector::new("+init=epsg:4326", SearchPath::default()).unwrap();
        let frame = FrameTransform::new(192, WGS84_SEMI_MAJOR);
        for rotation in Sweep::default().rotations() {
            let transformation = projector.for_rotation(rotation.center_lon_deg).unwrap();
            let geometry = build_frame(&[], rotation, &transformation, &frame).unwrap();
            let path = build_closed_path(&geometry.outline).unwrap();

            let verbs = path.verbs();
            assert_eq!(verbs.len(), outline::POINTS + 1);
            assert_eq!(verbs.first(), Some(&PathVerb::Move));
            assert_eq!(verbs.last(), Some(&PathVerb::Close));
            assert_eq!(path.points().len(), outline::POINTS);
        }
    }

    #[test]
    fn test_repaint_clears_previous_frame() {
        let mut canvas = Canvas::new(32).unwrap();
        let frame = FrameTransform::new(32, WGS84_SEMI_MAJOR);
        let full = FrameGeometry {
            outline: disk(),
            features: Vec::new(),
        };
        canvas.paint(&full, &frame, &STYLE);
        canvas.paint(&FrameGeometry::default(), &frame, &STYLE);
        let img = canvas.to_rgba_image().unwrap();
        assert!(img.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_degenerate_paths_are_skipped() {
        assert!(build_closed_path(&[]).is_none());
        let single = [Coord { x: 1.0, y: 1.0 }];
        let mut canvas = Canvas::new(8).unwrap();
        let frame = FrameTransform::new(8, WGS84_SEMI_MAJOR);
        let geometry = FrameGeometry {
            outline: Vec::new(),
            features: vec![vec![single.to_vec()]],
        };
        canvas.paint(&geometry, &frame, &STYLE);
        assert_eq!(canvas.size(), 8);
    }
}

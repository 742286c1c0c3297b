//! Per-frame geometry
//!
//! Builds everything a frame draws for one rotation: the globe outline and
//! the visible sub-paths of every feature ring, in plane coordinates.

use anyhow::{Context, Result};
use geo_types::Coord;
use tiny_skia::Transform;

use crate::domain::{self, Feature, Ring, Rotation};
use crate::projection::Transformation;

/// Globe outline constants
pub mod outline {
    /// Latitude sampling step in degrees
    pub const LAT_STEP_DEG: f64 = 5.0;
    /// Points traced up the eastern meridian, poles included
    pub const EAST_POINTS: usize = 37;
    /// Points traced down the western meridian, south pole excluded
    pub const WEST_POINTS: usize = 36;
    /// Total outline points for every rotation
    pub const POINTS: usize = EAST_POINTS + WEST_POINTS;
}

/// Mapping from plane meters to canvas pixels for one frame.
///
/// The canvas origin sits at its center, the full sphere diameter spans the
/// canvas, and plane "up" is canvas "up".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTransform {
    half_size: f64,
    scale: f64,
}

impl FrameTransform {
    pub fn new(canvas_size: u32, radius: f64) -> Self {
        let size = canvas_size as f64;
        Self {
            half_size: size / 2.0,
            scale: size / (2.0 * radius),
        }
    }

    /// Pixels per plane meter
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Canvas position of a plane point
    pub fn to_canvas(&self, point: &Coord<f64>) -> (f64, f64) {
        (
            self.half_size + point.x * self.scale,
            self.half_size - point.y * self.scale,
        )
    }

    /// Integer pixel a plane point rounds to
    pub fn pixel(&self, point: &Coord<f64>) -> (i64, i64) {
        let (x, y) = self.to_canvas(point);
        (x.round() as i64, y.round() as i64)
    }

    pub fn to_skia(&self) -> Transform {
        Transform::from_row(
            self.scale as f32,
            0.0,
            0.0,
            -self.scale as f32,
            self.half_size as f32,
            self.half_size as f32,
        )
    }
}

/// Projected geometry of one frame, in paint order
#[derive(Clone, Debug, Default)]
pub struct FrameGeometry {
    /// Globe silhouette, drawn closed
    pub outline: Ring,
    /// Drawable sub-paths, grouped per feature in source order
    pub features: Vec<Vec<Ring>>,
}

impl FrameGeometry {
    pub fn sub_path_count(&self) -> usize {
        self.features.iter().map(Vec::len).sum()
    }
}

/// Unprojected globe outline (radians) for a view centered on `center_lon_deg`.
///
/// Traces the meridian 90° east of the center from the south pole to the
/// north pole, then the meridian 90° west back down, stopping one step short
/// of the south pole.
pub fn globe_outline(center_lon_deg: f64) -> Ring {
    let east = (center_lon_deg + 90.0).to_radians();
    let west = (center_lon_deg - 90.0).to_radians();

    let up = (0..outline::EAST_POINTS).map(|i| Coord {
        x: east,
        y: (-90.0 + i as f64 * outline::LAT_STEP_DEG).to_radians(),
    });
    let down = (0..outline::WEST_POINTS).map(|i| Coord {
        x: west,
        y: (90.0 - i as f64 * outline::LAT_STEP_DEG).to_radians(),
    });
    up.chain(down).collect()
}

/// Split a projected ring at hidden points.
///
/// Every maximal run of visible points becomes one sub-path; no sub-path
/// bridges a hidden run. An all-hidden ring yields nothing.
pub fn split_visible(ring: &[Coord<f64>]) -> Vec<&[Coord<f64>]> {
    ring.split(|p| !domain::is_visible(p))
        .filter(|run| !run.is_empty())
        .collect()
}

/// Drop consecutive points that fall into the same pixel cell as the last kept one
pub fn suppress_redundant(points: &[Coord<f64>], frame: &FrameTransform) -> Ring {
    let mut kept = Vec::with_capacity(points.len());
    let mut previous = None;
    for point in points {
        let cell = frame.pixel(point);
        if previous != Some(cell) {
            kept.push(*point);
            previous = Some(cell);
        }
    }
    kept
}

/// Project the outline and every feature ring for one rotation
pub fn build_frame(
    features: &[Feature],
    rotation: Rotation,
    transformation: &Transformation,
    frame: &FrameTransform,
) -> Result<FrameGeometry> {
    let mut outline = globe_outline(rotation.center_lon_deg);
    transformation
        .transform_points(&mut outline)
        .context("Failed to project globe outline")?;

    let mut projected = Vec::with_capacity(features.len());
    let mut scratch: Ring = Vec::new();
    for (index, feature) in features.iter().enumerate() {
        let mut sub_paths = Vec::new();
        for ring in feature.rings() {
            scratch.clear();
            scratch.extend_from_slice(ring);
            domain::to_radians(&mut scratch);
            transformation
                .transform_points(&mut scratch)
                .with_context(|| format!("Failed to project feature {}", feature.label(index)))?;

            let runs = split_visible(&scratch);
            if runs.is_empty() {
                log::debug!("Feature {} ring fully hidden", feature.label(index));
            }
            sub_paths.extend(runs.into_iter().map(|run| suppress_redundant(run, frame)));
        }
        projected.push(sub_paths);
    }

    Ok(FrameGeometry {
        outline,
        features: projected,
    })
}

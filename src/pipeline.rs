//! Sweep driver: one projected, painted and quantized frame per rotation

use anyhow::{Context, Result};

use crate::animation::AnimationSequence;
use crate::config::GlobeConfig;
use crate::domain::Feature;
use crate::palette::{Palette, Quantizer};
use crate::projection::{Projector, WGS84_SEMI_MAJOR};
use crate::render::{Canvas, FrameTransform, build_frame};

/// Render every rotation of the sweep, in sweep order
pub fn render_animation(
    features: &[Feature],
    config: &GlobeConfig,
    projector: &Projector,
    palette: &Palette,
) -> Result<AnimationSequence> {
    let size = config.canvas_size;
    let style = config.frame_style();
    let frame = FrameTransform::new(size, WGS84_SEMI_MAJOR);

    let mut canvas = Canvas::new(size)?;
    let mut quantizer = Quantizer::new(palette);
    let mut sequence = AnimationSequence::with_capacity(size, size, config.sweep.len());

    for (step, rotation) in config.sweep.rotations().enumerate() {
        let lon = rotation.center_lon_deg;
        let transformation = projector
            .for_rotation(lon)
            .with_context(|| format!("Failed to set up projection for longitude {}", lon))?;

        let geometry = build_frame(features, rotation, &transformation, &frame)
            .with_context(|| format!("Failed to build frame {} (longitude {})", step, lon))?;
        log::trace!(
            "Frame {} at {}°: {} sub-paths",
            step,
            lon,
            geometry.sub_path_count()
        );

        canvas.paint(&geometry, &frame, &style);
        let image = canvas
            .to_rgba_image()
            .with_context(|| format!("Failed to read back frame {}", step))?;
        sequence.push(quantizer.quantize(&image), config.frame_delay)?;
    }

    Ok(sequence)
}

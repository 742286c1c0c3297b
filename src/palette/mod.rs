//! Palette quantization
//!
//! Every frame of the animation is mapped onto one fixed palette so the GIF
//! can carry a single global color table.

pub mod plan9;

use std::collections::HashMap;

use image::RgbaImage;

/// A fixed color table, RGBA entries
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<[u8; 4]>,
}

impl Palette {
    pub fn plan9() -> Self {
        Self {
            colors: plan9::colors().to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn color(&self, index: u8) -> Option<[u8; 4]> {
        self.colors.get(index as usize).copied()
    }

    /// Index of the entry closest to `rgba` by squared distance over all four
    /// channels. Ties go to the lowest index.
    pub fn nearest(&self, rgba: [u8; 4]) -> u8 {
        let mut best = 0usize;
        let mut best_sum = u32::MAX;
        for (i, entry) in self.colors.iter().enumerate() {
            let sum: u32 = rgba
                .iter()
                .zip(entry)
                .map(|(&a, &b)| {
                    let d = a as i32 - b as i32;
                    (d * d) as u32
                })
                .sum();
            if sum < best_sum {
                best = i;
                best_sum = sum;
                if sum == 0 {
                    break;
                }
            }
        }
        best as u8
    }

    /// Flat RGB triplets, the layout of a GIF color table
    pub fn rgb_table(&self) -> Vec<u8> {
        self.colors
            .iter()
            .flat_map(|&[r, g, b, _]| [r, g, b])
            .collect()
    }
}

/// Scale the color channels of a straight-alpha pixel by its alpha
pub fn premultiply([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    let scale = |c: u8| ((c as u32 * a as u32 + 127) / 255) as u8;
    [scale(r), scale(g), scale(b), a]
}

/// Fixed-size indexed-color raster
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteFrame {
    pub width: u32,
    pub height: u32,
    /// One palette index per pixel, row-major
    pub indices: Vec<u8>,
}

/// Nearest-color mapping onto a shared palette, no dithering. Pixels are
/// matched premultiplied, so partly covered pixels blend toward black.
pub struct Quantizer<'a> {
    palette: &'a Palette,
    cache: HashMap<[u8; 4], u8>,
}

impl<'a> Quantizer<'a> {
    pub fn new(palette: &'a Palette) -> Self {
        Self {
            palette,
            cache: HashMap::new(),
        }
    }

    pub fn quantize(&mut self, image: &RgbaImage) -> PaletteFrame {
        let palette = self.palette;
        let cache = &mut self.cache;
        let indices = image
            .pixels()
            .map(|pixel| {
                *cache
                    .entry(pixel.0)
                    .or_insert_with(|| palette.nearest(premultiply(pixel.0)))
            })
            .collect();
        PaletteFrame {
            width: image.width(),
            height: image.height(),
            indices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_colors_map_to_themselves() {
        let palette = Palette::plan9();
        assert_eq!(palette.len(), 256);
        for i in [0u8, 1, 17, 128, 255] {
            let color = palette.color(i).unwrap();
            assert_eq!(palette.nearest(color), i);
        }
    }

    #[test]
    fn test_transparent_maps_to_black() {
        let palette = Palette::plan9();
        assert_eq!(palette.nearest([0, 0, 0, 0]), 0);
    }

    #[test]
    fn test_partial_coverage_fades_toward_black() {
        let palette = Palette::plan9();
        assert_eq!(premultiply([0x00, 0x66, 0xff, 0x80]), [0, 51, 128, 0x80]);
        assert_eq!(premultiply([0x12, 0x34, 0x56, 0xff]), [0x12, 0x34, 0x56, 0xff]);

        // Half-covered ocean edge pixel
        let image = RgbaImage::from_pixel(1, 1, image::Rgba([0x00, 0x66, 0xff, 0x80]));
        let frame = Quantizer::new(&palette).quantize(&image);
        assert_eq!(frame.indices, vec![6]);
        assert_eq!(palette.color(6), Some([0x00, 0x44, 0x88, 0xff]));
        // Matching the straight color would pick a brighter blue
        assert_ne!(palette.nearest([0x00, 0x66, 0xff, 0x80]), 6);
    }

    #[test]
    fn test_rgb_table_layout() {
        let table = Palette::plan9().rgb_table();
        assert_eq!(table.len(), 768);
        assert_eq!(&table[765..], &[0xff, 0xff, 0xff]);
    }

    #[test]
    fn test_quantize_is_deterministic() {
        let palette = Palette::plan9();
        let image = RgbaImage::from_fn(16, 16, |x, y| {
            image::Rgba([(x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8, 0xff])
        });

        let first = Quantizer::new(&palette).quantize(&image);
        let mut quantizer = Quantizer::new(&palette);
        let second = quantizer.quantize(&image);
        let third = quantizer.quantize(&image);

        assert_eq!(first, second);
        assert_eq!(second, third);
        assert_eq!(first.indices.len(), 256);
        assert_eq!((first.width, first.height), (16, 16));
    }
}

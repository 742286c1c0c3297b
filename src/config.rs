//! Render settings

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::domain::Sweep;
use crate::render::FrameStyle;

/// RGBA color serialized as `#rrggbb` or `#rrggbbaa`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl HexColor {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to image crate RGBA format (0-255, straight alpha)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        let digits = text
            .strip_prefix('#')
            .ok_or_else(|| format!("color `{}` must start with '#'", text))?;
        if !matches!(digits.len(), 6 | 8) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("color `{}` is not #rrggbb or #rrggbbaa", text));
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).unwrap_or_default();
        Ok(Self {
            r: channel(0),
            g: channel(2),
            b: channel(4),
            a: if digits.len() == 8 { channel(6) } else { 0xff },
        })
    }
}

impl From<HexColor> for String {
    fn from(c: HexColor) -> Self {
        c.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// Colors of the painted layers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Colors {
    pub background: HexColor,
    pub ocean: HexColor,
    pub outline: HexColor,
    pub land: HexColor,
    pub border: HexColor,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            // Transparent white
            background: HexColor::rgba(0xff, 0xff, 0xff, 0x00),
            ocean: HexColor::rgba(0x00, 0x66, 0xff, 0xff),
            outline: HexColor::rgba(0x00, 0x00, 0x00, 0xff),
            land: HexColor::rgba(0x00, 0x88, 0x22, 0xff),
            border: HexColor::rgba(0x22, 0x22, 0x22, 0xff),
        }
    }
}

/// Settings for one render run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    /// Width and height of every frame in pixels
    pub canvas_size: u32,
    /// Center longitudes to render, one frame each
    pub sweep: Sweep,
    /// Delay after each frame in hundredths of a second
    pub frame_delay: u16,
    /// Stroke width in pixels for the outline and land borders
    pub stroke_width: f32,
    pub colors: Colors,
    /// proj.4 definition of the input coordinates
    pub source_crs: String,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            canvas_size: 192,
            sweep: Sweep::default(),
            frame_delay: 1,
            stroke_width: 1.0,
            colors: Colors::default(),
            source_crs: "+init=epsg:4326".to_string(),
        }
    }
}

impl GlobeConfig {
    /// Load settings from a JSON file, or return defaults when no file is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config {}", path.display()))?;
        log::debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1..=u16::MAX as u32).contains(&self.canvas_size),
            "canvas_size must be between 1 and {}, got {}",
            u16::MAX,
            self.canvas_size
        );
        ensure!(
            self.sweep.is_valid(),
            "sweep must step down from start_deg to end_deg by a positive step_deg \
             in at most {} frames, got {:?}",
            Sweep::MAX_STEPS,
            self.sweep
        );
        ensure!(
            self.stroke_width.is_finite() && self.stroke_width >= 0.0,
            "stroke_width must be a non-negative number, got {}",
            self.stroke_width
        );
        ensure!(!self.source_crs.trim().is_empty(), "source_crs is empty");
        Ok(())
    }

    pub fn frame_style(&self) -> FrameStyle {
        FrameStyle {
            background: self.colors.background.to_rgba_u8(),
            ocean: self.colors.ocean.to_rgba_u8(),
            outline: self.colors.outline.to_rgba_u8(),
            land: self.colors.land.to_rgba_u8(),
            border: self.colors.border.to_rgba_u8(),
            stroke_width: self.stroke_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GlobeConfig::default();
        assert_eq!(config.canvas_size, 192);
        assert_eq!(config.sweep.len(), 121);
        assert_eq!(config.frame_delay, 1);
        assert!(config.validate().is_ok());
        assert_eq!(config.frame_style().background, [0xff, 0xff, 0xff, 0x00]);
    }

    #[test]
    fn test_hex_color_parsing() {
        assert_eq!(
            HexColor::try_from("#0066ff".to_string()),
            Ok(HexColor::rgba(0x00, 0x66, 0xff, 0xff))
        );
        assert_eq!(
            HexColor::try_from("#FFFFFF00".to_string()),
            Ok(HexColor::rgba(0xff, 0xff, 0xff, 0x00))
        );
        assert!(HexColor::try_from("0066ff".to_string()).is_err());
        assert!(HexColor::try_from("#06f".to_string()).is_err());
        assert!(HexColor::try_from("#00gg00".to_string()).is_err());
        assert_eq!(HexColor::rgba(1, 2, 3, 4).to_string(), "#01020304");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("globe.json");
        fs::write(
            &path,
            r##"{ "canvas_size": 64, "sweep": { "step_deg": 90 }, "colors": { "land": "#ff0000" } }"##,
        )
        .unwrap();

        let config = GlobeConfig::load(Some(&path)).unwrap();
        assert_eq!(config.canvas_size, 64);
        assert_eq!(config.sweep.len(), 5);
        assert_eq!(config.colors.land, HexColor::rgba(0xff, 0, 0, 0xff));
        assert_eq!(config.colors.ocean, Colors::default().ocean);
        assert_eq!(config.source_crs, "+init=epsg:4326");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("globe.json");
        fs::write(&path, r#"{ "canvas_size": 0 }"#).unwrap();
        assert!(GlobeConfig::load(Some(&path)).is_err());

        fs::write(&path, r#"{ "sweep": { "step_deg": -3 } }"#).unwrap();
        assert!(GlobeConfig::load(Some(&path)).is_err());

        fs::write(&path, r#"{ "sweep": { "step_deg": 1e-300 } }"#).unwrap();
        assert!(GlobeConfig::load(Some(&path)).is_err());

        assert!(GlobeConfig::load(Some(&dir.path().join("missing.json"))).is_err());
    }

    #[test]
    fn test_round_trips_through_json() {
        let config = GlobeConfig::default();
        let text = serde_json::to_string(&config).unwrap();
        assert!(text.contains("\"#0066ffff\""));
        let back: GlobeConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}

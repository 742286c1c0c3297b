//! Rings and features
//!
//! Points are `geo_types::Coord<f64>` holding (longitude, latitude) in
//! degrees as loaded, radians once prepared for projection, or plane meters
//! after projection. A projected point that is non-finite on either axis lies
//! on the hidden hemisphere.

use geo_types::Coord;

/// Ordered point sequence; order defines winding and path shape
pub type Ring = Vec<Coord<f64>>;

/// Whether a projected point is on the visible hemisphere
#[inline]
pub fn is_visible(point: &Coord<f64>) -> bool {
    point.x.is_finite() && point.y.is_finite()
}

/// Convert every point of `ring` from degrees to radians in place
pub fn to_radians(ring: &mut [Coord<f64>]) {
    for point in ring {
        point.x = point.x.to_radians();
        point.y = point.y.to_radians();
    }
}

/// A named geometry built from one or more rings
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Feature {
    pub name: Option<String>,
    rings: Vec<Ring>,
}

impl Feature {
    pub fn new(name: Option<String>, rings: Vec<Ring>) -> Self {
        Self { name, rings }
    }

    /// Rings in source order
    pub fn rings(&self) -> impl Iterator<Item = &[Coord<f64>]> + '_ {
        self.rings.iter().map(Vec::as_slice)
    }

    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    /// Label for log messages
    pub fn label(&self, index: usize) -> String {
        match &self.name {
            Some(name) => format!("#{} ({})", index, name),
            None => format!("#{}", index),
        }
    }
}

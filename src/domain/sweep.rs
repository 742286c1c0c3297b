//! Rotation sweep

use serde::{Deserialize, Serialize};

/// View state of one frame: the globe's center longitude. Latitude is fixed at 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation {
    pub center_lon_deg: f64,
}

/// Descending sweep of center longitudes, both ends inclusive
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sweep {
    pub start_deg: f64,
    pub end_deg: f64,
    pub step_deg: f64,
}

impl Default for Sweep {
    fn default() -> Self {
        Self {
            start_deg: 360.0,
            end_deg: 0.0,
            step_deg: 3.0,
        }
    }
}

impl Sweep {
    /// Upper bound on the number of frames in one animation
    pub const MAX_STEPS: usize = 65_535;

    /// Number of rotation steps
    pub fn len(&self) -> usize {
        if !self.is_valid() {
            return 0;
        }
        self.step_gaps() as usize + 1
    }

    /// Whole steps between start and end
    fn step_gaps(&self) -> f64 {
        // Slack keeps 360/3 from landing just under an integer
        ((self.start_deg - self.end_deg) / self.step_deg + 1e-9).floor()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_valid(&self) -> bool {
        self.step_deg.is_finite()
            && self.step_deg > 0.0
            && self.start_deg.is_finite()
            && self.end_deg.is_finite()
            && self.start_deg >= self.end_deg
            && self.step_gaps() < Self::MAX_STEPS as f64
    }

    /// Rotations in sweep order
    pub fn rotations(&self) -> impl Iterator<Item = Rotation> + '_ {
        (0..self.len()).map(move |i| Rotation {
            center_lon_deg: self.start_deg - i as f64 * self.step_deg,
        })
    }
}

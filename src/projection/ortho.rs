//! Spherical orthographic projection

use std::f64::consts::{PI, TAU};

const EPS10: f64 = 1e-10;

/// Orthographic view of a sphere of `radius` centered on (`lon_0`, `lat_0`)
#[derive(Debug, Clone, Copy)]
pub struct Orthographic {
    radius: f64,
    lon_0: f64,
    lat_0: f64,
    sin_lat_0: f64,
    cos_lat_0: f64,
}

impl Orthographic {
    pub fn new(radius: f64, lon_0: f64, lat_0: f64) -> Self {
        Self {
            radius,
            lon_0,
            lat_0,
            sin_lat_0: lat_0.sin(),
            cos_lat_0: lat_0.cos(),
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Project radians to plane meters. `None` when the point faces away
    /// from the viewer.
    pub fn forward(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        let lam = adjust_lon(lon - self.lon_0);
        let (sin_phi, cos_phi) = lat.sin_cos();
        let cos_lam = lam.cos();

        let cos_c = self.sin_lat_0 * sin_phi + self.cos_lat_0 * cos_phi * cos_lam;
        if cos_c < -EPS10 {
            return None;
        }

        let x = cos_phi * lam.sin();
        let y = self.cos_lat_0 * sin_phi - self.sin_lat_0 * cos_phi * cos_lam;
        Some((x * self.radius, y * self.radius))
    }

    /// Plane meters back to radians. `None` outside the projected disk.
    pub fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let x = x / self.radius;
        let y = y / self.radius;
        let rho = x.hypot(y);

        let mut sin_c = rho;
        if sin_c > 1.0 {
            if sin_c - 1.0 > EPS10 {
                return None;
            }
            sin_c = 1.0;
        }
        if rho <= EPS10 {
            return Some((self.lon_0, self.lat_0));
        }
        let cos_c = (1.0 - sin_c * sin_c).sqrt();

        let lat = (cos_c * self.sin_lat_0 + y * sin_c * self.cos_lat_0 / rho)
            .clamp(-1.0, 1.0)
            .asin();
        let lon = (x * sin_c).atan2(rho * self.cos_lat_0 * cos_c - y * self.sin_lat_0 * sin_c);
        Some((adjust_lon(lon + self.lon_0), lat))
    }
}

/// Wrap a longitude into [-π, π]
pub fn adjust_lon(lon: f64) -> f64 {
    if lon.abs() <= PI {
        return lon;
    }
    let wrapped = (lon + PI).rem_euclid(TAU) - PI;
    if wrapped == -PI && lon > 0.0 {
        PI
    } else {
        wrapped
    }
}

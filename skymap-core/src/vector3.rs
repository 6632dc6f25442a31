//! 3D Cartesian direction vectors.
//!
//! Sky positions are given as (longitude, latitude) pairs, but
//! membership tests and pixel classification are cleanest in Cartesian
//! form. The workflow throughout the workspace is
//!
//! 1. [`Vector3::from_lonlat_deg`]: spherical to Cartesian, using
//!    colatitude (theta = 90 deg - lat),
//! 2. geometry on unit vectors (dot products, separations),
//! 3. [`Vector3::to_lonlat_deg`] back when a human-readable direction
//!    is needed.

use crate::constants::{HALF_PI, RAD_TO_DEG};
use crate::utils::normalize_angle_to_positive;
use crate::Angle;

/// A 3D Cartesian vector; unit length when it encodes a sky direction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Unit direction vector from longitude/latitude in degrees.
    ///
    /// Uses the colatitude convention: θ = 90° − lat measured from the
    /// +Z pole, φ = lon measured from +X toward +Y. The directional
    /// cosines are (sin θ cos φ, sin θ sin φ, cos θ).
    pub fn from_lonlat_deg(lon_deg: f64, lat_deg: f64) -> Self {
        let phi = Angle::from_degrees(lon_deg).radians();
        let theta = HALF_PI - Angle::from_degrees(lat_deg).radians();
        let (sin_t, cos_t) = libm::sincos(theta);
        let (sin_p, cos_p) = libm::sincos(phi);
        Self {
            x: sin_t * cos_p,
            y: sin_t * sin_p,
            z: cos_t,
        }
    }

    /// Inverse of [`from_lonlat_deg`](Self::from_lonlat_deg); the
    /// vector need not be normalized. Longitude is in [0°, 360°).
    pub fn to_lonlat_deg(&self) -> (f64, f64) {
        let rho = libm::sqrt(self.x * self.x + self.y * self.y);
        let lat = libm::atan2(self.z, rho) * RAD_TO_DEG;
        let lon = normalize_angle_to_positive(libm::atan2(self.y, self.x)) * RAD_TO_DEG;
        (lon, lat)
    }

    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    #[inline]
    pub fn magnitude(&self) -> f64 {
        libm::sqrt(self.dot(self))
    }

    pub fn normalize(&self) -> Self {
        let m = self.magnitude();
        Self {
            x: self.x / m,
            y: self.y / m,
            z: self.z / m,
        }
    }

    /// Angular separation to another direction in radians.
    ///
    /// Uses atan2 of the cross-product magnitude over the dot product,
    /// which stays accurate for both tiny and near-antipodal
    /// separations where acos of the dot product loses precision.
    pub fn angular_separation(&self, other: &Self) -> f64 {
        let cross = self.cross(other).magnitude();
        libm::atan2(cross, self.dot(other))
    }
}

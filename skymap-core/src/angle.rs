//! Core angle type for sky-map geometry.
//!
//! [`Angle`] stores its value as radians (`f64`) and converts to and
//! from degrees at the API surface. Radians internally means
//! trigonometric calls never pay a conversion; the degree-based
//! constructors keep call sites readable where the data is in degrees
//! (header keywords, region descriptors).
//!
//! ```
//! use skymap_core::Angle;
//!
//! let a = Angle::from_degrees(45.0);
//! let (s, c) = a.sin_cos();
//! assert!((s - c).abs() < 1e-15);
//! ```

use crate::constants::{DEG_TO_RAD, HALF_PI, PI, RAD_TO_DEG};

/// An angular measurement stored as radians.
///
/// `Eq` and `Ord` are not implemented because `f64` can be NaN.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Angle {
    rad: f64,
}

impl Angle {
    /// Zero angle.
    pub const ZERO: Self = Self { rad: 0.0 };

    /// π radians (180°).
    pub const PI: Self = Self { rad: PI };

    /// π/2 radians (90°).
    pub const HALF_PI: Self = Self { rad: HALF_PI };

    /// Creates an angle from radians.
    #[inline]
    pub const fn from_radians(rad: f64) -> Self {
        Self { rad }
    }

    /// Creates an angle from degrees.
    #[inline]
    pub fn from_degrees(deg: f64) -> Self {
        Self {
            rad: deg * DEG_TO_RAD,
        }
    }

    /// Returns the angle in radians.
    #[inline]
    pub const fn radians(&self) -> f64 {
        self.rad
    }

    /// Returns the angle in degrees.
    #[inline]
    pub fn degrees(&self) -> f64 {
        self.rad * RAD_TO_DEG
    }

    #[inline]
    pub fn sin(&self) -> f64 {
        libm::sin(self.rad)
    }

    #[inline]
    pub fn cos(&self) -> f64 {
        libm::cos(self.rad)
    }

    #[inline]
    pub fn sin_cos(&self) -> (f64, f64) {
        libm::sincos(self.rad)
    }

    #[inline]
    pub fn tan(&self) -> f64 {
        libm::tan(self.rad)
    }

    #[inline]
    pub fn abs(&self) -> Self {
        Self {
            rad: self.rad.abs(),
        }
    }
}

impl std::ops::Add for Angle {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            rad: self.rad + rhs.rad,
        }
    }
}

impl std::ops::Sub for Angle {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            rad: self.rad - rhs.rad,
        }
    }
}

impl std::ops::Neg for Angle {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self { rad: -self.rad }
    }
}

impl std::ops::Mul<f64> for Angle {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self {
            rad: self.rad * rhs,
        }
    }
}

impl std::ops::Div<f64> for Angle {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f64) -> Self {
        Self {
            rad: self.rad / rhs,
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Angle {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(self.radians())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Angle {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let r = f64::deserialize(d)?;
        Ok(Angle::from_radians(r))
    }
}

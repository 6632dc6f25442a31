//! Shared numeric helpers for the projection formulas.

use skymap_core::constants::RAD_TO_DEG;
use skymap_core::utils::normalize_longitude;
use skymap_core::Angle;

use crate::coordinate::{IntermediateCoord, NativeCoord};

#[inline]
pub fn asin_safe(sin_value: f64) -> f64 {
    libm::asin(sin_value.clamp(-1.0, 1.0))
}

#[inline]
pub fn pole_native_coord() -> NativeCoord {
    NativeCoord::new(Angle::from_degrees(0.0), Angle::from_degrees(90.0))
}

/// Zenithal forward step: radial distance and position angle to plane
/// coordinates, with phi measured from the -y axis.
#[inline]
pub fn radial_to_intermediate(r_theta: f64, phi_rad: f64) -> IntermediateCoord {
    let (ps, pc) = libm::sincos(phi_rad);
    IntermediateCoord::new(r_theta * ps * RAD_TO_DEG, -r_theta * pc * RAD_TO_DEG)
}

/// Zenithal inverse step: plane coordinates to position angle and
/// radial distance. The flag marks the degenerate point at the pole.
#[inline]
pub fn intermediate_to_polar(x_rad: f64, y_rad: f64) -> (f64, f64, bool) {
    let r_theta = libm::sqrt(x_rad * x_rad + y_rad * y_rad);
    let is_pole = r_theta == 0.0;
    let phi_rad = if is_pole {
        0.0
    } else {
        libm::atan2(x_rad, -y_rad)
    };
    (phi_rad, r_theta, is_pole)
}

#[inline]
pub fn native_coord_from_radians(phi_rad: f64, theta_rad: f64) -> NativeCoord {
    let phi_deg = normalize_longitude(phi_rad * RAD_TO_DEG);
    NativeCoord::new(
        Angle::from_degrees(phi_deg),
        Angle::from_degrees(theta_rad * RAD_TO_DEG),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn test_asin_safe_clamping() {
        assert_eq!(asin_safe(1.0000000001), std::f64::consts::FRAC_PI_2);
        assert_eq!(asin_safe(-1.0000000001), -std::f64::consts::FRAC_PI_2);
        assert_eq!(asin_safe(0.5), libm::asin(0.5));
    }

    #[test]
    fn test_polar_roundtrip() {
        let inter = radial_to_intermediate(1.0, FRAC_PI_4);
        let (phi, r, is_pole) = intermediate_to_polar(inter.x_rad(), inter.y_rad());
        assert!(!is_pole);
        assert!((phi - FRAC_PI_4).abs() < 1e-12);
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_intermediate_to_polar_at_origin() {
        let (phi, r, is_pole) = intermediate_to_polar(0.0, 0.0);
        assert_eq!(phi, 0.0);
        assert_eq!(r, 0.0);
        assert!(is_pole);
    }

    #[test]
    fn test_native_coord_from_radians_wraps() {
        let native = native_coord_from_radians(3.0 * std::f64::consts::PI, FRAC_PI_4);
        assert!((native.phi().degrees() - 180.0).abs() < 1e-10);
        assert!((native.theta().degrees() - 45.0).abs() < 1e-10);
    }
}

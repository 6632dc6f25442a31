//! Angle normalization helpers.
//!
//! | Function | Input | Output range |
//! |----------|-------|--------------|
//! | [`normalize_longitude`] | degrees | (-180°, 180°] |
//! | [`normalize_longitude_positive`] | degrees | [0°, 360°) |
//! | [`normalize_latitude`] | degrees | [-90°, 90°] (clamped) |
//! | [`normalize_angle_to_positive`] | radians | [0, 2π) |

use crate::constants::TWO_PI;

/// Normalizes longitude to the range (-180°, 180°]. The lower bound is
/// open: exactly -180° comes back as +180°.
#[inline]
pub fn normalize_longitude(lon: f64) -> f64 {
    let mut normalized = lon % 360.0;
    if normalized > 180.0 {
        normalized -= 360.0;
    } else if normalized <= -180.0 {
        normalized += 360.0;
    }
    normalized
}

/// Normalizes longitude to the range [0°, 360°).
#[inline]
pub fn normalize_longitude_positive(lon: f64) -> f64 {
    let mut normalized = lon % 360.0;
    if normalized < 0.0 {
        normalized += 360.0;
    }
    normalized
}

/// Clamps latitude to the valid range [-90°, 90°].
#[inline]
pub fn normalize_latitude(lat: f64) -> f64 {
    lat.clamp(-90.0, 90.0)
}

/// Normalizes an angle in radians to the range [0, 2π).
#[inline]
pub fn normalize_angle_to_positive(angle: f64) -> f64 {
    let mut a = angle % TWO_PI;
    if a < 0.0 {
        a += TWO_PI;
    }
    a
}

/// Shortest signed angular difference `a - b` in degrees, in
/// (-180°, 180°].
#[inline]
pub fn angular_difference(a: f64, b: f64) -> f64 {
    let mut diff = a - b;
    if diff > 180.0 {
        diff -= 360.0;
    } else if diff < -180.0 {
        diff += 360.0;
    }
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PI;

    #[test]
    fn test_normalize_longitude() {
        assert_eq!(normalize_longitude(0.0), 0.0);
        assert_eq!(normalize_longitude(180.0), 180.0);
        // Both boundary spellings land on the closed end.
        assert_eq!(normalize_longitude(-180.0), 180.0);
        assert_eq!(normalize_longitude(-540.0), 180.0);
        assert_eq!(normalize_longitude(181.0), -179.0);
        assert_eq!(normalize_longitude(-181.0), 179.0);
        assert_eq!(normalize_longitude(720.0), 0.0);
        assert_eq!(normalize_longitude(450.0), 90.0);
    }

    #[test]
    fn test_normalize_longitude_positive() {
        assert_eq!(normalize_longitude_positive(0.0), 0.0);
        assert_eq!(normalize_longitude_positive(-10.0), 350.0);
        assert_eq!(normalize_longitude_positive(370.0), 10.0);
        assert_eq!(normalize_longitude_positive(360.0), 0.0);
    }

    #[test]
    fn test_normalize_latitude() {
        assert_eq!(normalize_latitude(45.0), 45.0);
        assert_eq!(normalize_latitude(100.0), 90.0);
        assert_eq!(normalize_latitude(-100.0), -90.0);
    }

    #[test]
    fn test_normalize_angle_to_positive() {
        assert_eq!(normalize_angle_to_positive(0.0), 0.0);
        assert!((normalize_angle_to_positive(-PI) - PI).abs() < 1e-15);
        assert!((normalize_angle_to_positive(3.0 * PI) - PI).abs() < 1e-15);
        assert!(normalize_angle_to_positive(-1.0) >= 0.0);
        assert!(normalize_angle_to_positive(-1.0) < TWO_PI);
    }

    #[test]
    fn test_angular_difference() {
        assert_eq!(angular_difference(90.0, 45.0), 45.0);
        assert!((angular_difference(10.0, 350.0) - 20.0).abs() < 1e-12);
        assert!((angular_difference(350.0, 10.0) + 20.0).abs() < 1e-12);
    }
}

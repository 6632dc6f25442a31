//! Coordinate newtypes for each stage of the transformation pipeline.
//!
//! A round trip runs pixel -> intermediate -> native -> sky and back.
//! Keeping the stages as distinct types prevents a raw pair of floats
//! from being fed into the wrong leg of the pipeline.

use skymap_core::Angle;

/// FITS pixel coordinate, 1-based with the first pixel center at (1, 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelCoord {
    x: f64,
    y: f64,
}

impl PixelCoord {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Cell center for a 0-based (column, row) grid index.
    #[inline]
    pub fn from_grid_index(col: usize, row: usize) -> Self {
        Self {
            x: col as f64 + 1.0,
            y: row as f64 + 1.0,
        }
    }

    /// Nearest 0-based (column, row) grid index, or `None` when the
    /// coordinate falls outside the first quadrant.
    #[inline]
    pub fn to_grid_index(&self) -> Option<(usize, usize)> {
        let col = (self.x - 1.0).round();
        let row = (self.y - 1.0).round();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        Some((col as usize, row as usize))
    }
}

/// Projection-plane coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntermediateCoord {
    x: f64,
    y: f64,
}

impl IntermediateCoord {
    #[inline]
    pub fn new(x_deg: f64, y_deg: f64) -> Self {
        Self { x: x_deg, y: y_deg }
    }

    #[inline]
    pub fn x_deg(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y_deg(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn x_rad(&self) -> f64 {
        self.x * skymap_core::constants::DEG_TO_RAD
    }

    #[inline]
    pub fn y_rad(&self) -> f64 {
        self.y * skymap_core::constants::DEG_TO_RAD
    }
}

/// Direction in the native system of a projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeCoord {
    phi: Angle,
    theta: Angle,
}

impl NativeCoord {
    #[inline]
    pub fn new(phi: Angle, theta: Angle) -> Self {
        Self { phi, theta }
    }

    #[inline]
    pub fn phi(&self) -> Angle {
        self.phi
    }

    #[inline]
    pub fn theta(&self) -> Angle {
        self.theta
    }
}

/// Direction on the sky in the frame of the enclosing grid, either
/// equatorial (RA, Dec) or Galactic (l, b).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyCoord {
    lon: Angle,
    lat: Angle,
}

impl SkyCoord {
    #[inline]
    pub fn new(lon: Angle, lat: Angle) -> Self {
        Self { lon, lat }
    }

    #[inline]
    pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> Self {
        Self {
            lon: Angle::from_degrees(lon_deg),
            lat: Angle::from_degrees(lat_deg),
        }
    }

    #[inline]
    pub fn lon(&self) -> Angle {
        self.lon
    }

    #[inline]
    pub fn lat(&self) -> Angle {
        self.lat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_coord_accessors() {
        let p = PixelCoord::new(40.5, 80.5);
        assert_eq!(p.x(), 40.5);
        assert_eq!(p.y(), 80.5);
    }

    #[test]
    fn test_grid_index_roundtrip() {
        let p = PixelCoord::from_grid_index(0, 0);
        assert_eq!(p.x(), 1.0);
        assert_eq!(p.y(), 1.0);
        assert_eq!(p.to_grid_index(), Some((0, 0)));

        let p2 = PixelCoord::from_grid_index(9, 19);
        assert_eq!(p2.to_grid_index(), Some((9, 19)));
    }

    #[test]
    fn test_grid_index_rejects_negative() {
        let p = PixelCoord::new(-3.0, 1.0);
        assert_eq!(p.to_grid_index(), None);
    }

    #[test]
    fn test_intermediate_coord_radians() {
        let c = IntermediateCoord::new(0.001, -0.002);
        assert!((c.x_rad() - 0.001_f64.to_radians()).abs() < 1e-15);
        assert!((c.y_rad() - (-0.002_f64).to_radians()).abs() < 1e-15);
    }

    #[test]
    fn test_sky_coord_from_degrees() {
        use skymap_core::assert_ulp_lt;

        let c = SkyCoord::from_degrees(266.4, -28.9);
        assert_ulp_lt!(c.lon().degrees(), 266.4, 4);
        assert_ulp_lt!(c.lat().degrees(), -28.9, 4);
    }
}

//! HEALPix pixel indexing.
//!
//! Implements the Hierarchical Equal Area isoLatitude Pixelization of
//! the sphere in both standard orderings:
//!
//! | Scheme   | Enumeration                                         |
//! |----------|-----------------------------------------------------|
//! | `RING`   | Along iso-latitude rings, north pole southward      |
//! | `NESTED` | Z-order within twelve base faces, children adjacent |
//!
//! Resolution is parameterized by `nside = 2^order` with `order` in
//! `0..=13`; the sphere always holds `12 * nside^2` equal-area pixels.
//! Directions are exchanged either as `(z, phi)` with `z = cos(theta)`
//! and `phi` the longitude in radians, or as longitude/latitude pairs
//! in degrees.

pub mod error;
pub mod nested;
pub mod pixsize;
pub mod ring;

pub use error::HealpixError;
pub use ring::{n_rings, ring_info, RingInfo};

use skymap_core::constants::{DEG_TO_RAD, RAD_TO_DEG};
use skymap_core::Vector3;

/// Finest supported resolution order.
pub const MAX_ORDER: u32 = 13;

/// Pixel enumeration scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Pixels counted along iso-latitude rings.
    Ring,
    /// Pixels counted in Z-order within the twelve base faces.
    Nested,
}

impl Scheme {
    /// Canonical header string for the scheme.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Ring => "RING",
            Scheme::Nested => "NESTED",
        }
    }

    /// Parses a scheme name as found in headers.
    pub fn parse(name: &str) -> Result<Self, HealpixError> {
        match name.trim() {
            "RING" => Ok(Scheme::Ring),
            "NESTED" | "NEST" => Ok(Scheme::Nested),
            other => Err(HealpixError::unknown_scheme(other)),
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validates an nside value, returning the corresponding order.
pub fn nside_to_order(nside: u64) -> Result<u32, HealpixError> {
    if nside == 0 || !nside.is_power_of_two() {
        return Err(HealpixError::invalid_nside(nside));
    }
    let order = nside.trailing_zeros();
    if order > MAX_ORDER {
        return Err(HealpixError::order_out_of_range(order, MAX_ORDER));
    }
    Ok(order)
}

/// Order for an nside already known to be valid.
#[inline]
pub(crate) fn nside_to_order_unchecked(nside: u64) -> u32 {
    nside.trailing_zeros()
}

/// Resolution parameter at a given order.
#[inline]
pub fn order_to_nside(order: u32) -> u64 {
    1u64 << order
}

/// Total number of pixels at a given nside.
#[inline]
pub fn npix(nside: u64) -> u64 {
    12 * nside * nside
}

/// Pixel index for a direction given as `z = cos(theta)` and longitude
/// `phi` in radians. `nside` must already be validated.
pub fn ang2pix_zphi(nside: u64, scheme: Scheme, z: f64, phi: f64) -> u64 {
    match scheme {
        Scheme::Ring => ring::ang2pix_ring_zphi(nside, z, phi),
        Scheme::Nested => nested::ang2pix_nest_zphi(nside, z, phi),
    }
}

/// Pixel index for a direction in degrees.
pub fn ang2pix_lonlat(nside: u64, scheme: Scheme, lon_deg: f64, lat_deg: f64) -> u64 {
    let lat = lat_deg.clamp(-90.0, 90.0) * DEG_TO_RAD;
    ang2pix_zphi(nside, scheme, libm::sin(lat), lon_deg * DEG_TO_RAD)
}

/// Center of a pixel as `(z, phi)` with `phi` in radians.
pub fn pix2ang_zphi(nside: u64, scheme: Scheme, ipix: u64) -> (f64, f64) {
    match scheme {
        Scheme::Ring => ring::pix2ang_ring_zphi(nside, ipix),
        Scheme::Nested => nested::pix2ang_nest_zphi(nside, ipix),
    }
}

/// Center of a pixel as `(lon, lat)` in degrees, longitude in [0, 360).
pub fn pix2ang_lonlat(nside: u64, scheme: Scheme, ipix: u64) -> (f64, f64) {
    let (z, phi) = pix2ang_zphi(nside, scheme, ipix);
    let lat = libm::asin(z.clamp(-1.0, 1.0)) * RAD_TO_DEG;
    let mut lon = phi * RAD_TO_DEG;
    if lon < 0.0 {
        lon += 360.0;
    } else if lon >= 360.0 {
        lon -= 360.0;
    }
    (lon, lat)
}

/// Unit vector toward a pixel center.
pub fn pix2vec(nside: u64, scheme: Scheme, ipix: u64) -> Vector3 {
    let (lon, lat) = pix2ang_lonlat(nside, scheme, ipix);
    Vector3::from_lonlat_deg(lon, lat)
}

/// Pixel containing the direction of a unit vector.
pub fn vec2pix(nside: u64, scheme: Scheme, v: &Vector3) -> u64 {
    let (lon, lat) = v.to_lonlat_deg();
    ang2pix_lonlat(nside, scheme, lon, lat)
}

/// Converts a NESTED pixel index to the RING index of the same pixel.
pub fn nest2ring(nside: u64, ipix: u64) -> Result<u64, HealpixError> {
    nside_to_order(nside)?;
    if ipix >= npix(nside) {
        return Err(HealpixError::pixel_out_of_range(ipix, nside, npix(nside)));
    }
    Ok(nested::nest2ring(nside, ipix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nside_to_order() {
        assert_eq!(nside_to_order(1).unwrap(), 0);
        assert_eq!(nside_to_order(64).unwrap(), 6);
        assert_eq!(nside_to_order(8192).unwrap(), 13);
        assert!(matches!(
            nside_to_order(0),
            Err(HealpixError::InvalidNside { .. })
        ));
        assert!(matches!(
            nside_to_order(48),
            Err(HealpixError::InvalidNside { .. })
        ));
        assert!(matches!(
            nside_to_order(16384),
            Err(HealpixError::OrderOutOfRange { .. })
        ));
    }

    #[test]
    fn test_scheme_parse() {
        assert_eq!(Scheme::parse("RING").unwrap(), Scheme::Ring);
        assert_eq!(Scheme::parse("NESTED").unwrap(), Scheme::Nested);
        assert_eq!(Scheme::parse("NEST").unwrap(), Scheme::Nested);
        assert!(Scheme::parse("ring").is_err());
        assert_eq!(Scheme::Nested.to_string(), "NESTED");
    }

    #[test]
    fn test_npix() {
        assert_eq!(npix(1), 12);
        assert_eq!(npix(64), 49152);
    }

    #[test]
    fn test_schemes_agree_on_geometry() {
        // Both schemes index the same physical pixel for any direction.
        let nside = 32u64;
        for &(lon, lat) in &[(0.5, 0.5), (83.6, 22.0), (200.0, -45.0), (359.9, 89.0)] {
            let ipn = ang2pix_lonlat(nside, Scheme::Nested, lon, lat);
            let ipr = ang2pix_lonlat(nside, Scheme::Ring, lon, lat);
            assert_eq!(nest2ring(nside, ipn).unwrap(), ipr);
        }
    }

    #[test]
    fn test_pixel_center_stays_in_pixel() {
        let nside = 128u64;
        for scheme in [Scheme::Ring, Scheme::Nested] {
            for ipix in (0..npix(nside)).step_by(4099) {
                let (lon, lat) = pix2ang_lonlat(nside, scheme, ipix);
                assert_eq!(ang2pix_lonlat(nside, scheme, lon, lat), ipix);
            }
        }
    }

    #[test]
    fn test_vec_roundtrip() {
        let nside = 16u64;
        let ipix = ang2pix_lonlat(nside, Scheme::Nested, 120.0, 35.0);
        let v = pix2vec(nside, Scheme::Nested, ipix);
        assert_eq!(vec2pix(nside, Scheme::Nested, &v), ipix);
    }

    #[test]
    fn test_poles() {
        let nside = 64u64;
        let north = ang2pix_lonlat(nside, Scheme::Ring, 0.0, 90.0);
        assert!(north < 4);
        let south = ang2pix_lonlat(nside, Scheme::Ring, 0.0, -90.0);
        assert!(south >= npix(nside) - 4);
    }

    #[test]
    fn test_nest2ring_rejects_bad_input() {
        assert!(matches!(
            nest2ring(64, npix(64)),
            Err(HealpixError::PixelOutOfRange { .. })
        ));
        assert!(nest2ring(3, 0).is_err());
    }
}

//! Spherical distance math.

/// Angular separation via the Vincenty formula, accurate at all
/// separations. Inputs are precomputed sines/cosines of the two
/// latitudes and the longitude difference in radians.
#[inline]
pub fn vincenty_angular_separation(
    sin_lat1: f64,
    cos_lat1: f64,
    sin_lat2: f64,
    cos_lat2: f64,
    delta_lon: f64,
) -> f64 {
    let (sin_delta_lon, cos_delta_lon) = libm::sincos(delta_lon);

    let num = libm::sqrt(
        (cos_lat2 * sin_delta_lon).powi(2)
            + (cos_lat1 * sin_lat2 - sin_lat1 * cos_lat2 * cos_delta_lon).powi(2),
    );
    let den = sin_lat1 * sin_lat2 + cos_lat1 * cos_lat2 * cos_delta_lon;

    libm::atan2(num, den)
}

/// Angular separation between two (lon, lat) points given in degrees,
/// returned in degrees.
pub fn angular_separation_deg(lon1_deg: f64, lat1_deg: f64, lon2_deg: f64, lat2_deg: f64) -> f64 {
    use crate::constants::{DEG_TO_RAD, RAD_TO_DEG};

    let (s1, c1) = libm::sincos(lat1_deg * DEG_TO_RAD);
    let (s2, c2) = libm::sincos(lat2_deg * DEG_TO_RAD);
    let delta_lon = (lon2_deg - lon1_deg) * DEG_TO_RAD;

    vincenty_angular_separation(s1, c1, s2, c2, delta_lon) * RAD_TO_DEG
}

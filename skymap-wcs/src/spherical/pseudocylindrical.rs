use skymap_core::constants::RAD_TO_DEG;

use crate::common::{asin_safe, native_coord_from_radians};
use crate::coordinate::{IntermediateCoord, NativeCoord};
use crate::error::{WcsError, WcsResult};

/// Hammer-Aitoff equal-area projection of the full sphere into an
/// ellipse with a 2:1 aspect ratio.
pub(crate) fn project_ait(native: NativeCoord) -> WcsResult<IntermediateCoord> {
    let phi = native.phi().radians();
    let theta = native.theta().radians();

    let (sin_theta, cos_theta) = libm::sincos(theta);
    let half_phi = phi / 2.0;
    let denom = 1.0 + cos_theta * libm::cos(half_phi);
    if denom < 1e-10 {
        return Err(WcsError::singularity(
            "AIT projection: singularity at antipodal point",
        ));
    }

    let gamma = libm::sqrt(2.0 / denom);
    let x = 2.0 * gamma * cos_theta * libm::sin(half_phi) * RAD_TO_DEG;
    let y = gamma * sin_theta * RAD_TO_DEG;
    Ok(IntermediateCoord::new(x, y))
}

pub(crate) fn deproject_ait(inter: IntermediateCoord) -> WcsResult<NativeCoord> {
    let x = inter.x_rad();
    let y = inter.y_rad();

    let x_scaled = x / 4.0;
    let y_scaled = y / 2.0;

    let z_sq = 1.0 - x_scaled * x_scaled - y_scaled * y_scaled;
    if z_sq < 0.0 {
        return Err(WcsError::out_of_bounds(
            "AIT deprojection: point outside projection boundary",
        ));
    }
    let z = libm::sqrt(z_sq);

    let theta = asin_safe(y * z);
    let phi = 2.0 * libm::atan2(x * z / 2.0, 2.0 * z * z - 1.0);

    Ok(native_coord_from_radians(phi, theta))
}

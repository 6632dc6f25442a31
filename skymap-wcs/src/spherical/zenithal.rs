use skymap_core::constants::HALF_PI;

use crate::common::{intermediate_to_polar, native_coord_from_radians, pole_native_coord};
use crate::common::radial_to_intermediate;
use crate::coordinate::{IntermediateCoord, NativeCoord};
use crate::error::{WcsError, WcsResult};

/// Gnomonic projection from the sphere center onto the tangent plane.
pub(crate) fn project_tan(native: NativeCoord) -> WcsResult<IntermediateCoord> {
    let phi = native.phi().radians();
    let theta = native.theta().radians();

    if theta == HALF_PI {
        return Ok(IntermediateCoord::new(0.0, 0.0));
    }
    if theta <= 0.0 {
        return Err(WcsError::singularity(
            "TAN projection undefined at theta <= 0",
        ));
    }
    let (rt_sin, rt_cos) = libm::sincos(theta);
    let r_theta = rt_cos / rt_sin;
    Ok(radial_to_intermediate(r_theta, phi))
}

pub(crate) fn deproject_tan(inter: IntermediateCoord) -> WcsResult<NativeCoord> {
    let (phi, r_theta, is_pole) = intermediate_to_polar(inter.x_rad(), inter.y_rad());

    if is_pole {
        return Ok(pole_native_coord());
    }

    let theta = libm::atan2(1.0, r_theta);
    Ok(native_coord_from_radians(phi, theta))
}

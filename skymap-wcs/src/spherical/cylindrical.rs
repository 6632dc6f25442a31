use skymap_core::constants::{DEG_TO_RAD, RAD_TO_DEG};
use skymap_core::Angle;

use crate::coordinate::{IntermediateCoord, NativeCoord};
use crate::error::{WcsError, WcsResult};

/// Plate carree: the identity map between native angles and the plane.
pub(crate) fn project_car(native: NativeCoord) -> WcsResult<IntermediateCoord> {
    Ok(IntermediateCoord::new(
        native.phi().degrees(),
        native.theta().degrees(),
    ))
}

pub(crate) fn deproject_car(inter: IntermediateCoord) -> WcsResult<NativeCoord> {
    Ok(NativeCoord::new(
        Angle::from_degrees(inter.x_deg()),
        Angle::from_degrees(inter.y_deg()),
    ))
}

pub(crate) fn project_cea(native: NativeCoord, lambda: f64) -> WcsResult<IntermediateCoord> {
    let phi = native.phi().degrees();
    let theta = native.theta().radians();

    let y = libm::sin(theta) / lambda * RAD_TO_DEG;
    Ok(IntermediateCoord::new(phi, y))
}

pub(crate) fn deproject_cea(inter: IntermediateCoord, lambda: f64) -> WcsResult<NativeCoord> {
    let phi = inter.x_deg();
    let y = inter.y_deg() * DEG_TO_RAD;

    let sin_theta = lambda * y;
    if sin_theta.abs() > 1.0 {
        return Err(WcsError::out_of_bounds(
            "CEA deprojection: |lambda * y| > 1",
        ));
    }

    let theta = libm::asin(sin_theta);
    Ok(NativeCoord::new(
        Angle::from_degrees(phi),
        Angle::from_degrees(theta * RAD_TO_DEG),
    ))
}

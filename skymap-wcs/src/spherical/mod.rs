//! Rotation between native and sky systems, and the projection set.
//!
//! Only the four projections used by the reprojection pipeline are
//! implemented: CAR, CEA, TAN and AIT.

use skymap_core::constants::{HALF_PI, RAD_TO_DEG};
use skymap_core::utils::normalize_longitude_positive;
use skymap_core::Angle;

use crate::common::{asin_safe, native_coord_from_radians};
use crate::coordinate::{IntermediateCoord, NativeCoord, SkyCoord};
use crate::error::{WcsError, WcsResult};

mod cylindrical;
mod pseudocylindrical;
mod zenithal;

use cylindrical::{deproject_car, deproject_cea, project_car, project_cea};
use pseudocylindrical::{deproject_ait, project_ait};
use zenithal::{deproject_tan, project_tan};

/// Euler rotation taking native projection coordinates to the sky
/// frame, parameterized by the sky position of the native pole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalRotation {
    alpha_p: f64,
    delta_p: f64,
    phi_p: f64,
    sin_delta_p: f64,
    cos_delta_p: f64,
}

impl SphericalRotation {
    pub fn new(alpha_p: Angle, delta_p: Angle, phi_p: Angle) -> Self {
        let delta_p_rad = delta_p.radians();
        let (sin_delta_p, cos_delta_p) = libm::sincos(delta_p_rad);
        Self {
            alpha_p: alpha_p.radians(),
            delta_p: delta_p_rad,
            phi_p: phi_p.radians(),
            sin_delta_p,
            cos_delta_p,
        }
    }

    fn default_lonpole(delta_0: Angle, theta_0: Angle) -> Angle {
        if delta_0.radians() >= theta_0.radians() {
            Angle::from_degrees(0.0)
        } else {
            Angle::from_degrees(180.0)
        }
    }

    /// Derives the rotation from the reference point of a grid: the sky
    /// position `(alpha_0, delta_0)` that maps to the projection's
    /// native reference latitude `theta_0`.
    pub fn from_crval(
        alpha_0: Angle,
        delta_0: Angle,
        theta_0: Angle,
        lonpole: Option<Angle>,
    ) -> WcsResult<Self> {
        let phi_p = lonpole.unwrap_or_else(|| Self::default_lonpole(delta_0, theta_0));

        let sin_delta_0 = libm::sin(delta_0.radians());
        let (sin_theta_0, cos_theta_0) = libm::sincos(theta_0.radians());
        let (sin_phi_p, cos_phi_p) = libm::sincos(phi_p.radians());

        let delta_p = Self::compute_delta_p(
            sin_delta_0,
            sin_theta_0,
            cos_theta_0,
            sin_phi_p,
            cos_phi_p,
        )?;

        // Pole longitude from the constraint that the native reference
        // (0, theta_0) lands exactly on (alpha_0, delta_0).
        let (sin_delta_p, cos_delta_p) = libm::sincos(delta_p);
        let x = cos_theta_0 * sin_phi_p;
        let y = sin_theta_0 * cos_delta_p - cos_theta_0 * sin_delta_p * cos_phi_p;
        let alpha_p = alpha_0.radians() - libm::atan2(x, y);

        Ok(Self::new(
            Angle::from_radians(alpha_p),
            Angle::from_radians(delta_p),
            phi_p,
        ))
    }

    fn compute_delta_p(
        sin_delta_0: f64,
        sin_theta_0: f64,
        cos_theta_0: f64,
        sin_phi_p: f64,
        cos_phi_p: f64,
    ) -> WcsResult<f64> {
        let cos_theta_0_sin_phi_p = cos_theta_0 * sin_phi_p;
        let denom_sq = 1.0 - cos_theta_0_sin_phi_p * cos_theta_0_sin_phi_p;

        if denom_sq.abs() < 1e-15 {
            if sin_delta_0.abs() < 1e-15 {
                return Ok(HALF_PI);
            }
            return Err(WcsError::invalid_parameter(
                "no native pole latitude solves this reference point",
            ));
        }

        let arg = sin_delta_0 / libm::sqrt(denom_sq);
        if arg.abs() > 1.0 + 1e-12 {
            return Err(WcsError::invalid_parameter(
                "reference latitude unreachable for this projection",
            ));
        }

        let acos_term = libm::acos(arg.clamp(-1.0, 1.0));
        let base = libm::atan2(sin_theta_0, cos_theta_0 * cos_phi_p);

        // Of the two candidate pole latitudes, take the one closest to
        // the north pole; the grids built here never need the other.
        let delta_p_1 = base + acos_term;
        let delta_p_2 = base - acos_term;

        const TOL: f64 = 1e-14;
        let in_range = |v: f64| (-HALF_PI - TOL..=HALF_PI + TOL).contains(&v);
        match (in_range(delta_p_1), in_range(delta_p_2)) {
            (true, false) => Ok(delta_p_1.clamp(-HALF_PI, HALF_PI)),
            (false, true) => Ok(delta_p_2.clamp(-HALF_PI, HALF_PI)),
            (true, true) => {
                if delta_p_1 >= delta_p_2 {
                    Ok(delta_p_1.clamp(-HALF_PI, HALF_PI))
                } else {
                    Ok(delta_p_2.clamp(-HALF_PI, HALF_PI))
                }
            }
            (false, false) => Err(WcsError::invalid_parameter(
                "no native pole latitude in [-90, 90]",
            )),
        }
    }

    pub fn native_to_sky(&self, native: NativeCoord) -> SkyCoord {
        let (sin_theta, cos_theta) = libm::sincos(native.theta().radians());
        let d_phi = native.phi().radians() - self.phi_p;
        let (sin_d_phi, cos_d_phi) = libm::sincos(d_phi);

        let sin_delta = sin_theta * self.sin_delta_p + cos_theta * self.cos_delta_p * cos_d_phi;
        let delta = asin_safe(sin_delta);

        let x = -cos_theta * sin_d_phi;
        let y = sin_theta * self.cos_delta_p - cos_theta * self.sin_delta_p * cos_d_phi;
        let alpha = self.alpha_p + libm::atan2(x, y);

        SkyCoord::new(
            Angle::from_degrees(normalize_longitude_positive(alpha * RAD_TO_DEG)),
            Angle::from_radians(delta),
        )
    }

    pub fn sky_to_native(&self, sky: SkyCoord) -> NativeCoord {
        let (sin_delta, cos_delta) = libm::sincos(sky.lat().radians());
        let d_alpha = sky.lon().radians() - self.alpha_p;
        let (sin_d_alpha, cos_d_alpha) = libm::sincos(d_alpha);

        let sin_theta = sin_delta * self.sin_delta_p + cos_delta * self.cos_delta_p * cos_d_alpha;
        let theta = asin_safe(sin_theta);

        let x = -cos_delta * sin_d_alpha;
        let y = sin_delta * self.cos_delta_p - cos_delta * self.sin_delta_p * cos_d_alpha;
        let phi = self.phi_p + libm::atan2(x, y);

        native_coord_from_radians(phi, theta)
    }

    #[inline]
    pub fn pole_lat_degrees(&self) -> f64 {
        self.delta_p * RAD_TO_DEG
    }
}

/// Map projection between native spherical and plane coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Plate carree.
    Car,
    /// Cylindrical equal area with stretch parameter lambda.
    Cea { lambda: f64 },
    /// Gnomonic.
    Tan,
    /// Hammer-Aitoff.
    Ait,
}

impl Projection {
    pub fn car() -> Self {
        Self::Car
    }

    pub fn cea() -> Self {
        Self::Cea { lambda: 1.0 }
    }

    pub fn cea_with_lambda(lambda: f64) -> Self {
        Self::Cea { lambda }
    }

    pub fn tan() -> Self {
        Self::Tan
    }

    pub fn ait() -> Self {
        Self::Ait
    }

    /// Three-letter FITS code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Car => "CAR",
            Self::Cea { .. } => "CEA",
            Self::Tan => "TAN",
            Self::Ait => "AIT",
        }
    }

    /// Parses the projection code from a CTYPE suffix.
    pub fn from_code(code: &str) -> WcsResult<Self> {
        match code {
            "CAR" => Ok(Self::car()),
            "CEA" => Ok(Self::cea()),
            "TAN" => Ok(Self::tan()),
            "AIT" => Ok(Self::ait()),
            other => Err(WcsError::unsupported_projection(other)),
        }
    }

    /// Native coordinates `(phi_0, theta_0)` of the reference point, in
    /// degrees. Zenithal projections are referenced at the pole,
    /// cylindrical and pseudocylindrical ones at the origin.
    pub fn native_reference(&self) -> (f64, f64) {
        match self {
            Self::Tan => (0.0, 90.0),
            Self::Car | Self::Cea { .. } | Self::Ait => (0.0, 0.0),
        }
    }

    pub fn project(&self, native: NativeCoord) -> WcsResult<IntermediateCoord> {
        match self {
            Self::Car => project_car(native),
            Self::Cea { lambda } => project_cea(native, *lambda),
            Self::Tan => project_tan(native),
            Self::Ait => project_ait(native),
        }
    }

    pub fn deproject(&self, inter: IntermediateCoord) -> WcsResult<NativeCoord> {
        match self {
            Self::Car => deproject_car(inter),
            Self::Cea { lambda } => deproject_cea(inter, *lambda),
            Self::Tan => deproject_tan(inter),
            Self::Ait => deproject_ait(inter),
        }
    }
}

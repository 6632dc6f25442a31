#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const PI: f64 = 3.141592653589793238462643;

#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const HALF_PI: f64 = 1.5707963267948966192313216;

#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const QUARTER_PI: f64 = 0.7853981633974483096156608;

#[allow(clippy::excessive_precision)]
#[allow(clippy::approx_constant)]
pub const TWO_PI: f64 = 6.283185307179586476925287;

#[allow(clippy::excessive_precision)]
pub const DEG_TO_RAD: f64 = 1.745329251994329576923691e-2;

#[allow(clippy::excessive_precision)]
pub const RAD_TO_DEG: f64 = 57.29577951308232087679815;

/// Mean angular spacing of HEALPix pixel centers in degrees for
/// nside = 1: sqrt(4π (180/π)² / 12).
#[allow(clippy::excessive_precision)]
pub const HEALPIX_MEAN_SPACING_DEG: f64 = 58.63236200518286;

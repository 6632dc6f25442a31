//! Derives a projected grid matched to a HEALPix pixelization: same
//! sky frame, centered on the region, with square pixels a fixed
//! factor finer than the native resolution.

use skymap_healpix::pixsize;
use skymap_wcs::{EnergyAxis, Projection, SkyCoord, SkyGrid};

use crate::error::{ReprojectError, ReprojectResult};
use crate::pixelization::HpxPixelization;

/// Largest half-width of a grid in degrees; all-sky maps are capped
/// here so cylindrical projections stay within one period.
const MAX_HALF_WIDTH_DEG: f64 = 90.0;

/// Builds a square grid covering the pixelization's region.
///
/// The pixel scale is the nominal size at the map's order divided by
/// `oversample`, and the grid spans twice the region's angular size
/// (capped at 90 degrees) in each direction. An energy axis carried by
/// the pixelization is propagated as a third axis.
pub fn build_grid(
    hpx: &HpxPixelization,
    projection: Projection,
    oversample: u64,
) -> ReprojectResult<SkyGrid> {
    if oversample == 0 {
        return Err(ReprojectError::configuration(
            "oversample factor must be at least 1",
        ));
    }

    let scale = pixsize::order_pixel_size_deg(hpx.order()) / oversample as f64;
    let half_width = match hpx.region() {
        Some(region) => region.angular_size()?.min(MAX_HALF_WIDTH_DEG),
        None => MAX_HALF_WIDTH_DEG,
    };

    let side = (2.0 * half_width / scale) as usize * oversample as usize;
    if side == 0 {
        return Err(ReprojectError::configuration(format!(
            "grid collapses to zero cells for half-width {half_width} at scale {scale}"
        )));
    }

    let (lon, lat) = match hpx.region() {
        Some(region) => region.reference_direction(),
        None => (0.0, 0.0),
    };
    let crpix = side as f64 / 2.0;

    let energy = match hpx.energy_edges() {
        Some(edges) => Some(EnergyAxis::from_log10_edges(edges)?),
        None => None,
    };

    SkyGrid::new(
        hpx.frame(),
        projection,
        SkyCoord::from_degrees(lon, lat),
        [crpix, crpix],
        [-scale, scale],
        side,
        side,
        energy,
    )
    .map_err(ReprojectError::from)
}

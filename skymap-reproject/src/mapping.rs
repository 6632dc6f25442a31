//! Precomputed correspondence between grid cells and HEALPix pixels.
//!
//! Every grid cell center is classified once into the pixelization;
//! the mapping then resamples any number of data planes by lookup.
//! Because grid cells are finer than the native pixels, several cells
//! share one pixel; the per-cell weight `1 / hits` makes the resampling
//! approximately flux-conserving when applied.

use std::collections::HashMap;

use rayon::prelude::*;

use skymap_wcs::SkyGrid;

use crate::error::{ReprojectError, ReprojectResult};
use crate::pixelization::{HpxPixelization, INVALID_INDEX};

#[derive(Debug, Clone, PartialEq)]
pub struct HpxToGridMapping {
    hpx: HpxPixelization,
    grid: SkyGrid,
    /// Per cell: position in the map's data plane, or -1 when the cell
    /// has no counterpart (outside the region or the projection
    /// boundary).
    local_index: Vec<i64>,
    /// Per cell: 1 / (number of cells sharing the same pixel), zero
    /// for invalid cells.
    weights: Vec<f64>,
}

impl HpxToGridMapping {
    /// Classifies all cells of `grid` into `hpx`.
    pub fn build(hpx: &HpxPixelization, grid: &SkyGrid) -> ReprojectResult<Self> {
        if grid.frame() != hpx.frame() {
            return Err(ReprojectError::geometry_mismatch(format!(
                "grid frame {} does not match map frame {}",
                grid.frame(),
                hpx.frame()
            )));
        }

        let naxis1 = grid.naxis1();
        let n_cells = grid.n_cells();

        // Cell centers are independent, classify in parallel.
        let globals: Vec<i64> = (0..n_cells)
            .into_par_iter()
            .map(|cell| {
                let col = cell % naxis1;
                let row = cell / naxis1;
                match grid.cell_to_sky(col, row) {
                    Ok(sky) => hpx.ang2pix(sky.lon().degrees(), sky.lat().degrees()) as i64,
                    // Cells outside the projection boundary, e.g. the
                    // corners of an all-sky AIT grid.
                    Err(_) => -1,
                }
            })
            .collect();

        // Hit counts consider only cells that land inside the region,
        // so boundary pixels are not diluted by cells that will never
        // be filled.
        let mut hits: HashMap<u64, u32> = HashMap::new();
        let local_index: Vec<i64> = globals
            .iter()
            .map(|&global| {
                if global < 0 {
                    return INVALID_INDEX;
                }
                let local = hpx.global_to_local(global as u64);
                if local >= 0 {
                    *hits.entry(global as u64).or_insert(0) += 1;
                }
                local
            })
            .collect();

        let weights: Vec<f64> = globals
            .iter()
            .zip(&local_index)
            .map(|(&global, &local)| {
                if local >= 0 {
                    1.0 / f64::from(hits[&(global as u64)])
                } else {
                    0.0
                }
            })
            .collect();

        Ok(Self {
            hpx: hpx.clone(),
            grid: grid.clone(),
            local_index,
            weights,
        })
    }

    #[inline]
    pub fn grid(&self) -> &SkyGrid {
        &self.grid
    }

    #[inline]
    pub fn pixelization(&self) -> &HpxPixelization {
        &self.hpx
    }

    #[inline]
    pub fn n_cells(&self) -> usize {
        self.local_index.len()
    }

    #[inline]
    pub fn local_index(&self) -> &[i64] {
        &self.local_index
    }

    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Whether a cell maps to a pixel of the data plane. Local index 0
    /// is valid; only the negative sentinel is not.
    #[inline]
    pub fn is_valid(&self, cell: usize) -> bool {
        self.local_index[cell] >= 0
    }

    /// Verifies that `hpx` describes the same map geometry this
    /// mapping was built for.
    pub fn check_compatible(&self, hpx: &HpxPixelization) -> ReprojectResult<()> {
        if self.hpx.nside() != hpx.nside()
            || self.hpx.scheme() != hpx.scheme()
            || self.hpx.frame() != hpx.frame()
            || self.hpx.region() != hpx.region()
        {
            return Err(ReprojectError::geometry_mismatch(format!(
                "mapping built for nside {} {} {} region {:?}, got nside {} {} {} region {:?}",
                self.hpx.nside(),
                self.hpx.scheme(),
                self.hpx.frame(),
                self.hpx.region().map(|r| r.to_string()),
                hpx.nside(),
                hpx.scheme(),
                hpx.frame(),
                hpx.region().map(|r| r.to_string()),
            )));
        }
        Ok(())
    }

    /// Resamples one data plane into a caller-provided cell buffer.
    /// Only cells with a counterpart are written; the rest of `out` is
    /// left untouched. With `normalize` the shared-pixel weights are
    /// applied, approximately conserving the plane's sum.
    pub fn apply(&self, plane: &[f64], out: &mut [f64], normalize: bool) -> ReprojectResult<()> {
        if plane.len() != self.hpx.n_pixels() {
            return Err(ReprojectError::geometry_mismatch(format!(
                "plane has {} values, map has {} pixels",
                plane.len(),
                self.hpx.n_pixels()
            )));
        }
        if out.len() != self.n_cells() {
            return Err(ReprojectError::geometry_mismatch(format!(
                "output has {} values, grid has {} cells",
                out.len(),
                self.n_cells()
            )));
        }
        for (cell, &local) in self.local_index.iter().enumerate() {
            if local >= 0 {
                let value = plane[local as usize];
                out[cell] = if normalize {
                    value * self.weights[cell]
                } else {
                    value
                };
            }
        }
        Ok(())
    }

    /// [`HpxToGridMapping::apply`] into a fresh zeroed plane.
    pub fn fill_plane(&self, plane: &[f64], normalize: bool) -> ReprojectResult<Vec<f64>> {
        let mut out = vec![0.0; self.n_cells()];
        self.apply(plane, &mut out, normalize)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gridbuilder::build_grid;
    use crate::region::Region;
    use skymap_healpix::Scheme;
    use skymap_wcs::{Frame, Projection};

    fn disk_setup() -> (HpxPixelization, SkyGrid) {
        let hpx = HpxPixelization::new(
            64,
            Scheme::Ring,
            Frame::Galactic,
            Some(Region::disk(110.0, 75.0, 2.0)),
            None,
        )
        .unwrap();
        let grid = build_grid(&hpx, Projection::car(), 2).unwrap();
        (hpx, grid)
    }

    #[test]
    fn test_central_cells_are_valid() {
        let (hpx, grid) = disk_setup();
        let mapping = HpxToGridMapping::build(&hpx, &grid).unwrap();

        let center_cell =
            (grid.naxis2() / 2) * grid.naxis1() + grid.naxis1() / 2;
        assert!(mapping.is_valid(center_cell));
        assert!(mapping.weights()[center_cell] > 0.0);
    }

    #[test]
    fn test_corner_cells_outside_region_are_invalid() {
        // The grid spans the disk diameter, so its corners lie outside
        // the circular region and must carry the sentinel, not a bogus
        // reference to local pixel 0.
        let (hpx, grid) = disk_setup();
        let mapping = HpxToGridMapping::build(&hpx, &grid).unwrap();

        assert!(!mapping.is_valid(0));
        assert_eq!(mapping.local_index()[0], INVALID_INDEX);
        assert_eq!(mapping.weights()[0], 0.0);
    }

    #[test]
    fn test_local_zero_is_distinct_from_sentinel() {
        let (hpx, grid) = disk_setup();
        let mapping = HpxToGridMapping::build(&hpx, &grid).unwrap();

        // Some cell maps to the first selected pixel; it must count as
        // valid even though its local index is zero.
        let has_local_zero = mapping.local_index().iter().any(|&l| l == 0);
        assert!(has_local_zero);
        let cell = mapping
            .local_index()
            .iter()
            .position(|&l| l == 0)
            .unwrap();
        assert!(mapping.is_valid(cell));
    }

    #[test]
    fn test_weights_sum_to_one_per_pixel() {
        let (hpx, grid) = disk_setup();
        let mapping = HpxToGridMapping::build(&hpx, &grid).unwrap();

        let mut per_pixel: HashMap<i64, f64> = HashMap::new();
        for (cell, &local) in mapping.local_index().iter().enumerate() {
            if local >= 0 {
                *per_pixel.entry(local).or_insert(0.0) += mapping.weights()[cell];
            }
        }
        for (_, total) in per_pixel {
            assert!((total - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_fill_plane_normalized_conserves_sum() {
        let (hpx, grid) = disk_setup();
        let mapping = HpxToGridMapping::build(&hpx, &grid).unwrap();

        let plane: Vec<f64> = (0..hpx.n_pixels()).map(|i| 1.0 + i as f64).collect();
        let out = mapping.fill_plane(&plane, true).unwrap();
        assert_eq!(out.len(), grid.n_cells());

        // Every selected pixel is covered by at least one cell for this
        // geometry, so the normalized resampling preserves the total.
        let covered: std::collections::HashSet<i64> = mapping
            .local_index()
            .iter()
            .copied()
            .filter(|&l| l >= 0)
            .collect();
        let expected: f64 = covered.iter().map(|&l| plane[l as usize]).sum();
        let total: f64 = out.iter().sum();
        assert!((total - expected).abs() < 1e-9 * expected);
    }

    #[test]
    fn test_fill_plane_unnormalized_copies_values() {
        let (hpx, grid) = disk_setup();
        let mapping = HpxToGridMapping::build(&hpx, &grid).unwrap();

        let plane: Vec<f64> = (0..hpx.n_pixels()).map(|i| i as f64).collect();
        let out = mapping.fill_plane(&plane, false).unwrap();
        for (cell, &local) in mapping.local_index().iter().enumerate() {
            if local >= 0 {
                assert_eq!(out[cell], plane[local as usize]);
            } else {
                assert_eq!(out[cell], 0.0);
            }
        }
    }

    #[test]
    fn test_apply_leaves_unmapped_cells_untouched() {
        let (hpx, grid) = disk_setup();
        let mapping = HpxToGridMapping::build(&hpx, &grid).unwrap();

        let plane = vec![2.0; hpx.n_pixels()];
        let mut out = vec![-7.0; grid.n_cells()];
        mapping.apply(&plane, &mut out, false).unwrap();
        for (cell, &local) in mapping.local_index().iter().enumerate() {
            if local >= 0 {
                assert_eq!(out[cell], 2.0);
            } else {
                assert_eq!(out[cell], -7.0);
            }
        }

        let mut short = vec![0.0; grid.n_cells() - 1];
        assert!(mapping.apply(&plane, &mut short, false).is_err());
    }

    #[test]
    fn test_fill_plane_rejects_wrong_length() {
        let (hpx, grid) = disk_setup();
        let mapping = HpxToGridMapping::build(&hpx, &grid).unwrap();
        let plane = vec![0.0; hpx.n_pixels() + 1];
        assert!(mapping.fill_plane(&plane, true).is_err());
    }

    #[test]
    fn test_check_compatible() {
        let (hpx, grid) = disk_setup();
        let mapping = HpxToGridMapping::build(&hpx, &grid).unwrap();
        assert!(mapping.check_compatible(&hpx).is_ok());

        let other = HpxPixelization::new(
            32,
            Scheme::Ring,
            Frame::Galactic,
            Some(Region::disk(110.0, 75.0, 2.0)),
            None,
        )
        .unwrap();
        assert!(matches!(
            mapping.check_compatible(&other),
            Err(ReprojectError::GeometryMismatch { .. })
        ));
    }

    #[test]
    fn test_frame_mismatch_rejected() {
        let (hpx, _) = disk_setup();
        let celestial = HpxPixelization::all_sky(64, Scheme::Ring, Frame::Celestial, None)
            .unwrap();
        let grid = build_grid(&celestial, Projection::car(), 2).unwrap();
        assert!(HpxToGridMapping::build(&hpx, &grid).is_err());
    }
}

//! Map containers: HEALPix-sampled data, its projected counterpart,
//! and the tabular form maps travel in on disk.

use skymap_wcs::SkyGrid;

use crate::error::{ReprojectError, ReprojectResult};
use crate::mapping::HpxToGridMapping;
use crate::pixelization::HpxPixelization;

/// A HEALPix-sampled map: one or more energy planes over a
/// pixelization, each holding one value per selected pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct HpxMap {
    hpx: HpxPixelization,
    data: Vec<f64>,
    cached_mapping: Option<HpxToGridMapping>,
}

impl HpxMap {
    /// Wraps plane data, stored plane-major: all pixels of the first
    /// energy bin, then the second, and so on.
    pub fn new(hpx: HpxPixelization, data: Vec<f64>) -> ReprojectResult<Self> {
        let expected = hpx.n_energy_bins() * hpx.n_pixels();
        if data.len() != expected {
            return Err(ReprojectError::geometry_mismatch(format!(
                "map data has {} values, expected {} ({} planes of {} pixels)",
                data.len(),
                expected,
                hpx.n_energy_bins(),
                hpx.n_pixels()
            )));
        }
        Ok(Self {
            hpx,
            data,
            cached_mapping: None,
        })
    }

    #[inline]
    pub fn pixelization(&self) -> &HpxPixelization {
        &self.hpx
    }

    #[inline]
    pub fn n_planes(&self) -> usize {
        self.hpx.n_energy_bins()
    }

    pub fn plane(&self, index: usize) -> ReprojectResult<&[f64]> {
        let n = self.hpx.n_pixels();
        if index >= self.n_planes() {
            return Err(ReprojectError::range(format!(
                "plane {index} out of range for {} planes",
                self.n_planes()
            )));
        }
        Ok(&self.data[index * n..(index + 1) * n])
    }

    /// Value at a global pixel index in the given plane, `None` when
    /// the pixel is outside the region.
    pub fn value(&self, plane: usize, global: u64) -> ReprojectResult<Option<f64>> {
        let local = self.hpx.global_to_local(global);
        if local < 0 {
            return Ok(None);
        }
        Ok(Some(self.plane(plane)?[local as usize]))
    }

    /// Resamples onto a grid through a prebuilt mapping. With
    /// `sum_planes` the energy planes are collapsed into a single
    /// output plane before resampling.
    pub fn to_grid(
        &self,
        mapping: &HpxToGridMapping,
        sum_planes: bool,
        normalize: bool,
    ) -> ReprojectResult<GridMap> {
        mapping.check_compatible(&self.hpx)?;
        self.resample(mapping, sum_planes, normalize)
    }

    /// Like [`HpxMap::to_grid`] but builds the mapping on first use and
    /// reuses it for subsequent conversions onto the same grid.
    pub fn to_grid_cached(
        &mut self,
        grid: &SkyGrid,
        sum_planes: bool,
        normalize: bool,
    ) -> ReprojectResult<GridMap> {
        let rebuild = match &self.cached_mapping {
            Some(mapping) => mapping.grid() != grid,
            None => true,
        };
        if rebuild {
            self.cached_mapping = Some(HpxToGridMapping::build(&self.hpx, grid)?);
        }
        let mapping = self
            .cached_mapping
            .as_ref()
            .ok_or_else(|| ReprojectError::configuration("mapping cache empty after build"))?;
        self.resample(mapping, sum_planes, normalize)
    }

    fn resample(
        &self,
        mapping: &HpxToGridMapping,
        sum_planes: bool,
        normalize: bool,
    ) -> ReprojectResult<GridMap> {
        let grid = mapping.grid().clone();
        if sum_planes {
            let n = self.hpx.n_pixels();
            let mut summed = vec![0.0; n];
            for plane in 0..self.n_planes() {
                for (total, &value) in summed.iter_mut().zip(self.plane(plane)?) {
                    *total += value;
                }
            }
            let data = mapping.fill_plane(&summed, normalize)?;
            return GridMap::new(grid, data, 1);
        }
        let mut data = Vec::with_capacity(self.n_planes() * grid.n_cells());
        for plane in 0..self.n_planes() {
            data.extend(mapping.fill_plane(self.plane(plane)?, normalize)?);
        }
        GridMap::new(grid, data, self.n_planes())
    }

    /// Tabular form of the map.
    pub fn to_table(&self) -> SkymapTable {
        let pixels = self.hpx.indices().map(|idx| idx.to_vec());
        let n = self.hpx.n_pixels();
        let channels = (0..self.n_planes())
            .map(|plane| self.data[plane * n..(plane + 1) * n].to_vec())
            .collect();
        SkymapTable { pixels, channels }
    }

    /// Rebuilds a map from its tabular form.
    pub fn from_table(hpx: HpxPixelization, table: &SkymapTable) -> ReprojectResult<Self> {
        if let Some(pixels) = &table.pixels {
            match hpx.indices() {
                Some(indices) if indices == pixels.as_slice() => {}
                _ => {
                    return Err(ReprojectError::geometry_mismatch(
                        "table pixel column does not match the pixelization's selection",
                    ))
                }
            }
        } else if hpx.indices().is_some() {
            return Err(ReprojectError::geometry_mismatch(
                "pixelization is sparse but the table has no pixel column",
            ));
        }
        if table.channels.len() != hpx.n_energy_bins() {
            return Err(ReprojectError::geometry_mismatch(format!(
                "table has {} channels, map has {} energy bins",
                table.channels.len(),
                hpx.n_energy_bins()
            )));
        }
        let mut data = Vec::with_capacity(hpx.n_energy_bins() * hpx.n_pixels());
        for channel in &table.channels {
            if channel.len() != hpx.n_pixels() {
                return Err(ReprojectError::geometry_mismatch(format!(
                    "channel has {} values, map has {} pixels",
                    channel.len(),
                    hpx.n_pixels()
                )));
            }
            data.extend_from_slice(channel);
        }
        Self::new(hpx, data)
    }
}

/// A map resampled onto a projected grid, plane-major like [`HpxMap`].
#[derive(Debug, Clone, PartialEq)]
pub struct GridMap {
    grid: SkyGrid,
    data: Vec<f64>,
    n_planes: usize,
}

impl GridMap {
    pub fn new(grid: SkyGrid, data: Vec<f64>, n_planes: usize) -> ReprojectResult<Self> {
        if data.len() != n_planes * grid.n_cells() {
            return Err(ReprojectError::geometry_mismatch(format!(
                "grid data has {} values, expected {} planes of {} cells",
                data.len(),
                n_planes,
                grid.n_cells()
            )));
        }
        Ok(Self {
            grid,
            data,
            n_planes,
        })
    }

    #[inline]
    pub fn grid(&self) -> &SkyGrid {
        &self.grid
    }

    #[inline]
    pub fn n_planes(&self) -> usize {
        self.n_planes
    }

    pub fn plane(&self, index: usize) -> ReprojectResult<&[f64]> {
        let n = self.grid.n_cells();
        if index >= self.n_planes {
            return Err(ReprojectError::range(format!(
                "plane {index} out of range for {} planes",
                self.n_planes
            )));
        }
        Ok(&self.data[index * n..(index + 1) * n])
    }

    /// Value at a 0-based (column, row) cell in the given plane.
    pub fn value(&self, plane: usize, col: usize, row: usize) -> ReprojectResult<f64> {
        if col >= self.grid.naxis1() || row >= self.grid.naxis2() {
            return Err(ReprojectError::range(format!(
                "cell ({col}, {row}) outside {}x{} grid",
                self.grid.naxis1(),
                self.grid.naxis2()
            )));
        }
        Ok(self.plane(plane)?[row * self.grid.naxis1() + col])
    }
}

/// Column-oriented representation of a map: one `CHANNELn` column per
/// plane, plus a pixel index column for sparse maps.
#[derive(Debug, Clone, PartialEq)]
pub struct SkymapTable {
    /// Global pixel index per row, present only for sparse maps.
    pub pixels: Option<Vec<u64>>,
    /// One column of values per energy plane.
    pub channels: Vec<Vec<f64>>,
}

impl SkymapTable {
    /// Column names: `CHANNEL1` through `CHANNELn`, 1-based.
    pub fn channel_names(&self) -> Vec<String> {
        (1..=self.channels.len())
            .map(|i| format!("CHANNEL{i}"))
            .collect()
    }

    pub fn n_rows(&self) -> usize {
        self.channels.first().map(|c| c.len()).unwrap_or(0)
    }
}

/// One row of the energy bounds table accompanying a binned map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyBound {
    /// 1-based channel number.
    pub channel: usize,
    /// Lower bin edge in linear energy units.
    pub e_min: f64,
    /// Upper bin edge in linear energy units.
    pub e_max: f64,
    /// Geometric-mean reference energy of the bin.
    pub e_ref: f64,
}

/// Expands log10 bin edges into the rows of an energy bounds table.
pub fn energy_bounds(log10_edges: &[f64]) -> ReprojectResult<Vec<EnergyBound>> {
    if log10_edges.len() < 2 {
        return Err(ReprojectError::range(
            "energy bounds need at least two bin edges",
        ));
    }
    Ok(log10_edges
        .windows(2)
        .enumerate()
        .map(|(i, pair)| EnergyBound {
            channel: i + 1,
            e_min: libm::pow(10.0, pair[0]),
            e_max: libm::pow(10.0, pair[1]),
            e_ref: libm::pow(10.0, 0.5 * (pair[0] + pair[1])),
        })
        .collect())
}

//! The HEALPix pixelization of a map: resolution, indexing scheme, sky
//! frame, an optional region selection and an optional energy axis.
//!
//! With a region attached the map is sparse: data vectors carry one
//! entry per selected pixel, addressed through the local index lookup.

use std::collections::HashMap;

use skymap_healpix::{nside_to_order, npix, order_to_nside, Scheme};
use skymap_wcs::{Frame, KeywordMap, KeywordProvider};

use crate::error::{ReprojectError, ReprojectResult};
use crate::region::Region;

/// Local index sentinel for pixels outside the region.
pub const INVALID_INDEX: i64 = -1;

#[derive(Debug, Clone, PartialEq)]
pub struct HpxPixelization {
    nside: u64,
    order: u32,
    scheme: Scheme,
    frame: Frame,
    region: Option<Region>,
    indices: Option<Vec<u64>>,
    global_to_local: Option<HashMap<u64, usize>>,
    energy_edges: Option<Vec<f64>>,
    /// Whether the resolution was given as an order rather than nside.
    /// Headers record ORDER = -1 for nside-constructed maps.
    explicit_order: bool,
}

impl HpxPixelization {
    /// Builds a pixelization, enumerating the region's pixels when one
    /// is given. `energy_edges` are log10 bin edges in ascending order.
    pub fn new(
        nside: u64,
        scheme: Scheme,
        frame: Frame,
        region: Option<Region>,
        energy_edges: Option<Vec<f64>>,
    ) -> ReprojectResult<Self> {
        Self::build(nside, scheme, frame, region, energy_edges, false)
    }

    /// Like [`HpxPixelization::new`] but with the resolution given as
    /// an order, `nside = 2^order`.
    pub fn from_order(
        order: u32,
        scheme: Scheme,
        frame: Frame,
        region: Option<Region>,
        energy_edges: Option<Vec<f64>>,
    ) -> ReprojectResult<Self> {
        if order > skymap_healpix::MAX_ORDER {
            return Err(ReprojectError::range(format!(
                "order {order} exceeds the maximum {}",
                skymap_healpix::MAX_ORDER
            )));
        }
        Self::build(order_to_nside(order), scheme, frame, region, energy_edges, true)
    }

    fn build(
        nside: u64,
        scheme: Scheme,
        frame: Frame,
        region: Option<Region>,
        energy_edges: Option<Vec<f64>>,
        explicit_order: bool,
    ) -> ReprojectResult<Self> {
        let order = nside_to_order(nside)?;

        if let Some(edges) = &energy_edges {
            if edges.len() < 2 {
                return Err(ReprojectError::range(
                    "energy axis needs at least two bin edges",
                ));
            }
            if edges.windows(2).any(|pair| pair[1] <= pair[0]) {
                return Err(ReprojectError::range(
                    "energy bin edges must be strictly ascending",
                ));
            }
        }

        let (indices, global_to_local) = match &region {
            Some(region) => {
                let indices = region.indices(nside, scheme)?;
                if indices.is_empty() {
                    return Err(ReprojectError::configuration(format!(
                        "region {region} selects no pixels at nside {nside}"
                    )));
                }
                let lookup: HashMap<u64, usize> = indices
                    .iter()
                    .enumerate()
                    .map(|(local, &global)| (global, local))
                    .collect();
                (Some(indices), Some(lookup))
            }
            None => (None, None),
        };

        Ok(Self {
            nside,
            order,
            scheme,
            frame,
            region,
            indices,
            global_to_local,
            energy_edges,
            explicit_order,
        })
    }

    pub fn all_sky(
        nside: u64,
        scheme: Scheme,
        frame: Frame,
        energy_edges: Option<Vec<f64>>,
    ) -> ReprojectResult<Self> {
        Self::new(nside, scheme, frame, None, energy_edges)
    }

    #[inline]
    pub fn nside(&self) -> u64 {
        self.nside
    }

    #[inline]
    pub fn order(&self) -> u32 {
        self.order
    }

    #[inline]
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    #[inline]
    pub fn frame(&self) -> Frame {
        self.frame
    }

    #[inline]
    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    /// Selected pixel indices in ascending order, or `None` all-sky.
    #[inline]
    pub fn indices(&self) -> Option<&[u64]> {
        self.indices.as_deref()
    }

    /// Number of pixels carried by a data plane of this map.
    pub fn n_pixels(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len(),
            None => npix(self.nside) as usize,
        }
    }

    /// Number of pixels of the full sphere at this resolution.
    #[inline]
    pub fn full_n_pixels(&self) -> u64 {
        npix(self.nside)
    }

    /// Position of a global pixel index within the data plane, or the
    /// negative sentinel when the pixel is outside the region. Callers
    /// must treat only values `>= 0` as valid; local index 0 is a real
    /// pixel.
    pub fn global_to_local(&self, global: u64) -> i64 {
        match &self.global_to_local {
            Some(lookup) => lookup
                .get(&global)
                .map(|&local| local as i64)
                .unwrap_or(INVALID_INDEX),
            None => {
                if global < self.full_n_pixels() {
                    global as i64
                } else {
                    INVALID_INDEX
                }
            }
        }
    }

    pub fn local_to_global(&self, local: usize) -> ReprojectResult<u64> {
        match &self.indices {
            Some(indices) => indices.get(local).copied().ok_or_else(|| {
                ReprojectError::range(format!(
                    "local index {local} out of range for {} selected pixels",
                    indices.len()
                ))
            }),
            None => {
                let global = local as u64;
                if global < self.full_n_pixels() {
                    Ok(global)
                } else {
                    Err(ReprojectError::range(format!(
                        "pixel {local} out of range for nside {}",
                        self.nside
                    )))
                }
            }
        }
    }

    #[inline]
    pub fn contains(&self, global: u64) -> bool {
        self.global_to_local(global) >= 0
    }

    /// Global pixel index of a sky direction in this map's frame.
    pub fn ang2pix(&self, lon_deg: f64, lat_deg: f64) -> u64 {
        skymap_healpix::ang2pix_lonlat(self.nside, self.scheme, lon_deg, lat_deg)
    }

    /// Center of a global pixel as `(lon, lat)` degrees.
    pub fn pix2ang(&self, global: u64) -> (f64, f64) {
        skymap_healpix::pix2ang_lonlat(self.nside, self.scheme, global)
    }

    /// log10 energy bin edges, when the map has an energy axis.
    #[inline]
    pub fn energy_edges(&self) -> Option<&[f64]> {
        self.energy_edges.as_deref()
    }

    pub fn n_energy_bins(&self) -> usize {
        self.energy_edges
            .as_ref()
            .map(|e| e.len() - 1)
            .unwrap_or(1)
    }

    /// Geometric-mean energy of each bin, in linear units.
    pub fn energy_bin_centers(&self) -> Option<Vec<f64>> {
        self.energy_edges.as_ref().map(|edges| {
            edges
                .windows(2)
                .map(|pair| libm::pow(10.0, 0.5 * (pair[0] + pair[1])))
                .collect()
        })
    }

    /// Emits the header keywords identifying this pixelization.
    pub fn to_keywords(&self) -> KeywordMap {
        let mut map = KeywordMap::new();
        let order = if self.explicit_order {
            self.order as i64
        } else {
            -1
        };
        map.set_string("PIXTYPE", "HEALPIX")
            .set_string("ORDERING", self.scheme.as_str())
            .set_int("ORDER", order)
            .set_int("NSIDE", self.nside as i64)
            .set_string("COORDSYS", self.frame.coordsys())
            .set_int("FIRSTPIX", 0)
            .set_int("LASTPIX", (self.full_n_pixels() - 1) as i64);
        if self.frame == Frame::Celestial {
            map.set_float("EQUINOX", 2000.0);
        }
        if let Some(region) = &self.region {
            map.set_string("HPX_REG", region.to_string());
        }
        map
    }

    /// Rebuilds a pixelization from keywords written by
    /// [`HpxPixelization::to_keywords`]. Energy edges travel in a table
    /// extension rather than the header, so they are passed separately.
    pub fn from_keywords(
        provider: &impl KeywordProvider,
        energy_edges: Option<Vec<f64>>,
    ) -> ReprojectResult<Self> {
        let pixtype = provider.require_string("PIXTYPE")?;
        if pixtype != "HEALPIX" {
            return Err(ReprojectError::parse(
                pixtype,
                "PIXTYPE must be HEALPIX",
            ));
        }
        let scheme = Scheme::parse(&provider.require_string("ORDERING")?)?;
        let frame = Frame::parse_coordsys(&provider.require_string("COORDSYS")?)?;
        let region = match provider
            .get_string("HPX_REG")
            .or_else(|| provider.get_string("HPXREGION"))
        {
            Some(text) => Some(text.parse::<Region>()?),
            None => None,
        };
        // ORDER below zero marks a map whose resolution was written as
        // NSIDE only.
        match provider.get_int("ORDER").filter(|&order| order >= 0) {
            Some(order) => Self::from_order(order as u32, scheme, frame, region, energy_edges),
            None => {
                let nside = provider.require_int("NSIDE")? as u64;
                Self::new(nside, scheme, frame, region, energy_edges)
            }
        }
    }
}

//! Regular sky grids: a pixel lattice tied to the sky through the
//! linear, projection and rotation stages, plus an optional third axis
//! for energy planes.

use skymap_core::Angle;

use crate::coordinate::{PixelCoord, SkyCoord};
use crate::error::{WcsError, WcsResult};
use crate::header::{KeywordMap, KeywordProvider};
use crate::linear::LinearTransform;
use crate::spherical::{Projection, SphericalRotation};

/// Sky coordinate frame of a grid or pixelization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    /// Equatorial J2000 (RA, Dec).
    Celestial,
    /// Galactic (l, b).
    Galactic,
}

impl Frame {
    /// Header string for the COORDSYS keyword.
    pub fn coordsys(&self) -> &'static str {
        match self {
            Frame::Celestial => "CEL",
            Frame::Galactic => "GAL",
        }
    }

    pub fn parse_coordsys(name: &str) -> WcsResult<Self> {
        match name.trim() {
            "CEL" | "EQU" => Ok(Frame::Celestial),
            "GAL" => Ok(Frame::Galactic),
            other => Err(WcsError::invalid_keyword(
                "COORDSYS",
                format!("unknown frame '{other}'"),
            )),
        }
    }

    /// Five-character CTYPE prefixes for the longitude and latitude
    /// axes, dashes included.
    pub fn ctype_prefixes(&self) -> (&'static str, &'static str) {
        match self {
            Frame::Celestial => ("RA---", "DEC--"),
            Frame::Galactic => ("GLON-", "GLAT-"),
        }
    }

    fn from_ctype_prefix(prefix: &str) -> WcsResult<Self> {
        match prefix {
            "RA---" => Ok(Frame::Celestial),
            "GLON-" => Ok(Frame::Galactic),
            other => Err(WcsError::invalid_keyword(
                "CTYPE1",
                format!("unrecognized axis prefix '{other}'"),
            )),
        }
    }
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.coordsys())
    }
}

/// Logarithmic energy axis stored as a linear FITS axis on the first
/// bin edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyAxis {
    crval: f64,
    cdelt: f64,
    crpix: f64,
    nbins: usize,
}

impl EnergyAxis {
    /// Builds the axis from log10 bin edges, at least two of them.
    pub fn from_log10_edges(edges: &[f64]) -> WcsResult<Self> {
        if edges.len() < 2 {
            return Err(WcsError::invalid_parameter(
                "energy axis needs at least two bin edges",
            ));
        }
        let e0 = libm::pow(10.0, edges[0]);
        let e1 = libm::pow(10.0, edges[1]);
        Ok(Self {
            crval: e0,
            cdelt: e1 - e0,
            crpix: 1.0,
            nbins: edges.len() - 1,
        })
    }

    #[inline]
    pub fn crval(&self) -> f64 {
        self.crval
    }

    #[inline]
    pub fn cdelt(&self) -> f64 {
        self.cdelt
    }

    #[inline]
    pub fn crpix(&self) -> f64 {
        self.crpix
    }

    #[inline]
    pub fn nbins(&self) -> usize {
        self.nbins
    }
}

/// A projected sky grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SkyGrid {
    frame: Frame,
    projection: Projection,
    crval: SkyCoord,
    linear: LinearTransform,
    rotation: SphericalRotation,
    naxis1: usize,
    naxis2: usize,
    energy: Option<EnergyAxis>,
}

impl SkyGrid {
    /// Assembles a grid from its defining keywords. `crpix` is 1-based
    /// and `cdelt` is in degrees per pixel, longitude axis typically
    /// negative.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        frame: Frame,
        projection: Projection,
        crval: SkyCoord,
        crpix: [f64; 2],
        cdelt: [f64; 2],
        naxis1: usize,
        naxis2: usize,
        energy: Option<EnergyAxis>,
    ) -> WcsResult<Self> {
        if naxis1 == 0 || naxis2 == 0 {
            return Err(WcsError::invalid_parameter("grid axes must be non-empty"));
        }
        let linear = LinearTransform::from_cdelt(crpix, cdelt)?;
        let (_, theta_0) = projection.native_reference();
        let rotation = SphericalRotation::from_crval(
            crval.lon(),
            crval.lat(),
            Angle::from_degrees(theta_0),
            None,
        )?;
        Ok(Self {
            frame,
            projection,
            crval,
            linear,
            rotation,
            naxis1,
            naxis2,
            energy,
        })
    }

    #[inline]
    pub fn frame(&self) -> Frame {
        self.frame
    }

    #[inline]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    #[inline]
    pub fn crval(&self) -> SkyCoord {
        self.crval
    }

    #[inline]
    pub fn naxis1(&self) -> usize {
        self.naxis1
    }

    #[inline]
    pub fn naxis2(&self) -> usize {
        self.naxis2
    }

    #[inline]
    pub fn energy_axis(&self) -> Option<&EnergyAxis> {
        self.energy.as_ref()
    }

    #[inline]
    pub fn linear(&self) -> &LinearTransform {
        &self.linear
    }

    /// Number of spatial cells.
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.naxis1 * self.naxis2
    }

    /// Sky direction of a pixel coordinate.
    pub fn pixel_to_sky(&self, pixel: PixelCoord) -> WcsResult<SkyCoord> {
        let inter = self.linear.pixel_to_intermediate(pixel);
        let native = self.projection.deproject(inter)?;
        Ok(self.rotation.native_to_sky(native))
    }

    /// Pixel coordinate of a sky direction.
    pub fn sky_to_pixel(&self, sky: SkyCoord) -> WcsResult<PixelCoord> {
        let native = self.rotation.sky_to_native(sky);
        let inter = self.projection.project(native)?;
        Ok(self.linear.intermediate_to_pixel(inter))
    }

    /// Sky direction of the center of a 0-based grid cell.
    pub fn cell_to_sky(&self, col: usize, row: usize) -> WcsResult<SkyCoord> {
        self.pixel_to_sky(PixelCoord::from_grid_index(col, row))
    }

    /// Emits the grid's defining keywords.
    pub fn to_keywords(&self) -> KeywordMap {
        let (lon_prefix, lat_prefix) = self.frame.ctype_prefixes();
        let code = self.projection.code();
        let crpix = self.linear.crpix();
        let cd = self.linear.cd_matrix();

        let mut map = KeywordMap::new();
        let naxis = if self.energy.is_some() { 3 } else { 2 };
        map.set_int("NAXIS", naxis)
            .set_int("NAXIS1", self.naxis1 as i64)
            .set_int("NAXIS2", self.naxis2 as i64)
            .set_string("CTYPE1", format!("{lon_prefix}{code}"))
            .set_string("CTYPE2", format!("{lat_prefix}{code}"))
            .set_float("CRPIX1", crpix[0])
            .set_float("CRPIX2", crpix[1])
            .set_float("CRVAL1", self.crval.lon().degrees())
            .set_float("CRVAL2", self.crval.lat().degrees())
            .set_float("CDELT1", cd[0][0])
            .set_float("CDELT2", cd[1][1])
            .set_float("LATPOLE", self.rotation.pole_lat_degrees());
        if let Some(energy) = &self.energy {
            map.set_int("NAXIS3", energy.nbins() as i64)
                .set_string("CTYPE3", "Energy")
                .set_float("CRPIX3", energy.crpix())
                .set_float("CRVAL3", energy.crval())
                .set_float("CDELT3", energy.cdelt());
        }
        map
    }

    /// Rebuilds a grid from keywords written by [`SkyGrid::to_keywords`].
    pub fn from_keywords(provider: &impl KeywordProvider) -> WcsResult<Self> {
        let ctype1 = provider.require_string("CTYPE1")?;
        if ctype1.len() != 8 {
            return Err(WcsError::invalid_keyword(
                "CTYPE1",
                format!("expected 8 characters, got '{ctype1}'"),
            ));
        }
        let frame = Frame::from_ctype_prefix(&ctype1[..5])?;
        let projection = Projection::from_code(&ctype1[5..])?;

        let ctype2 = provider.require_string("CTYPE2")?;
        let (_, lat_prefix) = frame.ctype_prefixes();
        let expected = format!("{lat_prefix}{}", projection.code());
        if ctype2 != expected {
            return Err(WcsError::invalid_keyword(
                "CTYPE2",
                format!("expected '{expected}', got '{ctype2}'"),
            ));
        }

        let crval = SkyCoord::from_degrees(
            provider.require_float("CRVAL1")?,
            provider.require_float("CRVAL2")?,
        );
        let crpix = [
            provider.require_float("CRPIX1")?,
            provider.require_float("CRPIX2")?,
        ];
        let cdelt = [
            provider.require_float("CDELT1")?,
            provider.require_float("CDELT2")?,
        ];
        let naxis1 = provider.require_int("NAXIS1")? as usize;
        let naxis2 = provider.require_int("NAXIS2")? as usize;

        let energy = match provider.get_int("NAXIS3") {
            Some(nbins) => Some(EnergyAxis {
                crval: provider.require_float("CRVAL3")?,
                cdelt: provider.require_float("CDELT3")?,
                crpix: provider.require_float("CRPIX3")?,
                nbins: nbins as usize,
            }),
            None => None,
        };

        Self::new(frame, projection, crval, crpix, cdelt, naxis1, naxis2, energy)
    }
}

//! Reprojection between HEALPix sky maps and projected grids.
//!
//! The pipeline runs in four steps:
//!
//! 1. [`HpxPixelization`] fixes the HEALPix geometry, optionally
//!    restricted to a [`Region`] and carrying a log10 energy axis.
//! 2. [`build_grid`] derives a matching projected [`SkyGrid`] from that
//!    geometry, sized to cover the region at a chosen oversampling.
//! 3. [`HpxToGridMapping`] classifies every grid cell center back onto
//!    the HEALPix sphere and records multiplicity weights.
//! 4. [`HpxMap::to_grid`] applies the mapping plane by plane, either
//!    copying values or normalizing so sums are conserved.
//!
//! Cells that fall outside a sparse map's region carry the sentinel
//! [`INVALID_INDEX`] in the mapping and come out as zero.

pub mod error;
pub mod gridbuilder;
pub mod mapping;
pub mod pixelization;
pub mod rastermap;
pub mod region;

pub use error::{ReprojectError, ReprojectResult};
pub use gridbuilder::build_grid;
pub use mapping::HpxToGridMapping;
pub use pixelization::{HpxPixelization, INVALID_INDEX};
pub use rastermap::{energy_bounds, EnergyBound, GridMap, HpxMap, SkymapTable};
pub use region::Region;

pub use skymap_healpix::Scheme;
pub use skymap_wcs::{Frame, Projection, SkyGrid};

//! World Coordinate System transformations for projected sky grids.
//!
//! A grid ties a flat pixel lattice to the celestial sphere through
//! three composable stages:
//!
//! | Stage        | Types                                  |
//! |--------------|----------------------------------------|
//! | Linear       | [`PixelCoord`] <-> [`IntermediateCoord`] |
//! | Projection   | [`IntermediateCoord`] <-> [`NativeCoord`] |
//! | Rotation     | [`NativeCoord`] <-> [`SkyCoord`]       |
//!
//! [`SkyGrid`] composes the full pipeline and round-trips through FITS
//! header keywords. The projection set is limited to CAR, CEA, TAN and
//! AIT, the ones that appear in high-energy survey maps.

pub mod common;
pub mod coordinate;
pub mod error;
pub mod grid;
pub mod header;
pub mod linear;
pub mod spherical;

pub use coordinate::{IntermediateCoord, NativeCoord, PixelCoord, SkyCoord};
pub use error::{WcsError, WcsResult};
pub use grid::{EnergyAxis, Frame, SkyGrid};
pub use header::{KeywordMap, KeywordProvider, KeywordValue};
pub use linear::LinearTransform;
pub use spherical::{Projection, SphericalRotation};

//! Shared angular and spherical math for the skymap workspace.
//!
//! `skymap-core` holds the building blocks the pixelization and
//! projection crates agree on: the radians-backed [`Angle`] type,
//! Cartesian unit direction vectors, angular constants, and
//! normalization helpers.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`angle`] | [`Angle`] type: construction, conversion, trigonometry, arithmetic |
//! | [`vector3`] | [`Vector3`] direction vectors, lon/lat ↔ Cartesian |
//! | [`constants`] | Angular constants (PI, DEG_TO_RAD, ...) |
//! | [`math`] | Vincenty angular separation |
//! | [`utils`] | Longitude/latitude/angle normalization |
//!
//! # Conventions
//!
//! Longitudes and latitudes cross crate boundaries in degrees; all
//! internal trigonometry is in radians. The spherical → Cartesian
//! transform uses colatitude (90° − latitude), matching the HEALPix
//! convention of the rest of the workspace.

pub mod angle;
pub mod constants;
pub mod math;
pub mod utils;
pub mod vector3;

pub use angle::Angle;
pub use vector3::Vector3;

pub mod test_helpers;

//! Errors raised by pixel index computations.

use thiserror::Error;

/// Errors from HEALPix geometry validation and index conversion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HealpixError {
    /// The nside parameter is not a power of two.
    #[error("invalid nside {nside}: must be a power of two")]
    InvalidNside { nside: u64 },

    /// The resolution order falls outside the supported range.
    #[error("order {order} out of range: must be <= {max}")]
    OrderOutOfRange { order: u32, max: u32 },

    /// A pixel index does not exist at the given resolution.
    #[error("pixel {pixel} out of range for nside {nside} ({npix} pixels)")]
    PixelOutOfRange { pixel: u64, nside: u64, npix: u64 },

    /// A scheme string was not one of the recognized names.
    #[error("unknown ordering scheme '{name}': expected RING or NESTED")]
    UnknownScheme { name: String },
}

impl HealpixError {
    pub fn invalid_nside(nside: u64) -> Self {
        HealpixError::InvalidNside { nside }
    }

    pub fn order_out_of_range(order: u32, max: u32) -> Self {
        HealpixError::OrderOutOfRange { order, max }
    }

    pub fn pixel_out_of_range(pixel: u64, nside: u64, npix: u64) -> Self {
        HealpixError::PixelOutOfRange { pixel, nside, npix }
    }

    pub fn unknown_scheme(name: impl Into<String>) -> Self {
        HealpixError::UnknownScheme { name: name.into() }
    }
}

//! Error taxonomy for the reprojection pipeline.

use skymap_healpix::HealpixError;
use skymap_wcs::WcsError;
use thiserror::Error;

pub type ReprojectResult<T> = Result<T, ReprojectError>;

#[derive(Debug, Error)]
pub enum ReprojectError {
    /// A pixelization or grid was assembled from inconsistent inputs.
    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    /// A region string or header keyword could not be parsed.
    #[error("Cannot parse '{text}': {message}")]
    Parse { text: String, message: String },

    /// Two components that must describe the same geometry do not.
    #[error("Geometry mismatch: {message}")]
    GeometryMismatch { message: String },

    /// An index or value fell outside its valid range.
    #[error("Out of range: {message}")]
    Range { message: String },

    #[error("WCS error: {source}")]
    Wcs {
        #[from]
        source: WcsError,
    },

    #[error("HEALPix error: {source}")]
    Healpix {
        #[from]
        source: HealpixError,
    },
}

impl ReprojectError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn parse(text: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            text: text.into(),
            message: message.into(),
        }
    }

    pub fn geometry_mismatch(message: impl Into<String>) -> Self {
        Self::GeometryMismatch {
            message: message.into(),
        }
    }

    pub fn range(message: impl Into<String>) -> Self {
        Self::Range {
            message: message.into(),
        }
    }
}

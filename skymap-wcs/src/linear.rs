//! Linear stage of the pipeline: pixel offsets from the reference
//! point scaled through the CD matrix into projection-plane degrees.

use crate::coordinate::{IntermediateCoord, PixelCoord};
use crate::error::{WcsError, WcsResult};

const DETERMINANT_THRESHOLD: f64 = 1e-15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTransform {
    crpix: [f64; 2],
    cd: [[f64; 2]; 2],
    cd_inverse: [[f64; 2]; 2],
    determinant: f64,
}

impl LinearTransform {
    pub fn from_cd(crpix: [f64; 2], cd: [[f64; 2]; 2]) -> WcsResult<Self> {
        let determinant = cd[0][0] * cd[1][1] - cd[0][1] * cd[1][0];
        if determinant.abs() < DETERMINANT_THRESHOLD {
            return Err(WcsError::non_invertible_matrix(determinant));
        }
        let cd_inverse = compute_inverse(cd, determinant);
        Ok(Self {
            crpix,
            cd,
            cd_inverse,
            determinant,
        })
    }

    /// Diagonal matrix from per-axis scales, the common case for grids
    /// built without rotation or skew.
    pub fn from_cdelt(crpix: [f64; 2], cdelt: [f64; 2]) -> WcsResult<Self> {
        Self::from_cd(crpix, [[cdelt[0], 0.0], [0.0, cdelt[1]]])
    }

    pub fn pixel_to_intermediate(&self, pixel: PixelCoord) -> IntermediateCoord {
        let d0 = pixel.x() - self.crpix[0];
        let d1 = pixel.y() - self.crpix[1];
        let x = self.cd[0][0] * d0 + self.cd[0][1] * d1;
        let y = self.cd[1][0] * d0 + self.cd[1][1] * d1;
        IntermediateCoord::new(x, y)
    }

    pub fn intermediate_to_pixel(&self, inter: IntermediateCoord) -> PixelCoord {
        let x = inter.x_deg();
        let y = inter.y_deg();
        let px = self.cd_inverse[0][0] * x + self.cd_inverse[0][1] * y + self.crpix[0];
        let py = self.cd_inverse[1][0] * x + self.cd_inverse[1][1] * y + self.crpix[1];
        PixelCoord::new(px, py)
    }

    #[inline]
    pub fn crpix(&self) -> [f64; 2] {
        self.crpix
    }

    #[inline]
    pub fn cd_matrix(&self) -> [[f64; 2]; 2] {
        self.cd
    }

    /// Geometric mean of the per-axis scales in degrees per pixel.
    #[inline]
    pub fn pixel_scale(&self) -> f64 {
        libm::sqrt(self.determinant.abs())
    }
}

fn compute_inverse(m: [[f64; 2]; 2], det: f64) -> [[f64; 2]; 2] {
    let inv_det = 1.0 / det;
    [
        [m[1][1] * inv_det, -m[0][1] * inv_det],
        [-m[1][0] * inv_det, m[0][0] * inv_det],
    ]
}

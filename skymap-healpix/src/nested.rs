//! NESTED-scheme index computations.
//!
//! The sphere is divided into twelve base faces, each covered by an
//! `nside` x `nside` grid. A nested index is the face number followed by
//! the Z-order interleave of the in-face coordinates, so the four
//! children of any pixel are contiguous at the next finer order.

use skymap_core::constants::TWO_PI;

/// Ring offset of each base face, counted in units of `nside` from the
/// north pole along the z axis.
pub(crate) const JRLL: [i64; 12] = [2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4];

/// Longitude offset of each base face, in units of 45 degrees.
pub(crate) const JPLL: [i64; 12] = [1, 3, 5, 7, 0, 2, 4, 6, 1, 3, 5, 7];

/// Maps longitude in radians to the range [0, 4), one unit per quadrant.
#[inline]
pub(crate) fn phi_to_tt(phi: f64) -> f64 {
    let mut tt = phi % TWO_PI;
    if tt < 0.0 {
        tt += TWO_PI;
    }
    tt * (2.0 / std::f64::consts::PI)
}

/// Locates the base face and in-face coordinates for a direction given
/// as `z = cos(theta)` and longitude `phi` in radians.
pub(crate) fn compute_face_and_position(nside: u64, z: f64, phi: f64) -> (usize, u64, u64) {
    let tt = phi_to_tt(phi);
    if z.abs() <= 2.0 / 3.0 {
        compute_equatorial_face(nside, z, tt)
    } else {
        compute_polar_face(nside, z, tt)
    }
}

/// Equatorial belt: the edge lines of the rhombic faces run at slopes
/// of +-1 in the (tt, 3z/2) plane.
fn compute_equatorial_face(nside: u64, z: f64, tt: f64) -> (usize, u64, u64) {
    let nsf = nside as f64;
    let temp1 = nsf * (0.5 + tt);
    let temp2 = nsf * (z * 0.75);

    // Indices of the ascending and descending edge lines.
    let jp = (temp1 - temp2) as i64;
    let jm = (temp1 + temp2) as i64;

    let ifp = jp >> super::nside_to_order_unchecked(nside);
    let ifm = jm >> super::nside_to_order_unchecked(nside);

    let face = if ifp == ifm {
        // Faces 4 to 7 straddle the equator.
        ((ifp | 4) & 7) as usize
    } else if ifp < ifm {
        // Northern face.
        (ifp & 3) as usize
    } else {
        // Southern face.
        ((ifm & 3) + 8) as usize
    };

    let nside_i = nside as i64;
    let ix = (jm & (nside_i - 1)) as u64;
    let iy = ((nside_i - 1) - (jp & (nside_i - 1))) as u64;
    (face, ix, iy)
}

/// Polar caps: rings shrink toward the pole and the face is fixed by
/// the quadrant alone.
fn compute_polar_face(nside: u64, z: f64, tt: f64) -> (usize, u64, u64) {
    let nsf = nside as f64;
    let ntt = (tt as i64).min(3) as usize;
    let tp = tt - ntt as f64;
    let tmp = nsf * libm::sqrt(3.0 * (1.0 - z.abs()));

    let mut jp = (tp * tmp) as i64;
    let mut jm = ((1.0 - tp) * tmp) as i64;
    let nside_i = nside as i64;
    jp = jp.min(nside_i - 1);
    jm = jm.min(nside_i - 1);

    if z >= 0.0 {
        (ntt, (nside_i - jm - 1) as u64, (nside_i - jp - 1) as u64)
    } else {
        (ntt + 8, jp as u64, jm as u64)
    }
}

/// Interleaves the bits of `ix` and `iy` into a Z-order curve index
/// within one face.
pub(crate) fn xy2pix(order: u32, ix: u64, iy: u64) -> u64 {
    let mut pix = 0u64;
    for bit in 0..order {
        let mask = 1u64 << bit;
        pix |= (ix & mask) << bit;
        pix |= (iy & mask) << (bit + 1);
    }
    pix
}

/// Inverse of [`xy2pix`]: splits a Z-order index back into in-face
/// coordinates.
pub(crate) fn pix2xy(order: u32, pix: u64) -> (u64, u64) {
    let mut ix = 0u64;
    let mut iy = 0u64;
    for bit in 0..order {
        ix |= (pix >> bit) & (1u64 << bit);
        iy |= (pix >> (bit + 1)) & (1u64 << bit);
    }
    (ix, iy)
}

/// Computes the NESTED pixel index for a direction given as
/// `z = cos(theta)` and longitude `phi` in radians.
pub(crate) fn ang2pix_nest_zphi(nside: u64, z: f64, phi: f64) -> u64 {
    let order = super::nside_to_order_unchecked(nside);
    let (face, ix, iy) = compute_face_and_position(nside, z, phi);
    (face as u64) * nside * nside + xy2pix(order, ix, iy)
}

/// Computes `z = cos(theta)` and longitude `phi` in radians for the
/// center of a NESTED pixel.
pub(crate) fn pix2ang_nest_zphi(nside: u64, ipix: u64) -> (f64, f64) {
    let order = super::nside_to_order_unchecked(nside);
    let npface = nside * nside;
    let face = (ipix / npface) as usize;
    let (ix, iy) = pix2xy(order, ipix % npface);

    let nside_i = nside as i64;
    let nl4 = 4 * nside_i;
    let jr = JRLL[face] * nside_i - ix as i64 - iy as i64 - 1;

    let fact2 = 1.0 / (3.0 * (nside * nside) as f64);
    let (nr, z, kshift) = if jr < nside_i {
        // North polar cap.
        let nr = jr;
        (nr, 1.0 - (nr * nr) as f64 * fact2, 0i64)
    } else if jr > 3 * nside_i {
        // South polar cap.
        let nr = nl4 - jr;
        (nr, (nr * nr) as f64 * fact2 - 1.0, 0i64)
    } else {
        // Equatorial belt.
        let fact1 = 2.0 * nside as f64 * fact2;
        (nside_i, (2 * nside_i - jr) as f64 * fact1, (jr - nside_i) & 1)
    };

    let mut jp = (JPLL[face] * nr + ix as i64 - iy as i64 + 1 + kshift) / 2;
    if jp > nl4 {
        jp -= nl4;
    }
    if jp < 1 {
        jp += nl4;
    }

    let phi = (jp as f64 - (kshift as f64 + 1.0) * 0.5)
        * (std::f64::consts::FRAC_PI_2 / nr as f64);
    (z, phi)
}

/// Converts a NESTED pixel index to the RING index of the same pixel.
pub(crate) fn nest2ring(nside: u64, ipix: u64) -> u64 {
    let order = super::nside_to_order_unchecked(nside);
    let npface = nside * nside;
    let face = (ipix / npface) as usize;
    let (ix, iy) = pix2xy(order, ipix % npface);

    let nside_i = nside as i64;
    let nl4 = 4 * nside_i;
    let npix = 12 * nside_i * nside_i;
    let ncap = 2 * nside_i * (nside_i - 1);
    let jr = JRLL[face] * nside_i - ix as i64 - iy as i64 - 1;

    let (nr, n_before, kshift) = if jr < nside_i {
        // North polar cap.
        let nr = jr;
        (nr, 2 * nr * (nr - 1), 0i64)
    } else if jr > 3 * nside_i {
        // South polar cap.
        let nr = nl4 - jr;
        (nr, npix - 2 * (nr + 1) * nr, 0i64)
    } else {
        (nside_i, ncap + (jr - nside_i) * nl4, (jr - nside_i) & 1)
    };

    let mut jp = (JPLL[face] * nr + ix as i64 - iy as i64 + 1 + kshift) / 2;
    if jp > nl4 {
        jp -= nl4;
    }
    if jp < 1 {
        jp += nl4;
    }

    (n_before + jp - 1) as u64
}

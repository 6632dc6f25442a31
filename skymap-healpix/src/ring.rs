//! RING-scheme index computations.
//!
//! RING indices count pixels along iso-latitude rings from the north
//! pole southward. The sphere splits into a north polar cap (rings
//! 1..nside-1, ring k holding 4k pixels), an equatorial belt of
//! 2*nside+1 rings with 4*nside pixels each, and a mirrored south cap.

use std::f64::consts::{FRAC_PI_2, PI};

use skymap_core::constants::TWO_PI;

/// Integer square root with a correction pass, exact for all u64 values
/// that arise from pixel arithmetic.
pub(crate) fn isqrt(v: u64) -> u64 {
    let mut res = libm::sqrt(v as f64 + 0.5) as u64;
    while res * res > v {
        res -= 1;
    }
    while (res + 1) * (res + 1) <= v {
        res += 1;
    }
    res
}

/// Computes the RING pixel index for a direction given as
/// `z = cos(theta)` and longitude `phi` in radians.
pub(crate) fn ang2pix_ring_zphi(nside: u64, z: f64, phi: f64) -> u64 {
    let nsf = nside as f64;
    let za = z.abs();
    let mut tt = phi % TWO_PI;
    if tt < 0.0 {
        tt += TWO_PI;
    }
    tt *= 2.0 / PI;

    if za <= 2.0 / 3.0 {
        // Equatorial belt.
        let temp1 = nsf * (0.5 + tt);
        let temp2 = nsf * (z * 0.75);
        let jp = (temp1 - temp2) as i64;
        let jm = (temp1 + temp2) as i64;

        // Ring number counted from z = 2/3, in 1..=2*nside+1.
        let nside_i = nside as i64;
        let ir = nside_i + 1 + jp - jm;
        let kshift = 1 - (ir & 1);

        let nl4 = 4 * nside_i;
        let mut ip = (jp + jm - nside_i + kshift + 1) / 2;
        ip = ip.rem_euclid(nl4);

        let ncap = 2 * nside_i * (nside_i - 1);
        (ncap + (ir - 1) * nl4 + ip) as u64
    } else {
        // Polar caps.
        let tp = tt - libm::floor(tt);
        let tmp = nsf * libm::sqrt(3.0 * (1.0 - za));
        let jp = (tp * tmp) as i64;
        let jm = ((1.0 - tp) * tmp) as i64;

        let ir = jp + jm + 1;
        let mut ip = (tt * ir as f64) as i64;
        ip = ip.rem_euclid(4 * ir);

        if z > 0.0 {
            (2 * ir * (ir - 1) + ip) as u64
        } else {
            let npix = 12 * (nside * nside) as i64;
            (npix - 2 * ir * (ir + 1) + ip) as u64
        }
    }
}

/// Computes `z = cos(theta)` and longitude `phi` in radians for the
/// center of a RING pixel.
pub(crate) fn pix2ang_ring_zphi(nside: u64, ipix: u64) -> (f64, f64) {
    let npix = 12 * nside * nside;
    let ncap = 2 * nside * (nside - 1);
    let fact2 = 1.0 / (3.0 * (nside * nside) as f64);

    if ipix < ncap {
        // North polar cap.
        let iring = (1 + isqrt(1 + 2 * ipix)) >> 1;
        let iphi = (ipix + 1) - 2 * iring * (iring - 1);
        let z = 1.0 - (iring * iring) as f64 * fact2;
        let phi = (iphi as f64 - 0.5) * FRAC_PI_2 / iring as f64;
        (z, phi)
    } else if ipix < npix - ncap {
        // Equatorial belt.
        let fact1 = 2.0 * nside as f64 * fact2;
        let ip = ipix - ncap;
        let iring = ip / (4 * nside) + nside;
        let iphi = ip % (4 * nside) + 1;
        // Rings alternate between two phi offsets.
        let fodd = if (iring + nside) & 1 == 1 { 1.0 } else { 0.5 };
        let z = (2 * nside) as f64 * fact1 - iring as f64 * fact1;
        let phi = (iphi as f64 - fodd) * PI / (2.0 * nside as f64);
        (z, phi)
    } else {
        // South polar cap.
        let ip = npix - ipix;
        let iring = (1 + isqrt(2 * ip - 1)) >> 1;
        let iphi = 4 * iring + 1 - (ip - 2 * iring * (iring - 1));
        let z = -1.0 + (iring * iring) as f64 * fact2;
        let phi = (iphi as f64 - 0.5) * FRAC_PI_2 / iring as f64;
        (z, phi)
    }
}

/// Description of one iso-latitude ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingInfo {
    /// RING index of the first pixel on the ring.
    pub first: u64,
    /// Number of pixels on the ring.
    pub count: u64,
    /// `cos(theta)` of the ring.
    pub z: f64,
}

/// Number of iso-latitude rings at a given resolution.
#[inline]
pub fn n_rings(nside: u64) -> u64 {
    4 * nside - 1
}

/// Looks up the extent and latitude of ring `ring` (1-based, counted
/// from the north pole).
pub fn ring_info(nside: u64, ring: u64) -> RingInfo {
    debug_assert!(ring >= 1 && ring <= n_rings(nside));
    let npix = 12 * nside * nside;
    let ncap = 2 * nside * (nside - 1);
    let fact2 = 1.0 / (3.0 * (nside * nside) as f64);

    if ring < nside {
        RingInfo {
            first: 2 * ring * (ring - 1),
            count: 4 * ring,
            z: 1.0 - (ring * ring) as f64 * fact2,
        }
    } else if ring <= 3 * nside {
        let fact1 = 2.0 * nside as f64 * fact2;
        RingInfo {
            first: ncap + (ring - nside) * 4 * nside,
            count: 4 * nside,
            z: (2 * nside) as f64 * fact1 - ring as f64 * fact1,
        }
    } else {
        let rs = 4 * nside - ring;
        RingInfo {
            first: npix - 2 * rs * (rs + 1),
            count: 4 * rs,
            z: (rs * rs) as f64 * fact2 - 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isqrt_exact() {
        for v in [0u64, 1, 2, 3, 4, 8, 9, 15, 16, 1 << 40, (1 << 20) * (1 << 20) - 1] {
            let r = isqrt(v);
            assert!(r * r <= v);
            assert!((r + 1) * (r + 1) > v);
        }
    }

    #[test]
    fn test_first_and_last_pixels() {
        let nside = 8u64;
        let npix = 12 * nside * nside;
        // Pixel 0 sits on the first ring next to the north pole.
        let (z0, _) = pix2ang_ring_zphi(nside, 0);
        assert!(z0 > 0.99);
        // The last pixel sits next to the south pole.
        let (zl, _) = pix2ang_ring_zphi(nside, npix - 1);
        assert!(zl < -0.99);
    }

    #[test]
    fn test_ang2pix_ring_roundtrip_centers() {
        let nside = 64u64;
        let npix = 12 * nside * nside;
        for ipix in (0..npix).step_by(997) {
            let (z, phi) = pix2ang_ring_zphi(nside, ipix);
            assert_eq!(ang2pix_ring_zphi(nside, z, phi), ipix);
        }
    }

    #[test]
    fn test_ring_info_tiles_index_range() {
        // Rings partition 0..npix with no gaps or overlaps.
        for nside in [1u64, 4, 32] {
            let mut next = 0u64;
            for ring in 1..=n_rings(nside) {
                let info = ring_info(nside, ring);
                assert_eq!(info.first, next);
                next += info.count;
            }
            assert_eq!(next, 12 * nside * nside);
        }
    }

    #[test]
    fn test_ring_info_latitudes_decrease() {
        let nside = 16u64;
        let mut prev = 2.0;
        for ring in 1..=n_rings(nside) {
            let z = ring_info(nside, ring).z;
            assert!(z < prev);
            prev = z;
        }
    }

    #[test]
    fn test_ring_info_matches_pixel_centers() {
        let nside = 16u64;
        for ring in [1u64, nside - 1, nside, 2 * nside, 3 * nside, n_rings(nside)] {
            let info = ring_info(nside, ring);
            let (z, _) = pix2ang_ring_zphi(nside, info.first);
            assert!((z - info.z).abs() < 1e-12);
            let (z_last, _) = pix2ang_ring_zphi(nside, info.first + info.count - 1);
            assert!((z_last - info.z).abs() < 1e-12);
        }
    }

    #[test]
    fn test_equator_maps_to_equatorial_belt() {
        let nside = 32u64;
        let ncap = 2 * nside * (nside - 1);
        let npix = 12 * nside * nside;
        let ipix = ang2pix_ring_zphi(nside, 0.0, 1.0);
        assert!(ipix >= ncap && ipix < npix - ncap);
    }
}

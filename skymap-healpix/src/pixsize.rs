//! Characteristic pixel sizes by resolution order.

/// Approximate pixel size in degrees for orders 0 through 13.
///
/// These are the conventional round figures used when matching a
/// resolution to a requested map scale, not the exact mean spacing.
pub const ORDER_TO_PIXSIZE_DEG: [f64; 14] = [
    32.0, 16.0, 8.0, 4.0, 2.0, 1.0, 0.50, 0.25, 0.1, 0.05, 0.025, 0.01, 0.005, 0.002,
];

/// Approximate pixel size in degrees at a given order.
#[inline]
pub fn order_pixel_size_deg(order: u32) -> f64 {
    ORDER_TO_PIXSIZE_DEG[order as usize]
}

/// Exact mean spacing between pixel centers at a given nside, in
/// degrees. Derived from the equal-area property: each pixel covers
/// `4*pi / npix` steradians.
pub fn nside_to_resolution_deg(nside: u64) -> f64 {
    skymap_core::constants::HEALPIX_MEAN_SPACING_DEG / nside as f64
}

/// Smallest order whose pixels are at least as fine as `pixsize_deg`.
/// Falls back to the finest supported order when the request is finer
/// than the table.
pub fn pixel_size_to_order(pixsize_deg: f64) -> u32 {
    for (order, &size) in ORDER_TO_PIXSIZE_DEG.iter().enumerate() {
        if size <= pixsize_deg {
            return order as u32;
        }
    }
    (ORDER_TO_PIXSIZE_DEG.len() - 1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_monotonic() {
        for pair in ORDER_TO_PIXSIZE_DEG.windows(2) {
            assert!(pair[1] < pair[0]);
        }
    }

    #[test]
    fn test_pixel_size_to_order() {
        assert_eq!(pixel_size_to_order(32.0), 0);
        assert_eq!(pixel_size_to_order(1.0), 5);
        assert_eq!(pixel_size_to_order(0.6), 6);
        assert_eq!(pixel_size_to_order(0.001), 13);
    }

    #[test]
    fn test_resolution_shrinks_with_nside() {
        assert!(nside_to_resolution_deg(128) < nside_to_resolution_deg(64));
        // Order 6 (nside 64) is a bit finer than one degree.
        let r = nside_to_resolution_deg(64);
        assert!(r > 0.5 && r < 1.1);
    }
}

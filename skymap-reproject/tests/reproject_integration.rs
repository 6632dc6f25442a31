use std::collections::HashSet;

use skymap_reproject::{
    build_grid, energy_bounds, Frame, HpxMap, HpxPixelization, HpxToGridMapping, Projection,
    Region, Scheme, SkyGrid, INVALID_INDEX,
};

fn disk_pixelization() -> HpxPixelization {
    HpxPixelization::new(
        64,
        Scheme::Ring,
        Frame::Galactic,
        Some(Region::disk(110.0, 75.0, 5.0)),
        Some(vec![2.0, 3.0]),
    )
    .expect("Failed to build pixelization")
}

#[test]
fn test_disk_grid_geometry() {
    let hpx = disk_pixelization();
    let grid = build_grid(&hpx, Projection::car(), 2).expect("Failed to build grid");

    // nside 64 pixels are 0.5 deg in the size table; oversampled by 2
    // the 10 deg footprint becomes an 80 cell square.
    assert_eq!(grid.naxis1(), 80);
    assert_eq!(grid.naxis2(), 80);

    // The reference cell sits half a cell off crval; its center must
    // stay within one cell width of the region center.
    let center = grid
        .cell_to_sky(40, 40)
        .expect("Grid center should deproject");
    let separation = skymap_core::math::angular_separation_deg(
        110.0,
        75.0,
        center.lon().degrees(),
        center.lat().degrees(),
    );
    assert!(separation < 0.5, "Center separation {separation} too large");
}

#[test]
fn test_equatorial_disk_grid_walkthrough() {
    // nside 64 is order 6 with a 0.50 deg pixel in the size table.
    // Oversampled by 2 the scale is 0.25 deg and a 5 deg disk gives
    // floor(10 / 0.25) * 2 = 80 cells per side, centered on (0, 0).
    let hpx = HpxPixelization::new(
        64,
        Scheme::Ring,
        Frame::Celestial,
        Some(Region::disk(0.0, 0.0, 5.0)),
        None,
    )
    .expect("Failed to build pixelization");
    let grid = build_grid(&hpx, Projection::car(), 2).expect("Failed to build grid");

    assert_eq!(grid.naxis1(), 80);
    assert_eq!(grid.naxis2(), 80);
    assert_eq!(grid.linear().crpix(), [40.0, 40.0]);
    let cd = grid.linear().cd_matrix();
    assert_eq!(cd[0][0], -0.25);
    assert_eq!(cd[1][1], 0.25);
    assert_eq!(grid.crval().lon().degrees(), 0.0);
    assert_eq!(grid.crval().lat().degrees(), 0.0);

    // An equator-centered plate carree grid must come back out around
    // the reference point, not its antipode.
    let center = grid
        .cell_to_sky(40, 40)
        .expect("Grid center should deproject");
    let separation = skymap_core::math::angular_separation_deg(
        0.0,
        0.0,
        center.lon().degrees(),
        center.lat().degrees(),
    );
    assert!(separation < 0.5, "Center separation {separation} too large");
}

#[test]
fn test_mapping_marks_cells_outside_region() {
    let hpx = disk_pixelization();
    let grid = build_grid(&hpx, Projection::car(), 2).expect("Failed to build grid");
    let mapping = HpxToGridMapping::build(&hpx, &grid).expect("Failed to build mapping");

    assert_eq!(mapping.n_cells(), 80 * 80);

    // The grid square circumscribes the disk, so its corners fall
    // outside the region while the center does not.
    let n = grid.naxis1();
    assert_eq!(mapping.local_index()[0], INVALID_INDEX);
    assert_eq!(mapping.local_index()[n - 1], INVALID_INDEX);
    assert_eq!(mapping.local_index()[(n - 1) * n], INVALID_INDEX);
    assert!(mapping.is_valid(40 * n + 40));

    // Local index 0 is a real pixel, distinct from the sentinel.
    assert!(mapping.local_index().iter().any(|&l| l == 0));
}

#[test]
fn test_normalized_fill_conserves_covered_sum() {
    let hpx = disk_pixelization();
    let grid = build_grid(&hpx, Projection::car(), 2).expect("Failed to build grid");
    let mapping = HpxToGridMapping::build(&hpx, &grid).expect("Failed to build mapping");

    let plane = vec![1.0; hpx.n_pixels()];
    let out = mapping
        .fill_plane(&plane, true)
        .expect("Failed to fill plane");

    let covered: HashSet<i64> = mapping
        .local_index()
        .iter()
        .copied()
        .filter(|&l| l >= 0)
        .collect();
    let total: f64 = out.iter().sum();
    assert!(
        (total - covered.len() as f64).abs() < 1e-9,
        "Normalized sum {} != covered pixel count {}",
        total,
        covered.len()
    );
}

#[test]
fn test_unnormalized_fill_copies_values() {
    let hpx = disk_pixelization();
    let grid = build_grid(&hpx, Projection::car(), 2).expect("Failed to build grid");
    let mapping = HpxToGridMapping::build(&hpx, &grid).expect("Failed to build mapping");

    let plane: Vec<f64> = (0..hpx.n_pixels()).map(|i| i as f64 + 1.0).collect();
    let out = mapping
        .fill_plane(&plane, false)
        .expect("Failed to fill plane");

    for (cell, &local) in mapping.local_index().iter().enumerate() {
        if local >= 0 {
            assert_eq!(out[cell], plane[local as usize]);
        } else {
            assert_eq!(out[cell], 0.0);
        }
    }
}

#[test]
fn test_map_to_grid_roundtrip_through_cache() {
    let hpx = disk_pixelization();
    let grid = build_grid(&hpx, Projection::car(), 2).expect("Failed to build grid");
    let mapping = HpxToGridMapping::build(&hpx, &grid).expect("Failed to build mapping");

    let data: Vec<f64> = (0..hpx.n_pixels()).map(|i| i as f64).collect();
    let mut map = HpxMap::new(hpx, data).expect("Failed to build map");

    let direct = map
        .to_grid(&mapping, false, false)
        .expect("Conversion failed");
    let cached = map
        .to_grid_cached(&grid, false, false)
        .expect("Cached conversion failed");
    assert_eq!(direct, cached);

    // Second call reuses the cache and must agree.
    let again = map
        .to_grid_cached(&grid, false, false)
        .expect("Cached conversion failed");
    assert_eq!(cached, again);
}

#[test]
fn test_headers_roundtrip() {
    let hpx = disk_pixelization();
    let keywords = hpx.to_keywords();
    let rebuilt = HpxPixelization::from_keywords(&keywords, Some(vec![2.0, 3.0]))
        .expect("Failed to parse keywords");
    assert_eq!(rebuilt, hpx);

    let grid = build_grid(&hpx, Projection::ait(), 2).expect("Failed to build grid");
    let grid_keywords = grid.to_keywords();
    let grid_rebuilt = SkyGrid::from_keywords(&grid_keywords).expect("Failed to parse keywords");
    assert_eq!(grid_rebuilt, grid);
}

#[test]
fn test_energy_bounds_match_pixelization_bins() {
    let hpx = disk_pixelization();
    let bounds = energy_bounds(hpx.energy_edges().unwrap()).expect("Failed to expand edges");
    assert_eq!(bounds.len(), hpx.n_energy_bins());
    assert_eq!(bounds[0].channel, 1);
    assert!((bounds[0].e_min - 100.0).abs() < 1e-9);
    assert!((bounds[0].e_max - 1000.0).abs() < 1e-9);

    let centers = hpx.energy_bin_centers().unwrap();
    assert!((bounds[0].e_ref - centers[0]).abs() < 1e-9);
}

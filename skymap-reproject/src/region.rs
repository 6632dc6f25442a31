//! Sky region selections over a HEALPix pixelization.
//!
//! Regions are exchanged as compact header strings of the form
//! `DISK(lon,lat,radius)`, `DISK_INC(lon,lat,radius,fact)` or
//! `HPX_PIXEL(scheme,nside,pixel)`, all angles in degrees.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;

use skymap_core::constants::RAD_TO_DEG;
use skymap_core::math::angular_separation_deg;
use skymap_healpix::{nside_to_order, pixsize, ring, Scheme};

use crate::error::{ReprojectError, ReprojectResult};

/// A pixel selection on the sphere.
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    /// Pixels whose centers lie within `radius_deg` of the center.
    Disk {
        lon_deg: f64,
        lat_deg: f64,
        radius_deg: f64,
    },
    /// Like [`Region::Disk`] but inclusive: a pixel is kept when any of
    /// its subpixels at `fact` times finer resolution falls inside the
    /// disk, so pixels overlapping the boundary are retained.
    DiskInclusive {
        lon_deg: f64,
        lat_deg: f64,
        radius_deg: f64,
        fact: u64,
    },
    /// Pixels nested inside one coarser pixel.
    ParentPixel {
        scheme: Scheme,
        nside: u64,
        pixel: u64,
    },
}

impl Region {
    pub fn disk(lon_deg: f64, lat_deg: f64, radius_deg: f64) -> Self {
        Region::Disk {
            lon_deg,
            lat_deg,
            radius_deg,
        }
    }

    pub fn disk_inclusive(lon_deg: f64, lat_deg: f64, radius_deg: f64, fact: u64) -> Self {
        Region::DiskInclusive {
            lon_deg,
            lat_deg,
            radius_deg,
            fact,
        }
    }

    pub fn parent_pixel(scheme: Scheme, nside: u64, pixel: u64) -> Self {
        Region::ParentPixel {
            scheme,
            nside,
            pixel,
        }
    }

    /// Direction the region is centered on, in degrees.
    pub fn reference_direction(&self) -> (f64, f64) {
        match *self {
            Region::Disk {
                lon_deg, lat_deg, ..
            }
            | Region::DiskInclusive {
                lon_deg, lat_deg, ..
            } => (lon_deg, lat_deg),
            Region::ParentPixel {
                scheme,
                nside,
                pixel,
            } => skymap_healpix::pix2ang_lonlat(nside, scheme, pixel),
        }
    }

    /// Approximate angular half-size in degrees, used to pick grid
    /// extents. For a parent pixel this is twice its nominal size.
    pub fn angular_size(&self) -> ReprojectResult<f64> {
        match *self {
            Region::Disk { radius_deg, .. } | Region::DiskInclusive { radius_deg, .. } => {
                Ok(radius_deg)
            }
            Region::ParentPixel { nside, .. } => {
                let order = nside_to_order(nside)?;
                Ok(2.0 * pixsize::order_pixel_size_deg(order))
            }
        }
    }

    fn validate(&self) -> ReprojectResult<()> {
        match *self {
            Region::Disk {
                lat_deg,
                radius_deg,
                ..
            } => validate_disk(lat_deg, radius_deg),
            Region::DiskInclusive {
                lat_deg,
                radius_deg,
                fact,
                ..
            } => {
                validate_disk(lat_deg, radius_deg)?;
                if fact == 0 || !fact.is_power_of_two() {
                    return Err(ReprojectError::configuration(format!(
                        "inclusive disk subdivision factor {fact} must be a power of two"
                    )));
                }
                Ok(())
            }
            Region::ParentPixel { nside, pixel, .. } => {
                nside_to_order(nside)?;
                let npix = skymap_healpix::npix(nside);
                if pixel >= npix {
                    return Err(ReprojectError::range(format!(
                        "parent pixel {pixel} out of range for nside {nside}"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Enumerates the region's pixel indices at resolution `nside` in
    /// the given scheme, sorted ascending.
    pub fn indices(&self, nside: u64, scheme: Scheme) -> ReprojectResult<Vec<u64>> {
        nside_to_order(nside)?;
        self.validate()?;
        let mut out = match *self {
            Region::Disk {
                lon_deg,
                lat_deg,
                radius_deg,
            } => disk_indices(nside, scheme, lon_deg, lat_deg, radius_deg),
            Region::DiskInclusive {
                lon_deg,
                lat_deg,
                radius_deg,
                fact,
            } => disk_inclusive_indices(nside, scheme, lon_deg, lat_deg, radius_deg, fact),
            Region::ParentPixel {
                scheme: parent_scheme,
                nside: parent_nside,
                pixel,
            } => {
                // The membership test runs in RING indexing, so bring
                // the parent pixel over first.
                let parent_ring = match parent_scheme {
                    Scheme::Ring => pixel,
                    Scheme::Nested => skymap_healpix::nest2ring(parent_nside, pixel)?,
                };
                parent_pixel_indices(nside, scheme, parent_nside, parent_ring)
            }
        };
        out.sort_unstable();
        Ok(out)
    }
}

fn validate_disk(lat_deg: f64, radius_deg: f64) -> ReprojectResult<()> {
    if !(-90.0..=90.0).contains(&lat_deg) {
        return Err(ReprojectError::range(format!(
            "disk center latitude {lat_deg} outside [-90, 90]"
        )));
    }
    if radius_deg <= 0.0 || radius_deg > 180.0 {
        return Err(ReprojectError::range(format!(
            "disk radius {radius_deg} outside (0, 180]"
        )));
    }
    Ok(())
}

/// Walks the iso-latitude rings that can intersect the disk and keeps
/// pixels by an exact center test.
fn disk_indices(nside: u64, scheme: Scheme, lon: f64, lat: f64, radius: f64) -> Vec<u64> {
    collect_band_pixels(nside, lat, radius, 0.0, |center_lon, center_lat, ring_pix| {
        if angular_separation_deg(lon, lat, center_lon, center_lat) <= radius {
            Some(resolve_scheme(nside, scheme, ring_pix, center_lon, center_lat))
        } else {
            None
        }
    })
}

/// Inclusive variant: a candidate from an enlarged band is kept when
/// any of its subpixels at `fact` times finer resolution has its
/// center inside the disk.
fn disk_inclusive_indices(
    nside: u64,
    scheme: Scheme,
    lon: f64,
    lat: f64,
    radius: f64,
    fact: u64,
) -> Vec<u64> {
    let resolution = pixsize::nside_to_resolution_deg(nside);
    let margin = 2.0 * resolution;
    let sub_order = fact.trailing_zeros();
    let sub_nside = nside * fact;
    let children_per_pixel = fact * fact;

    collect_band_pixels(nside, lat, radius, margin, |center_lon, center_lat, ring_pix| {
        let nested = skymap_healpix::ang2pix_lonlat(nside, Scheme::Nested, center_lon, center_lat);
        let first_child = nested << (2 * sub_order);
        let inside = (first_child..first_child + children_per_pixel).any(|child| {
            let (child_lon, child_lat) =
                skymap_healpix::pix2ang_lonlat(sub_nside, Scheme::Nested, child);
            angular_separation_deg(lon, lat, child_lon, child_lat) <= radius
        });
        if inside {
            Some(match scheme {
                Scheme::Ring => ring_pix,
                Scheme::Nested => nested,
            })
        } else {
            None
        }
    })
}

/// Shared ring-band scan. Calls `keep` with each candidate pixel's
/// center and RING index; whatever it returns is collected.
fn collect_band_pixels<F>(nside: u64, lat: f64, radius: f64, margin: f64, keep: F) -> Vec<u64>
where
    F: Fn(f64, f64, u64) -> Option<u64> + Sync,
{
    let colat_center = 90.0 - lat;
    let resolution = pixsize::nside_to_resolution_deg(nside);
    let reach = radius + margin + resolution;

    let rings: Vec<u64> = (1..=ring::n_rings(nside))
        .filter(|&r| {
            let info = ring::ring_info(nside, r);
            let colat = libm::acos(info.z.clamp(-1.0, 1.0)) * RAD_TO_DEG;
            (colat - colat_center).abs() <= reach
        })
        .collect();

    let mut out: Vec<u64> = rings
        .par_iter()
        .flat_map_iter(|&r| {
            let info = ring::ring_info(nside, r);
            (info.first..info.first + info.count).filter_map(|ring_pix| {
                let (center_lon, center_lat) =
                    skymap_healpix::pix2ang_lonlat(nside, Scheme::Ring, ring_pix);
                keep(center_lon, center_lat, ring_pix)
            })
        })
        .collect();
    out.sort_unstable();
    out.dedup();
    out
}

#[inline]
fn resolve_scheme(nside: u64, scheme: Scheme, ring_pix: u64, lon: f64, lat: f64) -> u64 {
    match scheme {
        Scheme::Ring => ring_pix,
        Scheme::Nested => skymap_healpix::ang2pix_lonlat(nside, Scheme::Nested, lon, lat),
    }
}

/// Brute-force membership test against one coarser pixel: a fine pixel
/// belongs when its center classifies to the parent at the parent's
/// resolution.
fn parent_pixel_indices(nside: u64, scheme: Scheme, parent_nside: u64, parent_ring: u64) -> Vec<u64> {
    let npix = skymap_healpix::npix(nside);
    (0..npix)
        .into_par_iter()
        .filter(|&ipix| {
            let (lon, lat) = skymap_healpix::pix2ang_lonlat(nside, scheme, ipix);
            skymap_healpix::ang2pix_lonlat(parent_nside, Scheme::Ring, lon, lat) == parent_ring
        })
        .collect()
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Disk {
                lon_deg,
                lat_deg,
                radius_deg,
            } => write!(f, "DISK({lon_deg},{lat_deg},{radius_deg})"),
            Region::DiskInclusive {
                lon_deg,
                lat_deg,
                radius_deg,
                fact,
            } => write!(f, "DISK_INC({lon_deg},{lat_deg},{radius_deg},{fact})"),
            Region::ParentPixel {
                scheme,
                nside,
                pixel,
            } => write!(f, "HPX_PIXEL({scheme},{nside},{pixel})"),
        }
    }
}

impl FromStr for Region {
    type Err = ReprojectError;

    fn from_str(s: &str) -> ReprojectResult<Self> {
        let trimmed = s.trim();
        let open = trimmed
            .find('(')
            .ok_or_else(|| ReprojectError::parse(trimmed, "missing '('"))?;
        if !trimmed.ends_with(')') {
            return Err(ReprojectError::parse(trimmed, "missing closing ')'"));
        }
        let kind = &trimmed[..open];
        let args: Vec<&str> = trimmed[open + 1..trimmed.len() - 1]
            .split(',')
            .map(str::trim)
            .collect();

        let parse_f64 = |v: &str| {
            v.parse::<f64>()
                .map_err(|_| ReprojectError::parse(trimmed, format!("bad number '{v}'")))
        };
        let parse_u64 = |v: &str| {
            v.parse::<u64>()
                .map_err(|_| ReprojectError::parse(trimmed, format!("bad integer '{v}'")))
        };

        let region = match kind {
            "DISK" => {
                if args.len() != 3 {
                    return Err(ReprojectError::parse(trimmed, "DISK takes 3 arguments"));
                }
                Region::disk(parse_f64(args[0])?, parse_f64(args[1])?, parse_f64(args[2])?)
            }
            "DISK_INC" => {
                if args.len() != 4 {
                    return Err(ReprojectError::parse(trimmed, "DISK_INC takes 4 arguments"));
                }
                Region::disk_inclusive(
                    parse_f64(args[0])?,
                    parse_f64(args[1])?,
                    parse_f64(args[2])?,
                    parse_u64(args[3])?,
                )
            }
            "HPX_PIXEL" => {
                if args.len() != 3 {
                    return Err(ReprojectError::parse(trimmed, "HPX_PIXEL takes 3 arguments"));
                }
                let scheme = Scheme::parse(args[0])
                    .map_err(|e| ReprojectError::parse(trimmed, e.to_string()))?;
                Region::parent_pixel(scheme, parse_u64(args[1])?, parse_u64(args[2])?)
            }
            other => {
                return Err(ReprojectError::parse(
                    trimmed,
                    format!("unknown region type '{other}'"),
                ))
            }
        };
        region.validate()?;
        Ok(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_disk() {
        let region: Region = "DISK(110.,75.,2.)".parse().unwrap();
        assert_eq!(region, Region::disk(110.0, 75.0, 2.0));
        assert_eq!(region.reference_direction(), (110.0, 75.0));
        assert_eq!(region.angular_size().unwrap(), 2.0);
    }

    #[test]
    fn test_parse_disk_inclusive() {
        let region: Region = "DISK_INC(45.0,-30.0,5.0,4)".parse().unwrap();
        assert_eq!(region, Region::disk_inclusive(45.0, -30.0, 5.0, 4));
    }

    #[test]
    fn test_parse_parent_pixel() {
        let region: Region = "HPX_PIXEL(RING,16,500)".parse().unwrap();
        assert_eq!(region, Region::parent_pixel(Scheme::Ring, 16, 500));
        // Reference direction is the parent center.
        let (lon, lat) = region.reference_direction();
        let reclassified = skymap_healpix::ang2pix_lonlat(16, Scheme::Ring, lon, lat);
        assert_eq!(reclassified, 500);
    }

    #[test]
    fn test_display_roundtrip() {
        for text in [
            "DISK(110,75,2)",
            "DISK_INC(45,-30,5,4)",
            "HPX_PIXEL(NESTED,16,500)",
        ] {
            let region: Region = text.parse().unwrap();
            let again: Region = region.to_string().parse().unwrap();
            assert_eq!(region, again);
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("DISK(1,2".parse::<Region>().is_err());
        assert!("DISK(1,2)".parse::<Region>().is_err());
        assert!("RING(1,2,3)".parse::<Region>().is_err());
        assert!("DISK(1,x,3)".parse::<Region>().is_err());
        assert!("DISK_INC(1,2,3,3)".parse::<Region>().is_err());
        assert!("DISK(0,95,3)".parse::<Region>().is_err());
        assert!("HPX_PIXEL(RING,16,5000)".parse::<Region>().is_err());
    }

    #[test]
    fn test_disk_membership_is_exact() {
        let nside = 64;
        let region = Region::disk(110.0, 75.0, 2.0);
        let indices = region.indices(nside, Scheme::Ring).unwrap();
        assert!(!indices.is_empty());

        // Every selected center is inside; every unselected neighbor
        // ring pixel is outside.
        for &ipix in &indices {
            let (lon, lat) = skymap_healpix::pix2ang_lonlat(nside, Scheme::Ring, ipix);
            assert!(angular_separation_deg(110.0, 75.0, lon, lat) <= 2.0);
        }
        let selected: std::collections::HashSet<u64> = indices.iter().copied().collect();
        for ipix in 0..skymap_healpix::npix(nside) {
            if !selected.contains(&ipix) {
                let (lon, lat) = skymap_healpix::pix2ang_lonlat(nside, Scheme::Ring, ipix);
                assert!(angular_separation_deg(110.0, 75.0, lon, lat) > 2.0);
            }
        }
    }

    #[test]
    fn test_disk_nested_matches_ring() {
        let nside = 32;
        let region = Region::disk(200.0, -45.0, 4.0);
        let ring_set = region.indices(nside, Scheme::Ring).unwrap();
        let nest_set = region.indices(nside, Scheme::Nested).unwrap();
        assert_eq!(ring_set.len(), nest_set.len());

        let converted: std::collections::HashSet<u64> = nest_set
            .iter()
            .map(|&ipn| skymap_healpix::nest2ring(nside, ipn).unwrap())
            .collect();
        assert_eq!(converted, ring_set.iter().copied().collect());
    }

    #[test]
    fn test_inclusive_disk_is_superset() {
        let nside = 64;
        let exact = Region::disk(10.0, 10.0, 3.0)
            .indices(nside, Scheme::Ring)
            .unwrap();
        let inclusive = Region::disk_inclusive(10.0, 10.0, 3.0, 4)
            .indices(nside, Scheme::Ring)
            .unwrap();
        let inclusive_set: std::collections::HashSet<u64> = inclusive.iter().copied().collect();
        assert!(inclusive.len() >= exact.len());
        for ipix in exact {
            assert!(inclusive_set.contains(&ipix));
        }
    }

    #[test]
    fn test_parent_pixel_partition() {
        // The 12 coarsest pixels partition any finer resolution.
        let nside = 8;
        let mut total = 0;
        for parent in 0..12 {
            let members = Region::parent_pixel(Scheme::Ring, 1, parent)
                .indices(nside, Scheme::Ring)
                .unwrap();
            assert_eq!(members.len(), 64);
            total += members.len();
        }
        assert_eq!(total as u64, skymap_healpix::npix(nside));
    }

    #[test]
    fn test_parent_pixel_nested_parent() {
        let nside = 16;
        let parent_nested = 7u64;
        let parent_ring = skymap_healpix::nest2ring(4, parent_nested).unwrap();
        let from_nested = Region::parent_pixel(Scheme::Nested, 4, parent_nested)
            .indices(nside, Scheme::Ring)
            .unwrap();
        let from_ring = Region::parent_pixel(Scheme::Ring, 4, parent_ring)
            .indices(nside, Scheme::Ring)
            .unwrap();
        assert_eq!(from_nested, from_ring);
    }

    #[test]
    fn test_disk_at_pole() {
        let nside = 32;
        let region = Region::disk(0.0, 89.0, 3.0);
        let indices = region.indices(nside, Scheme::Ring).unwrap();
        // The polar cap pixels must be included.
        assert!(indices.contains(&0));
    }
}

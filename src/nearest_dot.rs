/// Nearest-dot lookup in pixel space
///
/// Queries are projected with the linear geographic mapping into the pixel
/// space the texture map was built against, then compared to every entry.
/// This is a linear scan; keep it out of per-frame code.

use crate::constants::{
    HIGHLIGHT_INNER_OFFSET, HIGHLIGHT_INNER_RATIO, HIGHLIGHT_PIPE_RATIO, HIGHLIGHT_RING_RATIO,
    HIGHLIGHT_TILT_RAD,
};
use crate::equirectangular::{EquirectangularProjector, PixelPosition};
use crate::error::{GlobeError, GlobeResult};
use crate::geo_coordinate::GeoCoordinate;
use crate::texture_map::{DotEntry, TextureMap};
use glam::DVec3;

pub struct NearestDotLocator;

impl NearestDotLocator {
    /// Entry whose pixel is closest to `query`; ties go to the earliest entry
    pub fn find_nearest<'a>(query: &GeoCoordinate, map: &'a TextureMap) -> GlobeResult<&'a DotEntry> {
        let target = Self::query_pixel(query, map);

        let mut best: Option<(&DotEntry, f64)> = None;
        for entry in map {
            let distance = entry.pixel.distance_to(target.x, target.y);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((entry, distance)),
            }
        }

        best.map(|(entry, _)| entry)
            .ok_or_else(|| GlobeError::invalid_state("nearest dot requested from an empty texture map"))
    }

    /// Nearest entry to a hit point in the globe's local space
    pub fn find_nearest_to_surface<'a>(local_point: DVec3, map: &'a TextureMap) -> GlobeResult<&'a DotEntry> {
        let coordinate = EquirectangularProjector::surface_to_geo(local_point, map.radius())?;
        Self::find_nearest(&coordinate, map)
    }

    /// The query's position in the map's pixel space, truncated to a whole pixel
    pub fn query_pixel(query: &GeoCoordinate, map: &TextureMap) -> PixelPosition {
        let position = EquirectangularProjector::project_geo(query, map.dimensions());
        PixelPosition {
            x: position.x.trunc(),
            y: position.y.trunc(),
        }
    }
}

/// Marker drawn over the dot nearest the current location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightMarker {
    pub entry: DotEntry,
    pub location: GeoCoordinate,
    /// (pitch, yaw, roll) in radians laying the ring flat on the surface
    pub euler_angles: DVec3,
    pub ring_radius: f64,
    pub pipe_radius: f64,
    pub inner_radius: f64,
    pub inner_offset: DVec3,
}

impl HighlightMarker {
    pub fn new(entry: DotEntry, location: GeoCoordinate, dot_radius: f64) -> Self {
        Self {
            entry,
            location,
            euler_angles: Self::euler_angles(&location),
            ring_radius: dot_radius * HIGHLIGHT_RING_RATIO,
            pipe_radius: dot_radius * HIGHLIGHT_PIPE_RATIO,
            inner_radius: dot_radius * HIGHLIGHT_INNER_RATIO,
            inner_offset: DVec3::new(0.0, HIGHLIGHT_INNER_OFFSET, 0.0),
        }
    }

    /// Locate the dot nearest `location` and build its marker
    pub fn locate(location: GeoCoordinate, map: &TextureMap, dot_radius: f64) -> GlobeResult<Self> {
        let entry = NearestDotLocator::find_nearest(&location, map)?;
        Ok(Self::new(*entry, location, dot_radius))
    }

    pub fn euler_angles(location: &GeoCoordinate) -> DVec3 {
        DVec3::new(
            -location.latitude_radians() - HIGHLIGHT_TILT_RAD,
            location.longitude_radians(),
            0.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equirectangular::{ImageDimensions, PixelCoordinate};
    use approx::assert_abs_diff_eq;

    fn geo(lat: f64, lon: f64) -> GeoCoordinate {
        GeoCoordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_empty_map_is_invalid_state() {
        let map = TextureMap::build(0, 1.0).unwrap();
        let result = NearestDotLocator::find_nearest(&geo(0.0, 0.0), &map);
        assert!(matches!(result, Err(GlobeError::InvalidState { .. })));
    }

    #[test]
    fn test_two_dot_map_picks_the_nearer_pole() {
        let map = TextureMap::build(2, 1.0).unwrap();
        let north = NearestDotLocator::find_nearest(&geo(80.0, 10.0), &map).unwrap();
        assert_eq!(north.index, 0);
        // the south pole dot sits at the left edge (atan2(-0.0, -0.0) == -π)
        let south = NearestDotLocator::find_nearest(&geo(-80.0, -170.0), &map).unwrap();
        assert_eq!(south.index, 1);
    }

    #[test]
    fn test_result_is_brute_force_minimum() {
        let map = TextureMap::build(1000, 1.0).unwrap();
        for (lat, lon) in [(40.7128, -74.0060), (0.0, 0.0), (-45.0, 170.0), (89.0, -179.0)] {
            let query = geo(lat, lon);
            let found = NearestDotLocator::find_nearest(&query, &map).unwrap();
            let target = NearestDotLocator::query_pixel(&query, &map);
            let found_distance = found.pixel.distance_to(target.x, target.y);
            for entry in &map {
                assert!(found_distance <= entry.pixel.distance_to(target.x, target.y));
            }
        }
    }

    #[test]
    fn test_surface_query_matches_geo_query() {
        let map = TextureMap::build(2000, 2.0).unwrap();
        let tokyo = geo(35.6762, 139.6503);
        let surface = EquirectangularProjector::geo_to_sphere_point(&tokyo).scaled(2.0);

        let by_geo = NearestDotLocator::find_nearest(&tokyo, &map).unwrap();
        let by_surface = NearestDotLocator::find_nearest_to_surface(surface, &map).unwrap();
        assert_eq!(by_geo.index, by_surface.index);
    }

    #[test]
    fn test_query_pixel_uses_map_dimensions() {
        let dims = ImageDimensions::new(360, 180).unwrap();
        let map = TextureMap::build_with_dimensions(10, 1.0, dims).unwrap();
        let pixel = NearestDotLocator::query_pixel(&geo(0.0, 0.5), &map);
        assert_eq!(pixel, PixelPosition { x: 180.0, y: 90.0 });
        assert_eq!(PixelCoordinate::new(180, 90).distance_to(pixel.x, pixel.y), 0.0);
    }

    #[test]
    fn test_highlight_marker_geometry() {
        let map = TextureMap::build(500, 1.0).unwrap();
        let location = geo(0.0, 90.0);
        let marker = HighlightMarker::locate(location, &map, 0.01).unwrap();

        assert_abs_diff_eq!(marker.ring_radius, 0.05, epsilon = 1e-12);
        assert_abs_diff_eq!(marker.pipe_radius, 0.03, epsilon = 1e-12);
        assert_abs_diff_eq!(marker.inner_radius, 0.06, epsilon = 1e-12);
        assert_eq!(marker.inner_offset, DVec3::new(0.0, 0.01, 0.0));
        assert_abs_diff_eq!(marker.euler_angles.x, -1.57, epsilon = 1e-12);
        assert_abs_diff_eq!(marker.euler_angles.y, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        assert_eq!(marker.euler_angles.z, 0.0);
    }
}

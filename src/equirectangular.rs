/// Equirectangular projection between the globe and a world-map raster
///
/// Pixel column grows eastward from the antimeridian (longitude -180 at u = 0)
/// and pixel row grows southward from the north pole (latitude 90 at v = 0).
/// Longitude on the globe is measured with `atan2(x, z)`, so the +z axis is
/// the prime meridian and +y is north.

use crate::constants::{REFERENCE_IMAGE_HEIGHT, REFERENCE_IMAGE_WIDTH};
use crate::error::{GlobeError, GlobeResult};
use crate::geo_coordinate::GeoCoordinate;
use crate::math_utils::wrap_degrees;
use crate::sphere_sampler::SpherePoint;
use glam::DVec3;
use log::debug;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Size of a raster in pixels; both sides are non-zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> GlobeResult<Self> {
        if width == 0 || height == 0 {
            return Err(GlobeError::invalid_argument(format!(
                "image dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    /// The 2048x1024 dark earth texture the dots are sampled against
    pub fn reference() -> Self {
        Self {
            width: REFERENCE_IMAGE_WIDTH,
            height: REFERENCE_IMAGE_HEIGHT,
        }
    }

    pub fn contains(&self, u: i64, v: i64) -> bool {
        u >= 0 && v >= 0 && u < self.width as i64 && v < self.height as i64
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for ImageDimensions {
    fn default() -> Self {
        Self::reference()
    }
}

/// Integer pixel inside an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelCoordinate {
    pub u: u32,
    pub v: u32,
}

impl PixelCoordinate {
    pub fn new(u: u32, v: u32) -> Self {
        Self { u, v }
    }

    /// Euclidean distance in pixel space
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        let dx = self.u as f64 - x;
        let dy = self.v as f64 - y;
        (dx * dx + dy * dy).sqrt()
    }

    /// The same map location in a raster of different size
    pub fn rescaled(&self, from: ImageDimensions, to: ImageDimensions) -> PixelCoordinate {
        if from == to {
            return *self;
        }
        let u = self.u as f64 * to.width as f64 / from.width as f64;
        let v = self.v as f64 * to.height as f64 / from.height as f64;
        PixelPosition { x: u, y: v }.to_pixel(to)
    }
}

/// Fractional position in pixel space, as produced from a geographic coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPosition {
    pub x: f64,
    pub y: f64,
}

impl PixelPosition {
    /// Truncate toward zero and clamp into the image
    pub fn to_pixel(&self, dims: ImageDimensions) -> PixelCoordinate {
        let u = clamp_axis(self.x, dims.width);
        let v = clamp_axis(self.y, dims.height);
        PixelCoordinate::new(u, v)
    }
}

fn clamp_axis(value: f64, extent: u32) -> u32 {
    // NaN casts to 0; `as` saturates the rest
    let truncated = value.trunc().max(0.0) as u32;
    truncated.min(extent - 1)
}

/// Forward and inverse equirectangular mappings
pub struct EquirectangularProjector;

impl EquirectangularProjector {
    /// Project a unit sphere point to a pixel (truncated, clamped into the image)
    ///
    /// The south pole lands exactly on `v == height` and the seam behind the
    /// globe on `u == width`; both are pulled back onto the last row/column.
    pub fn project_point(point: &SpherePoint, dims: ImageDimensions) -> PixelCoordinate {
        let theta = point.y.clamp(-1.0, 1.0).asin();
        let phi = point.x.atan2(point.z);

        let position = PixelPosition {
            x: dims.width as f64 / TAU * (phi + PI),
            y: dims.height as f64 / PI * (FRAC_PI_2 - theta),
        };
        let pixel = position.to_pixel(dims);
        if position.x >= dims.width as f64 || position.y >= dims.height as f64 {
            debug!(
                "clamped projection ({:.3}, {:.3}) to ({}, {}) in {}x{}",
                position.x, position.y, pixel.u, pixel.v, dims.width, dims.height
            );
        }
        pixel
    }

    /// Linear mapping of a geographic coordinate into pixel space (not truncated)
    pub fn project_geo(coord: &GeoCoordinate, dims: ImageDimensions) -> PixelPosition {
        let normalized_long = coord.longitude() + 180.0;
        PixelPosition {
            x: (normalized_long / 360.0) * dims.width as f64,
            // rows count down from the north pole
            y: (-(coord.latitude() - 90.0) / 180.0) * dims.height as f64,
        }
    }

    /// Inverse of [`EquirectangularProjector::project_geo`]
    pub fn unproject_pixel(position: PixelPosition, dims: ImageDimensions) -> GlobeResult<GeoCoordinate> {
        let longitude = position.x / dims.width as f64 * 360.0 - 180.0;
        let latitude = 90.0 - position.y / dims.height as f64 * 180.0;
        GeoCoordinate::normalized(latitude, longitude)
    }

    /// Geographic coordinate of a point on (or near) the surface of a globe of `radius`
    ///
    /// The point is in the globe's local space. Its height above or below the
    /// surface is ignored for longitude; latitude uses `y / radius`, clamped
    /// into [-1, 1] before `acos`. The globe centre has no direction and is
    /// rejected.
    pub fn surface_to_geo(point: DVec3, radius: f64) -> GlobeResult<GeoCoordinate> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GlobeError::invalid_argument(format!(
                "sphere radius must be positive, got {}",
                radius
            )));
        }
        if !point.is_finite() {
            return Err(GlobeError::invalid_argument(format!(
                "surface point {:?} is not finite",
                point
            )));
        }
        let direction = SpherePoint::from_direction(point)?;

        let theta = direction.x.atan2(direction.z);
        let phi = (point.y / radius).clamp(-1.0, 1.0).acos();

        let latitude = 90.0 - phi.to_degrees();
        let longitude = wrap_degrees(theta.to_degrees() % 360.0);
        GeoCoordinate::normalized(latitude, longitude)
    }

    /// Unit sphere point for a geographic coordinate (inverse of the angles used above)
    pub fn geo_to_sphere_point(coord: &GeoCoordinate) -> SpherePoint {
        let lat = coord.latitude_radians();
        let lon = coord.longitude_radians();
        SpherePoint::new(lat.cos() * lon.sin(), lat.sin(), lat.cos() * lon.cos())
    }
}

/// Turns hit points on the rendered globe into geographic coordinates
#[derive(Debug, Clone, Copy)]
pub struct GlobeCoordinateConverter {
    radius: f64,
}

impl GlobeCoordinateConverter {
    pub fn new(radius: f64) -> GlobeResult<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GlobeError::invalid_argument(format!(
                "globe radius must be positive, got {}",
                radius
            )));
        }
        Ok(Self { radius })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn to_geo(&self, local_point: DVec3) -> GlobeResult<GeoCoordinate> {
        EquirectangularProjector::surface_to_geo(local_point, self.radius)
    }

    /// Local-space surface position for a coordinate
    pub fn to_surface(&self, coord: &GeoCoordinate) -> DVec3 {
        EquirectangularProjector::geo_to_sphere_point(coord).scaled(self.radius)
    }
}

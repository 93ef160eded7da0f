use crate::error::{GlobeError, GlobeResult};
use crate::math_utils::wrap_degrees;
use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees
///
/// Latitude lies in [-90, 90] and longitude in [-180, 180). Values are only
/// constructed through [`GeoCoordinate::new`] (which rejects out-of-range
/// input) or [`GeoCoordinate::normalized`] (which folds longitude).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoCoordinate")]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

impl GeoCoordinate {
    /// Create a coordinate, failing when either component is out of range
    ///
    /// Longitude 180.0 is accepted and stored as -180.0 (same meridian).
    pub fn new(latitude: f64, longitude: f64) -> GlobeResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GlobeError::invalid_argument(format!(
                "latitude {} outside [-90, 90]",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GlobeError::invalid_argument(format!(
                "longitude {} outside [-180, 180]",
                longitude
            )));
        }
        let longitude = if longitude == 180.0 { -180.0 } else { longitude };
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create a coordinate from any finite longitude, folding it into [-180, 180)
    /// and clamping latitude into [-90, 90]
    pub fn normalized(latitude: f64, longitude: f64) -> GlobeResult<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(GlobeError::invalid_argument(format!(
                "non-finite coordinate ({}, {})",
                latitude, longitude
            )));
        }
        Ok(Self {
            latitude: latitude.clamp(-90.0, 90.0),
            longitude: wrap_degrees(longitude),
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude_radians(&self) -> f64 {
        self.latitude.to_radians()
    }

    pub fn longitude_radians(&self) -> f64 {
        self.longitude.to_radians()
    }
}

#[derive(Deserialize)]
struct RawGeoCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawGeoCoordinate> for GeoCoordinate {
    type Error = GlobeError;

    fn try_from(raw: RawGeoCoordinate) -> GlobeResult<Self> {
        GeoCoordinate::new(raw.latitude, raw.longitude)
    }
}

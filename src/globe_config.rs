/// Globe configuration
///
/// Loaded from JSON (every field optional, defaults below) and validated
/// before use. Colour channels map one-to-one onto material slots: `earth` is
/// the diffuse colour, `glow` the emission and `reflection` the reflective
/// colour.

use crate::constants::{
    DEFAULT_DOT_COUNT, DEFAULT_DOT_SIZE, DEFAULT_EARTH_RADIUS, DEFAULT_HEX_RESOLUTION,
    DEFAULT_HEX_RING_LEVEL, FALLBACK_DOT_RADIUS_RATIO, LAND_THRESHOLD, REFERENCE_IMAGE_HEIGHT,
    REFERENCE_IMAGE_WIDTH,
};
use crate::equirectangular::ImageDimensions;
use crate::error::{GlobeError, GlobeResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Linear RGB colour, channels in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RgbColor {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl RgbColor {
    pub const fn new(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue }
    }

    fn is_valid(&self) -> bool {
        [self.red, self.green, self.blue]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeColors {
    pub earth: RgbColor,
    pub glow: RgbColor,
    pub reflection: RgbColor,
    pub glow_shininess: f64,
}

impl Default for GlobeColors {
    fn default() -> Self {
        Self {
            earth: RgbColor::new(0.227, 0.133, 0.541),
            glow: RgbColor::new(0.133, 0.0, 0.22),
            reflection: RgbColor::new(0.227, 0.133, 0.541),
            glow_shininess: 0.7,
        }
    }
}

/// Material the renderer applies to the globe sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobeMaterial {
    pub diffuse: RgbColor,
    pub emission: RgbColor,
    pub emission_intensity: f64,
    pub reflective: RgbColor,
    pub reflective_intensity: f64,
    pub shininess: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    pub dot_count: usize,
    pub earth_radius: f64,
    /// Rendered dot radius; `<= 0` falls back to a fraction of the earth radius
    pub dot_size: f64,
    pub image_width: u32,
    pub image_height: u32,
    pub land_threshold: f64,
    pub hex_resolution: u8,
    pub hex_ring_level: u32,
    pub colors: GlobeColors,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            dot_count: DEFAULT_DOT_COUNT,
            earth_radius: DEFAULT_EARTH_RADIUS,
            dot_size: DEFAULT_DOT_SIZE,
            image_width: REFERENCE_IMAGE_WIDTH,
            image_height: REFERENCE_IMAGE_HEIGHT,
            land_threshold: LAND_THRESHOLD,
            hex_resolution: DEFAULT_HEX_RESOLUTION,
            hex_ring_level: DEFAULT_HEX_RING_LEVEL,
            colors: GlobeColors::default(),
        }
    }
}

impl GlobeConfig {
    pub fn from_json_str(json: &str) -> GlobeResult<Self> {
        let config: GlobeConfig = serde_json::from_str(json).map_err(|e| GlobeError::Config {
            message: format!("Failed to parse globe config: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> GlobeResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| GlobeError::Config {
            message: format!("Failed to read file {}: {}", path.display(), e),
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> GlobeResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| GlobeError::Config {
            message: format!("Failed to serialize globe config: {}", e),
        })
    }

    pub fn validate(&self) -> GlobeResult<()> {
        if self.dot_count == 1 {
            return Err(GlobeError::invalid_argument("dot_count must be 0 or at least 2"));
        }
        if !self.earth_radius.is_finite() || self.earth_radius <= 0.0 {
            return Err(GlobeError::invalid_argument(format!(
                "earth_radius must be positive, got {}",
                self.earth_radius
            )));
        }
        if !self.dot_size.is_finite() {
            return Err(GlobeError::invalid_argument("dot_size must be finite"));
        }
        ImageDimensions::new(self.image_width, self.image_height)?;
        if !(0.0..=1.0).contains(&self.land_threshold) {
            return Err(GlobeError::invalid_argument(format!(
                "land_threshold must be within [0, 1], got {}",
                self.land_threshold
            )));
        }
        if self.hex_resolution > 15 {
            return Err(GlobeError::invalid_argument(format!(
                "hex_resolution must be 0-15, got {}",
                self.hex_resolution
            )));
        }
        let colors = &self.colors;
        if !(colors.earth.is_valid() && colors.glow.is_valid() && colors.reflection.is_valid()) {
            return Err(GlobeError::invalid_argument("colour channels must be within [0, 1]"));
        }
        Ok(())
    }

    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions {
            width: self.image_width,
            height: self.image_height,
        }
    }

    /// Rendered dot radius
    pub fn dot_radius(&self) -> f64 {
        if self.dot_size > 0.0 {
            self.dot_size
        } else {
            FALLBACK_DOT_RADIUS_RATIO * self.earth_radius
        }
    }

    pub fn material(&self) -> GlobeMaterial {
        GlobeMaterial {
            diffuse: self.colors.earth,
            emission: self.colors.glow,
            emission_intensity: 0.1,
            reflective: self.colors.reflection,
            reflective_intensity: 1.0,
            shininess: self.colors.glow_shininess,
        }
    }
}

/// Globe: ties configuration, the shared texture map, the reference image and
/// the hex-cell indexer together into the operations the view layer calls
///
/// Nothing here renders. The view asks for a dot layout to place nodes, a
/// camera target to animate towards, or a tap result to show.

use crate::constants::{CAMERA_DISTANCE, ZOOMED_IN_DISTANCE, ZOOMED_OUT_DISTANCE};
use crate::equirectangular::GlobeCoordinateConverter;
use crate::error::{GlobeError, GlobeResult};
use crate::geo_coordinate::GeoCoordinate;
use crate::globe_config::GlobeConfig;
use crate::hex_cells::{H3Indexer, HexCellIndexer};
use crate::land_classifier::{LandClassifier, WorldImage};
use crate::nearest_dot::{HighlightMarker, NearestDotLocator};
use crate::texture_map::{self, DotEntry, TextureMap, TextureMapCache};
use glam::{DQuat, DVec3};
use log::debug;
use std::sync::Arc;

/// A dot the renderer should place
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacedDot {
    Land(DotEntry),
    Highlight(HighlightMarker),
}

impl PlacedDot {
    pub fn entry(&self) -> &DotEntry {
        match self {
            PlacedDot::Land(entry) => entry,
            PlacedDot::Highlight(marker) => &marker.entry,
        }
    }
}

/// Where to move the camera to look straight down at a dot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTarget {
    pub dot: DotEntry,
    pub camera_position: DVec3,
}

/// Everything a tap on the globe resolves to
#[derive(Debug, Clone, PartialEq)]
pub struct TapResult {
    pub coordinate: GeoCoordinate,
    pub cell: String,
    pub neighbors: Vec<String>,
    pub nearest_dot: DotEntry,
}

pub struct Globe<I: HexCellIndexer = H3Indexer> {
    config: GlobeConfig,
    world_image: WorldImage,
    classifier: LandClassifier,
    cache: Arc<TextureMapCache>,
    indexer: I,
    current_location: Option<GeoCoordinate>,
}

impl Globe<H3Indexer> {
    /// Globe backed by the process-wide texture map cache and the H3 grid
    pub fn new(config: GlobeConfig, world_image: WorldImage) -> GlobeResult<Self> {
        Self::with_parts(config, world_image, texture_map::global_cache(), H3Indexer)
    }
}

impl<I: HexCellIndexer> Globe<I> {
    pub fn with_parts(
        config: GlobeConfig,
        world_image: WorldImage,
        cache: Arc<TextureMapCache>,
        indexer: I,
    ) -> GlobeResult<Self> {
        config.validate()?;
        let classifier = LandClassifier::new(config.land_threshold)?;
        Ok(Self {
            config,
            world_image,
            classifier,
            cache,
            indexer,
            current_location: None,
        })
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn current_location(&self) -> Option<GeoCoordinate> {
        self.current_location
    }

    pub fn set_current_location(&mut self, location: Option<GeoCoordinate>) {
        self.current_location = location;
    }

    /// Only changes the rendered dot radius; the texture map is kept
    pub fn set_dot_size(&mut self, dot_size: f64) -> GlobeResult<()> {
        if !dot_size.is_finite() {
            return Err(GlobeError::invalid_argument("dot_size must be finite"));
        }
        self.config.dot_size = dot_size;
        Ok(())
    }

    pub fn set_dot_count(&mut self, dot_count: usize) -> GlobeResult<()> {
        let updated = GlobeConfig {
            dot_count,
            ..self.config.clone()
        };
        updated.validate()?;
        self.config = updated;
        Ok(())
    }

    pub fn set_earth_radius(&mut self, earth_radius: f64) -> GlobeResult<()> {
        let updated = GlobeConfig {
            earth_radius,
            ..self.config.clone()
        };
        updated.validate()?;
        self.config = updated;
        Ok(())
    }

    /// The texture map for the current dot count and radius
    pub fn texture_map(&self) -> GlobeResult<Arc<TextureMap>> {
        self.cache.build_or_get_with_dimensions(
            self.config.dot_count,
            self.config.earth_radius,
            self.config.dimensions(),
        )
    }

    /// Land dots plus the highlight for the current location, in texture map order
    ///
    /// Ocean dots are left out. The dot nearest the current location is always
    /// emitted as the highlight, whatever its pixel colour.
    pub fn dot_layout(&self) -> GlobeResult<Vec<PlacedDot>> {
        let map = self.texture_map()?;
        let dot_radius = self.config.dot_radius();

        let highlight = match self.current_location {
            Some(location) if !map.is_empty() => Some(HighlightMarker::locate(location, &map, dot_radius)?),
            _ => None,
        };

        let image_dims = self.world_image.dimensions();
        let mut placed = Vec::new();
        for entry in map.iter() {
            if let Some(marker) = highlight.filter(|m| m.entry.index == entry.index) {
                placed.push(PlacedDot::Highlight(marker));
                continue;
            }
            let pixel = entry.pixel.rescaled(map.dimensions(), image_dims);
            if self.classifier.is_land(pixel, self.world_image.bytes(), image_dims.width)? {
                placed.push(PlacedDot::Land(*entry));
            }
        }

        debug!("dot layout: {} of {} dots placed", placed.len(), map.len());
        Ok(placed)
    }

    /// Camera target looking down on the dot nearest `location`
    pub fn move_to_location(&self, location: &GeoCoordinate) -> GlobeResult<CameraTarget> {
        let map = self.texture_map()?;
        let dot = *NearestDotLocator::find_nearest(location, &map)?;
        Ok(CameraTarget {
            dot,
            camera_position: Self::camera_position_for(dot.position, CAMERA_DISTANCE)?,
        })
    }

    /// Camera target for the current location, if one is set
    pub fn center_on_current_location(&self) -> GlobeResult<Option<CameraTarget>> {
        self.current_location
            .map(|location| self.move_to_location(&location))
            .transpose()
    }

    /// Camera position after zooming in or out along the current view direction
    pub fn zoom_target(camera_position: DVec3, zoom_in: bool) -> GlobeResult<DVec3> {
        let distance = if zoom_in { ZOOMED_IN_DISTANCE } else { ZOOMED_OUT_DISTANCE };
        Self::camera_position_for(camera_position, distance)
    }

    /// Resolve a hit point in the globe's local space
    pub fn handle_tap(&self, local_point: DVec3) -> GlobeResult<TapResult> {
        let converter = GlobeCoordinateConverter::new(self.config.earth_radius)?;
        let coordinate = converter.to_geo(local_point)?;

        let lookup = self
            .indexer
            .lookup(&coordinate, self.config.hex_resolution, self.config.hex_ring_level)?;

        let map = self.texture_map()?;
        let nearest_dot = *NearestDotLocator::find_nearest(&coordinate, &map)?;

        Ok(TapResult {
            coordinate,
            cell: lookup.cell_hex(),
            neighbors: lookup.neighbor_hexes(),
            nearest_dot,
        })
    }

    fn camera_position_for(direction: DVec3, distance: f64) -> GlobeResult<DVec3> {
        direction
            .try_normalize()
            .map(|unit| unit * distance)
            .ok_or_else(|| GlobeError::invalid_argument(format!("cannot aim the camera along {:?}", direction)))
    }
}

/// Shortest-arc rotation taking direction `from` onto direction `to`
pub fn rotation_between(from: DVec3, to: DVec3) -> GlobeResult<DQuat> {
    let from = from
        .try_normalize()
        .ok_or_else(|| GlobeError::invalid_argument("rotation start direction is zero"))?;
    let to = to
        .try_normalize()
        .ok_or_else(|| GlobeError::invalid_argument("rotation end direction is zero"))?;
    Ok(DQuat::from_rotation_arc(from, to))
}

/// Texture map: every sampled dot paired with its pixel on the world map
///
/// Built once per (dot count, radius, pixel space) and shared through
/// [`TextureMapCache`]. A map is either fully built or absent; failed builds
/// are returned to the caller and never stored.

use crate::equirectangular::{EquirectangularProjector, ImageDimensions, PixelCoordinate};
use crate::error::GlobeResult;
use crate::sphere_sampler::{SphereSampler, SurfacePosition};
use log::{debug, info};
use once_cell::sync::{Lazy, OnceCell};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

/// One generated dot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotEntry {
    /// Position in sampling order
    pub index: usize,
    pub position: SurfacePosition,
    pub pixel: PixelCoordinate,
}

/// Immutable, ordered collection of dots (index i is the i-th golden angle step)
#[derive(Debug, Clone, PartialEq)]
pub struct TextureMap {
    radius: f64,
    dimensions: ImageDimensions,
    entries: Vec<DotEntry>,
}

impl TextureMap {
    /// Sample `dot_count` dots on a globe of `radius`, projected onto the reference image
    pub fn build(dot_count: usize, radius: f64) -> GlobeResult<Self> {
        Self::build_with_dimensions(dot_count, radius, ImageDimensions::reference())
    }

    pub fn build_with_dimensions(dot_count: usize, radius: f64, dimensions: ImageDimensions) -> GlobeResult<Self> {
        let entries = SphereSampler::generate(dot_count, radius)?
            .into_iter()
            .enumerate()
            .map(|(index, sample)| DotEntry {
                index,
                position: sample.position,
                pixel: EquirectangularProjector::project_point(&sample.unit, dimensions),
            })
            .collect();

        Ok(Self {
            radius,
            dimensions,
            entries,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn dimensions(&self) -> ImageDimensions {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DotEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&DotEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DotEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a TextureMap {
    type Item = &'a DotEntry;
    type IntoIter = std::slice::Iter<'a, DotEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Cache key; the radius is keyed by its bit pattern
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
struct TextureMapKey {
    dot_count: usize,
    radius_bits: u64,
    dimensions: ImageDimensions,
}

impl TextureMapKey {
    fn new(dot_count: usize, radius: f64, dimensions: ImageDimensions) -> Self {
        Self {
            dot_count,
            // 0.0 and -0.0 must not become two keys
            radius_bits: (radius + 0.0).to_bits(),
            dimensions,
        }
    }
}

type TextureMapSlot = Arc<OnceCell<Arc<TextureMap>>>;

/// Build-once cache of texture maps
///
/// Concurrent requests for the same configuration share a single build: the
/// first caller computes it while the others block on the same slot. Dot size
/// is a rendering concern and is not part of the key.
#[derive(Debug, Default)]
pub struct TextureMapCache {
    slots: Mutex<HashMap<TextureMapKey, TextureMapSlot>>,
    builds: AtomicUsize,
}

impl TextureMapCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build_or_get(&self, dot_count: usize, radius: f64) -> GlobeResult<Arc<TextureMap>> {
        self.build_or_get_with_dimensions(dot_count, radius, ImageDimensions::reference())
    }

    pub fn build_or_get_with_dimensions(
        &self,
        dot_count: usize,
        radius: f64,
        dimensions: ImageDimensions,
    ) -> GlobeResult<Arc<TextureMap>> {
        let key = TextureMapKey::new(dot_count, radius, dimensions);
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key).or_default())
        };

        if let Some(map) = slot.get() {
            debug!("texture map cache hit: {} dots, radius {}", dot_count, radius);
            return Ok(Arc::clone(map));
        }

        let built = slot.get_or_try_init(|| {
            let started = Instant::now();
            let map = TextureMap::build_with_dimensions(dot_count, radius, dimensions)?;
            self.builds.fetch_add(1, Ordering::SeqCst);
            info!(
                "built texture map: {} dots, radius {}, {}x{} pixel space in {:?}",
                dot_count,
                radius,
                dimensions.width,
                dimensions.height,
                started.elapsed()
            );
            Ok(Arc::new(map))
        });

        match built {
            Ok(map) => Ok(Arc::clone(map)),
            Err(err) => {
                self.discard_empty_slot(&key, &slot);
                Err(err)
            }
        }
    }

    /// Remove `slot` from the map if it is still the entry for `key` and was never filled
    fn discard_empty_slot(&self, key: &TextureMapKey, slot: &TextureMapSlot) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let unfilled = slots
            .get(key)
            .is_some_and(|held| Arc::ptr_eq(held, slot) && held.get().is_none());
        if unfilled {
            slots.remove(key);
        }
    }

    /// True when a finished map exists for this configuration in the reference pixel space
    pub fn contains(&self, dot_count: usize, radius: f64) -> bool {
        self.contains_with_dimensions(dot_count, radius, ImageDimensions::reference())
    }

    pub fn contains_with_dimensions(&self, dot_count: usize, radius: f64, dimensions: ImageDimensions) -> bool {
        let key = TextureMapKey::new(dot_count, radius, dimensions);
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(&key).is_some_and(|slot| slot.get().is_some())
    }

    /// Number of finished maps held
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|slot| slot.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of successful builds performed by this cache
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    /// Drop the reference-space map for one configuration; returns whether one was held
    pub fn invalidate(&self, dot_count: usize, radius: f64) -> bool {
        self.invalidate_with_dimensions(dot_count, radius, ImageDimensions::reference())
    }

    pub fn invalidate_with_dimensions(&self, dot_count: usize, radius: f64, dimensions: ImageDimensions) -> bool {
        let key = TextureMapKey::new(dot_count, radius, dimensions);
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.remove(&key).is_some_and(|slot| slot.get().is_some())
    }

    pub fn clear(&self) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.clear();
    }
}

/// Process-wide texture map cache
static TEXTURE_MAP_CACHE: Lazy<Arc<TextureMapCache>> = Lazy::new(|| Arc::new(TextureMapCache::new()));

pub fn global_cache() -> Arc<TextureMapCache> {
    Arc::clone(&*TEXTURE_MAP_CACHE)
}

/// Build or fetch the shared texture map for `dot_count` dots on a globe of `radius`
pub fn build_or_get(dot_count: usize, radius: f64) -> GlobeResult<Arc<TextureMap>> {
    TEXTURE_MAP_CACHE.build_or_get(dot_count, radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GlobeError;
    use std::thread;

    #[test]
    fn test_build_entries_follow_sampling_order() {
        let map = TextureMap::build(1000, 1.0).unwrap();
        assert_eq!(map.len(), 1000);

        let samples = SphereSampler::generate(1000, 1.0).unwrap();
        for (entry, sample) in map.iter().zip(samples.iter()) {
            assert_eq!(entry.position, sample.position);
        }
        for (i, entry) in map.iter().enumerate() {
            assert_eq!(entry.index, i);
        }
    }

    #[test]
    fn test_pixels_stay_inside_image() {
        let map = TextureMap::build(5000, 3.0).unwrap();
        let dims = map.dimensions();
        for entry in &map {
            assert!(entry.pixel.u < dims.width);
            assert!(entry.pixel.v < dims.height);
        }
        // first dot is the north pole, last the south pole
        assert_eq!(map.get(0).unwrap().pixel.v, 0);
        assert_eq!(map.get(4999).unwrap().pixel.v, dims.height - 1);
    }

    #[test]
    fn test_cache_returns_same_instance() {
        let cache = TextureMapCache::new();
        let first = cache.build_or_get(5000, 1.0).unwrap();
        let second = cache.build_or_get(5000, 1.0).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.build_count(), 1);

        let larger = cache.build_or_get(5000, 2.0).unwrap();
        assert!(!Arc::ptr_eq(&first, &larger));
        assert_eq!(cache.build_count(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_failed_build_is_not_cached() {
        let cache = TextureMapCache::new();
        let result = cache.build_or_get(1, 1.0);
        assert!(matches!(result, Err(GlobeError::InvalidArgument { .. })));
        assert!(!cache.contains(1, 1.0));
        assert_eq!(cache.build_count(), 0);

        // retried, and fails the same way rather than returning a stale value
        assert!(cache.build_or_get(1, 1.0).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_failed_builds_leave_no_slots_behind() {
        let cache = TextureMapCache::new();
        for i in 0..100 {
            assert!(cache.build_or_get(1, 1.0 + i as f64).is_err());
        }
        assert!(cache.build_or_get(10, -1.0).is_err());

        let slots = cache.slots.lock().unwrap();
        assert_eq!(slots.len(), 0);
    }

    #[test]
    fn test_cache_control_in_custom_pixel_space() {
        let cache = TextureMapCache::new();
        let dims = ImageDimensions::new(1024, 512).unwrap();
        let before = cache.build_or_get_with_dimensions(500, 1.0, dims).unwrap();

        assert!(cache.contains_with_dimensions(500, 1.0, dims));
        assert!(!cache.contains(500, 1.0));
        assert!(!cache.invalidate(500, 1.0));
        assert!(cache.invalidate_with_dimensions(500, 1.0, dims));
        assert!(!cache.contains_with_dimensions(500, 1.0, dims));

        let after = cache.build_or_get_with_dimensions(500, 1.0, dims).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(cache.build_count(), 2);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = TextureMapCache::new();
        let before = cache.build_or_get(100, 1.0).unwrap();
        assert!(cache.invalidate(100, 1.0));
        assert!(!cache.invalidate(100, 1.0));

        let after = cache.build_or_get(100, 1.0).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(*before, *after);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_requests_build_once() {
        let cache = Arc::new(TextureMapCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.build_or_get(20_000, 1.0).unwrap())
            })
            .collect();

        let maps: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(cache.build_count(), 1);
        for map in &maps[1..] {
            assert!(Arc::ptr_eq(&maps[0], map));
        }
    }

    #[test]
    fn test_empty_map_is_cached_like_any_other() {
        let cache = TextureMapCache::new();
        let map = cache.build_or_get(0, 1.0).unwrap();
        assert!(map.is_empty());
        assert!(cache.contains(0, 1.0));
    }
}

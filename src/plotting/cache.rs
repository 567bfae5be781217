use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::trace;

use super::chart::{OverlayView, PlotError};

/// Which chart a cached buffer holds.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum PlotKind {
    Overlay(OverlayView),
    Day(String),
}

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct PlotCacheKey {
    pub kind: PlotKind,
    pub width: u32,
    pub height: u32,
}

impl PlotCacheKey {
    pub fn overlay(view: OverlayView, width: u32, height: u32) -> Self {
        Self {
            kind: PlotKind::Overlay(view),
            width,
            height,
        }
    }

    pub fn day(key: &str, width: u32, height: u32) -> Self {
        Self {
            kind: PlotKind::Day(key.to_string()),
            width,
            height,
        }
    }
}

/// Least-recently-used store of rendered chart buffers.
///
/// The dataset never changes after startup, so entries never go stale.
pub struct PlotCache {
    cache: LruCache<PlotCacheKey, Arc<Vec<u8>>>,
}

impl PlotCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Return the cached buffer for `key`, rendering and storing it on a miss.
    pub fn get_or_render<F>(&mut self, key: PlotCacheKey, render: F) -> Result<Arc<Vec<u8>>, PlotError>
    where
        F: FnOnce() -> Result<Vec<u8>, PlotError>,
    {
        if let Some(pixels) = self.cache.get(&key) {
            trace!(?key, "plot cache hit");
            return Ok(Arc::clone(pixels));
        }
        let pixels = Arc::new(render()?);
        self.cache.put(key, Arc::clone(&pixels));
        Ok(pixels)
    }

    pub fn contains(&self, key: &PlotCacheKey) -> bool {
        self.cache.contains(key)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

impl Default for PlotCache {
    fn default() -> Self {
        Self::new(16)
    }
}

//! Font handle cache
//!
//! Opening a host font allocates a real resource, so handles are pooled:
//! [`FontCache`] keeps the most recently used handles alive, bounded and
//! LRU-ordered, and hands out shared references. Eviction only drops the
//! cache's own reference - a caller still holding an evicted handle keeps
//! using it untouched, and the underlying resource is released when the
//! last holder goes away.
//!
//! The cache is an ordinary owned value: construct one per rendering
//! context and drop it with the context.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use crate::font::system::{FontHandle, FontSource, FontSpec, SystemFont};

/// Handles kept alive by one cache.
pub const FONT_CACHE_CAPACITY: usize = 4;

/// Glyphs kept per handle.
pub const GLYPH_CACHE_CAPACITY: usize = 256;

/// Bounded LRU cache of shared font handles, keyed by [`FontSpec`].
pub struct FontCache {
    source: Box<dyn FontSource>,
    glyph_capacity: usize,
    handles: Mutex<LruCache<FontSpec, Arc<FontHandle>>>,
}

impl FontCache {
    /// Cache with the default capacities.
    #[must_use]
    pub fn new(source: Box<dyn FontSource>) -> Self {
        Self::with_capacities(source, FONT_CACHE_CAPACITY, GLYPH_CACHE_CAPACITY)
    }

    /// Cache with explicit handle and per-handle glyph bounds.
    #[must_use]
    pub fn with_capacities(
        source: Box<dyn FontSource>,
        handle_capacity: usize,
        glyph_capacity: usize,
    ) -> Self {
        let capacity = NonZeroUsize::new(handle_capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            source,
            glyph_capacity,
            handles: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Look up or open the font for `spec`.
    ///
    /// A hit returns the already-shared handle and marks it most recently
    /// used. A miss opens the font through the source, inserts the handle
    /// at the front, and evicts the least recently used handle when over
    /// capacity. Returns `None` only when the host cannot open the font;
    /// failures are not cached.
    pub fn load(&self, spec: &FontSpec) -> Option<SystemFont> {
        let mut handles = self.handles.lock();

        if let Some(handle) = handles.get(spec) {
            return Some(SystemFont::new(Arc::clone(handle)));
        }

        let host = self.source.open(spec)?;
        let handle = Arc::new(FontHandle::new(spec.clone(), host, self.glyph_capacity));
        if let Some((evicted, _)) = handles.push(spec.clone(), Arc::clone(&handle)) {
            log::debug!(
                "font cache full, dropping '{}' {}px (bold={}, italic={})",
                evicted.family,
                evicted.size,
                evicted.bold,
                evicted.italic
            );
        }
        Some(SystemFont::new(handle))
    }

    /// Number of handles currently cached.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.lock().is_empty()
    }

    /// Whether a handle for `spec` is currently cached (does not touch
    /// recency).
    #[must_use]
    pub fn contains(&self, spec: &FontSpec) -> bool {
        self.handles.lock().contains(spec)
    }
}

impl std::fmt::Debug for FontCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontCache")
            .field("handles", &self.len())
            .field("glyph_capacity", &self.glyph_capacity)
            .finish_non_exhaustive()
    }
}

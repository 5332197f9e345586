//! Glyph caching.
//!
//! [`GlyphCache`] is the interface the selector talks to; [`GlyphStore`] is
//! the in-memory implementation shipped with the crate.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use glyph_selector::{GlyphSelector, GlyphStore, GlyphStoreConfig};
//!
//! let store = Arc::new(GlyphStore::new(GlyphStoreConfig::default().with_max_glyphs(4096)));
//! let selector = GlyphSelector::new(store.clone());
//!
//! assert!(store.is_empty());
//! # let _ = selector;
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::font::FontRef;
use crate::glyph::{Glyph, GlyphData, GlyphIndex, GlyphKey, GlyphRender};
use crate::logging::targets;

/// Shared store of rendered glyph data.
///
/// Implementations must be safe to call from several threads at once,
/// including while the caller holds a lock of its own, and must generate
/// each (font, render, index) entry at most once even when several callers
/// race for it.
pub trait GlyphCache: Send + Sync {
    /// Return the glyph stored for `(font, render, index)`, generating and
    /// storing it first if it is not present.
    fn fetch_or_generate(&self, font: &FontRef, render: GlyphRender, index: GlyphIndex) -> Glyph;
}

/// Configuration for the glyph store.
#[derive(Debug, Clone)]
pub struct GlyphStoreConfig {
    /// Number of entries to reserve room for up front.
    /// Default: 1024.
    pub initial_capacity: usize,
    /// Maximum number of stored glyphs. When storing a new glyph would
    /// exceed it, the store is flushed first. Glyphs still being generated
    /// are kept, so the store may briefly hold more entries.
    /// Default: unlimited.
    pub max_glyphs: Option<usize>,
}

impl Default for GlyphStoreConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            max_glyphs: None,
        }
    }
}

impl GlyphStoreConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of entries reserved up front.
    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Limit the number of stored glyphs.
    #[must_use]
    pub fn with_max_glyphs(mut self, max: usize) -> Self {
        self.max_glyphs = Some(max.max(1));
        self
    }
}

/// Statistics about glyph store usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphStoreStats {
    /// Number of fetch-or-generate requests.
    pub lookups: u64,
    /// Number of requests answered from stored data.
    pub hits: u64,
    /// Number of glyphs generated.
    pub generated: u64,
    /// Number of times the store was flushed to respect `max_glyphs`.
    pub flushes: u64,
}

#[derive(Default)]
struct StatCounters {
    lookups: AtomicU64,
    hits: AtomicU64,
    generated: AtomicU64,
    flushes: AtomicU64,
}

type Slot = Arc<OnceLock<Arc<GlyphData>>>;

/// In-memory [`GlyphCache`].
///
/// The slot map is locked only long enough to find or create the slot for a
/// key. Generation runs outside that lock inside the slot's `OnceLock`, so
/// unrelated glyphs generate in parallel while concurrent requests for the
/// same key wait for the single generation already in flight.
pub struct GlyphStore {
    config: GlyphStoreConfig,
    slots: Mutex<HashMap<GlyphKey, Slot>>,
    stats: StatCounters,
}

impl GlyphStore {
    /// Create a new glyph store with the given configuration.
    pub fn new(config: GlyphStoreConfig) -> Self {
        let slots = HashMap::with_capacity(config.initial_capacity);
        Self {
            config,
            slots: Mutex::new(slots),
            stats: StatCounters::default(),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &GlyphStoreConfig {
        &self.config
    }

    /// Number of stored entries, including ones still being generated.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// Check if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    /// Check if an entry exists for `key`.
    pub fn contains(&self, key: &GlyphKey) -> bool {
        self.slots.lock().contains_key(key)
    }

    /// Drop all stored glyphs. Outstanding [`Glyph`] handles stay valid.
    pub fn clear(&self) {
        self.slots.lock().clear();
    }

    /// Get a snapshot of the usage statistics.
    pub fn stats(&self) -> GlyphStoreStats {
        GlyphStoreStats {
            lookups: self.stats.lookups.load(Ordering::Relaxed),
            hits: self.stats.hits.load(Ordering::Relaxed),
            generated: self.stats.generated.load(Ordering::Relaxed),
            flushes: self.stats.flushes.load(Ordering::Relaxed),
        }
    }

    /// Reset the usage statistics.
    pub fn reset_stats(&self) {
        self.stats.lookups.store(0, Ordering::Relaxed);
        self.stats.hits.store(0, Ordering::Relaxed);
        self.stats.generated.store(0, Ordering::Relaxed);
        self.stats.flushes.store(0, Ordering::Relaxed);
    }

    fn slot(&self, key: GlyphKey) -> Slot {
        let mut slots = self.slots.lock();
        if let Some(slot) = slots.get(&key) {
            return slot.clone();
        }

        if let Some(max) = self.config.max_glyphs
            && slots.len() >= max
        {
            // Slots still being generated survive the flush, so a racing
            // request for the same key joins the generation in flight.
            slots.retain(|_, slot| slot.get().is_none());
            tracing::debug!(target: targets::CACHE, pending = slots.len(), "flushed glyph store");
            self.stats.flushes.fetch_add(1, Ordering::Relaxed);
        }

        let slot = Slot::default();
        slots.insert(key, slot.clone());
        slot
    }
}

impl GlyphCache for GlyphStore {
    fn fetch_or_generate(&self, font: &FontRef, render: GlyphRender, index: GlyphIndex) -> Glyph {
        self.stats.lookups.fetch_add(1, Ordering::Relaxed);

        let key = GlyphKey::new(font.id(), render, index);
        let slot = self.slot(key);

        let mut generated = false;
        let data = slot.get_or_init(|| {
            generated = true;
            tracing::trace!(target: targets::CACHE, ?key, "generating glyph");
            Arc::new(GlyphData {
                key,
                render_data: font.compute_rendering_data(render, index),
            })
        });

        if generated {
            self.stats.generated.fetch_add(1, Ordering::Relaxed);
        } else {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
        }

        Glyph::new(data.clone())
    }
}

impl Default for GlyphStore {
    fn default() -> Self {
        Self::new(GlyphStoreConfig::default())
    }
}

impl std::fmt::Debug for GlyphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphStore")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(GlyphStore: Send, Sync);

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicBool, AtomicUsize};

    use super::*;
    use crate::font::Font;
    use crate::glyph::{GlyphMetrics, GlyphRenderData};
    use crate::properties::FontProperties;

    #[derive(Debug)]
    struct SlowFont {
        properties: FontProperties,
        renders: AtomicUsize,
    }

    impl Font for SlowFont {
        fn properties(&self) -> &FontProperties {
            &self.properties
        }

        fn glyph_index(&self, character_code: u32) -> Option<GlyphIndex> {
            Some(GlyphIndex(character_code))
        }

        fn compute_rendering_data(&self, _render: GlyphRender, index: GlyphIndex) -> GlyphRenderData {
            self.renders.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(5));
            GlyphRenderData::empty(GlyphMetrics {
                advance: index.value() as f32,
                bounds: None,
                units_per_em: 1000,
            })
        }
    }

    fn slow_font() -> (FontRef, Arc<SlowFont>) {
        let font = Arc::new(SlowFont {
            properties: FontProperties::new("Slow"),
            renders: AtomicUsize::new(0),
        });
        (FontRef::from_arc(font.clone()), font)
    }

    #[test]
    fn config_builder() {
        let config = GlyphStoreConfig::new()
            .with_initial_capacity(16)
            .with_max_glyphs(0);
        assert_eq!(config.initial_capacity, 16);
        assert_eq!(config.max_glyphs, Some(1));
        assert_eq!(GlyphStoreConfig::default().max_glyphs, None);
    }

    #[test]
    fn second_fetch_is_a_hit() {
        let store = GlyphStore::default();
        let (font, inner) = slow_font();

        let a = store.fetch_or_generate(&font, GlyphRender::DistanceField, GlyphIndex(3));
        let b = store.fetch_or_generate(&font, GlyphRender::DistanceField, GlyphIndex(3));

        assert!(a.ptr_eq(&b));
        assert_eq!(inner.renders.load(Ordering::SeqCst), 1);
        assert_eq!(
            store.stats(),
            GlyphStoreStats {
                lookups: 2,
                hits: 1,
                generated: 1,
                flushes: 0,
            }
        );
    }

    #[test]
    fn render_kind_is_part_of_the_key() {
        let store = GlyphStore::default();
        let (font, inner) = slow_font();

        let a = store.fetch_or_generate(&font, GlyphRender::Coverage { pixel_size: 12 }, GlyphIndex(1));
        let b = store.fetch_or_generate(&font, GlyphRender::Coverage { pixel_size: 24 }, GlyphIndex(1));

        assert!(!a.ptr_eq(&b));
        assert_eq!(store.len(), 2);
        assert_eq!(inner.renders.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn concurrent_requests_generate_once() {
        let store = GlyphStore::default();
        let (font, inner) = slow_font();
        let barrier = Barrier::new(8);

        let glyphs: Vec<Glyph> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        store.fetch_or_generate(&font, GlyphRender::BandedRays, GlyphIndex(42))
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(inner.renders.load(Ordering::SeqCst), 1);
        assert!(glyphs.iter().all(|g| g.ptr_eq(&glyphs[0])));
        assert_eq!(store.stats().generated, 1);
        assert_eq!(store.stats().hits, 7);
    }

    /// Renders index 1 only once `release` is reached, so a flush can
    /// happen while that render is in flight.
    #[derive(Debug)]
    struct GatedFont {
        properties: FontProperties,
        renders: AtomicUsize,
        gated: AtomicBool,
        started: Barrier,
        release: Barrier,
    }

    impl Font for GatedFont {
        fn properties(&self) -> &FontProperties {
            &self.properties
        }

        fn glyph_index(&self, character_code: u32) -> Option<GlyphIndex> {
            Some(GlyphIndex(character_code))
        }

        fn compute_rendering_data(&self, _render: GlyphRender, index: GlyphIndex) -> GlyphRenderData {
            self.renders.fetch_add(1, Ordering::SeqCst);
            if index == GlyphIndex(1) && !self.gated.swap(true, Ordering::SeqCst) {
                self.started.wait();
                self.release.wait();
            }
            GlyphRenderData::empty(GlyphMetrics {
                advance: index.value() as f32,
                bounds: None,
                units_per_em: 1000,
            })
        }
    }

    #[test]
    fn flush_keeps_glyphs_in_flight() {
        let store = GlyphStore::new(GlyphStoreConfig::new().with_max_glyphs(1));
        let inner = Arc::new(GatedFont {
            properties: FontProperties::new("Gated"),
            renders: AtomicUsize::new(0),
            gated: AtomicBool::new(false),
            started: Barrier::new(2),
            release: Barrier::new(2),
        });
        let font = FontRef::from_arc(inner.clone());

        let (first, again) = std::thread::scope(|scope| {
            let slow = scope.spawn(|| {
                store.fetch_or_generate(&font, GlyphRender::DistanceField, GlyphIndex(1))
            });
            inner.started.wait();

            // Store is full: this flushes while index 1 is still rendering.
            store.fetch_or_generate(&font, GlyphRender::DistanceField, GlyphIndex(2));
            assert_eq!(store.stats().flushes, 1);
            assert!(store.contains(&GlyphKey::new(
                font.id(),
                GlyphRender::DistanceField,
                GlyphIndex(1)
            )));

            let racer = scope.spawn(|| {
                store.fetch_or_generate(&font, GlyphRender::DistanceField, GlyphIndex(1))
            });
            inner.release.wait();
            (slow.join().unwrap(), racer.join().unwrap())
        });

        assert_eq!(inner.renders.load(Ordering::SeqCst), 2);
        assert!(first.ptr_eq(&again));
    }

    #[test]
    fn max_glyphs_flushes() {
        let store = GlyphStore::new(GlyphStoreConfig::new().with_max_glyphs(2));
        let (font, _) = slow_font();

        let first = store.fetch_or_generate(&font, GlyphRender::DistanceField, GlyphIndex(1));
        store.fetch_or_generate(&font, GlyphRender::DistanceField, GlyphIndex(2));
        assert_eq!(store.len(), 2);

        store.fetch_or_generate(&font, GlyphRender::DistanceField, GlyphIndex(3));
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().flushes, 1);
        assert!(first.is_valid());
        assert!(!store.contains(&first.key().unwrap()));
    }

    #[test]
    fn clear_and_reset() {
        let store = GlyphStore::default();
        let (font, _) = slow_font();
        store.fetch_or_generate(&font, GlyphRender::DistanceField, GlyphIndex(1));
        assert!(!store.is_empty());

        store.clear();
        assert!(store.is_empty());

        store.reset_stats();
        assert_eq!(store.stats(), GlyphStoreStats::default());
        assert!(format!("{store:?}").contains("GlyphStore"));
    }
}

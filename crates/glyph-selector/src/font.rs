//! Font objects and font generators.
//!
//! A [`Font`] is an already loaded font that can answer glyph queries. A
//! [`FontGenerator`] knows the [`FontProperties`] of a font it can produce,
//! without having paid for loading it yet.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::FontLoadResult;
use crate::glyph::{GlyphIndex, GlyphRender, GlyphRenderData};
use crate::properties::FontProperties;

/// A loaded font, as produced by a parsing/rasterization backend.
pub trait Font: Send + Sync + fmt::Debug {
    /// The identity of this font.
    fn properties(&self) -> &FontProperties;

    /// Map a character code to a glyph index.
    ///
    /// Returns `None` for codes the font does not cover; this is never an
    /// error.
    fn glyph_index(&self, character_code: u32) -> Option<GlyphIndex>;

    /// Compute the data for one glyph in one render kind.
    ///
    /// Called at most once per (font, render, index) by
    /// [`GlyphStore`](crate::GlyphStore).
    fn compute_rendering_data(&self, render: GlyphRender, index: GlyphIndex) -> GlyphRenderData;
}

/// Process-unique identity of a [`FontRef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontId(u64);

impl FontId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw id value.
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FontId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font#{}", self.0)
    }
}

/// Shared handle to a loaded font.
///
/// Every `FontRef` created with [`FontRef::new`] gets a fresh [`FontId`];
/// clones share the id and the underlying font. The id is what glyph
/// caches key on.
#[derive(Clone)]
pub struct FontRef {
    id: FontId,
    font: Arc<dyn Font>,
}

impl FontRef {
    /// Wrap a font in a new shared handle.
    pub fn new(font: impl Font + 'static) -> Self {
        Self::from_arc(Arc::new(font))
    }

    /// Wrap an already shared font in a new handle with its own id.
    pub fn from_arc(font: Arc<dyn Font>) -> Self {
        Self {
            id: FontId::next(),
            font,
        }
    }

    /// Get the identity of this handle.
    pub fn id(&self) -> FontId {
        self.id
    }

    /// Get the shared font.
    pub fn font(&self) -> &Arc<dyn Font> {
        &self.font
    }
}

impl Deref for FontRef {
    type Target = dyn Font;

    fn deref(&self) -> &Self::Target {
        self.font.as_ref()
    }
}

impl PartialEq for FontRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FontRef {}

impl fmt::Debug for FontRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontRef")
            .field("id", &self.id)
            .field("properties", self.font.properties())
            .finish()
    }
}

/// Deferred font creation.
///
/// Registering a generator instead of a font lets the selector postpone
/// opening and parsing the font until one of its glyphs is requested.
pub trait FontGenerator: Send + Sync + fmt::Debug {
    /// The properties of the font [`generate`](Self::generate) would
    /// produce. Must not load the font.
    fn properties(&self) -> &FontProperties;

    /// Load the font.
    ///
    /// The selector calls this at most once per registration and caches
    /// the outcome, success or failure.
    fn generate(&self) -> FontLoadResult<FontRef>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Blank(FontProperties);

    impl Font for Blank {
        fn properties(&self) -> &FontProperties {
            &self.0
        }

        fn glyph_index(&self, _character_code: u32) -> Option<GlyphIndex> {
            None
        }

        fn compute_rendering_data(
            &self,
            _render: GlyphRender,
            _index: GlyphIndex,
        ) -> GlyphRenderData {
            unreachable!("blank font has no glyphs")
        }
    }

    #[test]
    fn ids_are_unique_and_shared_by_clones() {
        let a = FontRef::new(Blank(FontProperties::new("Sans")));
        let b = FontRef::new(Blank(FontProperties::new("Sans")));
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);

        let a2 = a.clone();
        assert_eq!(a.id(), a2.id());
        assert_eq!(a, a2);
        assert!(Arc::ptr_eq(a.font(), a2.font()));
    }

    #[test]
    fn from_arc_gets_a_new_identity() {
        let shared: Arc<dyn Font> = Arc::new(Blank(FontProperties::new("Mono")));
        let a = FontRef::from_arc(shared.clone());
        let b = FontRef::from_arc(shared);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn deref_reaches_the_font() {
        let font = FontRef::new(Blank(FontProperties::new("Serif")));
        assert_eq!(font.properties().family(), "Serif");
        assert!(font.glyph_index('a' as u32).is_none());
        let debug = format!("{font:?}");
        assert!(debug.contains("FontRef"));
        assert!(debug.contains("Serif"));
    }
}

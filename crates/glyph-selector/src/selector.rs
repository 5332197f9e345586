//! The glyph selector: font registry, font matching and glyph lookup.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::{GlyphCache, GlyphStore};
use crate::descriptor::FontDescriptor;
use crate::font::{FontGenerator, FontRef};
use crate::glyph::{Glyph, GlyphRender};
use crate::group::FontGroup;
use crate::logging::targets;
use crate::properties::FontProperties;
use crate::registry::{Plan, Registry};

/// What a glyph lookup should draw from.
#[derive(Debug, Clone, Copy)]
pub enum FontPreference<'a> {
    /// The group matching these properties.
    Properties(&'a FontProperties),
    /// An already fetched group.
    Group(FontGroup<'a>),
    /// This font first, then fonts with similar properties.
    Font(&'a FontRef),
}

impl<'a> From<&'a FontProperties> for FontPreference<'a> {
    fn from(properties: &'a FontProperties) -> Self {
        FontPreference::Properties(properties)
    }
}

impl<'a> From<FontGroup<'a>> for FontPreference<'a> {
    fn from(group: FontGroup<'a>) -> Self {
        FontPreference::Group(group)
    }
}

impl<'a> From<&'a FontRef> for FontPreference<'a> {
    fn from(font: &'a FontRef) -> Self {
        FontPreference::Font(font)
    }
}

/// Selects the glyph to use for a character code from a font preference.
///
/// The selector owns a registry of fonts and font generators, buckets them
/// into [`FontGroup`]s by family, and resolves lookups by walking a group's
/// fonts in match order until one maps the character code ("merging").
/// Rendered glyphs are fetched from, or generated into, a shared
/// [`GlyphCache`].
///
/// # Thread Safety
///
/// All registry state sits behind one mutex. Every operation takes it once
/// for its whole duration; the batch operations hold it across the entire
/// sequence, so registrations from other threads never land mid-batch.
/// The glyph cache is called with the lock held and must not call back
/// into the selector.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use glyph_selector::{FontProperties, GlyphRender, GlyphSelector, GlyphStore};
///
/// let selector = GlyphSelector::new(Arc::new(GlyphStore::default()));
/// // selector.add_font(...) / selector.add_font_generator(...)
///
/// let props = FontProperties::new("DejaVu Sans");
/// let glyph = selector.fetch_glyph(GlyphRender::DistanceField, &props, 'A' as u32, false);
/// if !glyph.is_valid() {
///     println!("no font covers 'A'");
/// }
///
/// let glyphs = selector.fetch_glyphs(GlyphRender::DistanceField, &props, "Hello".chars(), false);
/// assert_eq!(glyphs.len(), 5);
/// ```
pub struct GlyphSelector {
    cache: Arc<dyn GlyphCache>,
    registry: Mutex<Registry>,
}

impl GlyphSelector {
    /// Create a selector that stores glyphs in `cache`.
    pub fn new(cache: Arc<dyn GlyphCache>) -> Self {
        tracing::debug!(target: targets::ROOT, "creating glyph selector");
        Self {
            cache,
            registry: Mutex::new(Registry::default()),
        }
    }

    /// Get the glyph cache.
    pub fn cache(&self) -> &Arc<dyn GlyphCache> {
        &self.cache
    }

    pub(crate) fn registry(&self) -> &Mutex<Registry> {
        &self.registry
    }

    /// Register a loaded font.
    pub fn add_font(&self, font: FontRef) {
        tracing::debug!(target: targets::REGISTRY, font = %font.id(), properties = %font.properties(), "adding font");
        self.add(FontDescriptor::Loaded(font));
    }

    /// Register a font generator. The font is not loaded until a lookup
    /// needs it.
    pub fn add_font_generator(&self, generator: Arc<dyn FontGenerator>) {
        tracing::debug!(target: targets::REGISTRY, properties = %generator.properties(), "adding font generator");
        self.add(FontDescriptor::generator(generator));
    }

    fn add(&self, descriptor: FontDescriptor) {
        let updated = self.registry.lock().add(descriptor);
        tracing::trace!(target: targets::REGISTRY, groups = updated, "updated font groups");
    }

    /// Number of registered fonts and generators.
    pub fn font_count(&self) -> usize {
        self.registry.lock().entry_count()
    }

    /// Number of font groups created so far.
    pub fn group_count(&self) -> usize {
        self.registry.lock().group_count()
    }

    /// Fetch the best-matching font for `properties`.
    ///
    /// Realizes generators in match order until one produces a font.
    /// Returns `None` if no registered entry qualifies.
    ///
    /// With `exact_match`, only fonts whose properties are field-equal to
    /// `properties` (ignoring the source label) are considered.
    pub fn fetch_font(&self, properties: &FontProperties, exact_match: bool) -> Option<FontRef> {
        let mut registry = self.registry.lock();
        let group = registry.group(properties, exact_match);
        registry.best_font(group)
    }

    /// Fetch the group for `properties`, creating it on first use.
    ///
    /// Field-equal `properties` with the same `exact_match` always yield
    /// the same group. No generator is realized.
    pub fn fetch_group(&self, properties: &FontProperties, exact_match: bool) -> FontGroup<'_> {
        let id = self.registry.lock().group(properties, exact_match);
        FontGroup::new(self, id)
    }

    /// Fetch a glyph with font merging.
    ///
    /// Candidates depend on the preference:
    /// - [`FontPreference::Font`]: the font itself, then the fonts of the
    ///   group matching its properties.
    /// - [`FontPreference::Properties`]: the fonts of the matching group.
    /// - [`FontPreference::Group`]: the fonts of the group; with
    ///   `exact_match` only those field-equal to the group's query.
    ///
    /// The first candidate that maps `character_code` supplies the glyph.
    /// Returns [`Glyph::invalid`] if none does.
    ///
    /// # Panics
    ///
    /// Panics if `render` is not valid, or if the preference is a group of
    /// another selector.
    pub fn fetch_glyph<'a>(
        &'a self,
        render: GlyphRender,
        preference: impl Into<FontPreference<'a>>,
        character_code: u32,
        exact_match: bool,
    ) -> Glyph {
        check_render(render);
        let preference = preference.into();
        let mut registry = self.registry.lock();
        let plan = self.plan(&mut registry, preference, exact_match);
        registry.fetch_glyph(self.cache.as_ref(), render, &plan, character_code)
    }

    /// Fetch a glyph from `font` only, without falling back to other fonts.
    ///
    /// Returns [`Glyph::invalid`] if `font` does not map `character_code`.
    ///
    /// # Panics
    ///
    /// Panics if `render` is not valid.
    pub fn fetch_glyph_no_merging(
        &self,
        render: GlyphRender,
        font: &FontRef,
        character_code: u32,
    ) -> Glyph {
        check_render(render);
        let plan = Plan::single(font.clone());
        let mut registry = self.registry.lock();
        registry.fetch_glyph(self.cache.as_ref(), render, &plan, character_code)
    }

    /// Fetch glyphs with font merging for a sequence of character codes,
    /// appending them to `output` in input order.
    ///
    /// Equivalent to calling [`fetch_glyph`](Self::fetch_glyph) per code,
    /// but the selector lock is taken once for the whole sequence.
    /// `character_codes` runs with the lock held and must not call into
    /// this selector.
    pub fn fetch_glyph_sequence<'a, I, E>(
        &'a self,
        render: GlyphRender,
        preference: impl Into<FontPreference<'a>>,
        character_codes: I,
        output: &mut E,
        exact_match: bool,
    ) where
        I: IntoIterator,
        I::Item: Into<u32>,
        E: Extend<Glyph>,
    {
        check_render(render);
        let preference = preference.into();
        let mut registry = self.registry.lock();
        let plan = self.plan(&mut registry, preference, exact_match);
        let cache = self.cache.as_ref();
        output.extend(
            character_codes
                .into_iter()
                .map(|code| registry.fetch_glyph(cache, render, &plan, code.into())),
        );
    }

    /// Fetch glyphs from `font` only for a sequence of character codes,
    /// appending them to `output` in input order.
    ///
    /// The selector lock is taken once for the whole sequence.
    pub fn fetch_glyph_sequence_no_merging<I, E>(
        &self,
        render: GlyphRender,
        font: &FontRef,
        character_codes: I,
        output: &mut E,
    ) where
        I: IntoIterator,
        I::Item: Into<u32>,
        E: Extend<Glyph>,
    {
        check_render(render);
        let plan = Plan::single(font.clone());
        let mut registry = self.registry.lock();
        let cache = self.cache.as_ref();
        output.extend(
            character_codes
                .into_iter()
                .map(|code| registry.fetch_glyph(cache, render, &plan, code.into())),
        );
    }

    /// Collecting form of [`fetch_glyph_sequence`](Self::fetch_glyph_sequence).
    pub fn fetch_glyphs<'a, I>(
        &'a self,
        render: GlyphRender,
        preference: impl Into<FontPreference<'a>>,
        character_codes: I,
        exact_match: bool,
    ) -> Vec<Glyph>
    where
        I: IntoIterator,
        I::Item: Into<u32>,
    {
        let mut glyphs = Vec::new();
        self.fetch_glyph_sequence(render, preference, character_codes, &mut glyphs, exact_match);
        glyphs
    }

    /// Collecting form of
    /// [`fetch_glyph_sequence_no_merging`](Self::fetch_glyph_sequence_no_merging).
    pub fn fetch_glyphs_no_merging<I>(
        &self,
        render: GlyphRender,
        font: &FontRef,
        character_codes: I,
    ) -> Vec<Glyph>
    where
        I: IntoIterator,
        I::Item: Into<u32>,
    {
        let mut glyphs = Vec::new();
        self.fetch_glyph_sequence_no_merging(render, font, character_codes, &mut glyphs);
        glyphs
    }

    fn plan(&self, registry: &mut Registry, preference: FontPreference<'_>, exact_match: bool) -> Plan {
        match preference {
            FontPreference::Properties(properties) => Plan {
                first: None,
                group: Some(registry.group(properties, exact_match)),
                exact_filter: false,
            },
            FontPreference::Group(group) => {
                assert!(
                    std::ptr::eq(group.selector(), self),
                    "FontGroup used with a GlyphSelector other than the one that created it"
                );
                Plan {
                    first: None,
                    group: Some(group.id()),
                    exact_filter: exact_match && !registry.group_state(group.id()).key.exact,
                }
            }
            FontPreference::Font(font) => Plan {
                first: Some(font.clone()),
                group: Some(registry.group(font.properties(), exact_match)),
                exact_filter: false,
            },
        }
    }
}

fn check_render(render: GlyphRender) {
    assert!(render.is_valid(), "invalid glyph render: {render:?}");
}

impl Default for GlyphSelector {
    /// A selector backed by a default [`GlyphStore`].
    fn default() -> Self {
        Self::new(Arc::new(GlyphStore::default()))
    }
}

impl std::fmt::Debug for GlyphSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.lock();
        f.debug_struct("GlyphSelector")
            .field("font_count", &registry.entry_count())
            .field("group_count", &registry.group_count())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(GlyphSelector: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::Font;
    use crate::glyph::{GlyphIndex, GlyphMetrics, GlyphRenderData};

    #[derive(Debug)]
    struct Ascii(FontProperties);

    impl Font for Ascii {
        fn properties(&self) -> &FontProperties {
            &self.0
        }

        fn glyph_index(&self, character_code: u32) -> Option<GlyphIndex> {
            (character_code < 0x80).then_some(GlyphIndex(character_code))
        }

        fn compute_rendering_data(&self, _render: GlyphRender, _index: GlyphIndex) -> GlyphRenderData {
            GlyphRenderData::empty(GlyphMetrics {
                advance: 1.0,
                bounds: None,
                units_per_em: 1,
            })
        }
    }

    #[test]
    fn debug_reports_counts() {
        let selector = GlyphSelector::default();
        selector.add_font(FontRef::new(Ascii(FontProperties::new("Sans"))));
        selector.fetch_group(&FontProperties::new("Sans"), false);
        let debug = format!("{selector:?}");
        assert!(debug.contains("font_count: 1"));
        assert!(debug.contains("group_count: 1"));
    }

    #[test]
    #[should_panic(expected = "invalid glyph render")]
    fn zero_pixel_coverage_panics() {
        let selector = GlyphSelector::default();
        let font = FontRef::new(Ascii(FontProperties::new("Sans")));
        selector.fetch_glyph_no_merging(GlyphRender::Coverage { pixel_size: 0 }, &font, 'a' as u32);
    }

    #[test]
    #[should_panic(expected = "other than the one that created it")]
    fn foreign_group_panics() {
        let a = GlyphSelector::default();
        let b = GlyphSelector::default();
        let group = a.fetch_group(&FontProperties::new("Sans"), false);
        b.fetch_glyph(GlyphRender::DistanceField, group, 'a' as u32, false);
    }

    #[test]
    fn group_preference_exact_filter() {
        let selector = GlyphSelector::default();
        let bold = FontRef::new(Ascii(
            FontProperties::new("Sans").weight(crate::properties::FontWeight::BOLD),
        ));
        selector.add_font(bold.clone());
        let group = selector.fetch_group(&FontProperties::new("Sans"), false);

        let merged = selector.fetch_glyph(GlyphRender::DistanceField, group, 'a' as u32, false);
        assert_eq!(merged.font_id(), Some(bold.id()));

        let strict = selector.fetch_glyph(GlyphRender::DistanceField, group, 'a' as u32, true);
        assert!(!strict.is_valid());
    }
}

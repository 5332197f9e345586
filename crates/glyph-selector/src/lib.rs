//! Font matching, font merging and cached glyph lookup.
//!
//! This crate answers one question for a text renderer: given a font
//! preference and a character code, which font supplies the glyph, and
//! where is its rendering data? Parsing fonts and rasterizing glyphs are
//! left to a backend (see `glyph-selector-fontdb`); this crate owns the
//! registry, the matching rules and the glyph cache.
//!
//! # Getting Started
//!
//! Register fonts (or generators that load them on demand), then fetch
//! glyphs by [`FontProperties`]:
//!
//! ```no_run
//! use glyph_selector::{FontProperties, FontWeight, GlyphRender, GlyphSelector};
//!
//! let selector = GlyphSelector::default();
//! // selector.add_font(...);
//! // selector.add_font_generator(...);
//!
//! let props = FontProperties::new("Noto Sans").weight(FontWeight::BOLD);
//! let glyph = selector.fetch_glyph(GlyphRender::DistanceField, &props, 'é' as u32, false);
//! if let Some(data) = glyph.data() {
//!     println!("advance: {}", data.render_data.metrics.advance);
//! }
//! ```
//!
//! # Font Groups
//!
//! Fonts are bucketed by family name. A [`FontGroup`] is the ranked list of
//! registered fonts for one query: the closer a font's italic flag, weight
//! and foundry are to the query, the earlier it comes. Fonts registered
//! later join the groups that accept them.
//!
//! With `exact_match`, a group only admits fonts whose properties equal the
//! query field for field.
//!
//! # Merging
//!
//! When the preferred font lacks a character, [`GlyphSelector::fetch_glyph`]
//! falls back to the next font of the group that maps it. The `_no_merging`
//! variants consult a single font only.
//!
//! # Glyph Cache
//!
//! Rendering data is kept in a [`GlyphCache`], keyed by font, render kind
//! and glyph index. [`GlyphStore`] is the bundled implementation.

mod cache;
mod descriptor;
mod error;
mod font;
mod glyph;
mod group;
pub mod logging;
mod matching;
mod properties;
mod registry;
mod selector;

pub use cache::{GlyphCache, GlyphStore, GlyphStoreConfig, GlyphStoreStats};
pub use error::{FontLoadError, FontLoadResult};
pub use font::{Font, FontGenerator, FontId, FontRef};
pub use glyph::{
    Glyph, GlyphBounds, GlyphData, GlyphIndex, GlyphKey, GlyphMetrics, GlyphRender,
    GlyphRenderData, PathCommand,
};
pub use group::FontGroup;
pub use properties::{FontProperties, FontWeight};
pub use selector::{FontPreference, GlyphSelector};

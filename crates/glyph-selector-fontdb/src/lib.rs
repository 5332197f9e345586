//! `fontdb` and `ttf-parser` backend for `glyph-selector`.
//!
//! [`TtfFont`] implements [`Font`](glyph_selector::Font) over a parsed
//! TrueType/OpenType face. [`FaceGenerator`] defers loading a face of a
//! [`fontdb::Database`] until the selector needs one of its glyphs.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use glyph_selector::{FontProperties, GlyphRender, GlyphSelector};
//! use glyph_selector_fontdb::{FontDatabaseConfig, register_database};
//!
//! let db = FontDatabaseConfig::new().load_system_fonts(true).build();
//! let selector = GlyphSelector::default();
//! let faces = register_database(&selector, Arc::new(db));
//! println!("registered {faces} faces");
//!
//! // Only the faces actually used are parsed.
//! let glyphs = selector.fetch_glyphs(
//!     GlyphRender::Coverage { pixel_size: 16 },
//!     &FontProperties::new("DejaVu Sans"),
//!     "Hello".chars(),
//!     false,
//! );
//! ```

mod database;
mod face;

pub use database::{FaceGenerator, FaceSources, FontDatabaseConfig, register_database};
pub use face::{FontData, TtfFont};

pub use fontdb;

/// Tracing targets used by this crate.
pub mod targets {
    /// Database building and registration.
    pub const DATABASE: &str = "glyph_selector_fontdb::database";
    /// Face parsing.
    pub const FACE: &str = "glyph_selector_fontdb::face";
}

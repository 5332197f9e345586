//! Glyph values: render kinds, cache keys and glyph rendering data.

use std::fmt;
use std::sync::Arc;

use crate::font::FontId;

/// The representation a glyph is rendered into.
///
/// The same glyph of the same font is cached separately for every render
/// kind (and, for coverage glyphs, every pixel size).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GlyphRender {
    /// Coverage (alpha mask) glyph rendered at a fixed pixel size.
    Coverage {
        /// Pixel size the coverage is computed at. Must be non-zero.
        pixel_size: u32,
    },
    /// Signed distance field glyph, resolution independent.
    DistanceField,
    /// Curve-based glyph evaluated with restricted rays.
    #[default]
    RestrictedRays,
    /// Curve-based glyph evaluated with horizontal and vertical bands.
    BandedRays,
}

impl GlyphRender {
    /// Check if this render kind can be used for a lookup.
    pub fn is_valid(&self) -> bool {
        !matches!(self, GlyphRender::Coverage { pixel_size: 0 })
    }

    /// Check if this render kind scales without re-rendering.
    pub fn is_scalable(&self) -> bool {
        !matches!(self, GlyphRender::Coverage { .. })
    }
}

/// Index of a glyph within a font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlyphIndex(pub u32);

impl GlyphIndex {
    /// Get the raw index value.
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// Key identifying one rendered glyph in a [`GlyphCache`](crate::GlyphCache).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphKey {
    /// The font the glyph comes from.
    pub font: FontId,
    /// The representation it is rendered into.
    pub render: GlyphRender,
    /// The glyph index within the font.
    pub index: GlyphIndex,
}

impl GlyphKey {
    /// Create a new glyph key.
    pub fn new(font: FontId, render: GlyphRender, index: GlyphIndex) -> Self {
        Self {
            font,
            render,
            index,
        }
    }
}

/// Bounding box of a glyph outline in font units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphBounds {
    /// Minimum x coordinate.
    pub x_min: i16,
    /// Minimum y coordinate.
    pub y_min: i16,
    /// Maximum x coordinate.
    pub x_max: i16,
    /// Maximum y coordinate.
    pub y_max: i16,
}

impl GlyphBounds {
    /// Width of the bounding box.
    pub fn width(&self) -> i32 {
        i32::from(self.x_max) - i32::from(self.x_min)
    }

    /// Height of the bounding box.
    pub fn height(&self) -> i32 {
        i32::from(self.y_max) - i32::from(self.y_min)
    }
}

/// Glyph metrics in font units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    /// Horizontal advance.
    pub advance: f32,
    /// Outline bounds, `None` for glyphs without an outline (e.g. space).
    pub bounds: Option<GlyphBounds>,
    /// The number of font units per em.
    pub units_per_em: u16,
}

impl GlyphMetrics {
    /// Scale font units to pixels for a given font size.
    pub fn scale_to_pixels(&self, font_units: f32, font_size: f32) -> f32 {
        font_units * font_size / f32::from(self.units_per_em.max(1))
    }

    /// Get the advance scaled to pixels for a given font size.
    pub fn advance_px(&self, font_size: f32) -> f32 {
        self.scale_to_pixels(self.advance, font_size)
    }
}

/// One outline path command in font units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Start a new contour.
    MoveTo(f32, f32),
    /// Straight line to a point.
    LineTo(f32, f32),
    /// Quadratic curve: control point, end point.
    QuadTo(f32, f32, f32, f32),
    /// Cubic curve: two control points, end point.
    CubicTo(f32, f32, f32, f32, f32, f32),
    /// Close the current contour.
    Close,
}

/// The data a font produces for one glyph in one render kind.
///
/// This carries metrics and outline only. Turning it into pixels or GPU
/// data is the renderer's business.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRenderData {
    /// Glyph metrics.
    pub metrics: GlyphMetrics,
    /// Glyph outline.
    pub outline: Vec<PathCommand>,
}

impl GlyphRenderData {
    /// Create render data without an outline.
    pub fn empty(metrics: GlyphMetrics) -> Self {
        Self {
            metrics,
            outline: Vec::new(),
        }
    }

    /// Check if the glyph has no outline.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }
}

/// A cached glyph: its key plus the render data produced for it.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphData {
    /// The key this data is stored under.
    pub key: GlyphKey,
    /// The render data.
    pub render_data: GlyphRenderData,
}

/// Handle to a rendered glyph, or the invalid sentinel.
///
/// An invalid glyph is a normal lookup outcome: it means no candidate font
/// maps the requested character code.
#[derive(Clone, Default)]
pub struct Glyph {
    data: Option<Arc<GlyphData>>,
}

impl Glyph {
    /// The invalid glyph sentinel.
    pub const fn invalid() -> Self {
        Self { data: None }
    }

    /// Wrap cached glyph data.
    pub fn new(data: Arc<GlyphData>) -> Self {
        Self { data: Some(data) }
    }

    /// Check if this glyph refers to rendered data.
    pub fn is_valid(&self) -> bool {
        self.data.is_some()
    }

    /// Get the glyph data, `None` for the invalid sentinel.
    pub fn data(&self) -> Option<&GlyphData> {
        self.data.as_deref()
    }

    /// Get the cache key, `None` for the invalid sentinel.
    pub fn key(&self) -> Option<GlyphKey> {
        self.data.as_ref().map(|data| data.key)
    }

    /// Get the id of the font the glyph comes from.
    pub fn font_id(&self) -> Option<FontId> {
        self.key().map(|key| key.font)
    }

    /// Get the glyph index within its font.
    pub fn index(&self) -> Option<GlyphIndex> {
        self.key().map(|key| key.index)
    }

    /// Check if both handles point at the same cached entry.
    pub fn ptr_eq(&self, other: &Glyph) -> bool {
        match (&self.data, &other.data) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            Some(data) => f.debug_tuple("Glyph").field(&data.key).finish(),
            None => f.write_str("Glyph(invalid)"),
        }
    }
}

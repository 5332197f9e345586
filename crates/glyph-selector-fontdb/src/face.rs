//! Fonts parsed with `ttf-parser`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use glyph_selector::{
    Font, FontLoadError, FontLoadResult, FontProperties, FontWeight, GlyphBounds, GlyphIndex,
    GlyphMetrics, GlyphRender, GlyphRenderData, PathCommand,
};
use ttf_parser::{Face, GlyphId, Language, OutlineBuilder, name_id};

use crate::targets;

/// Contents of a font file, shared by every face loaded from it.
///
/// This is the same shape `fontdb` uses for in-memory and memory-mapped
/// sources, so their data is shared without copying.
pub type FontData = Arc<dyn AsRef<[u8]> + Send + Sync>;

/// A TrueType/OpenType face.
///
/// The face is parsed once up front to validate it, read its properties
/// and build its character map, so character lookups never touch the font
/// file. Outlines are read from the file when a glyph is rendered.
pub struct TtfFont {
    data: FontData,
    index: u32,
    properties: FontProperties,
    cmap: HashMap<u32, u16>,
}

impl TtfFont {
    /// Parse face `index` of a font file held in memory.
    pub fn from_data(data: Vec<u8>, index: u32) -> FontLoadResult<Self> {
        Self::from_shared(Arc::new(data), index)
    }

    /// Parse face `index` of shared font file contents.
    pub fn from_shared(data: FontData, index: u32) -> FontLoadResult<Self> {
        let (properties, cmap) = {
            let face = Face::parse((*data).as_ref(), index)
                .map_err(|e| FontLoadError::InvalidFormat(format!("face {index}: {e}")))?;
            (face_properties(&face), char_map(&face))
        };
        tracing::debug!(
            target: targets::FACE,
            %properties,
            index,
            chars = cmap.len(),
            "parsed font face"
        );
        Ok(Self {
            data,
            index,
            properties,
            cmap,
        })
    }

    /// Read and parse face `index` of a font file on disk.
    ///
    /// The path becomes the font's source label.
    pub fn from_file(path: impl AsRef<Path>, index: u32) -> FontLoadResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| FontLoadError::Io(format!("{}: {e}", path.display())))?;
        Ok(Self::from_data(data, index)?.with_source_label(path.display().to_string()))
    }

    /// Replace the source label of this font's properties.
    #[must_use]
    pub fn with_source_label(mut self, label: impl Into<String>) -> Self {
        self.properties = self.properties.source_label(label);
        self
    }

    /// Index of the face within its font file.
    pub fn face_index(&self) -> u32 {
        self.index
    }

    /// Number of characters this face maps.
    pub fn char_count(&self) -> usize {
        self.cmap.len()
    }

    /// Check if two fonts read from the same file contents.
    pub fn shares_data_with(&self, other: &TtfFont) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::parse((*self.data).as_ref(), self.index).ok()
    }
}

impl Font for TtfFont {
    fn properties(&self) -> &FontProperties {
        &self.properties
    }

    fn glyph_index(&self, character_code: u32) -> Option<GlyphIndex> {
        self.cmap
            .get(&character_code)
            .map(|&id| GlyphIndex(u32::from(id)))
    }

    fn compute_rendering_data(&self, _render: GlyphRender, index: GlyphIndex) -> GlyphRenderData {
        let Some(face) = self.face() else {
            return GlyphRenderData::empty(GlyphMetrics {
                advance: 0.0,
                bounds: None,
                units_per_em: 0,
            });
        };
        let metrics = |bounds| GlyphMetrics {
            advance: 0.0,
            bounds,
            units_per_em: face.units_per_em(),
        };

        // Glyph ids are 16-bit in sfnt fonts.
        let Ok(id) = u16::try_from(index.value()).map(GlyphId) else {
            return GlyphRenderData::empty(metrics(None));
        };

        let mut outline = OutlineCollector::default();
        let bounds = face.outline_glyph(id, &mut outline).map(|rect| GlyphBounds {
            x_min: rect.x_min,
            y_min: rect.y_min,
            x_max: rect.x_max,
            y_max: rect.y_max,
        });

        GlyphRenderData {
            metrics: GlyphMetrics {
                advance: face.glyph_hor_advance(id).map_or(0.0, f32::from),
                ..metrics(bounds)
            },
            outline: outline.commands,
        }
    }
}

impl std::fmt::Debug for TtfFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtfFont")
            .field("properties", &self.properties)
            .field("index", &self.index)
            .field("chars", &self.cmap.len())
            .finish_non_exhaustive()
    }
}

/// Read [`FontProperties`] from a parsed face's name and OS/2 tables.
///
/// Both [`TtfFont`] and [`FaceGenerator`](crate::FaceGenerator) use this,
/// so a generator advertises exactly the properties of the font it makes.
pub(crate) fn face_properties(face: &Face<'_>) -> FontProperties {
    let family = name(face, name_id::TYPOGRAPHIC_FAMILY)
        .or_else(|| name(face, name_id::FAMILY))
        .unwrap_or_default();
    let mut properties = FontProperties::new(family)
        .italic(face.is_italic() || face.is_oblique())
        .weight(FontWeight::new(face.weight().to_number()));
    if let Some(foundry) = name(face, name_id::MANUFACTURER) {
        properties = properties.foundry(foundry);
    }
    properties
}

/// First non-empty US English record for `id`, else the first non-empty
/// record in any language.
fn name(face: &Face<'_>, id: u16) -> Option<String> {
    let mut fallback = None;
    for record in face.names() {
        if record.name_id != id {
            continue;
        }
        let Some(value) = record.to_string().filter(|s| !s.trim().is_empty()) else {
            continue;
        };
        if record.language() == Language::English_UnitedStates {
            return Some(value);
        }
        fallback.get_or_insert(value);
    }
    fallback
}

/// Unicode code point to glyph id, from the first Unicode subtable that
/// maps each code point. Mappings to `.notdef` are left out.
fn char_map(face: &Face<'_>) -> HashMap<u32, u16> {
    let mut map = HashMap::new();
    let Some(cmap) = face.tables().cmap else {
        return map;
    };
    for subtable in cmap.subtables {
        if !subtable.is_unicode() {
            continue;
        }
        subtable.codepoints(|code| {
            if let Some(id) = subtable.glyph_index(code)
                && id.0 != 0
            {
                map.entry(code).or_insert(id.0);
            }
        });
    }
    map
}

#[derive(Default)]
struct OutlineCollector {
    commands: Vec<PathCommand>,
}

impl OutlineBuilder for OutlineCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(PathCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(PathCommand::LineTo(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.commands.push(PathCommand::QuadTo(x1, y1, x, y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.commands.push(PathCommand::CubicTo(x1, y1, x2, y2, x, y));
    }

    fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_garbage() {
        let err = TtfFont::from_data(vec![0u8; 64], 0).unwrap_err();
        assert!(matches!(err, FontLoadError::InvalidFormat(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = TtfFont::from_file("/nonexistent/glyph-selector/font.ttf", 0).unwrap_err();
        assert!(matches!(err, FontLoadError::Io(_)));
        assert!(err.to_string().contains("font.ttf"));
    }

    #[test]
    fn outline_collector_records_commands() {
        let mut collector = OutlineCollector::default();
        collector.move_to(0.0, 0.0);
        collector.quad_to(1.0, 2.0, 3.0, 4.0);
        collector.close();
        assert_eq!(
            collector.commands,
            vec![
                PathCommand::MoveTo(0.0, 0.0),
                PathCommand::QuadTo(1.0, 2.0, 3.0, 4.0),
                PathCommand::Close,
            ]
        );
    }
}

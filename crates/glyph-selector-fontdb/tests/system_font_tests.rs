//! Integration tests against the fonts installed on the host.
//!
//! These need at least one font covering basic Latin and are ignored by
//! default. Run with `cargo test -- --ignored`.

use std::sync::Arc;

use glyph_selector::{Font, FontGenerator, GlyphRender, GlyphSelector};
use glyph_selector_fontdb::{
    FaceGenerator, FaceSources, FontDatabaseConfig, TtfFont, register_database,
};

fn system_db() -> Arc<fontdb::Database> {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
    Arc::new(FontDatabaseConfig::new().load_system_fonts(true).build())
}

#[test]
#[ignore = "requires system fonts"]
fn every_face_gets_a_generator() {
    let db = system_db();
    let selector = GlyphSelector::default();
    let count = register_database(&selector, db.clone());
    assert_eq!(count, db.len());
    assert_eq!(selector.font_count(), count);
}

#[test]
#[ignore = "requires system fonts"]
fn generated_face_matches_advertised_family() {
    let db = system_db();
    assert!(!db.is_empty(), "no system fonts installed");
    for face in db.faces() {
        let Some(generator) = FaceGenerator::new(db.clone(), face.id) else {
            continue;
        };
        let font = generator.generate().expect("face parses");
        assert_eq!(font.properties(), generator.properties());
        assert_eq!(font.properties().label(), generator.properties().label());
    }
}

#[test]
#[ignore = "requires system fonts"]
fn exact_lookup_finds_registered_faces() {
    let db = system_db();
    let selector = GlyphSelector::default();
    register_database(&selector, db.clone());

    let face = db.faces().next().expect("no system fonts installed");
    let generator = FaceGenerator::new(db.clone(), face.id).expect("face parses");
    let wanted = generator.properties().clone();

    let font = selector.fetch_font(&wanted, true).expect("advertised face resolves");
    assert_eq!(font.properties(), &wanted);
    assert!(!selector.fetch_group(font.properties(), true).is_empty());
}

#[test]
#[ignore = "requires system fonts"]
fn collection_faces_share_file_data() {
    let db = system_db();
    let Some(source) = db
        .faces()
        .find(|face| face.index > 0)
        .map(|face| face.source.clone())
    else {
        // No font collections installed.
        return;
    };

    let sources = FaceSources::new();
    let first = TtfFont::from_shared(sources.data(&source).unwrap(), 0).expect("face parses");
    let second = TtfFont::from_shared(sources.data(&source).unwrap(), 1).expect("face parses");
    assert!(first.shares_data_with(&second));
    assert_eq!(second.face_index(), 1);
}

#[test]
#[ignore = "requires system fonts"]
fn latin_text_resolves_through_the_selector() {
    let db = system_db();
    let selector = GlyphSelector::default();
    register_database(&selector, db.clone());

    // Pick a family that covers 'A' and look it up by properties.
    let family = db
        .faces()
        .filter_map(|face| FaceGenerator::new(db.clone(), face.id))
        .find(|generator| {
            generator
                .generate()
                .is_ok_and(|font| font.glyph_index('A' as u32).is_some())
        })
        .map(|generator| generator.properties().clone())
        .expect("no system font covers 'A'");

    let glyphs = selector.fetch_glyphs(GlyphRender::BandedRays, &family, "AA".chars(), false);
    assert_eq!(glyphs.len(), 2);
    assert!(glyphs[0].is_valid());
    assert!(glyphs[0].ptr_eq(&glyphs[1]));

    let data = glyphs[0].data().unwrap();
    assert!(!data.render_data.is_empty());
    assert!(data.render_data.metrics.advance > 0.0);
    assert!(data.render_data.metrics.bounds.is_some());
}

#[test]
#[ignore = "requires system fonts"]
fn ttf_font_from_file() {
    let db = system_db();
    let (path, index) = db
        .faces()
        .find_map(|face| match &face.source {
            fontdb::Source::File(path) => Some((path.clone(), face.index)),
            _ => None,
        })
        .expect("no file-backed system fonts");

    let font = TtfFont::from_file(&path, index).expect("face parses");
    assert_eq!(font.properties().label(), path.display().to_string());
    assert_eq!(font.face_index(), index);
    assert!(font.glyph_index(0xD800).is_none());
}

//! Font generators over a `fontdb` database.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Weak};

use fontdb::{Database, ID, Source};
use glyph_selector::{
    FontGenerator, FontLoadError, FontLoadResult, FontProperties, FontRef, GlyphSelector,
};
use parking_lot::Mutex;
use ttf_parser::Face;

use crate::face::{FontData, TtfFont, face_properties};
use crate::targets;

/// Source label for faces loaded from memory.
const MEMORY_SOURCE: &str = "memory";

/// Configuration for building a font database.
#[derive(Debug, Clone, Default)]
pub struct FontDatabaseConfig {
    /// Whether to load the fonts installed on the system.
    /// Default: false.
    pub load_system_fonts: bool,
    /// Directories scanned recursively for font files.
    pub font_dirs: Vec<PathBuf>,
    /// Individual font files.
    pub font_files: Vec<PathBuf>,
    /// Font files already in memory.
    pub font_data: Vec<Vec<u8>>,
}

impl FontDatabaseConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to load system fonts.
    #[must_use]
    pub fn load_system_fonts(mut self, load: bool) -> Self {
        self.load_system_fonts = load;
        self
    }

    /// Add a directory to scan for fonts.
    #[must_use]
    pub fn font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.font_dirs.push(dir.into());
        self
    }

    /// Add a font file.
    #[must_use]
    pub fn font_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_files.push(path.into());
        self
    }

    /// Add an in-memory font file.
    #[must_use]
    pub fn font_data(mut self, data: Vec<u8>) -> Self {
        self.font_data.push(data);
        self
    }

    /// Build the database.
    ///
    /// Font files that cannot be read are logged and skipped.
    pub fn build(&self) -> Database {
        let mut db = Database::new();
        if self.load_system_fonts {
            db.load_system_fonts();
        }
        for dir in &self.font_dirs {
            db.load_fonts_dir(dir);
        }
        for path in &self.font_files {
            if let Err(e) = db.load_font_file(path) {
                tracing::warn!(
                    target: targets::DATABASE,
                    path = %path.display(),
                    error = %e,
                    "skipping unreadable font file"
                );
            }
        }
        for data in &self.font_data {
            db.load_font_data(data.clone());
        }
        tracing::debug!(target: targets::DATABASE, faces = db.len(), "built font database");
        db
    }
}

/// File contents shared by the generators of one database.
///
/// Every face of a font collection reads from one copy of the file. The
/// copy is dropped once no font loaded from it is alive.
#[derive(Default)]
pub struct FaceSources {
    files: Mutex<HashMap<PathBuf, Weak<dyn AsRef<[u8]> + Send + Sync>>>,
}

impl FaceSources {
    /// Create an empty source cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the contents of `source`, reading files at most once while any
    /// font loaded from them is alive.
    pub fn data(&self, source: &Source) -> FontLoadResult<FontData> {
        match source {
            Source::Binary(data) | Source::SharedFile(_, data) => Ok(data.clone()),
            Source::File(path) => {
                let mut files = self.files.lock();
                if let Some(data) = files.get(path).and_then(Weak::upgrade) {
                    return Ok(data);
                }
                let bytes = std::fs::read(path)
                    .map_err(|e| FontLoadError::Io(format!("{}: {e}", path.display())))?;
                tracing::trace!(
                    target: targets::DATABASE,
                    path = %path.display(),
                    bytes = bytes.len(),
                    "read font file"
                );
                let data: FontData = Arc::new(bytes);
                files.insert(path.clone(), Arc::downgrade(&data));
                Ok(data)
            }
        }
    }
}

impl std::fmt::Debug for FaceSources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceSources")
            .field("files", &self.files.lock().len())
            .finish()
    }
}

/// A [`FontGenerator`] for one face of a `fontdb` database.
///
/// The properties are read from the face's name and OS/2 tables when the
/// generator is created, with the same rules [`TtfFont`] applies, so the
/// advertised properties equal those of the generated font. Glyph outlines
/// are not touched until [`generate`](FontGenerator::generate) is called.
pub struct FaceGenerator {
    db: Arc<Database>,
    id: ID,
    properties: FontProperties,
    sources: Arc<FaceSources>,
}

impl FaceGenerator {
    /// Create a generator for face `id`.
    ///
    /// Returns `None` if the database has no such face or it cannot be
    /// parsed.
    pub fn new(db: Arc<Database>, id: ID) -> Option<Self> {
        Self::with_sources(db, id, Arc::new(FaceSources::new()))
    }

    /// Create a generator for face `id` that reads file contents through
    /// `sources`.
    pub fn with_sources(db: Arc<Database>, id: ID, sources: Arc<FaceSources>) -> Option<Self> {
        let info = db.face(id)?;
        let label = source_label(&info.source);
        let properties = db
            .with_face_data(id, |data, index| {
                Face::parse(data, index).ok().map(|face| face_properties(&face))
            })
            .flatten();
        let Some(properties) = properties else {
            tracing::warn!(target: targets::DATABASE, source = %label, "skipping unparsable font face");
            return None;
        };
        Some(Self {
            properties: properties.source_label(label),
            db,
            id,
            sources,
        })
    }

    /// The face this generator loads.
    pub fn face_id(&self) -> ID {
        self.id
    }
}

impl FontGenerator for FaceGenerator {
    fn properties(&self) -> &FontProperties {
        &self.properties
    }

    fn generate(&self) -> FontLoadResult<FontRef> {
        let info = self
            .db
            .face(self.id)
            .ok_or_else(|| FontLoadError::MissingFace(format!("{:?}", self.id)))?;
        let data = self.sources.data(&info.source)?;
        let font = TtfFont::from_shared(data, info.index)?.with_source_label(self.properties.label());
        Ok(FontRef::new(font))
    }
}

impl std::fmt::Debug for FaceGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceGenerator")
            .field("id", &self.id)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}

fn source_label(source: &Source) -> String {
    match source {
        Source::File(path) | Source::SharedFile(path, _) => path.display().to_string(),
        Source::Binary(_) => MEMORY_SOURCE.to_string(),
    }
}

/// Register a generator for every face of `db` with `selector`.
///
/// All generators share one [`FaceSources`], so the faces of a font
/// collection are loaded from a single copy of the file. Returns the
/// number of generators registered.
pub fn register_database(selector: &GlyphSelector, db: Arc<Database>) -> usize {
    let sources = Arc::new(FaceSources::new());
    let ids: Vec<ID> = db.faces().map(|face| face.id).collect();
    let mut count = 0;
    for id in ids {
        if let Some(generator) = FaceGenerator::with_sources(db.clone(), id, sources.clone()) {
            selector.add_font_generator(Arc::new(generator));
            count += 1;
        }
    }
    tracing::debug!(target: targets::DATABASE, generators = count, "registered font database");
    count
}

//! Outline fonts for PNG previews.
//!
//! PDF output references the standard Helvetica faces and needs no font
//! data. Raster previews draw real glyph outlines, resolved once per process
//! either from the system (feature `system-fonts`) or from an explicit file.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Raw font program plus the face index inside a collection.
#[derive(Clone)]
pub struct FontFace {
    data: Arc<Vec<u8>>,
    index: u32,
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("data_len", &self.data.len())
            .field("index", &self.index)
            .finish()
    }
}

impl FontFace {
    /// Validates that `data` parses as a font before accepting it.
    pub fn from_bytes(data: Vec<u8>, index: u32) -> Option<Self> {
        ttf_parser::Face::parse(&data, index).ok()?;
        Some(Self { data: Arc::new(data), index })
    }

    /// A parsed view over the font data. Parsing only reads table headers.
    pub fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, self.index).ok()
    }
}

/// Regular and bold faces for label text.
#[derive(Debug, Clone, Default)]
pub struct FontLibrary {
    regular: Option<FontFace>,
    bold: Option<FontFace>,
}

impl FontLibrary {
    /// A library without fonts. Text is skipped in raster output.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads one face file and uses it for both weights.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let data = std::fs::read(path)?;
        let face = FontFace::from_bytes(data, 0).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{} is not a usable font", path.display()),
            )
        })?;
        Ok(Self { regular: Some(face.clone()), bold: Some(face) })
    }

    /// Resolves Helvetica-compatible sans-serif faces installed on the system.
    #[cfg(feature = "system-fonts")]
    pub fn system() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        log::debug!("Loaded {} system font faces", db.len());

        let regular = query(&db, fontdb::Weight::NORMAL);
        let bold = query(&db, fontdb::Weight::BOLD).or_else(|| regular.clone());
        if regular.is_none() {
            log::warn!("No sans-serif system font found; PNG previews will omit text");
        }
        Self { regular, bold }
    }

    #[cfg(not(feature = "system-fonts"))]
    pub fn system() -> Self {
        log::warn!("Built without system-fonts; PNG previews will omit text");
        Self::empty()
    }

    pub fn face(&self, bold: bool) -> Option<&FontFace> {
        if bold { self.bold.as_ref().or(self.regular.as_ref()) } else { self.regular.as_ref() }
    }

    pub fn is_empty(&self) -> bool {
        self.regular.is_none() && self.bold.is_none()
    }
}

#[cfg(feature = "system-fonts")]
fn query(db: &fontdb::Database, weight: fontdb::Weight) -> Option<FontFace> {
    let query = fontdb::Query {
        families: &[
            fontdb::Family::Name("Helvetica"),
            fontdb::Family::Name("Arial"),
            fontdb::Family::Name("Liberation Sans"),
            fontdb::Family::Name("DejaVu Sans"),
            fontdb::Family::SansSerif,
        ],
        weight,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    };
    let id = db.query(&query)?;
    if let Some(info) = db.face(id) {
        log::debug!("Matched font {:?} for weight {}", info.families, weight.0);
    }
    db.with_face_data(id, |data, index| FontFace::from_bytes(data.to_vec(), index))
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_library_has_no_faces() {
        let fonts = FontLibrary::empty();
        assert!(fonts.is_empty());
        assert!(fonts.face(false).is_none());
        assert!(fonts.face(true).is_none());
    }

    #[test]
    fn test_rejects_non_font_data() {
        assert!(FontFace::from_bytes(b"not a font".to_vec(), 0).is_none());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"garbage").unwrap();
        assert!(FontLibrary::from_file(&path).is_err());
    }
}

//! Vector text for titles, algebra lines, and feedback strings.
//!
//! Text is rendered the same way the diagrams are: as triangle meshes.
//! - Discover system fonts via `fontdb` and resolve a face for a query.
//! - Extract glyph outlines with `ttf-parser` into `lyon` paths.
//! - Tessellate the outlines and merge them into one mesh per line.
//!
//! No shaping, no kerning, no bidi: a lesson line is digits, slashes, and a
//! few operators, so advance-based layout is enough.

pub mod layout;
pub mod tessellate;

use std::{fs, path::PathBuf, sync::Arc};

use fontdb::{Database, Family, Query, Source, Style, Weight};
use lyon::math::point;
use lyon::path::Path;

/// Errors produced by the text subsystem.
#[derive(thiserror::Error, Debug)]
pub enum TextError {
    #[error("no fonts found on this system")]
    NoFontsAvailable,

    #[error("failed to resolve a font face for families {0:?}")]
    ResolveFailed(Vec<String>),

    #[error("font face has no file-backed source")]
    NonFileBackedSource,

    #[error("failed to read font file from disk: {0}")]
    ReadFailed(String),

    #[error("failed to parse font face")]
    ParseFailed,

    #[error("glyph outline not found for glyph id {glyph_id}")]
    MissingGlyph { glyph_id: u16 },

    #[error("tessellation failed: {0}")]
    Tessellation(String),

    #[error("{0}")]
    Other(String),
}

/// Font selection: family names in priority order plus weight/style.
///
/// Generic names (`serif`, `sans-serif`, `monospace`) map to the fontdb
/// generic families.
#[derive(Debug, Clone)]
pub struct FontQuery {
    pub families: Vec<String>,
    pub weight: u16,
    pub italic: bool,
}

impl Default for FontQuery {
    fn default() -> Self {
        Self {
            families: vec!["DejaVu Sans".to_string(), "sans-serif".to_string()],
            weight: 400,
            italic: false,
        }
    }
}

/// Vertical metrics of a face, in font units (units-per-em).
#[derive(Debug, Copy, Clone)]
pub struct FaceMetrics {
    pub units_per_em: f32,
    pub ascender: f32,
    pub descender: f32,
}

/// A resolved face: the raw font bytes plus the index within the collection.
#[derive(Debug, Clone)]
pub struct ResolvedFace {
    pub bytes: Arc<[u8]>,
    pub index: u32,
    pub metrics: FaceMetrics,
}

impl ResolvedFace {
    /// Scale factor mapping font units to pt for a given font size.
    #[inline]
    pub fn units_to_pt(&self, font_size_pt: f32) -> f32 {
        font_size_pt / self.metrics.units_per_em
    }
}

/// Owns the font database and performs face resolution + outline extraction.
pub struct TextSystem {
    db: Database,
}

impl TextSystem {
    /// Load system fonts. Errors when the machine has none (e.g. a bare
    /// container); callers may then fall back to geometry-only scenes.
    pub fn new() -> Result<Self, TextError> {
        let mut db = Database::new();
        db.load_system_fonts();

        if db.faces().next().is_none() {
            return Err(TextError::NoFontsAvailable);
        }
        Ok(Self { db })
    }

    /// Resolve a query to a concrete face, falling back to the generic sans
    /// family and finally to any face at all.
    pub fn resolve(&self, query: &FontQuery) -> Result<ResolvedFace, TextError> {
        let style = if query.italic {
            Style::Italic
        } else {
            Style::Normal
        };
        let weight = Weight(query.weight.clamp(1, 1000));

        let mut families: Vec<Family<'_>> = Vec::new();
        for name in &query.families {
            let s = name.trim();
            if s.eq_ignore_ascii_case("serif") {
                families.push(Family::Serif);
            } else if s.eq_ignore_ascii_case("sans-serif") || s.eq_ignore_ascii_case("sans") {
                families.push(Family::SansSerif);
            } else if s.eq_ignore_ascii_case("monospace") || s.eq_ignore_ascii_case("mono") {
                families.push(Family::Monospace);
            } else if !s.is_empty() {
                families.push(Family::Name(s));
            }
        }

        let id = self
            .db
            .query(&Query {
                families: &families,
                weight,
                style,
                stretch: fontdb::Stretch::Normal,
            })
            .or_else(|| {
                self.db.query(&Query {
                    families: &[Family::SansSerif],
                    weight,
                    style,
                    stretch: fontdb::Stretch::Normal,
                })
            })
            .or_else(|| self.db.faces().next().map(|f| f.id))
            .ok_or_else(|| TextError::ResolveFailed(query.families.clone()))?;

        let face = self
            .db
            .face(id)
            .ok_or_else(|| TextError::ResolveFailed(query.families.clone()))?;

        let (path, index) = match &face.source {
            Source::File(p) => (p.to_path_buf(), face.index),
            _ => return Err(TextError::NonFileBackedSource),
        };
        let bytes = read_font_bytes(&path)?;

        let parsed = ttf_parser::Face::parse(&bytes, index).map_err(|_| TextError::ParseFailed)?;
        let metrics = FaceMetrics {
            units_per_em: parsed.units_per_em() as f32,
            ascender: parsed.ascender() as f32,
            descender: parsed.descender() as f32,
        };

        Ok(ResolvedFace {
            bytes,
            index,
            metrics,
        })
    }

    /// Glyph id for a Unicode codepoint, if the face covers it.
    pub fn glyph_id_for_char(&self, face: &ResolvedFace, ch: char) -> Result<u16, TextError> {
        let parsed =
            ttf_parser::Face::parse(&face.bytes, face.index).map_err(|_| TextError::ParseFailed)?;
        parsed
            .glyph_index(ch)
            .map(|gid| gid.0)
            .ok_or_else(|| TextError::Other(format!("no glyph for {ch:?}")))
    }

    /// Horizontal advance for a glyph, in font units.
    pub fn glyph_advance(&self, face: &ResolvedFace, glyph_id: u16) -> Result<f32, TextError> {
        let parsed =
            ttf_parser::Face::parse(&face.bytes, face.index).map_err(|_| TextError::ParseFailed)?;
        parsed
            .glyph_hor_advance(ttf_parser::GlyphId(glyph_id))
            .map(f32::from)
            .ok_or_else(|| TextError::Other(format!("no advance for glyph id {glyph_id}")))
    }

    /// Extract a glyph outline as a lyon path, in font units.
    ///
    /// Glyphs without an outline (spaces) report [`TextError::MissingGlyph`];
    /// layout still advances past them.
    pub fn glyph_outline(&self, face: &ResolvedFace, glyph_id: u16) -> Result<Path, TextError> {
        let parsed =
            ttf_parser::Face::parse(&face.bytes, face.index).map_err(|_| TextError::ParseFailed)?;

        let mut builder = OutlinePath::new();
        if parsed
            .outline_glyph(ttf_parser::GlyphId(glyph_id), &mut builder)
            .is_none()
        {
            return Err(TextError::MissingGlyph { glyph_id });
        }
        Ok(builder.build())
    }
}

fn read_font_bytes(path: &PathBuf) -> Result<Arc<[u8]>, TextError> {
    let data = fs::read(path).map_err(|_| TextError::ReadFailed(path.display().to_string()))?;
    Ok(Arc::<[u8]>::from(data))
}

/// Adapts `ttf-parser` outline callbacks into a `lyon::path::Path`.
///
/// A glyph may contain several contours; `move_to` starts a new one.
struct OutlinePath {
    builder: lyon::path::Builder,
    contour_open: bool,
}

impl OutlinePath {
    fn new() -> Self {
        Self {
            builder: Path::builder(),
            contour_open: false,
        }
    }

    fn build(mut self) -> Path {
        if self.contour_open {
            self.builder.close();
        }
        self.builder.build()
    }
}

impl ttf_parser::OutlineBuilder for OutlinePath {
    fn move_to(&mut self, x: f32, y: f32) {
        if self.contour_open {
            self.builder.close();
        }
        self.builder.begin(point(x, y));
        self.contour_open = true;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(point(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quadratic_bezier_to(point(x1, y1), point(x, y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder
            .cubic_bezier_to(point(x1, y1), point(x2, y2), point(x, y));
    }

    fn close(&mut self) {
        if self.contour_open {
            self.builder.close();
            self.contour_open = false;
        }
    }
}

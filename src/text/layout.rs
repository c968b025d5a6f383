//! Advance-based single-line layout: string -> merged mesh.
//!
//! The pen starts at x = 0 with the baseline at y = 0; each character places
//! its tessellated outline at the pen and advances. Characters the face does
//! not cover fall back to '?'. Glyphs with no outline (spaces) advance
//! without emitting geometry.

use crate::scene::Mesh2D;
use crate::text::tessellate::tessellate_glyph;
use crate::text::{FontQuery, TextError, TextSystem};

/// Options for [`layout_line`].
#[derive(Debug, Clone)]
pub struct TextOptions {
    pub font: FontQuery,
    /// Font size in pt.
    pub size_pt: f32,
    /// Tessellation tolerance in font-path units; smaller is smoother.
    pub tolerance: f32,
    /// Extra spacing added after each advance, in pt.
    pub letter_spacing_pt: f32,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            font: FontQuery::default(),
            size_pt: 20.0,
            tolerance: 0.02,
            letter_spacing_pt: 0.0,
        }
    }
}

/// A laid-out line: merged triangle mesh plus the total advance, which is
/// what callers use to center the line (`translate(-advance/2, y)`).
#[derive(Debug, Clone)]
pub struct TextMesh {
    pub mesh: Mesh2D,
    pub advance_width_pt: f32,
}

/// Lay out one line of text into a single mesh (baseline at y = 0, pt units).
pub fn layout_line(
    system: &TextSystem,
    text: &str,
    opts: &TextOptions,
) -> Result<TextMesh, TextError> {
    if opts.size_pt <= 0.0 {
        return Err(TextError::Other("font size must be > 0".to_string()));
    }

    let face = system.resolve(&opts.font)?;
    let scale = face.units_to_pt(opts.size_pt);

    let mut merged = Mesh2D::default();
    let mut pen_x = 0.0f32;

    for ch in text.chars() {
        // Coverage fallback: a missing codepoint renders as '?'.
        let glyph_id = match system.glyph_id_for_char(&face, ch) {
            Ok(id) => id,
            Err(_) => match system.glyph_id_for_char(&face, '?') {
                Ok(id) => id,
                Err(_) => continue,
            },
        };

        let advance = system.glyph_advance(&face, glyph_id)? * scale;

        match system.glyph_outline(&face, glyph_id) {
            Ok(outline) => {
                let glyph = tessellate_glyph(&outline, scale, pen_x, 0.0, opts.tolerance)?;
                merged.append(&glyph);
            }
            Err(TextError::MissingGlyph { .. }) => {}
            Err(e) => return Err(e),
        }

        pen_x += advance + opts.letter_spacing_pt;
    }

    Ok(TextMesh {
        mesh: merged,
        advance_width_pt: pen_x,
    })
}

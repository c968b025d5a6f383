//! Glyph outline tessellation: `lyon::path::Path` -> triangle mesh.

use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, FillVertexConstructor,
    VertexBuffers,
};

use crate::scene::Mesh2D;
use crate::text::TextError;

/// Builds output vertices by scaling font units to pt and translating to the
/// pen position.
struct PenVertex {
    scale: f32,
    pen_x: f32,
    pen_y: f32,
}

impl FillVertexConstructor<[f32; 2]> for PenVertex {
    fn new_vertex(&mut self, v: FillVertex) -> [f32; 2] {
        let p = v.position();
        [p.x * self.scale + self.pen_x, p.y * self.scale + self.pen_y]
    }
}

/// Tessellate one glyph outline into a mesh.
///
/// - `path`: outline in font units
/// - `scale`: font units -> pt
/// - `pen_x`/`pen_y`: baseline pen position in pt
///
/// Fonts are authored for non-zero winding; we use that fill rule and keep
/// the tessellator's defaults otherwise (outlines can self-intersect).
pub fn tessellate_glyph(
    path: &Path,
    scale: f32,
    pen_x: f32,
    pen_y: f32,
    tolerance: f32,
) -> Result<Mesh2D, TextError> {
    let mut tess = FillTessellator::new();
    let mut buffers: VertexBuffers<[f32; 2], u32> = VertexBuffers::new();

    let fill = FillOptions::tolerance(tolerance.max(0.0005)).with_fill_rule(FillRule::NonZero);
    let ctor = PenVertex {
        scale,
        pen_x,
        pen_y,
    };

    tess.tessellate_path(path, &fill, &mut BuffersBuilder::new(&mut buffers, ctor))
        .map_err(|e| TextError::Tessellation(format!("{e:?}")))?;

    Ok(Mesh2D {
        positions: buffers.vertices,
        indices: buffers.indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyon::math::point;

    fn square_path(size: f32) -> Path {
        let h = size * 0.5;
        let mut b = Path::builder();
        b.begin(point(-h, -h));
        b.line_to(point(h, -h));
        b.line_to(point(h, h));
        b.line_to(point(-h, h));
        b.close();
        b.build()
    }

    #[test]
    fn square_tessellates_and_lands_on_the_pen() {
        let mesh = tessellate_glyph(&square_path(2.0), 10.0, 100.0, 50.0, 0.02).unwrap();
        assert!(!mesh.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);

        let b = mesh.bounds();
        assert!((b.min[0] - 90.0).abs() < 1e-3);
        assert!((b.max[0] - 110.0).abs() < 1e-3);
        assert!((b.min[1] - 40.0).abs() < 1e-3);
        assert!((b.max[1] - 60.0).abs() < 1e-3);
    }
}

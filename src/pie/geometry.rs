//! Low-level mesh builders for the pie diagram.
//!
//! Angle convention matches the layout: degrees, 0 at the +x axis, counter-
//! clockwise, y-up. Arcs are flattened into line segments no wider than a
//! maximum angular step; strokes become quads (butt caps, no joins), which is
//! plenty at the stroke widths the diagram uses.

use crate::scene::Mesh2D;

/// Point on a circle of `radius` at `deg` degrees.
#[inline]
pub fn polar(radius: f32, deg: f32) -> [f32; 2] {
    let rad = deg.to_radians();
    [radius * rad.cos(), radius * rad.sin()]
}

/// Flatten the arc from `start_deg` to `end_deg` into points (both endpoints
/// included), stepping at most `max_step_deg` per segment.
pub fn arc_points(radius: f32, start_deg: f32, end_deg: f32, max_step_deg: f32) -> Vec<[f32; 2]> {
    let span = end_deg - start_deg;
    let step = max_step_deg.max(0.1);
    let segments = (span.abs() / step).ceil().max(1.0) as usize;

    (0..=segments)
        .map(|i| polar(radius, start_deg + span * (i as f32 / segments as f32)))
        .collect()
}

/// A filled circular sector as a triangle fan around the center.
pub fn wedge_fan_mesh(radius: f32, start_deg: f32, end_deg: f32, max_step_deg: f32) -> Mesh2D {
    let arc = arc_points(radius, start_deg, end_deg, max_step_deg);

    let mut mesh = Mesh2D::with_capacity(arc.len() + 1, (arc.len() - 1) * 3);
    mesh.positions.push([0.0, 0.0]);
    mesh.positions.extend_from_slice(&arc);

    for i in 1..arc.len() as u32 {
        mesh.indices.extend_from_slice(&[0, i, i + 1]);
    }
    mesh
}

/// A straight stroke from `a` to `b` as one quad of the given width.
pub fn segment_mesh(a: [f32; 2], b: [f32; 2], width: f32) -> Mesh2D {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f32::EPSILON {
        return Mesh2D::default();
    }

    // Half-width offset perpendicular to the segment.
    let hw = width * 0.5;
    let nx = -dy / len * hw;
    let ny = dx / len * hw;

    Mesh2D {
        positions: vec![
            [a[0] - nx, a[1] - ny],
            [b[0] - nx, b[1] - ny],
            [b[0] + nx, b[1] + ny],
            [a[0] + nx, a[1] + ny],
        ],
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

/// A dashed stroke from `a` to `b`: quads of length `dash_on` separated by
/// `dash_off` gaps. The final dash is truncated at `b`.
pub fn dashed_segment_mesh(
    a: [f32; 2],
    b: [f32; 2],
    width: f32,
    dash_on: f32,
    dash_off: f32,
) -> Mesh2D {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f32::EPSILON || dash_on <= 0.0 {
        return Mesh2D::default();
    }

    let ux = dx / len;
    let uy = dy / len;
    let period = dash_on + dash_off.max(0.0);

    let mut mesh = Mesh2D::default();
    let mut t = 0.0f32;
    while t < len {
        let t_end = (t + dash_on).min(len);
        let p0 = [a[0] + ux * t, a[1] + uy * t];
        let p1 = [a[0] + ux * t_end, a[1] + uy * t_end];
        mesh.append(&segment_mesh(p0, p1, width));
        t += period;
    }
    mesh
}

/// A closed circular outline at `radius` as an annulus of the given stroke
/// width, centered on the stroke.
pub fn ring_mesh(radius: f32, width: f32, max_step_deg: f32) -> Mesh2D {
    let step = max_step_deg.max(0.1);
    let segments = (360.0 / step).ceil().max(3.0) as u32;

    let inner = radius - width * 0.5;
    let outer = radius + width * 0.5;

    let mut mesh = Mesh2D::with_capacity(segments as usize * 2, segments as usize * 6);
    for i in 0..segments {
        let deg = 360.0 * (i as f32 / segments as f32);
        mesh.positions.push(polar(inner, deg));
        mesh.positions.push(polar(outer, deg));
    }

    for i in 0..segments {
        let j = (i + 1) % segments;
        let (in_i, out_i) = (i * 2, i * 2 + 1);
        let (in_j, out_j) = (j * 2, j * 2 + 1);
        mesh.indices
            .extend_from_slice(&[in_i, out_i, out_j, in_i, out_j, in_j]);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-4, "{a} != {b}");
    }

    #[test]
    fn arc_points_hit_both_endpoints() {
        let pts = arc_points(1.0, 0.0, 90.0, 6.0);
        assert_close(pts[0][0], 1.0);
        assert_close(pts[0][1], 0.0);
        assert_close(pts[pts.len() - 1][0], 0.0);
        assert_close(pts[pts.len() - 1][1], 1.0);
        // 90 degrees at <= 6 degrees per segment.
        assert_eq!(pts.len(), 16);
    }

    #[test]
    fn wedge_fan_is_a_fan_around_center() {
        let mesh = wedge_fan_mesh(1.0, 0.0, 60.0, 6.0);
        assert_eq!(mesh.positions[0], [0.0, 0.0]);
        // One triangle per arc segment, all anchored at vertex 0.
        assert_eq!(mesh.indices.len() % 3, 0);
        for tri in mesh.indices.chunks(3) {
            assert_eq!(tri[0], 0);
        }
        assert_eq!(mesh.indices.len() / 3, mesh.positions.len() - 2);
    }

    #[test]
    fn full_circle_wedge_closes() {
        let mesh = wedge_fan_mesh(1.0, 0.0, 360.0, 6.0);
        let first = mesh.positions[1];
        let last = mesh.positions[mesh.positions.len() - 1];
        assert_close(first[0], last[0]);
        assert_close(first[1], last[1]);
    }

    #[test]
    fn segment_mesh_is_one_quad() {
        let mesh = segment_mesh([0.0, 0.0], [10.0, 0.0], 2.0);
        assert_eq!(mesh.positions.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
        let b = mesh.bounds();
        assert_close(b.min[1], -1.0);
        assert_close(b.max[1], 1.0);
    }

    #[test]
    fn degenerate_segment_is_empty() {
        assert!(segment_mesh([1.0, 1.0], [1.0, 1.0], 2.0).is_empty());
    }

    #[test]
    fn dash_count_matches_period() {
        let mesh = dashed_segment_mesh([0.0, 0.0], [100.0, 0.0], 1.0, 6.0, 4.0);
        // 100 / (6 + 4) = 10 dashes, 4 vertices each.
        assert_eq!(mesh.positions.len(), 40);
        assert_eq!(mesh.indices.len(), 60);
    }

    #[test]
    fn ring_indices_stay_in_bounds_and_wrap() {
        let mesh = ring_mesh(100.0, 2.0, 6.0);
        let max = *mesh.indices.iter().max().unwrap();
        assert!((max as usize) < mesh.positions.len());
        // Two triangles per segment.
        assert_eq!(mesh.indices.len(), mesh.positions.len() * 3);
    }
}

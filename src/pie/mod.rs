//! Pie-chart rendering for one fraction.
//!
//! The diagram is the visual half of the lesson: a circle partitioned into
//! `denominator` wedges, the first `numerator` of them filled with the
//! highlight color, the rest in a washed-out neutral. When the user's
//! subdivision factor is above 1, dashed radial guides preview the finer
//! partition (`denominator * factor` lines) without re-wedging the pie.
//!
//! Split in two layers:
//! - [`PieLayout`]: pure angles + classification, cheap to test
//! - [`build_diagram`]: turns a layout into a scene subtree of meshes
//!
//! Both are deterministic functions of their inputs; the same fraction and
//! factor always produce identical geometry.

pub mod geometry;

use crate::arith::Fraction;
use crate::scene::{Mesh2D, Node2D, Rgba};

use geometry::{dashed_segment_mesh, polar, ring_mesh, segment_mesh, wedge_fan_mesh};

/// One angular slice of the pie.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Wedge {
    pub index: u32,
    pub start_deg: f32,
    pub end_deg: f32,
    pub highlighted: bool,
}

impl Wedge {
    #[inline]
    pub fn span_deg(&self) -> f32 {
        self.end_deg - self.start_deg
    }
}

/// Pure geometric layout of a fraction pie: wedge boundaries, wedge
/// classification, and the dashed guide angles for the subdivision factor.
#[derive(Debug, Clone, PartialEq)]
pub struct PieLayout {
    pub wedges: Vec<Wedge>,
    pub guide_angles_deg: Vec<f32>,
}

impl PieLayout {
    /// Partition the full circle into `denominator` equal wedges starting at
    /// angle 0, highlight the first `numerator` of them, and lay out
    /// `denominator * factor` guide angles when `factor > 1`.
    pub fn new(fraction: Fraction, subdivision_factor: u32) -> Self {
        let d = fraction.denominator();
        let n = fraction.numerator();

        let wedges = (0..d)
            .map(|i| Wedge {
                index: i,
                start_deg: i as f32 * 360.0 / d as f32,
                end_deg: (i + 1) as f32 * 360.0 / d as f32,
                highlighted: i < n,
            })
            .collect();

        // Guides only mark a *finer* partition than the wedges already show.
        let total = d * subdivision_factor;
        let guide_angles_deg = if total > d {
            (0..total).map(|i| i as f32 * 360.0 / total as f32).collect()
        } else {
            Vec::new()
        };

        Self {
            wedges,
            guide_angles_deg,
        }
    }

    #[inline]
    pub fn highlighted_count(&self) -> usize {
        self.wedges.iter().filter(|w| w.highlighted).count()
    }

    #[inline]
    pub fn neutral_count(&self) -> usize {
        self.wedges.len() - self.highlighted_count()
    }
}

/// Visual parameters for the diagram. Defaults mirror the reference figure:
/// highlight at alpha 0.8, lightgray neutral at alpha 0.4, black edges at
/// 1.5, dashed gray guides at 0.8, and an outer circle at 2.0.
#[derive(Debug, Clone)]
pub struct PieStyle {
    pub radius: f32,
    pub edge_width: f32,
    pub edge_color: Rgba,
    pub guide_width: f32,
    pub guide_color: Rgba,
    pub dash_on: f32,
    pub dash_off: f32,
    pub ring_width: f32,
    pub highlight_alpha: f32,
    pub neutral_fill: Rgba,
    pub max_arc_step_deg: f32,
}

impl Default for PieStyle {
    fn default() -> Self {
        Self {
            radius: 100.0,
            edge_width: 1.5,
            edge_color: Rgba::BLACK,
            guide_width: 0.8,
            guide_color: Rgba::GRAY,
            dash_on: 5.0,
            dash_off: 4.0,
            ring_width: 2.0,
            highlight_alpha: 0.8,
            neutral_fill: Rgba::LIGHT_GRAY.with_alpha(0.4),
            max_arc_step_deg: 4.0,
        }
    }
}

/// A renderable pie: the scene subtree plus the title attached for display.
///
/// Created fresh per render pass and discarded after display; it carries no
/// identity of its own.
#[derive(Debug, Clone)]
pub struct PieDiagram {
    pub root: Node2D,
    pub title: String,
}

/// Build the drawable diagram for a layout.
///
/// Draw order (painter's z): wedge fills, wedge separators, dashed guides,
/// then the outer circle. The outer circle is drawn regardless of the
/// numerator/denominator values so the figure always reads as a whole.
pub fn build_diagram(
    layout: &PieLayout,
    title: &str,
    highlight: Rgba,
    style: &PieStyle,
) -> PieDiagram {
    let mut root = Node2D::new("pie");

    for wedge in &layout.wedges {
        let fill = if wedge.highlighted {
            highlight.with_alpha(style.highlight_alpha)
        } else {
            style.neutral_fill
        };
        root.add_child(
            Node2D::new(format!("wedge{}", wedge.index))
                .with_mesh(wedge_fan_mesh(
                    style.radius,
                    wedge.start_deg,
                    wedge.end_deg,
                    style.max_arc_step_deg,
                ))
                .with_fill(fill)
                .with_z(0),
        );
    }

    // Radial separators at each wedge boundary.
    let mut separators = Mesh2D::default();
    for wedge in &layout.wedges {
        separators.append(&segment_mesh(
            [0.0, 0.0],
            polar(style.radius, wedge.start_deg),
            style.edge_width,
        ));
    }
    root.add_child(
        Node2D::new("separators")
            .with_mesh(separators)
            .with_fill(style.edge_color)
            .with_z(1),
    );

    if !layout.guide_angles_deg.is_empty() {
        let mut guides = Mesh2D::default();
        for &deg in &layout.guide_angles_deg {
            guides.append(&dashed_segment_mesh(
                [0.0, 0.0],
                polar(style.radius, deg),
                style.guide_width,
                style.dash_on,
                style.dash_off,
            ));
        }
        root.add_child(
            Node2D::new("guides")
                .with_mesh(guides)
                .with_fill(style.guide_color)
                .with_z(2),
        );
    }

    root.add_child(
        Node2D::new("ring")
            .with_mesh(ring_mesh(
                style.radius,
                style.ring_width,
                style.max_arc_step_deg,
            ))
            .with_fill(style.edge_color)
            .with_z(3),
    );

    PieDiagram {
        root,
        title: title.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(n: u32, d: u32) -> Fraction {
        Fraction::new(n, d).unwrap()
    }

    #[test]
    fn one_sixth_layout() {
        let layout = PieLayout::new(frac(1, 6), 1);
        assert_eq!(layout.wedges.len(), 6);
        assert_eq!(layout.highlighted_count(), 1);
        assert_eq!(layout.neutral_count(), 5);

        let first = layout.wedges[0];
        assert!(first.highlighted);
        assert_eq!(first.start_deg, 0.0);
        assert!((first.span_deg() - 60.0).abs() < 1e-4);
    }

    #[test]
    fn wedges_are_monotone_and_cover_the_circle() {
        let layout = PieLayout::new(frac(2, 7), 1);
        for pair in layout.wedges.windows(2) {
            assert!((pair[0].end_deg - pair[1].start_deg).abs() < 1e-4);
            assert!(pair[0].start_deg < pair[1].start_deg);
        }
        assert_eq!(layout.wedges[0].start_deg, 0.0);
        assert!((layout.wedges.last().unwrap().end_deg - 360.0).abs() < 1e-4);
    }

    #[test]
    fn factor_three_on_sixths_gives_eighteen_guides() {
        let layout = PieLayout::new(frac(2, 6), 3);
        assert_eq!(layout.guide_angles_deg.len(), 18);
        // Evenly spaced, starting at 0.
        assert_eq!(layout.guide_angles_deg[0], 0.0);
        assert!((layout.guide_angles_deg[1] - 20.0).abs() < 1e-4);
    }

    #[test]
    fn factor_one_draws_no_guides() {
        let layout = PieLayout::new(frac(2, 6), 1);
        assert!(layout.guide_angles_deg.is_empty());
    }

    #[test]
    fn layout_is_deterministic() {
        let a = PieLayout::new(frac(3, 8), 2);
        let b = PieLayout::new(frac(3, 8), 2);
        assert_eq!(a, b);
    }

    #[test]
    fn zero_numerator_is_fully_neutral() {
        let layout = PieLayout::new(frac(0, 5), 1);
        assert_eq!(layout.highlighted_count(), 0);
        assert_eq!(layout.neutral_count(), 5);
    }

    #[test]
    fn full_numerator_is_fully_highlighted() {
        let layout = PieLayout::new(frac(5, 5), 1);
        assert_eq!(layout.highlighted_count(), 5);
        assert_eq!(layout.neutral_count(), 0);
    }

    #[test]
    fn diagram_subtree_structure() {
        let style = PieStyle::default();
        let layout = PieLayout::new(frac(2, 6), 3);
        let diagram = build_diagram(&layout, "2/6", Rgba::MEDIUM_SEA_GREEN, &style);

        assert_eq!(diagram.title, "2/6");
        // 6 wedges + separators + guides + ring.
        assert_eq!(diagram.root.children.len(), 9);

        let highlighted = diagram
            .root
            .children
            .iter()
            .filter(|c| c.fill == Rgba::MEDIUM_SEA_GREEN.with_alpha(style.highlight_alpha))
            .count();
        assert_eq!(highlighted, 2);
    }

    #[test]
    fn diagram_without_guides_skips_the_node() {
        let style = PieStyle::default();
        let layout = PieLayout::new(frac(1, 4), 1);
        let diagram = build_diagram(&layout, "1/4", Rgba::CORNFLOWER_BLUE, &style);
        // 4 wedges + separators + ring; no guides node.
        assert_eq!(diagram.root.children.len(), 6);
        assert!(diagram.root.children.iter().all(|c| c.name != "guides"));
    }

    #[test]
    fn identical_inputs_build_identical_geometry() {
        let style = PieStyle::default();
        let layout = PieLayout::new(frac(3, 8), 2);
        let a = build_diagram(&layout, "3/8", Rgba::SALMON, &style);
        let b = build_diagram(&layout, "3/8", Rgba::SALMON, &style);

        for (ca, cb) in a.root.children.iter().zip(&b.root.children) {
            assert_eq!(ca.mesh, cb.mesh);
            assert_eq!(ca.fill, cb.fill);
        }
    }
}

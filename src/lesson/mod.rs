//! Lesson state: the glue between raw inputs and the rendered screen.
//!
//! The hosting layer (keyboard handling, or any embedding app) owns six
//! integers: two denominators, two numerators, and two trial factors. This
//! module clamps them at the boundary, derives the full visible state as a
//! pure function of those inputs, and assembles the `Scene2D` the renderer
//! draws. Nothing is cached between interactions; every change rebuilds the
//! lesson and its scene from scratch.

use crate::arith::{CommonDenominator, Fraction, reduced_sum};
use crate::pie::{PieLayout, PieStyle, build_diagram};
use crate::scene::{Affine2, Node2D, Rgba, Scene2D};
use crate::text::layout::{TextOptions, layout_line};
use crate::text::{TextError, TextSystem};

/// Raw lesson inputs, range-clamped on construction:
/// denominators and factors in [1, 20], numerators in [0, denominator].
///
/// The core arithmetic and rendering modules rely on these invariants, so
/// fields are read-only; adjustments go back through [`LessonInput::clamped`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LessonInput {
    d1: u32,
    d2: u32,
    n1: u32,
    n2: u32,
    factor1: u32,
    factor2: u32,
}

impl Default for LessonInput {
    /// The reference configuration: 1/6 + 1/9, both trial factors at 1.
    fn default() -> Self {
        Self {
            d1: 6,
            d2: 9,
            n1: 1,
            n2: 1,
            factor1: 1,
            factor2: 1,
        }
    }
}

impl LessonInput {
    pub const DENOM_MIN: u32 = 1;
    pub const DENOM_MAX: u32 = 20;
    pub const FACTOR_MIN: u32 = 1;
    pub const FACTOR_MAX: u32 = 20;

    /// Clamp all six inputs into their valid ranges. Numerator bounds depend
    /// on the (already clamped) denominators.
    pub fn clamped(d1: u32, d2: u32, n1: u32, n2: u32, factor1: u32, factor2: u32) -> Self {
        let d1 = d1.clamp(Self::DENOM_MIN, Self::DENOM_MAX);
        let d2 = d2.clamp(Self::DENOM_MIN, Self::DENOM_MAX);
        Self {
            d1,
            d2,
            n1: n1.min(d1),
            n2: n2.min(d2),
            factor1: factor1.clamp(Self::FACTOR_MIN, Self::FACTOR_MAX),
            factor2: factor2.clamp(Self::FACTOR_MIN, Self::FACTOR_MAX),
        }
    }

    pub fn d1(&self) -> u32 {
        self.d1
    }
    pub fn d2(&self) -> u32 {
        self.d2
    }
    pub fn n1(&self) -> u32 {
        self.n1
    }
    pub fn n2(&self) -> u32 {
        self.n2
    }
    pub fn factor1(&self) -> u32 {
        self.factor1
    }
    pub fn factor2(&self) -> u32 {
        self.factor2
    }
}

/// One fraction's derived state: the fraction, its trial and correct
/// factors, the scaled equivalent, and the colors/flags the screen shows.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonSide {
    pub fraction: Fraction,
    pub trial_factor: u32,
    pub correct_factor: u32,
    pub scaled: Fraction,
    pub factor_correct: bool,
    pub highlight: Rgba,
}

impl LessonSide {
    /// Diagram title, e.g. `3/6`.
    pub fn title(&self) -> String {
        self.fraction.to_string()
    }

    /// The scaling step, e.g. `3/6 × 3/3 = 9/18`.
    pub fn algebra_line(&self) -> String {
        format!(
            "{} × {}/{} = {}",
            self.fraction, self.trial_factor, self.trial_factor, self.scaled
        )
    }
}

/// What the sum area shows: the worked sum once both factors are right,
/// otherwise the prompt to fix them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SumFeedback {
    Sum {
        addend1: u32,
        addend2: u32,
        common: u32,
        reduced_numerator: u32,
        reduced_denominator: u32,
    },
    AwaitingFactors,
}

impl SumFeedback {
    pub fn display_line(&self) -> String {
        match *self {
            SumFeedback::Sum {
                addend1,
                addend2,
                common,
                reduced_numerator,
                reduced_denominator,
            } => {
                let total = addend1 + addend2;
                let mut line =
                    format!("{addend1}/{common} + {addend2}/{common} = {total}/{common}");
                if (total, common) != (reduced_numerator, reduced_denominator) {
                    line.push_str(&format!(" = {reduced_numerator}/{reduced_denominator}"));
                }
                line
            }
            SumFeedback::AwaitingFactors => {
                "Enter the correct factor on both fractions to see the sum.".to_string()
            }
        }
    }
}

/// The full visible state, derived deterministically from a [`LessonInput`].
#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    pub input: LessonInput,
    pub common: CommonDenominator,
    pub sides: [LessonSide; 2],
    pub feedback: SumFeedback,
}

impl Lesson {
    pub fn new(input: LessonInput) -> Self {
        let common = CommonDenominator::of_clamped(input.d1, input.d2);

        // Highlight switches to green as soon as any part is selected on
        // either pie; before that each side keeps its own idle color.
        let any_selected = input.n1 > 0 || input.n2 > 0;
        let idle = [Rgba::CORNFLOWER_BLUE, Rgba::SALMON];

        let make_side = |n: u32, d: u32, trial: u32, correct: u32, idle: Rgba| {
            let fraction = Fraction::from_clamped(n, d);
            LessonSide {
                fraction,
                trial_factor: trial,
                correct_factor: correct,
                scaled: fraction.scaled(trial),
                factor_correct: trial == correct && d * trial == common.lcm,
                highlight: if any_selected {
                    Rgba::MEDIUM_SEA_GREEN
                } else {
                    idle
                },
            }
        };

        let sides = [
            make_side(input.n1, input.d1, input.factor1, common.factor1, idle[0]),
            make_side(input.n2, input.d2, input.factor2, common.factor2, idle[1]),
        ];

        let feedback = if sides.iter().all(|s| s.factor_correct) {
            let addend1 = sides[0].scaled.numerator();
            let addend2 = sides[1].scaled.numerator();
            let (reduced_numerator, reduced_denominator) =
                reduced_sum(addend1, addend2, common.lcm);
            SumFeedback::Sum {
                addend1,
                addend2,
                common: common.lcm,
                reduced_numerator,
                reduced_denominator,
            }
        } else {
            SumFeedback::AwaitingFactors
        };

        Self {
            input,
            common,
            sides,
            feedback,
        }
    }

    /// Confirmation shown under a side once its factor is right.
    pub fn success_line(&self, side: usize) -> Option<String> {
        self.sides[side].factor_correct.then(|| {
            format!(
                "Correct factor! The common denominator is {}.",
                self.common.lcm
            )
        })
    }

    /// Build the geometry-only scene: two pies side by side.
    ///
    /// Text (titles, algebra lines, feedback) is added by
    /// [`Lesson::build_scene_with_text`]; this variant exists so the lesson
    /// stays usable where no fonts are installed.
    pub fn build_scene(&self, style: &PieStyle) -> Scene2D {
        let mut scene = Scene2D::new();
        let dx = style.radius * 1.55;

        for (i, side) in self.sides.iter().enumerate() {
            let layout = PieLayout::new(side.fraction, side.trial_factor);
            let diagram = build_diagram(&layout, &side.title(), side.highlight, style);

            let x = if i == 0 { -dx } else { dx };
            let mut root = diagram.root;
            root.name = format!("pie{}", i + 1);
            root.local_from_parent = Affine2::translate(x, 0.0);
            scene.add_root(root);
        }

        scene
    }

    /// Build the full scene: pies plus titles, algebra lines, per-side
    /// confirmations, and the sum/prompt line.
    pub fn build_scene_with_text(
        &self,
        text: &TextSystem,
        style: &PieStyle,
    ) -> Result<Scene2D, TextError> {
        let mut scene = self.build_scene(style);

        let r = style.radius;
        let dx = r * 1.55;

        let title_opts = TextOptions {
            size_pt: 0.24 * r,
            ..Default::default()
        };
        let line_opts = TextOptions {
            size_pt: 0.15 * r,
            ..Default::default()
        };
        let note_opts = TextOptions {
            size_pt: 0.12 * r,
            ..Default::default()
        };

        for (i, side) in self.sides.iter().enumerate() {
            let x = if i == 0 { -dx } else { dx };

            scene.add_root(centered_line(
                text,
                &format!("title{}", i + 1),
                &side.title(),
                &title_opts,
                [x, r * 1.25],
                Rgba::BLACK,
            )?);

            scene.add_root(centered_line(
                text,
                &format!("algebra{}", i + 1),
                &side.algebra_line(),
                &line_opts,
                [x, -r * 1.45],
                Rgba::BLACK,
            )?);

            if let Some(line) = self.success_line(i) {
                scene.add_root(centered_line(
                    text,
                    &format!("success{}", i + 1),
                    &line,
                    &note_opts,
                    [x, -r * 1.75],
                    Rgba::MEDIUM_SEA_GREEN,
                )?);
            }
        }

        let (feedback_color, feedback_opts) = match self.feedback {
            SumFeedback::Sum { .. } => (Rgba::BLACK, &line_opts),
            SumFeedback::AwaitingFactors => (Rgba::GRAY, &note_opts),
        };
        scene.add_root(centered_line(
            text,
            "feedback",
            &self.feedback.display_line(),
            feedback_opts,
            [0.0, -r * 2.15],
            feedback_color,
        )?);

        Ok(scene)
    }
}

/// Lay out one line and wrap it in a node centered at `center` (x centered
/// on the advance width, y used as the baseline).
fn centered_line(
    text: &TextSystem,
    name: &str,
    s: &str,
    opts: &TextOptions,
    center: [f32; 2],
    fill: Rgba,
) -> Result<Node2D, TextError> {
    let line = layout_line(text, s, opts)?;
    Ok(Node2D::new(name)
        .with_mesh(line.mesh)
        .with_fill(fill)
        .with_z(10)
        .with_transform(Affine2::translate(
            center[0] - line.advance_width_pt * 0.5,
            center[1],
        )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_input_matches_reference() {
        let input = LessonInput::default();
        assert_eq!(input.d1(), 6);
        assert_eq!(input.d2(), 9);
        assert_eq!(input.n1(), 1);
        assert_eq!(input.n2(), 1);
        assert_eq!(input.factor1(), 1);
        assert_eq!(input.factor2(), 1);
    }

    #[test]
    fn inputs_are_clamped_at_the_boundary() {
        let input = LessonInput::clamped(0, 25, 10, 99, 0, 99);
        assert_eq!(input.d1(), 1);
        assert_eq!(input.d2(), 20);
        assert_eq!(input.n1(), 1);
        assert_eq!(input.n2(), 20);
        assert_eq!(input.factor1(), 1);
        assert_eq!(input.factor2(), 20);
    }

    #[test]
    fn correct_factors_for_sixths_and_ninths() {
        let lesson = Lesson::new(LessonInput::default());
        assert_eq!(lesson.common.lcm, 18);
        assert_eq!(lesson.sides[0].correct_factor, 3);
        assert_eq!(lesson.sides[1].correct_factor, 2);
        assert!(!lesson.sides[0].factor_correct);
        assert_eq!(lesson.feedback, SumFeedback::AwaitingFactors);
        assert_eq!(lesson.success_line(0), None);
    }

    #[test]
    fn sum_is_gated_on_both_factors() {
        // Only one side correct: still waiting.
        let half = Lesson::new(LessonInput::clamped(6, 9, 1, 1, 3, 1));
        assert!(half.sides[0].factor_correct);
        assert!(!half.sides[1].factor_correct);
        assert_eq!(half.feedback, SumFeedback::AwaitingFactors);

        let done = Lesson::new(LessonInput::clamped(6, 9, 1, 1, 3, 2));
        assert_eq!(
            done.feedback,
            SumFeedback::Sum {
                addend1: 3,
                addend2: 2,
                common: 18,
                reduced_numerator: 5,
                reduced_denominator: 18,
            }
        );
        assert_eq!(done.feedback.display_line(), "3/18 + 2/18 = 5/18");
        assert_eq!(
            done.success_line(0).as_deref(),
            Some("Correct factor! The common denominator is 18.")
        );
    }

    #[test]
    fn reducible_sum_appends_lowest_terms() {
        let lesson = Lesson::new(LessonInput::clamped(6, 9, 3, 3, 3, 2));
        assert_eq!(
            lesson.feedback.display_line(),
            "9/18 + 6/18 = 15/18 = 5/6"
        );
    }

    #[test]
    fn algebra_line_spells_out_the_scaling() {
        let lesson = Lesson::new(LessonInput::clamped(6, 9, 3, 1, 3, 1));
        assert_eq!(lesson.sides[0].algebra_line(), "3/6 × 3/3 = 9/18");
    }

    #[test]
    fn highlight_colors_follow_selection() {
        let idle = Lesson::new(LessonInput::clamped(6, 9, 0, 0, 1, 1));
        assert_eq!(idle.sides[0].highlight, Rgba::CORNFLOWER_BLUE);
        assert_eq!(idle.sides[1].highlight, Rgba::SALMON);

        // Selecting on either side turns both green.
        let picked = Lesson::new(LessonInput::clamped(6, 9, 1, 0, 1, 1));
        assert_eq!(picked.sides[0].highlight, Rgba::MEDIUM_SEA_GREEN);
        assert_eq!(picked.sides[1].highlight, Rgba::MEDIUM_SEA_GREEN);
    }

    #[test]
    fn scene_places_two_pies_apart() {
        let lesson = Lesson::new(LessonInput::default());
        let scene = lesson.build_scene(&PieStyle::default());

        assert_eq!(scene.roots.len(), 2);
        let p1 = scene.get("pie1").unwrap();
        let p2 = scene.get("pie2").unwrap();
        assert!(p1.local_from_parent.m[2][0] < 0.0);
        assert!(p2.local_from_parent.m[2][0] > 0.0);
        // 6 wedges + separators + ring on the left pie (factor 1: no guides).
        assert_eq!(p1.children.len(), 8);

        let b = scene.bounds();
        assert!(!b.is_empty());
        assert!(b.size()[0] > 2.0 * PieStyle::default().radius);
    }
}

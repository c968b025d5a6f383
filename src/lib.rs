//! `fracpie` library crate root.
//!
//! An interactive visualizer for adding fractions via common denominators:
//! two pie charts show the fractions and the finer subdivision implied by
//! the user's scaling factors; the algebra and the reduced sum appear once
//! both factors are right.
//!
//! This crate is intended to be used primarily as a **library**; the binary
//! target stays thin and calls into these entrypoints. The pure layers
//! (`arith`, `pie`, `lesson`, `scene`) carry the semantics and are usable
//! without a window; `render` and `text` add the wgpu/winit front end and
//! vector-text captions.

pub mod arith;
pub mod lesson;
pub mod pie;
pub mod render;
pub mod scene;
pub mod text;

pub use lesson::{Lesson, LessonInput, SumFeedback};

/// Run the interactive lesson app (default config).
///
/// This does **not** initialize logging; callers decide their own setup.
pub fn run_app() -> anyhow::Result<()> {
    render::app::run()
}

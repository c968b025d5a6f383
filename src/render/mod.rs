//! Rendering module root: window/event-loop integration and the GPU
//! renderer for the lesson scene.
//!
//! Entrypoint: `render::app::run()`.

pub mod app;

/// wgpu device/surface wrapper shared by the renderer and the app.
pub mod gpu;

/// Batched per-vertex-color renderer for scene draw items.
pub mod mesh_renderer;

//! App entrypoint: winit lifecycle plus the interactive lesson state.
//!
//! The runner is generic over a state type `S: AppState` so alternative
//! front ends can reuse the event-loop boilerplate; the library ships one
//! state, [`LessonApp`], which maps keyboard input onto lesson-input
//! adjustments and rebuilds the scene on every change (the explicit
//! recompute-per-interaction cycle; there is no retained UI state).
//!
//! Keys:
//! - Tab          switch the active fraction
//! - Up / Down    numerator of the active fraction
//! - Left / Right trial factor of the active fraction
//! - [ / ]        denominator of the active fraction
//! - R            reset to the 1/6 + 1/9 starting point
//! - Escape       quit

use std::{future::Future, pin::Pin, sync::Arc};

use anyhow::Context as _;
use log::{info, warn};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::lesson::{Lesson, LessonInput};
use crate::pie::PieStyle;
use crate::render::gpu::Gpu;
use crate::render::mesh_renderer::SceneRenderer;
use crate::scene::Scene2D;
use crate::text::TextSystem;

/// Configuration for the event loop.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    /// `Wait` by default: the app only redraws on interaction.
    pub control_flow: ControlFlow,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "fracpie".to_string(),
            control_flow: ControlFlow::Wait,
        }
    }
}

/// What a state must implement to be driven by the runner.
pub trait AppState: 'static {
    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>);
    fn render(&mut self) -> anyhow::Result<()>;
    fn handle_key(&mut self, event: &KeyEvent);
    fn request_redraw(&self);
}

/// Run the lesson app with defaults.
pub fn run() -> anyhow::Result<()> {
    run_with_config(AppConfig::default())
}

/// Run the lesson app with an explicit configuration.
pub fn run_with_config(config: AppConfig) -> anyhow::Result<()> {
    run_with_builder::<LessonApp, _, _>(config, |window| async move {
        LessonApp::new(window).await
    })
}

/// Run the event loop with an injected async state builder.
///
/// The builder is called once after the window exists and is driven on the
/// current thread with `pollster::block_on`.
pub fn run_with_builder<S, B, Fut>(config: AppConfig, builder: B) -> anyhow::Result<()>
where
    S: AppState,
    B: FnOnce(Arc<Window>) -> Fut + 'static,
    Fut: Future<Output = anyhow::Result<S>> + 'static,
{
    let event_loop = EventLoop::new().context("winit: failed to create EventLoop")?;
    event_loop.set_control_flow(config.control_flow);

    let mut app = App::<S>::new_with_builder(config, builder);
    event_loop
        .run_app(&mut app)
        .context("winit: run_app failed")?;

    Ok(())
}

/// Type-erased async state builder (pinned so pollster can drive it).
type BoxedStateBuilder<S> = Box<
    dyn FnOnce(Arc<Window>) -> Pin<Box<dyn Future<Output = anyhow::Result<S>> + 'static>> + 'static,
>;

struct App<S: AppState> {
    config: AppConfig,
    builder: Option<BoxedStateBuilder<S>>,
    state: Option<S>,
    exiting: bool,
}

impl<S: AppState> App<S> {
    fn new_with_builder<B, Fut>(config: AppConfig, builder: B) -> Self
    where
        B: FnOnce(Arc<Window>) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<S>> + 'static,
    {
        Self {
            config,
            builder: Some(Box::new(|window| Box::pin(builder(window)))),
            state: None,
            exiting: false,
        }
    }
}

impl<S: AppState> ApplicationHandler for App<S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window = Arc::new(
            event_loop
                .create_window(WindowAttributes::default().with_title(self.config.title.as_str()))
                .expect("winit: failed to create window"),
        );

        let builder = self
            .builder
            .take()
            .expect("app state builder can only be consumed once");
        let state = pollster::block_on(builder(window)).expect("failed to initialize app state");
        self.state = Some(state);

        self.state.as_ref().unwrap().request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                info!("close requested; exiting");
                self.exiting = true;
                self.state = None;
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if self.exiting {
                    return;
                }
                state.resize(size);
                state.request_redraw();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if self.exiting {
                    return;
                }
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape)
                {
                    self.exiting = true;
                    self.state = None;
                    event_loop.exit();
                    return;
                }
                state.handle_key(&event);
            }
            WindowEvent::RedrawRequested => {
                if self.exiting {
                    return;
                }
                if let Err(err) = state.render() {
                    info!("render error: {:#}", err);
                }
            }
            _ => {}
        }
    }
}

/// Which of the active fraction's numbers a key adjusts.
#[derive(Debug, Copy, Clone)]
enum Adjust {
    Numerator(i32),
    Factor(i32),
    Denominator(i32),
}

/// The interactive lesson: keyboard in, two pies and their captions out.
pub struct LessonApp {
    window: Arc<Window>,
    gpu: Gpu,
    renderer: SceneRenderer,
    /// `None` when no system fonts were found; the scene then carries the
    /// pies without captions.
    text: Option<TextSystem>,

    input: LessonInput,
    /// 0 = left fraction, 1 = right fraction.
    active: usize,
    style: PieStyle,
    scene: Scene2D,
}

impl LessonApp {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let gpu = Gpu::new(window.clone()).await?;
        let renderer = SceneRenderer::new(&gpu)?;

        let text = match TextSystem::new() {
            Ok(t) => Some(t),
            Err(e) => {
                warn!("captions disabled: {e}");
                None
            }
        };

        let mut app = Self {
            window,
            gpu,
            renderer,
            text,
            input: LessonInput::default(),
            active: 0,
            style: PieStyle::default(),
            scene: Scene2D::new(),
        };
        app.rebuild_scene();
        Ok(app)
    }

    /// Recompute the lesson from the current inputs and rebuild the scene.
    fn rebuild_scene(&mut self) {
        let lesson = Lesson::new(self.input);

        let mut scene = match &self.text {
            Some(text) => match lesson.build_scene_with_text(text, &self.style) {
                Ok(scene) => scene,
                Err(e) => {
                    warn!("caption layout failed, drawing pies only: {e}");
                    lesson.build_scene(&self.style)
                }
            },
            None => lesson.build_scene(&self.style),
        };

        scene
            .camera
            .set_viewport_px(self.gpu.size.width, self.gpu.size.height);
        let bounds = scene.bounds();
        scene.camera.frame_bounds(bounds, 24.0, 0.92);

        for side in &lesson.sides {
            info!("{}", side.algebra_line());
        }
        info!("{}", lesson.feedback.display_line());

        self.scene = scene;
    }

    fn apply(&mut self, adjust: Adjust) {
        let (mut d1, mut d2) = (self.input.d1(), self.input.d2());
        let (mut n1, mut n2) = (self.input.n1(), self.input.n2());
        let (mut f1, mut f2) = (self.input.factor1(), self.input.factor2());

        let bump = |v: u32, delta: i32| v.saturating_add_signed(delta);
        match (adjust, self.active) {
            (Adjust::Numerator(delta), 0) => n1 = bump(n1, delta),
            (Adjust::Numerator(delta), _) => n2 = bump(n2, delta),
            (Adjust::Factor(delta), 0) => f1 = bump(f1, delta),
            (Adjust::Factor(delta), _) => f2 = bump(f2, delta),
            (Adjust::Denominator(delta), 0) => d1 = bump(d1, delta),
            (Adjust::Denominator(delta), _) => d2 = bump(d2, delta),
        }

        let next = LessonInput::clamped(d1, d2, n1, n2, f1, f2);
        if next != self.input {
            self.input = next;
            self.rebuild_scene();
        }
    }
}

impl AppState for LessonApp {
    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.gpu.resize(new_size);

        // Reframe for the new aspect; geometry is unchanged.
        self.scene
            .camera
            .set_viewport_px(new_size.width, new_size.height);
        let bounds = self.scene.bounds();
        self.scene.camera.frame_bounds(bounds, 24.0, 0.92);
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }

        match &event.logical_key {
            Key::Named(NamedKey::Tab) => {
                self.active ^= 1;
                info!("active fraction: {}", self.active + 1);
            }
            Key::Named(NamedKey::ArrowUp) => self.apply(Adjust::Numerator(1)),
            Key::Named(NamedKey::ArrowDown) => self.apply(Adjust::Numerator(-1)),
            Key::Named(NamedKey::ArrowRight) => self.apply(Adjust::Factor(1)),
            Key::Named(NamedKey::ArrowLeft) => self.apply(Adjust::Factor(-1)),
            Key::Character(c) if c.as_str() == "]" => self.apply(Adjust::Denominator(1)),
            Key::Character(c) if c.as_str() == "[" => self.apply(Adjust::Denominator(-1)),
            Key::Character(c) if c.eq_ignore_ascii_case("r") => {
                self.input = LessonInput::default();
                self.active = 0;
                self.rebuild_scene();
            }
            _ => return,
        }

        self.request_redraw();
    }

    fn render(&mut self) -> anyhow::Result<()> {
        let (surface_texture, view) = match self.gpu.acquire_frame() {
            Ok(v) => v,
            Err(wgpu::SurfaceError::Outdated) | Err(wgpu::SurfaceError::Lost) => {
                self.gpu.resize(self.gpu.size);
                self.request_redraw();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                self.request_redraw();
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(anyhow::anyhow!("wgpu SurfaceError::OutOfMemory"));
            }
            Err(wgpu::SurfaceError::Other) => {
                self.gpu.resize(self.gpu.size);
                self.request_redraw();
                return Ok(());
            }
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Lesson Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Lesson Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        // Paper-white background, matching the figure the
                        // diagram colors were picked for.
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.97,
                            g: 0.97,
                            b: 0.98,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.renderer.draw_scene(&self.gpu, &mut pass, &self.scene)?;
        }

        self.gpu.queue.submit(Some(encoder.finish()));
        self.window.pre_present_notify();
        surface_texture.present();

        Ok(())
    }

    fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

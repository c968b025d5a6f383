//! Minimal GPU context wrapper.
//!
//! Owns the wgpu instance/adapter/device/queue plus the window surface and
//! its configuration. The renderer and the app share this foundation.

use std::sync::Arc;

use anyhow::Context as _;
use winit::window::Window;

pub struct Gpu {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,

    /// Tied to the window; the app state keeps the window alive.
    pub surface: wgpu::Surface<'static>,
    pub surface_format: wgpu::TextureFormat,

    pub size: winit::dpi::PhysicalSize<u32>,
    pub config: wgpu::SurfaceConfiguration,
}

impl Gpu {
    /// Create a GPU context for the given window and configure the surface.
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: None,
                ..Default::default()
            })
            .await
            .context("wgpu: failed to request adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .context("wgpu: failed to request device")?;

        let size = window.inner_size();

        let surface = instance
            .create_surface(window)
            .context("wgpu: failed to create surface")?;

        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .first()
            .copied()
            .context("wgpu: surface reported no supported formats")?;

        let config = Self::make_surface_config(size, surface_format);
        surface.configure(&device, &config);

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
            surface,
            surface_format,
            size,
            config,
        })
    }

    /// Reconfigure the surface for a new size (call on `WindowEvent::Resized`).
    ///
    /// Zero-sized surfaces are skipped; winit reports 0 while minimized.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            self.size = new_size;
            self.config.width = 0;
            self.config.height = 0;
            return;
        }

        self.size = new_size;
        self.config = Self::make_surface_config(new_size, self.surface_format);
        self.surface.configure(&self.device, &self.config);
    }

    /// Acquire the next frame and an sRGB view of it.
    ///
    /// Acquisition can fail transiently (resize, lost surface); the error is
    /// surfaced so the caller can reconfigure or retry.
    pub fn acquire_frame(
        &self,
    ) -> Result<(wgpu::SurfaceTexture, wgpu::TextureView), wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor {
                format: Some(self.surface_format.add_srgb_suffix()),
                ..Default::default()
            });

        Ok((surface_texture, view))
    }

    fn make_surface_config(
        size: winit::dpi::PhysicalSize<u32>,
        surface_format: wgpu::TextureFormat,
    ) -> wgpu::SurfaceConfiguration {
        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            view_formats: vec![surface_format.add_srgb_suffix()],
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            width: size.width,
            height: size.height,
            desired_maximum_frame_latency: 2,
            // Input-driven app: redraws happen on interaction, vsync is fine.
            present_mode: wgpu::PresentMode::AutoVsync,
        }
    }
}

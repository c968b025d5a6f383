//! Batched 2D scene renderer.
//!
//! The lesson scene is small (a few hundred triangles of wedges, dashes, and
//! glyphs), so the renderer takes the simple road:
//! - flatten the scene, sort draw items by z (painter's order)
//! - transform positions on the CPU and bake each item's fill into
//!   per-vertex colors
//! - upload one vertex buffer + one index buffer, draw once
//!
//! The only uniform is the camera's world -> clip matrix. Alpha blending is
//! enabled; the washed-out neutral wedges and dashed guides rely on it.

use std::{borrow::Cow, mem};

use crate::render::gpu::Gpu;
use crate::scene::Scene2D;

/// GPU vertex: world-space position plus premultiplied-nothing RGBA fill.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl ColorVertex {
    pub const ATTRS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    #[inline]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ColorVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// The camera matrix, embedded from the scene's 3x3 affine.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniforms {
    clip_from_world: [[f32; 4]; 4],
}

pub struct SceneRenderer {
    pipeline: wgpu::RenderPipeline,

    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,

    // Reused across frames; grown on demand.
    vertex_buffer: wgpu::Buffer,
    vertex_capacity_bytes: u64,
    index_buffer: wgpu::Buffer,
    index_capacity_bytes: u64,
}

impl SceneRenderer {
    /// Create the flat-color pipeline targeting the surface's sRGB view.
    pub fn new(gpu: &Gpu) -> anyhow::Result<Self> {
        let shader = gpu
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("SceneRenderer Flat Shader"),
                source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!(
                    "shaders/flat_color.wgsl"
                ))),
            });

        let uniform_bind_group_layout =
            gpu.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("SceneRenderer Camera BGL"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: Some(
                                wgpu::BufferSize::new(mem::size_of::<CameraUniforms>() as u64)
                                    .unwrap(),
                            ),
                        },
                        count: None,
                    }],
                });

        let uniform_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("SceneRenderer Camera Buffer"),
            size: mem::size_of::<CameraUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("SceneRenderer Camera BG"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = gpu
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("SceneRenderer Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let pipeline = gpu
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("SceneRenderer Flat Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[ColorVertex::layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: gpu.surface_format.add_srgb_suffix(),
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        let initial = 4096u64;
        let vertex_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("SceneRenderer Vertex Buffer"),
            size: initial,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let index_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("SceneRenderer Index Buffer"),
            size: initial,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            vertex_buffer,
            vertex_capacity_bytes: initial,
            index_buffer,
            index_capacity_bytes: initial,
        })
    }

    fn ensure_capacity(&mut self, gpu: &Gpu, vb_bytes: u64, ib_bytes: u64) {
        if vb_bytes > self.vertex_capacity_bytes {
            let new_size = vb_bytes.next_power_of_two().max(4096);
            self.vertex_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("SceneRenderer Vertex Buffer (resized)"),
                size: new_size,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            self.vertex_capacity_bytes = new_size;
        }

        if ib_bytes > self.index_capacity_bytes {
            let new_size = ib_bytes.next_power_of_two().max(4096);
            self.index_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("SceneRenderer Index Buffer (resized)"),
                size: new_size,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            self.index_capacity_bytes = new_size;
        }
    }

    /// Draw a full scene into the provided render pass.
    ///
    /// The caller creates the pass and clears the background; this batches
    /// and issues a single indexed draw.
    pub fn draw_scene<'pass>(
        &'pass mut self,
        gpu: &Gpu,
        pass: &mut wgpu::RenderPass<'pass>,
        scene: &Scene2D,
    ) -> anyhow::Result<()> {
        let mut items = scene.flatten();
        // Stable sort keeps traversal order within a z layer.
        items.sort_by_key(|item| item.z);

        let mut vertices: Vec<ColorVertex> = Vec::new();
        let mut indices: Vec<u32> = Vec::new();

        for item in &items {
            if item.mesh.is_empty() {
                continue;
            }
            let base = vertices.len() as u32;
            let color = [item.fill.r, item.fill.g, item.fill.b, item.fill.a];

            for &[x, y] in &item.mesh.positions {
                let (wx, wy) = item.world_from_local.transform_point(x, y);
                vertices.push(ColorVertex {
                    position: [wx, wy],
                    color,
                });
            }
            indices.extend(item.mesh.indices.iter().map(|&i| base + i));
        }

        if indices.is_empty() {
            return Ok(());
        }

        // ColorVertex (24 B) and u32 indices are both multiples of
        // COPY_BUFFER_ALIGNMENT, so uploads need no padding.
        let vb_bytes = (vertices.len() * mem::size_of::<ColorVertex>()) as u64;
        let ib_bytes = (indices.len() * mem::size_of::<u32>()) as u64;
        self.ensure_capacity(gpu, vb_bytes, ib_bytes);

        gpu.queue
            .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        gpu.queue
            .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&indices));

        let uniforms = CameraUniforms {
            clip_from_world: scene.camera.clip_from_world().to_mat4(),
        };
        gpu.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..vb_bytes));
        pass.set_index_buffer(self.index_buffer.slice(..ib_bytes), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..(indices.len() as u32), 0, 0..1);

        Ok(())
    }
}

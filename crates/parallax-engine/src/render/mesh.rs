use std::collections::HashSet;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::paint::Color;
use crate::render::{CameraUniform, GpuTexture, RenderCtx, RenderTarget, TextureData, TextureFilter};

use super::common::{
    depth_write, premul_alpha_blend, sampler_entry, texture_entry, uniform_buffer, uniform_entry,
};

// ── CPU mesh data ─────────────────────────────────────────────────────────

/// Vertex layout for lit meshes (24 bytes): position, unit normal.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3  // normal
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Unique triangle edges as a line list, for wireframe drawing.
    ///
    /// Edges are deduplicated regardless of winding; order follows first use.
    pub fn wireframe_indices(&self) -> Vec<u32> {
        let mut seen = HashSet::with_capacity(self.indices.len());
        let mut lines = Vec::with_capacity(self.indices.len() * 2);

        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                if seen.insert((a.min(b), a.max(b))) {
                    lines.push(a);
                    lines.push(b);
                }
            }
        }

        lines
    }
}

// ── per-draw parameters ───────────────────────────────────────────────────

/// Handle to a mesh registered with a [`MeshRenderer`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MeshId(usize);

/// One mesh instance to draw this frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MeshDraw {
    pub mesh: MeshId,
    /// Rigid transform (rotation + translation). Scale is not supported
    /// because normals are transformed with the same matrix.
    pub model: Mat4,
}

/// Directional light. `position` is a point on the ray; light travels from
/// there towards the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
}

/// Shading inputs shared by every mesh in a [`MeshRenderer::render`] call.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ToonParams {
    pub color: Color,
    pub light: DirectionalLight,
    pub wireframe: bool,
}

// ── renderer ──────────────────────────────────────────────────────────────

struct GpuMesh {
    vbo: wgpu::Buffer,
    fill_ibo: wgpu::Buffer,
    fill_count: u32,
    line_ibo: wgpu::Buffer,
    line_count: u32,
}

/// Renderer for toon-shaded meshes.
///
/// Meshes and the gradient lookup are registered CPU-side and uploaded lazily
/// on the first `render` that needs them; pipelines are rebuilt only when the
/// surface format changes.
#[derive(Default)]
pub struct MeshRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    fill_pipeline: Option<wgpu::RenderPipeline>,
    line_pipeline: Option<wgpu::RenderPipeline>,

    camera_bgl: Option<wgpu::BindGroupLayout>,
    material_bgl: Option<wgpu::BindGroupLayout>,
    camera_ubo: Option<wgpu::Buffer>,
    material_ubo: Option<wgpu::Buffer>,
    camera_bind_group: Option<wgpu::BindGroup>,
    material_bind_group: Option<wgpu::BindGroup>,

    pending_meshes: Vec<MeshData>,
    meshes: Vec<GpuMesh>,

    gradient: Option<TextureData>,
    gradient_dirty: bool,
    gradient_gpu: Option<GpuTexture>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl MeshRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a mesh for drawing. Upload happens on the next `render`.
    pub fn add_mesh(&mut self, mesh: MeshData) -> MeshId {
        let id = MeshId(self.meshes.len() + self.pending_meshes.len());
        self.pending_meshes.push(mesh);
        id
    }

    /// Sets the toon gradient lookup (sampled with nearest filtering).
    pub fn set_gradient(&mut self, gradient: TextureData) {
        self.gradient = Some(gradient);
        self.gradient_dirty = true;
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        camera: &CameraUniform,
        params: &ToonParams,
        draws: &[MeshDraw],
    ) {
        if draws.is_empty() {
            return;
        }

        self.ensure_pipelines(ctx);
        self.ensure_meshes(ctx);
        self.ensure_bindings(ctx);

        self.write_uniforms(ctx, camera, params);
        self.ensure_instance_capacity(ctx, draws.len());

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        let models: Vec<InstanceModel> = draws
            .iter()
            .map(|d| InstanceModel { model: d.model.to_cols_array_2d() })
            .collect();
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(&models));

        let pipeline = if params.wireframe {
            self.line_pipeline.as_ref()
        } else {
            self.fill_pipeline.as_ref()
        };
        let Some(pipeline) = pipeline else { return };
        let Some(camera_bg) = self.camera_bind_group.as_ref() else { return };
        let Some(material_bg) = self.material_bind_group.as_ref() else { return };

        let mut rpass = target.begin_load_pass("parallax mesh pass", true);
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, camera_bg, &[]);
        rpass.set_bind_group(1, material_bg, &[]);
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));

        for (i, draw) in draws.iter().enumerate() {
            let Some(mesh) = self.meshes.get(draw.mesh.0) else {
                log::warn!("mesh {:?} not registered; skipping draw", draw.mesh);
                continue;
            };
            let (ibo, count) = if params.wireframe {
                (&mesh.line_ibo, mesh.line_count)
            } else {
                (&mesh.fill_ibo, mesh.fill_count)
            };

            let i = i as u32;
            rpass.set_vertex_buffer(0, mesh.vbo.slice(..));
            rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..count, 0, i..i + 1);
        }
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.fill_pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("parallax toon shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/toon.wgsl").into()),
        });

        let camera_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("parallax mesh camera bgl"),
            entries: &[uniform_entry::<CameraUniform>(0, wgpu::ShaderStages::VERTEX)],
        });

        let material_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("parallax toon material bgl"),
            entries: &[
                uniform_entry::<ToonUniform>(0, wgpu::ShaderStages::FRAGMENT),
                texture_entry(1),
                sampler_entry(2),
            ],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("parallax mesh pipeline layout"),
            bind_group_layouts: &[&camera_bgl, &material_bgl],
            immediate_size: 0,
        });

        let build = |label: &str, topology: wgpu::PrimitiveTopology| {
            ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[MeshVertex::layout(), InstanceModel::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.surface_format,
                        blend: Some(premul_alpha_blend()),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(depth_write()),
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            })
        };

        self.fill_pipeline = Some(build("parallax toon pipeline", wgpu::PrimitiveTopology::TriangleList));
        self.line_pipeline = Some(build("parallax toon wire pipeline", wgpu::PrimitiveTopology::LineList));
        self.pipeline_format = Some(ctx.surface_format);
        self.camera_bgl = Some(camera_bgl);
        self.material_bgl = Some(material_bgl);
        self.camera_bind_group = None;
        self.material_bind_group = None;
    }

    fn ensure_meshes(&mut self, ctx: &RenderCtx<'_>) {
        for mesh in self.pending_meshes.drain(..) {
            let n = self.meshes.len();
            let lines = mesh.wireframe_indices();

            let vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("parallax mesh {n} vbo")),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let fill_ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("parallax mesh {n} ibo")),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            let line_ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("parallax mesh {n} line ibo")),
                contents: bytemuck::cast_slice(&lines),
                usage: wgpu::BufferUsages::INDEX,
            });

            log::debug!(
                "uploaded mesh {n}: {} vertices, {} triangles",
                mesh.vertices.len(),
                mesh.triangle_count()
            );

            self.meshes.push(GpuMesh {
                vbo,
                fill_ibo,
                fill_count: mesh.indices.len() as u32,
                line_ibo,
                line_count: lines.len() as u32,
            });
        }
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.camera_ubo.is_none() {
            self.camera_ubo = Some(uniform_buffer::<CameraUniform>(ctx.device, "parallax mesh camera ubo"));
        }
        if self.material_ubo.is_none() {
            self.material_ubo = Some(uniform_buffer::<ToonUniform>(ctx.device, "parallax toon ubo"));
        }

        if self.gradient_dirty || self.gradient_gpu.is_none() {
            let data = self.gradient.clone().unwrap_or_else(flat_gradient);
            self.gradient_gpu = Some(GpuTexture::upload(
                ctx.device,
                ctx.queue,
                "parallax toon gradient",
                &data,
                TextureFilter::Nearest,
            ));
            self.gradient_dirty = false;
            self.material_bind_group = None;
        }

        let (Some(camera_bgl), Some(material_bgl)) = (self.camera_bgl.as_ref(), self.material_bgl.as_ref())
        else {
            return;
        };
        let (Some(camera_ubo), Some(material_ubo), Some(gradient)) =
            (self.camera_ubo.as_ref(), self.material_ubo.as_ref(), self.gradient_gpu.as_ref())
        else {
            return;
        };

        if self.camera_bind_group.is_none() {
            self.camera_bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("parallax mesh camera bind group"),
                layout: camera_bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_ubo.as_entire_binding(),
                }],
            }));
        }

        if self.material_bind_group.is_none() {
            self.material_bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("parallax toon material bind group"),
                layout: material_bgl,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: material_ubo.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&gradient.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&gradient.sampler),
                    },
                ],
            }));
        }
    }

    fn write_uniforms(&mut self, ctx: &RenderCtx<'_>, camera: &CameraUniform, params: &ToonParams) {
        if let Some(ubo) = self.camera_ubo.as_ref() {
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(camera));
        }
        if let Some(ubo) = self.material_ubo.as_ref() {
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&ToonUniform::new(params)));
        }
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }
        let new_cap = required.next_power_of_two().max(8);
        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("parallax mesh instance vbo"),
            size: (new_cap * std::mem::size_of::<InstanceModel>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

/// Single full-bright texel used until a gradient is provided.
fn flat_gradient() -> TextureData {
    TextureData { width: 1, height: 1, rgba: vec![255; 4] }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Per-instance model matrix, split into four column attributes.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct InstanceModel {
    model: [[f32; 4]; 4],
}

impl InstanceModel {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceModel>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

/// Toon material + light uniform (48 bytes):
///
///  offset  0  color       [f32; 4]  premultiplied linear
///  offset 16  light_dir   [f32; 4]  xyz towards the light, w intensity
///  offset 32  light_color [f32; 4]
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ToonUniform {
    color: [f32; 4],
    light_dir: [f32; 4],
    light_color: [f32; 4],
}

impl ToonUniform {
    fn new(params: &ToonParams) -> Self {
        let dir = params.light.position.normalize_or(Vec3::Y);
        Self {
            color: params.color.to_array(),
            light_dir: dir.extend(params.light.intensity).to_array(),
            light_color: params.light.color.to_array(),
        }
    }
}

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::paint::Color;
use crate::render::{CameraUniform, GpuTexture, RenderCtx, RenderTarget, TextureData, TextureFilter};

use super::common::{
    premul_alpha_blend, sampler_entry, texture_entry, uniform_buffer, uniform_entry, QuadVertex,
    QUAD_INDICES, QUAD_VERTICES,
};

/// Appearance shared by every point in a [`PointsRenderer::render`] call.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointParams {
    pub color: Color,
    /// World-space edge length of each billboard.
    pub size: f32,
}

/// Renderer for camera-facing particle billboards.
///
/// Points are drawn with depth testing disabled and alpha taken from a mask
/// texture, so they blend over everything drawn earlier in the frame.
#[derive(Default)]
pub struct PointsRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    camera_bgl: Option<wgpu::BindGroupLayout>,
    material_bgl: Option<wgpu::BindGroupLayout>,
    camera_ubo: Option<wgpu::Buffer>,
    material_ubo: Option<wgpu::Buffer>,
    camera_bind_group: Option<wgpu::BindGroup>,
    material_bind_group: Option<wgpu::BindGroup>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    mask: Option<TextureData>,
    mask_dirty: bool,
    mask_gpu: Option<GpuTexture>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl PointsRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the alpha mask (green channel is coverage).
    pub fn set_mask(&mut self, mask: TextureData) {
        self.mask = Some(mask);
        self.mask_dirty = true;
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        camera: &CameraUniform,
        params: &PointParams,
        positions: &[Vec3],
    ) {
        if positions.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        self.ensure_instance_capacity(ctx, positions.len());

        if let Some(ubo) = self.camera_ubo.as_ref() {
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(camera));
        }
        if let Some(ubo) = self.material_ubo.as_ref() {
            let u = PointsUniform {
                color: params.color.to_array(),
                size: [params.size, 0.0, 0.0, 0.0],
            };
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
        }

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        let instances: Vec<PointInstance> = positions
            .iter()
            .map(|p| PointInstance { center: p.extend(1.0).to_array() })
            .collect();
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(&instances));

        let (Some(pipeline), Some(camera_bg), Some(material_bg), Some(vbo), Some(ibo)) = (
            self.pipeline.as_ref(),
            self.camera_bind_group.as_ref(),
            self.material_bind_group.as_ref(),
            self.quad_vbo.as_ref(),
            self.quad_ibo.as_ref(),
        ) else {
            return;
        };

        let mut rpass = target.begin_load_pass("parallax points pass", false);
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, camera_bg, &[]);
        rpass.set_bind_group(1, material_bg, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..positions.len() as u32);
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("parallax points shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/points.wgsl").into()),
        });

        let camera_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("parallax points camera bgl"),
            entries: &[uniform_entry::<CameraUniform>(0, wgpu::ShaderStages::VERTEX)],
        });

        let material_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("parallax points material bgl"),
            entries: &[
                uniform_entry::<PointsUniform>(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                texture_entry(1),
                sampler_entry(2),
            ],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("parallax points pipeline layout"),
            bind_group_layouts: &[&camera_bgl, &material_bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("parallax points pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), PointInstance::layout()],
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
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let quad_vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("parallax points quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let quad_ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("parallax points quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.camera_bgl = Some(camera_bgl);
        self.material_bgl = Some(material_bgl);
        self.camera_bind_group = None;
        self.material_bind_group = None;
        self.quad_vbo = Some(quad_vbo);
        self.quad_ibo = Some(quad_ibo);
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.camera_ubo.is_none() {
            self.camera_ubo = Some(uniform_buffer::<CameraUniform>(ctx.device, "parallax points camera ubo"));
        }
        if self.material_ubo.is_none() {
            self.material_ubo = Some(uniform_buffer::<PointsUniform>(ctx.device, "parallax points ubo"));
        }

        if self.mask_dirty || self.mask_gpu.is_none() {
            let data = self.mask.clone().unwrap_or_else(opaque_mask);
            self.mask_gpu = Some(GpuTexture::upload(
                ctx.device,
                ctx.queue,
                "parallax points mask",
                &data,
                TextureFilter::Linear,
            ));
            self.mask_dirty = false;
            self.material_bind_group = None;
        }

        let (Some(camera_bgl), Some(material_bgl), Some(camera_ubo), Some(material_ubo), Some(mask)) = (
            self.camera_bgl.as_ref(),
            self.material_bgl.as_ref(),
            self.camera_ubo.as_ref(),
            self.material_ubo.as_ref(),
            self.mask_gpu.as_ref(),
        ) else {
            return;
        };

        if self.camera_bind_group.is_none() {
            self.camera_bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("parallax points camera bind group"),
                layout: camera_bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_ubo.as_entire_binding(),
                }],
            }));
        }

        if self.material_bind_group.is_none() {
            self.material_bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("parallax points material bind group"),
                layout: material_bgl,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: material_ubo.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&mask.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&mask.sampler),
                    },
                ],
            }));
        }
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }
        let new_cap = required.next_power_of_two().max(256);
        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("parallax points instance vbo"),
            size: (new_cap * std::mem::size_of::<PointInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

fn opaque_mask() -> TextureData {
    TextureData { width: 1, height: 1, rgba: vec![255; 4] }
}

// ── GPU types ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct PointInstance {
    center: [f32; 4], // xyz world position, w unused
}

impl PointInstance {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x4];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct PointsUniform {
    color: [f32; 4],
    size: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_layouts_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<PointsUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<PointInstance>(), 16);
    }
}

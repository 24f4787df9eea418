use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::coords::{Rect, Viewport};
use crate::gfx::{GeometryId, Light, LightKind, MeshVertex, RendererId, RendererOptions, Resource};
use crate::render::{RenderCtx, RenderTarget};

use super::{FrameSubmission, WgpuEngine};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const MAX_LIGHTS: usize = 8;
const MSAA_SAMPLES: u32 = 4;

/// Physical size of a surface's drawing buffer: its logical size times the
/// pixel ratio, rounded, with every side in `1..=max_side`.
fn target_extent(size: Viewport, pixel_ratio: f32, max_side: u32) -> (u32, u32) {
    let side = |v: f32| ((v * pixel_ratio).round().max(1.0) as u32).min(max_side);
    (side(size.width), side(size.height))
}

fn sample_count(options: RendererOptions) -> u32 {
    if options.antialias { MSAA_SAMPLES } else { 1 }
}

// ── GPU-side mesh cache ───────────────────────────────────────────────────

struct GpuMesh {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
}

/// Offscreen drawing buffer of one surface.
struct SurfaceTarget {
    extent: (u32, u32),
    samples: u32,
    /// Single-sampled; the MSAA attachment resolves into it.
    color: wgpu::TextureView,
    msaa: Option<wgpu::TextureView>,
    depth: wgpu::TextureView,
    composite: wgpu::BindGroup,
}

impl SurfaceTarget {
    fn new(ctx: &RenderCtx<'_>, blit: &Composite, extent: (u32, u32), samples: u32) -> Self {
        let view = |label: &'static str,
                    format: wgpu::TextureFormat,
                    samples: u32,
                    usage: wgpu::TextureUsages| {
            ctx.device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some(label),
                    size: wgpu::Extent3d {
                        width: extent.0,
                        height: extent.1,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: samples,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage,
                    view_formats: &[],
                })
                .create_view(&Default::default())
        };

        let color = view(
            "blacklabel surface color",
            ctx.surface_format,
            1,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let msaa = (samples > 1).then(|| {
            view(
                "blacklabel surface msaa",
                ctx.surface_format,
                samples,
                wgpu::TextureUsages::RENDER_ATTACHMENT,
            )
        });
        let depth = view(
            "blacklabel surface depth",
            DEPTH_FORMAT,
            samples,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let composite = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("blacklabel composite bind group"),
            layout: &blit.bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&color),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&blit.sampler),
                },
            ],
        });

        Self { extent, samples, color, msaa, depth, composite }
    }
}

struct SurfaceBinding {
    ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    target: Option<SurfaceTarget>,
}

/// Pipeline that stretches a surface target over its screen region.
struct Composite {
    pipeline: wgpu::RenderPipeline,
    bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
}

/// A submission that survived culling, with its instance range.
struct PreparedFrame {
    renderer: RendererId,
    region: (u32, u32, u32, u32),
    extent: (u32, u32),
    samples: u32,
    clear: wgpu::Color,
    globals: Globals,
    draws: Vec<(GeometryId, u32)>,
}

// ── renderer ──────────────────────────────────────────────────────────────

/// Draws queued [`FrameSubmission`]s into their hosting container regions.
///
/// Each surface renders into its own offscreen target sized by its pixel
/// ratio, multisampled when antialiasing is on. The resolved targets are
/// then stretched over their container regions, so a scene never paints
/// outside its rect.
#[derive(Default)]
pub struct MeshRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    shader: Option<wgpu::ShaderModule>,
    pipeline_layout: Option<wgpu::PipelineLayout>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    /// Keyed by sample count.
    mesh_pipelines: HashMap<u32, wgpu::RenderPipeline>,
    composite: Option<Composite>,

    surfaces: HashMap<RendererId, SurfaceBinding>,
    meshes: HashMap<GeometryId, GpuMesh>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl MeshRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains `engine` and draws every visible submission.
    ///
    /// `region_of` maps a surface to the logical rect of the container that
    /// hosts it; surfaces without one, or whose rect or size has no area, are
    /// skipped.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        engine: &mut WgpuEngine,
        region_of: impl Fn(RendererId) -> Option<Rect>,
    ) {
        for resource in engine.take_released() {
            match resource {
                Resource::Geometry(id) => {
                    self.meshes.remove(&id);
                }
                Resource::Renderer(id) => {
                    self.surfaces.remove(&id);
                }
                Resource::Material(_) => {}
            }
        }

        let max_side = ctx.device.limits().max_texture_dimension_2d;
        let mut instances: Vec<MeshInstance> = Vec::new();
        let mut prepared: Vec<PreparedFrame> = Vec::new();

        for frame in engine.take_frames() {
            if !frame.is_drawable() {
                log::trace!("skipping zero-area surface {:?}", frame.renderer);
                continue;
            }
            let Some(region) = region_of(frame.renderer).and_then(|r| ctx.physical_region(r))
            else {
                continue;
            };

            let mut draws = Vec::with_capacity(frame.draws.len());
            for draw in &frame.draws {
                draws.push((draw.geometry, instances.len() as u32));
                instances.push(MeshInstance::new(draw.model, draw.material.color.to_array(), [
                    draw.material.roughness,
                    draw.material.metalness,
                    0.0,
                    0.0,
                ]));
            }

            prepared.push(PreparedFrame {
                renderer: frame.renderer,
                region,
                extent: target_extent(frame.size, frame.options.pixel_ratio, max_side),
                samples: sample_count(frame.options),
                clear: frame.clear.to_wgpu(),
                globals: Globals::from_submission(&frame),
                draws,
            });
        }

        if prepared.is_empty() {
            return;
        }

        self.ensure_pipelines(ctx);
        for frame in &prepared {
            for (geometry, _) in &frame.draws {
                self.ensure_mesh(ctx, engine, *geometry);
            }
            self.ensure_mesh_pipeline(ctx, frame.samples);
            self.ensure_surface(ctx, frame.renderer, frame.extent, frame.samples);
            if let Some(binding) = self.surfaces.get(&frame.renderer) {
                ctx.queue.write_buffer(&binding.ubo, 0, bytemuck::bytes_of(&frame.globals));
            }
        }
        if !instances.is_empty() {
            self.ensure_instance_capacity(ctx, instances.len());
            if let Some(vbo) = self.instance_vbo.as_ref() {
                ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&instances));
            }
        }

        for frame in &prepared {
            self.draw_surface(target.encoder, frame);
        }
        self.present(target, &prepared);
    }

    /// Clears the surface target and draws the frame's meshes into it.
    fn draw_surface(&self, encoder: &mut wgpu::CommandEncoder, frame: &PreparedFrame) {
        let Some(binding) = self.surfaces.get(&frame.renderer) else { return };
        let Some(surface) = binding.target.as_ref() else { return };
        let Some(pipeline) = self.mesh_pipelines.get(&surface.samples) else { return };

        let (view, resolve_target, store) = match &surface.msaa {
            Some(msaa) => (msaa, Some(&surface.color), wgpu::StoreOp::Discard),
            None => (&surface.color, None, wgpu::StoreOp::Store),
        };

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("blacklabel mesh pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target,
                ops: wgpu::Operations { load: wgpu::LoadOp::Clear(frame.clear), store },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &surface.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if frame.draws.is_empty() {
            return;
        }
        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &binding.bind_group, &[]);
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        for (geometry, instance) in &frame.draws {
            let Some(mesh) = self.meshes.get(geometry) else { continue };
            rpass.set_vertex_buffer(0, mesh.vbo.slice(..));
            rpass.set_index_buffer(mesh.ibo.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..mesh.index_count, 0, *instance..instance + 1);
        }
    }

    /// Stretches every drawn surface target over its container region.
    fn present(&self, target: &mut RenderTarget<'_>, prepared: &[PreparedFrame]) {
        let Some(blit) = self.composite.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("blacklabel composite pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations { load: wgpu::LoadOp::Load, store: wgpu::StoreOp::Store },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        rpass.set_pipeline(&blit.pipeline);

        for frame in prepared {
            let Some(surface) = self.surfaces.get(&frame.renderer).and_then(|b| b.target.as_ref())
            else {
                continue;
            };
            let (x, y, w, h) = frame.region;
            rpass.set_viewport(x as f32, y as f32, w as f32, h as f32, 0.0, 1.0);
            rpass.set_scissor_rect(x, y, w, h);
            rpass.set_bind_group(0, &surface.composite, &[]);
            rpass.draw(0..3, 0..1);
        }
    }

    /// Builds everything tied to the output format; a format change drops
    /// every pipeline and surface target.
    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.composite.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blacklabel mesh shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("blacklabel mesh bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<Globals>() as u64),
                },
                count: None,
            }],
        });

        let layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("blacklabel mesh pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        self.composite = Some(composite_pipeline(ctx));
        self.pipeline_format = Some(ctx.surface_format);
        self.shader = Some(shader);
        self.pipeline_layout = Some(layout);
        self.bind_group_layout = Some(bgl);
        self.mesh_pipelines.clear();
        self.surfaces.clear();
    }

    fn ensure_mesh_pipeline(&mut self, ctx: &RenderCtx<'_>, samples: u32) {
        if self.mesh_pipelines.contains_key(&samples) {
            return;
        }
        let (Some(shader), Some(layout)) = (self.shader.as_ref(), self.pipeline_layout.as_ref())
        else {
            return;
        };

        let label = format!("blacklabel mesh pipeline x{samples}");
        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[mesh_vertex_layout(), MeshInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState { count: samples, ..Default::default() },
            multiview_mask: None,
            cache: None,
        });
        self.mesh_pipelines.insert(samples, pipeline);
    }

    fn ensure_mesh(&mut self, ctx: &RenderCtx<'_>, engine: &WgpuEngine, id: GeometryId) {
        if self.meshes.contains_key(&id) {
            return;
        }
        let Some(data) = engine.mesh_data(id) else { return };

        let vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("blacklabel mesh vbo"),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("blacklabel mesh ibo"),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        self.meshes.insert(id, GpuMesh { vbo, ibo, index_count: data.indices.len() as u32 });
    }

    /// Creates the surface's uniforms on first use and rebuilds its target
    /// whenever the extent or sample count changes.
    fn ensure_surface(
        &mut self,
        ctx: &RenderCtx<'_>,
        id: RendererId,
        extent: (u32, u32),
        samples: u32,
    ) {
        let (Some(bgl), Some(blit)) = (self.bind_group_layout.as_ref(), self.composite.as_ref())
        else {
            return;
        };

        let binding = self.surfaces.entry(id).or_insert_with(|| {
            let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("blacklabel mesh globals ubo"),
                size: std::mem::size_of::<Globals>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("blacklabel mesh bind group"),
                layout: bgl,
                entries: &[wgpu::BindGroupEntry { binding: 0, resource: ubo.as_entire_binding() }],
            });
            SurfaceBinding { ubo, bind_group, target: None }
        });

        if matches!(&binding.target, Some(t) if t.extent == extent && t.samples == samples) {
            return;
        }
        log::debug!("surface {id:?} target {}x{} at {samples}x", extent.0, extent.1);
        binding.target = Some(SurfaceTarget::new(ctx, blit, extent, samples));
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }
        let cap = required.next_power_of_two().max(16);
        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("blacklabel mesh instance vbo"),
            size: (cap * std::mem::size_of::<MeshInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = cap;
    }
}

fn composite_pipeline(ctx: &RenderCtx<'_>) -> Composite {
    let device = ctx.device;
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("blacklabel composite shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/composite.wgsl").into()),
    });

    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("blacklabel composite bgl"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("blacklabel composite pipeline layout"),
        bind_group_layouts: &[&bgl],
        immediate_size: 0,
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("blacklabel composite pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.surface_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("blacklabel composite sampler"),
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    });

    Composite { pipeline, bgl, sampler }
}

fn mesh_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3  // normal
    ];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MeshVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRS,
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct MeshInstance {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
    /// roughness, metalness, unused, unused
    surface: [f32; 4],
}

impl MeshInstance {
    const ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4, // color
        7 => Float32x4  // surface
    ];

    fn new(model: Mat4, color: [f32; 4], surface: [f32; 4]) -> Self {
        let [model_0, model_1, model_2, model_3] = model.to_cols_array_2d();
        Self { model_0, model_1, model_2, model_3, color, surface }
    }

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

const KIND_AMBIENT: f32 = 0.0;
const KIND_HEMISPHERE: f32 = 1.0;
const KIND_DIRECTIONAL: f32 = 2.0;
const KIND_SPOT: f32 = 3.0;
const KIND_POINT: f32 = 4.0;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct LightUniform {
    /// kind, intensity, cut-off distance, decay
    params: [f32; 4],
    color: [f32; 4],
    position: [f32; 4],
    direction: [f32; 4],
    /// cos(outer half-angle), cos(inner half-angle)
    cone: [f32; 4],
    ground: [f32; 4],
}

impl LightUniform {
    fn from_light(light: &Light) -> Self {
        let [r, g, b] = light.color.rgb();
        let direction = light.direction().unwrap_or(glam::Vec3::NEG_Y);
        let mut u = Self {
            params: [KIND_AMBIENT, light.intensity, 0.0, 0.0],
            color: [r, g, b, 0.0],
            position: light.position.extend(1.0).to_array(),
            direction: direction.extend(0.0).to_array(),
            cone: [0.0; 4],
            ground: [0.0; 4],
        };
        match light.kind {
            LightKind::Ambient => {}
            LightKind::Hemisphere { ground } => {
                let [gr, gg, gb] = ground.rgb();
                u.params[0] = KIND_HEMISPHERE;
                u.ground = [gr, gg, gb, 0.0];
            }
            LightKind::Directional { .. } => u.params[0] = KIND_DIRECTIONAL,
            LightKind::Spot { distance, angle, penumbra, decay, .. } => {
                u.params = [KIND_SPOT, light.intensity, distance, decay];
                u.cone = [angle.cos(), (angle * (1.0 - penumbra)).cos(), 0.0, 0.0];
            }
            LightKind::Point { distance, decay } => {
                u.params = [KIND_POINT, light.intensity, distance, decay];
            }
        }
        u
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    /// rgb, enabled flag
    fog_color: [f32; 4],
    /// near, far, light count, unused
    fog_range: [f32; 4],
    lights: [LightUniform; MAX_LIGHTS],
}

impl Globals {
    fn from_submission(frame: &FrameSubmission) -> Self {
        if frame.lights.len() > MAX_LIGHTS {
            log::debug!("{} lights submitted; only the first {MAX_LIGHTS} are used", frame.lights.len());
        }

        let mut lights = [LightUniform::zeroed(); MAX_LIGHTS];
        for (slot, light) in lights.iter_mut().zip(&frame.lights) {
            *slot = LightUniform::from_light(light);
        }
        let count = frame.lights.len().min(MAX_LIGHTS) as f32;

        let (fog_color, fog_range) = match frame.fog {
            Some(fog) => {
                let [r, g, b] = fog.color.rgb();
                ([r, g, b, 1.0], [fog.near, fog.far, count, 0.0])
            }
            None => ([0.0; 4], [0.0, 0.0, count, 0.0]),
        };

        Self {
            view_proj: frame.view_proj.to_cols_array_2d(),
            camera_pos: frame.camera_position.extend(1.0).to_array(),
            fog_color,
            fog_range,
            lights,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::gfx::Fog;
    use crate::paint::Color;

    fn submission(lights: Vec<Light>) -> FrameSubmission {
        FrameSubmission {
            renderer: RendererId(1),
            size: Viewport::new(100.0, 80.0),
            options: RendererOptions::default(),
            clear: Color::from_hex(0x050509),
            fog: Some(Fog::new(Color::from_hex(0x050509), 18.0, 120.0)),
            view_proj: Mat4::IDENTITY,
            camera_position: Vec3::new(0.0, 3.2, 18.0),
            lights,
            draws: Vec::new(),
        }
    }

    #[test]
    fn target_extent_follows_pixel_ratio() {
        let size = Viewport::new(1024.0, 614.4);
        assert_eq!(target_extent(size, 1.0, 8192), (1024, 614));
        assert_eq!(target_extent(size, 2.0, 8192), (2048, 1229));
        assert_eq!(target_extent(size, 1.5, 8192), (1536, 922));
    }

    #[test]
    fn target_extent_stays_within_device_limits() {
        assert_eq!(target_extent(Viewport::new(0.2, 0.0), 1.0, 8192), (1, 1));
        assert_eq!(target_extent(Viewport::new(6000.0, 100.0), 2.0, 8192), (8192, 200));
    }

    #[test]
    fn antialias_selects_multisampling() {
        let on = RendererOptions { antialias: true, pixel_ratio: 1.0 };
        let off = RendererOptions { antialias: false, pixel_ratio: 1.0 };
        assert_eq!(sample_count(on), MSAA_SAMPLES);
        assert_eq!(sample_count(off), 1);
    }

    #[test]
    fn globals_layout_is_uniform_friendly() {
        assert_eq!(std::mem::size_of::<LightUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<Globals>() % 16, 0);
    }

    #[test]
    fn spot_cone_cosines_follow_penumbra() {
        let spot = Light::spot(Color::WHITE, 1.0, 80.0, 0.6, 0.5, 1.2)
            .at(Vec3::new(0.0, 10.0, 0.0))
            .aimed_at(Vec3::ZERO);
        let u = LightUniform::from_light(&spot);
        assert_eq!(u.params, [KIND_SPOT, 1.0, 80.0, 1.2]);
        assert!((u.cone[0] - 0.6f32.cos()).abs() < 1e-6);
        assert!((u.cone[1] - 0.3f32.cos()).abs() < 1e-6);
        assert_eq!(u.direction, [0.0, -1.0, 0.0, 0.0]);
    }

    #[test]
    fn globals_pack_fog_and_light_count() {
        let g = Globals::from_submission(&submission(vec![
            Light::ambient(Color::WHITE, 0.5),
            Light::point(Color::WHITE, 0.35, 40.0, 2.0),
        ]));
        assert_eq!(g.fog_color[3], 1.0);
        assert_eq!(&g.fog_range[..3], &[18.0, 120.0, 2.0]);
        assert_eq!(g.lights[1].params[0], KIND_POINT);
        assert_eq!(g.lights[2], LightUniform::zeroed());
    }

    #[test]
    fn extra_lights_are_dropped() {
        let lights = vec![Light::ambient(Color::WHITE, 0.1); MAX_LIGHTS + 3];
        let g = Globals::from_submission(&submission(lights));
        assert_eq!(g.fog_range[2], MAX_LIGHTS as f32);
    }
}

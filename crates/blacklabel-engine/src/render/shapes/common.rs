//! Plumbing shared by the 2D overlay renderers: a unit quad drawn once per
//! instance, a viewport uniform at binding 0, and a pass that loads whatever
//! the mesh backend already drew.

use std::marker::PhantomData;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::Viewport;
use crate::render::{RenderCtx, RenderTarget};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ViewportUniform {
    size: [f32; 2],
    _pad: [f32; 2],
}

impl ViewportUniform {
    pub(super) const SIZE: wgpu::BufferSize =
        match wgpu::BufferSize::new(std::mem::size_of::<ViewportUniform>() as u64) {
            Some(size) => size,
            None => panic!("ViewportUniform is zero-sized"),
        };

    /// Zero-sized viewports are bumped to one pixel so the shader never
    /// divides by zero.
    pub(super) fn new(viewport: Viewport) -> Self {
        Self {
            size: [viewport.width.max(1.0), viewport.height.max(1.0)],
            _pad: [0.0; 2],
        }
    }

    pub(super) fn layout_entry() -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: Some(Self::SIZE),
            },
            count: None,
        }
    }

    pub(super) fn create_buffer(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: Self::SIZE.get(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }
}

/// Unit quad corners, `[0, 1]²`. Instances stretch it in the vertex shader.
const CORNERS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
const CORNER_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

const CORNER_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

pub(super) struct UnitQuad {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
}

impl UnitQuad {
    pub(super) fn new(device: &wgpu::Device) -> Self {
        Self {
            vertices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("blacklabel unit quad"),
                contents: bytemuck::cast_slice(&CORNERS),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            indices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("blacklabel unit quad indices"),
                contents: bytemuck::cast_slice(&CORNER_INDICES),
                usage: wgpu::BufferUsages::INDEX,
            }),
        }
    }

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 2]>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &CORNER_ATTRS,
        }
    }
}

/// Per-instance vertex data that can be streamed through [`InstanceBuffer`].
pub(super) trait Instance: Pod {
    fn layout() -> wgpu::VertexBufferLayout<'static>;
}

/// Instance buffer that grows in powers of two and is never shrunk.
pub(super) struct InstanceBuffer<T> {
    label: &'static str,
    slot: Option<(wgpu::Buffer, usize)>,
    _marker: PhantomData<T>,
}

impl<T: Instance> InstanceBuffer<T> {
    pub(super) const fn new(label: &'static str) -> Self {
        Self { label, slot: None, _marker: PhantomData }
    }

    pub(super) fn upload(&mut self, ctx: &RenderCtx<'_>, items: &[T]) -> &wgpu::Buffer {
        let slot = match self.slot.take() {
            Some(slot) if slot.1 >= items.len() => slot,
            _ => {
                let cap = instance_capacity(items.len());
                let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(self.label),
                    size: (cap * std::mem::size_of::<T>()) as u64,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                (buffer, cap)
            }
        };
        let (buffer, _) = self.slot.insert(slot);
        ctx.queue.write_buffer(buffer, 0, bytemuck::cast_slice(items));
        buffer
    }
}

fn instance_capacity(required: usize) -> usize {
    required.next_power_of_two().max(64)
}

/// Overlay pipeline: unit quad at slot 0, `I` at slot 1, premultiplied alpha
/// blending, no depth.
pub(super) fn overlay_pipeline<I: Instance>(
    ctx: &RenderCtx<'_>,
    name: &str,
    wgsl: &str,
    bgl: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let device = ctx.device;
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(name),
        source: wgpu::ShaderSource::Wgsl(wgsl.into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(name),
        bind_group_layouts: &[bgl],
        immediate_size: 0,
    });

    let premultiplied = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(name),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[UnitQuad::layout(), I::layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.surface_format,
                blend: Some(wgpu::BlendState { color: premultiplied, alpha: premultiplied }),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Records one instanced draw of `count` quads on top of the current target
/// contents.
pub(super) fn draw_overlay(
    target: &mut RenderTarget<'_>,
    name: &str,
    pipeline: &wgpu::RenderPipeline,
    bind_group: &wgpu::BindGroup,
    quad: &UnitQuad,
    instances: &wgpu::Buffer,
    count: usize,
) {
    let mut pass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(name),
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

    pass.set_pipeline(pipeline);
    pass.set_bind_group(0, bind_group, &[]);
    pass.set_vertex_buffer(0, quad.vertices.slice(..));
    pass.set_vertex_buffer(1, instances.slice(..));
    pass.set_index_buffer(quad.indices.slice(..), wgpu::IndexFormat::Uint16);
    pass.draw_indexed(0..CORNER_INDICES.len() as u32, 0, 0..count as u32);
}

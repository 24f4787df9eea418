use bytemuck::{Pod, Zeroable};

use crate::coords::{Rect, Viewport};
use crate::draw::{DrawCmd, DrawList};
use crate::render::{RenderCtx, RenderTarget};

use super::common::{Instance, InstanceBuffer, UnitQuad, ViewportUniform, draw_overlay, overlay_pipeline};

/// GPU state for one surface format. Rebuilt wholesale when the format
/// changes.
struct RectGpu {
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    viewport_ubo: wgpu::Buffer,
    quad: UnitQuad,
}

impl RectGpu {
    fn build(ctx: &RenderCtx<'_>) -> Self {
        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("blacklabel rect bgl"),
            entries: &[ViewportUniform::layout_entry()],
        });
        let pipeline = overlay_pipeline::<RectInstance>(
            ctx,
            "blacklabel rect pipeline",
            include_str!("shaders/rect.wgsl"),
            &bgl,
        );

        let viewport_ubo = ViewportUniform::create_buffer(ctx.device, "blacklabel rect viewport");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("blacklabel rect bind group"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        Self {
            format: ctx.surface_format,
            pipeline,
            bind_group,
            viewport_ubo,
            quad: UnitQuad::new(ctx.device),
        }
    }
}

/// Solid rectangle renderer for the page chrome.
///
/// Rects arrive in logical pixels, are clipped to the viewport on the CPU and
/// mapped to NDC in the vertex shader. Colors are premultiplied.
pub struct RectRenderer {
    gpu: Option<RectGpu>,
    instances: InstanceBuffer<RectInstance>,
}

impl Default for RectRenderer {
    fn default() -> Self {
        Self { gpu: None, instances: InstanceBuffer::new("blacklabel rect instances") }
    }
}

impl RectRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws every visible `DrawCmd::Rect` in `draw_list`, back to front, in
    /// a single instanced call.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
    ) {
        let rects = collect_instances(draw_list, ctx.viewport);
        if rects.is_empty() {
            return;
        }

        if self.gpu.as_ref().map(|g| g.format) != Some(ctx.surface_format) {
            self.gpu = Some(RectGpu::build(ctx));
        }
        let Some(gpu) = self.gpu.as_ref() else { return };

        let uniform = ViewportUniform::new(ctx.viewport);
        ctx.queue.write_buffer(&gpu.viewport_ubo, 0, bytemuck::bytes_of(&uniform));
        let instances = self.instances.upload(ctx, &rects);

        draw_overlay(
            target,
            "blacklabel rect pass",
            &gpu.pipeline,
            &gpu.bind_group,
            &gpu.quad,
            instances,
            rects.len(),
        );
    }
}

/// Rect commands in paint order, clipped to the viewport. Rects that end up
/// empty or fully transparent are dropped.
fn collect_instances(draw_list: &mut DrawList, viewport: Viewport) -> Vec<RectInstance> {
    let bounds = Rect::from_viewport(viewport);
    draw_list
        .iter_in_paint_order()
        .filter_map(|item| match &item.cmd {
            DrawCmd::Rect(cmd) if cmd.color.a > 0.0 => {
                let r = cmd.rect.intersect(bounds)?;
                Some(RectInstance {
                    origin: [r.origin.x, r.origin.y],
                    size: [r.size.x, r.size.y],
                    color: cmd.color.to_array(),
                })
            }
            _ => None,
        })
        .collect()
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct RectInstance {
    origin: [f32; 2],
    size: [f32; 2],
    color: [f32; 4],
}

const RECT_ATTRS: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![1 => Float32x2, 2 => Float32x2, 3 => Float32x4];

impl Instance for RectInstance {
    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RectInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &RECT_ATTRS,
        }
    }
}

//! Text overlay: fontdue lays out each run, glyphs are cached in an atlas and
//! drawn as textured quads tinted with the run color.

mod atlas;

use bytemuck::{Pod, Zeroable};
use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

use crate::draw::shapes::text::TextCmd;
use crate::draw::{DrawCmd, DrawList};
use crate::render::{RenderCtx, RenderTarget};
use crate::text::FontSystem;

use self::atlas::GlyphAtlas;
use super::common::{Instance, InstanceBuffer, UnitQuad, ViewportUniform, draw_overlay, overlay_pipeline};

struct TextGpu {
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    viewport_ubo: wgpu::Buffer,
    quad: UnitQuad,
}

impl TextGpu {
    fn build(ctx: &RenderCtx<'_>, atlas: &GlyphAtlas) -> Self {
        let device = ctx.device;
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("blacklabel text bgl"),
            entries: &[
                ViewportUniform::layout_entry(),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let pipeline = overlay_pipeline::<GlyphInstance>(
            ctx,
            "blacklabel text pipeline",
            include_str!("../shaders/text.wgsl"),
            &bgl,
        );

        let viewport_ubo = ViewportUniform::create_buffer(device, "blacklabel text viewport");
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("blacklabel text bind group"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: viewport_ubo.as_entire_binding() },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(atlas.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(atlas.sampler()),
                },
            ],
        });

        Self {
            format: ctx.surface_format,
            pipeline,
            bind_group,
            viewport_ubo,
            quad: UnitQuad::new(device),
        }
    }
}

/// Renderer for `DrawCmd::Text`.
///
/// The atlas lives as long as the renderer; a surface format change only
/// rebuilds the pipeline.
pub struct TextRenderer {
    atlas: Option<GlyphAtlas>,
    gpu: Option<TextGpu>,
    instances: InstanceBuffer<GlyphInstance>,
    layout: Layout<()>,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            atlas: None,
            gpu: None,
            instances: InstanceBuffer::new("blacklabel glyph instances"),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws every `DrawCmd::Text` in `draw_list`, back to front. Runs that
    /// name a font `fonts` does not know are skipped with a warning.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        fonts: &FontSystem,
    ) {
        let runs: Vec<TextCmd> = draw_list
            .iter_in_paint_order()
            .filter_map(|item| match &item.cmd {
                DrawCmd::Text(run) if run.color.a > 0.0 && !run.text.is_empty() => {
                    Some(run.clone())
                }
                _ => None,
            })
            .collect();
        if runs.is_empty() {
            return;
        }

        let atlas = self.atlas.get_or_insert_with(|| GlyphAtlas::new(ctx.device));
        let mut glyphs = Vec::new();
        for run in &runs {
            let Some(font) = fonts.get(run.font) else {
                log::warn!("text run uses unknown {:?}; skipped", run.font);
                continue;
            };
            for placed in place_run(&mut self.layout, font, run) {
                let Some(uv) = atlas.lookup(ctx.queue, font, placed.key) else { continue };
                glyphs.push(GlyphInstance {
                    dst_min: placed.min,
                    dst_max: placed.max,
                    uv_min: uv.min,
                    uv_max: uv.max,
                    color: run.color.to_array(),
                });
            }
        }
        if glyphs.is_empty() {
            return;
        }

        if self.gpu.as_ref().map(|g| g.format) != Some(ctx.surface_format) {
            self.gpu = Some(TextGpu::build(ctx, atlas));
        }
        let Some(gpu) = self.gpu.as_ref() else { return };

        let uniform = ViewportUniform::new(ctx.viewport);
        ctx.queue.write_buffer(&gpu.viewport_ubo, 0, bytemuck::bytes_of(&uniform));
        let instances = self.instances.upload(ctx, &glyphs);

        draw_overlay(
            target,
            "blacklabel text pass",
            &gpu.pipeline,
            &gpu.bind_group,
            &gpu.quad,
            instances,
            glyphs.len(),
        );
    }
}

/// A laid-out glyph in logical pixels.
struct PlacedGlyph {
    key: GlyphRasterConfig,
    min: [f32; 2],
    max: [f32; 2],
}

/// Lays `run` out at its origin, wrapping at `max_width`. Whitespace and
/// other blank glyphs are left out.
fn place_run(layout: &mut Layout<()>, font: &fontdue::Font, run: &TextCmd) -> Vec<PlacedGlyph> {
    layout.reset(&LayoutSettings {
        x: run.origin.x,
        y: run.origin.y,
        max_width: run.max_width,
        ..LayoutSettings::default()
    });
    layout.append(&[font], &TextStyle::new(&run.text, run.size, 0));

    layout
        .glyphs()
        .iter()
        .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
        .map(|g| PlacedGlyph {
            key: g.key,
            min: [g.x, g.y],
            max: [g.x + g.width as f32, g.y + g.height as f32],
        })
        .collect()
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlyphInstance {
    dst_min: [f32; 2],
    dst_max: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    color: [f32; 4],
}

const GLYPH_ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    1 => Float32x2,
    2 => Float32x2,
    3 => Float32x2,
    4 => Float32x2,
    5 => Float32x4
];

impl Instance for GlyphInstance {
    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &GLYPH_ATTRS,
        }
    }
}

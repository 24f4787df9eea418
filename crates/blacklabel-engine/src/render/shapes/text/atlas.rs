//! Glyph atlas: one R8 coverage texture filled shelf by shelf as glyphs are
//! first drawn.

use std::collections::HashMap;

use fontdue::layout::GlyphRasterConfig;

const ATLAS_SIZE: u32 = 2048;

/// Texels left empty around every glyph so linear filtering never bleeds a
/// neighbour in.
const GUTTER: u32 = 1;

/// Row allocator. Once a glyph fails to fit it stays full, so a burst of
/// oversize glyphs cannot scatter later ones across half-filled rows.
#[derive(Debug, Clone, PartialEq)]
struct Shelves {
    size: u32,
    x: u32,
    y: u32,
    tallest: u32,
    exhausted: bool,
}

impl Shelves {
    fn new(size: u32) -> Self {
        Self { size, x: GUTTER, y: GUTTER, tallest: 0, exhausted: false }
    }

    fn allocate(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if self.exhausted {
            return None;
        }
        let size = self.size;
        let fits_row = |x: u32| x + w + GUTTER <= size;

        if !fits_row(self.x) {
            self.y += self.tallest + GUTTER;
            self.x = GUTTER;
            self.tallest = 0;
        }
        if !fits_row(self.x) || self.y + h + GUTTER > size {
            self.exhausted = true;
            return None;
        }

        let corner = (self.x, self.y);
        self.x += w + GUTTER;
        self.tallest = self.tallest.max(h);
        Some(corner)
    }
}

/// Normalized texture coordinates of a cached glyph.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(super) struct GlyphUv {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl GlyphUv {
    fn of(x: u32, y: u32, w: u32, h: u32, atlas: u32) -> Self {
        let s = atlas as f32;
        Self {
            min: [x as f32 / s, y as f32 / s],
            max: [(x + w) as f32 / s, (y + h) as f32 / s],
        }
    }
}

pub(super) struct GlyphAtlas {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    shelves: Shelves,
    cached: HashMap<GlyphRasterConfig, GlyphUv>,
    reported_full: bool,
}

impl GlyphAtlas {
    pub(super) fn new(device: &wgpu::Device) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("blacklabel glyph atlas"),
            size: wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("blacklabel glyph sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            texture,
            sampler,
            shelves: Shelves::new(ATLAS_SIZE),
            cached: HashMap::new(),
            reported_full: false,
        }
    }

    pub(super) fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub(super) fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    /// Atlas slot for `key`, rasterizing and uploading the glyph on first
    /// use. `None` for blank glyphs and once the atlas is full.
    pub(super) fn lookup(
        &mut self,
        queue: &wgpu::Queue,
        font: &fontdue::Font,
        key: GlyphRasterConfig,
    ) -> Option<GlyphUv> {
        if let Some(uv) = self.cached.get(&key) {
            return Some(*uv);
        }

        let (metrics, coverage) = font.rasterize_config(key);
        let (w, h) = (metrics.width as u32, metrics.height as u32);
        if w == 0 || h == 0 {
            return None;
        }

        let Some((x, y)) = self.shelves.allocate(w, h) else {
            if !self.reported_full {
                log::warn!("glyph atlas full ({ATLAS_SIZE}px); new glyphs are dropped");
                self.reported_full = true;
            }
            return None;
        };

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            &coverage,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
        );

        let uv = GlyphUv::of(x, y, w, h, ATLAS_SIZE);
        self.cached.insert(key, uv);
        Some(uv)
    }
}

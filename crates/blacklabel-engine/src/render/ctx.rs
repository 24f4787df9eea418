use crate::coords::{Rect, Viewport};

/// Renderer-facing context: device/queue, surface format, and the frame's
/// logical viewport with its physical mapping.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub viewport: Viewport, // logical px
    pub scale_factor: f32,
    /// Swapchain size in physical pixels.
    pub surface_size: (u32, u32),
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
        scale_factor: f32,
        surface_size: (u32, u32),
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            viewport,
            scale_factor,
            surface_size,
        }
    }

    /// Converts a logical rect into a physical `(x, y, w, h)` region clamped
    /// to the surface. `None` when nothing of it is visible.
    pub fn physical_region(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        physical_region(rect, self.scale_factor, self.surface_size)
    }
}

fn physical_region(rect: Rect, scale: f32, surface: (u32, u32)) -> Option<(u32, u32, u32, u32)> {
    let (sw, sh) = surface;
    let r = rect.normalized();

    let x0 = ((r.origin.x * scale).max(0.0) as u32).min(sw);
    let y0 = ((r.origin.y * scale).max(0.0) as u32).min(sh);
    let x1 = (((r.origin.x + r.size.x) * scale).max(0.0) as u32).min(sw);
    let y1 = (((r.origin.y + r.size.y) * scale).max(0.0) as u32).min(sh);

    let (w, h) = (x1.saturating_sub(x0), y1.saturating_sub(y0));
    if w == 0 || h == 0 { None } else { Some((x0, y0, w, h)) }
}

/// Target for drawing (encoder + color view).
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_scales_to_physical_pixels() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(physical_region(r, 2.0, (1000, 1000)), Some((20, 40, 200, 100)));
    }

    #[test]
    fn region_is_clamped_to_surface() {
        let r = Rect::new(-10.0, 0.0, 2000.0, 80.0);
        assert_eq!(physical_region(r, 1.0, (800, 600)), Some((0, 0, 800, 80)));
    }

    #[test]
    fn zero_height_region_is_skipped() {
        let r = Rect::new(0.0, 0.0, 800.0, 0.0);
        assert_eq!(physical_region(r, 1.0, (800, 600)), None);
    }
}

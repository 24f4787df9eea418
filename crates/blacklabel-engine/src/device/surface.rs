use winit::dpi::PhysicalSize;

/// What the caller should do after a failed frame acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The surface was reconfigured; the next frame can proceed.
    Reconfigured,
    SkipFrame,
    /// Unrecoverable; the window should close.
    Fatal,
}

const SRGB_FORMATS: [wgpu::TextureFormat; 2] = [
    wgpu::TextureFormat::Bgra8UnormSrgb,
    wgpu::TextureFormat::Rgba8UnormSrgb,
];

/// An sRGB format when asked for and offered, otherwise the surface's
/// first choice. `None` when the surface offers nothing.
pub(super) fn choose_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let srgb = SRGB_FORMATS.into_iter().find(|f| caps.formats.contains(f));
    match srgb {
        Some(f) if prefer_srgb => Some(f),
        _ => caps.formats.first().copied(),
    }
}

pub(super) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

fn is_drawable(size: PhysicalSize<u32>) -> bool {
    size.width > 0 && size.height > 0
}

/// Applies a window resize to `config`, reconfiguring the surface unless the
/// new size is zero (minimized), which wgpu rejects.
pub(super) fn resize(
    surface: &wgpu::Surface<'_>,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
) {
    if !is_drawable(size) {
        log::debug!("window is {}x{}; surface left as is", size.width, size.height);
        return;
    }
    config.width = size.width;
    config.height = size.height;
    surface.configure(device, config);
}

pub(super) fn recover(
    surface: &wgpu::Surface<'_>,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    let action = classify(&err);
    match action {
        SurfaceErrorAction::Reconfigured if is_drawable(size) => surface.configure(device, config),
        SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
            log::debug!("surface: {err}; skipping frame");
        }
        SurfaceErrorAction::Fatal => log::error!("surface: {err}"),
    }
    action
}

fn classify(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

/// Device and surface settings for the page window.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// The page is light; low power keeps laptops on the integrated GPU.
    pub power_preference: wgpu::PowerPreference,
    pub prefer_srgb: bool,
    /// `Fifo` paces redraws, and with them animation frames, to the display.
    pub present_mode: wgpu::PresentMode,
    /// Used when the surface supports it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::LowPower,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            desired_maximum_frame_latency: 2,
        }
    }
}

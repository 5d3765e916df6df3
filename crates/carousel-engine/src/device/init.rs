/// Device and swapchain options, consumed by `Gpu::new`.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Pick an sRGB surface format when offered.
    pub prefer_srgb: bool,

    /// FIFO paces continuous rendering to the display refresh.
    pub present_mode: wgpu::PresentMode,

    /// Ignored when the surface does not support it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,

    /// Downlevel WebGL2 set by default (GLES-class devices).
    pub required_limits: wgpu::Limits,

    /// Hint only.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
            desired_maximum_frame_latency: 2,
        }
    }
}

/// An acquired swapchain image plus the encoder recording into it.
///
/// Acquire, record, and hand back to `Gpu::submit` within one callback;
/// no new image can be acquired while this is alive.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

use anyhow::Result;
use winit::event::WindowEvent;

use crate::device::Gpu;
use crate::input::InputEvent;
use crate::window::RuntimeCtx;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// Every callback runs on the event-loop thread, which is also the only
/// thread that touches the GPU.
pub trait App {
    /// Called once the window and its GPU context exist, before the first
    /// frame. GPU resources (pipelines, textures) are created here.
    ///
    /// An error is fatal: it is logged and the runtime exits.
    fn on_surface_ready(&mut self, gpu: &Gpu<'_>, runtime: &mut RuntimeCtx) -> Result<()> {
        let _ = (gpu, runtime);
        Ok(())
    }

    /// Called when the platform destroys the surface (e.g. the app is
    /// suspended). GPU resources created in `on_surface_ready` must be dropped;
    /// they are rebuilt on the next `on_surface_ready`.
    fn on_surface_lost(&mut self) {}

    /// Called for every translated input event, as it arrives.
    ///
    /// Use `runtime.request_redraw()` to get a frame in on-demand mode.
    fn on_input(&mut self, event: &InputEvent, runtime: &mut RuntimeCtx) -> AppControl {
        let _ = (event, runtime);
        AppControl::Continue
    }

    /// Called for raw window events.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}

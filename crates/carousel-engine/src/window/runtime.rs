use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, MouseButton as WinitMouseButton, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::{
    InputEvent, InputState, Key, KeyState, MouseButton, MouseButtonState,
    PointerButtonEvent, PointerMoveEvent,
};
use crate::time::{FrameClock, FrameTime};

use super::RenderMode;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub render_mode: RenderMode,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "carousel".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            render_mode: RenderMode::Continuous,
        }
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    /// Switches between redrawing every refresh and redrawing on request.
    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.commands.push(Command::SetRenderMode(mode));
    }

    /// Schedules one redraw. Multiple requests before the next frame coalesce.
    pub fn request_redraw(&mut self) {
        self.commands.push(Command::RequestRedraw);
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Command {
    SetRenderMode(RenderMode),
    RequestRedraw,
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs the event loop until the window closes or the app exits.
    ///
    /// A failure in `App::on_surface_ready` ends the loop and is returned here.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    render_mode: RenderMode,
    exit_requested: bool,
    fatal: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        let render_mode = config.render_mode;
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            render_mode,
            exit_requested: false,
            fatal: None,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    fn request_redraw(&self) {
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    /// Creates the window and GPU context, then lets the app build its GPU
    /// resources against them.
    fn create_window_entry(
        &mut self,
        event_loop: &ActiveEventLoop,
        runtime_ctx: &mut RuntimeCtx,
    ) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
            .try_build()
            .context("GPU initialization failed for window")?;

        let app = &mut self.app;
        entry
            .with_gpu(|gpu| app.on_surface_ready(gpu, runtime_ctx))
            .context("surface initialization failed")?;

        self.entry = Some(entry);
        Ok(())
    }

    fn destroy_window_entry(&mut self) {
        if self.entry.is_some() {
            // App resources go first; they were created against this device.
            self.app.on_surface_lost();
            self.entry = None;
            log::info!("surface released");
        }
    }

    fn set_render_mode(&mut self, mode: RenderMode) {
        if self.render_mode == mode {
            return;
        }

        log::info!("render mode: {mode:?}");
        self.render_mode = mode;

        if mode.is_continuous() {
            // Idle time spent on-demand must not count as elapsed frame time.
            if let Some(entry) = self.entry.as_mut() {
                entry.with_clock_mut(|c| c.reset());
            }
            self.request_redraw();
        }
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, mut ctx: RuntimeCtx) {
        let mut redraw = false;

        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::SetRenderMode(mode) => self.set_render_mode(mode),
                Command::RequestRedraw => redraw = true,
                Command::Exit => self.request_exit(),
            }
        }

        if redraw {
            self.request_redraw();
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }

    fn draw_frame(&mut self, window_id: WindowId, runtime_ctx: &mut RuntimeCtx) -> AppControl {
        let (app, entry) = (&mut self.app, self.entry.as_mut());
        let Some(entry) = entry else {
            return AppControl::Continue;
        };

        let mut app_control = AppControl::Continue;

        entry.with_mut(|fields| {
            let ft: FrameTime = fields.clock.tick();
            log::trace!("frame {} dt={:.4}", ft.frame_index, ft.dt);

            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: window_id,
                    window: fields.window,
                },
                gpu: fields.gpu,
                time: ft,
                runtime: &mut *runtime_ctx,
            };

            app_control = app.on_frame(&mut ctx);
        });

        app_control
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        let mut runtime_ctx = RuntimeCtx::default();
        if let Err(e) = self.create_window_entry(event_loop, &mut runtime_ctx) {
            log::error!("failed to create window: {e:#}");
            self.fatal = Some(e);
            self.request_exit();
            event_loop.exit();
            return;
        }

        log::info!("surface ready ({:?})", self.render_mode);
        runtime_ctx.request_redraw();
        self.apply_commands(event_loop, runtime_ctx);
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        // The platform destroys the native surface; mobile targets resume with a new one.
        self.destroy_window_entry();
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous mode: FIFO presentation paces these requests to the display refresh.
        if self.render_mode.is_continuous() {
            self.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let mut runtime_ctx = RuntimeCtx::default();

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, entry) = (&mut self.app, self.entry.as_mut());
        let Some(entry) = entry else {
            return;
        };

        let mut control = AppControl::Continue;

        entry.with_mut(|fields| {
            if let Some(ev) = translate_input_event(fields.window, fields.input_state, &event) {
                fields.input_state.apply_event(&ev);

                if app.on_input(&ev, &mut runtime_ctx) == AppControl::Exit {
                    control = AppControl::Exit;
                }
            }

            if app.on_window_event(&event) == AppControl::Exit {
                control = AppControl::Exit;
            }
        });

        if control == AppControl::Exit {
            runtime_ctx.exit();
        }

        // Runtime-managed window lifecycle / resize / redraw handling.
        match &event {
            WindowEvent::CloseRequested => {
                self.destroy_window_entry();
                self.request_exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                }
                runtime_ctx.request_redraw();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.entry.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                }
                runtime_ctx.request_redraw();
            }

            WindowEvent::Occluded(false) => runtime_ctx.request_redraw(),

            WindowEvent::RedrawRequested => {
                if self.draw_frame(window_id, &mut runtime_ctx) == AppControl::Exit {
                    runtime_ctx.exit();
                }
            }

            _ => {}
        }

        self.apply_commands(event_loop, runtime_ctx);
    }
}

fn translate_input_event(
    window: &Window,
    state: &InputState,
    event: &WindowEvent,
) -> Option<InputEvent> {
    match event {
        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeft),

        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = to_logical_f32(window, *position);
            Some(InputEvent::PointerMoved(PointerMoveEvent { x, y }))
        }

        WindowEvent::MouseInput { state: st, button, .. } => {
            let (x, y) = state.pointer.unwrap_or((0.0, 0.0));
            Some(InputEvent::PointerButton(PointerButtonEvent {
                button: map_mouse_button(*button),
                state: map_button_state(*st),
                x,
                y,
            }))
        }

        // Touch contacts behave like a held left button.
        WindowEvent::Touch(touch) => {
            let (x, y) = to_logical_f32(window, touch.location);
            let state = match touch.phase {
                TouchPhase::Started => MouseButtonState::Pressed,
                TouchPhase::Moved => return Some(InputEvent::PointerMoved(PointerMoveEvent { x, y })),
                TouchPhase::Ended | TouchPhase::Cancelled => MouseButtonState::Released,
            };
            Some(InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state,
                x,
                y,
            }))
        }

        WindowEvent::KeyboardInput { event, .. } => {
            let state = match event.state {
                ElementState::Pressed => KeyState::Pressed,
                ElementState::Released => KeyState::Released,
            };

            Some(InputEvent::Key {
                key: map_key(event.physical_key),
                state,
                repeat: event.repeat,
            })
        }

        _ => None,
    }
}

fn to_logical_f32(window: &Window, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let scale = window.scale_factor();
    let logical = pos.to_logical::<f64>(scale);
    (logical.x as f32, logical.y as f32)
}

fn map_button_state(st: ElementState) -> MouseButtonState {
    match st {
        ElementState::Pressed => MouseButtonState::Pressed,
        ElementState::Released => MouseButtonState::Released,
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        // X1 / X2 side buttons.
        WinitMouseButton::Back => MouseButton::Other(3),
        WinitMouseButton::Forward => MouseButton::Other(4),
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

fn map_key(pk: PhysicalKey) -> Key {
    match pk {
        PhysicalKey::Code(code) => match code {
            KeyCode::Escape => Key::Escape,
            KeyCode::Enter => Key::Enter,
            KeyCode::Space => Key::Space,
            KeyCode::ArrowLeft => Key::ArrowLeft,
            KeyCode::ArrowRight => Key::ArrowRight,
            KeyCode::KeyR => Key::R,
            other => Key::Unknown(other as u32),
        },

        // NativeKeyCode is not a u32 in winit 0.30; preserve "unknown" without a stable numeric.
        PhysicalKey::Unidentified(_) => Key::Unknown(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_buffered_in_order() {
        let mut ctx = RuntimeCtx::default();
        ctx.set_render_mode(RenderMode::OnDemand);
        ctx.request_redraw();
        ctx.exit();

        assert_eq!(
            ctx.commands,
            vec![
                Command::SetRenderMode(RenderMode::OnDemand),
                Command::RequestRedraw,
                Command::Exit,
            ]
        );
    }

    #[test]
    fn default_config_renders_continuously() {
        assert_eq!(RuntimeConfig::default().render_mode, RenderMode::Continuous);
    }

    #[test]
    fn named_keys_map_to_engine_keys() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Space)), Key::Space);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyR)), Key::R);
        assert!(matches!(map_key(PhysicalKey::Code(KeyCode::KeyQ)), Key::Unknown(_)));
    }
}

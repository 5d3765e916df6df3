use anyhow::{Context, Result};

use carousel_engine::camera::{OrbitCamera, ViewProjectionSource};
use carousel_engine::coords::Viewport;
use carousel_engine::core::{App, AppControl, FrameCtx};
use carousel_engine::device::Gpu;
use carousel_engine::input::{InputEvent, Key, KeyState};
use carousel_engine::paint::Color;
use carousel_engine::render::cylinder::CylinderRenderer;
use carousel_engine::surface::InteractiveSurface;
use carousel_engine::window::RuntimeCtx;

use crate::config::ViewerConfig;
use crate::faces;

/// Logical pixels of drag simulated by one arrow-key press.
const KEY_NUDGE_PX: f32 = 25.0;

pub struct CarouselApp {
    config: ViewerConfig,
    shader_source: String,
    surface: InteractiveSurface,
    camera: OrbitCamera,
    mesh: Option<CylinderRenderer>,
    clear: Color,
    warned_draw: bool,
}

impl CarouselApp {
    pub fn new(config: ViewerConfig) -> Result<Self> {
        let shader_source = config.shader_source()?.into_owned();
        Ok(Self {
            surface: InteractiveSurface::new(config.surface),
            camera: config.camera,
            shader_source,
            config,
            mesh: None,
            clear: Color::from_srgb_u8(18, 20, 26, 255),
            warned_draw: false,
        })
    }

    fn on_key(&mut self, key: Key, runtime: &mut RuntimeCtx) -> AppControl {
        match key {
            Key::Escape => return AppControl::Exit,
            Key::Space | Key::Enter => {
                let mode = self.surface.toggle_rotation_mode();
                log::info!("render mode: {mode:?}");
                runtime.set_render_mode(mode);
            }
            Key::ArrowLeft => self.nudge(-KEY_NUDGE_PX, runtime),
            Key::ArrowRight => self.nudge(KEY_NUDGE_PX, runtime),
            Key::R => {
                self.surface.rotation().set_angle(self.config.surface.initial_angle);
                runtime.request_redraw();
            }
            Key::Unknown(_) => {}
        }
        AppControl::Continue
    }

    fn nudge(&mut self, dx: f32, runtime: &mut RuntimeCtx) {
        if self.surface.on_drag(dx) {
            runtime.request_redraw();
        }
    }
}

impl App for CarouselApp {
    fn on_surface_ready(&mut self, gpu: &Gpu<'_>, runtime: &mut RuntimeCtx) -> Result<()> {
        let size = gpu.size();
        let ctx = gpu.render_ctx(Viewport::new(size.width as f32, size.height as f32));

        let mut mesh = CylinderRenderer::initialize(&ctx, self.config.layout, &self.shader_source)
            .context("building cylinder shader program")?;
        mesh.set_texture_subsample(self.config.texture_subsample);

        let images = faces::load_faces(&self.config.face_paths, self.config.layout.faces())
            .context("loading face images")?;
        mesh.load_textures(&ctx, images)
            .context("uploading face textures")?;

        self.mesh = Some(mesh);
        self.warned_draw = false;

        runtime.set_render_mode(self.surface.render_mode());
        runtime.request_redraw();
        Ok(())
    }

    fn on_surface_lost(&mut self) {
        log::debug!("surface lost; dropping cylinder resources");
        self.mesh = None;
    }

    fn on_input(&mut self, event: &InputEvent, runtime: &mut RuntimeCtx) -> AppControl {
        if let InputEvent::Key { key, state: KeyState::Pressed, repeat } = event {
            // Held arrows keep nudging; other keys act once per press.
            if !*repeat || matches!(key, Key::ArrowLeft | Key::ArrowRight) {
                return self.on_key(*key, runtime);
            }
            return AppControl::Continue;
        }

        if self.surface.handle_input(event) {
            runtime.request_redraw();
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let angle = self.surface.advance(ctx.time.dt);
        let aspect = ctx.window.viewport().aspect();
        let view_projection = self.camera.view_projection(aspect);

        let mesh = &mut self.mesh;
        let warned = &mut self.warned_draw;
        ctx.render(self.clear, |rctx, target| {
            let Some(mesh) = mesh.as_mut() else { return };
            if let Err(err) = mesh.draw(rctx, target, view_projection, angle) {
                if !*warned {
                    log::warn!("cylinder draw skipped: {err}");
                    *warned = true;
                }
            }
        })
    }
}

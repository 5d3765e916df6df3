//! Interactive surface: pointer drags and auto-rotation driving one angle.
//!
//! The surface does not own the window; it turns input into rotation changes
//! and tells the caller which render mode and redraws those changes need.

mod drag;
mod rotation;

pub use drag::DragTracker;
pub use rotation::RotationHandle;

use log::debug;

use crate::input::{InputEvent, MouseButton, MouseButtonState};
use crate::window::RenderMode;

/// Degrees of rotation per logical pixel of horizontal drag.
pub const TOUCH_SCALE_FACTOR: f32 = 180.0 / 500.0;

/// Auto-rotation speed in degrees per second.
pub const DEFAULT_AUTO_ROTATE_SPEED: f32 = 30.0;

#[derive(Debug, Clone, Copy)]
pub struct SurfaceConfig {
    pub touch_scale: f32,
    pub auto_rotate_speed: f32,
    pub initial_mode: RenderMode,
    pub initial_angle: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            touch_scale: TOUCH_SCALE_FACTOR,
            auto_rotate_speed: DEFAULT_AUTO_ROTATE_SPEED,
            initial_mode: RenderMode::Continuous,
            initial_angle: 0.0,
        }
    }
}

/// Input-side owner of the rotation state.
#[derive(Debug)]
pub struct InteractiveSurface {
    config: SurfaceConfig,
    rotation: RotationHandle,
    drag: DragTracker,
}

impl InteractiveSurface {
    pub fn new(config: SurfaceConfig) -> Self {
        let rotation =
            RotationHandle::new(config.initial_angle, config.initial_mode.is_continuous());
        Self {
            config,
            rotation,
            drag: DragTracker::new(),
        }
    }

    /// Handle for the render side. Shares state with this surface.
    pub fn rotation(&self) -> RotationHandle {
        self.rotation.clone()
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.rotation.angle()
    }

    #[inline]
    pub fn render_mode(&self) -> RenderMode {
        self.rotation.render_mode()
    }

    /// Applies a horizontal drag of `delta_x` logical pixels.
    ///
    /// Returns `true` when a redraw must be requested (on-demand mode).
    pub fn on_drag(&mut self, delta_x: f32) -> bool {
        let angle = self.rotation.add_degrees(delta_x * self.config.touch_scale);
        log::trace!("drag dx={delta_x} angle={angle}");
        !self.rotation.is_continuous()
    }

    pub fn on_pointer_pressed(&mut self, x: f32) {
        self.drag.pressed(x);
    }

    /// Returns `true` when the move rotated the mesh and a redraw is needed.
    pub fn on_pointer_moved(&mut self, x: f32) -> bool {
        match self.drag.moved(x) {
            Some(dx) => self.on_drag(dx),
            None => false,
        }
    }

    pub fn on_pointer_released(&mut self) {
        self.drag.released();
    }

    /// Routes a runtime input event. Returns `true` when a redraw is needed.
    ///
    /// Only the primary button drags; other buttons are ignored.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerMoved(ev) => self.on_pointer_moved(ev.x),
            InputEvent::PointerButton(ev) if ev.button == MouseButton::Left => {
                match ev.state {
                    MouseButtonState::Pressed => self.on_pointer_pressed(ev.x),
                    MouseButtonState::Released => self.on_pointer_released(),
                }
                false
            }
            InputEvent::PointerLeft | InputEvent::Focused(false) => {
                self.drag.cancel();
                false
            }
            _ => false,
        }
    }

    /// Enables or disables continuous rotation. Idempotent.
    ///
    /// Returns the render mode the runtime should switch to.
    pub fn set_rotation_mode(&mut self, continuous: bool) -> RenderMode {
        let was = self.rotation.set_continuous(continuous);
        if was != continuous {
            debug!("rotation mode -> {:?}", RenderMode::from_continuous(continuous));
        }
        RenderMode::from_continuous(continuous)
    }

    pub fn toggle_rotation_mode(&mut self) -> RenderMode {
        let next = !self.rotation.is_continuous();
        self.set_rotation_mode(next)
    }

    /// Time-based increment. No-op in on-demand mode.
    pub fn advance(&mut self, dt: f32) -> f32 {
        if self.rotation.is_continuous() && dt > 0.0 {
            self.rotation.add_degrees(self.config.auto_rotate_speed * dt)
        } else {
            self.rotation.angle()
        }
    }
}

impl Default for InteractiveSurface {
    fn default() -> Self {
        Self::new(SurfaceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{PointerButtonEvent, PointerMoveEvent};

    fn on_demand() -> InteractiveSurface {
        InteractiveSurface::new(SurfaceConfig {
            initial_mode: RenderMode::OnDemand,
            ..Default::default()
        })
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    // ── drag ─────────────────────────────────────────────────────────────

    #[test]
    fn two_drags_sum_to_expected_angle() {
        let mut s = on_demand();
        assert!(s.on_drag(50.0));
        assert!(s.on_drag(-20.0));
        assert!(approx(s.angle(), 10.8), "angle = {}", s.angle());
    }

    #[test]
    fn batching_does_not_change_result() {
        let mut split = on_demand();
        for dx in [3.0, 7.0, -2.0, 12.0, 5.0] {
            split.on_drag(dx);
        }

        let mut whole = on_demand();
        whole.on_drag(25.0);

        assert!(approx(split.angle(), whole.angle()));
    }

    #[test]
    fn drag_in_continuous_mode_needs_no_redraw_request() {
        let mut s = InteractiveSurface::default();
        assert!(!s.on_drag(10.0));
        assert!(approx(s.angle(), 3.6));
    }

    #[test]
    fn pointer_events_drive_drag() {
        let mut s = on_demand();

        let press = InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            x: 100.0,
            y: 0.0,
        });
        let mv = InputEvent::PointerMoved(PointerMoveEvent { x: 150.0, y: 4.0 });

        assert!(!s.handle_input(&press));
        assert!(s.handle_input(&mv));
        assert!(approx(s.angle(), 18.0));
    }

    #[test]
    fn secondary_button_does_not_drag() {
        let mut s = on_demand();
        s.handle_input(&InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Right,
            state: MouseButtonState::Pressed,
            x: 0.0,
            y: 0.0,
        }));
        assert!(!s.handle_input(&InputEvent::PointerMoved(PointerMoveEvent { x: 80.0, y: 0.0 })));
        assert_eq!(s.angle(), 0.0);
    }

    #[test]
    fn pointer_leaving_ends_drag() {
        let mut s = on_demand();
        s.on_pointer_pressed(0.0);
        s.handle_input(&InputEvent::PointerLeft);
        assert!(!s.on_pointer_moved(30.0));
    }

    // ── mode ─────────────────────────────────────────────────────────────

    #[test]
    fn set_mode_is_idempotent() {
        let mut s = on_demand();
        assert_eq!(s.set_rotation_mode(true), RenderMode::Continuous);
        assert_eq!(s.set_rotation_mode(true), RenderMode::Continuous);
        assert_eq!(s.render_mode(), RenderMode::Continuous);
    }

    #[test]
    fn toggle_flips_mode() {
        let mut s = InteractiveSurface::default();
        assert_eq!(s.toggle_rotation_mode(), RenderMode::OnDemand);
        assert_eq!(s.toggle_rotation_mode(), RenderMode::Continuous);
    }

    #[test]
    fn shared_handle_sees_mode_and_angle() {
        let mut s = on_demand();
        let h = s.rotation();
        s.set_rotation_mode(true);
        s.on_drag(100.0);
        assert!(h.is_continuous());
        assert!(approx(h.angle(), 36.0));
    }

    // ── advance ──────────────────────────────────────────────────────────

    #[test]
    fn advance_rotates_in_continuous_mode() {
        let mut s = InteractiveSurface::default();
        let a = s.advance(0.5);
        assert!(approx(a, 15.0));
    }

    #[test]
    fn advance_is_noop_on_demand() {
        let mut s = on_demand();
        s.on_drag(10.0);
        let before = s.angle();
        assert_eq!(s.advance(1.0), before);
    }

    #[test]
    fn advance_ignores_non_positive_dt() {
        let mut s = InteractiveSurface::default();
        assert_eq!(s.advance(0.0), 0.0);
        assert_eq!(s.advance(-1.0), 0.0);
    }
}

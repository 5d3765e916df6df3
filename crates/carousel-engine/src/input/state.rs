use super::types::InputEvent;

/// Last known pointer position.
///
/// Button events from winit carry no position, so the runtime stamps them
/// with `pointer`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Logical px; `None` while the pointer is outside the window.
    pub pointer: Option<(f32, f32)>,
}

impl InputState {
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::PointerMoved(mv) => self.pointer = Some((mv.x, mv.y)),
            InputEvent::PointerButton(b) => self.pointer = Some((b.x, b.y)),
            InputEvent::PointerLeft => self.pointer = None,
            InputEvent::Focused(_) | InputEvent::Key { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{
        Key, KeyState, MouseButton, MouseButtonState, PointerButtonEvent, PointerMoveEvent,
    };

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y })
    }

    #[test]
    fn pointer_follows_moves_and_buttons() {
        let mut state = InputState::default();

        state.apply_event(&moved(10.0, 4.0));
        assert_eq!(state.pointer, Some((10.0, 4.0)));

        state.apply_event(&InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            x: 12.0,
            y: 5.0,
        }));
        assert_eq!(state.pointer, Some((12.0, 5.0)));
    }

    #[test]
    fn leaving_forgets_pointer() {
        let mut state = InputState::default();

        state.apply_event(&moved(3.0, 0.0));
        state.apply_event(&InputEvent::PointerLeft);

        assert_eq!(state.pointer, None);
    }

    #[test]
    fn keys_and_focus_leave_pointer_alone() {
        let mut state = InputState::default();

        state.apply_event(&moved(7.0, 2.0));
        state.apply_event(&InputEvent::Key { key: Key::Space, state: KeyState::Pressed, repeat: false });
        state.apply_event(&InputEvent::Focused(false));

        assert_eq!(state.pointer, Some((7.0, 2.0)));
    }
}

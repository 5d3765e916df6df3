//! Input events and pointer state.
//!
//! The runtime translates winit events into [`InputEvent`]s; nothing here
//! depends on winit.

mod state;
mod types;

pub use state::InputState;
pub use types::{
    InputEvent, Key, KeyState, MouseButton, MouseButtonState, PointerButtonEvent,
    PointerMoveEvent,
};

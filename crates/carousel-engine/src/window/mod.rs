//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, and wires them to the GPU layer.

mod mode;
mod runtime;

pub use mode::RenderMode;
pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};

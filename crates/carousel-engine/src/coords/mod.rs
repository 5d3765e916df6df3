//! Coordinate types shared across the runtime and renderers.

mod viewport;

pub use viewport::Viewport;

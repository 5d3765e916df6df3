//! GPU rendering subsystem.
//!
//! Each renderer owns its GPU resources (pipelines, buffers, textures) and
//! records into a [`RenderTarget`] handed out by the frame context.
//!
//! Convention:
//! - right-handed world space, +Y up
//! - clip-space depth in `[0, 1]` (wgpu), depth test `Less` against a cleared 1.0

mod ctx;
pub mod cylinder;

pub use ctx::{RenderCtx, RenderTarget};

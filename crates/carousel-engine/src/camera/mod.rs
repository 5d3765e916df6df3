//! View-projection sources.
//!
//! The mesh renderer only consumes a combined view-projection matrix. Where
//! that matrix comes from (a fixed orbit, an external pose tracker) is decided
//! by whoever implements [`ViewProjectionSource`].

mod orbit;

pub use orbit::OrbitCamera;

use glam::Mat4;

/// Produces the camera view-projection matrix for a frame.
pub trait ViewProjectionSource {
    /// `aspect` is the viewport width / height.
    fn view_projection(&self, aspect: f32) -> Mat4;
}

/// A view-projection supplied from outside (e.g. a tracked pose), used as is.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FixedViewProjection(pub Mat4);

impl ViewProjectionSource for FixedViewProjection {
    fn view_projection(&self, _aspect: f32) -> Mat4 {
        self.0
    }
}

//! Faceted cylinder: `F` textured quads arranged around the Y axis.
//!
//! [`CylinderRenderer`] owns the GPU side (buffers, pipeline, one record per
//! face); [`CylinderLayout`] holds the pure geometry so transforms can be
//! checked without a device.

mod geometry;
mod renderer;
mod shader;
mod texture;

use thiserror::Error;

pub use geometry::{
    CylinderLayout, FaceDraw, DEFAULT_FACE_COUNT, DEFAULT_FACE_SCALE, MIN_FACE_COUNT,
    QUAD_POSITIONS, QUAD_TEXCOORDS, QUAD_VERTEX_COUNT,
};
pub use renderer::CylinderRenderer;
pub use shader::{validate as validate_shader, ShaderError, DEFAULT_SHADER, FRAGMENT_ENTRY, VERTEX_ENTRY};
pub use texture::{decode_face, open_face, prepare_face_image, FACE_TEXTURE_FORMAT};

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("a cylinder needs at least {MIN_FACE_COUNT} faces, got {faces}")]
    InvalidFaceCount { faces: usize },

    #[error("expected {expected} face images, got {actual}")]
    FaceCountMismatch { expected: usize, actual: usize },

    #[error("face textures are already loaded")]
    TexturesAlreadyLoaded,

    #[error("face textures have not been loaded")]
    TexturesNotLoaded,

    #[error("face {face}: image has zero size")]
    EmptyImage { face: usize },

    #[error("face {face}: failed to decode image")]
    Decode {
        face: usize,
        #[source]
        source: image::ImageError,
    },
}

//! CPU-side geometry: the quad literals and per-face transforms.

use glam::{Mat4, Vec3};

use super::MeshError;

pub const DEFAULT_FACE_COUNT: usize = 8;
pub const MIN_FACE_COUNT: usize = 3;
pub const DEFAULT_FACE_SCALE: f32 = 0.8;

/// Quad positions, triangle-strip order.
pub const QUAD_POSITIONS: [[f32; 3]; 4] = [
    [-1.0, -0.8, 0.0],
    [1.0, -0.8, 0.0],
    [-1.0, 0.8, 0.0],
    [1.0, 0.8, 0.0],
];

/// Texture coordinates matching [`QUAD_POSITIONS`]; v grows downwards.
pub const QUAD_TEXCOORDS: [[f32; 2]; 4] = [
    [0.0, 1.0],
    [1.0, 1.0],
    [0.0, 0.0],
    [1.0, 0.0],
];

pub const QUAD_VERTEX_COUNT: u32 = QUAD_POSITIONS.len() as u32;

/// Face count and uniform scale of the faceted cylinder.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CylinderLayout {
    faces: usize,
    scale: f32,
}

impl Default for CylinderLayout {
    fn default() -> Self {
        Self {
            faces: DEFAULT_FACE_COUNT,
            scale: DEFAULT_FACE_SCALE,
        }
    }
}

impl CylinderLayout {
    pub fn new(faces: usize) -> Result<Self, MeshError> {
        if faces < MIN_FACE_COUNT {
            return Err(MeshError::InvalidFaceCount { faces });
        }
        Ok(Self {
            faces,
            scale: DEFAULT_FACE_SCALE,
        })
    }

    #[inline]
    pub fn faces(&self) -> usize {
        self.faces
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Distance from the axis to each face so that adjacent unit-half-width
    /// quads meet edge to edge: `1 / tan(π / F)`.
    #[inline]
    pub fn radius(&self) -> f32 {
        1.0 / (std::f32::consts::PI / self.faces as f32).tan()
    }

    /// Yaw of `face` in degrees for a given rotation angle.
    #[inline]
    pub fn face_yaw_degrees(&self, face: usize, angle: f32) -> f32 {
        face as f32 * 360.0 / self.faces as f32 + angle
    }

    /// Model matrix: scale, then yaw about +Y, then push out along +Z.
    ///
    /// Composed as `S · R · T`, so the translation happens in the rotated,
    /// scaled frame.
    pub fn face_model(&self, face: usize, angle: f32) -> Mat4 {
        let yaw = self.face_yaw_degrees(face, angle).to_radians();
        Mat4::from_scale(Vec3::splat(self.scale))
            * Mat4::from_rotation_y(yaw)
            * Mat4::from_translation(Vec3::new(0.0, 0.0, self.radius()))
    }

    /// One entry per face, in face order.
    pub fn plan_frame(&self, view_projection: Mat4, angle: f32) -> Vec<FaceDraw> {
        (0..self.faces)
            .map(|face| FaceDraw {
                face,
                mvp: view_projection * self.face_model(face, angle),
            })
            .collect()
    }
}

/// One planned draw: which face texture to bind and the matrix to upload.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FaceDraw {
    pub face: usize,
    pub mvp: Mat4,
}

use glam::{Mat4, Vec3};

use super::ViewProjectionSource;

/// Perspective camera looking at a fixed target.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        // Far enough back to frame the whole default cylinder (radius ~1.93).
        Self {
            eye: Vec3::new(0.0, 1.5, 6.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl OrbitCamera {
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Right-handed perspective with wgpu's `[0, 1]` depth range.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), aspect, self.near, self.far)
    }
}

impl ViewProjectionSource for OrbitCamera {
    fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn clip_to_ndc(clip: Vec4) -> Vec3 {
        clip.truncate() / clip.w
    }

    #[test]
    fn target_projects_to_screen_center() {
        let cam = OrbitCamera::default();
        let ndc = clip_to_ndc(cam.view_projection(16.0 / 9.0) * Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn nearer_points_have_smaller_depth() {
        let cam = OrbitCamera::default();
        let vp = cam.view_projection(1.0);
        let near = clip_to_ndc(vp * Vec4::new(0.0, 0.0, 2.0, 1.0));
        let far = clip_to_ndc(vp * Vec4::new(0.0, 0.0, -2.0, 1.0));
        assert!(near.z < far.z);
    }

    #[test]
    fn fixed_source_ignores_aspect() {
        let m = Mat4::from_scale(Vec3::splat(2.0));
        let src = super::super::FixedViewProjection(m);
        assert_eq!(src.view_projection(0.5), m);
        assert_eq!(src.view_projection(3.0), m);
    }
}

use glam::{Mat4, Vec2, Vec3};
use parallax_engine::render::CameraUniform;

/// Parallax offset that chases a target with exponential damping.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct CameraRig {
    pub offset: Vec2,
}

impl CameraRig {
    /// Moves the offset toward `target` by `damping * dt` of the remaining gap.
    ///
    /// The step fraction is capped at 1 so a long frame lands exactly on the
    /// target instead of overshooting it.
    pub fn follow(&mut self, target: Vec2, damping: f32, dt: f32) {
        let k = (damping * dt).clamp(0.0, 1.0);
        self.offset += (target - self.offset) * k;
    }
}

/// Perspective camera looking down -Z with no rotation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, Vec3::NEG_Z, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform::new(self.view(), self.projection())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rig_converges_monotonically_without_overshoot() {
        let target = Vec2::new(0.1, -0.1);
        let mut rig = CameraRig::default();
        let mut prev_gap = target.length();

        for _ in 0..50 {
            rig.follow(target, 4.0, 0.016);
            let gap = (target - rig.offset).length();
            assert!(gap < prev_gap);
            assert!(rig.offset.x <= target.x && rig.offset.y >= target.y);
            prev_gap = gap;
        }

        assert!(rig.offset.x / target.x > 0.95);
        assert!(rig.offset.y / target.y > 0.95);
    }

    #[test]
    fn twenty_ticks_cover_the_expected_fraction() {
        let target = Vec2::new(0.1, -0.1);
        let mut rig = CameraRig::default();
        for _ in 0..20 {
            rig.follow(target, 4.0, 0.016);
        }
        let expected = 1.0 - (1.0f32 - 0.064).powi(20);
        assert!((rig.offset.x / target.x - expected).abs() < 1e-4);
    }

    #[test]
    fn long_frame_lands_on_target() {
        let mut rig = CameraRig::default();
        rig.follow(Vec2::new(0.3, 0.2), 4.0, 1.0);
        assert_eq!(rig.offset, Vec2::new(0.3, 0.2));
    }

    #[test]
    fn point_in_front_of_camera_projects_inside_clip_volume() {
        let cam = Camera {
            position: Vec3::new(0.0, -4.0, 6.0),
            fov_y: 35f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        };
        let clip = cam.view_proj() * Vec3::new(0.0, -4.0, 0.0).extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}

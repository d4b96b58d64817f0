use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Camera data shared by every 3D pipeline (bind group 0).
///
/// Layout (96 bytes):
///
///  offset  0  view_proj   mat4x4<f32>
///  offset 64  right       vec4<f32>   world-space camera right (billboards)
///  offset 80  up          vec4<f32>   world-space camera up (billboards)
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub right: [f32; 4],
    pub up: [f32; 4],
}

impl CameraUniform {
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        // Rows of the view rotation are the camera basis in world space.
        let inv = view.inverse();
        let right: Vec3 = inv.x_axis.truncate();
        let up: Vec3 = inv.y_axis.truncate();

        Self {
            view_proj: (projection * view).to_cols_array_2d(),
            right: right.extend(0.0).to_array(),
            up: up.extend(0.0).to_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translated_view_keeps_axis_aligned_basis() {
        let view = Mat4::from_translation(Vec3::new(-1.0, 2.0, -6.0));
        let cam = CameraUniform::new(view, Mat4::IDENTITY);
        assert_eq!(cam.right, [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(cam.up, [0.0, 1.0, 0.0, 0.0]);
    }
}

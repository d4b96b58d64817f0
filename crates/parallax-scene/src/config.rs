use glam::Vec3;

/// Every tunable constant of the scene.
///
/// Defaults reproduce the reference look: four meshes spaced four units apart,
/// alternating left/right, a 300-point particle cloud and a single white
/// directional light.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Vertical distance between consecutive mesh anchors (world units).
    pub section_spacing: f32,
    /// Horizontal offset of each mesh; even slots get `+x`, odd slots `-x`.
    pub mesh_offset_x: f32,

    pub particle_count: usize,
    /// Edge length of the square the particles are scattered over in X/Z.
    pub particle_spread: f32,
    pub particle_size: f32,

    /// Y rotation added to a mesh when its section becomes current (radians).
    pub spin_angle: f32,
    /// Duration of that spin (seconds).
    pub spin_duration: f32,

    /// Continuous rotation rates (radians per second).
    pub rotation_rate_x: f32,
    pub rotation_rate_y: f32,

    pub parallax_amplitude: f32,
    /// Exponential damping rate of the camera rig (per second).
    pub parallax_damping: f32,

    pub camera_fov_y_deg: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    pub camera_distance: f32,

    pub light_color: String,
    pub light_intensity: f32,
    pub light_position: Vec3,

    pub material_color: String,
    /// Draw the meshes as edges only. `W` toggles it at runtime.
    pub wireframe: bool,

    /// Pixels scrolled per wheel "line" notch.
    pub wheel_line_px: f32,
    /// Pixels scrolled per arrow key press.
    pub arrow_step_px: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            section_spacing: 4.0,
            mesh_offset_x: 2.0,

            particle_count: 300,
            particle_spread: 10.0,
            particle_size: 0.3,

            spin_angle: 3.0,
            spin_duration: 2.0,

            rotation_rate_x: 0.1,
            rotation_rate_y: 0.12,

            parallax_amplitude: 0.5,
            parallax_damping: 4.0,

            camera_fov_y_deg: 35.0,
            camera_near: 0.1,
            camera_far: 100.0,
            camera_distance: 6.0,

            light_color: "#ffffff".to_string(),
            light_intensity: 3.0,
            light_position: Vec3::new(1.0, 1.0, 0.0),

            material_color: "#ffeded".to_string(),
            wireframe: true,

            wheel_line_px: 100.0,
            arrow_step_px: 40.0,
        }
    }
}

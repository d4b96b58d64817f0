use glam::{EulerRot, Mat4, Vec2, Vec3};
use parallax_engine::paint::{Color, ColorParseError};
use parallax_engine::render::DirectionalLight;
use rand::Rng;

use crate::config::SceneConfig;
use crate::geometry::Shape;
use crate::tween::SpinState;

/// The ordered solids, one per section.
pub const SHAPES: [Shape; 4] = [
    Shape::Torus { radius: 1.0, tube: 0.4, radial_segments: 16, tubular_segments: 60 },
    Shape::Cone { radius: 1.0, height: 2.0, radial_segments: 32 },
    Shape::TorusKnot { radius: 0.8, tube: 0.35, tubular_segments: 100, radial_segments: 16, p: 2, q: 3 },
    Shape::Sphere { radius: 1.0, width_segments: 32, height_segments: 32 },
];

/// One section's mesh: where it sits and how it is currently turned.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSlot {
    pub shape: Shape,
    pub anchor: Vec3,
    /// Continuous rotation about X and Y (radians, unbounded).
    pub rotation: Vec2,
    /// Section-entry spin, added to the Y angle.
    pub spin: SpinState,
    /// Spin value sampled at the last update.
    pub spin_angle: f32,
}

impl MeshSlot {
    /// Anchor for slot `index`: down one section per slot, alternating sides.
    pub fn anchor_for(index: usize, config: &SceneConfig) -> Vec3 {
        let x = if index % 2 == 0 { config.mesh_offset_x } else { -config.mesh_offset_x };
        Vec3::new(x, -config.section_spacing * index as f32, 0.0)
    }

    /// World transform (XYZ Euler order, no scale).
    pub fn model(&self) -> Mat4 {
        let rotation = Mat4::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y + self.spin_angle,
            0.0,
        );
        Mat4::from_translation(self.anchor) * rotation
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ToonMaterial {
    pub color: Color,
    pub wireframe: bool,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ParticleMaterial {
    pub color: Color,
    pub size: f32,
}

/// Meshes, particle cloud, materials and light of the demo.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub slots: Vec<MeshSlot>,
    pub particles: Vec<Vec3>,
    pub toon: ToonMaterial,
    pub particle_material: ParticleMaterial,
    pub light: DirectionalLight,
}

impl Scene {
    /// Builds the scene; `rng` drives the particle layout.
    pub fn build<R: Rng>(config: &SceneConfig, rng: &mut R) -> Result<Self, ColorParseError> {
        let color = Color::from_hex(&config.material_color)?;
        let light_color = Color::from_hex(&config.light_color)?;

        let slots: Vec<MeshSlot> = SHAPES
            .iter()
            .enumerate()
            .map(|(i, shape)| MeshSlot {
                shape: *shape,
                anchor: MeshSlot::anchor_for(i, config),
                rotation: Vec2::ZERO,
                spin: SpinState::default(),
                spin_angle: 0.0,
            })
            .collect();

        let particles = scatter_particles(config, slots.len(), rng);

        log::debug!("scene built: {} meshes, {} particles", slots.len(), particles.len());

        Ok(Self {
            slots,
            particles,
            toon: ToonMaterial { color, wireframe: config.wireframe },
            particle_material: ParticleMaterial { color, size: config.particle_size },
            light: DirectionalLight {
                position: config.light_position,
                color: light_color,
                intensity: config.light_intensity,
            },
        })
    }

    /// Sets the shared color of the toon and particle materials.
    pub fn set_material_color(&mut self, color: Color) {
        self.toon.color = color;
        self.particle_material.color = color;
    }
}

/// Random particle positions spanning every section.
///
/// `x, z ∈ [-spread/2, spread/2)`; `y` starts half a section above the first
/// mesh and extends `mesh_count` sections down.
pub fn scatter_particles<R: Rng>(config: &SceneConfig, mesh_count: usize, rng: &mut R) -> Vec<Vec3> {
    let spacing = config.section_spacing;
    let spread = config.particle_spread;
    let depth = spacing * mesh_count as f32;

    (0..config.particle_count)
        .map(|_| {
            let x = (rng.gen_range(0.0f32..1.0) - 0.5) * spread;
            let y = spacing * 0.5 - rng.gen_range(0.0f32..1.0) * depth;
            let z = (rng.gen_range(0.0f32..1.0) - 0.5) * spread;
            Vec3::new(x, y, z)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn build() -> Scene {
        Scene::build(&SceneConfig::default(), &mut StdRng::seed_from_u64(7)).unwrap()
    }

    #[test]
    fn slots_alternate_sides_one_section_apart() {
        let scene = build();
        let anchors: Vec<Vec3> = scene.slots.iter().map(|s| s.anchor).collect();
        assert_eq!(
            anchors,
            vec![
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(-2.0, -4.0, 0.0),
                Vec3::new(2.0, -8.0, 0.0),
                Vec3::new(-2.0, -12.0, 0.0),
            ]
        );
    }

    #[test]
    fn particles_fill_the_expected_box() {
        let scene = build();
        assert_eq!(scene.particles.len(), 300);
        for p in &scene.particles {
            assert!(p.x >= -5.0 && p.x < 5.0);
            assert!(p.z >= -5.0 && p.z < 5.0);
            assert!(p.y > -14.0 && p.y <= 2.0);
        }
    }

    #[test]
    fn same_seed_same_particles() {
        assert_eq!(build().particles, build().particles);
    }

    #[test]
    fn color_change_reaches_both_materials() {
        let mut scene = build();
        let red = Color::from_hex("#ff0000").unwrap();
        scene.set_material_color(red);
        assert_eq!(scene.toon.color, red);
        assert_eq!(scene.particle_material.color, red);
    }

    #[test]
    fn invalid_config_color_is_an_error() {
        let config = SceneConfig { material_color: "nope".into(), ..SceneConfig::default() };
        assert!(Scene::build(&config, &mut StdRng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn model_places_slot_at_anchor() {
        let mut slot = build().slots[1].clone();
        slot.rotation = Vec2::new(0.4, 1.2);
        slot.spin_angle = 3.0;
        let origin = slot.model().transform_point3(Vec3::ZERO);
        assert!((origin - slot.anchor).length() < 1e-6);
    }
}

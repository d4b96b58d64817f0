use glam::{Vec2, Vec3};
use parallax_engine::coords::Viewport;
use parallax_engine::paint::ColorParseError;
use rand::Rng;

use crate::config::SceneConfig;
use crate::input::{InputTracker, Message};
use crate::panel::DebugPanel;
use crate::rig::{Camera, CameraRig};
use crate::scene::Scene;
use crate::section::SectionTracker;
use crate::tween::Ease;

/// All mutable demo state, owned by the run loop.
///
/// Events go through [`apply`](Self::apply); time goes through
/// [`advance`](Self::advance). Rendering only reads.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoState {
    pub config: SceneConfig,
    pub scene: Scene,
    pub input: InputTracker,
    pub sections: SectionTracker,
    pub rig: CameraRig,
    pub panel: DebugPanel,
    /// Camera height from scroll, before parallax.
    pub camera_y: f32,
    /// Sum of every `dt` seen by `advance`, in seconds.
    pub elapsed: f64,
}

impl DemoState {
    pub fn new<R: Rng>(config: SceneConfig, viewport: Viewport, rng: &mut R) -> Result<Self, ColorParseError> {
        let scene = Scene::build(&config, rng)?;
        let panel = DebugPanel::new(&config.material_color)?;
        let count = scene.slots.len();

        Ok(Self {
            input: InputTracker::new(viewport, count),
            sections: SectionTracker::new(count),
            rig: CameraRig::default(),
            camera_y: 0.0,
            elapsed: 0.0,
            config,
            scene,
            panel,
        })
    }

    pub fn apply(&mut self, msg: Message) {
        match msg {
            Message::ScrollBy(dy) => {
                if self.input.scroll_by(dy) {
                    self.on_scroll();
                }
            }
            Message::ScrollTo(y) => {
                if self.input.scroll_to(y) {
                    self.on_scroll();
                }
            }
            Message::PointerMoved { x, y } => self.input.set_pointer(x, y),
            Message::Resized(viewport) => {
                if self.input.resize(viewport) {
                    self.on_scroll();
                }
            }
            Message::CycleColor => {
                let color = self.panel.cycle();
                self.scene.set_material_color(color);
            }
            Message::SetColor(hex) => match self.panel.set_color(&hex) {
                Ok(color) => self.scene.set_material_color(color),
                Err(e) => log::warn!("{e}"),
            },
            Message::ToggleWireframe => {
                self.scene.toon.wireframe = !self.scene.toon.wireframe;
                log::info!("wireframe = {}", self.scene.toon.wireframe);
            }
        }
    }

    /// Section check: spin the mesh of a newly entered section.
    fn on_scroll(&mut self) {
        let vh = self.input.viewport().height;
        let Some(index) = self.sections.on_scroll(self.input.scroll(), vh) else {
            return;
        };
        let Some(slot) = self.scene.slots.get_mut(index) else {
            return;
        };

        slot.spin.spin_by(
            self.config.spin_angle,
            self.config.spin_duration,
            Ease::QuadInOut,
            self.elapsed,
        );
        log::trace!("spin started on slot {index} ({})", slot.shape.name());
    }

    /// Returns the state one tick of `dt` seconds later.
    pub fn step(&self, dt: f32) -> DemoState {
        let mut next = self.clone();
        next.advance(dt);
        next
    }

    /// Advances every time-driven value by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += f64::from(dt);

        let spin_rate = Vec2::new(self.config.rotation_rate_x, self.config.rotation_rate_y);
        for slot in &mut self.scene.slots {
            slot.rotation += spin_rate * dt;
            slot.spin_angle = slot.spin.update(self.elapsed);
        }

        let viewport = self.input.viewport();
        self.camera_y = if viewport.is_valid() {
            -self.input.scroll() / viewport.height * self.config.section_spacing
        } else {
            0.0
        };

        self.rig.follow(self.parallax_target(), self.config.parallax_damping, dt);
    }

    /// Where the rig is heading: the cursor scaled, with Y flipped to world up.
    pub fn parallax_target(&self) -> Vec2 {
        let c = self.input.cursor();
        let a = self.config.parallax_amplitude;
        Vec2::new(c.x * a, -c.y * a)
    }

    pub fn camera(&self) -> Camera {
        let offset = self.rig.offset;
        Camera {
            position: Vec3::new(offset.x, offset.y + self.camera_y, self.config.camera_distance),
            fov_y: self.config.camera_fov_y_deg.to_radians(),
            aspect: self.input.viewport().aspect(),
            near: self.config.camera_near,
            far: self.config.camera_far,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tween::SpinState;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPS: f32 = 1e-4;

    fn state() -> DemoState {
        DemoState::new(
            SceneConfig::default(),
            Viewport::new(1200.0, 800.0),
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap()
    }

    fn animating(s: &DemoState) -> Vec<usize> {
        s.scene
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.spin.is_animating())
            .map(|(i, _)| i)
            .collect()
    }

    // ── section transitions ───────────────────────────────────────────────

    #[test]
    fn jump_to_900_spins_mesh_one_only() {
        let mut s = state();
        s.apply(Message::ScrollTo(900.0));
        assert_eq!(s.sections.current(), 1);
        assert_eq!(animating(&s), vec![1]);
        assert_eq!(s.scene.slots[1].spin.target(), 3.0);
    }

    #[test]
    fn scrolling_within_section_does_not_retrigger() {
        let mut s = state();
        s.apply(Message::ScrollTo(900.0));
        let before = s.scene.slots[1].spin;
        s.apply(Message::ScrollTo(850.0));
        assert_eq!(s.scene.slots[1].spin, before);
    }

    #[test]
    fn spin_finishes_after_duration() {
        let mut s = state();
        s.apply(Message::ScrollTo(800.0));
        for _ in 0..130 {
            s.advance(0.016);
        }
        assert_eq!(s.scene.slots[1].spin, SpinState::Idle { angle: 3.0 });
        assert_eq!(s.scene.slots[1].spin_angle, 3.0);
    }

    #[test]
    fn resize_that_clamps_scroll_runs_section_check() {
        let mut s = state();
        s.apply(Message::ScrollTo(2400.0));
        assert_eq!(s.sections.current(), 3);

        // Page shrinks to 4 * 200; offset clamps to 600 = section 3 still.
        s.apply(Message::Resized(Viewport::new(1200.0, 200.0)));
        assert_eq!(s.input.scroll(), 600.0);
        assert_eq!(s.sections.current(), 3);
    }

    #[test]
    fn resize_clamp_into_next_section_spins_its_mesh() {
        let mut s = state();
        s.apply(Message::ScrollTo(1700.0));
        assert_eq!(s.sections.current(), 2);
        assert_eq!(animating(&s), vec![2]);

        // Max offset becomes 3 * 500 = 1500, which rounds to section 3.
        s.apply(Message::Resized(Viewport::new(1200.0, 500.0)));
        assert_eq!(s.input.scroll(), 1500.0);
        assert_eq!(s.sections.current(), 3);
        assert!(s.scene.slots[3].spin.is_animating());
    }

    #[test]
    fn spins_keep_easing_late_in_a_long_session() {
        let mut s = state();
        s.elapsed = 1.0e6;
        s.apply(Message::ScrollTo(800.0));

        for _ in 0..62 {
            s.advance(0.016);
        }
        let mid = s.scene.slots[1].spin_angle;
        assert!(mid > 1.0 && mid < 2.0, "halfway angle was {mid}");

        for _ in 0..68 {
            s.advance(0.016);
        }
        assert_eq!(s.scene.slots[1].spin, SpinState::Idle { angle: 3.0 });
    }

    // ── frame updater ─────────────────────────────────────────────────────

    #[test]
    fn rotation_is_frame_rate_independent() {
        let coarse = state().step(0.2);
        let mut fine = state();
        for _ in 0..20 {
            fine.advance(0.01);
        }

        for (a, b) in coarse.scene.slots.iter().zip(&fine.scene.slots) {
            assert!((a.rotation.x - 0.02).abs() < EPS);
            assert!((a.rotation.y - 0.024).abs() < EPS);
            assert!((a.rotation - b.rotation).length() < EPS);
        }
    }

    #[test]
    fn camera_height_is_linear_in_scroll() {
        let mut s = state();
        for scroll in [0.0, 123.0, 800.0, 1999.0, 2400.0] {
            s.apply(Message::ScrollTo(scroll));
            s.advance(0.016);
            assert!((s.camera_y - (-scroll / 800.0 * 4.0)).abs() < EPS);
        }
    }

    #[test]
    fn rig_heads_to_scaled_flipped_cursor() {
        let mut s = state();
        // cursor = (0.2, -0.2) -> target (0.1, 0.1)
        s.apply(Message::PointerMoved { x: 840.0, y: 240.0 });
        assert!((s.parallax_target() - Vec2::new(0.1, 0.1)).length() < EPS);

        for _ in 0..50 {
            s.advance(0.016);
        }
        assert!(s.rig.offset.x > 0.095 && s.rig.offset.x <= 0.1);
    }

    #[test]
    fn step_is_pure() {
        let s = state();
        let next = s.step(0.5);
        assert_eq!(s, state());
        assert!(next.elapsed > s.elapsed);
    }

    #[test]
    fn negative_dt_is_ignored() {
        let mut s = state();
        s.advance(-1.0);
        assert_eq!(s.elapsed, 0.0);
        assert_eq!(s.scene.slots[0].rotation, Vec2::ZERO);
    }

    #[test]
    fn camera_follows_rig_and_scroll() {
        let mut s = state();
        s.apply(Message::ScrollTo(800.0));
        s.advance(0.016);
        let cam = s.camera();
        assert!((cam.position.y - (-4.0)).abs() < EPS);
        assert_eq!(cam.position.z, 6.0);
        assert!((cam.aspect - 1.5).abs() < EPS);
    }

    // ── panel ─────────────────────────────────────────────────────────────

    #[test]
    fn set_color_updates_both_materials() {
        let mut s = state();
        s.apply(Message::SetColor("#336699".into()));
        assert_eq!(s.panel.material_color(), "#336699");
        assert_eq!(s.scene.toon.color, s.panel.color());
        assert_eq!(s.scene.particle_material.color, s.panel.color());
    }

    #[test]
    fn invalid_color_is_ignored() {
        let mut s = state();
        let before = s.scene.toon.color;
        s.apply(Message::SetColor("zzz".into()));
        assert_eq!(s.scene.toon.color, before);
    }

    #[test]
    fn wireframe_starts_on_and_toggles() {
        let mut s = state();
        assert!(s.scene.toon.wireframe);
        s.apply(Message::ToggleWireframe);
        assert!(!s.scene.toon.wireframe);
        s.apply(Message::ToggleWireframe);
        assert!(s.scene.toon.wireframe);
    }
}

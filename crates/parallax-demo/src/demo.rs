use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::dpi::LogicalSize;

use parallax_engine::coords::Viewport;
use parallax_engine::core::{App as EngineApp, AppControl, FrameCtx};
use parallax_engine::device::GpuInit;
use parallax_engine::input::{InputEvent, Key, KeyState};
use parallax_engine::paint::Color;
use parallax_engine::render::{
    MeshDraw, MeshId, MeshRenderer, PointParams, PointsRenderer, ToonParams,
};
use parallax_engine::window::{Runtime, RuntimeConfig};

use parallax_scene::assets::{load_or_else, soft_disc, toon_ramp};
use parallax_scene::input::{key_message, wheel_message};
use parallax_scene::{DemoState, Message, SceneConfig};

// ── Demo ──────────────────────────────────────────────────────────────────

/// Demo builder.
///
/// ```rust,ignore
/// Demo::new()
///     .title("parallax")
///     .material_color("#a5d8ff")
///     .seed(42)
///     .run()?;
/// ```
pub struct Demo {
    title: String,
    width: f64,
    height: f64,
    max_pixel_ratio: f64,
    config: SceneConfig,
    gradient_texture: Option<PathBuf>,
    particle_texture: Option<PathBuf>,
    seed: Option<u64>,
}

impl Demo {
    pub fn new() -> Self {
        Self {
            title: "parallax".to_string(),
            width: 1280.0,
            height: 720.0,
            max_pixel_ratio: 2.0,
            config: SceneConfig::default(),
            gradient_texture: None,
            particle_texture: None,
            seed: None,
        }
    }

    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Starting color shared by meshes and particles (`#rgb`/`#rrggbb`).
    pub fn material_color(mut self, hex: impl Into<String>) -> Self {
        self.config.material_color = hex.into();
        self
    }

    /// Toon gradient lookup image. Without one, or if it cannot be loaded, a
    /// generated 3-step ramp is used.
    pub fn gradient_texture(mut self, path: impl Into<PathBuf>) -> Self {
        self.gradient_texture = Some(path.into());
        self
    }

    /// Particle alpha mask image. Without one, or if it cannot be loaded, a
    /// generated soft disc is used.
    pub fn particle_texture(mut self, path: impl Into<PathBuf>) -> Self {
        self.particle_texture = Some(path.into());
        self
    }

    /// Edge-only meshes; on by default.
    pub fn wireframe(mut self, on: bool) -> Self {
        self.config.wireframe = on;
        self
    }

    /// Fixes the particle layout.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replaces every scene constant at once.
    pub fn config(mut self, config: SceneConfig) -> Self {
        self.config = config;
        self
    }

    /// Opens the window and runs until it is closed.
    pub fn run(self) -> Result<()> {
        let app = DemoApp::new(&self)?;

        let config = RuntimeConfig {
            title: self.title,
            initial_size: LogicalSize::new(self.width, self.height),
            max_pixel_ratio: self.max_pixel_ratio,
        };
        Runtime::run(config, GpuInit::default(), app)
    }
}

impl Default for Demo {
    fn default() -> Self {
        Self::new()
    }
}

// ── DemoApp ───────────────────────────────────────────────────────────────

/// Implements `parallax_engine::core::App`: input to messages, tick, draw.
struct DemoApp {
    title: String,
    state: DemoState,
    mesh_ids: Vec<MeshId>,
    mesh_renderer: MeshRenderer,
    points_renderer: PointsRenderer,
    clear: Color,
    last_section: usize,
}

impl DemoApp {
    fn new(demo: &Demo) -> Result<Self> {
        let mut rng = match demo.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let viewport = Viewport::new(demo.width as f32, demo.height as f32);
        let state = DemoState::new(demo.config.clone(), viewport, &mut rng)
            .context("invalid scene configuration")?;

        let mut mesh_renderer = MeshRenderer::new();
        let mesh_ids = state
            .scene
            .slots
            .iter()
            .map(|slot| mesh_renderer.add_mesh(slot.shape.build()))
            .collect();
        mesh_renderer.set_gradient(match &demo.gradient_texture {
            Some(path) => load_or_else(path, || toon_ramp(3)),
            None => toon_ramp(3),
        });

        let mut points_renderer = PointsRenderer::new();
        points_renderer.set_mask(match &demo.particle_texture {
            Some(path) => load_or_else(path, || soft_disc(64)),
            None => soft_disc(64),
        });

        Ok(Self {
            title: demo.title.clone(),
            state,
            mesh_ids,
            mesh_renderer,
            points_renderer,
            clear: Color::from_srgb_u8(0x1e, 0x1a, 0x20, 0xff),
            last_section: 0,
        })
    }

    /// Applies a window resize, ignoring the 0x0 a minimized window reports.
    fn sync_viewport(&mut self, viewport: Viewport) {
        if viewport.is_valid() && viewport != self.state.input.viewport() {
            self.state.apply(Message::Resized(viewport));
        }
    }

    /// Maps one input event to a scene message.
    fn message_for(&self, event: &InputEvent) -> Option<Message> {
        match event {
            // Repeats included so held keys keep scrolling.
            InputEvent::Key { key, state: KeyState::Pressed, .. } => {
                key_message(*key, &self.state.input, &self.state.config)
            }
            InputEvent::MouseWheel { delta } => Some(wheel_message(*delta, &self.state.config)),
            InputEvent::PointerMoved(p) => Some(Message::PointerMoved { x: p.x, y: p.y }),
            _ => None,
        }
    }
}

impl EngineApp for DemoApp {
    fn on_input(&mut self, event: &InputEvent) -> AppControl {
        if let InputEvent::Key { key: Key::Escape, state: KeyState::Pressed, .. } = event {
            return AppControl::Exit;
        }
        if let Some(msg) = self.message_for(event) {
            self.state.apply(msg);
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.sync_viewport(ctx.window.viewport());
        self.state.advance(ctx.time.dt);

        let section = self.state.sections.current();
        if section != self.last_section {
            self.last_section = section;
            if let Some(slot) = self.state.scene.slots.get(section) {
                ctx.runtime.set_title(format!("{} · {}", self.title, slot.shape.name()));
            }
        }

        // ── Render ────────────────────────────────────────────────────────
        let scene = &self.state.scene;
        let camera = self.state.camera();
        let camera_uniform = camera.uniform();

        let draws: Vec<MeshDraw> = scene
            .slots
            .iter()
            .zip(&self.mesh_ids)
            .map(|(slot, &mesh)| MeshDraw { mesh, model: slot.model() })
            .collect();

        let toon = ToonParams {
            color: scene.toon.color,
            light: scene.light,
            wireframe: scene.toon.wireframe,
        };

        // Attenuated point sprites cover `size * (h/2) / depth` pixels; a
        // world-space billboard matches that at `size * tan(fov/2)`.
        let points = PointParams {
            color: scene.particle_material.color,
            size: scene.particle_material.size * (camera.fov_y * 0.5).tan(),
        };

        let meshes = &mut self.mesh_renderer;
        let particles = &mut self.points_renderer;

        ctx.render(self.clear, |rctx, target| {
            meshes.render(rctx, target, &camera_uniform, &toon, &draws);
            particles.render(rctx, target, &camera_uniform, &points, &scene.particles);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_registers_one_mesh_per_slot() {
        let app = DemoApp::new(&Demo::new().seed(3)).unwrap();
        assert_eq!(app.mesh_ids.len(), app.state.scene.slots.len());
        assert_eq!(app.state.scene.particles.len(), 300);
    }

    #[test]
    fn builder_options_reach_the_state() {
        let app = DemoApp::new(&Demo::new().seed(3).wireframe(false).material_color("#a5d8ff")).unwrap();
        assert!(!app.state.scene.toon.wireframe);
        assert_eq!(app.state.panel.material_color(), "#a5d8ff");
    }

    #[test]
    fn bad_material_color_fails_startup() {
        assert!(DemoApp::new(&Demo::new().material_color("#xyz")).is_err());
    }

    #[test]
    fn same_seed_same_layout() {
        let a = DemoApp::new(&Demo::new().seed(9)).unwrap();
        let b = DemoApp::new(&Demo::new().seed(9)).unwrap();
        assert_eq!(a.state.scene.particles, b.state.scene.particles);
    }

    fn press(key: Key) -> InputEvent {
        InputEvent::Key { key, state: KeyState::Pressed }
    }

    #[test]
    fn escape_exits() {
        let mut app = DemoApp::new(&Demo::new().seed(1)).unwrap();
        assert_eq!(app.on_input(&press(Key::Escape)), AppControl::Exit);
    }

    #[test]
    fn page_down_scrolls_one_viewport() {
        let mut app = DemoApp::new(&Demo::new().seed(1)).unwrap();
        assert_eq!(app.on_input(&press(Key::PageDown)), AppControl::Continue);
        assert_eq!(app.state.input.scroll(), 720.0);
    }

    #[test]
    fn minimized_viewport_keeps_scroll() {
        let mut app = DemoApp::new(&Demo::new().seed(1)).unwrap();
        app.on_input(&press(Key::End));
        let before = app.state.input.scroll();
        app.sync_viewport(Viewport::new(0.0, 0.0));
        assert_eq!(app.state.input.scroll(), before);
    }

    #[test]
    fn wireframe_defaults_on_and_w_toggles_it() {
        let mut app = DemoApp::new(&Demo::new().seed(1)).unwrap();
        assert!(app.state.scene.toon.wireframe);
        app.on_input(&press(Key::Letter('W')));
        assert!(!app.state.scene.toon.wireframe);
    }
}

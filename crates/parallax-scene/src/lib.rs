//! Scroll-driven scene state.
//!
//! Owns what the demo means: the mesh slots and particle cloud, the scroll
//! and cursor signals, section transitions with their spin tweens, and the
//! per-frame update of rotations and the camera rig. Nothing here touches
//! the GPU; `parallax-demo` reads [`DemoState`] and hands it to the engine's
//! renderers.

pub mod assets;
pub mod config;
pub mod geometry;
pub mod input;
pub mod panel;
pub mod rig;
pub mod scene;
pub mod section;
pub mod tween;
pub mod update;

// Entry points for the demo crate
pub use config::SceneConfig;
pub use update::DemoState;

pub use input::{InputTracker, Message};
pub use scene::Scene;


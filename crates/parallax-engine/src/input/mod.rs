//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Runtime code translates platform events into `InputEvent`s through
//! `platform::winit` and hands each one to `App::on_input`.

mod types;

pub(crate) mod platform;

pub use types::{InputEvent, Key, KeyState, MouseWheelDelta, PointerMoveEvent};

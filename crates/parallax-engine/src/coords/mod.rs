//! Window-space measurements shared by the runtime and renderers.
//!
//! Logical pixels, origin top-left, +Y down. World-space math uses `glam`.

mod viewport;

pub use viewport::Viewport;

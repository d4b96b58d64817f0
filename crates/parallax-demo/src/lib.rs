//! Windowed parallax demo: wires `parallax-scene` state to the engine's
//! runtime and renderers.

mod demo;

pub use demo::Demo;

//! Color model shared between the scene layer and renderers.
//!
//! Colors are linear premultiplied RGBA. Geometry and transforms live in
//! `glam`; this module only deals with color.

pub mod color;

pub use color::{Color, ColorParseError};

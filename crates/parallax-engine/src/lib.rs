//! Parallax engine crate.
//!
//! Platform + GPU runtime pieces: window loop, input translation, frame
//! timing, logging setup and the toon mesh / particle renderers.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;

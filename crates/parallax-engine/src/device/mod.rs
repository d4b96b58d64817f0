//! GPU device + surface management.
//!
//! [`Gpu`] creates the wgpu device for a window, keeps the surface and its
//! depth target sized to the drawable, and hands out one [`GpuFrame`] per
//! redraw. Surface acquisition failures are classified by
//! [`SurfaceErrorAction`] so the frame loop can decide whether to continue.

mod gpu;
mod surface;

pub use gpu::{Gpu, GpuFrame, GpuInit, DEPTH_FORMAT};
pub use surface::{clamp_pixel_size, SurfaceErrorAction};

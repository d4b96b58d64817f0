//! GPU rendering subsystem.
//!
//! Renderers take CPU-side draw data each frame and issue GPU commands via wgpu.
//! Each renderer is responsible for its own GPU resources (pipelines, buffers,
//! textures) and creates them lazily on first use.
//!
//! Convention:
//! - World space is right-handed, +Y up, camera looking down -Z.
//! - Colors are premultiplied linear (see [`Color`](crate::paint::Color)).
//! - The frame is cleared before renderers run; passes always load.

mod camera;
mod common;
mod ctx;
mod mesh;
mod points;
mod texture;

pub use camera::CameraUniform;
pub use ctx::{RenderCtx, RenderTarget};
pub use mesh::{DirectionalLight, MeshData, MeshDraw, MeshId, MeshRenderer, MeshVertex, ToonParams};
pub use points::{PointParams, PointsRenderer};
pub use texture::{GpuTexture, TextureData, TextureFilter};

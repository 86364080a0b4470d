//! Rendering system for the voxel engine.
//!
//! The renderer is written against the [`backend::RenderBackend`] trait: it culls
//! drawables against the view frustum, asks the world to rebuild dirty chunk meshes,
//! and issues draws. [`wgpu_backend::WgpuBackend`] is the GPU implementation; it owns
//! the device, the vertex buffers, the bind groups and the pipelines.

pub mod backend;
mod bind_group_state;
pub mod light_marker;
pub mod meshing;
mod pipeline_manager;
pub mod renderer;
mod texture;
mod vertex;
pub mod wgpu_backend;

// Re-export commonly used types
pub use vertex::Vertex;

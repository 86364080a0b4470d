//! # Render Backend Contract
//!
//! The engine never talks to the GPU directly. Everything it needs from a graphics API
//! is expressed through [`RenderBackend`]: compile a shader program, upload and release
//! vertex buffers, bind a texture, write the scene uniform, draw, and frame the whole
//! thing with `begin_frame`/`present`.
//!
//! Resources are referred to through small copyable handles. A handle is only
//! meaningful to the backend that issued it.

use thiserror::Error;

use crate::engine_state::camera_state::camera::SceneUniform;

use super::Vertex;

/// Handle to a compiled shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

/// Handle to an uploaded vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

/// Handle to a bound texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Errors raised by backend resource operations.
///
/// None of these are fatal: callers log them and keep rendering with whatever
/// resources did succeed.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The shader source failed to compile or the pipeline failed validation.
    #[error("shader `{label}` failed to compile: {message}")]
    Shader { label: String, message: String },
    /// The texture bytes could not be decoded.
    #[error("texture decode failed: {0}")]
    Texture(#[from] image::ImageError),
    /// A vertex buffer could not be created.
    #[error("vertex upload failed: {0}")]
    Upload(String),
    /// The surface could not provide a frame to draw into.
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

/// Minimal graphics API surface the renderer is written against.
pub trait RenderBackend {
    /// Compiles WGSL `source` into a program drawing [`Vertex`] triangle lists.
    fn compile_program(&mut self, label: &str, source: &str)
        -> Result<ProgramHandle, BackendError>;

    /// Uploads a vertex buffer and returns its handle.
    fn upload_mesh(&mut self, vertices: &[Vertex]) -> Result<MeshHandle, BackendError>;

    /// Frees the buffer behind `mesh`. Unknown handles are ignored.
    fn release_mesh(&mut self, mesh: MeshHandle);

    /// Decodes an encoded 2D image and binds it for subsequent draws.
    fn bind_texture(&mut self, bytes: &[u8]) -> Result<TextureHandle, BackendError>;

    /// Writes the per-frame camera and light data.
    fn set_scene_uniforms(&mut self, uniforms: &SceneUniform);

    /// Starts recording a frame.
    fn begin_frame(&mut self) -> Result<(), BackendError>;

    /// Queues a draw of the first `vertex_count` vertices of `mesh` with `program`.
    fn draw(&mut self, program: ProgramHandle, mesh: MeshHandle, vertex_count: u32);

    /// Submits everything recorded since `begin_frame`.
    fn present(&mut self);

    /// Seconds since the backend was created.
    fn elapsed(&self) -> f32;
}

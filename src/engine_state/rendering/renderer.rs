//! # Renderer
//!
//! Per-frame dispatch over an ordered list of drawables. Each drawable is first tested
//! against the view frustum; only those that pass have their mesh rebuilt (when dirty),
//! uploaded (when stale) and drawn. Culling therefore saves meshing work as well as
//! GPU work.
//!
//! Resource failures during [`Renderer::init`] are logged once and leave the matching
//! draws disabled for the rest of the session.

use log::{debug, error, info, warn};

use crate::engine_state::{
    camera_state::{camera::SceneUniform, frustum::Frustum},
    voxels::world::World,
};

use super::{
    backend::{MeshHandle, ProgramHandle, RenderBackend, TextureHandle},
    light_marker::{self, LightMarker},
};

/// Something the renderer knows how to cull and draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drawable {
    /// A chunk, by its index in the world arena
    Chunk(usize),
    /// The cube marking the point light
    LightMarker,
}

/// Counts from the last rendered frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// Drawables considered
    pub total: usize,
    /// Drawables that passed the frustum test
    pub rendered: usize,
}

/// Everything a frame reads besides the backend.
pub struct RenderContext<'a> {
    pub world: &'a mut World,
    pub frustum: &'a Frustum,
    pub light: &'a LightMarker,
    pub scene: &'a SceneUniform,
}

pub struct Renderer {
    drawables: Vec<Drawable>,
    chunk_program: Option<ProgramHandle>,
    light_program: Option<ProgramHandle>,
    light_mesh: Option<(MeshHandle, u32)>,
    texture: Option<TextureHandle>,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            drawables: Vec::new(),
            chunk_program: None,
            light_program: None,
            light_mesh: None,
            texture: None,
        }
    }

    /// Compiles both programs, uploads the light cube and binds the palette texture.
    pub fn init<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        chunk_source: &str,
        light_source: &str,
        texture_bytes: &[u8],
    ) {
        self.chunk_program = match backend.compile_program("chunk", chunk_source) {
            Ok(program) => Some(program),
            Err(err) => {
                error!("Chunk program unavailable, chunks will not be drawn: {}", err);
                None
            }
        };

        self.light_program = match backend.compile_program("light", light_source) {
            Ok(program) => Some(program),
            Err(err) => {
                error!("Light program unavailable, light marker will not be drawn: {}", err);
                None
            }
        };

        let cube = light_marker::cube_vertices();
        self.light_mesh = match backend.upload_mesh(&cube) {
            Ok(mesh) => Some((mesh, cube.len() as u32)),
            Err(err) => {
                error!("Failed to upload light marker: {}", err);
                None
            }
        };

        self.texture = match backend.bind_texture(texture_bytes) {
            Ok(texture) => Some(texture),
            Err(err) => {
                warn!("Falling back to a white texture: {}", err);
                None
            }
        };
    }

    /// Appends a drawable. Draw order follows attach order.
    pub fn attach(&mut self, drawable: Drawable) {
        self.drawables.push(drawable);
    }

    /// Attaches every chunk of `world` in arena order.
    pub fn attach_world(&mut self, world: &World) {
        self.drawables
            .extend((0..world.len()).map(Drawable::Chunk));
        info!("Attached {} chunks", world.len());
    }

    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    /// Whether a texture other than the white fallback is bound.
    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    /// Renders one frame.
    ///
    /// A frame the backend cannot begin is skipped without touching any chunk.
    pub fn render<B: RenderBackend + ?Sized>(
        &mut self,
        context: &mut RenderContext<'_>,
        backend: &mut B,
    ) -> FrameStats {
        if let Err(err) = backend.begin_frame() {
            warn!("Skipping frame: {}", err);
            return FrameStats::default();
        }
        backend.set_scene_uniforms(context.scene);

        let mut stats = FrameStats::default();
        for &drawable in &self.drawables {
            stats.total += 1;
            let visible = match drawable {
                Drawable::Chunk(index) => self.render_chunk(index, context, backend),
                Drawable::LightMarker => self.render_light(context, backend),
            };
            if visible {
                stats.rendered += 1;
            }
        }

        backend.present();
        debug!("Rendered {}/{} drawables", stats.rendered, stats.total);
        stats
    }

    fn render_chunk<B: RenderBackend + ?Sized>(
        &self,
        index: usize,
        context: &mut RenderContext<'_>,
        backend: &mut B,
    ) -> bool {
        let Some(chunk) = context.world.chunk(index) else {
            return false;
        };
        if !context.frustum.box_in(&chunk.corners()) {
            return false;
        }

        context.world.rebuild_if_dirty(index);
        let Some(chunk) = context.world.chunk_mut(index) else {
            return false;
        };
        chunk.sync_gpu_mesh(backend);

        if let (Some(program), Some((mesh, vertex_count))) = (self.chunk_program, chunk.gpu_mesh()) {
            backend.draw(program, mesh, vertex_count);
        }
        true
    }

    fn render_light<B: RenderBackend + ?Sized>(
        &self,
        context: &RenderContext<'_>,
        backend: &mut B,
    ) -> bool {
        if !context.frustum.point_in(context.light.position) {
            return false;
        }
        if let (Some(program), Some((mesh, vertex_count))) = (self.light_program, self.light_mesh) {
            backend.draw(program, mesh, vertex_count);
        }
        true
    }

    /// Frees the light cube. Chunk buffers belong to the world.
    pub fn release<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        if let Some((mesh, _)) = self.light_mesh.take() {
            backend.release_mesh(mesh);
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

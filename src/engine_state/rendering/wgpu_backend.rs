//! # wgpu Backend
//!
//! [`RenderBackend`] implementation on top of a configured wgpu surface. It owns the
//! device, queue and surface together with the three pieces of GPU state the engine
//! needs: vertex buffers ([`BufferState`]), bind groups ([`BindGroupState`]) and
//! pipelines ([`PipelineManager`]).
//!
//! Draws are only recorded by [`RenderBackend::draw`]; the render pass is encoded and
//! submitted in [`RenderBackend::present`].

use log::{debug, info, warn};
use wgpu::{Device, Queue, Surface, SurfaceConfiguration, SurfaceTexture};

use crate::engine_state::{buffer_state::BufferState, camera_state::camera::SceneUniform};

use super::{
    backend::{BackendError, MeshHandle, ProgramHandle, RenderBackend, TextureHandle},
    bind_group_state::BindGroupState,
    pipeline_manager::{DrawCommand, PipelineManager},
    texture::Texture,
    vertex::Vertex,
};

/// GPU backend driving a window surface.
pub struct WgpuBackend {
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    device: Device,
    queue: Queue,
    buffer_state: BufferState,
    bind_group_state: BindGroupState,
    pipeline_manager: PipelineManager,
    /// Draws recorded for the frame in flight
    pending: Vec<DrawCommand>,
    frame: Option<SurfaceTexture>,
    next_texture: u32,
    start: web_time::Instant,
}

impl WgpuBackend {
    /// Wraps an already configured surface.
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
    ) -> Self {
        let bind_group_state = BindGroupState::new(&device, &queue);
        let pipeline_manager = PipelineManager::new(&device, &surface_config);

        Self {
            surface,
            surface_config,
            device,
            queue,
            buffer_state: BufferState::new(),
            bind_group_state,
            pipeline_manager,
            pending: Vec::new(),
            frame: None,
            next_texture: 0,
            start: web_time::Instant::now(),
        }
    }

    /// Reconfigures the surface and depth buffer. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
        self.pipeline_manager
            .resize(&self.device, &self.surface_config);
    }

    /// Current framebuffer size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    pub fn buffer_state(&self) -> &BufferState {
        &self.buffer_state
    }
}

impl RenderBackend for WgpuBackend {
    fn compile_program(
        &mut self,
        label: &str,
        source: &str,
    ) -> Result<ProgramHandle, BackendError> {
        let handle = self.pipeline_manager.create_program(
            &self.device,
            &self.bind_group_state,
            label,
            source,
        )?;
        info!("Compiled program `{}` as {:?}", label, handle);
        Ok(handle)
    }

    fn upload_mesh(&mut self, vertices: &[Vertex]) -> Result<MeshHandle, BackendError> {
        if vertices.is_empty() {
            return Err(BackendError::Upload(
                "refusing to create an empty vertex buffer".to_string(),
            ));
        }
        Ok(self
            .buffer_state
            .create_vertex_buffer(&self.device, vertices))
    }

    fn release_mesh(&mut self, mesh: MeshHandle) {
        if !self.buffer_state.release(mesh) {
            debug!("Release of unknown mesh {:?} ignored", mesh);
        }
    }

    fn bind_texture(&mut self, bytes: &[u8]) -> Result<TextureHandle, BackendError> {
        let image = image::load_from_memory(bytes)?;
        let texture = Texture::from_image(&self.device, &self.queue, &image, "Palette Texture");
        self.bind_group_state.bind_texture(&self.device, texture);

        let (width, height) = self.bind_group_state.texture_size();
        info!("Bound {}x{} texture", width, height);

        let handle = TextureHandle(self.next_texture);
        self.next_texture += 1;
        Ok(handle)
    }

    fn set_scene_uniforms(&mut self, uniforms: &SceneUniform) {
        self.bind_group_state.write_scene(&self.queue, uniforms);
    }

    fn begin_frame(&mut self) -> Result<(), BackendError> {
        self.pending.clear();
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.surface_config);
                self.surface.get_current_texture()?
            }
            Err(err) => return Err(err.into()),
        };
        self.frame = Some(frame);
        Ok(())
    }

    fn draw(&mut self, program: ProgramHandle, mesh: MeshHandle, vertex_count: u32) {
        self.pending.push(DrawCommand {
            program,
            mesh,
            vertex_count,
        });
    }

    fn present(&mut self) {
        let draws = std::mem::take(&mut self.pending);
        let Some(frame) = self.frame.take() else {
            return;
        };

        let view = frame.texture.create_view(&Default::default());
        let mut encoder = self.device.create_command_encoder(&Default::default());
        self.pipeline_manager.render(
            &mut encoder,
            &view,
            &draws,
            &self.buffer_state,
            &self.bind_group_state,
        );
        self.queue.submit([encoder.finish()]);
        frame.present();
    }

    fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

//! Manages the WebGPU render pipelines and the render pass that draws them.
//!
//! # Architecture
//!
//! - Each compiled program becomes one `RenderPipeline`, stored under its
//!   [`ProgramHandle`]. All pipelines share the layout published by
//!   [`BindGroupState`], draw [`Vertex`] triangle lists, and test against one depth
//!   texture.
//! - Draws are recorded during the frame and replayed in submission order inside a
//!   single render pass when the frame is presented.

use std::collections::HashMap;

use log::warn;
use wgpu::{CommandEncoder, Device, RenderPipeline, SurfaceConfiguration, TextureFormat, TextureView};

use super::{
    backend::{BackendError, MeshHandle, ProgramHandle},
    bind_group_state::{BindGroupState, SCENE_BIND_GROUP, TEXTURE_BIND_GROUP},
    texture,
    vertex::Vertex,
};
use crate::engine_state::buffer_state::BufferState;

/// Background color the color target is cleared to each frame.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.07,
    b: 0.1,
    a: 1.0,
};

/// A draw recorded between `begin_frame` and `present`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCommand {
    pub program: ProgramHandle,
    pub mesh: MeshHandle,
    pub vertex_count: u32,
}

/// Owns the compiled pipelines and the depth buffer.
pub struct PipelineManager {
    pipelines: HashMap<ProgramHandle, RenderPipeline>,
    next_program: u32,
    /// Depth texture used for depth testing
    pub depth_texture: texture::Texture,
    texture_format: TextureFormat,
}

impl PipelineManager {
    pub fn new(device: &Device, config: &SurfaceConfiguration) -> Self {
        Self {
            pipelines: HashMap::new(),
            next_program: 0,
            depth_texture: texture::Texture::create_depth_texture(device, config, "DEPTH TEXTURE"),
            texture_format: config.format,
        }
    }

    /// Compiles `source` into a pipeline.
    ///
    /// Shader and pipeline validation errors are captured in an error scope and
    /// returned instead of reaching the device's uncaptured error handler.
    pub fn create_program(
        &mut self,
        device: &Device,
        bind_group_state: &BindGroupState,
        label: &str,
        source: &str,
    ) -> Result<ProgramHandle, BackendError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let bind_group_layouts = bind_group_state.program_layouts();
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &bind_group_layouts,
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.texture_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: texture::Texture::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(BackendError::Shader {
                label: label.to_string(),
                message: err.to_string(),
            });
        }

        let handle = ProgramHandle(self.next_program);
        self.next_program += 1;
        self.pipelines.insert(handle, render_pipeline);
        Ok(handle)
    }

    /// Handles window resize events by recreating the depth texture.
    pub fn resize(&mut self, device: &Device, config: &SurfaceConfiguration) {
        self.depth_texture = texture::Texture::create_depth_texture(device, config, "DEPTH TEXTURE");
    }

    /// Encodes one render pass into `view` replaying `draws` in order.
    ///
    /// Draws naming an unknown program or mesh are skipped.
    pub fn render(
        &self,
        encoder: &mut CommandEncoder,
        view: &TextureView,
        draws: &[DrawCommand],
        buffer_state: &BufferState,
        bind_group_state: &BindGroupState,
    ) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        let (Some(scene_group), Some(texture_group)) = (
            bind_group_state.get_bind_group(SCENE_BIND_GROUP),
            bind_group_state.get_bind_group(TEXTURE_BIND_GROUP),
        ) else {
            warn!("Bind groups missing, skipping {} draws", draws.len());
            return;
        };
        rpass.set_bind_group(0, scene_group, &[]);
        rpass.set_bind_group(1, texture_group, &[]);

        for draw in draws {
            let (Some(pipeline), Some(mesh)) = (
                self.pipelines.get(&draw.program),
                buffer_state.get_buffer(draw.mesh),
            ) else {
                continue;
            };
            let count = draw.vertex_count.min(mesh.vertex_count);
            rpass.set_pipeline(pipeline);
            rpass.set_vertex_buffer(0, mesh.buffer.slice(..));
            rpass.draw(0..count, 0..1);
        }
    }
}

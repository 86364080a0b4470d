//! Manages WebGPU bind groups and their layouts.
//!
//! Every program compiled by the backend shares one pipeline layout made of two groups:
//! the scene uniform (camera and light) at group 0 and the bound texture at group 1.
//! The scene uniform buffer itself lives here because nothing else writes it.

use std::collections::HashMap;

use wgpu::{util::DeviceExt, BindGroup, BindGroupLayout, Buffer, Device, Queue};

use crate::engine_state::camera_state::camera::SceneUniform;

use super::texture::Texture;

/// Manages WebGPU bind groups and their layouts.
///
/// Groups and layouts are stored by name so pipeline creation and the render pass can
/// look them up without holding on to individual fields.
pub struct BindGroupState {
    /// Map of bind group names to their WebGPU bind group objects
    bind_groups: HashMap<&'static str, BindGroup>,
    /// Map of bind group layout names to their WebGPU bind group layout objects
    bind_group_layouts: HashMap<&'static str, BindGroupLayout>,
    /// Uniform buffer holding the current [`SceneUniform`]
    scene_buffer: Buffer,
    /// Texture currently bound at group 1
    texture: Texture,
}

impl BindGroupState {
    /// Creates the scene uniform group and a texture group bound to a white texel.
    pub fn new(device: &Device, queue: &Queue) -> Self {
        let mut bind_groups = HashMap::new();
        let mut bind_group_layouts = HashMap::new();

        let scene_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::cast_slice(&[SceneUniform::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let (scene_bind_group, scene_bind_group_layout) =
            Self::generate_scene_bindgroups(device, &scene_buffer);
        bind_groups.insert(SCENE_BIND_GROUP, scene_bind_group);
        bind_group_layouts.insert(SCENE_BIND_GROUP_LAYOUT, scene_bind_group_layout);

        let texture_bind_group_layout = Self::generate_texture_layout(device);
        let texture = Texture::white(device, queue);
        bind_groups.insert(
            TEXTURE_BIND_GROUP,
            Self::generate_texture_bindgroup(device, &texture_bind_group_layout, &texture),
        );
        bind_group_layouts.insert(TEXTURE_BIND_GROUP_LAYOUT, texture_bind_group_layout);

        Self {
            bind_groups,
            bind_group_layouts,
            scene_buffer,
            texture,
        }
    }

    /// Retrieves a bind group by name.
    pub fn get_bind_group(&self, name: &'static str) -> Option<&BindGroup> {
        self.bind_groups.get(name)
    }

    /// Retrieves a bind group layout by name.
    pub fn get_bind_group_layout(&self, name: &'static str) -> Option<&BindGroupLayout> {
        self.bind_group_layouts.get(name)
    }

    /// The layouts every program is built against, in group order.
    pub fn program_layouts(&self) -> Vec<&BindGroupLayout> {
        [SCENE_BIND_GROUP_LAYOUT, TEXTURE_BIND_GROUP_LAYOUT]
            .into_iter()
            .filter_map(|name| self.get_bind_group_layout(name))
            .collect()
    }

    /// Writes `uniform` into the scene buffer.
    pub fn write_scene(&self, queue: &Queue, uniform: &SceneUniform) {
        queue.write_buffer(&self.scene_buffer, 0, bytemuck::cast_slice(&[*uniform]));
    }

    /// Replaces the bound texture and rebuilds its bind group.
    pub fn bind_texture(&mut self, device: &Device, texture: Texture) {
        if let Some(layout) = self.bind_group_layouts.get(TEXTURE_BIND_GROUP_LAYOUT) {
            let group = Self::generate_texture_bindgroup(device, layout, &texture);
            self.bind_groups.insert(TEXTURE_BIND_GROUP, group);
            self.texture = texture;
        }
    }

    /// Size of the currently bound texture in texels.
    pub fn texture_size(&self) -> (u32, u32) {
        let size = self.texture.texture.size();
        (size.width, size.height)
    }

    fn generate_scene_bindgroups(device: &Device, buffer: &Buffer) -> (BindGroup, BindGroupLayout) {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some(SCENE_BIND_GROUP_LAYOUT),
        });

        let group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some(SCENE_BIND_GROUP),
        });

        (group, layout)
    }

    fn generate_texture_layout(device: &Device) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    // This should match the filterable field of the corresponding Texture entry above.
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
            label: Some(TEXTURE_BIND_GROUP_LAYOUT),
        })
    }

    fn generate_texture_bindgroup(
        device: &Device,
        layout: &BindGroupLayout,
        texture: &Texture,
    ) -> BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
            label: Some(TEXTURE_BIND_GROUP),
        })
    }
}

/// Name of the scene uniform bind group
pub const SCENE_BIND_GROUP: &str = "scene_bind_group";
/// Name of the scene uniform bind group layout
pub const SCENE_BIND_GROUP_LAYOUT: &str = "scene_bind_group_layout";
/// Name of the texture bind group
pub const TEXTURE_BIND_GROUP: &str = "texture_bind_group";
/// Name of the texture bind group layout
pub const TEXTURE_BIND_GROUP_LAYOUT: &str = "texture_bind_group_layout";

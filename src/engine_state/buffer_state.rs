//! # Buffer State Module
//!
//! This module provides the registry of GPU vertex buffers owned by the wgpu backend.
//!
//! ## Architecture
//!
//! Every uploaded mesh gets a fresh [`MeshHandle`]; the registry maps the handle to its
//! buffer and vertex count. Handles are never reused, so a stale handle held by a chunk
//! can only miss, never alias another mesh. The registry also keeps allocation analytics
//! so the engine can report how much GPU memory the world occupies.

use std::collections::HashMap;

use wgpu::{util::DeviceExt, Buffer, Device};

use crate::engine_state::rendering::{backend::MeshHandle, Vertex};

/// Analytics data for the registry
///
/// Tracks memory allocated for live buffers and the number of uploads performed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BufferAnalytics {
    /// Bytes held by live vertex buffers
    pub allocated_memory: u64,
    /// Number of buffers created since startup
    pub times_written: u64,
    /// Number of buffers released since startup
    pub times_released: u64,
}

/// A vertex buffer and the number of vertices it holds.
pub struct MeshBuffer {
    pub buffer: Buffer,
    pub vertex_count: u32,
}

/// Central registry for mesh vertex buffers
pub struct BufferState {
    /// Map of handles to buffer objects
    buffers: HashMap<MeshHandle, MeshBuffer>,
    next_handle: u32,
    analytics: BufferAnalytics,
}

impl BufferState {
    pub fn new() -> Self {
        Self {
            buffers: HashMap::new(),
            next_handle: 0,
            analytics: BufferAnalytics::default(),
        }
    }

    /// Creates a vertex buffer initialized with `vertices` and registers it.
    pub fn create_vertex_buffer(&mut self, device: &Device, vertices: &[Vertex]) -> MeshHandle {
        let handle = MeshHandle(self.next_handle);
        self.next_handle += 1;

        let contents: &[u8] = bytemuck::cast_slice(vertices);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Chunk Vertex Buffer"),
            contents,
            usage: wgpu::BufferUsages::VERTEX,
        });

        self.analytics.allocated_memory += contents.len() as u64;
        self.analytics.times_written += 1;
        self.buffers.insert(
            handle,
            MeshBuffer {
                buffer,
                vertex_count: vertices.len() as u32,
            },
        );
        handle
    }

    /// Destroys the buffer behind `handle`. Returns `false` for unknown handles.
    pub fn release(&mut self, handle: MeshHandle) -> bool {
        match self.buffers.remove(&handle) {
            Some(mesh) => {
                self.analytics.allocated_memory -= mesh.buffer.size();
                self.analytics.times_released += 1;
                mesh.buffer.destroy();
                true
            }
            None => false,
        }
    }

    /// Gets the buffer registered under `handle`
    pub fn get_buffer(&self, handle: MeshHandle) -> Option<&MeshBuffer> {
        self.buffers.get(&handle)
    }

    /// Number of live buffers.
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn analytics(&self) -> BufferAnalytics {
        self.analytics
    }
}

impl Default for BufferState {
    fn default() -> Self {
        Self::new()
    }
}

//! # Graphics Resources Builder
//!
//! This module handles the creation of the graphics resources required by the
//! application: the window, the wgpu surface, device and queue, and the shader and
//! texture assets read from disk.
//!
//! The main components are:
//! - `Graphics`: Holds all graphics-related resources
//! - `GraphicsBuilder`: Helper for graphics initialization on resume
//! - `MaybeGraphics`: Represents the various states of graphics initialization

use std::{future::Future, path::Path, sync::Arc};

use log::{error, info};
use thiserror::Error;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::{
    event_loop::{ActiveEventLoop, EventLoopProxy},
    window::Window,
};

use crate::engine_state::EngineAssets;

const CHUNK_SHADER_PATH: &str = "assets/shaders/chunk.wgsl";
const LIGHT_SHADER_PATH: &str = "assets/shaders/light.wgsl";
const PALETTE_PATH: &str = "assets/textures/palette.png";

/// Failures that leave the application without anything to draw on.
#[derive(Error, Debug)]
pub enum GraphicsError {
    #[error("could not create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("could not create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("could not create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// Contains all graphics-related resources required by the application.
///
/// It is created once on resume and handed to the engine state, which takes ownership
/// of the surface, device and queue.
pub struct Graphics {
    pub window: Arc<Window>,
    pub surface: Surface<'static>,
    pub surface_config: SurfaceConfiguration,
    pub device: Device,
    pub queue: Queue,
    pub assets: EngineAssets,
}

/// Reads a text asset. A missing file yields an empty string, which later fails shader
/// compilation and disables the matching draws.
fn read_text_asset(path: &str) -> String {
    match std::fs::read_to_string(Path::new(path)) {
        Ok(contents) => contents,
        Err(e) => {
            error!("Error reading {}: {:?}", path, e);
            String::new()
        }
    }
}

fn read_binary_asset(path: &str) -> Vec<u8> {
    match std::fs::read(Path::new(path)) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Error reading {}: {:?}", path, e);
            Vec::new()
        }
    }
}

/// Creates the window and, asynchronously, everything wgpu needs to draw into it.
fn create_graphics(
    event_loop: &ActiveEventLoop,
) -> Result<impl Future<Output = Result<Graphics, GraphicsError>> + 'static, GraphicsError> {
    let window_attrs = Window::default_attributes().with_title("Voxel Engine");
    let window = Arc::new(event_loop.create_window(window_attrs)?);

    // The instance is a handle to our GPU
    // Backends::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        flags: wgpu::InstanceFlags::empty(),
        backend_options: wgpu::BackendOptions::from_env_or_default(),
    });

    let surface = instance.create_surface(window.clone())?;

    Ok(async move {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await?;

        let size = window.inner_size();

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GraphicsError::NoSurfaceFormat)?;
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let assets = EngineAssets {
            chunk_shader: read_text_asset(CHUNK_SHADER_PATH),
            light_shader: read_text_asset(LIGHT_SHADER_PATH),
            palette: read_binary_asset(PALETTE_PATH),
        };

        Ok(Graphics {
            window,
            surface,
            surface_config,
            device,
            queue,
            assets,
        })
    })
}

/// Helper struct for managing the initialization of graphics resources.
pub struct GraphicsBuilder {
    event_loop_proxy: Option<EventLoopProxy<Graphics>>,
}

/// Represents the possible states of the graphics initialization process.
pub enum MaybeGraphics {
    /// State before initialization, waiting for the first resume
    Builder(GraphicsBuilder),

    /// State when graphics resources are fully initialized and ready for use
    Graphics(Graphics),

    /// State after graphics resources have been moved to another owner
    Moved,
}

impl GraphicsBuilder {
    /// Creates a new GraphicsBuilder with the specified event loop proxy.
    ///
    /// # Arguments
    /// * `event_loop_proxy` - Used to send the initialized graphics resources back to the main thread
    pub fn new(event_loop_proxy: EventLoopProxy<Graphics>) -> Self {
        Self {
            event_loop_proxy: Some(event_loop_proxy),
        }
    }

    /// Creates the graphics resources and sends them back through the event loop proxy.
    ///
    /// Failure to create any of them is fatal: the error is logged and the event loop
    /// is asked to exit.
    pub fn build_and_send(&mut self, event_loop: &ActiveEventLoop) {
        let Some(event_loop_proxy) = self.event_loop_proxy.take() else {
            // event_loop_proxy is already spent - we already constructed Graphics
            return;
        };

        let gfx = create_graphics(event_loop).and_then(pollster::block_on);
        match gfx {
            Ok(gfx) => {
                if event_loop_proxy.send_event(gfx).is_err() {
                    error!("Event loop closed before graphics were ready");
                    event_loop.exit();
                }
            }
            Err(err) => {
                error!("Graphics initialization failed: {}", err);
                event_loop.exit();
            }
        }
    }
}

//! # Voxel Engine
//!
//! A voxel world renderer built with Rust and WGPU: procedural terrain stored in
//! fixed-size chunks, per-face culled chunk meshes rebuilt lazily when voxels change,
//! and view-frustum culling of whole chunks before any meshing or drawing happens.
//!
//! ## Key Modules
//!
//! * `config` - Startup configuration loaded from `assets/config.json`
//! * `engine_state` - The engine components: voxels, meshing, camera and rendering
//! * `application_state` - Window management, input and the application lifecycle
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     voxel_engine::run();
//! }
//! ```

use application_state::{
    graphics_resources_builder::{GraphicsBuilder, MaybeGraphics},
    ApplicationState,
};
use config::{EngineConfig, CONFIG_PATH};
use log::{error, info};
use winit::event_loop::EventLoop;

mod application_state;
pub mod config;
pub mod engine_state;

/// Initializes logging, loads the configuration and runs the event loop until exit.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match EngineConfig::load(CONFIG_PATH) {
        Ok(config) => config,
        Err(err) => {
            error!("Invalid configuration in {}: {}", CONFIG_PATH, err);
            std::process::exit(1);
        }
    };

    let event_loop = match EventLoop::with_user_event().build() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            error!("Could not create event loop: {}", err);
            return;
        }
    };

    let mut state = ApplicationState::new(
        MaybeGraphics::Builder(GraphicsBuilder::new(event_loop.create_proxy())),
        config,
    );

    if let Err(err) = event_loop.run_app(&mut state) {
        error!("Event loop terminated with an error: {}", err);
    }
}

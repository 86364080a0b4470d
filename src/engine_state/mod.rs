//! # Engine State Module
//!
//! The core engine module that owns the world, the camera, the light and the renderer,
//! and drives them once per frame.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `buffer_state` - Registry of GPU vertex buffers
//! * `camera_state` - Camera positioning, movement and the view frustum
//! * `rendering` - The backend contract, the wgpu backend, meshing and dispatch
//! * `voxels` - Voxel data, chunks, world addressing and terrain generation
//!
//! ## Frame Loop
//!
//! Input is translated into a [`PlayerAction`], the camera consumes it and re-extracts
//! the frustum, the light advances along its orbit, and the renderer culls, rebuilds and
//! draws. Everything runs on the event loop thread.

use log::info;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::{event::MouseButton, keyboard::KeyCode};

use camera_state::{camera::SceneUniform, CameraState};
use fps_counter::FpsCounter;
use rendering::{
    backend::RenderBackend,
    light_marker::LightMarker,
    renderer::{Drawable, RenderContext, Renderer},
    wgpu_backend::WgpuBackend,
};
use voxels::{terrain::TerrainGenerator, world::World};

use crate::{
    application_state::input_state::ProcessedInputState,
    config::{ConfigError, EngineConfig},
};

mod buffer_state;
pub mod camera_state;
mod fps_counter;
pub mod rendering;
pub mod voxels;

/// Shader sources and the palette image read at startup.
#[derive(Debug, Default, Clone)]
pub struct EngineAssets {
    pub chunk_shader: String,
    pub light_shader: String,
    /// Encoded image bytes, decoded by the backend
    pub palette: Vec<u8>,
}

/// The main state container for the voxel engine
///
/// This struct owns all major subsystems and coordinates their interactions. It handles
/// input processing, camera and light updates, and rendering.
pub struct EngineState {
    /// Camera state managing position, orientation, movement and the frustum
    pub camera_state: CameraState,
    /// Current player actions derived from input
    pub player_actions: PlayerAction,
    /// The voxel world containing all chunk data
    pub world: World,
    /// The point light and its marker cube
    pub light: LightMarker,
    renderer: Renderer,
    backend: WgpuBackend,
    scene_uniform: SceneUniform,
    fps_counter: FpsCounter,
}

impl EngineState {
    /// Generates the world and prepares the renderer.
    ///
    /// Shader or texture failures are logged and leave the engine running with fewer
    /// draws; only an invalid configuration is an error.
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        assets: EngineAssets,
        config: EngineConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let terrain = TerrainGenerator::new(config.terrain);
        let world = World::new(config.world, &terrain)?;

        let camera_state = CameraState::new(config.camera, surface_config.width, surface_config.height);
        let light = LightMarker::new(&config.light, world.extent() as f32);

        let mut backend = WgpuBackend::new(surface, surface_config, device, queue);
        let mut renderer = Renderer::new();
        renderer.init(
            &mut backend,
            &assets.chunk_shader,
            &assets.light_shader,
            &assets.palette,
        );
        renderer.attach_world(&world);
        renderer.attach(Drawable::LightMarker);

        let mut engine_state = Self {
            camera_state,
            player_actions: PlayerAction::default(),
            world,
            light,
            renderer,
            backend,
            scene_uniform: SceneUniform::new(),
            fps_counter: FpsCounter::new(),
        };
        engine_state.update_scene_uniform();
        Ok(engine_state)
    }

    /// Resizes the rendering surface when the window size changes
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.backend.resize(size.width, size.height);
        self.camera_state.resize(size.width, size.height);
        self.update_scene_uniform();
    }

    /// Renders the current frame
    pub fn render(&mut self) {
        let stats = self.renderer.render(
            &mut RenderContext {
                world: &mut self.world,
                frustum: &self.camera_state.frustum,
                light: &self.light,
                scene: &self.scene_uniform,
            },
            &mut self.backend,
        );

        if let Some(fps) = self.fps_counter.tick() {
            info!(
                "FPS: {:.1} ({}/{} drawables in view)",
                fps, stats.rendered, stats.total
            );
        }
    }

    /// Consumes the pending player actions and advances the camera and light
    ///
    /// # Arguments
    ///
    /// * `wait_duration` - The time elapsed since the last frame
    pub fn process_input(&mut self, wait_duration: web_time::Duration) {
        let actions = std::mem::take(&mut self.player_actions);

        if actions.reset_camera {
            self.camera_state.reset();
            info!("Camera reset");
        }
        if actions.toggle_light_orbit {
            let orbiting = self.light.toggle_orbit();
            info!("Light orbit {}", if orbiting { "on" } else { "off" });
        }

        self.camera_state.intake_actions(&actions);
        self.camera_state.update(wait_duration);
        self.light.update(self.backend.elapsed());
        self.update_scene_uniform();
    }

    /// Sets the input commands for the engine state.
    pub fn set_input_commands(&mut self, input: ProcessedInputState) {
        self.player_actions = Self::translate_processed_input(&input);

        if self.player_actions.print_framebuffer_size {
            let (width, height) = self.backend.size();
            info!("Framebuffer size: {}x{}", width, height);
            info!(
                "Vertex buffers: {} live, {:?}",
                self.backend.buffer_state().len(),
                self.backend.buffer_state().analytics()
            );
            info!("Materials: {:?}", self.world.material_census());
        }
    }

    fn update_scene_uniform(&mut self) {
        self.scene_uniform
            .update_view_proj(&self.camera_state.camera, &self.camera_state.projection);
        self.scene_uniform
            .update_light(self.light.position, self.light.color);
    }

    /// Translates the processed input state into player actions.
    fn translate_processed_input(input: &ProcessedInputState) -> PlayerAction {
        let mut player_action = PlayerAction {
            // Movement actions - active if key is pressed or held
            move_forward: input.get_key_state(KeyCode::KeyW).is_active(),
            move_backward: input.get_key_state(KeyCode::KeyS).is_active(),
            move_left: input.get_key_state(KeyCode::KeyA).is_active(),
            move_right: input.get_key_state(KeyCode::KeyD).is_active(),
            move_up: input.get_key_state(KeyCode::Space).is_active(),
            move_down: input.get_key_state(KeyCode::ShiftLeft).is_active(),
            zoom: input.get_scroll_delta(),
            // Only trigger on press, not hold
            reset_camera: input.get_key_state(KeyCode::KeyR).is_just_pressed(),
            toggle_light_orbit: input.get_key_state(KeyCode::KeyH).is_just_pressed(),
            print_framebuffer_size: input.get_key_state(KeyCode::KeyI).is_just_pressed(),
            ..PlayerAction::default()
        };

        // Mouse rotation - active if left button is pressed or held & mouse has moved
        if input.get_mouse_button_state(MouseButton::Left).is_active() {
            player_action.rotate_view = input.get_mouse_delta();
        }

        player_action
    }
}

impl Drop for EngineState {
    fn drop(&mut self) {
        self.world.release_gpu_meshes(&mut self.backend);
        self.renderer.release(&mut self.backend);
    }
}

/// Represents player actions derived from input
///
/// This struct contains flags for various player actions that can be
/// triggered by input, such as movement, camera control, and debug actions.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PlayerAction {
    /// Movement actions - true if key is pressed or held
    pub(crate) move_forward: bool,
    pub(crate) move_backward: bool,
    pub(crate) move_left: bool,
    pub(crate) move_right: bool,
    pub(crate) move_up: bool,
    pub(crate) move_down: bool,

    /// View rotation - Some if mouse is pressed or held
    pub(crate) rotate_view: Option<(f64, f64)>,
    /// Field of view change in degrees, positive zooms in
    pub(crate) zoom: f32,

    /// Actions that should only trigger on key press, not hold
    pub(crate) reset_camera: bool,
    pub(crate) toggle_light_orbit: bool,
    pub(crate) print_framebuffer_size: bool,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::application_state::input_state::RawInputState;

    #[test]
    fn input_translates_to_actions() {
        let input = ProcessedInputState {
            keyboard_states: HashMap::from([
                (KeyCode::KeyW, RawInputState::Held),
                (KeyCode::KeyH, RawInputState::Pressed),
                (KeyCode::KeyR, RawInputState::Held),
            ]),
            mouse_button_states: HashMap::from([(MouseButton::Left, RawInputState::NotPressed)]),
            mouse_delta: Some((4.0, -2.0)),
            scroll_delta: 3.0,
        };

        let actions = EngineState::translate_processed_input(&input);
        assert!(actions.move_forward);
        assert!(!actions.move_backward);
        assert!(actions.toggle_light_orbit);
        // Held keys do not repeat one-shot actions
        assert!(!actions.reset_camera);
        // Looking around requires the left button
        assert_eq!(actions.rotate_view, None);
        assert_eq!(actions.zoom, 3.0);
    }
}

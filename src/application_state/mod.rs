//! # Application State Management
//!
//! This module handles the application's state management, including:
//! - Window and graphics initialization
//! - Input handling
//! - Application lifecycle events
//! - The transition from initialization to the running state

pub mod graphics_resources_builder;
pub mod input_manager;
pub mod input_state;

use std::sync::Arc;

use graphics_resources_builder::{Graphics, MaybeGraphics};
use input_manager::InputManager;

use log::{error, info};
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{config::EngineConfig, engine_state::EngineState};

/// The main application state container that manages the application's lifecycle.
///
/// This struct holds the current state of the application, including graphics resources,
/// input handling, and window management. It implements `ApplicationHandler` to handle
/// window and device events.
pub struct ApplicationState {
    /// The current graphics state, which may be waiting to be built, ready, or moved
    pub graphics: MaybeGraphics,

    /// The initialized application state, if the application has started
    pub state: Option<InitializedApplicationState>,

    /// Validated configuration the engine is built from
    pub config: EngineConfig,
}

/// Represents the fully initialized and running state of the application.
///
/// This struct contains all the necessary components for the running application,
/// including the engine state, window handle, and input management.
pub struct InitializedApplicationState {
    /// The core engine state and logic
    pub engine_state: EngineState,

    /// Handle to the application window
    pub window: Arc<Window>,

    /// Manages input state and event processing
    pub input_manager: InputManager,

    /// Timestamp of the last frame for delta time calculations
    pub last_wait_time: web_time::Instant,
}

fn is_exit_request(event: &WindowEvent) -> bool {
    matches!(
        event,
        WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event: KeyEvent {
                    state: ElementState::Pressed,
                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                    ..
                },
                ..
            }
    )
}

impl ApplicationState {
    /// Creates an application waiting for its first resume to build graphics.
    pub fn new(graphics: MaybeGraphics, config: EngineConfig) -> Self {
        Self {
            graphics,
            state: None,
            config,
        }
    }

    /// Initializes the application state with the required graphics resources.
    ///
    /// This method transitions the application from the initialization phase to the running state
    /// by setting up the engine state with the provided graphics resources.
    fn initialize_application_state(&mut self, event_loop: &ActiveEventLoop) {
        let MaybeGraphics::Graphics(gfx) = std::mem::replace(&mut self.graphics, MaybeGraphics::Moved)
        else {
            return;
        };

        let Graphics {
            window,
            surface,
            surface_config,
            device,
            queue,
            assets,
        } = gfx;

        match EngineState::new(
            surface,
            surface_config,
            device,
            queue,
            assets,
            self.config.clone(),
        ) {
            Ok(engine_state) => {
                info!("Engine initialized");
                self.state = Some(InitializedApplicationState {
                    engine_state,
                    window,
                    input_manager: InputManager::new(),
                    last_wait_time: web_time::Instant::now(),
                });
            }
            Err(err) => {
                error!("Engine initialization failed: {}", err);
                event_loop.exit();
            }
        }
    }
}

impl ApplicationHandler<Graphics> for ApplicationState {
    /// Handles window-related events such as resize, focus changes, and input events.
    ///
    /// # Arguments
    /// * `event_loop` - Reference to the active event loop
    /// * `_window_id` - ID of the window that generated the event
    /// * `event` - The window event to process
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if is_exit_request(&event) {
            event_loop.exit();
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };
        let input_manager = &mut state.input_manager;
        let engine_state = &mut state.engine_state;

        input_manager.intake_input(&event);

        match event {
            WindowEvent::Resized(size) => {
                engine_state.resize_surface(size);
            }
            WindowEvent::Focused(is_focused) => {
                if !is_focused {
                    input_manager.release_all();
                }
            }
            WindowEvent::RedrawRequested => {
                engine_state.render();
            }
            _ => (),
        }
    }

    /// Handles device-level input events such as mouse motion.
    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let Some(state) = &mut self.state {
            if let DeviceEvent::MouseMotion { delta } = event {
                // Just update the input state without immediate processing
                state.input_manager.intake_mouse_motion(delta);
            }
        }
    }

    /// Called when the application is resumed; builds the graphics on first resume.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let MaybeGraphics::Builder(builder) = &mut self.graphics {
            builder.build_and_send(event_loop);
        }
    }

    /// Receives the built graphics and starts the engine.
    fn user_event(&mut self, event_loop: &ActiveEventLoop, graphics: Graphics) {
        self.graphics = MaybeGraphics::Graphics(graphics);
        self.initialize_application_state(event_loop);
    }

    /// Called before the event loop goes to sleep.
    ///
    /// This method handles frame timing and input processing, then requests the next
    /// redraw.
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            let now = web_time::Instant::now();
            let wait_dt = now - state.last_wait_time;

            let frame_input = state.input_manager.take_frame_input();
            state.engine_state.set_input_commands(frame_input);

            state.engine_state.process_input(wait_dt);

            state.last_wait_time = now;
            state.window.request_redraw();
        }
    }
}

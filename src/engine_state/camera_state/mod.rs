//! # Camera State Management
//!
//! This module handles all camera-related functionality including:
//! - Camera position and orientation tracking
//! - View and projection matrix calculations
//! - Player input processing for camera control
//! - The view frustum used to cull chunks before they are meshed or drawn
//!
//! ## Core Components
//! - `Camera`: Represents the camera's position and orientation in 3D space
//! - `CameraController`: Handles player input and updates camera state
//! - `Projection`: Manages the camera's projection matrix
//! - `Frustum`: The six clip planes derived from projection×view

use camera::{Camera, CameraController, Projection};
use cgmath::Matrix4;
use frustum::Frustum;

use crate::config::CameraConfig;

use super::PlayerAction;

pub mod camera;
pub mod frustum;

/// Manages the complete camera system: state, controls and the derived frustum.
pub struct CameraState {
    /// The current camera position and orientation
    pub camera: Camera,
    /// Perspective settings, including the zoomable field of view
    pub projection: Projection,
    /// Handles player input and camera movement
    pub camera_controller: CameraController,
    /// Clip planes of the current view
    pub frustum: Frustum,
    /// Defaults the camera is reset to
    defaults: CameraConfig,
}

impl CameraState {
    /// Creates a camera placed according to `config` for a `width`×`height` viewport.
    pub fn new(config: CameraConfig, width: u32, height: u32) -> Self {
        let camera = Camera::from_config(&config);
        let projection = Projection::from_config(&config, width, height);
        let frustum = Frustum::from_matrix(projection.calc_gl_matrix() * camera.calc_matrix());
        Self {
            camera,
            projection,
            camera_controller: CameraController::new(config.speed, config.sensitivity),
            frustum,
            defaults: config,
        }
    }

    /// Processes player input actions and updates the camera controller state.
    pub fn intake_actions(&mut self, actions: &PlayerAction) {
        self.camera_controller.intake_actions(actions);
    }

    /// Applies pending movement and zoom, then re-extracts the frustum.
    ///
    /// Returns `true` if the camera moved, turned or zoomed.
    pub fn update(&mut self, dt: web_time::Duration) -> bool {
        let mut changed = false;
        if self.camera_controller.has_updates() {
            self.camera
                .get_controller_updates_and_reset_controller(&mut self.camera_controller, dt);
            changed = true;
        }

        let scroll = self.camera_controller.take_scroll();
        if scroll != 0.0 {
            self.projection.zoom(scroll);
            changed = true;
        }

        self.frustum.update(self.frustum_matrix());
        changed
    }

    /// Puts the camera back at its configured position, orientation and field of view.
    pub fn reset(&mut self) {
        self.camera = Camera::from_config(&self.defaults);
        self.projection
            .set_fovy(cgmath::Deg(self.defaults.fov_degrees));
        self.frustum.update(self.frustum_matrix());
    }

    /// Updates the aspect ratio for a resized viewport.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
        self.frustum.update(self.frustum_matrix());
    }

    /// Projection×view in the OpenGL clip convention, as the frustum expects.
    pub fn frustum_matrix(&self) -> Matrix4<f32> {
        self.projection.calc_gl_matrix() * self.camera.calc_matrix()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{EuclideanSpace, Point3};
    use web_time::Duration;

    use super::*;

    #[test]
    fn reset_restores_the_configured_camera() {
        let config = CameraConfig::default();
        let mut state = CameraState::new(config, 800, 600);
        state.intake_actions(&PlayerAction {
            move_up: true,
            zoom: 30.0,
            ..PlayerAction::default()
        });
        assert!(state.update(Duration::from_secs(1)));
        assert!(state.camera.position.y > config.position[1]);

        state.reset();
        assert_eq!(state.camera.position, Point3::from(config.position));
        assert!((state.projection.fovy().0 - config.fov_degrees).abs() < 1e-4);
    }

    #[test]
    fn frustum_follows_the_camera() {
        let mut state = CameraState::new(
            CameraConfig {
                position: [0.0, 0.0, 0.0],
                yaw_degrees: 0.0,
                pitch_degrees: 0.0,
                ..CameraConfig::default()
            },
            800,
            800,
        );
        let ahead = Point3::new(10.0, 0.0, 0.0);
        assert!(state.frustum.point_in(ahead));

        state.camera.yaw = cgmath::Deg(180.0).into();
        assert!(!state.update(Duration::from_millis(16)));
        assert!(!state.frustum.point_in(ahead));
        assert!(state.frustum.point_in(Point3::origin() + (Point3::origin() - ahead)));
    }
}

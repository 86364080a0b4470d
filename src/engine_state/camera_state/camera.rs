//! # Camera Implementation
//!
//! This module contains the core camera implementation including:
//! - Camera representation and transformations
//! - Projection matrix handling, in both OpenGL and WGPU clip conventions
//! - Camera controller for input processing
//! - The scene uniform shared with the shaders
//!
//! ## Key Components
//! - `Camera`: Represents the camera's position and orientation in 3D space
//! - `Projection`: Manages perspective projection settings and scroll zoom
//! - `CameraController`: Handles user input for camera movement
//! - `SceneUniform`: Packed camera and light data for GPU shaders

use cgmath::*;
use std::f32::consts::FRAC_PI_2;
use web_time::Duration;

use crate::{config::CameraConfig, engine_state::PlayerAction};

/// Transformation matrix to convert from OpenGL's coordinate system to WGPU's.
///
/// OpenGL clip space has Z in `[-w, w]`, WGPU has Z in `[0, w]`. This matrix:
/// 1. Scales the Z coordinate from [-1, 1] to [-0.5, 0.5]
/// 2. Translates the Z coordinate from [-0.5, 0.5] to [0, 1]
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,  // Scale Z from [-1,1] to [-0.5,0.5]
    0.0, 0.0, 0.5, 1.0,  // Translate Z from [-0.5,0.5] to [0,1]
);

/// Safe limit for pitch to prevent gimbal lock
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// Narrowest field of view reachable by zooming, in degrees.
pub const MIN_FOV_DEGREES: f32 = 1.0;
/// Widest field of view reachable by zooming, in degrees.
pub const MAX_FOV_DEGREES: f32 = 60.0;

/// Represents a first-person camera in 3D space.
///
/// Yaw is measured from +X towards +Z, pitch from the horizon towards +Y.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    /// The camera's position in world space
    pub position: Point3<f32>,
    /// Horizontal rotation (around Y axis) in radians
    pub yaw: Rad<f32>,
    /// Vertical rotation (around X axis) in radians
    pub pitch: Rad<f32>,
}

impl Camera {
    /// Creates a new camera with the specified position and orientation.
    ///
    /// # Example
    /// ```rust
    /// use cgmath::{Point3, Deg};
    /// use voxel_engine::engine_state::camera_state::camera::Camera;
    ///
    /// let camera = Camera::new(
    ///     Point3::new(0.0, 0.0, 0.0),  // Position at origin
    ///     Deg(0.0),                     // Facing along positive X
    ///     Deg(0.0),                     // Level horizon
    /// );
    /// assert!((camera.forward().x - 1.0).abs() < 1e-6);
    /// ```
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    /// Builds the camera described by the configuration defaults.
    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(
            config.position,
            Deg(config.yaw_degrees),
            Deg(config.pitch_degrees),
        )
    }

    /// Unit vector the camera is looking along.
    pub fn forward(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        Vector3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin).normalize()
    }

    /// Calculates the view matrix for this camera.
    ///
    /// The view matrix transforms world coordinates to view (camera) space.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.forward(), Vector3::unit_y())
    }

    /// Updates the camera's position and orientation based on controller input.
    ///
    /// # Notes
    /// - Handles movement (WASD, space/shift for up/down)
    /// - Handles rotation (mouse look)
    /// - Resets the controller's per-frame amounts
    pub fn get_controller_updates_and_reset_controller(
        &mut self,
        controller: &mut CameraController,
        dt: Duration,
    ) {
        let dt = dt.as_secs_f32();

        // Move forward/backward and left/right
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let forward = Vector3::new(yaw_cos, 0.0, yaw_sin).normalize();
        let right = Vector3::new(-yaw_sin, 0.0, yaw_cos).normalize();
        self.position += forward * (controller.amount_forward - controller.amount_backward) * dt;
        self.position += right * (controller.amount_right - controller.amount_left) * dt;

        // Move up/down
        self.position.y += (controller.amount_up - controller.amount_down) * dt;

        // Rotate
        self.yaw += Rad(controller.rotate_horizontal) * dt;
        self.pitch += Rad(-controller.rotate_vertical) * dt;

        controller.reset_movement();

        // Clamp pitch to prevent gimbal lock
        if self.pitch < -Rad(SAFE_FRAC_PI_2) {
            self.pitch = -Rad(SAFE_FRAC_PI_2);
        } else if self.pitch > Rad(SAFE_FRAC_PI_2) {
            self.pitch = Rad(SAFE_FRAC_PI_2);
        }
    }
}

/// Represents a camera's projection matrix and related parameters.
///
/// This handles the perspective projection used to render the 3D scene.
/// It manages the aspect ratio, field of view, and near/far clipping planes.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    /// Aspect ratio (width / height)
    aspect: f32,
    /// Vertical field of view in radians
    fovy: Rad<f32>,
    /// Near clipping plane distance
    znear: f32,
    /// Far clipping plane distance
    zfar: f32,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    /// * `fovy` - Vertical field of view (can be any type convertible to `Rad<f32>`)
    /// * `znear` - Near clipping plane distance
    /// * `zfar` - Far clipping plane distance
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        let mut projection = Self {
            aspect: 1.0,
            fovy: fovy.into(),
            znear,
            zfar,
        };
        projection.resize(width, height);
        projection
    }

    /// Builds the projection described by the configuration defaults.
    pub fn from_config(config: &CameraConfig, width: u32, height: u32) -> Self {
        Self::new(
            width,
            height,
            Deg(config.fov_degrees),
            config.znear,
            config.zfar,
        )
    }

    /// Updates the projection's aspect ratio for viewport resizing.
    ///
    /// A zero-sized viewport (minimized window) keeps the previous aspect ratio.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Narrows (positive `amount`) or widens the field of view by `amount` degrees.
    ///
    /// The result is clamped to [`MIN_FOV_DEGREES`, `MAX_FOV_DEGREES`].
    pub fn zoom(&mut self, amount: f32) {
        let fov = Deg::from(self.fovy).0 - amount;
        self.fovy = Deg(fov.clamp(MIN_FOV_DEGREES, MAX_FOV_DEGREES)).into();
    }

    /// Current vertical field of view.
    pub fn fovy(&self) -> Deg<f32> {
        self.fovy.into()
    }

    /// Sets the vertical field of view without clamping.
    pub fn set_fovy<F: Into<Rad<f32>>>(&mut self, fovy: F) {
        self.fovy = fovy.into();
    }

    /// The perspective projection in OpenGL clip convention (Z in `[-w, w]`).
    ///
    /// This is the matrix the view frustum is extracted from.
    pub fn calc_gl_matrix(&self) -> Matrix4<f32> {
        perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }

    /// Calculates the projection matrix used on the GPU.
    ///
    /// Combines the perspective projection with the OpenGL to WGPU coordinate system transform.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * self.calc_gl_matrix()
    }
}

/// Handles camera movement and rotation based on user input.
///
/// This struct tracks the current state of movement keys and mouse input,
/// and applies them to the camera when updated.
#[derive(Debug)]
pub struct CameraController {
    // Movement amounts, in world units per second
    amount_left: f32,
    amount_right: f32,
    amount_forward: f32,
    amount_backward: f32,
    amount_up: f32,
    amount_down: f32,

    // Rotation amounts, in radians per second
    rotate_horizontal: f32,
    rotate_vertical: f32,

    // Pending zoom, in degrees
    scroll: f32,

    // Configuration
    speed: f32,
    sensitivity: f32,
}

impl CameraController {
    /// Creates a new camera controller with the given speed and sensitivity.
    ///
    /// # Arguments
    /// * `speed` - Base movement speed in units per second
    /// * `sensitivity` - Mouse look sensitivity multiplier
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            amount_left: 0.0,
            amount_right: 0.0,
            amount_forward: 0.0,
            amount_backward: 0.0,
            amount_up: 0.0,
            amount_down: 0.0,
            rotate_horizontal: 0.0,
            rotate_vertical: 0.0,
            scroll: 0.0,
            speed,
            sensitivity,
        }
    }

    /// Processes player actions and updates controller state accordingly.
    pub fn intake_actions(&mut self, actions: &PlayerAction) {
        if actions.move_forward {
            self.amount_forward = self.speed;
        }
        if actions.move_backward {
            self.amount_backward = self.speed;
        }
        if actions.move_left {
            self.amount_left = self.speed;
        }
        if actions.move_right {
            self.amount_right = self.speed;
        }
        if actions.move_up {
            self.amount_up = self.speed;
        }
        if actions.move_down {
            self.amount_down = self.speed;
        }
        if let Some((delta_x, delta_y)) = actions.rotate_view {
            if delta_x.abs() > 0.5 {
                self.rotate_horizontal = (delta_x as f32) * self.sensitivity;
            }
            if delta_y.abs() > 0.5 {
                self.rotate_vertical = (delta_y as f32) * self.sensitivity;
            }
        }
        self.scroll += actions.zoom;
    }

    /// Checks if there are any pending updates that would move or turn the camera.
    pub fn has_updates(&self) -> bool {
        self.amount_forward > 0.0
            || self.amount_backward > 0.0
            || self.amount_left > 0.0
            || self.amount_right > 0.0
            || self.amount_up > 0.0
            || self.amount_down > 0.0
            || self.rotate_horizontal != 0.0
            || self.rotate_vertical != 0.0
    }

    /// Returns and clears the pending zoom amount.
    pub fn take_scroll(&mut self) -> f32 {
        std::mem::take(&mut self.scroll)
    }

    fn reset_movement(&mut self) {
        self.rotate_horizontal = 0.0;
        self.rotate_vertical = 0.0;
        self.amount_up = 0.0;
        self.amount_down = 0.0;
        self.amount_left = 0.0;
        self.amount_right = 0.0;
        self.amount_forward = 0.0;
        self.amount_backward = 0.0;
    }
}

/// GPU-friendly representation of the per-frame scene data.
///
/// Every field is padded to 16 bytes to match WGSL uniform layout rules.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    // We can't use cgmath with bytemuck directly so we'll have to convert the Matrix4 into a 4x4 f32 array
    view_proj: [[f32; 4]; 4],
    view_position: [f32; 4],
    light_position: [f32; 4],
    light_color: [f32; 4],
}

impl SceneUniform {
    /// Creates a new uniform with an identity matrix and a white light at the origin.
    pub fn new() -> Self {
        Self {
            view_proj: cgmath::Matrix4::identity().into(),
            view_position: [0.0; 4],
            light_position: [0.0; 4],
            light_color: [1.0, 1.0, 1.0, 0.0],
        }
    }

    /// Updates the view-projection matrix and view position from the camera.
    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        let view_proj = projection.calc_matrix() * camera.calc_matrix();
        self.view_proj = view_proj.into();
        let pos3: [f32; 3] = camera.position.into();
        self.view_position = [pos3[0], pos3[1], pos3[2], 1.0];
    }

    /// Updates the light position and color.
    pub fn update_light(&mut self, position: Point3<f32>, color: [f32; 3]) {
        self.light_position = [position.x, position.y, position.z, 1.0];
        self.light_color = [color[0], color[1], color[2], 0.0];
    }

    pub fn light_position(&self) -> Point3<f32> {
        Point3::new(
            self.light_position[0],
            self.light_position[1],
            self.light_position[2],
        )
    }
}

impl Default for SceneUniform {
    fn default() -> Self {
        Self::new()
    }
}

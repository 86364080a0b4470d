//! # Input Manager
//!
//! Collects winit events between two frames and hands the engine one
//! [`ProcessedInputState`] per frame: key and button transitions, the summed mouse
//! motion, and the scroll wheel converted to degrees of zoom.

use winit::{
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::input_state::{ButtonStates, ProcessedInputState};

/// Keys bound to a player action.
const BOUND_KEYS: [KeyCode; 9] = [
    KeyCode::KeyW,
    KeyCode::KeyS,
    KeyCode::KeyA,
    KeyCode::KeyD,
    KeyCode::KeyR,
    KeyCode::KeyH,
    KeyCode::KeyI,
    KeyCode::Space,
    KeyCode::ShiftLeft,
];

const BOUND_BUTTONS: [MouseButton; 3] = [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

/// Zoom in degrees per wheel notch.
const DEGREES_PER_LINE: f32 = 2.0;
/// Zoom in degrees per pixel of touchpad scroll.
const DEGREES_PER_PIXEL: f32 = 0.05;

/// Per-frame accumulator of window and device input.
pub struct InputManager {
    keys: ButtonStates<KeyCode>,
    mouse_buttons: ButtonStates<MouseButton>,
    scroll_degrees: f32,
    mouse_delta: Option<(f64, f64)>,
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            keys: ButtonStates::tracking(BOUND_KEYS),
            mouse_buttons: ButtonStates::tracking(BOUND_BUTTONS),
            scroll_degrees: 0.0,
            mouse_delta: None,
        }
    }

    /// Records key, mouse button and wheel events. Other events are ignored.
    pub fn intake_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(key),
                        ..
                    },
                ..
            } => {
                self.keys.set(*key, *state == ElementState::Pressed);
            }
            WindowEvent::MouseInput { button, state, .. } => {
                self.mouse_buttons
                    .set(*button, *state == ElementState::Pressed);
            }
            WindowEvent::MouseWheel { delta, .. } => self.intake_scroll(*delta),
            _ => {}
        }
    }

    fn intake_scroll(&mut self, delta: MouseScrollDelta) {
        self.scroll_degrees += match delta {
            MouseScrollDelta::LineDelta(_, y) => y * DEGREES_PER_LINE,
            MouseScrollDelta::PixelDelta(position) => position.y as f32 * DEGREES_PER_PIXEL,
        };
    }

    /// Adds raw mouse motion; several device events may arrive per frame.
    pub fn intake_mouse_motion(&mut self, delta: (f64, f64)) {
        let (dx, dy) = self.mouse_delta.unwrap_or((0.0, 0.0));
        self.mouse_delta = Some((dx + delta.0, dy + delta.1));
    }

    /// Snapshot of this frame's input. Starts the next frame afterwards.
    pub fn take_frame_input(&mut self) -> ProcessedInputState {
        let input = ProcessedInputState {
            keyboard_states: self.keys.transitions(),
            mouse_button_states: self.mouse_buttons.transitions(),
            mouse_delta: self.mouse_delta.take(),
            scroll_delta: std::mem::take(&mut self.scroll_degrees),
        };
        self.keys.advance();
        self.mouse_buttons.advance();
        input
    }

    /// Releases everything held so no key stays stuck while the window is unfocused.
    pub fn release_all(&mut self) {
        self.keys.release_all();
        self.mouse_buttons.release_all();
        self.scroll_degrees = 0.0;
        self.mouse_delta = None;
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::PhysicalPosition;

    use super::*;
    use crate::application_state::input_state::RawInputState;

    #[test]
    fn scroll_and_motion_accumulate_until_taken() {
        let mut input = InputManager::new();
        input.intake_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        input.intake_scroll(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 20.0)));
        input.intake_mouse_motion((1.0, 2.0));
        input.intake_mouse_motion((3.0, -1.0));

        let frame = input.take_frame_input();
        assert_eq!(frame.get_scroll_delta(), 3.0);
        assert_eq!(frame.get_mouse_delta(), Some((4.0, 1.0)));

        let next = input.take_frame_input();
        assert_eq!(next.get_scroll_delta(), 0.0);
        assert_eq!(next.get_mouse_delta(), None);
    }

    #[test]
    fn losing_focus_releases_held_buttons() {
        let mut input = InputManager::new();
        input.mouse_buttons.set(MouseButton::Left, true);
        assert!(input
            .take_frame_input()
            .get_mouse_button_state(MouseButton::Left)
            .is_just_pressed());

        input.release_all();
        let frame = input.take_frame_input();
        assert_eq!(
            frame.get_mouse_button_state(MouseButton::Left),
            RawInputState::Released
        );
        assert!(!frame.get_key_state(KeyCode::KeyW).is_active());
    }
}

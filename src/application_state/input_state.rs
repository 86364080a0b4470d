//! # Input State
//!
//! This module defines the input state types used by the input manager.
//! It provides enums and structs for representing the state of input devices.

use std::{collections::HashMap, hash::Hash};

use winit::{event::MouseButton, keyboard::KeyCode};

/// Represents the state of a key or button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawInputState {
    /// Key/button is not pressed
    NotPressed,
    /// Key/button was just pressed this frame
    Pressed,
    /// Key/button has been held down for multiple frames
    Held,
    /// Key/button was just released this frame
    Released,
}

impl Default for RawInputState {
    fn default() -> Self {
        Self::NotPressed
    }
}

impl RawInputState {
    /// Determines if the input is actively down (either pressed or held)
    pub fn is_active(&self) -> bool {
        matches!(self, RawInputState::Pressed | RawInputState::Held)
    }
    
    /// Determines if the input was just pressed this frame
    pub fn is_just_pressed(&self) -> bool {
        matches!(self, RawInputState::Pressed)
    }
    
    /// Updates the input state based on the previous and current raw states
    pub fn from_raw_states(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => RawInputState::Pressed,   // Wasn't pressed, now is = PRESSED
            (true, true) => RawInputState::Held,       // Was pressed, still is = HELD
            (true, false) => RawInputState::Released,  // Was pressed, now isn't = RELEASED
            (false, false) => RawInputState::NotPressed, // Wasn't pressed, still isn't = NOT PRESSED
        }
    }
}

/// A snapshot of the processed input states with state transitions.
///
/// This struct provides access to the processed state of all input devices,
/// with key and button states translated into RawInputState enum values.
pub struct ProcessedInputState {
    /// Current state of all tracked keyboard keys
    pub keyboard_states: HashMap<KeyCode, RawInputState>,
    
    /// Current state of mouse buttons
    pub mouse_button_states: HashMap<MouseButton, RawInputState>,
    
    /// Mouse movement delta since the last frame (x, y)
    pub mouse_delta: Option<(f64, f64)>,

    /// Scroll wheel movement since the last frame, in zoom degrees
    pub scroll_delta: f32,
}

impl ProcessedInputState {
    /// Gets the state of a keyboard key
    pub fn get_key_state(&self, key: KeyCode) -> RawInputState {
        self.keyboard_states.get(&key).copied().unwrap_or_default()
    }
    
    /// Gets the state of a mouse button
    pub fn get_mouse_button_state(&self, button: MouseButton) -> RawInputState {
        self.mouse_button_states.get(&button).copied().unwrap_or_default()
    }
    
    /// Gets the mouse movement delta since the last frame
    pub fn get_mouse_delta(&self) -> Option<(f64, f64)> {
        self.mouse_delta
    }

    /// Gets the scroll movement since the last frame, positive away from the user
    pub fn get_scroll_delta(&self) -> f32 {
        self.scroll_delta
    }
}

/// Pressed flags for a fixed set of keys or buttons, for this frame and the last.
///
/// Inputs outside the tracked set are ignored.
#[derive(Debug, Clone)]
pub struct ButtonStates<T> {
    previous: HashMap<T, bool>,
    current: HashMap<T, bool>,
}

impl<T: Copy + Eq + Hash> ButtonStates<T> {
    pub fn tracking(inputs: impl IntoIterator<Item = T>) -> Self {
        let current: HashMap<T, bool> = inputs.into_iter().map(|input| (input, false)).collect();
        Self {
            previous: current.clone(),
            current,
        }
    }

    /// Records a press or release. Returns `false` for untracked inputs.
    pub fn set(&mut self, input: T, pressed: bool) -> bool {
        match self.current.get_mut(&input) {
            Some(state) => {
                *state = pressed;
                true
            }
            None => false,
        }
    }

    /// Transition of every tracked input since the last [`ButtonStates::advance`].
    pub fn transitions(&self) -> HashMap<T, RawInputState> {
        self.current
            .iter()
            .map(|(&input, &now)| {
                let before = self.previous.get(&input).copied().unwrap_or(false);
                (input, RawInputState::from_raw_states(before, now))
            })
            .collect()
    }

    /// Makes the current flags the baseline for the next frame.
    pub fn advance(&mut self) {
        self.previous.clone_from(&self.current);
    }

    /// Marks every input released, e.g. after the window loses focus.
    pub fn release_all(&mut self) {
        self.current.values_mut().for_each(|pressed| *pressed = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_follow_previous_and_current_state() {
        assert_eq!(RawInputState::from_raw_states(false, true), RawInputState::Pressed);
        assert_eq!(RawInputState::from_raw_states(true, true), RawInputState::Held);
        assert_eq!(RawInputState::from_raw_states(true, false), RawInputState::Released);
        assert!(RawInputState::Held.is_active());
        assert!(!RawInputState::Held.is_just_pressed());
        assert!(!RawInputState::Released.is_active());
    }

    #[test]
    fn untracked_inputs_read_as_not_pressed() {
        let input = ProcessedInputState {
            keyboard_states: HashMap::new(),
            mouse_button_states: HashMap::new(),
            mouse_delta: None,
            scroll_delta: 0.0,
        };
        assert_eq!(input.get_key_state(KeyCode::KeyQ), RawInputState::NotPressed);
        assert_eq!(
            input.get_mouse_button_state(MouseButton::Right),
            RawInputState::NotPressed
        );
    }

    #[test]
    fn button_states_report_one_press_then_hold() {
        let mut keys = ButtonStates::tracking([KeyCode::KeyW, KeyCode::KeyH]);
        assert!(keys.set(KeyCode::KeyW, true));
        assert!(!keys.set(KeyCode::KeyQ, true));
        assert_eq!(keys.transitions()[&KeyCode::KeyW], RawInputState::Pressed);
        assert_eq!(keys.transitions()[&KeyCode::KeyH], RawInputState::NotPressed);
        assert!(!keys.transitions().contains_key(&KeyCode::KeyQ));

        keys.advance();
        assert_eq!(keys.transitions()[&KeyCode::KeyW], RawInputState::Held);

        keys.release_all();
        assert_eq!(keys.transitions()[&KeyCode::KeyW], RawInputState::Released);
        keys.advance();
        assert_eq!(keys.transitions()[&KeyCode::KeyW], RawInputState::NotPressed);
    }
}

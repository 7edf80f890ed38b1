//! # Input Module
//!
//! Per-frame mouse and keyboard state. Edge-triggered events (pressed, released) last
//! exactly one frame; held state persists until release.

use macroquad::prelude::*;
use std::collections::HashSet;

/// Mouse buttons tracked by the framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButtonIndex {
    Left = 0,
    Right = 1,
    Middle = 2,
}

impl MouseButtonIndex {
    pub const ALL: [MouseButtonIndex; 3] = [
        MouseButtonIndex::Left,
        MouseButtonIndex::Right,
        MouseButtonIndex::Middle,
    ];

    fn slot(self) -> usize {
        self as usize
    }

    fn to_macroquad(self) -> MouseButton {
        match self {
            MouseButtonIndex::Left => MouseButton::Left,
            MouseButtonIndex::Right => MouseButton::Right,
            MouseButtonIndex::Middle => MouseButton::Middle,
        }
    }
}

/// Snapshot of the input devices for the current frame.
///
/// # Examples
///
/// ```
/// use pixelfw::{InputState, MouseButtonIndex};
///
/// let mut input = InputState::new();
/// input.press_mouse(MouseButtonIndex::Left);
/// assert!(input.is_mouse_pressed(MouseButtonIndex::Left));
///
/// input.end_frame();
/// assert!(!input.is_mouse_pressed(MouseButtonIndex::Left));
/// assert!(input.is_mouse_down(MouseButtonIndex::Left));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InputState {
    mouse: (f32, f32),
    mouse_pressed: [bool; 3],
    mouse_released: [bool; 3],
    mouse_held: [bool; 3],
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mouse position in world space.
    pub fn mouse(&self) -> (f32, f32) {
        self.mouse
    }

    /// Maps a screen-space cursor position into world space.
    ///
    /// The position is divided by the pixel size, truncated, then offset by the camera
    /// origin.
    pub fn set_mouse_screen(&mut self, x: f32, y: f32, pixel_size: u32, origin: (f32, f32)) {
        let scale = pixel_size.max(1) as f32;
        self.mouse = ((x / scale).floor() + origin.0, (y / scale).floor() + origin.1);
    }

    pub fn press_mouse(&mut self, button: MouseButtonIndex) {
        self.mouse_pressed[button.slot()] = true;
        self.mouse_held[button.slot()] = true;
    }

    pub fn release_mouse(&mut self, button: MouseButtonIndex) {
        self.mouse_released[button.slot()] = true;
        self.mouse_held[button.slot()] = false;
    }

    /// True while the button is held.
    pub fn is_mouse_down(&self, button: MouseButtonIndex) -> bool {
        self.mouse_held[button.slot()]
    }

    /// True on the frame the button went down.
    pub fn is_mouse_pressed(&self, button: MouseButtonIndex) -> bool {
        self.mouse_pressed[button.slot()]
    }

    /// True on the frame the button came up.
    pub fn is_mouse_up(&self, button: MouseButtonIndex) -> bool {
        self.mouse_released[button.slot()]
    }

    pub fn press_key(&mut self, key: KeyCode) {
        if self.keys_down.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    pub fn release_key(&mut self, key: KeyCode) {
        if self.keys_down.remove(&key) {
            self.keys_released.insert(key);
        }
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    /// Clears the edge-triggered state. Called once at the end of every frame.
    pub fn end_frame(&mut self) {
        self.mouse_pressed = [false; 3];
        self.mouse_released = [false; 3];
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    /// Reads the live macroquad input state.
    ///
    /// Must only be called inside a running macroquad window.
    pub fn poll_macroquad(&mut self, pixel_size: u32, origin: (f32, f32)) {
        let (x, y) = mouse_position();
        self.set_mouse_screen(x, y, pixel_size, origin);

        for button in MouseButtonIndex::ALL {
            if is_mouse_button_pressed(button.to_macroquad()) {
                self.press_mouse(button);
            }
            if is_mouse_button_released(button.to_macroquad()) {
                self.release_mouse(button);
            }
        }

        for key in get_keys_pressed() {
            self.press_key(key);
        }
        for key in get_keys_released() {
            self.release_key(key);
        }
        self.keys_down = get_keys_down();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_maps_to_world_space() {
        let mut input = InputState::new();
        input.set_mouse_screen(101.0, 47.0, 2, (-380.0, -290.0));
        assert_eq!(input.mouse(), (-330.0, -267.0));
    }

    #[test]
    fn test_mouse_release_clears_hold() {
        let mut input = InputState::new();
        input.press_mouse(MouseButtonIndex::Right);
        input.end_frame();
        input.release_mouse(MouseButtonIndex::Right);
        assert!(input.is_mouse_up(MouseButtonIndex::Right));
        assert!(!input.is_mouse_down(MouseButtonIndex::Right));
        assert!(!input.is_mouse_down(MouseButtonIndex::Left));
    }

    #[test]
    fn test_key_press_fires_once_while_held() {
        let mut input = InputState::new();
        input.press_key(KeyCode::Space);
        assert!(input.is_key_pressed(KeyCode::Space));
        input.end_frame();

        input.press_key(KeyCode::Space);
        assert!(!input.is_key_pressed(KeyCode::Space));
        assert!(input.is_key_down(KeyCode::Space));

        input.release_key(KeyCode::Space);
        assert!(input.is_key_released(KeyCode::Space));
        input.end_frame();
        assert!(!input.is_key_released(KeyCode::Space));
        assert!(!input.is_key_down(KeyCode::Space));
    }
}

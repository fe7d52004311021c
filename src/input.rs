//! Keyboard and mouse state collected from winit events.
//!
//! Key and button state persists until the matching release event. Mouse
//! motion and wheel movement accumulate over a frame and are reset by
//! [`InputState::end_frame`].

use std::collections::HashSet;

use winit::{
    event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// Wheel units per line, matching what most desktop platforms report per notch.
const WHEEL_UNITS_PER_LINE: f32 = 120.0;

#[derive(Debug, Default)]
pub struct InputState {
    keys: HashSet<KeyCode>,
    buttons: HashSet<MouseButton>,
    mouse_delta: (f32, f32),
    wheel_delta: f32,
    close_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.press(code),
                        ElementState::Released => self.release(code),
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => self.press_button(*button),
                ElementState::Released => self.release_button(*button),
            },
            WindowEvent::MouseWheel { delta, .. } => {
                self.wheel_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => y * WHEEL_UNITS_PER_LINE,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                };
            }
            WindowEvent::Focused(false) => {
                // Releases are lost while unfocused; don't keep running forever.
                self.keys.clear();
                self.buttons.clear();
            }
            WindowEvent::CloseRequested => self.close_requested = true,
            _ => (),
        }
    }

    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.add_mouse_motion(*dx as f32, *dy as f32);
        }
    }

    pub fn press(&mut self, key: KeyCode) {
        self.keys.insert(key);
    }

    pub fn release(&mut self, key: KeyCode) {
        self.keys.remove(&key);
    }

    pub fn press_button(&mut self, button: MouseButton) {
        self.buttons.insert(button);
    }

    pub fn release_button(&mut self, button: MouseButton) {
        self.buttons.remove(&button);
    }

    pub fn add_mouse_motion(&mut self, dx: f32, dy: f32) {
        self.mouse_delta.0 += dx;
        self.mouse_delta.1 += dy;
    }

    pub fn add_wheel(&mut self, delta: f32) {
        self.wheel_delta += delta;
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    pub fn any_key_down(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|key| self.is_key_down(*key))
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Mouse motion since the last [`end_frame`](Self::end_frame), in pixels.
    /// Positive y is downwards.
    pub fn mouse_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    /// Wheel movement since the last [`end_frame`](Self::end_frame). Positive is away from the user.
    pub fn wheel_delta(&self) -> f32 {
        self.wheel_delta
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    pub fn end_frame(&mut self) {
        self.mouse_delta = (0.0, 0.0);
        self.wheel_delta = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_stay_down_until_released() {
        let mut input = InputState::new();
        input.press(KeyCode::KeyW);
        input.end_frame();
        assert!(input.is_key_down(KeyCode::KeyW));
        assert!(input.any_key_down(&[KeyCode::ArrowUp, KeyCode::KeyW]));
        input.release(KeyCode::KeyW);
        assert!(!input.is_key_down(KeyCode::KeyW));
    }

    #[test]
    fn deltas_accumulate_within_a_frame_and_reset_after() {
        let mut input = InputState::new();
        input.add_mouse_motion(3.0, -1.0);
        input.add_mouse_motion(2.0, -1.0);
        input.add_wheel(120.0);
        input.handle_device_event(&DeviceEvent::MouseMotion { delta: (1.0, 0.0) });
        assert_eq!(input.mouse_delta(), (6.0, -2.0));
        assert_eq!(input.wheel_delta(), 120.0);
        input.end_frame();
        assert_eq!(input.mouse_delta(), (0.0, 0.0));
        assert_eq!(input.wheel_delta(), 0.0);
    }

    #[test]
    fn losing_focus_releases_everything() {
        let mut input = InputState::new();
        input.press(KeyCode::KeyA);
        input.press_button(MouseButton::Right);
        input.handle_window_event(&WindowEvent::Focused(false));
        assert!(!input.is_key_down(KeyCode::KeyA));
        assert!(!input.is_button_down(MouseButton::Right));
    }

    #[test]
    fn close_request_is_latched() {
        let mut input = InputState::new();
        assert!(!input.close_requested());
        input.handle_window_event(&WindowEvent::CloseRequested);
        input.end_frame();
        assert!(input.close_requested());
    }
}

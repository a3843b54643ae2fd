//! Keyboard snapshot for moving the light.
//!
//! The viewer keeps a [`HeldKeys`] up to date from winit events and hands it
//! to [`crate::drawer::MeshDrawer::update_light_position`] once per frame.

use std::collections::HashSet;

use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// Direction keys that move the light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightKey {
    Up,
    Down,
    Left,
    Right,
}

impl LightKey {
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::ArrowUp => Some(LightKey::Up),
            KeyCode::ArrowDown => Some(LightKey::Down),
            KeyCode::ArrowLeft => Some(LightKey::Left),
            KeyCode::ArrowRight => Some(LightKey::Right),
            _ => None,
        }
    }
}

/// The set of light keys currently held down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeldKeys {
    held: HashSet<LightKey>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: LightKey) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: LightKey) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: LightKey) -> bool {
        self.held.contains(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Releases everything, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Returns `true` if the key event was an arrow key.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> bool {
        let PhysicalKey::Code(code) = event.physical_key else {
            return false;
        };
        let Some(key) = LightKey::from_key_code(code) else {
            return false;
        };
        match event.state {
            ElementState::Pressed => self.press(key),
            ElementState::Released => self.release(key),
        }
        true
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => self.handle_key_event(event),
            WindowEvent::Focused(false) => {
                self.clear();
                false
            }
            _ => false,
        }
    }
}

impl FromIterator<LightKey> for HeldKeys {
    fn from_iter<I: IntoIterator<Item = LightKey>>(iter: I) -> Self {
        Self {
            held: iter.into_iter().collect(),
        }
    }
}

//! The single light and the material terms that go with it.

use cgmath::Vector3;

use crate::{config::DrawerConfig, input::{HeldKeys, LightKey}};

/// Light position, ambient/specular coefficients and the lighting switch.
///
/// The position is treated as a direction by the shader. Only x and y move;
/// z and the shininess exponent are fixed for the lifetime of the light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightState {
    position: Vector3<f32>,
    ambient: f32,
    specular_intensity: f32,
    shininess: f32,
    enabled: bool,
}

impl LightState {
    pub fn new(config: &DrawerConfig) -> Self {
        Self {
            position: config.light_position.into(),
            ambient: config.ambient,
            specular_intensity: config.specular_intensity,
            shininess: config.shininess,
            enabled: false,
        }
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn ambient(&self) -> f32 {
        self.ambient
    }

    pub fn specular_intensity(&self) -> f32 {
        self.specular_intensity
    }

    pub fn shininess(&self) -> f32 {
        self.shininess
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_ambient(&mut self, ambient: f32) {
        self.ambient = ambient;
    }

    pub(crate) fn set_specular_intensity(&mut self, specular_intensity: f32) {
        self.specular_intensity = specular_intensity;
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Moves the light by `step` along x/y for every held direction key.
    /// Opposite keys cancel out.
    pub fn step(&mut self, held: &HeldKeys, step: f32) {
        if held.is_held(LightKey::Up) {
            self.position.y += step;
        }
        if held.is_held(LightKey::Down) {
            self.position.y -= step;
        }
        if held.is_held(LightKey::Right) {
            self.position.x += step;
        }
        if held.is_held(LightKey::Left) {
            self.position.x -= step;
        }
    }
}

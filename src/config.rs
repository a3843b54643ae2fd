//! Start-up configuration.
//!
//! [`DrawerConfig`] gathers the initial light and material values, the
//! projection parameters and the viewer's control speeds. The defaults
//! reproduce the classic setup: light at (1, 1, 1), ambient 0.5, specular
//! intensity 0.5 and shininess 16.

#[derive(Debug, Clone, PartialEq)]
pub struct DrawerConfig {
    /// Initial light position. Only x and y change afterwards.
    pub light_position: [f32; 3],
    pub ambient: f32,
    pub specular_intensity: f32,
    /// Fixed specular exponent.
    pub shininess: f32,
    /// Distance the light moves per frame while an arrow key is held.
    pub light_step: f32,
    pub clear_colour: wgpu::Color,
    pub fovy_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Initial mesh translation.
    pub translation: [f32; 3],
    /// Radians per pixel of mouse drag.
    pub rotation_speed: f32,
    /// Translation change per scroll line.
    pub zoom_step: f32,
    pub window_title: String,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            light_position: [1.0, 1.0, 1.0],
            ambient: 0.5,
            specular_intensity: 0.5,
            shininess: 16.0,
            light_step: 1.0,
            clear_colour: wgpu::Color::WHITE,
            fovy_degrees: 60.0,
            znear: 0.1,
            zfar: 100.0,
            translation: [0.0, 0.0, -3.0],
            rotation_speed: 0.01,
            zoom_step: 0.25,
            window_title: "mesh-drawer".to_string(),
        }
    }
}

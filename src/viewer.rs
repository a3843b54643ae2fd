//! Interactive window around a [`MeshDrawer`].
//!
//! The viewer owns the winit event loop, a tokio runtime for asset loading and
//! the GPU [`Context`]. Each redraw it:
//! 1. Moves the light according to the held arrow keys
//! 2. Composes the MVP matrix from the current [`SceneTransform`]
//! 3. Draws the mesh and presents the frame
//!
//! # Controls
//!
//! | Input | Effect |
//! |---|---|
//! | Arrow keys | move the light in x/y |
//! | Left drag | rotate the mesh (vertical = X axis, horizontal = Y axis) |
//! | Scroll | move the mesh closer or further away |
//! | `T` | show/hide textures |
//! | `L` | toggle lighting |
//! | `[` / `]` | decrease/increase the texture blend |
//! | `-` / `=` | decrease/increase ambient light |
//! | `,` / `.` | decrease/increase specular intensity |
//! | `Esc` | quit |

use std::{path::PathBuf, sync::Arc};

use cgmath::Deg;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    config::DrawerConfig,
    context::Context,
    drawer::{BASE_SLOT, BLEND_SLOT, MeshDrawer},
    input::HeldKeys,
    resources::{load_optional_image, mesh::load_obj_geometry},
    transform::{Projection, SceneTransform},
};

/// Amount the blend, ambient and specular keys change their value by.
const ADJUST_STEP: f32 = 0.05;

/// What to show when the viewer starts.
#[derive(Debug, Clone, Default)]
pub struct ViewerAssets {
    pub obj: PathBuf,
    /// Base texture (slot 0) and blend texture (slot 1).
    pub textures: [Option<PathBuf>; 2],
    pub blend_factor: f32,
    pub show_texture: bool,
    pub lighting: bool,
}

struct Scene {
    window: Arc<Window>,
    ctx: Context,
    drawer: MeshDrawer<Context>,
    transform: SceneTransform,
    projection: Projection,
}

impl Scene {
    async fn load(
        window: Arc<Window>,
        config: &DrawerConfig,
        assets: &ViewerAssets,
    ) -> anyhow::Result<Self> {
        let mut ctx = Context::new(window.clone(), config.clear_colour).await?;

        let (geometry, base, blend) = futures::try_join!(
            load_obj_geometry(&assets.obj),
            load_optional_image(assets.textures[BASE_SLOT].as_deref()),
            load_optional_image(assets.textures[BLEND_SLOT].as_deref()),
        )?;

        let mut drawer = MeshDrawer::new(config);
        drawer.set_mesh(&mut ctx, &geometry);
        if let Some(image) = base {
            drawer.set_texture(&mut ctx, &image, BASE_SLOT)?;
        }
        if let Some(image) = blend {
            drawer.set_texture(&mut ctx, &image, BLEND_SLOT)?;
        }
        drawer.set_texture_blend(assets.blend_factor);
        drawer.show_texture(assets.show_texture);
        drawer.enable_lighting(assets.lighting);

        let (width, height) = ctx.size();
        let projection = Projection::new(
            width,
            height,
            Deg(config.fovy_degrees),
            config.znear,
            config.zfar,
        );

        Ok(Self {
            window,
            ctx,
            drawer,
            transform: SceneTransform::new(config.translation),
            projection,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
        self.projection.resize(width, height);
    }

    fn render(&mut self, held: &HeldKeys) {
        self.drawer.update_light_position(held);
        let mvp = self.transform.mvp(&self.projection);
        match self.drawer.draw(&mut self.ctx, &mvp) {
            Ok(()) => {}
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = self.window.inner_size();
                self.resize(size.width, size.height);
            }
            Err(e) => log::error!("Unable to render {}", e),
        }
        self.window.request_redraw();
    }

    fn handle_key(&mut self, code: KeyCode) {
        let drawer = &mut self.drawer;
        match code {
            KeyCode::KeyT => drawer.show_texture(!drawer.is_texture_shown()),
            KeyCode::KeyL => drawer.enable_lighting(!drawer.light().is_enabled()),
            KeyCode::BracketLeft => {
                drawer.set_texture_blend((drawer.blend_factor() - ADJUST_STEP).clamp(0.0, 1.0))
            }
            KeyCode::BracketRight => {
                drawer.set_texture_blend((drawer.blend_factor() + ADJUST_STEP).clamp(0.0, 1.0))
            }
            KeyCode::Minus => {
                drawer.set_ambient_light((drawer.light().ambient() - ADJUST_STEP).max(0.0))
            }
            KeyCode::Equal => drawer.set_ambient_light(drawer.light().ambient() + ADJUST_STEP),
            KeyCode::Comma => drawer
                .set_specular_light((drawer.light().specular_intensity() - ADJUST_STEP).max(0.0)),
            KeyCode::Period => {
                drawer.set_specular_light(drawer.light().specular_intensity() + ADJUST_STEP)
            }
            _ => return,
        }
        log::debug!(
            "mode {:?}, blend {:.2}, ambient {:.2}, specular {:.2}",
            drawer.shading_mode(),
            drawer.blend_factor(),
            drawer.light().ambient(),
            drawer.light().specular_intensity()
        );
    }
}

pub struct Viewer {
    runtime: tokio::runtime::Runtime,
    config: DrawerConfig,
    assets: ViewerAssets,
    scene: Option<Scene>,
    held: HeldKeys,
    dragging: bool,
    error: Option<anyhow::Error>,
}

impl Viewer {
    pub fn new(config: DrawerConfig, assets: ViewerAssets) -> anyhow::Result<Self> {
        Ok(Self {
            runtime: tokio::runtime::Runtime::new()?,
            config,
            assets,
            scene: None,
            held: HeldKeys::new(),
            dragging: false,
            error: None,
        })
    }
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.scene.is_some() {
            return;
        }
        let window_attributes = Window::default_attributes().with_title(&self.config.window_title);
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.error = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        match self
            .runtime
            .block_on(Scene::load(window, &self.config, &self.assets))
        {
            Ok(scene) => {
                scene.window.request_redraw();
                self.scene = Some(scene);
            }
            Err(e) => {
                log::error!("Viewer initialization failed: {e:#}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: DeviceId, event: DeviceEvent) {
        let Some(scene) = &mut self.scene else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if self.dragging {
                let speed = self.config.rotation_speed;
                scene.transform.rotate(dy as f32 * speed, dx as f32 * speed);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        let Some(scene) = &mut self.scene else {
            return;
        };

        if self.held.handle_window_event(&event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => scene.resize(size.width, size.height),
            WindowEvent::RedrawRequested => scene.render(&self.held),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.dragging = state.is_pressed(),
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / 40.0,
                };
                scene.transform.zoom(lines * self.config.zoom_step);
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
                    PhysicalKey::Code(code) => scene.handle_key(code),
                    PhysicalKey::Unidentified(_) => {}
                }
            }
            _ => {}
        }
    }
}

/// Opens a window showing `assets` and runs until it is closed.
pub fn run(config: DrawerConfig, assets: ViewerAssets) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        eprintln!("Warning: Could not initialize logger: {}", e);
    }

    let event_loop = EventLoop::new()?;
    let mut viewer = Viewer::new(config, assets)?;
    event_loop.run_app(&mut viewer)?;

    match viewer.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

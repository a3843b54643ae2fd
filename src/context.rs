//! GPU context.
//!
//! [`Context`] owns the wgpu device and queue, the render target (a window
//! surface or an offscreen texture), the depth buffer and the mesh pipeline.
//! It is the wgpu implementation of [`RenderBackend`].

use std::{iter, sync::Arc};

use anyhow::{Context as _, bail};
use winit::window::Window;

use crate::{
    backend::{DrawCall, RenderBackend},
    data_structures::{
        mesh::{DrawMesh, GpuMesh, MeshGeometry},
        texture::{Texture, TextureSampling},
    },
    pipelines::mesh::MeshPipeline,
};

/// Sampled from texture slots that have no image.
const PLACEHOLDER_COLOUR: [u8; 4] = [0, 0, 0, 255];

#[derive(Debug)]
enum RenderTarget {
    Window {
        surface: wgpu::Surface<'static>,
    },
    Offscreen {
        texture: wgpu::Texture,
    },
}

#[derive(Debug)]
pub struct Context {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub clear_colour: wgpu::Color,
    target: RenderTarget,
    depth_texture: Texture,
    pipeline: MeshPipeline,
    placeholder: Texture,
}

impl Context {
    /// Creates a context that presents to `window`.
    pub async fn new(window: Arc<Window>, clear_colour: wgpu::Color) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("wgpu setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("failed to create a surface for the window")?;
        let (adapter, device, queue) = request_device(&instance, Some(&surface)).await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Fragment output is written as is, so prefer a surface without sRGB
        // encoding and otherwise render through a non-sRGB view of it.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the surface supports no texture formats")?;
        let view_formats = if surface_format.is_srgb() {
            vec![surface_format.remove_srgb_suffix()]
        } else {
            vec![]
        };
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats,
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self::assemble(
            device,
            queue,
            config,
            RenderTarget::Window { surface },
            clear_colour,
        ))
    }

    /// Creates a context that renders into a `width` x `height` texture, for
    /// tests and screenshots. Read the result back with [`Context::capture`].
    pub async fn headless(width: u32, height: u32, clear_colour: wgpu::Color) -> anyhow::Result<Self> {
        log::info!("wgpu headless setup ({}x{})", width, height);
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let (_, device, queue) = request_device(&instance, None).await?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            format: Texture::COLOR_FORMAT,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        let texture = create_offscreen_texture(&device, &config);

        Ok(Self::assemble(
            device,
            queue,
            config,
            RenderTarget::Offscreen { texture },
            clear_colour,
        ))
    }

    fn assemble(
        device: wgpu::Device,
        queue: wgpu::Queue,
        config: wgpu::SurfaceConfiguration,
        target: RenderTarget,
        clear_colour: wgpu::Color,
    ) -> Self {
        let depth_texture =
            Texture::create_depth_texture(&device, [config.width, config.height], "depth_texture");
        let pipeline = MeshPipeline::new(&device, config.format.remove_srgb_suffix());
        let placeholder = Texture::create_placeholder(&device, &queue, PLACEHOLDER_COLOUR);

        Self {
            device,
            queue,
            config,
            clear_colour,
            target,
            depth_texture,
            pipeline,
            placeholder,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Resizes the render target and depth buffer. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        match &mut self.target {
            RenderTarget::Window { surface, .. } => surface.configure(&self.device, &self.config),
            RenderTarget::Offscreen { texture } => {
                *texture = create_offscreen_texture(&self.device, &self.config)
            }
        }
        self.depth_texture = Texture::create_depth_texture(
            &self.device,
            [self.config.width, self.config.height],
            "depth_texture",
        );
    }

    /// Reads the last frame of an offscreen context back into an image.
    pub async fn capture(&self) -> anyhow::Result<image::RgbaImage> {
        let RenderTarget::Offscreen { texture } = &self.target else {
            bail!("only offscreen contexts can be captured");
        };
        let (width, height) = self.size();
        let unpadded_bytes_per_row = 4 * width;
        let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
            * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

        let output_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Capture Buffer"),
            size: (padded_bytes_per_row * height) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Capture Encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(iter::once(encoder.finish()));

        // The mapping has to be requested before polling, otherwise the wait never ends.
        let buffer_slice = output_buffer.slice(..);
        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device.poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: None,
        })?;
        rx.receive()
            .await
            .context("capture buffer mapping was dropped")??;

        let pixels = {
            let data = buffer_slice.get_mapped_range();
            data.chunks(padded_bytes_per_row as usize)
                .flat_map(|row| &row[..unpadded_bytes_per_row as usize])
                .copied()
                .collect::<Vec<u8>>()
        };
        output_buffer.unmap();

        image::RgbaImage::from_raw(width, height, pixels)
            .context("captured pixel data does not match the target size")
    }
}

impl RenderBackend for Context {
    type Mesh = GpuMesh;
    type Texture = Texture;
    type Error = wgpu::SurfaceError;

    fn create_mesh(&mut self, geometry: &MeshGeometry) -> GpuMesh {
        GpuMesh::new(&self.device, geometry)
    }

    fn create_texture(
        &mut self,
        image: &image::DynamicImage,
        sampling: TextureSampling,
    ) -> anyhow::Result<Texture> {
        Texture::from_image(&self.device, &self.queue, image, sampling, Some("mesh texture"))
    }

    fn draw(&mut self, call: DrawCall<'_, GpuMesh, Texture>) -> Result<(), wgpu::SurfaceError> {
        self.queue.write_buffer(
            &self.pipeline.uniform_buffer,
            0,
            bytemuck::cast_slice(&[call.uniforms]),
        );
        let textures = self.pipeline.texture_bind_group(
            &self.device,
            call.textures[0].unwrap_or(&self.placeholder),
            call.textures[1].unwrap_or(&self.placeholder),
        );

        let (frame, view) = match &self.target {
            RenderTarget::Window { surface, .. } => {
                let frame = surface.get_current_texture()?;
                let view = frame.texture.create_view(&wgpu::TextureViewDescriptor {
                    format: Some(self.config.format.remove_srgb_suffix()),
                    ..Default::default()
                });
                (Some(frame), view)
            }
            RenderTarget::Offscreen { texture } => {
                (None, texture.create_view(&wgpu::TextureViewDescriptor::default()))
            }
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Mesh Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline.render_pipeline);
            render_pass.set_bind_group(0, &self.pipeline.uniform_bind_group, &[]);
            render_pass.set_bind_group(1, &textures, &[]);
            let count = call
                .mesh
                .map_or(0, |mesh| drawable_count(call.vertex_count, mesh.vertex_count));
            match call.mesh {
                Some(mesh) if count > 0 => render_pass.draw_mesh(mesh, count),
                _ => log::trace!("no geometry to draw"),
            }
        }

        self.queue.submit(iter::once(encoder.finish()));
        if let Some(frame) = frame {
            frame.present();
        }
        Ok(())
    }
}

/// Vertices that can be drawn when `requested` are asked for and every stream
/// holds at least `available`.
pub fn drawable_count(requested: u32, available: u32) -> u32 {
    if requested > available {
        log::warn!(
            "drawing {} of {} requested vertices; the other streams are shorter",
            available,
            requested
        );
    }
    requested.min(available)
}

async fn request_device(
    instance: &wgpu::Instance,
    compatible_surface: Option<&wgpu::Surface<'_>>,
) -> anyhow::Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue)> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface,
            force_fallback_adapter: false,
        })
        .await
        .context("no suitable GPU adapter")?;
    log::info!("using adapter {:?}", adapter.get_info().name);

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("mesh-drawer device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: Default::default(),
            trace: wgpu::Trace::Off,
            experimental_features: Default::default(),
        })
        .await
        .context("failed to create the GPU device")?;
    Ok((adapter, device, queue))
}

fn create_offscreen_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Offscreen Target"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: config.format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    })
}

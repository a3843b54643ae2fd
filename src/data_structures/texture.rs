//! GPU textures and texture creation utilities.
//!
//! This module provides [`Texture`], a wrapper around a wgpu texture with its
//! view and sampler, together with the sampling rule used for uploaded images:
//! power-of-two images get a full mip chain, everything else is sampled with
//! clamp-to-edge and linear filtering.

use anyhow::*;
use image::{DynamicImage, RgbaImage, imageops::FilterType};

/// `n & (n - 1) == 0`. Zero counts as a power of two.
pub fn is_power_of_two(n: u32) -> bool {
    n & n.wrapping_sub(1) == 0
}

/// How an uploaded image is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSampling {
    /// Full mip chain, repeat addressing.
    Mipmapped,
    /// Single level, clamp-to-edge addressing, linear min/mag filtering.
    ClampLinear,
}

impl TextureSampling {
    pub fn for_dimensions(width: u32, height: u32) -> Self {
        if is_power_of_two(width) && is_power_of_two(height) {
            TextureSampling::Mipmapped
        } else {
            TextureSampling::ClampLinear
        }
    }

    /// Number of mip levels for a `width` x `height` image.
    pub fn mip_level_count(self, width: u32, height: u32) -> u32 {
        match self {
            TextureSampling::Mipmapped => width.max(height).max(1).ilog2() + 1,
            TextureSampling::ClampLinear => 1,
        }
    }

    fn sampler_descriptor(self) -> wgpu::SamplerDescriptor<'static> {
        match self {
            TextureSampling::Mipmapped => wgpu::SamplerDescriptor {
                label: Some("Mipmapped Sampler"),
                address_mode_u: wgpu::AddressMode::Repeat,
                address_mode_v: wgpu::AddressMode::Repeat,
                address_mode_w: wgpu::AddressMode::Repeat,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Nearest,
                mipmap_filter: wgpu::FilterMode::Linear,
                ..Default::default()
            },
            TextureSampling::ClampLinear => wgpu::SamplerDescriptor {
                label: Some("Clamped Sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                mipmap_filter: wgpu::FilterMode::Nearest,
                ..Default::default()
            },
        }
    }
}

/// Drops any alpha channel. Uploaded textures are RGB, so sampled alpha is 1.
pub fn opaque_rgba(img: &DynamicImage) -> RgbaImage {
    DynamicImage::ImageRgb8(img.to_rgb8()).to_rgba8()
}

/// A GPU texture with a view and sampler.
#[derive(Clone, Debug)]
pub struct Texture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl Texture {
    /// Standard depth buffer texture format (32-bit float).
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Colour format for uploaded images and offscreen targets. Texels are
    /// sampled as stored, without sRGB decoding.
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Create a depth texture for depth-testing during rendering.
    ///
    /// * `size` is [width, height] of the texture in pixels
    /// * `label` is used as a debug label for the GPU resource
    pub fn create_depth_texture(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        };
        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// A 1x1 texture of a single colour, bound in place of a slot that has no
    /// image yet.
    pub fn create_placeholder(device: &wgpu::Device, queue: &wgpu::Queue, colour: [u8; 4]) -> Self {
        let img = RgbaImage::from_pixel(1, 1, image::Rgba(colour));
        Self::upload(
            device,
            queue,
            &img,
            TextureSampling::ClampLinear,
            Some("placeholder texture"),
        )
    }

    /// Upload a decoded image, generating mip levels when `sampling` asks
    /// for them.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &DynamicImage,
        sampling: TextureSampling,
        label: Option<&str>,
    ) -> Result<Self> {
        if img.width() == 0 || img.height() == 0 {
            bail!("cannot upload an empty {}x{} image", img.width(), img.height());
        }
        let rgba = opaque_rgba(img);
        Ok(Self::upload(device, queue, &rgba, sampling, label))
    }

    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &RgbaImage,
        sampling: TextureSampling,
        label: Option<&str>,
    ) -> Self {
        let (width, height) = rgba.dimensions();
        let mip_level_count = sampling.mip_level_count(width, height);

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::COLOR_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for mip_level in 0..mip_level_count {
            let level_width = (width >> mip_level).max(1);
            let level_height = (height >> mip_level).max(1);
            let level = if mip_level == 0 {
                rgba.clone()
            } else {
                image::imageops::resize(rgba, level_width, level_height, FilterType::Triangle)
            };
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    aspect: wgpu::TextureAspect::All,
                    texture: &texture,
                    mip_level,
                    origin: wgpu::Origin3d::ZERO,
                },
                &level,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * level_width),
                    rows_per_image: Some(level_height),
                },
                wgpu::Extent3d {
                    width: level_width,
                    height: level_height,
                    depth_or_array_layers: 1,
                },
            );
        }
        log::debug!(
            "uploaded {}x{} texture {:?} with {} mip level(s)",
            width,
            height,
            label,
            mip_level_count
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&sampling.sampler_descriptor());

        Self {
            texture,
            view,
            sampler,
        }
    }
}

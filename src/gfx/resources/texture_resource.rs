//! Texture resource management for wgpu
//!
//! Creates the main depth buffer, the shadow map, and sampled textures from
//! PNG files or raw RGBA data.

use std::path::Path;

use crate::error::{Error, Result};

/// Fallback albedo when no texture file is configured.
pub const WHITE_TEXEL: [u8; 4] = [255, 255, 255, 255];
/// Fallback normal map texel: tangent-space +Z.
pub const FLAT_NORMAL_TEXEL: [u8; 4] = [128, 128, 255, 255];

/// Decoded RGBA8 image data.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decodes a PNG (or any format the `image` features allow) to RGBA8.
pub fn decode_image(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).map_err(|source| Error::Image {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(RgbaImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

/// Rejects images the device cannot hold in one 2D texture.
pub fn check_texture_size(image: &RgbaImage, max_dimension: u32, label: &str) -> Result<()> {
    if image.width == 0 || image.height == 0 {
        return Err(Error::Graphics(format!(
            "{} texture is empty ({}x{})",
            label, image.width, image.height
        )));
    }
    if image.width > max_dimension || image.height > max_dimension {
        return Err(Error::Graphics(format!(
            "{} texture is {}x{}, larger than the device limit of {}",
            label, image.width, image.height, max_dimension
        )));
    }
    Ok(())
}

/// GPU texture resource containing texture, view, and sampler
#[derive(Clone)]
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    /// Depth format used for both the main depth buffer and the shadow map
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a depth buffer matching the surface dimensions
    pub fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        label: &str,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Creates the square depth-only render target for the shadow pass.
    ///
    /// The sampler is a comparison sampler; shaders read it with
    /// `textureSampleCompare*`.
    pub fn create_shadow_map(device: &wgpu::Device, size: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Shadow Map"),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Shadow Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Uploads RGBA8 pixels as a repeating, linearly filtered 2D texture.
    ///
    /// Use an `*Srgb` format for colour data and a linear format for normal
    /// maps.
    ///
    /// # Errors
    /// [`Error::Graphics`] if the image exceeds the device's
    /// `max_texture_dimension_2d`.
    pub fn create_from_rgba_data(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &RgbaImage,
        label: &str,
        format: wgpu::TextureFormat,
    ) -> Result<Self> {
        check_texture_size(image, device.limits().max_texture_dimension_2d, label)?;

        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Ok(Self {
            texture,
            view,
            sampler,
        })
    }

    /// Loads `path` if given, otherwise a 1x1 texture of `fallback`.
    ///
    /// # Errors
    /// [`Error::Image`] if the file cannot be opened or decoded.
    pub fn load_or_solid(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: Option<&Path>,
        fallback: [u8; 4],
        label: &str,
        format: wgpu::TextureFormat,
    ) -> Result<Self> {
        let image = match path {
            Some(path) => {
                let image = decode_image(path)?;
                log::info!(
                    "Loaded {} texture {} ({}x{})",
                    label,
                    path.display(),
                    image.width,
                    image.height
                );
                image
            }
            None => {
                log::debug!("No {} texture configured, using a 1x1 fallback", label);
                RgbaImage {
                    width: 1,
                    height: 1,
                    pixels: fallback.to_vec(),
                }
            }
        };

        Self::create_from_rgba_data(device, queue, &image, label, format)
    }
}

//! GPU textures and the registry that hands out opaque `TextureId` handles.
//!
//! Game code only ever sees `TextureId`; the registry owns the GPU objects and
//! caches by path so the same image file is uploaded once.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::RenderError;
use crate::sprite_pipeline::SpritePipeline;

/// Opaque handle to a texture uploaded through a `TextureRegistry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(u32);

impl TextureId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub size: (u32, u32),
}

impl Texture {
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        label: &str,
    ) -> Result<Self, RenderError> {
        let rgba = decode_rgba(bytes, label)?;
        let (width, height) = rgba.dimensions();
        Ok(Self::from_rgba8(device, queue, &rgba, width, height, label))
    }

    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &[u8],
        width: u32,
        height: u32,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
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
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        // Pixel art: nearest filtering, repeat wrap.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            size: (width, height),
        }
    }
}

/// Decode any supported image format (PNG, JPEG) into tightly packed RGBA8.
pub fn decode_rgba(bytes: &[u8], label: &str) -> Result<image::RgbaImage, RenderError> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|source| RenderError::TextureDecode {
            label: label.to_string(),
            source,
        })
}

pub struct GpuSpriteTexture {
    pub texture: Texture,
    pub bind_group: wgpu::BindGroup,
}

#[derive(Default)]
pub struct TextureRegistry {
    textures: Vec<GpuSpriteTexture>,
    by_path: HashMap<PathBuf, TextureId>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an image file and return its handle. Repeated loads of the same
    /// path return the cached handle.
    pub fn load(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pipeline: &SpritePipeline,
        path: &Path,
    ) -> Result<TextureId, RenderError> {
        if let Some(&id) = self.by_path.get(path) {
            return Ok(id);
        }

        let bytes = std::fs::read(path).map_err(|source| RenderError::TextureRead {
            path: path.to_path_buf(),
            source,
        })?;
        let label = path.to_string_lossy();
        let texture = Texture::from_bytes(device, queue, &bytes, &label)?;
        log::debug!(
            "Loaded texture '{}' ({}x{})",
            label,
            texture.size.0,
            texture.size.1
        );

        let id = self.insert(device, pipeline, texture);
        self.by_path.insert(path.to_path_buf(), id);
        Ok(id)
    }

    pub fn insert(
        &mut self,
        device: &wgpu::Device,
        pipeline: &SpritePipeline,
        texture: Texture,
    ) -> TextureId {
        let bind_group = pipeline.create_texture_bind_group(device, &texture);
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(GpuSpriteTexture {
            texture,
            bind_group,
        });
        id
    }

    pub fn get(&self, id: TextureId) -> Option<&GpuSpriteTexture> {
        self.textures.get(id.0 as usize)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

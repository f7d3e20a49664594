// Atlas textures on the GPU

use crate::engine::assets::{AssetId, AtlasImage};
use log::debug;
use std::collections::HashMap;

/// An atlas uploaded to the GPU, ready to bind
///
/// The bind group keeps the texture view and sampler alive.
pub struct Texture {
    pub bind_group: wgpu::BindGroup,
}

impl Texture {
    /// Upload a decoded atlas
    ///
    /// Pixel art is sampled with nearest filtering so scaled sprites stay crisp.
    pub fn from_atlas(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        atlas: &AtlasImage,
    ) -> Self {
        let rgba = atlas.pixels();
        let dimensions = rgba.dimensions();

        let size = wgpu::Extent3d {
            width: dimensions.0,
            height: dimensions.1,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(atlas.name()),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba.as_raw(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * dimensions.0),
                rows_per_image: Some(dimensions.1),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(atlas.name()),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Self { bind_group }
    }
}

/// Uploads each atlas once and hands out the GPU copy by asset id
#[derive(Default)]
pub struct TextureManager {
    textures: HashMap<AssetId, Texture>,
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload the atlas unless it is already resident
    pub fn ensure_uploaded(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        atlas: &AtlasImage,
    ) {
        self.textures.entry(atlas.id()).or_insert_with(|| {
            debug!("Uploading atlas texture {}", atlas.name());
            Texture::from_atlas(device, queue, layout, atlas)
        });
    }

    /// Get a texture by asset id
    pub fn get(&self, id: AssetId) -> Option<&Texture> {
        self.textures.get(&id)
    }
}

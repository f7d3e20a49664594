// Sprite rendering system

use super::texture::TextureManager;
use super::vertex::{Vertex, QUAD_INDICES};
use super::{Camera, CameraUniform};
use crate::engine::assets::{AssetId, AtlasImage, AtlasRegion, GeometryError};
use glam::{Affine2, Mat4, Vec4};
use log::debug;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use wgpu::util::DeviceExt;

/// One region of one atlas, ready to be drawn
#[derive(Debug, Clone)]
pub struct Sprite {
    atlas: Arc<AtlasImage>,
    region: AtlasRegion,
}

impl Sprite {
    /// Create a sprite, checking that the region lies inside the atlas
    pub fn new(atlas: Arc<AtlasImage>, region: AtlasRegion) -> Result<Self, GeometryError> {
        if !region.fits_within(atlas.size()) {
            return Err(GeometryError::RegionOutOfBounds {
                atlas: atlas.name().to_string(),
                region,
                width: atlas.size().x,
                height: atlas.size().y,
            });
        }

        Ok(Self { atlas, region })
    }

    pub fn atlas(&self) -> &Arc<AtlasImage> {
        &self.atlas
    }

    pub fn region(&self) -> AtlasRegion {
        self.region
    }
}

/// Identity of a sprite batch, used to upload static geometry only once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchId(u64);

impl BatchId {
    fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Many sprites from a single atlas, pre-transformed into one draw call
pub struct SpriteBatch {
    id: BatchId,
    atlas: Arc<AtlasImage>,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl SpriteBatch {
    /// Create an empty batch drawing from `atlas` with room for `sprites`
    pub fn with_capacity(atlas: Arc<AtlasImage>, sprites: usize) -> Self {
        Self {
            id: BatchId::next(),
            atlas,
            vertices: Vec::with_capacity(sprites * 4),
            indices: Vec::with_capacity(sprites * 6),
        }
    }

    /// Append a region of this batch's atlas, centred on the origin and
    /// moved by `transform`
    pub fn push_region(&mut self, region: AtlasRegion, transform: Affine2) {
        append_quad(
            &mut self.vertices,
            &mut self.indices,
            region,
            self.atlas.size(),
            transform,
        );
    }

    pub fn id(&self) -> BatchId {
        self.id
    }

    pub fn atlas(&self) -> &Arc<AtlasImage> {
        &self.atlas
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn sprite_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl std::fmt::Debug for SpriteBatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpriteBatch")
            .field("id", &self.id)
            .field("atlas", &self.atlas.name())
            .field("sprites", &self.sprite_count())
            .finish()
    }
}

fn append_quad(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    region: AtlasRegion,
    atlas_size: glam::UVec2,
    transform: Affine2,
) {
    let base = vertices.len() as u32;
    let (uv_min, uv_max) = region.uv_rect(atlas_size);
    vertices.extend(Vertex::quad(transform, region.size(), uv_min, uv_max, Vec4::ONE));
    indices.extend(QUAD_INDICES.iter().map(|i| base + i));
}

/// Static batch geometry resident on the GPU
struct GpuBatch {
    atlas: AssetId,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Queued draw for the current frame, in submission order
enum DrawCommand {
    Static(BatchId),
    Dynamic { atlas: AssetId, indices: Range<u32> },
}

/// Sprite renderer
///
/// Static batches are uploaded the first time they are drawn and reused every
/// frame after; loose sprites are streamed through a per-frame buffer.
pub struct SpriteRenderer {
    render_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    textures: TextureManager,
    static_batches: HashMap<BatchId, GpuBatch>,
    dynamic_vertices: Vec<Vertex>,
    dynamic_indices: Vec<u32>,
    dynamic_vertex_buffer: Option<wgpu::Buffer>,
    dynamic_index_buffer: Option<wgpu::Buffer>,
    commands: Vec<DrawCommand>,
}

impl SpriteRenderer {
    /// Create a new sprite renderer
    pub fn new(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sprite Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Texture Bind Group Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sprite Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &texture_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sprite Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[Vertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let camera_uniform = CameraUniform {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
        };

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        Self {
            render_pipeline,
            camera_buffer,
            camera_bind_group,
            texture_bind_group_layout,
            textures: TextureManager::new(),
            static_batches: HashMap::new(),
            dynamic_vertices: Vec::new(),
            dynamic_indices: Vec::new(),
            dynamic_vertex_buffer: None,
            dynamic_index_buffer: None,
            commands: Vec::new(),
        }
    }

    /// Forget last frame's draws; GPU-resident batches and textures stay
    pub fn begin_frame(&mut self) {
        self.commands.clear();
        self.dynamic_vertices.clear();
        self.dynamic_indices.clear();
    }

    /// Queue a static batch, uploading it on first use
    pub fn queue_batch(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, batch: &SpriteBatch) {
        if batch.is_empty() {
            return;
        }

        self.textures
            .ensure_uploaded(device, queue, &self.texture_bind_group_layout, batch.atlas());

        self.static_batches.entry(batch.id()).or_insert_with(|| {
            debug!(
                "Uploading batch {:?} ({} sprites)",
                batch.id(),
                batch.sprite_count()
            );
            GpuBatch {
                atlas: batch.atlas().id(),
                vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Static Batch Vertex Buffer"),
                    contents: bytemuck::cast_slice(batch.vertices()),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Static Batch Index Buffer"),
                    contents: bytemuck::cast_slice(batch.indices()),
                    usage: wgpu::BufferUsages::INDEX,
                }),
                index_count: batch.indices().len() as u32,
            }
        });

        self.commands.push(DrawCommand::Static(batch.id()));
    }

    /// Queue a single sprite for this frame only
    pub fn queue_sprite(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        sprite: &Sprite,
        transform: Affine2,
    ) {
        let atlas = sprite.atlas();
        self.textures
            .ensure_uploaded(device, queue, &self.texture_bind_group_layout, atlas);

        let start = self.dynamic_indices.len() as u32;
        append_quad(
            &mut self.dynamic_vertices,
            &mut self.dynamic_indices,
            sprite.region(),
            atlas.size(),
            transform,
        );
        let end = self.dynamic_indices.len() as u32;

        // Consecutive sprites from the same atlas share one draw
        if let Some(DrawCommand::Dynamic {
            atlas: last_atlas,
            indices,
        }) = self.commands.last_mut()
        {
            if *last_atlas == atlas.id() && indices.end == start {
                indices.end = end;
                return;
            }
        }

        self.commands.push(DrawCommand::Dynamic {
            atlas: atlas.id(),
            indices: start..end,
        });
    }

    /// Write the camera and this frame's loose sprites to the GPU
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, camera: &Camera) {
        let camera_uniform = CameraUniform::new(camera);
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[camera_uniform]));

        if self.dynamic_vertices.is_empty() {
            return;
        }

        write_growable(
            device,
            queue,
            &mut self.dynamic_vertex_buffer,
            bytemuck::cast_slice(&self.dynamic_vertices),
            wgpu::BufferUsages::VERTEX,
            "Dynamic Sprite Vertex Buffer",
        );
        write_growable(
            device,
            queue,
            &mut self.dynamic_index_buffer,
            bytemuck::cast_slice(&self.dynamic_indices),
            wgpu::BufferUsages::INDEX,
            "Dynamic Sprite Index Buffer",
        );
    }

    /// Record all queued draws into the render pass
    pub fn render<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        if self.commands.is_empty() {
            return;
        }

        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        for command in &self.commands {
            match command {
                DrawCommand::Static(id) => {
                    let Some(batch) = self.static_batches.get(id) else {
                        continue;
                    };
                    let Some(texture) = self.textures.get(batch.atlas) else {
                        continue;
                    };
                    render_pass.set_bind_group(1, &texture.bind_group, &[]);
                    render_pass.set_vertex_buffer(0, batch.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(batch.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..batch.index_count, 0, 0..1);
                }
                DrawCommand::Dynamic { atlas, indices } => {
                    let (Some(vertex_buffer), Some(index_buffer)) =
                        (&self.dynamic_vertex_buffer, &self.dynamic_index_buffer)
                    else {
                        continue;
                    };
                    let Some(texture) = self.textures.get(*atlas) else {
                        continue;
                    };
                    render_pass.set_bind_group(1, &texture.bind_group, &[]);
                    render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
                    render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(indices.clone(), 0, 0..1);
                }
            }
        }
    }
}

/// Write `contents` into `slot`, replacing the buffer when it is too small
fn write_growable(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    slot: &mut Option<wgpu::Buffer>,
    contents: &[u8],
    usage: wgpu::BufferUsages,
    label: &str,
) {
    let needed = contents.len() as wgpu::BufferAddress;
    let fits = slot.as_ref().is_some_and(|buffer| buffer.size() >= needed);

    if !fits {
        *slot = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: needed.next_power_of_two(),
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
    }

    if let Some(buffer) = slot.as_ref() {
        queue.write_buffer(buffer, 0, contents);
    }
}

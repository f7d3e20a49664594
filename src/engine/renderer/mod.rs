// Rendering system using wgpu

mod camera;
mod sprite;
pub mod texture;
mod vertex;

pub use camera::{Camera, CameraUniform};
pub use sprite::{Sprite, SpriteBatch, SpriteRenderer};

use anyhow::Result;
use glam::{Affine2, Vec2};
use log::{info, warn};
use std::sync::Arc;
use winit::window::Window;

/// Anything sprites and batches can be drawn onto
///
/// Drawing only issues commands; nothing is returned and no state is kept
/// beyond what the target itself records.
pub trait DrawTarget {
    /// Draw a pre-built batch in one call
    fn draw_batch(&mut self, batch: &SpriteBatch);

    /// Draw one sprite, centred on the origin and moved by `transform`
    fn draw_sprite(&mut self, sprite: &Sprite, transform: Affine2);
}

/// Draw target for one frame on the GPU
pub struct FrameTarget<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    sprites: &'a mut SpriteRenderer,
}

impl DrawTarget for FrameTarget<'_> {
    fn draw_batch(&mut self, batch: &SpriteBatch) {
        self.sprites.queue_batch(self.device, self.queue, batch);
    }

    fn draw_sprite(&mut self, sprite: &Sprite, transform: Affine2) {
        self.sprites.queue_sprite(self.device, self.queue, sprite, transform);
    }
}

/// Main renderer responsible for initializing wgpu and coordinating rendering
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    sprite_renderer: SpriteRenderer,
    camera: Camera,
    clear_color: wgpu::Color,
}

impl Renderer {
    /// Create a new renderer for the given window
    pub async fn new(window: Arc<Window>, clear_color: wgpu::Color) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable GPU adapter"))?;

        info!("Using GPU: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        let sprite_renderer = SpriteRenderer::new(&device, &config);
        let camera = Camera::new(Vec2::ZERO, config.width as f32, config.height as f32);

        info!(
            "Renderer initialized with {}x{} resolution",
            size.width, size.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            sprite_renderer,
            camera,
            clear_color,
        })
    }

    /// Resize the renderer
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.camera.resize(new_size.width as f32, new_size.height as f32);
            info!("Renderer resized to {}x{}", new_size.width, new_size.height);
        }
    }

    /// Render a frame
    ///
    /// `draw` issues this frame's draw commands; they are submitted in order
    /// after it returns.
    pub fn render<F>(&mut self, draw: F) -> Result<()>
    where
        F: FnOnce(&mut dyn DrawTarget) -> Result<()>,
    {
        self.sprite_renderer.begin_frame();
        {
            let mut target = FrameTarget {
                device: &self.device,
                queue: &self.queue,
                sprites: &mut self.sprite_renderer,
            };
            draw(&mut target)?;
        }
        self.sprite_renderer
            .prepare(&self.device, &self.queue, &self.camera);

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.sprite_renderer.render(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Get a mutable reference to the camera
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }
}

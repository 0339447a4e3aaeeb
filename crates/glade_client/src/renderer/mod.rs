pub mod blocks;
pub mod particles;

use std::fmt;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glade_shared::day_night::{LightingPreset, DAY_LIGHTING, LIGHT_POSITION};
use glade_shared::hud::HudView;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::Camera;
use crate::renderer::blocks::{clear_color, BlockRenderer};
use crate::renderer::particles::BurstRenderer;
use crate::scene::RenderScene;
use crate::ui::crosshair::CrosshairRenderer;
use crate::ui::hotbar::HotbarRenderer;
use crate::ui::text_overlay::TextOverlayRenderer;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    light_dir: [f32; 4],
    light_params: [f32; 4],
}

impl CameraUniform {
    fn new(camera: &Camera, lighting: &LightingPreset) -> Self {
        let light_dir = LIGHT_POSITION.normalize_or_zero();
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            camera_pos: camera.position.extend(1.0).to_array(),
            light_dir: light_dir.extend(0.0).to_array(),
            light_params: [
                lighting.directional_intensity,
                lighting.ambient_intensity,
                0.0,
                0.0,
            ],
        }
    }
}

#[derive(Debug)]
struct DepthTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthTexture {
    fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Glade Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

#[derive(Debug)]
pub enum RendererInitError {
    CreateSurface(wgpu::CreateSurfaceError),
    RequestAdapter(wgpu::RequestAdapterError),
    RequestDevice(wgpu::RequestDeviceError),
    UnsupportedSurface,
}

impl fmt::Display for RendererInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateSurface(err) => write!(f, "failed to create surface: {err}"),
            Self::RequestAdapter(err) => write!(f, "failed to request adapter: {err}"),
            Self::RequestDevice(err) => write!(f, "failed to request device: {err}"),
            Self::UnsupportedSurface => write!(f, "adapter does not support this surface"),
        }
    }
}

impl std::error::Error for RendererInitError {}

pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    depth_texture: DepthTexture,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    block_renderer: BlockRenderer,
    burst_renderer: BurstRenderer,
    crosshair_renderer: CrosshairRenderer,
    hotbar_renderer: HotbarRenderer,
    text_overlay_renderer: TextOverlayRenderer,
    clear_color: wgpu::Color,
    crosshair_visible: bool,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, RendererInitError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(RendererInitError::CreateSurface)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .map_err(RendererInitError::RequestAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("Glade Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .map_err(RendererInitError::RequestDevice)?;

        let initial_size = window.inner_size();
        let width = initial_size.width.max(1);
        let height = initial_size.height.max(1);
        let surface_config = surface
            .get_default_config(&adapter, width, height)
            .ok_or(RendererInitError::UnsupportedSurface)?;

        surface.configure(&device, &surface_config);

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let initial_uniform = CameraUniform::new(&Camera::default(), &DAY_LIGHTING);
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Uniform Buffer"),
            contents: bytemuck::bytes_of(&initial_uniform),
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

        let format = surface_config.format;
        let block_renderer =
            BlockRenderer::new(&device, format, DEPTH_FORMAT, &camera_bind_group_layout);
        let burst_renderer =
            BurstRenderer::new(&device, format, DEPTH_FORMAT, &camera_bind_group_layout);
        let crosshair_renderer = CrosshairRenderer::new(&device, format, width, height);
        let hotbar_renderer = HotbarRenderer::new(&device, format, width, height);
        let text_overlay_renderer = TextOverlayRenderer::new(&device, format);

        let depth_texture = DepthTexture::new(&device, width, height);

        Ok(Self {
            surface,
            device,
            queue,
            surface_config,
            depth_texture,
            camera_buffer,
            camera_bind_group,
            block_renderer,
            burst_renderer,
            crosshair_renderer,
            hotbar_renderer,
            text_overlay_renderer,
            clear_color: clear_color(DAY_LIGHTING.background),
            crosshair_visible: true,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_texture = DepthTexture::new(&self.device, width, height);
        self.crosshair_renderer.resize(&self.queue, width, height);
        self.hotbar_renderer.resize(&self.queue, width, height);
    }

    pub fn set_crosshair_visible(&mut self, visible: bool) {
        self.crosshair_visible = visible;
    }

    /// Pushes the camera and any scene changes to the GPU.
    pub fn update_frame(&mut self, camera: &Camera, scene: &mut RenderScene) {
        let lighting = *scene.lighting();
        let uniform = CameraUniform::new(camera, &lighting);
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&uniform));
        self.clear_color = clear_color(lighting.background);

        self.block_renderer
            .sync(&self.device, &self.queue, scene, &lighting, camera.position);
        let (right, up) = camera.right_and_up();
        self.burst_renderer
            .sync(&self.device, &self.queue, scene, right, up);
    }

    pub fn update_hud(&mut self, view: &HudView, fps: Option<f32>) {
        let mut lines: Vec<String> = view.lines().iter().map(|line| line.to_string()).collect();
        if let Some(fps) = fps {
            lines.push(format!("FPS: {fps:.0}"));
        }
        let (width, height) = self.size();
        self.text_overlay_renderer
            .update(&self.queue, width, height, lines.as_slice());

        let selected = view.hotbar.iter().position(|lit| *lit).unwrap_or(0);
        self.hotbar_renderer.update(&self.queue, selected);
    }

    pub fn render_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Glade Command Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Glade World Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.block_renderer
                .render(&mut render_pass, &self.camera_bind_group);
            self.burst_renderer
                .render(&mut render_pass, &self.camera_bind_group);
        }

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Glade UI Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if self.crosshair_visible {
                self.crosshair_renderer.render(&mut render_pass);
            }
            self.hotbar_renderer.render(&mut render_pass);
            self.text_overlay_renderer.render(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

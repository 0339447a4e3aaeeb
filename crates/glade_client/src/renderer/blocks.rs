use std::mem;

use bytemuck::{Pod, Zeroable};
use glade_shared::block::Color;
use glade_shared::day_night::{LightingPreset, SUN_COLOR, SUN_POSITION, SUN_SIZE};
use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::scene::{BlockDraw, RenderScene};

const INITIAL_INSTANCE_CAPACITY: usize = 1024;
/// Camera travel that forces translucent blocks to be re-sorted.
const RESORT_DISTANCE: f32 = 0.5;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct CubeVertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct BlockInstance {
    center: [f32; 3],
    size: [f32; 3],
    color: [f32; 4],
    emissive: f32,
}

impl BlockInstance {
    fn from_draw(draw: &BlockDraw) -> Self {
        Self {
            center: draw.center.to_array(),
            size: draw.size.to_array(),
            color: draw.color,
            emissive: 0.0,
        }
    }

    fn sun() -> Self {
        Self {
            center: SUN_POSITION.to_array(),
            size: [SUN_SIZE; 3],
            color: SUN_COLOR.to_rgba(1.0),
            emissive: 1.0,
        }
    }
}

/// Instanced unit cubes. Opaque instances come first in the buffer, then
/// translucent ones sorted far to near.
pub struct BlockRenderer {
    opaque_pipeline: wgpu::RenderPipeline,
    translucent_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    opaque_count: u32,
    translucent_count: u32,
    sun_visible: bool,
    last_sort_position: Option<Vec3>,
}

impl BlockRenderer {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Block Shader"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!(concat!(
                    env!("CARGO_MANIFEST_DIR"),
                    "/../../assets/shaders/blocks.wgsl"
                ))
                .into(),
            ),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Block Pipeline Layout"),
            bind_group_layouts: &[camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let opaque_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            color_format,
            depth_format,
            false,
        );
        let translucent_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            color_format,
            depth_format,
            true,
        );

        let (vertices, indices) = unit_cube();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Block Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Block Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            opaque_pipeline,
            translucent_pipeline,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            instance_buffer: create_instance_buffer(device, INITIAL_INSTANCE_CAPACITY),
            instance_capacity: INITIAL_INSTANCE_CAPACITY,
            opaque_count: 0,
            translucent_count: 0,
            sun_visible: true,
            last_sort_position: None,
        }
    }

    /// Re-uploads instances when the scene changed, the sun toggled, or the
    /// camera moved far enough to change the translucent draw order.
    pub fn sync(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &mut RenderScene,
        lighting: &LightingPreset,
        camera_pos: Vec3,
    ) {
        let scene_dirty = scene.take_blocks_dirty();
        let sun_changed = self.sun_visible != lighting.sun_visible;
        let moved = self
            .last_sort_position
            .map_or(true, |last| last.distance(camera_pos) > RESORT_DISTANCE);
        let needs_sort = moved && self.translucent_count > 0;
        if !scene_dirty && !sun_changed && !needs_sort {
            return;
        }

        self.sun_visible = lighting.sun_visible;
        self.last_sort_position = Some(camera_pos);

        let mut instances = Vec::with_capacity(scene.block_count() + 1);
        let mut translucent: Vec<&BlockDraw> = Vec::new();
        for draw in scene.blocks() {
            if draw.is_translucent() {
                translucent.push(draw);
            } else {
                instances.push(BlockInstance::from_draw(draw));
            }
        }
        if self.sun_visible {
            instances.push(BlockInstance::sun());
        }
        self.opaque_count = instances.len() as u32;

        translucent.sort_by(|a, b| {
            let da = a.center.distance_squared(camera_pos);
            let db = b.center.distance_squared(camera_pos);
            db.total_cmp(&da)
        });
        instances.extend(translucent.into_iter().map(BlockInstance::from_draw));
        self.translucent_count = instances.len() as u32 - self.opaque_count;

        if instances.len() > self.instance_capacity {
            self.instance_capacity = instances.len().next_power_of_two();
            self.instance_buffer = create_instance_buffer(device, self.instance_capacity);
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }
    }

    pub fn render(&self, render_pass: &mut wgpu::RenderPass<'_>, camera_bind_group: &wgpu::BindGroup) {
        let total = self.opaque_count + self.translucent_count;
        if total == 0 {
            return;
        }

        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

        if self.opaque_count > 0 {
            render_pass.set_pipeline(&self.opaque_pipeline);
            render_pass.draw_indexed(0..self.index_count, 0, 0..self.opaque_count);
        }
        if self.translucent_count > 0 {
            render_pass.set_pipeline(&self.translucent_pipeline);
            render_pass.draw_indexed(0..self.index_count, 0, self.opaque_count..total);
        }
    }
}

pub fn clear_color(background: Color) -> wgpu::Color {
    let [r, g, b] = background.to_rgb();
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: 1.0,
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Block Instance Buffer"),
        size: (capacity * mem::size_of::<BlockInstance>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
    translucent: bool,
) -> wgpu::RenderPipeline {
    let vertex_attributes = &[
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        },
    ];
    let instance_attributes = &[
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: 2,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            shader_location: 3,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
            shader_location: 4,
            format: wgpu::VertexFormat::Float32x4,
        },
        wgpu::VertexAttribute {
            offset: mem::size_of::<[f32; 10]>() as wgpu::BufferAddress,
            shader_location: 5,
            format: wgpu::VertexFormat::Float32,
        },
    ];

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(if translucent {
            "Block Translucent Pipeline"
        } else {
            "Block Opaque Pipeline"
        }),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &[
                wgpu::VertexBufferLayout {
                    array_stride: mem::size_of::<CubeVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: vertex_attributes,
                },
                wgpu::VertexBufferLayout {
                    array_stride: mem::size_of::<BlockInstance>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: instance_attributes,
                },
            ],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(if translucent {
                    wgpu::BlendState::ALPHA_BLENDING
                } else {
                    wgpu::BlendState::REPLACE
                }),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: depth_format,
            depth_write_enabled: !translucent,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Unit cube centered on the origin, four vertices per face, counter-clockwise
/// seen from outside.
fn unit_cube() -> (Vec<CubeVertex>, Vec<u16>) {
    // (normal, u, v) with u x v == normal.
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let base = vertices.len() as u16;
        let center = normal * 0.5;
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            vertices.push(CubeVertex {
                position: (center + u * su + v * sv).to_array(),
                normal: normal.to_array(),
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::unit_cube;

    #[test]
    fn cube_faces_wind_outward() {
        let (vertices, indices) = unit_cube();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);

        for tri in indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(vertices[i as usize].position));
            let normal = Vec3::from_array(vertices[tri[0] as usize].normal);
            assert!((b - a).cross(c - a).dot(normal) > 0.0);
        }
    }

    #[test]
    fn cube_spans_unit_extent() {
        let (vertices, _) = unit_cube();
        for vertex in vertices {
            assert!(vertex.position.iter().all(|c| c.abs() == 0.5));
        }
    }
}

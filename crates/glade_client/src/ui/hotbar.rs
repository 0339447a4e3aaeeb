use std::mem;

use bytemuck::{Pod, Zeroable};
use glade_shared::block::{PALETTE, PALETTE_SIZE};
use wgpu::util::DeviceExt;

use crate::ui::{quad_indices, UiVertex};

const SLOT_SIZE: f32 = 40.0;
const SLOT_SPACING: f32 = 4.0;
const HOTBAR_Y_OFFSET: f32 = 20.0;
const BORDER_WIDTH: f32 = 3.0;
const SWATCH_SIZE: f32 = 30.0;

const SLOT_BG_COLOR: [f32; 4] = [0.2, 0.2, 0.2, 0.7];
const BORDER_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.95];

// Background and swatch per slot plus four border bars on the selection.
const MAX_QUADS: usize = PALETTE_SIZE * 2 + 4;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct ScreenUniform {
    dimensions: [f32; 2],
    _padding: [f32; 2],
}

impl ScreenUniform {
    fn new(width: u32, height: u32) -> Self {
        Self {
            dimensions: [width.max(1) as f32, height.max(1) as f32],
            _padding: [0.0, 0.0],
        }
    }
}

/// Color palette strip along the bottom of the screen. Vertices are in pixels
/// and converted to clip space by the shader.
pub struct HotbarRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    screen_uniform_buffer: wgpu::Buffer,
    screen_bind_group: wgpu::BindGroup,
    index_count: u32,
    width: u32,
    height: u32,
    selected: usize,
}

impl HotbarRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Hotbar Shader"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!(concat!(
                    env!("CARGO_MANIFEST_DIR"),
                    "/../../assets/shaders/hotbar.wgsl"
                ))
                .into(),
            ),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Hotbar Bind Group Layout"),
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Hotbar Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let attributes = &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            wgpu::VertexAttribute {
                offset: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x4,
            },
        ];

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Hotbar Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: mem::size_of::<UiVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes,
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let screen_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Hotbar Screen Uniform Buffer"),
            contents: bytemuck::bytes_of(&ScreenUniform::new(width, height)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let screen_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Hotbar Screen Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: screen_uniform_buffer.as_entire_binding(),
            }],
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Hotbar Vertex Buffer"),
            size: (MAX_QUADS * 4 * mem::size_of::<UiVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Hotbar Index Buffer"),
            contents: bytemuck::cast_slice(&quad_indices(MAX_QUADS)),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            screen_uniform_buffer,
            screen_bind_group,
            index_count: 0,
            width,
            height,
            selected: 0,
        }
    }

    pub fn resize(&mut self, queue: &wgpu::Queue, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        queue.write_buffer(
            &self.screen_uniform_buffer,
            0,
            bytemuck::bytes_of(&ScreenUniform::new(width, height)),
        );
        self.write_geometry(queue);
    }

    pub fn update(&mut self, queue: &wgpu::Queue, selected: usize) {
        if self.selected == selected && self.index_count != 0 {
            return;
        }
        self.selected = selected;
        self.write_geometry(queue);
    }

    pub fn render(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.index_count == 0 {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.screen_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    fn write_geometry(&mut self, queue: &wgpu::Queue) {
        let vertices = build_hotbar_vertices(self.width, self.height, self.selected);
        self.index_count = (vertices.len() / 4 * 6) as u32;
        queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
    }
}

fn build_hotbar_vertices(width: u32, height: u32, selected: usize) -> Vec<UiVertex> {
    let width = width.max(1) as f32;
    let height = height.max(1) as f32;

    let slots = PALETTE_SIZE as f32;
    let total_width = slots * SLOT_SIZE + (slots - 1.0) * SLOT_SPACING;
    let start_x = (width - total_width) / 2.0;
    let y = height - HOTBAR_Y_OFFSET - SLOT_SIZE;

    let mut vertices = Vec::with_capacity(MAX_QUADS * 4);
    for (slot, color) in PALETTE.iter().enumerate() {
        let x = start_x + slot as f32 * (SLOT_SIZE + SLOT_SPACING);
        push_quad(&mut vertices, x, y, SLOT_SIZE, SLOT_SIZE, SLOT_BG_COLOR);

        let inset = (SLOT_SIZE - SWATCH_SIZE) / 2.0;
        push_quad(
            &mut vertices,
            x + inset,
            y + inset,
            SWATCH_SIZE,
            SWATCH_SIZE,
            color.to_rgba(1.0),
        );

        if slot == selected {
            push_quad(&mut vertices, x, y, SLOT_SIZE, BORDER_WIDTH, BORDER_COLOR);
            push_quad(
                &mut vertices,
                x,
                y + SLOT_SIZE - BORDER_WIDTH,
                SLOT_SIZE,
                BORDER_WIDTH,
                BORDER_COLOR,
            );
            push_quad(&mut vertices, x, y, BORDER_WIDTH, SLOT_SIZE, BORDER_COLOR);
            push_quad(
                &mut vertices,
                x + SLOT_SIZE - BORDER_WIDTH,
                y,
                BORDER_WIDTH,
                SLOT_SIZE,
                BORDER_COLOR,
            );
        }
    }
    vertices
}

fn push_quad(vertices: &mut Vec<UiVertex>, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
    vertices.extend(
        [[x, y], [x + w, y], [x + w, y + h], [x, y + h]].map(|position| UiVertex { position, color }),
    );
}

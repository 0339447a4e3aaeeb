use wgpu::util::DeviceExt;

use crate::ui::{create_ui_pipeline, quad_indices, UiVertex};

const CROSSHAIR_LENGTH_PX: f32 = 20.0;
const CROSSHAIR_THICKNESS_PX: f32 = 2.0;
const CROSSHAIR_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.9];

pub struct CrosshairRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl CrosshairRenderer {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let pipeline = create_ui_pipeline(device, color_format, "Crosshair Pipeline");
        let vertices = build_vertices(width, height);
        let indices = quad_indices(2);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Crosshair Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Crosshair Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    pub fn resize(&self, queue: &wgpu::Queue, width: u32, height: u32) {
        let vertices = build_vertices(width, height);
        queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
    }

    pub fn render(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// A horizontal and a vertical bar crossing at the screen center, sized in
/// pixels so the mark keeps its shape on any aspect ratio.
fn build_vertices(width: u32, height: u32) -> [UiVertex; 8] {
    let px_x = 2.0 / width.max(1) as f32;
    let px_y = 2.0 / height.max(1) as f32;
    let long = CROSSHAIR_LENGTH_PX * 0.5;
    let thick = CROSSHAIR_THICKNESS_PX * 0.5;

    let bar = |half_w: f32, half_h: f32| {
        [
            [-half_w, -half_h],
            [half_w, -half_h],
            [half_w, half_h],
            [-half_w, half_h],
        ]
        .map(|position| UiVertex {
            position,
            color: CROSSHAIR_COLOR,
        })
    };

    let horizontal = bar(long * px_x, thick * px_y);
    let vertical = bar(thick * px_x, long * px_y);
    let mut vertices = [horizontal[0]; 8];
    vertices[..4].copy_from_slice(&horizontal);
    vertices[4..].copy_from_slice(&vertical);
    vertices
}

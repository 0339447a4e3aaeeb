use std::mem;

use crate::ui::{create_ui_pipeline, quad_indices, screen_to_ndc, UiVertex};

const MAX_QUADS: usize = 4_096;
const MAX_VERTICES: usize = MAX_QUADS * 4;
const MAX_INDICES: usize = MAX_QUADS * 6;

const PANEL_MARGIN_PX: f32 = 10.0;
const PANEL_PADDING_PX: f32 = 8.0;
const FONT_PIXEL_SCALE: f32 = 2.0;
const LINE_GAP_PX: f32 = 4.0;
const GLYPH_ROWS: usize = 7;
const GLYPH_COLUMNS: usize = 5;

const PANEL_BG_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.5];
const TEXT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Top-left HUD panel drawn with a 5x7 bitmap font.
pub struct TextOverlayRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl TextOverlayRenderer {
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        let pipeline = create_ui_pipeline(device, color_format, "Text Overlay Pipeline");

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Text Overlay Vertex Buffer"),
            size: (MAX_VERTICES * mem::size_of::<UiVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Text Overlay Index Buffer"),
            size: (MAX_INDICES * mem::size_of::<u16>()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: 0,
        }
    }

    pub fn update<S: AsRef<str>>(&mut self, queue: &wgpu::Queue, width: u32, height: u32, lines: &[S]) {
        let mut vertices = layout_panel(lines, width, height);
        let quad_count = (vertices.len() / 4).min(MAX_QUADS);
        vertices.truncate(quad_count * 4);
        let indices = quad_indices(quad_count);

        self.index_count = indices.len() as u32;
        if !vertices.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
            queue.write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&indices));
        }
    }

    pub fn render(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.index_count == 0 {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

fn layout_panel<S: AsRef<str>>(lines: &[S], width: u32, height: u32) -> Vec<UiVertex> {
    if lines.is_empty() {
        return Vec::new();
    }

    let screen = (width.max(1) as f32, height.max(1) as f32);
    let char_stride_px = (GLYPH_COLUMNS + 1) as f32 * FONT_PIXEL_SCALE;
    let line_height_px = GLYPH_ROWS as f32 * FONT_PIXEL_SCALE + LINE_GAP_PX;

    let longest = lines
        .iter()
        .map(|line| line.as_ref().chars().count())
        .max()
        .unwrap_or(0);
    let text_width_px = (longest as f32 * char_stride_px - FONT_PIXEL_SCALE).max(0.0);
    let text_height_px = lines.len() as f32 * line_height_px - LINE_GAP_PX;

    let mut vertices = Vec::with_capacity(1024);
    push_quad_px(
        &mut vertices,
        PANEL_MARGIN_PX,
        PANEL_MARGIN_PX,
        text_width_px + PANEL_PADDING_PX * 2.0,
        text_height_px + PANEL_PADDING_PX * 2.0,
        screen,
        PANEL_BG_COLOR,
    );

    let text_x = PANEL_MARGIN_PX + PANEL_PADDING_PX;
    let mut text_y = PANEL_MARGIN_PX + PANEL_PADDING_PX;
    for line in lines {
        push_text_px(&mut vertices, line.as_ref(), text_x, text_y, screen);
        text_y += line_height_px;
    }
    vertices
}

fn push_quad_px(
    vertices: &mut Vec<UiVertex>,
    x_px: f32,
    y_px: f32,
    w_px: f32,
    h_px: f32,
    (screen_w, screen_h): (f32, f32),
    color: [f32; 4],
) {
    let (x0, y0) = screen_to_ndc(x_px, y_px, screen_w, screen_h);
    let (x1, y1) = screen_to_ndc(x_px + w_px, y_px + h_px, screen_w, screen_h);

    vertices.extend(
        [[x0, y1], [x1, y1], [x1, y0], [x0, y0]].map(|position| UiVertex { position, color }),
    );
}

fn push_text_px(vertices: &mut Vec<UiVertex>, text: &str, origin_x: f32, origin_y: f32, screen: (f32, f32)) {
    let char_stride = (GLYPH_COLUMNS + 1) as f32 * FONT_PIXEL_SCALE;

    for (index, ch) in text.chars().enumerate() {
        let Some(rows) = glyph(ch.to_ascii_uppercase()) else {
            continue;
        };
        let x = origin_x + index as f32 * char_stride;

        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_COLUMNS {
                if bits & (0x10 >> col) == 0 {
                    continue;
                }
                push_quad_px(
                    vertices,
                    x + col as f32 * FONT_PIXEL_SCALE,
                    origin_y + row as f32 * FONT_PIXEL_SCALE,
                    FONT_PIXEL_SCALE,
                    FONT_PIXEL_SCALE,
                    screen,
                    TEXT_COLOR,
                );
            }
        }
    }
}

fn glyph(ch: char) -> Option<[u8; GLYPH_ROWS]> {
    Some(match ch {
        'A' => [0x04, 0x0A, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0E, 0x11, 0x10, 0x0E, 0x01, 0x11, 0x0E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x1B, 0x11],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x06, 0x08, 0x10, 0x1F],
        '3' => [0x0E, 0x11, 0x01, 0x06, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C, 0x08],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '(' => [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
        ')' => [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
        _ => return None,
    })
}

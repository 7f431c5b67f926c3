//! Tessellation of draw commands into triangle lists

use glam::Vec2;

use super::draw::{Color, DrawCommand, DrawList};
use super::vertex::Vertex;

/// Two triangles covering an axis-aligned rectangle
pub fn rect(min: Vec2, size: Vec2, color: Color) -> [Vertex; 6] {
    let max = min + size;
    [
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

pub fn triangle(points: [Vec2; 3], color: Color) -> [Vertex; 3] {
    points.map(|p| Vertex::at(p, color))
}

/// Filled geometry of a frame in paint order (pixel space)
///
/// Clears are handled by the render pass and text by the DOM overlay, so
/// both are skipped here.
pub fn tessellate(list: &DrawList) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(list.commands.len() * 6);
    for cmd in &list.commands {
        match cmd {
            DrawCommand::Rect { min, size, color } => {
                vertices.extend_from_slice(&rect(*min, *size, *color));
            }
            DrawCommand::Triangle { points, color } => {
                vertices.extend_from_slice(&triangle(*points, *color));
            }
            DrawCommand::Clear(_) | DrawCommand::Label { .. } | DrawCommand::Readout { .. } => {}
        }
    }
    vertices
}

/// Convert surface pixels (origin top-left, y down) to normalized device coordinates
#[inline]
pub fn pixel_to_ndc(pos: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(pos.x / width * 2.0 - 1.0, 1.0 - pos.y / height * 2.0)
}

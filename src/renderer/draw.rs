//! Backend-independent draw instructions
//!
//! Coordinates are surface pixels with the origin at the top-left and y
//! pointing down.

use glam::Vec2;

use crate::i18n::{LabelKey, ReadoutLine};

/// Straight (non-premultiplied) RGBA in 0..1
pub type Color = [f32; 4];

/// A single draw instruction; order in the list is paint order
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface
    Clear(Color),
    /// Axis-aligned rectangle; `size.x` may be zero
    Rect { min: Vec2, size: Vec2, color: Color },
    Triangle { points: [Vec2; 3], color: Color },
    /// Localized label, resolved by key at display time
    Label {
        pos: Vec2,
        key: LabelKey,
        color: Color,
        size: f32,
    },
    /// One readout line, formatted by the localization provider
    Readout {
        pos: Vec2,
        line: ReadoutLine,
        color: Color,
        size: f32,
    },
}

/// Draw instructions for one frame of a `width` × `height` surface
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    pub width: f32,
    pub height: f32,
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Background color of the frame, if a clear was issued
    pub fn clear_color(&self) -> Option<Color> {
        self.commands.iter().find_map(|cmd| match cmd {
            DrawCommand::Clear(color) => Some(*color),
            _ => None,
        })
    }
}

/// Scene colors (sRGB, matching the CSS values of the page)
pub mod colors {
    use super::Color;

    const fn gray(v: f32, alpha: f32) -> Color {
        [v / 255.0, v / 255.0, v / 255.0, alpha]
    }

    pub const BACKGROUND: Color = gray(240.0, 1.0);
    pub const ROAD: Color = gray(80.0, 1.0);
    pub const SKID_MARK: Color = gray(0.0, 150.0 / 255.0);
    pub const CAR: Color = [0.0, 150.0 / 255.0, 250.0 / 255.0, 1.0];
    pub const BRAKE_MARKER: Color = [1.0, 0.0, 0.0, 1.0];
    /// CSS `green`
    pub const STOP_MARKER: Color = [0.0, 128.0 / 255.0, 0.0, 1.0];
    pub const TEXT: Color = gray(0.0, 1.0);
}

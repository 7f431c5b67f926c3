//! Text for the DOM overlay
//!
//! The GPU pipeline only fills shapes; labels and the readout are resolved
//! into positioned strings here and laid over the canvas by the host page.

use glam::Vec2;

use super::draw::{Color, DrawCommand, DrawList};
use crate::i18n::Labels;

/// A resolved, positioned string (baseline-left anchored, surface pixels)
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub pos: Vec2,
    pub text: String,
    pub size: f32,
    pub color: Color,
}

impl TextItem {
    /// CSS `rgba()` for the item's color
    pub fn css_color(&self) -> String {
        let [r, g, b, a] = self.color;
        format!(
            "rgba({}, {}, {}, {:.3})",
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
            a
        )
    }
}

/// Resolve every label and readout command of a frame, in paint order
pub fn text_items(list: &DrawList, labels: &Labels) -> Vec<TextItem> {
    list.commands
        .iter()
        .filter_map(|cmd| match cmd {
            DrawCommand::Label {
                pos,
                key,
                color,
                size,
            } => Some(TextItem {
                pos: *pos,
                text: labels.get(*key).to_string(),
                size: *size,
                color: *color,
            }),
            DrawCommand::Readout {
                pos,
                line,
                color,
                size,
            } => Some(TextItem {
                pos: *pos,
                text: labels.format_readout(line),
                size: *size,
                color: *color,
            }),
            _ => None,
        })
        .collect()
}

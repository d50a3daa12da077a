//! A surface that records draw calls instead of drawing
//!
//! Used by the headless runner and by render tests.

use glam::Vec2;

use super::surface::{Color, Surface, TextStyle};
use crate::assets::AssetId;
use crate::sim::Rect;

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect(Rect, Color),
    Image(AssetId, Rect),
    Text {
        text: String,
        at: Vec2,
        style: TextStyle,
    },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous frame
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// All text drawn this frame, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }

    pub fn images(&self) -> Vec<AssetId> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Image(id, _) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn rect_count(&self, color: Color) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect(_, fill) if *fill == color))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect(rect, color));
    }

    fn draw_image(&mut self, image: AssetId, rect: Rect) {
        self.commands.push(DrawCommand::Image(image, rect));
    }

    fn draw_text(&mut self, text: &str, at: Vec2, style: TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            at,
            style,
        });
    }
}

//! Drawing contract between games and the platform
//!
//! Games only ever see these primitives. The platform decides how they are
//! realised (canvas 2D on the web, a command recorder in tests and headless
//! runs).

use std::fmt;

use glam::Vec2;

use crate::assets::{AssetId, Assets};
use crate::sim::Rect;
use crate::sim::entity::Entity;

/// RGBA colour, alpha in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// From a packed 0xRRGGBB value
    pub const fn from_u24(value: u32) -> Self {
        Self::rgb(
            ((value >> 16) & 0xFF) as u8,
            ((value >> 8) & 0xFF) as u8,
            (value & 0xFF) as u8,
        )
    }

    pub const fn to_u24(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Upper-case `#RRGGBB`
    pub fn to_hex(self) -> String {
        format!("#{:06X}", self.to_u24())
    }

    /// CSS colour string for canvas fill styles
    pub fn to_css(self) -> String {
        if self.a >= 1.0 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Monospace font at a pixel size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub size_px: f32,
}

impl Font {
    pub const fn mono(size_px: f32) -> Self {
        Self { size_px }
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px \"Courier New\", monospace", self.size_px)
    }
}

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

impl Align {
    pub fn as_str(&self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
        }
    }
}

/// Text drawing parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub align: Align,
    pub color: Color,
}

impl TextStyle {
    pub const fn new(size_px: f32, align: Align, color: Color) -> Self {
        Self {
            font: Font::mono(size_px),
            align,
            color,
        }
    }
}

/// The drawing operations a game may use
pub trait Surface {
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn draw_image(&mut self, image: AssetId, rect: Rect);
    fn draw_text(&mut self, text: &str, at: Vec2, style: TextStyle);
}

/// Draw the background image, or clear to `fallback` if it did not load
pub fn draw_background(
    surface: &mut dyn Surface,
    assets: &Assets,
    image: AssetId,
    size: Vec2,
    fallback: Color,
) {
    if assets.is_ready(image) {
        surface.draw_image(image, Rect { pos: Vec2::ZERO, size });
    } else {
        surface.clear(fallback);
    }
}

/// Draw an entity's sprite; entities without a loaded sprite are skipped
pub fn draw_entity(surface: &mut dyn Surface, assets: &Assets, entity: &Entity) {
    if let Some(sprite) = entity.sprite {
        if assets.is_ready(sprite) {
            surface.draw_image(sprite, entity.rect());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let color = Color::from_u24(0x0A_B1_FF);
        assert_eq!(color, Color::rgb(0x0A, 0xB1, 0xFF));
        assert_eq!(color.to_hex(), "#0AB1FF");
    }

    #[test]
    fn test_css_strings() {
        assert_eq!(Color::rgb(0, 255, 0).to_css(), "rgb(0, 255, 0)");
        assert_eq!(Color::rgba(255, 0, 0, 0.9).to_css(), "rgba(255, 0, 0, 0.9)");
        assert_eq!(Font::mono(25.0).to_string(), "25px \"Courier New\", monospace");
    }
}

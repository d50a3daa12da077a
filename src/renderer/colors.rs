//! Colors for game elements

use super::surface::Color;

pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const YELLOW: Color = Color::rgb(255, 255, 0);

/// Background fallbacks when the background image failed to load
pub const SNOW: Color = Color::rgb(230, 240, 250);
pub const OCEAN: Color = Color::rgb(10, 40, 90);
pub const DISCO_FLOOR: Color = Color::rgb(20, 10, 40);

pub const SNAKE_GREEN: Color = Color::rgb(0, 255, 0);
pub const SNAKE_BLUE: Color = Color::rgb(0, 0, 255);
pub const FOOD_RED: Color = Color::rgba(255, 0, 0, 0.9);
pub const FOOD_RED_SHARED: Color = Color::rgba(255, 0, 0, 0.7);
pub const FOOD_SPOILED: Color = Color::rgba(160, 103, 60, 0.7);

pub const LIGHT_ON: Color = Color::rgb(255, 220, 60);
pub const LIGHT_OFF: Color = Color::rgb(40, 40, 50);
pub const PANEL: Color = Color::rgb(15, 15, 20);

//! Rendering contract
//!
//! Games draw through the [`Surface`] trait only; rendering reads game state
//! and never mutates it.

pub mod colors;
pub mod recording;
pub mod surface;

pub use recording::{DrawCommand, RecordingSurface};
pub use surface::{Align, Color, Font, Surface, TextStyle, draw_background, draw_entity};

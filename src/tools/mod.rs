//! Non-game page utilities

pub mod base_converter;
pub mod code_viewer;

pub use base_converter::{BaseConverter, ConvertError, convert};
pub use code_viewer::{CodeView, FetchError};

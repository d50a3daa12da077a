//! Crate-level error type
//!
//! Game logic itself is total and never fails; errors only come from
//! configuration, asset bookkeeping and the native runner.

use thiserror::Error;

/// Errors surfaced outside the per-tick game logic
#[derive(Debug, Error)]
pub enum ArcadeError {
    /// Settings JSON could not be parsed
    #[error("invalid settings JSON: {0}")]
    SettingsParse(#[from] serde_json::Error),

    /// A numeric setting is outside its allowed range
    #[error("setting `{name}` out of range: {value}")]
    InvalidSetting { name: &'static str, value: f32 },

    /// A key binding names a player that the game does not have
    #[error("key `{key}` bound to unknown player {player}")]
    InvalidBinding { key: String, player: u8 },

    /// An asset status update named an asset that was never declared
    #[error("asset `{0}` was never declared")]
    UnknownAsset(String),

    /// No game with this name
    #[error("unknown game `{0}`")]
    UnknownGame(String),

    /// Colour game difficulty is not one of the offered levels
    #[error("unsupported difficulty: {0} colours")]
    UnsupportedDifficulty(usize),

    /// Reading a settings file failed
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

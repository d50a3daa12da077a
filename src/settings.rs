//! Session settings and preferences
//!
//! Parsed from JSON handed over by the host page or the native runner.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::audio::AudioMixer;
use crate::error::ArcadeError;
use crate::sim::{Control, KeyBindings};

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Start muted
    pub muted: bool,

    // === Loop ===
    /// Most ticks a fixed-interval game may run in one frame when catching up
    pub max_catch_up_ticks: u32,
    /// Seed for every random choice in the session
    pub seed: u64,

    // === Input ===
    /// Extra or replacement key bindings, keyed by `KeyboardEvent.code`
    pub key_overrides: BTreeMap<String, Control>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            max_catch_up_ticks: 4,
            seed: 0x5EED,

            key_overrides: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Parse and validate settings; nothing is applied if either step fails
    pub fn from_json(json: &str) -> Result<Self, ArcadeError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        log::info!("Loaded settings (seed {})", settings.seed);
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ArcadeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ArcadeError> {
        for (name, value) in [
            ("master_volume", self.master_volume),
            ("sfx_volume", self.sfx_volume),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ArcadeError::InvalidSetting { name, value });
            }
        }
        if self.max_catch_up_ticks == 0 {
            return Err(ArcadeError::InvalidSetting {
                name: "max_catch_up_ticks",
                value: 0.0,
            });
        }
        Ok(())
    }

    /// Check overrides against the number of players a game has
    pub fn validate_players(&self, players: u8) -> Result<(), ArcadeError> {
        match self
            .key_overrides
            .iter()
            .find(|(_, control)| control.player >= players)
        {
            Some((key, control)) => Err(ArcadeError::InvalidBinding {
                key: key.clone(),
                player: control.player,
            }),
            None => Ok(()),
        }
    }

    /// Layer the overrides on top of a game's default bindings
    pub fn apply_bindings(&self, bindings: &mut KeyBindings) {
        for (key, control) in &self.key_overrides {
            bindings.set(key, *control);
        }
    }

    /// Configure a mixer from these settings
    pub fn configure_audio(&self, mixer: &mut AudioMixer) {
        mixer.set_master_volume(self.master_volume);
        mixer.set_sfx_volume(self.sfx_volume);
        mixer.set_muted(self.muted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Action;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.master_volume, 0.8);
        assert_eq!(settings.max_catch_up_ticks, 4);
    }

    #[test]
    fn test_out_of_range_volume_is_rejected() {
        let err = Settings::from_json(r#"{ "master_volume": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            ArcadeError::InvalidSetting { name: "master_volume", .. }
        ));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(
            Settings::from_json("{ seed: }"),
            Err(ArcadeError::SettingsParse(_))
        ));
    }

    #[test]
    fn test_key_overrides_replace_defaults() {
        let json = r#"{ "key_overrides": { "KeyJ": { "player": 0, "action": "Left" } } }"#;
        let settings = Settings::from_json(json).unwrap();
        let mut bindings = KeyBindings::arrows();
        settings.apply_bindings(&mut bindings);
        assert_eq!(bindings.resolve("KeyJ"), Some(Control::p1(Action::Left)));
        assert_eq!(bindings.resolve("ArrowLeft"), Some(Control::p1(Action::Left)));
    }

    #[test]
    fn test_override_for_missing_player() {
        let json = r#"{ "key_overrides": { "KeyI": { "player": 1, "action": "Up" } } }"#;
        let settings = Settings::from_json(json).unwrap();
        assert!(settings.validate_players(2).is_ok());
        assert!(matches!(
            settings.validate_players(1),
            Err(ArcadeError::InvalidBinding { player: 1, .. })
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings::default();
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}

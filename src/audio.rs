//! Sound feedback
//!
//! Fire-and-forget: games emit [`SoundEffect`]s, the session hands them to an
//! [`AudioMixer`] which applies volume/mute and forwards to a platform sink.
//! Nothing in game logic waits on audio.

use crate::assets::AssetId;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball breaks or damages a brick
    BrickHit,
    /// Ball fell past the paddle
    LoseLife,
    /// Brick breaker ran out of lives
    Avalanche,
    /// Laser hit an alien
    AlienHit,
    /// Laser hit the bonus target
    NiceShot,
    /// Invaders game over
    InvadersEnd,
}

impl SoundEffect {
    /// Asset that plays this effect
    pub fn asset(&self) -> AssetId {
        match self {
            SoundEffect::BrickHit => AssetId("hitSound"),
            SoundEffect::LoseLife => AssetId("loseLifeSound"),
            SoundEffect::Avalanche => AssetId("gameEndSound"),
            SoundEffect::AlienHit => AssetId("invaderHitSound"),
            SoundEffect::NiceShot => AssetId("niceShot"),
            SoundEffect::InvadersEnd => AssetId("endSound"),
        }
    }
}

/// Platform audio backend
pub trait AudioSink {
    /// Start playing from the beginning at the given volume (0.0 - 1.0)
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Backend that plays nothing (headless runs)
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
}

/// Audio manager for a session
pub struct AudioMixer {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioMixer {
    fn default() -> Self {
        Self::new(Box::new(NullAudio))
    }
}

impl AudioMixer {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct Recorder(Rc<RefCell<Vec<(SoundEffect, f32)>>>);

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect, volume: f32) {
            self.0.borrow_mut().push((effect, volume));
        }
    }

    #[test]
    fn test_volume_is_scaled_and_clamped() {
        let recorder = Recorder::default();
        let mut mixer = AudioMixer::new(Box::new(recorder.clone()));
        mixer.set_master_volume(0.5);
        mixer.set_sfx_volume(2.0);
        mixer.play(SoundEffect::BrickHit);
        assert_eq!(*recorder.0.borrow(), vec![(SoundEffect::BrickHit, 0.5)]);
    }

    #[test]
    fn test_muted_mixer_is_silent() {
        let recorder = Recorder::default();
        let mut mixer = AudioMixer::new(Box::new(recorder.clone()));
        mixer.set_muted(true);
        mixer.play(SoundEffect::NiceShot);
        assert!(recorder.0.borrow().is_empty());
    }
}

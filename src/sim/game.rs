//! The contract every loop-driven game implements

use crate::assets::{AssetManifest, Assets};
use crate::audio::SoundEffect;
use crate::driver::TickSource;
use crate::renderer::Surface;

use super::input::{Control, Controls};
use super::phase::Phase;

/// Something that happened during a press or a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Play a sound (fire-and-forget)
    Sound(SoundEffect),
    /// Score changed by `delta`
    Scored { delta: i64 },
    /// A life was lost; `remaining` lives left
    LifeLost { remaining: u32 },
    /// Every obstacle was cleared, now on `level`
    LevelCleared { level: u32 },
    /// Session ended
    GameOver { score: i64 },
    /// World rebuilt from scratch
    Reset,
}

/// A game driven by the update/render loop.
///
/// `press` is the edge-sensitive path: it runs once per physical key press,
/// immediately, against the current phase. `update` is one tick and reads
/// only the held-controls snapshot. `render` takes `&self`, so drawing can
/// never change the world.
pub trait Game {
    fn title(&self) -> &'static str;

    fn tick_source(&self) -> TickSource;

    /// Assets that must settle before the first tick
    fn assets(&self) -> AssetManifest {
        AssetManifest::new()
    }

    fn phase(&self) -> Phase;

    fn score(&self) -> i64;

    /// A fresh key press; `None` when the key is not bound to anything
    fn press(&mut self, control: Option<Control>, events: &mut Vec<GameEvent>);

    /// Advance one tick
    fn update(&mut self, controls: &Controls, events: &mut Vec<GameEvent>);

    fn render(&self, surface: &mut dyn Surface, assets: &Assets);

    /// Discard the world and build a fresh one
    fn reset(&mut self);
}

impl<G: Game + ?Sized> Game for Box<G> {
    fn title(&self) -> &'static str {
        (**self).title()
    }

    fn tick_source(&self) -> TickSource {
        (**self).tick_source()
    }

    fn assets(&self) -> AssetManifest {
        (**self).assets()
    }

    fn phase(&self) -> Phase {
        (**self).phase()
    }

    fn score(&self) -> i64 {
        (**self).score()
    }

    fn press(&mut self, control: Option<Control>, events: &mut Vec<GameEvent>) {
        (**self).press(control, events)
    }

    fn update(&mut self, controls: &Controls, events: &mut Vec<GameEvent>) {
        (**self).update(controls, events)
    }

    fn render(&self, surface: &mut dyn Surface, assets: &Assets) {
        (**self).render(surface, assets)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

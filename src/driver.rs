//! Loop driver and game session
//!
//! A [`Session`] owns exactly one game plus its input latch, key bindings,
//! asset status and audio. The platform calls [`Session::frame`] from
//! whatever scheduler it has (animation frame callback, interval timer,
//! a headless loop); the [`LoopDriver`] turns wall-clock time into a number
//! of ticks according to the game's [`TickSource`].

use std::cell::Cell;
use std::rc::Rc;

use crate::assets::Assets;
use crate::audio::AudioMixer;
use crate::renderer::Surface;
use crate::settings::Settings;
use crate::sim::{Control, Controls, Game, GameEvent, InputLatch, KeyBindings};

/// How ticks are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSource {
    /// One tick per display refresh (continuous-motion games)
    AnimationFrame,
    /// One tick per `period_ms`, independent of refresh rate (grid games)
    FixedInterval { period_ms: u32 },
}

/// Stop switch shared between the driver and whoever scheduled it
#[derive(Debug, Clone, Default)]
pub struct LoopHandle {
    stopped: Rc<Cell<bool>>,
}

impl LoopHandle {
    pub fn stop(&self) {
        self.stopped.set(true);
    }

    pub fn is_running(&self) -> bool {
        !self.stopped.get()
    }
}

/// Converts frame timestamps into ticks
#[derive(Debug)]
pub struct LoopDriver {
    source: TickSource,
    max_catch_up: u32,
    accumulator_ms: f64,
    last_ms: Option<f64>,
    /// The scheduler already fires once per period
    paced: bool,
    handle: LoopHandle,
}

impl LoopDriver {
    pub fn new(source: TickSource, max_catch_up: u32) -> Self {
        Self {
            source,
            max_catch_up: max_catch_up.max(1),
            accumulator_ms: 0.0,
            last_ms: None,
            paced: false,
            handle: LoopHandle::default(),
        }
    }

    pub fn source(&self) -> TickSource {
        self.source
    }

    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    /// Mark the frames as coming from a timer that already fires every
    /// `period_ms`; each frame then runs exactly one tick
    pub fn set_paced(&mut self, paced: bool) {
        self.paced = paced;
    }

    /// Number of ticks to run for a frame at `now_ms`.
    ///
    /// Fixed-interval sources accumulate elapsed time and run at most
    /// `max_catch_up` ticks per frame; time beyond that is dropped rather
    /// than replayed later.
    pub fn ticks_due(&mut self, now_ms: f64) -> u32 {
        if !self.is_running() {
            return 0;
        }
        match self.source {
            TickSource::AnimationFrame => 1,
            TickSource::FixedInterval { .. } if self.paced => 1,
            TickSource::FixedInterval { period_ms } => {
                let period = f64::from(period_ms.max(1));
                let Some(last) = self.last_ms.replace(now_ms) else {
                    return 0;
                };
                self.accumulator_ms += (now_ms - last).max(0.0);

                let due = (self.accumulator_ms / period).floor();
                let ticks = (due as u32).min(self.max_catch_up);
                if due as u32 > self.max_catch_up {
                    self.accumulator_ms %= period;
                } else {
                    self.accumulator_ms -= f64::from(ticks) * period;
                }
                ticks
            }
        }
    }
}

/// One running game and everything it exclusively owns
pub struct Session<G: Game> {
    game: G,
    bindings: KeyBindings,
    latch: InputLatch,
    assets: Assets,
    audio: AudioMixer,
    driver: LoopDriver,
    events: Vec<GameEvent>,
    ticks: u64,
}

impl<G: Game> Session<G> {
    /// Assets start pending; the platform reports load results through
    /// [`Session::assets_mut`]
    pub fn new(game: G, bindings: KeyBindings, audio: AudioMixer, settings: &Settings) -> Self {
        let assets = Assets::declare(&game.assets());
        Self::with_assets(game, bindings, audio, settings, assets)
    }

    /// Session whose assets are already accounted for (headless runs)
    pub fn preloaded(game: G, bindings: KeyBindings, audio: AudioMixer, settings: &Settings) -> Self {
        let assets = Assets::preloaded(&game.assets());
        Self::with_assets(game, bindings, audio, settings, assets)
    }

    fn with_assets(
        game: G,
        mut bindings: KeyBindings,
        audio: AudioMixer,
        settings: &Settings,
        assets: Assets,
    ) -> Self {
        settings.apply_bindings(&mut bindings);
        let driver = LoopDriver::new(game.tick_source(), settings.max_catch_up_ticks);
        log::info!("Session for {} ({:?})", game.title(), driver.source());
        Self {
            game,
            bindings,
            latch: InputLatch::new(),
            assets,
            audio,
            driver,
            events: Vec::new(),
            ticks: 0,
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut Assets {
        &mut self.assets
    }

    pub fn audio_mut(&mut self) -> &mut AudioMixer {
        &mut self.audio
    }

    pub fn handle(&self) -> LoopHandle {
        self.driver.handle()
    }

    /// See [`LoopDriver::set_paced`]
    pub fn set_paced(&mut self, paced: bool) {
        self.driver.set_paced(paced);
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// True once every declared asset has loaded or failed
    pub fn is_ready(&self) -> bool {
        self.assets.is_settled()
    }

    /// Raw key press from the platform. Fresh presses are dispatched to the
    /// game immediately; repeats only refresh the latch.
    pub fn key_down(&mut self, key: &str) {
        let control = self.bindings.resolve(key);
        if self.latch.key_down(key, control) {
            self.press(control);
        }
    }

    /// Dispatch an edge action directly, bypassing the latch (autopilot)
    pub fn press(&mut self, control: Option<Control>) {
        if self.is_ready() {
            self.game.press(control, &mut self.events);
            self.flush_events();
        }
    }

    pub fn key_up(&mut self, key: &str) {
        self.latch.key_up(key);
    }

    /// Release all keys (window lost focus)
    pub fn release_all(&mut self) {
        self.latch.clear();
    }

    /// One update step against the current latch snapshot
    pub fn tick(&mut self) {
        let controls = self.latch.snapshot();
        self.tick_with(&controls);
    }

    /// One update step against an explicit snapshot
    pub fn tick_with(&mut self, controls: &Controls) {
        self.game.update(controls, &mut self.events);
        self.ticks += 1;
        self.flush_events();
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        self.game.render(surface, &self.assets);
    }

    /// Run the ticks due at `now_ms`, then draw once. Returns ticks run.
    pub fn frame(&mut self, now_ms: f64, surface: &mut dyn Surface) -> u32 {
        if !self.is_ready() || !self.driver.is_running() {
            return 0;
        }
        let due = self.driver.ticks_due(now_ms);
        for _ in 0..due {
            self.tick();
        }
        self.render(surface);
        due
    }

    fn flush_events(&mut self) {
        for event in self.events.drain(..) {
            match event {
                GameEvent::Sound(effect) => self.audio.play(effect),
                GameEvent::LifeLost { remaining } => {
                    log::info!("{}: life lost, {} left", self.game.title(), remaining)
                }
                GameEvent::LevelCleared { level } => {
                    log::info!("{}: level cleared, now level {}", self.game.title(), level)
                }
                GameEvent::GameOver { score } => {
                    log::info!("{}: game over, score {}", self.game.title(), score)
                }
                GameEvent::Reset => log::info!("{}: reset", self.game.title()),
                GameEvent::Scored { delta } => log::trace!("score {:+}", delta),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;
    use crate::games::BrickBreaker;
    use crate::renderer::RecordingSurface;
    use crate::sim::Phase;

    #[test]
    fn test_animation_frame_ticks_once_per_frame() {
        let mut driver = LoopDriver::new(TickSource::AnimationFrame, 4);
        assert_eq!(driver.ticks_due(0.0), 1);
        assert_eq!(driver.ticks_due(16.7), 1);
        assert_eq!(driver.ticks_due(100.0), 1);
    }

    #[test]
    fn test_fixed_interval_accumulates() {
        let mut driver = LoopDriver::new(TickSource::FixedInterval { period_ms: 100 }, 4);
        assert_eq!(driver.ticks_due(0.0), 0);
        assert_eq!(driver.ticks_due(60.0), 0);
        assert_eq!(driver.ticks_due(120.0), 1);
        assert_eq!(driver.ticks_due(200.0), 1);
        assert_eq!(driver.ticks_due(410.0), 2);
    }

    #[test]
    fn test_fixed_interval_caps_catch_up() {
        let mut driver = LoopDriver::new(TickSource::FixedInterval { period_ms: 100 }, 3);
        driver.ticks_due(0.0);
        assert_eq!(driver.ticks_due(1050.0), 3);
        assert_eq!(driver.ticks_due(1100.0), 1);
    }

    #[test]
    fn test_paced_interval_ticks_once_per_callback() {
        // setInterval callbacks arrive a little early or late
        let stamps = [0.0, 100.2, 199.9, 300.0, 400.3, 499.8, 600.1];

        let mut paced = LoopDriver::new(TickSource::FixedInterval { period_ms: 100 }, 4);
        paced.set_paced(true);
        let ticks: Vec<u32> = stamps.iter().map(|&t| paced.ticks_due(t)).collect();
        assert_eq!(ticks, vec![1; stamps.len()]);

        paced.handle().stop();
        assert_eq!(paced.ticks_due(700.0), 0);
    }

    #[test]
    fn test_paced_session_steps_snake_every_callback() {
        let game = crate::games::ClassicSnake::new(3);
        let audio = AudioMixer::new(Box::new(NullAudio));
        let mut session = Session::preloaded(game, KeyBindings::arrows(), audio, &Settings::default());
        session.set_paced(true);
        let mut surface = RecordingSurface::new();

        session.key_down("ArrowLeft");
        for (i, &t) in [0.0, 100.2, 199.9, 300.0].iter().enumerate() {
            assert_eq!(session.frame(t, &mut surface), 1);
            assert_eq!(session.ticks(), i as u64 + 1);
        }
    }

    fn session() -> Session<BrickBreaker> {
        let game = BrickBreaker::new();
        let bindings = KeyBindings::arrows();
        let audio = AudioMixer::new(Box::new(NullAudio));
        Session::new(game, bindings, audio, &Settings::default())
    }

    #[test]
    fn test_session_waits_for_assets() {
        let mut session = session();
        let mut surface = RecordingSurface::new();
        assert!(!session.is_ready());
        assert_eq!(session.frame(0.0, &mut surface), 0);
        assert!(surface.commands.is_empty());

        // Presses before assets settle are not dispatched
        session.key_down("Space");
        assert_eq!(session.game().phase(), Phase::NotStarted);
        session.key_up("Space");

        let ids: Vec<_> = session.assets().pending().collect();
        for (i, id) in ids.into_iter().enumerate() {
            if i == 0 {
                session.assets_mut().mark_failed(id, "404").unwrap();
            } else {
                session.assets_mut().mark_ready(id).unwrap();
            }
        }
        assert!(session.is_ready());
        assert_eq!(session.frame(16.0, &mut surface), 1);
        assert!(!surface.commands.is_empty());
    }

    #[test]
    fn test_key_repeat_dispatches_once() {
        let mut session = session();
        for id in session.assets().pending().collect::<Vec<_>>() {
            session.assets_mut().mark_ready(id).unwrap();
        }

        session.key_down("Space");
        assert_eq!(session.game().phase(), Phase::Playing);

        // Auto-repeat must not toggle anything
        session.key_down("KeyP");
        session.key_down("KeyP");
        session.key_down("KeyP");
        assert_eq!(session.game().phase(), Phase::Paused);

        session.key_up("KeyP");
        session.key_down("KeyP");
        assert_eq!(session.game().phase(), Phase::Playing);
    }

    #[test]
    fn test_held_keys_reach_the_tick() {
        let mut session = session();
        for id in session.assets().pending().collect::<Vec<_>>() {
            session.assets_mut().mark_ready(id).unwrap();
        }
        let start = session.game().world.paddle.body.pos.x;
        session.key_down("ArrowRight");
        session.tick();
        session.tick();
        assert_eq!(session.game().world.paddle.body.pos.x, start + 10.0);

        session.release_all();
        session.tick();
        assert_eq!(session.game().world.paddle.body.pos.x, start + 10.0);
        assert_eq!(session.ticks(), 3);
    }

    #[test]
    fn test_stopped_driver_runs_nothing() {
        let mut driver = LoopDriver::new(TickSource::AnimationFrame, 4);
        let handle = driver.handle();
        handle.stop();
        assert!(!driver.is_running());
        assert_eq!(driver.ticks_due(16.0), 0);
    }
}

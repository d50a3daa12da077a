//! Pocket Arcade entry point
//!
//! On the web the page's `data-app` attribute picks what to run. Natively
//! the binary plays a game headless with its autopilot and logs the outcome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(err) = pocket_arcade::platform::web::run().await {
        log::error!("Startup failed: {:?}", err);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;

    use pocket_arcade::audio::{AudioMixer, NullAudio};
    use pocket_arcade::games::{BrickBreaker, ClassicSnake, DiscoJump, SpaceInvaders, TwoPlayerSnake};
    use pocket_arcade::renderer::RecordingSurface;
    use pocket_arcade::sim::{Game, Phase};
    use pocket_arcade::{ArcadeError, Autopilot, GameKind, Session, Settings, TickSource};

    /// Play an arcade game headless with its autopilot
    #[derive(Parser)]
    #[command(author, version, about, long_about = None)]
    pub struct Args {
        /// Game to run (brick-breaker, space-invaders, snake, two-player-snake, disco-jump)
        #[arg(default_value = "brick-breaker")]
        game: GameKind,

        /// Ticks to simulate
        #[arg(short, long, default_value_t = 3600)]
        ticks: u64,

        /// RNG seed (overrides the settings file)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Settings JSON file
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    }

    impl Args {
        pub fn verbose(&self) -> bool {
            self.verbose
        }
    }

    fn load_settings(args: &Args) -> Result<Settings, ArcadeError> {
        let mut settings = match &args.settings {
            Some(path) => Settings::from_json(&std::fs::read_to_string(path)?)?,
            None => Settings::default(),
        };
        if let Some(seed) = args.seed {
            settings.seed = seed;
        }
        Ok(settings)
    }

    pub fn run(args: &Args) -> Result<(), ArcadeError> {
        let settings = load_settings(args)?;
        let kind = args.game;
        settings.validate_players(kind.players())?;
        log::info!("Pocket Arcade (headless) - {} for {} ticks, seed {}", kind, args.ticks, settings.seed);

        match kind {
            GameKind::BrickBreaker => play(BrickBreaker::new(), kind, &settings, args.ticks),
            GameKind::SpaceInvaders => play(SpaceInvaders::new(settings.seed), kind, &settings, args.ticks),
            GameKind::Snake => play(ClassicSnake::new(settings.seed), kind, &settings, args.ticks),
            GameKind::TwoPlayerSnake => play(TwoPlayerSnake::new(settings.seed), kind, &settings, args.ticks),
            GameKind::DiscoJump => play(DiscoJump::new(settings.seed), kind, &settings, args.ticks),
        }
        Ok(())
    }

    fn play<G: Game + Autopilot>(game: G, kind: GameKind, settings: &Settings, ticks: u64) {
        let mut audio = AudioMixer::new(Box::new(NullAudio));
        settings.configure_audio(&mut audio);
        let mut session = Session::preloaded(game, kind.bindings(), audio, settings);
        let mut surface = RecordingSurface::new();

        let mut games_over = 0;
        let mut best = 0;
        for tick in 0..ticks {
            let pilot = session.game().pilot(tick);
            for control in pilot.press {
                session.press(control);
            }
            let was_over = session.game().phase() == Phase::Over;
            session.tick_with(&pilot.held);

            let game = session.game();
            best = best.max(game.score());
            if game.phase() == Phase::Over && !was_over {
                games_over += 1;
            }

            if tick % 600 == 0 {
                surface.reset();
                session.render(&mut surface);
                log::debug!("tick {}: {:?} {:?}", tick, game.phase(), surface.texts());
            }
        }

        let period_ms = match session.game().tick_source() {
            TickSource::AnimationFrame => 1000.0 / 60.0,
            TickSource::FixedInterval { period_ms } => f64::from(period_ms),
        };
        surface.reset();
        session.render(&mut surface);
        log::info!(
            "{}: {} ticks (~{:.1}s of play), score {}, best {}, {} game(s) over, {} draw calls in last frame",
            session.game().title(),
            session.ticks(),
            session.ticks() as f64 * period_ms / 1000.0,
            session.game().score(),
            best,
            games_over,
            surface.commands.len()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use clap::Parser;

    let args = headless::Args::parse();
    pocket_arcade::platform::init_logging(args.verbose());

    match headless::run(&args) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            std::process::ExitCode::FAILURE
        }
    }
}

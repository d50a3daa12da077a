//! Pocket Arcade - small browser arcade games on a shared update/render loop
//!
//! Core modules:
//! - `sim`: Per-tick building blocks (entities, collisions, input, phases)
//! - `games`: Brick breaker, invaders, snake (one and two player), Disco
//!   Jump, Lights Out and What The Hex
//! - `driver`: Sessions and the tick scheduling that runs them
//! - `renderer`: The drawing contract games render through
//! - `assets` / `audio`: Asset bookkeeping and sound playback
//! - `tools`: Base converter and source viewer page utilities
//! - `platform`: Browser wiring and native logging

pub mod assets;
pub mod audio;
pub mod autopilot;
pub mod driver;
pub mod error;
pub mod games;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tools;

pub use autopilot::{Autopilot, Pilot};
pub use driver::{LoopHandle, Session, TickSource};
pub use error::ArcadeError;
pub use games::GameKind;
pub use settings::Settings;

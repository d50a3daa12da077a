//! Shared simulation building blocks
//!
//! Everything a game's update step needs and nothing it must not touch:
//! - Fixed per-tick steps only, no wall-clock time
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod game;
pub mod input;
pub mod phase;

pub use collision::{Edge, Field, Walls, overlaps, touches};
pub use entity::{Body, Entity, EntityKind, HitCount, Rect, Strike};
pub use game::{Game, GameEvent};
pub use input::{Action, Control, Controls, InputLatch, KeyBindings};
pub use phase::Phase;

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Session RNG from a seed
pub fn seeded_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

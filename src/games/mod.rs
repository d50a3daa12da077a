//! The games
//!
//! Loop-driven games implement [`Game`] and run inside a
//! [`Session`](crate::driver::Session). Lights Out and What The Hex are
//! event driven and are called straight from input handlers.

pub mod brick_breaker;
pub mod disco_jump;
pub mod hex_guess;
pub mod lights_out;
pub mod snake;
pub mod space_invaders;

use std::fmt;
use std::str::FromStr;

use crate::error::ArcadeError;
use crate::sim::{Game, KeyBindings};

pub use brick_breaker::BrickBreaker;
pub use disco_jump::DiscoJump;
pub use hex_guess::HexGuess;
pub use lights_out::LightsOut;
pub use snake::{ClassicSnake, TwoPlayerSnake};
pub use space_invaders::SpaceInvaders;

/// Loop-driven games by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKind {
    BrickBreaker,
    SpaceInvaders,
    Snake,
    TwoPlayerSnake,
    DiscoJump,
}

impl GameKind {
    pub const ALL: [GameKind; 5] = [
        GameKind::BrickBreaker,
        GameKind::SpaceInvaders,
        GameKind::Snake,
        GameKind::TwoPlayerSnake,
        GameKind::DiscoJump,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GameKind::BrickBreaker => "brick-breaker",
            GameKind::SpaceInvaders => "space-invaders",
            GameKind::Snake => "snake",
            GameKind::TwoPlayerSnake => "two-player-snake",
            GameKind::DiscoJump => "disco-jump",
        }
    }

    pub fn players(self) -> u8 {
        match self {
            GameKind::TwoPlayerSnake => snake::two_player::PLAYERS,
            _ => 1,
        }
    }

    /// Default key bindings
    pub fn bindings(self) -> KeyBindings {
        match self {
            GameKind::BrickBreaker => KeyBindings::arrows().with_wasd(0),
            GameKind::TwoPlayerSnake => snake::two_player::bindings(),
            _ => KeyBindings::arrows(),
        }
    }

    pub fn build(self, seed: u64) -> Box<dyn Game> {
        match self {
            GameKind::BrickBreaker => Box::new(BrickBreaker::new()),
            GameKind::SpaceInvaders => Box::new(SpaceInvaders::new(seed)),
            GameKind::Snake => Box::new(ClassicSnake::new(seed)),
            GameKind::TwoPlayerSnake => Box::new(TwoPlayerSnake::new(seed)),
            GameKind::DiscoJump => Box::new(DiscoJump::new(seed)),
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameKind {
    type Err = ArcadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ArcadeError::UnknownGame(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in GameKind::ALL {
            assert_eq!(kind.name().parse::<GameKind>().unwrap(), kind);
        }
        assert!(matches!(
            "pong".parse::<GameKind>(),
            Err(ArcadeError::UnknownGame(_))
        ));
    }

    #[test]
    fn test_built_games_start_unstarted() {
        for kind in GameKind::ALL {
            let game = kind.build(1);
            assert_eq!(game.phase(), crate::sim::Phase::NotStarted);
            assert_eq!(game.score(), 0);
        }
    }

    #[test]
    fn test_default_bindings_fit_player_count() {
        for kind in GameKind::ALL {
            assert!(kind.bindings().iter().all(|(_, c)| c.player < kind.players()));
        }
    }
}

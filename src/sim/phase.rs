//! Coarse session phase and its allowed transitions
//!
//! ```text
//! NotStarted --start--> Playing
//! Playing --pause--> Paused --resume--> Playing
//! Playing --life lost / level cleared--> NotStarted (awaiting serve)
//! any --terminal condition--> Over
//! Over --restart--> NotStarted (the game rebuilds its world)
//! ```
//!
//! Each transition method returns whether the phase changed, so callers can
//! ignore actions that do not apply to the current phase.

use serde::{Deserialize, Serialize};

/// Current phase of a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for a start/serve action
    #[default]
    NotStarted,
    /// Active gameplay
    Playing,
    /// Frozen until resumed
    Paused,
    /// Session ended; only a restart leaves this phase
    Over,
}

impl Phase {
    fn go(&mut self, next: Phase) -> bool {
        log::debug!("Phase {:?} -> {:?}", self, next);
        *self = next;
        true
    }

    /// NotStarted -> Playing
    pub fn start(&mut self) -> bool {
        match self {
            Phase::NotStarted => self.go(Phase::Playing),
            _ => false,
        }
    }

    /// Playing -> Paused, Paused -> Playing
    pub fn toggle_pause(&mut self) -> bool {
        match self {
            Phase::Playing => self.go(Phase::Paused),
            Phase::Paused => self.go(Phase::Playing),
            _ => false,
        }
    }

    /// Paused -> Playing
    pub fn resume(&mut self) -> bool {
        match self {
            Phase::Paused => self.go(Phase::Playing),
            _ => false,
        }
    }

    /// Playing -> NotStarted, after a lost life or a cleared level
    pub fn await_serve(&mut self) -> bool {
        match self {
            Phase::Playing => self.go(Phase::NotStarted),
            _ => false,
        }
    }

    /// Any phase -> Over
    pub fn end(&mut self) -> bool {
        match self {
            Phase::Over => false,
            _ => self.go(Phase::Over),
        }
    }

    /// Over -> NotStarted
    pub fn restart(&mut self) -> bool {
        match self {
            Phase::Over => self.go(Phase::NotStarted),
            _ => false,
        }
    }

    pub fn is_playing(&self) -> bool {
        *self == Phase::Playing
    }
}

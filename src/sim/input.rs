//! Input latch: raw key events in, consistent control snapshots out
//!
//! Key events arrive whenever the platform delivers them. The latch records
//! which keys are down; the update step reads a [`Controls`] snapshot once
//! per tick. Discrete actions (serve, fire, pause, restart) are dispatched
//! by the session once per physical press, see [`InputLatch::key_down`].

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Logical action, independent of the physical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    /// Serve / start / fire
    Fire,
    Pause,
}

/// An action performed by a specific player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Control {
    pub player: u8,
    pub action: Action,
}

impl Control {
    pub const fn new(player: u8, action: Action) -> Self {
        Self { player, action }
    }

    pub const fn p1(action: Action) -> Self {
        Self::new(0, action)
    }
}

/// Maps key identifiers (`KeyboardEvent.code` values) to controls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    map: BTreeMap<String, Control>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, key: &str, control: Control) -> Self {
        self.map.insert(key.to_owned(), control);
        self
    }

    pub fn set(&mut self, key: &str, control: Control) {
        self.map.insert(key.to_owned(), control);
    }

    pub fn resolve(&self, key: &str) -> Option<Control> {
        self.map.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Control)> {
        self.map.iter().map(|(k, c)| (k.as_str(), *c))
    }

    /// Arrow keys for player one, Space to serve/fire, P to pause
    pub fn arrows() -> Self {
        Self::new()
            .bind("ArrowLeft", Control::p1(Action::Left))
            .bind("ArrowRight", Control::p1(Action::Right))
            .bind("ArrowUp", Control::p1(Action::Up))
            .bind("ArrowDown", Control::p1(Action::Down))
            .bind("Space", Control::p1(Action::Fire))
            .bind("KeyP", Control::p1(Action::Pause))
    }

    /// Add WASD movement for the given player
    pub fn with_wasd(self, player: u8) -> Self {
        self.bind("KeyA", Control::new(player, Action::Left))
            .bind("KeyD", Control::new(player, Action::Right))
            .bind("KeyW", Control::new(player, Action::Up))
            .bind("KeyS", Control::new(player, Action::Down))
    }
}

/// Snapshot of held controls, read by one update step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Controls {
    held: HashSet<Control>,
}

impl Controls {
    pub fn is_held(&self, control: Control) -> bool {
        self.held.contains(&control)
    }

    pub fn held(&self, player: u8, action: Action) -> bool {
        self.is_held(Control::new(player, action))
    }

    /// Build a snapshot directly (tests, autopilot)
    pub fn from_held(held: impl IntoIterator<Item = Control>) -> Self {
        Self {
            held: held.into_iter().collect(),
        }
    }
}

/// Keys currently down and the controls they map to
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    down: HashMap<String, Option<Control>>,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns `true` for a fresh press and `false` for
    /// an auto-repeat of a key that is already down.
    pub fn key_down(&mut self, key: &str, control: Option<Control>) -> bool {
        self.down.insert(key.to_owned(), control).is_none()
    }

    pub fn key_up(&mut self, key: &str) {
        self.down.remove(key);
    }

    /// Release everything (focus loss, reset)
    pub fn clear(&mut self) {
        self.down.clear();
    }

    /// Controls held right now; two keys bound to the same control keep it
    /// held until both are released
    pub fn snapshot(&self) -> Controls {
        Controls {
            held: self.down.values().flatten().copied().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_sensitive_hold_and_release() {
        let bindings = KeyBindings::arrows();
        let mut latch = InputLatch::new();

        latch.key_down("ArrowLeft", bindings.resolve("ArrowLeft"));
        assert!(latch.snapshot().held(0, Action::Left));

        latch.key_up("ArrowLeft");
        assert!(!latch.snapshot().held(0, Action::Left));
    }

    #[test]
    fn test_repeat_is_not_a_fresh_press() {
        let mut latch = InputLatch::new();
        assert!(latch.key_down("Space", Some(Control::p1(Action::Fire))));
        assert!(!latch.key_down("Space", Some(Control::p1(Action::Fire))));
        latch.key_up("Space");
        assert!(latch.key_down("Space", Some(Control::p1(Action::Fire))));
    }

    #[test]
    fn test_shared_control_held_until_both_released() {
        let bindings = KeyBindings::arrows().with_wasd(0);
        let mut latch = InputLatch::new();
        latch.key_down("ArrowLeft", bindings.resolve("ArrowLeft"));
        latch.key_down("KeyA", bindings.resolve("KeyA"));
        latch.key_up("ArrowLeft");
        assert!(latch.snapshot().held(0, Action::Left));
        latch.key_up("KeyA");
        assert!(!latch.snapshot().held(0, Action::Left));
    }

    #[test]
    fn test_two_player_schemes_do_not_collide() {
        let bindings = KeyBindings::arrows().with_wasd(1);
        assert_eq!(bindings.resolve("ArrowUp"), Some(Control::new(0, Action::Up)));
        assert_eq!(bindings.resolve("KeyW"), Some(Control::new(1, Action::Up)));
        assert_eq!(bindings.resolve("KeyQ"), None);
    }

    #[test]
    fn test_snapshot_is_detached_from_latch() {
        let mut latch = InputLatch::new();
        latch.key_down("ArrowRight", Some(Control::p1(Action::Right)));
        let snapshot = latch.snapshot();
        latch.key_up("ArrowRight");
        assert!(snapshot.held(0, Action::Right));
    }
}

//! Movable rectangles and their optional capabilities
//!
//! Every game object is a rectangle with a velocity. Capabilities that only
//! some objects need (a hit counter, a sprite) are optional fields rather
//! than one struct with every variant's fields bolted on.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::assets::AssetId;

/// Axis-aligned rectangle, `pos` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Position, fixed size and velocity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    size: Vec2,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            size: Vec2::new(w, h),
        }
    }

    pub fn with_velocity(mut self, dx: f32, dy: f32) -> Self {
        self.vel = Vec2::new(dx, dy);
        self
    }

    /// Size never changes after creation
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Advance position by one tick of velocity
    #[inline]
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    /// Center this body horizontally on `other`, top edges aligned
    pub fn dock_on(&mut self, other: &Body) {
        self.pos.x = other.pos.x + other.size.x / 2.0 - self.size.x / 2.0;
        self.pos.y = other.pos.y;
    }
}

/// Remaining hits before a multi-hit obstacle breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitCount(u32);

/// Outcome of striking something with a hit counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strike {
    /// Still standing with this many hits left
    Damaged(u32),
    /// Counter went from 1 to 0; remove the entity
    Destroyed,
}

impl HitCount {
    /// `None` for zero, a hit counter always starts positive
    pub fn new(hits: u32) -> Option<Self> {
        (hits > 0).then_some(Self(hits))
    }

    pub fn remaining(&self) -> u32 {
        self.0
    }

    pub fn strike(&mut self) -> Strike {
        self.0 = self.0.saturating_sub(1);
        if self.0 == 0 {
            Strike::Destroyed
        } else {
            Strike::Damaged(self.0)
        }
    }
}

/// Role tag for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Ball,
    Paddle,
    Brick,
    Ship,
    Alien,
    Laser,
    AlienLaser,
    Bonus,
}

/// A game object: a body plus whichever capabilities its role needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub body: Body,
    pub hits: Option<HitCount>,
    /// Visual handle owned by the platform
    pub sprite: Option<AssetId>,
}

impl Entity {
    pub fn new(kind: EntityKind, body: Body) -> Self {
        Self {
            kind,
            body,
            hits: None,
            sprite: None,
        }
    }

    pub fn with_hits(mut self, hits: u32) -> Self {
        self.hits = HitCount::new(hits);
        self
    }

    pub fn with_sprite(mut self, sprite: AssetId) -> Self {
        self.sprite = Some(sprite);
        self
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn is_moving(&self) -> bool {
        self.body.vel != Vec2::ZERO
    }

    /// Strike the entity; entities without a hit counter are unaffected
    pub fn strike(&mut self) -> Option<Strike> {
        self.hits.as_mut().map(HitCount::strike)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hit_count_rejects_zero() {
        assert!(HitCount::new(0).is_none());
        assert_eq!(HitCount::new(3).map(|h| h.remaining()), Some(3));
    }

    #[test]
    fn test_strike_destroys_on_last_hit() {
        let mut brick = Entity::new(EntityKind::Brick, Body::new(0.0, 0.0, 100.0, 20.0)).with_hits(2);
        assert_eq!(brick.strike(), Some(Strike::Damaged(1)));
        assert_eq!(brick.strike(), Some(Strike::Destroyed));
    }

    #[test]
    fn test_strike_without_counter() {
        let mut ball = Entity::new(EntityKind::Ball, Body::new(0.0, 0.0, 30.0, 30.0));
        assert_eq!(ball.strike(), None);
    }

    #[test]
    fn test_dock_centers_horizontally() {
        let ship = Body::new(350.0, 545.0, 100.0, 35.0);
        let mut laser = Body::new(0.0, 0.0, 5.0, 15.0);
        laser.dock_on(&ship);
        assert_eq!(laser.pos, Vec2::new(397.5, 545.0));
    }

    proptest! {
        #[test]
        fn prop_destroyed_exactly_once(start in 1u32..20) {
            let mut hits = HitCount::new(start).unwrap();
            let mut destroyed_at = None;
            for n in 1..=start {
                if hits.strike() == Strike::Destroyed {
                    destroyed_at = Some(n);
                    break;
                }
            }
            prop_assert_eq!(destroyed_at, Some(start));
            prop_assert_eq!(hits.remaining(), 0);
        }

        #[test]
        fn prop_integrate_keeps_size(dx in -10.0f32..10.0, dy in -10.0f32..10.0, ticks in 0usize..50) {
            let mut body = Body::new(10.0, 10.0, 30.0, 30.0).with_velocity(dx, dy);
            for _ in 0..ticks {
                body.integrate();
            }
            prop_assert_eq!(body.size(), Vec2::new(30.0, 30.0));
        }
    }
}

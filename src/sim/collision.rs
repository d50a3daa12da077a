//! Collision detection and boundary handling for axis-aligned rectangles
//!
//! Discrete overlap tests only: no swept or continuous collision, so a fast
//! body can tunnel through a thin obstacle.

use serde::{Deserialize, Serialize};

use super::entity::{Body, Rect};

/// Strict overlap: rectangles that only share an edge do not collide
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && b.left() < a.right() && a.top() < b.bottom() && b.top() < a.bottom()
}

/// Inclusive overlap: rectangles sharing an edge count as touching
#[inline]
pub fn touches(a: &Rect, b: &Rect) -> bool {
    !(b.left() > a.right() || b.right() < a.left() || b.top() > a.bottom() || b.bottom() < a.top())
}

/// Playfield extents, origin at the top-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

/// One side of the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Which edges a body bounces off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walls {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Walls {
    /// Ball pattern: bounce off the sides and the ceiling, bottom is open
    pub const SIDES_AND_TOP: Self = Self {
        left: true,
        right: true,
        top: true,
        bottom: false,
    };
}

impl Field {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Reflect off the enabled walls and clamp back inside.
    ///
    /// Returns the edge that was hit, if any. The reflected component is
    /// forced to point away from the wall so a body resting on the edge
    /// cannot oscillate.
    pub fn bounce(&self, body: &mut Body, walls: Walls) -> Option<Edge> {
        let size = body.size();
        let mut hit = None;

        if walls.left && body.pos.x <= 0.0 {
            body.pos.x = 0.0;
            body.vel.x = body.vel.x.abs();
            hit = Some(Edge::Left);
        } else if walls.right && body.pos.x + size.x >= self.width {
            body.pos.x = self.width - size.x;
            body.vel.x = -body.vel.x.abs();
            hit = Some(Edge::Right);
        }

        if walls.top && body.pos.y <= 0.0 {
            body.pos.y = 0.0;
            body.vel.y = body.vel.y.abs();
            hit = hit.or(Some(Edge::Top));
        } else if walls.bottom && body.pos.y + size.y >= self.height {
            body.pos.y = self.height - size.y;
            body.vel.y = -body.vel.y.abs();
            hit = hit.or(Some(Edge::Bottom));
        }

        hit
    }

    /// Terminal test: the rectangle reached or passed the given edge
    pub fn reached(&self, rect: &Rect, edge: Edge) -> bool {
        match edge {
            Edge::Left => rect.left() <= 0.0,
            Edge::Right => rect.right() >= self.width,
            Edge::Top => rect.top() <= 0.0,
            Edge::Bottom => rect.bottom() >= self.height,
        }
    }

    /// Despawn test: the rectangle is entirely outside the field
    pub fn is_outside(&self, rect: &Rect) -> bool {
        rect.right() < 0.0 || rect.left() > self.width || rect.bottom() < 0.0 || rect.top() > self.height
    }

    /// Keep a body horizontally inside the field
    pub fn clamp_x(&self, body: &mut Body) {
        let max_x = self.width - body.size().x;
        body.pos.x = body.pos.x.clamp(0.0, max_x.max(0.0));
    }

    /// Wrap a coordinate that left one side around to the other
    pub fn wrap_x(&self, x: f32) -> f32 {
        if x > self.width {
            0.0
        } else if x < 0.0 {
            self.width
        } else {
            x
        }
    }
}

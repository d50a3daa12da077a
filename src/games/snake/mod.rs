//! Grid snake games
//!
//! Shared pieces for [`classic`] (one snake) and [`two_player`] (two snakes,
//! shared score, spoiled food). Both tick on a fixed 100 ms interval.

pub mod classic;
pub mod two_player;

pub use classic::ClassicSnake;
pub use two_player::TwoPlayerSnake;

use std::collections::VecDeque;

use rand::Rng;
use rand_pcg::Pcg32;

use crate::driver::TickSource;
use crate::renderer::{Color, Surface};
use crate::sim::{Action, Rect};

/// Game configuration constants
pub mod consts {
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    /// Pixel size of one grid cell
    pub const CELL_PX: f32 = 25.0;
    pub const COLUMNS: i32 = 32;
    pub const ROWS: i32 = 24;
    pub const TICK_MS: u32 = 100;
}

use consts::*;

pub const TICK_SOURCE: TickSource = TickSource::FixedInterval { period_ms: TICK_MS };

/// Grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn in_bounds(self) -> bool {
        (0..COLUMNS).contains(&self.x) && (0..ROWS).contains(&self.y)
    }

    pub fn rect(self) -> Rect {
        Rect::new(self.x as f32 * CELL_PX, self.y as f32 * CELL_PX, CELL_PX, CELL_PX)
    }

    pub fn random(rng: &mut Pcg32) -> Self {
        Self::new(rng.random_range(0..COLUMNS), rng.random_range(0..ROWS))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    pub fn is_perpendicular(self, other: Direction) -> bool {
        self.is_vertical() != other.is_vertical()
    }

    pub fn from_action(action: Action) -> Option<Self> {
        match action {
            Action::Up => Some(Direction::Up),
            Action::Down => Some(Direction::Down),
            Action::Left => Some(Direction::Left),
            Action::Right => Some(Direction::Right),
            Action::Fire | Action::Pause => None,
        }
    }
}

/// A snake: head first, plus the turn queued for the next step
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Cell>,
    heading: Direction,
    next: Direction,
    pending_growth: u32,
    pub color: Color,
}

impl Snake {
    pub fn new(head: Cell, heading: Direction, color: Color) -> Self {
        Self {
            body: VecDeque::from([head]),
            heading,
            next: heading,
            pending_growth: 0,
            color,
        }
    }

    pub fn head(&self) -> Cell {
        // The body always holds at least the head
        self.body.front().copied().unwrap_or(Cell::new(-1, -1))
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Queue a turn. Only turns perpendicular to the current heading are
    /// accepted, so the snake can never reverse into its own neck.
    pub fn steer(&mut self, dir: Direction) -> bool {
        if dir.is_perpendicular(self.heading) {
            self.next = dir;
            true
        } else {
            false
        }
    }

    /// Move one cell; the tail stays put while growth is pending
    pub fn advance(&mut self) {
        self.heading = self.next;
        let head = self.head().step(self.heading);
        self.body.push_front(head);
        if self.pending_growth > 0 {
            self.pending_growth -= 1;
        } else {
            self.body.pop_back();
        }
    }

    /// Grow by one segment on the next advance
    pub fn grow(&mut self) {
        self.pending_growth += 1;
    }

    pub fn hits_self(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|&cell| cell == head)
    }

    pub fn hits_wall(&self) -> bool {
        !self.head().in_bounds()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        for cell in &self.body {
            surface.fill_rect(cell.rect(), self.color);
        }
    }
}

/// A food cell worth `value` points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Food {
    pub cell: Cell,
    pub value: i64,
    pub color: Color,
}

impl Food {
    /// Food on a random cell no snake occupies
    pub fn spawn(value: i64, color: Color, snakes: &[&Snake], rng: &mut Pcg32) -> Self {
        let free: Vec<Cell> = (0..ROWS)
            .flat_map(|y| (0..COLUMNS).map(move |x| Cell::new(x, y)))
            .filter(|&cell| !snakes.iter().any(|s| s.occupies(cell)))
            .collect();
        let cell = if free.is_empty() {
            Cell::random(rng)
        } else {
            free[rng.random_range(0..free.len())]
        };
        Self { cell, value, color }
    }

    /// Jump to any random cell
    pub fn respawn(&mut self, rng: &mut Pcg32) {
        self.cell = Cell::random(rng);
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_rect(self.cell.rect(), self.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::colors;

    #[test]
    fn test_only_perpendicular_turns() {
        let mut snake = Snake::new(Cell::new(5, 5), Direction::Up, colors::SNAKE_GREEN);
        assert!(!snake.steer(Direction::Down));
        assert!(!snake.steer(Direction::Up));
        assert!(snake.steer(Direction::Left));

        // Heading is still Up until the next advance, so Right is accepted too
        assert!(snake.steer(Direction::Right));
        snake.advance();
        assert_eq!(snake.head(), Cell::new(6, 5));
        assert!(!snake.steer(Direction::Left));
    }

    #[test]
    fn test_growth_keeps_tail() {
        let mut snake = Snake::new(Cell::new(5, 5), Direction::Right, colors::SNAKE_GREEN);
        snake.grow();
        snake.advance();
        assert_eq!(snake.len(), 2);
        snake.advance();
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.cells().collect::<Vec<_>>(), vec![Cell::new(7, 5), Cell::new(6, 5)]);
    }

    #[test]
    fn test_self_collision() {
        let mut snake = Snake::new(Cell::new(5, 5), Direction::Right, colors::SNAKE_GREEN);
        for _ in 0..4 {
            snake.grow();
            snake.advance();
        }
        assert!(!snake.hits_self());
        for dir in [Direction::Down, Direction::Left, Direction::Up] {
            snake.steer(dir);
            snake.advance();
        }
        assert!(snake.hits_self());
    }

    #[test]
    fn test_wall_detection() {
        let mut snake = Snake::new(Cell::new(0, 0), Direction::Up, colors::SNAKE_GREEN);
        assert!(!snake.hits_wall());
        snake.advance();
        assert!(snake.hits_wall());
    }

    #[test]
    fn test_spawn_avoids_snakes() {
        let snake = Snake::new(Cell::new(3, 3), Direction::Up, colors::SNAKE_GREEN);
        let mut rng = crate::sim::seeded_rng(9);
        for _ in 0..200 {
            let food = Food::spawn(1, colors::FOOD_RED, &[&snake], &mut rng);
            assert_ne!(food.cell, Cell::new(3, 3));
            assert!(food.cell.in_bounds());
        }
    }
}

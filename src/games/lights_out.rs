//! Lights Out
//!
//! 5x5 grid of lights. Pressing a light toggles it and its four orthogonal
//! neighbours; the puzzle is solved when every light is off. There is no
//! loop: the state only changes in response to clicks and difficulty
//! choices.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::renderer::{Align, Surface, TextStyle, colors};
use crate::sim::{Rect, seeded_rng};

pub const SIZE: usize = 5;

/// Screen layout
pub mod layout {
    pub const CELL_PX: f32 = 80.0;
    pub const GAP_PX: f32 = 4.0;
    pub const BOARD_TOP: f32 = 60.0;
    pub const WIDTH: f32 = super::SIZE as f32 * CELL_PX;
    pub const HEIGHT: f32 = BOARD_TOP + WIDTH;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Random presses used to scramble a solved board
    pub fn scramble_moves(self) -> usize {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Medium => 5,
            Difficulty::Hard => 7,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// The lights, `true` is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    lights: [[bool; SIZE]; SIZE],
}

impl Board {
    pub fn is_on(&self, row: usize, col: usize) -> bool {
        self.lights[row][col]
    }

    /// Toggle a light and its in-bounds orthogonal neighbours
    pub fn press(&mut self, row: usize, col: usize) {
        if row >= SIZE || col >= SIZE {
            return;
        }
        self.flip(row, col);
        if row > 0 {
            self.flip(row - 1, col);
        }
        if row + 1 < SIZE {
            self.flip(row + 1, col);
        }
        if col > 0 {
            self.flip(row, col - 1);
        }
        if col + 1 < SIZE {
            self.flip(row, col + 1);
        }
    }

    fn flip(&mut self, row: usize, col: usize) {
        self.lights[row][col] = !self.lights[row][col];
    }

    pub fn is_solved(&self) -> bool {
        self.lights.iter().flatten().all(|on| !on)
    }

    pub fn lit(&self) -> usize {
        self.lights.iter().flatten().filter(|on| **on).count()
    }

    fn press_random(&mut self, rng: &mut Pcg32) {
        self.press(rng.random_range(0..SIZE), rng.random_range(0..SIZE));
    }
}

/// What a click did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    /// No difficulty yet, already won, or outside the board
    Ignored,
    Moved,
    Won,
}

#[derive(Debug)]
pub struct LightsOut {
    pub board: Board,
    pub difficulty: Option<Difficulty>,
    pub attempts: u32,
    rng: Pcg32,
}

impl LightsOut {
    pub fn new(seed: u64) -> Self {
        Self {
            board: Board::default(),
            difficulty: None,
            attempts: 0,
            rng: seeded_rng(seed),
        }
    }

    /// Clear, scramble with the difficulty's number of random presses and
    /// reset the attempt counter. A scramble that happens to solve the
    /// board gets one more random press.
    pub fn choose(&mut self, difficulty: Difficulty) {
        self.difficulty = Some(difficulty);
        self.board = Board::default();
        for _ in 0..difficulty.scramble_moves() {
            self.board.press_random(&mut self.rng);
        }
        if self.board.is_solved() {
            self.board.press_random(&mut self.rng);
        }
        self.attempts = 0;
        log::info!("Lights Out: {} board with {} lit", difficulty.name(), self.board.lit());
    }

    pub fn is_won(&self) -> bool {
        self.difficulty.is_some() && self.board.is_solved()
    }

    pub fn click(&mut self, row: usize, col: usize) -> Click {
        if self.difficulty.is_none() || self.board.is_solved() || row >= SIZE || col >= SIZE {
            return Click::Ignored;
        }
        log::debug!("move @ ({}, {})", row, col);
        self.board.press(row, col);
        self.attempts += 1;
        if self.board.is_solved() {
            log::info!("Lights Out solved in {} attempts", self.attempts);
            Click::Won
        } else {
            Click::Moved
        }
    }

    /// Status line under the board
    pub fn label(&self) -> String {
        match self.difficulty {
            None => String::new(),
            Some(_) if self.is_won() => format!("Winner! Attempts: {}", self.attempts),
            Some(difficulty) if self.attempts == 0 => format!("Difficulty: {}", difficulty.name()),
            Some(_) => format!("Attempts: {}", self.attempts),
        }
    }

    /// Board cell under a point on the canvas
    pub fn cell_at(point: Vec2) -> Option<(usize, usize)> {
        let y = point.y - layout::BOARD_TOP;
        if point.x < 0.0 || y < 0.0 {
            return None;
        }
        let col = (point.x / layout::CELL_PX) as usize;
        let row = (y / layout::CELL_PX) as usize;
        (row < SIZE && col < SIZE).then_some((row, col))
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        surface.clear(colors::PANEL);
        for row in 0..SIZE {
            for col in 0..SIZE {
                let color = if self.board.is_on(row, col) {
                    colors::LIGHT_ON
                } else {
                    colors::LIGHT_OFF
                };
                let rect = Rect::new(
                    col as f32 * layout::CELL_PX + layout::GAP_PX,
                    layout::BOARD_TOP + row as f32 * layout::CELL_PX + layout::GAP_PX,
                    layout::CELL_PX - 2.0 * layout::GAP_PX,
                    layout::CELL_PX - 2.0 * layout::GAP_PX,
                );
                surface.fill_rect(rect, color);
            }
        }

        let style = TextStyle::new(24.0, Align::Center, colors::WHITE);
        let label = match self.difficulty {
            None => "Choose a difficulty: 1 Easy, 2 Medium, 3 Hard".to_owned(),
            Some(_) => self.label(),
        };
        surface.draw_text(&label, Vec2::new(layout::WIDTH / 2.0, 36.0), style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingSurface;
    use proptest::prelude::*;

    #[test]
    fn test_corner_press_toggles_three() {
        let mut board = Board::default();
        board.press(0, 0);
        assert_eq!(board.lit(), 3);
        assert!(board.is_on(0, 0) && board.is_on(0, 1) && board.is_on(1, 0));
    }

    #[test]
    fn test_center_press_toggles_five() {
        let mut board = Board::default();
        board.press(2, 2);
        assert_eq!(board.lit(), 5);
    }

    #[test]
    fn test_clicks_ignored_without_difficulty() {
        let mut game = LightsOut::new(1);
        assert_eq!(game.click(2, 2), Click::Ignored);
        assert_eq!(game.attempts, 0);
        assert!(game.board.is_solved());
    }

    #[test]
    fn test_scrambled_board_is_never_solved() {
        for seed in 0..50 {
            let mut game = LightsOut::new(seed);
            for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
                game.choose(difficulty);
                assert!(!game.board.is_solved());
                assert_eq!(game.label(), format!("Difficulty: {}", difficulty.name()));
            }
        }
    }

    #[test]
    fn test_winning_locks_the_board() {
        let mut game = LightsOut::new(2);
        game.difficulty = Some(Difficulty::Easy);
        game.board.press(1, 1);

        assert_eq!(game.click(0, 0), Click::Moved);
        assert_eq!(game.label(), "Attempts: 1");
        game.click(0, 0);
        assert_eq!(game.click(1, 1), Click::Won);
        assert_eq!(game.label(), "Winner! Attempts: 3");

        assert_eq!(game.click(3, 3), Click::Ignored);
        assert_eq!(game.attempts, 3);
    }

    #[test]
    fn test_choosing_again_resets_attempts() {
        let mut game = LightsOut::new(3);
        game.choose(Difficulty::Hard);
        game.click(0, 0);
        game.choose(Difficulty::Easy);
        assert_eq!(game.attempts, 0);
        assert_eq!(game.difficulty, Some(Difficulty::Easy));
    }

    #[test]
    fn test_cell_hit_testing() {
        assert_eq!(LightsOut::cell_at(Vec2::new(10.0, 70.0)), Some((0, 0)));
        assert_eq!(LightsOut::cell_at(Vec2::new(399.0, 459.0)), Some((4, 4)));
        assert_eq!(LightsOut::cell_at(Vec2::new(10.0, 20.0)), None);
        assert_eq!(LightsOut::cell_at(Vec2::new(401.0, 100.0)), None);
    }

    #[test]
    fn test_render_draws_every_cell() {
        let mut game = LightsOut::new(4);
        game.choose(Difficulty::Medium);
        let mut surface = RecordingSurface::new();
        game.render(&mut surface);

        let lit = surface.rect_count(colors::LIGHT_ON);
        assert_eq!(lit, game.board.lit());
        assert_eq!(lit + surface.rect_count(colors::LIGHT_OFF), SIZE * SIZE);
        assert!(surface.has_text("Difficulty: Medium"));
    }

    proptest! {
        #[test]
        fn prop_press_is_self_inverse(
            seed_presses in proptest::collection::vec((0..SIZE, 0..SIZE), 0..10),
            row in 0..SIZE,
            col in 0..SIZE,
        ) {
            let mut board = Board::default();
            for (r, c) in seed_presses {
                board.press(r, c);
            }
            let before = board;
            board.press(row, col);
            prop_assert_ne!(board, before);
            board.press(row, col);
            prop_assert_eq!(board, before);
        }
    }
}

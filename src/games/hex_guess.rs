//! What The Hex
//!
//! A hex colour code is shown above a grid of swatches; pick the swatch it
//! describes. Rounds restart on a timer after each guess: quickly after a
//! correct one, a little longer after a wrong one so the answer can be seen.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use crate::error::ArcadeError;
use crate::renderer::{Align, Color, Surface, TextStyle, colors};
use crate::sim::{Rect, seeded_rng};

/// Swatch counts a round can have
pub const DIFFICULTY_LEVELS: [usize; 8] = [3, 4, 5, 6, 9, 12, 16, 25];
pub const DEFAULT_DIFFICULTY: usize = 6;

/// Delay before the next round after a correct guess
pub const CORRECT_DELAY_MS: f64 = 1500.0;
/// Delay before the next round after a wrong guess
pub const WRONG_DELAY_MS: f64 = 2500.0;

/// Screen layout
pub mod layout {
    pub const WIDTH: f32 = 600.0;
    pub const HEIGHT: f32 = 680.0;
    pub const GRID_TOP: f32 = 120.0;
    pub const SWATCH_PX: f32 = 90.0;
    pub const GAP_PX: f32 = 20.0;
    pub const COLUMNS: usize = 5;
}

/// Where the current round stands
#[derive(Debug, Clone, PartialEq)]
pub enum Round {
    Guessing,
    /// Answered correctly; the next round starts after a delay
    Correct { wait_ms: f64 },
    /// Answered wrong with the guessed colour; next round after a delay
    Wrong { guessed: Color, wait_ms: f64 },
}

/// Result of a guess
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guess {
    Correct,
    Wrong,
    /// Not accepting guesses right now, or no such swatch
    Ignored,
}

#[derive(Debug)]
pub struct HexGuess {
    difficulty: usize,
    answer: Color,
    swatches: Vec<Color>,
    round: Round,
    rounds_played: u32,
    rng: Pcg32,
}

impl HexGuess {
    pub fn new(seed: u64) -> Self {
        let mut game = Self {
            difficulty: DEFAULT_DIFFICULTY,
            answer: colors::BLACK,
            swatches: Vec::new(),
            round: Round::Guessing,
            rounds_played: 0,
            rng: seeded_rng(seed),
        };
        game.start_round();
        game
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    pub fn answer(&self) -> Color {
        self.answer
    }

    pub fn swatches(&self) -> &[Color] {
        &self.swatches
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Switch difficulty and start a fresh round right away
    pub fn set_difficulty(&mut self, difficulty: usize) -> Result<(), ArcadeError> {
        if !DIFFICULTY_LEVELS.contains(&difficulty) {
            return Err(ArcadeError::UnsupportedDifficulty(difficulty));
        }
        self.difficulty = difficulty;
        self.start_round();
        Ok(())
    }

    /// A new answer plus distinct decoys, shuffled
    fn start_round(&mut self) {
        self.answer = Color::from_u24(self.rng.random_range(0..0xFF_FFFF));
        let mut swatches = vec![self.answer];
        while swatches.len() < self.difficulty {
            let decoy = Color::from_u24(self.rng.random_range(0..0xFF_FFFF));
            if !swatches.contains(&decoy) {
                swatches.push(decoy);
            }
        }
        swatches.shuffle(&mut self.rng);
        self.swatches = swatches;
        self.round = Round::Guessing;
        self.rounds_played += 1;
        log::debug!("Hex round {} answer {}", self.rounds_played, self.answer.to_hex());
    }

    /// Guess the swatch at `index`
    pub fn guess(&mut self, index: usize) -> Guess {
        if self.round != Round::Guessing {
            return Guess::Ignored;
        }
        let Some(&guessed) = self.swatches.get(index) else {
            return Guess::Ignored;
        };
        if guessed == self.answer {
            self.round = Round::Correct {
                wait_ms: CORRECT_DELAY_MS,
            };
            Guess::Correct
        } else {
            self.round = Round::Wrong {
                guessed,
                wait_ms: WRONG_DELAY_MS,
            };
            Guess::Wrong
        }
    }

    /// Let time pass; starts the next round once the reveal delay runs out.
    /// Returns whether a new round started.
    pub fn advance(&mut self, elapsed_ms: f64) -> bool {
        let wait = match &mut self.round {
            Round::Guessing => return false,
            Round::Correct { wait_ms } | Round::Wrong { wait_ms, .. } => wait_ms,
        };
        *wait -= elapsed_ms;
        if *wait <= 0.0 {
            self.start_round();
            true
        } else {
            false
        }
    }

    pub fn message(&self) -> String {
        match &self.round {
            Round::Guessing => "GUESS THE COLOR".to_owned(),
            Round::Correct { .. } => "CORRECT!".to_owned(),
            Round::Wrong { guessed, .. } => format!("TRY AGAIN. THAT COLOR WAS {}", guessed.to_hex()),
        }
    }

    fn swatch_rect(index: usize) -> Rect {
        let col = index % layout::COLUMNS;
        let row = index / layout::COLUMNS;
        let stride = layout::SWATCH_PX + layout::GAP_PX;
        Rect::new(
            layout::GAP_PX + col as f32 * stride,
            layout::GRID_TOP + row as f32 * stride,
            layout::SWATCH_PX,
            layout::SWATCH_PX,
        )
    }

    /// Swatch index under a point on the canvas
    pub fn swatch_at(&self, point: Vec2) -> Option<usize> {
        (0..self.swatches.len()).find(|&i| {
            let rect = Self::swatch_rect(i);
            point.x >= rect.left()
                && point.x < rect.right()
                && point.y >= rect.top()
                && point.y < rect.bottom()
        })
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        surface.clear(colors::WHITE);

        let code = TextStyle::new(40.0, Align::Center, colors::BLACK);
        surface.draw_text(&self.answer.to_hex(), Vec2::new(layout::WIDTH / 2.0, 50.0), code);

        let message_color = match self.round {
            Round::Guessing => colors::BLACK,
            Round::Correct { .. } => Color::rgb(0, 150, 0),
            Round::Wrong { .. } => Color::rgb(200, 0, 0),
        };
        let message = TextStyle::new(20.0, Align::Center, message_color);
        surface.draw_text(&self.message(), Vec2::new(layout::WIDTH / 2.0, 95.0), message);

        for (i, color) in self.swatches.iter().enumerate() {
            let rect = Self::swatch_rect(i);
            // The answer is enlarged while a wrong guess is revealed
            let rect = match self.round {
                Round::Wrong { .. } if *color == self.answer => {
                    Rect::new(rect.pos.x - 6.0, rect.pos.y - 6.0, rect.size.x + 12.0, rect.size.y + 12.0)
                }
                _ => rect,
            };
            surface.fill_rect(rect, *color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingSurface;

    fn answer_index(game: &HexGuess) -> usize {
        game.swatches()
            .iter()
            .position(|c| *c == game.answer())
            .unwrap()
    }

    #[test]
    fn test_round_has_distinct_swatches_including_answer() {
        for &level in &DIFFICULTY_LEVELS {
            let mut game = HexGuess::new(level as u64);
            game.set_difficulty(level).unwrap();
            let swatches = game.swatches();
            assert_eq!(swatches.len(), level);
            assert!(swatches.contains(&game.answer()));
            for (i, a) in swatches.iter().enumerate() {
                assert!(swatches[i + 1..].iter().all(|b| b != a));
            }
        }
    }

    #[test]
    fn test_unsupported_difficulty() {
        let mut game = HexGuess::new(1);
        let before = game.swatches().to_vec();
        assert!(matches!(
            game.set_difficulty(7),
            Err(ArcadeError::UnsupportedDifficulty(7))
        ));
        assert_eq!(game.difficulty(), DEFAULT_DIFFICULTY);
        assert_eq!(game.swatches(), before.as_slice());
    }

    #[test]
    fn test_correct_guess_restarts_after_delay() {
        let mut game = HexGuess::new(2);
        let index = answer_index(&game);
        assert_eq!(game.guess(index), Guess::Correct);
        assert_eq!(game.message(), "CORRECT!");

        // Locked until the next round
        assert_eq!(game.guess(index), Guess::Ignored);
        assert!(!game.advance(1000.0));
        assert!(game.advance(500.0));
        assert_eq!(game.round(), &Round::Guessing);
        assert_eq!(game.rounds_played(), 2);
        assert_eq!(game.message(), "GUESS THE COLOR");
    }

    #[test]
    fn test_wrong_guess_reveals_guessed_color() {
        let mut game = HexGuess::new(3);
        let wrong = (answer_index(&game) + 1) % game.swatches().len();
        let guessed = game.swatches()[wrong];
        assert_eq!(game.guess(wrong), Guess::Wrong);
        assert_eq!(game.message(), format!("TRY AGAIN. THAT COLOR WAS {}", guessed.to_hex()));

        assert!(!game.advance(2000.0));
        assert!(game.advance(600.0));
        assert_eq!(game.rounds_played(), 2);
    }

    #[test]
    fn test_swatch_hit_testing() {
        let game = HexGuess::new(4);
        assert_eq!(game.swatch_at(Vec2::new(30.0, 130.0)), Some(0));
        assert_eq!(game.swatch_at(Vec2::new(30.0, 240.0)), Some(5));
        assert_eq!(game.swatch_at(Vec2::new(5.0, 130.0)), None);
        assert_eq!(game.swatch_at(Vec2::new(30.0, 400.0)), None);
    }

    #[test]
    fn test_largest_grid_fits_canvas() {
        use crate::renderer::DrawCommand;

        let mut game = HexGuess::new(6);
        game.set_difficulty(25).unwrap();
        let wrong = (answer_index(&game) + 1) % game.swatches().len();
        game.guess(wrong);

        let mut surface = RecordingSurface::new();
        game.render(&mut surface);
        let bottoms: Vec<f32> = surface
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect(rect, _) => Some(rect.bottom()),
                _ => None,
            })
            .collect();
        assert_eq!(bottoms.len(), 25);
        assert!(bottoms.iter().all(|&b| b <= layout::HEIGHT));
        assert!(surface.commands.iter().all(|c| match c {
            DrawCommand::FillRect(rect, _) => rect.right() <= layout::WIDTH,
            _ => true,
        }));
    }

    #[test]
    fn test_render_shows_code_and_swatches() {
        let game = HexGuess::new(5);
        let mut surface = RecordingSurface::new();
        game.render(&mut surface);
        assert!(surface.has_text(&game.answer().to_hex()));
        assert!(surface.has_text("GUESS THE COLOR"));
        assert_eq!(surface.rect_count(game.answer()), 1);
    }
}

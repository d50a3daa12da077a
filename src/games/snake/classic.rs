//! One-player snake

use glam::Vec2;
use rand_pcg::Pcg32;

use super::consts::*;
use super::{Cell, Direction, Food, Snake, TICK_SOURCE};
use crate::assets::Assets;
use crate::driver::TickSource;
use crate::renderer::{Align, Surface, TextStyle, colors};
use crate::sim::{Action, Control, Controls, Game, GameEvent, Phase, seeded_rng};

pub const START: Cell = Cell::new(16, 12);

#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub phase: Phase,
    pub score: i64,
    pub snake: Snake,
    pub food: Food,
}

impl World {
    pub fn new(rng: &mut Pcg32) -> Self {
        let snake = Snake::new(START, Direction::Up, colors::SNAKE_GREEN);
        let food = Food::spawn(1, colors::FOOD_RED, &[&snake], rng);
        Self {
            phase: Phase::NotStarted,
            score: 0,
            snake,
            food,
        }
    }
}

/// Arrow keys start, resume and steer; P pauses; any key restarts after
/// the game ended
pub fn press(world: &mut World, control: Option<Control>, rng: &mut Pcg32, events: &mut Vec<GameEvent>) {
    if world.phase == Phase::Over {
        *world = World::new(rng);
        events.push(GameEvent::Reset);
        return;
    }
    let Some(control) = control.filter(|c| c.player == 0) else {
        return;
    };

    if let Some(dir) = Direction::from_action(control.action) {
        if !world.phase.start() {
            world.phase.resume();
        }
        world.snake.steer(dir);
    } else if control.action == Action::Pause && world.phase.is_playing() {
        world.phase.toggle_pause();
    }
}

pub fn tick(world: &mut World, rng: &mut Pcg32, events: &mut Vec<GameEvent>) {
    if !world.phase.is_playing() {
        return;
    }

    world.snake.advance();
    if world.snake.hits_wall() || world.snake.hits_self() {
        world.phase.end();
        events.push(GameEvent::GameOver { score: world.score });
        return;
    }

    if world.snake.head() == world.food.cell {
        world.score += world.food.value;
        world.snake.grow();
        world.food.respawn(rng);
        events.push(GameEvent::Scored {
            delta: world.food.value,
        });
    }
}

pub fn banner(phase: Phase) -> &'static str {
    match phase {
        Phase::NotStarted => "Press <Arrow Key> to Start",
        Phase::Paused => "Press <Arrow Key> to Continue",
        Phase::Over => "Game Over",
        Phase::Playing => "",
    }
}

pub fn render(world: &World, surface: &mut dyn Surface) {
    surface.clear(colors::BLACK);
    world.snake.draw(surface);
    world.food.draw(surface);

    let message = banner(world.phase);
    if !message.is_empty() {
        let style = TextStyle::new(25.0, Align::Center, colors::YELLOW);
        surface.draw_text(message, Vec2::new(FIELD_WIDTH / 2.0, 170.0), style);
    }

    let score = TextStyle::new(25.0, Align::Left, colors::YELLOW);
    surface.draw_text(&format!("Score: {}", world.score), Vec2::new(25.0, 50.0), score);

    let hint = TextStyle::new(20.0, Align::Left, colors::YELLOW);
    surface.draw_text("Press <P> to pause", Vec2::new(32.0, 550.0), hint);
}

#[derive(Debug)]
pub struct ClassicSnake {
    pub world: World,
    rng: Pcg32,
}

impl ClassicSnake {
    pub fn new(seed: u64) -> Self {
        let mut rng = seeded_rng(seed);
        let world = World::new(&mut rng);
        Self { world, rng }
    }
}

impl Game for ClassicSnake {
    fn title(&self) -> &'static str {
        "Snake"
    }

    fn tick_source(&self) -> TickSource {
        TICK_SOURCE
    }

    fn phase(&self) -> Phase {
        self.world.phase
    }

    fn score(&self) -> i64 {
        self.world.score
    }

    fn press(&mut self, control: Option<Control>, events: &mut Vec<GameEvent>) {
        press(&mut self.world, control, &mut self.rng, events);
    }

    fn update(&mut self, _controls: &Controls, events: &mut Vec<GameEvent>) {
        tick(&mut self.world, &mut self.rng, events);
    }

    fn render(&self, surface: &mut dyn Surface, _assets: &Assets) {
        render(&self.world, surface);
    }

    fn reset(&mut self) {
        self.world = World::new(&mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingSurface;

    fn arrow(action: Action) -> Option<Control> {
        Some(Control::p1(action))
    }

    fn world() -> (World, Pcg32) {
        let mut rng = seeded_rng(42);
        let world = World::new(&mut rng);
        (world, rng)
    }

    #[test]
    fn test_eating_grows_on_next_tick() {
        let (mut world, mut rng) = world();
        world.phase = Phase::Playing;
        world.food.cell = Cell::new(16, 11);
        let mut events = Vec::new();

        tick(&mut world, &mut rng, &mut events);
        assert_eq!(world.snake.head(), Cell::new(16, 11));
        assert_eq!(world.score, 1);
        assert_eq!(world.snake.len(), 1);
        assert!(events.contains(&GameEvent::Scored { delta: 1 }));

        tick(&mut world, &mut rng, &mut events);
        assert_eq!(world.snake.len(), 2);
    }

    #[test]
    fn test_arrow_starts_and_steers() {
        let (mut world, mut rng) = world();
        world.food.cell = Cell::new(0, 0);
        press(&mut world, arrow(Action::Left), &mut rng, &mut Vec::new());
        assert_eq!(world.phase, Phase::Playing);

        tick(&mut world, &mut rng, &mut Vec::new());
        assert_eq!(world.snake.head(), Cell::new(15, 12));
    }

    #[test]
    fn test_reverse_is_ignored() {
        let (mut world, mut rng) = world();
        world.food.cell = Cell::new(0, 0);
        press(&mut world, arrow(Action::Down), &mut rng, &mut Vec::new());
        tick(&mut world, &mut rng, &mut Vec::new());
        assert_eq!(world.snake.head(), Cell::new(16, 11));
    }

    #[test]
    fn test_pause_and_continue() {
        let (mut world, mut rng) = world();
        world.food.cell = Cell::new(0, 0);
        press(&mut world, arrow(Action::Up), &mut rng, &mut Vec::new());
        press(&mut world, arrow(Action::Pause), &mut rng, &mut Vec::new());
        assert_eq!(world.phase, Phase::Paused);

        let frozen = world.snake.head();
        tick(&mut world, &mut rng, &mut Vec::new());
        assert_eq!(world.snake.head(), frozen);

        let mut surface = RecordingSurface::new();
        render(&world, &mut surface);
        assert!(surface.has_text("Press <Arrow Key> to Continue"));

        press(&mut world, arrow(Action::Up), &mut rng, &mut Vec::new());
        assert_eq!(world.phase, Phase::Playing);
    }

    #[test]
    fn test_wall_ends_game_and_any_key_restarts() {
        let (mut world, mut rng) = world();
        world.phase = Phase::Playing;
        world.food.cell = Cell::new(0, 0);
        let mut events = Vec::new();
        for _ in 0..13 {
            tick(&mut world, &mut rng, &mut events);
        }
        assert_eq!(world.phase, Phase::Over);
        assert!(events.contains(&GameEvent::GameOver { score: 0 }));

        press(&mut world, None, &mut rng, &mut events);
        assert_eq!(world.phase, Phase::NotStarted);
        assert_eq!(world.snake.head(), START);
    }

    #[test]
    fn test_runs_on_fixed_interval() {
        let game = ClassicSnake::new(1);
        assert_eq!(game.tick_source(), TickSource::FixedInterval { period_ms: 100 });
    }
}

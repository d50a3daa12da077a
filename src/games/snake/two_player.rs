//! Two-player cooperative snake
//!
//! Green uses the arrow keys, blue uses WASD. Both snakes feed one shared
//! score; the brown spoiled apple takes a point away, so the score can go
//! negative. Either snake crashing ends the game for both.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::consts::*;
use super::{Cell, Direction, Food, Snake, TICK_SOURCE};
use crate::assets::Assets;
use crate::driver::TickSource;
use crate::renderer::{Align, Surface, TextStyle, colors};
use crate::sim::{Action, Control, Controls, Game, GameEvent, KeyBindings, Phase, seeded_rng};

pub const GREEN_START: Cell = Cell::new(16, 12);
pub const BLUE_START: Cell = Cell::new(12, 12);
pub const PLAYERS: u8 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub phase: Phase,
    pub score: i64,
    /// Indexed by player
    pub snakes: [Snake; 2],
    pub fresh: [Food; 2],
    pub spoiled: Food,
}

impl World {
    pub fn new(rng: &mut Pcg32) -> Self {
        let green = Snake::new(GREEN_START, Direction::Up, colors::SNAKE_GREEN);
        let blue = Snake::new(BLUE_START, Direction::Up, colors::SNAKE_BLUE);
        let fresh = [
            Food::spawn(1, colors::FOOD_RED_SHARED, &[&green, &blue], rng),
            Food::spawn(1, colors::FOOD_RED_SHARED, &[&green, &blue], rng),
        ];
        let spoiled = Food::spawn(-1, colors::FOOD_SPOILED, &[&green, &blue], rng);
        Self {
            phase: Phase::NotStarted,
            score: 0,
            snakes: [green, blue],
            fresh,
            spoiled,
        }
    }
}

/// Arrow keys for the green snake, WASD for the blue one
pub fn bindings() -> KeyBindings {
    KeyBindings::arrows().with_wasd(1)
}

pub fn press(world: &mut World, control: Option<Control>, rng: &mut Pcg32, events: &mut Vec<GameEvent>) {
    if world.phase == Phase::Over {
        *world = World::new(rng);
        events.push(GameEvent::Reset);
        return;
    }
    let Some(control) = control else { return };

    match control.action {
        Action::Fire => {
            if !world.phase.start() {
                world.phase.resume();
            }
        }
        Action::Pause => {
            if world.phase.is_playing() {
                world.phase.toggle_pause();
            }
        }
        action => {
            if let (true, Some(dir), Some(snake)) = (
                world.phase.is_playing(),
                Direction::from_action(action),
                world.snakes.get_mut(usize::from(control.player)),
            ) {
                snake.steer(dir);
            }
        }
    }
}

pub fn tick(world: &mut World, rng: &mut Pcg32, events: &mut Vec<GameEvent>) {
    if !world.phase.is_playing() {
        return;
    }

    for snake in &mut world.snakes {
        snake.advance();
    }
    if world.snakes.iter().any(|s| s.hits_wall() || s.hits_self()) {
        world.phase.end();
        events.push(GameEvent::GameOver { score: world.score });
        return;
    }

    // A respawned food can be eaten by the second snake in the same tick
    for food in &mut world.fresh {
        for snake in &mut world.snakes {
            if snake.head() == food.cell {
                world.score += food.value;
                snake.grow();
                food.respawn(rng);
                events.push(GameEvent::Scored { delta: food.value });
            }
        }
    }

    for snake in &world.snakes {
        if snake.head() == world.spoiled.cell {
            world.score += world.spoiled.value;
            world.spoiled.respawn(rng);
            events.push(GameEvent::Scored {
                delta: world.spoiled.value,
            });
        }
    }
}

pub fn banner(phase: Phase) -> &'static str {
    match phase {
        Phase::Paused => "Game Paused - Press Space to Continue",
        _ => "Press <Space Bar> to Start",
    }
}

pub fn render(world: &World, surface: &mut dyn Surface) {
    surface.clear(colors::BLACK);
    let center = Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0);

    match world.phase {
        Phase::Playing | Phase::Over => {
            for snake in &world.snakes {
                snake.draw(surface);
            }
            for food in world.fresh.iter().chain([&world.spoiled]) {
                food.draw(surface);
            }
            let score = TextStyle::new(25.0, Align::Left, colors::YELLOW);
            surface.draw_text(&format!("Score: {}", world.score), Vec2::new(25.0, 50.0), score);
        }
        Phase::NotStarted | Phase::Paused => {
            let title = TextStyle::new(40.0, Align::Center, colors::YELLOW);
            surface.draw_text(banner(world.phase), center, title);

            let objective = TextStyle::new(20.0, Align::Left, colors::YELLOW);
            for (line, y) in [
                ("Objective: Work together to obtain the", 45.0),
                ("highest score possible, but be careful...", 70.0),
                ("You must avoid the spoiled brown apples!", 95.0),
            ] {
                surface.draw_text(line, Vec2::new(32.0, y), objective);
            }

            let controls = TextStyle::new(15.0, Align::Left, colors::YELLOW);
            surface.draw_text("Blue Controls: <W> <A> <S> <D>", Vec2::new(32.0, 540.0), controls);
            surface.draw_text("Green Controls: <Arrow Keys>", Vec2::new(32.0, 570.0), controls);
        }
    }

    match world.phase {
        Phase::Over => {
            let big = TextStyle::new(50.0, Align::Center, colors::YELLOW);
            let small = TextStyle::new(25.0, Align::Center, colors::YELLOW);
            surface.draw_text("Game Over", center - Vec2::new(0.0, 50.0), big);
            surface.draw_text(&format!("Final Score: {}", world.score), center, small);
            surface.draw_text("Press any key to play again", center + Vec2::new(0.0, 50.0), small);
        }
        Phase::Playing => {
            let hint = TextStyle::new(20.0, Align::Left, colors::YELLOW);
            surface.draw_text("Press <P> to pause", Vec2::new(32.0, 565.0), hint);
        }
        _ => {}
    }
}

#[derive(Debug)]
pub struct TwoPlayerSnake {
    pub world: World,
    rng: Pcg32,
}

impl TwoPlayerSnake {
    pub fn new(seed: u64) -> Self {
        let mut rng = seeded_rng(seed);
        let world = World::new(&mut rng);
        Self { world, rng }
    }
}

impl Game for TwoPlayerSnake {
    fn title(&self) -> &'static str {
        "2-Player Snake"
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

//! Demo mode: simple AI players
//!
//! Each loop-driven game gets a pilot that looks at the world and decides
//! which controls to hold and which to press this tick. Used by the native
//! headless runner.

use crate::games::snake::{Cell, Direction, Snake};
use crate::games::{BrickBreaker, ClassicSnake, DiscoJump, SpaceInvaders, TwoPlayerSnake};
use crate::sim::{Action, Control, Controls, Phase};

/// Controls for one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pilot {
    /// Edge action dispatched before the tick
    pub press: Vec<Option<Control>>,
    /// Level controls for the tick
    pub held: Controls,
}

impl Pilot {
    fn pressing(control: Control) -> Self {
        Self {
            press: vec![Some(control)],
            held: Controls::default(),
        }
    }

    fn holding(held: impl IntoIterator<Item = Control>) -> Self {
        Self {
            press: Vec::new(),
            held: Controls::from_held(held),
        }
    }
}

pub trait Autopilot {
    fn pilot(&self, tick: u64) -> Pilot;
}

/// Hold left or right to bring `current` within `deadzone` of `target`
fn steer_x(player: u8, current: f32, target: f32, deadzone: f32) -> Option<Control> {
    if target < current - deadzone {
        Some(Control::new(player, Action::Left))
    } else if target > current + deadzone {
        Some(Control::new(player, Action::Right))
    } else {
        None
    }
}

impl Autopilot for BrickBreaker {
    fn pilot(&self, tick: u64) -> Pilot {
        let world = &self.world;
        if world.phase != Phase::Playing {
            return Pilot::pressing(Control::p1(Action::Fire));
        }

        // Lead the ball a little, with a slow wobble so rallies vary
        let ball = world.ball.body;
        let lead = ball.rect().center() + ball.vel * 6.0;
        let t = tick as f32 * 0.01;
        let wobble = t.sin() * 20.0 + (t * 0.7).sin() * 10.0;
        let paddle = world.paddle.rect().center().x;
        Pilot::holding(steer_x(0, paddle, lead.x + wobble, 6.0))
    }
}

impl Autopilot for SpaceInvaders {
    fn pilot(&self, _tick: u64) -> Pilot {
        let world = &self.world;
        if world.phase != Phase::Playing {
            return Pilot::pressing(Control::p1(Action::Fire));
        }

        // Chase the lowest alien, fire whenever the laser is back
        let ship = world.ship.rect().center().x;
        let target = world
            .aliens
            .iter()
            .map(|a| a.rect())
            .max_by(|a, b| a.bottom().total_cmp(&b.bottom()))
            .map(|r| r.center().x)
            .unwrap_or(ship);

        let mut pilot = Pilot::holding(steer_x(0, ship, target, 4.0));
        if !world.laser_fired {
            pilot.press.push(Some(Control::p1(Action::Fire)));
        }
        pilot
    }
}

/// Turn toward `target` without hitting a wall or a snake on the next step
fn snake_turn(snake: &Snake, target: Cell, blocked: &[&Snake]) -> Option<Direction> {
    let head = snake.head();
    let safe = |dir: Direction| {
        let next = head.step(dir);
        next.in_bounds() && !blocked.iter().any(|s| s.occupies(next))
    };

    let mut wanted = Vec::with_capacity(4);
    if target.x < head.x {
        wanted.push(Direction::Left);
    } else if target.x > head.x {
        wanted.push(Direction::Right);
    }
    if target.y < head.y {
        wanted.push(Direction::Up);
    } else if target.y > head.y {
        wanted.push(Direction::Down);
    }
    wanted.extend([
        snake.heading(),
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ]);

    wanted
        .into_iter()
        .filter(|&dir| dir == snake.heading() || dir.is_perpendicular(snake.heading()))
        .find(|&dir| safe(dir))
}

fn direction_action(dir: Direction) -> Action {
    match dir {
        Direction::Up => Action::Up,
        Direction::Down => Action::Down,
        Direction::Left => Action::Left,
        Direction::Right => Action::Right,
    }
}

impl Autopilot for ClassicSnake {
    fn pilot(&self, _tick: u64) -> Pilot {
        let world = &self.world;
        match world.phase {
            Phase::Over => Pilot {
                press: vec![None],
                held: Controls::default(),
            },
            _ => {
                let dir = snake_turn(&world.snake, world.food.cell, &[&world.snake])
                    .unwrap_or(world.snake.heading());
                Pilot::pressing(Control::p1(direction_action(dir)))
            }
        }
    }
}

impl Autopilot for TwoPlayerSnake {
    fn pilot(&self, _tick: u64) -> Pilot {
        let world = &self.world;
        match world.phase {
            Phase::Over => Pilot {
                press: vec![None],
                held: Controls::default(),
            },
            Phase::NotStarted | Phase::Paused => Pilot::pressing(Control::p1(Action::Fire)),
            Phase::Playing => {
                let blocked: Vec<&Snake> = world.snakes.iter().collect();
                let press = world
                    .snakes
                    .iter()
                    .zip(0u8..)
                    .filter_map(|(snake, player)| {
                        let target = world
                            .fresh
                            .iter()
                            .map(|f| f.cell)
                            .min_by_key(|c| (c.x - snake.head().x).abs() + (c.y - snake.head().y).abs())?;
                        let dir = snake_turn(snake, target, &blocked)?;
                        Some(Some(Control::new(player, direction_action(dir))))
                    })
                    .collect();
                Pilot {
                    press,
                    held: Controls::default(),
                }
            }
        }
    }
}

impl Autopilot for DiscoJump {
    fn pilot(&self, _tick: u64) -> Pilot {
        let world = &self.world;
        if world.phase != Phase::Playing {
            return Pilot::pressing(Control::p1(Action::Up));
        }

        // Aim for the nearest platform above the player's feet
        let player = world.player.body;
        let feet = player.pos.y + player.size().y;
        let target = world
            .platforms
            .iter()
            .filter(|p| p.rect.top() < feet)
            .min_by(|a, b| (feet - a.rect.top()).total_cmp(&(feet - b.rect.top())))
            .map(|p| p.rect.center().x)
            .unwrap_or(player.pos.x);
        Pilot::holding(steer_x(0, player.pos.x, target, 4.0))
    }
}

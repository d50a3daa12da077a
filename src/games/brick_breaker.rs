//! Brick Breaker
//!
//! Paddle at the bottom, ball bouncing off the side walls and ceiling, rows
//! of multi-hit bricks. Level `n` has `n` rows of bricks needing `n` hits
//! each. Missing the ball costs a life and waits for a new serve.

use glam::Vec2;

use crate::assets::{AssetManifest, Assets};
use crate::audio::SoundEffect;
use crate::driver::TickSource;
use crate::renderer::{Align, Surface, TextStyle, colors, draw_background, draw_entity};
use crate::sim::{
    Action, Body, Control, Controls, Edge, Entity, EntityKind, Field, Game, GameEvent, Phase,
    Strike, Walls, overlaps,
};

/// Game configuration constants
pub mod consts {
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    pub const TOTAL_LIVES: u32 = 3;

    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 25.0;
    pub const PADDLE_Y: f32 = FIELD_HEIGHT - 35.0;
    /// Pixels per tick while a direction is held
    pub const PADDLE_SPEED: f32 = 5.0;

    pub const BALL_SIZE: f32 = 30.0;
    pub const BALL_START_X: f32 = FIELD_WIDTH / 2.0 - 15.0;
    pub const BALL_START_Y: f32 = FIELD_HEIGHT / 2.0 - 15.0;
    pub const BALL_START_DX: f32 = 3.0;
    pub const BALL_START_DY: f32 = -3.0;

    pub const BRICK_COLUMNS: usize = 8;
    pub const BRICK_WIDTH: f32 = 100.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_TOP: f32 = 100.0;
}

use consts::*;

pub mod sprites {
    use crate::assets::AssetId;

    pub const BALL: AssetId = AssetId("ballImage");
    pub const PADDLE: AssetId = AssetId("paddleImage");
    pub const BRICK: AssetId = AssetId("brickImage");
    pub const BACKGROUND: AssetId = AssetId("backgroundImage");
}

const FIELD: Field = Field::new(FIELD_WIDTH, FIELD_HEIGHT);

/// Everything that changes during a brick breaker session
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub phase: Phase,
    pub score: i64,
    pub lives: u32,
    pub level: u32,
    pub paddle: Entity,
    pub ball: Entity,
    pub bricks: Vec<Entity>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        let paddle = Entity::new(
            EntityKind::Paddle,
            Body::new(
                FIELD_WIDTH / 2.0 - PADDLE_WIDTH / 2.0,
                PADDLE_Y,
                PADDLE_WIDTH,
                PADDLE_HEIGHT,
            ),
        )
        .with_sprite(sprites::PADDLE);

        let ball = Entity::new(
            EntityKind::Ball,
            Body::new(BALL_START_X, BALL_START_Y, BALL_SIZE, BALL_SIZE)
                .with_velocity(BALL_START_DX, BALL_START_DY),
        )
        .with_sprite(sprites::BALL);

        Self {
            phase: Phase::NotStarted,
            score: 0,
            lives: TOTAL_LIVES,
            level: 1,
            paddle,
            ball,
            bricks: bricks_for_level(1),
        }
    }

    /// Ball back to the center, velocity kept
    fn recenter_ball(&mut self) {
        self.ball.body.pos = Vec2::new(BALL_START_X, BALL_START_Y);
    }
}

/// `level` rows of eight bricks, each needing `level` hits
pub fn bricks_for_level(level: u32) -> Vec<Entity> {
    let mut bricks = Vec::with_capacity(level as usize * BRICK_COLUMNS);
    for row in 0..level {
        for col in 0..BRICK_COLUMNS {
            let body = Body::new(
                col as f32 * BRICK_WIDTH,
                BRICK_TOP + row as f32 * BRICK_HEIGHT,
                BRICK_WIDTH,
                BRICK_HEIGHT,
            );
            bricks.push(
                Entity::new(EntityKind::Brick, body)
                    .with_hits(level)
                    .with_sprite(sprites::BRICK),
            );
        }
    }
    bricks
}

/// Edge-sensitive actions: serve, restart, pause
pub fn press(world: &mut World, control: Option<Control>, events: &mut Vec<GameEvent>) {
    let Some(control) = control else { return };
    match control.action {
        Action::Fire => match world.phase {
            Phase::Over => {
                *world = World::new();
                events.push(GameEvent::Reset);
            }
            Phase::NotStarted => {
                world.phase.start();
            }
            _ => {}
        },
        Action::Pause => {
            world.phase.toggle_pause();
        }
        _ => {}
    }
}

/// Advance the game by one tick
pub fn tick(world: &mut World, controls: &Controls, events: &mut Vec<GameEvent>) {
    // Nothing moves while paused or after the game ended
    if matches!(world.phase, Phase::Paused | Phase::Over) {
        return;
    }

    // The paddle can be positioned before serving
    let paddle = &mut world.paddle.body;
    if controls.held(0, Action::Left) {
        paddle.pos.x -= PADDLE_SPEED;
    }
    if controls.held(0, Action::Right) {
        paddle.pos.x += PADDLE_SPEED;
    }
    FIELD.clamp_x(paddle);

    if world.phase != Phase::Playing {
        return;
    }

    let ball = &mut world.ball.body;
    ball.integrate();
    FIELD.bounce(ball, Walls::SIDES_AND_TOP);

    if FIELD.reached(&ball.rect(), Edge::Bottom) {
        lose_life(world, events);
        return;
    }

    if overlaps(&ball.rect(), &world.paddle.rect()) {
        ball.vel.y = -ball.vel.y.abs();
        ball.pos.y = world.paddle.body.pos.y - ball.size().y;
    }

    // First overlapping brick in reverse order wins; one per tick
    let ball_rect = ball.rect();
    if let Some(index) = (0..world.bricks.len())
        .rev()
        .find(|&i| overlaps(&ball_rect, &world.bricks[i].rect()))
    {
        ball.vel.y = -ball.vel.y;
        world.score += 1;
        events.push(GameEvent::Scored { delta: 1 });
        events.push(GameEvent::Sound(SoundEffect::BrickHit));
        if world.bricks[index].strike() == Some(Strike::Destroyed) {
            world.bricks.remove(index);
        }
    }

    if world.bricks.is_empty() {
        world.level += 1;
        world.bricks = bricks_for_level(world.level);
        world.recenter_ball();
        world.phase.await_serve();
        events.push(GameEvent::LevelCleared { level: world.level });
    }
}

fn lose_life(world: &mut World, events: &mut Vec<GameEvent>) {
    world.lives = world.lives.saturating_sub(1);
    events.push(GameEvent::Sound(SoundEffect::LoseLife));
    events.push(GameEvent::LifeLost {
        remaining: world.lives,
    });

    if world.lives == 0 {
        world.phase.end();
        events.push(GameEvent::Sound(SoundEffect::Avalanche));
        events.push(GameEvent::GameOver { score: world.score });
    } else {
        world.recenter_ball();
        world.phase.await_serve();
    }
}

/// Phase-driven banner text
pub fn banner(phase: Phase) -> &'static str {
    match phase {
        Phase::NotStarted => "Press <Space> to serve",
        Phase::Paused => "Paused - Press <P> to resume",
        Phase::Over => "AVALANCHE! Game Over",
        Phase::Playing => "",
    }
}

pub fn render(world: &World, surface: &mut dyn Surface, assets: &Assets) {
    draw_background(
        surface,
        assets,
        sprites::BACKGROUND,
        Vec2::new(FIELD_WIDTH, FIELD_HEIGHT),
        colors::SNOW,
    );

    let hits_style = TextStyle::new(16.0, Align::Center, colors::BLACK);
    for brick in &world.bricks {
        draw_entity(surface, assets, brick);
        if let Some(hits) = brick.hits.filter(|h| h.remaining() > 1) {
            let rect = brick.rect();
            let at = Vec2::new(rect.center().x, rect.center().y + 6.0);
            surface.draw_text(&hits.remaining().to_string(), at, hits_style);
        }
    }
    draw_entity(surface, assets, &world.paddle);
    draw_entity(surface, assets, &world.ball);

    let hud = TextStyle::new(30.0, Align::Center, colors::BLACK);
    surface.draw_text(&format!("Score: {}", world.score), Vec2::new(FIELD_WIDTH / 4.0, 40.0), hud);
    surface.draw_text(&format!("Level: {}", world.level), Vec2::new(FIELD_WIDTH / 2.0, 40.0), hud);
    surface.draw_text(
        &format!("Lives: {}", world.lives),
        Vec2::new(FIELD_WIDTH * 3.0 / 4.0, 40.0),
        hud,
    );

    let message = banner(world.phase);
    if !message.is_empty() {
        let style = TextStyle::new(40.0, Align::Center, colors::BLACK);
        surface.draw_text(message, Vec2::new(FIELD_WIDTH / 2.0, 220.0), style);
    }
}

/// Brick breaker as a loop-driven game
#[derive(Debug, Default)]
pub struct BrickBreaker {
    pub world: World,
}

impl BrickBreaker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Game for BrickBreaker {
    fn title(&self) -> &'static str {
        "Brick Breaker"
    }

    fn tick_source(&self) -> TickSource {
        TickSource::AnimationFrame
    }

    fn assets(&self) -> AssetManifest {
        AssetManifest::new()
            .image(sprites::BALL, "./assets/snowflake.png")
            .image(sprites::PADDLE, "./assets/icePick.png")
            .image(sprites::BRICK, "./assets/iceBlock.png")
            .image(sprites::BACKGROUND, "./assets/snowBackground.jpg")
            .sound(SoundEffect::BrickHit.asset(), "./assets/iceBreaking.wav")
            .sound(SoundEffect::Avalanche.asset(), "./assets/screaming.wav")
            .sound(SoundEffect::LoseLife.asset(), "./assets/windSound.wav")
    }

    fn phase(&self) -> Phase {
        self.world.phase
    }

    fn score(&self) -> i64 {
        self.world.score
    }

    fn press(&mut self, control: Option<Control>, events: &mut Vec<GameEvent>) {
        press(&mut self.world, control, events);
    }

    fn update(&mut self, controls: &Controls, events: &mut Vec<GameEvent>) {
        tick(&mut self.world, controls, events);
    }

    fn render(&self, surface: &mut dyn Surface, assets: &Assets) {
        render(&self.world, surface, assets);
    }

    fn reset(&mut self) {
        self.world = World::new();
    }
}

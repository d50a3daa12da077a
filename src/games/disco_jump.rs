//! Disco Jump
//!
//! Vertical platformer. The player accelerates smoothly left and right,
//! wraps around the side edges and bounces automatically off any platform it
//! lands on from above. Rising past mid-screen scrolls the world down
//! instead of moving the player; the score is the height climbed.
//!
//! The player's `pos.x` is its horizontal center, `pos.y` its top edge.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::assets::{AssetId, AssetManifest, Assets};
use crate::driver::TickSource;
use crate::renderer::{Align, Color, Surface, TextStyle, colors};
use crate::sim::{Action, Body, Control, Controls, Field, Game, GameEvent, Phase, Rect, seeded_rng};

/// Game configuration constants
pub mod consts {
    pub const FIELD_WIDTH: f32 = 320.0;
    pub const FIELD_HEIGHT: f32 = 480.0;

    pub const PLAYER_SIZE: f32 = 22.0;
    pub const PLAYER_START_X: f32 = FIELD_WIDTH / 2.0;
    pub const PLAYER_START_Y: f32 = FIELD_HEIGHT - 100.0 - PLAYER_SIZE / 2.0;

    // Physics (per tick)
    pub const MOVE_ACCEL: f32 = 0.5;
    pub const STOP_DECEL: f32 = 0.5;
    pub const MAX_SPEED: f32 = 2.0;
    pub const GRAVITY: f32 = 0.25;
    pub const MAX_FALL_SPEED: f32 = 12.0;
    pub const JUMP_SPEED: f32 = -10.0;

    pub const PLATFORM_WIDTH: f32 = 50.0;
    pub const PLATFORM_HEIGHT: f32 = 10.0;
    pub const PLATFORM_COUNT: usize = 10;
    pub const PLATFORM_SPACING: f32 = 60.0;
    /// Where recycled platforms reappear, just above the view
    pub const PLATFORM_RECYCLE_Y: f32 = -20.0;

    /// Climbed pixels per score point
    pub const SCROLL_PER_POINT: f32 = 10.0;
}

use consts::*;

pub mod sprites {
    use crate::assets::AssetId;

    pub const IDLE: AssetId = AssetId("idle");
    pub const JUMPING: AssetId = AssetId("jumping");
    pub const FALLING: AssetId = AssetId("falling");
    pub const WALKING: AssetId = AssetId("walking");
}

const FIELD: Field = Field::new(FIELD_WIDTH, FIELD_HEIGHT);

/// Which animation the player shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    Idle,
    Jumping,
    Falling,
    Walking,
}

impl Pose {
    pub fn sprite(self) -> AssetId {
        match self {
            Pose::Idle => sprites::IDLE,
            Pose::Jumping => sprites::JUMPING,
            Pose::Falling => sprites::FALLING,
            Pose::Walking => sprites::WALKING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub rect: Rect,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub body: Body,
    pub pose: Pose,
    pub facing_left: bool,
}

impl Player {
    fn new() -> Self {
        Self {
            body: Body::new(PLAYER_START_X, PLAYER_START_Y, PLAYER_SIZE, PLAYER_SIZE),
            pose: Pose::Idle,
            facing_left: false,
        }
    }

    /// Drawn rectangle; `pos.x` is the center
    pub fn rect(&self) -> Rect {
        let size = self.body.size();
        Rect::new(self.body.pos.x - size.x / 2.0, self.body.pos.y, size.x, size.y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub phase: Phase,
    pub score: i64,
    /// Best score this session; survives resets
    pub hi_score: i64,
    pub total_scroll: f32,
    pub player: Player,
    pub platforms: Vec<Platform>,
}

impl World {
    pub fn new(rng: &mut Pcg32) -> Self {
        Self {
            phase: Phase::NotStarted,
            score: 0,
            hi_score: 0,
            total_scroll: 0.0,
            player: Player::new(),
            platforms: starting_platforms(rng),
        }
    }

    /// Fresh run that keeps the session high score and starts right away
    fn restart(&mut self, rng: &mut Pcg32) {
        let hi_score = self.hi_score;
        *self = World::new(rng);
        self.hi_score = hi_score;
        self.phase = Phase::Playing;
    }
}

fn random_color(rng: &mut Pcg32) -> Color {
    Color::rgb(rng.random(), rng.random(), rng.random())
}

/// Ten platforms stacked 60 px apart at random x, plus one centered under
/// the player's start position
pub fn starting_platforms(rng: &mut Pcg32) -> Vec<Platform> {
    let mut platforms: Vec<Platform> = (0..PLATFORM_COUNT)
        .map(|i| Platform {
            rect: Rect::new(
                rng.random_range(0.0..FIELD_WIDTH - PLATFORM_WIDTH),
                FIELD_HEIGHT - i as f32 * PLATFORM_SPACING,
                PLATFORM_WIDTH,
                PLATFORM_HEIGHT,
            ),
            color: random_color(rng),
        })
        .collect();
    platforms.push(Platform {
        rect: Rect::new(
            FIELD_WIDTH / 2.0 - PLATFORM_WIDTH / 2.0,
            FIELD_HEIGHT - PLATFORM_SPACING,
            PLATFORM_WIDTH,
            PLATFORM_HEIGHT,
        ),
        color: random_color(rng),
    });
    platforms
}

/// Up starts the game, or restarts it straight into play once it is over
pub fn press(world: &mut World, control: Option<Control>, rng: &mut Pcg32, events: &mut Vec<GameEvent>) {
    if control != Some(Control::p1(Action::Up)) {
        return;
    }
    match world.phase {
        Phase::Over => {
            world.restart(rng);
            events.push(GameEvent::Reset);
        }
        Phase::NotStarted => {
            world.phase.start();
        }
        _ => {}
    }
}

/// Horizontal speed after one tick of input
pub fn accelerate(dx: f32, left: bool, right: bool) -> f32 {
    if left {
        (dx - MOVE_ACCEL).max(-MAX_SPEED)
    } else if right {
        (dx + MOVE_ACCEL).min(MAX_SPEED)
    } else if dx > 0.0 {
        (dx - STOP_DECEL).max(0.0)
    } else if dx < 0.0 {
        (dx + STOP_DECEL).min(0.0)
    } else {
        0.0
    }
}

/// Swept landing test: the center is strictly inside the platform's span and
/// the feet cross its top edge during this tick
pub fn lands_on(body: &Body, platform: &Rect) -> bool {
    let feet = body.pos.y + body.size().y;
    let center = body.pos.x;
    body.vel.y >= 0.0
        && center > platform.left()
        && center < platform.right()
        && feet <= platform.top()
        && feet + body.vel.y >= platform.top()
}

pub fn tick(world: &mut World, controls: &Controls, rng: &mut Pcg32, events: &mut Vec<GameEvent>) {
    if !world.phase.is_playing() {
        return;
    }

    let left = controls.held(0, Action::Left);
    let right = controls.held(0, Action::Right);
    let body = &mut world.player.body;

    body.vel.x = accelerate(body.vel.x, left, right);
    body.pos.x = FIELD.wrap_x(body.pos.x + body.vel.x);

    body.vel.y = (body.vel.y + GRAVITY).min(MAX_FALL_SPEED);
    let landing = world
        .platforms
        .iter()
        .find(|p| lands_on(&*body, &p.rect))
        .map(|p| p.rect.top());
    match landing {
        Some(top) => {
            body.pos.y = top - body.size().y;
            body.vel.y = JUMP_SPEED;
        }
        None => body.pos.y += body.vel.y,
    }

    world.player.pose = if body.vel.y < 0.0 {
        Pose::Jumping
    } else if body.vel.y > 0.0 {
        Pose::Falling
    } else if left || right {
        Pose::Walking
    } else {
        Pose::Idle
    };
    if body.vel.x < 0.0 {
        world.player.facing_left = true;
    } else if body.vel.x > 0.0 {
        world.player.facing_left = false;
    }

    // Rising past mid-screen scrolls the world instead of the player
    if body.pos.y < FIELD_HEIGHT / 2.0 && body.vel.y < 0.0 {
        let scroll = -body.vel.y;
        world.total_scroll += scroll;
        body.pos.y = FIELD_HEIGHT / 2.0;
        for platform in &mut world.platforms {
            platform.rect.pos.y += scroll;
        }
    }

    let score = (world.total_scroll / SCROLL_PER_POINT).floor() as i64;
    if score != world.score {
        events.push(GameEvent::Scored {
            delta: score - world.score,
        });
        world.score = score;
    }
    world.hi_score = world.hi_score.max(world.score);

    for platform in &mut world.platforms {
        if platform.rect.top() > FIELD_HEIGHT {
            platform.rect.pos.y = PLATFORM_RECYCLE_Y;
            platform.rect.pos.x = rng.random_range(0.0..FIELD_WIDTH - PLATFORM_WIDTH);
        }
        platform.color = random_color(rng);
    }

    if world.player.body.pos.y > FIELD_HEIGHT {
        world.phase.end();
        events.push(GameEvent::GameOver { score: world.score });
    }
}

pub fn banner(phase: Phase) -> &'static str {
    match phase {
        Phase::Over => "Press <UP> to restart",
        Phase::Playing => "",
        _ => "Press <UP> to start",
    }
}

pub fn render(world: &World, surface: &mut dyn Surface, assets: &Assets) {
    surface.clear(colors::DISCO_FLOOR);

    for platform in &world.platforms {
        surface.fill_rect(platform.rect, platform.color);
    }

    let sprite = world.player.pose.sprite();
    if assets.is_ready(sprite) {
        surface.draw_image(sprite, world.player.rect());
    } else {
        surface.fill_rect(world.player.rect(), colors::WHITE);
    }

    let hud = TextStyle::new(16.0, Align::Left, colors::WHITE);
    surface.draw_text(&format!("Score: {}", world.score), Vec2::new(10.0, 20.0), hud);
    surface.draw_text(&format!("Hi: {}", world.hi_score), Vec2::new(10.0, 40.0), hud);

    let message = banner(world.phase);
    if !message.is_empty() {
        let style = TextStyle::new(20.0, Align::Center, colors::WHITE);
        surface.draw_text(message, Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 3.0), style);
    }
}

#[derive(Debug)]
pub struct DiscoJump {
    pub world: World,
    rng: Pcg32,
}

impl DiscoJump {
    pub fn new(seed: u64) -> Self {
        let mut rng = seeded_rng(seed);
        let world = World::new(&mut rng);
        Self { world, rng }
    }
}

impl Game for DiscoJump {
    fn title(&self) -> &'static str {
        "Disco Jump"
    }

    fn tick_source(&self) -> TickSource {
        TickSource::AnimationFrame
    }

    fn assets(&self) -> AssetManifest {
        AssetManifest::new()
            .image(sprites::IDLE, "./assets/kirbyidle.gif")
            .image(sprites::JUMPING, "./assets/kirbyjump.gif")
            .image(sprites::FALLING, "./assets/kirbyfall.gif")
            .image(sprites::WALKING, "./assets/kirbywalk.gif")
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

    fn update(&mut self, controls: &Controls, events: &mut Vec<GameEvent>) {
        tick(&mut self.world, controls, &mut self.rng, events);
    }

    fn render(&self, surface: &mut dyn Surface, assets: &Assets) {
        render(&self.world, surface, assets);
    }

    fn reset(&mut self) {
        let hi_score = self.world.hi_score;
        self.world = World::new(&mut self.rng);
        self.world.hi_score = hi_score;
    }
}

//! Space Invaders
//!
//! The ship slides along the bottom and fires a single laser that rests on
//! the ship until launched. The alien formation marches as one unit: when
//! any member would cross a side wall on its next step, every alien
//! reverses and drops a row. A bonus target drifts across the top.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::assets::{AssetManifest, Assets};
use crate::audio::SoundEffect;
use crate::driver::TickSource;
use crate::renderer::{Align, Surface, TextStyle, colors, draw_background, draw_entity};
use crate::sim::{
    Action, Body, Control, Controls, Entity, EntityKind, Field, Game, GameEvent, Phase, Rect,
    seeded_rng, touches,
};

/// Game configuration constants
pub mod consts {
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    /// Spare lives; the game ends when a hit arrives with none left
    pub const TOTAL_LIVES: u32 = 2;

    pub const SHIP_WIDTH: f32 = 100.0;
    pub const SHIP_HEIGHT: f32 = 35.0;
    pub const SHIP_Y: f32 = FIELD_HEIGHT - 55.0;
    pub const SHIP_SPEED: f32 = 4.0;

    pub const LASER_WIDTH: f32 = 5.0;
    pub const LASER_HEIGHT: f32 = 15.0;
    pub const LASER_SPEED: f32 = -6.0;

    pub const ALIEN_LASER_SIZE: f32 = 25.0;
    pub const ALIEN_LASER_SPEED: f32 = 3.0;

    pub const BONUS_WIDTH: f32 = 100.0;
    pub const BONUS_HEIGHT: f32 = 45.0;
    pub const BONUS_Y: f32 = 50.0;
    /// Parking spot left of the field; the bonus drifts in from here
    pub const BONUS_PARKED_X: f32 = -1000.0;
    pub const BONUS_SPEED: f32 = 1.0;
    pub const BONUS_POINTS: i64 = 10;

    pub const ALIEN_COLUMNS: usize = 10;
    pub const ALIEN_WIDTH: f32 = 30.0;
    pub const ALIEN_HEIGHT: f32 = 20.0;
    pub const ALIEN_SPACING_X: f32 = 60.0;
    pub const ALIEN_SPACING_Y: f32 = 50.0;
    pub const ALIEN_ORIGIN: f32 = 100.0;
    pub const ALIEN_STEP_X: f32 = 2.0;
    pub const ALIEN_STEP_DOWN: f32 = 25.0;
    /// Ticks between formation steps is this plus two per surviving alien
    pub const ALIEN_BASE_DELAY: usize = 20;
}

use consts::*;

pub mod sprites {
    use crate::assets::AssetId;

    pub const LASER: AssetId = AssetId("laser");
    pub const ALIEN_LASER: AssetId = AssetId("alienLaser");
    pub const SHIP: AssetId = AssetId("ship");
    pub const SHIP_ICON: AssetId = AssetId("shipIcon");
    pub const BLANK_ICON: AssetId = AssetId("blankIcon");
    pub const BONUS: AssetId = AssetId("extraPoints");
    pub const ALIEN_1: AssetId = AssetId("alien1");
    pub const ALIEN_2: AssetId = AssetId("alien2");
    pub const BACKGROUND: AssetId = AssetId("background");
}

const FIELD: Field = Field::new(FIELD_WIDTH, FIELD_HEIGHT);

#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub phase: Phase,
    pub score: i64,
    /// Spare lives left
    pub lives: u32,
    pub level: u32,
    pub ship: Entity,
    pub laser: Entity,
    pub laser_fired: bool,
    pub alien_laser: Entity,
    pub bonus: Entity,
    pub aliens: Vec<Entity>,
    /// Ticks since the formation last stepped
    pub march_counter: usize,
    /// Which of the two alien frames is showing
    pub first_frame: bool,
}

impl World {
    pub fn new(rng: &mut Pcg32) -> Self {
        let ship = Entity::new(
            EntityKind::Ship,
            Body::new(
                FIELD_WIDTH / 2.0 - SHIP_WIDTH / 2.0,
                SHIP_Y,
                SHIP_WIDTH,
                SHIP_HEIGHT,
            ),
        )
        .with_sprite(sprites::SHIP);

        let mut laser = Entity::new(
            EntityKind::Laser,
            Body::new(0.0, 0.0, LASER_WIDTH, LASER_HEIGHT).with_velocity(0.0, LASER_SPEED),
        )
        .with_sprite(sprites::LASER);
        laser.body.dock_on(&ship.body);

        let alien_laser = Entity::new(
            EntityKind::AlienLaser,
            Body::new(0.0, 0.0, ALIEN_LASER_SIZE, ALIEN_LASER_SIZE)
                .with_velocity(0.0, ALIEN_LASER_SPEED),
        )
        .with_sprite(sprites::ALIEN_LASER);

        let bonus = Entity::new(
            EntityKind::Bonus,
            Body::new(BONUS_PARKED_X, BONUS_Y, BONUS_WIDTH, BONUS_HEIGHT)
                .with_velocity(BONUS_SPEED, 0.0),
        )
        .with_sprite(sprites::BONUS);

        let mut world = Self {
            phase: Phase::NotStarted,
            score: 0,
            lives: TOTAL_LIVES,
            level: 1,
            ship,
            laser,
            laser_fired: false,
            alien_laser,
            bonus,
            aliens: formation(1),
            march_counter: 0,
            first_frame: true,
        };
        world.rearm_alien_laser(rng);
        world
    }

    /// Drop the alien projectile from the bottom of a random alien
    fn rearm_alien_laser(&mut self, rng: &mut Pcg32) {
        if self.aliens.is_empty() {
            return;
        }
        let shooter = self.aliens[rng.random_range(0..self.aliens.len())].rect();
        let body = &mut self.alien_laser.body;
        body.pos.x = shooter.center().x - body.size().x / 2.0;
        body.pos.y = shooter.bottom();
    }

    fn park_bonus(&mut self) {
        self.bonus.body.pos.x = BONUS_PARKED_X;
    }
}

/// `rows` rows of ten aliens marching right
pub fn formation(rows: u32) -> Vec<Entity> {
    let mut aliens = Vec::with_capacity(rows as usize * ALIEN_COLUMNS);
    for row in 0..rows {
        for col in 0..ALIEN_COLUMNS {
            let body = Body::new(
                ALIEN_ORIGIN + col as f32 * ALIEN_SPACING_X,
                ALIEN_ORIGIN + row as f32 * ALIEN_SPACING_Y,
                ALIEN_WIDTH,
                ALIEN_HEIGHT,
            )
            .with_velocity(ALIEN_STEP_X, ALIEN_STEP_DOWN);
            aliens.push(Entity::new(EntityKind::Alien, body).with_sprite(sprites::ALIEN_1));
        }
    }
    aliens
}

/// One formation step.
///
/// If any alien's next horizontal step would leave the field, every alien
/// reverses and steps down instead of moving sideways. Returns whether the
/// formation reversed.
pub fn march_formation(aliens: &mut [Entity], width: f32) -> bool {
    let reverse = aliens.iter().any(|alien| {
        let next = alien.body.pos.x + alien.body.vel.x;
        next < 0.0 || next + alien.body.size().x > width
    });

    for alien in aliens.iter_mut() {
        if reverse {
            alien.body.vel.x = -alien.body.vel.x;
            alien.body.pos.y += alien.body.vel.y;
        } else {
            alien.body.pos.x += alien.body.vel.x;
        }
    }
    reverse
}

pub fn press(world: &mut World, control: Option<Control>, rng: &mut Pcg32, events: &mut Vec<GameEvent>) {
    let Some(control) = control else { return };
    if control.action != Action::Fire {
        return;
    }
    match world.phase {
        Phase::Over => {
            *world = World::new(rng);
            events.push(GameEvent::Reset);
        }
        Phase::NotStarted => {
            world.phase.start();
        }
        Phase::Playing => world.laser_fired = true,
        Phase::Paused => {}
    }
}

pub fn tick(world: &mut World, controls: &Controls, rng: &mut Pcg32, events: &mut Vec<GameEvent>) {
    if !world.phase.is_playing() {
        return;
    }

    // Ship
    let ship = &mut world.ship.body;
    if controls.held(0, Action::Left) {
        ship.pos.x -= SHIP_SPEED;
    }
    if controls.held(0, Action::Right) {
        ship.pos.x += SHIP_SPEED;
    }
    FIELD.clamp_x(ship);

    // Bonus target
    world.bonus.body.integrate();
    if world.bonus.body.pos.x > FIELD_WIDTH + 100.0 {
        world.park_bonus();
    }

    // Projectiles
    if world.laser_fired {
        world.laser.body.integrate();
        if FIELD.is_outside(&world.laser.rect()) {
            world.laser_fired = false;
        }
    } else {
        world.laser.body.dock_on(&world.ship.body);
    }

    world.alien_laser.body.integrate();
    if FIELD.is_outside(&world.alien_laser.rect()) {
        world.rearm_alien_laser(rng);
    }

    // Collisions
    if world.laser_fired && touches(&world.laser.rect(), &world.bonus.rect()) {
        world.score += BONUS_POINTS;
        world.laser_fired = false;
        world.park_bonus();
        events.push(GameEvent::Scored { delta: BONUS_POINTS });
        events.push(GameEvent::Sound(SoundEffect::NiceShot));
    }

    if touches(&world.alien_laser.rect(), &world.ship.rect()) {
        world.rearm_alien_laser(rng);
        if world.lives == 0 {
            end_game(world, events);
            return;
        }
        world.lives -= 1;
        world.phase.await_serve();
        events.push(GameEvent::LifeLost {
            remaining: world.lives,
        });
    }

    if world.laser_fired {
        let laser = world.laser.rect();
        for i in (0..world.aliens.len()).rev() {
            if touches(&laser, &world.aliens[i].rect()) {
                world.aliens.remove(i);
                world.score += 1;
                world.laser_fired = false;
                events.push(GameEvent::Scored { delta: 1 });
                events.push(GameEvent::Sound(SoundEffect::AlienHit));
            }
        }
    }

    // Formation
    world.march_counter += 1;
    if world.march_counter > ALIEN_BASE_DELAY + 2 * world.aliens.len() {
        world.first_frame = !world.first_frame;
        let frame = if world.first_frame {
            sprites::ALIEN_1
        } else {
            sprites::ALIEN_2
        };
        for alien in &mut world.aliens {
            alien.sprite = Some(frame);
        }
        march_formation(&mut world.aliens, FIELD_WIDTH);
        world.march_counter = 0;
    }

    if world.aliens.is_empty() {
        world.level += 1;
        world.aliens = formation(world.level);
        world.phase.await_serve();
        events.push(GameEvent::LevelCleared { level: world.level });
    }

    let ship_top = world.ship.rect().top();
    if world.aliens.iter().any(|alien| alien.rect().bottom() > ship_top) {
        end_game(world, events);
    }
}

fn end_game(world: &mut World, events: &mut Vec<GameEvent>) {
    world.phase.end();
    world.park_bonus();
    events.push(GameEvent::Sound(SoundEffect::InvadersEnd));
    events.push(GameEvent::GameOver { score: world.score });
}

pub fn banner(phase: Phase) -> &'static str {
    match phase {
        Phase::Over => "Game Over",
        Phase::Playing => "",
        _ => "Press <Space> to Start/Fire",
    }
}

pub fn render(world: &World, surface: &mut dyn Surface, assets: &Assets) {
    draw_background(
        surface,
        assets,
        sprites::BACKGROUND,
        Vec2::new(FIELD_WIDTH, FIELD_HEIGHT),
        colors::OCEAN,
    );

    draw_entity(surface, assets, &world.laser);
    draw_entity(surface, assets, &world.alien_laser);
    draw_entity(surface, assets, &world.ship);
    draw_entity(surface, assets, &world.bonus);
    for alien in &world.aliens {
        draw_entity(surface, assets, alien);
    }

    for i in 0..TOTAL_LIVES {
        let icon = if i < world.lives {
            sprites::SHIP_ICON
        } else {
            sprites::BLANK_ICON
        };
        if assets.is_ready(icon) {
            let x = FIELD_WIDTH - 50.0 * (i + 1) as f32;
            surface.draw_image(icon, Rect::new(x, 20.0, 30.0, 20.0));
        }
    }

    let score_style = TextStyle::new(20.0, Align::Left, colors::WHITE);
    surface.draw_text(&format!("Score: {}", world.score), Vec2::new(20.0, 40.0), score_style);

    let message = banner(world.phase);
    if !message.is_empty() {
        let style = TextStyle::new(25.0, Align::Center, colors::WHITE);
        surface.draw_text(message, Vec2::new(FIELD_WIDTH / 2.0, 170.0), style);
    }
}

/// Space Invaders with its own seeded RNG for the alien projectile
#[derive(Debug)]
pub struct SpaceInvaders {
    pub world: World,
    rng: Pcg32,
}

impl SpaceInvaders {
    pub fn new(seed: u64) -> Self {
        let mut rng = seeded_rng(seed);
        let world = World::new(&mut rng);
        Self { world, rng }
    }
}

impl Game for SpaceInvaders {
    fn title(&self) -> &'static str {
        "Space Invaders"
    }

    fn tick_source(&self) -> TickSource {
        TickSource::AnimationFrame
    }

    fn assets(&self) -> AssetManifest {
        AssetManifest::new()
            .image(sprites::LASER, "./assets/laser.png")
            .image(sprites::ALIEN_LASER, "./assets/iceberg.png")
            .image(sprites::SHIP, "./assets/titanic.png")
            .image(sprites::SHIP_ICON, "./assets/titanic.png")
            .image(sprites::BLANK_ICON, "./assets/blackWhiteTitanic.png")
            .image(sprites::BONUS, "./assets/lifebuoy.png")
            .image(sprites::ALIEN_1, "./assets/rowingBoat1.png")
            .image(sprites::ALIEN_2, "./assets/rowingBoat2.png")
            .image(sprites::BACKGROUND, "./assets/ocean.jpg")
            .sound(SoundEffect::AlienHit.asset(), "./assets/hitSound.wav")
            .sound(SoundEffect::InvadersEnd.asset(), "./assets/gameEndSound.wav")
            .sound(SoundEffect::NiceShot.asset(), "./assets/niceShotAudio.wav")
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
        self.world = World::new(&mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingSurface;

    fn playing() -> (World, Pcg32) {
        let mut rng = seeded_rng(3);
        let mut world = World::new(&mut rng);
        world.phase = Phase::Playing;
        // Park the alien projectile far from the ship
        world.alien_laser.body.pos = Vec2::new(0.0, 0.0);
        (world, rng)
    }

    fn alien_at(x: f32, y: f32, dx: f32) -> Entity {
        Entity::new(
            EntityKind::Alien,
            Body::new(x, y, ALIEN_WIDTH, ALIEN_HEIGHT).with_velocity(dx, ALIEN_STEP_DOWN),
        )
    }

    #[test]
    fn test_formation_reverses_as_one() {
        let mut aliens = vec![alien_at(100.0, 100.0, 2.0), alien_at(769.0, 100.0, 2.0)];
        assert!(march_formation(&mut aliens, FIELD_WIDTH));

        // Nobody moved sideways, everyone stepped down and turned around
        assert_eq!(aliens[0].body.pos, Vec2::new(100.0, 125.0));
        assert_eq!(aliens[1].body.pos, Vec2::new(769.0, 125.0));
        assert!(aliens.iter().all(|a| a.body.vel.x == -2.0));

        assert!(!march_formation(&mut aliens, FIELD_WIDTH));
        assert_eq!(aliens[0].body.pos.x, 98.0);
        assert_eq!(aliens[1].body.pos.x, 767.0);
    }

    #[test]
    fn test_laser_rests_on_ship_until_fired() {
        let (mut world, mut rng) = playing();
        let right = Controls::from_held([Control::p1(Action::Right)]);
        tick(&mut world, &right, &mut rng, &mut Vec::new());

        assert_eq!(world.ship.body.pos.x, 354.0);
        assert_eq!(world.laser.body.pos, Vec2::new(354.0 + 50.0 - 2.5, SHIP_Y));

        press(&mut world, Some(Control::p1(Action::Fire)), &mut rng, &mut Vec::new());
        assert!(world.laser_fired);
        tick(&mut world, &Controls::default(), &mut rng, &mut Vec::new());
        assert_eq!(world.laser.body.pos.y, SHIP_Y - 6.0);
    }

    #[test]
    fn test_laser_removes_every_alien_it_touches() {
        let (mut world, mut rng) = playing();
        world.aliens = vec![
            alien_at(300.0, 300.0, 2.0),
            alien_at(310.0, 300.0, 2.0),
            alien_at(600.0, 100.0, 2.0),
        ];
        world.laser_fired = true;
        world.laser.body.pos = Vec2::new(320.0, 316.0);
        let mut events = Vec::new();
        tick(&mut world, &Controls::default(), &mut rng, &mut events);

        assert_eq!(world.aliens.len(), 1);
        assert_eq!(world.score, 2);
        assert!(!world.laser_fired);
        let hits = events
            .iter()
            .filter(|e| **e == GameEvent::Sound(SoundEffect::AlienHit))
            .count();
        assert_eq!(hits, 2);
    }

    #[test]
    fn test_bonus_target_scores_ten() {
        let (mut world, mut rng) = playing();
        world.bonus.body.pos = Vec2::new(300.0, BONUS_Y);
        world.laser_fired = true;
        world.laser.body.pos = Vec2::new(350.0, BONUS_Y + BONUS_HEIGHT + 2.0);
        let mut events = Vec::new();
        tick(&mut world, &Controls::default(), &mut rng, &mut events);

        assert_eq!(world.score, BONUS_POINTS);
        assert_eq!(world.bonus.body.pos.x, BONUS_PARKED_X);
        assert!(events.contains(&GameEvent::Sound(SoundEffect::NiceShot)));
    }

    #[test]
    fn test_bonus_parks_after_crossing() {
        let (mut world, mut rng) = playing();
        world.bonus.body.pos.x = 900.0;
        tick(&mut world, &Controls::default(), &mut rng, &mut Vec::new());
        assert_eq!(world.bonus.body.pos.x, BONUS_PARKED_X);
    }

    #[test]
    fn test_alien_laser_costs_a_spare_life() {
        let (mut world, mut rng) = playing();
        world.alien_laser.body.pos = Vec2::new(400.0, SHIP_Y - 26.0);
        let mut events = Vec::new();
        tick(&mut world, &Controls::default(), &mut rng, &mut events);

        assert_eq!(world.lives, TOTAL_LIVES - 1);
        assert_eq!(world.phase, Phase::NotStarted);
        assert!(events.contains(&GameEvent::LifeLost { remaining: 1 }));
        // Re-fired from an alien, well above the ship
        assert!(world.alien_laser.body.pos.y < 200.0);
    }

    #[test]
    fn test_hit_without_spares_ends_the_game() {
        let (mut world, mut rng) = playing();
        world.lives = 0;
        world.alien_laser.body.pos = Vec2::new(400.0, SHIP_Y - 26.0);
        let mut events = Vec::new();
        tick(&mut world, &Controls::default(), &mut rng, &mut events);

        assert_eq!(world.phase, Phase::Over);
        assert!(events.contains(&GameEvent::Sound(SoundEffect::InvadersEnd)));
    }

    #[test]
    fn test_aliens_reaching_ship_line_end_the_game() {
        let (mut world, mut rng) = playing();
        world.aliens = vec![alien_at(100.0, SHIP_Y - ALIEN_HEIGHT + 1.0, 2.0)];
        tick(&mut world, &Controls::default(), &mut rng, &mut Vec::new());
        assert_eq!(world.phase, Phase::Over);

        press(&mut world, Some(Control::p1(Action::Fire)), &mut rng, &mut Vec::new());
        assert_eq!(world.phase, Phase::NotStarted);
        assert_eq!(world.aliens.len(), ALIEN_COLUMNS);
        assert_eq!(world.score, 0);
    }

    #[test]
    fn test_clearing_formation_adds_a_row() {
        let (mut world, mut rng) = playing();
        world.aliens = vec![alien_at(300.0, 300.0, 2.0)];
        world.laser_fired = true;
        world.laser.body.pos = Vec2::new(310.0, 316.0);
        let mut events = Vec::new();
        tick(&mut world, &Controls::default(), &mut rng, &mut events);

        assert_eq!(world.level, 2);
        assert_eq!(world.aliens.len(), 2 * ALIEN_COLUMNS);
        assert_eq!(world.phase, Phase::NotStarted);
    }

    #[test]
    fn test_march_period_depends_on_alien_count() {
        let (mut world, mut rng) = playing();
        let start = world.aliens[0].body.pos;
        let period = ALIEN_BASE_DELAY + 2 * world.aliens.len();
        for _ in 0..period {
            tick(&mut world, &Controls::default(), &mut rng, &mut Vec::new());
        }
        assert_eq!(world.aliens[0].body.pos, start);

        tick(&mut world, &Controls::default(), &mut rng, &mut Vec::new());
        assert_eq!(world.aliens[0].body.pos.x, start.x + ALIEN_STEP_X);
        assert_eq!(world.aliens[0].sprite, Some(sprites::ALIEN_2));
    }

    #[test]
    fn test_render_draws_spent_lives_blank() {
        let mut game = SpaceInvaders::new(1);
        game.world.lives = 1;
        let assets = Assets::preloaded(&game.assets());
        let mut surface = RecordingSurface::new();
        game.render(&mut surface, &assets);

        let images = surface.images();
        assert!(images.contains(&sprites::SHIP_ICON));
        assert!(images.contains(&sprites::BLANK_ICON));
        assert!(surface.has_text("Press <Space> to Start/Fire"));
        assert!(surface.has_text("Score: 0"));
    }
}

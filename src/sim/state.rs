//! World state and core simulation types
//!
//! Everything the tick reads or writes lives in [`World`]. Positions are in
//! percent of the playfield, velocities in pixels per second.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::progression;
use super::snapshot::{ObstacleView, PlayerView, ProjectileView, WorldSnapshot};
use super::timers::{ScheduledAction, Timers};
use crate::consts::*;

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    /// Waiting for a start intent
    #[default]
    Idle,
    /// Active gameplay
    Playing,
    /// Simulation frozen
    Paused,
    /// Terminal flare playing, game over follows
    Exploding,
    /// Run ended, only restart is accepted
    GameOver,
    /// Boss defeated, only next level is accepted
    LevelComplete,
}

impl GamePhase {
    /// Whether the world clock advances in this phase
    pub fn runs_clock(self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::Exploding)
    }

    /// Phases in which the player craft must exist
    pub fn has_player(self) -> bool {
        matches!(
            self,
            GamePhase::Playing | GamePhase::Paused | GamePhase::Exploding
        )
    }
}

/// Why the last run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameOverReason {
    #[default]
    None,
    Border,
    Obstacle,
    TimeExpired,
}

/// Regular obstacle sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl SizeClass {
    pub fn radius(self) -> f32 {
        match self {
            SizeClass::Small => SMALL_RADIUS,
            SizeClass::Medium => MEDIUM_RADIUS,
            SizeClass::Large => LARGE_RADIUS,
        }
    }

    pub fn points(self) -> u64 {
        match self {
            SizeClass::Small => SMALL_POINTS,
            SizeClass::Medium => MEDIUM_POINTS,
            SizeClass::Large => LARGE_POINTS,
        }
    }
}

/// Obstacle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Regular { size: SizeClass },
    Boss { hits: u32, max_hits: u32 },
}

/// An obstacle entity
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    /// Pixels per second
    pub vel: Vec2,
    pub kind: ObstacleKind,
    /// Still sliding in from above; the top edge does not bounce it yet
    pub entering: bool,
}

impl Obstacle {
    pub fn radius(&self) -> f32 {
        match self.kind {
            ObstacleKind::Regular { size } => size.radius(),
            ObstacleKind::Boss { .. } => BOSS_RADIUS,
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, ObstacleKind::Boss { .. })
    }
}

/// A fired projectile
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Percent per second, fixed at spawn
    vel: Vec2,
    /// Facing angle at the fire instant
    pub facing_deg: f32,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, facing_deg: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            facing_deg,
        }
    }

    pub fn vel(&self) -> Vec2 {
        self.vel
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}

/// The player's craft
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    /// Degrees, 0 = up, clockwise positive
    pub facing_deg: f32,
    pub thrusting: bool,
    /// Seconds until the next shot may fire
    pub fire_cooldown: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            facing_deg: 0.0,
            thrusting: false,
            fire_cooldown: 0.0,
        }
    }
}

/// Flare strength for impact effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlareIntensity {
    Normal,
    Boss,
}

/// Discrete effect events for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    /// A projectile hit an obstacle
    ImpactFlare { pos: Vec2, intensity: FlareIntensity },
    /// The player craft was destroyed
    TerminalFlare { pos: Vec2, cause: GameOverReason },
    BossSpawned { pos: Vec2 },
    LevelCompleted { level: u32 },
    GameOver { reason: GameOverReason },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawner RNG
    pub rng: Pcg32,
    /// Playfield size in pixels
    pub field: Vec2,
    pub phase: GamePhase,
    pub game_over_reason: GameOverReason,
    /// 1-based level number
    pub level: u32,
    pub score: u64,
    pub destroyed_this_level: u32,
    /// Countdown for the current level (seconds)
    pub time_remaining: f32,
    /// Seconds the world clock has advanced
    pub elapsed: f64,
    /// Incremented on every run/level start; tags scheduled events
    pub attempt: u64,
    /// Attempt in which the boss was spawned
    pub boss_spawned_attempt: Option<u64>,
    /// Seconds until the next regular spawn
    pub spawn_cooldown: f32,
    pub player: Option<Player>,
    /// Sorted by id
    pub projectiles: Vec<Projectile>,
    /// Sorted by id
    pub obstacles: Vec<Obstacle>,
    pub timers: Timers,
    /// Effect events produced since the last drain
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl World {
    /// Create an idle world with the given seed and playfield size
    pub fn new(seed: u64, field: Vec2) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            field,
            phase: GamePhase::Idle,
            game_over_reason: GameOverReason::None,
            level: 1,
            score: 0,
            destroyed_this_level: 0,
            time_remaining: progression::duration_seconds(1),
            elapsed: 0.0,
            attempt: 0,
            boss_spawned_attempt: None,
            spawn_cooldown: 0.0,
            player: None,
            projectiles: Vec::new(),
            obstacles: Vec::new(),
            timers: Timers::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Start a fresh run at level 1 with zero score
    pub fn begin_run(&mut self) {
        self.level = 1;
        self.score = 0;
        self.start_level();
        log::info!("Run started (seed {})", self.seed);
    }

    /// Reset entities, timers and the countdown for the current level and start playing
    pub fn start_level(&mut self) {
        self.attempt += 1;
        self.timers.cancel_all();
        self.projectiles.clear();
        self.obstacles.clear();
        self.events.clear();
        self.player = Some(Player::default());
        self.destroyed_this_level = 0;
        self.boss_spawned_attempt = None;
        self.game_over_reason = GameOverReason::None;
        self.time_remaining = progression::duration_seconds(self.level);
        self.spawn_cooldown = 0.0;
        self.phase = GamePhase::Playing;
        log::info!(
            "Level {} started: target {}, {}s on the clock",
            self.level,
            progression::target_obstacle_count(self.level),
            self.time_remaining
        );
    }

    /// Begin the death sequence; later triggers are ignored until the next reset
    ///
    /// Returns true if this call started the sequence.
    pub fn trigger_game_over(&mut self, reason: GameOverReason) -> bool {
        if self.phase != GamePhase::Playing || reason == GameOverReason::None {
            log::debug!("Ignoring game over trigger {:?} in {:?}", reason, self.phase);
            return false;
        }

        let pos = self
            .player
            .as_ref()
            .map(|p| p.pos)
            .unwrap_or(Vec2::new(PLAYER_START_X, PLAYER_START_Y));
        if let Some(player) = self.player.as_mut() {
            player.thrusting = false;
        }

        self.phase = GamePhase::Exploding;
        self.game_over_reason = reason;
        self.timers.schedule(
            self.attempt,
            self.elapsed + f64::from(EXPLOSION_DURATION),
            ScheduledAction::FinishExplosion,
        );
        self.events.push(GameEvent::TerminalFlare { pos, cause: reason });
        log::info!("Player destroyed ({:?}) at level {}", reason, self.level);
        true
    }

    /// The live boss, if any
    pub fn boss(&self) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.is_boss())
    }

    pub fn boss_active(&self) -> bool {
        self.boss().is_some()
    }

    /// Whether the boss has already appeared during this attempt
    pub fn boss_spawned_this_attempt(&self) -> bool {
        self.boss_spawned_attempt == Some(self.attempt)
    }

    /// Regular (non-boss) obstacles alive
    pub fn regular_count(&self) -> usize {
        self.obstacles.iter().filter(|o| !o.is_boss()).count()
    }

    /// Take all pending effect events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Immutable view for the presentation layer
    pub fn snapshot(&self) -> WorldSnapshot {
        let (boss_hit_count, boss_max_hits) = match self.boss().map(|b| b.kind) {
            Some(ObstacleKind::Boss { hits, max_hits }) => (hits, max_hits),
            _ => (0, BOSS_MAX_HITS),
        };

        WorldSnapshot {
            phase: self.phase,
            game_over_reason: self.game_over_reason,
            score: self.score,
            level: self.level,
            time_remaining: self.time_remaining,
            destroyed_this_level: self.destroyed_this_level,
            target_obstacle_count: progression::target_obstacle_count(self.level),
            boss_active: self.boss_active(),
            boss_hit_count,
            boss_max_hits,
            field: self.field,
            player: self.player.as_ref().map(|p| PlayerView {
                pos: p.pos,
                facing_deg: p.facing_deg,
                thrusting: p.thrusting,
            }),
            projectiles: self
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    id: p.id,
                    pos: p.pos,
                    facing_deg: p.facing_deg,
                })
                .collect(),
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    pos: o.pos,
                    radius: o.radius(),
                    size: match o.kind {
                        ObstacleKind::Regular { size } => Some(size),
                        ObstacleKind::Boss { .. } => None,
                    },
                    is_boss: o.is_boss(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Vec2 {
        Vec2::new(DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT)
    }

    #[test]
    fn test_new_world_is_idle_without_player() {
        let world = World::new(7, field());
        assert_eq!(world.phase, GamePhase::Idle);
        assert!(world.player.is_none());
        assert_eq!(world.game_over_reason, GameOverReason::None);
    }

    #[test]
    fn test_begin_run_spawns_player() {
        let mut world = World::new(7, field());
        world.begin_run();
        assert_eq!(world.phase, GamePhase::Playing);
        assert!(world.player.is_some());
        assert_eq!(world.time_remaining, 30.0);
        assert_eq!(world.attempt, 1);
    }

    #[test]
    fn test_game_over_first_cause_wins() {
        let mut world = World::new(7, field());
        world.begin_run();
        assert!(world.trigger_game_over(GameOverReason::Border));
        assert!(!world.trigger_game_over(GameOverReason::Obstacle));
        assert_eq!(world.game_over_reason, GameOverReason::Border);
        assert_eq!(world.phase, GamePhase::Exploding);
        assert_eq!(world.timers.len(), 1);
        let flares = world
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::TerminalFlare { .. }))
            .count();
        assert_eq!(flares, 1);
    }

    #[test]
    fn test_start_level_cancels_timers() {
        let mut world = World::new(7, field());
        world.begin_run();
        world.trigger_game_over(GameOverReason::TimeExpired);
        world.begin_run();
        assert!(world.timers.is_empty());
        assert_eq!(world.game_over_reason, GameOverReason::None);
    }

    #[test]
    fn test_obstacle_radius_by_kind() {
        let small = Obstacle {
            id: 1,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            kind: ObstacleKind::Regular {
                size: SizeClass::Small,
            },
            entering: false,
        };
        let boss = Obstacle {
            kind: ObstacleKind::Boss {
                hits: 0,
                max_hits: BOSS_MAX_HITS,
            },
            ..small.clone()
        };
        assert_eq!(small.radius(), SMALL_RADIUS);
        assert_eq!(boss.radius(), BOSS_RADIUS);
        assert!(boss.is_boss() && !small.is_boss());
    }
}

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame delta only, no wall clock
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod geometry;
pub mod input;
pub mod progression;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timers;

pub use input::{InputCurve, JoystickVector, MovementCommand};
pub use progression::{HitOutcome, boss_threshold, duration_seconds, target_obstacle_count};
pub use snapshot::{ObstacleView, PlayerView, ProjectileView, WorldSnapshot};
pub use state::{
    FlareIntensity, GameEvent, GameOverReason, GamePhase, Obstacle, ObstacleKind, Player,
    Projectile, SizeClass, World,
};
pub use tick::{TickInput, tick};

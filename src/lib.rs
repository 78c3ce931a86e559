//! Star Dodger - a 2D arcade shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, progression, game state)
//! - `session`: Intent buffering and the frame clock that drives `sim::tick`
//! - `autopilot`: Demo-mode controller that plays from snapshots
//! - `settings`: Persisted player preferences (joystick sensitivity)

pub mod autopilot;
pub mod session;
pub mod settings;
pub mod sim;

pub use autopilot::Autopilot;
pub use session::{Frame, FrameClock, Session};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Nominal display refresh the headless runner simulates
    pub const NOMINAL_FRAME_DT: f32 = 1.0 / 60.0;
    /// Upper bound on a single frame's delta time (absorbs tab switches and stalls)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default playfield size in pixels
    pub const DEFAULT_FIELD_WIDTH: f32 = 800.0;
    pub const DEFAULT_FIELD_HEIGHT: f32 = 600.0;

    /// Player craft
    pub const PLAYER_RADIUS: f32 = 20.0;
    /// Base movement speed (px/s), scaled by the curved joystick speed factor
    pub const PLAYER_BASE_SPEED: f32 = 1200.0;
    /// Spawn position (percent)
    pub const PLAYER_START_X: f32 = 50.0;
    pub const PLAYER_START_Y: f32 = 80.0;

    /// Projectiles
    pub const PROJECTILE_SPEED: f32 = 700.0;
    pub const PROJECTILE_RADIUS: f32 = 4.0;
    /// Seconds between shots while the fire latch is held
    pub const FIRE_INTERVAL: f32 = 0.15;
    /// Projectiles are culled once they leave [inset, 100 - inset] (percent)
    pub const PROJECTILE_CULL_INSET: f32 = 1.0;

    /// Obstacle radii (px)
    pub const SMALL_RADIUS: f32 = 15.0;
    pub const MEDIUM_RADIUS: f32 = 25.0;
    pub const LARGE_RADIUS: f32 = 40.0;
    pub const BOSS_RADIUS: f32 = 70.0;

    /// Obstacle base speed (px/s) at level 1
    pub const OBSTACLE_BASE_SPEED: f32 = 120.0;
    /// Speed increase per level past the first (fraction of base)
    pub const LEVEL_SPEED_STEP: f32 = 0.15;
    /// Spawn direction spread around straight down (degrees)
    pub const SPAWN_SPREAD_DEG: f32 = 30.0;
    /// Seconds between regular spawns at level 1
    pub const OBSTACLE_SPAWN_INTERVAL: f32 = 1.1;
    /// Spawn interval never drops below this
    pub const MIN_SPAWN_INTERVAL: f32 = 0.4;
    /// Regular spawning pauses while this many obstacles are alive
    pub const MAX_ACTIVE_OBSTACLES: usize = 10;

    /// Boss
    pub const BOSS_SPEED_FACTOR: f32 = 0.6;
    pub const BOSS_MAX_HITS: u32 = 15;
    pub const BOSS_BONUS: u64 = 100;

    /// Points per regular obstacle by size class
    pub const SMALL_POINTS: u64 = 5;
    pub const MEDIUM_POINTS: u64 = 10;
    pub const LARGE_POINTS: u64 = 15;

    /// Obstacle-obstacle solver
    pub const SOLVER_PASSES: u32 = 3;
    /// Restitution applied to approaching pairs (< 1 loses energy)
    pub const IMPULSE_DAMPING: f32 = 0.8;
    /// Hard cap on a single impulse (px/s)
    pub const MAX_IMPULSE: f32 = 240.0;
    /// Per-axis cap on obstacle velocity (px/s)
    pub const MAX_OBSTACLE_SPEED: f32 = 420.0;
    /// Center distances below this (px) use the fallback normal
    pub const COINCIDENT_EPSILON: f32 = 1e-3;
    /// Penetration (px) the solver treats as resting contact
    pub const SEPARATION_SLOP: f32 = 1e-3;

    /// Overlap depth (fraction of the smaller radius) that turns a graze into a full hit
    pub const FULL_HIT_RATIO: f32 = 0.4;

    /// Duration of the exploding phase before game over (seconds)
    pub const EXPLOSION_DURATION: f32 = 0.8;
}

/// Convert a direction vector to a facing angle in degrees (0 = up, clockwise positive)
///
/// The result is in [0, 360).
#[inline]
pub fn direction_to_angle(dir: glam::Vec2) -> f32 {
    normalize_degrees(dir.x.atan2(-dir.y).to_degrees())
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_direction_to_angle() {
        assert!(direction_to_angle(Vec2::new(0.0, -1.0)).abs() < 1e-4);
        assert!((direction_to_angle(Vec2::new(1.0, 0.0)) - 90.0).abs() < 1e-4);
        assert!((direction_to_angle(Vec2::new(0.0, 1.0)) - 180.0).abs() < 1e-4);
        assert!((direction_to_angle(Vec2::new(-1.0, 0.0)) - 270.0).abs() < 1e-4);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(0.0), 0.0);
    }
}

//! Demo-mode controller
//!
//! Plays the game from snapshots alone, the same way a human would through
//! the joystick and fire button. Evades the most dangerous obstacle and the
//! borders; otherwise turns toward the nearest target and keeps firing.

use glam::Vec2;

use crate::consts::*;
use crate::direction_to_angle;
use crate::sim::geometry::angle_to_forward;
use crate::sim::{GamePhase, JoystickVector, ObstacleView, WorldSnapshot};

/// Gap (px) below which an approaching obstacle triggers evasion
const DANGER_GAP: f32 = 90.0;
/// Distance from an edge (px) where the autopilot steers back toward the center
const BORDER_MARGIN: f32 = 60.0;
/// Deflection used while evading
const EVADE_MAGNITUDE: f32 = 0.85;
/// Deflection that turns the craft while barely moving it
const AIM_MAGNITUDE: f32 = 0.3;
/// Facing error (degrees) under which the autopilot opens fire
const FIRE_CONE_DEG: f32 = 12.0;

/// What the autopilot wants to do this frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AutopilotIntent {
    pub movement: Option<JoystickVector>,
    pub firing: bool,
    /// Start or restart a run
    pub start: bool,
    pub next_level: bool,
}

/// Snapshot-driven demo player
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    frames: u64,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide the intents for the next frame
    pub fn intents(&mut self, snapshot: &WorldSnapshot) -> AutopilotIntent {
        self.frames += 1;

        match snapshot.phase {
            GamePhase::Idle | GamePhase::GameOver => {
                return AutopilotIntent {
                    start: true,
                    ..Default::default()
                };
            }
            GamePhase::LevelComplete => {
                return AutopilotIntent {
                    next_level: true,
                    ..Default::default()
                };
            }
            GamePhase::Paused | GamePhase::Exploding => return AutopilotIntent::default(),
            GamePhase::Playing => {}
        }

        let Some(player) = snapshot.player.as_ref() else {
            return AutopilotIntent::default();
        };
        let field = snapshot.field;
        let player_px = player.pos / 100.0 * field;

        // Walls first: a border touch is always fatal
        if let Some(away) = border_escape(player_px, field) {
            return AutopilotIntent {
                movement: Some(joystick(away, EVADE_MAGNITUDE)),
                firing: false,
                ..Default::default()
            };
        }

        // Most dangerous obstacle: smallest gap inside the danger zone
        let threat = snapshot
            .obstacles
            .iter()
            .filter_map(|o| {
                let gap = surface_gap(player_px, o, field);
                (gap < DANGER_GAP).then_some((gap, o))
            })
            .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        if let Some((_, obstacle)) = threat {
            let obstacle_px = obstacle.pos / 100.0 * field;
            let away = (player_px - obstacle_px).normalize_or_zero();
            // Sidestep with a slow wobble so repeated evasions do not loop
            let wobble = (self.frames as f32 * 0.05).sin() * 0.4;
            let dir = (away + away.perp() * wobble).normalize_or_zero();
            let dir = if dir == Vec2::ZERO { Vec2::NEG_Y } else { dir };
            return AutopilotIntent {
                movement: Some(joystick(dir, EVADE_MAGNITUDE)),
                firing: true,
                ..Default::default()
            };
        }

        // Prefer the boss, otherwise the nearest obstacle already on screen
        let target = snapshot
            .obstacles
            .iter()
            .filter(|o| o.pos.y >= 0.0)
            .min_by(|a, b| {
                let key = |o: &ObstacleView| {
                    let boss_first = if o.is_boss { 0.0 } else { 1.0e6 };
                    boss_first + ((o.pos / 100.0 * field) - player_px).length()
                };
                key(a)
                    .partial_cmp(&key(b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        let Some(target) = target else {
            // Nothing to shoot: drift back toward the start position
            let home = Vec2::new(PLAYER_START_X, PLAYER_START_Y) / 100.0 * field;
            let to_home = home - player_px;
            if to_home.length() < PLAYER_RADIUS {
                return AutopilotIntent::default();
            }
            return AutopilotIntent {
                movement: Some(joystick(to_home.normalize_or_zero(), 0.5)),
                ..Default::default()
            };
        };

        // Turn toward the target; fire once the nose is on it
        let target_px = target.pos / 100.0 * field;
        let aim = (target_px - player_px).normalize_or_zero();
        if aim == Vec2::ZERO {
            return AutopilotIntent::default();
        }

        let wanted = direction_to_angle(aim);
        let error = angle_difference(player.facing_deg, wanted);
        let forward = angle_to_forward(player.facing_deg);
        AutopilotIntent {
            movement: Some(joystick(aim, AIM_MAGNITUDE)),
            firing: error.abs() <= FIRE_CONE_DEG || forward.dot(aim) > 0.98,
            ..Default::default()
        }
    }
}

fn joystick(dir: Vec2, magnitude: f32) -> JoystickVector {
    JoystickVector::new(dir.x, dir.y, magnitude)
}

/// Gap in pixels between the player circle and an obstacle circle
fn surface_gap(player_px: Vec2, obstacle: &ObstacleView, field: Vec2) -> f32 {
    let obstacle_px = obstacle.pos / 100.0 * field;
    player_px.distance(obstacle_px) - PLAYER_RADIUS - obstacle.radius
}

/// Direction back toward the center when the player is close to any edge
fn border_escape(player_px: Vec2, field: Vec2) -> Option<Vec2> {
    let reach = PLAYER_RADIUS + BORDER_MARGIN;
    let near = player_px.x < reach
        || player_px.y < reach
        || player_px.x > field.x - reach
        || player_px.y > field.y - reach;
    if !near {
        return None;
    }
    let to_center = (field * 0.5 - player_px).normalize_or_zero();
    (to_center != Vec2::ZERO).then_some(to_center)
}

/// Signed shortest rotation from `from` to `to` in degrees, in [-180, 180)
fn angle_difference(from: f32, to: f32) -> f32 {
    (to - from + 180.0).rem_euclid(360.0) - 180.0
}

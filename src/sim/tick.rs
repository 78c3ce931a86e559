//! Per-frame simulation tick
//!
//! Core game loop that advances the world by one frame. Lifecycle intents are
//! applied first, then the phase decides what runs:
//! - `Playing`: the full step, in fixed order
//! - `Exploding`: only the world clock and scheduled events
//! - everything else: nothing

use super::collision::{find_lethal_obstacle, resolve_obstacle_pairs, resolve_projectile_hits};
use super::geometry::{
    angle_to_forward, clamp_to_bounds, clamp_to_sides, is_at_border, is_inside,
    pixel_velocity_to_percent, px_velocity_to_percent_delta, radius_in_percent,
    reflect_at_bounds, reflect_at_sides,
};
use super::input::{InputCurve, JoystickVector};
use super::progression::advance_level;
use super::spawn::update_spawning;
use super::state::{GameEvent, GameOverReason, GamePhase, Projectile, World};
use super::timers::ScheduledAction;
use crate::consts::*;
use crate::direction_to_angle;

/// Input commands for a single tick
///
/// `movement`, `firing` and `sensitivity` are held values; the remaining
/// flags are one-shot intents the driver clears after each tick.
#[derive(Debug, Clone)]
pub struct TickInput {
    /// Raw joystick vector, `None` when released
    pub movement: Option<JoystickVector>,
    /// Fire latch
    pub firing: bool,
    /// Joystick sensitivity in (0, 2]
    pub sensitivity: f32,
    /// Start a run (from idle) or restart (from game over)
    pub start: bool,
    pub pause: bool,
    pub resume: bool,
    pub next_level: bool,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            movement: None,
            firing: false,
            sensitivity: 1.0,
            start: false,
            pause: false,
            resume: false,
            next_level: false,
        }
    }
}

impl TickInput {
    /// Drop the one-shot intents after they have been applied
    pub fn clear_one_shots(&mut self) {
        self.start = false;
        self.pause = false;
        self.resume = false;
        self.next_level = false;
    }
}

/// Advance the world by one frame of `dt` seconds
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    apply_lifecycle_intents(world, input);

    match world.phase {
        GamePhase::Playing => {
            world.elapsed += f64::from(dt);
            step_playing(world, input, dt);
        }
        GamePhase::Exploding => {
            world.elapsed += f64::from(dt);
            run_timers(world);
        }
        GamePhase::Idle | GamePhase::Paused | GamePhase::GameOver | GamePhase::LevelComplete => {}
    }
}

/// Accept only the intents valid in the current phase
fn apply_lifecycle_intents(world: &mut World, input: &TickInput) {
    if input.start {
        match world.phase {
            GamePhase::Idle | GamePhase::GameOver => world.begin_run(),
            phase => log::debug!("Ignoring start in {:?}", phase),
        }
    }

    if input.next_level {
        match world.phase {
            GamePhase::LevelComplete => advance_level(world),
            phase => log::debug!("Ignoring next level in {:?}", phase),
        }
    }

    if input.pause && world.phase == GamePhase::Playing {
        world.phase = GamePhase::Paused;
        log::info!("Paused");
    } else if input.resume && world.phase == GamePhase::Paused {
        world.phase = GamePhase::Playing;
        log::info!("Resumed");
    }
}

/// Fire every scheduled event that is due for the current attempt
fn run_timers(world: &mut World) {
    for action in world.timers.take_due(world.elapsed, world.attempt) {
        match action {
            ScheduledAction::FinishExplosion => {
                if world.phase == GamePhase::Exploding {
                    world.phase = GamePhase::GameOver;
                    world.events.push(GameEvent::GameOver {
                        reason: world.game_over_reason,
                    });
                    log::info!(
                        "Game over ({:?}), final score {} on level {}",
                        world.game_over_reason,
                        world.score,
                        world.level
                    );
                }
            }
        }
    }
}

/// The full playing step; stops as soon as the phase changes
fn step_playing(world: &mut World, input: &TickInput, dt: f32) {
    update_timer(world, dt);
    if world.phase != GamePhase::Playing {
        return;
    }

    fire(world, input, dt);

    move_player(world, input, dt);
    if world.phase != GamePhase::Playing {
        return;
    }

    integrate_projectiles(world, dt);
    integrate_obstacles(world, dt);
    resolve_obstacle_pairs(&mut world.obstacles, world.field);
    confine_obstacles(world);

    resolve_projectile_hits(world);
    if world.phase != GamePhase::Playing {
        return;
    }

    check_player_hits(world);
    if world.phase != GamePhase::Playing {
        return;
    }

    update_spawning(world, dt);
}

/// Count down the level clock; running out ends the run
fn update_timer(world: &mut World, dt: f32) {
    world.time_remaining = (world.time_remaining - dt).max(0.0);
    if world.time_remaining <= 0.0 {
        world.trigger_game_over(GameOverReason::TimeExpired);
    }
}

/// Emit a projectile while the fire latch is held and the cooldown allows it
///
/// The projectile's velocity is computed here from the facing angle and the
/// current field size and never changes afterwards.
fn fire(world: &mut World, input: &TickInput, dt: f32) {
    let field = world.field;
    let Some(player) = world.player.as_mut() else {
        return;
    };

    player.fire_cooldown = (player.fire_cooldown - dt).max(0.0);
    if !input.firing || player.fire_cooldown > 0.0 {
        return;
    }
    player.fire_cooldown = FIRE_INTERVAL;

    let facing = player.facing_deg;
    let forward = angle_to_forward(facing);
    let muzzle = player.pos + pixel_velocity_to_percent(PLAYER_RADIUS, forward, field, 1.0);
    let vel = pixel_velocity_to_percent(PROJECTILE_SPEED, forward, field, 1.0);

    let id = world.next_entity_id();
    world.projectiles.push(Projectile::new(id, muzzle, vel, facing));
}

/// Apply the curved joystick input to the craft; touching the border is fatal
fn move_player(world: &mut World, input: &TickInput, dt: f32) {
    let field = world.field;
    let Some(player) = world.player.as_mut() else {
        return;
    };

    let command = input
        .movement
        .map(|raw| InputCurve::default().process(raw, input.sensitivity))
        .unwrap_or_default();

    player.thrusting = command.is_moving();
    if command.is_moving() {
        player.facing_deg = direction_to_angle(command.direction);
        player.pos += pixel_velocity_to_percent(
            PLAYER_BASE_SPEED * command.speed_factor,
            command.direction,
            field,
            dt,
        );
    }

    if is_at_border(player.pos, field, PLAYER_RADIUS) {
        world.trigger_game_over(GameOverReason::Border);
    }
}

/// Move projectiles along their fixed velocity and cull those that leave the inset region
fn integrate_projectiles(world: &mut World, dt: f32) {
    let lo = PROJECTILE_CULL_INSET;
    let hi = 100.0 - PROJECTILE_CULL_INSET;
    for projectile in &mut world.projectiles {
        projectile.advance(dt);
    }
    world
        .projectiles
        .retain(|p| p.pos.x >= lo && p.pos.x <= hi && p.pos.y >= lo && p.pos.y <= hi);
}

/// Move obstacles and bounce them off the field edges
///
/// Obstacles still entering from above only bounce off the sides and bottom
/// until they are fully inside.
fn integrate_obstacles(world: &mut World, dt: f32) {
    let field = world.field;
    for obstacle in &mut world.obstacles {
        let radius = obstacle.radius();
        let pos = obstacle.pos + px_velocity_to_percent_delta(obstacle.vel, field, dt);

        let (pos, vel) = if obstacle.entering {
            let (pos, mut vel) = reflect_at_sides(pos, obstacle.vel, field, radius);
            // Never drift back out through the top while entering
            if vel.y < 0.0 && pos.y < radius_in_percent(radius, field).y {
                vel.y = -vel.y;
            }
            (pos, vel)
        } else {
            reflect_at_bounds(pos, obstacle.vel, field, radius)
        };

        obstacle.pos = pos;
        obstacle.vel = vel;
        if obstacle.entering && is_inside(pos, field, radius) {
            obstacle.entering = false;
        }
    }
}

/// Pull obstacles the pair solver pushed past an edge back inside
///
/// Velocities are left alone; the next integration bounces them if needed.
fn confine_obstacles(world: &mut World) {
    let field = world.field;
    for obstacle in &mut world.obstacles {
        let radius = obstacle.radius();
        obstacle.pos = if obstacle.entering {
            clamp_to_sides(obstacle.pos, field, radius)
        } else {
            clamp_to_bounds(obstacle.pos, field, radius)
        };
    }
}

/// Game over if any obstacle lands a full hit on the player
fn check_player_hits(world: &mut World) {
    let Some(player) = world.player.as_ref() else {
        return;
    };
    if let Some(index) = find_lethal_obstacle(player, &world.obstacles, world.field) {
        log::debug!("Full hit from obstacle {}", world.obstacles[index].id);
        world.trigger_game_over(GameOverReason::Obstacle);
    }
}

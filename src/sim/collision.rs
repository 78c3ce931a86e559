//! Collision detection and response
//!
//! Everything is a circle. Positions are converted to pixels with the current
//! playfield size before distances are compared, so overlap tests agree with
//! what is drawn on screen regardless of aspect ratio.

use glam::Vec2;

use super::geometry::{percent_to_px, px_to_percent, sanitize_velocity};
use super::progression::register_hit;
use super::state::{GamePhase, Obstacle, Player, World};
use crate::consts::*;

/// Overlap between two circles (pixel space)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Center distance
    pub distance: f32,
    /// Sum of radii minus distance (positive while overlapping)
    pub depth: f32,
    /// Unit vector from the first circle toward the second
    pub normal: Vec2,
}

/// Check two circles given in percent space with pixel radii
///
/// Returns `None` when they do not overlap.
pub fn circle_contact(a: Vec2, ra: f32, b: Vec2, rb: f32, field: Vec2) -> Option<Contact> {
    let delta = percent_to_px(b, field) - percent_to_px(a, field);
    let distance = delta.length();
    let depth = ra + rb - distance;
    if depth <= 0.0 {
        return None;
    }
    let normal = if distance < COINCIDENT_EPSILON {
        Vec2::X
    } else {
        delta / distance
    };
    Some(Contact {
        distance,
        depth,
        normal,
    })
}

/// Whether the player/obstacle overlap is deep enough to be lethal
///
/// Shallow edge contact is forgiven; the overlap must reach
/// `FULL_HIT_RATIO` of the smaller radius.
pub fn is_full_hit(
    player_pos: Vec2,
    player_r: f32,
    obs_pos: Vec2,
    obs_r: f32,
    field: Vec2,
) -> bool {
    match circle_contact(player_pos, player_r, obs_pos, obs_r, field) {
        Some(contact) => contact.depth >= FULL_HIT_RATIO * player_r.min(obs_r),
        None => false,
    }
}

/// First obstacle (by id order) that lands a full hit on the player
pub fn find_lethal_obstacle(player: &Player, obstacles: &[Obstacle], field: Vec2) -> Option<usize> {
    obstacles
        .iter()
        .position(|o| is_full_hit(player.pos, PLAYER_RADIUS, o.pos, o.radius(), field))
}

/// Push overlapping obstacles apart and bounce approaching pairs
///
/// Runs a fixed number of passes over every unordered pair. Each overlapping
/// pair is separated by half the penetration on each side; pairs that are
/// closing get a damped impulse capped at `MAX_IMPULSE`. Velocities are
/// sanitized after every contact so a bad frame can never blow up.
pub fn resolve_obstacle_pairs(obstacles: &mut [Obstacle], field: Vec2) {
    if obstacles.len() < 2 {
        return;
    }

    for _pass in 0..SOLVER_PASSES {
        let mut any_overlap = false;

        for i in 0..obstacles.len() {
            for j in (i + 1)..obstacles.len() {
                let (left, right) = obstacles.split_at_mut(j);
                let a = &mut left[i];
                let b = &mut right[0];

                let Some(contact) = circle_contact(a.pos, a.radius(), b.pos, b.radius(), field)
                else {
                    continue;
                };
                // Pairs left touching by float round-off from a previous pass
                if contact.depth <= SEPARATION_SLOP {
                    continue;
                }
                any_overlap = true;

                // Separate along the normal, half each
                let push = contact.normal * (contact.depth * 0.5);
                a.pos = px_to_percent(percent_to_px(a.pos, field) - push, field);
                b.pos = px_to_percent(percent_to_px(b.pos, field) + push, field);

                // Relative velocity along the normal; negative means closing
                let closing = (b.vel - a.vel).dot(contact.normal);
                if closing < 0.0 {
                    let impulse = (-(1.0 + IMPULSE_DAMPING) * closing * 0.5).min(MAX_IMPULSE);
                    a.vel -= contact.normal * impulse;
                    b.vel += contact.normal * impulse;
                }

                a.vel = sanitize_velocity(a.vel, MAX_OBSTACLE_SPEED);
                b.vel = sanitize_velocity(b.vel, MAX_OBSTACLE_SPEED);
                if !a.pos.is_finite() || !b.pos.is_finite() {
                    log::warn!("Non-finite obstacle position after separation, recentering");
                    if !a.pos.is_finite() {
                        a.pos = Vec2::splat(50.0);
                    }
                    if !b.pos.is_finite() {
                        b.pos = Vec2::splat(50.0);
                    }
                }
            }
        }

        if !any_overlap {
            break;
        }
    }
}

/// Consume projectiles that touch an obstacle and apply the hits
///
/// Projectiles are processed in id order; each one hits at most one obstacle
/// (the first in id order that it overlaps). Processing stops early if a hit
/// completes the level.
pub fn resolve_projectile_hits(world: &mut World) {
    let field = world.field;
    let mut i = 0;
    while i < world.projectiles.len() {
        let pos = world.projectiles[i].pos;
        let hit = world
            .obstacles
            .iter()
            .position(|o| {
                circle_contact(pos, PROJECTILE_RADIUS, o.pos, o.radius(), field).is_some()
            });

        match hit {
            Some(index) => {
                world.projectiles.remove(i);
                register_hit(world, index, pos);
                if world.phase != GamePhase::Playing {
                    break;
                }
            }
            None => i += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{ObstacleKind, Projectile, SizeClass};
    use proptest::prelude::*;

    const FIELD: Vec2 = Vec2::new(800.0, 600.0);

    fn obstacle(id: u32, pos: Vec2, vel: Vec2, size: SizeClass) -> Obstacle {
        Obstacle {
            id,
            pos,
            vel,
            kind: ObstacleKind::Regular { size },
            entering: false,
        }
    }

    /// Percent position `dx_px` pixels to the right of (50, 50)
    fn offset_px(dx_px: f32) -> Vec2 {
        Vec2::new(50.0 + dx_px / FIELD.x * 100.0, 50.0)
    }

    #[test]
    fn test_circle_contact_uses_pixels() {
        // 10% of width is 80 px, 10% of height is 60 px
        let a = Vec2::new(50.0, 50.0);
        assert!(circle_contact(a, 45.0, Vec2::new(60.0, 50.0), 40.0, FIELD).is_some());
        assert!(circle_contact(a, 39.0, Vec2::new(60.0, 50.0), 40.0, FIELD).is_none());
        assert!(circle_contact(a, 30.0, Vec2::new(50.0, 60.0), 31.0, FIELD).is_some());
        assert!(circle_contact(a, 30.0, Vec2::new(50.0, 60.0), 29.0, FIELD).is_none());
    }

    #[test]
    fn test_full_hit_threshold_boundary() {
        // Player 20 px, small obstacle 15 px: threshold depth = 0.4 * 15 = 6 px
        let player = Vec2::new(50.0, 50.0);
        let sum = PLAYER_RADIUS + SMALL_RADIUS;
        let threshold = FULL_HIT_RATIO * SMALL_RADIUS;

        let graze = offset_px(sum - threshold + 0.05);
        assert!(circle_contact(player, PLAYER_RADIUS, graze, SMALL_RADIUS, FIELD).is_some());
        assert!(!is_full_hit(player, PLAYER_RADIUS, graze, SMALL_RADIUS, FIELD));

        let deep = offset_px(sum - threshold - 0.05);
        assert!(is_full_hit(player, PLAYER_RADIUS, deep, SMALL_RADIUS, FIELD));
    }

    #[test]
    fn test_full_hit_uses_smaller_radius() {
        // Against the boss the player's own radius sets the threshold (8 px)
        let player = Vec2::new(50.0, 50.0);
        let sum = PLAYER_RADIUS + BOSS_RADIUS;
        let shallow = offset_px(sum - 7.0);
        let deep = offset_px(sum - 9.0);
        assert!(!is_full_hit(player, PLAYER_RADIUS, shallow, BOSS_RADIUS, FIELD));
        assert!(is_full_hit(player, PLAYER_RADIUS, deep, BOSS_RADIUS, FIELD));
    }

    #[test]
    fn test_coincident_obstacles_separate() {
        let pos = Vec2::new(40.0, 40.0);
        let mut obstacles = vec![
            obstacle(1, pos, Vec2::new(0.0, 100.0), SizeClass::Medium),
            obstacle(2, pos, Vec2::new(0.0, 100.0), SizeClass::Large),
        ];
        resolve_obstacle_pairs(&mut obstacles, FIELD);

        let a = percent_to_px(obstacles[0].pos, FIELD);
        let b = percent_to_px(obstacles[1].pos, FIELD);
        let sum = MEDIUM_RADIUS + LARGE_RADIUS;
        assert!(a.distance(b) >= sum - 1e-3);
        // Fallback normal is horizontal
        assert!((a.y - b.y).abs() < 1e-3);
        for o in &obstacles {
            assert!(o.vel.is_finite());
        }
    }

    #[test]
    fn test_approaching_pair_bounces() {
        let mut obstacles = vec![
            obstacle(1, offset_px(-10.0), Vec2::new(100.0, 0.0), SizeClass::Small),
            obstacle(2, offset_px(10.0), Vec2::new(-100.0, 0.0), SizeClass::Small),
        ];
        resolve_obstacle_pairs(&mut obstacles, FIELD);
        assert!(obstacles[0].vel.x < 0.0);
        assert!(obstacles[1].vel.x > 0.0);
        // Damped: total speed drops
        assert!(obstacles[0].vel.x.abs() < 100.0);
    }

    #[test]
    fn test_separating_pair_keeps_velocity() {
        let mut obstacles = vec![
            obstacle(1, offset_px(-10.0), Vec2::new(-50.0, 0.0), SizeClass::Small),
            obstacle(2, offset_px(10.0), Vec2::new(50.0, 0.0), SizeClass::Small),
        ];
        resolve_obstacle_pairs(&mut obstacles, FIELD);
        assert_eq!(obstacles[0].vel, Vec2::new(-50.0, 0.0));
        assert_eq!(obstacles[1].vel, Vec2::new(50.0, 0.0));
    }

    #[test]
    fn test_impulse_is_clamped() {
        let mut obstacles = vec![
            obstacle(1, offset_px(-5.0), Vec2::new(400.0, 0.0), SizeClass::Small),
            obstacle(2, offset_px(5.0), Vec2::new(-400.0, 0.0), SizeClass::Small),
        ];
        resolve_obstacle_pairs(&mut obstacles, FIELD);
        // Unclamped impulse would be 0.9 * 800 = 720
        assert!((obstacles[0].vel.x - (400.0 - MAX_IMPULSE)).abs() < 1e-3);
        for o in &obstacles {
            assert!(o.vel.x.abs() <= MAX_OBSTACLE_SPEED);
        }
    }

    #[test]
    fn test_projectile_hit_consumes_and_scores() {
        let mut world = World::new(1, FIELD);
        world.begin_run();
        world.obstacles.push(obstacle(10, Vec2::new(50.0, 30.0), Vec2::ZERO, SizeClass::Large));
        world
            .projectiles
            .push(Projectile::new(11, Vec2::new(50.0, 34.0), Vec2::ZERO, 0.0));
        world
            .projectiles
            .push(Projectile::new(12, Vec2::new(10.0, 90.0), Vec2::ZERO, 0.0));

        resolve_projectile_hits(&mut world);
        assert!(world.obstacles.is_empty());
        assert_eq!(world.projectiles.len(), 1);
        assert_eq!(world.projectiles[0].id, 12);
        assert_eq!(world.score, LARGE_POINTS);
        assert_eq!(world.destroyed_this_level, 1);
    }

    #[test]
    fn test_second_projectile_passes_destroyed_obstacle() {
        let mut world = World::new(1, FIELD);
        world.begin_run();
        world.obstacles.push(obstacle(10, Vec2::new(50.0, 30.0), Vec2::ZERO, SizeClass::Small));
        world
            .projectiles
            .push(Projectile::new(11, Vec2::new(50.0, 30.0), Vec2::ZERO, 0.0));
        world
            .projectiles
            .push(Projectile::new(12, Vec2::new(50.0, 31.0), Vec2::ZERO, 0.0));

        resolve_projectile_hits(&mut world);
        assert_eq!(world.destroyed_this_level, 1);
        assert_eq!(world.projectiles.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_pair_resolution_stays_finite(
            ax in 0.0f32..100.0, ay in 0.0f32..100.0,
            bx in 0.0f32..100.0, by in 0.0f32..100.0,
            avx in -2000.0f32..2000.0, avy in -2000.0f32..2000.0,
            bvx in -2000.0f32..2000.0, bvy in -2000.0f32..2000.0,
        ) {
            let mut obstacles = vec![
                obstacle(1, Vec2::new(ax, ay), Vec2::new(avx, avy), SizeClass::Large),
                obstacle(2, Vec2::new(bx, by), Vec2::new(bvx, bvy), SizeClass::Medium),
                obstacle(3, Vec2::new(ax, ay), Vec2::new(bvx, avy), SizeClass::Small),
            ];
            resolve_obstacle_pairs(&mut obstacles, FIELD);
            for o in &obstacles {
                prop_assert!(o.pos.is_finite());
                prop_assert!(o.vel.is_finite());
            }
        }
    }
}

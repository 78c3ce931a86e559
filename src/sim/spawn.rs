//! Obstacle and boss spawning
//!
//! Regular obstacles enter from above the top edge with a randomized size,
//! column and heading. The boss appears once per level attempt when the
//! destroyed count reaches the level's threshold; regular spawning stops from
//! that point on.

use glam::Vec2;
use rand::Rng;

use super::geometry::radius_in_percent;
use super::progression::{boss_threshold, level_speed_scale};
use super::state::{GameEvent, Obstacle, ObstacleKind, SizeClass, World};
use crate::consts::*;

/// Cumulative spawn weights: 50% small, 30% medium, 20% large
const SIZE_TABLE: [(f32, SizeClass); 3] = [
    (0.5, SizeClass::Small),
    (0.8, SizeClass::Medium),
    (1.0, SizeClass::Large),
];

/// Draw a size class from the weighted table
pub fn roll_size_class<R: Rng>(rng: &mut R) -> SizeClass {
    let roll: f32 = rng.random();
    SIZE_TABLE
        .iter()
        .find(|(limit, _)| roll < *limit)
        .map(|&(_, size)| size)
        .unwrap_or(SizeClass::Large)
}

/// Base obstacle speed for a level (px/s)
pub fn obstacle_speed(level: u32) -> f32 {
    OBSTACLE_BASE_SPEED * level_speed_scale(level)
}

/// Seconds between regular spawns
pub fn spawn_interval(level: u32) -> f32 {
    (OBSTACLE_SPAWN_INTERVAL / level_speed_scale(level)).max(MIN_SPAWN_INTERVAL)
}

/// Build a regular obstacle just above the top edge
pub fn spawn_obstacle<R: Rng>(rng: &mut R, id: u32, level: u32, field: Vec2) -> Obstacle {
    let size = roll_size_class(rng);
    let radius = size.radius();
    let r = radius_in_percent(radius, field);

    let x = if r.x < 50.0 {
        rng.random_range(r.x..=100.0 - r.x)
    } else {
        50.0
    };
    let heading = rng
        .random_range(-SPAWN_SPREAD_DEG..=SPAWN_SPREAD_DEG)
        .to_radians();
    // Straight down is +y; positive heading leans right
    let dir = Vec2::new(heading.sin(), heading.cos());

    Obstacle {
        id,
        pos: Vec2::new(x, -r.y),
        vel: dir * obstacle_speed(level),
        kind: ObstacleKind::Regular { size },
        entering: true,
    }
}

/// Build the level boss, centered above the field and heading straight down
pub fn spawn_boss(id: u32, level: u32, field: Vec2) -> Obstacle {
    let r = radius_in_percent(BOSS_RADIUS, field);
    Obstacle {
        id,
        pos: Vec2::new(50.0, -r.y),
        vel: Vec2::new(0.0, obstacle_speed(level) * BOSS_SPEED_FACTOR),
        kind: ObstacleKind::Boss {
            hits: 0,
            max_hits: BOSS_MAX_HITS,
        },
        entering: true,
    }
}

/// Spawn/progression step of the tick
pub fn update_spawning(world: &mut World, dt: f32) {
    if world.boss_spawned_this_attempt() {
        return;
    }

    if world.destroyed_this_level >= boss_threshold(world.level) {
        let id = world.next_entity_id();
        let boss = spawn_boss(id, world.level, world.field);
        world.events.push(GameEvent::BossSpawned { pos: boss.pos });
        world.obstacles.push(boss);
        world.boss_spawned_attempt = Some(world.attempt);
        log::info!("Boss spawned for level {}", world.level);
        return;
    }

    world.spawn_cooldown -= dt;
    if world.spawn_cooldown > 0.0 {
        return;
    }
    if world.regular_count() >= MAX_ACTIVE_OBSTACLES {
        // Hold the slot open; spawn as soon as one is freed
        world.spawn_cooldown = 0.0;
        return;
    }

    let id = world.next_entity_id();
    let (level, field) = (world.level, world.field);
    let obstacle = spawn_obstacle(&mut world.rng, id, level, field);
    world.obstacles.push(obstacle);
    world.spawn_cooldown = spawn_interval(level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field() -> Vec2 {
        Vec2::new(DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT)
    }

    #[test]
    fn test_size_distribution() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut counts = [0u32; 3];
        for _ in 0..10_000 {
            match roll_size_class(&mut rng) {
                SizeClass::Small => counts[0] += 1,
                SizeClass::Medium => counts[1] += 1,
                SizeClass::Large => counts[2] += 1,
            }
        }
        assert!((4700..5300).contains(&counts[0]), "small: {}", counts[0]);
        assert!((2700..3300).contains(&counts[1]), "medium: {}", counts[1]);
        assert!((1700..2300).contains(&counts[2]), "large: {}", counts[2]);
    }

    #[test]
    fn test_spawn_heading_within_spread() {
        let mut rng = Pcg32::seed_from_u64(9);
        for level in 1..6 {
            for id in 0..200 {
                let o = spawn_obstacle(&mut rng, id, level, field());
                let speed = o.vel.length();
                assert!((speed - obstacle_speed(level)).abs() < 1e-3);
                // Angle from straight down
                let angle = o.vel.x.atan2(o.vel.y).to_degrees();
                assert!(angle.abs() <= SPAWN_SPREAD_DEG + 1e-3);
                assert!(o.pos.y < 0.0);
                assert!(o.pos.x > 0.0 && o.pos.x < 100.0);
                assert!(o.entering);
            }
        }
    }

    #[test]
    fn test_obstacle_speed_scales_with_level() {
        assert_eq!(obstacle_speed(1), OBSTACLE_BASE_SPEED);
        assert!((obstacle_speed(3) - OBSTACLE_BASE_SPEED * 1.3).abs() < 1e-3);
    }

    #[test]
    fn test_boss_spawn() {
        let boss = spawn_boss(1, 2, field());
        assert_eq!(boss.pos.x, 50.0);
        assert!(boss.vel.x == 0.0 && boss.vel.y > 0.0);
        assert!((boss.vel.y - obstacle_speed(2) * BOSS_SPEED_FACTOR).abs() < 1e-3);
        assert!(matches!(
            boss.kind,
            ObstacleKind::Boss { hits: 0, max_hits: BOSS_MAX_HITS }
        ));
    }

    #[test]
    fn test_boss_spawns_once_per_attempt() {
        let mut world = World::new(3, field());
        world.begin_run();
        world.destroyed_this_level = 5;
        update_spawning(&mut world, 0.016);
        assert!(world.boss_active());
        update_spawning(&mut world, 0.016);
        let bosses = world.obstacles.iter().filter(|o| o.is_boss()).count();
        assert_eq!(bosses, 1);

        // Even with the boss gone, the same attempt never spawns another
        world.obstacles.clear();
        update_spawning(&mut world, 5.0);
        assert!(world.obstacles.is_empty());
    }

    #[test]
    fn test_regular_spawning_respects_cap() {
        let mut world = World::new(3, field());
        world.begin_run();
        for _ in 0..100 {
            update_spawning(&mut world, 1.0);
        }
        assert_eq!(world.regular_count(), MAX_ACTIVE_OBSTACLES);
    }
}

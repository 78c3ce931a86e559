//! Level arithmetic, scoring and hit bookkeeping

use glam::Vec2;

use super::state::{FlareIntensity, GameEvent, GamePhase, ObstacleKind, World};
use crate::consts::*;

/// Obstacles to destroy before the boss appears
pub fn target_obstacle_count(level: u32) -> u32 {
    5 * level.max(1)
}

/// Countdown length for a level in seconds
pub fn duration_seconds(level: u32) -> f32 {
    30.0 + 5.0 * (level.max(1) - 1) as f32
}

/// Destroyed count that summons the boss
pub fn boss_threshold(level: u32) -> u32 {
    match level {
        0 | 1 => 5,
        2 => 10,
        n => 5 + 5 * (n - 1),
    }
}

/// Speed multiplier applied to everything that moves on its own
pub fn level_speed_scale(level: u32) -> f32 {
    1.0 + LEVEL_SPEED_STEP * (level.max(1) - 1) as f32
}

/// Result of landing a projectile on an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    Destroyed { points: u64 },
    BossDamaged { hits: u32, max_hits: u32 },
    BossDefeated { bonus: u64 },
}

/// Apply a projectile hit to the obstacle at `index`
///
/// Regular obstacles are removed and scored. The boss takes one hit; its last
/// hit removes it, awards the bonus and completes the level.
pub fn register_hit(world: &mut World, index: usize, impact: Vec2) -> HitOutcome {
    let outcome = match &mut world.obstacles[index].kind {
        ObstacleKind::Regular { size } => HitOutcome::Destroyed {
            points: size.points(),
        },
        ObstacleKind::Boss { hits, max_hits } => {
            *hits += 1;
            if *hits >= *max_hits {
                HitOutcome::BossDefeated { bonus: BOSS_BONUS }
            } else {
                HitOutcome::BossDamaged {
                    hits: *hits,
                    max_hits: *max_hits,
                }
            }
        }
    };

    match outcome {
        HitOutcome::Destroyed { points } => {
            world.obstacles.remove(index);
            world.score += points;
            world.destroyed_this_level += 1;
            world.events.push(GameEvent::ImpactFlare {
                pos: impact,
                intensity: FlareIntensity::Normal,
            });
            log::debug!(
                "Obstacle destroyed (+{}), {}/{} this level",
                points,
                world.destroyed_this_level,
                target_obstacle_count(world.level)
            );
        }
        HitOutcome::BossDamaged { hits, max_hits } => {
            world.events.push(GameEvent::ImpactFlare {
                pos: impact,
                intensity: FlareIntensity::Boss,
            });
            log::debug!("Boss hit {}/{}", hits, max_hits);
        }
        HitOutcome::BossDefeated { bonus } => {
            let boss = world.obstacles.remove(index);
            world.score += bonus;
            world.phase = GamePhase::LevelComplete;
            world.events.push(GameEvent::ImpactFlare {
                pos: boss.pos,
                intensity: FlareIntensity::Boss,
            });
            world.events.push(GameEvent::LevelCompleted { level: world.level });
            log::info!(
                "Boss defeated, level {} complete (score {})",
                world.level,
                world.score
            );
        }
    }

    outcome
}

/// Move to the next level, keeping the score
pub fn advance_level(world: &mut World) {
    world.level += 1;
    world.start_level();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Obstacle, SizeClass};

    fn world() -> World {
        let mut world = World::new(1, Vec2::new(DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT));
        world.begin_run();
        world
    }

    fn push(world: &mut World, kind: ObstacleKind) {
        let id = world.next_entity_id();
        world.obstacles.push(Obstacle {
            id,
            pos: Vec2::new(50.0, 30.0),
            vel: Vec2::ZERO,
            kind,
            entering: false,
        });
    }

    #[test]
    fn test_level_arithmetic() {
        assert_eq!(target_obstacle_count(1), 5);
        assert_eq!(target_obstacle_count(3), 15);
        assert_eq!(duration_seconds(1), 30.0);
        assert_eq!(duration_seconds(3), 40.0);
        assert_eq!(boss_threshold(1), 5);
        assert_eq!(boss_threshold(2), 10);
        assert_eq!(boss_threshold(4), 20);
        for level in 1..20 {
            assert!(target_obstacle_count(level + 1) > target_obstacle_count(level));
            assert!(duration_seconds(level + 1) > duration_seconds(level));
            assert_eq!(boss_threshold(level), target_obstacle_count(level));
        }
    }

    #[test]
    fn test_points_by_size() {
        let mut w = world();
        for size in [SizeClass::Small, SizeClass::Medium, SizeClass::Large] {
            push(&mut w, ObstacleKind::Regular { size });
        }
        register_hit(&mut w, 0, Vec2::ZERO);
        register_hit(&mut w, 0, Vec2::ZERO);
        register_hit(&mut w, 0, Vec2::ZERO);
        assert_eq!(w.score, 5 + 10 + 15);
        assert_eq!(w.destroyed_this_level, 3);
        assert!(w.obstacles.is_empty());
    }

    #[test]
    fn test_boss_needs_all_hits() {
        let mut w = world();
        push(
            &mut w,
            ObstacleKind::Boss {
                hits: 0,
                max_hits: 3,
            },
        );
        assert_eq!(
            register_hit(&mut w, 0, Vec2::ZERO),
            HitOutcome::BossDamaged { hits: 1, max_hits: 3 }
        );
        register_hit(&mut w, 0, Vec2::ZERO);
        assert!(w.boss_active());
        assert_eq!(
            register_hit(&mut w, 0, Vec2::ZERO),
            HitOutcome::BossDefeated { bonus: BOSS_BONUS }
        );
        assert!(!w.boss_active());
        assert_eq!(w.phase, GamePhase::LevelComplete);
        assert_eq!(w.score, BOSS_BONUS);
        // Boss kills do not count toward the destroyed tally
        assert_eq!(w.destroyed_this_level, 0);
    }

    #[test]
    fn test_advance_level_keeps_score() {
        let mut w = world();
        w.score = 120;
        w.destroyed_this_level = 5;
        advance_level(&mut w);
        assert_eq!(w.level, 2);
        assert_eq!(w.score, 120);
        assert_eq!(w.destroyed_this_level, 0);
        assert_eq!(w.time_remaining, 35.0);
        assert_eq!(w.phase, GamePhase::Playing);
    }
}

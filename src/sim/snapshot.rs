//! Read-only world view handed to the presentation layer once per tick

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GameOverReason, GamePhase, SizeClass};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub pos: Vec2,
    pub facing_deg: f32,
    pub thrusting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectileView {
    pub id: u32,
    pub pos: Vec2,
    pub facing_deg: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObstacleView {
    pub id: u32,
    pub pos: Vec2,
    /// Pixels
    pub radius: f32,
    /// `None` for the boss
    pub size: Option<SizeClass>,
    pub is_boss: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    pub phase: GamePhase,
    pub game_over_reason: GameOverReason,
    pub score: u64,
    pub level: u32,
    pub time_remaining: f32,
    pub destroyed_this_level: u32,
    pub target_obstacle_count: u32,
    pub boss_active: bool,
    pub boss_hit_count: u32,
    pub boss_max_hits: u32,
    /// Playfield size in pixels
    pub field: Vec2,
    pub player: Option<PlayerView>,
    pub projectiles: Vec<ProjectileView>,
    pub obstacles: Vec<ObstacleView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_json_is_camel_case() {
        let snapshot = WorldSnapshot {
            phase: GamePhase::Playing,
            game_over_reason: GameOverReason::None,
            score: 0,
            level: 1,
            time_remaining: 30.0,
            destroyed_this_level: 0,
            target_obstacle_count: 5,
            boss_active: true,
            boss_hit_count: 0,
            boss_max_hits: 15,
            field: Vec2::new(800.0, 600.0),
            player: Some(PlayerView {
                pos: Vec2::new(50.0, 80.0),
                facing_deg: 0.0,
                thrusting: false,
            }),
            projectiles: vec![ProjectileView {
                id: 2,
                pos: Vec2::new(50.0, 70.0),
                facing_deg: 0.0,
            }],
            obstacles: vec![ObstacleView {
                id: 1,
                pos: Vec2::new(50.0, 10.0),
                radius: 70.0,
                size: None,
                is_boss: true,
            }],
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["bossActive"], true);
        assert_eq!(json["player"]["facingDeg"], 0.0);
        assert_eq!(json["projectiles"][0]["facingDeg"], 0.0);
        assert_eq!(json["obstacles"][0]["isBoss"], true);
        assert!(json["obstacles"][0].get("is_boss").is_none());

        let back: WorldSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }
}

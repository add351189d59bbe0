//! The static arena: obstacle polygons and spawn points.
//!
//! Loaded once at server startup from a JSON document and treated as
//! immutable for the lifetime of the process.

use crate::geometry::Point;
use crate::player::Player;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// A single static obstacle. Obstacles flagged `blocks_projectiles` also
/// stop projectiles (walls); the rest only block tank movement (e.g.
/// decorative or low cover).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub points: Vec<Point>,
    pub blocks_projectiles: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Map {
    pub obstacles: Vec<Obstacle>,
    pub spawn_points: Vec<Point>,
}

impl Map {
    pub fn new(obstacles: Vec<Obstacle>, spawn_points: Vec<Point>) -> Self {
        Map {
            obstacles,
            spawn_points,
        }
    }

    /// Parses a map from its JSON representation (see `SPEC_FULL.md` §AMB.7
    /// for the schema: an array of obstacles plus a spawn-point list).
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    pub fn projectile_blocking_obstacles(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(|o| o.blocks_projectiles)
    }

    /// Picks a spawn point unoccupied by any live player, falling back to a
    /// uniform choice over all spawns if every spawn is currently occupied.
    /// (SPEC_FULL.md §9 Open Question 3: the original implementation did not
    /// reliably enforce this; this port does.)
    pub fn random_spawn(&self, players: &[&Player]) -> Point {
        const OCCUPIED_RADIUS: f32 = 10.0;
        let mut rng = rand::thread_rng();
        let free: Vec<&Point> = self
            .spawn_points
            .iter()
            .filter(|spawn| {
                !players
                    .iter()
                    .any(|p| p.is_alive() && spawn.within_distance_of(OCCUPIED_RADIUS, &p.collider.pivot))
            })
            .collect();
        if let Some(spawn) = free.choose(&mut rng) {
            return **spawn;
        }
        *self
            .spawn_points
            .choose(&mut rng)
            .expect("map must have at least one spawn point")
    }
}

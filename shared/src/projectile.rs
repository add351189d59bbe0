//! Projectiles and the weapon that fires them.

use crate::geometry::Point;
use crate::map::Map;
use serde::{Deserialize, Serialize};

/// Projectile travel speed, world units/second.
pub const PROJECTILE_SPEED: f32 = 100.0;
/// Seconds a weapon takes to rearm after firing.
pub const WEAPON_READY_TIME: f32 = 1.2;
/// Damage dealt per hit.
pub const PROJECTILE_DAMAGE: u8 = 25;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub position: Point,
    pub direction: Point,
    #[serde(skip)]
    pub cleanup: bool,
}

impl Projectile {
    pub fn new(position: Point, direction: Point) -> Self {
        Projectile {
            position,
            direction,
            cleanup: false,
        }
    }

    pub fn apply_movement(&mut self, dt: f32) {
        self.position = self
            .position
            .add(&self.direction.scale(PROJECTILE_SPEED * dt));
    }

    pub fn is_colliding_with_rect(&self, rect: &[Point]) -> bool {
        self.position.is_in_polygon(rect)
    }

    pub fn is_colliding_with_environment(&self, map: &Map) -> bool {
        map.projectile_blocking_obstacles()
            .any(|obstacle| self.position.is_in_polygon(&obstacle.points))
    }
}

/// A hit landed this tick; health deduction and death/score bookkeeping
/// happen in the caller (`server/src/controller.rs`) since a weapon update
/// cannot also mutate the rest of the player roster.
pub struct HitOutcome {
    pub target_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub owner_id: u32,
    pub projectiles: Vec<Projectile>,
    pub ready: bool,
    pub ready_countdown: f32,
}

impl Weapon {
    pub fn new(owner_id: u32) -> Self {
        Weapon {
            owner_id,
            projectiles: Vec::new(),
            ready: true,
            ready_countdown: 0.0,
        }
    }

    /// Fires a projectile from `origin` towards `target` (the turret tip
    /// aimed at the hull pivot — see `SPEC_FULL.md` §4.4) if the weapon is
    /// ready. Returns `false` (no-op) otherwise.
    pub fn shoot_at(&mut self, origin: Point, target: Point) -> bool {
        if !self.ready {
            return false;
        }
        self.projectiles
            .push(Projectile::new(origin, origin.direction_to(&target)));
        self.ready = false;
        self.ready_countdown = 0.0;
        true
    }

    /// Advances all live projectiles, resolves hits against `targets`
    /// (player id + hull polygon pairs, already filtered to alive enemies)
    /// and the map, and rearms the weapon once its cooldown has elapsed.
    /// Returns the outcomes of any hits landed this tick.
    pub fn update(&mut self, targets: &[(u32, [Point; 4])], map: &Map, dt: f32) -> Vec<HitOutcome> {
        let mut outcomes = Vec::new();
        for projectile in self.projectiles.iter_mut() {
            projectile.apply_movement(dt);
            let mut hit = false;
            for (target_id, rect) in targets {
                if projectile.is_colliding_with_rect(rect) {
                    outcomes.push(HitOutcome { target_id: *target_id });
                    projectile.cleanup = true;
                    hit = true;
                    break;
                }
            }
            if !hit && projectile.is_colliding_with_environment(map) {
                projectile.cleanup = true;
            }
        }
        self.projectiles.retain(|p| !p.cleanup);

        if !self.ready {
            self.ready_countdown += dt;
            if self.ready_countdown > WEAPON_READY_TIME {
                self.ready = true;
                self.ready_countdown = 0.0;
            }
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Obstacle;

    fn square(cx: f32, cy: f32, half: f32) -> [Point; 4] {
        [
            Point::new(cx - half, cy - half),
            Point::new(cx + half, cy - half),
            Point::new(cx + half, cy + half),
            Point::new(cx - half, cy + half),
        ]
    }

    #[test]
    fn projectile_hits_player_rect() {
        let rect = square(0.0, 0.0, 3.5);
        let hit = Projectile::new(Point::new(1.0, 1.0), Point::new(0.0, 1.0));
        let miss = Projectile::new(Point::new(6.0, 1.0), Point::new(0.0, 1.0));
        assert!(hit.is_colliding_with_rect(&rect));
        assert!(!miss.is_colliding_with_rect(&rect));
    }

    #[test]
    fn weapon_cooldown_gates_second_shot() {
        let mut weapon = Weapon::new(1);
        assert!(weapon.shoot_at(Point::zero(), Point::new(0.0, 1.0)));
        assert!(!weapon.shoot_at(Point::zero(), Point::new(0.0, 1.0)));
        let map = Map::new(vec![], vec![]);
        // advance just under the rearm threshold
        weapon.update(&[], &map, 1.0);
        assert!(!weapon.ready);
        weapon.update(&[], &map, 0.3);
        assert!(weapon.ready);
        assert!(weapon.shoot_at(Point::zero(), Point::new(0.0, 1.0)));
    }

    #[test]
    fn weapon_projectile_blocked_by_environment() {
        let mut weapon = Weapon::new(1);
        weapon.projectiles.push(Projectile::new(
            Point::new(-5.0, 0.0),
            Point::new(1.0, 0.0),
        ));
        let map = Map::new(
            vec![Obstacle {
                points: square(0.0, 0.0, 2.0).to_vec(),
                blocks_projectiles: true,
            }],
            vec![],
        );
        weapon.update(&[], &map, 0.1);
        assert!(weapon.projectiles.is_empty());
    }
}

//! Player state and the single deterministic per-tick update step.

use crate::collider::Collider;
use crate::geometry::Point;
use crate::map::Map;
use crate::projectile::{Weapon, PROJECTILE_DAMAGE};
use serde::{Deserialize, Serialize};

/// Deceleration applied to the hull's forward/backward velocity every tick,
/// world units/second².
pub const DECELERATION: f32 = 22.5;
/// Full health.
pub const MAX_HEALTH: u8 = 100;
/// Width/depth of a tank's hull, used to seed new colliders.
pub const HULL_WIDTH: f32 = 5.0;
pub const HULL_DEPTH: f32 = 7.0;
/// Seconds a dead player waits before respawning.
pub const RESPAWN_TIME: f32 = 3.0;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Controls {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub turret_left: bool,
    pub turret_right: bool,
    pub shoot: bool,
    pub sequence: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub global_id: Option<String>,
    pub display_name: Option<String>,
    pub health: u8,
    pub score: u32,
    pub respawn_countdown: f32,
    pub control: Controls,
    pub collider: Collider,
    pub weapon: Weapon,
}

impl Player {
    pub fn new(id: u32, spawn: Point) -> Self {
        Player {
            id,
            global_id: None,
            display_name: None,
            health: MAX_HEALTH,
            score: 0,
            respawn_countdown: 0.0,
            control: Controls::default(),
            collider: Collider::new(id, spawn.x, spawn.y, HULL_WIDTH, HULL_DEPTH),
            weapon: Weapon::new(id),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn apply_damage(&mut self, amount: u8) {
        self.health = self.health.saturating_sub(amount);
    }

    /// Advances this player by one tick given the full player roster (for
    /// collision/hit tests) and the map. Returns the ids of any enemies hit
    /// by this player's weapon this tick, alongside whether that hit was
    /// lethal (caller awards score / applies damage — see
    /// `server/src/controller.rs`, which owns cross-player mutation since a
    /// `&mut self` step here cannot also mutate the rest of the roster).
    pub fn update(&mut self, others: &[(u32, bool, [Point; 4])], map: &Map, dt: f32) {
        if !self.is_alive() {
            self.respawn_countdown += dt;
            return;
        }

        self.collision_gate(others, map);

        self.collider.velocity -= DECELERATION * dt;
        if self.collider.velocity < 0.0 {
            self.collider.velocity = 0.0;
        }

        if self.control.right {
            self.collider.rotation += crate::collider::ROTATION_SPEED * dt;
            self.collider.turret_rotation += crate::collider::ROTATION_SPEED * dt;
        }
        if self.control.left {
            self.collider.rotation -= crate::collider::ROTATION_SPEED * dt;
            self.collider.turret_rotation -= crate::collider::ROTATION_SPEED * dt;
        }
        if self.control.turret_right {
            self.collider.turret_rotation -= crate::collider::ROTATION_SPEED * dt;
        }
        if self.control.turret_left {
            self.collider.turret_rotation += crate::collider::ROTATION_SPEED * dt;
        }

        let delta_rotation = self.collider.rotation - self.collider.last_rotation;
        let delta_turret = self.collider.turret_rotation - self.collider.last_turret_rotation;
        self.collider.rotate(delta_rotation);
        self.collider.rotate_turret(delta_turret);

        let mut moved = false;
        if self.control.forward && !self.collider.collision_front {
            self.collider.velocity += crate::collider::FORWARD_SPEED * dt;
            moved = true;
        } else if self.control.backward && !self.collider.collision_back {
            self.collider.velocity -= crate::collider::FORWARD_SPEED * dt;
            moved = true;
        }
        if moved {
            let displacement = self.collider.direction.scale(self.collider.velocity);
            self.collider.translate(&displacement);
        }

        self.collider.last_rotation = self.collider.rotation;
        self.collider.last_turret_rotation = self.collider.turret_rotation;
    }

    fn collision_gate(&mut self, others: &[(u32, bool, [Point; 4])], map: &Map) {
        self.collider.collision_front = false;
        self.collider.collision_back = false;

        for (other_id, alive, rect) in others {
            if *other_id == self.id || !alive {
                continue;
            }
            if self.collider.collision_polygon(rect) {
                if self.collider.collision_front(rect) {
                    self.collider.collision_front = true;
                }
                if self.collider.collision_back(rect) {
                    self.collider.collision_back = true;
                }
                if self.collider.collision_front || self.collider.collision_back {
                    return;
                }
            }
        }

        for obstacle in &map.obstacles {
            if self.collider.collision_polygon(&obstacle.points) {
                if self.collider.collision_front(&obstacle.points) {
                    self.collider.collision_front = true;
                }
                if self.collider.collision_back(&obstacle.points) {
                    self.collider.collision_back = true;
                }
                if self.collider.collision_front || self.collider.collision_back {
                    return;
                }
            }
        }
    }

    /// Called once per tick after `update`. Respawns a dead player whose
    /// cooldown has elapsed at a fresh spawn point.
    pub fn handle_respawn(&mut self, map: &Map, live_players: &[&Player]) {
        if self.is_alive() || self.respawn_countdown <= RESPAWN_TIME {
            return;
        }
        let spawn = map.random_spawn(live_players);
        self.health = MAX_HEALTH;
        self.respawn_countdown = 0.0;
        self.collider = Collider::new(self.id, spawn.x, spawn.y, HULL_WIDTH, HULL_DEPTH);
    }

    /// Fires the weapon if `control.shoot` is set; suppresses the input
    /// while the weapon is not ready so a held trigger does not queue shots.
    pub fn try_shoot(&mut self) {
        if !self.control.shoot {
            return;
        }
        if !self.weapon.ready {
            self.control.shoot = false;
            return;
        }
        self.weapon
            .shoot_at(self.collider.turret, self.collider.pivot);
    }

    pub fn apply_hit(&mut self) -> bool {
        self.apply_damage(PROJECTILE_DAMAGE);
        !self.is_alive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn empty_map() -> Map {
        Map::new(vec![], vec![Point::zero()])
    }

    #[test]
    fn movement_without_obstacle_one_tick() {
        let mut p = Player::new(1, Point::zero());
        p.control.forward = true;
        p.update(&[], &empty_map(), 1.0);
        assert_approx_eq!(p.collider.pivot.x, 0.0, 1e-4);
        // direction starts as (0,1); velocity accumulates 15*dt = 15, then
        // displacement = direction * velocity = (0, 15).
        assert_approx_eq!(p.collider.pivot.y, 15.0, 1e-4);
    }

    #[test]
    fn collision_front_blocks_forward_movement() {
        let mut p = Player::new(1, Point::zero());
        let obstacle = crate::map::Obstacle {
            points: vec![
                Point::new(-2.5, 3.5),
                Point::new(2.5, 3.5),
                Point::new(2.5, 6.5),
                Point::new(-2.5, 6.5),
            ],
            blocks_projectiles: false,
        };
        let map = Map::new(vec![obstacle], vec![Point::zero()]);
        p.control.forward = true;
        p.update(&[], &map, 1.0);
        assert_approx_eq!(p.collider.pivot.y, 0.0, 1e-4);
        assert!(p.collider.collision_front);
    }

    #[test]
    fn dead_player_ticks_respawn_countdown_only() {
        let mut p = Player::new(1, Point::zero());
        p.health = 0;
        p.control.forward = true;
        let before = p.collider.pivot;
        p.update(&[], &empty_map(), 1.0);
        assert_eq!(p.collider.pivot.x, before.x);
        assert_approx_eq!(p.respawn_countdown, 1.0, 1e-5);
    }

    #[test]
    fn respawn_after_cooldown_resets_health() {
        let mut p = Player::new(1, Point::zero());
        p.health = 0;
        p.respawn_countdown = RESPAWN_TIME + 0.1;
        p.handle_respawn(&empty_map(), &[]);
        assert_eq!(p.health, MAX_HEALTH);
        assert_eq!(p.respawn_countdown, 0.0);
    }

    #[test]
    fn shoot_suppressed_while_weapon_not_ready() {
        let mut p = Player::new(1, Point::zero());
        p.control.shoot = true;
        p.try_shoot();
        assert_eq!(p.weapon.projectiles.len(), 1);
        p.control.shoot = true;
        p.try_shoot();
        assert!(!p.control.shoot);
        assert_eq!(p.weapon.projectiles.len(), 1);
    }
}

//! Oriented rectangle collider: the shape every tank in the arena carries.
//!
//! A [`Collider`] is nine points that move and rotate together: the four
//! rectangle corners `a, b, c, d`, a `pivot` (center of rotation), a `look`
//! reference point used to derive the facing direction, and a `turret`
//! reference point that rotates independently of the hull.

use crate::geometry::{polygons_intersect, rotate_about_pivot, Point};
use serde::{Deserialize, Serialize};

/// Base forward/backward speed accumulator step, in world units/second.
pub const FORWARD_SPEED: f32 = 15.0;
/// Hull and turret rotation speed, in radians/second.
pub const ROTATION_SPEED: f32 = 1.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collider {
    pub id: u32,
    pub a: Point,
    pub b: Point,
    pub c: Point,
    pub d: Point,
    pub pivot: Point,
    pub look: Point,
    pub turret: Point,
    pub direction: Point,
    pub velocity: f32,
    pub rotation: f32,
    pub last_rotation: f32,
    pub turret_rotation: f32,
    pub last_turret_rotation: f32,
    #[serde(skip)]
    pub collision_front: bool,
    #[serde(skip)]
    pub collision_back: bool,
}

impl Collider {
    /// Builds a collider centered at `(x, y)` with the given `width`
    /// (across the hull) and `depth` (front-to-back).
    pub fn new(id: u32, x: f32, y: f32, width: f32, depth: f32) -> Self {
        let pivot = Point::new(x, y);
        let look = Point::new(x, y + 2.0);
        let turret = Point::new(x, y + 3.0);
        let a = Point::new(x - width / 2.0, y + depth / 2.0);
        let b = Point::new(x + width / 2.0, y + depth / 2.0);
        let c = Point::new(x + width / 2.0, y - depth / 2.0);
        let d = Point::new(x - width / 2.0, y - depth / 2.0);
        let mut collider = Collider {
            id,
            a,
            b,
            c,
            d,
            pivot,
            look,
            turret,
            direction: Point::new(0.0, 1.0),
            velocity: 0.0,
            rotation: 0.0,
            last_rotation: 0.0,
            turret_rotation: 0.0,
            last_turret_rotation: 0.0,
            collision_front: false,
            collision_back: false,
        };
        collider.calc_direction();
        collider
    }

    pub fn calc_direction(&mut self) {
        self.direction = self.look.direction_to(&self.pivot);
    }

    /// Rectangle corners `a, b, c, d`, as a polygon, in order.
    pub fn rect_polygon(&self) -> [Point; 4] {
        [self.a, self.b, self.c, self.d]
    }

    fn front_triangle(&self) -> [Point; 3] {
        [self.a, self.b, self.pivot]
    }

    fn back_triangle(&self) -> [Point; 3] {
        [self.c, self.d, self.pivot]
    }

    /// Translates every tracked point by the delta implied by moving the
    /// pivot to `(x, y)`.
    pub fn change_position(&mut self, x: f32, y: f32) {
        let target = Point::new(x, y);
        let delta = target.sub(&self.pivot);
        self.pivot = target;
        self.look = self.look.add(&delta);
        self.turret = self.turret.add(&delta);
        self.a = self.a.add(&delta);
        self.b = self.b.add(&delta);
        self.c = self.c.add(&delta);
        self.d = self.d.add(&delta);
    }

    /// Translates every tracked point by `delta` directly.
    pub fn translate(&mut self, delta: &Point) {
        self.pivot = self.pivot.add(delta);
        self.look = self.look.add(delta);
        self.turret = self.turret.add(delta);
        self.a = self.a.add(delta);
        self.b = self.b.add(delta);
        self.c = self.c.add(delta);
        self.d = self.d.add(delta);
    }

    /// Rotates the hull (corners + look) about the pivot by `theta`. The
    /// turret is unaffected — callers rotate it separately via
    /// [`Collider::rotate_turret`].
    pub fn rotate(&mut self, theta: f32) {
        self.a = rotate_about_pivot(&self.a, &self.pivot, theta);
        self.b = rotate_about_pivot(&self.b, &self.pivot, theta);
        self.c = rotate_about_pivot(&self.c, &self.pivot, theta);
        self.d = rotate_about_pivot(&self.d, &self.pivot, theta);
        self.look = rotate_about_pivot(&self.look, &self.pivot, theta);
        self.calc_direction();
    }

    pub fn rotate_turret(&mut self, theta: f32) {
        self.turret = rotate_about_pivot(&self.turret, &self.pivot, theta);
    }

    pub fn collision_polygon(&self, other: &[Point]) -> bool {
        polygons_intersect(&self.rect_polygon(), other)
    }

    pub fn collision_front(&self, other: &[Point]) -> bool {
        polygons_intersect(&self.front_triangle(), other)
    }

    pub fn collision_back(&self, other: &[Point]) -> bool {
        polygons_intersect(&self.back_triangle(), other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn new_collider_has_unit_direction() {
        let c = Collider::new(1, 0.0, 0.0, 5.0, 7.0);
        assert_approx_eq!(c.direction.length(), 1.0, 1e-5);
    }

    #[test]
    fn translate_moves_all_points_congruently() {
        let mut c = Collider::new(1, 0.0, 0.0, 5.0, 7.0);
        let before = (c.a, c.b, c.c, c.d, c.look, c.turret);
        c.change_position(10.0, 20.0);
        let delta = Point::new(10.0, 20.0);
        assert_approx_eq!(c.a.x, before.0.add(&delta).x, 1e-5);
        assert_approx_eq!(c.a.y, before.0.add(&delta).y, 1e-5);
        assert_approx_eq!(c.look.x, before.4.add(&delta).x, 1e-5);
        assert_approx_eq!(c.turret.y, before.5.add(&delta).y, 1e-5);
    }

    #[test]
    fn rotation_is_composable() {
        let mut c1 = Collider::new(1, 0.0, 0.0, 5.0, 7.0);
        let mut c2 = Collider::new(1, 0.0, 0.0, 5.0, 7.0);
        c1.rotate(0.3);
        c1.rotate(0.4);
        c2.rotate(0.7);
        assert_approx_eq!(c1.a.x, c2.a.x, 1e-4);
        assert_approx_eq!(c1.a.y, c2.a.y, 1e-4);
    }

    #[test]
    fn front_and_back_triangles_detect_obstacle() {
        let c = Collider::new(1, 0.0, 0.0, 5.0, 7.0);
        // direction is (0, 1): the front triangle (a, b, pivot) sits on the
        // +Y side, so an obstacle there is a front hit, not a back one.
        let obstacle = [
            Point::new(-10.0, 5.0),
            Point::new(10.0, 5.0),
            Point::new(10.0, 20.0),
            Point::new(-10.0, 20.0),
        ];
        assert!(c.collision_front(&obstacle));
        assert!(!c.collision_back(&obstacle));
    }
}

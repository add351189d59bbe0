//! 2-D points, rotation, and polygon intersection.
//!
//! Every collision check in the simulation — player vs. player, player vs.
//! map, projectile vs. either — reduces to the primitives in this module:
//! point-in-polygon for projectiles, and the Separating Axis Theorem for
//! oriented rectangles vs. arbitrary convex polygons.

use serde::{Deserialize, Serialize};

/// A point (or free vector) in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    pub fn zero() -> Self {
        Point { x: 0.0, y: 0.0 }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(&self, factor: f32) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Normalizes this vector to unit length. Undefined (NaN) for the zero
    /// vector — callers must never pass one.
    pub fn normalize(&self) -> Point {
        let len = self.length();
        Point::new(self.x / len, self.y / len)
    }

    /// Unit vector pointing from `other` towards `self`.
    pub fn direction_to(&self, other: &Point) -> Point {
        self.sub(other).normalize()
    }

    pub fn within_distance_of(&self, radius: f32, other: &Point) -> bool {
        self.sub(other).length() <= radius
    }

    /// Crossing-number (ray casting) point-in-polygon test. `polygon` is
    /// interpreted as a closed cycle over its points in order.
    pub fn is_in_polygon(&self, polygon: &[Point]) -> bool {
        let mut inside = false;
        let n = polygon.len();
        if n < 3 {
            return false;
        }
        let mut j = n - 1;
        for i in 0..n {
            let pi = polygon[i];
            let pj = polygon[j];
            let intersects = (pi.y > self.y) != (pj.y > self.y)
                && self.x < (pj.x - pi.x) * (self.y - pi.y) / (pj.y - pi.y) + pi.x;
            if intersects {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

/// Rotates `point` about `pivot` by `theta` radians.
pub fn rotate_about_pivot(point: &Point, pivot: &Point, theta: f32) -> Point {
    let translated = point.sub(pivot);
    let cos = theta.cos();
    let sin = theta.sin();
    let rotated = Point::new(
        translated.x * cos - translated.y * sin,
        translated.x * sin + translated.y * cos,
    );
    rotated.add(pivot)
}

/// Separating Axis Theorem test between two convex polygons (each given as
/// an ordered, cyclic vertex list of at least 3 points).
///
/// For every edge of both polygons, the edge normal is used as a candidate
/// separating axis: both polygons are projected onto it, and if the
/// resulting intervals are disjoint on any axis the polygons do not
/// intersect. `polygons_intersect(a, b) == polygons_intersect(b, a)`.
pub fn polygons_intersect(a: &[Point], b: &[Point]) -> bool {
    if a.len() < 3 || b.len() < 3 {
        return false;
    }
    for polygon in [a, b] {
        let n = polygon.len();
        for i in 0..n {
            let p1 = polygon[i];
            let p2 = polygon[(i + 1) % n];
            let normal = Point::new(p2.y - p1.y, p1.x - p2.x);

            let (min_a, max_a) = project(a, &normal);
            let (min_b, max_b) = project(b, &normal);

            if max_a < min_b || max_b < min_a {
                return false;
            }
        }
    }
    true
}

fn project(polygon: &[Point], axis: &Point) -> (f32, f32) {
    let mut min = f32::MAX;
    let mut max = f32::MIN;
    for p in polygon {
        let dot = p.x * axis.x + p.y * axis.y;
        if dot < min {
            min = dot;
        }
        if dot > max {
            max = dot;
        }
    }
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn normalize_unit_length() {
        let v = Point::new(3.0, 4.0).normalize();
        assert_approx_eq!(v.length(), 1.0, 1e-5);
    }

    #[test]
    fn rotate_quarter_turn_about_origin() {
        let p = Point::new(1.0, 0.0);
        let rotated = rotate_about_pivot(&p, &Point::zero(), std::f32::consts::FRAC_PI_2);
        assert_approx_eq!(rotated.x, 0.0, 1e-5);
        assert_approx_eq!(rotated.y, 1.0, 1e-5);
    }

    #[test]
    fn rotate_about_nonorigin_pivot() {
        let p = Point::new(2.0, 1.0);
        let pivot = Point::new(1.0, 1.0);
        let rotated = rotate_about_pivot(&p, &pivot, std::f32::consts::PI);
        assert_approx_eq!(rotated.x, 0.0, 1e-5);
        assert_approx_eq!(rotated.y, 1.0, 1e-5);
    }

    #[test]
    fn point_in_square() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(Point::new(5.0, 5.0).is_in_polygon(&square));
        assert!(!Point::new(15.0, 5.0).is_in_polygon(&square));
    }

    #[test]
    fn point_in_polygon_translation_invariant() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let delta = Point::new(100.0, -50.0);
        let translated: Vec<Point> = square.iter().map(|p| p.add(&delta)).collect();
        let point = Point::new(5.0, 5.0);
        assert_eq!(
            point.is_in_polygon(&square),
            point.add(&delta).is_in_polygon(&translated)
        );
    }

    #[test]
    fn overlapping_rectangles_intersect() {
        let a = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let b = [
            Point::new(5.0, 5.0),
            Point::new(15.0, 5.0),
            Point::new(15.0, 15.0),
            Point::new(5.0, 15.0),
        ];
        assert!(polygons_intersect(&a, &b));
        assert!(polygons_intersect(&b, &a));
    }

    #[test]
    fn disjoint_rectangles_do_not_intersect() {
        let a = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let b = [
            Point::new(100.0, 100.0),
            Point::new(110.0, 100.0),
            Point::new(110.0, 110.0),
            Point::new(100.0, 110.0),
        ];
        assert!(!polygons_intersect(&a, &b));
        assert!(!polygons_intersect(&b, &a));
    }
}

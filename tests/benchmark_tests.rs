//! # Performance Benchmark Test Suite
//!
//! Coarse performance sanity checks for the hot paths of the simulation:
//! polygon collision, the per-player update step, weapon resolution, and
//! wire-codec throughput. These are not micro-benchmarks (no warm-up,
//! no statistical analysis) — they exist to catch gross regressions that
//! would blow the 30 Hz tick budget, not to track nanosecond-level noise.

use shared::codec::{self, PlayerStateBody};
use shared::geometry::{polygons_intersect, Point};
use shared::map::Map;
use shared::player::{Controls, Player};
use shared::projectile::Weapon;
use std::time::Instant;

fn square(cx: f32, cy: f32, half: f32) -> Vec<Point> {
    vec![
        Point::new(cx - half, cy - half),
        Point::new(cx + half, cy - half),
        Point::new(cx + half, cy + half),
        Point::new(cx - half, cy + half),
    ]
}

/// Benchmarks the SAT polygon-intersection check used for every
/// tank-vs-tank and tank-vs-obstacle collision probe.
///
/// ## Performance Target
///
/// Each tick probes collisions for every live player against every other
/// live player plus every map obstacle — this needs to stay well under a
/// microsecond per call to leave room for the rest of the tick budget at
/// even a modest player count.
#[test]
fn benchmark_polygon_intersection() {
    let a = square(0.0, 0.0, 3.5);
    let b = square(2.0, 2.0, 3.5);

    let iterations = 100_000;
    let start = Instant::now();
    for _ in 0..iterations {
        let _ = polygons_intersect(&a, &b);
    }
    let duration = start.elapsed();
    println!(
        "Polygon intersection: {iterations} iterations in {duration:?} ({:.2} ns/iter)",
        duration.as_nanos() as f64 / iterations as f64
    );
    assert!(duration.as_millis() < 200);
}

/// Benchmarks one player's full `update()` step — collision gating,
/// rotation, and translation — against a handful of stationary obstacles,
/// the shape of the per-tick workload the controller actually runs.
///
/// ## Performance Target
///
/// At 30 Hz with a generous headroom, the whole roster's updates must fit
/// comfortably inside the ~33ms tick window; a single player's share of
/// that should be on the order of microseconds.
#[test]
fn benchmark_player_update() {
    let map = Map::new(
        vec![
            shared::map::Obstacle {
                points: square(50.0, 50.0, 2.0),
                blocks_projectiles: true,
            },
            shared::map::Obstacle {
                points: square(-50.0, -50.0, 2.0),
                blocks_projectiles: false,
            },
        ],
        vec![Point::zero()],
    );

    let iterations = 50_000;
    let start = Instant::now();
    for _ in 0..iterations {
        let mut player = Player::new(1, Point::zero());
        player.control = Controls {
            forward: true,
            right: true,
            ..Controls::default()
        };
        player.update(&[], &map, 1.0 / 30.0);
    }
    let duration = start.elapsed();
    println!(
        "Player update: {iterations} iterations in {duration:?} ({:.2} ns/iter)",
        duration.as_nanos() as f64 / iterations as f64
    );
    assert!(duration.as_millis() < 1000);
}

/// Benchmarks resolving a weapon with several in-flight projectiles against
/// a roster of enemy hulls, the per-player-per-tick cost of `Weapon::update`.
#[test]
fn benchmark_weapon_resolution() {
    let map = Map::new(vec![], vec![]);
    let targets: Vec<(u32, [Point; 4])> = (0..8)
        .map(|i| {
            let rect = square(i as f32 * 20.0, 0.0, 3.5);
            (i, [rect[0], rect[1], rect[2], rect[3]])
        })
        .collect();

    let iterations = 10_000;
    let start = Instant::now();
    for _ in 0..iterations {
        let mut weapon = Weapon::new(99);
        for _ in 0..5 {
            weapon.shoot_at(Point::new(-100.0, 0.0), Point::new(0.0, 0.0));
        }
        let _ = weapon.update(&targets, &map, 1.0 / 30.0);
    }
    let duration = start.elapsed();
    println!(
        "Weapon resolution: {iterations} iterations in {duration:?} ({:.2} us/iter)",
        duration.as_micros() as f64 / iterations as f64
    );
    assert!(duration.as_millis() < 1000);
}

/// Benchmarks encoding a full-roster player-state broadcast frame, the
/// payload the controller builds and sends out every tick.
///
/// ## Performance Target
///
/// A 50-player broadcast frame must encode fast enough to not itself eat
/// into the tick budget; this is plain byte-pushing with no allocpacking
/// tricks, so it should be on the order of microseconds even at this size.
#[test]
fn benchmark_player_state_broadcast_encoding() {
    let bodies: Vec<PlayerStateBody> = (0..50)
        .map(|i| PlayerStateBody {
            sequence: i,
            pos_x: i as f32,
            pos_y: -(i as f32),
            turret_x: i as f32,
            turret_y: i as f32 + 1.0,
            rotation: 0.1,
            turret_rotation: -0.1,
            shooting: i % 2 == 0,
            health: 100,
        })
        .collect();

    let iterations = 10_000;
    let start = Instant::now();
    for _ in 0..iterations {
        let mut frame = Vec::new();
        for (i, body) in bodies.iter().enumerate() {
            frame.extend(codec::encode_player_state(i as u8, 12_345, body));
        }
        assert!(!frame.is_empty());
    }
    let duration = start.elapsed();
    println!(
        "Broadcast encoding: {iterations} iterations of {} players in {duration:?} ({:.2} us/iter)",
        bodies.len(),
        duration.as_micros() as f64 / iterations as f64
    );
    assert!(duration.as_millis() < 2000);
}

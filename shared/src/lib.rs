//! # Shared Arena Library
//!
//! This crate contains the data structures, constants, and deterministic
//! simulation step shared by the authoritative game server and any client
//! that needs to predict or replay the same physics. It has no networking
//! and no async runtime dependency on purpose: the same code that runs on
//! the server's tick loop can in principle be compiled for a client-side
//! prediction build.
//!
//! ## Core Components
//!
//! ### Geometry kernel ([`geometry`])
//! Points, rotation about a pivot, point-in-polygon, and the Separating
//! Axis Theorem used by every collision check in the simulation.
//!
//! ### Collider ([`collider`])
//! The oriented-rectangle hull every tank carries: four corners plus pivot,
//! look, and turret reference points, with front/back sub-polygon collision
//! probes that gate forward/backward movement.
//!
//! ### Map ([`map`])
//! The static arena: obstacle polygons (some of which block projectiles,
//! the rest only block movement) and spawn points.
//!
//! ### Projectiles and weapons ([`projectile`])
//! Kinematic projectiles and the cooldown-gated weapon that fires them.
//!
//! ### Player ([`player`])
//! Controls, health, score, and the single deterministic per-tick update
//! step that advances a player's collider and weapon.
//!
//! ### World ([`world`])
//! The authoritative roster of players, the map, and the match lifecycle
//! clock (`Idle -> InProgress -> Ending -> Idle`).
//!
//! ### Wire codec ([`codec`])
//! The binary frame format exchanged between server and clients. Frame
//! layout is fixed; see the module docs for the (intentionally mixed)
//! endianness rules.
//!
//! ## Design Philosophy
//!
//! ### Deterministic simulation
//! Every player update consumes only its own state, the current roster, the
//! map, and a fixed tick `dt` — no wall-clock reads, no randomness — so
//! replaying the same input stream always produces the same trajectory.
//!
//! ### Single-writer discipline
//! `shared` does not itself enforce who is allowed to call `Player::update`;
//! the server's tick loop is the only caller during a live match (see
//! `server/src/controller.rs`).

pub mod codec;
pub mod collider;
pub mod geometry;
pub mod map;
pub mod player;
pub mod projectile;
pub mod world;

pub use collider::Collider;
pub use geometry::Point;
pub use map::{Map, Obstacle};
pub use player::{Controls, Player};
pub use projectile::{Projectile, Weapon};
pub use world::{MatchState, World};

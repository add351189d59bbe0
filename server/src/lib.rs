//! # Tank Arena Game Server
//!
//! An authoritative, tick-driven server for a small-scale top-down tank
//! arena. The simulation itself (colliders, projectiles, players, match
//! lifecycle) lives in the [`shared`] crate so it stays free of any
//! networking concern; this crate is the concurrency and transport shell
//! around it.
//!
//! ## Architecture
//!
//! - [`transport`]: the per-connection byte-frame channel, split into a
//!   reader half and a writer half, realized over WebSockets.
//! - [`hub`]: the registry of connected clients. Owns the only two
//!   per-connection tasks (reader, writer) and the single broadcast
//!   fan-out, with backpressure-driven disconnect for slow consumers.
//! - [`controller`]: the fixed-rate (default 30 Hz) tick loop. The sole
//!   writer of player state during a match: drains every player's inbox,
//!   advances the simulation, and broadcasts the result.
//! - [`identity`] / [`fleet`]: thin async trait boundaries around the
//!   external identity-verification and fleet-registry services, each
//!   with a stub implementation so the rest of the server is runnable and
//!   testable standalone.
//! - [`config`]: CLI/environment configuration (`clap`, matching the
//!   teacher's `Args` derive).
//! - [`error`]: typed errors at the transport/codec/config seams.
//!
//! ## Concurrency model
//!
//! One tick-loop task per live match, one hub event-loop task, and two
//! tasks per connected client (reader, writer). The world's player roster
//! is guarded by a `tokio::sync::RwLock`; the tick loop is its sole writer
//! while a match is in progress. The hub's client registry is owned
//! exclusively by the hub's own event loop — nothing else touches it.

pub mod config;
pub mod controller;
pub mod error;
pub mod fleet;
pub mod hub;
pub mod identity;
pub mod transport;

pub use controller::Controller;
pub use hub::Hub;

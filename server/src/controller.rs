//! Tick loop: the fixed-rate authoritative simulation loop.
//!
//! Grounded in full on `examples/original_source/game/controller.go`
//! (`gameLoop`, `processInputs`, the `tickrate` constant, and the
//! package-level tick-time metrics, here owned by the `Controller`
//! instance instead of living as mutable globals — see `SPEC_FULL.md` §9
//! design notes) and on the teacher's `run_game_loop` in
//! `examples/jakobhuuse-Netcode-in-Rust/server/src/main.rs` for the
//! `tokio::time::interval` + `select!` idiom.

use crate::fleet::{FleetRegistry, MatchEvent};
use crate::hub::{Hub, RegisterRequest, INBOUND_QUEUE_SIZE};
use crate::identity::IdentityVerifier;
use crate::transport::{ConnectionReader, ConnectionWriter};
use log::{info, warn};
use shared::codec::{self, Frame, PlayerStateBody};
use shared::geometry::Point;
use shared::player::Player;
use shared::projectile::Weapon;
use shared::world::{MatchState, World, INTERMISSION};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::time::interval;

#[derive(Default)]
pub struct TickMetrics {
    count: u64,
    total_nanos: u128,
}

impl TickMetrics {
    fn record(&mut self, elapsed: Duration) {
        self.count += 1;
        self.total_nanos += elapsed.as_nanos();
    }

    pub fn average_tick_millis(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        (self.total_nanos as f64 / self.count as f64) / 1_000_000.0
    }

    pub fn tick_count(&self) -> u64 {
        self.count
    }
}

pub struct Controller {
    hub: Hub,
    world: Arc<RwLock<World>>,
    inboxes: Mutex<HashMap<u32, mpsc::Receiver<Frame>>>,
    identity: Arc<dyn IdentityVerifier>,
    fleet: Arc<dyn FleetRegistry>,
    tick_rate: u32,
    region: String,
    running: AtomicBool,
    metrics: Mutex<TickMetrics>,
}

impl Controller {
    pub fn new(
        hub: Hub,
        world: Arc<RwLock<World>>,
        identity: Arc<dyn IdentityVerifier>,
        fleet: Arc<dyn FleetRegistry>,
        tick_rate: u32,
        region: String,
    ) -> Arc<Self> {
        Arc::new(Controller {
            hub,
            world,
            inboxes: Mutex::new(HashMap::new()),
            identity,
            fleet,
            tick_rate,
            region,
            running: AtomicBool::new(false),
            metrics: Mutex::new(TickMetrics::default()),
        })
    }

    pub async fn metrics_snapshot(&self) -> (u64, f64) {
        let metrics = self.metrics.lock().await;
        (metrics.tick_count(), metrics.average_tick_millis())
    }

    /// Registers a newly accepted connection as a player: assigns the
    /// monotone player id, picks a spawn, adds the player to the world,
    /// and hands the split connection to the hub. Starts the match if this
    /// is the first player, or unicasts a `GameStart` if joining one
    /// already in progress (`SPEC_FULL.md` §4.10 "player join during
    /// match").
    pub async fn register_player(
        self: &Arc<Self>,
        reader: Box<dyn ConnectionReader>,
        writer: Box<dyn ConnectionWriter>,
    ) -> u32 {
        let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_QUEUE_SIZE);

        let id = {
            let mut world = self.world.write().await;
            let id = world.new_player_id();
            let players: Vec<&Player> = world.players.values().collect();
            let spawn = world.map.random_spawn(&players);
            world.add_player(Player::new(id, spawn));
            id
        };

        self.inboxes.lock().await.insert(id, inbound_rx);
        self.hub.register(RegisterRequest {
            id,
            reader,
            writer,
            inbound: inbound_tx,
        });

        let (state, game_time) = {
            let world = self.world.read().await;
            (world.match_state(), world.game_time_millis())
        };
        self.hub.send_to(id, codec::encode_player_register(id as u8, game_time));
        if state == MatchState::InProgress {
            self.hub.send_to(id, codec::encode_game_start(id as u8, game_time));
        }

        info!("controller: player {} connected, {} connected players", id, {
            self.world.read().await.player_count()
        });

        self.maybe_start().await;
        id
    }

    pub async fn unregister_player(&self, id: u32) {
        self.hub.unregister(id);
        self.inboxes.lock().await.remove(&id);
        let mut world = self.world.write().await;
        world.remove_player(id);
        info!("controller: player {} disconnected, {} connected players", id, world.player_count());
    }

    async fn maybe_start(self: &Arc<Self>) {
        let in_progress = {
            let mut world = self.world.write().await;
            if world.match_state() == MatchState::Idle && world.player_count() > 0 {
                world.start();
            }
            world.match_state() == MatchState::InProgress
        };
        if in_progress && !self.running.swap(true, Ordering::SeqCst) {
            let controller = Arc::clone(self);
            tokio::spawn(async move { controller.run_game_loop().await });
        }
    }

    async fn run_game_loop(self: Arc<Self>) {
        let dt = 1.0 / self.tick_rate as f32;
        let mut ticker = interval(Duration::from_millis(1000 / self.tick_rate as u64));
        info!("controller: match started, region={}", self.region);
        self.fleet.report_match_event(&self.region, MatchEvent::Started).await;

        let game_time = { self.world.read().await.game_time_millis() };
        self.hub.broadcast(codec::encode_game_start(0, game_time));

        loop {
            ticker.tick().await;
            self.tick(dt).await;
            let ended = { self.world.read().await.has_ended() };
            if ended {
                break;
            }
        }

        self.end_match().await;
        self.running.store(false, Ordering::SeqCst);

        tokio::time::sleep(INTERMISSION).await;
        {
            let mut world = self.world.write().await;
            world.reset_to_idle();
        }
        self.maybe_start().await;
    }

    async fn end_match(&self) {
        let game_time = {
            let mut world = self.world.write().await;
            world.end();
            world.game_time_millis()
        };
        self.hub.broadcast(codec::encode_game_end(0, game_time));
        self.fleet.report_match_event(&self.region, MatchEvent::Ended).await;
        info!("controller: match ended");
    }

    /// One 30 Hz step: drain every player's inbox, advance the
    /// simulation, and broadcast the resulting state.
    async fn tick(&self, dt: f32) {
        let tick_start = Instant::now();

        self.drain_inboxes(dt).await;

        let mut world = self.world.write().await;
        let map = world.map.clone();
        let ids: Vec<u32> = world.players.keys().copied().collect();

        for id in &ids {
            let mut weapon = match world.players.get_mut(id) {
                Some(player) => std::mem::replace(&mut player.weapon, Weapon::new(*id)),
                None => continue,
            };
            let targets: Vec<(u32, [Point; 4])> = world
                .players
                .values()
                .filter(|p| p.id != *id && p.is_alive())
                .map(|p| (p.id, p.collider.rect_polygon()))
                .collect();
            let outcomes = weapon.update(&targets, &map, dt);
            if let Some(player) = world.players.get_mut(id) {
                player.weapon = weapon;
            }
            for outcome in outcomes {
                let attacker_id = *id;
                if let Some(target) = world.players.get_mut(&outcome.target_id) {
                    let died = target.apply_hit();
                    if died {
                        if let Some(attacker) = world.players.get_mut(&attacker_id) {
                            attacker.score += 1;
                        }
                    }
                }
            }
        }

        let alive_snapshot: Vec<Player> = world.players.values().filter(|p| p.is_alive()).cloned().collect();
        let alive_refs: Vec<&Player> = alive_snapshot.iter().collect();
        for id in &ids {
            if let Some(player) = world.players.get_mut(id) {
                player.handle_respawn(&map, &alive_refs);
            }
        }

        let game_time = world.game_time_millis();
        let mut frame = Vec::new();
        for p in world.players.values() {
            let body = PlayerStateBody {
                sequence: p.control.sequence,
                pos_x: p.collider.pivot.x,
                pos_y: p.collider.pivot.y,
                turret_x: p.collider.turret.x,
                turret_y: p.collider.turret.y,
                rotation: p.collider.rotation,
                turret_rotation: p.collider.turret_rotation,
                shooting: p.control.shoot,
                health: p.health,
            };
            frame.extend(codec::encode_player_state(p.id as u8, game_time, &body));
        }
        drop(world);
        if !frame.is_empty() {
            self.hub.broadcast(frame);
        }

        self.metrics.lock().await.record(tick_start.elapsed());
    }

    /// Non-blocking drain of every player's inbox, applying auth, input,
    /// and time-echo messages. Every `PlayerInput` message sets `control`
    /// and immediately calls `update`, so a tick with several queued inputs
    /// simulates every one of them instead of only the last.
    async fn drain_inboxes(&self, dt: f32) {
        let mut inboxes = self.inboxes.lock().await;
        let ids: Vec<u32> = inboxes.keys().copied().collect();
        let mut to_disconnect = Vec::new();

        for id in ids {
            let mut pending = 0;
            loop {
                let frame = match inboxes.get_mut(&id).and_then(|rx| rx.try_recv().ok()) {
                    Some(frame) => frame,
                    None => break,
                };
                pending += 1;

                match frame {
                    Frame::PlayerAuth { token, .. } => match self.identity.verify(&token).await {
                        Ok(identity) => {
                            let mut world = self.world.write().await;
                            if let Some(player) = world.players.get_mut(&id) {
                                player.global_id = Some(identity.global_id);
                                player.display_name = Some(identity.display_name);
                            }
                        }
                        Err(_) => {
                            to_disconnect.push(id);
                            break;
                        }
                    },
                    Frame::PlayerInput { controls, .. } => {
                        let mut world = self.world.write().await;
                        let map = world.map.clone();
                        let rect_snapshot: Vec<(u32, bool, [Point; 4])> = world
                            .players
                            .values()
                            .map(|p| (p.id, p.is_alive(), p.collider.rect_polygon()))
                            .collect();
                        if let Some(player) = world.players.get_mut(&id) {
                            player.control = controls;
                            player.update(&rect_snapshot, &map, dt);
                            player.try_shoot();
                        }
                    }
                    Frame::TimeEcho { value, .. } => {
                        let game_time = self.world.read().await.game_time_millis();
                        self.hub.send_to(id, codec::encode_time_echo(id as u8, game_time, value));
                    }
                    _ => {}
                }
            }
            if pending > 1 {
                warn!("controller: player {} inbox had {} pending messages this tick", id, pending);
            }
        }

        for id in to_disconnect {
            inboxes.remove(&id);
            self.hub.unregister(id);
            self.world.write().await.remove_player(id);
        }
    }
}

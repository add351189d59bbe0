//! Authoritative shared world state: the player roster, the map, and the
//! match lifecycle clock.
//!
//! This type carries no synchronization of its own — `shared` stays free of
//! an async runtime dependency so it can be linked by both the server and,
//! in principle, a client build target. The server wraps a `World` in a
//! `tokio::sync::RwLock` (see `server/src/hub.rs`) to serialize the
//! structural mutations (`add_player`/`remove_player`) against the tick
//! loop's per-tick snapshot reads.

use crate::map::Map;
use crate::player::Player;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Total length of one match.
pub const MATCH_LENGTH: Duration = Duration::from_secs(5 * 60);
/// Pause between a match ending and the next one starting.
pub const INTERMISSION: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    Idle,
    InProgress,
    Ending,
}

pub struct World {
    pub region: String,
    pub map: Map,
    pub players: HashMap<u32, Player>,
    next_player_id: u32,
    state: MatchState,
    start: Option<Instant>,
}

impl World {
    pub fn new(region: String, map: Map) -> Self {
        World {
            region,
            map,
            players: HashMap::new(),
            next_player_id: 1,
            state: MatchState::Idle,
            start: None,
        }
    }

    /// Monotonically increasing id, never reused within the process
    /// lifetime.
    pub fn new_player_id(&mut self) -> u32 {
        let id = self.next_player_id;
        self.next_player_id += 1;
        id
    }

    pub fn add_player(&mut self, player: Player) {
        self.players.insert(player.id, player);
        self.ready_to_start();
    }

    pub fn remove_player(&mut self, id: u32) -> Option<Player> {
        self.players.remove(&id)
    }

    pub fn match_state(&self) -> MatchState {
        self.state
    }

    /// Elapsed game time in milliseconds since match start, or 0 before a
    /// match has ever started — used as the wire frame's game-time field.
    pub fn game_time_millis(&self) -> u32 {
        match self.start {
            Some(start) => start.elapsed().as_millis() as u32,
            None => 0,
        }
    }

    fn ready_to_start(&mut self) -> bool {
        if self.state == MatchState::Idle && !self.players.is_empty() {
            self.start();
            true
        } else {
            false
        }
    }

    pub fn start(&mut self) {
        self.state = MatchState::InProgress;
        self.start = Some(Instant::now());
    }

    /// True once the match clock has run past `MATCH_LENGTH`.
    pub fn has_ended(&self) -> bool {
        match self.start {
            Some(start) => self.state == MatchState::InProgress && start.elapsed() >= MATCH_LENGTH,
            None => false,
        }
    }

    pub fn end(&mut self) {
        self.state = MatchState::Ending;
    }

    /// Resets to `Idle` after the intermission; the controller calls this
    /// before re-evaluating whether a new match should start.
    pub fn reset_to_idle(&mut self) {
        self.state = MatchState::Idle;
        self.start = None;
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}

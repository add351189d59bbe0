//! `FleetRegistry`: the external master-server / fleet heartbeat service.
//!
//! Interface-only collaborator (`SPEC_FULL.md` §1/§6, `MASTERSERVER_GRPC`).
//! `LoggingFleetRegistry` is a best-effort stub that logs instead of
//! calling out over gRPC, matching the error-handling design's "log and
//! continue; heartbeat is best-effort" rule (`SPEC_FULL.md` §7).

use async_trait::async_trait;
use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEvent {
    Started,
    Ended,
}

#[async_trait]
pub trait FleetRegistry: Send + Sync {
    async fn heartbeat(&self, region: &str, player_count: usize);
    async fn report_match_event(&self, region: &str, event: MatchEvent);
}

pub struct LoggingFleetRegistry;

#[async_trait]
impl FleetRegistry for LoggingFleetRegistry {
    async fn heartbeat(&self, region: &str, player_count: usize) {
        info!("fleet heartbeat: region={region} players={player_count}");
    }

    async fn report_match_event(&self, region: &str, event: MatchEvent) {
        info!("fleet match event: region={region} event={event:?}");
    }
}

//! Network hub: the registry of connected clients, their reader/writer
//! tasks, and the single broadcast fan-out with backpressure-driven
//! disconnect.
//!
//! Grounded in full on `examples/original_source/game/network_manager.go`:
//! its `run()` select loop over `register`/`unregister`/`broadcast`
//! channels is this module's `run_event_loop`; its `writer`/`reader`
//! goroutines are `run_writer`/`run_reader`. The teacher's
//! `tokio::sync::mpsc` + `tokio::select!` idiom (already used in
//! `server/src/main.rs::run_game_loop`) is the concrete Rust realization.

use crate::error::TransportError;
use crate::transport::{ConnectionReader, ConnectionWriter, MAX_MESSAGE_SIZE, PING_PERIOD, PONG_WAIT, WRITE_WAIT};
use log::{info, warn};
use shared::codec::{self, Frame};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Bound on each client's outbound byte-frame queue. A client whose queue
/// fills (a slow consumer) is disconnected at the next broadcast.
pub const OUTBOUND_QUEUE_SIZE: usize = 100;
/// Bound on each client's inbound decoded-message queue.
pub const INBOUND_QUEUE_SIZE: usize = 100;

pub struct RegisterRequest {
    pub id: u32,
    pub reader: Box<dyn ConnectionReader>,
    pub writer: Box<dyn ConnectionWriter>,
    pub inbound: mpsc::Sender<Frame>,
}

enum HubEvent {
    Register(RegisterRequest),
    Unregister(u32),
    Broadcast(Vec<u8>),
    SendTo(u32, Vec<u8>),
}

/// Handle to a running hub event loop. Cloning is cheap; every clone talks
/// to the same registry.
#[derive(Clone)]
pub struct Hub {
    tx: mpsc::UnboundedSender<HubEvent>,
}

impl Hub {
    /// Spawns the hub event loop and returns a handle to it plus a stream
    /// of player ids as they get unregistered — callers (the controller)
    /// use this to learn about disconnects the hub observed directly
    /// (read errors, backpressure) rather than ones they initiated.
    pub fn spawn() -> (Hub, mpsc::UnboundedReceiver<u32>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (disconnect_tx, disconnect_rx) = mpsc::unbounded_channel();
        let hub = Hub { tx: tx.clone() };
        tokio::spawn(run_event_loop(rx, tx, disconnect_tx));
        (hub, disconnect_rx)
    }

    pub fn register(&self, request: RegisterRequest) {
        let _ = self.tx.send(HubEvent::Register(request));
    }

    pub fn unregister(&self, id: u32) {
        let _ = self.tx.send(HubEvent::Unregister(id));
    }

    /// Sends one frame to every registered client. Non-blocking per
    /// client; a full outbound queue disconnects that client instead of
    /// stalling the broadcast.
    pub fn broadcast(&self, data: Vec<u8>) {
        let _ = self.tx.send(HubEvent::Broadcast(data));
    }

    pub fn send_to(&self, id: u32, data: Vec<u8>) {
        let _ = self.tx.send(HubEvent::SendTo(id, data));
    }
}

async fn run_event_loop(
    mut rx: mpsc::UnboundedReceiver<HubEvent>,
    self_tx: mpsc::UnboundedSender<HubEvent>,
    disconnect_tx: mpsc::UnboundedSender<u32>,
) {
    let mut clients: HashMap<u32, mpsc::Sender<Vec<u8>>> = HashMap::new();

    while let Some(event) = rx.recv().await {
        match event {
            HubEvent::Register(request) => {
                let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_QUEUE_SIZE);
                clients.insert(request.id, outbound_tx);
                tokio::spawn(run_writer(request.id, request.writer, outbound_rx, self_tx.clone()));
                tokio::spawn(run_reader(request.id, request.reader, request.inbound, self_tx.clone()));
                info!("hub: registered client {}, {} connected", request.id, clients.len());
            }
            HubEvent::Unregister(id) => {
                if clients.remove(&id).is_some() {
                    info!("hub: unregistered client {}, {} connected", id, clients.len());
                    let _ = disconnect_tx.send(id);
                }
            }
            HubEvent::Broadcast(data) => {
                let mut overflowed = Vec::new();
                for (id, sender) in clients.iter() {
                    if sender.try_send(data.clone()).is_err() {
                        warn!("hub: client {} outbound queue full, disconnecting", id);
                        overflowed.push(*id);
                    }
                }
                for id in overflowed {
                    clients.remove(&id);
                    let _ = disconnect_tx.send(id);
                }
            }
            HubEvent::SendTo(id, data) => {
                if let Some(sender) = clients.get(&id) {
                    if sender.try_send(data).is_err() {
                        warn!("hub: client {} outbound queue full, disconnecting", id);
                        clients.remove(&id);
                        let _ = disconnect_tx.send(id);
                    }
                }
            }
        }
    }
}

async fn run_writer(
    id: u32,
    mut writer: Box<dyn ConnectionWriter>,
    mut outbound: mpsc::Receiver<Vec<u8>>,
    hub_tx: mpsc::UnboundedSender<HubEvent>,
) {
    writer.prepare_write(WRITE_WAIT);
    let mut ping_ticker = interval(PING_PERIOD);

    loop {
        tokio::select! {
            message = outbound.recv() => {
                match message {
                    Some(data) => {
                        if let Err(err) = writer.write(&data).await {
                            info!("hub: write error for client {}: {}", id, err);
                            break;
                        }
                    }
                    None => {
                        let _ = writer.close(true).await;
                        return;
                    }
                }
            }
            _ = ping_ticker.tick() => {
                if let Err(err) = writer.ping().await {
                    info!("hub: ping error for client {}: {}", id, err);
                    break;
                }
            }
        }
    }

    let _ = writer.close(false).await;
    let _ = hub_tx.send(HubEvent::Unregister(id));
}

async fn run_reader(
    id: u32,
    mut reader: Box<dyn ConnectionReader>,
    inbound: mpsc::Sender<Frame>,
    hub_tx: mpsc::UnboundedSender<HubEvent>,
) {
    reader.prepare_read(MAX_MESSAGE_SIZE, PONG_WAIT);

    loop {
        match reader.read().await {
            Ok(data) => {
                if data.is_empty() {
                    continue;
                }
                match codec::decode(&data) {
                    Ok(frame) => {
                        if inbound.try_send(frame).is_err() {
                            warn!("hub: inbound queue full for client {}, disconnecting", id);
                            break;
                        }
                    }
                    Err(err) => warn!("hub: codec error for client {}: {}", id, err),
                }
            }
            Err(TransportError::Closed) => {
                info!("hub: client {} closed the connection", id);
                break;
            }
            Err(err) => {
                info!("hub: read error for client {}: {}", id, err);
                break;
            }
        }
    }

    let _ = hub_tx.send(HubEvent::Unregister(id));
}

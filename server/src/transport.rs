//! Connection contract: the per-client bidirectional byte-frame channel,
//! split into a reader half and a writer half, and its WebSocket
//! realization.
//!
//! Grounded on `examples/original_source/transport/websocket.go`'s
//! `Connection` wrapper (`PrepareRead`/`Read`/`PrepareWrite`/`Write`/
//! `Ping`/`Close`), adapted to Rust in two ways:
//! - The connection is split into independent reader/writer halves (the
//!   same `SplitSink`/`SplitStream` split the teacher's `server/src/main.rs`
//!   already performs via `futures_util::StreamExt::split`), so the reader
//!   and writer tasks in `hub.rs` never contend on a shared lock.
//! - `tokio-tungstenite` has no socket-level read/write deadline the way
//!   gorilla/websocket does, so `prepare_read`/`prepare_write` record the
//!   deadline to apply and `read`/`write` enforce it via
//!   `tokio::time::timeout`. The contract shape is identical; the
//!   mechanism is idiomatic Rust.

use crate::error::TransportError;
use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

pub const WRITE_WAIT: Duration = Duration::from_secs(1);
pub const PONG_WAIT: Duration = Duration::from_secs(5);
/// 90% of `PONG_WAIT`, so at least one ping lands before the peer's read
/// deadline would otherwise expire.
pub const PING_PERIOD: Duration = Duration::from_millis(4_500);
pub const MAX_MESSAGE_SIZE: usize = 1024;

#[async_trait]
pub trait ConnectionReader: Send {
    fn prepare_read(&mut self, max_bytes: usize, idle_timeout: Duration);
    async fn read(&mut self) -> Result<Vec<u8>, TransportError>;
}

#[async_trait]
pub trait ConnectionWriter: Send {
    fn prepare_write(&mut self, write_timeout: Duration);
    async fn write(&mut self, data: &[u8]) -> Result<(), TransportError>;
    async fn ping(&mut self) -> Result<(), TransportError>;
    async fn close(&mut self, graceful: bool) -> Result<(), TransportError>;
}

pub struct WebSocketReader {
    stream: SplitStream<WebSocketStream<TcpStream>>,
    max_bytes: usize,
    idle_timeout: Duration,
}

pub struct WebSocketWriter {
    sink: SplitSink<WebSocketStream<TcpStream>, Message>,
    write_timeout: Duration,
}

/// Splits an accepted WebSocket stream into independent reader/writer
/// halves, each ready with the protocol's default deadlines and frame
/// size limit.
pub fn split(stream: WebSocketStream<TcpStream>) -> (WebSocketReader, WebSocketWriter) {
    let (sink, source) = stream.split();
    (
        WebSocketReader {
            stream: source,
            max_bytes: MAX_MESSAGE_SIZE,
            idle_timeout: PONG_WAIT,
        },
        WebSocketWriter {
            sink,
            write_timeout: WRITE_WAIT,
        },
    )
}

#[async_trait]
impl ConnectionReader for WebSocketReader {
    fn prepare_read(&mut self, max_bytes: usize, idle_timeout: Duration) {
        self.max_bytes = max_bytes;
        self.idle_timeout = idle_timeout;
    }

    async fn read(&mut self) -> Result<Vec<u8>, TransportError> {
        let message = timeout(self.idle_timeout, self.stream.next())
            .await
            .map_err(|_| TransportError::Timeout)?
            .ok_or(TransportError::Closed)??;

        match message {
            Message::Binary(data) => {
                if data.len() > self.max_bytes {
                    return Err(TransportError::FrameTooLarge);
                }
                Ok(data)
            }
            Message::Close(_) => Err(TransportError::Closed),
            // Pongs refresh liveness implicitly (the read succeeded within
            // the deadline); the reader loop just asks for the next frame.
            Message::Ping(_) | Message::Pong(_) | Message::Text(_) | Message::Frame(_) => {
                Ok(Vec::new())
            }
        }
    }
}

#[async_trait]
impl ConnectionWriter for WebSocketWriter {
    fn prepare_write(&mut self, write_timeout: Duration) {
        self.write_timeout = write_timeout;
    }

    async fn write(&mut self, data: &[u8]) -> Result<(), TransportError> {
        timeout(self.write_timeout, self.sink.send(Message::Binary(data.to_vec())))
            .await
            .map_err(|_| TransportError::Timeout)??;
        Ok(())
    }

    async fn ping(&mut self) -> Result<(), TransportError> {
        timeout(self.write_timeout, self.sink.send(Message::Ping(Vec::new())))
            .await
            .map_err(|_| TransportError::Timeout)??;
        Ok(())
    }

    async fn close(&mut self, graceful: bool) -> Result<(), TransportError> {
        if graceful {
            timeout(self.write_timeout, self.sink.close())
                .await
                .map_err(|_| TransportError::Timeout)??;
        } else {
            let _ = self.sink.close().await;
        }
        Ok(())
    }
}

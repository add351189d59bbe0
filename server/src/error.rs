//! Typed errors for the transport, codec, and configuration boundaries.
//!
//! The teacher codebase mostly bubbles up `Box<dyn std::error::Error>` or
//! bare `String`s from `network.rs`/`main.rs`; this port tightens those
//! seams into enumerable error types so callers can match on failure kind
//! instead of inspecting a message.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection closed by peer")]
    Closed,
    #[error("read or write deadline exceeded")]
    Timeout,
    #[error("frame exceeded max message size")]
    FrameTooLarge,
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} was not set")]
    MissingEnv(&'static str),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity token was rejected")]
    Rejected,
    #[error("identity service call failed: {0}")]
    ServiceUnavailable(String),
}

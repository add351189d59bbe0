//! Binary wire codec.
//!
//! Most frames start with a 6-byte header: player id (1 byte), message
//! type (1 byte), and the current game time in milliseconds as a
//! **little-endian** `u32`. The body layout depends on the message type.
//!
//! `PlayerInput` (client -> server, type 1) is the one exception: it carries
//! no game-time field at all. Its frame is `id, type, 7 control bytes,
//! big-endian u32 sequence` — 13 bytes total, matching the original
//! protocol's `decodePlayerInput`. `decode` always treats an incoming type-1
//! frame as `PlayerInput` since this codec is used server-side to parse
//! client-sent frames only; a client build decoding server broadcasts would
//! read the same type byte as `PlayerState` with the full 6-byte header
//! instead.
//!
//! The body endianness is *not* uniform, by design of the system this
//! protocol was carried over from: header time and all floats are
//! little-endian, but `PlayerInput`'s sequence number and the `TimeEcho`
//! payload are big-endian. This is preserved exactly — see
//! `SPEC_FULL.md` §9 Open Question 1. A future protocol version should
//! unify on one endianness; this one must stay wire-compatible with
//! existing clients.

use crate::player::Controls;
use std::convert::TryInto;

pub const HEADER_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    PlayerAuth = 0,
    PlayerInputOrState = 1,
    PlayerRegister = 2,
    PlayerRegisterAck = 3,
    TimeEcho = 5,
    GameStart = 6,
    GameEnd = 7,
}

impl MessageType {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(MessageType::PlayerAuth),
            1 => Some(MessageType::PlayerInputOrState),
            2 => Some(MessageType::PlayerRegister),
            3 => Some(MessageType::PlayerRegisterAck),
            5 => Some(MessageType::TimeEcho),
            6 => Some(MessageType::GameStart),
            7 => Some(MessageType::GameEnd),
            _ => None,
        }
    }
}

/// A player's full, broadcastable state — the body of a `PlayerState`
/// (server -> client) type-1 frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerStateBody {
    pub sequence: u32,
    pub pos_x: f32,
    pub pos_y: f32,
    pub turret_x: f32,
    pub turret_y: f32,
    pub rotation: f32,
    pub turret_rotation: f32,
    pub shooting: bool,
    pub health: u8,
}

/// A decoded incoming frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    PlayerAuth { player_id: u8, game_time: u32, token: String },
    /// Client -> server. No `game_time` field on the wire — see module docs.
    PlayerInput { player_id: u8, controls: Controls },
    PlayerState { player_id: u8, game_time: u32, body: PlayerStateBody },
    PlayerRegister { player_id: u8, game_time: u32 },
    TimeEcho { player_id: u8, game_time: u32, value: u32 },
    GameStart { player_id: u8, game_time: u32 },
    GameEnd { player_id: u8, game_time: u32 },
    /// A well-framed message of an unrecognized type; the body is dropped.
    Unknown { player_id: u8, game_time: u32, message_type: u8 },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("frame too short: got {0} bytes, need at least {1}")]
    TooShort(usize, usize),
    #[error("token body was not valid utf-8")]
    InvalidToken,
}

fn header(player_id: u8, message_type: u8, game_time: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN);
    buf.push(player_id);
    buf.push(message_type);
    buf.extend_from_slice(&game_time.to_le_bytes());
    buf
}

/// Length of a `PlayerInput` frame: id, type, 7 control bytes, big-endian
/// u32 sequence. No game-time field — see module docs.
const PLAYER_INPUT_LEN: usize = 2 + 7 + 4;

/// Decodes a raw frame. Frames shorter than their header are rejected;
/// anything else that fails a type-specific body check is decoded as
/// `Frame::Unknown` rather than erroring, matching the protocol's "unknown
/// types drop the body" contract.
pub fn decode(data: &[u8]) -> Result<Frame, CodecError> {
    if data.len() < 2 {
        return Err(CodecError::TooShort(data.len(), 2));
    }
    let player_id = data[0];
    let message_type = data[1];

    if message_type == MessageType::PlayerInputOrState as u8 {
        if data.len() < PLAYER_INPUT_LEN {
            return Err(CodecError::TooShort(data.len(), PLAYER_INPUT_LEN));
        }
        let body = &data[2..];
        return Ok(Frame::PlayerInput {
            player_id,
            controls: Controls {
                forward: body[0] == 1,
                backward: body[1] == 1,
                left: body[2] == 1,
                right: body[3] == 1,
                turret_right: body[4] == 1,
                turret_left: body[5] == 1,
                shoot: body[6] == 1,
                // sequence is big-endian on the wire — see module docs.
                sequence: u32::from_be_bytes(body[7..11].try_into().unwrap()),
            },
        });
    }

    if data.len() < HEADER_LEN {
        return Err(CodecError::TooShort(data.len(), HEADER_LEN));
    }
    let game_time = u32::from_le_bytes(data[2..6].try_into().unwrap());
    let body = &data[6..];

    Ok(match MessageType::from_byte(message_type) {
        Some(MessageType::PlayerAuth) => Frame::PlayerAuth {
            player_id,
            game_time,
            token: String::from_utf8(body.to_vec()).map_err(|_| CodecError::InvalidToken)?,
        },
        Some(MessageType::PlayerRegister) | Some(MessageType::PlayerRegisterAck) => {
            Frame::PlayerRegister { player_id, game_time }
        }
        Some(MessageType::TimeEcho) if body.len() >= 4 => Frame::TimeEcho {
            player_id,
            game_time,
            // time-echo body is big-endian on the wire — see module docs.
            value: u32::from_be_bytes(body[0..4].try_into().unwrap()),
        },
        Some(MessageType::GameStart) => Frame::GameStart { player_id, game_time },
        Some(MessageType::GameEnd) => Frame::GameEnd { player_id, game_time },
        _ => Frame::Unknown {
            player_id,
            game_time,
            message_type,
        },
    })
}

pub fn encode_player_auth(player_id: u8, game_time: u32, token: &str) -> Vec<u8> {
    let mut buf = header(player_id, MessageType::PlayerAuth as u8, game_time);
    buf.extend_from_slice(token.as_bytes());
    buf
}

/// Encodes a `PlayerInput` frame. No game-time field on the wire — see
/// module docs.
pub fn encode_player_input(player_id: u8, controls: &Controls) -> Vec<u8> {
    let mut buf = Vec::with_capacity(PLAYER_INPUT_LEN);
    buf.push(player_id);
    buf.push(MessageType::PlayerInputOrState as u8);
    buf.push(controls.forward as u8);
    buf.push(controls.backward as u8);
    buf.push(controls.left as u8);
    buf.push(controls.right as u8);
    buf.push(controls.turret_right as u8);
    buf.push(controls.turret_left as u8);
    buf.push(controls.shoot as u8);
    buf.extend_from_slice(&controls.sequence.to_be_bytes());
    buf
}

pub fn encode_player_state(player_id: u8, game_time: u32, body: &PlayerStateBody) -> Vec<u8> {
    let mut buf = header(player_id, MessageType::PlayerInputOrState as u8, game_time);
    buf.extend_from_slice(&body.sequence.to_le_bytes());
    buf.extend_from_slice(&body.pos_x.to_le_bytes());
    buf.extend_from_slice(&body.pos_y.to_le_bytes());
    buf.extend_from_slice(&body.turret_x.to_le_bytes());
    buf.extend_from_slice(&body.turret_y.to_le_bytes());
    buf.extend_from_slice(&body.rotation.to_le_bytes());
    buf.extend_from_slice(&body.turret_rotation.to_le_bytes());
    buf.push(body.shooting as u8);
    buf.push(body.health);
    buf
}

pub fn encode_player_register(player_id: u8, game_time: u32) -> Vec<u8> {
    header(player_id, MessageType::PlayerRegister as u8, game_time)
}

pub fn encode_time_echo(player_id: u8, game_time: u32, value: u32) -> Vec<u8> {
    let mut buf = header(player_id, MessageType::TimeEcho as u8, game_time);
    buf.extend_from_slice(&value.to_be_bytes());
    buf
}

pub fn encode_game_start(player_id: u8, game_time: u32) -> Vec<u8> {
    header(player_id, MessageType::GameStart as u8, game_time)
}

pub fn encode_game_end(player_id: u8, game_time: u32) -> Vec<u8> {
    header(player_id, MessageType::GameEnd as u8, game_time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_frames() {
        assert_eq!(decode(&[1, 2, 3]), Err(CodecError::TooShort(3, HEADER_LEN)));
    }

    #[test]
    fn player_input_round_trips_with_mixed_endianness() {
        let controls = Controls {
            forward: true,
            backward: false,
            left: true,
            right: false,
            turret_left: false,
            turret_right: true,
            shoot: true,
            sequence: 0x0102_0304,
        };
        let frame = encode_player_input(7, &controls);
        assert_eq!(frame.len(), PLAYER_INPUT_LEN);
        // sequence body is big-endian, with no game-time field on this frame
        assert_eq!(&frame[9..13], &0x0102_0304u32.to_be_bytes());

        match decode(&frame).unwrap() {
            Frame::PlayerInput {
                player_id,
                controls: decoded,
            } => {
                assert_eq!(player_id, 7);
                assert_eq!(decoded.forward, controls.forward);
                assert_eq!(decoded.turret_right, controls.turret_right);
                assert_eq!(decoded.sequence, controls.sequence);
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn time_echo_round_trips() {
        let frame = encode_time_echo(3, 10, 0xdead_beef);
        match decode(&frame).unwrap() {
            Frame::TimeEcho { value, .. } => assert_eq!(value, 0xdead_beef),
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn unknown_message_type_keeps_header() {
        let mut raw = header(9, 200, 42);
        raw.extend_from_slice(b"ignored body");
        match decode(&raw).unwrap() {
            Frame::Unknown {
                player_id,
                game_time,
                message_type,
            } => {
                assert_eq!(player_id, 9);
                assert_eq!(game_time, 42);
                assert_eq!(message_type, 200);
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn player_state_body_round_trips_floats_little_endian() {
        let body = PlayerStateBody {
            sequence: 42,
            pos_x: 1.5,
            pos_y: -2.25,
            turret_x: 3.0,
            turret_y: 4.0,
            rotation: 0.1,
            turret_rotation: -0.2,
            shooting: true,
            health: 80,
        };
        let frame = encode_player_state(1, 1000, &body);
        assert_eq!(&frame[6..10], &42u32.to_le_bytes());
        assert_eq!(&frame[10..14], &1.5f32.to_le_bytes());
    }
}

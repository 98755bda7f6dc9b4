//! Binary codec: a one-byte tag followed by the message body.
//!
//! Bodies are bincode (standard config) except `Version`, which is always a
//! big-endian `u32` so that peers on different protocol versions can still
//! read each other's version.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::protocol::{tags, Message};

/// Upper bound on a single frame body.
pub const MAX_FRAME_LEN: u32 = 1 << 20;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("empty frame")]
    Empty,

    #[error("unknown message tag {0}")]
    UnknownTag(u8),

    #[error("frame of {0} bytes exceeds the limit")]
    FrameTooLarge(u32),

    #[error("{extra} trailing bytes after message {tag}")]
    TrailingBytes { tag: u8, extra: usize },

    #[error("truncated version message")]
    TruncatedVersion,

    #[error("encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}

pub fn encode(message: &Message) -> Result<Vec<u8>, CodecError> {
    let mut frame = vec![message.tag()];
    match message {
        Message::Version(version) => frame.extend_from_slice(&version.to_be_bytes()),
        Message::SetAltitude(body) => append(&mut frame, body)?,
        Message::SetVelocity(body) => append(&mut frame, body)?,
        Message::SetTurning(body) => append(&mut frame, body)?,
        Message::TakeOff => {}
        Message::Handover(body) => append(&mut frame, body)?,
        Message::AircraftCreate(body) => append(&mut frame, body)?,
        Message::AircraftDestroy(body) => append(&mut frame, body)?,
        Message::AircraftUpdate(body) => append(&mut frame, body)?,
        Message::GameStart(body) => append(&mut frame, body)?,
        Message::GameEnd(body) => append(&mut frame, body)?,
        Message::ScoreUpdate(body) => append(&mut frame, body)?,
        Message::LandedUpdate(body) => append(&mut frame, body)?,
    }
    Ok(frame)
}

pub fn decode(frame: &[u8]) -> Result<Message, CodecError> {
    let (&tag, body) = frame.split_first().ok_or(CodecError::Empty)?;
    let message = match tag {
        tags::VERSION => {
            let bytes: [u8; 4] = body.try_into().map_err(|_| CodecError::TruncatedVersion)?;
            Message::Version(u32::from_be_bytes(bytes))
        }
        tags::SET_ALTITUDE => Message::SetAltitude(read(tag, body)?),
        tags::SET_VELOCITY => Message::SetVelocity(read(tag, body)?),
        tags::SET_TURNING => Message::SetTurning(read(tag, body)?),
        tags::TAKE_OFF => {
            expect_consumed(tag, body.len())?;
            Message::TakeOff
        }
        tags::HANDOVER => Message::Handover(read(tag, body)?),
        tags::AIRCRAFT_CREATE => Message::AircraftCreate(read(tag, body)?),
        tags::AIRCRAFT_DESTROY => Message::AircraftDestroy(read(tag, body)?),
        tags::AIRCRAFT_UPDATE => Message::AircraftUpdate(read(tag, body)?),
        tags::GAME_START => Message::GameStart(read(tag, body)?),
        tags::GAME_END => Message::GameEnd(read(tag, body)?),
        tags::SCORE_UPDATE => Message::ScoreUpdate(read(tag, body)?),
        tags::LANDED_UPDATE => Message::LandedUpdate(read(tag, body)?),
        other => return Err(CodecError::UnknownTag(other)),
    };
    Ok(message)
}

fn append<T: Serialize>(frame: &mut Vec<u8>, body: &T) -> Result<(), CodecError> {
    let bytes = bincode::serde::encode_to_vec(body, bincode::config::standard())?;
    frame.extend_from_slice(&bytes);
    Ok(())
}

fn read<T: DeserializeOwned>(tag: u8, body: &[u8]) -> Result<T, CodecError> {
    let (value, read) = bincode::serde::decode_from_slice(body, bincode::config::standard())?;
    expect_consumed(tag, body.len() - read)?;
    Ok(value)
}

fn expect_consumed(tag: u8, extra: usize) -> Result<(), CodecError> {
    if extra == 0 {
        Ok(())
    } else {
        Err(CodecError::TrailingBytes { tag, extra })
    }
}

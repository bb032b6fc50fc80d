//! Fixed-size message framing.
//!
//! Each round carries one 240-byte frame: a discriminant byte followed by
//! the body, zero-padded to full size. Real text and idle-round heartbeats
//! are indistinguishable on the wire once sealed.

use crate::errors::ConvoError;
use crate::types::SIZE_MESSAGE;

/// Maximum text payload per frame (one byte is the discriminant).
pub const MAX_TEXT_LEN: usize = SIZE_MESSAGE - 1;

const TAG_TIMESTAMP: u8 = 0;
const TAG_TEXT: u8 = 1;

/// One message per round: application text, or a heartbeat carrying the
/// sender's clock when nothing is queued.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConvoMessage {
    /// Seconds since the Unix epoch, signed varint encoded.
    Timestamp(i64),
    /// Raw text bytes, at most [`MAX_TEXT_LEN`] long.
    Text(Vec<u8>),
}

impl ConvoMessage {
    pub fn encode(&self) -> Result<[u8; SIZE_MESSAGE], ConvoError> {
        let mut frame = [0u8; SIZE_MESSAGE];
        match self {
            ConvoMessage::Timestamp(secs) => {
                frame[0] = TAG_TIMESTAMP;
                put_varint(&mut frame[1..], *secs);
            }
            ConvoMessage::Text(body) => {
                if body.len() > MAX_TEXT_LEN {
                    return Err(ConvoError::MessageTooLong(body.len()));
                }
                frame[0] = TAG_TEXT;
                frame[1..1 + body.len()].copy_from_slice(body);
            }
        }
        Ok(frame)
    }

    /// Decode a frame. Text keeps its zero padding; stripping it is a
    /// display concern.
    pub fn decode(frame: &[u8]) -> Result<Self, ConvoError> {
        let (&tag, body) = frame.split_first().ok_or(ConvoError::MalformedMessage(0))?;
        match tag {
            TAG_TIMESTAMP => {
                let secs = read_varint(body).ok_or(ConvoError::MalformedMessage(tag))?;
                Ok(ConvoMessage::Timestamp(secs))
            }
            TAG_TEXT => Ok(ConvoMessage::Text(body.to_vec())),
            other => Err(ConvoError::MalformedMessage(other)),
        }
    }
}

// Zigzag LEB128 (the signed varint layout used by protobuf).
fn put_varint(buf: &mut [u8], v: i64) -> usize {
    let mut ux = ((v as u64) << 1) ^ ((v >> 63) as u64);
    let mut i = 0;
    while ux >= 0x80 {
        buf[i] = (ux as u8) | 0x80;
        ux >>= 7;
        i += 1;
    }
    buf[i] = ux as u8;
    i + 1
}

fn read_varint(buf: &[u8]) -> Option<i64> {
    let mut ux: u64 = 0;
    let mut shift = 0u32;
    for &b in buf {
        if shift > 63 || (shift == 63 && b > 1) {
            return None;
        }
        ux |= ((b & 0x7f) as u64) << shift;
        if b & 0x80 == 0 {
            return Some((ux >> 1) as i64 ^ -((ux & 1) as i64));
        }
        shift += 7;
    }
    None
}

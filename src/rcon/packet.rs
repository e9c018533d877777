//! Wire encoding of RCON packets.
//!
//! ```text
//! | size: i32 LE | request id: i32 LE | type: i32 LE | payload | 0x00 0x00 |
//! ```
//!
//! `size` counts everything after itself.

use super::{HEADER_LEN, PADDING_LEN};
use crate::errors::RconProtocolError;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::mem::size_of;

/// Tag distinguishing the kinds of packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    /// Part of a multi-packet server response. Never sent by this client.
    Response,
    /// A command, or the server's reply to a command or successful login.
    Command,
    /// Login request carrying the password.
    Login,
    /// Any other tag. Kept as-is since command replies are not type checked.
    Unknown(i32),
}

impl From<PacketType> for i32 {
    fn from(packet_type: PacketType) -> Self {
        match packet_type {
            PacketType::Response => 0,
            PacketType::Command => 2,
            PacketType::Login => 3,
            PacketType::Unknown(value) => value,
        }
    }
}

impl From<i32> for PacketType {
    fn from(value: i32) -> Self {
        match value {
            0 => PacketType::Response,
            2 => PacketType::Command,
            3 => PacketType::Login,
            other => PacketType::Unknown(other),
        }
    }
}

/// A single RCON packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Correlation token echoed by the server.
    pub request_id: i32,
    /// Packet kind.
    pub packet_type: PacketType,
    /// Raw payload bytes, without the trailing padding.
    pub payload: Bytes,
}

impl Packet {
    /// Construct a packet. Payload length is the caller's responsibility.
    pub fn new(request_id: i32, packet_type: PacketType, payload: impl Into<Bytes>) -> Self {
        Self {
            request_id,
            packet_type,
            payload: payload.into(),
        }
    }

    /// Serialize into the exact wire layout.
    pub fn bytes(self) -> Bytes {
        Bytes::from(self)
    }

    /// Parse one frame from the front of `data`.
    ///
    /// # Errors
    /// Returns [`RconProtocolError::TruncatedFrame`] if `data` ends before the
    /// payload the size field declares, and [`RconProtocolError::InvalidSize`] if
    /// the size field is too small for the fixed fields.
    pub fn parse(data: &[u8]) -> Result<Self, RconProtocolError> {
        if data.len() < HEADER_LEN {
            return Err(RconProtocolError::TruncatedFrame {
                declared: HEADER_LEN,
                available: data.len(),
            });
        }

        let mut header = &data[..HEADER_LEN];
        let size = header.get_i32_le(); // length of remaining packet (not including this integer)
        let request_id = header.get_i32_le();
        let packet_type = header.get_i32_le();

        if size < get_remaining_length(0) {
            return Err(RconProtocolError::InvalidSize(size));
        }

        // size excludes its own 4 bytes, so the payload ends at size + 2.
        // The trailing padding is not required to be present.
        let payload_end = size as usize + PADDING_LEN;
        if data.len() < payload_end {
            return Err(RconProtocolError::TruncatedFrame {
                declared: payload_end,
                available: data.len(),
            });
        }

        let payload = Bytes::copy_from_slice(&data[HEADER_LEN..payload_end]);

        Ok(Self::new(request_id, packet_type.into(), payload))
    }

    /// The payload decoded as text. Invalid UTF-8 is replaced, not rejected,
    /// so format markers and other server quirks pass through.
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

impl From<Packet> for Bytes {
    fn from(packet: Packet) -> Self {
        let len = get_remaining_length(packet.payload.len());
        let packet_type: i32 = packet.packet_type.into();

        let mut bytes = BytesMut::with_capacity(len as usize + size_of::<i32>());

        bytes.put_i32_le(len);
        bytes.put_i32_le(packet.request_id);
        bytes.put_i32_le(packet_type);
        bytes.put(packet.payload);
        bytes.put_u16(0x00_00);

        bytes.freeze()
    }
}

/// Get the *remaining length* of a packet given its payload length.
///
/// This is the value of the size field: request id and type (two [i32]s),
/// the payload, and the two padding bytes.
fn get_remaining_length(payload_len: usize) -> i32 {
    (payload_len + size_of::<i32>() * 2 + PADDING_LEN) as i32
}

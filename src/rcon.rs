//! Remote command execution for minecraft servers.
//! See the documentation for [`RconClient`] for more information.

mod client;
pub mod packet;
pub mod receiver;

use std::time::Duration;

pub use client::{RconClient, SessionState};
pub use packet::{Packet, PacketType};
pub use receiver::{FrameReceiver, LengthPrefixedReceiver, ShortReadReceiver};

#[cfg(test)]
pub(crate) use client::tests as test_support;

/// Largest payload either side is expected to send in one packet.
pub const MAX_PAYLOAD_LEN: usize = 4096;

/// Size, request id and type fields.
pub const HEADER_LEN: usize = 12;

/// Two zero bytes terminate every packet.
pub const PADDING_LEN: usize = 2;

/// Header + maximum payload + padding.
pub const MAX_RECV_SIZE: usize = HEADER_LEN + MAX_PAYLOAD_LEN + PADDING_LEN;

/// Applied to dialing and to each read and write.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default RCON port of a vanilla server.
pub const DEFAULT_PORT: u16 = 25575;

/// Request id the server answers a rejected login with.
pub const AUTH_FAILURE_ID: i32 = -1;

//! Strategies for collecting one reply from the transport.

use super::{HEADER_LEN, MAX_RECV_SIZE, PADDING_LEN};
use crate::{
    errors::{RconProtocolError, Result},
    socket::Transport,
};
use async_trait::async_trait;
use bytes::{BufMut, Bytes, BytesMut};
use std::mem::size_of;
use tracing::trace;

/// Turns zero or more transport reads into the bytes of one reply.
///
/// An empty result means the peer closed the connection without sending
/// anything.
#[async_trait]
pub trait FrameReceiver: Send {
    /// Receive one logical reply.
    async fn receive(&mut self, transport: &mut dyn Transport) -> Result<Bytes>;
}

/// Treats a short read as the end of the reply.
///
/// Reads up to `buf_size` bytes at a time and stops on end of stream or on
/// the first read that does not fill the buffer. This is not a real frame
/// boundary: if a reply happens to fill the buffer exactly, the next read
/// blocks until the deadline. The protocol has no reliable end marker for
/// single-packet replies, so this is accepted as a known limitation.
#[derive(Debug, Clone)]
pub struct ShortReadReceiver {
    buf: Vec<u8>,
}

impl ShortReadReceiver {
    /// Receiver reading `buf_size` bytes per chunk. Sizes below an empty
    /// packet are raised to that minimum.
    pub fn new(buf_size: usize) -> Self {
        Self {
            buf: vec![0; buf_size.max(HEADER_LEN + PADDING_LEN)],
        }
    }
}

#[async_trait]
impl FrameReceiver for ShortReadReceiver {
    async fn receive(&mut self, transport: &mut dyn Transport) -> Result<Bytes> {
        let mut received = BytesMut::new();

        loop {
            let n = transport.read(&mut self.buf).await?;
            trace!(n, "read chunk");

            if n == 0 {
                break;
            }

            received.extend_from_slice(&self.buf[..n]);

            if n < self.buf.len() {
                break;
            }
        }

        Ok(received.freeze())
    }
}

/// Reads exactly one frame as announced by its size field.
///
/// Unlike [`ShortReadReceiver`] this never over- or under-reads, at the cost
/// of at least two reads per reply. A stream that ends mid-frame yields
/// whatever was received so the codec reports the truncation. Frames larger
/// than `max_frame` are rejected before their body is read.
#[derive(Debug, Clone)]
pub struct LengthPrefixedReceiver {
    max_frame: usize,
}

impl Default for LengthPrefixedReceiver {
    fn default() -> Self {
        Self::new(MAX_RECV_SIZE)
    }
}

impl LengthPrefixedReceiver {
    /// Receiver accepting frames of at most `max_frame` bytes in total.
    pub fn new(max_frame: usize) -> Self {
        Self { max_frame }
    }

    async fn fill(
        transport: &mut dyn Transport,
        bytes: &mut BytesMut,
        want: usize,
    ) -> Result<bool> {
        let mut chunk = [0u8; 512];

        while bytes.len() < want {
            let limit = (want - bytes.len()).min(chunk.len());
            let n = transport.read(&mut chunk[..limit]).await?;

            if n == 0 {
                return Ok(false);
            }

            bytes.put_slice(&chunk[..n]);
        }

        Ok(true)
    }
}

#[async_trait]
impl FrameReceiver for LengthPrefixedReceiver {
    async fn receive(&mut self, transport: &mut dyn Transport) -> Result<Bytes> {
        let mut bytes = BytesMut::with_capacity(HEADER_LEN);

        if !Self::fill(transport, &mut bytes, size_of::<i32>()).await? {
            return Ok(bytes.freeze());
        }

        let len = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let total = size_of::<i32>() + len.max(0) as usize;

        if total > self.max_frame {
            return Err(RconProtocolError::InvalidSize(len).into());
        }

        Self::fill(transport, &mut bytes, total).await?;

        Ok(bytes.freeze())
    }
}

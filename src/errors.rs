//! All the errors defined by this crate.

use std::io::{self, ErrorKind};
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, RconError>;

/// Any error that can end an RCON session or exchange.
#[derive(Error, Debug)]
pub enum RconError {
    /// Socket failure while dialing, reading or writing.
    #[error("network error: {0}")]
    Network(#[from] io::Error),

    /// Reading commands or writing their output failed.
    #[error("console error: {0}")]
    Console(#[source] io::Error),

    /// A connect, read or write did not complete within the configured timeout.
    #[error("{0} timed out")]
    Timeout(&'static str),

    /// The server rejected the password (replied with request id `-1`).
    #[error("incorrect password")]
    Auth,

    /// The server sent something this client cannot make sense of.
    #[error(transparent)]
    Protocol(#[from] RconProtocolError),
}

impl RconError {
    /// Whether this error came from the transport (socket failure or timeout).
    /// Network errors are always fatal to the session.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }
}

impl From<RconError> for io::Error {
    fn from(err: RconError) -> Self {
        match err {
            RconError::Network(err) | RconError::Console(err) => err,
            RconError::Timeout(_) => io::Error::new(ErrorKind::TimedOut, err),
            RconError::Auth => io::Error::new(ErrorKind::PermissionDenied, err),
            RconError::Protocol(err) => err.into(),
        }
    }
}

/// An error from the RCON protocol.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RconProtocolError {
    /// The login reply matched neither success nor the `-1` rejection sentinel.
    #[error("login failed")]
    LoginFailed,

    /// The server closed the connection without replying.
    #[error("no response received")]
    NoResponse,

    /// Fewer bytes were received than the frame's size field declares.
    #[error("truncated frame: declared {declared} bytes, got {available}")]
    TruncatedFrame {
        /// Total frame length implied by the size field.
        declared: usize,
        /// Bytes actually available.
        available: usize,
    },

    /// The size field is smaller than an empty packet.
    #[error("invalid packet size {0}")]
    InvalidSize(i32),

    /// Payload too long.
    ///
    /// | Direction   | Payload Length limit |
    /// | ----------- | -------------------- |
    /// | Serverbound | 4096                 |
    /// | Clientbound | 4096                 |
    #[error("payload too long ({0} bytes)")]
    PayloadTooLong(usize),

    /// A command was issued before a successful login.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The session has already been closed.
    #[error("session closed")]
    Closed,
}

impl From<RconProtocolError> for io::Error {
    fn from(err: RconProtocolError) -> Self {
        io::Error::new(ErrorKind::InvalidData, err)
    }
}

/// Build the error returned when `op` exceeds its deadline.
pub(crate) fn timeout_err<T>(op: &'static str) -> Result<T> {
    Err(RconError::Timeout(op))
}

//! Interactive client for the [RCON](https://wiki.vg/RCON) remote console
//! protocol used by minecraft servers.
//!
//! The [`rcon`] module holds the protocol: packet encoding, reply
//! reassembly and the [`RconClient`] session. [`driver`] runs the
//! read-execute-print loop on top of a session, and [`format`] renders the
//! server's colour codes for a terminal.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod driver;
pub mod errors;
pub mod format;
pub mod rcon;
pub mod socket;

pub use config::ClientConfig;
pub use errors::{RconError, RconProtocolError, Result};
pub use rcon::RconClient;

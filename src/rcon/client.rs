//! Implementation of the [RCON](https://wiki.vg/RCON) protocol.

use super::{
    packet::{Packet, PacketType},
    receiver::{FrameReceiver, ShortReadReceiver},
    AUTH_FAILURE_ID, MAX_PAYLOAD_LEN,
};
use crate::{
    config::ClientConfig,
    errors::{RconError, RconProtocolError, Result},
    socket::{TimedStream, Transport},
};
use tokio::net::TcpStream;
use tracing::{debug, info};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connected but not logged in.
    Connected,
    /// Logged in; commands may be executed.
    Authenticated,
    /// The transport has been released.
    Closed,
}

/// Struct that stores the connection and other state of the RCON protocol with the server.
///
/// Exactly one request is in flight at a time: every method that talks to the
/// server writes one packet and then waits for its reply before returning.
///
/// # Examples
///
/// ```no_run
/// use mc_rcon::{rcon::RconClient, ClientConfig};
///
/// #[tokio::main]
/// async fn main() -> mc_rcon::Result<()> {
///     let config = ClientConfig::builder().host("localhost").build();
///     let mut client = RconClient::connect(&config, 1).await?;
///     client.authenticate("password").await?;
///
///     let output = client.execute("time set day").await?;
///     println!("{output}");
///
///     client.close().await
/// }
/// ```
#[allow(clippy::module_name_repetitions)]
pub struct RconClient<T, R = ShortReadReceiver> {
    transport: T,
    receiver: R,
    request_id: i32,
    state: SessionState,
}

impl RconClient<TimedStream<TcpStream>> {
    /// Connect to the server described by `config`.
    /// Note: to authenticate use the `authenticate` method, this method does not take a password.
    ///
    /// `request_id` is used for the login and for every command of this session.
    ///
    /// # Errors
    /// Returns `Err` if the server cannot be reached within the configured timeout.
    pub async fn connect(config: &ClientConfig, request_id: i32) -> Result<Self> {
        let stream = TimedStream::connect(&config.host, config.port, config.timeout).await?;
        debug!(address = %config.address(), request_id, "connected");

        Ok(Self::new(stream, config, request_id))
    }
}

impl<T: Transport> RconClient<T> {
    /// Build a session over an already connected transport.
    pub fn new(transport: T, config: &ClientConfig, request_id: i32) -> Self {
        Self::with_receiver(
            transport,
            ShortReadReceiver::new(config.max_recv_size),
            request_id,
        )
    }
}

impl<T: Transport, R: FrameReceiver> RconClient<T, R> {
    /// Build a session that collects replies with a custom [`FrameReceiver`].
    pub fn with_receiver(transport: T, receiver: R, request_id: i32) -> Self {
        Self {
            transport,
            receiver,
            request_id,
            state: SessionState::Connected,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The request id used for every packet of this session.
    pub fn request_id(&self) -> i32 {
        self.request_id
    }

    /// Authenticate with the server, with the given password.
    ///
    /// # Errors
    /// Returns [`RconError::Auth`] if the password was rejected,
    /// [`RconProtocolError::LoginFailed`] if the reply was neither an
    /// acceptance nor a rejection, and a network error if the exchange failed.
    /// Network errors close the session.
    pub async fn authenticate(&mut self, password: &str) -> Result<()> {
        if self.state == SessionState::Closed {
            return Err(RconProtocolError::Closed.into());
        }

        let packet = Packet::new(self.request_id, PacketType::Login, password.to_owned());
        let reply = self.exchange(packet).await?;

        if reply.request_id == self.request_id && reply.packet_type == PacketType::Command {
            info!("logged in");
            self.state = SessionState::Authenticated;
            Ok(())
        } else if reply.request_id == AUTH_FAILURE_ID {
            debug!("server rejected password");
            Err(RconError::Auth)
        } else {
            debug!(
                request_id = reply.request_id,
                packet_type = ?reply.packet_type,
                "unexpected login reply"
            );
            Err(RconProtocolError::LoginFailed.into())
        }
    }

    /// Run the given command on the server and return its output.
    ///
    /// Surrounding whitespace is trimmed before sending. The reply's id and
    /// type are not checked.
    ///
    /// # Errors
    /// Returns [`RconProtocolError::NotAuthenticated`] before a successful
    /// login, [`RconProtocolError::PayloadTooLong`] for commands over 4096
    /// bytes, [`RconProtocolError::NoResponse`] if the server hung up without
    /// replying, and a network error if the exchange failed.
    pub async fn execute(&mut self, command: &str) -> Result<String> {
        match self.state {
            SessionState::Authenticated => {}
            SessionState::Connected => return Err(RconProtocolError::NotAuthenticated.into()),
            SessionState::Closed => return Err(RconProtocolError::Closed.into()),
        }

        let command = command.trim();
        if command.len() > MAX_PAYLOAD_LEN {
            return Err(RconProtocolError::PayloadTooLong(command.len()).into());
        }

        let packet = Packet::new(self.request_id, PacketType::Command, command.to_owned());
        let reply = self.exchange(packet).await?;

        Ok(reply.payload_text())
    }

    /// Release the connection. Calling this again does nothing.
    ///
    /// # Errors
    /// Returns `Err` if shutting the stream down failed; the session is
    /// closed either way.
    pub async fn close(&mut self) -> Result<()> {
        if self.state == SessionState::Closed {
            return Ok(());
        }

        self.state = SessionState::Closed;
        info!("closing session");
        self.transport.shutdown().await
    }

    /// Write one packet and receive one reply. Transport failures are fatal
    /// and release the connection.
    async fn exchange(&mut self, packet: Packet) -> Result<Packet> {
        let result = self.exchange_raw(packet).await;

        if let Err(err) = &result {
            if err.is_network() {
                debug!(%err, "connection lost");
                self.state = SessionState::Closed;

                if let Err(err) = self.transport.shutdown().await {
                    debug!(%err, "shutdown after failure");
                }
            }
        }

        result
    }

    async fn exchange_raw(&mut self, packet: Packet) -> Result<Packet> {
        let bytes = packet.bytes();
        self.transport.write(&bytes).await?;
        debug!(len = bytes.len(), "packet sent");

        let received = self.receiver.receive(&mut self.transport).await?;
        debug!(len = received.len(), "packet received");

        if received.is_empty() {
            return Err(RconProtocolError::NoResponse.into());
        }

        Ok(Packet::parse(&received)?)
    }
}

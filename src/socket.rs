//! Deadline-bounded byte transport.

use crate::errors::{timeout_err, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    net::TcpStream,
    time::timeout,
};
use tracing::debug;

/// Byte stream the RCON session talks over.
///
/// Every operation is bounded by a deadline; exceeding it yields
/// [`RconError::Timeout`](crate::errors::RconError::Timeout).
#[async_trait]
pub trait Transport: Send {
    /// Write all of `bytes`.
    async fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Read at most `buf.len()` bytes into `buf`. `Ok(0)` means end of stream.
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Shut the stream down.
    async fn shutdown(&mut self) -> Result<()>;
}

/// Wraps any tokio stream and applies one fixed timeout to each operation.
#[derive(Debug)]
pub struct TimedStream<S> {
    stream: S,
    timeout: Duration,
}

impl TimedStream<TcpStream> {
    /// Dial `host:port`, giving up after `dur`.
    ///
    /// # Errors
    /// Returns `Err` if the address cannot be resolved, the connection is
    /// refused, or `dur` elapses first.
    pub async fn connect(host: &str, port: u16, dur: Duration) -> Result<Self> {
        debug!(host, port, "connecting");

        match timeout(dur, TcpStream::connect(format!("{host}:{port}"))).await {
            Ok(stream) => Ok(Self::new(stream?, dur)),
            Err(_) => timeout_err("connect"),
        }
    }
}

impl<S> TimedStream<S> {
    /// Wrap an already connected stream.
    pub fn new(stream: S, timeout: Duration) -> Self {
        Self { stream, timeout }
    }

    /// Unwrap the inner stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

#[async_trait]
impl<S> Transport for TimedStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn write(&mut self, bytes: &[u8]) -> Result<()> {
        match timeout(self.timeout, self.stream.write_all(bytes)).await {
            Ok(res) => Ok(res?),
            Err(_) => timeout_err("write"),
        }
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        match timeout(self.timeout, self.stream.read(buf)).await {
            Ok(res) => Ok(res?),
            Err(_) => timeout_err("read"),
        }
    }

    async fn shutdown(&mut self) -> Result<()> {
        match timeout(self.timeout, self.stream.shutdown()).await {
            Ok(res) => Ok(res?),
            Err(_) => timeout_err("shutdown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TimedStream, Transport};
    use crate::errors::RconError;
    use std::time::Duration;
    use tokio::{
        io::{self, AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    #[tokio::test]
    async fn test_read_write() -> io::Result<()> {
        let (client, mut server) = io::duplex(64);
        let mut transport = TimedStream::new(client, Duration::from_secs(1));

        transport.write(b"ping").await?;
        let mut buf = [0; 4];
        server.read_exact(&mut buf).await?;
        assert_eq!(&buf, b"ping");

        server.write_all(b"pong").await?;
        let mut buf = [0; 16];
        let n = transport.read(&mut buf).await?;
        assert_eq!(&buf[..n], b"pong");

        Ok(())
    }

    #[tokio::test]
    async fn test_read_eof() -> io::Result<()> {
        let (client, server) = io::duplex(64);
        let mut transport = TimedStream::new(client, Duration::from_secs(1));
        drop(server);

        let mut buf = [0; 16];
        assert_eq!(transport.read(&mut buf).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_read_timeout() {
        let (client, _server) = io::duplex(64);
        let mut transport = TimedStream::new(client, Duration::from_millis(20));

        let mut buf = [0; 16];
        let err = transport.read(&mut buf).await.unwrap_err();
        assert!(matches!(err, RconError::Timeout("read")));
    }

    #[tokio::test]
    async fn test_connect() -> io::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();

        let transport = TimedStream::connect("127.0.0.1", port, Duration::from_secs(1)).await?;
        let (_socket, peer) = listener.accept().await?;
        assert_eq!(peer, transport.into_inner().local_addr()?);

        Ok(())
    }

    #[tokio::test]
    async fn test_connect_refused() -> io::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        drop(listener);

        let err = TimedStream::connect("127.0.0.1", port, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(err.is_network());

        Ok(())
    }
}

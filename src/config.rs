//! Client configuration.

use crate::rcon::{DEFAULT_PORT, DEFAULT_TIMEOUT, HEADER_LEN, MAX_RECV_SIZE, PADDING_LEN};
use std::time::Duration;

/// Where to connect and how long to wait for each network operation.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Hostname or IP of the server.
    pub host: String,

    /// RCON port.
    pub port: u16,

    /// Deadline applied to the connect and to every single read and write.
    pub timeout: Duration,

    /// Size of the buffer used for each read when receiving a reply.
    pub max_recv_size: usize,

    /// Whether output should be rendered with ANSI colours.
    pub colored: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            max_recv_size: MAX_RECV_SIZE,
            colored: true,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// `host:port`, suitable for dialing.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the server hostname
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the per-operation timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the receive buffer size
    pub fn max_recv_size(mut self, size: usize) -> Self {
        self.config.max_recv_size = size;
        self
    }

    /// Enable or disable coloured output
    pub fn colored(mut self, colored: bool) -> Self {
        self.config.colored = colored;
        self
    }

    /// Finish building. A receive buffer smaller than an empty packet is
    /// raised to that size.
    pub fn build(mut self) -> ClientConfig {
        self.config.max_recv_size = self.config.max_recv_size.max(HEADER_LEN + PADDING_LEN);
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.port, 25575);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_recv_size, 4110);
        assert!(config.colored);
    }

    #[test]
    fn test_builder_and_address() {
        let config = ClientConfig::builder()
            .host("mc.example.org")
            .port(1234)
            .timeout(Duration::from_millis(250))
            .colored(false)
            .build();

        assert_eq!(config.address(), "mc.example.org:1234");
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert!(!config.colored);
    }

    #[test]
    fn test_zero_recv_size_is_raised() {
        let config = ClientConfig::builder().max_recv_size(0).build();
        assert_eq!(config.max_recv_size, 14);
    }
}

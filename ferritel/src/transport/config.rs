//! Telnet connection configuration.

use std::time::Duration;

/// Default Telnet port.
pub const DEFAULT_PORT: u16 = 23;

/// Default timeout for establishing the TCP connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(4);

/// Default timeout for each prompt read.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(7);

/// Default pause between commands in batch mode.
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(300);

/// Telnet connection configuration.
#[derive(Debug, Clone)]
pub struct TelnetConfig {
    /// Target host (hostname or IP address).
    pub host: String,

    /// Telnet port (default: 23).
    pub port: u16,

    /// Timeout for establishing the connection.
    pub connect_timeout: Duration,

    /// Timeout for each read waiting on a prompt.
    pub read_timeout: Duration,

    /// How many bytes from the end of the buffer are searched for prompts.
    pub search_depth: usize,

    /// Pause between commands sent in batch mode.
    pub batch_delay: Duration,

    /// Upper bound on the final drain in batch mode. `None` waits for the
    /// device to close the connection.
    pub batch_drain_timeout: Option<Duration>,

    /// Suppress connection status log lines.
    pub quiet: bool,

    /// Log every line sent and chunk received at debug level.
    pub debug: bool,
}

impl TelnetConfig {
    /// Create a configuration with default settings for the given host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            search_depth: 1000,
            batch_delay: DEFAULT_BATCH_DELAY,
            batch_drain_timeout: None,
            quiet: false,
            debug: false,
        }
    }

    /// Get the socket address for connection.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TelnetConfig::new("10.0.0.1");
        assert_eq!(config.port, 23);
        assert_eq!(config.connect_timeout, Duration::from_secs(4));
        assert_eq!(config.read_timeout, Duration::from_secs(7));
        assert_eq!(config.batch_delay, Duration::from_millis(300));
        assert!(config.batch_drain_timeout.is_none());
        assert_eq!(config.socket_addr(), "10.0.0.1:23");
    }
}

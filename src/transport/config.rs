use std::time::Duration;

/// Maximum size of a complete HTTP response we will buffer before giving up (8 MiB).
pub const DEFAULT_MAX_RESPONSE_SIZE: usize = 8 * 1024 * 1024;

/// Initial read buffer capacity per connection.
pub const DEFAULT_INITIAL_BUF_SIZE: usize = 4096;

/// Upper bound on connect + write + read for a single exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Tuning knobs for [`TcpTransport`](super::TcpTransport).
///
/// | Setting             | Default  |
/// |---------------------|----------|
/// | `max_response_size` | 8 MiB    |
/// | `initial_buf_size`  | 4096     |
/// | `timeout`           | 30 s     |
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use etagcache::transport::TransportConfig;
///
/// let config = TransportConfig::new()
///     .max_response_size(1024 * 1024)
///     .timeout(Duration::from_secs(5));
/// assert_eq!(config.max_response_size, 1024 * 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    /// Largest response, head plus body, that will be buffered.
    pub max_response_size: usize,
    /// Read buffer capacity allocated per connection.
    pub initial_buf_size: usize,
    /// Deadline for connect, write and read together.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportConfig {
    /// Creates a config with the defaults listed above.
    pub fn new() -> Self {
        Self {
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
            initial_buf_size: DEFAULT_INITIAL_BUF_SIZE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the largest response, head plus body, that will be buffered.
    #[must_use]
    pub fn max_response_size(mut self, bytes: usize) -> Self {
        self.max_response_size = bytes;
        self
    }

    /// Sets the read buffer capacity allocated per connection.
    #[must_use]
    pub fn initial_buf_size(mut self, bytes: usize) -> Self {
        self.initial_buf_size = bytes;
        self
    }

    /// Sets the deadline for a whole exchange: connect, write and read.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TransportConfig::default();
        assert_eq!(config.max_response_size, 8 * 1024 * 1024);
        assert_eq!(config.initial_buf_size, 4096);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn builder_overrides() {
        let config = TransportConfig::new()
            .initial_buf_size(512)
            .timeout(Duration::from_millis(250));
        assert_eq!(config.initial_buf_size, 512);
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!(config.max_response_size, DEFAULT_MAX_RESPONSE_SIZE);
    }
}

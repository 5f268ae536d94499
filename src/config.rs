//! Session configuration.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use firefox_rdp::SessionConfig;
//!
//! let config = SessionConfig::new()
//!     .with_port(6001)
//!     .with_timeout(Duration::from_secs(10));
//!
//! assert_eq!(config.address(), "127.0.0.1:6001");
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Host the debugger server listens on by default.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Well-known debugger server port.
pub const DEFAULT_PORT: u16 = 6000;

/// Default wait for connects and responses.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default re-check interval while waiting for a response.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Default delay between refused connection attempts.
pub const DEFAULT_CONNECT_RETRY_INTERVAL: Duration = Duration::from_millis(250);

// ============================================================================
// SessionConfig
// ============================================================================

/// Connection and timing parameters of one debugger session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Debugger server host.
    pub host: String,

    /// Debugger server port.
    pub port: u16,

    /// Overall deadline for connecting and for each response wait.
    pub timeout: Duration,

    /// Re-check interval while waiting for a response.
    pub poll_interval: Duration,

    /// Delay between connection attempts while the listener is not up.
    pub connect_retry_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            connect_retry_interval: DEFAULT_CONNECT_RETRY_INTERVAL,
        }
    }

    /// Sets the debugger host.
    #[inline]
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the debugger port.
    #[inline]
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the connect and response timeout.
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the response poll interval.
    #[inline]
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the connection retry interval.
    #[inline]
    #[must_use]
    pub fn with_connect_retry_interval(mut self, interval: Duration) -> Self {
        self.connect_retry_interval = interval;
        self
    }

    /// Returns `host:port`.
    #[inline]
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the host is empty, the port or any
    /// interval is zero, or the poll interval exceeds the timeout.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(Error::config("Debugger host must not be empty"));
        }
        if self.port == 0 {
            return Err(Error::config("Debugger port must be non-zero"));
        }
        if self.timeout.is_zero() {
            return Err(Error::config("Timeout must be greater than zero"));
        }
        if self.poll_interval.is_zero() || self.connect_retry_interval.is_zero() {
            return Err(Error::config("Poll and retry intervals must be greater than zero"));
        }
        if self.poll_interval > self.timeout {
            return Err(Error::config("Poll interval must not exceed the timeout"));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

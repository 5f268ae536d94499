//! Builder pattern for driver configuration.
//!
//! Provides a fluent API for configuring and creating [`Driver`] instances.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use firefox_rdp::Driver;
//!
//! # fn example() -> firefox_rdp::Result<()> {
//! let driver = Driver::builder()
//!     .binary("/usr/bin/firefox")
//!     .port(6001)
//!     .timeout(Duration::from_secs(10))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use crate::config::SessionConfig;
use crate::error::{Error, Result};

use super::core::Driver;
use super::options::FirefoxOptions;

// ============================================================================
// DriverBuilder
// ============================================================================

/// Builder for configuring a [`Driver`] instance.
///
/// Use [`Driver::builder()`] to create a new builder.
#[derive(Debug, Default, Clone)]
pub struct DriverBuilder {
    /// Path to Firefox binary. Only needed for launching.
    binary: Option<PathBuf>,
    /// Session parameters.
    config: SessionConfig,
    /// Options for launched processes.
    options: FirefoxOptions,
}

// ============================================================================
// DriverBuilder Implementation
// ============================================================================

impl DriverBuilder {
    /// Creates a new driver builder with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the path to the Firefox binary executable.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to Firefox binary (e.g., "/usr/bin/firefox")
    #[inline]
    #[must_use]
    pub fn binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary = Some(path.into());
        self
    }

    /// Sets the debugger host.
    #[inline]
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config = self.config.with_host(host);
        self
    }

    /// Sets the debugger port.
    #[inline]
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config = self.config.with_port(port);
        self
    }

    /// Sets the connect and response timeout.
    #[inline]
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Sets the response poll interval.
    #[inline]
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config = self.config.with_poll_interval(interval);
        self
    }

    /// Sets the delay between connection attempts.
    #[inline]
    #[must_use]
    pub fn retry_interval(mut self, interval: Duration) -> Self {
        self.config = self.config.with_connect_retry_interval(interval);
        self
    }

    /// Sets the options used when launching Firefox.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: FirefoxOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the driver with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the session parameters or options are invalid
    /// - [`Error::FirefoxNotFound`] if a binary is set but doesn't exist
    pub fn build(self) -> Result<Driver> {
        self.config.validate()?;
        self.options.validate()?;
        self.validate_binary()?;

        Ok(Driver::new(self.config, self.binary, self.options))
    }
}

// ============================================================================
// Validation
// ============================================================================

impl DriverBuilder {
    /// Validates the binary path, if one was given.
    fn validate_binary(&self) -> Result<()> {
        if let Some(binary) = &self.binary
            && !binary.exists()
        {
            return Err(Error::firefox_not_found(binary));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::{DEFAULT_PORT, DEFAULT_TIMEOUT};

    #[test]
    fn test_new_creates_default_builder() {
        let builder = DriverBuilder::new();
        assert!(builder.binary.is_none());
        assert_eq!(builder.config, SessionConfig::default());
        assert_eq!(builder.options, FirefoxOptions::default());
    }

    #[test]
    fn test_binary_sets_path() {
        let builder = DriverBuilder::new().binary("/usr/bin/firefox");
        assert_eq!(builder.binary, Some(PathBuf::from("/usr/bin/firefox")));
    }

    #[test]
    fn test_session_settings_chain() {
        let builder = DriverBuilder::new()
            .host("localhost")
            .port(6010)
            .timeout(Duration::from_secs(1))
            .poll_interval(Duration::from_millis(5))
            .retry_interval(Duration::from_millis(50));

        assert_eq!(builder.config.address(), "localhost:6010");
        assert_eq!(builder.config.timeout, Duration::from_secs(1));
        assert_eq!(builder.config.poll_interval, Duration::from_millis(5));
        assert_eq!(builder.config.connect_retry_interval, Duration::from_millis(50));
    }

    #[test]
    fn test_build_without_binary_succeeds() {
        let driver = DriverBuilder::new().build().expect("driver");
        assert_eq!(driver.config().port, DEFAULT_PORT);
        assert_eq!(driver.config().timeout, DEFAULT_TIMEOUT);
        assert!(driver.binary().is_none());
    }

    #[test]
    fn test_build_fails_with_nonexistent_binary() {
        let result = DriverBuilder::new().binary("/nonexistent/path/to/firefox").build();

        assert!(matches!(result, Err(Error::FirefoxNotFound { .. })));
    }

    #[test]
    fn test_build_fails_with_zero_timeout() {
        let result = DriverBuilder::new().timeout(Duration::ZERO).build();

        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_build_fails_with_invalid_options() {
        let options = FirefoxOptions::new().with_arg("-start-debugger-server");
        let result = DriverBuilder::new().options(options).build();

        assert!(matches!(result, Err(Error::Config { .. })));
    }
}

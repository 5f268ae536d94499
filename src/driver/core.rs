//! Driver: entry point that attaches to or launches Firefox.
//!
//! The [`Driver`] holds the session parameters and, optionally, a Firefox
//! binary. Each call to [`attach`](Driver::attach) or
//! [`launch`](Driver::launch) yields an independent [`Browser`].
//!
//! # Example
//!
//! ```no_run
//! use firefox_rdp::Driver;
//!
//! # async fn example() -> firefox_rdp::Result<()> {
//! let driver = Driver::builder()
//!     .binary("/usr/bin/firefox")
//!     .port(6000)
//!     .build()?;
//!
//! let browser = driver.attach_or_launch().await?;
//! browser.session().navigate_to("https://example.com").await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::browser::Browser;
use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::session::Session;

use super::builder::DriverBuilder;
use super::options::FirefoxOptions;
use super::target::{DebugTarget, FirefoxProcess, RemoteTarget};

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for the driver.
struct DriverInner {
    /// Session parameters.
    config: SessionConfig,

    /// Path to the Firefox binary, if launching is allowed.
    binary: Option<PathBuf>,

    /// Options for launched processes.
    options: FirefoxOptions,
}

// ============================================================================
// Driver
// ============================================================================

/// Firefox remote debugging coordinator.
///
/// Cheap to clone; clones share configuration.
#[derive(Clone)]
pub struct Driver {
    inner: Arc<DriverInner>,
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("address", &self.inner.config.address())
            .field("binary", &self.inner.binary)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Driver - Public API
// ============================================================================

impl Driver {
    /// Creates a configuration builder for the driver.
    #[inline]
    #[must_use]
    pub fn builder() -> DriverBuilder {
        DriverBuilder::new()
    }

    /// Returns the session parameters.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Returns the Firefox binary, if configured.
    #[inline]
    #[must_use]
    pub fn binary(&self) -> Option<&Path> {
        self.inner.binary.as_deref()
    }

    /// Returns the launch options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &FirefoxOptions {
        &self.inner.options
    }

    /// Attaches to a browser already listening on the configured address.
    ///
    /// # Errors
    ///
    /// - [`Error::Connection`] if the host cannot be resolved
    /// - [`Error::ConnectionTimeout`] if nothing accepts in time
    /// - [`Error::Handshake`] if the actor handshake fails
    pub async fn attach(&self) -> Result<Browser> {
        let target = RemoteTarget::new(&self.inner.config.host, self.inner.config.port);
        let session = self.connect(&target).await?;
        Ok(Browser::new(session, None))
    }

    /// Launches Firefox with the debugger listener and attaches to it.
    ///
    /// The process is killed if the session cannot be established.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if no binary was configured
    /// - [`Error::ProcessLaunchFailed`] if the process fails to start or exits
    /// - Any error of [`attach`](Self::attach)
    pub async fn launch(&self) -> Result<Browser> {
        let binary = self.inner.binary.as_deref().ok_or_else(|| {
            Error::config(
                "Firefox binary path is required to launch. Use .binary() to set it.\n\
                 Example: Driver::builder().binary(\"/usr/bin/firefox\")",
            )
        })?;

        let process = FirefoxProcess::spawn(
            binary,
            &self.inner.options,
            &self.inner.config.host,
            self.inner.config.port,
        )?;

        match self.connect(&process).await {
            Ok(session) => Ok(Browser::new(session, Some(process))),
            Err(e) => {
                debug!(pid = process.pid(), error = %e, "Session failed, killing launched process");
                process.kill().await;
                Err(e)
            }
        }
    }

    /// Attaches to a running browser, launching one if none is listening.
    ///
    /// Only connection failures fall back to launching; a listener that
    /// fails the handshake is reported as is.
    ///
    /// # Errors
    ///
    /// Returns the attach error if no binary is configured, otherwise any
    /// error of [`launch`](Self::launch).
    pub async fn attach_or_launch(&self) -> Result<Browser> {
        match self.attach().await {
            Ok(browser) => Ok(browser),
            Err(e) if e.is_connection_error() && self.inner.binary.is_some() => {
                info!(error = %e, "No browser listening, launching Firefox");
                self.launch().await
            }
            Err(e) => Err(e),
        }
    }

    /// Opens a session to an arbitrary debug target.
    ///
    /// The target's host and port override the configured ones; timing
    /// parameters are kept.
    ///
    /// # Errors
    ///
    /// Returns the target's reachability error or any error of
    /// [`Session::connect`].
    pub async fn connect(&self, target: &dyn DebugTarget) -> Result<Session> {
        target.ensure_reachable().await?;

        let config = self
            .inner
            .config
            .clone()
            .with_host(target.host())
            .with_port(target.port());

        debug!(address = %config.address(), "Connecting to debug target");
        Session::connect(&config).await
    }
}

// ============================================================================
// Driver - Internal API
// ============================================================================

impl Driver {
    /// Creates a driver from validated parts.
    pub(crate) fn new(
        config: SessionConfig,
        binary: Option<PathBuf>,
        options: FirefoxOptions,
    ) -> Self {
        debug!(address = %config.address(), launch = binary.is_some(), "Driver created");

        Self {
            inner: Arc::new(DriverInner {
                config,
                binary,
                options,
            }),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use serde_json::json;

    use crate::session::SessionState;
    use crate::testing::{FakeServer, browser_handler};

    fn driver_for(port: u16) -> Driver {
        Driver::builder()
            .port(port)
            .timeout(Duration::from_millis(500))
            .retry_interval(Duration::from_millis(20))
            .build()
            .expect("driver")
    }

    /// Returns a port nothing listens on.
    async fn closed_port() -> u16 {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let port = listener.local_addr().expect("addr").port();
        drop(listener);
        port
    }

    #[test]
    fn test_driver_is_clone_and_debug() {
        fn assert_traits<T: Clone + fmt::Debug + Send + Sync>() {}
        assert_traits::<Driver>();
    }

    #[tokio::test]
    async fn test_attach_establishes_session() {
        let server = FakeServer::start(browser_handler(|_| json!("ok"))).await;
        let driver = driver_for(server.port());

        let browser = driver.attach().await.expect("attach");

        assert_eq!(browser.session().state(), SessionState::Attached);
        assert!(browser.pid().is_none());
        browser.close().await;
    }

    #[tokio::test]
    async fn test_launch_requires_binary() {
        let driver = driver_for(6000);
        let err = driver.launch().await.unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[tokio::test]
    async fn test_attach_or_launch_without_binary_reports_attach_error() {
        let driver = driver_for(closed_port().await);
        let err = driver.attach_or_launch().await.unwrap_err();
        assert!(matches!(err, Error::ConnectionTimeout { .. }), "{err}");
    }

    #[tokio::test]
    async fn test_connect_uses_target_address() {
        let server = FakeServer::start(browser_handler(|_| json!("ok"))).await;
        let driver = driver_for(closed_port().await);

        let target = RemoteTarget::new("127.0.0.1", server.port());
        let session = driver.connect(&target).await.expect("session");

        assert!(session.connection().address().ends_with(&server.port().to_string()));
        session.close().await;
    }
}

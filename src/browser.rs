//! Browser handle: a session plus the process it may own.
//!
//! A [`Browser`] returned by [`Driver::launch`](crate::Driver::launch) owns
//! the Firefox process; closing or dropping it kills the process. One
//! returned by [`Driver::attach`](crate::Driver::attach) only closes the
//! connection.
//!
//! # Example
//!
//! ```no_run
//! use firefox_rdp::Driver;
//!
//! # async fn example() -> firefox_rdp::Result<()> {
//! let driver = Driver::builder().build()?;
//! let browser = driver.attach().await?;
//!
//! browser.navigate_to("https://example.com").await?;
//! let html = browser.evaluate("document.documentElement.outerHTML").await?;
//!
//! browser.close().await;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use tracing::info;

use crate::driver::FirefoxProcess;
use crate::error::Result;
use crate::session::Session;

// ============================================================================
// Browser
// ============================================================================

/// An attached browser tab, optionally owning its Firefox process.
#[derive(Debug)]
pub struct Browser {
    session: Session,
    process: Option<FirefoxProcess>,
}

impl Browser {
    pub(crate) fn new(session: Session, process: Option<FirefoxProcess>) -> Self {
        Self { session, process }
    }

    /// Returns the debugger session.
    #[inline]
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the process ID if this browser was launched by the driver.
    #[inline]
    #[must_use]
    pub fn pid(&self) -> Option<u32> {
        self.process.as_ref().map(FirefoxProcess::pid)
    }

    /// Navigates the selected tab. See [`Session::navigate_to`].
    ///
    /// # Errors
    ///
    /// Same as [`Session::navigate_to`].
    #[inline]
    pub async fn navigate_to(&self, uri: &str) -> Result<()> {
        self.session.navigate_to(uri).await
    }

    /// Evaluates a script. See [`Session::evaluate`].
    ///
    /// # Errors
    ///
    /// Same as [`Session::evaluate`].
    #[inline]
    pub async fn evaluate(&self, script: &str) -> Result<String> {
        self.session.evaluate(script).await
    }

    /// Closes the session and kills an owned process.
    pub async fn close(self) {
        self.session.close().await;

        if let Some(process) = &self.process {
            process.kill().await;
        }
        info!(pid = ?self.pid(), "Browser closed");
    }
}

// ============================================================================
// Tests
// ============================================================================

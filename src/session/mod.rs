//! Debugger session: one handshaken connection to one browser.
//!
//! A [`Session`] is created by connecting and completing the actor
//! handshake. Afterwards it addresses two actors of the selected tab:
//!
//! - the tab actor, attached during the handshake
//! - the console actor, which evaluates scripts
//!
//! # Example
//!
//! ```no_run
//! use firefox_rdp::{Session, SessionConfig};
//!
//! # async fn example() -> firefox_rdp::Result<()> {
//! let session = Session::connect(&SessionConfig::default()).await?;
//!
//! session.navigate_to("https://example.com").await?;
//! let title = session.evaluate("document.title").await?;
//! println!("{title}");
//!
//! session.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! The protocol has no request ids, so a session serves one request at a
//! time. Do not issue requests on the same session from several tasks.

// ============================================================================
// Submodules
// ============================================================================

/// Actor handshake state machine.
mod handshake;

/// Chunked retrieval of long string results.
mod long_string;

/// Navigation with the completion flush.
mod navigation;

/// Script evaluation.
mod script;

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::identifiers::ActorId;
use crate::transport::Connection;

use handshake::Handshake;

// ============================================================================
// Re-exports
// ============================================================================

pub use handshake::TabActors;
pub use long_string::{CHUNK_SIZE, LongStringDescriptor};
pub use navigation::{SETTLE_DELAY, WAKE_UP_PACKET};

// ============================================================================
// SessionState
// ============================================================================

/// Handshake progress of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No socket.
    Disconnected,
    /// Socket open, awaiting the root greeting.
    Connected,
    /// Tab list received, actors recorded.
    TabsListed,
    /// Attached to the tab; commands may be issued.
    Attached,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connected => "connected",
            Self::TabsListed => "tabs listed",
            Self::Attached => "attached",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for a session.
struct SessionInner {
    /// Socket, reader loop and response store.
    connection: Connection,
    /// Actors of the selected tab.
    actors: TabActors,
    /// Current state.
    state: Mutex<SessionState>,
}

// ============================================================================
// Session
// ============================================================================

/// A handshaken debugger session.
///
/// Cloning is cheap; clones share the connection.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("address", &self.inner.connection.address())
            .field("tab", &self.inner.actors.tab)
            .field("console", &self.inner.actors.console)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Connects to the debugger server and performs the actor handshake.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the configuration is invalid
    /// - [`Error::ConnectionTimeout`] if the port does not accept in time
    /// - [`Error::Handshake`] if any handshake step fails; the connection
    ///   is closed before returning
    pub async fn connect(config: &SessionConfig) -> Result<Self> {
        let connection = Connection::connect(config).await?;

        let actors = match Handshake::new(&connection).run().await {
            Ok(actors) => actors,
            Err(e) => {
                debug!(error = %e, "Handshake failed, closing connection");
                connection.close().await;
                return Err(e);
            }
        };

        info!(
            address = %connection.address(),
            tab = %actors.tab,
            console = %actors.console,
            "Session established"
        );

        Ok(Self {
            inner: Arc::new(SessionInner {
                connection,
                actors,
                state: Mutex::new(SessionState::Attached),
            }),
        })
    }

    /// Closes the connection. Safe to call more than once.
    pub async fn close(&self) {
        *self.inner.state.lock() = SessionState::Disconnected;
        self.inner.connection.close().await;
    }

    /// Returns the current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.inner.state.lock()
    }

    /// Returns the attached tab actor.
    #[inline]
    #[must_use]
    pub fn tab_actor(&self) -> &ActorId {
        &self.inner.actors.tab
    }

    /// Returns the console actor scripts are evaluated by.
    #[inline]
    #[must_use]
    pub fn console_actor(&self) -> &ActorId {
        &self.inner.actors.console
    }

    /// Returns the response timeout.
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.inner.connection.timeout()
    }

    /// Returns the underlying connection.
    #[inline]
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.inner.connection
    }

    /// Fails unless the handshake completed and the session is open.
    fn ensure_attached(&self) -> Result<()> {
        match self.state() {
            SessionState::Attached => Ok(()),
            _ => Err(Error::ConnectionClosed),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

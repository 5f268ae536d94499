//! Error types for the Firefox remote debugging client.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use firefox_rdp::{Result, Session};
//!
//! async fn example(session: &Session) -> Result<()> {
//!     let title = session.evaluate("document.title").await?;
//!     println!("{title}");
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::InvalidArgument`] |
//! | Process | [`Error::FirefoxNotFound`], [`Error::ProcessLaunchFailed`], [`Error::Profile`] |
//! | Transport | [`Error::Connection`], [`Error::ConnectionTimeout`], [`Error::ConnectionClosed`] |
//! | Protocol | [`Error::Framing`], [`Error::Protocol`], [`Error::Handshake`] |
//! | Execution | [`Error::ResponseTimeout`], [`Error::InvalidScriptResult`], [`Error::ScriptError`] |
//! | External | [`Error::Io`], [`Error::Json`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when driver or session configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Invalid argument passed to an operation.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    // ========================================================================
    // Process Errors
    // ========================================================================
    /// Firefox binary not found at path.
    #[error("Firefox not found at: {path}")]
    FirefoxNotFound {
        /// Path where Firefox was expected.
        path: PathBuf,
    },

    /// Failed to launch or keep alive the Firefox process.
    #[error("Failed to launch Firefox: {message}")]
    ProcessLaunchFailed {
        /// Description of the launch failure.
        message: String,
    },

    /// Profile directory could not be prepared.
    #[error("Profile error: {message}")]
    Profile {
        /// Description of the profile error.
        message: String,
    },

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// Socket fault during send or receive.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// The debugger port did not accept a connection in time.
    ///
    /// Refused connections are retried until this deadline.
    #[error("Connection to {address} timed out after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Address that was dialed.
        address: String,
        /// Milliseconds waited before giving up.
        timeout_ms: u64,
    },

    /// The session was closed.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Malformed length prefix or undecodable frame payload.
    ///
    /// Absorbed by the reader loop; surfaced only by direct frame decoding.
    #[error("Framing error: {message}")]
    Framing {
        /// Description of the framing violation.
        message: String,
    },

    /// Unexpected message shape.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    /// A handshake step failed; the session could not be established.
    #[error("Handshake failed at {stage}: {message}")]
    Handshake {
        /// Handshake step (`greeting`, `listTabs`, `attach`).
        stage: &'static str,
        /// Why the step failed.
        message: String,
    },

    // ========================================================================
    // Execution Errors
    // ========================================================================
    /// No received message matched within the allotted wait.
    #[error("No response for {operation} within {timeout_ms}ms")]
    ResponseTimeout {
        /// Description of what was awaited.
        operation: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// Script result could not be interpreted.
    #[error("Invalid script result: {message}")]
    InvalidScriptResult {
        /// What was wrong with the result.
        message: String,
    },

    /// The evaluated script threw.
    #[error("Script error: {message}")]
    ScriptError {
        /// Exception message reported by the console actor.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error.
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a Firefox not found error.
    #[inline]
    pub fn firefox_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FirefoxNotFound { path: path.into() }
    }

    /// Creates a process launch failed error.
    #[inline]
    pub fn process_launch_failed(message: impl Into<String>) -> Self {
        Self::ProcessLaunchFailed {
            message: message.into(),
        }
    }

    /// Creates a profile error.
    #[inline]
    pub fn profile(message: impl Into<String>) -> Self {
        Self::Profile {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a connection timeout error.
    #[inline]
    pub fn connection_timeout(address: impl Into<String>, timeout_ms: u64) -> Self {
        Self::ConnectionTimeout {
            address: address.into(),
            timeout_ms,
        }
    }

    /// Creates a framing error.
    #[inline]
    pub fn framing(message: impl Into<String>) -> Self {
        Self::Framing {
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates a handshake error.
    #[inline]
    pub fn handshake(stage: &'static str, message: impl Into<String>) -> Self {
        Self::Handshake {
            stage,
            message: message.into(),
        }
    }

    /// Creates a response timeout error.
    #[inline]
    pub fn response_timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::ResponseTimeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Creates an invalid script result error.
    #[inline]
    pub fn invalid_script_result(message: impl Into<String>) -> Self {
        Self::InvalidScriptResult {
            message: message.into(),
        }
    }

    /// Creates a script error.
    #[inline]
    pub fn script_error(message: impl Into<String>) -> Self {
        Self::ScriptError {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ConnectionTimeout { .. } | Self::ResponseTimeout { .. }
        )
    }

    /// Returns `true` if this is a transport error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::ConnectionTimeout { .. }
                | Self::ConnectionClosed
                | Self::Io(_)
        )
    }

    /// Returns `true` if this error is recoverable.
    ///
    /// A recoverable error leaves the session usable; the operation may
    /// succeed on retry.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ResponseTimeout { .. } | Self::ScriptError { .. } | Self::InvalidScriptResult { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

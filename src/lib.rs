//! Firefox RDP - Remote Debugging Protocol client for Firefox.
//!
//! This library drives a Firefox tab over the browser's built-in remote
//! debugger: navigate to a URL and evaluate JavaScript, including results
//! too large to fit in one packet.
//!
//! # Architecture
//!
//! The client talks to the listener Firefox opens with
//! `-start-debugger-server <port>`:
//!
//! - **Transport**: one TCP connection, packets framed as `<length>:<json>`
//! - **Reader loop**: a background task decodes frames into a response store
//! - **Correlation**: the store is cleared before each request and searched
//!   with a predicate, since the protocol carries no request ids
//! - **Session**: greeting, `listTabs`, `attach`; then the tab and console
//!   actors serve navigation and evaluation
//!
//! # Quick Start
//!
//! ```no_run
//! use firefox_rdp::{Driver, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Attach to a running Firefox, or launch one with the debugger open
//!     let driver = Driver::builder()
//!         .binary("/path/to/firefox")
//!         .port(6000)
//!         .build()?;
//!
//!     let browser = driver.attach_or_launch().await?;
//!
//!     browser.navigate_to("https://example.com").await?;
//!     let title = browser.evaluate("document.title").await?;
//!     println!("Page title: {}", title);
//!
//!     browser.close().await;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`browser`] | [`Browser`] handle owning a session and maybe a process |
//! | [`config`] | [`SessionConfig`] connection and timing parameters |
//! | [`driver`] | Driver factory, launch options and debug targets |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Actor ID wrapper |
//! | [`protocol`] | Framing and packet types |
//! | [`session`] | Handshake, navigation and evaluation |
//! | [`transport`] | TCP connection, reader loop and response store |

// ============================================================================
// Modules
// ============================================================================

/// Browser handle returned by the driver.
pub mod browser;

/// Session configuration.
pub mod config;

/// Driver factory and configuration.
///
/// Use [`Driver::builder()`] to create a configured driver instance.
pub mod driver;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe actor identifiers.
pub mod identifiers;

/// Remote Debugging Protocol framing and packet types.
pub mod protocol;

/// Debugger session over one connection.
pub mod session;

/// TCP transport layer.
///
/// Connection management, background reader and response correlation.
pub mod transport;

#[cfg(test)]
mod testing;

// ============================================================================
// Re-exports
// ============================================================================

// Browser types
pub use browser::Browser;

// Configuration
pub use config::SessionConfig;

// Driver types
pub use driver::{DebugTarget, Driver, DriverBuilder, FirefoxOptions, FirefoxProcess, RemoteTarget};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::ActorId;

// Session types
pub use session::{Session, SessionState};

// Transport types
pub use transport::Connection;

//! Driver module: the entry point for attaching to or launching Firefox.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Driver`] | Factory for browser sessions |
//! | [`DriverBuilder`] | Fluent configuration builder |
//! | [`FirefoxOptions`] | Browser launch options |
//! | [`Profile`] | Profile a launched browser runs with |
//! | [`DebugTarget`] | Where a session connects to |
//!
//! # Example
//!
//! ```no_run
//! use firefox_rdp::{Driver, Result};
//!
//! # async fn example() -> Result<()> {
//! let driver = Driver::builder()
//!     .binary("/usr/bin/firefox")
//!     .options(firefox_rdp::FirefoxOptions::new().with_headless())
//!     .build()?;
//!
//! let browser = driver.launch().await?;
//! let title = browser.session().evaluate("document.title").await?;
//! browser.close().await;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder pattern for driver configuration.
pub mod builder;

/// Core driver implementation.
pub mod core;

/// Firefox command-line options.
pub mod options;

/// Temporary profiles with debugger preferences.
pub mod profile;

/// Debug targets: remote listeners and launched processes.
pub mod target;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::DriverBuilder;
pub use core::Driver;
pub use options::FirefoxOptions;
pub use profile::{Preference, Profile};
pub use target::{DebugTarget, FirefoxProcess, RemoteTarget};

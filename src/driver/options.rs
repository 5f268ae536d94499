//! Firefox command-line options for launched browsers.
//!
//! # Example
//!
//! ```ignore
//! use firefox_rdp::FirefoxOptions;
//!
//! let options = FirefoxOptions::new()
//!     .with_headless()
//!     .with_private();
//!
//! let args = options.to_args(6000);
//! // ["-start-debugger-server", "6000", "--headless", "--private-window"]
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Argument that opens the remote debugger listener.
pub const DEBUGGER_ARGUMENT: &str = "-start-debugger-server";

// ============================================================================
// FirefoxOptions
// ============================================================================

/// Firefox process configuration options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirefoxOptions {
    /// Run Firefox without a GUI.
    pub headless: bool,

    /// Open a private browsing window.
    pub private: bool,

    /// Start a separate instance instead of reusing a running one.
    pub new_instance: bool,

    /// Profile directory to run with.
    pub profile: Option<PathBuf>,

    /// Additional custom command-line arguments.
    pub extra_args: Vec<String>,
}

impl FirefoxOptions {
    /// Creates a new options instance with default settings.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            headless: false,
            private: false,
            new_instance: false,
            profile: None,
            extra_args: Vec::new(),
        }
    }

    /// Enables headless mode.
    #[inline]
    #[must_use]
    pub fn with_headless(mut self) -> Self {
        self.headless = true;
        self
    }

    /// Enables private browsing mode.
    #[inline]
    #[must_use]
    pub fn with_private(mut self) -> Self {
        self.private = true;
        self
    }

    /// Starts a separate Firefox instance.
    #[inline]
    #[must_use]
    pub fn with_new_instance(mut self) -> Self {
        self.new_instance = true;
        self
    }

    /// Runs with the given profile directory.
    #[inline]
    #[must_use]
    pub fn with_profile(mut self, path: impl Into<PathBuf>) -> Self {
        self.profile = Some(path.into());
        self
    }

    /// Adds a custom command-line argument.
    #[inline]
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// Adds multiple custom command-line arguments.
    #[inline]
    #[must_use]
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Converts options to Firefox command-line arguments.
    ///
    /// The debugger listener argument always comes first.
    #[must_use]
    pub fn to_args(&self, debugger_port: u16) -> Vec<String> {
        let mut args = Vec::with_capacity(8 + self.extra_args.len());

        args.push(DEBUGGER_ARGUMENT.to_string());
        args.push(debugger_port.to_string());

        if self.headless {
            args.push("--headless".to_string());
        }

        if self.private {
            args.push("--private-window".to_string());
        }

        if self.new_instance {
            args.push("--new-instance".to_string());
        }

        if let Some(profile) = &self.profile {
            args.push("--profile".to_string());
            args.push(profile.display().to_string());
        }

        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// Validates the options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the profile directory does not exist or
    /// an extra argument tries to set the debugger listener.
    pub fn validate(&self) -> Result<()> {
        if let Some(profile) = &self.profile
            && !profile.is_dir()
        {
            return Err(Error::config(format!(
                "Profile directory not found: {}",
                profile.display()
            )));
        }

        if self.extra_args.iter().any(|a| a == DEBUGGER_ARGUMENT) {
            return Err(Error::config(
                "The debugger listener is configured by the port, not extra arguments",
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

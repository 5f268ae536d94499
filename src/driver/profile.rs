//! Profiles for launched Firefox processes.
//!
//! A stock profile refuses remote debugger connections, or prompts the user
//! for each one. A launched browser therefore runs with a throwaway profile
//! whose `user.js` enables the listener:
//!
//! ```javascript
//! user_pref("devtools.debugger.remote-enabled", true);
//! user_pref("devtools.chrome.enabled", true);
//! user_pref("devtools.debugger.prompt-connection", false);
//! ```
//!
//! A profile given with [`FirefoxOptions::with_profile`] is used as is and
//! never written to.
//!
//! [`FirefoxOptions::with_profile`]: super::FirefoxOptions::with_profile

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Header comment for `user.js` file.
const USER_JS_HEADER: &str = "// firefox-rdp user.js\n\
                              // Generated for remote debugging\n\n";

/// Prefix of temporary profile directories.
const TEMP_PREFIX: &str = "firefox-rdp-";

// ============================================================================
// Preference
// ============================================================================

/// Value of a `user.js` preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i32),
    /// String value, written quoted.
    String(String),
}

impl From<bool> for PrefValue {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for PrefValue {
    #[inline]
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for PrefValue {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            // JSON string syntax is valid JavaScript.
            Self::String(s) => f.write_str(&serde_json::Value::from(s.as_str()).to_string()),
        }
    }
}

/// One `user_pref(name, value);` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preference {
    /// Preference name, e.g. `devtools.chrome.enabled`.
    pub name: String,
    /// Preference value.
    pub value: PrefValue,
}

impl Preference {
    /// Creates a preference.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<PrefValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user_pref(\"{}\", {});", self.name, self.value)
    }
}

/// Preferences a launched browser needs to accept the debugger client.
#[must_use]
pub fn debugger_prefs() -> Vec<Preference> {
    vec![
        // Listener
        Preference::new("devtools.debugger.remote-enabled", true),
        Preference::new("devtools.chrome.enabled", true),
        Preference::new("devtools.debugger.prompt-connection", false),
        // Startup without UI prompts
        Preference::new("browser.shell.checkDefaultBrowser", false),
        Preference::new("browser.startup.page", 0),
        Preference::new("browser.startup.homepage_override.mstone", "ignore"),
        Preference::new("browser.sessionstore.resume_from_crash", false),
        Preference::new("datareporting.policy.dataSubmissionEnabled", false),
        Preference::new("app.update.auto", false),
    ]
}

// ============================================================================
// Profile
// ============================================================================

/// Profile directory a launched browser runs with.
///
/// A temporary profile is deleted when dropped.
pub struct Profile {
    /// Keeps a temporary directory alive.
    _temp_dir: Option<TempDir>,
    path: PathBuf,
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("path", &self.path)
            .field("temporary", &self._temp_dir.is_some())
            .finish()
    }
}

impl Profile {
    /// Creates an empty temporary profile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Profile`] if the directory cannot be created.
    pub fn new_temp() -> Result<Self> {
        let temp_dir = TempDir::with_prefix(TEMP_PREFIX)
            .map_err(|e| Error::profile(format!("Failed to create temp profile: {e}")))?;

        let path = temp_dir.path().to_path_buf();
        debug!(path = %path.display(), "Created temporary profile");

        Ok(Self {
            _temp_dir: Some(temp_dir),
            path,
        })
    }

    /// Creates a temporary profile with [`debugger_prefs`] written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Profile`] if the directory or `user.js` cannot be
    /// written.
    pub fn for_debugging() -> Result<Self> {
        let profile = Self::new_temp()?;
        profile.write_prefs(&debugger_prefs())?;
        Ok(profile)
    }

    /// Uses an existing profile directory without modifying it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Profile`] if `path` is not a directory.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_dir() {
            return Err(Error::profile(format!(
                "Profile directory not found: {}",
                path.display()
            )));
        }

        debug!(path = %path.display(), "Using existing profile directory");
        Ok(Self {
            _temp_dir: None,
            path,
        })
    }

    /// Returns the profile directory.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if the directory is deleted on drop.
    #[inline]
    #[must_use]
    pub fn is_temporary(&self) -> bool {
        self._temp_dir.is_some()
    }

    /// Writes `prefs` to `user.js`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Profile`] if the file cannot be written.
    pub fn write_prefs(&self, prefs: &[Preference]) -> Result<()> {
        let file_path = self.path.join("user.js");

        let mut content = String::from(USER_JS_HEADER);
        for pref in prefs {
            content.push_str(&pref.to_string());
            content.push('\n');
        }

        fs::write(&file_path, content).map_err(|e| {
            Error::profile(format!(
                "Failed to write user.js at {}: {e}",
                file_path.display()
            ))
        })?;

        debug!(path = %file_path.display(), pref_count = prefs.len(), "Wrote user.js");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pref_line_format() {
        assert_eq!(
            Preference::new("devtools.chrome.enabled", true).to_string(),
            r#"user_pref("devtools.chrome.enabled", true);"#
        );
        assert_eq!(
            Preference::new("browser.startup.page", 0).to_string(),
            r#"user_pref("browser.startup.page", 0);"#
        );
        assert_eq!(
            Preference::new("x", "a\"b").to_string(),
            r#"user_pref("x", "a\"b");"#
        );
    }

    #[test]
    fn test_debugging_profile_enables_listener() {
        let profile = Profile::for_debugging().expect("profile");
        let user_js = fs::read_to_string(profile.path().join("user.js")).expect("user.js");

        assert!(user_js.contains(r#"user_pref("devtools.debugger.remote-enabled", true);"#));
        assert!(user_js.contains(r#"user_pref("devtools.chrome.enabled", true);"#));
        assert!(user_js.contains(r#"user_pref("devtools.debugger.prompt-connection", false);"#));
    }

    #[test]
    fn test_temp_profile_removed_on_drop() {
        let path = {
            let profile = Profile::new_temp().expect("profile");
            assert!(profile.is_temporary());
            profile.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_existing_profile_is_not_written() {
        let dir = tempfile::tempdir().expect("tempdir");
        let profile = Profile::from_path(dir.path()).expect("profile");

        assert!(!profile.is_temporary());
        assert!(!dir.path().join("user.js").exists());
    }

    #[test]
    fn test_missing_profile_dir() {
        let err = Profile::from_path("/nonexistent/profile").unwrap_err();
        assert!(matches!(err, Error::Profile { .. }));
    }
}

//! Debug targets: where a session connects to.
//!
//! A [`DebugTarget`] supplies the debugger endpoint and confirms the browser
//! is reachable before a connection is attempted.
//!
//! | Target | Use |
//! |--------|-----|
//! | [`RemoteTarget`] | Browser already running with the debugger listener |
//! | [`FirefoxProcess`] | Browser launched by this crate |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::net::lookup_host;
use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::options::FirefoxOptions;
use super::profile::Profile;

// ============================================================================
// DebugTarget
// ============================================================================

/// Something exposing a Firefox debugger listener.
#[async_trait]
pub trait DebugTarget: Send + Sync {
    /// Host of the debugger listener.
    fn host(&self) -> &str;

    /// Port of the debugger listener.
    fn port(&self) -> u16;

    /// Returns `(host, port)`.
    fn endpoint(&self) -> (&str, u16) {
        (self.host(), self.port())
    }

    /// Confirms the target can be connected to.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is known to be unreachable.
    async fn ensure_reachable(&self) -> Result<()>;
}

// ============================================================================
// RemoteTarget
// ============================================================================

/// A browser started elsewhere with `-start-debugger-server <port>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    host: String,
    port: u16,
}

impl RemoteTarget {
    /// Creates a target for `host:port`.
    #[inline]
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

#[async_trait]
impl DebugTarget for RemoteTarget {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    /// Resolves the host name.
    async fn ensure_reachable(&self) -> Result<()> {
        let mut addrs = lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|e| Error::connection(format!("cannot resolve {}: {e}", self.host)))?;

        if addrs.next().is_none() {
            return Err(Error::connection(format!("{} resolves to no address", self.host)));
        }
        Ok(())
    }
}

// ============================================================================
// FirefoxProcess
// ============================================================================

/// A Firefox process launched with the debugger listener.
///
/// The process is killed when this value is dropped. Without a profile in
/// the options it runs with a temporary one that allows debugger
/// connections, deleted afterwards.
pub struct FirefoxProcess {
    /// Child handle; `None` once killed.
    child: Mutex<Option<Child>>,
    /// Process ID for logging.
    pid: u32,
    host: String,
    port: u16,
    /// Kept alive for the lifetime of the process.
    profile: Profile,
}

impl fmt::Debug for FirefoxProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirefoxProcess")
            .field("pid", &self.pid)
            .field("port", &self.port)
            .field("profile", &self.profile.path())
            .finish_non_exhaustive()
    }
}

impl FirefoxProcess {
    /// Launches `binary` listening for the debugger on `host:port`.
    ///
    /// # Errors
    ///
    /// - [`Error::FirefoxNotFound`] if `binary` does not exist
    /// - [`Error::Profile`] if the profile cannot be prepared
    /// - [`Error::ProcessLaunchFailed`] if the process fails to spawn
    pub fn spawn(
        binary: &Path,
        options: &FirefoxOptions,
        host: impl Into<String>,
        port: u16,
    ) -> Result<Self> {
        if !binary.exists() {
            return Err(Error::firefox_not_found(binary));
        }

        let profile = match &options.profile {
            Some(path) => Profile::from_path(path)?,
            None => Profile::for_debugging()?,
        };

        let mut cmd = Command::new(binary);
        cmd.args(launch_args(options, port, &profile))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let child = cmd
            .spawn()
            .map_err(|e| Error::process_launch_failed(e.to_string()))?;
        let pid = child.id().unwrap_or(0);

        info!(pid, port, binary = %binary.display(), "Firefox process spawned");

        Ok(Self {
            child: Mutex::new(Some(child)),
            pid,
            host: host.into(),
            port,
            profile,
        })
    }

    /// Returns the process ID.
    #[inline]
    #[must_use]
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Returns the profile directory the process runs with.
    #[inline]
    #[must_use]
    pub fn profile_path(&self) -> &Path {
        self.profile.path()
    }

    /// Kills the process and waits for it to exit.
    pub async fn kill(&self) {
        let child = self.child.lock().take();

        if let Some(mut child) = child {
            debug!(pid = self.pid, "Killing Firefox process");
            if let Err(e) = child.kill().await {
                debug!(pid = self.pid, error = %e, "Failed to kill process");
            }
            info!(pid = self.pid, "Process terminated");
        }
    }
}

#[async_trait]
impl DebugTarget for FirefoxProcess {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    /// Checks the process has not exited.
    async fn ensure_reachable(&self) -> Result<()> {
        let mut guard = self.child.lock();
        let child = guard
            .as_mut()
            .ok_or_else(|| Error::process_launch_failed("process was killed"))?;

        match child.try_wait()? {
            None => Ok(()),
            Some(status) => Err(Error::process_launch_failed(format!(
                "process {} exited early with {status}",
                self.pid
            ))),
        }
    }
}

impl Drop for FirefoxProcess {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.get_mut().take()
            && let Err(e) = child.start_kill()
        {
            debug!(pid = self.pid, error = %e, "Failed to send kill signal in Drop");
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Builds the command line for a launch with `profile`.
///
/// A temporary profile is passed explicitly along with `--no-remote`, so
/// the launch never hands off to an already running browser.
fn launch_args(options: &FirefoxOptions, port: u16, profile: &Profile) -> Vec<String> {
    let mut args = options.to_args(port);

    if profile.is_temporary() {
        args.push("--profile".to_string());
        args.push(profile.path().display().to_string());
        args.push("--no-remote".to_string());
    }
    args
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_remote_target_resolves_localhost() {
        let target = RemoteTarget::new("127.0.0.1", 6000);
        assert_eq!(target.host(), "127.0.0.1");
        assert_eq!(target.port(), 6000);
        tokio_test::assert_ok!(target.ensure_reachable().await);
    }

    #[tokio::test]
    async fn test_remote_target_unresolvable_host() {
        let target = RemoteTarget::new("no-such-host.invalid", 6000);
        tokio_test::assert_err!(target.ensure_reachable().await);
    }

    #[test]
    fn test_spawn_missing_binary() {
        let err = FirefoxProcess::spawn(
            Path::new("/nonexistent/firefox"),
            &FirefoxOptions::new(),
            "127.0.0.1",
            6000,
        )
        .unwrap_err();
        assert!(matches!(err, Error::FirefoxNotFound { .. }));
    }

    #[test]
    fn test_launch_args_use_temporary_profile() {
        let profile = Profile::for_debugging().expect("profile");
        let args = launch_args(&FirefoxOptions::new().with_headless(), 6000, &profile);

        let at = args.iter().position(|a| a == "--profile").expect("--profile");
        assert_eq!(args[at + 1], profile.path().display().to_string());
        assert!(args.contains(&"--no-remote".to_string()));
        assert_eq!(&args[..2], ["-start-debugger-server", "6000"]);
    }

    #[test]
    fn test_launch_args_keep_user_profile() {
        let dir = tempfile::tempdir().expect("tempdir");
        let options = FirefoxOptions::new().with_profile(dir.path());
        let profile = Profile::from_path(dir.path()).expect("profile");

        let args = launch_args(&options, 6000, &profile);

        assert_eq!(args.iter().filter(|a| *a == "--profile").count(), 1);
        assert!(!args.contains(&"--no-remote".to_string()));
        assert!(!dir.path().join("user.js").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exited_process_is_unreachable() {
        // `true` ignores its arguments and exits immediately.
        let Ok(binary) = which_true() else {
            return;
        };
        let process = FirefoxProcess::spawn(&binary, &FirefoxOptions::new(), "127.0.0.1", 6000)
            .expect("spawn");

        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        let err = process.ensure_reachable().await.unwrap_err();
        assert!(matches!(err, Error::ProcessLaunchFailed { .. }));

        let profile = process.profile_path().to_path_buf();
        assert!(profile.join("user.js").exists());
        drop(process);
        assert!(!profile.exists());
    }

    #[cfg(unix)]
    fn which_true() -> std::result::Result<std::path::PathBuf, ()> {
        ["/bin/true", "/usr/bin/true"]
            .iter()
            .map(std::path::PathBuf::from)
            .find(|p| p.exists())
            .ok_or(())
    }
}

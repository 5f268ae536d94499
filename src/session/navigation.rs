//! Navigation.
//!
//! The tab does not report navigation `stop` until it services another
//! request. After assigning `window.location.href` a throwaway packet is
//! sent to flush that notification, followed by a short settle delay.

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

use super::Session;
use super::script::json_string;

// ============================================================================
// Constants
// ============================================================================

/// Packet sent only to make the tab flush its pending notifications.
pub const WAKE_UP_PACKET: &str = "Wake up, Neo...";

/// Pause after the flush before returning to the caller.
pub const SETTLE_DELAY: Duration = Duration::from_millis(250);

// ============================================================================
// Session - Navigation
// ============================================================================

impl Session {
    /// Navigates the selected tab to `uri`.
    ///
    /// Returns after the location is assigned, the flush packet is sent and
    /// [`SETTLE_DELAY`] has passed. The new document may still be loading.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `uri` is not an absolute URL
    /// - [`Error::ResponseTimeout`] if the location assignment is not
    ///   acknowledged
    pub async fn navigate_to(&self, uri: &str) -> Result<()> {
        Url::parse(uri).map_err(|e| Error::invalid_argument(format!("invalid URI {uri:?}: {e}")))?;

        debug!(url = %uri, tab = %self.tab_actor(), "Navigating");

        let script = format!("window.location.href = {}", json_string(uri));
        self.evaluate(&script).await?;

        self.connection().send(WAKE_UP_PACKET).await?;
        sleep(SETTLE_DELAY).await;

        debug!(url = %uri, "Navigation settled");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

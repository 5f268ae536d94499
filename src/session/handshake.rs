//! Actor handshake.
//!
//! ```text
//! Disconnected ──connect──► Connected ──greeting + listTabs──► TabsListed ──attach──► Attached
//! ```
//!
//! 1. The server greets unsolicited: `{from: "root", applicationType: "browser"}`
//! 2. `listTabs` to `root` returns `tabs` and the `selected` index
//! 3. `attach` to the selected tab actor returns `type: "tabAttached"`
//!
//! Any step failing or timing out aborts session creation.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::ActorId;
use crate::protocol::{Message, Request};
use crate::transport::Connection;

use super::SessionState;

// ============================================================================
// Constants
// ============================================================================

/// `applicationType` announced by a browser's root actor.
const BROWSER_APPLICATION: &str = "browser";

/// Reply type confirming a tab attach.
const TAB_ATTACHED: &str = "tabAttached";

// ============================================================================
// TabActors
// ============================================================================

/// Actors of the selected tab, recorded once during the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabActors {
    /// Tab actor; target of `attach`.
    pub tab: ActorId,
    /// Console actor; target of `evaluateJS`.
    pub console: ActorId,
}

impl TabActors {
    /// Picks the selected tab out of a `listTabs` reply.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if `selected` is missing or out of range,
    /// or the tab lacks `actor` / `consoleActor`.
    pub fn from_tab_list(reply: &Message) -> Result<Self> {
        let tabs = reply
            .get_array("tabs")
            .ok_or_else(|| Error::protocol("tab list missing `tabs`"))?;

        let selected = reply
            .get_u64("selected")
            .ok_or_else(|| Error::protocol("tab list missing `selected`"))?;

        let tab = usize::try_from(selected)
            .ok()
            .and_then(|index| tabs.get(index))
            .ok_or_else(|| {
                Error::protocol(format!(
                    "selected tab {selected} out of range ({} tabs)",
                    tabs.len()
                ))
            })?;

        Ok(Self {
            tab: actor_field(tab, "actor")?,
            console: actor_field(tab, "consoleActor")?,
        })
    }
}

/// Reads a string actor id from a tab entry.
fn actor_field(tab: &Value, key: &str) -> Result<ActorId> {
    tab.get(key)
        .and_then(Value::as_str)
        .map(ActorId::new)
        .ok_or_else(|| Error::protocol(format!("selected tab missing `{key}`")))
}

// ============================================================================
// Handshake
// ============================================================================

/// Drives a fresh connection from `Connected` to `Attached`.
pub(super) struct Handshake<'a> {
    connection: &'a Connection,
    state: SessionState,
}

impl<'a> Handshake<'a> {
    /// Starts in `Connected`: the transport is up and the reader loop runs.
    pub(super) fn new(connection: &'a Connection) -> Self {
        Self {
            connection,
            state: SessionState::Connected,
        }
    }

    /// Runs every step and returns the recorded actors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Handshake`] naming the failed step.
    pub(super) async fn run(mut self) -> Result<TabActors> {
        self.await_greeting().await?;
        let actors = self.list_tabs().await?;
        self.attach(&actors).await?;
        Ok(actors)
    }

    /// Waits for the unsolicited root greeting.
    async fn await_greeting(&mut self) -> Result<()> {
        let greeting = self
            .connection
            .wait(|m| {
                m.is_from(ActorId::ROOT)
                    && m.get_str("applicationType") == Some(BROWSER_APPLICATION)
            })
            .await
            .map_err(|e| Error::handshake("greeting", e.to_string()))?;

        debug!(
            traits = ?greeting.get("traits"),
            "Received root greeting"
        );
        Ok(())
    }

    /// Lists tabs and records the selected tab's actors.
    async fn list_tabs(&mut self) -> Result<TabActors> {
        let reply = self
            .connection
            .send_and_wait(&Request::list_tabs(), |m| {
                m.is_from(ActorId::ROOT) && m.has("tabs")
            })
            .await
            .map_err(|e| Error::handshake("listTabs", e.to_string()))?;

        let actors = TabActors::from_tab_list(&reply)
            .map_err(|e| Error::handshake("listTabs", e.to_string()))?;

        self.advance(SessionState::TabsListed);
        Ok(actors)
    }

    /// Attaches to the tab actor.
    async fn attach(&mut self, actors: &TabActors) -> Result<()> {
        let tab = actors.tab.as_str();

        self.connection
            .send_and_wait(&Request::attach(&actors.tab), |m| {
                m.is_from(tab) && m.message_type() == Some(TAB_ATTACHED)
            })
            .await
            .map_err(|e| Error::handshake("attach", e.to_string()))?;

        self.advance(SessionState::Attached);
        Ok(())
    }

    fn advance(&mut self, next: SessionState) {
        debug!(from = %self.state, to = %next, "Handshake transition");
        self.state = next;
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Outgoing request packets.
//!
//! Every request names its target actor in `to` and carries a typed
//! [`Command`] flattened beside it:
//!
//! ```json
//! { "to": "server1.conn0.console3", "type": "evaluateJS", "text": "1 + 1" }
//! ```
//!
//! The protocol carries no request id; responses are correlated by
//! content (see [`crate::transport::Connection::send_and_wait`]).

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;

use crate::error::Result;
use crate::identifiers::ActorId;

use super::Command;
use super::frame::encode_frame;

// ============================================================================
// Request
// ============================================================================

/// A request packet addressed to one actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Target actor.
    pub to: ActorId,

    /// Command type and parameters.
    #[serde(flatten)]
    pub command: Command,
}

impl Request {
    /// Creates a request.
    #[inline]
    #[must_use]
    pub fn new(to: ActorId, command: Command) -> Self {
        Self { to, command }
    }

    /// `listTabs` addressed to the root actor.
    #[inline]
    #[must_use]
    pub fn list_tabs() -> Self {
        Self::new(ActorId::root(), Command::ListTabs)
    }

    /// `attach` addressed to a tab actor.
    #[inline]
    #[must_use]
    pub fn attach(tab: &ActorId) -> Self {
        Self::new(tab.clone(), Command::Attach)
    }

    /// `evaluateJS` addressed to a console actor.
    #[inline]
    #[must_use]
    pub fn evaluate(console: &ActorId, script: impl Into<String>) -> Self {
        Self::new(
            console.clone(),
            Command::EvaluateJs {
                text: script.into(),
            },
        )
    }

    /// `substring` addressed to a long string actor.
    #[inline]
    #[must_use]
    pub fn substring(actor: &ActorId, start: u64, end: u64) -> Self {
        Self::new(actor.clone(), Command::Substring { start, end })
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Serializes any packet to JSON and wraps it in a length-prefixed frame.
///
/// # Errors
///
/// Returns [`crate::Error::Json`] if serialization fails.
pub fn to_frame<T: Serialize + ?Sized>(packet: &T) -> Result<Vec<u8>> {
    let json = serde_json::to_string(packet)?;
    Ok(encode_frame(&json))
}

// ============================================================================
// Tests
// ============================================================================

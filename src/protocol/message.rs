//! Received protocol messages.
//!
//! The debugger protocol is untyped and extensible, so a [`Message`] wraps a
//! parsed JSON tree and offers field accessors instead of a fixed schema.
//!
//! # Shapes consumed by this crate
//!
//! | Shape | Fields |
//! |-------|--------|
//! | Greeting | `from: "root"`, `applicationType` |
//! | Tab list | `from: "root"`, `tabs: [{actor, consoleActor}]`, `selected` |
//! | Attach confirmation | `from: <tab>`, `type: "tabAttached"` |
//! | Script result | `from: <console>`, `input`, `result` |
//! | Chunk | `from: <longString actor>`, `substring` |
//! | Navigation notice | `type: "tabNavigated"`, `state` |

// ============================================================================
// Imports
// ============================================================================

use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Message type of passive navigation notifications.
const TAB_NAVIGATED: &str = "tabNavigated";

/// Navigation state that terminates a navigation.
const STATE_STOP: &str = "stop";

// ============================================================================
// Message
// ============================================================================

/// One decoded frame: a JSON document queried by field name.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    value: Value,
}

impl Message {
    /// Wraps an already parsed value.
    #[inline]
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Returns the sending actor (`from`).
    #[inline]
    #[must_use]
    pub fn from_actor(&self) -> Option<&str> {
        self.get_str("from")
    }

    /// Returns the message `type`.
    #[inline]
    #[must_use]
    pub fn message_type(&self) -> Option<&str> {
        self.get_str("type")
    }

    /// Returns `true` if `from` equals `actor`.
    #[inline]
    #[must_use]
    pub fn is_from(&self, actor: &str) -> bool {
        self.from_actor() == Some(actor)
    }

    /// Returns a top-level field, treating JSON `null` as absent.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.get(key).filter(|v| !v.is_null())
    }

    /// Returns `true` if the field is present and not `null`.
    #[inline]
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns a string field.
    ///
    /// Returns `None` if absent or not a string.
    #[inline]
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Returns an unsigned integer field.
    ///
    /// Returns `None` if absent or not a non-negative integer.
    #[inline]
    #[must_use]
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(Value::as_u64)
    }

    /// Returns an array field.
    #[inline]
    #[must_use]
    pub fn get_array(&self, key: &str) -> Option<&Vec<Value>> {
        self.get(key).and_then(Value::as_array)
    }

    /// Returns the top-level object, if the document is one.
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        self.value.as_object()
    }

    /// Returns the underlying JSON value.
    #[inline]
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.value
    }

    /// Consumes the message and returns the JSON value.
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Returns `true` for passive navigation notices that no request awaits.
    ///
    /// Only the `stop` state of a `tabNavigated` notice is kept.
    #[must_use]
    pub fn is_navigation_notice(&self) -> bool {
        self.message_type() == Some(TAB_NAVIGATED) && self.get_str("state") != Some(STATE_STOP)
    }
}

impl FromStr for Message {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(text)?))
    }
}

impl From<Value> for Message {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Shared store of received messages.
//!
//! The reader loop adds every published message; foreground waiters scan
//! the store with predicates. One lock guards the whole collection.
//!
//! # Clear-before-send
//!
//! The protocol has no request ids. A requester clears the store right
//! before sending, so only messages that arrived after the send can match
//! its predicate. Only one request may be outstanding per session.
//!
//! Between requests nothing clears the store, so unsolicited packets on an
//! idle session accumulate. The store keeps at most [`MAX_STORED`]
//! messages and drops the oldest beyond that.

// ============================================================================
// Imports
// ============================================================================

use std::collections::VecDeque;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::sync::futures::Notified;

use crate::protocol::Message;

// ============================================================================
// Constants
// ============================================================================

/// Most messages kept at once.
pub const MAX_STORED: usize = 4096;

// ============================================================================
// ResponseStore
// ============================================================================

/// Lock-protected collection of received messages.
#[derive(Debug, Default)]
pub struct ResponseStore {
    /// Messages received since the last clear, in wire order.
    messages: Mutex<VecDeque<Message>>,
    /// Signalled on every add.
    arrived: Notify,
}

impl ResponseStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every stored message.
    pub fn clear(&self) {
        self.messages.lock().clear();
    }

    /// Appends a message and wakes waiters.
    ///
    /// The oldest message is dropped once [`MAX_STORED`] is reached.
    pub fn add(&self, message: Message) {
        {
            let mut messages = self.messages.lock();
            if messages.len() >= MAX_STORED {
                messages.pop_front();
            }
            messages.push_back(message);
        }
        self.arrived.notify_waiters();
    }

    /// Returns `true` if any stored message matches.
    pub fn any<P>(&self, predicate: P) -> bool
    where
        P: Fn(&Message) -> bool,
    {
        self.messages.lock().iter().any(predicate)
    }

    /// Returns the earliest stored message that matches.
    pub fn first<P>(&self, predicate: P) -> Option<Message>
    where
        P: Fn(&Message) -> bool,
    {
        self.messages.lock().iter().find(|m| predicate(m)).cloned()
    }

    /// Returns the number of stored messages.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    /// Returns `true` if nothing is stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    /// Future resolved by the next [`add`](Self::add).
    pub(crate) fn notified(&self) -> Notified<'_> {
        self.arrived.notified()
    }
}

// ============================================================================
// Tests
// ============================================================================

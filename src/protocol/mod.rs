//! Remote debugging protocol message types.
//!
//! This module defines the wire format spoken with Firefox's debugger
//! server: length-prefixed JSON packets exchanged with named actors.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | `Request` | Local → Remote | Command addressed to an actor (`to`) |
//! | `Message` | Remote → Local | Reply or notification from an actor (`from`) |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | Typed command bodies |
//! | `frame` | `<length>:<payload>` codec |
//! | `message` | Untyped received messages |
//! | `request` | Request packets and frame encoding |

// ============================================================================
// Submodules
// ============================================================================

/// Typed command bodies.
pub mod command;

/// Length-prefixed frame codec.
pub mod frame;

/// Received messages.
pub mod message;

/// Request packets.
pub mod request;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::Command;
pub use frame::{FrameBuffer, encode_frame};
pub use message::Message;
pub use request::{Request, to_frame};

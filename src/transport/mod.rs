//! TCP transport layer.
//!
//! This module handles communication with Firefox's debugger server over a
//! raw TCP socket carrying length-prefixed JSON frames.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐                          ┌──────────────────┐
//! │  Session (Rust)  │          TCP             │  Firefox         │
//! │                  │  "<len>:<json>" frames   │  debugger server │
//! │  Connection ─────┼─────────────────────────►│  (actors)        │
//! │  ResponseStore ◄─┼── reader loop ◄──────────┤                  │
//! └──────────────────┘   localhost:6000         └──────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | Socket lifecycle and sends |
//! | `correlator` | Send-and-wait by predicate |
//! | `reader` | Background reader loop |
//! | `store` | Shared received-message store |

// ============================================================================
// Submodules
// ============================================================================

/// Socket lifecycle and sends.
pub mod connection;

/// Request/response correlation.
mod correlator;

/// Background reader loop.
mod reader;

/// Shared received-message store.
pub mod store;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::Connection;
pub use store::ResponseStore;

//! Background reader loop.
//!
//! One task per session drains the socket into a [`FrameBuffer`], decodes
//! each complete frame and publishes it to the [`ResponseStore`].
//!
//! The loop ends when the peer closes the socket, a read fails, or the
//! shutdown signal fires. All three are the expected shutdown path.

// ============================================================================
// Imports
// ============================================================================

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use crate::protocol::frame::INITIAL_CAPACITY;
use crate::protocol::{FrameBuffer, Message};

use super::ResponseStore;

// ============================================================================
// Reader Loop
// ============================================================================

/// Runs until the socket closes or shutdown is signalled.
pub(crate) async fn run_reader_loop<R>(
    mut reader: R,
    store: &ResponseStore,
    mut shutdown: watch::Receiver<bool>,
) where
    R: AsyncRead + Unpin,
{
    let mut frames = FrameBuffer::new();
    let mut chunk = vec![0u8; INITIAL_CAPACITY];

    debug!("Reader loop starting");

    loop {
        let read = tokio::select! {
            biased;

            _ = shutdown.changed() => {
                debug!("Reader loop shutdown requested");
                break;
            }

            read = reader.read(&mut chunk) => read,
        };

        match read {
            Ok(0) => {
                debug!("Debugger closed the connection");
                break;
            }

            Ok(n) => {
                frames.append(&chunk[..n]);
                for text in frames.extract_messages() {
                    publish(&text, store);
                }
            }

            Err(e) => {
                debug!(error = %e, "Socket read ended");
                break;
            }
        }
    }

    debug!(pending = frames.pending_len(), "Reader loop terminated");
}

/// Decodes one frame and stores it unless it is a navigation notice.
fn publish(text: &str, store: &ResponseStore) {
    trace!(message = %text, "Debugger response");

    match text.parse::<Message>() {
        Ok(message) if message.is_navigation_notice() => {
            trace!("Ignoring navigation notice");
        }
        Ok(message) => store.add(message),
        Err(e) => warn!(error = %e, message = %text, "Invalid message"),
    }
}

// ============================================================================
// Tests
// ============================================================================

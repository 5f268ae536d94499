//! TCP connection to the debugger server.
//!
//! This module owns the socket: connect-with-retry, framed sends and
//! teardown. Connecting spawns the reader loop that feeds the shared
//! [`ResponseStore`].
//!
//! # Lifecycle
//!
//! 1. `Connection::connect` - dial until the listener accepts or timeout
//! 2. Reader loop task starts on the read half
//! 3. `send` / `send_and_wait` / `wait` for the life of the session
//! 4. `Connection::close` - signal the reader loop and close the write half

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::{Mutex as AsyncMutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, info, trace};

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::protocol::to_frame;

use super::ResponseStore;
use super::reader::run_reader_loop;

// ============================================================================
// Constants
// ============================================================================

/// Shortest time a single connection attempt is given.
const MIN_ATTEMPT_TIMEOUT: Duration = Duration::from_millis(100);

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for a connection.
struct ConnectionInner {
    /// Remote `host:port`.
    address: String,
    /// Write half; `None` once closed.
    writer: AsyncMutex<Option<OwnedWriteHalf>>,
    /// Messages published by the reader loop.
    store: Arc<ResponseStore>,
    /// Tells the reader loop to stop.
    shutdown_tx: watch::Sender<bool>,
    /// Reader loop task.
    reader: Mutex<Option<JoinHandle<()>>>,
    /// Default response wait.
    timeout: Duration,
    /// Re-check interval while waiting.
    poll_interval: Duration,
}

impl Drop for ConnectionInner {
    fn drop(&mut self) {
        // Last handle gone: stop the reader loop.
        self.shutdown_tx.send_replace(true);
    }
}

// ============================================================================
// Connection
// ============================================================================

/// Connection to a Firefox debugger server.
///
/// Cloning is cheap; clones share the socket and response store.
///
/// # Thread Safety
///
/// `Connection` is `Send + Sync`, but the protocol allows only one
/// outstanding request per session. Callers must not interleave
/// `send_and_wait` calls from several tasks.
#[derive(Clone)]
pub struct Connection {
    inner: Arc<ConnectionInner>,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("address", &self.inner.address)
            .field("timeout", &self.inner.timeout)
            .field("stored", &self.inner.store.len())
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Connects to the debugger server and starts the reader loop.
    ///
    /// Refused connections are retried every
    /// [`SessionConfig::connect_retry_interval`] until
    /// [`SessionConfig::timeout`] elapses, since the browser may still be
    /// starting its listener.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the configuration is invalid
    /// - [`Error::ConnectionTimeout`] if no connection succeeds in time
    pub async fn connect(config: &SessionConfig) -> Result<Self> {
        config.validate()?;

        let address = config.address();
        let stream = dial(&address, config.timeout, config.connect_retry_interval).await?;
        stream.set_nodelay(true)?;

        let (read_half, write_half) = stream.into_split();
        let store = Arc::new(ResponseStore::new());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let loop_store = Arc::clone(&store);
        let reader = tokio::spawn(async move {
            run_reader_loop(read_half, &loop_store, shutdown_rx).await;
        });

        info!(address = %address, "Connected to debugger server");

        Ok(Self {
            inner: Arc::new(ConnectionInner {
                address,
                writer: AsyncMutex::new(Some(write_half)),
                store,
                shutdown_tx,
                reader: Mutex::new(Some(reader)),
                timeout: config.timeout,
                poll_interval: config.poll_interval,
            }),
        })
    }

    /// Serializes a packet, frames it and writes it to the socket.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if the connection was closed
    /// - [`Error::Connection`] if the write fails
    pub async fn send<T: Serialize + ?Sized>(&self, packet: &T) -> Result<()> {
        let frame = to_frame(packet)?;

        let mut guard = self.inner.writer.lock().await;
        let writer = guard.as_mut().ok_or(Error::ConnectionClosed)?;

        trace!(request = %String::from_utf8_lossy(&frame), "Debugger request");

        writer
            .write_all(&frame)
            .await
            .map_err(|e| Error::connection(format!("send to {} failed: {e}", self.inner.address)))
    }

    /// Closes the socket and waits for the reader loop to exit.
    ///
    /// Safe to call more than once.
    pub async fn close(&self) {
        let writer = self.inner.writer.lock().await.take();
        self.inner.shutdown_tx.send_replace(true);

        if let Some(mut writer) = writer {
            if let Err(e) = writer.shutdown().await {
                debug!(error = %e, "Socket shutdown failed");
            }
            info!(address = %self.inner.address, "Connection closed");
        }

        let reader = self.inner.reader.lock().take();
        if let Some(reader) = reader
            && let Err(e) = reader.await
        {
            debug!(error = %e, "Reader loop task failed");
        }
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        *self.inner.shutdown_tx.borrow()
    }

    /// Returns the remote `host:port`.
    #[inline]
    #[must_use]
    pub fn address(&self) -> &str {
        &self.inner.address
    }

    /// Returns the default response timeout.
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    /// Returns the response store fed by the reader loop.
    #[inline]
    pub(crate) fn store(&self) -> &ResponseStore {
        &self.inner.store
    }

    /// Returns the waiter re-check interval.
    #[inline]
    pub(crate) fn poll_interval(&self) -> Duration {
        self.inner.poll_interval
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Dials `address` until it accepts or `deadline_after` elapses.
///
/// The last retry sleep is shortened so one attempt lands at the deadline.
/// Every attempt gets at least [`MIN_ATTEMPT_TIMEOUT`] to complete.
async fn dial(address: &str, deadline_after: Duration, retry_interval: Duration) -> Result<TcpStream> {
    let deadline = Instant::now() + deadline_after;
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        let budget = deadline
            .saturating_duration_since(Instant::now())
            .max(MIN_ATTEMPT_TIMEOUT);

        match timeout(budget, TcpStream::connect(address)).await {
            Ok(Ok(stream)) => {
                debug!(address, attempt, "TCP connection established");
                return Ok(stream);
            }
            Ok(Err(e)) => {
                debug!(address, attempt, error = %e, "Connection attempt failed");
            }
            Err(_) => {
                debug!(address, attempt, "Connection attempt timed out");
            }
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(Error::connection_timeout(
                address,
                deadline_after.as_millis() as u64,
            ));
        }

        sleep(retry_interval.min(deadline - now)).await;
    }
}

// ============================================================================
// Tests
// ============================================================================

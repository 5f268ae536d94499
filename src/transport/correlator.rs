//! Request/response correlation.
//!
//! The debugger protocol echoes no request id. A request is matched to its
//! reply by a caller-supplied predicate over messages received after the
//! request was sent.
//!
//! # Algorithm
//!
//! 1. Clear the response store
//! 2. Send the request
//! 3. Re-check the store on every arrival and at least every poll interval
//! 4. Return the first match, or [`Error::ResponseTimeout`] at the deadline

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::protocol::{Message, Request};

use super::Connection;

// ============================================================================
// Connection - Correlation
// ============================================================================

impl Connection {
    /// Sends a request and waits for a matching reply with the default timeout.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if the connection is closed
    /// - [`Error::ResponseTimeout`] if nothing matches in time
    pub async fn send_and_wait<P>(&self, request: &Request, predicate: P) -> Result<Message>
    where
        P: Fn(&Message) -> bool,
    {
        self.send_and_wait_with_timeout(request, predicate, self.timeout())
            .await
    }

    /// Sends a request and waits for a matching reply with a custom timeout.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if the connection is closed
    /// - [`Error::ResponseTimeout`] if nothing matches in time
    pub async fn send_and_wait_with_timeout<P>(
        &self,
        request: &Request,
        predicate: P,
        wait_timeout: Duration,
    ) -> Result<Message>
    where
        P: Fn(&Message) -> bool,
    {
        self.store().clear();
        self.send(request).await?;

        let operation = format!("{} to {}", request.command.name(), request.to);
        self.wait_for(&operation, predicate, wait_timeout).await
    }

    /// Waits for a matching message without sending anything.
    ///
    /// Used for unsolicited packets such as the server greeting. The store
    /// is not cleared.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResponseTimeout`] if nothing matches in time.
    pub async fn wait<P>(&self, predicate: P) -> Result<Message>
    where
        P: Fn(&Message) -> bool,
    {
        self.wait_with_timeout(predicate, self.timeout()).await
    }

    /// Waits for a matching message with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResponseTimeout`] if nothing matches in time.
    pub async fn wait_with_timeout<P>(&self, predicate: P, wait_timeout: Duration) -> Result<Message>
    where
        P: Fn(&Message) -> bool,
    {
        self.wait_for("matching message", predicate, wait_timeout)
            .await
    }

    /// Polls the store until `predicate` matches or the deadline passes.
    async fn wait_for<P>(&self, operation: &str, predicate: P, wait_timeout: Duration) -> Result<Message>
    where
        P: Fn(&Message) -> bool,
    {
        let deadline = Instant::now() + wait_timeout;
        let store = self.store();

        loop {
            let arrived = store.notified();
            tokio::pin!(arrived);
            arrived.as_mut().enable();

            if store.any(&predicate)
                && let Some(message) = store.first(&predicate)
            {
                trace!(operation, "Response matched");
                return Ok(message);
            }

            let now = Instant::now();
            if now >= deadline {
                debug!(operation, timeout_ms = wait_timeout.as_millis() as u64, "Response timeout");
                return Err(Error::response_timeout(
                    operation,
                    wait_timeout.as_millis() as u64,
                ));
            }

            let nap = self.poll_interval().min(deadline - now);
            tokio::select! {
                _ = &mut arrived => {}
                _ = sleep(nap) => {}
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use tokio::time::Instant;

    use crate::config::SessionConfig;
    use crate::error::Error;
    use crate::identifiers::ActorId;
    use crate::protocol::Request;
    use crate::testing::FakeServer;
    use crate::transport::Connection;

    async fn connect(server: &FakeServer, timeout: Duration) -> Connection {
        let config = SessionConfig::new()
            .with_port(server.port())
            .with_timeout(timeout);
        Connection::connect(&config).await.expect("connect")
    }

    #[tokio::test]
    async fn test_never_matching_predicate_times_out_after_timeout() {
        let server = FakeServer::start(|_request| vec![json!({"from": "root", "noise": true})]).await;
        let connection = connect(&server, Duration::from_millis(300)).await;

        let started = Instant::now();
        let err = connection
            .send_and_wait(&Request::list_tabs(), |m| m.has("tabs"))
            .await
            .unwrap_err();
        let elapsed = started.elapsed();

        assert!(matches!(err, Error::ResponseTimeout { .. }), "{err}");
        assert!(elapsed >= Duration::from_millis(300), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(1500), "{elapsed:?}");
    }

    #[tokio::test]
    async fn test_send_and_wait_returns_matching_reply() {
        let server = FakeServer::start(|request| {
            vec![
                json!({"from": "other", "tabs": []}),
                json!({"from": request["to"], "tabs": [], "selected": 0}),
            ]
        })
        .await;
        let connection = connect(&server, Duration::from_secs(2)).await;

        let reply = connection
            .send_and_wait(&Request::list_tabs(), |m| m.is_from("root") && m.has("tabs"))
            .await
            .expect("reply");

        assert_eq!(reply.get_u64("selected"), Some(0));
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_before_send_discards_stale_replies() {
        let server = FakeServer::start(|request| {
            if request["type"] == "attach" {
                vec![json!({"from": "tab1", "type": "tabAttached", "round": request["to"]})]
            } else {
                vec![]
            }
        })
        .await;
        let connection = connect(&server, Duration::from_secs(1)).await;
        let tab = ActorId::new("tab1");

        connection
            .send_and_wait(&Request::attach(&tab), |m| m.is_from("tab1"))
            .await
            .expect("first reply");

        // The first reply is still stored; a second exchange must not match it.
        let err = connection
            .send_and_wait_with_timeout(
                &Request::list_tabs(),
                |m| m.is_from("tab1"),
                Duration::from_millis(150),
            )
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_wait_sees_unsolicited_greeting() {
        let server = FakeServer::start(|_| vec![]).await;
        let connection = connect(&server, Duration::from_secs(2)).await;

        let greeting = connection
            .wait(|m| m.is_from("root") && m.has("applicationType"))
            .await
            .expect("greeting");
        assert_eq!(greeting.get_str("applicationType"), Some("browser"));
    }
}

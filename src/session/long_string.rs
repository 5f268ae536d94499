//! Chunked retrieval of long string results.
//!
//! Packets are size-limited, so a long script result arrives as a
//! descriptor naming a long string actor:
//!
//! ```json
//! { "type": "longString", "actor": "server1.conn0.longString7", "length": 300000, "initial": "..." }
//! ```
//!
//! The full text is fetched with `substring` requests of [`CHUNK_SIZE`]
//! characters until the declared length is reached.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::ActorId;
use crate::protocol::Request;

use super::Session;

// ============================================================================
// Constants
// ============================================================================

/// Characters requested per `substring` call.
pub const CHUNK_SIZE: u64 = 131_070;

/// Grip type of a long string.
const LONG_STRING: &str = "longString";

/// Upper bound on the capacity reserved up front.
const MAX_PREALLOCATION: u64 = 16 * 1024 * 1024;

// ============================================================================
// LongStringDescriptor
// ============================================================================

/// Grip describing a string too large to inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongStringDescriptor {
    /// Actor serving `substring` requests.
    pub actor: ActorId,
    /// Total length in characters.
    pub length: u64,
}

impl LongStringDescriptor {
    /// Returns `true` if `value` is a grip declaring type `longString`.
    #[must_use]
    pub fn is_long_string(value: &Value) -> bool {
        value.get("type").and_then(Value::as_str) == Some(LONG_STRING)
    }

    /// Parses a long string grip.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidScriptResult`] if the grip's type is not
    /// `longString` or `actor` / `length` are missing.
    pub fn parse(value: &Value) -> Result<Self> {
        if !Self::is_long_string(value) {
            return Err(Error::invalid_script_result(format!(
                "expected a longString grip, got type {}",
                value.get("type").unwrap_or(&Value::Null)
            )));
        }

        let actor = value
            .get("actor")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::invalid_script_result("longString grip missing `actor`"))?;

        let length = value
            .get("length")
            .and_then(Value::as_u64)
            .ok_or_else(|| Error::invalid_script_result("longString grip missing `length`"))?;

        Ok(Self {
            actor: ActorId::new(actor),
            length,
        })
    }

    /// Returns the number of `substring` requests needed.
    #[inline]
    #[must_use]
    pub fn chunk_count(&self) -> u64 {
        self.length.div_ceil(CHUNK_SIZE)
    }
}

// ============================================================================
// Session - Long Strings
// ============================================================================

impl Session {
    /// Fetches the full text of a long string.
    ///
    /// The loop ends on reaching the declared length; the last chunk may be
    /// shorter than requested.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidScriptResult`] if a chunk reply has no `substring`
    /// - [`Error::ResponseTimeout`] if a chunk does not arrive in time
    pub async fn read_long_string(&self, descriptor: &LongStringDescriptor) -> Result<String> {
        self.ensure_attached()?;

        let actor = descriptor.actor.as_str();
        let mut text = String::with_capacity(descriptor.length.min(MAX_PREALLOCATION) as usize);
        let mut offset: u64 = 0;

        debug!(
            actor,
            length = descriptor.length,
            chunks = descriptor.chunk_count(),
            "Reading long string"
        );

        while offset < descriptor.length {
            let end = chunk_end(offset);
            let request = Request::substring(&descriptor.actor, offset, end);

            let reply = self
                .connection()
                .send_and_wait(&request, |m| {
                    m.is_from(actor) && (m.has("substring") || m.has("error"))
                })
                .await?;

            let chunk = reply.get_str("substring").ok_or_else(|| {
                Error::invalid_script_result(format!(
                    "substring reply from {actor} has no text: {}",
                    reply.get_str("message").or(reply.get_str("error")).unwrap_or("unknown error")
                ))
            })?;

            text.push_str(chunk);
            offset = end;
        }

        debug!(actor, received = text.len(), "Long string complete");
        Ok(text)
    }
}

/// End of the chunk starting at `offset`, clamped for bogus lengths.
#[inline]
fn chunk_end(offset: u64) -> u64 {
    offset.saturating_add(CHUNK_SIZE)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use serde_json::json;

    use crate::config::SessionConfig;
    use crate::testing::{FakeServer, browser_handler};

    const LONG_ACTOR: &str = "server1.conn0.longString7";

    /// Browser whose `evaluateJS` always yields a long string of `text`.
    async fn long_string_server(text: String) -> FakeServer {
        let length = text.chars().count();
        let evaluate = browser_handler(move |_| {
            json!({"type": "longString", "actor": LONG_ACTOR, "length": length, "initial": "x"})
        });

        FakeServer::start(move |request| {
            if request["type"] != "substring" {
                return evaluate(request);
            }
            let start = request["start"].as_u64().unwrap_or_default() as usize;
            let end = (request["end"].as_u64().unwrap_or_default() as usize).min(text.len());
            vec![json!({"from": LONG_ACTOR, "substring": &text[start.min(end)..end]})]
        })
        .await
    }

    async fn session_for(server: &FakeServer) -> Session {
        let config = SessionConfig::new()
            .with_port(server.port())
            .with_timeout(Duration::from_secs(2));
        Session::connect(&config).await.expect("session")
    }

    #[test]
    fn test_parse_descriptor() {
        let grip = json!({"type": "longString", "actor": "ls1", "length": 300_000, "initial": "abc"});
        let descriptor = LongStringDescriptor::parse(&grip).expect("descriptor");

        assert_eq!(descriptor.actor, "ls1");
        assert_eq!(descriptor.length, 300_000);
        assert_eq!(descriptor.chunk_count(), 3);
    }

    #[test]
    fn test_parse_rejects_other_grip_types() {
        let grip = json!({"type": "object", "actor": "obj1", "class": "Window"});
        let err = LongStringDescriptor::parse(&grip).unwrap_err();
        assert!(matches!(err, Error::InvalidScriptResult { .. }));
    }

    #[test]
    fn test_parse_rejects_missing_length() {
        let grip = json!({"type": "longString", "actor": "ls1"});
        assert!(LongStringDescriptor::parse(&grip).is_err());
    }

    #[test]
    fn test_chunk_end_saturates() {
        assert_eq!(chunk_end(0), CHUNK_SIZE);
        assert_eq!(chunk_end(u64::MAX - 5), u64::MAX);
    }

    #[tokio::test]
    async fn test_reassembles_300000_chars_in_three_chunks() {
        let text: String = (0..300_000).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let server = long_string_server(text.clone()).await;
        let session = session_for(&server).await;

        let result = session.evaluate("document.documentElement.outerHTML").await.expect("evaluate");

        assert_eq!(result.len(), 300_000);
        assert_eq!(result, text);

        let chunks = server.requests_of_type("substring");
        assert_eq!(chunks.len(), 3);
        let ranges: Vec<(u64, u64)> = chunks
            .iter()
            .map(|r| (r["start"].as_u64().unwrap(), r["end"].as_u64().unwrap()))
            .collect();
        assert_eq!(ranges, vec![(0, 131_070), (131_070, 262_140), (262_140, 393_210)]);
        assert!(chunks.iter().all(|r| r["to"] == LONG_ACTOR));
    }

    #[tokio::test]
    async fn test_chunk_error_is_invalid_script_result() {
        let evaluate = browser_handler(|_| json!({"type": "longString", "actor": LONG_ACTOR, "length": 10}));
        let server = FakeServer::start(move |request| {
            if request["type"] == "substring" {
                vec![json!({"from": LONG_ACTOR, "error": "noSuchActor", "message": "gone"})]
            } else {
                evaluate(request)
            }
        })
        .await;
        let session = session_for(&server).await;

        let err = session.evaluate("big()").await.unwrap_err();
        assert!(matches!(err, Error::InvalidScriptResult { .. }), "{err}");
        assert!(err.to_string().contains("gone"));
    }

    #[tokio::test]
    async fn test_zero_length_needs_no_chunks() {
        let server = long_string_server(String::new()).await;
        let session = session_for(&server).await;

        let descriptor = LongStringDescriptor {
            actor: ActorId::new(LONG_ACTOR),
            length: 0,
        };
        let text = session.read_long_string(&descriptor).await.expect("read");

        assert!(text.is_empty());
        assert!(server.requests_of_type("substring").is_empty());
    }
}

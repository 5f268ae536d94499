//! JavaScript evaluation through the console actor.

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::{Message, Request};

use super::Session;
use super::long_string::LongStringDescriptor;

// ============================================================================
// Session - Script Evaluation
// ============================================================================

impl Session {
    /// Evaluates a script in the selected tab and returns its result as text.
    ///
    /// The reply is matched on both the console actor and the echoed
    /// `input`, since the console may emit other packets meanwhile. Long
    /// string results are fetched in full.
    ///
    /// # Result rendering
    ///
    /// | Result | Returned text |
    /// |--------|---------------|
    /// | string | the string |
    /// | `null` / missing | empty string |
    /// | number, boolean | JSON text |
    /// | long string grip | the full string |
    /// | other grip | compact JSON of the grip |
    ///
    /// # Example
    ///
    /// ```ignore
    /// let title = session.evaluate("document.title").await?;
    /// ```
    ///
    /// # Errors
    ///
    /// - [`Error::ScriptError`] if the script threw
    /// - [`Error::InvalidScriptResult`] if a long string result is malformed
    /// - [`Error::ResponseTimeout`] if no matching reply arrives
    pub async fn evaluate(&self, script: &str) -> Result<String> {
        self.ensure_attached()?;
        debug!(console = %self.console_actor(), script_len = script.len(), "Evaluating script");

        let console = self.console_actor().as_str();
        let request = Request::evaluate(self.console_actor(), script);

        let reply = self
            .connection()
            .send_and_wait(&request, |m| {
                m.is_from(console) && m.get_str("input") == Some(script)
            })
            .await?;

        if let Some(message) = exception_message(&reply) {
            debug!(console, error = %message, "Script threw");
            return Err(Error::script_error(message));
        }

        let result = reply.get("result").unwrap_or(&Value::Null);

        if LongStringDescriptor::is_long_string(result) {
            let descriptor = LongStringDescriptor::parse(result)?;
            return self.read_long_string(&descriptor).await;
        }

        Ok(render_result(result))
    }

    /// Returns the current document URL.
    ///
    /// # Errors
    ///
    /// Same as [`evaluate`](Self::evaluate).
    pub async fn current_url(&self) -> Result<String> {
        debug!(tab = %self.tab_actor(), "Getting page URL");
        self.evaluate("window.location.href").await
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Returns the exception text if the evaluation threw.
fn exception_message(reply: &Message) -> Option<String> {
    let exception = reply.get("exception")?;

    let message = reply
        .get_str("exceptionMessage")
        .map(str::to_string)
        .unwrap_or_else(|| render_result(exception));
    Some(message)
}

/// Renders an inline result as text.
fn render_result(result: &Value) -> String {
    match result {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Escapes a string for safe use in JavaScript.
pub(crate) fn json_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}

// ============================================================================
// Tests
// ============================================================================

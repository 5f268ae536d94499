//! Request packet types understood by the debugger actors.
//!
//! Each variant serializes with a camel-case `type` tag and camel-case
//! fields, matching the remote protocol's conventions.
//!
//! | Variant | Addressed to | Wire `type` |
//! |---------|--------------|-------------|
//! | [`Command::ListTabs`] | `root` | `listTabs` |
//! | [`Command::Attach`] | tab actor | `attach` |
//! | [`Command::EvaluateJs`] | console actor | `evaluateJS` |
//! | [`Command::Substring`] | long string actor | `substring` |

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;

// ============================================================================
// Command
// ============================================================================

/// A request packet body, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    /// List open tabs and the selected index.
    ListTabs,

    /// Attach to a tab actor.
    Attach,

    /// Evaluate JavaScript in the console actor's global.
    #[serde(rename = "evaluateJS")]
    EvaluateJs {
        /// Script source. Echoed back as `input` in the result.
        text: String,
    },

    /// Fetch characters `[start, end)` of a long string.
    Substring {
        /// Start offset.
        start: u64,
        /// End offset (exclusive).
        end: u64,
    },
}

impl Command {
    /// Returns the wire `type` of the command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ListTabs => "listTabs",
            Self::Attach => "attach",
            Self::EvaluateJs { .. } => "evaluateJS",
            Self::Substring { .. } => "substring",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_unit_command() {
        let value = serde_json::to_value(Command::ListTabs).expect("serialize");
        assert_eq!(value, json!({"type": "listTabs"}));
    }

    #[test]
    fn test_evaluate_js_keeps_protocol_casing() {
        let cmd = Command::EvaluateJs {
            text: "1 + 1".to_string(),
        };
        let value = serde_json::to_value(&cmd).expect("serialize");
        assert_eq!(value, json!({"type": "evaluateJS", "text": "1 + 1"}));
        assert_eq!(cmd.name(), "evaluateJS");
    }

    #[test]
    fn test_substring() {
        let cmd = Command::Substring { start: 0, end: 131_070 };
        let value = serde_json::to_value(&cmd).expect("serialize");
        assert_eq!(value, json!({"type": "substring", "start": 0, "end": 131_070}));
    }
}

use serde_json::{Value, json};

/// Response body as seen by a check: decoded JSON, or the raw text when the
/// body was fetched as opaque text or did not decode.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

/// Outcome of a single check. One variant per failure kind so callers can
/// assert on why a check failed, not just that it did.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Passed {
        status: u16,
        payload: Payload,
    },
    StatusMismatch {
        expected: u16,
        actual: u16,
        payload: Payload,
    },
    /// The request itself failed (connection refused, DNS, timeout).
    Transport { error: String },
    /// Body was expected to be YAML and did not parse.
    Parse { error: String },
    /// Body parsed but repeats field names.
    Validation { duplicates: Vec<String> },
}

impl CheckOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CheckOutcome::Passed { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CheckOutcome::Passed { .. } => "passed",
            CheckOutcome::StatusMismatch { .. } => "status_mismatch",
            CheckOutcome::Transport { .. } => "transport",
            CheckOutcome::Parse { .. } => "parse",
            CheckOutcome::Validation { .. } => "validation",
        }
    }

    /// Flattened payload in the `{"content": ..}` / `{"error": ..}` shape used
    /// by the console output and the JSON report.
    pub fn legacy_payload(&self) -> Value {
        match self {
            CheckOutcome::Passed { payload, .. } => match payload {
                Payload::Json(v) => v.clone(),
                Payload::Text(t) => json!({ "content": t }),
            },
            CheckOutcome::StatusMismatch { payload, .. } => match payload {
                Payload::Json(v) => v.clone(),
                Payload::Text(t) => json!({ "error": t }),
            },
            CheckOutcome::Transport { error } | CheckOutcome::Parse { error } => {
                json!({ "error": error })
            }
            CheckOutcome::Validation { duplicates } => json!({ "error": duplicates }),
        }
    }

    /// One-line human description of a failure. Empty for passes.
    pub fn failure_detail(&self) -> String {
        match self {
            CheckOutcome::Passed { .. } => String::new(),
            CheckOutcome::StatusMismatch {
                expected, actual, ..
            } => format!("Expected {expected}, got {actual}"),
            CheckOutcome::Transport { error } => format!("Error: {error}"),
            CheckOutcome::Parse { error } => format!("Invalid YAML: {error}"),
            CheckOutcome::Validation { duplicates } => {
                format!("Duplicate field names: {}", duplicates.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub outcome: CheckOutcome,
}

impl CheckResult {
    pub fn passed(&self) -> bool {
        self.outcome.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passed_text_payload_wraps_content() {
        let outcome = CheckOutcome::Passed {
            status: 200,
            payload: Payload::Text("<html></html>".to_string()),
        };
        assert!(outcome.is_success());
        assert_eq!(outcome.legacy_payload(), json!({"content": "<html></html>"}));
    }

    #[test]
    fn test_passed_json_payload_is_returned_as_is() {
        let outcome = CheckOutcome::Passed {
            status: 200,
            payload: Payload::Json(json!({"message": "ok"})),
        };
        assert_eq!(outcome.legacy_payload(), json!({"message": "ok"}));
    }

    #[test]
    fn test_mismatch_text_payload_becomes_error() {
        let outcome = CheckOutcome::StatusMismatch {
            expected: 200,
            actual: 500,
            payload: Payload::Text("boom".to_string()),
        };
        assert!(!outcome.is_success());
        assert_eq!(outcome.legacy_payload(), json!({"error": "boom"}));
        assert_eq!(outcome.failure_detail(), "Expected 200, got 500");
    }

    #[test]
    fn test_transport_error_payload() {
        let outcome = CheckOutcome::Transport {
            error: "connection refused".to_string(),
        };
        assert_eq!(outcome.kind(), "transport");
        assert_eq!(outcome.legacy_payload(), json!({"error": "connection refused"}));
    }

    #[test]
    fn test_validation_payload_lists_duplicates() {
        let outcome = CheckOutcome::Validation {
            duplicates: vec!["title".to_string()],
        };
        assert_eq!(outcome.legacy_payload(), json!({"error": ["title"]}));
        assert_eq!(outcome.failure_detail(), "Duplicate field names: title");
    }
}

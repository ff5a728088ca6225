//! Interpretation of the completion reply.

use crate::prompt::NO_RELEVANT_FUNCTION;
use crate::types::FunctionCall;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static FENCED_JSON: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").ok());

/// What the extractor made of one completion round.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// A structurally complete call, not yet validated against the catalog.
    Candidate(FunctionCall),
    /// Plain text: the reply verbatim.
    Text(String),
    /// The conversation does not end with a user turn; nothing was asked.
    Skipped,
}

impl Extraction {
    pub fn is_candidate(&self) -> bool {
        matches!(self, Extraction::Candidate(_))
    }
}

/// Turn a raw reply into a candidate call or plain text.
///
/// Anything that is not an object with both `name` and `arguments` is text,
/// including the no-function phrase and unparseable output.
pub fn interpret_reply(reply: String, lenient: bool) -> Extraction {
    let trimmed = reply.trim();
    if is_no_function_reply(trimmed) {
        return Extraction::Text(reply);
    }

    let parsed = serde_json::from_str::<Value>(trimmed)
        .ok()
        .or_else(|| lenient.then(|| parse_fenced(trimmed)).flatten());

    match parsed {
        Some(Value::Object(obj)) => match call_from_object(obj) {
            Some(call) => Extraction::Candidate(call),
            None => Extraction::Text(reply),
        },
        _ => Extraction::Text(reply),
    }
}

/// Whether the reply is the no-function phrase, optionally quoted.
pub fn is_no_function_reply(text: &str) -> bool {
    let unquoted = text
        .trim()
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .trim()
        .trim_end_matches('.');
    unquoted.eq_ignore_ascii_case(NO_RELEVANT_FUNCTION)
}

fn parse_fenced(text: &str) -> Option<Value> {
    let re = FENCED_JSON.as_ref()?;
    let inner = re.captures(text)?.get(1)?;
    serde_json::from_str(inner.as_str().trim()).ok()
}

fn call_from_object(mut obj: Map<String, Value>) -> Option<FunctionCall> {
    let name = obj.get("name")?.as_str()?.to_string();
    let arguments = match obj.remove("arguments")? {
        // Some models double-encode the arguments object.
        Value::String(s) => match serde_json::from_str::<Value>(&s).ok()? {
            v @ Value::Object(_) => v,
            _ => return None,
        },
        other => other,
    };
    FunctionCall::from_value(name, arguments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_call() {
        let reply = r#"{"name": "get_weather", "arguments": {"city": "Rome"}}"#;
        match interpret_reply(reply.to_string(), false) {
            Extraction::Candidate(call) => {
                assert_eq!(call.name, "get_weather");
                assert_eq!(call.arguments["city"], json!("Rome"));
            }
            other => panic!("expected candidate, got {:?}", other),
        }
    }

    #[test]
    fn test_sentinel_is_text_unchanged() {
        for reply in [
            "NO RELEVANT FUNCTIONS TO CALL",
            "\"NO RELEVANT FUNCTIONS TO CALL\"",
            "  no relevant functions to call.\n",
        ] {
            assert_eq!(
                interpret_reply(reply.to_string(), false),
                Extraction::Text(reply.to_string())
            );
        }
    }

    #[test]
    fn test_prose_is_text() {
        let reply = "Rome is sunny today.";
        assert_eq!(
            interpret_reply(reply.to_string(), false),
            Extraction::Text(reply.to_string())
        );
    }

    #[test]
    fn test_object_missing_fields_is_text() {
        for reply in [
            r#"{"name": "get_weather"}"#,
            r#"{"arguments": {"city": "Rome"}}"#,
            r#"{"name": 7, "arguments": {}}"#,
            r#"{"name": "f", "arguments": [1, 2]}"#,
            r#"["get_weather"]"#,
        ] {
            assert!(!interpret_reply(reply.to_string(), false).is_candidate(), "{}", reply);
        }
    }

    #[test]
    fn test_string_encoded_and_null_arguments() {
        let reply = r#"{"name": "f", "arguments": "{\"a\": 1}"}"#;
        match interpret_reply(reply.to_string(), false) {
            Extraction::Candidate(call) => assert_eq!(call.arguments["a"], json!(1)),
            other => panic!("unexpected {:?}", other),
        }

        let reply = r#"{"name": "now", "arguments": null}"#;
        match interpret_reply(reply.to_string(), false) {
            Extraction::Candidate(call) => assert!(call.arguments.is_empty()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_fenced_call_only_when_lenient() {
        let reply = "```json\n{\"name\": \"f\", \"arguments\": {}}\n```";
        assert!(!interpret_reply(reply.to_string(), false).is_candidate());
        assert!(interpret_reply(reply.to_string(), true).is_candidate());
    }
}

//! History normalization: fold function results into the turn before them.

use crate::error::{Error, ErrorContext};
use crate::types::Message;
use crate::Result;

/// Collapse every function-result message into the preceding output message.
///
/// The result content is appended after a newline and the function-result
/// entry is dropped, so the model sees a plain alternating dialogue. A
/// function result with nothing before it is rejected.
pub fn normalize_history(messages: &[Message]) -> Result<Vec<Message>> {
    let mut normalized: Vec<Message> = Vec::with_capacity(messages.len());
    for (idx, msg) in messages.iter().enumerate() {
        if !msg.is_function_result() {
            normalized.push(msg.clone());
            continue;
        }
        let prev = normalized.last_mut().ok_or_else(|| {
            Error::invalid_history(
                "function result has no preceding message",
                ErrorContext::new()
                    .with_field_path(format!("history[{}]", idx))
                    .with_source("history_normalizer"),
            )
        })?;
        prev.content.push('\n');
        prev.content.push_str(&msg.content);
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageRole;

    #[test]
    fn test_identity_without_function_results() {
        let history = vec![
            Message::system("be brief"),
            Message::user("hi"),
            Message::assistant("hello"),
            Message::user("weather?"),
        ];
        assert_eq!(normalize_history(&history).unwrap(), history);
        assert!(normalize_history(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_merges_into_previous_message() {
        let history = vec![
            Message::user("weather in Rome?"),
            Message::function_result("sunny, 24C"),
            Message::assistant("It is sunny."),
        ];
        let out = normalize_history(&history).unwrap();
        assert_eq!(out.len(), history.len() - 1);
        assert_eq!(out[0].role, MessageRole::User);
        assert_eq!(out[0].content, "weather in Rome?\nsunny, 24C");
        assert_eq!(out[1], Message::assistant("It is sunny."));
        // input untouched
        assert_eq!(history[0].content, "weather in Rome?");
    }

    #[test]
    fn test_consecutive_results_merge_into_same_message() {
        let history = vec![
            Message::user("q"),
            Message::function_result("r1"),
            Message::function_result("r2"),
        ];
        let out = normalize_history(&history).unwrap();
        assert_eq!(out, vec![Message::user("q\nr1\nr2")]);
    }

    #[test]
    fn test_leading_function_result_is_invalid() {
        let err = normalize_history(&[Message::function_result("orphan"), Message::user("q")])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidHistory { .. }));
        assert!(err.aborts_pass());
    }
}

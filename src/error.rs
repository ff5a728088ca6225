use crate::transport::CompletionError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path that caused the error (e.g., "history[0]", "catalog[2].name")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., the offending value)
    pub details: Option<String>,
    /// Source of the error (e.g., "history_normalizer", "catalog")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for prompt-driven function calling.
///
/// Only [`Error::InvalidHistory`] and [`Error::CompletionUnavailable`] abort a
/// reasoning pass. Rejected or duplicate calls are not errors; they surface as
/// [`crate::governor::Verdict`] values.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid history: {message}{}", format_context(.context))]
    InvalidHistory {
        message: String,
        context: ErrorContext,
    },

    #[error("Completion capability unavailable: {0}")]
    CompletionUnavailable(#[from] CompletionError),

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Unknown function: {name}")]
    UnknownFunction { name: String },

    #[error("Function '{name}' failed: {message}")]
    Handler { name: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn invalid_history(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::InvalidHistory {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn handler(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Error::Handler {
            name: name.into(),
            message: msg.into(),
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::InvalidHistory { context, .. } | Error::Configuration { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }

    /// Whether this error must abort the current reasoning pass.
    pub fn aborts_pass(&self) -> bool {
        matches!(
            self,
            Error::InvalidHistory { .. } | Error::CompletionUnavailable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_context() {
        let err = Error::invalid_history(
            "function result has no preceding message",
            ErrorContext::new()
                .with_field_path("history[0]")
                .with_source("history_normalizer"),
        );
        assert_eq!(
            err.to_string(),
            "Invalid history: function result has no preceding message (field: history[0], source: history_normalizer)"
        );
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("history[0]")
        );
    }

    #[test]
    fn test_only_history_and_completion_abort() {
        assert!(Error::invalid_history("x", ErrorContext::new()).aborts_pass());
        assert!(Error::from(CompletionError::Cancelled).aborts_pass());
        assert!(!Error::handler("f", "boom").aborts_pass());
        assert!(!Error::configuration("dup", ErrorContext::default()).aborts_pass());
    }
}

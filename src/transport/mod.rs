//! Completion capability consumed by the extractor.
//!
//! The library never talks to a model directly; it hands a message sequence to
//! a [`CompletionProvider`] and gets one text reply back. [`HttpCompletionProvider`]
//! covers OpenAI-compatible endpoints; tests and embedders plug in their own.

pub mod http;

pub use http::HttpCompletionProvider;

use crate::types::Message;
use async_trait::async_trait;
use std::sync::Arc;

/// Failure of the completion capability. Never retried inside this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("malformed reply: {0}")]
    Malformed(String),

    #[error("cancelled")]
    Cancelled,
}

/// Single-shot text completion over an ordered message sequence.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError>;
}

#[async_trait]
impl<P: CompletionProvider + ?Sized> CompletionProvider for Arc<P> {
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError> {
        (**self).complete(messages).await
    }
}

//! Shared fixtures for integration tests

#![allow(dead_code)]

use ai_lib_promptcall::transport::{CompletionError, CompletionProvider};
use ai_lib_promptcall::types::{Catalog, FunctionDefinition, FunctionExample, Message};
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Completion provider that plays back canned replies and records every
/// prompt it receives.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    prompts: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedProvider {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_results(replies.into_iter().map(|r| Ok(r.into())))
    }

    pub fn with_results<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = Result<String, CompletionError>>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<Vec<Message>> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::Unavailable("script exhausted".into())))
    }
}

pub fn weather_definition() -> FunctionDefinition {
    FunctionDefinition::new("get_weather", "Current weather for a city")
        .parameter("city", json!({"type": "string"}))
        .example(FunctionExample::from_arguments(
            "What's the weather in Paris?",
            &json!({"city": "Paris"}),
        ))
}

pub fn weather_catalog() -> Catalog {
    Catalog::new(vec![weather_definition()]).unwrap()
}

//! # ai-lib-promptcall
//!
//! Prompt-driven function calling for chat models that have no native tool
//! support.
//!
//! ## Overview
//!
//! Given a conversation and a catalog of callable functions, the library asks
//! a plain text-completion model to either pick a function (answering with a
//! JSON object) or declare that none is relevant. The reply is parsed,
//! validated against the catalog, and deduplicated so the same call never runs
//! twice in one reasoning pass.
//!
//! ## Pipeline
//!
//! 1. **History normalization** ([`prompt::normalize_history`]): function
//!    results are folded into the turn before them.
//! 2. **Catalog rendering** ([`prompt::render_catalog`]): byte-stable text block
//!    describing every function, embedded in the system instruction.
//! 3. **Call extraction** ([`extract::CallExtractor`]): one completion request,
//!    reply read as a call or as plain text.
//! 4. **Call governance** ([`governor::CallGovernor`]): existence check,
//!    argument key-set check, per-pass dedupe.
//!
//! [`runtime::PromptCallAgent`] strings these together with a
//! [`registry::FunctionRegistry`] of handlers.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ai_lib_promptcall::registry::FunctionRegistry;
//! use ai_lib_promptcall::runtime::{PromptCallAgent, Session};
//! use ai_lib_promptcall::types::FunctionDefinition;
//! use ai_lib_promptcall::PromptCallConfig;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> ai_lib_promptcall::Result<()> {
//!     let mut registry = FunctionRegistry::new();
//!     registry.register_fn(
//!         FunctionDefinition::new("get_weather", "Current weather for a city")
//!             .parameter("city", json!({"type": "string"})),
//!         |args| async move { Ok::<_, ai_lib_promptcall::Error>(format!("Sunny in {}", args["city"])) },
//!     )?;
//!
//!     let config = PromptCallConfig::from_env()?;
//!     let agent = PromptCallAgent::from_config(&config, Arc::new(registry))?;
//!
//!     let mut session = Session::new();
//!     let reply = agent.respond(&mut session, "What's the weather in Rome?").await?;
//!     println!("{}", reply.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Messages, function definitions, catalog, calls |
//! | [`prompt`] | History normalization, catalog rendering, instruction |
//! | [`extract`] | Completion request and reply interpretation |
//! | [`governor`] | Validation and per-pass dedupe |
//! | [`registry`] | Name → handler capability table |
//! | [`transport`] | Completion capability trait and HTTP client |
//! | [`runtime`] | Sessions and reasoning passes |
//! | [`config`] | YAML and environment configuration |

pub mod config;
pub mod extract;
pub mod governor;
pub mod prompt;
pub mod registry;
pub mod runtime;
pub mod transport;
pub mod types;

pub use config::PromptCallConfig;
pub use extract::{CallExtractor, Extraction};
pub use governor::{CallGovernor, Verdict};
pub use runtime::{PassReply, PromptCallAgent, Session};
pub use transport::{CompletionError, CompletionProvider};
pub use types::{Catalog, FunctionCall, FunctionDefinition, Message, MessageRole};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};

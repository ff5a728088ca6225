//! Core data types shared by every stage of a reasoning pass.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Message`] | Conversation turn with role and text content |
//! | [`MessageRole`] | system, user, assistant, or function result |
//! | [`FunctionDefinition`] | A callable function with parameters and examples |
//! | [`Catalog`] | Ordered set of definitions with unique names |
//! | [`FunctionCall`] | Invocation parsed from a model reply |
//!
//! ## Example
//!
//! ```rust
//! use ai_lib_promptcall::types::{Catalog, FunctionDefinition, FunctionExample, Message};
//! use serde_json::json;
//!
//! let history = vec![Message::user("What's the weather in Rome?")];
//!
//! let catalog = Catalog::new(vec![FunctionDefinition::new(
//!     "get_weather",
//!     "Current weather for a city",
//! )
//! .parameter("city", json!({"type": "string"}))
//! .example(FunctionExample::from_arguments(
//!     "Weather in Paris?",
//!     &json!({"city": "Paris"}),
//! ))])
//! .unwrap();
//! assert_eq!(catalog.len(), 1);
//! # let _ = history;
//! ```

pub mod function;
pub mod message;

pub use function::{Catalog, FunctionCall, FunctionDefinition, FunctionExample, ParameterSchema};
pub use message::{Message, MessageRole};

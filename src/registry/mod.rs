//! Function registry: the capability table that maps a function name to its
//! definition and handler.
//!
//! Handlers are registered once at startup. The registry's [`Catalog`] is what
//! the model sees; [`FunctionRegistry::dispatch`] runs an approved call by map
//! lookup.

use crate::error::Error;
use crate::types::{Catalog, FunctionCall, FunctionDefinition, FunctionExample, ParameterSchema};
use crate::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Executes one function. The returned text is fed back to the model as the
/// function result.
#[async_trait]
pub trait FunctionHandler: Send + Sync {
    async fn call(&self, arguments: Map<String, Value>) -> Result<String>;
}

/// Handler backed by an async closure over raw JSON arguments.
pub struct FnHandler<F> {
    handler: F,
}

#[async_trait]
impl<F, Fut> FunctionHandler for FnHandler<F>
where
    F: Fn(Map<String, Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    async fn call(&self, arguments: Map<String, Value>) -> Result<String> {
        (self.handler)(arguments).await
    }
}

pub fn handler_fn<F, Fut>(handler: F) -> FnHandler<F>
where
    F: Fn(Map<String, Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    FnHandler { handler }
}

/// Handler whose arguments are deserialized into `A` before the call.
pub struct TypedHandler<A, F> {
    name: String,
    handler: F,
    _args: PhantomData<fn(A)>,
}

#[async_trait]
impl<A, F, Fut> FunctionHandler for TypedHandler<A, F>
where
    A: DeserializeOwned + Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    async fn call(&self, arguments: Map<String, Value>) -> Result<String> {
        let args: A = serde_json::from_value(Value::Object(arguments))
            .map_err(|e| Error::handler(&self.name, format!("invalid arguments: {}", e)))?;
        (self.handler)(args).await
    }
}

/// Parameter listing derived from the JSON schema of `A`.
pub fn parameters_from_type<A: schemars::JsonSchema>() -> ParameterSchema {
    let schema = schemars::schema_for!(A);
    match serde_json::to_value(&schema) {
        Ok(value) => ParameterSchema::from_json_schema(&value),
        Err(_) => ParameterSchema::new(),
    }
}

#[derive(Default)]
pub struct FunctionRegistry {
    catalog: Catalog,
    handlers: HashMap<String, Arc<dyn FunctionHandler>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition with its handler. Names must be unique.
    pub fn register<H>(&mut self, definition: FunctionDefinition, handler: H) -> Result<()>
    where
        H: FunctionHandler + 'static,
    {
        let name = definition.name.clone();
        self.catalog.push(definition)?;
        self.handlers.insert(name.clone(), Arc::new(handler));
        debug!(function = %name, "registered function");
        Ok(())
    }

    pub fn register_fn<F, Fut>(&mut self, definition: FunctionDefinition, handler: F) -> Result<()>
    where
        F: Fn(Map<String, Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        self.register(definition, handler_fn(handler))
    }

    /// Register a function whose parameters come from the schema of `A`.
    pub fn register_typed<A, F, Fut>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        examples: Vec<FunctionExample>,
        handler: F,
    ) -> Result<()>
    where
        A: schemars::JsonSchema + DeserializeOwned + Send + 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        let name = name.into();
        let mut definition =
            FunctionDefinition::new(name.clone(), description).parameters(parameters_from_type::<A>());
        definition.examples = examples;
        self.register(
            definition,
            TypedHandler {
                name,
                handler,
                _args: PhantomData,
            },
        )
    }

    /// Definitions in registration order.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn handler(&self, name: &str) -> Option<Arc<dyn FunctionHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run an approved call.
    pub async fn dispatch(&self, call: &FunctionCall) -> Result<String> {
        let handler = self.handler(&call.name).ok_or_else(|| Error::UnknownFunction {
            name: call.name.clone(),
        })?;
        debug!(function = %call.name, "dispatching function call");
        handler.call(call.arguments.clone()).await
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.catalog.names())
            .finish()
    }
}

//! Function catalog and call types.

use crate::error::{Error, ErrorContext};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Argument listing of a function: argument name to its type/description.
///
/// Entries keep declaration order so the rendered catalog is stable and reads
/// the way its author wrote it. Catalog files may also give a full JSON-schema
/// object, in which case its `properties` are the arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSchema {
    entries: Vec<(String, Value)>,
}

impl ParameterSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) an argument.
    pub fn with(mut self, name: impl Into<String>, spec: Value) -> Self {
        self.insert(name, spec);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: Value) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = spec,
            None => self.entries.push((name, spec)),
        }
    }

    /// Build from a JSON schema object, taking its `properties` in the order the
    /// schema lists them.
    pub fn from_json_schema(schema: &Value) -> Self {
        let entries = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Self { entries }
    }

    /// A full JSON-schema object (`type: object` with a `properties` object)
    /// declares its arguments under `properties`; anything else is already a
    /// flat argument listing.
    fn into_arguments(self) -> Self {
        let is_object_schema = self.get("type").and_then(Value::as_str) == Some("object");
        let properties: Option<Vec<(String, Value)>> = self
            .get("properties")
            .and_then(Value::as_object)
            .filter(|_| is_object_schema)
            .map(|props| props.iter().map(|(k, v)| (k.clone(), v.clone())).collect());
        match properties {
            Some(entries) => Self { entries },
            None => self,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ParameterSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ParameterSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = ParameterSchema;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of argument name to argument spec")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut schema = ParameterSchema::new();
                while let Some((name, spec)) = access.next_entry::<String, Value>()? {
                    schema.insert(name, spec);
                }
                Ok(schema.into_arguments())
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(ParameterSchema::new())
            }
        }

        deserializer.deserialize_any(OrderedVisitor)
    }
}

/// Worked example shown to the model: a query and the call it should produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionExample {
    pub prompt: String,
    /// Serialized call text, emitted verbatim in the catalog.
    pub call: String,
}

impl FunctionExample {
    pub fn new(prompt: impl Into<String>, call: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            call: call.into(),
        }
    }

    /// Example whose call text is the compact JSON of `arguments`.
    pub fn from_arguments(prompt: impl Into<String>, arguments: &Value) -> Self {
        Self::new(prompt, arguments.to_string())
    }
}

/// A function the model may choose to invoke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: ParameterSchema,
    #[serde(default)]
    pub examples: Vec<FunctionExample>,
}

impl FunctionDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: ParameterSchema::new(),
            examples: Vec::new(),
        }
    }

    pub fn parameter(mut self, name: impl Into<String>, spec: Value) -> Self {
        self.parameters.insert(name, spec);
        self
    }

    pub fn parameters(mut self, parameters: ParameterSchema) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn example(mut self, example: FunctionExample) -> Self {
        self.examples.push(example);
        self
    }
}

/// Ordered set of function definitions keyed by unique name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FunctionDefinition>", into = "Vec<FunctionDefinition>")]
pub struct Catalog {
    definitions: Vec<FunctionDefinition>,
}

impl Catalog {
    /// Build a catalog; a repeated name is a configuration error.
    pub fn new(definitions: Vec<FunctionDefinition>) -> crate::Result<Self> {
        let mut seen = HashSet::new();
        for (idx, def) in definitions.iter().enumerate() {
            if !seen.insert(def.name.as_str()) {
                return Err(duplicate_name(idx, &def.name));
            }
        }
        Ok(Self { definitions })
    }

    pub fn push(&mut self, definition: FunctionDefinition) -> crate::Result<()> {
        if self.contains(&definition.name) {
            return Err(duplicate_name(self.definitions.len(), &definition.name));
        }
        self.definitions.push(definition);
        Ok(())
    }

    /// Exact-name lookup.
    pub fn get(&self, name: &str) -> Option<&FunctionDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FunctionDefinition> {
        self.definitions.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn from_yaml_str(s: &str) -> crate::Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a catalog file; `.json` is read as JSON, anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }
}

fn duplicate_name(idx: usize, name: &str) -> Error {
    Error::configuration(
        format!("duplicate function name '{}'", name),
        ErrorContext::new()
            .with_field_path(format!("catalog[{}].name", idx))
            .with_source("catalog"),
    )
}

impl TryFrom<Vec<FunctionDefinition>> for Catalog {
    type Error = Error;

    fn try_from(definitions: Vec<FunctionDefinition>) -> Result<Self, Self::Error> {
        Catalog::new(definitions)
    }
}

impl From<Catalog> for Vec<FunctionDefinition> {
    fn from(catalog: Catalog) -> Self {
        catalog.definitions
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a FunctionDefinition;
    type IntoIter = std::slice::Iter<'a, FunctionDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.definitions.iter()
    }
}

/// Function invocation extracted from a model reply. Not yet validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Build from a JSON arguments value; `None` unless it is an object or null.
    pub fn from_value(name: impl Into<String>, arguments: Value) -> Option<Self> {
        match arguments {
            Value::Object(map) => Some(Self::new(name, map)),
            Value::Null => Some(Self::new(name, Map::new())),
            _ => None,
        }
    }

    pub fn argument_keys(&self) -> Vec<&str> {
        self.arguments.keys().map(String::as_str).collect()
    }
}

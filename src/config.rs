//! Runtime configuration.
//!
//! Loaded from YAML (all sections optional) and then overridden from the
//! environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `PROMPTCALL_BASE_URL` | `completion.base_url` |
//! | `PROMPTCALL_MODEL` | `completion.model` |
//! | `PROMPTCALL_API_KEY` | `completion.api_key` |
//! | `PROMPTCALL_TIMEOUT_SECS` | `completion.timeout_secs` |
//! | `PROMPTCALL_MAX_ROUNDS` | `runtime.max_rounds` |

use crate::error::{Error, ErrorContext};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptCallConfig {
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// OpenAI-compatible chat completion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_temperature")]
    pub temperature: Option<f64>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:4000/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_temperature() -> Option<f64> {
    Some(0.1)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Also accept a call wrapped in a Markdown code fence.
    #[serde(default)]
    pub lenient_json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Upper bound on extract/dispatch rounds within one pass.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
        }
    }
}

fn default_max_rounds() -> usize {
    5
}

impl PromptCallConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Defaults overridden by the environment.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from any key lookup; `apply_env` uses the process env.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("PROMPTCALL_BASE_URL") {
            self.completion.base_url = url;
        }
        if let Some(model) = lookup("PROMPTCALL_MODEL") {
            self.completion.model = model;
        }
        if let Some(key) = lookup("PROMPTCALL_API_KEY") {
            self.completion.api_key = Some(key);
        }
        if let Some(raw) = lookup("PROMPTCALL_TIMEOUT_SECS") {
            self.completion.timeout_secs = parse_env("PROMPTCALL_TIMEOUT_SECS", &raw)?;
        }
        if let Some(raw) = lookup("PROMPTCALL_MAX_ROUNDS") {
            self.runtime.max_rounds = parse_env("PROMPTCALL_MAX_ROUNDS", &raw)?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.completion.base_url.trim().is_empty() {
            return Err(Error::configuration(
                "base_url must not be empty",
                ErrorContext::new().with_field_path("completion.base_url"),
            ));
        }
        if self.completion.model.trim().is_empty() {
            return Err(Error::configuration(
                "model must not be empty",
                ErrorContext::new().with_field_path("completion.model"),
            ));
        }
        if self.runtime.max_rounds == 0 {
            return Err(Error::configuration(
                "max_rounds must be at least 1",
                ErrorContext::new().with_field_path("runtime.max_rounds"),
            ));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse::<T>().map_err(|_| {
        Error::configuration(
            format!("invalid value for {}", key),
            ErrorContext::new()
                .with_details(raw.to_string())
                .with_source("environment"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_from_empty_yaml() {
        let config = PromptCallConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, PromptCallConfig::default());
        assert_eq!(config.completion.timeout_secs, 30);
        assert_eq!(config.runtime.max_rounds, 5);
        assert!(!config.extractor.lenient_json);
    }

    #[test]
    fn test_partial_yaml() {
        let config = PromptCallConfig::from_yaml_str(
            "completion:\n  base_url: http://llm:8080/v1\n  model: llama3\nextractor:\n  lenient_json: true\n",
        )
        .unwrap();
        assert_eq!(config.completion.base_url, "http://llm:8080/v1");
        assert_eq!(config.completion.model, "llama3");
        assert_eq!(config.completion.temperature, Some(0.1));
        assert!(config.extractor.lenient_json);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PROMPTCALL_MODEL", "mistral"),
            ("PROMPTCALL_API_KEY", "sk-test"),
            ("PROMPTCALL_TIMEOUT_SECS", " 12 "),
        ]
        .into_iter()
        .collect();
        let mut config = PromptCallConfig::default();
        config
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.completion.model, "mistral");
        assert_eq!(config.completion.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.completion.timeout_secs, 12);
    }

    #[test]
    fn test_bad_override_is_configuration_error() {
        let mut config = PromptCallConfig::default();
        let err = config
            .apply_overrides(|k| (k == "PROMPTCALL_MAX_ROUNDS").then(|| "many".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_zero_rounds_rejected() {
        assert!(PromptCallConfig::from_yaml_str("runtime:\n  max_rounds: 0\n").is_err());
    }
}

//! Model registry: resolves a model name to connection and generation
//! parameters loaded from a JSON configuration file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use serde_json::Value;

/// Registry errors.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("failed to read model config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse model config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("default model '{0}' is not defined in the config")]
    MissingDefault(String),
}

/// Backend variant determining how a request is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFamily {
    /// Locally hosted llama-style endpoint (Ollama and friends).
    Llama,
    /// Hosted third-party chat API. Dispatch is not wired up yet.
    HostedGpt,
}

/// Connection and generation parameters for one model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model name sent as the `model` field in request bodies.
    /// Defaults to the registry key when omitted from the config file.
    #[serde(default)]
    pub name: String,
    /// Endpoint URL.
    pub url: String,
    /// Backend family.
    pub family: ModelFamily,
    /// Generation parameters, flattened into the request body.
    #[serde(default)]
    pub parameters: HashMap<String, Value>,
}

impl ModelInfo {
    /// Create a new ModelInfo with no generation parameters.
    pub fn new(name: impl Into<String>, url: impl Into<String>, family: ModelFamily) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            family,
            parameters: HashMap::new(),
        }
    }

    /// Set a generation parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    /// Merge caller-supplied overrides into the parameter map.
    /// Existing keys are replaced, unknown keys are inserted.
    pub fn merge_parameters(&mut self, overrides: &HashMap<String, Value>) {
        for (key, value) in overrides {
            self.parameters.insert(key.clone(), value.clone());
        }
    }
}

/// Read-only store mapping model names to their parameters, with an
/// explicit default entry for unknown names.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: HashMap<String, ModelInfo>,
    default: ModelInfo,
}

impl ModelRegistry {
    /// Create a registry from an in-memory map and an explicit default entry.
    pub fn new(models: HashMap<String, ModelInfo>, default: ModelInfo) -> Self {
        let mut registry = Self { models, default };
        registry.backfill_names();
        registry
    }

    /// Load the registry from a JSON config file. The file maps model name
    /// to `{name?, url, family, parameters}`. The entry named `default_name`
    /// becomes the fallback for unknown lookups.
    ///
    /// The file is read once here; lookups never touch the filesystem.
    pub fn load(
        path: impl AsRef<Path>,
        default_name: &str,
    ) -> Result<Self, RegistryError> {
        let content = fs::read_to_string(path)?;
        let models: HashMap<String, ModelInfo> = serde_json::from_str(&content)?;

        let default = models
            .get(default_name)
            .cloned()
            .ok_or_else(|| RegistryError::MissingDefault(default_name.to_string()))?;

        Ok(Self::new(models, default))
    }

    fn backfill_names(&mut self) {
        for (key, info) in &mut self.models {
            if info.name.is_empty() {
                info.name = key.clone();
            }
        }
    }

    /// Resolve a model name to its ModelInfo, falling back to the default
    /// entry when the name is unknown. Override parameters replace existing
    /// keys and insert new ones; override values win on conflict.
    pub fn resolve(
        &self,
        model_name: &str,
        overrides: Option<&HashMap<String, Value>>,
    ) -> ModelInfo {
        let mut info = self
            .models
            .get(model_name)
            .unwrap_or(&self.default)
            .clone();

        if let Some(overrides) = overrides {
            info.merge_parameters(overrides);
        }

        info
    }

    /// The default entry used for unknown names.
    pub fn default_model(&self) -> &ModelInfo {
        &self.default
    }

    /// Check if a model name has its own entry.
    pub fn contains(&self, model_name: &str) -> bool {
        self.models.contains_key(model_name)
    }
}

// Layered configuration loading for Formwork
//
// Sources are applied in the order they are added; a later source overrides
// keys set by an earlier one. The merged object is deserialized into the
// caller's settings type with serde.

pub mod env;
pub mod error;
pub mod loader;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;

/// How a string-only source (environment, `.env`) should type a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueHint {
    /// `true`/`false`/`1`/`0`
    Bool,
    Integer,
    /// Comma separated, blanks dropped
    List,
}

#[derive(Debug, Clone)]
enum Source {
    File(PathBuf),
    DotEnv(Option<PathBuf>),
    Env(EnvLoader),
    Value(Map<String, Value>),
}

/// Builder that merges configuration sources into one typed value.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    sources: Vec<Source>,
    hints: HashMap<String, ValueHint>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a JSON, TOML or `.env` file; the format follows the extension.
    pub fn add_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(Source::File(path.into()));
        self
    }

    /// Load a dotenv file into the process environment, then read the
    /// environment with `prefix`. A missing default `.env` is ignored.
    pub fn load_dotenv(mut self, path: Option<PathBuf>, prefix: impl Into<String>) -> Self {
        self.sources.push(Source::DotEnv(path));
        self.sources.push(Source::Env(EnvLoader::with_prefix(prefix)));
        self
    }

    /// Read environment variables starting with `prefix_`.
    pub fn load_env(mut self, prefix: impl Into<String>) -> Self {
        self.sources.push(Source::Env(EnvLoader::with_prefix(prefix)));
        self
    }

    /// Add in-memory values, typically defaults or overrides from code.
    pub fn add_values(mut self, values: Map<String, Value>) -> Self {
        self.sources.push(Source::Value(values));
        self
    }

    pub fn hint(mut self, key: impl Into<String>, hint: ValueHint) -> Self {
        self.hints.insert(key.into(), hint);
        self
    }

    /// Merge every source and return the raw object.
    pub fn merged(&self) -> Result<Map<String, Value>> {
        let mut merged = Map::new();

        for source in &self.sources {
            match source {
                Source::File(path) => {
                    let loader = ConfigLoader::auto(path)?;
                    let typed = loader.format() != FileFormat::Env;
                    if let Value::Object(map) = loader.load_file(path)? {
                        for (key, value) in map {
                            let value = match value {
                                Value::String(raw) if !typed => self.typed(&key, raw)?,
                                other => other,
                            };
                            merged.insert(key, value);
                        }
                    }
                }
                Source::DotEnv(path) => match path {
                    Some(path) => {
                        dotenvy::from_path(path)
                            .map_err(|e| ConfigError::LoadError(e.to_string()))?;
                    }
                    None => {
                        dotenvy::dotenv().ok();
                    }
                },
                Source::Env(loader) => {
                    for (key, raw) in loader.load()? {
                        let value = self.typed(&key, raw)?;
                        merged.insert(key, value);
                    }
                }
                Source::Value(map) => {
                    for (key, value) in map {
                        merged.insert(key.clone(), value.clone());
                    }
                }
            }
        }

        Ok(merged)
    }

    /// Merge every source and deserialize into `T`.
    pub fn build<T: DeserializeOwned>(&self) -> Result<T> {
        let merged = self.merged()?;
        serde_json::from_value(Value::Object(merged))
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))
    }

    fn typed(&self, key: &str, raw: String) -> Result<Value> {
        match self.hints.get(key) {
            None => Ok(Value::String(raw)),
            Some(ValueHint::Bool) => parse_bool(&raw)
                .map(Value::Bool)
                .ok_or_else(|| ConfigError::invalid(key, format!("not a boolean: {}", raw))),
            Some(ValueHint::Integer) => raw
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|e| ConfigError::invalid(key, e.to_string())),
            Some(ValueHint::List) => Ok(Value::Array(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| Value::String(s.to_string()))
                    .collect(),
            )),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

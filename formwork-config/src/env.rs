// Environment variable loading

use crate::Result;
use std::collections::HashMap;
use std::env;

/// Reads environment variables sharing a prefix.
///
/// `FORMWORK_STOP_POLICY` with prefix `FORMWORK` is exposed as `stop_policy`.
#[derive(Debug, Clone, Default)]
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self::new(Some(prefix.into()))
    }

    /// Collect matching variables with the prefix stripped and keys lowercased.
    pub fn load(&self) -> Result<HashMap<String, String>> {
        Ok(self.collect(env::vars()))
    }

    fn collect(&self, vars: impl IntoIterator<Item = (String, String)>) -> HashMap<String, String> {
        let mut config = HashMap::new();

        for (key, value) in vars {
            match self.prefix {
                Some(ref prefix) => {
                    if let Some(rest) = key.strip_prefix(prefix.as_str()) {
                        if let Some(rest) = rest.strip_prefix('_') {
                            config.insert(rest.to_lowercase(), value);
                        }
                    }
                }
                None => {
                    config.insert(key.to_lowercase(), value);
                }
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_prefix_is_stripped() {
        let loader = EnvLoader::with_prefix("FORMWORK");
        let loaded = loader.collect(vars(&[
            ("FORMWORK_STOP_POLICY", "stop_all_if_any"),
            ("FORMWORKER_OTHER", "ignored"),
            ("PATH", "/usr/bin"),
        ]));

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get("stop_policy").map(String::as_str), Some("stop_all_if_any"));
    }

    #[test]
    fn test_no_prefix_keeps_everything() {
        let loader = EnvLoader::default();
        let loaded = loader.collect(vars(&[("A_B", "1"), ("C", "2")]));

        assert_eq!(loaded.get("a_b").map(String::as_str), Some("1"));
        assert_eq!(loaded.get("c").map(String::as_str), Some("2"));
    }
}

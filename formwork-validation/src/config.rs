//! Engine configuration.
//!
//! ```
//! use formwork_validation::{EngineConfig, StopPolicy};
//!
//! let config = EngineConfig::default()
//!     .with_stop_policy(StopPolicy::StopAndResumeNext)
//!     .with_character_encoding("Shift_JIS");
//! assert_eq!(config.locale, "en-US");
//! ```

use crate::errors::Result;
use crate::locale;
use crate::rule_config::RuleKind;
use formwork_config::{ConfigBuilder, ValueHint};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// How dispatch reacts to a failing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopPolicy {
    /// Run every rule on every field.
    #[default]
    #[serde(alias = "ContinueAll")]
    ContinueAll,
    /// Abort the whole run at the first failure.
    #[serde(alias = "StopAllIfAny")]
    StopAllIfAny,
    /// Skip the failing field's remaining rules, go on with the next field.
    #[serde(alias = "StopAndResumeNext")]
    StopAndResumeNext,
}

impl StopPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopPolicy::ContinueAll => "continue_all",
            StopPolicy::StopAllIfAny => "stop_all_if_any",
            StopPolicy::StopAndResumeNext => "stop_and_resume_next",
        }
    }
}

impl fmt::Display for StopPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StopPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "continueall" => Ok(StopPolicy::ContinueAll),
            "stopallifany" => Ok(StopPolicy::StopAllIfAny),
            "stopandresumenext" => Ok(StopPolicy::StopAndResumeNext),
            _ => Err(format!("unknown stop policy: {}", s)),
        }
    }
}

fn builtin_rule_names() -> Vec<String> {
    RuleKind::BUILTIN.iter().map(|kind| kind.name().to_string()).collect()
}

/// Settings passed to [`crate::ValidationEngine::builder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub stop_policy: StopPolicy,
    /// Encoding label used by the byte-width rules.
    pub character_encoding: String,
    /// Locale selecting the default short date pattern.
    pub locale: String,
    /// Library rules, in dispatch order.
    pub standard_rules: Vec<String>,
    /// Caller rules, dispatched after the standard ones.
    pub custom_rules: Vec<String>,
    /// Reject unreachable `validate_after` targets when building schemas.
    pub strict_dependencies: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stop_policy: StopPolicy::default(),
            character_encoding: "UTF-8".to_string(),
            locale: "en-US".to_string(),
            standard_rules: builtin_rule_names(),
            custom_rules: Vec::new(),
            strict_dependencies: false,
        }
    }
}

impl EngineConfig {
    /// Prefix of environment variables read by [`EngineConfig::from_env`].
    pub const ENV_PREFIX: &'static str = "FORMWORK";

    fn loader() -> ConfigBuilder {
        ConfigBuilder::new()
            .hint("standard_rules", ValueHint::List)
            .hint("custom_rules", ValueHint::List)
            .hint("strict_dependencies", ValueHint::Bool)
    }

    /// Read `FORMWORK_STOP_POLICY`, `FORMWORK_CHARACTER_ENCODING`,
    /// `FORMWORK_LOCALE`, `FORMWORK_STANDARD_RULES`, `FORMWORK_CUSTOM_RULES`
    /// and `FORMWORK_STRICT_DEPENDENCIES`. Unset keys keep their defaults.
    pub fn from_env() -> Result<Self> {
        Ok(Self::loader().load_env(Self::ENV_PREFIX).build()?)
    }

    /// Load a dotenv file into the process environment, then read
    /// `FORMWORK_*` variables as [`EngineConfig::from_env`] does. Without a
    /// path, `./.env` is used when present.
    pub fn from_dotenv(path: Option<&Path>) -> Result<Self> {
        Ok(Self::loader()
            .load_dotenv(path.map(Path::to_path_buf), Self::ENV_PREFIX)
            .build()?)
    }

    /// Read a JSON, TOML or `.env` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::loader().add_file(path.as_ref()).build()?)
    }

    /// Read a file, then let `FORMWORK_*` variables override it.
    pub fn from_file_and_env(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::loader()
            .add_file(path.as_ref())
            .load_env(Self::ENV_PREFIX)
            .build()?)
    }

    pub fn with_stop_policy(mut self, policy: StopPolicy) -> Self {
        self.stop_policy = policy;
        self
    }

    pub fn with_character_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.character_encoding = encoding.into();
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_standard_rules<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.standard_rules = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_custom_rules<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.custom_rules = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_strict_dependencies(mut self, strict: bool) -> Self {
        self.strict_dependencies = strict;
        self
    }

    /// Short date pattern of the configured locale.
    pub fn date_pattern(&self) -> &'static str {
        locale::short_date_pattern_or_default(&self.locale)
    }
}

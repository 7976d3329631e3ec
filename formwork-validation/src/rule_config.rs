//! Declared rule configurations.
//!
//! A field carries a list of [`RuleSpec`]s. Each one names a rule kind with
//! its parameters, optional When-conditions gating it, and an optional
//! message key override.

use crate::errors::SchemaError;
use crate::field::{FieldId, FieldValue, Snapshots};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

/// Identifies which rule implementation handles a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Required,
    Length,
    MinLength,
    MaxLength,
    NumOfDigits,
    MaxNumOfDigits,
    MinValue,
    MaxValue,
    IntType,
    FloatType,
    Regex,
    Alphabet,
    AlphaNum,
    Hiragana,
    Katakana,
    Email,
    Singlebyte,
    Multibyte,
    DatePattern,
    PastDate,
    Custom(String),
}

impl RuleKind {
    /// Every built-in kind in canonical registry order.
    pub const BUILTIN: [RuleKind; 20] = [
        RuleKind::Required,
        RuleKind::Length,
        RuleKind::MinLength,
        RuleKind::MaxLength,
        RuleKind::NumOfDigits,
        RuleKind::MaxNumOfDigits,
        RuleKind::MinValue,
        RuleKind::MaxValue,
        RuleKind::IntType,
        RuleKind::FloatType,
        RuleKind::Regex,
        RuleKind::Alphabet,
        RuleKind::AlphaNum,
        RuleKind::Hiragana,
        RuleKind::Katakana,
        RuleKind::Email,
        RuleKind::Singlebyte,
        RuleKind::Multibyte,
        RuleKind::DatePattern,
        RuleKind::PastDate,
    ];

    /// Registry name used in configuration files.
    pub fn name(&self) -> &str {
        match self {
            RuleKind::Required => "required",
            RuleKind::Length => "length",
            RuleKind::MinLength => "min_length",
            RuleKind::MaxLength => "max_length",
            RuleKind::NumOfDigits => "num_of_digits",
            RuleKind::MaxNumOfDigits => "max_num_of_digits",
            RuleKind::MinValue => "min_value",
            RuleKind::MaxValue => "max_value",
            RuleKind::IntType => "int_type",
            RuleKind::FloatType => "float_type",
            RuleKind::Regex => "regex",
            RuleKind::Alphabet => "alphabet",
            RuleKind::AlphaNum => "alpha_num",
            RuleKind::Hiragana => "hiragana",
            RuleKind::Katakana => "katakana",
            RuleKind::Email => "email",
            RuleKind::Singlebyte => "singlebyte",
            RuleKind::Multibyte => "multibyte",
            RuleKind::DatePattern => "date_pattern",
            RuleKind::PastDate => "past_date",
            RuleKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A compiled whole-string pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `source` anchored at both ends.
    pub fn new(source: impl Into<String>) -> Result<Self, SchemaError> {
        let source = source.into();
        let regex = Regex::new(&format!("^(?:{})$", source)).map_err(|e| {
            SchemaError::InvalidPattern {
                pattern: source.clone(),
                message: e.to_string(),
            }
        })?;
        Ok(Self { source, regex })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

/// Parameters of one declared rule.
#[derive(Debug, Clone)]
pub enum RuleConfig {
    /// Value must be present. Multi-valued fields need `min_select` entries.
    Required { min_select: usize },
    Length(usize),
    MinLength(usize),
    MaxLength(usize),
    NumOfDigits(usize),
    MaxNumOfDigits(usize),
    MinValue(i64),
    MaxValue(i64),
    IntType,
    FloatType,
    Regex(Pattern),
    Alphabet,
    AlphaNum,
    Hiragana,
    Katakana,
    Email,
    Singlebyte,
    Multibyte,
    /// Strict date parse; `None` uses the locale's short date pattern.
    DatePattern { pattern: Option<String> },
    PastDate {
        pattern: Option<String>,
        allow_today: bool,
    },
    Custom {
        name: String,
        params: BTreeMap<String, String>,
    },
}

impl RuleConfig {
    pub fn required() -> Self {
        RuleConfig::Required { min_select: 1 }
    }

    pub fn regex(pattern: impl Into<String>) -> Result<Self, SchemaError> {
        Ok(RuleConfig::Regex(Pattern::new(pattern)?))
    }

    pub fn custom(name: impl Into<String>) -> Self {
        RuleConfig::Custom {
            name: name.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter to a custom rule; ignored for built-ins.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let RuleConfig::Custom { params, .. } = &mut self {
            params.insert(key.into(), value.into());
        }
        self
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            RuleConfig::Required { .. } => RuleKind::Required,
            RuleConfig::Length(_) => RuleKind::Length,
            RuleConfig::MinLength(_) => RuleKind::MinLength,
            RuleConfig::MaxLength(_) => RuleKind::MaxLength,
            RuleConfig::NumOfDigits(_) => RuleKind::NumOfDigits,
            RuleConfig::MaxNumOfDigits(_) => RuleKind::MaxNumOfDigits,
            RuleConfig::MinValue(_) => RuleKind::MinValue,
            RuleConfig::MaxValue(_) => RuleKind::MaxValue,
            RuleConfig::IntType => RuleKind::IntType,
            RuleConfig::FloatType => RuleKind::FloatType,
            RuleConfig::Regex(_) => RuleKind::Regex,
            RuleConfig::Alphabet => RuleKind::Alphabet,
            RuleConfig::AlphaNum => RuleKind::AlphaNum,
            RuleConfig::Hiragana => RuleKind::Hiragana,
            RuleConfig::Katakana => RuleKind::Katakana,
            RuleConfig::Email => RuleKind::Email,
            RuleConfig::Singlebyte => RuleKind::Singlebyte,
            RuleConfig::Multibyte => RuleKind::Multibyte,
            RuleConfig::DatePattern { .. } => RuleKind::DatePattern,
            RuleConfig::PastDate { .. } => RuleKind::PastDate,
            RuleConfig::Custom { name, .. } => RuleKind::Custom(name.clone()),
        }
    }
}

/// Gate that activates a rule depending on another field's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhenCondition {
    /// The referenced field has a non-empty value.
    NotEmpty(FieldId),
    /// The referenced field equals the value; for multi-valued fields the
    /// value must be among the selections.
    Equals(FieldId, String),
}

impl WhenCondition {
    pub fn target(&self) -> FieldId {
        match self {
            WhenCondition::NotEmpty(id) | WhenCondition::Equals(id, _) => *id,
        }
    }

    /// Evaluate against captured values. A missing target never holds.
    pub fn holds(&self, snapshots: &Snapshots) -> bool {
        let Some(target) = snapshots.get(self.target()) else {
            return false;
        };
        match self {
            WhenCondition::NotEmpty(_) => !target.is_empty(),
            WhenCondition::Equals(_, expected) => match target.value() {
                FieldValue::Single(value) => value.as_deref() == Some(expected.as_str()),
                FieldValue::Multi(values) => values
                    .as_ref()
                    .is_some_and(|values| values.iter().any(|v| v == expected)),
            },
        }
    }
}

/// One rule as declared on a field.
#[derive(Debug, Clone)]
pub struct RuleSpec {
    pub config: RuleConfig,
    /// Active iff any condition holds; always active when empty.
    pub when: Vec<WhenCondition>,
    /// Replaces the rule's default message key.
    pub message: Option<String>,
}

impl RuleSpec {
    pub fn new(config: RuleConfig) -> Self {
        Self {
            config,
            when: Vec::new(),
            message: None,
        }
    }

    /// `Required` active only when `field` holds `value`.
    pub fn required_if(field: FieldId, value: impl Into<String>) -> Self {
        Self::new(RuleConfig::required()).when(WhenCondition::Equals(field, value.into()))
    }

    /// `Required` active only when `field` is filled in.
    pub fn required_if_not_empty(field: FieldId) -> Self {
        Self::new(RuleConfig::required()).when(WhenCondition::NotEmpty(field))
    }

    pub fn when(mut self, condition: WhenCondition) -> Self {
        self.when.push(condition);
        self
    }

    pub fn message(mut self, key: impl Into<String>) -> Self {
        self.message = Some(key.into());
        self
    }

    pub fn kind(&self) -> RuleKind {
        self.config.kind()
    }

    /// Whether any When-condition holds; unconditional rules are always
    /// active.
    pub fn is_active(&self, snapshots: &Snapshots) -> bool {
        self.when.is_empty() || self.when.iter().any(|condition| condition.holds(snapshots))
    }
}

impl From<RuleConfig> for RuleSpec {
    fn from(config: RuleConfig) -> Self {
        RuleSpec::new(config)
    }
}

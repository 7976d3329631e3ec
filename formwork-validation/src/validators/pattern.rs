use crate::errors::Result;
use crate::field::FieldSnapshot;
use crate::messages::keys;
use crate::result::Violation;
use crate::rule_config::{RuleConfig, RuleKind};
use crate::rules::{Rule, RuleContext};
use once_cell::sync::Lazy;
use regex::Regex;

static ALPHABET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());
static ALPHA_NUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());
// The prolonged sound mark is shared by both scripts
static HIRAGANA: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{Hiragana}ー]+$").unwrap());
static KATAKANA: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{Katakana}ー]+$").unwrap());
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$").unwrap()
});

fn check_fixed(snapshot: &FieldSnapshot, regex: &Regex, key: &str) -> Option<Violation> {
    snapshot
        .filled_text()
        .filter(|v| !regex.is_match(v))
        .map(|_| Violation::new(snapshot, key))
}

/// Whole value must match the configured pattern.
pub struct RegexRule;

impl Rule for RegexRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Regex
    }

    fn evaluate(
        &self,
        config: &RuleConfig,
        snapshot: &FieldSnapshot,
        _ctx: &RuleContext<'_>,
    ) -> Result<Option<Violation>> {
        let RuleConfig::Regex(pattern) = config else {
            return Ok(None);
        };
        Ok(snapshot
            .filled_text()
            .filter(|v| !pattern.is_match(v))
            .map(|_| Violation::new(snapshot, keys::REGEX).arg(pattern.source())))
    }
}

macro_rules! fixed_pattern_rule {
    ($(#[$meta:meta])* $name:ident, $variant:ident, $regex:ident, $key:expr) => {
        $(#[$meta])*
        pub struct $name;

        impl Rule for $name {
            fn kind(&self) -> RuleKind {
                RuleKind::$variant
            }

            fn evaluate(
                &self,
                config: &RuleConfig,
                snapshot: &FieldSnapshot,
                _ctx: &RuleContext<'_>,
            ) -> Result<Option<Violation>> {
                if !matches!(config, RuleConfig::$variant) {
                    return Ok(None);
                }
                Ok(check_fixed(snapshot, &$regex, $key))
            }
        }
    };
}

fixed_pattern_rule!(
    /// ASCII letters only.
    Alphabet, Alphabet, ALPHABET, keys::ALPHABET
);
fixed_pattern_rule!(
    /// ASCII letters and digits only.
    AlphaNum, AlphaNum, ALPHA_NUM, keys::ALPHA_NUM
);
fixed_pattern_rule!(Hiragana, Hiragana, HIRAGANA, keys::HIRAGANA);
fixed_pattern_rule!(Katakana, Katakana, KATAKANA, keys::KATAKANA);
fixed_pattern_rule!(Email, Email, EMAIL, keys::EMAIL);

use crate::errors::Result;
use crate::field::FieldSnapshot;
use crate::messages::keys;
use crate::result::Violation;
use crate::rule_config::{RuleConfig, RuleKind};
use crate::rules::{Rule, RuleContext};
use once_cell::sync::Lazy;
use regex::Regex;

// Any Unicode decimal digit, so full-width digits count
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\p{Nd}+$").unwrap());

/// Length as the user sees it: astral characters count once.
pub fn code_points(value: &str) -> usize {
    value.chars().count()
}

fn digits(snapshot: &FieldSnapshot) -> Option<&str> {
    snapshot.filled_text().filter(|v| DIGITS.is_match(v))
}

/// Exactly `n` characters.
pub struct Length;

impl Rule for Length {
    fn kind(&self) -> RuleKind {
        RuleKind::Length
    }

    fn evaluate(
        &self,
        config: &RuleConfig,
        snapshot: &FieldSnapshot,
        _ctx: &RuleContext<'_>,
    ) -> Result<Option<Violation>> {
        let RuleConfig::Length(expected) = *config else {
            return Ok(None);
        };
        Ok(snapshot
            .filled_text()
            .filter(|v| code_points(v) != expected)
            .map(|_| Violation::new(snapshot, keys::LENGTH).arg(expected)))
    }
}

/// At least `n` characters.
pub struct MinLength;

impl Rule for MinLength {
    fn kind(&self) -> RuleKind {
        RuleKind::MinLength
    }

    fn evaluate(
        &self,
        config: &RuleConfig,
        snapshot: &FieldSnapshot,
        _ctx: &RuleContext<'_>,
    ) -> Result<Option<Violation>> {
        let RuleConfig::MinLength(min) = *config else {
            return Ok(None);
        };
        Ok(snapshot
            .filled_text()
            .filter(|v| code_points(v) < min)
            .map(|_| Violation::new(snapshot, keys::MIN_LENGTH).arg(min)))
    }
}

/// At most `n` characters.
pub struct MaxLength;

impl Rule for MaxLength {
    fn kind(&self) -> RuleKind {
        RuleKind::MaxLength
    }

    fn evaluate(
        &self,
        config: &RuleConfig,
        snapshot: &FieldSnapshot,
        _ctx: &RuleContext<'_>,
    ) -> Result<Option<Violation>> {
        let RuleConfig::MaxLength(max) = *config else {
            return Ok(None);
        };
        Ok(snapshot
            .filled_text()
            .filter(|v| code_points(v) > max)
            .map(|_| Violation::new(snapshot, keys::MAX_LENGTH).arg(max)))
    }
}

/// Exactly `n` digits. Values that are not all digits are left alone.
pub struct NumOfDigits;

impl Rule for NumOfDigits {
    fn kind(&self) -> RuleKind {
        RuleKind::NumOfDigits
    }

    fn evaluate(
        &self,
        config: &RuleConfig,
        snapshot: &FieldSnapshot,
        _ctx: &RuleContext<'_>,
    ) -> Result<Option<Violation>> {
        let RuleConfig::NumOfDigits(expected) = *config else {
            return Ok(None);
        };
        Ok(digits(snapshot)
            .filter(|v| code_points(v) != expected)
            .map(|_| Violation::new(snapshot, keys::NUM_OF_DIGITS).arg(expected)))
    }
}

/// At most `n` digits. Values that are not all digits are left alone.
pub struct MaxNumOfDigits;

impl Rule for MaxNumOfDigits {
    fn kind(&self) -> RuleKind {
        RuleKind::MaxNumOfDigits
    }

    fn evaluate(
        &self,
        config: &RuleConfig,
        snapshot: &FieldSnapshot,
        _ctx: &RuleContext<'_>,
    ) -> Result<Option<Violation>> {
        let RuleConfig::MaxNumOfDigits(max) = *config else {
            return Ok(None);
        };
        Ok(digits(snapshot)
            .filter(|v| code_points(v) > max)
            .map(|_| Violation::new(snapshot, keys::MAX_NUM_OF_DIGITS).arg(max)))
    }
}

use crate::errors::Result;
use crate::field::FieldSnapshot;
use crate::messages::keys;
use crate::result::Violation;
use crate::rule_config::{RuleConfig, RuleKind};
use crate::rules::{Rule, RuleContext};

/// Parse a whole number, tolerating surrounding whitespace.
fn parse_int(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// Value must be a whole number of at least `min`. Non-numeric input fails.
pub struct MinValue;

impl Rule for MinValue {
    fn kind(&self) -> RuleKind {
        RuleKind::MinValue
    }

    fn evaluate(
        &self,
        config: &RuleConfig,
        snapshot: &FieldSnapshot,
        _ctx: &RuleContext<'_>,
    ) -> Result<Option<Violation>> {
        let RuleConfig::MinValue(min) = *config else {
            return Ok(None);
        };
        Ok(snapshot
            .filled_text()
            .filter(|v| parse_int(v).is_none_or(|n| n < min))
            .map(|_| Violation::new(snapshot, keys::MIN_VALUE).arg(min)))
    }
}

/// Value must be a whole number of at most `max`. Non-numeric input fails.
pub struct MaxValue;

impl Rule for MaxValue {
    fn kind(&self) -> RuleKind {
        RuleKind::MaxValue
    }

    fn evaluate(
        &self,
        config: &RuleConfig,
        snapshot: &FieldSnapshot,
        _ctx: &RuleContext<'_>,
    ) -> Result<Option<Violation>> {
        let RuleConfig::MaxValue(max) = *config else {
            return Ok(None);
        };
        Ok(snapshot
            .filled_text()
            .filter(|v| parse_int(v).is_none_or(|n| n > max))
            .map(|_| Violation::new(snapshot, keys::MAX_VALUE).arg(max)))
    }
}

pub struct IntType;

impl Rule for IntType {
    fn kind(&self) -> RuleKind {
        RuleKind::IntType
    }

    fn evaluate(
        &self,
        config: &RuleConfig,
        snapshot: &FieldSnapshot,
        _ctx: &RuleContext<'_>,
    ) -> Result<Option<Violation>> {
        if !matches!(config, RuleConfig::IntType) {
            return Ok(None);
        }
        Ok(snapshot
            .filled_text()
            .filter(|v| parse_int(v).is_none())
            .map(|_| Violation::new(snapshot, keys::INT_TYPE)))
    }
}

/// Anything `f64` parses, including `inf`, `NaN` and values that overflow
/// to infinity. Finiteness is enforced when mapping onto an entity.
pub struct FloatType;

impl FloatType {
    fn accepts(value: &str) -> bool {
        value.trim().parse::<f64>().is_ok()
    }
}

impl Rule for FloatType {
    fn kind(&self) -> RuleKind {
        RuleKind::FloatType
    }

    fn evaluate(
        &self,
        config: &RuleConfig,
        snapshot: &FieldSnapshot,
        _ctx: &RuleContext<'_>,
    ) -> Result<Option<Violation>> {
        if !matches!(config, RuleConfig::FloatType) {
            return Ok(None);
        }
        Ok(snapshot
            .filled_text()
            .filter(|v| !Self::accepts(v))
            .map(|_| Violation::new(snapshot, keys::FLOAT_TYPE)))
    }
}

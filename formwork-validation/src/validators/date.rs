use crate::errors::Result;
use crate::field::FieldSnapshot;
use crate::messages::keys;
use crate::result::Violation;
use crate::rule_config::{RuleConfig, RuleKind};
use crate::rules::{Rule, RuleContext};
use chrono::NaiveDate;

/// Strict parse of `value` with a strftime-style `pattern`.
///
/// Trailing input, impossible dates and missing components are all failures.
pub fn parse_date(value: &str, pattern: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, pattern).ok()
}

fn pattern_for<'a>(explicit: &'a Option<String>, ctx: &'a RuleContext<'_>) -> &'a str {
    explicit.as_deref().unwrap_or(ctx.date_pattern)
}

/// Value must be a date in the field pattern or the locale's short pattern.
pub struct DatePattern;

impl Rule for DatePattern {
    fn kind(&self) -> RuleKind {
        RuleKind::DatePattern
    }

    fn evaluate(
        &self,
        config: &RuleConfig,
        snapshot: &FieldSnapshot,
        ctx: &RuleContext<'_>,
    ) -> Result<Option<Violation>> {
        let RuleConfig::DatePattern { pattern } = config else {
            return Ok(None);
        };
        let pattern = pattern_for(pattern, ctx);

        Ok(snapshot
            .filled_text()
            .filter(|v| parse_date(v, pattern).is_none())
            .map(|_| Violation::new(snapshot, keys::DATE_PATTERN).arg(pattern)))
    }
}

/// Date must lie before today, or on today when `allow_today` is set.
///
/// Values that do not parse are left to [`DatePattern`].
pub struct PastDate;

impl Rule for PastDate {
    fn kind(&self) -> RuleKind {
        RuleKind::PastDate
    }

    fn evaluate(
        &self,
        config: &RuleConfig,
        snapshot: &FieldSnapshot,
        ctx: &RuleContext<'_>,
    ) -> Result<Option<Violation>> {
        let RuleConfig::PastDate {
            pattern,
            allow_today,
        } = config
        else {
            return Ok(None);
        };

        let Some(date) = snapshot
            .filled_text()
            .and_then(|v| parse_date(v, pattern_for(pattern, ctx)))
        else {
            return Ok(None);
        };

        let today = ctx.clock.today();
        let violation = if *allow_today {
            (date > today).then(|| Violation::new(snapshot, keys::PAST_DATE_TODAY))
        } else {
            (date >= today).then(|| Violation::new(snapshot, keys::PAST_DATE))
        };
        Ok(violation)
    }
}

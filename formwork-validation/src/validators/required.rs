use crate::errors::Result;
use crate::field::{FieldSnapshot, FieldValue, WidgetKind};
use crate::messages::keys;
use crate::result::Violation;
use crate::rule_config::{RuleConfig, RuleKind};
use crate::rules::{Rule, RuleContext};

/// Selected index of the placeholder entry of a head-is-dummy select.
pub const HEAD_SELECTION: &str = "0";

/// Value must be present.
///
/// Single values fail when null or empty, and a head-is-dummy select fails
/// while its placeholder is selected. Multi-valued fields fail with fewer
/// than `min_select` selections.
pub struct Required;

impl Rule for Required {
    fn kind(&self) -> RuleKind {
        RuleKind::Required
    }

    fn evaluate(
        &self,
        config: &RuleConfig,
        snapshot: &FieldSnapshot,
        _ctx: &RuleContext<'_>,
    ) -> Result<Option<Violation>> {
        let RuleConfig::Required { min_select } = *config else {
            return Ok(None);
        };

        let violation = match snapshot.value() {
            FieldValue::Multi(values) => {
                let selected = values.as_ref().map_or(0, Vec::len);
                let wanted = min_select.max(1);
                if selected >= wanted {
                    None
                } else if wanted == 1 {
                    Some(Violation::new(snapshot, keys::REQUIRED))
                } else {
                    Some(Violation::new(snapshot, keys::REQUIRED_SELECT).arg(wanted))
                }
            }
            FieldValue::Single(value) => {
                let descriptor = snapshot.descriptor();
                let placeholder = descriptor.widget == WidgetKind::Select
                    && descriptor.head_is_dummy
                    && value.as_deref() == Some(HEAD_SELECTION);

                if placeholder || value.as_deref().is_none_or(str::is_empty) {
                    Some(Violation::new(snapshot, keys::REQUIRED))
                } else {
                    None
                }
            }
        };

        Ok(violation)
    }
}

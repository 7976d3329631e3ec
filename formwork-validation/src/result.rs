// Validation outcome

use crate::field::{FieldId, FieldSnapshot};
use crate::messages::MessageCatalog;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// One failed rule on one field.
///
/// Carries a message key and positional arguments; `{0}` is always the field
/// label. Rendering into text is done by a [`MessageCatalog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: FieldId,
    pub key: String,
    pub args: Vec<String>,
}

impl Violation {
    pub fn new(snapshot: &FieldSnapshot, key: impl Into<String>) -> Self {
        Self {
            field: snapshot.id(),
            key: key.into(),
            args: vec![snapshot.label().to_string()],
        }
    }

    pub fn arg(mut self, arg: impl ToString) -> Self {
        self.args.push(arg.to_string());
        self
    }

    pub(crate) fn with_key(mut self, key: Option<&str>) -> Self {
        if let Some(key) = key {
            self.key = key.to_string();
        }
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, self.args.join(", "))
    }
}

/// Fields evaluated in one run and the violations they produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationResult {
    evaluated: Vec<FieldId>,
    errors: HashMap<FieldId, Vec<Violation>>,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, id: FieldId) {
        self.evaluated.push(id);
    }

    pub(crate) fn push(&mut self, violation: Violation) {
        self.errors.entry(violation.field).or_default().push(violation);
    }

    pub fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Field ids in evaluation order.
    pub fn evaluated(&self) -> &[FieldId] {
        &self.evaluated
    }

    pub fn was_evaluated(&self, id: FieldId) -> bool {
        self.evaluated.contains(&id)
    }

    /// Violations of one field in rule evaluation order.
    pub fn field_errors(&self, id: FieldId) -> &[Violation] {
        self.errors.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Failing fields with their violations, in evaluation order.
    pub fn errors(&self) -> impl Iterator<Item = (FieldId, &[Violation])> {
        self.evaluated
            .iter()
            .filter_map(|id| self.errors.get(id).map(|v| (*id, v.as_slice())))
    }

    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn first_error(&self) -> Option<&Violation> {
        self.errors().next().and_then(|(_, violations)| violations.first())
    }

    /// Render every violation with `catalog`, in evaluation order.
    pub fn messages(&self, catalog: &MessageCatalog) -> Vec<(FieldId, Vec<String>)> {
        self.errors()
            .map(|(id, violations)| (id, violations.iter().map(|v| catalog.render(v)).collect()))
            .collect()
    }

    pub fn to_json(&self, catalog: &MessageCatalog) -> serde_json::Value {
        serde_json::json!({
            "evaluated": self.evaluated,
            "errors": self.errors().map(|(id, violations)| {
                serde_json::json!({
                    "field": id,
                    "violations": violations.iter().map(|v| serde_json::json!({
                        "key": v.key,
                        "message": catalog.render(v),
                    })).collect::<Vec<_>>(),
                })
            }).collect::<Vec<_>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(id: u32, key: &str) -> Violation {
        Violation {
            field: FieldId(id),
            key: key.into(),
            args: vec![format!("f{}", id)],
        }
    }

    #[test]
    fn test_empty_result() {
        let result = ValidationResult::new();
        assert!(!result.has_error());
        assert!(result.field_errors(FieldId(1)).is_empty());
        assert!(result.first_error().is_none());
    }

    #[test]
    fn test_errors_follow_evaluation_order() {
        let mut result = ValidationResult::new();
        result.record(FieldId(2));
        result.record(FieldId(1));
        result.push(violation(1, "required"));
        result.push(violation(2, "length"));
        result.push(violation(2, "alphabet"));

        assert!(result.has_error());
        assert_eq!(result.error_count(), 3);
        let order: Vec<FieldId> = result.errors().map(|(id, _)| id).collect();
        assert_eq!(order, vec![FieldId(2), FieldId(1)]);
        let keys: Vec<&str> = result.field_errors(FieldId(2)).iter().map(|v| v.key.as_str()).collect();
        assert_eq!(keys, vec!["length", "alphabet"]);
        assert_eq!(result.first_error().map(|v| v.key.as_str()), Some("length"));
    }

    #[test]
    fn test_key_override() {
        let v = violation(1, "regex").with_key(Some("zip.invalid"));
        assert_eq!(v.key, "zip.invalid");
        let v = violation(1, "regex").with_key(None);
        assert_eq!(v.key, "regex");
    }

    #[test]
    fn test_to_json() {
        let mut result = ValidationResult::new();
        result.record(FieldId(4));
        result.push(violation(4, "required"));

        let json = result.to_json(&MessageCatalog::default());
        assert_eq!(json["evaluated"][0], 4);
        assert_eq!(json["errors"][0]["violations"][0]["message"], "f4 is required.");
    }
}

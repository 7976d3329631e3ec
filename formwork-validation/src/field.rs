//! Field metadata and captured values.

use crate::errors::SchemaError;
use crate::rule_config::{RuleKind, RuleSpec};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

static TYPE_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:::)?(?:[A-Za-z_][A-Za-z0-9_]*::)+").unwrap());

/// Strip whitespace and module paths: `Option < std::string::String >`
/// becomes `Option<String>`.
pub fn normalize_type_name(type_name: &str) -> String {
    let compact: String = type_name.chars().filter(|c| !c.is_whitespace()).collect();
    TYPE_PATH.replace_all(&compact, "").into_owned()
}

/// Stable field identifier. `0` means "not assigned".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FieldId(pub u32);

impl FieldId {
    pub fn is_assigned(self) -> bool {
        self.0 != 0
    }

    /// `None` for the unassigned id.
    pub fn assigned(self) -> Option<FieldId> {
        self.is_assigned().then_some(self)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for FieldId {
    fn from(raw: u32) -> Self {
        FieldId(raw)
    }
}

/// Kind of input widget bound to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Text,
    /// Checkbox group; multi-valued by default.
    Checkbox,
    Radio,
    /// Spinner or drop-down; the value is the selected index.
    Select,
}

/// Whether the field holds one string or a list of strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    Single,
    Multi,
}

impl ValueShape {
    /// Resolve a declared Rust type name.
    ///
    /// Accepts `String`, `Option<String>`, `Vec<String>` and
    /// `Option<Vec<String>>`, with or without module paths and whitespace.
    pub fn from_type_name(field: &str, type_name: &str) -> Result<Self, SchemaError> {
        let normalized = normalize_type_name(type_name);
        let inner = normalized
            .strip_prefix("Option<")
            .and_then(|rest| rest.strip_suffix('>'))
            .unwrap_or(&normalized);

        match inner {
            "String" => Ok(ValueShape::Single),
            "Vec<String>" => Ok(ValueShape::Multi),
            _ => Err(SchemaError::UnsupportedFieldType {
                field: field.to_string(),
                type_name: type_name.to_string(),
            }),
        }
    }
}

/// One declared field of a form.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub id: FieldId,
    pub name: String,
    pub label: Option<String>,
    pub widget: WidgetKind,
    pub type_name: String,
    pub shape: ValueShape,
    /// Position used for ordering; ties fall back to `name`.
    pub order: u32,
    pub rules: Vec<RuleSpec>,
    pub validate_after: Option<FieldId>,
    /// For [`WidgetKind::Select`]: the first entry is a placeholder.
    pub head_is_dummy: bool,
}

impl FieldDescriptor {
    /// Label shown in messages, falling back to the declaration name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn is_multi_valued(&self) -> bool {
        self.shape == ValueShape::Multi
    }

    pub fn declares(&self, kind: &RuleKind) -> bool {
        self.rules.iter().any(|spec| &spec.kind() == kind)
    }
}

/// Raw value of a field as captured from the view or the form object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Single(Option<String>),
    Multi(Option<Vec<String>>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Single(Some(value.into()))
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::Multi(Some(values.into_iter().map(Into::into).collect()))
    }

    pub fn shape(&self) -> ValueShape {
        match self {
            FieldValue::Single(_) => ValueShape::Single,
            FieldValue::Multi(_) => ValueShape::Multi,
        }
    }

    /// Absent for the declared shape.
    pub fn null(shape: ValueShape) -> Self {
        match shape {
            ValueShape::Single => FieldValue::Single(None),
            ValueShape::Multi => FieldValue::Multi(None),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Single(None) | FieldValue::Multi(None))
    }

    /// Null, empty string or no selection.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Single(value) => value.as_deref().is_none_or(str::is_empty),
            FieldValue::Multi(values) => values.as_ref().is_none_or(Vec::is_empty),
        }
    }

    /// Empty, or only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Single(value) => value.as_deref().is_none_or(|v| v.trim().is_empty()),
            FieldValue::Multi(values) => values
                .as_ref()
                .is_none_or(|v| v.iter().all(|s| s.trim().is_empty())),
        }
    }
}

/// A field's metadata together with the value captured for one run.
#[derive(Debug, Clone)]
pub struct FieldSnapshot {
    descriptor: Arc<FieldDescriptor>,
    value: FieldValue,
}

impl FieldSnapshot {
    pub fn new(descriptor: Arc<FieldDescriptor>, value: FieldValue) -> Self {
        Self { descriptor, value }
    }

    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    pub fn id(&self) -> FieldId {
        self.descriptor.id
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn label(&self) -> &str {
        self.descriptor.display_label()
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// The string value of a single-valued field.
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            FieldValue::Single(value) => value.as_deref(),
            FieldValue::Multi(_) => None,
        }
    }

    /// The selections of a multi-valued field.
    pub fn values(&self) -> Option<&[String]> {
        match &self.value {
            FieldValue::Multi(values) => values.as_deref(),
            FieldValue::Single(_) => None,
        }
    }

    /// Non-empty single string, the input most rules check.
    pub fn filled_text(&self) -> Option<&str> {
        self.text().filter(|v| !v.is_empty())
    }

    pub fn is_multi_valued(&self) -> bool {
        self.value.shape() == ValueShape::Multi
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn is_blank(&self) -> bool {
        self.value.is_blank()
    }
}

/// All snapshots of one run, in declaration order, addressable by id.
#[derive(Debug, Clone, Default)]
pub struct Snapshots {
    fields: Vec<FieldSnapshot>,
    by_id: HashMap<FieldId, usize>,
}

impl Snapshots {
    pub fn new(fields: Vec<FieldSnapshot>) -> Self {
        let by_id = fields
            .iter()
            .enumerate()
            .filter(|(_, snapshot)| snapshot.id().is_assigned())
            .map(|(index, snapshot)| (snapshot.id(), index))
            .collect();
        Self { fields, by_id }
    }

    pub fn get(&self, id: FieldId) -> Option<&FieldSnapshot> {
        self.by_id.get(&id).map(|&index| &self.fields[index])
    }

    pub fn by_name(&self, name: &str) -> Option<&FieldSnapshot> {
        self.fields.iter().find(|s| s.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSnapshot> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

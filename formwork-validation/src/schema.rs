//! Form schemas.
//!
//! A [`FormSchema`] is the checked, immutable list of field descriptors of one
//! form type. It is built once through [`FormSchemaBuilder`] and then shared
//! by every validation run of that form. [`SchemaRegistry`] caches schemas per
//! Rust type for forms implementing [`Form`].

use crate::errors::{EngineError, Result, SchemaError};
use crate::field::{FieldDescriptor, FieldId, FieldSnapshot, FieldValue, Snapshots, ValueShape, WidgetKind};
use crate::rule_config::RuleSpec;
use crate::schedule::{DependencyIssue, dependency_issues};
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Declaration of one field, turned into a [`FieldDescriptor`] by
/// [`FormSchemaBuilder::build`].
#[derive(Debug, Clone)]
pub struct FieldBuilder {
    id: FieldId,
    name: String,
    label: Option<String>,
    widget: WidgetKind,
    declared_type: Option<String>,
    order: Option<u32>,
    rules: Vec<RuleSpec>,
    validate_after: Option<FieldId>,
    head_is_dummy: bool,
}

impl FieldBuilder {
    pub fn new(name: impl Into<String>, widget: WidgetKind) -> Self {
        Self {
            id: FieldId(0),
            name: name.into(),
            label: None,
            widget,
            declared_type: None,
            order: None,
            rules: Vec::new(),
            validate_after: None,
            head_is_dummy: false,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, WidgetKind::Text)
    }

    pub fn checkbox(name: impl Into<String>) -> Self {
        Self::new(name, WidgetKind::Checkbox)
    }

    pub fn radio(name: impl Into<String>) -> Self {
        Self::new(name, WidgetKind::Radio)
    }

    pub fn select(name: impl Into<String>) -> Self {
        Self::new(name, WidgetKind::Select)
    }

    pub fn id(mut self, id: u32) -> Self {
        self.id = FieldId(id);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Type of the form field, e.g. `"String"` or `"Vec<String>"`.
    ///
    /// Defaults to `Vec<String>` for checkbox groups and `String` otherwise.
    pub fn declared_type(mut self, type_name: impl Into<String>) -> Self {
        self.declared_type = Some(type_name.into());
        self
    }

    /// Explicit position; defaults to the declaration index.
    pub fn order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn rule(mut self, rule: impl Into<RuleSpec>) -> Self {
        self.rules.push(rule.into());
        self
    }

    pub fn validate_after(mut self, id: u32) -> Self {
        self.validate_after = Some(FieldId(id));
        self
    }

    pub fn head_is_dummy(mut self, head_is_dummy: bool) -> Self {
        self.head_is_dummy = head_is_dummy;
        self
    }

    fn default_type(&self) -> &'static str {
        match self.widget {
            WidgetKind::Checkbox => "Vec<String>",
            _ => "String",
        }
    }

    fn into_descriptor(self, index: usize) -> std::result::Result<FieldDescriptor, SchemaError> {
        let type_name = self
            .declared_type
            .clone()
            .unwrap_or_else(|| self.default_type().to_string());
        let shape = ValueShape::from_type_name(&self.name, &type_name)?;

        if !self.id.is_assigned() && !self.rules.is_empty() {
            return Err(SchemaError::MissingId { field: self.name });
        }

        Ok(FieldDescriptor {
            id: self.id,
            order: self.order.unwrap_or(index as u32),
            name: self.name,
            label: self.label,
            widget: self.widget,
            type_name,
            shape,
            rules: self.rules,
            validate_after: self.validate_after,
            head_is_dummy: self.head_is_dummy,
        })
    }
}

/// Builder for [`FormSchema`].
#[derive(Debug, Clone)]
pub struct FormSchemaBuilder {
    name: String,
    fields: Vec<FieldBuilder>,
    strict_dependencies: bool,
}

impl FormSchemaBuilder {
    pub fn field(mut self, field: FieldBuilder) -> Self {
        self.fields.push(field);
        self
    }

    /// Reject dangling `validate_after` targets and cycles instead of logging
    /// them.
    pub fn strict_dependencies(mut self, strict: bool) -> Self {
        self.strict_dependencies = strict;
        self
    }

    /// Check the declaration and freeze it.
    pub fn build(self) -> std::result::Result<FormSchema, SchemaError> {
        let mut names: HashSet<String> = HashSet::new();
        let mut ids: HashMap<FieldId, String> = HashMap::new();
        let mut descriptors = Vec::with_capacity(self.fields.len());

        for (index, field) in self.fields.into_iter().enumerate() {
            let descriptor = field.into_descriptor(index)?;

            if !names.insert(descriptor.name.clone()) {
                return Err(SchemaError::DuplicateName(descriptor.name));
            }

            if descriptor.id.is_assigned() {
                match ids.entry(descriptor.id) {
                    Entry::Occupied(first) => {
                        return Err(SchemaError::DuplicateId {
                            id: descriptor.id.0,
                            first: first.get().clone(),
                            second: descriptor.name,
                        });
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(descriptor.name.clone());
                    }
                }
            }

            descriptors.push(descriptor);
        }

        for issue in dependency_issues(&descriptors) {
            if self.strict_dependencies {
                return Err(issue.into());
            }
            match &issue {
                DependencyIssue::Dangling { field, target } => formwork_log::warn!(
                    "Form {}: field {} waits on unknown field {} and will never be validated",
                    self.name,
                    field,
                    target
                ),
                DependencyIssue::Cycle { field } => formwork_log::warn!(
                    "Form {}: field {} is in a validate-after cycle and will never be validated",
                    self.name,
                    field
                ),
            }
        }

        formwork_log::debug!("Registered form schema {} ({} fields)", self.name, descriptors.len());

        Ok(FormSchema {
            name: self.name,
            fields: descriptors.into_iter().map(Arc::new).collect(),
        })
    }
}

/// Checked field declarations of one form.
#[derive(Debug, Clone)]
pub struct FormSchema {
    name: String,
    fields: Vec<Arc<FieldDescriptor>>,
}

impl FormSchema {
    pub fn builder(name: impl Into<String>) -> FormSchemaBuilder {
        FormSchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
            strict_dependencies: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Descriptors in declaration order.
    pub fn fields(&self) -> &[Arc<FieldDescriptor>] {
        &self.fields
    }

    pub fn field(&self, id: FieldId) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.id == id).map(Arc::as_ref)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name).map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Capture one snapshot per declared field from `source`.
    ///
    /// Fields the source knows nothing about are captured as null. A value
    /// whose shape contradicts the declaration is a caller error.
    pub fn extract(&self, source: &dyn FieldSource) -> Result<Snapshots> {
        let mut snapshots = Vec::with_capacity(self.fields.len());
        for descriptor in &self.fields {
            let value = source
                .read(descriptor)
                .unwrap_or_else(|| FieldValue::null(descriptor.shape));

            if value.shape() != descriptor.shape {
                return Err(EngineError::illegal_usage(format!(
                    "field {} of form {} is declared {} but a {:?} value was supplied",
                    descriptor.name,
                    self.name,
                    descriptor.type_name,
                    value.shape()
                )));
            }

            snapshots.push(FieldSnapshot::new(Arc::clone(descriptor), value));
        }
        Ok(Snapshots::new(snapshots))
    }
}

/// Where field values come from: the view adapter or an in-memory form.
pub trait FieldSource {
    /// Current value of `descriptor`'s field, `None` when the source has none.
    fn read(&self, descriptor: &FieldDescriptor) -> Option<FieldValue>;
}

/// Field values keyed by field name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: Vec<(String, FieldValue)>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing an earlier one of the same name.
    pub fn set(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        let name = name.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((name, value)),
        }
        self
    }

    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, FieldValue::text(value))
    }

    /// Text value that may be absent.
    pub fn optional(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        self.set(name, FieldValue::Single(value.map(Into::into)))
    }

    pub fn list<I, S>(self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(name, FieldValue::list(values))
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FieldSource for FormValues {
    fn read(&self, descriptor: &FieldDescriptor) -> Option<FieldValue> {
        self.get(&descriptor.name).cloned()
    }
}

/// A form type: declares its fields once and exposes its current values.
pub trait Form: 'static {
    /// Name used in logs and errors.
    fn form_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Add this form's fields to `schema`.
    fn describe(schema: FormSchemaBuilder) -> FormSchemaBuilder;

    fn values(&self) -> FormValues;
}

/// Process-wide cache of schemas keyed by form type.
pub struct SchemaRegistry {
    strict_dependencies: bool,
    schemas: RwLock<HashMap<TypeId, Arc<FormSchema>>>,
}

impl SchemaRegistry {
    pub fn new(strict_dependencies: bool) -> Self {
        Self {
            strict_dependencies,
            schemas: RwLock::new(HashMap::new()),
        }
    }

    /// The schema of `F`, described and checked on first use.
    pub fn schema_for<F: Form>(&self) -> std::result::Result<Arc<FormSchema>, SchemaError> {
        self.register::<F>().map(|(schema, _)| schema)
    }

    /// Like [`SchemaRegistry::schema_for`], also telling whether this call
    /// stored the schema. Of several concurrent first callers exactly one
    /// gets `true`.
    pub fn register<F: Form>(&self) -> std::result::Result<(Arc<FormSchema>, bool), SchemaError> {
        let type_id = TypeId::of::<F>();
        if let Some(schema) = self.schemas.read().get(&type_id) {
            return Ok((Arc::clone(schema), false));
        }

        let mut builder = F::describe(FormSchema::builder(F::form_name()));
        if self.strict_dependencies {
            builder = builder.strict_dependencies(true);
        }
        let built = builder.build()?;

        match self.schemas.write().entry(type_id) {
            Entry::Occupied(cached) => Ok((Arc::clone(cached.get()), false)),
            Entry::Vacant(slot) => Ok((Arc::clone(slot.insert(Arc::new(built))), true)),
        }
    }

    pub fn contains<F: Form>(&self) -> bool {
        self.schemas.read().contains_key(&TypeId::of::<F>())
    }

    pub fn len(&self) -> usize {
        self.schemas.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.read().is_empty()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new(false)
    }
}

//! Stateful validation of one bound form.
//!
//! A view adapter binds a schema once, captures values whenever the user
//! edits something, and validates the whole form on submit or a single field
//! on focus loss.

use crate::engine::ValidationEngine;
use crate::entity::{Entity, map_to_entity};
use crate::errors::{EngineError, Result};
use crate::field::{FieldId, Snapshots};
use crate::result::ValidationResult;
use crate::schema::{FieldSource, Form, FormSchema};
use std::sync::Arc;

pub struct FormSession<'e> {
    engine: &'e ValidationEngine,
    schema: Option<Arc<FormSchema>>,
    snapshots: Option<Snapshots>,
    last_result: Option<ValidationResult>,
}

impl<'e> FormSession<'e> {
    pub fn new(engine: &'e ValidationEngine) -> Self {
        Self {
            engine,
            schema: None,
            snapshots: None,
            last_result: None,
        }
    }

    /// Bind `schema`, dropping anything captured for a previous one.
    pub fn bind(&mut self, schema: Arc<FormSchema>) {
        self.engine.check_schema(&schema);
        self.schema = Some(schema);
        self.snapshots = None;
        self.last_result = None;
    }

    /// Bind the cached schema of `F`.
    pub fn bind_form<F: Form>(&mut self) -> Result<()> {
        let schema = self.engine.schema_for::<F>()?;
        self.schema = Some(schema);
        self.snapshots = None;
        self.last_result = None;
        Ok(())
    }

    pub fn schema(&self) -> Option<&FormSchema> {
        self.schema.as_deref()
    }

    /// Take a fresh snapshot of every field.
    pub fn capture(&mut self, source: &dyn FieldSource) -> Result<&Snapshots> {
        let schema = self
            .schema
            .as_ref()
            .ok_or_else(|| EngineError::illegal_usage("capture called before a schema was bound"))?;
        let snapshots = schema.extract(source)?;
        Ok(self.snapshots.insert(snapshots))
    }

    pub fn snapshots(&self) -> Option<&Snapshots> {
        self.snapshots.as_ref()
    }

    fn captured(&self) -> Result<&Snapshots> {
        self.snapshots
            .as_ref()
            .ok_or_else(|| EngineError::illegal_usage("validate called before any values were captured"))
    }

    /// Validate every field of the last capture.
    pub fn validate(&mut self) -> Result<&ValidationResult> {
        let result = self.engine.validate(self.captured()?)?;
        Ok(self.last_result.insert(result))
    }

    /// Validate one field of the last capture.
    pub fn validate_field(&mut self, id: FieldId) -> Result<&ValidationResult> {
        let result = self.engine.validate_one(self.captured()?, id)?;
        Ok(self.last_result.insert(result))
    }

    pub fn last_result(&self) -> Option<&ValidationResult> {
        self.last_result.as_ref()
    }

    /// Map the last capture onto `E`.
    pub fn to_entity<E: Entity>(&self) -> Result<E> {
        map_to_entity(self.captured()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule_config::RuleConfig;
    use crate::schema::{FieldBuilder, FormValues};

    fn schema() -> Arc<FormSchema> {
        Arc::new(
            FormSchema::builder("login")
                .field(FieldBuilder::text("user").id(1).rule(RuleConfig::required()))
                .field(FieldBuilder::text("pin").id(2).rule(RuleConfig::NumOfDigits(4)))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_capture_needs_schema() {
        let engine = ValidationEngine::new().unwrap();
        let mut session = FormSession::new(&engine);
        let result = session.capture(&FormValues::new());
        assert!(matches!(result, Err(EngineError::IllegalUsage(_))));
    }

    #[test]
    fn test_validate_needs_capture() {
        let engine = ValidationEngine::new().unwrap();
        let mut session = FormSession::new(&engine);
        session.bind(schema());

        assert!(matches!(session.validate(), Err(EngineError::IllegalUsage(_))));
        assert!(matches!(session.validate_field(FieldId(1)), Err(EngineError::IllegalUsage(_))));
        assert!(session.last_result().is_none());
    }

    #[test]
    fn test_capture_then_validate() {
        let engine = ValidationEngine::new().unwrap();
        let mut session = FormSession::new(&engine);
        session.bind(schema());

        session.capture(&FormValues::new().text("user", "").text("pin", "123")).unwrap();
        let result = session.validate().unwrap();
        assert_eq!(result.error_count(), 2);

        let result = session.validate_field(FieldId(2)).unwrap();
        assert_eq!(result.evaluated(), &[FieldId(2)]);
        assert_eq!(session.last_result().map(ValidationResult::error_count), Some(1));

        session.capture(&FormValues::new().text("user", "kim").text("pin", "1234")).unwrap();
        assert!(!session.validate().unwrap().has_error());
    }

    #[test]
    fn test_rebind_clears_capture() {
        let engine = ValidationEngine::new().unwrap();
        let mut session = FormSession::new(&engine);
        session.bind(schema());
        session.capture(&FormValues::new().text("user", "kim")).unwrap();
        assert!(session.snapshots().is_some());

        session.bind(schema());
        assert!(session.snapshots().is_none());
    }
}

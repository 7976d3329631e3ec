//! Validation engine: rule dispatch over scheduled fields.

use crate::clock::{Clock, SystemClock};
use crate::config::{EngineConfig, StopPolicy};
use crate::entity::{Entity, map_to_entity};
use crate::errors::{EngineError, Result};
use crate::field::{FieldId, FieldSnapshot, Snapshots};
use crate::result::ValidationResult;
use crate::rule_config::RuleKind;
use crate::rules::{Rule, RuleCatalog, RuleContext, RuleRegistry, measurable_encoding};
use crate::schedule::{schedule, schedule_one};
use crate::schema::{Form, FormSchema, SchemaRegistry};
use formwork_log::Level;
use std::collections::HashSet;
use std::sync::Arc;

/// Runs configured rules over snapshot sets.
///
/// Built once from an [`EngineConfig`] and then shared; every method takes
/// `&self` and runs are independent of each other.
pub struct ValidationEngine {
    config: EngineConfig,
    rules: RuleRegistry,
    clock: Arc<dyn Clock>,
    schemas: SchemaRegistry,
    date_pattern: &'static str,
}

/// Builder for [`ValidationEngine`].
pub struct ValidationEngineBuilder {
    config: EngineConfig,
    catalog: RuleCatalog,
    clock: Arc<dyn Clock>,
}

impl ValidationEngineBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the catalog that rule names are resolved through.
    pub fn catalog(mut self, catalog: RuleCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Register a custom rule factory under `name`. It only runs if `name`
    /// is listed in the configuration's `custom_rules` (or `standard_rules`).
    pub fn register_rule<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn Rule> + Send + Sync + 'static,
    {
        self.catalog.register(name, factory);
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn build(self) -> Result<ValidationEngine> {
        let rules = RuleRegistry::from_names(
            &self.catalog,
            &self.config.standard_rules,
            &self.config.custom_rules,
        )?;

        if measurable_encoding(&self.config.character_encoding).is_none() {
            formwork_log::warn!(
                "Character encoding {:?} is not supported; byte-width rules will fail",
                self.config.character_encoding
            );
        }

        formwork_log::debug!(
            "Validation engine ready: {} rules, policy {}, encoding {}",
            rules.len(),
            self.config.stop_policy,
            self.config.character_encoding
        );

        Ok(ValidationEngine {
            date_pattern: self.config.date_pattern(),
            schemas: SchemaRegistry::new(self.config.strict_dependencies),
            config: self.config,
            rules,
            clock: self.clock,
        })
    }
}

impl ValidationEngine {
    pub fn builder() -> ValidationEngineBuilder {
        ValidationEngineBuilder {
            config: EngineConfig::default(),
            catalog: RuleCatalog::builtin(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Engine with every built-in rule and default settings.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    /// Schedule every field and validate under the configured stop policy.
    pub fn validate(&self, snapshots: &Snapshots) -> Result<ValidationResult> {
        self.validate_with(snapshots, self.config.stop_policy)
    }

    /// Schedule every field and validate under `policy`.
    pub fn validate_with(&self, snapshots: &Snapshots, policy: StopPolicy) -> Result<ValidationResult> {
        let order = schedule(snapshots);
        formwork_log::debug!(
            "Scheduled {} of {} fields: {}",
            order.len(),
            snapshots.len(),
            order.iter().map(|s| s.name()).collect::<Vec<_>>().join(", ")
        );
        self.dispatch(snapshots, order, policy)
    }

    /// Validate exactly one field; its dependencies are not pulled in.
    pub fn validate_one(&self, snapshots: &Snapshots, id: FieldId) -> Result<ValidationResult> {
        let order = schedule_one(snapshots, id)
            .ok_or_else(|| EngineError::illegal_usage(format!("no field with id {} was captured", id)))?;
        self.dispatch(snapshots, order, self.config.stop_policy)
    }

    /// Cached, checked schema of `F`.
    pub fn schema_for<F: Form>(&self) -> Result<Arc<FormSchema>> {
        let (schema, inserted) = self.schemas.register::<F>()?;
        if inserted {
            self.check_schema(&schema);
        }
        Ok(schema)
    }

    /// Extract `form`'s values and validate them.
    pub fn validate_form<F: Form>(&self, form: &F) -> Result<ValidationResult> {
        let schema = self.schema_for::<F>()?;
        let snapshots = schema.extract(&form.values())?;
        self.validate(&snapshots)
    }

    /// Copy `form`'s values into a new `E`.
    pub fn map_form<F: Form, E: Entity>(&self, form: &F) -> Result<E> {
        let schema = self.schema_for::<F>()?;
        map_to_entity(&schema.extract(&form.values())?)
    }

    /// Rule kinds declared in `schema` that no registered rule handles.
    pub fn unhandled_kinds(&self, schema: &FormSchema) -> Vec<RuleKind> {
        let mut seen = HashSet::new();
        schema
            .fields()
            .iter()
            .flat_map(|field| field.rules.iter().map(|spec| spec.kind()))
            .filter(|kind| !self.rules.handles(kind))
            .filter(|kind| seen.insert(kind.clone()))
            .collect()
    }

    /// Log declared rules that will never run.
    pub fn check_schema(&self, schema: &FormSchema) {
        for kind in self.unhandled_kinds(schema) {
            formwork_log::warn!(
                "Form {} declares rule {} but no rule with that name is registered",
                schema.name(),
                kind
            );
        }
    }

    fn dispatch(
        &self,
        snapshots: &Snapshots,
        order: Vec<&FieldSnapshot>,
        policy: StopPolicy,
    ) -> Result<ValidationResult> {
        let ctx = RuleContext {
            snapshots,
            character_encoding: &self.config.character_encoding,
            date_pattern: self.date_pattern,
            clock: self.clock.as_ref(),
        };
        let mut result = ValidationResult::new();

        'fields: for snapshot in order {
            result.record(snapshot.id());

            for (rule, spec) in self.rules.applicable(snapshot.descriptor()) {
                if !spec.is_active(snapshots) {
                    continue;
                }

                let Some(violation) = rule.evaluate(&spec.config, snapshot, &ctx)? else {
                    continue;
                };

                formwork_log::event!(Level::Debug, "rule failed";
                    "field" => snapshot.name(),
                    "rule" => rule.kind(),
                    "key" => spec.message.as_deref().unwrap_or(&violation.key),
                );
                result.push(violation.with_key(spec.message.as_deref()));

                match policy {
                    StopPolicy::ContinueAll => {}
                    StopPolicy::StopAllIfAny => {
                        formwork_log::debug!("Stopping validation at field {}", snapshot.name());
                        break 'fields;
                    }
                    StopPolicy::StopAndResumeNext => continue 'fields,
                }
            }
        }

        Ok(result)
    }
}

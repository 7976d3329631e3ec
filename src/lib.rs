// Formwork - form validation with dependency-ordered fields
//
// The engine lives in `formwork-validation`; this crate re-exports it
// together with the configuration and logging crates it is built on.

// Re-export the engine
pub use formwork_validation::*;

// Re-export supporting crates
pub use formwork_config;
pub use formwork_log;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        EngineConfig,
        Entity,
        FieldBuilder,
        FieldId,
        FieldSnapshot,
        FieldSource,
        FieldValue,
        Form,
        FormSchema,
        FormSchemaBuilder,
        FormSession,
        FormValues,
        MessageCatalog,
        Rule,
        RuleConfig,
        RuleContext,
        RuleKind,
        RuleSpec,
        StopPolicy,
        ValidationEngine,
        ValidationResult,
        Violation,
        WhenCondition,
        entity,
        map_to_entity,
    };
}

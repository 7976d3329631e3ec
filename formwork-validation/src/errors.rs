// Engine errors
//
// Only configuration, schema and caller mistakes end up here. Invalid user
// input is reported through `ValidationResult`, never as an error.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// A malformed form or entity declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("field `{field}` has unsupported type `{type_name}`; expected String or Vec<String>")]
    UnsupportedFieldType { field: String, type_name: String },

    #[error("field `{field}` declares rules but has no id")]
    MissingId { field: String },

    #[error("field id {id} is declared by both `{first}` and `{second}`")]
    DuplicateId { id: u32, first: String, second: String },

    #[error("field name `{0}` is declared more than once")]
    DuplicateName(String),

    #[error("invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("field `{field}` must be validated after unknown field id {target}")]
    DanglingDependency { field: String, target: u32 },

    #[error("field `{field}` is part of a validate-after cycle")]
    DependencyCycle { field: String },

    #[error("entity field `{entity}.{field}` has unsupported type `{type_name}`")]
    UnsupportedEntityType {
        entity: String,
        field: String,
        type_name: String,
    },
}

/// Fatal engine error.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("cannot convert field `{field}` value {value:?} to {target}: {reason}")]
    Coercion {
        field: String,
        target: String,
        value: String,
        reason: String,
    },

    #[error("unsupported character encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("illegal usage: {0}")]
    IllegalUsage(String),

    #[error("configuration error: {0}")]
    Config(#[from] formwork_config::ConfigError),
}

impl EngineError {
    pub fn illegal_usage(message: impl Into<String>) -> Self {
        EngineError::IllegalUsage(message.into())
    }

    pub fn coercion(
        field: impl Into<String>,
        target: impl Into<String>,
        value: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        EngineError::Coercion {
            field: field.into(),
            target: target.into(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

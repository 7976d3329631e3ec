//! Form validation engine for Formwork
//!
//! Validates the string values of a declared form: every field carries rule
//! configurations and may ask to be validated after another field. The
//! engine orders fields, runs the registered rules under a stop policy and
//! collects violations per field. Validated values can then be mapped onto a
//! typed entity.
//!
//! # Examples
//!
//! ## Validating a Form
//!
//! ```
//! use formwork_validation::{
//!     FieldBuilder, FieldId, FormSchema, FormValues, MessageCatalog, RuleConfig, ValidationEngine,
//! };
//!
//! let schema = FormSchema::builder("signup")
//!     .field(FieldBuilder::text("name").id(1).label("Name").rule(RuleConfig::required()))
//!     .field(FieldBuilder::text("zip").id(2).rule(RuleConfig::regex(r"\d{3}-\d{4}").unwrap()))
//!     .build()
//!     .unwrap();
//!
//! let engine = ValidationEngine::new().unwrap();
//! let snapshots = schema
//!     .extract(&FormValues::new().text("name", "").text("zip", "123-4567"))
//!     .unwrap();
//! let result = engine.validate(&snapshots).unwrap();
//!
//! assert!(result.has_error());
//! let message = MessageCatalog::default().render(&result.field_errors(FieldId(1))[0]);
//! assert_eq!(message, "Name is required.");
//! ```
//!
//! ## Stop Policies
//!
//! ```
//! use formwork_validation::{EngineConfig, StopPolicy, ValidationEngine};
//!
//! let engine = ValidationEngine::builder()
//!     .config(EngineConfig::default().with_stop_policy(StopPolicy::StopAndResumeNext))
//!     .build()
//!     .unwrap();
//! assert_eq!(engine.config().stop_policy, StopPolicy::StopAndResumeNext);
//! ```
//!
//! ## Conditional Rules
//!
//! ```
//! use formwork_validation::{FieldBuilder, FieldId, FormSchema, FormValues, RuleSpec, ValidationEngine};
//!
//! let schema = FormSchema::builder("contact")
//!     .field(FieldBuilder::radio("method").id(1))
//!     .field(FieldBuilder::text("phone").id(2).rule(RuleSpec::required_if(FieldId(1), "phone")))
//!     .build()
//!     .unwrap();
//! let engine = ValidationEngine::new().unwrap();
//!
//! let by_mail = schema.extract(&FormValues::new().text("method", "mail")).unwrap();
//! assert!(!engine.validate(&by_mail).unwrap().has_error());
//!
//! let by_phone = schema.extract(&FormValues::new().text("method", "phone")).unwrap();
//! assert!(engine.validate(&by_phone).unwrap().has_error());
//! ```

mod clock;
mod config;
mod engine;
mod entity;
mod errors;
mod field;
mod locale;
mod messages;
mod result;
mod rule_config;
mod rules;
mod schedule;
mod schema;
mod session;
pub mod validators;

pub use clock::*;
pub use config::*;
pub use engine::*;
pub use entity::*;
pub use errors::*;
pub use field::*;
pub use locale::*;
pub use messages::*;
pub use result::*;
pub use rule_config::*;
pub use rules::*;
pub use schedule::*;
pub use schema::*;
pub use session::*;

//! Mapping captured form values onto typed entities.
//!
//! Fields are matched by name. String values are coerced to the entity
//! field's declared type, collected into a JSON object and deserialized with
//! serde, so fields without a usable value keep their `Default`.
//!
//! ```
//! use formwork_validation::{entity, map_to_entity, FieldBuilder, FormSchema, FormValues};
//!
//! entity! {
//!     pub struct Order {
//!         pub item: String,
//!         pub quantity: u32,
//!         pub gift: bool,
//!     }
//! }
//!
//! let schema = FormSchema::builder("order")
//!     .field(FieldBuilder::text("item"))
//!     .field(FieldBuilder::text("quantity"))
//!     .field(FieldBuilder::text("gift"))
//!     .build()
//!     .unwrap();
//! let snapshots = schema
//!     .extract(&FormValues::new().text("item", "pen").text("quantity", "3").text("gift", ""))
//!     .unwrap();
//!
//! let order: Order = map_to_entity(&snapshots).unwrap();
//! assert_eq!(order, Order { item: "pen".into(), quantity: 3, gift: false });
//! ```

use crate::errors::{EngineError, Result, SchemaError};
use crate::field::{FieldValue, Snapshots, normalize_type_name};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;

/// One field of an entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityField {
    pub name: &'static str,
    /// Rust type as written, e.g. `"Option<u32>"`.
    pub type_name: &'static str,
}

/// Destination record of [`map_to_entity`]. Usually declared with
/// [`entity!`](crate::entity!).
pub trait Entity: DeserializeOwned {
    fn entity_name() -> &'static str;

    fn entity_fields() -> &'static [EntityField];
}

/// Declare an entity struct.
///
/// The struct derives `Debug`, `Clone`, `Default`, `PartialEq` and
/// `serde::Deserialize` (the calling crate needs `serde` as a dependency)
/// and implements [`Entity`](crate::Entity).
#[macro_export]
macro_rules! entity {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($(#[$field_meta:meta])* $field_vis:vis $field:ident : $ty:ty),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $($(#[$field_meta])* $field_vis $field: $ty),*
        }

        impl $crate::Entity for $name {
            fn entity_name() -> &'static str {
                stringify!($name)
            }

            fn entity_fields() -> &'static [$crate::EntityField] {
                const FIELDS: &[$crate::EntityField] = &[
                    $($crate::EntityField {
                        name: stringify!($field),
                        type_name: stringify!($ty),
                    }),*
                ];
                FIELDS
            }
        }
    };
}

/// Entity field types values can be coerced to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetType {
    Str,
    StrList,
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Optional(Box<TargetType>),
}

impl TargetType {
    /// Resolve a Rust type name; `None` if values cannot be coerced to it.
    pub fn parse(type_name: &str) -> Option<Self> {
        let normalized = normalize_type_name(type_name);
        Self::parse_normalized(&normalized)
    }

    fn parse_normalized(name: &str) -> Option<Self> {
        if let Some(inner) = name.strip_prefix("Option<").and_then(|rest| rest.strip_suffix('>')) {
            return Self::parse_normalized(inner)
                .filter(|inner| !matches!(inner, TargetType::Optional(_)))
                .map(|inner| TargetType::Optional(Box::new(inner)));
        }

        let target = match name {
            "String" => TargetType::Str,
            "Vec<String>" => TargetType::StrList,
            "bool" => TargetType::Bool,
            "char" => TargetType::Char,
            "i8" => TargetType::I8,
            "i16" => TargetType::I16,
            "i32" => TargetType::I32,
            "i64" => TargetType::I64,
            "isize" => TargetType::Isize,
            "u8" => TargetType::U8,
            "u16" => TargetType::U16,
            "u32" => TargetType::U32,
            "u64" => TargetType::U64,
            "usize" => TargetType::Usize,
            "f32" => TargetType::F32,
            "f64" => TargetType::F64,
            _ => return None,
        };
        Some(target)
    }

    /// Type values are actually converted to.
    fn base(&self) -> &TargetType {
        match self {
            TargetType::Optional(inner) => inner.base(),
            other => other,
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetType::Str => "String",
            TargetType::StrList => "Vec<String>",
            TargetType::Bool => "bool",
            TargetType::Char => "char",
            TargetType::I8 => "i8",
            TargetType::I16 => "i16",
            TargetType::I32 => "i32",
            TargetType::I64 => "i64",
            TargetType::Isize => "isize",
            TargetType::U8 => "u8",
            TargetType::U16 => "u16",
            TargetType::U32 => "u32",
            TargetType::U64 => "u64",
            TargetType::Usize => "usize",
            TargetType::F32 => "f32",
            TargetType::F64 => "f64",
            TargetType::Optional(inner) => return write!(f, "Option<{}>", inner),
        };
        f.write_str(name)
    }
}

fn parse_int<T>(field: &str, target: &TargetType, raw: &str) -> Result<Value>
where
    T: std::str::FromStr + Into<Value>,
    T::Err: fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map(Into::into)
        .map_err(|e| EngineError::coercion(field, target.to_string(), raw, e))
}

fn parse_float<T>(field: &str, target: &TargetType, raw: &str) -> Result<Value>
where
    T: std::str::FromStr + Into<f64>,
    T::Err: fmt::Display,
{
    let parsed: f64 = raw
        .trim()
        .parse::<T>()
        .map_err(|e| EngineError::coercion(field, target.to_string(), raw, e))?
        .into();
    serde_json::Number::from_f64(parsed)
        .map(Value::Number)
        .ok_or_else(|| EngineError::coercion(field, target.to_string(), raw, "not a finite number"))
}

/// Coerce one captured value. `Ok(None)` leaves the entity field at its
/// default.
fn coerce(field: &str, target: &TargetType, value: &FieldValue) -> Result<Option<Value>> {
    let base = target.base();

    let raw = match (base, value) {
        (_, FieldValue::Single(None) | FieldValue::Multi(None)) => return Ok(None),
        (TargetType::StrList, FieldValue::Multi(Some(values))) => {
            return Ok(Some(Value::from(values.clone())));
        }
        (TargetType::StrList, FieldValue::Single(Some(raw))) => {
            let list: Vec<String> = if raw.is_empty() { Vec::new() } else { vec![raw.clone()] };
            return Ok(Some(Value::from(list)));
        }
        (_, FieldValue::Multi(Some(values))) => {
            return Err(EngineError::coercion(
                field,
                target.to_string(),
                values.join(","),
                "a list cannot be stored in a single value",
            ));
        }
        (TargetType::Str, FieldValue::Single(Some(raw))) => {
            return Ok(Some(Value::String(raw.clone())));
        }
        (_, FieldValue::Single(Some(raw))) => raw,
    };

    // Blank optional inputs stay at the default instead of failing to parse
    if raw.is_empty() {
        return Ok(None);
    }

    let value = match base {
        TargetType::Bool => match raw.trim() {
            v if v.eq_ignore_ascii_case("true") => Value::Bool(true),
            v if v.eq_ignore_ascii_case("false") => Value::Bool(false),
            _ => return Err(EngineError::coercion(field, target.to_string(), raw, "expected true or false")),
        },
        TargetType::Char => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Value::String(c.to_string()),
                _ => return Err(EngineError::coercion(field, target.to_string(), raw, "expected one character")),
            }
        }
        TargetType::I8 => parse_int::<i8>(field, target, raw)?,
        TargetType::I16 => parse_int::<i16>(field, target, raw)?,
        TargetType::I32 => parse_int::<i32>(field, target, raw)?,
        TargetType::I64 => parse_int::<i64>(field, target, raw)?,
        TargetType::Isize => parse_int::<isize>(field, target, raw)?,
        TargetType::U8 => parse_int::<u8>(field, target, raw)?,
        TargetType::U16 => parse_int::<u16>(field, target, raw)?,
        TargetType::U32 => parse_int::<u32>(field, target, raw)?,
        TargetType::U64 => parse_int::<u64>(field, target, raw)?,
        TargetType::Usize => parse_int::<usize>(field, target, raw)?,
        TargetType::F32 => parse_float::<f32>(field, target, raw)?,
        TargetType::F64 => parse_float::<f64>(field, target, raw)?,
        TargetType::Str | TargetType::StrList | TargetType::Optional(_) => return Ok(None),
    };
    Ok(Some(value))
}

/// Build an `E` from captured values, matching fields by name.
///
/// Entity fields without a same-named form field, and null or blank
/// non-string values, keep their defaults. Any entity field of a type values
/// cannot be coerced to is a [`SchemaError`], matched or not; a value that
/// does not parse is a coercion error.
pub fn map_to_entity<E: Entity>(snapshots: &Snapshots) -> Result<E> {
    let mut object = Map::new();

    for field in E::entity_fields() {
        let target = TargetType::parse(field.type_name).ok_or_else(|| SchemaError::UnsupportedEntityType {
            entity: E::entity_name().to_string(),
            field: field.name.to_string(),
            type_name: field.type_name.to_string(),
        })?;

        let Some(snapshot) = snapshots.by_name(field.name) else {
            continue;
        };

        match coerce(field.name, &target, snapshot.value()) {
            Ok(Some(value)) => {
                object.insert(field.name.to_string(), value);
            }
            Ok(None) => {}
            Err(e) => {
                formwork_log::debug!("Mapping {} failed: {}", E::entity_name(), e);
                return Err(e);
            }
        }
    }

    serde_json::from_value(Value::Object(object))
        .map_err(|e| EngineError::coercion(E::entity_name(), E::entity_name(), "", e))
}

//! Message keys and templates.
//!
//! Templates use positional placeholders: `{0}` is the field label, later
//! indexes are rule parameters.

use crate::result::Violation;
use std::collections::HashMap;

pub mod keys {
    pub const REQUIRED: &str = "required";
    pub const REQUIRED_SELECT: &str = "required.select";
    pub const LENGTH: &str = "length";
    pub const MIN_LENGTH: &str = "minLength";
    pub const MAX_LENGTH: &str = "maxLength";
    pub const NUM_OF_DIGITS: &str = "numOfDigits";
    pub const MAX_NUM_OF_DIGITS: &str = "maxNumOfDigits";
    pub const MIN_VALUE: &str = "minValue";
    pub const MAX_VALUE: &str = "maxValue";
    pub const INT_TYPE: &str = "intType";
    pub const FLOAT_TYPE: &str = "floatType";
    pub const REGEX: &str = "regex";
    pub const ALPHABET: &str = "alphabet";
    pub const ALPHA_NUM: &str = "alphaNum";
    pub const HIRAGANA: &str = "hiragana";
    pub const KATAKANA: &str = "katakana";
    pub const EMAIL: &str = "email";
    pub const SINGLEBYTE: &str = "singlebyte";
    pub const MULTIBYTE: &str = "multibyte";
    pub const DATE_PATTERN: &str = "datePattern";
    pub const PAST_DATE: &str = "pastDate";
    pub const PAST_DATE_TODAY: &str = "pastDate.today";
}

const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    (keys::REQUIRED, "{0} is required."),
    (keys::REQUIRED_SELECT, "Select at least {1} for {0}."),
    (keys::LENGTH, "{0} must be exactly {1} characters."),
    (keys::MIN_LENGTH, "{0} must be at least {1} characters."),
    (keys::MAX_LENGTH, "{0} must be at most {1} characters."),
    (keys::NUM_OF_DIGITS, "{0} must be exactly {1} digits."),
    (keys::MAX_NUM_OF_DIGITS, "{0} must be at most {1} digits."),
    (keys::MIN_VALUE, "{0} must be {1} or more."),
    (keys::MAX_VALUE, "{0} must be {1} or less."),
    (keys::INT_TYPE, "{0} must be a whole number."),
    (keys::FLOAT_TYPE, "{0} must be a number."),
    (keys::REGEX, "{0} is not in the expected format."),
    (keys::ALPHABET, "{0} may only contain letters."),
    (keys::ALPHA_NUM, "{0} may only contain letters and digits."),
    (keys::HIRAGANA, "{0} may only contain hiragana."),
    (keys::KATAKANA, "{0} may only contain katakana."),
    (keys::EMAIL, "{0} must be a valid email address."),
    (keys::SINGLEBYTE, "{0} may only contain single-byte characters."),
    (keys::MULTIBYTE, "{0} may only contain multi-byte characters."),
    (keys::DATE_PATTERN, "{0} must be a date in the form {1}."),
    (keys::PAST_DATE, "{0} must be a date before today."),
    (keys::PAST_DATE_TODAY, "{0} must be today or earlier."),
];

/// Key → template table with English defaults.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    templates: HashMap<String, String>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            templates: DEFAULT_TEMPLATES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl MessageCatalog {
    /// A catalog without any templates.
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Add or replace a template.
    pub fn with(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(key.into(), template.into());
        self
    }

    pub fn template(&self, key: &str) -> Option<&str> {
        self.templates.get(key).map(String::as_str)
    }

    /// Render a violation. Unknown keys render as the key itself followed by
    /// the arguments, so nothing is lost.
    pub fn render(&self, violation: &Violation) -> String {
        match self.template(&violation.key) {
            Some(template) => format_positional(template, &violation.args),
            None => violation.to_string(),
        }
    }
}

/// Replace `{n}` placeholders; out-of-range indexes are left untouched.
pub fn format_positional(template: &str, args: &[String]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        output.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let replaced = after.find('}').and_then(|end| {
            let index: usize = after[..end].parse().ok()?;
            let arg = args.get(index)?;
            Some((arg, end))
        });

        match replaced {
            Some((arg, end)) => {
                output.push_str(arg);
                rest = &after[end + 1..];
            }
            None => {
                output.push('{');
                rest = after;
            }
        }
    }

    output.push_str(rest);
    output
}

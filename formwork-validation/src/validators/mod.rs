// Built-in rules
//
// Apart from `Required`, every rule skips empty values and multi-valued
// fields: emptiness is `Required`'s concern, and these rules only understand
// a single string.

mod bytes;
mod date;
mod length;
mod number;
mod pattern;
mod required;

pub use bytes::{Multibyte, Singlebyte, encoded_width};
pub use date::{DatePattern, PastDate, parse_date};
pub use length::{Length, MaxLength, MaxNumOfDigits, MinLength, NumOfDigits, code_points};
pub use number::{FloatType, IntType, MaxValue, MinValue};
pub use pattern::{AlphaNum, Alphabet, Email, Hiragana, Katakana, RegexRule};
pub use required::{HEAD_SELECTION, Required};

use crate::rule_config::RuleKind;
use crate::rules::Rule;
use std::sync::Arc;

/// The built-in implementation of `kind`, `None` for custom kinds.
pub fn builtin(kind: &RuleKind) -> Option<Arc<dyn Rule>> {
    let rule: Arc<dyn Rule> = match kind {
        RuleKind::Required => Arc::new(Required),
        RuleKind::Length => Arc::new(Length),
        RuleKind::MinLength => Arc::new(MinLength),
        RuleKind::MaxLength => Arc::new(MaxLength),
        RuleKind::NumOfDigits => Arc::new(NumOfDigits),
        RuleKind::MaxNumOfDigits => Arc::new(MaxNumOfDigits),
        RuleKind::MinValue => Arc::new(MinValue),
        RuleKind::MaxValue => Arc::new(MaxValue),
        RuleKind::IntType => Arc::new(IntType),
        RuleKind::FloatType => Arc::new(FloatType),
        RuleKind::Regex => Arc::new(RegexRule),
        RuleKind::Alphabet => Arc::new(Alphabet),
        RuleKind::AlphaNum => Arc::new(AlphaNum),
        RuleKind::Hiragana => Arc::new(Hiragana),
        RuleKind::Katakana => Arc::new(Katakana),
        RuleKind::Email => Arc::new(Email),
        RuleKind::Singlebyte => Arc::new(Singlebyte),
        RuleKind::Multibyte => Arc::new(Multibyte),
        RuleKind::DatePattern => Arc::new(DatePattern),
        RuleKind::PastDate => Arc::new(PastDate),
        RuleKind::Custom(_) => return None,
    };
    Some(rule)
}

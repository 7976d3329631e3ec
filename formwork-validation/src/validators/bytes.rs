use crate::errors::Result;
use crate::field::FieldSnapshot;
use crate::messages::keys;
use crate::result::Violation;
use crate::rule_config::{RuleConfig, RuleKind};
use crate::rules::{Rule, RuleContext};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};

/// Bytes `ch` occupies under `encoding`, `None` if it cannot be represented.
pub fn encoded_width(encoding: &'static Encoding, ch: char) -> Option<usize> {
    // encoding_rs never encodes into UTF-16; its encoder falls back to UTF-8
    if encoding == UTF_16LE || encoding == UTF_16BE {
        return Some(ch.len_utf16() * 2);
    }

    let mut buffer = [0u8; 4];
    let (bytes, _, unmappable) = encoding.encode(ch.encode_utf8(&mut buffer));
    (!unmappable).then_some(bytes.len())
}

fn all_chars(value: &str, encoding: &'static Encoding, accept: impl Fn(usize) -> bool) -> bool {
    value
        .chars()
        .all(|ch| encoded_width(encoding, ch).is_some_and(&accept))
}

/// Every character encodes to exactly one byte.
pub struct Singlebyte;

impl Rule for Singlebyte {
    fn kind(&self) -> RuleKind {
        RuleKind::Singlebyte
    }

    fn evaluate(
        &self,
        config: &RuleConfig,
        snapshot: &FieldSnapshot,
        ctx: &RuleContext<'_>,
    ) -> Result<Option<Violation>> {
        if !matches!(config, RuleConfig::Singlebyte) {
            return Ok(None);
        }
        let Some(value) = snapshot.filled_text() else {
            return Ok(None);
        };

        let encoding = ctx.encoding()?;
        Ok((!all_chars(value, encoding, |width| width == 1))
            .then(|| Violation::new(snapshot, keys::SINGLEBYTE)))
    }
}

/// Every character encodes to two bytes or more.
pub struct Multibyte;

impl Rule for Multibyte {
    fn kind(&self) -> RuleKind {
        RuleKind::Multibyte
    }

    fn evaluate(
        &self,
        config: &RuleConfig,
        snapshot: &FieldSnapshot,
        ctx: &RuleContext<'_>,
    ) -> Result<Option<Violation>> {
        if !matches!(config, RuleConfig::Multibyte) {
            return Ok(None);
        }
        let Some(value) = snapshot.filled_text() else {
            return Ok(None);
        };

        let encoding = ctx.encoding()?;
        Ok((!all_chars(value, encoding, |width| width >= 2))
            .then(|| Violation::new(snapshot, keys::MULTIBYTE)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EngineError;
    use crate::validators::test_support::{check, check_with, text};
    use encoding_rs::{SHIFT_JIS, UTF_8, WINDOWS_1252};

    #[test]
    fn test_encoded_width() {
        assert_eq!(encoded_width(UTF_8, 'a'), Some(1));
        assert_eq!(encoded_width(UTF_8, 'あ'), Some(3));
        assert_eq!(encoded_width(UTF_8, '𠮷'), Some(4));
        assert_eq!(encoded_width(SHIFT_JIS, 'あ'), Some(2));
        assert_eq!(encoded_width(SHIFT_JIS, 'ｱ'), Some(1));
        assert_eq!(encoded_width(UTF_16LE, 'a'), Some(2));
        assert_eq!(encoded_width(UTF_16BE, '𠮷'), Some(4));
        assert_eq!(encoded_width(WINDOWS_1252, 'あ'), None);
    }

    #[test]
    fn test_singlebyte_under_sjis() {
        let rule = Singlebyte;
        let config = RuleConfig::Singlebyte;
        assert!(check_with(&rule, &config, &text("1"), "SJIS").unwrap().is_none());
        assert!(check_with(&rule, &config, &text("あ"), "SJIS").unwrap().is_some());
        // half-width katakana is a single byte in Shift_JIS
        assert!(check_with(&rule, &config, &text("ｱｲｳ"), "Shift_JIS").unwrap().is_none());
    }

    #[test]
    fn test_singlebyte_under_utf8() {
        assert!(check(&Singlebyte, &RuleConfig::Singlebyte, &text("abc")).is_none());
        assert!(check(&Singlebyte, &RuleConfig::Singlebyte, &text("abcé")).is_some());
    }

    #[test]
    fn test_multibyte() {
        let config = RuleConfig::Multibyte;
        assert!(check_with(&Multibyte, &config, &text("あいう"), "SJIS").unwrap().is_none());
        assert!(check_with(&Multibyte, &config, &text("あaう"), "SJIS").unwrap().is_some());
        assert!(check(&Multibyte, &config, &text("漢字")).is_none());
    }

    #[test]
    fn test_unmappable_fails_both() {
        let single = check_with(&Singlebyte, &RuleConfig::Singlebyte, &text("aあ"), "windows-1252");
        let multi = check_with(&Multibyte, &RuleConfig::Multibyte, &text("あ"), "windows-1252");
        assert!(single.unwrap().is_some());
        assert!(multi.unwrap().is_some());
    }

    #[test]
    fn test_unknown_encoding_is_an_error() {
        let result = check_with(&Singlebyte, &RuleConfig::Singlebyte, &text("a"), "EBCDIC-42");
        assert!(matches!(result, Err(EngineError::UnsupportedEncoding(name)) if name == "EBCDIC-42"));
    }

    #[test]
    fn test_decode_only_encoding_is_an_error() {
        for label in ["ISO-2022-KR", "hz-gb-2312", "csiso2022kr"] {
            let single = check_with(&Singlebyte, &RuleConfig::Singlebyte, &text("abc"), label);
            let multi = check_with(&Multibyte, &RuleConfig::Multibyte, &text("あ"), label);
            assert!(matches!(single, Err(EngineError::UnsupportedEncoding(_))), "{}", label);
            assert!(matches!(multi, Err(EngineError::UnsupportedEncoding(_))), "{}", label);
        }
        // UTF-16 has no encoder either but its widths are known
        assert!(check_with(&Singlebyte, &RuleConfig::Singlebyte, &text("a"), "UTF-16LE").unwrap().is_some());
    }

    #[test]
    fn test_empty_value_skips_encoding_lookup() {
        let result = check_with(&Singlebyte, &RuleConfig::Singlebyte, &text(""), "EBCDIC-42");
        assert!(result.unwrap().is_none());
    }
}

//! Locale-default short date patterns (chrono `strftime` syntax).

/// Used when the locale is unknown.
pub const FALLBACK_DATE_PATTERN: &str = "%Y-%m-%d";

const SHORT_DATE_PATTERNS: &[(&str, &str)] = &[
    ("en-US", "%m/%d/%y"),
    ("en-GB", "%d/%m/%Y"),
    ("en", "%m/%d/%y"),
    ("ja-JP", "%Y/%m/%d"),
    ("ja", "%Y/%m/%d"),
    ("zh-CN", "%Y/%m/%d"),
    ("ko-KR", "%y. %m. %d."),
    ("de-DE", "%d.%m.%y"),
    ("de", "%d.%m.%y"),
    ("fr-FR", "%d/%m/%Y"),
    ("fr", "%d/%m/%Y"),
];

/// Short date pattern for a BCP 47 tag such as `ja-JP` or `en_US`.
///
/// Matching is case-insensitive and falls back from `lang-REGION` to `lang`.
pub fn short_date_pattern(locale: &str) -> Option<&'static str> {
    let tag = locale.trim().replace('_', "-");
    let lookup = |wanted: &str| {
        SHORT_DATE_PATTERNS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(wanted))
            .map(|(_, pattern)| *pattern)
    };

    lookup(&tag).or_else(|| tag.split('-').next().and_then(lookup))
}

/// Like [`short_date_pattern`] but never fails; unknown locales get ISO dates.
pub fn short_date_pattern_or_default(locale: &str) -> &'static str {
    short_date_pattern(locale).unwrap_or_else(|| {
        formwork_log::warn!(
            "Unknown locale {:?}, using {} for dates",
            locale,
            FALLBACK_DATE_PATTERN
        );
        FALLBACK_DATE_PATTERN
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_language_fallback() {
        assert_eq!(short_date_pattern("ja-JP"), Some("%Y/%m/%d"));
        assert_eq!(short_date_pattern("JA_jp"), Some("%Y/%m/%d"));
        assert_eq!(short_date_pattern("de-AT"), Some("%d.%m.%y"));
        assert_eq!(short_date_pattern("xx-YY"), None);
    }

    #[test]
    fn test_default_for_unknown() {
        assert_eq!(short_date_pattern_or_default("tlh"), FALLBACK_DATE_PATTERN);
    }
}

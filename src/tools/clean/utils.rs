/// Private helper functions for text and price cleaning
use once_cell::sync::Lazy;
use regex::Regex;

// Lazy static regex for whitespace normalization
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

static CURRENCY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)R\$|\$").expect("valid regex"));

static LEADING_NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?(?:\d+(?:\.\d*)?|\.\d+)").expect("valid regex"));

/// A bare decimal such as `4.9` or `4,5`.
pub(super) static RATING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+(?:[.,][0-9]+)?)$").expect("valid regex"));

/// Sold-count labels: `+5mil vendidos`, `+50k vendidos`, `+100 vendidos`.
pub(super) static SOLD_COUNT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\+\s*([0-9][0-9.,]*)\s*(mil|k)?\s+vendidos?").expect("valid regex")
});

/// Highlight-badge phrases that never name a brand.
pub(super) const NON_BRAND_PHRASES: &[&str] = &[
    "vendidos",
    "%",
    "oferta",
    "patrocinado",
    "disponível",
    "off",
];

/// Prefixes introducing a seller or brand in highlight text.
pub(super) const BRAND_PREFIXES: &[&str] = &["por ", "by "];

/// Normalize whitespace by collapsing multiple spaces/newlines and trimming.
pub(super) fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
}

/// Remove `R$` and `$` currency markers.
pub(super) fn strip_currency(text: &str) -> String {
    CURRENCY_REGEX.replace_all(text, "").trim().to_string()
}

/// Drop `.` where it separates thousands, i.e. is followed by exactly three digits.
pub(super) fn drop_thousands_separators(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, c) in chars.iter().enumerate() {
        if *c == '.' {
            let digits = chars[i + 1..]
                .iter()
                .take_while(|d| d.is_ascii_digit())
                .count();
            if digits == 3 {
                continue;
            }
        }
        out.push(*c);
    }
    out
}

/// Parse the leading decimal number of `text`, ignoring trailing garbage.
pub(super) fn parse_leading_float(text: &str) -> Option<f64> {
    let m = LEADING_NUMBER_REGEX.find(text)?;
    m.as_str().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Strip a case-insensitive `Por `/`By ` prefix.
pub(super) fn strip_brand_prefix(text: &str) -> Option<&str> {
    let lower = text.to_lowercase();
    BRAND_PREFIXES
        .iter()
        .find(|prefix| lower.starts_with(*prefix))
        .and_then(|prefix| text.get(prefix.len()..))
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_thousands_separators() {
        assert_eq!(drop_thousands_separators("1.234,56"), "1234,56");
        assert_eq!(drop_thousands_separators("1.234.567"), "1234567");
        assert_eq!(drop_thousands_separators("4.5"), "4.5");
        assert_eq!(drop_thousands_separators("1.2345"), "1.2345");
    }

    #[test]
    fn test_strip_currency() {
        assert_eq!(strip_currency("R$ 99,90"), "99,90");
        assert_eq!(strip_currency("US$ 10"), "US 10");
        assert_eq!(strip_currency("r$5"), "5");
    }

    #[test]
    fn test_parse_leading_float() {
        assert_eq!(parse_leading_float("12.5abc"), Some(12.5));
        assert_eq!(parse_leading_float("1.2.3"), Some(1.2));
        assert_eq!(parse_leading_float(""), None);
        assert_eq!(parse_leading_float("-"), None);
    }

    #[test]
    fn test_strip_brand_prefix() {
        assert_eq!(strip_brand_prefix("Por Apple"), Some("Apple"));
        assert_eq!(strip_brand_prefix("BY Samsung "), Some("Samsung"));
        assert_eq!(strip_brand_prefix("LOJA OFICIAL"), None);
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  R$\n 1.099 "), "R$ 1.099");
    }
}

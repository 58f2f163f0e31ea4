//! Canonical defensive numeric parsing
//!
//! Every number the formatter displays goes through `safe_parse` exactly
//! once. Provider responses mix nulls, empty strings and literal sentinel
//! tokens; all of them map to the same absence marker instead of an error.

/// Sentinel tokens treated as an absent value — zero allocation
const ABSENT_TOKENS: &[&str] = &["", "None", "N/A", "-"];

/// Marker rendered for any absent or unparsable value.
pub const NA: &str = "N/A";

/// Parse a raw provider field into a float.
///
/// Strips thousands separators and percent signs first. Returns `None` for
/// null, empty, sentinel, or unparsable input; never panics.
pub fn safe_parse(raw: Option<&str>) -> Option<f64> {
    let value = raw?.trim();
    if ABSENT_TOKENS.iter().any(|t| value.eq_ignore_ascii_case(t)) {
        return None;
    }

    let cleaned: String = value
        .chars()
        .filter(|c| *c != ',' && *c != '%')
        .collect();

    cleaned.parse::<f64>().ok()
}

/// Format a float with thousands separators: integral values render without
/// decimals, fractional values with two.
pub fn format_number(num: f64) -> String {
    if !num.is_finite() {
        return NA.to_string();
    }

    let negative = num < 0.0;
    let rendered = if num.fract() == 0.0 {
        format!("{:.0}", num.abs())
    } else {
        format!("{:.2}", num.abs())
    };
    let (digits, frac) = match rendered.split_once('.') {
        Some((int_part, frac_part)) => (int_part.to_string(), Some(frac_part.to_string())),
        None => (rendered, None),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

/// Render a raw provider field for display: parse then format, `"N/A"` on
/// any absence.
pub fn display_number(raw: Option<&str>) -> String {
    match safe_parse(raw) {
        Some(num) => format_number(num),
        None => NA.to_string(),
    }
}

/// Render a raw field verbatim when present and non-sentinel, `"N/A"`
/// otherwise. For fields that are not numbers (dates, names).
pub fn display_or_na(raw: Option<&str>) -> String {
    match raw {
        Some(value)
            if !value.trim().is_empty()
                && !ABSENT_TOKENS
                    .iter()
                    .any(|t| value.trim().eq_ignore_ascii_case(t)) =>
        {
            value.trim().to_string()
        }
        _ => NA.to_string(),
    }
}

/// Truncate to a character budget with an ellipsis marker. Character, not
/// byte, budget: descriptions are Korean text.
pub fn truncate_chars(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let mut out: String = text.chars().take(budget).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_parse_sentinels() {
        assert_eq!(safe_parse(None), None);
        assert_eq!(safe_parse(Some("")), None);
        assert_eq!(safe_parse(Some("None")), None);
        assert_eq!(safe_parse(Some("N/A")), None);
        assert_eq!(safe_parse(Some("-")), None);
        assert_eq!(safe_parse(Some("  ")), None);
    }

    #[test]
    fn test_safe_parse_strips_separators() {
        assert_eq!(safe_parse(Some("50,000,000")), Some(50_000_000.0));
        assert_eq!(safe_parse(Some("1.69%")), Some(1.69));
        assert_eq!(safe_parse(Some("150.25")), Some(150.25));
        assert_eq!(safe_parse(Some("-3.5")), Some(-3.5));
    }

    #[test]
    fn test_safe_parse_garbage_is_none() {
        assert_eq!(safe_parse(Some("abc")), None);
        assert_eq!(safe_parse(Some("12.3.4")), None);
    }

    #[test]
    fn test_format_number_grouping() {
        assert_eq!(format_number(50_000_000.0), "50,000,000");
        assert_eq!(format_number(150.25), "150.25");
        assert_eq!(format_number(1_234.5), "1,234.50");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-1_500.0), "-1,500");
    }

    #[test]
    fn test_display_number_absent() {
        assert_eq!(display_number(Some("None")), "N/A");
        assert_eq!(display_number(Some("147.75")), "147.75");
    }

    #[test]
    fn test_display_or_na() {
        assert_eq!(display_or_na(Some("2024-06-01")), "2024-06-01");
        assert_eq!(display_or_na(Some("")), "N/A");
        assert_eq!(display_or_na(None), "N/A");
    }

    #[test]
    fn test_truncate_chars_korean() {
        let text = "가".repeat(10);
        assert_eq!(truncate_chars(&text, 20), text);
        let truncated = truncate_chars(&text, 4);
        assert_eq!(truncated, format!("{}...", "가".repeat(4)));
    }
}

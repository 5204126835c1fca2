use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

// ASCII digits only: `\d` also matches full-width and Arabic-Indic digits
static ISO_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("ISO_PREFIX: invalid pattern"));

static ISO_EXACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("ISO_EXACT: invalid pattern"));

static DAY_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{2})[/\-]([0-9]{2})[/\-]([0-9]{4})").expect("DAY_FIRST: invalid pattern")
});

/// Emoji, pictographs and punctuation in agent display names.
static AGENT_SYMBOLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\sÀ-ú]").expect("AGENT_SYMBOLS: invalid pattern"));

static MULTI_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("MULTI_SPACE: invalid pattern"));

/// Invisible characters some exports leave around values.
const INVISIBLE: &[char] = &['\u{00A0}', '\u{200B}', '\u{202F}', '\u{2060}', '\u{FEFF}'];

/// Replaces invisible whitespace and BOM characters with spaces, then trims.
pub fn clean_cell(s: &str) -> String {
    s.replace(INVISIBLE, " ").trim().to_string()
}

/// Agent names keep word characters, spaces and accented Latin letters only.
pub fn clean_agent(s: &str) -> String {
    let stripped = AGENT_SYMBOLS.replace_all(s, "");
    MULTI_SPACE.replace_all(stripped.trim(), " ").into_owned()
}

/// Leading integer of the cell ("09", "9h", "14:30"); 0 when absent or outside 0–23.
pub fn parse_hour(s: &str) -> u8 {
    let digits: String = s
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    match digits.parse::<u32>() {
        Ok(h) if h <= 23 => h as u8,
        _ => 0,
    }
}

/// Duration in minutes.
/// "" → None, unparseable → None, negative or non-finite → None, "0" → Some(0.0).
/// A single decimal comma ("12,5") is read as a decimal point.
pub fn parse_minutes(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = if !trimmed.contains('.') && trimmed.matches(',').count() == 1 {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    };
    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

/// Canonical ISO form of a date cell.
/// `yyyy-mm-dd…` is truncated to 10 characters, `dd/mm/yyyy` and `dd-mm-yyyy` are
/// rewritten, anything else falls back to its first 10 characters.
pub fn to_iso(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(m) = ISO_PREFIX.find(trimmed) {
        return Some(m.as_str().to_string());
    }
    if let Some(caps) = DAY_FIRST.captures(trimmed) {
        return Some(format!("{}-{}-{}", &caps[3], &caps[2], &caps[1]));
    }
    Some(trimmed.chars().take(10).collect())
}

/// True when `s` is exactly `yyyy-mm-dd` and can be compared lexicographically.
pub fn is_iso_date(s: &str) -> bool {
    ISO_EXACT.is_match(s)
}

/// Calendar date behind an ISO string, when it exists.
pub fn parse_iso_date(iso: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(iso, "%Y-%m-%d").ok()
}

/// Display form `dd/mm/yyyy`; "—" for an empty value.
pub fn fmt_date(s: &str) -> String {
    let Some(iso) = to_iso(s) else {
        return "—".to_string();
    };
    let parts: Vec<&str> = iso.splitn(3, '-').collect();
    match parts.as_slice() {
        [y, m, d] => format!("{d}/{m}/{y}"),
        _ => iso,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_cell_invisible_chars() {
        assert_eq!(clean_cell("\u{FEFF}Ana\u{00A0}"), "Ana");
        assert_eq!(clean_cell("  12\u{200B} "), "12");
        assert_eq!(clean_cell(""), "");
    }

    #[test]
    fn test_clean_agent_strips_emoji() {
        assert_eq!(clean_agent("🔥 João Silva ⭐"), "João Silva");
        assert_eq!(clean_agent("Maria 💬 Souza"), "Maria Souza");
        assert_eq!(clean_agent("Conceição"), "Conceição");
    }

    #[test]
    fn test_parse_hour() {
        assert_eq!(parse_hour("9"), 9);
        assert_eq!(parse_hour("09h"), 9);
        assert_eq!(parse_hour("14:30"), 14);
        assert_eq!(parse_hour(""), 0);
        assert_eq!(parse_hour("abc"), 0);
        assert_eq!(parse_hour("24"), 0);
    }

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_minutes(""), None);
        assert_eq!(parse_minutes("   "), None);
        assert_eq!(parse_minutes("abc"), None);
        assert_eq!(parse_minutes("12.5"), Some(12.5));
        assert_eq!(parse_minutes("12,5"), Some(12.5));
        assert_eq!(parse_minutes("-3"), None);
        assert_eq!(parse_minutes("NaN"), None);
        assert_eq!(parse_minutes("inf"), None);
    }

    #[test]
    fn test_parse_minutes_zero_is_not_missing() {
        assert_eq!(parse_minutes("0"), Some(0.0));
    }

    #[test]
    fn test_to_iso_variants() {
        assert_eq!(to_iso("2025-03-07"), Some("2025-03-07".to_string()));
        assert_eq!(to_iso("2025-03-07T10:15:00"), Some("2025-03-07".to_string()));
        assert_eq!(to_iso("07/03/2025"), Some("2025-03-07".to_string()));
        assert_eq!(to_iso("07-03-2025 10:15"), Some("2025-03-07".to_string()));
        assert_eq!(to_iso(""), None);
        assert_eq!(to_iso("ontem à tarde"), Some("ontem à ta".to_string()));
    }

    #[test]
    fn test_to_iso_non_ascii_digits() {
        assert_eq!(to_iso("２０２５-03-07"), Some("２０２５-03-07".to_string()));
        assert_eq!(to_iso("٢٠٢٥-٠٣-٠٧"), Some("٢٠٢٥-٠٣-٠٧".to_string()));
        assert_eq!(to_iso("０７/03/2025"), Some("０７/03/2025".to_string()));
        assert!(!is_iso_date("٢٠٢٥-٠٣-٠٧"));
    }

    #[test]
    fn test_fmt_date() {
        assert_eq!(fmt_date("2025-03-07"), "07/03/2025");
        assert_eq!(fmt_date("07/03/2025"), "07/03/2025");
        assert_eq!(fmt_date(""), "—");
    }

    #[test]
    fn test_iso_round_trip_through_display() {
        for s in ["2025-03-07", "07/03/2025", "07-03-2025", "2024-12-31T23:59"] {
            let iso = to_iso(s);
            let back = to_iso(&fmt_date(iso.as_deref().unwrap()));
            assert_eq!(back, iso, "round trip failed for {s}");
        }
    }

    #[test]
    fn test_is_iso_date() {
        assert!(is_iso_date("2025-03-07"));
        assert!(!is_iso_date("ontem à ta"));
        assert!(!is_iso_date("2025-03-07T"));
    }

    #[test]
    fn test_parse_iso_date() {
        let d = parse_iso_date("2025-03-07").unwrap();
        assert_eq!(d.format("%d/%m/%Y").to_string(), "07/03/2025");
        assert!(parse_iso_date("2025-02-31").is_none());
    }
}

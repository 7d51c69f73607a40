//! Unit-aware numeric parsing
//!
//! Catalog values arrive as strings like `"4.7µF"`, `"10kΩ"`, `"-55°C ~ 125°C"`
//! or `0.035" (0.90mm)`. These helpers pull the magnitude out and convert it to
//! SI base units. Nothing here fails: an unparseable value yields `None`.

use regex::Regex;
use std::sync::LazyLock;

/// Metric reading inside parentheses, e.g. `(5.00mm)`
static METRIC_PARENTHETICAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\s*(-?\d+(?:\.\d+)?)\s*mm\s*\)").expect("metric parenthetical regex")
});

/// Symbols allowed in front of a number (`±10%`, `<1µA`)
const LEADING_SYMBOLS: &[char] = &['±', '+', '<', '>', '≤', '≥', '~', '≈'];

/// Unit symbols an SI prefix may precede
const BASE_UNITS: &[&str] = &[
    "F", "H", "Ω", "Ohm", "ohm", "V", "A", "W", "Hz", "s", "S", "Wh", "VA", "J", "C", "g",
];

const MM_PER_INCH: f64 = 25.4;

/// Multiplier for a single SI prefix character
fn prefix_multiplier(c: char) -> Option<f64> {
    match c {
        'f' => Some(1e-15),
        'p' => Some(1e-12),
        'n' => Some(1e-9),
        'µ' | 'μ' | 'u' => Some(1e-6),
        'm' => Some(1e-3),
        'k' | 'K' => Some(1e3),
        'M' => Some(1e6),
        'G' => Some(1e9),
        'T' => Some(1e12),
        _ => None,
    }
}

/// Split a value into its leading number and the trimmed remainder
///
/// Accepts a sign, thousands separators and an exponent: `"-1,200.5e3 Hz"`
/// gives `(-1200500.0, "Hz")`.
pub fn parse_leading_number(value: &str) -> Option<(f64, &str)> {
    let trimmed = value.trim_start().trim_start_matches(LEADING_SYMBOLS).trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    let mut digits = String::new();

    if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
        if bytes[end] == b'-' {
            digits.push('-');
        }
        end += 1;
    }

    let mut seen_digit = false;
    let mut seen_dot = false;
    while end < bytes.len() {
        let b = bytes[end];
        if b.is_ascii_digit() {
            digits.push(b as char);
            seen_digit = true;
        } else if b == b'.' && !seen_dot {
            seen_dot = true;
            digits.push('.');
        } else if b == b',' && seen_digit && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) {
            // thousands separator
        } else {
            break;
        }
        end += 1;
    }

    if !seen_digit {
        return None;
    }

    // Exponent only when followed by digits, so "5e" stays a unit
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut probe = end + 1;
        if probe < bytes.len() && (bytes[probe] == b'-' || bytes[probe] == b'+') {
            probe += 1;
        }
        if probe < bytes.len() && bytes[probe].is_ascii_digit() {
            digits.push('e');
            digits.push_str(&trimmed[end + 1..probe]);
            end = probe;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                digits.push(bytes[end] as char);
                end += 1;
            }
        }
    }

    let number: f64 = digits.parse().ok()?;
    Some((number, trimmed[end..].trim_start()))
}

/// SI multiplier implied by a unit suffix
///
/// A prefix only counts when it stands alone (`"10k"`) or precedes a known
/// unit symbol (`"10kΩ"`). That keeps `"mm"`, `"ppm"` and `"mil"` unscaled.
pub fn unit_multiplier(suffix: &str) -> f64 {
    let mut chars = suffix.chars();
    let Some(first) = chars.next() else {
        return 1.0;
    };
    let Some(multiplier) = prefix_multiplier(first) else {
        return 1.0;
    };
    let rest = chars.as_str();
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        return multiplier;
    }
    if BASE_UNITS.iter().any(|unit| rest.starts_with(unit)) {
        multiplier
    } else {
        1.0
    }
}

/// Parse a catalog value into SI base units
///
/// `"100pF"` → 1e-10, `"4.7µF"` → 4.7e-6, `"10kΩ"` → 1e4. Lengths are not
/// rescaled: `"0.90mm"` → 0.90.
pub fn extract_numeric_value(value: &str) -> Option<f64> {
    let (number, suffix) = parse_leading_number(value)?;
    let scaled = number * unit_multiplier(suffix);
    scaled.is_finite().then_some(scaled)
}

/// Leading number without any unit scaling (`"3950K"` → 3950)
pub fn extract_plain_number(value: &str) -> Option<f64> {
    parse_leading_number(value).map(|(n, _)| n)
}

/// Parse a dimension into millimetres
///
/// A metric parenthetical wins (`0.197" Dia (5.00mm)` → 5.00). Otherwise
/// inch and mil values are converted and anything else is read as mm.
pub fn extract_length_mm(value: &str) -> Option<f64> {
    if let Some(caps) = METRIC_PARENTHETICAL.captures(value) {
        if let Ok(mm) = caps[1].parse::<f64>() {
            return Some(mm);
        }
    }

    let (number, suffix) = parse_leading_number(value)?;
    let lower = suffix.to_lowercase();
    let mm = if suffix.starts_with('"') || lower.starts_with("in") {
        number * MM_PER_INCH
    } else if lower.starts_with("mil") {
        number * MM_PER_INCH / 1000.0
    } else if lower.starts_with("cm") {
        number * 10.0
    } else {
        number
    };
    Some(mm)
}

/// Parse an interval such as `"-55°C ~ 125°C"`, `"2.7V to 5.5V"` or `"±10%"`
///
/// A single value is a degenerate interval. Bounds come back ordered.
pub fn parse_interval(value: &str) -> Option<(f64, f64)> {
    let trimmed = value.trim();

    if let Some(rest) = trimmed.strip_prefix('±') {
        let v = extract_numeric_value(rest)?.abs();
        return Some((-v, v));
    }

    let parts: Vec<&str> = if trimmed.contains('~') {
        trimmed.split('~').collect()
    } else if let Some(idx) = trimmed.find(" to ").or_else(|| trimmed.find(" TO ")) {
        vec![&trimmed[..idx], &trimmed[idx + 4..]]
    } else {
        vec![trimmed]
    };

    match parts.as_slice() {
        [single] => {
            let v = extract_numeric_value(single)?;
            Some((v, v))
        }
        [low, high] => {
            let a = extract_numeric_value(low)?;
            let b = extract_numeric_value(high)?;
            Some((a.min(b), a.max(b)))
        }
        _ => None,
    }
}

/// Relative equality for values spanning pico to mega scales
pub fn approx_eq(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: Option<f64>, expected: f64) -> bool {
        actual.is_some_and(|v| (v - expected).abs() <= expected.abs() * 1e-9)
    }

    #[test]
    fn test_extract_capacitance() {
        assert!(close(extract_numeric_value("100pF"), 1.0e-10));
        assert!(close(extract_numeric_value("4.7µF"), 4.7e-6));
        assert!(close(extract_numeric_value("4.7μF"), 4.7e-6));
        assert!(close(extract_numeric_value("0.1uF"), 1.0e-7));
        assert!(close(extract_numeric_value("10 nF"), 1.0e-8));
    }

    #[test]
    fn test_extract_resistance() {
        assert!(close(extract_numeric_value("10kΩ"), 1.0e4));
        assert!(close(extract_numeric_value("4.7 kOhms"), 4.7e3));
        assert!(close(extract_numeric_value("50mOhm"), 0.05));
        assert!(close(extract_numeric_value("1M"), 1.0e6));
        assert!(close(extract_numeric_value("100 Ohms"), 100.0));
    }

    #[test]
    fn test_length_not_rescaled() {
        assert!(close(extract_numeric_value("0.90mm"), 0.90));
        assert!(close(extract_numeric_value("10mil"), 10.0));
    }

    #[test]
    fn test_non_prefix_suffixes() {
        assert!(close(extract_numeric_value("125°C"), 125.0));
        assert!(close(extract_numeric_value("±10%"), 10.0));
        assert!(close(extract_numeric_value("±30ppm/°C"), 30.0));
        assert!(close(extract_numeric_value("1 (Unlimited)"), 1.0));
        assert!(close(extract_numeric_value("-40°C"), -40.0));
    }

    #[test]
    fn test_other_units() {
        assert!(close(extract_numeric_value("100mA"), 0.1));
        assert!(close(extract_numeric_value("16MHz"), 1.6e7));
        assert!(close(extract_numeric_value("35ns"), 3.5e-8));
        assert!(close(extract_numeric_value("1,200V"), 1200.0));
        assert!(close(extract_numeric_value("1.5e3 Hz"), 1500.0));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(extract_numeric_value("X7R"), None);
        assert_eq!(extract_numeric_value(""), None);
        assert_eq!(extract_numeric_value("-"), None);
        assert_eq!(extract_numeric_value("Fast Recovery =< 500ns"), None);
    }

    #[test]
    fn test_length_mm() {
        assert!(close(extract_length_mm("0.197\" Dia (5.00mm)"), 5.0));
        assert!(close(extract_length_mm("0.035\" (0.90mm)"), 0.90));
        assert!(close(extract_length_mm("0.100\""), 2.54));
        assert!(close(extract_length_mm("1.60mm"), 1.60));
        assert_eq!(extract_length_mm("Radial"), None);
    }

    #[test]
    fn test_plain_number() {
        assert!(close(extract_plain_number("3950K"), 3950.0));
    }

    #[test]
    fn test_parse_interval() {
        assert_eq!(parse_interval("-55°C ~ 125°C"), Some((-55.0, 125.0)));
        let (lo, hi) = parse_interval("2.7V to 5.5V").unwrap();
        assert!(approx_eq(lo, 2.7) && approx_eq(hi, 5.5));
        assert_eq!(parse_interval("5V"), Some((5.0, 5.0)));
        assert_eq!(parse_interval("±10%"), Some((-10.0, 10.0)));
        assert_eq!(parse_interval("125°C ~ -40°C"), Some((-40.0, 125.0)));
        assert_eq!(parse_interval("Adjustable"), None);
        assert_eq!(parse_interval("1V ~ n/a"), None);
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(1e-7, 1.0000000000001e-7));
        assert!(!approx_eq(1e-7, 1.1e-7));
        assert!(approx_eq(0.0, 0.0));
    }
}

//! Shared helper functions for CLI commands

use std::path::Path;

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Optional value for a table cell; absent shows as "-"
pub fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

/// Numeric value in compact form for table cells
pub fn format_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 && (v.abs() < 1e-3 || v.abs() >= 1e6) => format!("{:e}", v),
        Some(v) => format!("{}", v),
        None => "-".to_string(),
    }
}

/// Display name for an input path ("stdin" for `-`)
pub fn input_name(path: &Path) -> String {
    if path.as_os_str() == crate::core::loader::STDIN {
        "stdin".to_string()
    } else {
        path.display().to_string()
    }
}

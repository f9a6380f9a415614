//! Small helpers for emitting shader source text.

/// Indent every non-blank line of `source` by `indent_levels` four-space steps.
///
/// Trailing whitespace is stripped and blank lines stay empty so generated
/// sources diff cleanly.
pub(crate) fn indent_source(source: &str, indent_levels: usize) -> String {
    let indent = "    ".repeat(indent_levels);
    source
        .replace("\r\n", "\n")
        .lines()
        .map(|line| {
            let line = line.trim_end();
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a float as a shader literal that always carries a decimal point.
///
/// GLSL ES rejects implicit int -> float conversions, so `1` must be `1.0`.
pub(crate) fn fmt_float(v: f32) -> String {
    if !v.is_finite() {
        return "0.0".to_string();
    }
    let s = format!("{v:.9}");
    let s = s.trim_end_matches('0');
    if s.ends_with('.') {
        format!("{s}0")
    } else {
        s.to_string()
    }
}

/// Returns true when `name` can be used as the start of a C-family identifier.
pub(crate) fn is_identifier_prefix(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_float_keeps_decimal_point() {
        assert_eq!(fmt_float(1.0), "1.0");
        assert_eq!(fmt_float(0.25), "0.25");
        assert_eq!(fmt_float(-2.0), "-2.0");
        assert_eq!(fmt_float(f32::NAN), "0.0");
    }

    #[test]
    fn indent_skips_blank_lines() {
        assert_eq!(indent_source("a;\n\n  b;  ", 1), "    a;\n\n      b;");
    }

    #[test]
    fn identifier_prefix_rules() {
        assert!(is_identifier_prefix("cc_"));
        assert!(is_identifier_prefix("_x9"));
        assert!(!is_identifier_prefix(""));
        assert!(!is_identifier_prefix("9a"));
        assert!(!is_identifier_prefix("a-b"));
    }
}

//! String utilities for the domain layer.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// `max_len` counts bytes; the cut moves back to the nearest char boundary.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3).min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

/// Canonical form of a claim used to decide whether two key points are the same.
///
/// Lower-cases, trims, collapses internal whitespace and drops trailing
/// sentence punctuation.
pub fn normalize_claim(s: &str) -> String {
    let collapsed = s.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches(['.', '!', '?', ';', ':'])
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_multibyte() {
        // "é" is 2 bytes: target 4 lands mid-char and backs off to 3
        assert_eq!(truncate("abcééé", 7), "abc...");
    }

    #[test]
    fn test_normalize_claim() {
        assert_eq!(
            normalize_claim("  Tests   reduce regressions. "),
            "tests reduce regressions"
        );
        assert_eq!(normalize_claim("Tests reduce regressions"), "tests reduce regressions");
    }
}

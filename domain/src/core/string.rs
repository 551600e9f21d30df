//! String utilities for the domain layer.

/// Truncate a string to a maximum number of characters, appending an
/// ellipsis marker when truncation occurs.
///
/// Counts characters rather than bytes, so multibyte input is never cut
/// mid-codepoint.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_chars).collect();
        out.push_str("...");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello world", 8), "hello wo...");
    }

    #[test]
    fn test_truncate_exact_boundary() {
        assert_eq!(truncate_chars("0123456789", 10), "0123456789");
        assert_eq!(truncate_chars("0123456789x", 10), "0123456789...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_chars("日本語テスト", 10), "日本語テスト");
        assert_eq!(truncate_chars("日本語テスト文字列", 5), "日本語テス...");
    }

    #[test]
    fn test_truncate_emoji() {
        assert_eq!(truncate_chars("👋🌍🎉", 2), "👋🌍...");
    }
}

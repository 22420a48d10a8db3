//! Small text helpers shared by the rule implementations.

/// Truncate a string to at most `max_len` bytes without splitting a UTF-8
/// character. Page markup arrives from the browser as arbitrary Unicode, so
/// a plain byte slice would panic on multibyte boundaries.
#[must_use]
pub fn truncate_on_char_boundary(input: &str, max_len: usize) -> String {
    if input.len() <= max_len {
        return input.to_string();
    }
    let mut end = max_len;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    input[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_strings_pass_through() {
        assert_eq!(truncate_on_char_boundary("<img>", 300), "<img>");
    }

    #[test]
    fn truncation_respects_utf8_boundaries() {
        // "é" is two bytes; cutting at byte 5 would land mid-character
        let input = "abcdé rest of the markup";
        let out = truncate_on_char_boundary(input, 5);
        assert_eq!(out, "abcd");
        assert!(out.len() <= 5);
    }

    #[test]
    fn exact_boundary_is_kept() {
        let input = "abcdef";
        assert_eq!(truncate_on_char_boundary(input, 6), "abcdef");
        assert_eq!(truncate_on_char_boundary(input, 4), "abcd");
    }
}

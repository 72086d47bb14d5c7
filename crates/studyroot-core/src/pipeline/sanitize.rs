//! Text cleanup for model output

const BACKSPACE: char = '\u{0008}';

/// Normalize generated text before it is persisted or returned.
///
/// Drops control characters (keeping newline, carriage return and tab),
/// strips trailing whitespace from every line and trims the whole text.
pub fn sanitize(text: &str) -> String {
    let filtered: String = text
        .chars()
        .filter(|&c| c != BACKSPACE && (c >= ' ' || matches!(c, '\n' | '\r' | '\t')))
        .collect();

    filtered
        .split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Decode bytes as UTF-8, silently dropping invalid sequences
pub fn repair_utf8(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_backspace_and_trailing_spaces() {
        assert_eq!(sanitize("a \u{0008}\nb  \n"), "a\nb");
    }

    #[test]
    fn test_control_characters_removed() {
        assert_eq!(sanitize("bell\u{0007} and null\u{0000}"), "bell and null");
        assert_eq!(sanitize("tab\there"), "tab\there");
    }

    #[test]
    fn test_inner_blank_lines_kept() {
        assert_eq!(sanitize("  \n\nTitle\n\nBody\t\n\n"), "Title\n\nBody");
    }

    #[test]
    fn test_crlf_lines_trimmed() {
        // trim_end removes the carriage return along with other trailing whitespace
        assert_eq!(sanitize("one  \r\ntwo\r\n"), "one\ntwo");
    }

    #[test]
    fn test_repair_utf8_drops_invalid_bytes() {
        assert_eq!(repair_utf8(b"caf\xc3\xa9"), "café");
        assert_eq!(repair_utf8(b"ok\xff\xfe then"), "ok then");
        assert_eq!(repair_utf8(b"cut \xe2\x82"), "cut ");
    }

    proptest! {
        #[test]
        fn prop_sanitize_is_idempotent(s in "\\PC{0,80}|[ a-z\\n\\t\\x08\\x01]{0,80}") {
            let once = sanitize(&s);
            prop_assert_eq!(sanitize(&once), once.clone());
        }

        #[test]
        fn prop_repair_utf8_keeps_valid_text(s in "\\PC{0,80}") {
            prop_assert_eq!(repair_utf8(s.as_bytes()), s);
        }
    }
}

//! C++ string literal escaping.

/// Renders `text` as a double-quoted C++ string literal.
///
/// `\\`, `"`, `\n`, `\r` and `\t` use their short escapes. Every other
/// control byte, ESC included, becomes a three-digit octal escape so that a
/// following digit is never read as part of it. Non-ASCII text is kept as is.
pub fn quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => out.push_str(&format!("\\{:03o}", c as u8)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_escapes() {
        assert_eq!(quoted("a\"b\\c\n\r\t"), r#""a\"b\\c\n\r\t""#);
    }

    #[test]
    fn test_escape_sequences_use_fixed_width_octal() {
        assert_eq!(quoted("\u{1b}[31m1"), r#""\033[31m1""#);
        assert_eq!(quoted("\0"), r#""\000""#);
        assert_eq!(quoted("\u{7f}"), r#""\177""#);
    }

    #[test]
    fn test_every_other_control_byte_is_octal() {
        for byte in (0u8..0x20).chain([0x7f]) {
            if matches!(byte, b'\n' | b'\r' | b'\t') {
                continue;
            }
            let expected = format!("\"\\{byte:03o}\"");
            assert_eq!(quoted(&char::from(byte).to_string()), expected);
        }
    }

    #[test]
    fn test_printable_text_is_untouched() {
        assert_eq!(quoted("Temp: %d°C"), "\"Temp: %d°C\"");
        assert_eq!(quoted(""), "\"\"");
    }
}

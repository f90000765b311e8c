//! HTML output encoding.

/// Escape text for inclusion in HTML element content or quoted attributes.
///
/// Covers `&`, `<`, `>`, `"` and `'`; single quotes become `&#039;`.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(html_escape("Milk 2%"), "Milk 2%");
        assert_eq!(html_escape(""), "");
    }

    #[test]
    fn test_special_characters() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#039;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_existing_entities_are_escaped_again() {
        assert_eq!(html_escape("&amp;"), "&amp;amp;");
    }
}

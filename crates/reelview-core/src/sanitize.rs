//! Display-time text sanitization. Stored comments keep whatever the
//! author wrote; markup is stripped only when text is rendered.

/// Strip HTML tags from user-supplied text, keeping the text content.
/// Unterminated tags are dropped through end of input.
pub fn sanitize_text(dirty: &str) -> String {
    let mut clean = String::with_capacity(dirty.len());
    let mut in_tag = false;
    for c in dirty.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => clean.push(c),
            _ => {}
        }
    }
    clean
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_simple_tags() {
        assert_eq!(sanitize_text("<b>great</b> movie"), "great movie");
        assert_eq!(
            sanitize_text("<a href=\"http://x\">link</a>"),
            "link"
        );
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(sanitize_text("just a plain comment"), "just a plain comment");
        assert_eq!(sanitize_text(""), "");
    }

    #[test]
    fn unterminated_tag_is_dropped() {
        assert_eq!(sanitize_text("before <img src=x"), "before ");
    }

    #[test]
    fn nested_markup_keeps_inner_text() {
        assert_eq!(
            sanitize_text("<div><p>two <em>layers</em></p></div>"),
            "two layers"
        );
    }
}

//! Text content and `{{ }}` interpolation.

/// A segment of a text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextPart<'a> {
    Static(&'a str),
    /// The expression inside `{{ }}`, untrimmed.
    Interpolation(&'a str),
}

/// Splits text into static runs and interpolations. An unclosed `{{` is
/// treated as static text.
pub(crate) fn split_interpolations(text: &str) -> Vec<TextPart<'_>> {
    let mut parts = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find("{{") {
        let Some(close) = rest[open + 2..].find("}}") else {
            break;
        };
        if open > 0 {
            parts.push(TextPart::Static(&rest[..open]));
        }
        parts.push(TextPart::Interpolation(&rest[open + 2..open + 2 + close]));
        rest = &rest[open + 2 + close + 2..];
    }

    if !rest.is_empty() {
        parts.push(TextPart::Static(rest));
    }
    parts
}

/// Collapses whitespace runs to a single space.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Escapes characters JSX does not accept in text.
pub(crate) fn escape_jsx_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '{' => out.push_str("{'{'}"),
            '}' => out.push_str("{'}'}"),
            '>' => out.push_str("&gt;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(c),
        }
    }
    out
}

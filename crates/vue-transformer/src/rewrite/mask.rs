//! Literal masking.
//!
//! String literals, template-literal text, comments and regular expressions
//! are swapped for numbered placeholders so identifier scanning never sees
//! their content. Code inside `${ ... }` substitutions stays unmasked.

use super::RewriteError;

pub(crate) const LITERAL_OPEN: char = '\u{E000}';
pub(crate) const LITERAL_CLOSE: char = '\u{E001}';
pub(crate) const MATCH_OPEN: char = '\u{E002}';
pub(crate) const MATCH_CLOSE: char = '\u{E003}';

/// Masked code plus the table of original literal text.
#[derive(Debug, Clone, Default)]
pub(crate) struct Masked {
    pub code: String,
    literals: Vec<String>,
    /// Byte ranges of the masked literals in the original text.
    spans: Vec<(usize, usize)>,
}

impl Masked {
    fn push_literal(&mut self, text: &str) {
        self.code.push(LITERAL_OPEN);
        self.code.push_str(&self.literals.len().to_string());
        self.code.push(LITERAL_CLOSE);
        self.literals.push(text.to_string());
    }

    /// Replaces every literal placeholder in `text` with its original text.
    pub fn restore(&self, text: &str) -> String {
        substitute(text, LITERAL_OPEN, LITERAL_CLOSE, &self.literals)
    }
}

/// Replaces `open N close` placeholders with `table[N]`.
pub(crate) fn substitute(text: &str, open: char, close: char, table: &[String]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(open) {
        out.push_str(&rest[..start]);
        let after = &rest[start + open.len_utf8()..];
        let Some(end) = after.find(close) else {
            out.push_str(&rest[start..]);
            return out;
        };
        match after[..end].parse::<usize>().ok().and_then(|i| table.get(i)) {
            Some(original) => out.push_str(original),
            None => out.push_str(&rest[start..start + open.len_utf8() + end + close.len_utf8()]),
        }
        rest = &after[end + close.len_utf8()..];
    }

    out.push_str(rest);
    out
}

/// Masks the literals of `text`.
pub(crate) fn mask(text: &str) -> Result<Masked, RewriteError> {
    let bytes = text.as_bytes();
    let mut masked = Masked {
        code: String::with_capacity(text.len()),
        literals: Vec::new(),
        spans: Vec::new(),
    };
    // Brace depth of each open `${` substitution.
    let mut template_stack: Vec<usize> = Vec::new();
    let mut depth = 0usize;
    let mut pos = 0;
    let mut code_start = 0;

    while pos < bytes.len() {
        let b = bytes[pos];
        let literal_end = match b {
            b'\'' | b'"' => Some(scan_string(bytes, pos)?),
            b'`' => Some(scan_template_chunk(bytes, pos + 1, pos)?),
            b'}' if template_stack.last() == Some(&depth) => {
                template_stack.pop();
                Some(scan_template_chunk(bytes, pos + 1, pos)?)
            }
            b'/' if bytes.get(pos + 1) == Some(&b'/') => Some(
                text[pos..]
                    .find('\n')
                    .map(|n| pos + n)
                    .unwrap_or(bytes.len()),
            ),
            b'/' if bytes.get(pos + 1) == Some(&b'*') => Some(
                text[pos + 2..]
                    .find("*/")
                    .map(|n| pos + 2 + n + 2)
                    .unwrap_or(bytes.len()),
            ),
            b'/' if regex_allowed(&text[..pos]) => scan_regex(bytes, pos),
            b'{' => {
                depth += 1;
                None
            }
            b'}' => {
                depth = depth.saturating_sub(1);
                None
            }
            _ => None,
        };

        match literal_end {
            Some(end) => {
                masked.code.push_str(&text[code_start..pos]);
                masked.push_literal(&text[pos..end]);
                masked.spans.push((pos, end));
                // A template chunk ending in `${` opens a substitution.
                if text[pos..end].ends_with("${") && (b == b'`' || b == b'}') {
                    template_stack.push(depth);
                }
                pos = end;
                code_start = end;
            }
            None => pos += 1,
        }
    }

    masked.code.push_str(&text[code_start..]);
    Ok(masked)
}

/// For each line of `text`, whether it starts inside a literal or comment
/// that began on an earlier line. Text that fails to mask has no such lines.
pub(crate) fn lines_inside_literals(text: &str) -> Vec<bool> {
    let spans = mask(text).map(|masked| masked.spans).unwrap_or_default();
    let mut offset = 0;
    text.split_inclusive('\n')
        .map(|line| {
            let inside = spans.iter().any(|&(start, end)| start < offset && offset < end);
            offset += line.len();
            inside
        })
        .collect()
}

/// Returns the end offset of the quoted string starting at `start`.
fn scan_string(bytes: &[u8], start: usize) -> Result<usize, RewriteError> {
    let quote = bytes[start];
    let mut pos = start + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b if b == quote => return Ok(pos + 1),
            b'\n' => break,
            _ => pos += 1,
        }
    }
    Err(RewriteError::UnterminatedLiteral { offset: start })
}

/// Scans template-literal text from `pos` up to and including the closing
/// backtick or the next `${`.
fn scan_template_chunk(bytes: &[u8], mut pos: usize, start: usize) -> Result<usize, RewriteError> {
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'`' => return Ok(pos + 1),
            b'$' if bytes.get(pos + 1) == Some(&b'{') => return Ok(pos + 2),
            _ => pos += 1,
        }
    }
    Err(RewriteError::UnterminatedLiteral { offset: start })
}

/// Returns true if a `/` after `before` starts a regular expression rather
/// than a division.
fn regex_allowed(before: &str) -> bool {
    let trimmed = before.trim_end();
    match trimmed.chars().last() {
        None => true,
        Some(c) if "(,=:[!&|?{};+-*%<>~^".contains(c) => true,
        Some(_) => {
            let word_start = trimmed
                .char_indices()
                .rev()
                .find(|(_, c)| !crate::naming::is_ident_char(*c))
                .map(|(i, c)| i + c.len_utf8())
                .unwrap_or(0);
            matches!(
                &trimmed[word_start..],
                "return" | "typeof" | "case" | "in" | "of" | "delete" | "void"
            )
        }
    }
}

/// Returns the end offset of a regular expression literal, or `None` if the
/// line ends before the closing slash.
fn scan_regex(bytes: &[u8], start: usize) -> Option<usize> {
    let mut pos = start + 1;
    let mut in_class = false;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'\n' => return None,
            b'[' => {
                in_class = true;
                pos += 1;
            }
            b']' => {
                in_class = false;
                pos += 1;
            }
            b'/' if !in_class => {
                pos += 1;
                while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
                    pos += 1;
                }
                return Some(pos);
            }
            _ => pos += 1,
        }
    }
    None
}

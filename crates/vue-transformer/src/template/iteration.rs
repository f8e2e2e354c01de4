//! `v-for` clause parsing.

use crate::naming::is_identifier;

/// Literal counts above this are iterated as ordinary expressions.
const MAX_LITERAL_COUNT: usize = 1000;

/// A parsed `v-for` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForClause {
    /// The item binding; may be a destructuring pattern.
    pub item: String,
    /// The index binding, when written.
    pub index: Option<String>,
    /// The iterated expression.
    pub source: String,
}

impl ForClause {
    /// Parses `item in source`, `(item, index) in source` or the `of` forms.
    pub fn parse(clause: &str) -> Option<Self> {
        let (bindings, source) = split_clause(clause)?;
        let source = source.trim();
        if source.is_empty() {
            return None;
        }

        let bindings = bindings.trim();
        let inner = bindings
            .strip_prefix('(')
            .and_then(|b| b.strip_suffix(')'))
            .unwrap_or(bindings);
        let parts = split_top_level(inner);

        let (item, index) = match parts.as_slice() {
            [item] => (item.trim(), None),
            // The third binding (object index) is dropped.
            [item, index, ..] => (item.trim(), Some(index.trim())),
            [] => return None,
        };
        if item.is_empty() || !is_binding(item) {
            return None;
        }
        if let Some(index) = index {
            if !is_identifier(index) {
                return None;
            }
        }

        Some(Self {
            item: item.to_string(),
            index: index.map(str::to_string),
            source: source.to_string(),
        })
    }

    /// Every name bound by the clause.
    pub fn bound_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .item
            .split(|c: char| !crate::naming::is_ident_char(c))
            .filter(|w| is_identifier(w))
            .map(str::to_string)
            .collect();
        names.extend(self.index.clone());
        names
    }

    /// The literal count when the source is a small non-negative integer.
    pub fn literal_count(&self) -> Option<usize> {
        if !self.source.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        self.source
            .parse()
            .ok()
            .filter(|count| *count <= MAX_LITERAL_COUNT)
    }
}

/// Splits on the first standalone ` in ` / ` of ` outside brackets.
fn split_clause(clause: &str) -> Option<(&str, &str)> {
    let bytes = clause.as_bytes();
    let mut depth = 0usize;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b' ' | b'\t' | b'\n' if depth == 0 => {
                let rest = &clause[i + 1..];
                for keyword in ["in", "of"] {
                    if let Some(after) = rest.strip_prefix(keyword) {
                        if after.starts_with(char::is_whitespace) {
                            return Some((&clause[..i], after));
                        }
                    }
                }
            }
            _ => {}
        }
    }
    None
}

fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if !text[start..].trim().is_empty() || !parts.is_empty() {
        parts.push(&text[start..]);
    }
    parts
}

fn is_binding(item: &str) -> bool {
    is_identifier(item)
        || (item.starts_with('{') && item.ends_with('}'))
        || (item.starts_with('[') && item.ends_with(']'))
}

/// Expands a literal count into `[0, 1, ..., n - 1]`.
pub fn literal_sequence(count: usize) -> String {
    let items: Vec<String> = (0..count).map(|i| i.to_string()).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_binding() {
        assert_eq!(
            ForClause::parse("item in items"),
            Some(ForClause {
                item: "item".into(),
                index: None,
                source: "items".into()
            })
        );
    }

    #[test]
    fn test_paired_binding_and_of() {
        let clause = ForClause::parse("(row, i) of table.rows").expect("clause should parse");
        assert_eq!(clause.item, "row");
        assert_eq!(clause.index.as_deref(), Some("i"));
        assert_eq!(clause.source, "table.rows");
    }

    #[test]
    fn test_destructured_item() {
        let clause = ForClause::parse("({ id, name }, index) in users").expect("clause should parse");
        assert_eq!(clause.item, "{ id, name }");
        assert_eq!(clause.bound_names(), vec!["id", "name", "index"]);
    }

    #[test]
    fn test_literal_count() {
        let clause = ForClause::parse("n in 5").expect("clause should parse");
        assert_eq!(clause.literal_count(), Some(5));
        assert_eq!(literal_sequence(5), "[0, 1, 2, 3, 4]");
        assert_eq!(literal_sequence(0), "[]");
    }

    #[test]
    fn test_invalid_clauses() {
        assert_eq!(ForClause::parse("items"), None);
        assert_eq!(ForClause::parse("item in "), None);
        assert_eq!(ForClause::parse("1x in items"), None);
        assert_eq!(ForClause::parse("(a, b-c) in items"), None);
    }
}

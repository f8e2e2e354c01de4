//! Fixed translations of Vue instance helpers.

use crate::context::ComponentShape;
use crate::naming::is_ident_char;

/// Applies the idiom table to reconstructed code. Literal placeholders are
/// still in place, so literal content is never touched.
pub(crate) fn apply(shape: ComponentShape, code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut pos = 0;

    while let Some(found) = code[pos..].find('$') {
        let dollar = pos + found;
        let before = &code[..dollar];
        let this_prefixed = before.ends_with("this.") && is_boundary(&before[..before.len() - 5]);
        if !this_prefixed && !is_boundary(before) {
            out.push_str(&code[pos..dollar + 1]);
            pos = dollar + 1;
            continue;
        }

        let start = if this_prefixed { dollar - 5 } else { dollar };
        match translate(shape, code, dollar) {
            Some((replacement, end)) => {
                out.push_str(&code[pos..start]);
                out.push_str(&replacement);
                pos = end;
            }
            None => {
                out.push_str(&code[pos..dollar + 1]);
                pos = dollar + 1;
            }
        }
    }

    out.push_str(&code[pos..]);
    out
}

fn is_boundary(before: &str) -> bool {
    before
        .chars()
        .next_back()
        .map_or(true, |c| !is_ident_char(c) && c != '.')
}

/// Translates the helper starting at `dollar`. Returns the replacement and the
/// offset just past the consumed text.
fn translate(shape: ComponentShape, code: &str, dollar: usize) -> Option<(String, usize)> {
    let rest = &code[dollar..];
    let word_len = rest[1..]
        .char_indices()
        .find(|(_, c)| !is_ident_char(*c))
        .map(|(i, _)| i + 1)
        .unwrap_or(rest.len());
    let word = &rest[..word_len];
    let after = dollar + word_len;

    match word {
        "$emit" if code[after..].starts_with('(') => {
            let call_end = after + 1;
            let no_args = code[call_end..].trim_start().starts_with(')');
            let replacement = match (shape, no_args) {
                (ComponentShape::Function, false) => "ComponentUtils.emit(props, ",
                (ComponentShape::Function, true) => "ComponentUtils.emit(props",
                (ComponentShape::Class, _) => "this.emit(",
            };
            Some((replacement.to_string(), call_end))
        }
        "$nextTick" if code[after..].starts_with('(') => {
            let replacement = match shape {
                ComponentShape::Function => "ComponentUtils.debounce(",
                ComponentShape::Class => "this.debounce(",
            };
            Some((replacement.to_string(), after + 1))
        }
        "$refs" => {
            let (argument, end) = reference_argument(code, after)?;
            let replacement = match shape {
                ComponentShape::Function => format!("ComponentUtils.getReference({})", argument),
                ComponentShape::Class => format!("this.getReference({})", argument),
            };
            Some((replacement, end))
        }
        "$event" => Some(("event".to_string(), after)),
        _ => None,
    }
}

/// Reads `.name` or `[expr]` after `$refs`.
fn reference_argument(code: &str, pos: usize) -> Option<(String, usize)> {
    let rest = &code[pos..];
    if let Some(member) = rest.strip_prefix('.') {
        let len = member
            .char_indices()
            .find(|(_, c)| !is_ident_char(*c))
            .map(|(i, _)| i)
            .unwrap_or(member.len());
        if len == 0 {
            return None;
        }
        return Some((format!("'{}'", &member[..len]), pos + 1 + len));
    }
    if rest.starts_with('[') {
        let mut depth = 0usize;
        for (i, c) in rest.char_indices() {
            match c {
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some((rest[1..i].trim().to_string(), pos + i + 1));
                    }
                }
                _ => {}
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_function_shape_idioms() {
        let shape = ComponentShape::Function;
        assert_eq!(
            apply(shape, "this.$emit('change', v)"),
            "ComponentUtils.emit(props, 'change', v)"
        );
        assert_eq!(apply(shape, "$emit()"), "ComponentUtils.emit(props)");
        assert_eq!(
            apply(shape, "this.$nextTick(() => f())"),
            "ComponentUtils.debounce(() => f())"
        );
        assert_eq!(
            apply(shape, "this.$refs.input.focus()"),
            "ComponentUtils.getReference('input').focus()"
        );
        assert_eq!(apply(shape, "f($event)"), "f(event)");
    }

    #[test]
    fn test_class_shape_idioms() {
        let shape = ComponentShape::Class;
        assert_eq!(apply(shape, "this.$emit('close')"), "this.emit('close')");
        assert_eq!(
            apply(shape, "this.$refs['list'].scrollTop"),
            "this.getReference('list').scrollTop"
        );
    }

    #[test]
    fn test_foreign_members_are_untouched() {
        let shape = ComponentShape::Function;
        assert_eq!(apply(shape, "vm.$emit('x')"), "vm.$emit('x')");
        assert_eq!(apply(shape, "price$ + $store"), "price$ + $store");
    }
}

//! Identifier resolution over masked code.

use super::mask::{substitute, MATCH_CLOSE, MATCH_OPEN};
use super::{Flag, FlagKind, RewriteOptions};
use crate::context::{Category, ComponentShape, Context};
use crate::naming::{is_ident_char, is_ident_start};
use rustc_hash::FxHashSet;

/// How far back a declaration keyword may appear before a bound name.
const DECLARATION_LOOKBACK: usize = 48;

/// A captured assignment operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssignOp {
    Assign,
    /// `+=`, `-=`, `*=`, `/=` with the arithmetic operator.
    Compound(char),
    Increment,
    Decrement,
}

impl AssignOp {
    fn source_text(&self) -> String {
        match self {
            AssignOp::Assign => "=".to_string(),
            AssignOp::Compound(op) => format!("{}=", op),
            AssignOp::Increment => "++".to_string(),
            AssignOp::Decrement => "--".to_string(),
        }
    }
}

/// One resolved reference.
struct MatchRecord<'t> {
    category: Category,
    name: &'t str,
    /// Whether the call site is immediately invoked (`name(`).
    invoked: bool,
    assignment: Option<(AssignOp, String)>,
}

pub(crate) struct Resolver<'a> {
    ctx: &'a Context,
    options: &'a RewriteOptions,
    locals: FxHashSet<String>,
    matches: Vec<String>,
    pub(crate) flags: Vec<Flag>,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(ctx: &'a Context, options: &'a RewriteOptions) -> Self {
        Self {
            ctx,
            options,
            locals: options.locals.iter().map(|l| l.to_string()).collect(),
            matches: Vec::new(),
            flags: Vec::new(),
        }
    }

    /// Runs the explicit pass and, when enabled, the bare-identifier pass.
    /// Resolved references are left as match placeholders.
    pub(crate) fn resolve(&mut self, code: &str) -> String {
        let explicit = self.explicit_pass(code);
        if self.options.bare_identifiers {
            self.bare_pass(&explicit)
        } else {
            explicit
        }
    }

    /// Replaces match placeholders with their rendered text.
    pub(crate) fn expand(&self, code: &str) -> String {
        substitute(code, MATCH_OPEN, MATCH_CLOSE, &self.matches)
    }

    fn explicit_pass(&mut self, code: &str) -> String {
        let mut out = String::with_capacity(code.len());
        let mut pos = 0;

        while let Some(found) = code[pos..].find("this.") {
            let start = pos + found;
            out.push_str(&code[pos..start]);
            let prefix_end = start + "this.".len();

            let boundary = code[..start]
                .chars()
                .next_back()
                .map_or(true, |c| !is_ident_char(c) && c != '.');
            if !boundary {
                out.push_str("this.");
                pos = prefix_end;
                continue;
            }

            let (forced_prop, name_start) = if code[prefix_end..].starts_with("props.") {
                (true, prefix_end + "props.".len())
            } else {
                (false, prefix_end)
            };
            let name_end = ident_end(code, name_start);
            let name = &code[name_start..name_end];
            let category = if name.is_empty() {
                None
            } else if forced_prop {
                Some(Category::Prop)
            } else {
                self.ctx.classify(name)
            };

            match category {
                Some(category) => pos = self.record(code, &mut out, category, name, name_end),
                None => {
                    out.push_str(&code[start..name_end]);
                    pos = name_end;
                }
            }
        }

        out.push_str(&code[pos..]);
        out
    }

    fn bare_pass(&mut self, code: &str) -> String {
        let mut out = String::with_capacity(code.len());
        let mut pos = 0;
        let mut copied = 0;

        while pos < code.len() {
            let Some(c) = code[pos..].chars().next() else {
                break;
            };
            if !is_ident_char(c) {
                pos += c.len_utf8();
                continue;
            }

            let end = ident_end(code, pos);
            let word = &code[pos..end];
            let category = if is_ident_start(c) && !self.rejects(code, pos, end) {
                self.ctx.classify(word)
            } else {
                None
            };

            if let Some(category) = category {
                out.push_str(&code[copied..pos]);
                let next = self.record(code, &mut out, category, word, end);
                copied = next;
                pos = next;
            } else {
                pos = end.max(pos + c.len_utf8());
            }
        }

        out.push_str(&code[copied..]);
        out
    }

    /// Returns true if the bare word at `start..end` is not a reference to a
    /// component declaration.
    fn rejects(&mut self, code: &str, start: usize, end: usize) -> bool {
        let word = &code[start..end];
        let before = &code[..start];

        // Member access on some other object.
        if before.ends_with('.') && !before.ends_with("...") {
            return true;
        }
        if is_object_key(code, start, end) {
            return true;
        }
        if self.locals.contains(word) {
            return true;
        }
        if in_declaration(before) {
            self.locals.insert(word.to_string());
            return true;
        }
        false
    }

    /// Captures an assignment after a resolved name, renders the reference and
    /// pushes its placeholder. Returns the offset where scanning resumes.
    fn record(
        &mut self,
        code: &str,
        out: &mut String,
        category: Category,
        name: &str,
        name_end: usize,
    ) -> usize {
        let mut resume = name_end;
        let mut assignment = None;

        if let Some((op, after_op)) = assignment_op(code, name_end) {
            match op {
                AssignOp::Increment | AssignOp::Decrement => {
                    assignment = Some((op, String::new()));
                    resume = after_op;
                }
                AssignOp::Assign | AssignOp::Compound(_) => {
                    let rhs_start = skip_inline_space(code, after_op);
                    let rhs_end = rhs_end(code, rhs_start);
                    let rhs = self.resolve(&code[rhs_start..rhs_end]);
                    assignment = Some((op, self.expand(&rhs)));
                    resume = rhs_end;
                }
            }
        } else if let Some(op) = take_prefix_update(out) {
            assignment = Some((op, String::new()));
        }

        let invoked = code[name_end..].trim_start().starts_with('(');
        let rendered = self.render(&MatchRecord {
            category,
            name,
            invoked,
            assignment,
        });
        out.push(MATCH_OPEN);
        out.push_str(&self.matches.len().to_string());
        out.push(MATCH_CLOSE);
        self.matches.push(rendered);
        resume
    }

    fn render(&mut self, record: &MatchRecord<'_>) -> String {
        let Some((op, rhs)) = &record.assignment else {
            return self.render_read(record);
        };
        let target = self.ctx.target_name(record.name);
        let shape = self.ctx.shape;

        match record.category {
            Category::State => {
                let current = match shape {
                    ComponentShape::Function => target.clone(),
                    ComponentShape::Class => format!("this.state.{}", target),
                };
                let value = combined_value(*op, &current, rhs);
                match shape {
                    ComponentShape::Function => {
                        format!("{}({})", self.ctx.state_setter(record.name), value)
                    }
                    ComponentShape::Class => format!("this.setState({{ {}: {} }})", target, value),
                }
            }
            Category::Computed if shape == ComponentShape::Class => {
                self.flag(FlagKind::ComputedMutation, record.name);
                let value = combined_value(*op, &format!("this.{}()", target), rhs);
                format!(
                    "this.{}({}) /* TODO: WARNING: assignment to computed value '{}' */",
                    crate::naming::setter_name(&target),
                    value,
                    record.name
                )
            }
            category => {
                let (kind, what) = match category {
                    Category::Prop => (FlagKind::PropMutation, "mutation of prop"),
                    Category::Computed => (FlagKind::ComputedMutation, "assignment to computed value"),
                    _ => (FlagKind::MethodAssignment, "assignment to method"),
                };
                self.flag(kind, record.name);
                let read = self.render_read(&MatchRecord {
                    invoked: true,
                    assignment: None,
                    ..*record
                });
                let written = match op {
                    AssignOp::Increment | AssignOp::Decrement => {
                        format!("{}{}", read, op.source_text())
                    }
                    _ => format!("{} {} {}", read, op.source_text(), rhs),
                };
                format!("{} /* TODO: WARNING: {} '{}' */", written, what, record.name)
            }
        }
    }

    fn render_read(&self, record: &MatchRecord<'_>) -> String {
        let target = self.ctx.target_name(record.name);
        let with_event = self.options.event_handler && !record.invoked;

        match (self.ctx.shape, record.category) {
            (ComponentShape::Function, Category::Method) if with_event => {
                format!("{}(event)", target)
            }
            (ComponentShape::Function, Category::Method) => target,
            (ComponentShape::Function, Category::Computed) => format!("computedState.{}", target),
            (ComponentShape::Function, Category::State) => target,
            (ComponentShape::Class, Category::Method) if with_event => {
                format!("this.{}(event)", target)
            }
            (ComponentShape::Class, Category::Method) => format!("this.{}", target),
            (ComponentShape::Class, Category::Computed) => format!("this.{}()", target),
            (ComponentShape::Class, Category::State) => format!("this.state.{}", target),
            (_, Category::Prop) => self.ctx.props_access(record.name),
        }
    }

    fn flag(&mut self, kind: FlagKind, name: &str) {
        self.flags.push(Flag {
            kind,
            name: name.to_string(),
        });
    }
}

/// The value written by an assignment, combining compound operators with
/// the current value.
fn combined_value(op: AssignOp, current: &str, rhs: &str) -> String {
    match op {
        AssignOp::Assign => rhs.to_string(),
        AssignOp::Compound(operator) => format!("{} {} {}", current, operator, parenthesize(rhs)),
        AssignOp::Increment => format!("{} + 1", current),
        AssignOp::Decrement => format!("{} - 1", current),
    }
}

/// Wraps `expr` in parentheses unless it is a single operand.
fn parenthesize(expr: &str) -> String {
    let simple = expr
        .chars()
        .all(|c| is_ident_char(c) || c == '.' || ('\u{E000}'..='\u{E003}').contains(&c));
    if simple && !expr.is_empty() {
        expr.to_string()
    } else {
        format!("({})", expr)
    }
}

/// Whether the word at `start..end` is a key in an object literal: it is
/// followed by `:` and preceded by `{` or `,`.
fn is_object_key(code: &str, start: usize, end: usize) -> bool {
    let after = &code[skip_inline_space(code, end)..];
    if !after.starts_with(':') || after.starts_with("::") {
        return false;
    }
    code[..start]
        .trim_end()
        .chars()
        .next_back()
        .is_some_and(|c| c == '{' || c == ',')
}

fn ident_end(code: &str, start: usize) -> usize {
    code[start..]
        .char_indices()
        .find(|(_, c)| !is_ident_char(*c))
        .map(|(i, _)| start + i)
        .unwrap_or(code.len())
}

fn skip_inline_space(code: &str, pos: usize) -> usize {
    pos + (code[pos..].len() - code[pos..].trim_start_matches([' ', '\t']).len())
}

/// Detects an assignment operator following a reference. Returns the operator
/// and the offset just past it.
fn assignment_op(code: &str, name_end: usize) -> Option<(AssignOp, usize)> {
    let at = skip_inline_space(code, name_end);
    let rest = &code[at..];

    if rest.starts_with("++") {
        return Some((AssignOp::Increment, at + 2));
    }
    if rest.starts_with("--") {
        return Some((AssignOp::Decrement, at + 2));
    }
    let bytes = rest.as_bytes();
    if bytes.len() >= 2
        && matches!(bytes[0], b'+' | b'-' | b'*' | b'/')
        && bytes[1] == b'='
        && bytes.get(2) != Some(&b'=')
    {
        return Some((AssignOp::Compound(bytes[0] as char), at + 2));
    }
    if rest.starts_with('=') && !rest.starts_with("==") && !rest.starts_with("=>") {
        return Some((AssignOp::Assign, at + 1));
    }
    None
}

/// Pops a prefix `++` / `--` that directly precedes a reference.
fn take_prefix_update(out: &mut String) -> Option<AssignOp> {
    let trimmed = out.trim_end_matches([' ', '\t']);
    let op = if trimmed.ends_with("++") {
        AssignOp::Increment
    } else if trimmed.ends_with("--") {
        AssignOp::Decrement
    } else {
        return None;
    };
    let op_start = trimmed.len() - 2;
    // `a++ b` is not a prefix update of `b`.
    let operand_before = trimmed[..op_start]
        .trim_end()
        .chars()
        .next_back()
        .is_some_and(|c| is_ident_char(c) || c == ')' || c == ']' || c == MATCH_CLOSE);
    if operand_before {
        return None;
    }
    out.truncate(op_start);
    Some(op)
}

/// Returns the end of the right-hand side starting at `start`: a top-level
/// `;` or `,`, an unbalanced closer, or a line break that does not continue
/// the expression. Trailing whitespace is left outside the range.
fn rhs_end(code: &str, start: usize) -> usize {
    let bytes = code.as_bytes();
    let mut depth = 0usize;
    let mut pos = start;

    while pos < bytes.len() {
        match bytes[pos] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            b';' | b',' if depth == 0 => break,
            b'\n' if depth == 0 && !continues_expression(&code[start..pos], &code[pos + 1..]) => {
                break
            }
            _ => {}
        }
        pos += 1;
    }

    start + code[start..pos].trim_end().len()
}

/// Whether a line break between `before` and `after` sits inside one
/// expression.
fn continues_expression(before: &str, after: &str) -> bool {
    let ends_with_operator = before
        .trim_end()
        .chars()
        .next_back()
        .is_some_and(|c| "+-*/%&|^=<>?:(".contains(c));
    let next_starts_with_operator = after
        .trim_start()
        .chars()
        .next()
        .is_some_and(|c| "?:.+-*/&|".contains(c));
    ends_with_operator || next_starts_with_operator
}

/// Whether the text before a word ends inside a `let`/`const`/`var` binding
/// list.
fn in_declaration(before: &str) -> bool {
    let mut window_start = before.len().saturating_sub(DECLARATION_LOOKBACK);
    while !before.is_char_boundary(window_start) {
        window_start += 1;
    }
    let window = &before[window_start..];

    // The closest keyword wins.
    let keyword_end = ["let", "const", "var"]
        .iter()
        .filter_map(|keyword| last_keyword(window, keyword))
        .max();
    let Some(keyword_end) = keyword_end else {
        return false;
    };

    let between = &window[keyword_end..];
    !between.contains(['=', ';', '\n', '(', ')'])
        && !between
            .split(|c: char| !is_ident_char(c))
            .any(|w| w == "of" || w == "in")
}

/// Returns the end offset of the last standalone occurrence of `keyword`.
fn last_keyword(text: &str, keyword: &str) -> Option<usize> {
    let mut search = text;
    while let Some(start) = search.rfind(keyword) {
        let end = start + keyword.len();
        let head_ok = search[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !is_ident_char(c) && c != '.');
        let tail_ok = search[end..]
            .chars()
            .next()
            .is_some_and(|c| c.is_whitespace() || c == '{' || c == '[');
        if head_ok && tail_ok {
            return Some(end);
        }
        search = &search[..start];
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_operators() {
        assert_eq!(assignment_op("a = 1", 1), Some((AssignOp::Assign, 3)));
        assert_eq!(assignment_op("a += 1", 1), Some((AssignOp::Compound('+'), 4)));
        assert_eq!(assignment_op("a++", 1), Some((AssignOp::Increment, 3)));
        assert_eq!(assignment_op("a == 1", 1), None);
        assert_eq!(assignment_op("a => 1", 1), None);
        assert_eq!(assignment_op("a - 1", 1), None);
    }

    #[test]
    fn test_rhs_end() {
        assert_eq!(rhs_end("f(a, b); next", 0), 7);
        assert_eq!(rhs_end("a ? b : c)", 0), 9);
        assert_eq!(rhs_end("a +\n  b\nnext", 0), 7);
        assert_eq!(rhs_end("a\n  .map(f)\nnext", 0), 11);
        assert_eq!(rhs_end("1  \n", 0), 1);
    }

    #[test]
    fn test_object_keys() {
        assert!(is_object_key("{ open: 1 }", 2, 6));
        assert!(is_object_key("{ open : 1 }", 2, 6));
        assert!(is_object_key("{ a: 1,\n  open: 2 }", 10, 14));
        assert!(!is_object_key("open ? count: label", 7, 12));
        assert!(!is_object_key("open ? count : label", 7, 12));
        assert!(!is_object_key("open", 0, 4));
    }

    #[test]
    fn test_declarations() {
        assert!(in_declaration("const "));
        assert!(in_declaration("let { a, "));
        assert!(!in_declaration("const x = "));
        assert!(!in_declaration("for (const item of "));
        assert!(!in_declaration("constant + "));
    }

    #[test]
    fn test_prefix_update() {
        let mut out = String::from("x = ++");
        assert_eq!(take_prefix_update(&mut out), Some(AssignOp::Increment));
        assert_eq!(out, "x = ");

        let mut out = String::from("a++ ");
        assert_eq!(take_prefix_update(&mut out), None);
    }
}

//! Template compilation.
//!
//! Walks the parsed `<template>` tree and emits JSX. Sibling lists are
//! processed by a small state machine: each step looks at the remaining
//! siblings, emits one piece of output and reports how many siblings it
//! consumed. Conditional chains consume their whole `v-if` / `v-else-if` /
//! `v-else` run in one step.

mod attributes;
mod iteration;
mod text;

pub use iteration::{literal_sequence, ForClause};

use crate::context::{ComponentShape, Context};
use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::naming::to_pascal_case;
use crate::reflect::indent;
use crate::rewrite::{rewrite, RewriteOptions};
use smol_str::SmolStr;
use text::{collapse_whitespace, escape_jsx_text, split_interpolations, TextPart};
use vue_parser::{Attribute, Element, Node, Span, Text};

/// The compiled template.
#[derive(Debug, Clone, Default)]
pub struct TemplateOutput {
    /// JSX for the root, indented to the requested depth.
    pub code: String,
    pub diagnostics: Vec<Diagnostic>,
    /// Custom component tags in order of first appearance, as written.
    pub custom_tags: Vec<SmolStr>,
}

/// Compiles the root `<template>` element into a `React.Fragment`.
pub fn compile_template(ctx: &Context, root: &Element, depth: usize) -> TemplateOutput {
    let mut compiler = TemplateCompiler::new(ctx);
    let children = compiler.compile_children(&root.children, depth + 1, &[]);

    let mut code = format!("{}<React.Fragment>\n", indent(depth));
    for child in children {
        code.push_str(&child);
        code.push('\n');
    }
    code.push_str(&indent(depth));
    code.push_str("</React.Fragment>");

    TemplateOutput {
        code,
        diagnostics: compiler.diagnostics,
        custom_tags: compiler.custom_tags,
    }
}

/// Where compiled output is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    /// Among JSX children; expressions need `{ }`.
    Child,
    /// Directly inside `return ( ... )`.
    Return,
}

/// One step of the sibling state machine.
struct Step {
    consumed: usize,
    text: String,
}

pub(crate) struct TemplateCompiler<'a> {
    ctx: &'a Context,
    diagnostics: Vec<Diagnostic>,
    custom_tags: Vec<SmolStr>,
}

impl<'a> TemplateCompiler<'a> {
    fn new(ctx: &'a Context) -> Self {
        Self {
            ctx,
            diagnostics: Vec::new(),
            custom_tags: Vec::new(),
        }
    }

    fn diagnostic(&mut self, code: DiagnosticCode, message: impl Into<String>, span: Span) {
        self.diagnostics
            .push(Diagnostic::new(code, message).with_span(span));
    }

    /// Rewrites a template expression. A malformed expression is replaced by
    /// a flagged placeholder.
    fn expression(&mut self, text: &str, options: &RewriteOptions, span: Span) -> String {
        match rewrite(self.ctx, text.trim(), options) {
            Ok(rewritten) => {
                for flag in &rewritten.flags {
                    self.diagnostics.push(flag.to_diagnostic().with_span(span));
                }
                rewritten.code
            }
            Err(err) => {
                self.diagnostic(DiagnosticCode::UnterminatedLiteral, err.to_string(), span);
                format!(
                    "undefined /* TODO: ERROR: {} in `{}` */",
                    err,
                    text.trim().replace("*/", "* /")
                )
            }
        }
    }

    fn template_options(&self, locals: &[SmolStr]) -> RewriteOptions {
        RewriteOptions::template().with_locals(locals.iter().cloned())
    }

    fn compile_children(&mut self, children: &[Node], depth: usize, locals: &[SmolStr]) -> Vec<String> {
        let significant: Vec<&Node> = children
            .iter()
            .filter(|n| !matches!(n, Node::Comment(_)))
            .collect();
        let nodes: Vec<&Node> = significant
            .iter()
            .enumerate()
            .filter(|(i, n)| !n.is_blank_text() || is_inline_space(&significant, *i))
            .map(|(_, n)| *n)
            .collect();

        let mut out = Vec::with_capacity(nodes.len());
        let mut index = 0;
        while index < nodes.len() {
            let step = self.step(&nodes[index..], index > 0, depth, locals);
            if !step.text.is_empty() {
                out.push(step.text);
            }
            index += step.consumed.max(1);
        }
        out
    }

    /// `preceded` is true when an earlier sibling was already emitted.
    fn step(&mut self, nodes: &[&Node], preceded: bool, depth: usize, locals: &[SmolStr]) -> Step {
        let single = |text| Step { consumed: 1, text };

        match nodes[0] {
            Node::Text(text) => {
                let followed = nodes.len() > 1;
                single(self.compile_text(text, depth, locals, preceded, followed))
            }
            Node::Comment(_) => single(String::new()),
            Node::Element(el) => {
                if el.has_attribute("v-if") || el.has_attribute("v-show") {
                    self.compile_chain(nodes, depth, locals)
                } else if el.has_attribute("v-else-if") {
                    self.diagnostic(
                        DiagnosticCode::OrphanElse,
                        "`v-else-if` without a preceding `v-if`",
                        el.span,
                    );
                    self.compile_chain(nodes, depth, locals)
                } else {
                    if el.has_attribute("v-else") {
                        self.diagnostic(
                            DiagnosticCode::OrphanElse,
                            "`v-else` without a preceding `v-if`; rendered unconditionally",
                            el.span,
                        );
                    }
                    single(self.compile_element(el, depth, locals, Position::Child))
                }
            }
        }
    }

    /// Compiles a conditional chain starting at `nodes[0]`.
    fn compile_chain(&mut self, nodes: &[&Node], depth: usize, locals: &[SmolStr]) -> Step {
        let mut branches: Vec<(Option<String>, &Element)> = Vec::new();

        if let Node::Element(first) = nodes[0] {
            branches.push((Some(self.condition(first, locals)), first));
            // A `v-show` branch never continues.
            if !first.has_attribute("v-show") {
                for node in &nodes[1..] {
                    let Node::Element(el) = node else {
                        break;
                    };
                    if el.has_attribute("v-else-if") {
                        branches.push((Some(self.condition(el, locals)), el));
                    } else if el.has_attribute("v-else") {
                        branches.push((None, el));
                        break;
                    } else {
                        break;
                    }
                }
            }
        }

        let outer = indent(depth);
        let inner = indent(depth + 1);
        let mut text = format!("{}{{(() => {{\n", outer);
        for (i, (condition, el)) in branches.iter().enumerate() {
            let head = match (i, condition) {
                (0, Some(condition)) => format!("if ({}) {{", condition),
                (_, Some(condition)) => format!("}} else if ({}) {{", condition),
                (_, None) => "} else {".to_string(),
            };
            text.push_str(&inner);
            text.push_str(&head);
            text.push('\n');
            text.push_str(&self.branch_body(el, depth + 2, locals));
            text.push('\n');
        }
        if !branches.is_empty() {
            text.push_str(&inner);
            text.push_str("}\n");
        }
        text.push_str(&inner);
        text.push_str("return null;\n");
        text.push_str(&outer);
        text.push_str("})()}");

        Step {
            consumed: branches.len(),
            text,
        }
    }

    fn condition(&mut self, el: &Element, locals: &[SmolStr]) -> String {
        let options = self.template_options(locals);
        let mut conditions = Vec::new();
        for name in ["v-if", "v-else-if", "v-show"] {
            if let Some(attr) = el.attribute(name) {
                conditions.push(self.expression(attr.value_str(), &options, attr.span));
            }
        }
        match conditions.len() {
            0 => "true".to_string(),
            1 => conditions.remove(0),
            _ => conditions
                .iter()
                .map(|c| format!("({})", c))
                .collect::<Vec<_>>()
                .join(" && "),
        }
    }

    fn branch_body(&mut self, el: &Element, depth: usize, locals: &[SmolStr]) -> String {
        let ind = indent(depth);
        let is_empty_group = el.name == "template"
            && !el.has_attribute("v-for")
            && el
                .children
                .iter()
                .all(|n| n.is_blank_text() || matches!(n, Node::Comment(_)));
        if is_empty_group {
            return format!("{}return null;", ind);
        }

        let body = self.compile_element(el, depth + 1, locals, Position::Return);
        format!("{}return (\n{}\n{});", ind, body, ind)
    }

    fn compile_element(
        &mut self,
        el: &Element,
        depth: usize,
        locals: &[SmolStr],
        position: Position,
    ) -> String {
        match el.attribute("v-for") {
            Some(attr) => self.compile_for(el, attr, depth, locals, position),
            None => self.compile_plain(el, depth, locals, position, None),
        }
    }

    fn compile_for(
        &mut self,
        el: &Element,
        attr: &Attribute,
        depth: usize,
        locals: &[SmolStr],
        position: Position,
    ) -> String {
        let ind = indent(depth);
        let (open, close) = match position {
            Position::Child => ("{", "}"),
            Position::Return => ("", ""),
        };

        let Some(clause) = ForClause::parse(attr.value_str()) else {
            self.diagnostic(
                DiagnosticCode::InvalidFor,
                format!("cannot parse `v-for=\"{}\"`", attr.value_str()),
                attr.span,
            );
            let comment = format!(
                "/* TODO: ERROR: invalid v-for clause: {} */",
                attr.value_str().replace("*/", "* /")
            );
            return match position {
                Position::Child => format!("{}{{{}}}", ind, comment),
                Position::Return => format!("{}null {}", ind, comment),
            };
        };

        let source = match clause.literal_count() {
            Some(count) => literal_sequence(count),
            None => {
                let options = self.template_options(locals);
                self.expression(&clause.source, &options, attr.span)
            }
        };
        let index = clause.index.clone().unwrap_or_else(|| {
            let taken = clause.bound_names();
            if taken.iter().any(|n| n == "index") {
                "i".to_string()
            } else {
                "index".to_string()
            }
        });

        let mut inner_locals = locals.to_vec();
        inner_locals.extend(clause.bound_names().into_iter().map(SmolStr::from));
        inner_locals.push(SmolStr::from(index.as_str()));

        let body = self.compile_plain(el, depth + 1, &inner_locals, Position::Child, Some(&index));
        format!(
            "{ind}{open}({source}).map(({item}, {index}) => (\n{body}\n{ind})){close}",
            ind = ind,
            open = open,
            close = close,
            source = source,
            item = clause.item,
            index = index,
            body = body
        )
    }

    /// Compiles an element whose `v-for` (if any) has been handled.
    fn compile_plain(
        &mut self,
        el: &Element,
        depth: usize,
        locals: &[SmolStr],
        position: Position,
        implicit_key: Option<&str>,
    ) -> String {
        let ind = indent(depth);

        if el.name == "slot" {
            let name = el
                .attribute("name")
                .and_then(|a| a.value.as_deref())
                .filter(|n| *n != "default")
                .map(|n| self.ctx.target_name(n))
                .unwrap_or_else(|| "children".to_string());
            let access = match self.ctx.shape {
                ComponentShape::Function => format!("props.{}", name),
                ComponentShape::Class => format!("this.props.{}", name),
            };
            return match position {
                Position::Child => format!("{}{{{}}}", ind, access),
                Position::Return => format!("{}{}", ind, access),
            };
        }

        let tag = self.tag_name(el);
        let mut output = self.compile_attributes(el, locals, is_component(el));
        if !output.has_key {
            if let Some(key) = implicit_key {
                output.attrs.insert(0, format!("key={{{}}}", key));
            }
        }

        let children = if let Some(text) = output.text_child.take() {
            vec![format!("{}{{{}}}", indent(depth + 1), text)]
        } else if output.raw_html {
            Vec::new()
        } else {
            self.compile_children(&el.children, depth + 1, locals)
        };

        let mut open_tag = format!("{}<{}", ind, tag);
        let inline_len: usize = output.attrs.iter().map(|a| a.len() + 1).sum();
        if inline_len > attributes::MULTILINE_THRESHOLD {
            for attr in &output.attrs {
                open_tag.push('\n');
                open_tag.push_str(&indent(depth + 1));
                open_tag.push_str(attr);
            }
            open_tag.push('\n');
            open_tag.push_str(&ind);
        } else {
            for attr in &output.attrs {
                open_tag.push(' ');
                open_tag.push_str(attr);
            }
        }

        if children.is_empty() {
            if !open_tag.ends_with('\n') && !open_tag.ends_with(' ') {
                open_tag.push(' ');
            }
            open_tag.push_str("/>");
            return open_tag;
        }

        let mut text = open_tag;
        text.push_str(">\n");
        for child in children {
            text.push_str(&child);
            text.push('\n');
        }
        text.push_str(&ind);
        text.push_str(&format!("</{}>", tag));
        text
    }

    fn tag_name(&mut self, el: &Element) -> String {
        if el.name == "template" {
            return "React.Fragment".to_string();
        }
        if el.is_custom() {
            if !self.custom_tags.contains(&el.name) {
                self.custom_tags.push(el.name.clone());
            }
            return to_pascal_case(&el.name);
        }
        el.name.to_string()
    }

    /// Compiles a text node onto its own line. Whitespace at an edge that
    /// touches a sibling is kept as `{' '}`, since JSX drops it otherwise.
    fn compile_text(
        &mut self,
        text: &Text,
        depth: usize,
        locals: &[SmolStr],
        preceded: bool,
        followed: bool,
    ) -> String {
        let options = self.template_options(locals);
        let mut out = String::new();

        for part in split_interpolations(&text.value) {
            match part {
                TextPart::Static(s) => out.push_str(&escape_jsx_text(&collapse_whitespace(s))),
                TextPart::Interpolation(expr) => {
                    let code = self.expression(expr, &options, text.span);
                    out.push('{');
                    out.push_str(&code);
                    out.push('}');
                }
            }
        }

        let trimmed = out.trim();
        if trimmed.is_empty() {
            return if !out.is_empty() && preceded && followed {
                format!("{}{}", indent(depth), JSX_SPACE)
            } else {
                String::new()
            };
        }
        let lead = if preceded && out.starts_with(' ') { JSX_SPACE } else { "" };
        let trail = if followed && out.ends_with(' ') { JSX_SPACE } else { "" };
        format!("{}{}{}{}", indent(depth), lead, trimmed, trail)
    }
}

const JSX_SPACE: &str = "{' '}";

/// Whether the blank text at `nodes[i]` is a same-line space between two
/// siblings. A space before `v-else` or `v-else-if` is dropped so the chain
/// stays intact.
fn is_inline_space(nodes: &[&Node], i: usize) -> bool {
    let Node::Text(text) = nodes[i] else {
        return false;
    };
    if text.value.contains('\n') || i == 0 || i + 1 >= nodes.len() {
        return false;
    }
    match nodes[i + 1] {
        Node::Element(next) => !next.has_attribute("v-else") && !next.has_attribute("v-else-if"),
        _ => true,
    }
}

/// Custom components receive camelCased props.
fn is_component(el: &Element) -> bool {
    el.is_custom() || el.name.starts_with(|c: char| c.is_ascii_uppercase())
}

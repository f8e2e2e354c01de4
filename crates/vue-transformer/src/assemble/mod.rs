//! Component assembly.
//!
//! Combines the reflected surface, the rewritten script code and the compiled
//! template into one TSX module, in either the hooks (`function`) or the
//! `ComponentBase` (`class`) shape.

mod class;
mod hooks;

use crate::context::{ComponentShape, Context};
use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::reflect::{indent, ComponentSurface, FunctionValue};
use crate::rewrite::{lines_inside_literals, rewrite, RewriteOptions};
use crate::template::{compile_template, TemplateOutput};
use smol_str::SmolStr;
use vue_parser::Element;

/// Import sources that only make sense in the source framework.
const DROPPED_IMPORT_SOURCES: &[&str] = &["vue", "vuex"];

/// Module specifiers of the runtime helpers the generated code imports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPaths {
    /// Provides `ComponentUtils` (function shape).
    pub component_utils: String,
    /// Provides `ComponentBase` (class shape).
    pub component_base: String,
    /// Provides `classNames`.
    pub class_names: String,
}

impl Default for ImportPaths {
    fn default() -> Self {
        Self {
            component_utils: "@utils/component-utils".to_string(),
            component_base: "@base/component-base".to_string(),
            class_names: "classnames".to_string(),
        }
    }
}

/// Everything the assembler consumes.
#[derive(Debug, Clone, Copy)]
pub struct AssembleInput<'a> {
    pub ctx: &'a Context,
    pub surface: &'a ComponentSurface,
    /// The root `<template>` element.
    pub template: Option<&'a Element>,
    pub imports: &'a ImportPaths,
    /// File name of the generated stylesheet, imported for its side effects.
    pub stylesheet: Option<&'a str>,
}

/// An assembled component module.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    pub code: String,
    pub diagnostics: Vec<Diagnostic>,
    /// Custom tags used by the template, as written.
    pub custom_tags: Vec<SmolStr>,
}

/// Assembles the component in the shape selected by the context.
pub fn assemble(input: &AssembleInput<'_>) -> Assembly {
    match input.ctx.shape {
        ComponentShape::Function => hooks::assemble(input),
        ComponentShape::Class => class::assemble(input),
    }
}

/// Rewrites script fragments and collects the resulting diagnostics.
struct Emitter<'a> {
    ctx: &'a Context,
    diagnostics: Vec<Diagnostic>,
    custom_tags: Vec<SmolStr>,
}

impl<'a> Emitter<'a> {
    fn new(ctx: &'a Context) -> Self {
        Self {
            ctx,
            diagnostics: Vec::new(),
            custom_tags: Vec::new(),
        }
    }

    /// Rewrites script code, where only `this.` references are resolved.
    fn script(&mut self, text: &str) -> String {
        self.rewrite(text, &RewriteOptions::explicit())
    }

    /// Rewrites a bare expression such as a watched path.
    fn expression(&mut self, text: &str) -> String {
        self.rewrite(text, &RewriteOptions::template())
    }

    fn rewrite(&mut self, text: &str, options: &RewriteOptions) -> String {
        match rewrite(self.ctx, text, options) {
            Ok(rewritten) => {
                self.diagnostics
                    .extend(rewritten.flags.iter().map(|flag| flag.to_diagnostic()));
                rewritten.code
            }
            Err(err) => {
                self.warn(DiagnosticCode::UnterminatedLiteral, err.to_string());
                format!("{} /* TODO: ERROR: {} */", text, err)
            }
        }
    }

    fn warn(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::new(code, message));
    }

    /// A function as a rewritten arrow, continuation lines at `depth`.
    fn arrow(&mut self, function: &FunctionValue, depth: usize) -> String {
        let code = self.script(&function.to_arrow());
        reindent(&code, depth)
    }

    /// A function body as a rewritten block, continuation lines at `depth`.
    fn block(&mut self, function: &FunctionValue, depth: usize) -> String {
        let code = self.script(&function.block_body());
        reindent(&code, depth)
    }

    /// The statements of a function body at `depth`. Async bodies are
    /// wrapped in an immediately invoked async arrow.
    fn statements(&mut self, function: &FunctionValue, depth: usize) -> String {
        let code = self.script(&function.block_body());
        let inner = strip_braces(&code);
        if function.is_async {
            format!(
                "{ind}(async () => {{\n{body}\n{ind}}})();",
                ind = indent(depth),
                body = dedent(inner, depth + 1)
            )
        } else {
            dedent(inner, depth)
        }
    }

    fn template(&mut self, template: Option<&Element>, depth: usize) -> Option<String> {
        let root = template?;
        let TemplateOutput {
            code,
            diagnostics,
            custom_tags,
        } = compile_template(self.ctx, root, depth);
        self.diagnostics.extend(diagnostics);
        for tag in custom_tags {
            if !self.custom_tags.contains(&tag) {
                self.custom_tags.push(tag);
            }
        }
        Some(code)
    }

    fn finish(self, code: String) -> Assembly {
        Assembly {
            code,
            diagnostics: self.diagnostics,
            custom_tags: self.custom_tags,
        }
    }
}

/// The import block: the given runtime imports, the script's own imports,
/// a note on registered components and the stylesheet import.
fn header(input: &AssembleInput<'_>, runtime: &[String]) -> String {
    let mut lines: Vec<String> = runtime.to_vec();
    for import in &input.surface.imports {
        if !DROPPED_IMPORT_SOURCES.contains(&import.source.as_str()) {
            lines.push(import.text.trim().to_string());
        }
    }
    if let Some(stylesheet) = input.stylesheet {
        lines.push(format!("import './{}';", stylesheet));
    }
    if !input.surface.components.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "// TODO: import the converted components: {}",
            input.surface.components.join(", ")
        ));
    }

    let mut out = lines.join("\n");
    out.push_str("\n\n");
    out
}

/// The name of the function generated for a watcher on `path`.
fn watch_handler_name(path: &str) -> String {
    format!("watch{}", crate::naming::to_pascal_case(path))
}

/// Lines of `text`, each paired with whether it continues a multi-line
/// literal and must be kept verbatim.
fn classify_lines(text: &str) -> Vec<(&str, bool)> {
    let inside = lines_inside_literals(text);
    text.lines()
        .enumerate()
        .map(|(i, line)| (line, inside.get(i).copied().unwrap_or(false)))
        .collect()
}

/// Re-indents continuation lines of `text` so that its least indented line
/// sits at `depth`. The first line is kept as is.
fn reindent(text: &str, depth: usize) -> String {
    let lines = classify_lines(text);
    let Some(((first, _), rest)) = lines.split_first() else {
        return String::new();
    };
    let common = common_indent(rest);

    let mut out = first.trim_end().to_string();
    for &(line, verbatim) in rest {
        out.push('\n');
        out.push_str(&indent_line(line, verbatim, common, depth));
    }
    out
}

/// Re-indents every line of `text` to `depth`, dropping leading and trailing
/// blank lines.
fn dedent(text: &str, depth: usize) -> String {
    let lines = classify_lines(text);
    let start = lines.iter().position(|(l, _)| !l.trim().is_empty());
    let end = lines.iter().rposition(|(l, _)| !l.trim().is_empty());
    let (Some(start), Some(end)) = (start, end) else {
        return String::new();
    };
    let lines = &lines[start..=end];
    let common = common_indent(lines);

    lines
        .iter()
        .map(|&(line, verbatim)| indent_line(line, verbatim, common, depth))
        .collect::<Vec<_>>()
        .join("\n")
}

fn indent_line(line: &str, verbatim: bool, common: usize, depth: usize) -> String {
    if verbatim {
        line.to_string()
    } else if line.trim().is_empty() {
        String::new()
    } else {
        format!(
            "{}{}",
            indent(depth),
            line.get(common..).unwrap_or_else(|| line.trim_start()).trim_end()
        )
    }
}

/// The smallest indentation among non-blank code lines.
fn common_indent(lines: &[(&str, bool)]) -> usize {
    lines
        .iter()
        .filter(|(l, verbatim)| !verbatim && !l.trim().is_empty())
        .map(|(l, _)| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0)
}

/// The text between the outer braces of a block.
fn strip_braces(block: &str) -> &str {
    let trimmed = block.trim();
    trimmed
        .strip_prefix('{')
        .and_then(|b| b.strip_suffix('}'))
        .unwrap_or(trimmed)
}

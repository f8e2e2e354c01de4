//! Code rewriting.
//!
//! Expressions and function bodies written against the Vue instance are
//! rewritten into the access conventions of the generated component:
//!
//! 1. literals, comments and regular expressions are masked;
//! 2. `this.name` references are resolved against the [`Context`];
//! 3. optionally, bare identifiers are resolved too (template expressions);
//! 4. resolved references are rendered, and the instance helpers
//!    (`$emit`, `$nextTick`, `$refs`, `$event`) are translated;
//! 5. literals are restored verbatim.

mod idioms;
mod mask;
mod resolve;

use crate::context::Context;
use crate::diagnostic::{Diagnostic, DiagnosticCode};
pub(crate) use mask::lines_inside_literals;
use resolve::Resolver;
use smol_str::SmolStr;
use thiserror::Error;

/// Errors produced while rewriting one expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    #[error("unterminated literal starting at offset {offset}")]
    UnterminatedLiteral { offset: usize },
}

/// Options for one rewrite.
#[derive(Debug, Clone, Default)]
pub struct RewriteOptions {
    /// Resolve bare identifiers, not only `this.` references.
    pub bare_identifiers: bool,
    /// The text is an event handler body; uninvoked method references are
    /// called with `event`.
    pub event_handler: bool,
    /// Names bound by enclosing constructs (loop variables, parameters) that
    /// must never be resolved.
    pub locals: Vec<SmolStr>,
}

impl RewriteOptions {
    /// Only `this.` references are resolved. Used for script code.
    pub fn explicit() -> Self {
        Self::default()
    }

    /// Bare identifiers are resolved too. Used for template expressions.
    pub fn template() -> Self {
        Self {
            bare_identifiers: true,
            ..Self::default()
        }
    }

    pub fn event_handler(mut self) -> Self {
        self.event_handler = true;
        self
    }

    pub fn with_locals<I, S>(mut self, locals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.locals.extend(locals.into_iter().map(Into::into));
        self
    }
}

/// A construct that was rewritten but cannot be expressed faithfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    pub kind: FlagKind,
    /// The declared name involved.
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagKind {
    PropMutation,
    ComputedMutation,
    MethodAssignment,
}

impl Flag {
    /// The diagnostic reported for this flag.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self.kind {
            FlagKind::PropMutation => Diagnostic::new(
                DiagnosticCode::PropMutation,
                format!("prop `{}` is assigned to; props are read-only", self.name),
            ),
            FlagKind::ComputedMutation => Diagnostic::new(
                DiagnosticCode::ComputedMutation,
                format!("computed value `{}` is assigned to", self.name),
            ),
            FlagKind::MethodAssignment => Diagnostic::new(
                DiagnosticCode::MethodAssignment,
                format!("method `{}` is assigned to", self.name),
            ),
        }
    }
}

/// The result of a rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub code: String,
    pub flags: Vec<Flag>,
}

/// Rewrites `text` for the component described by `ctx`.
pub fn rewrite(ctx: &Context, text: &str, options: &RewriteOptions) -> Result<Rewrite, RewriteError> {
    let masked = mask::mask(text)?;
    let mut resolver = Resolver::new(ctx, options);
    let resolved = resolver.resolve(&masked.code);
    let expanded = resolver.expand(&resolved);
    let translated = idioms::apply(ctx.shape, &expanded);

    Ok(Rewrite {
        code: masked.restore(&translated),
        flags: resolver.flags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ComponentShape;
    use pretty_assertions::assert_eq;

    fn ctx(shape: ComponentShape) -> Context {
        Context::new("Widget", "widget", shape)
            .with_props(["label", "max_size"])
            .with_state(["open", "count", "items"])
            .with_computed(["total"])
            .with_methods(["toggle", "select"])
    }

    fn explicit(shape: ComponentShape, text: &str) -> String {
        rewrite(&ctx(shape), text, &RewriteOptions::explicit())
            .expect("text should rewrite")
            .code
    }

    fn template(text: &str) -> String {
        rewrite(&ctx(ComponentShape::Function), text, &RewriteOptions::template())
            .expect("text should rewrite")
            .code
    }

    #[test]
    fn test_state_toggle() {
        insta::assert_snapshot!(
            explicit(ComponentShape::Function, "this.open = !this.open"),
            @"setOpen(!open)"
        );
        insta::assert_snapshot!(
            explicit(ComponentShape::Class, "this.open = !this.open;"),
            @"this.setState({ open: !this.state.open });"
        );
    }

    #[test]
    fn test_compound_and_update_operators() {
        assert_eq!(
            explicit(ComponentShape::Function, "this.count += step * 2;"),
            "setCount(count + (step * 2));"
        );
        assert_eq!(explicit(ComponentShape::Function, "this.count++"), "setCount(count + 1)");
        assert_eq!(explicit(ComponentShape::Function, "--this.count"), "setCount(count - 1)");
        assert_eq!(
            explicit(ComponentShape::Class, "this.count -= 1"),
            "this.setState({ count: this.state.count - 1 })"
        );
    }

    #[test]
    fn test_reads_by_category() {
        assert_eq!(
            explicit(
                ComponentShape::Function,
                "this.toggle(); return this.total + this.label + this.max_size;"
            ),
            "toggle(); return computedState.total + props.label + props.maxSize;"
        );
        assert_eq!(
            explicit(ComponentShape::Class, "this.toggle(); return this.total + this.label;"),
            "this.toggle(); return this.total() + this.props.label;"
        );
    }

    #[test]
    fn test_explicit_props_prefix_forces_prop() {
        let ctx = Context::new("W", "w", ComponentShape::Function)
            .with_state(["value"])
            .with_props(["value"]);
        let out = rewrite(&ctx, "this.props.value", &RewriteOptions::explicit())
            .expect("text should rewrite");
        assert_eq!(out.code, "props.value");
    }

    #[test]
    fn test_prop_mutation_is_flagged() {
        let out = rewrite(
            &ctx(ComponentShape::Function),
            "this.label = 'x'",
            &RewriteOptions::explicit(),
        )
        .expect("text should rewrite");
        assert_eq!(
            out.code,
            "props.label = 'x' /* TODO: WARNING: mutation of prop 'label' */"
        );
        assert_eq!(
            out.flags,
            vec![Flag {
                kind: FlagKind::PropMutation,
                name: "label".into()
            }]
        );
    }

    #[test]
    fn test_computed_assignment_is_flagged() {
        let out = rewrite(
            &ctx(ComponentShape::Class),
            "this.total = 3",
            &RewriteOptions::explicit(),
        )
        .expect("text should rewrite");
        assert_eq!(
            out.code,
            "this.setTotal(3) /* TODO: WARNING: assignment to computed value 'total' */"
        );
        assert_eq!(out.flags[0].kind, FlagKind::ComputedMutation);
    }

    #[test]
    fn test_literals_are_untouched() {
        assert_eq!(
            explicit(
                ComponentShape::Function,
                "log('this.open', \"open\", `${this.open} open`) // this.open"
            ),
            "log('this.open', \"open\", `${open} open`) // this.open"
        );
    }

    #[test]
    fn test_unknown_names_are_left_alone() {
        assert_eq!(
            explicit(ComponentShape::Function, "this.unknown + this.$el"),
            "this.unknown + this.$el"
        );
    }

    #[test]
    fn test_bare_identifiers() {
        assert_eq!(template("open ? count : label"), "open ? count : props.label");
        assert_eq!(template("{ open: open }"), "{ open: open }");
        assert_eq!(template("item.count + items.length"), "item.count + items.length");
    }

    #[test]
    fn test_object_keys_and_ternary_arms_in_class_shape() {
        let class = |text| {
            rewrite(&ctx(ComponentShape::Class), text, &RewriteOptions::template())
                .expect("text should rewrite")
                .code
        };
        assert_eq!(
            class("open ? count: label"),
            "this.state.open ? this.state.count: this.props.label"
        );
        assert_eq!(class("{ open : 1 }"), "{ open : 1 }");
        assert_eq!(
            class("{ items: [], count : count }"),
            "{ items: [], count : this.state.count }"
        );
    }

    #[test]
    fn test_non_ascii_identifiers_before_division() {
        assert_eq!(explicit(ComponentShape::Function, "café / 2"), "café / 2");
        assert_eq!(
            explicit(ComponentShape::Function, "return größe / this.count;"),
            "return größe / count;"
        );
    }

    #[test]
    fn test_bare_assignment_in_handler() {
        let out = rewrite(
            &ctx(ComponentShape::Function),
            "open = !open",
            &RewriteOptions::template().event_handler(),
        )
        .expect("text should rewrite");
        assert_eq!(out.code, "setOpen(!open)");
    }

    #[test]
    fn test_event_handler_method_reference() {
        let options = RewriteOptions::template().event_handler();
        let ctx = ctx(ComponentShape::Function);
        assert_eq!(
            rewrite(&ctx, "toggle", &options).expect("rewrite").code,
            "toggle(event)"
        );
        assert_eq!(
            rewrite(&ctx, "select(3, $event)", &options).expect("rewrite").code,
            "select(3, event)"
        );
    }

    #[test]
    fn test_locals_shadow_declarations() {
        let options = RewriteOptions::template().with_locals(["count"]);
        let out = rewrite(&ctx(ComponentShape::Function), "count + total", &options)
            .expect("text should rewrite");
        assert_eq!(out.code, "count + computedState.total");
    }

    #[test]
    fn test_declared_locals_are_not_hijacked() {
        assert_eq!(
            rewrite(
                &ctx(ComponentShape::Class),
                "const open = 1; return open + count;",
                &RewriteOptions::template(),
            )
            .expect("text should rewrite")
            .code,
            "const open = 1; return open + this.state.count;"
        );
    }

    #[test]
    fn test_multiline_assignment_rhs() {
        assert_eq!(
            explicit(
                ComponentShape::Function,
                "this.items = this.items\n  .filter(i => i)\nthis.open = false"
            ),
            "setItems(items\n  .filter(i => i))\nsetOpen(false)"
        );
    }

    #[test]
    fn test_unterminated_literal_is_an_error() {
        assert_eq!(
            rewrite(
                &ctx(ComponentShape::Function),
                "this.open = 'x",
                &RewriteOptions::explicit()
            ),
            Err(RewriteError::UnterminatedLiteral { offset: 12 })
        );
    }
}

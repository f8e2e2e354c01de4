//! Attribute and directive translation.

use super::TemplateCompiler;
use crate::context::ComponentShape;
use crate::diagnostic::DiagnosticCode;
use crate::naming::{convert_prop_or_state_name, is_ident_char, is_ident_start, to_pascal_case};
use crate::reflect::quote_js_string;
use crate::rewrite::RewriteOptions;
use indexmap::IndexMap;
use smol_str::SmolStr;
use vue_parser::{Attribute, Element};

/// Attributes whose combined length exceeds this are written one per line.
pub(super) const MULTILINE_THRESHOLD: usize = 100;

/// Directives consumed by control flow.
const CONTROL_DIRECTIVES: &[&str] = &["v-if", "v-else-if", "v-else", "v-show", "v-for"];

/// Directives dropped without a trace.
const IGNORED_DIRECTIVES: &[&str] = &["v-cloak", "v-once", "v-pre"];

/// DOM attribute names that differ in React.
const DOM_ATTRIBUTES: &[(&str, &str)] = &[
    ("for", "htmlFor"),
    ("tabindex", "tabIndex"),
    ("readonly", "readOnly"),
    ("maxlength", "maxLength"),
    ("minlength", "minLength"),
    ("colspan", "colSpan"),
    ("rowspan", "rowSpan"),
    ("autocomplete", "autoComplete"),
    ("autofocus", "autoFocus"),
    ("contenteditable", "contentEditable"),
    ("crossorigin", "crossOrigin"),
    ("enctype", "encType"),
    ("srcset", "srcSet"),
    ("usemap", "useMap"),
    ("accesskey", "accessKey"),
    ("novalidate", "noValidate"),
    ("spellcheck", "spellCheck"),
    ("frameborder", "frameBorder"),
    ("allowfullscreen", "allowFullScreen"),
    ("datetime", "dateTime"),
    ("inputmode", "inputMode"),
    ("formaction", "formAction"),
    ("cellpadding", "cellPadding"),
    ("cellspacing", "cellSpacing"),
];

/// Vue event names and their React handler props.
const EVENT_HANDLERS: &[(&str, &str)] = &[
    ("click", "onClick"),
    ("dblclick", "onDoubleClick"),
    ("contextmenu", "onContextMenu"),
    ("keydown", "onKeyDown"),
    ("keyup", "onKeyUp"),
    ("keypress", "onKeyPress"),
    ("mousedown", "onMouseDown"),
    ("mouseup", "onMouseUp"),
    ("mousemove", "onMouseMove"),
    ("mouseenter", "onMouseEnter"),
    ("mouseleave", "onMouseLeave"),
    ("mouseover", "onMouseOver"),
    ("mouseout", "onMouseOut"),
    ("touchstart", "onTouchStart"),
    ("touchmove", "onTouchMove"),
    ("touchend", "onTouchEnd"),
    ("dragstart", "onDragStart"),
    ("dragend", "onDragEnd"),
    ("dragenter", "onDragEnter"),
    ("dragleave", "onDragLeave"),
    ("dragover", "onDragOver"),
    ("drop", "onDrop"),
    ("input", "onInput"),
    ("change", "onChange"),
    ("submit", "onSubmit"),
    ("focus", "onFocus"),
    ("blur", "onBlur"),
    ("scroll", "onScroll"),
    ("wheel", "onWheel"),
    ("load", "onLoad"),
    ("error", "onError"),
    ("copy", "onCopy"),
    ("cut", "onCut"),
    ("paste", "onPaste"),
];

/// Translated attributes of one element.
#[derive(Debug, Default)]
pub(super) struct AttributeOutput {
    /// Rendered JSX attributes in output order.
    pub attrs: Vec<String>,
    /// The `v-text` expression, rendered as the only child.
    pub text_child: Option<String>,
    /// Whether `v-html` replaced the children.
    pub raw_html: bool,
    /// Whether an explicit `key` was written.
    pub has_key: bool,
}

/// A contribution to a target attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Static(String),
    Expr(String),
    /// Present without a value.
    Bare,
}

/// One output attribute being assembled.
#[derive(Debug)]
enum Entry {
    Named { name: String, values: Vec<Value> },
    Handler { name: String, statements: Vec<String> },
    Spread(String),
}

#[derive(Default)]
struct Entries {
    list: Vec<Entry>,
    index: IndexMap<String, usize>,
}

impl Entries {
    fn value(&mut self, name: &str, value: Value) {
        match self.index.get(name) {
            Some(&i) => {
                if let Entry::Named { values, .. } = &mut self.list[i] {
                    values.push(value);
                }
            }
            None => {
                self.index.insert(name.to_string(), self.list.len());
                self.list.push(Entry::Named {
                    name: name.to_string(),
                    values: vec![value],
                });
            }
        }
    }

    fn handler(&mut self, name: &str, statements: Vec<String>) {
        match self.index.get(name) {
            Some(&i) => {
                if let Entry::Handler { statements: existing, .. } = &mut self.list[i] {
                    existing.extend(statements);
                }
            }
            None => {
                self.index.insert(name.to_string(), self.list.len());
                self.list.push(Entry::Handler {
                    name: name.to_string(),
                    statements,
                });
            }
        }
    }
}

impl TemplateCompiler<'_> {
    pub(super) fn compile_attributes(
        &mut self,
        el: &Element,
        locals: &[SmolStr],
        is_component: bool,
    ) -> AttributeOutput {
        let mut output = AttributeOutput::default();
        let mut entries = Entries::default();
        let options = self.template_options(locals);

        for attr in &el.attributes {
            let name = attr.name.as_str();
            if CONTROL_DIRECTIVES.contains(&name) || IGNORED_DIRECTIVES.contains(&name) {
                continue;
            }

            if name == "v-bind" || name == ":" {
                let value = self.expression(attr.value_str(), &options, attr.span);
                entries.list.push(Entry::Spread(value));
            } else if let Some(target) = name
                .strip_prefix(':')
                .or_else(|| name.strip_prefix("v-bind:"))
            {
                self.bound_attribute(attr, target, &options, is_component, &mut entries, &mut output);
            } else if let Some(event) = name.strip_prefix('@').or_else(|| name.strip_prefix("v-on:")) {
                self.event_handler(attr, event, locals, &mut entries);
            } else if name == "v-model" || name.starts_with("v-model:") || name.starts_with("v-model.") {
                self.model_binding(attr, locals, is_component, &mut entries);
            } else if name == "v-text" {
                output.text_child = Some(self.expression(attr.value_str(), &options, attr.span));
            } else if name == "v-html" {
                let html = self.expression(attr.value_str(), &options, attr.span);
                entries.value(
                    "dangerouslySetInnerHTML",
                    Value::Expr(format!("{{ __html: {} }}", html)),
                );
                output.raw_html = true;
            } else if name.starts_with('#') || name == "v-slot" || name.starts_with("v-slot:") {
                self.diagnostic(
                    DiagnosticCode::SlotDirective,
                    format!("slot directive `{}` is not translated", name),
                    attr.span,
                );
            } else if name == "ref" {
                entries.value("ref", Value::Expr(self.capture_reference(&quote_js_string(attr.value_str()))));
            } else if name == "key" {
                output.has_key = true;
                entries.value("key", Value::Static(attr.value_str().to_string()));
            } else if name == "class" {
                entries.value("className", static_or_bare(attr));
            } else if name == "style" {
                entries.value("style", Value::Static(attr.value_str().to_string()));
            } else {
                // Unknown directives pass through as written.
                entries.value(&attribute_name(name, is_component), static_or_bare(attr));
            }
        }

        output.attrs = entries.list.into_iter().map(render_entry).collect();
        output
    }

    fn bound_attribute(
        &mut self,
        attr: &Attribute,
        target: &str,
        options: &RewriteOptions,
        is_component: bool,
        entries: &mut Entries,
        output: &mut AttributeOutput,
    ) {
        // Modifiers such as `.sync` / `.prop` are dropped.
        let target = target.split('.').next().unwrap_or(target);
        let value = self.expression(attr.value_str(), options, attr.span);

        if let Some(dynamic) = target.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            self.diagnostic(
                DiagnosticCode::DynamicAttribute,
                format!("dynamic attribute name `{}` became a spread", dynamic),
                attr.span,
            );
            let key = self.expression(dynamic, options, attr.span);
            entries
                .list
                .push(Entry::Spread(format!("{{ [{}]: {} }}", key, value)));
            return;
        }

        match target {
            "key" => {
                output.has_key = true;
                entries.value("key", Value::Expr(value));
            }
            "class" => entries.value("className", Value::Expr(value)),
            "style" => entries.value("style", Value::Expr(value)),
            "ref" => entries.value("ref", Value::Expr(self.capture_reference(&value))),
            other => entries.value(&attribute_name(other, is_component), Value::Expr(value)),
        }
    }

    fn event_handler(&mut self, attr: &Attribute, event: &str, locals: &[SmolStr], entries: &mut Entries) {
        let mut segments = event.split('.');
        let event_name = segments.next().unwrap_or(event);
        let modifiers: Vec<&str> = segments.collect();

        let mut statements = Vec::new();
        if !modifiers.is_empty() {
            self.diagnostic(
                DiagnosticCode::EventModifier,
                format!("event modifiers `.{}` are not translated", modifiers.join(".")),
                attr.span,
            );
            statements.push(format!(
                "/* TODO: WARNING: event modifiers not translated: .{} */",
                modifiers.join(".")
            ));
            if modifiers.contains(&"prevent") {
                statements.push("event.preventDefault();".to_string());
            }
            if modifiers.contains(&"stop") {
                statements.push("event.stopPropagation();".to_string());
            }
        }

        let body = attr.value_str().trim();
        if is_member_path(body) {
            let options = RewriteOptions::template().with_locals(locals.iter().cloned());
            let code = self.expression(body, &options, attr.span);
            statements.push(format!("{}(event);", code));
        } else if is_function_expression(body) {
            let options = RewriteOptions::template().with_locals(locals.iter().cloned());
            let code = self.expression(body, &options, attr.span);
            statements.push(format!("({})(event);", code));
        } else if !body.is_empty() {
            let options = RewriteOptions::template()
                .event_handler()
                .with_locals(locals.iter().cloned());
            let code = self.expression(body, &options, attr.span);
            let code = code.trim_end().trim_end_matches(';');
            statements.push(format!("{};", code));
        }

        entries.handler(&handler_name(event_name), statements);
    }

    fn model_binding(
        &mut self,
        attr: &Attribute,
        locals: &[SmolStr],
        is_component: bool,
        entries: &mut Entries,
    ) {
        let expr = attr.value_str().trim();
        self.diagnostic(
            DiagnosticCode::DualBinding,
            format!("`{}=\"{}\"` needs a manual two-way binding", attr.name, expr),
            attr.span,
        );

        let options = RewriteOptions::template().with_locals(locals.iter().cloned());
        let value = self.expression(expr, &options, attr.span);
        let property = match attr.name.strip_prefix("v-model:") {
            Some(arg) => attribute_name(arg.split('.').next().unwrap_or(arg), is_component),
            None => "value".to_string(),
        };
        entries.value(&property, Value::Expr(value));

        let assignment = self.expression(&format!("{} = event.target.value", expr), &options, attr.span);
        entries.handler(
            "onChange",
            vec![
                format!("/* TODO: WARNING: dual binding of {} */", expr.replace("*/", "* /")),
                format!("{};", assignment),
            ],
        );
    }

    fn capture_reference(&self, name: &str) -> String {
        match self.ctx.shape {
            ComponentShape::Function => format!("ComponentUtils.captureReference({})", name),
            ComponentShape::Class => format!("this.captureReference({})", name),
        }
    }
}

fn static_or_bare(attr: &Attribute) -> Value {
    match &attr.value {
        Some(value) => Value::Static(value.clone()),
        None => Value::Bare,
    }
}

/// The React name of an attribute.
fn attribute_name(name: &str, is_component: bool) -> String {
    if is_component {
        return convert_prop_or_state_name(name);
    }
    if name.starts_with("data-") || name.starts_with("aria-") || name.starts_with("v-") {
        return name.to_string();
    }
    if let Some((_, react)) = DOM_ATTRIBUTES.iter().find(|(dom, _)| *dom == name) {
        return (*react).to_string();
    }
    if name.contains('-') {
        return convert_prop_or_state_name(name);
    }
    name.to_string()
}

/// The React handler prop for a Vue event name.
fn handler_name(event: &str) -> String {
    match EVENT_HANDLERS.iter().find(|(vue, _)| *vue == event) {
        Some((_, react)) => (*react).to_string(),
        None => format!("on{}", to_pascal_case(event)),
    }
}

fn render_entry(entry: Entry) -> String {
    match entry {
        Entry::Spread(expr) => format!("{{...{}}}", expr),
        Entry::Handler { name, statements } => {
            format!("{}={{(event) => {{ {} }}}}", name, statements.join(" "))
        }
        Entry::Named { name, values } => match name.as_str() {
            "className" => render_class(values),
            "style" => render_style(values),
            _ => render_named(&name, values),
        },
    }
}

fn render_named(name: &str, values: Vec<Value>) -> String {
    match values.as_slice() {
        [Value::Bare] => name.to_string(),
        [Value::Static(s)] if !s.contains('"') => format!("{}=\"{}\"", name, s),
        [Value::Static(s)] => format!("{}={{{}}}", name, quote_js_string(s)),
        [Value::Expr(e)] => format!("{}={{{}}}", name, e),
        _ => {
            let parts: Vec<String> = values.iter().map(value_js).collect();
            format!("{}={{[{}].join(' ')}}", name, parts.join(", "))
        }
    }
}

fn value_js(value: &Value) -> String {
    match value {
        Value::Static(s) => quote_js_string(s),
        Value::Expr(e) => e.clone(),
        Value::Bare => "true".to_string(),
    }
}

/// `className`: a plain string for one static value, otherwise
/// `classNames(...)` over the distinct contributions in order.
fn render_class(values: Vec<Value>) -> String {
    let mut parts: Vec<String> = Vec::new();
    for value in &values {
        let part = match value {
            Value::Static(s) => {
                let classes = s.split_whitespace().collect::<Vec<_>>().join(" ");
                if classes.is_empty() {
                    continue;
                }
                quote_js_string(&classes)
            }
            other => value_js(other),
        };
        if !parts.contains(&part) {
            parts.push(part);
        }
    }

    match values.as_slice() {
        [Value::Static(s)] if !s.contains(['"', '\'']) => {
            format!("className=\"{}\"", s.split_whitespace().collect::<Vec<_>>().join(" "))
        }
        _ => format!("className={{classNames({})}}", parts.join(", ")),
    }
}

/// `style`: static declarations become an object literal; bound values are
/// spread into it.
fn render_style(values: Vec<Value>) -> String {
    let mut members: Vec<String> = Vec::new();
    let mut expressions: Vec<String> = Vec::new();
    for value in values {
        match value {
            Value::Static(css) => members.extend(style_declarations(&css)),
            Value::Expr(expr) => expressions.push(expr),
            Value::Bare => {}
        }
    }

    if members.is_empty() && expressions.len() == 1 {
        return format!("style={{{}}}", expressions[0]);
    }
    members.extend(expressions.iter().map(|e| format!("...({})", e)));
    if members.is_empty() {
        return "style={{}}".to_string();
    }
    format!("style={{{{ {} }}}}", members.join(", "))
}

/// Converts `a-b: c; d: e` into `aB: 'c'` object members.
fn style_declarations(css: &str) -> Vec<String> {
    css.split(';')
        .filter_map(|decl| {
            let (property, value) = decl.split_once(':')?;
            let property = property.trim();
            let value = value.trim();
            if property.is_empty() || value.is_empty() {
                return None;
            }
            let key = if property.starts_with("--") {
                quote_js_string(property)
            } else {
                css_property_name(property)
            };
            Some(format!("{}: {}", key, quote_js_string(value)))
        })
        .collect()
}

/// `overflow-x` → `overflowX`, `-webkit-transform` → `WebkitTransform`.
/// The `-ms-` prefix stays lower case.
fn css_property_name(property: &str) -> String {
    let mut out = String::with_capacity(property.len());
    let mut upper_next = false;
    for (i, c) in property.chars().enumerate() {
        if c == '-' {
            upper_next = i > 0 || property.starts_with("-webkit") || property.starts_with("-moz");
            continue;
        }
        if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Whether a handler is a plain reference like `onClose` or `form.submit`.
fn is_member_path(text: &str) -> bool {
    !text.is_empty()
        && text.split('.').all(|segment| {
            segment.starts_with(is_ident_start) && segment.chars().all(is_ident_char)
        })
}

/// Whether a handler is an arrow function or a `function` expression.
fn is_function_expression(text: &str) -> bool {
    let text = match text.strip_prefix("async") {
        Some(rest) if rest.starts_with(char::is_whitespace) || rest.starts_with('(') => {
            rest.trim_start()
        }
        _ => text,
    };

    if let Some(rest) = text.strip_prefix("function") {
        return rest.starts_with(|c: char| c.is_whitespace() || c == '(');
    }

    let params_end = if text.starts_with('(') {
        text.find(')').map(|i| i + 1)
    } else {
        let end = text.find(|c: char| !is_ident_char(c)).unwrap_or(text.len());
        (end > 0 && text.starts_with(is_ident_start)).then_some(end)
    };
    params_end.is_some_and(|end| text[end..].trim_start().starts_with("=>"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use pretty_assertions::assert_eq;

    fn attributes_of(markup: &str) -> (Vec<String>, Vec<DiagnosticCode>) {
        let ctx = Context::new("W", "w", ComponentShape::Function)
            .with_state(["active", "value", "styles"])
            .with_props(["label"])
            .with_methods(["submit", "toggle"]);
        let parsed = vue_parser::parse(&format!("<template>{}</template>", markup));
        let root = parsed.document.template.expect("template should parse");
        let el = root.children[0].as_element().expect("first child is an element");
        let mut compiler = TemplateCompiler::new(&ctx);
        let output = compiler.compile_attributes(el, &[], super::super::is_component(el));
        let codes = compiler.diagnostics.iter().map(|d| d.code).collect();
        (output.attrs, codes)
    }

    #[test]
    fn test_class_merge_dedupes_in_order() {
        let (attrs, _) = attributes_of(r#"<div class="a  b" :class="{ on: active }" v-bind:class="{ on: active }"></div>"#);
        assert_eq!(attrs, vec!["className={classNames('a b', { on: active })}"]);
    }

    #[test]
    fn test_single_static_class() {
        let (attrs, _) = attributes_of(r#"<div class="box"></div>"#);
        assert_eq!(attrs, vec![r#"className="box""#]);
    }

    #[test]
    fn test_style_merge() {
        let (attrs, _) = attributes_of(r#"<div style="overflow-x: auto; --gap: 2px" :style="styles"></div>"#);
        assert_eq!(
            attrs,
            vec!["style={{ overflowX: 'auto', '--gap': '2px', ...(styles) }}"]
        );
        let (attrs, _) = attributes_of(r#"<div :style="styles"></div>"#);
        assert_eq!(attrs, vec!["style={styles}"]);
    }

    #[test]
    fn test_events_and_modifiers() {
        let (attrs, codes) = attributes_of(r#"<form @submit.prevent="submit" @click="toggle()"></form>"#);
        assert_eq!(
            attrs,
            vec![
                "onSubmit={(event) => { /* TODO: WARNING: event modifiers not translated: .prevent */ event.preventDefault(); submit(event); }}",
                "onClick={(event) => { toggle(); }}",
            ]
        );
        assert_eq!(codes, vec![DiagnosticCode::EventModifier]);
    }

    #[test]
    fn test_handler_references_are_called_with_the_event() {
        let (attrs, _) = attributes_of(
            r#"<button @click="label" @focus="() => toggle()" @blur="function (e) { submit(e) }"></button>"#,
        );
        assert_eq!(
            attrs,
            vec![
                "onClick={(event) => { props.label(event); }}",
                "onFocus={(event) => { (() => toggle())(event); }}",
                "onBlur={(event) => { (function (e) { submit(e) })(event); }}",
            ]
        );
    }

    #[test]
    fn test_handler_shapes() {
        assert!(is_member_path("onClose"));
        assert!(is_member_path("form.submit"));
        assert!(!is_member_path("toggle()"));
        assert!(!is_member_path("open = !open"));
        assert!(is_function_expression("() => toggle()"));
        assert!(is_function_expression("e => submit(e)"));
        assert!(is_function_expression("async (e) => submit(e)"));
        assert!(is_function_expression("function () {}"));
        assert!(!is_function_expression("functional()"));
        assert!(!is_function_expression("(a, b)"));
    }

    #[test]
    fn test_custom_event_name() {
        assert_eq!(handler_name("update-value"), "onUpdateValue");
        assert_eq!(handler_name("dblclick"), "onDoubleClick");
    }

    #[test]
    fn test_v_model() {
        let (attrs, codes) = attributes_of(r#"<input v-model="value">"#);
        assert_eq!(
            attrs,
            vec![
                "value={value}",
                "onChange={(event) => { /* TODO: WARNING: dual binding of value */ setValue(event.target.value); }}",
            ]
        );
        assert_eq!(codes, vec![DiagnosticCode::DualBinding]);
    }

    #[test]
    fn test_dom_names_refs_and_spreads() {
        let (attrs, codes) = attributes_of(
            r#"<label for="x" tabindex="1" data-id="7" ref="field" v-bind="extra" :[name]="label" disabled></label>"#,
        );
        assert_eq!(
            attrs,
            vec![
                r#"htmlFor="x""#,
                r#"tabIndex="1""#,
                r#"data-id="7""#,
                "ref={ComponentUtils.captureReference('field')}",
                "{...extra}",
                "{...{ [name]: props.label }}",
                "disabled",
            ]
        );
        assert_eq!(codes, vec![DiagnosticCode::DynamicAttribute]);
    }

    #[test]
    fn test_component_props_are_camel_cased() {
        let (attrs, _) = attributes_of(r#"<my-field max-length="3" :is-open="active"></my-field>"#);
        assert_eq!(attrs, vec![r#"maxLength="3""#, "isOpen={active}"]);
    }

    #[test]
    fn test_css_property_names() {
        assert_eq!(css_property_name("background-color"), "backgroundColor");
        assert_eq!(css_property_name("-webkit-transform"), "WebkitTransform");
    }
}

//! Class components extending `ComponentBase`.

use super::{header, AssembleInput, Assembly, Emitter};
use crate::diagnostic::DiagnosticCode;
use crate::naming::setter_name;
use crate::props::{default_props, props_interface, state_interface};
use crate::reflect::{
    indent, ComputedDecl, FunctionValue, HookPhase, LifecycleHook, MethodDecl, WatchDecl,
    WatchHandler,
};

pub(super) fn assemble(input: &AssembleInput<'_>) -> Assembly {
    let ctx = input.ctx;
    let surface = input.surface;
    let name = &ctx.component_name;
    let mut emitter = Emitter::new(ctx);

    let mut out = header(
        input,
        &[
            "import React from 'react';".to_string(),
            format!("import classNames from '{}';", input.imports.class_names),
            format!("import ComponentBase from '{}';", input.imports.component_base),
        ],
    );
    out.push_str(&props_interface(name, &surface.props));
    out.push_str("\n\n");
    out.push_str(&state_interface(name, &surface.data));
    out.push_str("\n\n");
    out.push_str(&format!(
        "export default class {name} extends ComponentBase<{name}Props, {name}State> {{\n",
        name = name
    ));

    let mut members: Vec<String> = Vec::new();

    if let Some(defaults) = default_props(&surface.props, 1) {
        members.push(format!("{}static defaultProps = {};", indent(1), defaults));
    }
    members.push(constructor(&mut emitter, input));

    for (computed, decl) in &surface.computed {
        let target = ctx.target_name(computed);
        match decl {
            ComputedDecl::Getter(getter) => {
                members.push(method(&mut emitter, &target, "", getter));
            }
            ComputedDecl::Accessor(accessor) => {
                if let Some(get) = &accessor.get {
                    members.push(method(&mut emitter, &target, "", get));
                }
                if let Some(set) = &accessor.set {
                    members.push(method(&mut emitter, &setter_name(&target), &set.params, set));
                }
            }
            ComputedDecl::Value(value) => {
                let code = emitter.script(&value.to_js(2));
                members.push(format!(
                    "{ind}{target}() {{\n{ind2}return {value};\n{ind}}}",
                    ind = indent(1),
                    ind2 = indent(2),
                    target = target,
                    value = super::reindent(&code, 2)
                ));
            }
        }
    }

    for (method_name, decl) in &surface.methods {
        let value = match decl {
            MethodDecl::Function(function) => emitter.arrow(function, 1),
            MethodDecl::Expr(expr) => {
                let code = emitter.script(expr);
                super::reindent(&code, 1)
            }
        };
        members.push(format!("{}{} = {};", indent(1), ctx.target_name(method_name), value));
    }

    let mut update_blocks: Vec<String> = Vec::new();
    for (path, decl) in &surface.watch {
        if let Some(member) = state_watcher(&mut emitter, input, path, decl) {
            members.push(member);
        } else if let Some(block) = update_watcher(&mut emitter, path, decl) {
            update_blocks.push(block);
        } else {
            emitter.warn(
                DiagnosticCode::Watcher,
                format!("watcher on `{}` is not converted", path),
            );
            members.push(format!(
                "{}// TODO: watcher on '{}' not converted",
                indent(1),
                path
            ));
        }
    }

    members.extend(lifecycle_methods(&mut emitter, input, update_blocks));

    let render = match emitter.template(input.template, 3) {
        Some(jsx) => format!("{ind2}return (\n{jsx}\n{ind2});", ind2 = indent(2), jsx = jsx),
        None => format!("{}return null;", indent(2)),
    };
    members.push(format!(
        "{ind}render() {{\n{render}\n{ind}}}",
        ind = indent(1),
        render = render
    ));

    out.push_str(&members.join("\n\n"));
    out.push_str("\n}\n");

    emitter.finish(out)
}

fn constructor(emitter: &mut Emitter<'_>, input: &AssembleInput<'_>) -> String {
    let ctx = input.ctx;
    let state = if input.surface.data.is_empty() {
        "{}".to_string()
    } else {
        let mut fields = String::from("{\n");
        for (field, value) in &input.surface.data {
            let code = emitter.script(&value.to_js(3));
            fields.push_str(&format!(
                "{}{}: {},\n",
                indent(3),
                ctx.target_name(field),
                super::reindent(&code, 3)
            ));
        }
        fields.push_str(&indent(2));
        fields.push('}');
        fields
    };

    format!(
        "{ind}constructor(props: {name}Props) {{\n{ind2}super(props);\n\n{ind2}this.state = {state};\n{ind}}}",
        ind = indent(1),
        ind2 = indent(2),
        name = ctx.component_name,
        state = state
    )
}

/// A class method `name(params) { ... }`.
fn method(emitter: &mut Emitter<'_>, name: &str, params: &str, function: &FunctionValue) -> String {
    let prefix = if function.is_async { "async " } else { "" };
    let body = emitter.block(function, 1);
    format!("{}{}{}({}) {}", indent(1), prefix, name, params, body)
}

/// Watchers on top-level state fields become `onStateUpdated_<field>` hooks.
fn state_watcher(
    emitter: &mut Emitter<'_>,
    input: &AssembleInput<'_>,
    path: &str,
    decl: &WatchDecl,
) -> Option<String> {
    let ctx = input.ctx;
    if path.contains('.') || !ctx.is_state(path) {
        return None;
    }
    if decl.deep {
        emitter.warn(
            DiagnosticCode::Watcher,
            format!("deep watching of `{}` is not translated", path),
        );
    }

    let hook = format!("onStateUpdated_{}", ctx.target_name(path));
    Some(match &decl.handler {
        WatchHandler::Function(function) => method(emitter, &hook, &function.params, function),
        WatchHandler::Method(target) => {
            let callee = emitter.expression(target);
            format!(
                "{ind}{hook}(value, oldValue) {{\n{ind2}{callee}(value, oldValue);\n{ind}}}",
                ind = indent(1),
                ind2 = indent(2),
                hook = hook,
                callee = callee
            )
        }
    })
}

/// Watchers on props and nested state compare against the previous values in
/// `componentDidUpdate`.
fn update_watcher(emitter: &mut Emitter<'_>, path: &str, decl: &WatchDecl) -> Option<String> {
    let current = emitter.expression(path);
    let previous = if let Some(rest) = current.strip_prefix("this.props.") {
        format!("prevProps.{}", rest)
    } else if let Some(rest) = current.strip_prefix("this.state.") {
        format!("prevState.{}", rest)
    } else {
        return None;
    };
    if decl.deep {
        emitter.warn(
            DiagnosticCode::Watcher,
            format!("deep watching of `{}` is not translated", path),
        );
    }

    let call = match &decl.handler {
        WatchHandler::Function(function) => format!("({})", emitter.arrow(function, 3)),
        WatchHandler::Method(target) => emitter.expression(target),
    };
    Some(format!(
        "{ind}if ({current} !== {previous}) {{\n{ind2}{call}({current}, {previous});\n{ind}}}",
        ind = indent(2),
        ind2 = indent(3),
        current = current,
        previous = previous,
        call = call
    ))
}

/// `componentDidMount`, `componentDidUpdate` and `componentWillUnmount`, plus
/// hooks without an equivalent.
fn lifecycle_methods(
    emitter: &mut Emitter<'_>,
    input: &AssembleInput<'_>,
    mut update: Vec<String>,
) -> Vec<String> {
    let mut mount = Vec::new();
    let mut unmount = Vec::new();
    let mut others = Vec::new();

    for (hook, function) in &input.surface.hooks {
        match hook.phase() {
            HookPhase::Mount => mount.push(emitter.statements(function, 2)),
            HookPhase::Update => {
                if *hook == LifecycleHook::BeforeUpdate {
                    emitter.warn(
                        DiagnosticCode::LifecycleHook,
                        "`beforeUpdate` runs after the update in `componentDidUpdate`",
                    );
                }
                update.push(emitter.statements(function, 2));
            }
            HookPhase::Unmount => unmount.push(emitter.statements(function, 2)),
            HookPhase::Other => {
                emitter.warn(
                    DiagnosticCode::LifecycleHook,
                    format!("lifecycle hook `{}` has no equivalent", hook.name()),
                );
                let arrow = emitter.arrow(function, 1);
                others.push(format!(
                    "{ind}// TODO: lifecycle hook '{hook}' has no equivalent\n{ind}{hook} = {arrow};",
                    ind = indent(1),
                    hook = hook.name(),
                    arrow = arrow
                ));
            }
        }
    }

    let mut methods = Vec::new();
    let mut push = |signature: &str, bodies: Vec<String>| {
        let bodies: Vec<String> = bodies.into_iter().filter(|b| !b.is_empty()).collect();
        if !bodies.is_empty() {
            methods.push(format!(
                "{ind}{signature} {{\n{body}\n{ind}}}",
                ind = indent(1),
                signature = signature,
                body = bodies.join("\n\n")
            ));
        }
    };
    push("componentDidMount()", mount);
    push("componentDidUpdate(prevProps, prevState)", update);
    push("componentWillUnmount()", unmount);

    methods.extend(others);
    methods
}

#[cfg(test)]
mod tests {
    use super::super::{assemble, AssembleInput, ImportPaths};
    use crate::context::{ComponentShape, Context};
    use crate::diagnostic::DiagnosticCode;
    use crate::reflect::reflect_script;
    use pretty_assertions::assert_eq;
    use vue_parser::ScriptLang;

    fn build(script: &str, template: Option<&str>) -> super::Assembly {
        let surface = reflect_script(script, ScriptLang::JavaScript).expect("script should reflect");
        let ctx = Context::from_surface(&surface, "Toggle", "toggle", ComponentShape::Class);
        let parsed = template.map(|t| vue_parser::parse(&format!("<template>{}</template>", t)));
        let root = parsed.as_ref().and_then(|p| p.document.template.as_ref());
        let imports = ImportPaths::default();
        assemble(&AssembleInput {
            ctx: &ctx,
            surface: &surface,
            template: root,
            imports: &imports,
            stylesheet: None,
        })
    }

    #[test]
    fn test_toggle_component() {
        let out = build(
            "export default {\n\
             \x20 props: { label: String },\n\
             \x20 data: () => ({ open: false }),\n\
             \x20 methods: {\n\
             \x20   toggle() {\n\
             \x20     this.open = !this.open;\n\
             \x20   },\n\
             \x20 },\n\
             };",
            Some(r#"<span v-if="open">{{ label }}</span>"#),
        );
        assert_eq!(
            out.code,
            r#"import React from 'react';
import classNames from 'classnames';
import ComponentBase from '@base/component-base';

export interface ToggleProps {
  label: string;
}

export interface ToggleState {
  open: boolean;
}

export default class Toggle extends ComponentBase<ToggleProps, ToggleState> {
  constructor(props: ToggleProps) {
    super(props);

    this.state = {
      open: false,
    };
  }

  toggle = () => {
    this.setState({ open: !this.state.open });
  };

  render() {
    return (
      <React.Fragment>
        {(() => {
          if (this.state.open) {
            return (
              <span>
                {this.props.label}
              </span>
            );
          }
          return null;
        })()}
      </React.Fragment>
    );
  }
}
"#
        );
    }

    #[test]
    fn test_computed_accessors_and_watchers() {
        let out = build(
            "export default {\n\
             \x20 props: { size: Number },\n\
             \x20 data() { return { count: 0, user: { name: '' } }; },\n\
             \x20 computed: {\n\
             \x20   total: { get() { return this.count; }, set(v) { this.count = v; } },\n\
             \x20 },\n\
             \x20 watch: {\n\
             \x20   count(value, old) { this.report(old); },\n\
             \x20   size: 'report',\n\
             \x20   'user.name': 'report',\n\
             \x20 },\n\
             \x20 methods: { report(v) { return v; } },\n\
             \x20 mounted() { this.total = 3; },\n\
             \x20 activated() { this.report(1); },\n\
             };",
            None,
        );
        let code = &out.code;
        assert!(code.contains("  total() { return this.state.count; }"));
        assert!(code.contains("  setTotal(v) { this.setState({ count: v }); }"));
        assert!(code.contains("  onStateUpdated_count(value, old) { this.report(old); }"));
        assert!(code.contains(
            "  componentDidUpdate(prevProps, prevState) {\n    if (this.props.size !== prevProps.size) {\n      this.report(this.props.size, prevProps.size);\n    }\n\n    if (this.state.user.name !== prevState.user.name) {"
        ));
        assert!(code.contains(
            "  componentDidMount() {\n    this.setTotal(3) /* TODO: WARNING: assignment to computed value 'total' */;\n  }"
        ));
        assert!(code.contains("  // TODO: lifecycle hook 'activated' has no equivalent\n  activated = () => { this.report(1); };"));
        assert!(code.contains("    return null;\n  }\n}\n"));

        let codes: Vec<_> = out.diagnostics.iter().map(|d| d.code).collect();
        assert!(codes.contains(&DiagnosticCode::ComputedMutation));
        assert!(codes.contains(&DiagnosticCode::LifecycleHook));
    }
}

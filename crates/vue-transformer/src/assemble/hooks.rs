//! Function components built on React hooks.

use super::{header, watch_handler_name, AssembleInput, Assembly, Emitter};
use crate::diagnostic::DiagnosticCode;
use crate::props::{default_props, props_interface};
use crate::reflect::{
    indent, ComputedDecl, HookPhase, MethodDecl, Value, WatchDecl, WatchHandler,
};

pub(super) fn assemble(input: &AssembleInput<'_>) -> Assembly {
    let ctx = input.ctx;
    let surface = input.surface;
    let name = &ctx.component_name;
    let mut emitter = Emitter::new(ctx);

    let mut out = header(
        input,
        &[
            "import React, { useState, useEffect } from 'react';".to_string(),
            format!("import classNames from '{}';", input.imports.class_names),
            format!("import ComponentUtils from '{}';", input.imports.component_utils),
        ],
    );
    out.push_str(&props_interface(name, &surface.props));
    out.push_str("\n\n");
    out.push_str(&format!(
        "export default function {}(props: {}Props) {{\n",
        name, name
    ));

    let mut sections: Vec<String> = Vec::new();

    if !surface.data.is_empty() {
        let lines: Vec<String> = surface
            .data
            .iter()
            .map(|(field, value)| {
                let initial = emitter.script(&initial_state(value));
                format!(
                    "{}const [ {}, {} ] = useState({});",
                    indent(1),
                    ctx.target_name(field),
                    ctx.state_setter(field),
                    super::reindent(&initial, 1)
                )
            })
            .collect();
        sections.push(lines.join("\n"));
    }

    if !surface.computed.is_empty() {
        sections.push(computed_state(&mut emitter, input));
    }

    for (method, decl) in &surface.methods {
        let value = match decl {
            MethodDecl::Function(function) => emitter.arrow(function, 1),
            MethodDecl::Expr(expr) => {
                let code = emitter.script(expr);
                super::reindent(&code, 1)
            }
        };
        sections.push(format!(
            "{}const {} = {};",
            indent(1),
            ctx.target_name(method),
            value
        ));
    }

    for (path, decl) in &surface.watch {
        sections.push(watcher(&mut emitter, path, decl));
    }

    for (hook, function) in &surface.hooks {
        let effect = match hook.phase() {
            HookPhase::Mount => format!(
                "{ind}useEffect(() => {{\n{body}\n{ind}}}, []);",
                ind = indent(1),
                body = emitter.statements(function, 2)
            ),
            HookPhase::Unmount => format!(
                "{ind}useEffect(() => {{\n{ind2}return () => {{\n{body}\n{ind2}}};\n{ind}}}, []);",
                ind = indent(1),
                ind2 = indent(2),
                body = emitter.statements(function, 3)
            ),
            HookPhase::Update => {
                emitter.warn(
                    DiagnosticCode::LifecycleHook,
                    format!(
                        "`{}` became an effect without dependencies; it also runs after the first render",
                        hook.name()
                    ),
                );
                format!(
                    "{ind}useEffect(() => {{\n{body}\n{ind}}});",
                    ind = indent(1),
                    body = emitter.statements(function, 2)
                )
            }
            HookPhase::Other => {
                emitter.warn(
                    DiagnosticCode::LifecycleHook,
                    format!("lifecycle hook `{}` has no equivalent", hook.name()),
                );
                let arrow = emitter.arrow(function, 1);
                format!(
                    "{ind}// TODO: lifecycle hook '{hook}' has no equivalent\n{ind}const {hook} = {arrow};",
                    ind = indent(1),
                    hook = hook.name(),
                    arrow = arrow
                )
            }
        };
        let label = format!("{}// {}\n", indent(1), hook.name());
        sections.push(if hook.phase() == HookPhase::Other {
            effect
        } else {
            label + effect.as_str()
        });
    }

    let render = match emitter.template(input.template, 2) {
        Some(jsx) => format!("{ind}return (\n{jsx}\n{ind});", ind = indent(1), jsx = jsx),
        None => format!("{}return null;", indent(1)),
    };
    sections.push(render);

    out.push_str(&sections.join("\n\n"));
    out.push_str("\n}\n");

    if let Some(defaults) = default_props(&surface.props, 0) {
        out.push_str(&format!("\n{}.defaultProps = {};\n", name, defaults));
    }

    emitter.finish(out)
}

/// The `useState` initializer. Function values are wrapped so that React
/// stores the function instead of calling it.
fn initial_state(value: &Value) -> String {
    match value {
        Value::Function(function) => format!("() => {}", function.to_arrow()),
        other => other.to_js(1),
    }
}

fn computed_state(emitter: &mut Emitter<'_>, input: &AssembleInput<'_>) -> String {
    let ctx = input.ctx;
    let mut out = format!(
        "{}const computedState = ComponentUtils.createComputedState({{\n",
        indent(1)
    );

    for (name, decl) in &input.surface.computed {
        let target = ctx.target_name(name);
        let value = match decl {
            ComputedDecl::Getter(getter) => emitter.arrow(getter, 2),
            ComputedDecl::Accessor(accessor) => {
                let mut parts = String::from("{\n");
                if let Some(get) = &accessor.get {
                    let arrow = emitter.arrow(get, 3);
                    parts.push_str(&format!("{}get: {},\n", indent(3), arrow));
                }
                if let Some(set) = &accessor.set {
                    let arrow = emitter.arrow(set, 3);
                    parts.push_str(&format!("{}set: {},\n", indent(3), arrow));
                }
                parts.push_str(&indent(2));
                parts.push('}');
                parts
            }
            ComputedDecl::Value(value) => {
                let code = emitter.script(&value.to_js(2));
                super::reindent(&code, 2)
            }
        };
        out.push_str(&format!("{}{}: {},\n", indent(2), target, value));
    }

    out.push_str(&indent(1));
    out.push_str("});");
    out
}

/// A watcher becomes an effect keyed on the watched expression.
fn watcher(emitter: &mut Emitter<'_>, path: &str, decl: &WatchDecl) -> String {
    let watched = emitter.expression(path);
    let mut notes = vec!["it also runs on mount and receives no previous value"];
    if decl.deep {
        notes.push("deep watching is not translated");
    }
    emitter.warn(
        DiagnosticCode::Watcher,
        format!("watcher on `{}` became an effect; {}", path, notes.join("; ")),
    );

    let (definition, callee) = match &decl.handler {
        WatchHandler::Function(function) => {
            let name = watch_handler_name(path);
            let arrow = emitter.arrow(function, 1);
            (
                Some(format!("{}const {} = {};\n", indent(1), name, arrow)),
                name,
            )
        }
        WatchHandler::Method(method) => (None, emitter.expression(method)),
    };

    format!(
        "{def}{ind}useEffect(() => {{\n{ind2}{callee}({watched});\n{ind}}}, [ {watched} ]);",
        def = definition.unwrap_or_default(),
        ind = indent(1),
        ind2 = indent(2),
        callee = callee,
        watched = watched
    )
}

#[cfg(test)]
mod tests {
    use super::super::{assemble, AssembleInput, ImportPaths};
    use crate::context::{ComponentShape, Context};
    use crate::diagnostic::DiagnosticCode;
    use crate::reflect::{reflect_script, ComponentSurface};
    use pretty_assertions::assert_eq;
    use vue_parser::ScriptLang;

    fn surface(script: &str) -> ComponentSurface {
        reflect_script(script, ScriptLang::JavaScript).expect("script should reflect")
    }

    fn build(script: &str, template: Option<&str>) -> super::Assembly {
        let surface = surface(script);
        let ctx = Context::from_surface(&surface, "Toggle", "toggle", ComponentShape::Function);
        let parsed = template.map(|t| vue_parser::parse(&format!("<template>{}</template>", t)));
        let root = parsed.as_ref().and_then(|p| p.document.template.as_ref());
        let imports = ImportPaths::default();
        assemble(&AssembleInput {
            ctx: &ctx,
            surface: &surface,
            template: root,
            imports: &imports,
            stylesheet: Some("styles.css"),
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
            Some(r#"<button @click="toggle"><span v-if="open">{{ label }}</span></button>"#),
        );
        assert_eq!(
            out.code,
            r#"import React, { useState, useEffect } from 'react';
import classNames from 'classnames';
import ComponentUtils from '@utils/component-utils';
import './styles.css';

export interface ToggleProps {
  label: string;
}

export default function Toggle(props: ToggleProps) {
  const [ open, setOpen ] = useState(false);

  const toggle = () => {
    setOpen(!open);
  };

  return (
    <React.Fragment>
      <button onClick={(event) => { toggle(event); }}>
        {(() => {
          if (open) {
            return (
              <span>
                {props.label}
              </span>
            );
          }
          return null;
        })()}
      </button>
    </React.Fragment>
  );
}
"#
        );
        assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
    }

    #[test]
    fn test_computed_watch_and_hooks() {
        let out = build(
            "export default {\n\
             \x20 props: { size: { type: Number, default: 2 } },\n\
             \x20 data() { return { count: 0 }; },\n\
             \x20 computed: { double() { return this.count * 2; } },\n\
             \x20 watch: { count(value) { this.log(value); } },\n\
             \x20 methods: { log(v) { console.log(v, this.double); } },\n\
             \x20 mounted() { this.count = this.size; },\n\
             \x20 beforeDestroy() { clearTimeout(this.timer); },\n\
             };",
            None,
        );
        let code = &out.code;
        assert!(code.contains(
            "  const computedState = ComponentUtils.createComputedState({\n    double: () => { return count * 2; },\n  });"
        ));
        assert!(code.contains("  const log = (v) => { console.log(v, computedState.double); };"));
        assert!(code.contains(
            "  const watchCount = (value) => { log(value); };\n  useEffect(() => {\n    watchCount(count);\n  }, [ count ]);"
        ));
        assert!(code.contains("  // mounted\n  useEffect(() => {\n    setCount(props.size);\n  }, []);"));
        assert!(code.contains(
            "  // beforeDestroy\n  useEffect(() => {\n    return () => {\n      clearTimeout(this.timer);\n    };\n  }, []);"
        ));
        assert!(code.contains("  return null;\n}\n"));
        assert!(code.ends_with("Toggle.defaultProps = {\n  size: 2,\n};\n"));
        let codes: Vec<_> = out.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![DiagnosticCode::Watcher]);
    }

    #[test]
    fn test_registered_components_and_imports() {
        let out = build(
            "import { mapState } from 'vuex';\n\
             import TodoItem from './todo-item.vue';\n\
             export default { components: { TodoItem } };",
            Some("<todo-item></todo-item>"),
        );
        assert!(out.code.contains("import TodoItem from './todo-item.vue';"));
        assert!(!out.code.contains("vuex"));
        assert!(out
            .code
            .contains("// TODO: import the converted components: TodoItem"));
        assert_eq!(out.custom_tags, vec![smol_str::SmolStr::new("todo-item")]);
    }
}

//! Script reflection.
//!
//! The component script is parsed with swc and its default-exported option
//! object is interpreted as a literal value. Identifiers that cannot be
//! resolved are recorded as opaque references and the interpretation is
//! retried, so a script that depends on imported helpers still reflects.

mod interp;
mod surface;
mod value;

pub use surface::*;
pub use value::*;

use interp::Interpreter;
use rustc_hash::FxHashSet;
use std::sync::Arc;
use swc_common::{FileName, SourceMap};
use swc_ecma_ast::{
    Callee, Decl, Expr, ImportSpecifier, MemberProp, Module, ModuleDecl, ModuleItem, ObjectLit,
    Pat, Stmt,
};
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};
use thiserror::Error;
use vue_parser::ScriptLang;

/// Upper bound on reflection attempts for one script.
pub const MAX_ATTEMPTS: usize = 200;

/// Errors produced while reflecting a component script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReflectError {
    #[error("failed to parse component script: {message}")]
    Parse { message: String },

    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),

    #[error("gave up after {attempts} attempts; last unresolved reference was `{last}`")]
    RetryLimitExceeded { attempts: usize, last: String },

    #[error("the default export is not a component options object")]
    UnsupportedExport,
}

/// Reflects a component script into its declared surface.
///
/// A script without a default export yields an empty surface.
pub fn reflect_script(source: &str, lang: ScriptLang) -> Result<ComponentSurface, ReflectError> {
    let cm: Arc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        FileName::Custom("component-script".into()).into(),
        source.to_string(),
    );
    let syntax = match lang {
        ScriptLang::TypeScript => Syntax::Typescript(TsSyntax {
            tsx: false,
            decorators: true,
            ..Default::default()
        }),
        ScriptLang::JavaScript => Syntax::Es(EsSyntax {
            jsx: false,
            decorators: true,
            ..Default::default()
        }),
    };

    let mut parser = Parser::new(syntax, StringInput::from(&*fm), None);
    let module = parser.parse_module().map_err(|e| ReflectError::Parse {
        message: format!("{:?}", e.kind()),
    })?;

    let imports = collect_imports(&module, source, fm.start_pos.0);
    let Some(options) = find_options_object(&module)? else {
        return Ok(ComponentSurface {
            imports,
            ..Default::default()
        });
    };

    let mut stubs: FxHashSet<String> = imports
        .iter()
        .flat_map(|import| import.locals.iter().cloned())
        .collect();

    let mut last = String::new();
    for _ in 0..MAX_ATTEMPTS {
        let attempt = {
            let mut interpreter = Interpreter::new(source, fm.start_pos, &stubs);
            interpreter
                .bind_module(&module)
                .and_then(|()| interpreter.reflect(options))
        };

        match attempt {
            Ok(mut surface) => {
                let mut opaque: Vec<String> = stubs.into_iter().collect();
                opaque.sort();
                surface.opaque_references = opaque;
                surface.imports = imports;
                return Ok(surface);
            }
            Err(ReflectError::UnresolvedReference(name)) => {
                if !stubs.insert(name.clone()) {
                    // Resolving the same name twice means stubbing it had no effect.
                    return Err(ReflectError::RetryLimitExceeded {
                        attempts: MAX_ATTEMPTS,
                        last: name,
                    });
                }
                last = name;
            }
            Err(other) => return Err(other),
        }
    }

    Err(ReflectError::RetryLimitExceeded {
        attempts: MAX_ATTEMPTS,
        last,
    })
}

/// Collects value imports. Type-only imports are skipped.
fn collect_imports(module: &Module, source: &str, start: u32) -> Vec<ImportRecord> {
    let mut imports = Vec::new();

    for item in &module.body {
        let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item else {
            continue;
        };
        if import.type_only {
            continue;
        }

        let locals = import
            .specifiers
            .iter()
            .filter(|spec| !matches!(spec, ImportSpecifier::Named(named) if named.is_type_only))
            .map(|spec| match spec {
                ImportSpecifier::Named(named) => named.local.sym.to_string(),
                ImportSpecifier::Default(default) => default.local.sym.to_string(),
                ImportSpecifier::Namespace(ns) => ns.local.sym.to_string(),
            })
            .collect();

        let lo = import.span.lo.0.saturating_sub(start) as usize;
        let hi = import.span.hi.0.saturating_sub(start) as usize;
        imports.push(ImportRecord {
            source: import.src.value.as_str().unwrap_or_default().to_string(),
            text: source.get(lo..hi).unwrap_or_default().to_string(),
            locals,
        });
    }

    imports
}

/// Locates the option object of the default export.
fn find_options_object(module: &Module) -> Result<Option<&ObjectLit>, ReflectError> {
    for item in &module.body {
        match item {
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) => {
                return unwrap_options(module, &export.expr, 0).map(Some);
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(_)) => {
                return Err(ReflectError::UnsupportedExport);
            }
            _ => {}
        }
    }
    Ok(None)
}

/// Strips wrappers such as `defineComponent(...)`, `Vue.extend(...)` and type
/// assertions from a default export.
fn unwrap_options<'m>(
    module: &'m Module,
    expr: &'m Expr,
    depth: usize,
) -> Result<&'m ObjectLit, ReflectError> {
    if depth > 8 {
        return Err(ReflectError::UnsupportedExport);
    }

    match expr {
        Expr::Object(object) => Ok(object),
        Expr::Paren(paren) => unwrap_options(module, &paren.expr, depth + 1),
        Expr::TsAs(e) => unwrap_options(module, &e.expr, depth + 1),
        Expr::TsSatisfies(e) => unwrap_options(module, &e.expr, depth + 1),
        Expr::TsConstAssertion(e) => unwrap_options(module, &e.expr, depth + 1),
        Expr::Call(call) => {
            let Callee::Expr(callee) = &call.callee else {
                return Err(ReflectError::UnsupportedExport);
            };
            let wrapper = match callee.as_ref() {
                Expr::Ident(ident) => ident.sym.as_str() == "defineComponent",
                Expr::Member(member) => matches!(
                    &member.prop,
                    MemberProp::Ident(name) if matches!(name.sym.as_str(), "extend" | "component")
                ),
                _ => false,
            };
            // `Vue.component('name', {...})` passes the options last.
            match call.args.last() {
                Some(arg) if wrapper && arg.spread.is_none() => {
                    unwrap_options(module, &arg.expr, depth + 1)
                }
                _ => Err(ReflectError::UnsupportedExport),
            }
        }
        Expr::Ident(ident) => {
            let init = find_module_binding(module, ident.sym.as_str())
                .ok_or(ReflectError::UnsupportedExport)?;
            unwrap_options(module, init, depth + 1)
        }
        _ => Err(ReflectError::UnsupportedExport),
    }
}

fn find_module_binding<'m>(module: &'m Module, name: &str) -> Option<&'m Expr> {
    module.body.iter().find_map(|item| {
        let ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) = item else {
            return None;
        };
        var.decls.iter().find_map(|declarator| match &declarator.name {
            Pat::Ident(binding) if binding.id.sym.as_str() == name => {
                declarator.init.as_deref()
            }
            _ => None,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reflect(source: &str) -> ComponentSurface {
        reflect_script(source, ScriptLang::JavaScript).expect("script should reflect")
    }

    #[test]
    fn test_data_function_forms() {
        for source in [
            "export default { data() { return { a: 1, b: 'x' }; } }",
            "export default { data: function () { return { a: 1, b: 'x' }; } }",
            "export default { data: () => ({ a: 1, b: 'x' }) }",
            "export default { data: () => { const a = 1; return { a, b: 'x' }; } }",
        ] {
            let surface = reflect(source);
            assert_eq!(surface.data.get("a"), Some(&Value::Number(1.0)), "{}", source);
            assert_eq!(surface.data.get("b"), Some(&Value::Str("x".into())), "{}", source);
        }
    }

    #[test]
    fn test_define_component_and_typescript() {
        let surface = reflect_script(
            "import { defineComponent } from 'vue';\n\
             export default defineComponent({ name: 'Foo', props: { n: Number as PropType<number> } });",
            ScriptLang::TypeScript,
        )
        .expect("script should reflect");
        assert_eq!(surface.name.as_deref(), Some("Foo"));
        assert_eq!(surface.props["n"].ty, PropType::Ctor(TypeCtor::Number));
        assert_eq!(surface.imports[0].source, "vue");
    }

    #[test]
    fn test_unknown_identifiers_are_stubbed() {
        let surface = reflect(
            "export default { data() { return { items: makeItems(), limit: MAX_LIMIT }; } }",
        );
        assert_eq!(surface.data["items"], Value::Expr("makeItems()".into()));
        assert_eq!(surface.data["limit"], Value::Expr("MAX_LIMIT".into()));
        assert_eq!(surface.opaque_references, vec!["MAX_LIMIT".to_string()]);
    }

    #[test]
    fn test_module_constants_are_resolved() {
        let surface = reflect(
            "const DEFAULT_SIZE = 4;\n\
             const options = { data() { return { size: DEFAULT_SIZE }; } };\n\
             export default options;",
        );
        assert_eq!(surface.data["size"], Value::Number(4.0));
    }

    #[test]
    fn test_mapped_helpers_produce_placeholders() {
        let surface = reflect(
            "import { mapState, mapActions } from 'vuex';\n\
             export default {\n\
               computed: { ...mapState('cart', ['items']), own() { return 1; } },\n\
               methods: { ...mapActions({ add: 'cart/addItem' }) },\n\
             }",
        );
        assert!(surface.computed.contains_key("items"));
        assert!(surface.computed.contains_key("own"));
        assert!(surface.methods.contains_key("add"));

        let scopes: Vec<&str> = surface.mapped.iter().map(|m| m.scope.as_str()).collect();
        assert_eq!(scopes, vec!["cart.items", "add = root.cart/addItem"]);
        match &surface.computed["items"] {
            ComputedDecl::Getter(f) => {
                assert!(f.body.contains("TODO: mapped state (mapState)... help! Scope: cart.items"))
            }
            other => panic!("unexpected computed entry: {:?}", other),
        }
    }

    #[test]
    fn test_hooks_watchers_and_unsupported_options() {
        let surface = reflect(
            "export default {\n\
               mixins: [],\n\
               emits: ['change'],\n\
               watch: { value(v) { this.seen = v; } },\n\
               mounted() { this.ready = true; },\n\
             }",
        );
        assert_eq!(surface.unsupported_options, vec!["mixins".to_string()]);
        assert!(surface.watch.contains_key("value"));
        assert_eq!(surface.hooks.len(), 1);
        assert_eq!(surface.hooks[0].0, LifecycleHook::Mounted);
        assert_eq!(surface.hooks[0].1.body, "{ this.ready = true; }");
    }

    #[test]
    fn test_getter_setter_pairs() {
        let surface = reflect(
            "export default { computed: { full: { get() { return this.a; }, set(v) { this.a = v; } } } }",
        );
        match &surface.computed["full"] {
            ComputedDecl::Accessor(acc) => {
                assert!(acc.get.is_some());
                assert_eq!(acc.set.as_ref().map(|f| f.params.as_str()), Some("v"));
            }
            other => panic!("unexpected computed entry: {:?}", other),
        }
    }

    #[test]
    fn test_no_default_export_is_empty() {
        let surface = reflect("const x = 1;");
        assert!(surface.props.is_empty());
        assert!(surface.data.is_empty());
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            reflect_script("export default class Foo {}", ScriptLang::JavaScript).unwrap_err(),
            ReflectError::UnsupportedExport
        );
        assert!(matches!(
            reflect_script("export default {", ScriptLang::JavaScript),
            Err(ReflectError::Parse { .. })
        ));
    }
}

//! Interpreter for the literal subset of JavaScript used in option objects.

use super::surface::{
    computed_from_value, methods_from_value, props_from_value, watch_from_value,
    ComponentSurface, LifecycleHook, MapKind, MappedName,
};
use super::value::{Accessor, FunctionValue, TypeCtor, Value};
use super::ReflectError;
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use swc_common::{BytePos, Span, Spanned};
use swc_ecma_ast::{
    ArrowExpr, BlockStmt, BlockStmtOrExpr, CallExpr, Callee, Decl, ExportDecl, Expr, ExprOrSpread,
    Function, Lit, Module, ModuleDecl, ModuleItem, ObjectLit, Pat, Prop, PropName, PropOrSpread,
    Stmt, UnaryOp,
};

/// Local bindings visible to an expression.
type Scope = IndexMap<String, Value>;

/// Globals that evaluate to opaque expressions rather than failing.
const KNOWN_GLOBALS: &[&str] = &[
    "Math", "JSON", "window", "document", "console", "navigator", "localStorage", "Intl",
    "globalThis", "process",
];

/// Option keys that are read elsewhere or have no runtime effect.
const IGNORED_OPTIONS: &[&str] = &["emits", "inheritAttrs", "model", "expose"];

pub(crate) struct Interpreter<'a> {
    source: &'a str,
    start: BytePos,
    bindings: Scope,
    stubs: &'a FxHashSet<String>,
    mapped: Vec<MappedName>,
}

impl<'a> Interpreter<'a> {
    pub(crate) fn new(source: &'a str, start: BytePos, stubs: &'a FxHashSet<String>) -> Self {
        Self {
            source,
            start,
            bindings: Scope::new(),
            stubs,
            mapped: Vec::new(),
        }
    }

    /// Returns the source text covered by a span.
    fn text(&self, span: Span) -> &'a str {
        let lo = span.lo.0.saturating_sub(self.start.0) as usize;
        let hi = span.hi.0.saturating_sub(self.start.0) as usize;
        self.source.get(lo..hi).unwrap_or("")
    }

    fn opaque(&self, expr: &Expr) -> Value {
        Value::Expr(self.text(expr.span()).to_string())
    }

    /// Binds module-level declarations so the option object can refer to them.
    pub(crate) fn bind_module(&mut self, module: &Module) -> Result<(), ReflectError> {
        for item in &module.body {
            match item {
                ModuleItem::Stmt(Stmt::Decl(decl))
                | ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl { decl, .. })) => {
                    self.bind_decl(decl)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn bind_decl(&mut self, decl: &Decl) -> Result<(), ReflectError> {
        match decl {
            Decl::Var(var) => {
                for declarator in &var.decls {
                    let (Pat::Ident(binding), Some(init)) = (&declarator.name, &declarator.init)
                    else {
                        continue;
                    };
                    let value = self.eval(init, &Scope::new())?;
                    self.bindings.insert(binding.id.sym.to_string(), value);
                }
            }
            Decl::Fn(decl) => {
                let value = self.function_value(&decl.function);
                self.bindings
                    .insert(decl.ident.sym.to_string(), Value::Function(value));
            }
            _ => {}
        }
        Ok(())
    }

    /// Reflects the option object into a component surface.
    pub(crate) fn reflect(mut self, options: &ObjectLit) -> Result<ComponentSurface, ReflectError> {
        let mut surface = ComponentSurface::default();

        for prop in &options.props {
            let prop = match prop {
                PropOrSpread::Prop(prop) => prop,
                PropOrSpread::Spread(spread) => {
                    surface
                        .unsupported_options
                        .push(format!("...{}", self.text(spread.expr.span())));
                    continue;
                }
            };
            let Some(key) = option_key(prop) else {
                continue;
            };

            match key.as_str() {
                "data" => surface.data = self.eval_data(prop)?,
                "props" => surface.props = props_from_value(&self.eval_prop(prop)?),
                "computed" => surface.computed = computed_from_value(&self.eval_prop(prop)?),
                "methods" => surface.methods = methods_from_value(&self.eval_prop(prop)?),
                "watch" => {
                    let (watch, skipped) = watch_from_value(&self.eval_prop(prop)?);
                    surface.watch = watch;
                    surface
                        .unsupported_options
                        .extend(skipped.into_iter().map(|path| format!("watch.{}", path)));
                }
                "name" => {
                    surface.name = self.eval_prop(prop)?.as_str().map(str::to_string);
                }
                "components" => {
                    if let Value::Object(components) = self.eval_prop(prop)? {
                        surface.components = components.keys().cloned().collect();
                    }
                }
                name => {
                    if let Some(hook) = LifecycleHook::from_name(name) {
                        if let Value::Function(f) = self.eval_prop(prop)? {
                            surface.hooks.push((hook, f));
                        }
                    } else if !IGNORED_OPTIONS.contains(&name) {
                        surface.unsupported_options.push(name.to_string());
                    }
                }
            }
        }

        surface.mapped = self.mapped;
        Ok(surface)
    }

    /// Evaluates the value of an option-object property.
    fn eval_prop(&mut self, prop: &Prop) -> Result<Value, ReflectError> {
        match prop {
            Prop::KeyValue(kv) => self.eval(&kv.value, &Scope::new()),
            Prop::Method(method) => Ok(Value::Function(self.function_value(&method.function))),
            Prop::Shorthand(ident) => self.resolve(ident.sym.as_str(), &Scope::new()),
            _ => Ok(Value::Undefined),
        }
    }

    /// Evaluates `data`, which may be an object or a function returning one.
    fn eval_data(&mut self, prop: &Prop) -> Result<IndexMap<String, Value>, ReflectError> {
        let value = match prop {
            Prop::Method(method) => self.eval_function_body(method.function.body.as_ref())?,
            Prop::KeyValue(kv) => match strip_parens(&kv.value) {
                Expr::Fn(f) => self.eval_function_body(f.function.body.as_ref())?,
                Expr::Arrow(arrow) => match arrow.body.as_ref() {
                    BlockStmtOrExpr::BlockStmt(block) => self.eval_block(block)?,
                    BlockStmtOrExpr::Expr(expr) => self.eval(expr, &Scope::new())?,
                },
                other => self.eval(other, &Scope::new())?,
            },
            Prop::Shorthand(ident) => self.resolve(ident.sym.as_str(), &Scope::new())?,
            _ => Value::Undefined,
        };

        Ok(match value {
            Value::Object(map) => map,
            _ => IndexMap::new(),
        })
    }

    fn eval_function_body(&mut self, body: Option<&BlockStmt>) -> Result<Value, ReflectError> {
        match body {
            Some(block) => self.eval_block(block),
            None => Ok(Value::Undefined),
        }
    }

    /// Evaluates the final top-level `return` of a block, with earlier
    /// declarations bound as locals.
    fn eval_block(&mut self, block: &BlockStmt) -> Result<Value, ReflectError> {
        let mut scope = Scope::new();
        let mut result = Value::Undefined;

        for stmt in &block.stmts {
            match stmt {
                Stmt::Decl(Decl::Var(var)) => {
                    for declarator in &var.decls {
                        let (Pat::Ident(binding), Some(init)) =
                            (&declarator.name, &declarator.init)
                        else {
                            continue;
                        };
                        let value = self.eval(init, &scope)?;
                        scope.insert(binding.id.sym.to_string(), value);
                    }
                }
                Stmt::Return(ret) => {
                    result = match &ret.arg {
                        Some(arg) => self.eval(arg, &scope)?,
                        None => Value::Undefined,
                    };
                }
                _ => {}
            }
        }

        Ok(result)
    }

    /// Evaluates an expression in the literal subset.
    pub(crate) fn eval(&mut self, expr: &Expr, scope: &Scope) -> Result<Value, ReflectError> {
        match expr {
            Expr::Lit(lit) => Ok(self.eval_lit(lit)),
            Expr::Array(array) => {
                let mut items = Vec::with_capacity(array.elems.len());
                for elem in &array.elems {
                    match elem {
                        None => items.push(Value::Undefined),
                        Some(ExprOrSpread {
                            spread: Some(_),
                            expr,
                        }) => match self.eval(expr, scope)? {
                            Value::Array(inner) => items.extend(inner),
                            other => items.push(Value::Expr(format!("...{}", other.to_js(0)))),
                        },
                        Some(ExprOrSpread { spread: None, expr }) => {
                            items.push(self.eval(expr, scope)?)
                        }
                    }
                }
                Ok(Value::Array(items))
            }
            Expr::Object(object) => Ok(Value::Object(self.eval_object(object, scope)?)),
            Expr::Ident(ident) => self.resolve(ident.sym.as_str(), scope),
            Expr::Paren(paren) => self.eval(&paren.expr, scope),
            Expr::Unary(unary) if unary.op == UnaryOp::Minus => match self.eval(&unary.arg, scope)? {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Ok(self.opaque(expr)),
            },
            Expr::Fn(f) => Ok(Value::Function(self.function_value(&f.function))),
            Expr::Arrow(arrow) => Ok(Value::Function(self.arrow_value(arrow))),
            Expr::Call(call) => self.eval_call(call, expr, scope),
            Expr::TsAs(e) => self.eval(&e.expr, scope),
            Expr::TsSatisfies(e) => self.eval(&e.expr, scope),
            Expr::TsConstAssertion(e) => self.eval(&e.expr, scope),
            Expr::TsNonNull(e) => self.eval(&e.expr, scope),
            _ => Ok(self.opaque(expr)),
        }
    }

    fn eval_lit(&self, lit: &Lit) -> Value {
        match lit {
            Lit::Str(s) => Value::Str(match s.value.as_str() {
                Some(value) => value.to_string(),
                None => unquote(self.text(s.span)),
            }),
            Lit::Bool(b) => Value::Bool(b.value),
            Lit::Null(_) => Value::Null,
            Lit::Num(n) => Value::Number(n.value),
            Lit::BigInt(b) => Value::BigInt(self.text(b.span).trim_end_matches('n').to_string()),
            other => Value::Expr(self.text(other.span()).to_string()),
        }
    }

    fn eval_object(
        &mut self,
        object: &ObjectLit,
        scope: &Scope,
    ) -> Result<IndexMap<String, Value>, ReflectError> {
        let mut map = IndexMap::new();
        let mut accessors: IndexMap<String, Accessor> = IndexMap::new();

        for prop in &object.props {
            let prop = match prop {
                PropOrSpread::Spread(spread) => {
                    if let Value::Object(inner) = self.eval(&spread.expr, scope)? {
                        map.extend(inner);
                    }
                    continue;
                }
                PropOrSpread::Prop(prop) => prop,
            };

            match prop.as_ref() {
                Prop::Shorthand(ident) => {
                    let value = self.resolve(ident.sym.as_str(), scope)?;
                    map.insert(ident.sym.to_string(), value);
                }
                Prop::KeyValue(kv) => {
                    if let Some(key) = prop_name(&kv.key) {
                        let value = self.eval(&kv.value, scope)?;
                        map.insert(key, value);
                    }
                }
                Prop::Method(method) => {
                    if let Some(key) = prop_name(&method.key) {
                        map.insert(key, Value::Function(self.function_value(&method.function)));
                    }
                }
                Prop::Getter(getter) => {
                    if let Some(key) = prop_name(&getter.key) {
                        let body = getter
                            .body
                            .as_ref()
                            .map(|b| self.text(b.span).to_string())
                            .unwrap_or_else(|| "{}".to_string());
                        map.insert(key.clone(), Value::Accessor(Accessor::default()));
                        accessors.entry(key).or_default().get =
                            Some(FunctionValue::block("", body));
                    }
                }
                Prop::Setter(setter) => {
                    if let Some(key) = prop_name(&setter.key) {
                        let body = setter
                            .body
                            .as_ref()
                            .map(|b| self.text(b.span).to_string())
                            .unwrap_or_else(|| "{}".to_string());
                        let param = self.text(setter.param.span()).to_string();
                        map.insert(key.clone(), Value::Accessor(Accessor::default()));
                        accessors.entry(key).or_default().set =
                            Some(FunctionValue::block(param, body));
                    }
                }
                _ => {}
            }
        }

        for (key, accessor) in accessors {
            if let Some(slot) = map.get_mut(&key) {
                *slot = Value::Accessor(accessor);
            }
        }

        Ok(map)
    }

    fn eval_call(&mut self, call: &CallExpr, expr: &Expr, scope: &Scope) -> Result<Value, ReflectError> {
        if let Callee::Expr(callee) = &call.callee {
            if let Expr::Ident(ident) = callee.as_ref() {
                if let Some(kind) = MapKind::from_helper(ident.sym.as_str()) {
                    let mut args = Vec::with_capacity(call.args.len());
                    for arg in &call.args {
                        args.push(self.eval(&arg.expr, scope)?);
                    }
                    return Ok(Value::Object(self.mapped_placeholders(kind, &args)));
                }
            }
        }
        Ok(self.opaque(expr))
    }

    /// Builds the placeholder entries for a `mapState`-style helper call.
    fn mapped_placeholders(&mut self, kind: MapKind, args: &[Value]) -> IndexMap<String, Value> {
        let (namespace, names) = match args {
            [Value::Str(namespace), names, ..] => (Some(namespace.as_str()), names),
            [names, ..] => (None, names),
            [] => return IndexMap::new(),
        };
        let qualify = |path: &str| match namespace {
            Some(ns) => format!("{}.{}", ns.replace('/', "."), path),
            None => format!("root.{}", path),
        };

        let mut entries: Vec<(String, String)> = Vec::new();
        match names {
            Value::Array(items) => {
                for name in items.iter().filter_map(Value::as_str) {
                    entries.push((name.to_string(), qualify(name)));
                }
            }
            Value::Object(aliases) => {
                for (alias, target) in aliases {
                    let path = match target {
                        Value::Str(path) => path.clone(),
                        _ => "(function)".to_string(),
                    };
                    entries.push((alias.clone(), format!("{} = {}", alias, qualify(&path))));
                }
            }
            _ => {}
        }

        let mut placeholders = IndexMap::new();
        for (name, scope) in entries {
            let body = format!(
                "{{ /* TODO: mapped {} ({})... help! Scope: {} */ }}",
                kind.kind_name(),
                kind.helper(),
                scope
            );
            placeholders.insert(name.clone(), Value::Function(FunctionValue::block("", body)));
            self.mapped.push(MappedName { kind, name, scope });
        }
        placeholders
    }

    fn resolve(&self, name: &str, scope: &Scope) -> Result<Value, ReflectError> {
        if let Some(value) = scope.get(name).or_else(|| self.bindings.get(name)) {
            return Ok(value.clone());
        }
        if let Some(ctor) = TypeCtor::from_name(name) {
            return Ok(Value::Constructor(ctor));
        }
        match name {
            "undefined" => return Ok(Value::Undefined),
            "NaN" => return Ok(Value::Number(f64::NAN)),
            "Infinity" => return Ok(Value::Number(f64::INFINITY)),
            _ => {}
        }
        if self.stubs.contains(name)
            || MapKind::from_helper(name).is_some()
            || KNOWN_GLOBALS.contains(&name)
        {
            return Ok(Value::Expr(name.to_string()));
        }
        Err(ReflectError::UnresolvedReference(name.to_string()))
    }

    fn function_value(&self, function: &Function) -> FunctionValue {
        FunctionValue {
            params: self.span_list_text(function.params.iter().map(|p| p.span)),
            body: function
                .body
                .as_ref()
                .map(|b| self.text(b.span).to_string())
                .unwrap_or_else(|| "{}".to_string()),
            is_async: function.is_async,
            is_arrow: false,
        }
    }

    fn arrow_value(&self, arrow: &ArrowExpr) -> FunctionValue {
        let body = match arrow.body.as_ref() {
            BlockStmtOrExpr::BlockStmt(block) => self.text(block.span),
            BlockStmtOrExpr::Expr(expr) => self.text(expr.span()),
        };
        FunctionValue {
            params: self.span_list_text(arrow.params.iter().map(|p| p.span())),
            body: body.to_string(),
            is_async: arrow.is_async,
            is_arrow: true,
        }
    }

    /// Returns the text from the first span's start to the last span's end.
    fn span_list_text(&self, mut spans: impl Iterator<Item = Span>) -> String {
        let Some(first) = spans.next() else {
            return String::new();
        };
        let last = spans.last().unwrap_or(first);
        self.text(Span::new(first.lo, last.hi)).to_string()
    }
}

fn strip_parens(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => strip_parens(&paren.expr),
        other => other,
    }
}

/// The key of an option-object property.
fn option_key(prop: &Prop) -> Option<String> {
    match prop {
        Prop::KeyValue(kv) => prop_name(&kv.key),
        Prop::Method(method) => prop_name(&method.key),
        Prop::Shorthand(ident) => Some(ident.sym.to_string()),
        Prop::Getter(getter) => prop_name(&getter.key),
        _ => None,
    }
}

/// Gets a string key from a PropName.
fn prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => s.value.as_str().map(str::to_string),
        PropName::Num(n) => Some(n.value.to_string()),
        _ => None,
    }
}

fn unquote(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}
